//! Structural checks on single declarations
//!
//! Each rule looks at one declaration through the host and either passes or
//! yields a [`Diagnostic`] naming the rule and the declaration. A field in
//! the wrong place gets a single diagnostic; once its placement is fine, the
//! visibility and mutability rules are both checked and reported together.

use crate::declaration::{DeclId, DeclarationHost, Marker};
use crate::diagnostic::{Diagnostic, DiagnosticKind};

/// Markers a mapping domain uses for types and their fields
#[derive(Debug, Clone, Copy)]
pub struct Markers {
    pub type_marker: Marker,
    pub column_marker: Marker,
}

/// A marked type must be reachable from generated code
pub fn validate_type<H>(host: &H, id: DeclId, markers: &Markers) -> Result<(), Diagnostic>
where
    H: DeclarationHost + ?Sized,
{
    if !host.visibility(id).is_accessible() {
        return Err(Diagnostic::new(
            id,
            DiagnosticKind::PrivateType,
            format!(
                "{} can not be applied to private type: {}",
                markers.type_marker,
                host.simple_name(id)
            ),
        ));
    }

    Ok(())
}

/// Check where `id` lives, then run the remaining field rules against it,
/// collecting all of their failures
pub fn validate_field<H>(host: &H, id: DeclId, markers: &Markers) -> Result<(), Vec<Diagnostic>>
where
    H: DeclarationHost + ?Sized,
{
    check_enclosing_type(host, id, markers).map_err(|diagnostic| vec![diagnostic])?;

    let errors: Vec<Diagnostic> = [
        check_field_visibility(host, id, markers),
        check_field_mutability(host, id, markers),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The field must live in a struct, and that struct must carry the type
/// marker. The marker is only checked once the owner is known to be a struct.
fn check_enclosing_type<H>(host: &H, id: DeclId, markers: &Markers) -> Result<(), Diagnostic>
where
    H: DeclarationHost + ?Sized,
{
    let Some(owner) = host.enclosing(id).filter(|owner| host.kind(*owner).is_struct()) else {
        return Err(Diagnostic::new(
            id,
            DiagnosticKind::FieldOutsideType,
            format!(
                "please apply {} to fields of a struct: {}",
                markers.column_marker,
                host.simple_name(id)
            ),
        ));
    };

    if !host.has_marker(owner, &markers.type_marker) {
        return Err(Diagnostic::new(
            id,
            DiagnosticKind::UnmarkedEnclosingType,
            format!(
                "please mark type {} with {}",
                host.simple_name(owner),
                markers.type_marker
            ),
        ));
    }

    Ok(())
}

fn check_field_visibility<H>(host: &H, id: DeclId, markers: &Markers) -> Result<(), Diagnostic>
where
    H: DeclarationHost + ?Sized,
{
    if host.visibility(id).is_accessible() {
        return Ok(());
    }

    Err(Diagnostic::new(
        id,
        DiagnosticKind::PrivateField,
        format!(
            "{} can not be applied to private field: {}",
            markers.column_marker,
            host.simple_name(id)
        ),
    ))
}

fn check_field_mutability<H>(host: &H, id: DeclId, markers: &Markers) -> Result<(), Diagnostic>
where
    H: DeclarationHost + ?Sized,
{
    if host.is_mutable(id) {
        return Ok(());
    }

    Err(Diagnostic::new(
        id,
        DiagnosticKind::ImmutableField,
        format!(
            "{} can not be applied to immutable field: {}",
            markers.column_marker,
            host.simple_name(id)
        ),
    ))
}
