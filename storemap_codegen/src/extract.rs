//! Discovery and extraction
//!
//! Asks the host for every declaration carrying the type marker, validates
//! and extracts each one independently, then does the same for every field
//! carrying the column marker and attaches the resulting columns to their
//! owning types. A failing declaration is reported and left out; its
//! siblings are unaffected.

use std::collections::BTreeSet;

use crate::declaration::{DeclId, DeclarationHost};
use crate::diagnostic::Diagnostics;
use crate::domain::MappingDomain;
use crate::meta::{ProcessingResultBuilder, TypeMeta};
use crate::validate::{validate_field, validate_type};

/// Validate and extract every type carrying the type marker.
///
/// Returns how many were discovered and which were excluded.
pub fn extract_types<D>(
    domain: &D,
    host: &D::Host,
    builder: &mut ProcessingResultBuilder<D::TypeAttrs, D::ColumnAttrs>,
    diagnostics: &mut Diagnostics,
) -> (usize, BTreeSet<DeclId>)
where
    D: MappingDomain,
{
    let markers = domain.markers();
    let candidates = host.find_marked(&markers.type_marker);
    let mut excluded = BTreeSet::new();
    log::debug!(
        "discovered {} declaration(s) marked {}",
        candidates.len(),
        markers.type_marker
    );

    for id in &candidates {
        let id = *id;
        let attrs = validate_type(host, id, &markers).and_then(|()| domain.extract_type(host, id));
        match attrs {
            Ok(attrs) => builder.insert(TypeMeta::new(id, host.qualified_name(id), attrs)),
            Err(diagnostic) => {
                log::debug!("excluding {}: {}", host.qualified_name(id), diagnostic.message);
                diagnostics.push(diagnostic);
                excluded.insert(id);
            }
        }
    }

    (candidates.len(), excluded)
}

/// Validate and extract every field carrying the column marker, attaching
/// each column to its owning type
pub fn extract_columns<D>(
    domain: &D,
    host: &D::Host,
    builder: &mut ProcessingResultBuilder<D::TypeAttrs, D::ColumnAttrs>,
    diagnostics: &mut Diagnostics,
) where
    D: MappingDomain,
{
    let markers = domain.markers();
    let fields = host.find_marked(&markers.column_marker);
    log::debug!(
        "discovered {} field(s) marked {}",
        fields.len(),
        markers.column_marker
    );

    for id in fields {
        if let Err(errors) = validate_field(host, id, &markers) {
            diagnostics.extend(errors);
            continue;
        }

        // validation guarantees an enclosing marked struct
        let Some(owner) = host.enclosing(id) else {
            continue;
        };
        if !builder.contains(owner) {
            log::trace!(
                "skipping {}: owning type was excluded",
                host.qualified_name(id)
            );
            continue;
        }

        match domain.extract_column(host, id) {
            Ok(column) => {
                if builder.attach_column(owner, column).is_err() {
                    log::trace!("owner of {} disappeared", host.qualified_name(id));
                }
            }
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }
}
