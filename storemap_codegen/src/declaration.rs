//! Declaration handles and the host query surface
//!
//! The pipeline never looks at a host's type system directly. It holds
//! [`DeclId`] handles and asks a [`DeclarationHost`] the handful of questions
//! it needs answered: which declarations carry a marker, what kind of
//! declaration a handle is, how visible it is, and what it is called.

use std::fmt;

use derive_more::{From, Into};

/// Opaque identity of a type or field declaration.
///
/// Handles are assigned by a host and are only meaningful to the host that
/// produced them. The pipeline uses them as lookup and attribution keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
pub struct DeclId(usize);

impl DeclId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kinds of declaration a host can hand out
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DeclKind {
    Struct,
    Enum,
    Union,
    /// An enum variant, which can own fields but is not itself a type
    Variant,
    Field,
    Other,
}

impl DeclKind {
    /// Whether fields owned by this declaration can be read and written as
    /// plain places by generated code
    pub fn is_struct(self) -> bool {
        matches!(self, DeclKind::Struct)
    }
}

/// Declared visibility, reduced to what matters for generated accessors
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Visibility {
    /// `pub`
    Public,
    /// `pub(crate)`
    Crate,
    /// `pub(super)`, `pub(in path)` or `pub(self)`
    Restricted,
    /// No visibility qualifier
    Private,
}

impl Visibility {
    /// Generated code lives elsewhere in the crate, so only `pub` and
    /// `pub(crate)` declarations are reachable from it.
    pub fn is_accessible(self) -> bool {
        matches!(self, Visibility::Public | Visibility::Crate)
    }
}

/// A declarative tag identifying participating types or fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker {
    name: &'static str,
}

impl Marker {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#[{}]", self.name)
    }
}

/// Query surface a host toolchain exposes to the pipeline.
///
/// Every method takes a handle previously returned by
/// [`find_marked`](DeclarationHost::find_marked) or
/// [`enclosing`](DeclarationHost::enclosing) on the same host.
pub trait DeclarationHost {
    /// All declarations carrying `marker`, in a stable order
    fn find_marked(&self, marker: &Marker) -> Vec<DeclId>;

    fn kind(&self, id: DeclId) -> DeclKind;

    fn visibility(&self, id: DeclId) -> Visibility;

    /// Whether generated code may assign to the declaration
    fn is_mutable(&self, id: DeclId) -> bool;

    /// The declaration lexically owning `id`, if any
    fn enclosing(&self, id: DeclId) -> Option<DeclId>;

    fn has_marker(&self, id: DeclId, marker: &Marker) -> bool;

    /// Short name used in diagnostics (`User`, `email`)
    fn simple_name(&self, id: DeclId) -> String;

    /// Name unique within one processing round (`crate::models::User`)
    fn qualified_name(&self, id: DeclId) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessible_visibilities() {
        assert!(Visibility::Public.is_accessible());
        assert!(Visibility::Crate.is_accessible());
        assert!(!Visibility::Restricted.is_accessible());
        assert!(!Visibility::Private.is_accessible());
    }

    #[test]
    fn test_marker_display() {
        assert_eq!(Marker::new("table").to_string(), "#[table]");
    }
}
