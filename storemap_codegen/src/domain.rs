//! The capability interface a concrete mapping domain implements
//!
//! The pipeline knows nothing about tables, documents or key-value pairs. A
//! [`MappingDomain`] tells it which markers to look for, how to turn a marked
//! declaration into domain attributes, which cross-column invariants hold,
//! and which four generators produce the artifacts.

use crate::declaration::{DeclId, DeclarationHost, Marker};
use crate::diagnostic::Diagnostic;
use crate::generate::GeneratorSet;
use crate::meta::{ColumnMeta, ProcessingResult};
use crate::validate::Markers;

pub trait MappingDomain {
    /// Host adapter the domain extracts attributes from
    type Host: DeclarationHost;

    type TypeAttrs;

    type ColumnAttrs;

    fn type_marker(&self) -> Marker;

    fn column_marker(&self) -> Marker;

    fn markers(&self) -> Markers {
        Markers {
            type_marker: self.type_marker(),
            column_marker: self.column_marker(),
        }
    }

    /// Domain attributes of a type that passed structural validation
    fn extract_type(&self, host: &Self::Host, id: DeclId) -> Result<Self::TypeAttrs, Diagnostic>;

    /// Column metadata of a field that passed structural validation
    fn extract_column(
        &self,
        host: &Self::Host,
        id: DeclId,
    ) -> Result<ColumnMeta<Self::ColumnAttrs>, Diagnostic>;

    /// Every violation of the domain's aggregate invariants.
    ///
    /// Must not stop at the first violation, and must return the same set
    /// when run twice over the same result.
    fn validate_aggregate(
        &self,
        result: &ProcessingResult<Self::TypeAttrs, Self::ColumnAttrs>,
    ) -> Vec<Diagnostic>;

    fn generators(&self) -> GeneratorSet<Self::TypeAttrs, Self::ColumnAttrs>;
}
