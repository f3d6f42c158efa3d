//! Metadata structures for discovered types and columns
//!
//! These hold everything extraction learned about a marked type. They are
//! populated during a single extraction pass through a
//! [`ProcessingResultBuilder`], then frozen into a [`ProcessingResult`] that
//! later stages can only read.

use std::collections::BTreeMap;

use crate::declaration::DeclId;

/// Metadata for a single marked field
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta<C> {
    /// The field declaration, for attribution
    pub declaration: DeclId,

    /// Field name as written in the source (`id`, `0`, `r#type`)
    pub field_name: String,

    /// Name the value is stored under
    pub storage_name: String,

    /// Declared type of the field, as source text
    pub value_type: String,

    /// Domain-specific column attributes
    pub attrs: C,
}

impl<C> ColumnMeta<C> {
    pub fn new(
        declaration: DeclId,
        field_name: impl Into<String>,
        storage_name: impl Into<String>,
        value_type: impl Into<String>,
        attrs: C,
    ) -> Self {
        Self {
            declaration,
            field_name: field_name.into(),
            storage_name: storage_name.into(),
            value_type: value_type.into(),
            attrs,
        }
    }
}

/// Metadata for a single marked type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMeta<T, C> {
    /// The type declaration, for attribution
    pub declaration: DeclId,

    /// Identity of the type within the round (`crate::models::User`)
    pub qualified_name: String,

    /// Domain-specific type attributes
    pub attrs: T,

    /// Columns keyed by field name
    columns: BTreeMap<String, ColumnMeta<C>>,
}

impl<T, C> TypeMeta<T, C> {
    pub fn new(declaration: DeclId, qualified_name: impl Into<String>, attrs: T) -> Self {
        Self {
            declaration,
            qualified_name: qualified_name.into(),
            attrs,
            columns: BTreeMap::new(),
        }
    }

    /// Attach a column, returning the previous column for the same field
    pub fn add_column(&mut self, column: ColumnMeta<C>) -> Option<ColumnMeta<C>> {
        self.columns.insert(column.field_name.clone(), column)
    }

    /// Columns in field-name order
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &ColumnMeta<C>> {
        self.columns.values()
    }

    pub fn column(&self, field_name: &str) -> Option<&ColumnMeta<C>> {
        self.columns.get(field_name)
    }

    /// Every column stored under `storage_name`
    pub fn columns_named<'a>(
        &'a self,
        storage_name: &'a str,
    ) -> impl Iterator<Item = &'a ColumnMeta<C>> + 'a {
        self.columns
            .values()
            .filter(move |c| c.storage_name == storage_name)
    }

    pub fn has_column_declaration(&self, id: DeclId) -> bool {
        self.columns.values().any(|c| c.declaration == id)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Simple name of the type: last segment of the qualified name
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.qualified_name)
    }
}

/// Round-scoped accumulation of discovered types
#[derive(Debug)]
pub struct ProcessingResultBuilder<T, C> {
    types: BTreeMap<DeclId, TypeMeta<T, C>>,
}

impl<T, C> Default for ProcessingResultBuilder<T, C> {
    fn default() -> Self {
        Self {
            types: BTreeMap::new(),
        }
    }
}

impl<T, C> ProcessingResultBuilder<T, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a type; a handle is only ever discovered once per round, so a
    /// second insert for the same handle replaces the first
    pub fn insert(&mut self, meta: TypeMeta<T, C>) {
        self.types.insert(meta.declaration, meta);
    }

    pub fn contains(&self, id: DeclId) -> bool {
        self.types.contains_key(&id)
    }

    /// Attach `column` to the type declared by `owner`.
    ///
    /// Returns the column back when `owner` is not part of the result.
    pub fn attach_column(&mut self, owner: DeclId, column: ColumnMeta<C>) -> Result<(), ColumnMeta<C>> {
        match self.types.get_mut(&owner) {
            Some(meta) => {
                meta.add_column(column);
                Ok(())
            }
            None => Err(column),
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Stop accepting changes and expose the result read-only
    pub fn freeze(self) -> ProcessingResult<T, C> {
        ProcessingResult { types: self.types }
    }
}

/// Read-only mapping from type handle to its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult<T, C> {
    types: BTreeMap<DeclId, TypeMeta<T, C>>,
}

impl<T, C> ProcessingResult<T, C> {
    pub fn get(&self, id: DeclId) -> Option<&TypeMeta<T, C>> {
        self.types.get(&id)
    }

    pub fn contains(&self, id: DeclId) -> bool {
        self.types.contains_key(&id)
    }

    /// Types in handle order
    pub fn types(&self) -> impl ExactSizeIterator<Item = &TypeMeta<T, C>> {
        self.types.values()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (DeclId, &TypeMeta<T, C>)> {
        self.types.iter().map(|(id, meta)| (*id, meta))
    }

    /// The type that `id` designates, either as the type itself or as one of
    /// its columns
    pub fn owner_of(&self, id: DeclId) -> Option<DeclId> {
        if self.types.contains_key(&id) {
            return Some(id);
        }
        self.types
            .values()
            .find(|meta| meta.has_column_declaration(id))
            .map(|meta| meta.declaration)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(id: usize, field: &str, storage: &str) -> ColumnMeta<()> {
        ColumnMeta::new(DeclId::new(id), field, storage, "i64", ())
    }

    #[test]
    fn test_builder_attaches_columns_by_owner() {
        let mut builder = ProcessingResultBuilder::new();
        builder.insert(TypeMeta::new(DeclId::new(0), "self::User", ()));

        assert!(builder.attach_column(DeclId::new(0), column(1, "id", "id")).is_ok());
        let orphan = builder.attach_column(DeclId::new(7), column(8, "x", "x"));
        assert_eq!(orphan.unwrap_err().field_name, "x");

        let result = builder.freeze();
        let user = result.get(DeclId::new(0)).unwrap();
        assert_eq!(user.columns().len(), 1);
        assert_eq!(user.simple_name(), "User");
    }

    #[test]
    fn test_owner_of_column_and_type() {
        let mut builder = ProcessingResultBuilder::new();
        builder.insert(TypeMeta::new(DeclId::new(0), "User", ()));
        builder.attach_column(DeclId::new(0), column(1, "id", "id")).unwrap();
        let result = builder.freeze();

        assert_eq!(result.owner_of(DeclId::new(0)), Some(DeclId::new(0)));
        assert_eq!(result.owner_of(DeclId::new(1)), Some(DeclId::new(0)));
        assert_eq!(result.owner_of(DeclId::new(2)), None);
    }

    #[test]
    fn test_columns_named_finds_collisions() {
        let mut meta = TypeMeta::new(DeclId::new(0), "User", ());
        meta.add_column(column(1, "id", "id"));
        meta.add_column(column(2, "user_id", "id"));
        meta.add_column(column(3, "name", "name"));

        assert_eq!(meta.columns_named("id").count(), 2);
        assert_eq!(meta.columns_named("name").count(), 1);
    }
}
