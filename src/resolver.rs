//! Resolver traits implemented by generated code
//!
//! For a `#[table]` struct `User`, `#[schema]` (or the build script)
//! generates `UserPutResolver`, `UserGetResolver` and `UserDeleteResolver`
//! implementing the traits below, and `UserTypeMapping` bundling them into a
//! [`TypeMapping`] returned by `<User as Mapped>::type_mapping()`.

use serde::{Deserialize, Serialize};

use crate::error::RowError;
use crate::row::Row;
use crate::value::Value;

/// Identifies one row: the table, its key column and the key value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyQuery {
    pub table: String,
    pub key_column: String,
    pub value: Value,
}

impl KeyQuery {
    pub fn new(table: impl Into<String>, key_column: impl Into<String>, value: Value) -> Self {
        Self {
            table: table.into(),
            key_column: key_column.into(),
            value,
        }
    }
}

/// Maps an object to what gets written
pub trait PutResolver<T> {
    /// Table the object is stored in
    fn table(&self) -> &'static str;

    /// The row the object is written to
    fn map_to_key_query(&self, object: &T) -> KeyQuery;

    /// Every column value of the object
    fn map_to_row(&self, object: &T) -> Row;
}

/// Rebuilds an object from a stored row
pub trait GetResolver<T> {
    fn map_from_row(&self, row: &Row) -> Result<T, RowError>;
}

/// Maps an object to the row that deleting it removes
pub trait DeleteResolver<T> {
    fn map_to_delete_query(&self, object: &T) -> KeyQuery;
}

/// The three resolvers of one type
pub struct TypeMapping<T> {
    put: Box<dyn PutResolver<T>>,
    get: Box<dyn GetResolver<T>>,
    delete: Box<dyn DeleteResolver<T>>,
}

impl<T> TypeMapping<T> {
    pub fn new(
        put: impl PutResolver<T> + 'static,
        get: impl GetResolver<T> + 'static,
        delete: impl DeleteResolver<T> + 'static,
    ) -> Self {
        Self {
            put: Box::new(put),
            get: Box::new(get),
            delete: Box::new(delete),
        }
    }

    pub fn put_resolver(&self) -> &dyn PutResolver<T> {
        self.put.as_ref()
    }

    pub fn get_resolver(&self) -> &dyn GetResolver<T> {
        self.get.as_ref()
    }

    pub fn delete_resolver(&self) -> &dyn DeleteResolver<T> {
        self.delete.as_ref()
    }
}

impl<T> std::fmt::Debug for TypeMapping<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeMapping")
            .field("table", &self.put.table())
            .finish_non_exhaustive()
    }
}

/// Types with a generated [`TypeMapping`]
pub trait Mapped: Sized {
    fn type_mapping() -> TypeMapping<Self>;
}
