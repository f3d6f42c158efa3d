use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// A row could not be turned back into an object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("column {column} is missing")]
    MissingColumn { column: String },
    #[error("column {column} holds {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("column {column} holds a value that does not fit {target}")]
    OutOfRange { column: String, target: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    Row(#[from] RowError),
    #[error("a {found} value can not be a key of table {table}")]
    InvalidKey { table: String, found: &'static str },
    #[error("query targets table {found}, expected {expected}")]
    TableMismatch { expected: String, found: String },
}
