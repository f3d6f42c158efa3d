use std::collections::BTreeMap;

use derive_more::Deref;
use serde::{Deserialize, Serialize};

use crate::error::RowError;
use crate::value::{FromValue, ToValue, Value};

/// Column values of one stored object, keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Deref, Serialize, Deserialize)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column`, replacing any previous value
    pub fn insert<V: ToValue + ?Sized>(&mut self, column: impl Into<String>, value: &V) {
        self.values.insert(column.into(), value.to_value());
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.values.remove(column)
    }

    /// Read `column` as `T`.
    ///
    /// An absent column reads as [`Value::Null`], so it is only an error
    /// when `T` can not hold null.
    pub fn get_as<T: FromValue>(&self, column: &str) -> Result<T, RowError> {
        match self.values.get(column) {
            Some(value) => T::from_value(value).ok_or_else(|| {
                if value.type_name() == T::EXPECTED {
                    RowError::OutOfRange {
                        column: column.to_string(),
                        target: std::any::type_name::<T>(),
                    }
                } else {
                    RowError::TypeMismatch {
                        column: column.to_string(),
                        expected: T::EXPECTED,
                        found: value.type_name(),
                    }
                }
            }),
            None => T::from_value(&Value::Null).ok_or_else(|| RowError::MissingColumn {
                column: column.to_string(),
            }),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
