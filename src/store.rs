//! In-memory table store driven by generated mappings

use std::collections::BTreeMap;

use crate::error::{StoreError, StoreResult};
use crate::resolver::{KeyQuery, Mapped};
use crate::row::Row;
use crate::value::{Key, ToValue, Value};

/// Tables of rows, each table ordered by key
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: BTreeMap<String, BTreeMap<Key, Row>>,
}

fn key_of(table: &str, value: &Value) -> StoreResult<Key> {
    value.as_key().ok_or_else(|| StoreError::InvalidKey {
        table: table.to_string(),
        found: value.type_name(),
    })
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `object`, returning the row it replaced
    pub fn put<T: Mapped>(&mut self, object: &T) -> StoreResult<Option<Row>> {
        let mapping = T::type_mapping();
        let put = mapping.put_resolver();
        let query = put.map_to_key_query(object);
        if query.table != put.table() {
            return Err(StoreError::TableMismatch {
                expected: put.table().to_string(),
                found: query.table,
            });
        }
        let key = key_of(&query.table, &query.value)?;
        let row = put.map_to_row(object);

        log::trace!("put {:?} into {}", key, query.table);
        Ok(self.tables.entry(query.table).or_default().insert(key, row))
    }

    /// Read the object of type `T` stored under `key`
    pub fn get<T: Mapped>(&self, key: &impl ToValue) -> StoreResult<Option<T>> {
        let mapping = T::type_mapping();
        let table = mapping.put_resolver().table();
        let key = key_of(table, &key.to_value())?;

        match self.tables.get(table).and_then(|rows| rows.get(&key)) {
            Some(row) => Ok(Some(mapping.get_resolver().map_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Delete the row `object` maps to, returning whether one existed
    pub fn delete<T: Mapped>(&mut self, object: &T) -> StoreResult<bool> {
        let query = T::type_mapping().delete_resolver().map_to_delete_query(object);
        let key = key_of(&query.table, &query.value)?;

        log::trace!("delete {:?} from {}", key, query.table);
        Ok(self
            .tables
            .get_mut(&query.table)
            .is_some_and(|rows| rows.remove(&key).is_some()))
    }

    /// The raw row a query points at
    pub fn row(&self, query: &KeyQuery) -> Option<&Row> {
        let key = query.value.as_key()?;
        self.tables.get(&query.table)?.get(&key)
    }

    /// Number of rows in `table`
    pub fn len(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(BTreeMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowError;
    use crate::resolver::{DeleteResolver, GetResolver, PutResolver, TypeMapping};

    #[derive(Debug, Default, PartialEq)]
    struct Note {
        id: i64,
        body: String,
    }

    struct NotePut;
    struct NoteGet;
    struct NoteDelete;

    impl PutResolver<Note> for NotePut {
        fn table(&self) -> &'static str {
            "notes"
        }

        fn map_to_key_query(&self, object: &Note) -> KeyQuery {
            KeyQuery::new("notes", "id", object.id.to_value())
        }

        fn map_to_row(&self, object: &Note) -> Row {
            let mut row = Row::new();
            row.insert("id", &object.id);
            row.insert("body", &object.body);
            row
        }
    }

    impl GetResolver<Note> for NoteGet {
        fn map_from_row(&self, row: &Row) -> Result<Note, RowError> {
            Ok(Note {
                id: row.get_as("id")?,
                body: row.get_as("body")?,
            })
        }
    }

    impl DeleteResolver<Note> for NoteDelete {
        fn map_to_delete_query(&self, object: &Note) -> KeyQuery {
            KeyQuery::new("notes", "id", object.id.to_value())
        }
    }

    impl Mapped for Note {
        fn type_mapping() -> TypeMapping<Self> {
            TypeMapping::new(NotePut, NoteGet, NoteDelete)
        }
    }

    fn note(id: i64, body: &str) -> Note {
        Note {
            id,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_put_get_delete() {
        let mut store = MemoryStore::new();
        assert!(store.put(&note(1, "first")).unwrap().is_none());
        assert!(store.put(&note(1, "again")).unwrap().is_some());
        store.put(&note(2, "second")).unwrap();

        assert_eq!(store.len("notes"), 2);
        assert_eq!(store.get::<Note>(&1i64).unwrap(), Some(note(1, "again")));
        assert_eq!(store.get::<Note>(&9i64).unwrap(), None);

        assert!(store.delete(&note(1, "")).unwrap());
        assert!(!store.delete(&note(1, "")).unwrap());
        assert_eq!(store.len("notes"), 1);
    }

    #[test]
    fn test_invalid_key() {
        let store = MemoryStore::new();
        let err = store.get::<Note>(&1.5f64).unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey { found: "real", .. }));
    }

    #[test]
    fn test_raw_rows() {
        let mut store = MemoryStore::new();
        store.put(&note(3, "raw")).unwrap();
        let row = store.row(&NotePut.map_to_key_query(&note(3, ""))).unwrap();
        assert_eq!(row.get_as::<String>("body"), Ok("raw".to_string()));
    }
}
