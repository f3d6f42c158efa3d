//! Cross-column and cross-table checks
//!
//! Every check here needs more than one declaration at a time, so it runs on
//! the frozen result after extraction. Diagnostics are attributed to the
//! declaration that breaks the rule, which lets the processor block only the
//! table that owns it.

use std::collections::BTreeMap;

use crate::diagnostic::Diagnostic;
use crate::meta::ProcessingResult;

use super::{ColumnAttrs, TableAttrs, TableColumn, TableMeta};

pub(super) fn validate_tables(result: &ProcessingResult<TableAttrs, ColumnAttrs>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for meta in result.types() {
        validate_table(meta, &mut diagnostics);
    }
    validate_table_names(result, &mut diagnostics);
    diagnostics
}

/// Columns in declaration order, which is source order for parsed hosts
fn columns_in_order(meta: &TableMeta) -> Vec<&TableColumn> {
    let mut columns: Vec<_> = meta.columns().collect();
    columns.sort_by_key(|c| c.declaration);
    columns
}

fn validate_table(meta: &TableMeta, diagnostics: &mut Vec<Diagnostic>) {
    let name = meta.simple_name();
    if meta.is_empty() {
        diagnostics.push(Diagnostic::aggregate(
            meta.declaration,
            format!("table {name} has no #[column] fields"),
        ));
        return;
    }

    let columns = columns_in_order(meta);
    let keys: Vec<_> = columns.iter().filter(|c| c.attrs.key).collect();
    match keys.split_first() {
        None => diagnostics.push(Diagnostic::aggregate(
            meta.declaration,
            format!("table {name} needs exactly one key column: #[column(key)]"),
        )),
        Some((key, extra)) => {
            for column in extra {
                diagnostics.push(Diagnostic::aggregate(
                    column.declaration,
                    format!(
                        "table {name} already has key column {}, {} can not also be a key",
                        key.field_name, column.field_name
                    ),
                ));
            }
        }
    }

    for key in &keys {
        if key.attrs.nullable {
            diagnostics.push(Diagnostic::aggregate(
                key.declaration,
                format!("key column {} of {name} can not be an Option", key.field_name),
            ));
        } else if !key.attrs.column_type.can_be_key() {
            diagnostics.push(Diagnostic::aggregate(
                key.declaration,
                format!(
                    "key column {} of {name} can not have type {}",
                    key.field_name, key.attrs.column_type
                ),
            ));
        }
    }

    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for column in &columns {
        if let Some(first) = seen.get(column.storage_name.as_str()) {
            diagnostics.push(Diagnostic::aggregate(
                column.declaration,
                format!(
                    "column name \"{}\" of {name}.{} is already used by {name}.{first}",
                    column.storage_name, column.field_name
                ),
            ));
        } else {
            seen.insert(&column.storage_name, &column.field_name);
        }
    }
}

/// Table names and generated item names must be unique across the round
fn validate_table_names(
    result: &ProcessingResult<TableAttrs, ColumnAttrs>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut seen: BTreeMap<&str, &TableMeta> = BTreeMap::new();
    let mut simple_names: BTreeMap<&str, &TableMeta> = BTreeMap::new();
    for meta in result.types() {
        // generated items are named after the simple name
        if let Some(first) = simple_names.get(meta.simple_name()) {
            diagnostics.push(Diagnostic::aggregate(
                meta.declaration,
                format!(
                    "{} and {} would generate resolvers with the same names",
                    first.qualified_name, meta.qualified_name
                ),
            ));
        } else {
            simple_names.insert(meta.simple_name(), meta);
        }

        match seen.get(meta.attrs.table.as_str()) {
            Some(first) => diagnostics.push(Diagnostic::aggregate(
                meta.declaration,
                format!(
                    "table name \"{}\" of {} is already used by {}",
                    meta.attrs.table, meta.qualified_name, first.qualified_name
                ),
            )),
            None => {
                seen.insert(&meta.attrs.table, meta);
            }
        }
    }
}
