//! The `table` mapping domain
//!
//! Maps marked structs to rows of a named table:
//!
//! ```ignore
//! #[table(name = "users")]
//! #[derive(Default)]
//! pub struct User {
//!     #[column(key)]
//!     pub id: i64,
//!     #[column(name = "display_name")]
//!     pub name: String,
//!     #[column(ignore_null)]
//!     pub email: Option<String>,
//! }
//! ```
//!
//! For each table it generates `UserPutResolver`, `UserGetResolver`,
//! `UserDeleteResolver` and `UserTypeMapping`, which implement the resolver
//! traits of the `storemap` runtime.

mod attributes;
mod column_type;
mod generators;
pub mod naming;
mod validate;

use quote::ToTokens;

use crate::declaration::{DeclId, DeclKind, DeclarationHost, Marker, Visibility};
use crate::diagnostic::Diagnostic;
use crate::domain::MappingDomain;
use crate::generate::GeneratorSet;
use crate::meta::{ColumnMeta, ProcessingResult, TypeMeta};
use crate::source::SourceHost;

pub use attributes::{ColumnArgs, TableArgs};
pub use column_type::{ColumnType, infer_column_type};

pub const TABLE: Marker = Marker::new("table");
pub const COLUMN: Marker = Marker::new("column");

/// Type-level attributes of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAttrs {
    /// Storage table name
    pub table: String,
    /// Visibility given to the generated resolvers
    pub visibility: Visibility,
}

/// Column-level attributes of a table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAttrs {
    pub column_type: ColumnType,
    pub nullable: bool,
    pub key: bool,
    pub ignore_null: bool,
}

pub type TableMeta = TypeMeta<TableAttrs, ColumnAttrs>;

pub type TableColumn = ColumnMeta<ColumnAttrs>;

/// Maps structs marked `#[table]` with fields marked `#[column]`
#[derive(Debug, Default, Clone, Copy)]
pub struct TableDomain;

impl TableDomain {
    pub fn new() -> Self {
        Self
    }
}

impl MappingDomain for TableDomain {
    type Host = SourceHost;
    type TypeAttrs = TableAttrs;
    type ColumnAttrs = ColumnAttrs;

    fn type_marker(&self) -> Marker {
        TABLE
    }

    fn column_marker(&self) -> Marker {
        COLUMN
    }

    fn extract_type(&self, host: &SourceHost, id: DeclId) -> Result<TableAttrs, Diagnostic> {
        let name = host.simple_name(id);
        if host.kind(id) != DeclKind::Struct {
            return Err(Diagnostic::extraction(
                id,
                format!("{TABLE} can only be applied to structs, found {} {name}", host.kind(id)),
            ));
        }
        if host.is_generic(id) {
            return Err(Diagnostic::extraction(
                id,
                format!("{TABLE} can not be applied to generic struct: {name}"),
            ));
        }

        let args = match host.marker_attribute(id, &TABLE) {
            Some(attr) => TableArgs::from_attribute(attr)
                .map_err(|e| Diagnostic::extraction(id, format!("invalid {TABLE} on {name}: {e}")))?,
            None => TableArgs::default(),
        };
        let table = args
            .name
            .unwrap_or_else(|| naming::default_table_name(&name));
        if !naming::is_storage_identifier(&table) {
            return Err(Diagnostic::extraction(
                id,
                format!("table name \"{table}\" of {name} is not a valid storage identifier"),
            ));
        }

        Ok(TableAttrs {
            table,
            visibility: host.visibility(id),
        })
    }

    fn extract_column(&self, host: &SourceHost, id: DeclId) -> Result<TableColumn, Diagnostic> {
        let field_name = host.simple_name(id);
        let Some(ty) = host.field_type(id) else {
            return Err(Diagnostic::extraction(
                id,
                format!("{COLUMN} can only be applied to fields: {field_name}"),
            ));
        };

        let args = match host.marker_attribute(id, &COLUMN) {
            Some(attr) => ColumnArgs::from_attribute(attr).map_err(|e| {
                Diagnostic::extraction(id, format!("invalid {COLUMN} on {field_name}: {e}"))
            })?,
            None => ColumnArgs::default(),
        };

        let is_tuple_field = field_name.parse::<usize>().is_ok();
        let storage_name = match args.name {
            Some(name) => name,
            None if is_tuple_field => {
                return Err(Diagnostic::extraction(
                    id,
                    format!("tuple field {field_name} needs an explicit column name: #[column(name = \"...\")]"),
                ));
            }
            None => naming::default_column_name(&field_name),
        };
        if !naming::is_storage_identifier(&storage_name) {
            return Err(Diagnostic::extraction(
                id,
                format!("column name \"{storage_name}\" of {field_name} is not a valid storage identifier"),
            ));
        }

        let value_type = ty.to_token_stream().to_string();
        let Some((column_type, nullable)) = infer_column_type(ty) else {
            return Err(Diagnostic::extraction(
                id,
                format!("unsupported column type `{value_type}` for field {field_name}"),
            ));
        };
        if args.ignore_null && !nullable {
            return Err(Diagnostic::extraction(
                id,
                format!("ignore_null requires an Option field, {field_name} is `{value_type}`"),
            ));
        }

        Ok(ColumnMeta::new(
            id,
            field_name,
            storage_name,
            value_type,
            ColumnAttrs {
                column_type,
                nullable,
                key: args.key,
                ignore_null: args.ignore_null,
            },
        ))
    }

    fn validate_aggregate(&self, result: &ProcessingResult<TableAttrs, ColumnAttrs>) -> Vec<Diagnostic> {
        validate::validate_tables(result)
    }

    fn generators(&self) -> GeneratorSet<TableAttrs, ColumnAttrs> {
        GeneratorSet::new(
            generators::put_resolver,
            generators::get_resolver,
            generators::delete_resolver,
            generators::type_mapping,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use syn::parse_quote;

    fn host(file: syn::File) -> SourceHost {
        SourceHost::from_file(&file, "crate")
    }

    fn column_named(host: &SourceHost, name: &str) -> DeclId {
        host.find_marked(&COLUMN)
            .into_iter()
            .find(|id| host.simple_name(*id) == name)
            .unwrap()
    }

    #[test]
    fn test_extract_type_defaults_table_name() {
        let host = host(parse_quote! {
            #[table]
            pub struct UserProfile {}
        });
        let id = host.find_marked(&TABLE)[0];
        let attrs = TableDomain.extract_type(&host, id).unwrap();
        assert_eq!(attrs.table, "user_profile");
        assert_eq!(attrs.visibility, Visibility::Public);
    }

    #[test]
    fn test_extract_type_rejects_enums_and_generics() {
        let host = host(parse_quote! {
            #[table]
            pub enum Status { On, Off }
            #[table]
            pub struct Wrapper<T> { pub inner: T }
        });
        let ids = host.find_marked(&TABLE);
        let enum_err = TableDomain.extract_type(&host, ids[0]).unwrap_err();
        assert_eq!(enum_err.kind, DiagnosticKind::Extraction);
        assert_eq!(enum_err.message, "#[table] can only be applied to structs, found enum Status");
        assert!(TableDomain.extract_type(&host, ids[1]).is_err());
    }

    #[test]
    fn test_extract_column() {
        let host = host(parse_quote! {
            #[table(name = "users")]
            pub struct User {
                #[column(key)]
                pub id: i64,
                #[column(name = "mail", ignore_null)]
                pub email: Option<String>,
                #[column]
                pub r#type: String,
            }
        });

        let id = TableDomain.extract_column(&host, column_named(&host, "id")).unwrap();
        assert_eq!(id.storage_name, "id");
        assert!(id.attrs.key);
        assert_eq!(id.attrs.column_type, ColumnType::Integer);

        let email = TableDomain.extract_column(&host, column_named(&host, "email")).unwrap();
        assert_eq!(email.storage_name, "mail");
        assert_eq!(email.value_type, "Option < String >");
        assert!(email.attrs.nullable && email.attrs.ignore_null);

        let kind = TableDomain.extract_column(&host, column_named(&host, "r#type")).unwrap();
        assert_eq!(kind.storage_name, "type");
    }

    #[test]
    fn test_extract_column_errors() {
        let host = host(parse_quote! {
            #[table]
            pub struct Bad(
                #[column] pub i64,
            );
            #[table]
            pub struct Worse {
                #[column]
                pub tags: Vec<String>,
                #[column(ignore_null)]
                pub count: i32,
            }
        });

        let tuple = TableDomain.extract_column(&host, column_named(&host, "0")).unwrap_err();
        assert!(tuple.message.starts_with("tuple field 0 needs an explicit column name"));

        let tags = TableDomain.extract_column(&host, column_named(&host, "tags")).unwrap_err();
        assert_eq!(tags.message, "unsupported column type `Vec < String >` for field tags");

        let count = TableDomain.extract_column(&host, column_named(&host, "count")).unwrap_err();
        assert_eq!(count.message, "ignore_null requires an Option field, count is `i32`");
    }
}
