use proc_macro2::TokenStream;
use quote::quote;
use syn::{Member, Path};

use crate::declaration::Visibility;
use crate::generate::{Artifact, ArtifactRole, GenerateError};

use super::naming::{delete_resolver_name, get_resolver_name, put_resolver_name, type_mapping_name};
use super::{TableColumn, TableMeta};

/// Path of the mapped type as seen from where the artifacts are placed
fn type_path(meta: &TableMeta) -> Result<Path, GenerateError> {
    syn::parse_str(&meta.qualified_name).map_err(|e| {
        GenerateError::at(
            meta.declaration,
            format!("{} is not a usable type path: {e}", meta.qualified_name),
        )
    })
}

fn field_member(column: &TableColumn) -> Result<Member, GenerateError> {
    syn::parse_str(&column.field_name).map_err(|e| {
        GenerateError::at(
            column.declaration,
            format!("{} is not a usable field name: {e}", column.field_name),
        )
    })
}

fn key_column(meta: &TableMeta) -> Result<&TableColumn, GenerateError> {
    let mut keys = meta.columns().filter(|c| c.attrs.key);
    match (keys.next(), keys.next()) {
        (Some(key), None) => Ok(key),
        _ => Err(GenerateError::at(
            meta.declaration,
            format!("{} has no single key column", meta.qualified_name),
        )),
    }
}

fn visibility(meta: &TableMeta) -> TokenStream {
    match meta.attrs.visibility {
        Visibility::Public => quote!(pub),
        _ => quote!(pub(crate)),
    }
}

fn artifact(meta: &TableMeta, role: ArtifactRole, name: &syn::Ident, tokens: TokenStream) -> Artifact {
    Artifact::new(role, &meta.qualified_name, name.to_string(), tokens.to_string())
}

/// `{Type}PutResolver`: the key query and the row written for an object
///
/// ```ignore
/// pub struct UserPutResolver;
///
/// impl ::storemap::PutResolver<crate::User> for UserPutResolver {
///     fn table(&self) -> &'static str { "users" }
///     fn map_to_key_query(&self, object: &crate::User) -> ::storemap::KeyQuery { .. }
///     fn map_to_row(&self, object: &crate::User) -> ::storemap::Row { .. }
/// }
/// ```
pub(super) fn put_resolver(meta: &TableMeta) -> Result<Artifact, GenerateError> {
    let ty = type_path(meta)?;
    let vis = visibility(meta);
    let name = put_resolver_name(meta.simple_name());
    let table = &meta.attrs.table;

    let key = key_column(meta)?;
    let key_name = &key.storage_name;
    let key_member = field_member(key)?;

    let mut inserts = Vec::with_capacity(meta.columns().len());
    for column in meta.columns() {
        let member = field_member(column)?;
        let storage_name = &column.storage_name;
        let insert = quote! { row.insert(#storage_name, &object.#member); };
        if column.attrs.ignore_null {
            inserts.push(quote! {
                if ::core::option::Option::is_some(&object.#member) {
                    #insert
                }
            });
        } else {
            inserts.push(insert);
        }
    }

    let tokens = quote! {
        #[derive(Debug, Default, Clone, Copy)]
        #vis struct #name;

        impl ::storemap::PutResolver<#ty> for #name {
            fn table(&self) -> &'static str {
                #table
            }

            fn map_to_key_query(&self, object: &#ty) -> ::storemap::KeyQuery {
                ::storemap::KeyQuery::new(#table, #key_name, ::storemap::ToValue::to_value(&object.#key_member))
            }

            fn map_to_row(&self, object: &#ty) -> ::storemap::Row {
                let mut row = ::storemap::Row::new();
                #(#inserts)*
                row
            }
        }
    };
    Ok(artifact(meta, ArtifactRole::PutResolver, &name, tokens))
}

/// `{Type}GetResolver`: builds an object from a row, starting from
/// `Default` and assigning every column
pub(super) fn get_resolver(meta: &TableMeta) -> Result<Artifact, GenerateError> {
    let ty = type_path(meta)?;
    let vis = visibility(meta);
    let name = get_resolver_name(meta.simple_name());

    let assignments = meta
        .columns()
        .map(|column| {
            let member = field_member(column)?;
            let storage_name = &column.storage_name;
            Ok(quote! { object.#member = row.get_as(#storage_name)?; })
        })
        .collect::<Result<Vec<_>, GenerateError>>()?;

    let tokens = quote! {
        #[derive(Debug, Default, Clone, Copy)]
        #vis struct #name;

        impl ::storemap::GetResolver<#ty> for #name {
            #[allow(clippy::field_reassign_with_default)]
            fn map_from_row(&self, row: &::storemap::Row) -> ::core::result::Result<#ty, ::storemap::RowError> {
                let mut object = <#ty as ::core::default::Default>::default();
                #(#assignments)*
                ::core::result::Result::Ok(object)
            }
        }
    };
    Ok(artifact(meta, ArtifactRole::GetResolver, &name, tokens))
}

/// `{Type}DeleteResolver`: the key query identifying an object
pub(super) fn delete_resolver(meta: &TableMeta) -> Result<Artifact, GenerateError> {
    let ty = type_path(meta)?;
    let vis = visibility(meta);
    let name = delete_resolver_name(meta.simple_name());
    let table = &meta.attrs.table;

    let key = key_column(meta)?;
    let key_name = &key.storage_name;
    let key_member = field_member(key)?;

    let tokens = quote! {
        #[derive(Debug, Default, Clone, Copy)]
        #vis struct #name;

        impl ::storemap::DeleteResolver<#ty> for #name {
            fn map_to_delete_query(&self, object: &#ty) -> ::storemap::KeyQuery {
                ::storemap::KeyQuery::new(#table, #key_name, ::storemap::ToValue::to_value(&object.#key_member))
            }
        }
    };
    Ok(artifact(meta, ArtifactRole::DeleteResolver, &name, tokens))
}

/// `{Type}TypeMapping`: bundles the three resolvers and makes the type
/// `storemap::Mapped`
pub(super) fn type_mapping(meta: &TableMeta) -> Result<Artifact, GenerateError> {
    let ty = type_path(meta)?;
    let vis = visibility(meta);
    let simple_name = meta.simple_name();
    let name = type_mapping_name(simple_name);
    let put = put_resolver_name(simple_name);
    let get = get_resolver_name(simple_name);
    let delete = delete_resolver_name(simple_name);

    let tokens = quote! {
        #[derive(Debug, Default, Clone, Copy)]
        #vis struct #name;

        impl #name {
            #vis fn mapping() -> ::storemap::TypeMapping<#ty> {
                ::storemap::TypeMapping::new(#put, #get, #delete)
            }
        }

        impl ::storemap::Mapped for #ty {
            fn type_mapping() -> ::storemap::TypeMapping<Self> {
                #name::mapping()
            }
        }
    };
    Ok(artifact(meta, ArtifactRole::Mapping, &name, tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::DeclId;
    use crate::meta::{ColumnMeta, TypeMeta};
    use crate::table::{ColumnAttrs, ColumnType, TableAttrs};

    fn column(id: usize, field: &str, storage: &str, column_type: ColumnType) -> TableColumn {
        ColumnMeta::new(
            DeclId::new(id),
            field,
            storage,
            "",
            ColumnAttrs {
                column_type,
                nullable: false,
                key: false,
                ignore_null: false,
            },
        )
    }

    fn user() -> TableMeta {
        let mut meta = TypeMeta::new(
            DeclId::new(0),
            "self::User",
            TableAttrs {
                table: "users".to_string(),
                visibility: Visibility::Public,
            },
        );
        let mut id = column(1, "id", "id", ColumnType::Integer);
        id.attrs.key = true;
        let mut email = column(2, "email", "mail", ColumnType::Text);
        email.attrs.nullable = true;
        email.attrs.ignore_null = true;
        meta.add_column(id);
        meta.add_column(email);
        meta.add_column(column(3, "r#type", "type", ColumnType::Text));
        meta
    }

    #[test]
    fn test_put_resolver() {
        let artifact = put_resolver(&user()).unwrap();
        assert_eq!(artifact.role, ArtifactRole::PutResolver);
        assert_eq!(artifact.name, "UserPutResolver");
        assert_eq!(artifact.type_name, "self::User");

        let file: syn::File = syn::parse_str(&artifact.contents).unwrap();
        assert_eq!(file.items.len(), 2);
        assert!(artifact.contents.contains("pub struct UserPutResolver"));
        assert!(artifact.contents.contains(r#"KeyQuery :: new ("users" , "id""#));
        assert!(artifact.contents.contains(r#"row . insert ("type" , & object . r#type)"#));
        assert!(artifact.contents.contains("is_some (& object . email)"));
    }

    #[test]
    fn test_get_resolver_assigns_every_column() {
        let artifact = get_resolver(&user()).unwrap();
        let file: syn::File = syn::parse_str(&artifact.contents).unwrap();
        assert_eq!(file.items.len(), 2);
        assert_eq!(artifact.contents.matches("row . get_as").count(), 3);
        assert!(artifact.contents.contains(r#"object . email = row . get_as ("mail") ?"#));
    }

    #[test]
    fn test_crate_visibility_and_tuple_fields() {
        let mut meta = TypeMeta::new(
            DeclId::new(0),
            "crate::models::Point",
            TableAttrs {
                table: "points".to_string(),
                visibility: Visibility::Crate,
            },
        );
        let mut x = column(1, "0", "x", ColumnType::Integer);
        x.attrs.key = true;
        meta.add_column(x);

        let delete = delete_resolver(&meta).unwrap();
        assert!(delete.contents.contains("pub (crate) struct PointDeleteResolver"));
        assert!(delete.contents.contains("& object . 0"));
        assert!(delete.contents.contains("DeleteResolver < crate :: models :: Point >"));
    }

    #[test]
    fn test_type_mapping_implements_mapped() {
        let artifact = type_mapping(&user()).unwrap();
        let file: syn::File = syn::parse_str(&artifact.contents).unwrap();
        assert_eq!(file.items.len(), 3);
        assert!(artifact.contents.contains(
            "TypeMapping :: new (UserPutResolver , UserGetResolver , UserDeleteResolver)"
        ));
        assert!(artifact.contents.contains("impl :: storemap :: Mapped for self :: User"));
    }

    #[test]
    fn test_missing_key_is_a_generation_error() {
        let mut meta = user();
        meta.add_column(column(1, "id", "id", ColumnType::Integer));
        let err = put_resolver(&meta).unwrap_err();
        assert_eq!(err.declaration, Some(DeclId::new(0)));
        assert_eq!(err.message, "self::User has no single key column");
    }

    #[test]
    fn test_output_is_deterministic() {
        assert_eq!(put_resolver(&user()).unwrap(), put_resolver(&user()).unwrap());
        assert_eq!(type_mapping(&user()).unwrap(), type_mapping(&user()).unwrap());
    }
}
