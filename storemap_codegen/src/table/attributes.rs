//! Arguments of the `#[table]` and `#[column]` markers
//!
//! Both markers accept a bare form (`#[table]`), a list form
//! (`#[column(name = "id", key)]`), and `#[table = "users"]` as shorthand for
//! the name.

use syn::{Attribute, Expr, ExprLit, Lit, LitStr, Meta};

/// Parsed `#[table(...)]` arguments
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TableArgs {
    pub name: Option<String>,
}

impl TableArgs {
    pub fn from_attribute(attr: &Attribute) -> syn::Result<Self> {
        let mut args = Self::default();
        match &attr.meta {
            Meta::Path(_) => {}
            Meta::NameValue(name_value) => args.name = Some(string_value(&name_value.value)?),
            Meta::List(_) => attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    args.name = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported table argument, expected `name`"))
                }
            })?,
        }
        Ok(args)
    }
}

/// Parsed `#[column(...)]` arguments
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColumnArgs {
    pub name: Option<String>,
    pub key: bool,
    pub ignore_null: bool,
}

impl ColumnArgs {
    pub fn from_attribute(attr: &Attribute) -> syn::Result<Self> {
        let mut args = Self::default();
        match &attr.meta {
            Meta::Path(_) => {}
            Meta::NameValue(name_value) => args.name = Some(string_value(&name_value.value)?),
            Meta::List(_) => attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    args.name = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("key") {
                    args.key = true;
                } else if meta.path.is_ident("ignore_null") {
                    args.ignore_null = true;
                } else {
                    return Err(meta.error(
                        "unsupported column argument, expected one of `name`, `key`, `ignore_null`",
                    ));
                }
                Ok(())
            })?,
        }
        Ok(args)
    }
}

fn string_value(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) => Ok(lit.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_table_forms() {
        let bare: Attribute = parse_quote!(#[table]);
        let listed: Attribute = parse_quote!(#[table(name = "users")]);
        let shorthand: Attribute = parse_quote!(#[storemap::table = "users"]);

        assert_eq!(TableArgs::from_attribute(&bare).unwrap().name, None);
        assert_eq!(TableArgs::from_attribute(&listed).unwrap().name.as_deref(), Some("users"));
        assert_eq!(TableArgs::from_attribute(&shorthand).unwrap().name.as_deref(), Some("users"));
    }

    #[test]
    fn test_column_flags() {
        let attr: Attribute = parse_quote!(#[column(name = "user_id", key)]);
        let args = ColumnArgs::from_attribute(&attr).unwrap();
        assert_eq!(
            args,
            ColumnArgs {
                name: Some("user_id".to_string()),
                key: true,
                ignore_null: false,
            }
        );
    }

    #[test]
    fn test_unknown_column_argument() {
        let attr: Attribute = parse_quote!(#[column(primary)]);
        let err = ColumnArgs::from_attribute(&attr).unwrap_err();
        assert!(err.to_string().starts_with("unsupported column argument"));
    }
}
