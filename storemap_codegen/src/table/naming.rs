use heck::ToSnakeCase;
use proc_macro2::Ident;
use quote::format_ident;

/// Utilities for generating consistent names for resolvers, mappings and
/// storage identifiers

/// Put resolver type name (e.g., User -> UserPutResolver)
pub fn put_resolver_name(type_name: &str) -> Ident {
    format_ident!("{}PutResolver", type_name)
}

/// Get resolver type name (e.g., User -> UserGetResolver)
pub fn get_resolver_name(type_name: &str) -> Ident {
    format_ident!("{}GetResolver", type_name)
}

/// Delete resolver type name (e.g., User -> UserDeleteResolver)
pub fn delete_resolver_name(type_name: &str) -> Ident {
    format_ident!("{}DeleteResolver", type_name)
}

/// Type mapping name (e.g., User -> UserTypeMapping)
pub fn type_mapping_name(type_name: &str) -> Ident {
    format_ident!("{}TypeMapping", type_name)
}

/// Table name used when `#[table]` does not give one (UserProfile -> user_profile)
pub fn default_table_name(type_name: &str) -> String {
    type_name.to_snake_case()
}

/// Column name used when `#[column]` does not give one; raw identifiers
/// lose their prefix (r#type -> type)
pub fn default_column_name(field_name: &str) -> String {
    field_name
        .strip_prefix("r#")
        .unwrap_or(field_name)
        .to_string()
}

/// Storage identifiers are ASCII letters, digits and underscores, not
/// starting with a digit
pub fn is_storage_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_names() {
        assert_eq!(put_resolver_name("User").to_string(), "UserPutResolver");
        assert_eq!(type_mapping_name("User").to_string(), "UserTypeMapping");
    }

    #[test]
    fn test_default_names() {
        assert_eq!(default_table_name("UserProfile"), "user_profile");
        assert_eq!(default_column_name("r#type"), "type");
        assert_eq!(default_column_name("email"), "email");
    }

    #[test]
    fn test_storage_identifiers() {
        assert!(is_storage_identifier("users"));
        assert!(is_storage_identifier("_id2"));
        assert!(!is_storage_identifier(""));
        assert!(!is_storage_identifier("2fa"));
        assert!(!is_storage_identifier("user name"));
    }
}
