use syn::{GenericArgument, PathArguments, Type};

/// Storage encodings a column value can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Boolean,
    Blob,
}

impl ColumnType {
    /// Whether values of this encoding compare exactly, as keys must
    pub fn can_be_key(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Text | ColumnType::Boolean)
    }
}

/// Encoding of a field type, and whether it is nullable (`Option<T>`)
pub fn infer_column_type(ty: &Type) -> Option<(ColumnType, bool)> {
    if let Some(inner) = option_inner(ty) {
        return infer_plain(inner).map(|column_type| (column_type, true));
    }
    infer_plain(ty).map(|column_type| (column_type, false))
}

fn infer_plain(ty: &Type) -> Option<ColumnType> {
    let ty = strip_groups(ty);
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    let name = segment.ident.to_string();

    match name.as_str() {
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" => Some(ColumnType::Integer),
        "f32" | "f64" => Some(ColumnType::Real),
        "bool" => Some(ColumnType::Boolean),
        "String" => Some(ColumnType::Text),
        "Vec" => single_argument(&segment.arguments)
            .filter(|arg| is_ident(arg, "u8"))
            .map(|_| ColumnType::Blob),
        _ => None,
    }
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = strip_groups(ty) else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    single_argument(&segment.arguments)
}

fn single_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    }
}

fn is_ident(ty: &Type, name: &str) -> bool {
    matches!(strip_groups(ty), Type::Path(p) if p.qself.is_none() && p.path.is_ident(name))
}

fn strip_groups(ty: &Type) -> &Type {
    match ty {
        Type::Group(group) => strip_groups(&group.elem),
        Type::Paren(paren) => strip_groups(&paren.elem),
        _ => ty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn infer(ty: Type) -> Option<(ColumnType, bool)> {
        infer_column_type(&ty)
    }

    #[test]
    fn test_plain_types() {
        assert_eq!(infer(parse_quote!(i64)), Some((ColumnType::Integer, false)));
        assert_eq!(infer(parse_quote!(f32)), Some((ColumnType::Real, false)));
        assert_eq!(infer(parse_quote!(std::string::String)), Some((ColumnType::Text, false)));
        assert_eq!(infer(parse_quote!(Vec<u8>)), Some((ColumnType::Blob, false)));
        assert_eq!(infer(parse_quote!(bool)), Some((ColumnType::Boolean, false)));
    }

    #[test]
    fn test_nullable_types() {
        assert_eq!(infer(parse_quote!(Option<String>)), Some((ColumnType::Text, true)));
        assert_eq!(infer(parse_quote!(Option<Option<String>>)), None);
    }

    #[test]
    fn test_unsupported_types() {
        assert_eq!(infer(parse_quote!(u64)), None);
        assert_eq!(infer(parse_quote!(Vec<String>)), None);
        assert_eq!(infer(parse_quote!(HashMap<String, i64>)), None);
        assert_eq!(infer(parse_quote!(&'static str)), None);
    }
}
