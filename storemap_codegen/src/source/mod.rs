//! Host adapter over parsed Rust source
//!
//! [`SourceHost`] walks a `syn` tree once and indexes every declaration the
//! pipeline may ask about: structs, enums, unions, enum variants and fields,
//! descending into inline modules. Handles are indices into that table, so
//! discovery order is source order.

mod markers;

use proc_macro2::Span;
use syn::{Attribute, Fields, Item, ItemMod, Type, spanned::Spanned, visit::Visit};

use crate::declaration::{DeclId, DeclKind, DeclarationHost, Marker, Visibility};
use crate::diagnostic::Diagnostic;

pub use markers::{find_marker, is_marker, strip_markers};

/// One indexed declaration
#[derive(Debug, Clone)]
struct DeclNode {
    kind: DeclKind,
    name: String,
    qualified_name: String,
    visibility: Visibility,
    mutable: bool,
    generic: bool,
    enclosing: Option<DeclId>,
    attrs: Vec<Attribute>,
    ty: Option<Type>,
    span: Span,
}

/// Declarations of one or more Rust sources, queried by the pipeline
#[derive(Debug, Clone, Default)]
pub struct SourceHost {
    nodes: Vec<DeclNode>,
}

impl SourceHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a whole file whose items live under `module_path`
    /// (`crate`, `crate::models`)
    pub fn from_file(file: &syn::File, module_path: &str) -> Self {
        let mut host = Self::new();
        host.add_file(file, module_path);
        host
    }

    /// Index the contents of an inline module. Qualified names are relative
    /// to the module itself (`self::User`), which is where generated items
    /// are placed.
    pub fn from_module(module: &ItemMod) -> Self {
        let mut host = Self::new();
        if let Some((_, items)) = &module.content {
            host.add_items(items, "self");
        }
        host
    }

    pub fn add_file(&mut self, file: &syn::File, module_path: &str) {
        self.add_items(&file.items, module_path);
    }

    fn add_items(&mut self, items: &[Item], module_path: &str) {
        let mut indexer = Indexer {
            host: self,
            path: vec![module_path.to_string()],
        };
        for item in items {
            indexer.visit_item(item);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: DeclId) -> &DeclNode {
        &self.nodes[id.index()]
    }

    /// The marker attribute attached to `id`, if present
    pub fn marker_attribute(&self, id: DeclId, marker: &Marker) -> Option<&Attribute> {
        find_marker(&self.node(id).attrs, marker)
    }

    /// Declared type of a field
    pub fn field_type(&self, id: DeclId) -> Option<&Type> {
        self.node(id).ty.as_ref()
    }

    /// Whether a type declares generic parameters
    pub fn is_generic(&self, id: DeclId) -> bool {
        self.node(id).generic
    }

    pub fn span(&self, id: DeclId) -> Span {
        self.node(id).span
    }

    /// Spanned compiler error for a diagnostic; unattributed diagnostics
    /// point at the call site
    pub fn to_syn_error(&self, diagnostic: &Diagnostic) -> syn::Error {
        let span = diagnostic
            .declaration
            .filter(|id| id.index() < self.nodes.len())
            .map_or_else(Span::call_site, |id| self.span(id));
        syn::Error::new(span, &diagnostic.message)
    }

    /// `line:column: message`, for build script output
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        match diagnostic.declaration.filter(|id| id.index() < self.nodes.len()) {
            Some(id) => {
                let start = self.span(id).start();
                format!(
                    "{} ({}:{}): {}",
                    self.qualified_name(id),
                    start.line,
                    start.column + 1,
                    diagnostic.message
                )
            }
            None => diagnostic.message.clone(),
        }
    }

    fn push(&mut self, node: DeclNode) -> DeclId {
        let id = DeclId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }
}

impl DeclarationHost for SourceHost {
    fn find_marked(&self, marker: &Marker) -> Vec<DeclId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| find_marker(&node.attrs, marker).is_some())
            .map(|(index, _)| DeclId::new(index))
            .collect()
    }

    fn kind(&self, id: DeclId) -> DeclKind {
        self.node(id).kind
    }

    fn visibility(&self, id: DeclId) -> Visibility {
        self.node(id).visibility
    }

    fn is_mutable(&self, id: DeclId) -> bool {
        self.node(id).mutable
    }

    fn enclosing(&self, id: DeclId) -> Option<DeclId> {
        self.node(id).enclosing
    }

    fn has_marker(&self, id: DeclId, marker: &Marker) -> bool {
        find_marker(&self.node(id).attrs, marker).is_some()
    }

    fn simple_name(&self, id: DeclId) -> String {
        self.node(id).name.clone()
    }

    fn qualified_name(&self, id: DeclId) -> String {
        self.node(id).qualified_name.clone()
    }
}

fn visibility_of(vis: &syn::Visibility) -> Visibility {
    match vis {
        syn::Visibility::Public(_) => Visibility::Public,
        syn::Visibility::Restricted(restricted) if restricted.path.is_ident("crate") => {
            Visibility::Crate
        }
        syn::Visibility::Restricted(_) => Visibility::Restricted,
        syn::Visibility::Inherited => Visibility::Private,
    }
}

/// Generated code can only assign to owned places
fn is_assignable(ty: &Type) -> bool {
    match ty {
        Type::Reference(reference) => reference.mutability.is_some(),
        Type::Ptr(ptr) => ptr.mutability.is_some(),
        Type::Paren(paren) => is_assignable(&paren.elem),
        Type::Group(group) => is_assignable(&group.elem),
        _ => true,
    }
}

struct Indexer<'h> {
    host: &'h mut SourceHost,
    path: Vec<String>,
}

impl Indexer<'_> {
    fn qualify(&self, name: &str) -> String {
        let mut segments = self.path.clone();
        segments.push(name.to_string());
        segments.join("::")
    }

    fn push_type(
        &mut self,
        kind: DeclKind,
        ident: &syn::Ident,
        vis: &syn::Visibility,
        attrs: &[Attribute],
        generics: &syn::Generics,
    ) -> DeclId {
        let name = ident.to_string();
        self.host.push(DeclNode {
            kind,
            qualified_name: self.qualify(&name),
            name,
            visibility: visibility_of(vis),
            mutable: true,
            generic: !generics.params.is_empty(),
            enclosing: None,
            attrs: attrs.to_vec(),
            ty: None,
            span: ident.span(),
        })
    }

    /// Index the fields of `owner`; `inherited` overrides field visibility
    /// where the language makes fields as visible as their owner
    fn push_fields(&mut self, owner: DeclId, fields: &Fields, inherited: Option<Visibility>) {
        let owner_name = self.host.node(owner).qualified_name.clone();
        for (index, field) in fields.iter().enumerate() {
            let name = field
                .ident
                .as_ref()
                .map_or_else(|| index.to_string(), ToString::to_string);
            let span = field
                .ident
                .as_ref()
                .map_or_else(|| field.ty.span(), syn::Ident::span);
            self.host.push(DeclNode {
                kind: DeclKind::Field,
                qualified_name: format!("{owner_name}::{name}"),
                name,
                visibility: inherited.unwrap_or_else(|| visibility_of(&field.vis)),
                mutable: is_assignable(&field.ty),
                generic: false,
                enclosing: Some(owner),
                attrs: field.attrs.clone(),
                ty: Some(field.ty.clone()),
                span,
            });
        }
    }
}

impl<'ast> Visit<'ast> for Indexer<'_> {
    // Items nested in function bodies, impls or constants are not reachable
    // by path, so only type items and inline modules are indexed
    fn visit_item(&mut self, i: &'ast Item) {
        match i {
            Item::Struct(item) => self.visit_item_struct(item),
            Item::Enum(item) => self.visit_item_enum(item),
            Item::Union(item) => self.visit_item_union(item),
            Item::Mod(item) => self.visit_item_mod(item),
            _ => {}
        }
    }

    fn visit_item_struct(&mut self, i: &'ast syn::ItemStruct) {
        let id = self.push_type(DeclKind::Struct, &i.ident, &i.vis, &i.attrs, &i.generics);
        self.push_fields(id, &i.fields, None);
    }

    fn visit_item_enum(&mut self, i: &'ast syn::ItemEnum) {
        let id = self.push_type(DeclKind::Enum, &i.ident, &i.vis, &i.attrs, &i.generics);
        let visibility = visibility_of(&i.vis);
        let enum_name = self.host.node(id).qualified_name.clone();
        for variant in &i.variants {
            let name = variant.ident.to_string();
            let variant_id = self.host.push(DeclNode {
                kind: DeclKind::Variant,
                qualified_name: format!("{enum_name}::{name}"),
                name,
                visibility,
                mutable: true,
                generic: false,
                enclosing: Some(id),
                attrs: variant.attrs.clone(),
                ty: None,
                span: variant.ident.span(),
            });
            self.push_fields(variant_id, &variant.fields, Some(visibility));
        }
    }

    fn visit_item_union(&mut self, i: &'ast syn::ItemUnion) {
        let id = self.push_type(DeclKind::Union, &i.ident, &i.vis, &i.attrs, &i.generics);
        self.push_fields(id, &Fields::Named(i.fields.clone()), None);
    }

    fn visit_item_mod(&mut self, i: &'ast syn::ItemMod) {
        if let Some((_, items)) = &i.content {
            self.path.push(i.ident.to_string());
            for item in items {
                self.visit_item(item);
            }
            self.path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    const TABLE: Marker = Marker::new("table");
    const COLUMN: Marker = Marker::new("column");

    #[test]
    fn test_indexes_nested_modules() {
        let host = SourceHost::from_file(
            &parse_quote! {
                #[table]
                pub struct User {
                    #[column]
                    pub id: i64,
                    pub name: String,
                }

                pub mod inner {
                    #[storemap::table]
                    pub(crate) struct Post(#[column] pub i64);
                }
            },
            "crate::models",
        );

        let types = host.find_marked(&TABLE);
        assert_eq!(types.len(), 2);
        assert_eq!(host.qualified_name(types[0]), "crate::models::User");
        assert_eq!(host.qualified_name(types[1]), "crate::models::inner::Post");
        assert_eq!(host.visibility(types[1]), Visibility::Crate);

        let columns = host.find_marked(&COLUMN);
        assert_eq!(columns.len(), 2);
        assert_eq!(host.simple_name(columns[1]), "0");
        assert_eq!(host.enclosing(columns[1]), Some(types[1]));
    }

    #[test]
    fn test_reference_fields_are_immutable() {
        let host = SourceHost::from_file(
            &parse_quote! {
                pub struct Borrowed<'a> {
                    pub shared: &'a str,
                    pub unique: &'a mut String,
                    pub raw: *const u8,
                    pub owned: String,
                }
            },
            "crate",
        );

        let mutable: Vec<bool> = (1..host.len())
            .map(|i| host.is_mutable(DeclId::new(i)))
            .collect();
        assert_eq!(mutable, vec![false, true, false, true]);
    }

    #[test]
    fn test_module_paths_are_relative() {
        let module: ItemMod = parse_quote! {
            mod db {
                #[table]
                pub struct User {}
            }
        };
        let host = SourceHost::from_module(&module);
        let types = host.find_marked(&TABLE);
        assert_eq!(host.qualified_name(types[0]), "self::User");
    }

    #[test]
    fn test_skips_items_inside_functions() {
        let host = SourceHost::from_file(
            &parse_quote! {
                fn helper() {
                    #[table]
                    pub struct Local {}
                }
            },
            "crate",
        );
        assert!(host.find_marked(&TABLE).is_empty());
    }

    #[test]
    fn test_render_unattributed() {
        let host = SourceHost::new();
        let diagnostic = Diagnostic::unattributed(crate::DiagnosticKind::Fault, "sink failed");
        assert_eq!(host.render(&diagnostic), "sink failed");
    }
}
