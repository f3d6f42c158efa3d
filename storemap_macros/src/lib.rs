use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use storemap_codegen::source::SourceHost;
use storemap_codegen::table::{COLUMN, TABLE, TableDomain};
use storemap_codegen::{Diagnostic, MemorySink, Processor};
use syn::visit_mut::VisitMut;
use syn::{Item, ItemMod, parse_macro_input};

use crate::strip::MarkerStripper;

mod strip;

/// Generates storage mappings for every `#[table]` struct in a module.
///
/// For each struct marked `#[table]` this appends to the module:
/// - `{Type}PutResolver` - key query and row for writes
/// - `{Type}GetResolver` - rebuilds the struct from a row
/// - `{Type}DeleteResolver` - key query for deletes
/// - `{Type}TypeMapping` - the three bundled, plus `impl Mapped for {Type}`
///
/// # Attributes
///
/// - `#[table]` / `#[table(name = "users")]` - marks a struct as a table. The
///   name defaults to the snake_case struct name.
/// - `#[column]` / `#[column(name = "mail", key, ignore_null)]` - marks a
///   field as a column. Exactly one column per table is the `key`.
///   `ignore_null` leaves `None` values out of written rows.
///
/// Tables must be `pub` or `pub(crate)`, implement `Default`, and their
/// columns must be `pub` or `pub(crate)` owned values.
///
/// # Examples
///
/// ```ignore
/// use storemap::{Mapped, schema};
///
/// #[schema]
/// mod model {
///     #[table(name = "users")]
///     #[derive(Debug, Default, PartialEq)]
///     pub struct User {
///         #[column(key)]
///         pub id: i64,
///         #[column]
///         pub name: String,
///         #[column(ignore_null)]
///         pub email: Option<String>,
///     }
/// }
///
/// let mapping = model::User::type_mapping();
/// assert_eq!(mapping.put_resolver().table(), "users");
/// ```
///
/// # Errors
///
/// Every problem is reported as its own compile error pointing at the
/// offending declaration. Types with errors get no generated items; the
/// rest of the module is still processed.
#[proc_macro_attribute]
pub fn schema(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(Span::call_site(), "#[schema] takes no arguments")
            .to_compile_error()
            .into();
    }
    let mut module = parse_macro_input!(input as ItemMod);
    if module.content.is_none() {
        return syn::Error::new_spanned(&module, "#[schema] needs an inline module: mod name { ... }")
            .to_compile_error()
            .into();
    }

    let host = SourceHost::from_module(&module);
    let mut artifacts = MemorySink::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    Processor::new(TableDomain).process_round(&host, &mut artifacts, &mut diagnostics);

    MarkerStripper {
        markers: &[TABLE, COLUMN],
    }
    .visit_item_mod_mut(&mut module);

    let mut errors: Vec<syn::Error> = diagnostics.iter().map(|d| host.to_syn_error(d)).collect();
    let mut generated: Vec<Item> = Vec::new();
    for artifact in artifacts.artifacts() {
        match syn::parse_file(&artifact.contents) {
            Ok(file) => generated.extend(file.items),
            Err(e) => errors.push(syn::Error::new(
                Span::call_site(),
                format!("generated {} for {} does not parse: {e}", artifact.name, artifact.type_name),
            )),
        }
    }
    if let Some((_, items)) = &mut module.content {
        items.extend(generated);
    }

    let errors = errors.iter().map(syn::Error::to_compile_error);
    quote! {
        #module
        #(#errors)*
    }
    .into()
}

/// Pass-through form of the `#[table]` marker for structs outside a
/// [`schema`] module, used with `storemap_codegen::build::generate`.
///
/// It removes `#[column]` attributes from the fields so the struct compiles
/// unchanged; the build script reads the markers from the source file.
#[proc_macro_attribute]
pub fn table(_args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item = parse_macro_input!(input as Item);
    MarkerStripper { markers: &[COLUMN] }.visit_item_mut(&mut item);
    quote!(#item).into()
}
