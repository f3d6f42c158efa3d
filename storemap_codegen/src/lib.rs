//! # Storemap Codegen
//!
//! The pipeline behind `storemap`: finds declarations carrying a type marker
//! and fields carrying a column marker, validates them, extracts a metadata
//! model, checks cross-column invariants and generates four artifacts per
//! valid type.
//!
//! ## Stages
//!
//! 1. **Discovery & extraction** ([`extract`]): one query per marker, each
//!    declaration validated ([`validate`]) and extracted independently.
//! 2. **Aggregate validation**: the [`MappingDomain`] checks invariants that
//!    span several declarations.
//! 3. **Generation** ([`generate`]): four generators per type, all or nothing.
//!
//! [`Processor`] drives the stages and reports every failure as an
//! attributable [`Diagnostic`] instead of stopping at the first one.
//!
//! ## Hosts and domains
//!
//! The pipeline talks to the host toolchain only through
//! [`DeclarationHost`]. [`source::SourceHost`] implements it over `syn`
//! syntax trees, and [`table::TableDomain`] is the table mapping domain used
//! by the `#[storemap::schema]` macro and by [`build::generate`].
//!
//! ```
//! use storemap_codegen::{MemorySink, Processor, source::SourceHost, table::TableDomain};
//!
//! let file: syn::File = syn::parse_quote! {
//!     #[table(name = "users")]
//!     #[derive(Default)]
//!     pub struct User {
//!         #[column(key)]
//!         pub id: i64,
//!         #[column]
//!         pub name: String,
//!     }
//! };
//! let host = SourceHost::from_file(&file, "crate");
//!
//! let mut artifacts = MemorySink::new();
//! let mut diagnostics = Vec::new();
//! let report = Processor::new(TableDomain).process_round(&host, &mut artifacts, &mut diagnostics);
//!
//! assert!(report.is_clean());
//! assert_eq!(artifacts.len(), 4);
//! ```

pub mod build;
pub mod config;
pub mod declaration;
pub mod diagnostic;
pub mod domain;
pub mod error;
pub mod extract;
pub mod generate;
pub mod meta;
pub mod processor;
pub mod sink;
pub mod source;
pub mod table;
pub mod validate;

pub use declaration::{DeclId, DeclKind, DeclarationHost, Marker, Visibility};
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, Diagnostics};
pub use domain::MappingDomain;
pub use error::{CodegenError, CodegenResult};
pub use generate::{Artifact, ArtifactRole, GenerateError, Generator, GeneratorSet};
pub use meta::{ColumnMeta, ProcessingResult, ProcessingResultBuilder, TypeMeta};
pub use processor::{Processor, RoundReport, RoundState};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};
