//! # Storemap
//!
//! Compile-time object-to-storage mapping. Mark structs with `#[table]` and
//! their fields with `#[column]`, and storemap generates the code that turns
//! objects into rows and back.
//!
//! ## Features
//!
//! - **Checked at compile time**: private, immutable or misplaced columns,
//!   missing keys and name clashes are compile errors pointing at the
//!   offending declaration
//! - **Isolated failures**: one broken table never keeps the others from
//!   being generated
//! - **Two ways in**: the `#[schema]` module macro, or a build script through
//!   [`codegen::build::generate`]
//!
//! ## Quick Start
//!
//! ```rust
//! use storemap::{Mapped, MemoryStore, schema};
//!
//! #[schema]
//! mod model {
//!     #[table(name = "users")]
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct User {
//!         #[column(key)]
//!         pub id: i64,
//!         #[column]
//!         pub name: String,
//!         #[column(ignore_null)]
//!         pub email: Option<String>,
//!     }
//! }
//!
//! use model::User;
//!
//! let mut store = MemoryStore::new();
//! let ada = User { id: 1, name: "Ada".into(), email: None };
//! store.put(&ada).unwrap();
//!
//! assert_eq!(store.get::<User>(&1i64).unwrap(), Some(ada));
//! assert_eq!(User::type_mapping().put_resolver().table(), "users");
//! ```

extern crate self as storemap;

pub mod error;
pub mod resolver;
pub mod row;
pub mod store;
pub mod value;

pub use error::{RowError, StoreError, StoreResult};
pub use resolver::{DeleteResolver, GetResolver, KeyQuery, Mapped, PutResolver, TypeMapping};
pub use row::Row;
pub use store::MemoryStore;
pub use value::{FromValue, Key, ToValue, Value};

pub use storemap_macros::{schema, table};

/// The code generation pipeline, for build scripts
pub use storemap_codegen as codegen;
