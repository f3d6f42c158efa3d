//! Build-script configuration.
//!
//! [`CodegenConfig`] is assembled with `typed-builder` in a `build.rs`, or
//! loaded from a TOML file checked into the crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{CodegenError, CodegenResult};

/// File name of the generated index when none is configured
pub const DEFAULT_INDEX_FILE: &str = "storemap_generated.rs";

/// One Rust source file to scan for marked declarations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path of the file, usually relative to `CARGO_MANIFEST_DIR`
    pub path: PathBuf,

    /// Module the file's items live in (`crate`, `crate::models`)
    #[serde(default = "default_module_path")]
    pub module_path: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, module_path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            module_path: module_path.into(),
        }
    }
}

fn default_module_path() -> String {
    "crate".to_string()
}

fn default_index_file() -> String {
    DEFAULT_INDEX_FILE.to_string()
}

fn default_true() -> bool {
    true
}

/// Configuration for [`build::generate`](crate::build::generate).
///
/// # Examples
///
/// ```
/// use storemap_codegen::config::{CodegenConfig, SourceFile};
///
/// let config = CodegenConfig::builder()
///     .sources(vec![SourceFile::new("src/models.rs", "crate::models")])
///     .out_dir("target/generated")
///     .build();
///
/// assert_eq!(config.index_file, "storemap_generated.rs");
/// assert!(config.fail_on_error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
#[builder(doc)]
pub struct CodegenConfig {
    /// Files scanned in one round, in order
    pub sources: Vec<SourceFile>,

    /// Directory artifacts, the index and the manifest are written to
    #[builder(setter(into))]
    pub out_dir: PathBuf,

    /// File name of the index that `include!`s every artifact
    #[builder(default = default_index_file(), setter(into))]
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Whether to write `storemap_manifest.toml` next to the index
    #[builder(default = true)]
    #[serde(default = "default_true")]
    pub manifest: bool,

    /// Whether any diagnostic fails the build
    #[builder(default = true)]
    #[serde(default = "default_true")]
    pub fail_on_error: bool,
}

impl CodegenConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> CodegenResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML configuration file
    pub fn from_toml_file(path: impl AsRef<Path>) -> CodegenResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CodegenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve relative source paths against `base` (the manifest directory)
    pub fn with_base_dir(mut self, base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        for source in &mut self.sources {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
        self
    }

    pub fn index_path(&self) -> PathBuf {
        self.out_dir.join(&self.index_file)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.out_dir.join("storemap_manifest.toml")
    }
}
