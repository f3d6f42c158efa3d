use std::path::PathBuf;

use thiserror::Error;

pub type CodegenResult<T> = Result<T, CodegenError>;

/// Failures outside the per-declaration diagnostic model
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },
    #[error("invalid codegen configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] toml::ser::Error),
    #[error("artifact sink failed: {0}")]
    Sink(String),
    #[error("code generation reported {0} diagnostic(s)")]
    Diagnostics(usize),
}
