//! Build-script entry point.
//!
//! ```ignore
//! // build.rs
//! use storemap_codegen::config::{CodegenConfig, SourceFile};
//!
//! fn main() {
//!     let config = CodegenConfig::builder()
//!         .sources(vec![SourceFile::new("src/models.rs", "crate::models")])
//!         .out_dir(std::env::var("OUT_DIR").unwrap())
//!         .build()
//!         .with_base_dir(env!("CARGO_MANIFEST_DIR"));
//!     storemap_codegen::build::generate(&config).unwrap();
//! }
//!
//! // src/lib.rs
//! include!(concat!(env!("OUT_DIR"), "/storemap_generated.rs"));
//! ```
//!
//! The sources must still compile on their own, so marked structs outside a
//! `#[storemap::schema]` module use the `#[storemap::table]` pass-through
//! attribute.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::config::CodegenConfig;
use crate::diagnostic::Diagnostic;
use crate::error::{CodegenError, CodegenResult};
use crate::generate::{Artifact, ArtifactRole};
use crate::processor::{Processor, RoundReport};
use crate::sink::{ArtifactSink, DirectorySink};
use crate::source::SourceHost;
use crate::table::TableDomain;

#[derive(Debug, Serialize)]
struct Manifest {
    discovered: usize,
    excluded: usize,
    diagnostics: Vec<String>,
    artifacts: Vec<ManifestArtifact>,
}

#[derive(Debug, Clone, Serialize)]
struct ManifestArtifact {
    type_name: String,
    role: ArtifactRole,
    name: String,
    file: String,
}

/// Forwards to a [`DirectorySink`] and remembers what went where
struct RecordingSink {
    inner: DirectorySink,
    recorded: Vec<ManifestArtifact>,
}

impl ArtifactSink for RecordingSink {
    fn write(&mut self, artifact: Artifact) -> CodegenResult<()> {
        let entry = ManifestArtifact {
            type_name: artifact.type_name.clone(),
            role: artifact.role,
            name: artifact.name.clone(),
            file: self.inner.dir().join(artifact.file_name()).display().to_string(),
        };
        self.inner.write(artifact)?;
        self.recorded.push(entry);
        Ok(())
    }
}

fn read_source(path: &Path) -> CodegenResult<syn::File> {
    let text = fs::read_to_string(path).map_err(|source| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    syn::parse_file(&text).map_err(|source| CodegenError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> CodegenResult<()> {
    fs::write(path, contents).map_err(|source| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Run one round over the configured sources and write its output.
///
/// Every diagnostic is printed as a `cargo:warning=` line. With
/// `fail_on_error` set, any diagnostic turns into
/// [`CodegenError::Diagnostics`] once the index and manifest are written.
pub fn generate(config: &CodegenConfig) -> CodegenResult<RoundReport> {
    let mut host = SourceHost::new();
    for source in &config.sources {
        println!("cargo:rerun-if-changed={}", source.path.display());
        let file = read_source(&source.path)?;
        host.add_file(&file, &source.module_path);
        log::debug!("indexed {} as {}", source.path.display(), source.module_path);
    }

    let mut sink = RecordingSink {
        inner: DirectorySink::new(&config.out_dir)?,
        recorded: Vec::new(),
    };
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = Processor::new(TableDomain).process_round(&host, &mut sink, &mut diagnostics);

    let rendered: Vec<String> = diagnostics.iter().map(|d| host.render(d)).collect();
    for line in &rendered {
        log::error!("{line}");
        println!("cargo:warning={line}");
    }

    // a sink failure can leave a type half written; only complete types are indexed
    let artifacts: Vec<ManifestArtifact> = sink
        .recorded
        .into_iter()
        .filter(|entry| report.generated.contains(&entry.type_name))
        .collect();

    let mut index = String::from("// @generated by storemap_codegen\n");
    for entry in &artifacts {
        index.push_str(&format!("include!({:?});\n", entry.file));
    }
    write_file(&config.index_path(), &index)?;

    if config.manifest {
        let manifest = Manifest {
            discovered: report.discovered,
            excluded: report.excluded.len(),
            diagnostics: rendered,
            artifacts,
        };
        write_file(&config.manifest_path(), &toml::to_string_pretty(&manifest)?)?;
    }

    log::debug!(
        "generated {} artifact(s) into {}",
        report.artifacts_written,
        config.out_dir.display()
    );
    if config.fail_on_error && !report.is_clean() {
        return Err(CodegenError::Diagnostics(report.diagnostics));
    }
    Ok(report)
}
