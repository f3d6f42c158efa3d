//! Destinations for generated artifacts

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CodegenError, CodegenResult};
use crate::generate::{Artifact, ArtifactRole};

/// One-way sink accepting generated artifacts
pub trait ArtifactSink {
    fn write(&mut self, artifact: Artifact) -> CodegenResult<()>;
}

/// Keeps artifacts in memory, keyed by type and role
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    artifacts: BTreeMap<(String, ArtifactRole), Artifact>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, type_name: &str, role: ArtifactRole) -> Option<&Artifact> {
        self.artifacts.get(&(type_name.to_string(), role))
    }

    /// All artifacts generated for `type_name`, in role order
    pub fn for_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Artifact> + 'a {
        self.artifacts
            .values()
            .filter(move |artifact| artifact.type_name == type_name)
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts.into_values().collect()
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, artifact: Artifact) -> CodegenResult<()> {
        let key = (artifact.type_name.clone(), artifact.role);
        if self.artifacts.contains_key(&key) {
            return Err(CodegenError::Sink(format!(
                "{} artifact for {} was already written",
                artifact.role, artifact.type_name
            )));
        }
        self.artifacts.insert(key, artifact);
        Ok(())
    }
}

/// Writes each artifact to its own file in a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create the sink, creating `dir` if it does not exist yet
    pub fn new(dir: impl Into<PathBuf>) -> CodegenResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| CodegenError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in write order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for DirectorySink {
    fn write(&mut self, artifact: Artifact) -> CodegenResult<()> {
        let path = self.dir.join(artifact.file_name());
        fs::write(&path, artifact.contents.as_bytes()).map_err(|source| CodegenError::Io {
            path: path.clone(),
            source,
        })?;
        log::trace!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(role: ArtifactRole) -> Artifact {
        Artifact::new(role, "crate::User", format!("User{role}"), "struct A;")
    }

    #[test]
    fn test_memory_sink_rejects_duplicates() {
        let mut sink = MemorySink::new();
        sink.write(artifact(ArtifactRole::Mapping)).unwrap();
        assert!(matches!(
            sink.write(artifact(ArtifactRole::Mapping)),
            Err(CodegenError::Sink(_))
        ));
        assert_eq!(sink.for_type("crate::User").count(), 1);
    }

    #[test]
    fn test_directory_sink_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("generated")).unwrap();
        sink.write(Artifact::new(
            ArtifactRole::PutResolver,
            "crate::User",
            "UserPutResolver",
            "pub struct UserPutResolver;",
        ))
        .unwrap();

        let path = dir.path().join("generated").join("user_put_resolver.rs");
        assert_eq!(sink.written(), &[path.clone()]);
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "pub struct UserPutResolver;"
        );
    }
}
