//! Artifact generators and their dispatch
//!
//! A mapping domain supplies exactly four generators, one per
//! [`ArtifactRole`]. [`GeneratorSet::generate_all`] runs them against one
//! validated [`TypeMeta`] and returns either all four artifacts or the first
//! failure, so a type never ends up with a partial set of outputs.

use std::fmt;

use strum::IntoEnumIterator;
use thiserror::Error;

use crate::declaration::DeclId;
use crate::meta::TypeMeta;

/// The four derived artifacts produced per type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
    strum::AsRefStr, serde::Serialize, serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ArtifactRole {
    PutResolver,
    GetResolver,
    DeleteResolver,
    Mapping,
}

/// One generated unit of source for one role of one type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    pub role: ArtifactRole,
    /// Qualified name of the type the artifact was generated for
    pub type_name: String,
    /// Name of the main generated item (`UserPutResolver`)
    pub name: String,
    pub contents: String,
}

impl Artifact {
    pub fn new(
        role: ArtifactRole,
        type_name: impl Into<String>,
        name: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            role,
            type_name: type_name.into(),
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// File the artifact is written to by file-based sinks
    pub fn file_name(&self) -> String {
        format!("{}.rs", heck::AsSnakeCase(&self.name))
    }
}

/// A generator could not produce its artifact
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GenerateError {
    /// Most specific declaration involved, when the generator knows one
    pub declaration: Option<DeclId>,
    pub message: String,
}

impl GenerateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            declaration: None,
            message: message.into(),
        }
    }

    pub fn at(declaration: DeclId, message: impl Into<String>) -> Self {
        Self {
            declaration: Some(declaration),
            message: message.into(),
        }
    }
}

/// Stateless producer of one artifact role.
///
/// Implementations must be deterministic: identical metadata yields a
/// byte-identical artifact.
pub trait Generator<T, C> {
    fn generate(&self, meta: &TypeMeta<T, C>) -> Result<Artifact, GenerateError>;
}

impl<T, C, F> Generator<T, C> for F
where
    F: Fn(&TypeMeta<T, C>) -> Result<Artifact, GenerateError>,
{
    fn generate(&self, meta: &TypeMeta<T, C>) -> Result<Artifact, GenerateError> {
        self(meta)
    }
}

/// Exactly one generator per artifact role
pub struct GeneratorSet<T, C> {
    put_resolver: Box<dyn Generator<T, C>>,
    get_resolver: Box<dyn Generator<T, C>>,
    delete_resolver: Box<dyn Generator<T, C>>,
    mapping: Box<dyn Generator<T, C>>,
}

impl<T, C> GeneratorSet<T, C> {
    pub fn new(
        put_resolver: impl Generator<T, C> + 'static,
        get_resolver: impl Generator<T, C> + 'static,
        delete_resolver: impl Generator<T, C> + 'static,
        mapping: impl Generator<T, C> + 'static,
    ) -> Self {
        Self {
            put_resolver: Box::new(put_resolver),
            get_resolver: Box::new(get_resolver),
            delete_resolver: Box::new(delete_resolver),
            mapping: Box::new(mapping),
        }
    }

    pub fn generator(&self, role: ArtifactRole) -> &dyn Generator<T, C> {
        match role {
            ArtifactRole::PutResolver => self.put_resolver.as_ref(),
            ArtifactRole::GetResolver => self.get_resolver.as_ref(),
            ArtifactRole::DeleteResolver => self.delete_resolver.as_ref(),
            ArtifactRole::Mapping => self.mapping.as_ref(),
        }
    }

    /// Run every generator in role order against `meta`.
    ///
    /// An artifact reporting a different role than the slot it came from is
    /// treated as a generator failure.
    pub fn generate_all(&self, meta: &TypeMeta<T, C>) -> Result<Vec<Artifact>, GenerateError> {
        ArtifactRole::iter()
            .map(|role| {
                let artifact = self.generator(role).generate(meta)?;
                if artifact.role != role {
                    return Err(GenerateError::new(format!(
                        "{} generator produced a {} artifact for {}",
                        role, artifact.role, meta.qualified_name
                    )));
                }
                Ok(artifact)
            })
            .collect()
    }
}

impl<T, C> fmt::Debug for GeneratorSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorSet")
            .field("roles", &ArtifactRole::iter().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Meta = TypeMeta<(), ()>;

    fn named(role: ArtifactRole) -> impl Fn(&Meta) -> Result<Artifact, GenerateError> {
        move |meta: &Meta| {
            Ok(Artifact::new(
                role,
                &meta.qualified_name,
                format!("{}{}", meta.simple_name(), heck::AsPascalCase(role.as_ref())),
                format!("// {role}"),
            ))
        }
    }

    fn set() -> GeneratorSet<(), ()> {
        GeneratorSet::new(
            named(ArtifactRole::PutResolver),
            named(ArtifactRole::GetResolver),
            named(ArtifactRole::DeleteResolver),
            named(ArtifactRole::Mapping),
        )
    }

    #[test]
    fn test_generate_all_in_role_order() {
        let meta = Meta::new(DeclId::new(0), "self::User", ());
        let artifacts = set().generate_all(&meta).unwrap();
        let names: Vec<_> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            ["UserPutResolver", "UserGetResolver", "UserDeleteResolver", "UserMapping"]
        );
        assert_eq!(artifacts[0].file_name(), "user_put_resolver.rs");
    }

    #[test]
    fn test_role_mismatch_is_an_error() {
        let generators = GeneratorSet::new(
            named(ArtifactRole::PutResolver),
            named(ArtifactRole::PutResolver),
            named(ArtifactRole::DeleteResolver),
            named(ArtifactRole::Mapping),
        );
        let meta = Meta::new(DeclId::new(0), "User", ());
        let err = generators.generate_all(&meta).unwrap_err();
        assert_eq!(
            err.message,
            "get_resolver generator produced a put_resolver artifact for User"
        );
    }
}
