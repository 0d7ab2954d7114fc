//! The metadata source the engine reads the dependency graph from.
//!
//! Retrieving descriptors over the network or from a local repository is the
//! caller's business; the engine only needs the two queries of
//! [`MetadataSource`]. [`MemorySource`] answers them from a table built in
//! code or loaded from a TOML fixture.

use std::collections::BTreeMap;
use std::path::Path;

use mediant_core::coordinate::{ArtifactCoordinate, ConflictId};
use mediant_core::dependency::DependencyEdge;
use mediant_core::manifest::DependencySpec;
use mediant_util::errors::{MediantError, MediantResult};
use serde::Deserialize;

use crate::version::MavenVersion;

/// Answers the questions the graph builder asks about artifacts.
pub trait MetadataSource {
    /// The dependencies `coordinate` declares, in declaration order.
    ///
    /// Fails with [`MediantError::MetadataUnavailable`] when the artifact
    /// cannot be described.
    fn direct_dependencies(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Vec<DependencyEdge>, MediantError>;

    /// Every published version of an identity. May be empty.
    fn available_versions(&self, id: &ConflictId) -> Result<Vec<MavenVersion>, MediantError>;
}

/// An in-memory [`MetadataSource`].
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    artifacts: BTreeMap<String, Vec<DependencyEdge>>,
    versions: BTreeMap<ConflictId, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    artifact: Vec<FixtureArtifact>,
    #[serde(default)]
    available: Vec<FixtureVersions>,
}

#[derive(Debug, Deserialize)]
struct FixtureArtifact {
    coordinate: String,
    #[serde(default)]
    dependencies: Vec<DependencySpec>,
}

#[derive(Debug, Deserialize)]
struct FixtureVersions {
    id: String,
    versions: Vec<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an artifact and the edges it declares. Registering the same
    /// coordinate twice replaces its edges.
    pub fn add(&mut self, coordinate: ArtifactCoordinate, edges: Vec<DependencyEdge>) -> &mut Self {
        self.record_version(coordinate.conflict_id(), &coordinate.version);
        self.artifacts.insert(coordinate.to_string(), edges);
        self
    }

    /// Register `coordinate` with dependencies given as coordinate text, all
    /// compile-scoped.
    pub fn add_text(&mut self, coordinate: &str, dependencies: &[&str]) -> Result<&mut Self, MediantError> {
        let from = ArtifactCoordinate::parse(coordinate)?;
        let edges = dependencies
            .iter()
            .map(|to| Ok(DependencyEdge::new(from.clone(), ArtifactCoordinate::parse(to)?)))
            .collect::<Result<Vec<_>, MediantError>>()?;
        Ok(self.add(from, edges))
    }

    /// Publish versions of an identity without describing their metadata.
    pub fn add_versions(&mut self, id: ConflictId, versions: &[&str]) -> &mut Self {
        for version in versions {
            self.record_version(id.clone(), version);
        }
        self
    }

    /// Load a fixture:
    ///
    /// ```toml
    /// [[artifact]]
    /// coordinate = "org.a:a:1.0"
    ///
    /// [[artifact.dependencies]]
    /// coordinate = "org.c:c:[1.0,2.0)"
    /// scope = "runtime"
    ///
    /// [[available]]
    /// id = "org.c:c"
    /// versions = ["1.0", "1.5"]
    /// ```
    pub fn from_toml(content: &str) -> MediantResult<Self> {
        let fixture: Fixture = toml::from_str(content).map_err(|e| MediantError::Manifest {
            message: format!("Failed to parse metadata fixture: {e}"),
        })?;

        let mut source = Self::new();
        for artifact in &fixture.artifact {
            let from = ArtifactCoordinate::parse(&artifact.coordinate)?;
            let edges = artifact
                .dependencies
                .iter()
                .map(|spec| spec.to_edge(&from))
                .collect::<Result<Vec<_>, _>>()?;
            source.add(from, edges);
        }
        for available in &fixture.available {
            let id = ConflictId::parse(&available.id)?;
            for version in &available.versions {
                source.record_version(id.clone(), version);
            }
        }
        Ok(source)
    }

    /// Load a fixture from disk.
    pub fn from_path(path: &Path) -> MediantResult<Self> {
        let content = std::fs::read_to_string(path).map_err(MediantError::Io)?;
        Self::from_toml(&content)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    fn record_version(&mut self, id: ConflictId, version: &str) {
        let known = self.versions.entry(id).or_default();
        if !known.iter().any(|v| v == version) {
            known.push(version.to_string());
        }
    }
}

impl MetadataSource for MemorySource {
    fn direct_dependencies(
        &self,
        coordinate: &ArtifactCoordinate,
    ) -> Result<Vec<DependencyEdge>, MediantError> {
        self.artifacts
            .get(&coordinate.to_string())
            .cloned()
            .ok_or_else(|| MediantError::MetadataUnavailable {
                coordinate: coordinate.to_string(),
                message: "artifact is not registered".to_string(),
            })
    }

    fn available_versions(&self, id: &ConflictId) -> Result<Vec<MavenVersion>, MediantError> {
        let mut versions: Vec<MavenVersion> = self
            .versions
            .get(id)
            .map(|known| known.iter().map(|v| MavenVersion::parse(v)).collect())
            .unwrap_or_default();
        versions.sort();
        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediant_core::dependency::Scope;

    #[test]
    fn registered_artifacts_answer_queries() {
        let mut source = MemorySource::new();
        source.add_text("g:a:1.0", &["g:b:2.0"]).unwrap();
        source.add_text("g:b:2.0", &[]).unwrap();

        let edges = source
            .direct_dependencies(&ArtifactCoordinate::parse("g:a:1.0").unwrap())
            .unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to.to_string(), "g:b:2.0");
        assert_eq!(edges[0].scope, Scope::Compile);
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn unknown_artifact_is_unavailable() {
        let source = MemorySource::new();
        let err = source
            .direct_dependencies(&ArtifactCoordinate::parse("g:missing:1.0").unwrap())
            .unwrap_err();
        assert!(matches!(err, MediantError::MetadataUnavailable { .. }));
        assert!(err.to_string().contains("g:missing:1.0"));
    }

    #[test]
    fn available_versions_are_sorted() {
        let mut source = MemorySource::new();
        let id = ConflictId::parse("g:c").unwrap();
        source.add_text("g:c:2.0", &[]).unwrap();
        source.add_versions(id.clone(), &["1.10", "1.9", "2.0"]);

        let versions: Vec<String> = source
            .available_versions(&id)
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(versions, ["1.9", "1.10", "2.0"]);
        assert!(source
            .available_versions(&ConflictId::parse("g:none").unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn fixture_keeps_scopes_and_exclusions() {
        let source = MemorySource::from_toml(
            r#"
[[artifact]]
coordinate = "g:a:1.0"

[[artifact.dependencies]]
coordinate = "g:b:[1.0,2.0)"
scope = "runtime"
optional = true
exclusions = [{ group = "g", artifact = "x" }]

[[available]]
id = "g:b"
versions = ["1.0", "1.5"]
"#,
        )
        .unwrap();

        let edges = source
            .direct_dependencies(&ArtifactCoordinate::parse("g:a:1.0").unwrap())
            .unwrap();
        assert_eq!(edges[0].scope, Scope::Runtime);
        assert!(edges[0].optional);
        assert_eq!(edges[0].exclusions.len(), 1);
        assert_eq!(edges[0].from.to_string(), "g:a:1.0");

        let versions = source
            .available_versions(&ConflictId::parse("g:b").unwrap())
            .unwrap();
        assert_eq!(versions.len(), 2);
    }

    #[test]
    fn bad_fixture_is_a_manifest_error() {
        let err = MemorySource::from_toml("[[artifact]]\ncoordinate = 3").unwrap_err();
        assert!(err.to_string().contains("Failed to parse metadata fixture"));
    }
}
