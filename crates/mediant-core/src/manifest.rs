//! The TOML resolution manifest: a project coordinate, its direct
//! dependencies in declaration order, dependency management and settings.

use std::path::Path;

use mediant_util::errors::MediantError;
use serde::{Deserialize, Serialize};

use crate::config::ResolutionSettings;
use crate::coordinate::{ArtifactCoordinate, ConflictId};
use crate::dependency::{DependencyEdge, Exclusion, ManagedVersion, ManagedVersions, Scope};

/// The parsed representation of a resolution manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionManifest {
    pub project: ProjectSection,

    /// Direct dependencies. An array of tables keeps declaration order,
    /// which decides ties between equally near candidates.
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,

    #[serde(default, rename = "dependency-management")]
    pub dependency_management: Vec<ManagedSpec>,

    #[serde(default)]
    pub resolution: ResolutionSettings,
}

/// `[project]`: the artifact being resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSection {
    pub coordinate: String,
}

/// One declared dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySpec {
    pub coordinate: String,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub exclusions: Vec<Exclusion>,
}

impl DependencySpec {
    /// Turn this declaration into an edge leaving `from`.
    pub fn to_edge(&self, from: &ArtifactCoordinate) -> Result<DependencyEdge, MediantError> {
        Ok(DependencyEdge {
            from: from.clone(),
            to: ArtifactCoordinate::parse(&self.coordinate)?,
            scope: self.scope,
            optional: self.optional,
            exclusions: self.exclusions.clone(),
        })
    }
}

/// One `[[dependency-management]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedSpec {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scope: Option<Scope>,
}

impl ResolutionManifest {
    /// Load a manifest from disk.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MediantError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    /// Parse a manifest from a string.
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            MediantError::Manifest {
                message: format!("Failed to parse resolution manifest: {e}"),
            }
            .into()
        })
    }

    pub fn project_coordinate(&self) -> Result<ArtifactCoordinate, MediantError> {
        ArtifactCoordinate::parse(&self.project.coordinate)
    }

    /// The direct dependencies as edges leaving the project, in declaration order.
    pub fn roots(&self) -> Result<Vec<DependencyEdge>, MediantError> {
        let project = self.project_coordinate()?;
        self.dependencies
            .iter()
            .map(|spec| spec.to_edge(&project))
            .collect()
    }

    /// The dependency-management table. The first entry for an identity wins.
    pub fn managed_versions(&self) -> Result<ManagedVersions, MediantError> {
        let mut managed = ManagedVersions::new();
        for spec in &self.dependency_management {
            let id = ConflictId::parse(&spec.id)?;
            if managed.contains_key(&id) {
                tracing::warn!("ignoring duplicate dependency-management entry for {id}");
                continue;
            }
            managed.insert(
                id,
                ManagedVersion {
                    version: spec.version.clone(),
                    scope: spec.scope,
                },
            );
        }
        Ok(managed)
    }
}
