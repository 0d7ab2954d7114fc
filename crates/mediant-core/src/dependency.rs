use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use mediant_util::errors::MediantError;
use serde::{Deserialize, Serialize};

use crate::coordinate::{ArtifactCoordinate, ConflictId};

/// Maven-compatible dependency scope.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Provided,
    Runtime,
    System,
    Test,
}

impl Scope {
    pub const ALL: [Scope; 5] = [
        Scope::Compile,
        Scope::Provided,
        Scope::Runtime,
        Scope::System,
        Scope::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::System => "system",
            Scope::Test => "test",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = MediantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MediantError::Manifest {
                message: format!("unknown scope '{s}'"),
            })
    }
}

/// The classpath a resolution is computed for. Decides which scopes survive
/// a scope filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classpath {
    Compile,
    Runtime,
    Test,
}

impl Classpath {
    pub fn includes(&self, scope: Scope) -> bool {
        match self {
            Classpath::Compile => {
                matches!(scope, Scope::Compile | Scope::Provided | Scope::System)
            }
            Classpath::Runtime => matches!(scope, Scope::Compile | Scope::Runtime),
            Classpath::Test => true,
        }
    }
}

/// A transitive dependency to exclude. `*` matches any group or artifact;
/// a missing artifact excludes the whole group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Exclusion {
    pub group: String,
    #[serde(default)]
    pub artifact: Option<String>,
}

impl Exclusion {
    pub fn new(group: &str, artifact: Option<&str>) -> Self {
        Self {
            group: group.to_string(),
            artifact: artifact.map(str::to_string),
        }
    }

    pub fn matches(&self, id: &ConflictId) -> bool {
        let group_matches = self.group == "*" || self.group == id.group_id;
        let artifact_matches = match self.artifact.as_deref() {
            None | Some("*") => true,
            Some(a) => a == id.artifact_id,
        };
        group_matches && artifact_matches
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.group,
            self.artifact.as_deref().unwrap_or("*")
        )
    }
}

/// A declared dependency from one artifact to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEdge {
    pub from: ArtifactCoordinate,
    pub to: ArtifactCoordinate,
    pub scope: Scope,
    pub optional: bool,
    pub exclusions: Vec<Exclusion>,
}

impl DependencyEdge {
    /// A compile-scoped, non-optional edge without exclusions.
    pub fn new(from: ArtifactCoordinate, to: ArtifactCoordinate) -> Self {
        Self {
            from,
            to,
            scope: Scope::Compile,
            optional: false,
            exclusions: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusions.push(exclusion);
        self
    }
}

/// A dependency-management entry forcing version and/or scope for every
/// node of one conflict identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedVersion {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scope: Option<Scope>,
}

impl ManagedVersion {
    pub fn version(version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// Managed-version table keyed by conflict identity.
pub type ManagedVersions = BTreeMap<ConflictId, ManagedVersion>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parse_is_case_insensitive() {
        assert_eq!("Runtime".parse::<Scope>().unwrap(), Scope::Runtime);
        assert!("import".parse::<Scope>().is_err());
    }

    #[test]
    fn wildcard_exclusion() {
        let id = ConflictId::parse("org.x:y").unwrap();
        assert!(Exclusion::new("*", Some("*")).matches(&id));
        assert!(Exclusion::new("org.x", None).matches(&id));
        assert!(!Exclusion::new("org.x", Some("z")).matches(&id));
    }
}
