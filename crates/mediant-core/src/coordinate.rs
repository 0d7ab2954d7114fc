use std::fmt;

use mediant_util::errors::MediantError;
use serde::{Deserialize, Serialize};

/// Packaging type assumed when a coordinate does not name one.
pub const DEFAULT_TYPE: &str = "jar";

/// An artifact coordinate: `group:artifact[:type[:classifier]]:version`.
///
/// The version field holds the declared text, which may be a plain version or
/// a range; the resolver parses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default = "default_type", rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub classifier: Option<String>,
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

impl ArtifactCoordinate {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            type_: default_type(),
            classifier: None,
        }
    }

    /// Parse `group:artifact:version`, `group:artifact:type:version` or
    /// `group:artifact:type:classifier:version`.
    pub fn parse(s: &str) -> Result<Self, MediantError> {
        let parts: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid(s, "empty coordinate segment"));
        }
        match parts.as_slice() {
            [g, a, v] => Ok(Self::new(g, a, v)),
            [g, a, t, v] => Ok(Self {
                type_: t.to_string(),
                ..Self::new(g, a, v)
            }),
            [g, a, t, c, v] => Ok(Self {
                type_: t.to_string(),
                classifier: Some(c.to_string()),
                ..Self::new(g, a, v)
            }),
            _ => Err(invalid(
                s,
                "expected group:artifact[:type[:classifier]]:version",
            )),
        }
    }

    /// The version-less key shared by every coordinate that competes with
    /// this one during mediation.
    pub fn conflict_id(&self) -> ConflictId {
        ConflictId {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            type_: self.type_.clone(),
            classifier: self.classifier.clone(),
        }
    }

    /// The same coordinate carrying a different version text.
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        match &self.classifier {
            Some(c) => write!(f, ":{}:{c}", self.type_)?,
            None if self.type_ != DEFAULT_TYPE => write!(f, ":{}", self.type_)?,
            None => {}
        }
        write!(f, ":{}", self.version)
    }
}

/// Conflict identity: `group:artifact:type[:classifier]`, version excluded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConflictId {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub classifier: Option<String>,
}

impl ConflictId {
    /// Parse `group:artifact`, `group:artifact:type` or
    /// `group:artifact:type:classifier`.
    pub fn parse(s: &str) -> Result<Self, MediantError> {
        let parts: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid(s, "empty identity segment"));
        }
        let (group, artifact, type_, classifier) = match parts.as_slice() {
            [g, a] => (g, a, DEFAULT_TYPE, None),
            [g, a, t] => (g, a, *t, None),
            [g, a, t, c] => (g, a, *t, Some(c.to_string())),
            _ => {
                return Err(invalid(
                    s,
                    "expected group:artifact[:type[:classifier]]",
                ))
            }
        };
        Ok(Self {
            group_id: group.to_string(),
            artifact_id: artifact.to_string(),
            type_: type_.to_string(),
            classifier,
        })
    }

    /// `group:artifact` without type or classifier.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.type_)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        Ok(())
    }
}

fn invalid(input: &str, reason: &str) -> MediantError {
    MediantError::Manifest {
        message: format!("invalid coordinate '{input}': {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_id_ignores_version() {
        let a = ArtifactCoordinate::parse("org.example:lib:1.0").unwrap();
        let b = ArtifactCoordinate::parse("org.example:lib:[2.0,3.0)").unwrap();
        assert_eq!(a.conflict_id(), b.conflict_id());
    }

    #[test]
    fn classifier_changes_identity() {
        let a = ArtifactCoordinate::parse("org.example:lib:1.0").unwrap();
        let b = ArtifactCoordinate::parse("org.example:lib:jar:sources:1.0").unwrap();
        assert_ne!(a.conflict_id(), b.conflict_id());
    }

    #[test]
    fn display_omits_default_type() {
        let c = ArtifactCoordinate::parse("org.example:lib:jar:1.0").unwrap();
        assert_eq!(c.to_string(), "org.example:lib:1.0");
        let c = ArtifactCoordinate::parse("org.example:lib:pom:1.0").unwrap();
        assert_eq!(c.to_string(), "org.example:lib:pom:1.0");
    }
}
