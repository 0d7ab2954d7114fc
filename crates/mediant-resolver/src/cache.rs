//! Per-run memoisation of metadata queries.
//!
//! A resolution asks for the same artifact's dependencies or the same
//! identity's versions more than once (ranges are enumerated both when a node
//! is expanded and when its version is settled). The session answers repeats
//! from memory so a slow source is queried at most once per key.

use std::collections::HashMap;

use mediant_core::coordinate::{ArtifactCoordinate, ConflictId};
use mediant_core::dependency::DependencyEdge;
use mediant_util::errors::MediantResult;
use tracing::trace;

use crate::source::MetadataSource;
use crate::version::MavenVersion;

pub struct MetadataSession<'a, S: MetadataSource + ?Sized> {
    source: &'a S,
    dependencies: HashMap<String, Vec<DependencyEdge>>,
    versions: HashMap<ConflictId, Vec<MavenVersion>>,
    queries: usize,
}

impl<'a, S: MetadataSource + ?Sized> MetadataSession<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            dependencies: HashMap::new(),
            versions: HashMap::new(),
            queries: 0,
        }
    }

    pub fn direct_dependencies(
        &mut self,
        coordinate: &ArtifactCoordinate,
    ) -> MediantResult<Vec<DependencyEdge>> {
        let key = coordinate.to_string();
        if let Some(edges) = self.dependencies.get(&key) {
            return Ok(edges.clone());
        }
        trace!("querying dependencies of {key}");
        self.queries += 1;
        let edges = self.source.direct_dependencies(coordinate)?;
        self.dependencies.insert(key, edges.clone());
        Ok(edges)
    }

    pub fn available_versions(&mut self, id: &ConflictId) -> MediantResult<Vec<MavenVersion>> {
        if let Some(versions) = self.versions.get(id) {
            return Ok(versions.clone());
        }
        trace!("querying available versions of {id}");
        self.queries += 1;
        let versions = self.source.available_versions(id)?;
        self.versions.insert(id.clone(), versions.clone());
        Ok(versions)
    }

    /// Number of calls that reached the underlying source.
    pub fn queries(&self) -> usize {
        self.queries
    }
}
