//! Breadth-first expansion of the dependency graph.

use mediant_core::coordinate::{ArtifactCoordinate, ConflictId};
use mediant_core::dependency::{DependencyEdge, Exclusion, Scope};
use mediant_util::errors::{MediantError, MediantResult};
use serde::Serialize;

use crate::cache::MetadataSession;
use crate::conflict::{Diagnostics, Omission, OmissionReason, RangeViolation, RangeViolationReason};
use crate::cycle;
use crate::scope;
use crate::source::MetadataSource;
use crate::version::{MavenVersion, VersionSpec};

/// A vertex of the dependency graph as reached along one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyNode {
    pub coordinate: ArtifactCoordinate,
    /// Parsed from `coordinate.version`; a concrete version once finalized.
    pub version: VersionSpec,
    /// Effective scope along the path.
    pub scope: Scope,
    /// Scope on the edge that reached this node.
    pub declared_scope: Scope,
    pub optional: bool,
    pub depth: usize,
    /// Identities from the originating artifact down to this node, inclusive.
    pub trail: Vec<ConflictId>,
    /// Exclusions in force for this node's children.
    pub exclusions: Vec<Exclusion>,
}

impl DependencyNode {
    /// The depth-0 node for the artifact being resolved.
    pub fn origin(coordinate: ArtifactCoordinate) -> Result<Self, MediantError> {
        let version = VersionSpec::parse(&coordinate.version)?;
        let trail = vec![coordinate.conflict_id()];
        Ok(Self {
            coordinate,
            version,
            scope: Scope::Compile,
            declared_scope: Scope::Compile,
            optional: false,
            depth: 0,
            trail,
            exclusions: Vec::new(),
        })
    }

    pub fn conflict_id(&self) -> ConflictId {
        self.coordinate.conflict_id()
    }

    /// Whether this node's children belong in the graph: both the path
    /// scope and the edge scope must propagate, and the edge not be optional.
    pub fn is_transitive(&self) -> bool {
        scope::is_transitive(self.scope, self.optional)
            && scope::is_transitive(self.declared_scope, false)
    }

    pub(crate) fn set_version(&mut self, version: VersionSpec) {
        self.coordinate.version = version.to_string();
        self.version = version;
    }
}

/// Expands frontiers one depth level at a time.
pub struct GraphBuilder<'a, S: MetadataSource + ?Sized> {
    session: MetadataSession<'a, S>,
}

impl<'a, S: MetadataSource + ?Sized> GraphBuilder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            session: MetadataSession::new(source),
        }
    }

    pub fn session_mut(&mut self) -> &mut MetadataSession<'a, S> {
        &mut self.session
    }

    /// Create the depth-0 nodes for the `from` side of `roots` and the
    /// depth-1 candidates for the edges themselves, in declaration order.
    pub fn seed(
        &mut self,
        roots: &[DependencyEdge],
        diagnostics: &mut Diagnostics,
    ) -> MediantResult<(Vec<DependencyNode>, Vec<DependencyNode>)> {
        let mut origins: Vec<DependencyNode> = Vec::new();
        let mut candidates = Vec::new();
        for edge in roots {
            let position = match origins.iter().position(|o| o.coordinate == edge.from) {
                Some(position) => position,
                None => {
                    origins.push(DependencyNode::origin(edge.from.clone())?);
                    origins.len() - 1
                }
            };
            if let Some(child) = child_of(&origins[position], edge, diagnostics)? {
                candidates.push(child);
            }
        }
        Ok((origins, candidates))
    }

    /// Visit every node of `frontier` in order and return the children they
    /// declare, also in order. Nodes that do not propagate are skipped.
    pub fn expand(
        &mut self,
        frontier: &[DependencyNode],
        diagnostics: &mut Diagnostics,
    ) -> MediantResult<Vec<DependencyNode>> {
        let mut next = Vec::new();
        for node in frontier {
            if !node.is_transitive() {
                continue;
            }
            let Some(version) = self.concrete_version(node, diagnostics)? else {
                continue;
            };
            let coordinate = node.coordinate.with_version(version.original.as_str());
            let edges = self.session.direct_dependencies(&coordinate)?;
            for edge in &edges {
                if let Some(child) = child_of(node, edge, diagnostics)? {
                    next.push(child);
                }
            }
        }
        Ok(next)
    }

    /// The version whose metadata describes `node`'s children. A range is
    /// resolved against the published versions; when none fits the node is
    /// reported and left unexpanded.
    fn concrete_version(
        &mut self,
        node: &DependencyNode,
        diagnostics: &mut Diagnostics,
    ) -> MediantResult<Option<MavenVersion>> {
        if let VersionSpec::Soft(version) = &node.version {
            return Ok(Some(version.clone()));
        }
        let id = node.conflict_id();
        let available = self.session.available_versions(&id)?;
        let selected = node.version.select_version(&available);
        if selected.is_none() {
            diagnostics.range_violation(RangeViolation {
                identity: id,
                ranges: vec![node.version.clone()],
                paths: vec![node.trail.clone()],
                reason: RangeViolationReason::Unsatisfiable,
            });
        }
        Ok(selected)
    }
}

/// The candidate `edge` leads to from `parent`, or `None` when an exclusion
/// or a cycle prunes it.
fn child_of(
    parent: &DependencyNode,
    edge: &DependencyEdge,
    diagnostics: &mut Diagnostics,
) -> Result<Option<DependencyNode>, MediantError> {
    let id = edge.to.conflict_id();

    if let Some(pattern) = parent.exclusions.iter().find(|e| e.matches(&id)) {
        let mut trail = parent.trail.clone();
        trail.push(id.clone());
        diagnostics.omission(Omission {
            identity: id,
            trail,
            reason: OmissionReason::Excluded {
                pattern: pattern.clone(),
            },
        });
        return Ok(None);
    }

    let trail = match cycle::check_and_extend(&parent.trail, &id) {
        Ok(trail) => trail,
        Err(err) => {
            diagnostics.cycle(err.into());
            return Ok(None);
        }
    };

    let version = VersionSpec::parse(&edge.to.version)?;
    let scope = if parent.depth == 0 {
        edge.scope
    } else {
        scope::combine(parent.scope, edge.scope)
    };
    let mut exclusions = parent.exclusions.clone();
    exclusions.extend(edge.exclusions.iter().cloned());

    Ok(Some(DependencyNode {
        coordinate: edge.to.clone(),
        version,
        scope,
        declared_scope: edge.scope,
        optional: edge.optional,
        depth: parent.depth + 1,
        trail,
        exclusions,
    }))
}
