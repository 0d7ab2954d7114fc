//! Nearest-wins mediation between candidates sharing a conflict identity.
//!
//! The mediator owns the per-identity state of one run: the selected node,
//! the intersection of every version spec seen, and whether the selection's
//! children have been visited. Candidates must arrive in breadth-first order.

use std::cmp::Ordering;
use std::collections::HashMap;

use mediant_core::coordinate::{ArtifactCoordinate, ConflictId};
use mediant_core::dependency::{ManagedVersions, Scope};
use mediant_util::errors::{MediantError, MediantResult};
use tracing::debug;

use crate::builder::DependencyNode;
use crate::cache::MetadataSession;
use crate::conflict::{
    Diagnostics, Omission, OmissionReason, RangeViolation, RangeViolationReason, VersionConflict,
};
use crate::filter::NodeFilter;
use crate::resolver::ResolutionResult;
use crate::scope;
use crate::source::MetadataSource;
use crate::version::{MavenVersion, VersionSpec};

/// What the graph builder should do with an admitted candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Visit this node's children.
    Expand(DependencyNode),
    /// Recorded; nothing further to visit.
    Retained,
    /// Rejected by the filter.
    Omitted,
}

struct Managed {
    version: Option<VersionSpec>,
    scope: Option<Scope>,
}

struct Entry {
    node: DependencyNode,
    range: VersionSpec,
    observed: Vec<MavenVersion>,
    scope_forced: bool,
    expanded: bool,
}

impl Entry {
    /// The spec the selection's children are read with: its own version
    /// while the accumulated range allows it, the range otherwise.
    fn expansion_spec(&self) -> VersionSpec {
        match &self.node.version {
            VersionSpec::Soft(v) if self.range.contains(v) => self.node.version.clone(),
            _ => self.range.clone(),
        }
    }

    fn observe(&mut self, version: &VersionSpec) {
        if let VersionSpec::Soft(v) = version {
            if !self.observed.contains(v) {
                self.observed.push(v.clone());
            }
        }
    }
}

pub struct ConflictMediator<'f> {
    managed: HashMap<ConflictId, Managed>,
    filter: Option<&'f dyn NodeFilter>,
    entries: Vec<Entry>,
    index: HashMap<ConflictId, usize>,
    diagnostics: Diagnostics,
}

impl<'f> ConflictMediator<'f> {
    /// Fails when a managed version does not parse.
    pub fn new(
        managed: &ManagedVersions,
        filter: Option<&'f dyn NodeFilter>,
    ) -> Result<Self, MediantError> {
        let managed = managed
            .iter()
            .map(|(id, entry)| {
                let version = entry.version.as_deref().map(VersionSpec::parse).transpose()?;
                Ok((
                    id.clone(),
                    Managed {
                        version,
                        scope: entry.scope,
                    },
                ))
            })
            .collect::<Result<HashMap<_, _>, MediantError>>()?;
        Ok(Self {
            managed,
            filter,
            entries: Vec::new(),
            index: HashMap::new(),
            diagnostics: Diagnostics::new(),
        })
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Number of identities seen so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The current selection for `id`.
    pub fn selected(&self, id: &ConflictId) -> Option<&DependencyNode> {
        self.index.get(id).map(|&i| &self.entries[i].node)
    }

    /// Fold one candidate into the state.
    pub fn admit(&mut self, mut candidate: DependencyNode) -> Admission {
        let id = candidate.conflict_id();

        let mut scope_forced = false;
        if let Some(managed) = self.managed.get(&id) {
            if let Some(version) = &managed.version {
                if *version != candidate.version {
                    debug!("managed version {version} replaces {} for {id}", candidate.version);
                }
                candidate.set_version(version.clone());
            }
            if let Some(forced) = managed.scope {
                candidate.scope = forced;
                candidate.declared_scope = forced;
                scope_forced = true;
            }
        }

        if let Some(filter) = self.filter {
            if !filter.accept(&candidate) {
                self.diagnostics.omission(Omission {
                    identity: id,
                    trail: candidate.trail,
                    reason: OmissionReason::Filtered,
                });
                return Admission::Omitted;
            }
        }

        let Some(&slot) = self.index.get(&id) else {
            return self.select(id, candidate, scope_forced);
        };

        let entry = &mut self.entries[slot];
        entry.observe(&candidate.version);
        match entry.range.intersect(&candidate.version) {
            Ok(narrowed) => {
                if narrowed != entry.range {
                    debug!("range for {id} narrowed to {narrowed}");
                }
                entry.range = narrowed;
            }
            Err(conflict) => self.diagnostics.range_violation(RangeViolation {
                identity: id.clone(),
                ranges: vec![conflict.a, conflict.b],
                paths: vec![entry.node.trail.clone(), candidate.trail.clone()],
                reason: RangeViolationReason::Disjoint,
            }),
        }

        match candidate.depth.cmp(&entry.node.depth) {
            Ordering::Greater => {
                if candidate.version != entry.node.version {
                    self.diagnostics.conflict(VersionConflict {
                        identity: id.clone(),
                        requested: candidate.version.to_string(),
                        resolved: entry.node.version.to_string(),
                        path: candidate.trail.clone(),
                        reason: format!(
                            "nearest wins (depth {} vs {})",
                            entry.node.depth, candidate.depth
                        ),
                    });
                }
                if !entry.scope_forced {
                    let widened = scope::combine(candidate.scope, entry.node.scope);
                    if widened != entry.node.scope {
                        debug!("scope of {id} widened from {} to {widened}", entry.node.scope);
                        entry.node.scope = widened;
                    }
                }
                expand_on_behalf(entry, candidate)
            }
            Ordering::Equal => {
                if candidate.version != entry.node.version {
                    self.diagnostics.conflict(VersionConflict {
                        identity: id.clone(),
                        requested: candidate.version.to_string(),
                        resolved: entry.node.version.to_string(),
                        path: candidate.trail.clone(),
                        reason: format!("first declaration wins (depth {})", candidate.depth),
                    });
                }
                expand_on_behalf(entry, candidate)
            }
            // Only reachable when a caller admits out of breadth-first order.
            Ordering::Less => {
                let replaced = std::mem::replace(&mut entry.node, candidate);
                if replaced.version != entry.node.version {
                    self.diagnostics.conflict(VersionConflict {
                        identity: id.clone(),
                        requested: replaced.version.to_string(),
                        resolved: entry.node.version.to_string(),
                        path: replaced.trail.clone(),
                        reason: format!(
                            "nearest wins (depth {} vs {})",
                            entry.node.depth, replaced.depth
                        ),
                    });
                }
                entry.scope_forced |= scope_forced;
                if !entry.scope_forced {
                    entry.node.scope = scope::combine(replaced.scope, entry.node.scope);
                }
                debug!("{id} replaced by nearer {}", entry.node.coordinate);
                if entry.node.is_transitive() {
                    entry.expanded = true;
                    let mut node = entry.node.clone();
                    node.set_version(entry.expansion_spec());
                    Admission::Expand(node)
                } else {
                    Admission::Retained
                }
            }
        }
    }

    fn select(&mut self, id: ConflictId, candidate: DependencyNode, scope_forced: bool) -> Admission {
        debug!(
            "selected {} ({}) at depth {}",
            candidate.coordinate, candidate.scope, candidate.depth
        );
        let expand = candidate.is_transitive();
        let mut entry = Entry {
            range: candidate.version.clone(),
            node: candidate,
            observed: Vec::new(),
            scope_forced,
            expanded: expand,
        };
        entry.observe(&entry.node.version.clone());
        let admission = if expand {
            Admission::Expand(entry.node.clone())
        } else {
            Admission::Retained
        };
        self.index.insert(id, self.entries.len());
        self.entries.push(entry);
        admission
    }

    /// Settle a concrete version for every identity and assemble the result.
    ///
    /// Preference order: the selection's own version while the accumulated
    /// range allows it, the range's recommendation, then the highest version
    /// inside the range among those observed and those published.
    pub fn finalize<S: MetadataSource + ?Sized>(
        mut self,
        roots: Vec<ArtifactCoordinate>,
        session: &mut MetadataSession<'_, S>,
    ) -> MediantResult<ResolutionResult> {
        let mut selected = Vec::with_capacity(self.entries.len());
        for entry in std::mem::take(&mut self.entries) {
            let id = entry.node.conflict_id();
            let chosen = match &entry.node.version {
                VersionSpec::Soft(v) if entry.range.contains(v) => Some(v.clone()),
                _ => match entry.range.recommended() {
                    Some(v) => Some(v.clone()),
                    None => {
                        let mut known = entry.observed.clone();
                        known.extend(session.available_versions(&id)?);
                        entry.range.select_version(&known)
                    }
                },
            };
            let Some(version) = chosen else {
                self.diagnostics.range_violation(RangeViolation {
                    identity: id,
                    ranges: vec![entry.range.clone()],
                    paths: vec![entry.node.trail.clone()],
                    reason: RangeViolationReason::Unsatisfiable,
                });
                continue;
            };
            let mut node = entry.node;
            node.set_version(VersionSpec::Soft(version));
            selected.push(node);
        }

        Ok(ResolutionResult::new(roots, selected, self.diagnostics))
    }
}

/// A farther or later candidate lost, but its path may still carry the
/// winner's children if the winner itself was never expanded.
fn expand_on_behalf(entry: &mut Entry, candidate: DependencyNode) -> Admission {
    let reachable = !candidate.optional
        && scope::is_transitive(candidate.declared_scope, false)
        && scope::is_transitive(entry.node.scope, false);
    if entry.expanded || !reachable {
        return Admission::Retained;
    }
    debug!(
        "expanding {} for the kept selection via depth {}",
        entry.node.coordinate, candidate.depth
    );
    entry.expanded = true;
    let mut node = candidate;
    node.scope = entry.node.scope;
    node.set_version(entry.expansion_spec());
    Admission::Expand(node)
}
