//! Resolution entry points: nearest-wins breadth-first traversal over a
//! metadata source, and concurrent batches of independent runs.

use std::sync::Arc;

use mediant_core::coordinate::{ArtifactCoordinate, ConflictId};
use mediant_core::dependency::{Classpath, DependencyEdge, ManagedVersions};
use mediant_core::manifest::ResolutionManifest;
use mediant_util::errors::{MediantError, MediantResult};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::builder::{DependencyNode, GraphBuilder};
use crate::conflict::{ConflictReport, CycleViolation, Diagnostics, Omission, RangeViolation};
use crate::filter::{NodeFilter, ScopeFilter};
use crate::mediator::{Admission, ConflictMediator};
use crate::source::MetadataSource;

/// The output of dependency resolution.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionResult {
    /// The artifacts the root edges leave from.
    pub roots: Vec<ArtifactCoordinate>,
    /// One node per conflict identity, each with a concrete version, in the
    /// order identities were first reached.
    pub selected: Vec<DependencyNode>,
    pub range_violations: Vec<RangeViolation>,
    pub cycle_violations: Vec<CycleViolation>,
    pub conflicts: ConflictReport,
    pub omissions: Vec<Omission>,
}

impl ResolutionResult {
    pub fn new(
        roots: Vec<ArtifactCoordinate>,
        selected: Vec<DependencyNode>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            roots,
            selected,
            range_violations: diagnostics.range_violations,
            cycle_violations: diagnostics.cycle_violations,
            conflicts: diagnostics.conflicts,
            omissions: diagnostics.omissions,
        }
    }

    pub fn get(&self, id: &ConflictId) -> Option<&DependencyNode> {
        self.selected.iter().find(|node| node.conflict_id() == *id)
    }

    /// The resolved version text of `id`, if it was selected.
    pub fn version_of(&self, id: &ConflictId) -> Option<String> {
        self.get(id).map(|node| node.coordinate.version.clone())
    }

    /// Whether the run finished without range or cycle violations.
    pub fn is_clean(&self) -> bool {
        self.range_violations.is_empty() && self.cycle_violations.is_empty()
    }

    pub fn to_json(&self) -> MediantResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            MediantError::Generic {
                message: format!("Failed to serialize resolution result: {e}"),
            }
            .into()
        })
    }
}

/// Resolve the transitive closure of `roots`.
///
/// Uses BFS with Maven's "nearest wins" strategy: every depth level is
/// admitted before the next is expanded, and within a level candidates are
/// admitted in declaration order. Range conflicts and cycles are reported on
/// the result; malformed versions and unavailable metadata abort the run.
pub fn resolve<S: MetadataSource + ?Sized>(
    roots: &[DependencyEdge],
    managed: &ManagedVersions,
    source: &S,
    filter: Option<&dyn NodeFilter>,
) -> MediantResult<ResolutionResult> {
    let mut mediator = ConflictMediator::new(managed, filter)?;
    let mut builder = GraphBuilder::new(source);

    let (origins, mut candidates) = builder.seed(roots, mediator.diagnostics_mut())?;
    let mut depth = 1;
    while !candidates.is_empty() {
        debug!("admitting {} candidates at depth {depth}", candidates.len());
        let frontier: Vec<DependencyNode> = candidates
            .into_iter()
            .filter_map(|candidate| match mediator.admit(candidate) {
                Admission::Expand(node) => Some(node),
                Admission::Retained | Admission::Omitted => None,
            })
            .collect();
        candidates = builder.expand(&frontier, mediator.diagnostics_mut())?;
        depth += 1;
    }

    let roots = origins.into_iter().map(|origin| origin.coordinate).collect();
    let result = mediator.finalize(roots, builder.session_mut())?;
    info!(
        "resolved {} artifacts ({} conflicts, {} range violations, {} cycles, {} omitted, {} metadata queries)",
        result.selected.len(),
        result.conflicts.len(),
        result.range_violations.len(),
        result.cycle_violations.len(),
        result.omissions.len(),
        builder.session_mut().queries()
    );
    Ok(result)
}

/// One independent resolution in a batch.
#[derive(Debug, Clone, Default)]
pub struct ResolutionRequest {
    pub roots: Vec<DependencyEdge>,
    pub managed: ManagedVersions,
    /// Restrict the result to one classpath's scopes.
    pub classpath: Option<Classpath>,
}

impl ResolutionRequest {
    pub fn new(roots: Vec<DependencyEdge>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }

    pub fn from_manifest(manifest: &ResolutionManifest) -> Result<Self, MediantError> {
        Ok(Self {
            roots: manifest.roots()?,
            managed: manifest.managed_versions()?,
            classpath: manifest.resolution.classpath,
        })
    }

    pub fn resolve<S: MetadataSource + ?Sized>(&self, source: &S) -> MediantResult<ResolutionResult> {
        let filter = self.classpath.map(ScopeFilter::new);
        resolve(
            &self.roots,
            &self.managed,
            source,
            filter.as_ref().map(|f| f as &dyn NodeFilter),
        )
    }
}

/// Resolve independent requests concurrently, at most `jobs` at a time.
///
/// Each run owns its own state; only the source is shared. Results come
/// back in request order. The first failing run aborts the batch.
pub async fn resolve_all<S>(
    requests: Vec<ResolutionRequest>,
    source: Arc<S>,
    jobs: usize,
) -> MediantResult<Vec<ResolutionResult>>
where
    S: MetadataSource + Send + Sync + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let total = requests.len();
    let mut join_set = JoinSet::new();

    for (position, request) in requests.into_iter().enumerate() {
        let source = Arc::clone(&source);
        let sem = Arc::clone(&semaphore);
        join_set.spawn(async move {
            let _permit = sem.acquire().await;
            let outcome =
                tokio::task::spawn_blocking(move || request.resolve(&*source)).await;
            (position, outcome)
        });
    }

    let mut results: Vec<Option<ResolutionResult>> = (0..total).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        let (position, outcome) = joined.map_err(task_failed)?;
        results[position] = Some(outcome.map_err(task_failed)??);
    }

    info!("resolved {total} independent requests");
    Ok(results.into_iter().flatten().collect())
}

/// Resolve one request per manifest as a batch. Concurrency is the smallest
/// `[resolution] jobs` among them.
pub async fn resolve_manifests<S>(
    manifests: &[ResolutionManifest],
    source: Arc<S>,
) -> MediantResult<Vec<ResolutionResult>>
where
    S: MetadataSource + Send + Sync + ?Sized + 'static,
{
    let requests = manifests
        .iter()
        .map(ResolutionRequest::from_manifest)
        .collect::<Result<Vec<_>, _>>()?;
    let jobs = manifests
        .iter()
        .map(|manifest| manifest.resolution.jobs)
        .min()
        .unwrap_or(1);
    debug!("resolving {} manifests with {jobs} jobs", manifests.len());
    resolve_all(requests, source, jobs).await
}

fn task_failed(err: tokio::task::JoinError) -> MediantError {
    MediantError::Generic {
        message: format!("Resolution task failed: {err}"),
    }
}
