use mediant_core::coordinate::{ArtifactCoordinate, ConflictId};
use mediant_core::dependency::{DependencyEdge, ManagedVersion, ManagedVersions};
use mediant_resolver::resolver::resolve;
use mediant_resolver::source::MemorySource;
use mediant_util::errors::MediantError;

const APP: &str = "com.example:app:1.0";

fn coord(s: &str) -> ArtifactCoordinate {
    ArtifactCoordinate::parse(s).unwrap()
}

fn id(s: &str) -> ConflictId {
    ConflictId::parse(s).unwrap()
}

fn edge(from: &str, to: &str) -> DependencyEdge {
    DependencyEdge::new(coord(from), coord(to))
}

#[test]
fn cycle_through_the_originating_artifact() {
    let mut source = MemorySource::new();
    source.add_text("g:b:1.0", &[APP, "g:c:1.0"]).unwrap();
    source.add_text("g:c:1.0", &[]).unwrap();

    let result = resolve(&[edge(APP, "g:b:1.0")], &ManagedVersions::new(), &source, None).unwrap();
    assert_eq!(result.cycle_violations.len(), 1);
    let cycle = &result.cycle_violations[0];
    assert_eq!(cycle.trail, vec![id("com.example:app"), id("g:b")]);
    assert_eq!(cycle.closing, id("com.example:app"));
    assert!(result.get(&id("g:c")).is_some());
    assert!(result.get(&id("com.example:app")).is_none());
}

#[test]
fn cycle_below_the_root_keeps_resolving() {
    let mut source = MemorySource::new();
    source.add_text("g:b:1.0", &["g:c:1.0"]).unwrap();
    source.add_text("g:c:1.0", &["g:b:1.0"]).unwrap();
    source.add_text("g:d:1.0", &[]).unwrap();

    let roots = [edge(APP, "g:b:1.0"), edge(APP, "g:d:1.0")];
    let result = resolve(&roots, &ManagedVersions::new(), &source, None).unwrap();
    assert_eq!(result.selected.len(), 3);
    assert_eq!(result.cycle_violations.len(), 1);
    assert_eq!(
        result.cycle_violations[0].to_string(),
        "com.example:app -> g:b -> g:c -> g:b"
    );
    assert!(!result.is_clean());
}

#[test]
fn missing_metadata_aborts_resolution() {
    let mut source = MemorySource::new();
    source.add_text("g:a:1.0", &["g:b:1.0"]).unwrap();

    let err = resolve(&[edge(APP, "g:a:1.0")], &ManagedVersions::new(), &source, None).unwrap_err();
    match err.downcast_ref::<MediantError>() {
        Some(MediantError::MetadataUnavailable { coordinate, .. }) => {
            assert_eq!(coordinate, "g:b:1.0");
        }
        other => panic!("expected MetadataUnavailable, got {other:?}"),
    }
}

#[test]
fn malformed_declared_range_aborts_resolution() {
    let source = MemorySource::new();
    let err = resolve(
        &[edge(APP, "g:a:(1.0)")],
        &ManagedVersions::new(),
        &source,
        None,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MediantError>(),
        Some(MediantError::MalformedVersion { .. })
    ));
}

#[test]
fn malformed_managed_version_aborts_resolution() {
    let source = MemorySource::new();
    let mut managed = ManagedVersions::new();
    managed.insert(id("g:a"), ManagedVersion::version("[2.0,1.0]"));

    let err = resolve(&[edge(APP, "g:a:1.0")], &managed, &source, None).unwrap_err();
    assert!(err.to_string().contains("lower bound is greater than upper bound"));
}

#[test]
fn empty_roots_resolve_to_nothing() {
    let source = MemorySource::new();
    let result = resolve(&[], &ManagedVersions::new(), &source, None).unwrap();
    assert!(result.selected.is_empty());
    assert!(result.roots.is_empty());
    assert!(result.is_clean());
}
