//! Predicates deciding which candidates may enter the graph.

use mediant_core::dependency::Classpath;

use crate::builder::DependencyNode;

/// Rejected nodes are recorded as omissions and their children are never
/// visited.
pub trait NodeFilter {
    fn accept(&self, node: &DependencyNode) -> bool;
}

/// A filter backed by a closure.
pub struct ClosureFilter<F> {
    predicate: F,
}

impl<F> ClosureFilter<F>
where
    F: Fn(&DependencyNode) -> bool,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> NodeFilter for ClosureFilter<F>
where
    F: Fn(&DependencyNode) -> bool,
{
    fn accept(&self, node: &DependencyNode) -> bool {
        (self.predicate)(node)
    }
}

/// Keeps the scopes that belong on one classpath.
#[derive(Debug, Clone, Copy)]
pub struct ScopeFilter {
    pub classpath: Classpath,
}

impl ScopeFilter {
    pub fn new(classpath: Classpath) -> Self {
        Self { classpath }
    }
}

impl NodeFilter for ScopeFilter {
    fn accept(&self, node: &DependencyNode) -> bool {
        self.classpath.includes(node.scope)
    }
}
