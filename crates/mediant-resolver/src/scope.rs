//! Scope propagation along a dependency path.

use mediant_core::dependency::Scope;

/// Effective scope of a dependency declared with `declared` on a path whose
/// scope so far is `inherited`.
///
/// `compile` dominates. `runtime` absorbs the weak scopes except `system`.
/// Otherwise the declared scope wins.
pub fn combine(inherited: Scope, declared: Scope) -> Scope {
    use Scope::*;
    match (inherited, declared) {
        (Compile, _) | (_, Compile) => Compile,
        (Runtime, System) => System,
        (Runtime, _) => Runtime,
        (_, declared) => declared,
    }
}

/// Whether the children of a node with this scope are part of the graph.
pub fn is_transitive(scope: Scope, optional: bool) -> bool {
    !optional && matches!(scope, Scope::Compile | Scope::Runtime)
}
