//! Rendering a resolution result as a dependency tree.
//!
//! Each selected node hangs below the identity that precedes it on its
//! trail, so the tree shows the path through which every artifact won.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use mediant_core::coordinate::{ArtifactCoordinate, ConflictId};
use mediant_core::dependency::Scope;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::resolver::ResolutionResult;

/// A vertex of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub coordinate: ArtifactCoordinate,
    pub scope: Scope,
    pub optional: bool,
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate)?;
        if self.scope != Scope::Compile {
            write!(f, " ({})", self.scope)?;
        }
        if self.optional {
            f.write_str(" [optional]")?;
        }
        Ok(())
    }
}

/// A resolved dependency tree backed by petgraph.
pub struct DependencyTree {
    graph: DiGraph<TreeNode, Scope>,
    /// Lookup from conflict identity to node index.
    index: BTreeMap<ConflictId, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl DependencyTree {
    pub fn from_result(result: &ResolutionResult) -> Self {
        let mut tree = Self {
            graph: DiGraph::new(),
            index: BTreeMap::new(),
            roots: Vec::new(),
        };

        for coordinate in &result.roots {
            let idx = tree.add_node(TreeNode {
                coordinate: coordinate.clone(),
                scope: Scope::Compile,
                optional: false,
            });
            tree.roots.push(idx);
        }
        for node in &result.selected {
            tree.add_node(TreeNode {
                coordinate: node.coordinate.clone(),
                scope: node.scope,
                optional: node.optional,
            });
        }
        for node in &result.selected {
            let [.., parent, child] = node.trail.as_slice() else {
                continue;
            };
            if let (Some(&from), Some(&to)) = (tree.index.get(parent), tree.index.get(child)) {
                tree.graph.add_edge(from, to, node.scope);
            }
        }
        tree
    }

    /// Add or retrieve a node. If the identity already exists, returns the existing index.
    fn add_node(&mut self, node: TreeNode) -> NodeIndex {
        let id = node.coordinate.conflict_id();
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    pub fn node(&self, idx: NodeIndex) -> &TreeNode {
        &self.graph[idx]
    }

    /// Children of a node, in the order they were reached.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        children.sort();
        children.into_iter().map(|(_, target)| target).collect()
    }

    /// Who depends on this node.
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.source())
            .collect()
    }

    /// Print the tree to a string. The originating artifact's direct
    /// dependencies are grouped by scope when more than one scope occurs.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        for &root in &self.roots {
            output.push_str(&format!("{}\n", self.graph[root]));

            let deps = self.dependencies_of(root);
            let sections: Vec<(Scope, Vec<NodeIndex>)> = Scope::ALL
                .iter()
                .map(|&scope| {
                    let members = deps
                        .iter()
                        .copied()
                        .filter(|&idx| self.graph[idx].scope == scope)
                        .collect();
                    (scope, members)
                })
                .filter(|(_, members): &(Scope, Vec<NodeIndex>)| !members.is_empty())
                .collect();
            let show_headers = sections.len() > 1;

            let mut visited = HashSet::new();
            visited.insert(root);
            let total_sections = sections.len();
            for (section, (scope, members)) in sections.iter().enumerate() {
                if show_headers {
                    output.push_str(&format!("[{scope}]\n"));
                }
                let is_last_section = section + 1 == total_sections;
                let count = members.len();
                for (i, idx) in members.iter().enumerate() {
                    let is_last = i == count - 1 && is_last_section;
                    self.print_subtree(&mut output, *idx, "", is_last, 1, max_depth, &mut visited);
                }
            }
        }
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        if max_depth.is_some_and(|max| depth >= max) {
            return;
        }
        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let deps = self.dependencies_of(idx);
        let count = deps.len();
        for (i, child) in deps.iter().enumerate() {
            self.print_subtree(
                output,
                *child,
                &child_prefix,
                i == count - 1,
                depth + 1,
                max_depth,
                visited,
            );
        }

        visited.remove(&idx);
    }

    /// Find the path from the originating artifact to a dependency.
    ///
    /// Accepts a conflict identity, `group:artifact`, or just `artifact`.
    pub fn find_path(&self, target_key: &str) -> Option<Vec<&TreeNode>> {
        let target = self.resolve_key(target_key)?;
        for &root in &self.roots {
            let mut path = Vec::new();
            let mut visited = HashSet::new();
            if self.dfs_path(root, target, &mut path, &mut visited) {
                return Some(path.iter().map(|&idx| &self.graph[idx]).collect());
            }
        }
        None
    }

    /// Resolve a user-provided key to a node index.
    ///
    /// Tries an exact identity first, then `group:artifact`, then the
    /// artifact name alone.
    fn resolve_key(&self, key: &str) -> Option<NodeIndex> {
        if let Ok(id) = ConflictId::parse(key) {
            if let Some(&idx) = self.index.get(&id) {
                return Some(idx);
            }
        }
        self.index
            .iter()
            .find(|(id, _)| id.key() == key)
            .or_else(|| self.index.iter().find(|(id, _)| id.artifact_id == key))
            .map(|(_, &idx)| idx)
    }

    fn dfs_path(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            path.pop();
            return false;
        }
        for child in self.dependencies_of(current) {
            if self.dfs_path(child, target, path, visited) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Print the chain of dependents of one artifact, up to the originating
    /// artifact.
    pub fn print_inverted_tree(&self, target_key: &str) -> String {
        let mut output = String::new();
        let Some(idx) = self.resolve_key(target_key) else {
            return output;
        };
        output.push_str(&format!("{}\n", self.graph[idx]));

        let mut visited = HashSet::new();
        visited.insert(idx);
        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, dep_idx) in dependents.iter().enumerate() {
            self.print_inverted_subtree(&mut output, *dep_idx, "", i == count - 1, &mut visited);
        }
        output
    }

    fn print_inverted_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, dep_idx) in dependents.iter().enumerate() {
            self.print_inverted_subtree(output, *dep_idx, &child_prefix, i == count - 1, visited);
        }

        visited.remove(&idx);
    }

    /// Number of nodes, originating artifacts excluded.
    pub fn len(&self) -> usize {
        self.graph.node_count().saturating_sub(self.roots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
