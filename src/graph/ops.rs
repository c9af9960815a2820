use std::collections::HashSet;

use crate::core::pattern::CoordinatePattern;
use crate::graph::{DependencyGraph, NodeId};

/// Reachable nodes in depth-first pre-order, each handle listed once.
pub fn reachable(graph: &DependencyGraph) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut stack = vec![graph.root()];
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        out.push(current);
        for child in graph.children(current).iter().rev() {
            stack.push(*child);
        }
    }
    out
}

/// Handles from the root down to `id`, following parent back-references.
pub fn path_to_root(graph: &DependencyGraph, id: NodeId) -> Vec<NodeId> {
    let mut path = vec![id];
    let mut seen = HashSet::from([id]);
    let mut current = id;
    while let Some(parent) = graph.node(current).parent {
        if !seen.insert(parent) {
            break;
        }
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

pub fn find_matching(graph: &DependencyGraph, pattern: &CoordinatePattern) -> Vec<NodeId> {
    reachable(graph)
        .into_iter()
        .filter(|id| {
            graph
                .node(*id)
                .artifact
                .as_ref()
                .is_some_and(|artifact| pattern.matches(artifact.coordinate()))
        })
        .collect()
}
