use std::collections::HashSet;

use tracing::debug;

use crate::core::artifact::{Coordinate, CYCLE};
use crate::graph::{DependencyGraph, NodeId};

/// Truncates every node whose coordinate already appears on the path from the
/// root and tags it with `Cycle=true`. Shared subtrees reached through a
/// second parent (diamonds) are left alone.
pub fn break_cycles(mut graph: DependencyGraph) -> DependencyGraph {
    let mut ancestors = HashSet::new();
    let mut visited = HashSet::new();
    let root = graph.root();
    visit(&mut graph, root, &mut ancestors, &mut visited);
    graph
}

fn visit(
    graph: &mut DependencyGraph,
    id: NodeId,
    ancestors: &mut HashSet<Coordinate>,
    visited: &mut HashSet<NodeId>,
) {
    let coordinate = graph
        .node(id)
        .artifact
        .as_ref()
        .map(|artifact| artifact.coordinate().clone());

    if let Some(coordinate) = coordinate.as_ref() {
        if ancestors.contains(coordinate) {
            debug!(node = %coordinate, "breaking dependency cycle");
            let node = graph.node_mut(id);
            node.children.clear();
            node.artifact = node
                .artifact
                .as_ref()
                .map(|artifact| artifact.with_property(CYCLE, "true"));
            return;
        }
    }

    if !visited.insert(id) {
        return;
    }

    if let Some(coordinate) = coordinate.clone() {
        ancestors.insert(coordinate);
    }
    // Index loop: a child may truncate this node's own children when the
    // node is its own descendant.
    let mut idx = 0;
    while idx < graph.children(id).len() {
        let child = graph.children(id)[idx];
        visit(graph, child, ancestors, visited);
        idx += 1;
    }
    if let Some(coordinate) = coordinate.as_ref() {
        ancestors.remove(coordinate);
    }
}
