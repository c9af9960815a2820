use crate::core::artifact::{
    Artifact, Coordinate, MANAGED_SCOPE, PRE_MANAGED_SCOPE, PRE_MANAGED_VERSION,
};
use crate::core::dependency::{Dependency, Scope};
use crate::graph::{DependencyGraph, DependencyNode};

pub fn dep(id: &str, version: &str, scope: Scope) -> DependencyNode {
    DependencyNode::new(
        Artifact::new(Coordinate::new("g", id, "jar", version)),
        Some(Dependency::new(scope)),
    )
}

/// app
/// +- b
/// |  +- c:1.0
/// |  \- o (optional)
/// \- d
///    +- c:2.0
///    \- e:3.0 (managed from 2.0, scope managed from runtime)
///       \- f
pub fn sample_graph() -> DependencyGraph {
    let mut graph = DependencyGraph::new(DependencyNode::root(Artifact::new(Coordinate::new(
        "g", "app", "jar", "1.0",
    ))));
    let root = graph.root();
    let b = graph.add_child(root, dep("b", "1.0", Scope::Compile));
    let d = graph.add_child(root, dep("d", "1.0", Scope::Compile));
    graph.add_child(b, dep("c", "1.0", Scope::Compile));
    graph.add_child(
        b,
        DependencyNode::new(
            Artifact::new(Coordinate::new("g", "o", "jar", "1.0")),
            Some(Dependency::new(Scope::Compile).optional(true)),
        ),
    );
    graph.add_child(d, dep("c", "2.0", Scope::Compile));
    let managed = Artifact::new(Coordinate::new("g", "e", "jar", "3.0")).with_properties([
        (PRE_MANAGED_VERSION, "2.0"),
        (PRE_MANAGED_SCOPE, "runtime"),
        (MANAGED_SCOPE, "compile"),
    ]);
    let e = graph.add_child(d, DependencyNode::new(managed, Some(Dependency::new(Scope::Runtime))));
    graph.add_child(e, dep("f", "1.0", Scope::Compile));
    graph
}
