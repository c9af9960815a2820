use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::core::artifact::{Artifact, MANAGED_SCOPE, PRE_MANAGED_SCOPE, PRE_MANAGED_VERSION};
use crate::core::project::{ManagedDependency, Project};
use crate::graph::{DependencyGraph, NodeId};

/// Re-applies the project's dependency management to transitive nodes and
/// records what it changed in each artifact's property bag.
///
/// Direct dependencies of the root are never managed relative to themselves,
/// so only depth two and below is considered. A differing managed version
/// rewrites the artifact; a differing managed scope is only recorded, the
/// request-time scope on the edge stays as resolved.
pub fn apply_dependency_management(
    project: &Project,
    mut graph: DependencyGraph,
) -> DependencyGraph {
    let managed = management_map(&project.dependency_management);
    if managed.is_empty() {
        return graph;
    }

    let mut visited = HashSet::new();
    let root = graph.root();
    let direct: Vec<NodeId> = graph.children(root).to_vec();
    for child in direct {
        let transitive: Vec<NodeId> = graph.children(child).to_vec();
        for node in transitive {
            manage(&mut graph, node, &managed, &mut visited);
        }
    }
    graph
}

fn management_map(entries: &[ManagedDependency]) -> HashMap<String, &ManagedDependency> {
    entries
        .iter()
        .filter(|entry| entry.version.is_some())
        .map(|entry| (entry.key(), entry))
        .collect()
}

fn manage(
    graph: &mut DependencyGraph,
    id: NodeId,
    managed: &HashMap<String, &ManagedDependency>,
    visited: &mut HashSet<NodeId>,
) {
    if !visited.insert(id) {
        return;
    }

    if let Some(updated) = managed_artifact(graph, id, managed) {
        graph.node_mut(id).artifact = Some(updated);
    }

    let children: Vec<NodeId> = graph.children(id).to_vec();
    for child in children {
        manage(graph, child, managed, visited);
    }
}

fn managed_artifact(
    graph: &DependencyGraph,
    id: NodeId,
    managed: &HashMap<String, &ManagedDependency>,
) -> Option<Artifact> {
    let node = graph.node(id);
    let artifact = node.artifact.as_ref()?;
    let entry = managed.get(&artifact.coordinate().management_key())?;

    let mut updated = artifact.clone();
    if let Some(version) = entry.version.as_deref() {
        if version != artifact.version() {
            debug!(
                node = %artifact.coordinate(),
                managed = version,
                "applying managed version"
            );
            updated = updated
                .with_property(PRE_MANAGED_VERSION, artifact.version())
                .with_version(version);
        }
    }
    if let (Some(scope), Some(dependency)) = (entry.scope, node.dependency.as_ref()) {
        if scope != dependency.scope {
            updated = updated.with_properties([
                (PRE_MANAGED_SCOPE, dependency.scope.as_str()),
                (MANAGED_SCOPE, scope.as_str()),
            ]);
        }
    }
    Some(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::artifact::{Artifact, Coordinate};
    use crate::core::dependency::{Dependency, Scope};
    use crate::graph::DependencyNode;

    fn node(id: &str, version: &str, scope: Scope) -> DependencyNode {
        DependencyNode::new(
            Artifact::new(Coordinate::new("g", id, "jar", version)),
            Some(Dependency::new(scope)),
        )
    }

    fn managed(id: &str, version: Option<&str>, scope: Option<Scope>) -> ManagedDependency {
        ManagedDependency {
            group_id: "g".to_string(),
            artifact_id: id.to_string(),
            kind: "jar".to_string(),
            classifier: None,
            version: version.map(str::to_string),
            scope,
        }
    }

    fn project(entries: Vec<ManagedDependency>) -> Project {
        Project::new(Coordinate::new("g", "app", "jar", "1.0")).with_management(entries)
    }

    #[test]
    fn managed_version_rewrites_transitive_node() {
        let mut graph = DependencyGraph::new(DependencyNode::root(Artifact::new(
            Coordinate::new("g", "app", "jar", "1.0"),
        )));
        let d = graph.add_child(graph.root(), node("d", "1.0", Scope::Compile));
        let c = graph.add_child(d, node("c", "1.0", Scope::Compile));

        let graph = apply_dependency_management(
            &project(vec![managed("c", Some("3.0"), None)]),
            graph,
        );

        let artifact = graph.node(c).artifact.as_ref().expect("artifact");
        assert_eq!(artifact.version(), "3.0");
        assert_eq!(artifact.property(PRE_MANAGED_VERSION), Some("1.0"));
        assert!(!artifact.has_property(PRE_MANAGED_SCOPE));
    }

    #[test]
    fn direct_dependencies_are_not_managed() {
        let mut graph = DependencyGraph::new(DependencyNode::root(Artifact::new(
            Coordinate::new("g", "app", "jar", "1.0"),
        )));
        let c = graph.add_child(graph.root(), node("c", "1.0", Scope::Compile));

        let graph = apply_dependency_management(
            &project(vec![managed("c", Some("3.0"), Some(Scope::Runtime))]),
            graph,
        );

        let artifact = graph.node(c).artifact.as_ref().expect("artifact");
        assert_eq!(artifact.version(), "1.0");
        assert!(artifact.properties().is_empty());
    }

    #[test]
    fn managed_scope_is_recorded_but_not_applied() {
        let mut graph = DependencyGraph::new(DependencyNode::root(Artifact::new(
            Coordinate::new("g", "app", "jar", "1.0"),
        )));
        let d = graph.add_child(graph.root(), node("d", "1.0", Scope::Compile));
        let e = graph.add_child(d, node("e", "1.0", Scope::Compile));
        let c = graph.add_child(e, node("c", "2.0", Scope::Compile));

        let graph = apply_dependency_management(
            &project(vec![managed("c", Some("2.0"), Some(Scope::Provided))]),
            graph,
        );

        let node = graph.node(c);
        let artifact = node.artifact.as_ref().expect("artifact");
        assert_eq!(artifact.property(PRE_MANAGED_SCOPE), Some("compile"));
        assert_eq!(artifact.property(MANAGED_SCOPE), Some("provided"));
        assert!(!artifact.has_property(PRE_MANAGED_VERSION));
        assert_eq!(node.dependency.as_ref().map(|dep| dep.scope), Some(Scope::Compile));
        assert_eq!(node.coordinate_string().as_deref(), Some("g:c:jar:2.0:provided"));
    }

    #[test]
    fn entries_without_version_never_match() {
        let mut graph = DependencyGraph::new(DependencyNode::root(Artifact::new(
            Coordinate::new("g", "app", "jar", "1.0"),
        )));
        let d = graph.add_child(graph.root(), node("d", "1.0", Scope::Compile));
        let c = graph.add_child(d, node("c", "1.0", Scope::Compile));

        let graph = apply_dependency_management(
            &project(vec![managed("c", None, Some(Scope::Runtime))]),
            graph,
        );

        assert!(graph.node(c).artifact.as_ref().expect("artifact").properties().is_empty());
    }

    #[test]
    fn no_management_leaves_graph_untouched() {
        let mut graph = DependencyGraph::new(DependencyNode::root(Artifact::new(
            Coordinate::new("g", "app", "jar", "1.0"),
        )));
        let d = graph.add_child(graph.root(), node("d", "1.0", Scope::Compile));
        let c = graph.add_child(d, node("c", "1.0", Scope::Compile));

        let graph = apply_dependency_management(&project(Vec::new()), graph);

        assert_eq!(graph.children(d), &[c]);
        assert!(graph.node(c).artifact.as_ref().expect("artifact").properties().is_empty());
    }
}
