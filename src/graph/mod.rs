use std::collections::BTreeMap;
use std::fmt;

use crate::core::artifact::{Artifact, MANAGED_SCOPE};
use crate::core::dependency::Dependency;

pub mod builder;
pub mod conflict;
pub mod cycle;
pub mod management;
pub mod ops;
pub mod viz;

/// Marker stored in a root's `data` bag when part of the tree was satisfied
/// by modules of the current reactor build.
pub const CONTAINS_MODULE: &str = "ContainsModule";

/// Handle into a [`DependencyGraph`] arena. Identity, not structure: two
/// handles are equal only when they name the same node occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DependencyNode {
    pub artifact: Option<Artifact>,
    pub dependency: Option<Dependency>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: BTreeMap<String, String>,
}

impl DependencyNode {
    pub fn new(artifact: Artifact, dependency: Option<Dependency>) -> Self {
        Self {
            artifact: Some(artifact),
            dependency,
            ..Self::default()
        }
    }

    pub fn root(artifact: Artifact) -> Self {
        Self::new(artifact, None)
    }

    /// A node that lost its artifact; only produced by malformed input.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_optional(&self) -> bool {
        self.dependency.as_ref().is_some_and(|dep| dep.optional)
    }

    /// Scope used when printing: the managed scope if one was recorded,
    /// otherwise the request-time scope. Roots have none.
    pub fn display_scope(&self) -> Option<String> {
        let dependency = self.dependency.as_ref()?;
        if let Some(managed) = self
            .artifact
            .as_ref()
            .and_then(|artifact| artifact.property(MANAGED_SCOPE))
        {
            return Some(managed.to_string());
        }
        Some(dependency.scope.as_str().to_string())
    }

    /// `groupId:artifactId:extension:version[:scope]`.
    pub fn coordinate_string(&self) -> Option<String> {
        let artifact = self.artifact.as_ref()?;
        let mut coords = format!(
            "{}:{}:{}:{}",
            artifact.group_id(),
            artifact.artifact_id(),
            artifact.extension(),
            artifact.version()
        );
        if let Some(scope) = self.display_scope().filter(|scope| !scope.is_empty()) {
            coords.push(':');
            coords.push_str(&scope);
        }
        Some(coords)
    }
}

/// Arena of dependency nodes with a single designated root.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<DependencyNode>,
    root: NodeId,
}

impl DependencyGraph {
    pub fn new(root: DependencyNode) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Arena size, including nodes no longer reachable from the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &DependencyNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut DependencyNode {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Allocates a detached node. It becomes reachable once linked.
    pub fn add_node(&mut self, node: DependencyNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Allocates `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: DependencyNode) -> NodeId {
        node.parent = Some(parent);
        let id = self.add_node(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Appends an existing node to `parent`'s children. The node's parent
    /// back-reference is only set if it had none, so aliased nodes keep the
    /// parent they were created under.
    pub fn link(&mut self, parent: NodeId, child: NodeId) {
        if self.nodes[child.0].parent.is_none() && child != self.root {
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[parent.0].children.push(child);
    }

    pub fn set_data(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        self.nodes[id.0].data.insert(key.into(), value.into());
    }

    pub fn contains_module(&self) -> bool {
        self.node(self.root).data.contains_key(CONTAINS_MODULE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::artifact::{Coordinate, MANAGED_SCOPE};
    use crate::core::dependency::Scope;

    fn artifact(id: &str, version: &str) -> Artifact {
        Artifact::new(Coordinate::new("g", id, "jar", version))
    }

    #[test]
    fn coordinate_string_omits_scope_for_root() {
        let mut graph = DependencyGraph::new(DependencyNode::root(artifact("app", "1.0")));
        let child = graph.add_child(
            graph.root(),
            DependencyNode::new(artifact("lib", "2.0"), Some(Dependency::new(Scope::Runtime))),
        );

        assert_eq!(
            graph.node(graph.root()).coordinate_string().as_deref(),
            Some("g:app:jar:1.0")
        );
        assert_eq!(
            graph.node(child).coordinate_string().as_deref(),
            Some("g:lib:jar:2.0:runtime")
        );
        assert_eq!(graph.node(child).parent, Some(graph.root()));
    }

    #[test]
    fn managed_scope_wins_in_coordinate_string() {
        let mut graph = DependencyGraph::new(DependencyNode::root(artifact("app", "1.0")));
        let child = graph.add_child(
            graph.root(),
            DependencyNode::new(
                artifact("lib", "2.0").with_property(MANAGED_SCOPE, "provided"),
                Some(Dependency::new(Scope::Compile)),
            ),
        );
        assert_eq!(
            graph.node(child).coordinate_string().as_deref(),
            Some("g:lib:jar:2.0:provided")
        );
    }

    #[test]
    fn link_keeps_first_parent() {
        let mut graph = DependencyGraph::new(DependencyNode::root(artifact("app", "1.0")));
        let left = graph.add_child(graph.root(), DependencyNode::new(artifact("l", "1"), None));
        let right = graph.add_child(graph.root(), DependencyNode::new(artifact("r", "1"), None));
        let shared = graph.add_child(left, DependencyNode::new(artifact("s", "1"), None));
        graph.link(right, shared);

        assert_eq!(graph.node(shared).parent, Some(left));
        assert_eq!(graph.children(right), &[shared]);
    }

    #[test]
    fn null_node_has_no_coordinate() {
        assert_eq!(DependencyNode::null().coordinate_string(), None);
    }
}
