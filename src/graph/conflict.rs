use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;

use tracing::{debug, warn};

use crate::core::dependency::Scope;
use crate::graph::{DependencyGraph, NodeId};

/// Why a node was left out of the mediated tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConflictReason {
    Duplicate,
    ScopeConflict(Scope),
    VersionConflict(String),
    Optional,
    Cycle(String),
    NullArtifact,
}

impl ConflictReason {
    pub fn kind(&self) -> &'static str {
        match self {
            ConflictReason::Duplicate => "duplicate",
            ConflictReason::ScopeConflict(_) => "scope-conflict",
            ConflictReason::VersionConflict(_) => "version-conflict",
            ConflictReason::Optional => "optional",
            ConflictReason::Cycle(_) => "cycle",
            ConflictReason::NullArtifact => "null-artifact",
        }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::Duplicate => f.write_str("omitted for duplicate"),
            ConflictReason::ScopeConflict(scope) => write!(f, "omitted for conflict with {scope}"),
            ConflictReason::VersionConflict(version) => {
                write!(f, "omitted for conflict with {version}")
            }
            ConflictReason::Optional => f.write_str("omitted due to optional dependency"),
            ConflictReason::Cycle(coordinate) => {
                write!(f, "omitted for introducing a cycle with {coordinate}")
            }
            ConflictReason::NullArtifact => f.write_str("Null Artifact Node"),
        }
    }
}

/// Result of one classification pass. Nodes without an entry are kept.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    reasons: HashMap<NodeId, ConflictReason>,
    order: Vec<NodeId>,
}

impl Classification {
    pub fn reason(&self, id: NodeId) -> Option<&ConflictReason> {
        self.reasons.get(&id)
    }

    pub fn is_kept(&self, id: NodeId) -> bool {
        !self.reasons.contains_key(&id)
    }

    /// Children a serializer may descend into. Omitted nodes, including the
    /// ones truncated for introducing a cycle, have none.
    pub fn effective_children<'g>(&self, graph: &'g DependencyGraph, id: NodeId) -> &'g [NodeId] {
        if self.is_kept(id) {
            graph.children(id)
        } else {
            &[]
        }
    }

    /// Nodes in the order they were dequeued.
    pub fn visit_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Omitted nodes in BFS order with their reasons.
    pub fn omitted(&self) -> impl Iterator<Item = (NodeId, &ConflictReason)> {
        self.order
            .iter()
            .filter_map(|id| self.reasons.get(id).map(|reason| (*id, reason)))
    }

    pub fn summary(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for reason in self.reasons.values() {
            *counts.entry(reason.kind()).or_insert(0) += 1;
        }
        counts
    }
}

/// Breadth-first nearest-wins classification of every reachable node.
///
/// The first occurrence of a `groupId:artifactId:type` reached by BFS wins;
/// later occurrences are flagged as duplicates, scope conflicts or version
/// conflicts in that priority. A version conflict needs a different version;
/// the same version under no scope, as on the root, is not one. A kept node
/// with any already queued child is flagged as introducing a cycle and none
/// of its children are enqueued, including siblings listed before that child.
pub fn classify(graph: &DependencyGraph) -> Classification {
    let mut classification = Classification::default();
    let mut seen_coordinates: HashSet<String> = HashSet::new();
    let mut version_by_key: HashMap<String, String> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue = VecDeque::new();

    visited.insert(graph.root());
    queue.push_back(graph.root());

    while let Some(id) = queue.pop_front() {
        classification.order.push(id);
        let node = graph.node(id);

        let Some(artifact) = node.artifact.as_ref() else {
            warn!(node = %id, "dependency node without artifact, aborting classification");
            classification.reasons.insert(id, ConflictReason::NullArtifact);
            break;
        };
        let coordinate = node.coordinate_string().unwrap_or_default();
        let versionless = artifact.coordinate().versionless();

        let reason = if seen_coordinates.contains(&coordinate) {
            Some(ConflictReason::Duplicate)
        } else if let Some(scope) = Scope::CONFLICT_PRIORITY.into_iter().find(|scope| {
            seen_coordinates.contains(&format!(
                "{}:{}:{}",
                versionless,
                artifact.version(),
                scope
            ))
        }) {
            Some(ConflictReason::ScopeConflict(scope))
        } else if let Some(version) = version_by_key
            .get(&versionless)
            .filter(|seen| seen.as_str() != artifact.version())
        {
            Some(ConflictReason::VersionConflict(version.clone()))
        } else if node.is_optional() {
            Some(ConflictReason::Optional)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                debug!(node = %coordinate, %reason, "node omitted");
                classification.reasons.insert(id, reason);
            }
            None => {
                version_by_key.insert(versionless, artifact.version().to_string());
                let children = graph.children(id);
                if let Some(repeated) = children.iter().find(|child| visited.contains(*child)) {
                    let with = graph
                        .node(*repeated)
                        .coordinate_string()
                        .unwrap_or_else(|| ConflictReason::NullArtifact.to_string());
                    classification
                        .reasons
                        .insert(id, ConflictReason::Cycle(with));
                } else {
                    for child in children {
                        if visited.insert(*child) {
                            queue.push_back(*child);
                        }
                    }
                }
            }
        }

        seen_coordinates.insert(coordinate);
    }

    classification
}
