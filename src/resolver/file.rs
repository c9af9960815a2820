use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::core::artifact::{Artifact, Coordinate};
use crate::core::dependency::{Dependency, Exclusion, Scope};
use crate::core::project::Project;
use crate::graph::{DependencyGraph, DependencyNode, NodeId};
use crate::resolver::session::ResolutionSession;
use crate::resolver::traits::{DependencyResolver, ResolutionFailure};
use crate::resolver::ResolverError;

fn default_kind() -> String {
    "jar".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolutionDocument {
    root: NodeSpec,
    #[serde(default)]
    unresolved: Vec<Coordinate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeSpec {
    #[serde(default)]
    id: Option<String>,
    group_id: String,
    artifact_id: String,
    #[serde(default = "default_kind", rename = "type", alias = "extension")]
    kind: String,
    version: String,
    #[serde(default)]
    classifier: Option<String>,
    #[serde(default)]
    scope: Scope,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    exclusions: Vec<Exclusion>,
    #[serde(default)]
    children: Vec<ChildSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ChildSpec {
    Ref {
        #[serde(rename = "ref")]
        target: String,
    },
    Node(NodeSpec),
}

impl NodeSpec {
    fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id, &self.kind, &self.version)
            .with_classifier(self.classifier.clone().unwrap_or_default())
    }

    fn dependency(&self) -> Dependency {
        Dependency::new(self.scope)
            .optional(self.optional)
            .with_exclusions(self.exclusions.clone())
    }

    /// Follows child positions down from this node. Only inline children
    /// are walked; a `ref` never sits on an indexed path.
    fn descendant(&self, path: &[usize]) -> Option<&NodeSpec> {
        path.iter()
            .try_fold(self, |spec, idx| match spec.children.get(*idx)? {
                ChildSpec::Node(node) => Some(node),
                ChildSpec::Ref { .. } => None,
            })
    }
}

/// Resolver backed by an already-resolved graph document (JSON).
///
/// Nodes may declare an `id`; a child written as `{"ref": "<id>"}` points at
/// that same node occurrence, which is how shared subtrees and cycles are
/// expressed. The session's selector is applied while the arena is built and
/// its transformers run afterwards.
#[derive(Debug, Clone)]
pub struct FileResolver {
    document: ResolutionDocument,
    /// Declared `id` to the child positions leading to it from the root.
    ids: HashMap<String, Vec<usize>>,
}

impl FileResolver {
    pub fn from_path(path: &Path) -> Result<Self, ResolverError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ResolverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = serde_json::from_str(&contents).map_err(|source| ResolverError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_document(document)
    }

    pub fn from_json(contents: &str) -> Result<Self, ResolverError> {
        let document = serde_json::from_str(contents).map_err(ResolverError::Parse)?;
        Self::from_document(document)
    }

    fn from_document(document: ResolutionDocument) -> Result<Self, ResolverError> {
        let mut ids = HashMap::new();
        index_ids(&document.root, &mut Vec::new(), &mut ids)?;
        check_refs(&document.root, &ids)?;
        Ok(Self { document, ids })
    }
}

fn index_ids(
    spec: &NodeSpec,
    path: &mut Vec<usize>,
    ids: &mut HashMap<String, Vec<usize>>,
) -> Result<(), ResolverError> {
    if let Some(id) = spec.id.as_deref() {
        if ids.insert(id.to_string(), path.clone()).is_some() {
            return Err(ResolverError::DuplicateId(id.to_string()));
        }
    }
    for (idx, child) in spec.children.iter().enumerate() {
        if let ChildSpec::Node(node) = child {
            path.push(idx);
            index_ids(node, path, ids)?;
            path.pop();
        }
    }
    Ok(())
}

fn check_refs(spec: &NodeSpec, ids: &HashMap<String, Vec<usize>>) -> Result<(), ResolverError> {
    for child in &spec.children {
        match child {
            ChildSpec::Ref { target } if !ids.contains_key(target.as_str()) => {
                return Err(ResolverError::UnknownReference(target.clone()));
            }
            ChildSpec::Ref { .. } => {}
            ChildSpec::Node(node) => check_refs(node, ids)?,
        }
    }
    Ok(())
}

struct Collector<'a> {
    session: &'a ResolutionSession,
    root: &'a NodeSpec,
    ids: &'a HashMap<String, Vec<usize>>,
    materialized: HashMap<&'a str, NodeId>,
    graph: DependencyGraph,
}

impl<'a> Collector<'a> {
    fn collect_children(
        &mut self,
        parent: NodeId,
        spec: &'a NodeSpec,
        depth: usize,
        ancestors: &mut Vec<Dependency>,
    ) {
        for child in &spec.children {
            let child_spec = match child {
                ChildSpec::Node(node) => node,
                ChildSpec::Ref { target } => {
                    let root = self.root;
                    match self
                        .ids
                        .get(target.as_str())
                        .and_then(|path| root.descendant(path))
                    {
                        Some(node) => node,
                        None => continue,
                    }
                }
            };
            let coordinate = child_spec.coordinate();
            let dependency = child_spec.dependency();
            if !self
                .session
                .selector
                .selects(depth, &coordinate, &dependency, ancestors)
            {
                debug!(node = %coordinate, depth, "dependency not selected");
                continue;
            }

            if let Some(existing) = child_spec
                .id
                .as_deref()
                .and_then(|id| self.materialized.get(id))
            {
                self.graph.link(parent, *existing);
                continue;
            }

            let node = DependencyNode::new(Artifact::new(coordinate), Some(dependency.clone()));
            let id = self.graph.add_child(parent, node);
            if let Some(key) = child_spec.id.as_deref() {
                self.materialized.insert(key, id);
            }

            ancestors.push(dependency);
            self.collect_children(id, child_spec, depth + 1, ancestors);
            ancestors.pop();
        }
    }
}

impl DependencyResolver for FileResolver {
    fn id(&self) -> &'static str {
        "file"
    }

    fn resolve(
        &self,
        project: &Project,
        session: &ResolutionSession,
    ) -> Result<DependencyGraph, ResolutionFailure> {
        let root_spec = &self.document.root;
        let root = DependencyNode::root(Artifact::new(root_spec.coordinate()));
        let mut collector = Collector {
            session,
            root: root_spec,
            ids: &self.ids,
            materialized: HashMap::new(),
            graph: DependencyGraph::new(root),
        };
        let root_id = collector.graph.root();
        if let Some(key) = root_spec.id.as_deref() {
            collector.materialized.insert(key, root_id);
        }
        collector.collect_children(root_id, root_spec, 1, &mut Vec::new());

        let graph = session.transform(collector.graph);
        debug!(
            project = %project.coordinate,
            resolver = self.id(),
            nodes = graph.node_count(),
            "collected dependency graph"
        );

        if self.document.unresolved.is_empty() {
            Ok(graph)
        } else {
            Err(ResolutionFailure {
                unresolved: self.document.unresolved.clone(),
                partial: Some(graph),
            })
        }
    }
}
