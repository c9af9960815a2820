use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::artifact::{Artifact, Coordinate};
use crate::core::dependency::Scope;
use crate::core::project::{Project, ReactorProject};
use crate::graph::management::apply_dependency_management;
use crate::graph::{DependencyGraph, DependencyNode, NodeId, CONTAINS_MODULE};
use crate::resolver::{DependencyResolver, ResolutionFailure, ResolutionSession};

#[derive(Debug, Error)]
pub enum GraphBuildError {
    #[error("Could not resolve following dependencies: [{}]", join_coordinates(.unresolved))]
    Unresolved { unresolved: Vec<Coordinate> },
    #[error("dependency resolution for {0} produced no graph")]
    NoGraph(Coordinate),
}

fn join_coordinates(coordinates: &[Coordinate]) -> String {
    coordinates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the annotated tree a verbose serializer renders.
///
/// Resolution first runs in an isolated session that keeps every scope and
/// breaks cycles, then falls back to the caller's ambient session, then to
/// matching unresolved dependencies against the reactor. The resolved graph
/// is re-rooted on the project, transitive test dependencies are pruned and
/// dependency management is re-applied, in that order.
pub struct VerboseGraphBuilder<'a> {
    resolver: &'a dyn DependencyResolver,
    ambient: ResolutionSession,
    reactor: Option<&'a [ReactorProject]>,
}

impl<'a> VerboseGraphBuilder<'a> {
    pub fn new(resolver: &'a dyn DependencyResolver) -> Self {
        Self {
            resolver,
            ambient: ResolutionSession::default(),
            reactor: None,
        }
    }

    pub fn with_ambient_session(mut self, session: ResolutionSession) -> Self {
        self.ambient = session;
        self
    }

    pub fn with_reactor(mut self, reactor: &'a [ReactorProject]) -> Self {
        self.reactor = Some(reactor);
        self
    }

    pub fn build(&self, project: &Project) -> Result<DependencyGraph, GraphBuildError> {
        let (raw, contains_module) = self.resolve(project)?;
        let pruned = prune_transitive_test_dependencies(project, &raw);
        let mut graph = apply_dependency_management(project, pruned);
        if contains_module {
            let root = graph.root();
            graph.set_data(root, CONTAINS_MODULE, "True");
        }
        Ok(graph)
    }

    fn resolve(&self, project: &Project) -> Result<(DependencyGraph, bool), GraphBuildError> {
        let isolated = ResolutionSession::isolated();
        match self.resolver.resolve(project, &isolated) {
            Ok(graph) => return Ok((graph, false)),
            Err(failure) => debug!(
                project = %project.coordinate,
                unresolved = failure.unresolved.len(),
                "isolated resolution failed, retrying with ambient session"
            ),
        }

        match self.resolver.resolve(project, &self.ambient) {
            Ok(graph) => Ok((graph, false)),
            Err(failure) => self
                .resolve_from_reactor(project, failure)
                .map(|graph| (graph, true)),
        }
    }

    fn resolve_from_reactor(
        &self,
        project: &Project,
        failure: ResolutionFailure,
    ) -> Result<DependencyGraph, GraphBuildError> {
        let Some(reactor) = self.reactor else {
            return Err(GraphBuildError::Unresolved {
                unresolved: failure.unresolved,
            });
        };

        let modules: HashSet<String> = reactor.iter().map(ReactorProject::gav).collect();
        let (from_reactor, remaining): (Vec<Coordinate>, Vec<Coordinate>) = failure
            .unresolved
            .into_iter()
            .partition(|coordinate| modules.contains(&coordinate.gav()));

        for coordinate in &from_reactor {
            info!(dependency = %coordinate, "resolved from reactor module");
        }
        if !remaining.is_empty() {
            warn!(
                project = %project.coordinate,
                remaining = remaining.len(),
                "dependencies still unresolved after reactor lookup"
            );
            return Err(GraphBuildError::Unresolved {
                unresolved: remaining,
            });
        }

        failure
            .partial
            .ok_or_else(|| GraphBuildError::NoGraph(project.coordinate.clone()))
    }
}

/// Re-roots `raw` on the project and drops every test-scoped dependency below
/// the direct ones. Direct test dependencies stay. Shared handles stay shared.
pub fn prune_transitive_test_dependencies(
    project: &Project,
    raw: &DependencyGraph,
) -> DependencyGraph {
    let root = DependencyNode::root(Artifact::new(project.coordinate.clone()));
    let mut pruned = DependencyGraph::new(root);
    let mut copied: HashMap<NodeId, NodeId> = HashMap::new();
    copied.insert(raw.root(), pruned.root());

    let new_root = pruned.root();
    for child in raw.children(raw.root()) {
        copy_subtree(raw, *child, &mut pruned, new_root, &mut copied);
    }
    pruned
}

fn copy_subtree(
    raw: &DependencyGraph,
    id: NodeId,
    pruned: &mut DependencyGraph,
    parent: NodeId,
    copied: &mut HashMap<NodeId, NodeId>,
) {
    if let Some(existing) = copied.get(&id) {
        pruned.link(parent, *existing);
        return;
    }

    let source = raw.node(id);
    let copy = DependencyNode {
        artifact: source.artifact.clone(),
        dependency: source.dependency.clone(),
        data: source.data.clone(),
        ..DependencyNode::default()
    };
    let new_id = pruned.add_child(parent, copy);
    copied.insert(id, new_id);

    for child in raw.children(id) {
        let is_test = raw
            .node(*child)
            .dependency
            .as_ref()
            .is_some_and(|dep| dep.scope == Scope::Test);
        if is_test {
            continue;
        }
        copy_subtree(raw, *child, pruned, new_id, copied);
    }
}
