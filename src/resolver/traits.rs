use crate::core::artifact::Coordinate;
use crate::core::project::Project;
use crate::graph::DependencyGraph;
use crate::resolver::session::ResolutionSession;

/// Resolution that could not complete. The partial graph, when the resolver
/// produced one, still reflects everything that did resolve.
#[derive(Debug, Clone)]
pub struct ResolutionFailure {
    pub unresolved: Vec<Coordinate>,
    pub partial: Option<DependencyGraph>,
}

pub trait DependencyResolver {
    fn id(&self) -> &'static str;
    fn resolve(
        &self,
        project: &Project,
        session: &ResolutionSession,
    ) -> Result<DependencyGraph, ResolutionFailure>;
}
