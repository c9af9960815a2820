use crate::core::artifact::Coordinate;
use crate::core::dependency::{Dependency, Scope};
use crate::graph::cycle::break_cycles;
use crate::graph::DependencyGraph;

/// Decides which dependencies are collected while walking the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySelector {
    pub excluded_transitive_scopes: Vec<Scope>,
    pub exclude_transitive_optional: bool,
    pub honor_exclusions: bool,
}

impl DependencySelector {
    /// Keeps every scope and optional edge so the verbose tree can report
    /// them, but still honors explicit exclusions.
    pub fn verbose() -> Self {
        Self {
            excluded_transitive_scopes: Vec::new(),
            exclude_transitive_optional: false,
            honor_exclusions: true,
        }
    }

    /// `depth` is 1 for the project's direct dependencies. `ancestors` are the
    /// edges walked to reach this one; their exclusions apply to it.
    pub fn selects(
        &self,
        depth: usize,
        coordinate: &Coordinate,
        dependency: &Dependency,
        ancestors: &[Dependency],
    ) -> bool {
        if self.honor_exclusions && ancestors.iter().any(|edge| edge.excludes(coordinate)) {
            return false;
        }
        if depth < 2 {
            return true;
        }
        if self.excluded_transitive_scopes.contains(&dependency.scope) {
            return false;
        }
        !(self.exclude_transitive_optional && dependency.optional)
    }
}

impl Default for DependencySelector {
    fn default() -> Self {
        Self {
            excluded_transitive_scopes: vec![Scope::Test, Scope::Provided],
            exclude_transitive_optional: true,
            honor_exclusions: true,
        }
    }
}

/// Settings a resolver runs under. The default mirrors a plain build
/// session; [`ResolutionSession::isolated`] is the one used for verbose trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSession {
    pub selector: DependencySelector,
    pub break_cycles: bool,
}

impl ResolutionSession {
    pub fn isolated() -> Self {
        Self {
            selector: DependencySelector::verbose(),
            break_cycles: true,
        }
    }

    /// Graph transformers configured for this session, run by the resolver
    /// once collection is done.
    pub fn transform(&self, graph: DependencyGraph) -> DependencyGraph {
        if self.break_cycles {
            break_cycles(graph)
        } else {
            graph
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dependency::Exclusion;

    fn coordinate(id: &str) -> Coordinate {
        Coordinate::new("g", id, "jar", "1.0")
    }

    #[test]
    fn default_selector_drops_transitive_test_and_optional() {
        let selector = DependencySelector::default();
        let test = Dependency::new(Scope::Test);
        let optional = Dependency::new(Scope::Compile).optional(true);

        assert!(selector.selects(1, &coordinate("t"), &test, &[]));
        assert!(!selector.selects(2, &coordinate("t"), &test, &[]));
        assert!(selector.selects(1, &coordinate("o"), &optional, &[]));
        assert!(!selector.selects(3, &coordinate("o"), &optional, &[]));
    }

    #[test]
    fn verbose_selector_only_honors_exclusions() {
        let selector = DependencySelector::verbose();
        let test = Dependency::new(Scope::Test);
        let ancestors = [
            Dependency::new(Scope::Compile),
            Dependency::new(Scope::Compile).with_exclusions(vec![Exclusion::new("g", "x")]),
        ];

        assert!(selector.selects(4, &coordinate("t"), &test, &ancestors));
        assert!(!selector.selects(3, &coordinate("x"), &test, &ancestors));
        assert!(selector.selects(1, &coordinate("x"), &test, &ancestors[..1]));
    }

    #[test]
    fn exclusions_are_ignored_when_not_honored() {
        let selector = DependencySelector {
            honor_exclusions: false,
            ..DependencySelector::verbose()
        };
        let ancestors =
            [Dependency::new(Scope::Compile).with_exclusions(vec![Exclusion::new("*", "*")])];
        let dependency = Dependency::new(Scope::Compile);

        assert!(selector.selects(2, &coordinate("x"), &dependency, &ancestors));
    }
}
