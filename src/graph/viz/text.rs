use std::collections::HashSet;

use crate::graph::conflict::{classify, Classification};
use crate::graph::viz::{node_label, OutputFormat, TreeTokens, VerboseSerializer};
use crate::graph::{DependencyGraph, NodeId};

const SUBMODULE_WARNING: &str = " WARNING: this tree contains a submodule. Once it reaches the submodule will print in nonVerbose fashion, to see the actual submodule verbose output refer to the rest of the output";

/// Indented tree in the style of `mvn dependency:tree -Dverbose`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSerializer {
    tokens: TreeTokens,
}

impl TextSerializer {
    pub fn new(tokens: TreeTokens) -> Self {
        Self { tokens }
    }

    fn write_children(
        &self,
        graph: &DependencyGraph,
        classification: &Classification,
        parent: NodeId,
        indent: &str,
        on_path: &mut HashSet<NodeId>,
        out: &mut String,
    ) {
        let children = classification.effective_children(graph, parent);
        for (index, child) in children.iter().enumerate() {
            let is_last = index + 1 == children.len();
            out.push_str(indent);
            out.push_str(if is_last {
                self.tokens.last_node
            } else {
                self.tokens.node
            });

            let kept = classification.is_kept(*child);
            let label = node_label(graph, classification, *child);
            if kept || graph.node(*child).artifact.is_none() {
                out.push_str(&label);
            } else {
                out.push('(');
                out.push_str(&label);
                out.push(')');
            }
            out.push('\n');

            // Nodes past an aborted classification are unclassified, so
            // guard against walking back up the current path.
            if kept && on_path.insert(*child) {
                let fill = if is_last {
                    self.tokens.last_fill
                } else {
                    self.tokens.fill
                };
                let next = format!("{indent}{fill}");
                self.write_children(graph, classification, *child, &next, on_path, out);
                on_path.remove(child);
            }
        }
    }
}

impl VerboseSerializer for TextSerializer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn serialize(&self, graph: &DependencyGraph) -> String {
        let classification = classify(graph);
        let root = graph.root();
        let mut out = node_label(graph, &classification, root);
        if graph.contains_module() {
            out.push_str(SUBMODULE_WARNING);
        }
        out.push('\n');

        let mut on_path = HashSet::from([root]);
        self.write_children(graph, &classification, root, "", &mut on_path, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::artifact::{Artifact, Coordinate, CYCLE};
    use crate::core::dependency::Scope;
    use crate::graph::viz::fixtures::{dep, sample_graph};
    use crate::graph::{DependencyNode, CONTAINS_MODULE};

    #[test]
    fn renders_verbose_tree_with_standard_tokens() {
        let output = TextSerializer::default().serialize(&sample_graph());
        let expected = "\
g:app:jar:1.0
+- g:b:jar:1.0:compile
|  +- g:c:jar:1.0:compile
|  \\- (g:o:jar:1.0:compile - omitted due to optional dependency)
\\- g:d:jar:1.0:compile
   +- (g:c:jar:2.0:compile - omitted for conflict with 1.0)
   \\- g:e:jar:3.0:compile - version managed from 2.0; scope managed from runtime
      \\- g:f:jar:1.0:compile
";
        assert_eq!(output, expected);
    }

    #[test]
    fn renders_extended_tokens() {
        let output = TextSerializer::new(TreeTokens::EXTENDED).serialize(&sample_graph());
        assert!(output.contains("\u{251c}\u{2500} g:b:jar:1.0:compile\n"));
        assert!(output.contains("\u{2502}  \u{251c}\u{2500} g:c:jar:1.0:compile\n"));
        assert!(output.contains("   \u{2514}\u{2500} g:e:jar:3.0:compile"));
    }

    #[test]
    fn whitespace_tokens_indent_only() {
        let output = TextSerializer::new(TreeTokens::WHITESPACE).serialize(&sample_graph());
        assert!(output.lines().all(|line| !line.contains('|')));
        assert!(output.contains("\n         g:f:jar:1.0:compile\n"));
    }

    #[test]
    fn submodule_warning_is_appended_to_root_line() {
        let mut graph = sample_graph();
        graph.set_data(graph.root(), CONTAINS_MODULE, "True");
        let output = TextSerializer::default().serialize(&graph);
        let first = output.lines().next().unwrap_or_default();
        assert!(first.starts_with("g:app:jar:1.0 WARNING: this tree contains a submodule."));
    }

    #[test]
    fn cycle_nodes_are_not_expanded() {
        let mut graph = DependencyGraph::new(DependencyNode::root(Artifact::new(Coordinate::new(
            "g", "app", "jar", "1.0",
        ))));
        let root = graph.root();
        let b = graph.add_child(root, dep("b", "1.0", Scope::Compile));
        let c = graph.add_child(b, dep("c", "1.0", Scope::Compile));
        graph.link(c, b);

        let output = TextSerializer::default().serialize(&graph);
        assert_eq!(
            output,
            "g:app:jar:1.0\n\\- g:b:jar:1.0:compile\n   \\- (g:c:jar:1.0:compile - omitted for introducing a cycle with g:b:jar:1.0:compile)\n"
        );
    }

    #[test]
    fn null_artifact_is_printed_plainly() {
        let mut graph = DependencyGraph::new(DependencyNode::root(Artifact::new(Coordinate::new(
            "g", "app", "jar", "1.0",
        ))));
        let root = graph.root();
        graph.add_child(root, DependencyNode::null());
        let output = TextSerializer::default().serialize(&graph);
        assert_eq!(output, "g:app:jar:1.0\n\\- Null Artifact Node\n");
    }

    #[test]
    fn cycle_tag_does_not_change_label() {
        let mut graph = DependencyGraph::new(DependencyNode::root(Artifact::new(Coordinate::new(
            "g", "app", "jar", "1.0",
        ))));
        let root = graph.root();
        let tagged = dep("b", "1.0", Scope::Compile);
        let artifact = tagged
            .artifact
            .as_ref()
            .map(|artifact| artifact.with_property(CYCLE, "true"));
        let id = graph.add_child(root, tagged);
        graph.node_mut(id).artifact = artifact;

        let output = TextSerializer::default().serialize(&graph);
        assert_eq!(output, "g:app:jar:1.0\n\\- g:b:jar:1.0:compile\n");
    }
}
