use std::collections::{HashSet, VecDeque};

use crate::graph::conflict::classify;
use crate::graph::viz::{node_label, OutputFormat, VerboseSerializer};
use crate::graph::DependencyGraph;

/// Graphviz digraph, one edge per parent/child pair in BFS order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotSerializer;

fn quoted(label: &str) -> String {
    format!("\"{}\"", label.replace('\\', "\\\\").replace('"', "\\\""))
}

impl VerboseSerializer for DotSerializer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Dot
    }

    fn serialize(&self, graph: &DependencyGraph) -> String {
        let classification = classify(graph);
        let root = graph.root();
        let mut out = format!(
            "digraph {} {{\n",
            quoted(&node_label(graph, &classification, root))
        );

        let mut visited = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        while let Some(parent) = queue.pop_front() {
            let parent_label = quoted(&node_label(graph, &classification, parent));
            for child in classification.effective_children(graph, parent) {
                out.push_str(&format!(
                    " {} -> {} ;\n",
                    parent_label,
                    quoted(&node_label(graph, &classification, *child))
                ));
                if visited.insert(*child) {
                    queue.push_back(*child);
                }
            }
        }

        out.push_str("}\n");
        out
    }
}
