use std::collections::{HashSet, VecDeque};

use crate::graph::conflict::classify;
use crate::graph::viz::{edge_label, node_label, OutputFormat, VerboseSerializer};
use crate::graph::DependencyGraph;

/// Trivial Graph Format: node lines, a `#` separator, then edge lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TgfSerializer;

impl VerboseSerializer for TgfSerializer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Tgf
    }

    fn serialize(&self, graph: &DependencyGraph) -> String {
        let classification = classify(graph);
        let root = graph.root();
        let mut nodes = format!("{} {}\n", root, node_label(graph, &classification, root));
        let mut edges = String::new();

        let mut visited = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        while let Some(parent) = queue.pop_front() {
            for child in classification.effective_children(graph, parent) {
                if visited.insert(*child) {
                    nodes.push_str(&format!(
                        "{} {}\n",
                        child,
                        node_label(graph, &classification, *child)
                    ));
                    queue.push_back(*child);
                }
                edges.push_str(&format!(
                    "{} {} {}\n",
                    parent,
                    child,
                    edge_label(graph, *child)
                ));
            }
        }

        nodes.push_str("#\n");
        nodes.push_str(&edges);
        nodes
    }
}
