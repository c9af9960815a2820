use std::collections::{HashSet, VecDeque};

use crate::graph::conflict::classify;
use crate::graph::viz::{edge_label, node_label, OutputFormat, VerboseSerializer};
use crate::graph::{DependencyGraph, NodeId};

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:y="http://www.yworks.com/xml/graphml" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">
  <key for="node" id="d0" yfiles.type="nodegraphics"/>
  <key for="edge" id="d1" yfiles.type="edgegraphics"/>
<graph id="dependencies" edgedefault="directed">
"#;

const FOOTER: &str = "</graph></graphml>\n";

/// GraphML with yEd node and edge labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphmlSerializer;

pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn node_element(id: NodeId, label: &str) -> String {
    format!(
        "<node id=\"{id}\"><data key=\"d0\"><y:ShapeNode><y:NodeLabel>{}</y:NodeLabel></y:ShapeNode></data></node>\n",
        escape_xml(label)
    )
}

fn edge_element(source: NodeId, target: NodeId, label: &str) -> String {
    format!(
        "<edge source=\"{source}\" target=\"{target}\"><data key=\"d1\"><y:PolyLineEdge><y:EdgeLabel>{}</y:EdgeLabel></y:PolyLineEdge></data></edge>\n",
        escape_xml(label)
    )
}

impl VerboseSerializer for GraphmlSerializer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Graphml
    }

    fn serialize(&self, graph: &DependencyGraph) -> String {
        let classification = classify(graph);
        let root = graph.root();
        let mut out = String::from(HEADER);
        out.push_str(&node_element(root, &node_label(graph, &classification, root)));

        let mut visited = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        while let Some(parent) = queue.pop_front() {
            for child in classification.effective_children(graph, parent) {
                if visited.insert(*child) {
                    out.push_str(&node_element(
                        *child,
                        &node_label(graph, &classification, *child),
                    ));
                    queue.push_back(*child);
                }
                out.push_str(&edge_element(parent, *child, &edge_label(graph, *child)));
            }
        }

        out.push_str(FOOTER);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::viz::fixtures::sample_graph;

    #[test]
    fn writes_nodes_before_their_edges() {
        let output = GraphmlSerializer.serialize(&sample_graph());
        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<graphml"));
        assert!(output.ends_with("</graph></graphml>\n"));
        assert!(output.contains(
            "<node id=\"0\"><data key=\"d0\"><y:ShapeNode><y:NodeLabel>g:app:jar:1.0</y:NodeLabel></y:ShapeNode></data></node>"
        ));
        assert!(output.contains(
            "<edge source=\"0\" target=\"1\"><data key=\"d1\"><y:PolyLineEdge><y:EdgeLabel>compile</y:EdgeLabel></y:PolyLineEdge></data></edge>"
        ));

        let node = output.find("<node id=\"7\">").unwrap_or(usize::MAX);
        let edge = output.find("target=\"7\"").unwrap_or(0);
        assert!(node < edge);
        assert_eq!(output.matches("<node ").count(), 8);
        assert_eq!(output.matches("<edge ").count(), 7);
    }

    #[test]
    fn omitted_labels_are_escaped() {
        assert_eq!(escape_xml("a<b>&'\""), "a&lt;b&gt;&amp;&apos;&quot;");
        let output = GraphmlSerializer.serialize(&sample_graph());
        assert!(output.contains(
            "<y:NodeLabel>g:c:jar:2.0:compile - omitted for conflict with 1.0</y:NodeLabel>"
        ));
    }
}
