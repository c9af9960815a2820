use std::fmt;
use std::str::FromStr;

use crate::core::artifact::{PRE_MANAGED_SCOPE, PRE_MANAGED_VERSION};
use crate::graph::conflict::{Classification, ConflictReason};
use crate::graph::{DependencyGraph, NodeId};

pub mod dot;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod graphml;
pub mod json;
pub mod text;
pub mod tgf;

pub use dot::DotSerializer;
pub use graphml::GraphmlSerializer;
pub use json::JsonSerializer;
pub use text::TextSerializer;
pub use tgf::TgfSerializer;

pub trait VerboseSerializer {
    fn format(&self) -> OutputFormat;
    fn serialize(&self, graph: &DependencyGraph) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Dot,
    Graphml,
    Tgf,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "text" | "tree" => Ok(OutputFormat::Text),
            "dot" => Ok(OutputFormat::Dot),
            "graphml" => Ok(OutputFormat::Graphml),
            "tgf" => Ok(OutputFormat::Tgf),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output type '{other}'")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Dot => "dot",
            OutputFormat::Graphml => "graphml",
            OutputFormat::Tgf => "tgf",
            OutputFormat::Json => "json",
        })
    }
}

/// Glyphs used to draw the text tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeTokens {
    pub node: &'static str,
    pub last_node: &'static str,
    pub fill: &'static str,
    pub last_fill: &'static str,
}

impl TreeTokens {
    pub const STANDARD: TreeTokens = TreeTokens {
        node: "+- ",
        last_node: "\\- ",
        fill: "|  ",
        last_fill: "   ",
    };
    pub const WHITESPACE: TreeTokens = TreeTokens {
        node: "   ",
        last_node: "   ",
        fill: "   ",
        last_fill: "   ",
    };
    pub const EXTENDED: TreeTokens = TreeTokens {
        node: "\u{251c}\u{2500} ",
        last_node: "\u{2514}\u{2500} ",
        fill: "\u{2502}  ",
        last_fill: "   ",
    };
}

impl Default for TreeTokens {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl FromStr for TreeTokens {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "standard" => Ok(TreeTokens::STANDARD),
            "whitespace" => Ok(TreeTokens::WHITESPACE),
            "extended" => Ok(TreeTokens::EXTENDED),
            other => Err(format!("unknown tree tokens '{other}'")),
        }
    }
}

pub fn serializer_for(format: OutputFormat, tokens: TreeTokens) -> Box<dyn VerboseSerializer> {
    match format {
        OutputFormat::Text => Box::new(TextSerializer::new(tokens)),
        OutputFormat::Dot => Box::new(DotSerializer),
        OutputFormat::Graphml => Box::new(GraphmlSerializer),
        OutputFormat::Tgf => Box::new(TgfSerializer),
        OutputFormat::Json => Box::new(JsonSerializer),
    }
}

/// Coordinate plus any management annotations, and whether an annotation
/// was written.
pub(crate) fn annotated_coordinate(graph: &DependencyGraph, id: NodeId) -> (String, bool) {
    let node = graph.node(id);
    let Some(artifact) = node.artifact.as_ref() else {
        return (ConflictReason::NullArtifact.to_string(), false);
    };

    let mut coords = node.coordinate_string().unwrap_or_default();
    let mut annotated = false;
    if let Some(version) = artifact.property(PRE_MANAGED_VERSION) {
        coords.push_str(" - version managed from ");
        coords.push_str(version);
        annotated = true;
    }
    if let Some(scope) = artifact.property(PRE_MANAGED_SCOPE) {
        coords.push_str(if annotated { "; " } else { " - " });
        coords.push_str("scope managed from ");
        coords.push_str(scope);
        annotated = true;
    }
    (coords, annotated)
}

/// Annotated coordinate with the omission reason appended, unwrapped.
pub(crate) fn node_label(
    graph: &DependencyGraph,
    classification: &Classification,
    id: NodeId,
) -> String {
    if graph.node(id).artifact.is_none() {
        return ConflictReason::NullArtifact.to_string();
    }
    let (mut label, annotated) = annotated_coordinate(graph, id);
    if let Some(reason) = classification.reason(id) {
        label.push_str(if annotated { "; " } else { " - " });
        label.push_str(&reason.to_string());
    }
    label
}

/// Edge label used by formats that annotate relations: the child's scope.
pub(crate) fn edge_label(graph: &DependencyGraph, id: NodeId) -> String {
    graph.node(id).display_scope().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parses_known_names() {
        assert_eq!("GraphML".parse::<OutputFormat>(), Ok(OutputFormat::Graphml));
        assert_eq!("tree".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("svg".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn serializer_for_matches_format() {
        for format in [
            OutputFormat::Text,
            OutputFormat::Dot,
            OutputFormat::Graphml,
            OutputFormat::Tgf,
            OutputFormat::Json,
        ] {
            assert_eq!(serializer_for(format, TreeTokens::default()).format(), format);
        }
    }

    #[test]
    fn formats_agree_on_omitted_nodes() {
        let graph = fixtures::sample_graph();
        let classification = crate::graph::conflict::classify(&graph);
        let labels: Vec<String> = classification
            .omitted()
            .map(|(id, _)| node_label(&graph, &classification, id))
            .collect();
        assert_eq!(labels.len(), 2);

        for format in [OutputFormat::Text, OutputFormat::Dot, OutputFormat::Tgf] {
            let output = serializer_for(format, TreeTokens::default()).serialize(&graph);
            for label in &labels {
                assert_eq!(output.matches(label.as_str()).count(), 1, "{format}: {label}");
            }
            assert!(output.contains("g:f:jar:1.0:compile"), "{format}");
        }
    }
}
