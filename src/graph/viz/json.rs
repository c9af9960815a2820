use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use crate::core::artifact::{PRE_MANAGED_SCOPE, PRE_MANAGED_VERSION};
use crate::graph::conflict::{classify, Classification};
use crate::graph::viz::{OutputFormat, VerboseSerializer};
use crate::graph::{DependencyGraph, NodeId};

/// Nested JSON tree mirroring the text output.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    classifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pre_managed_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pre_managed_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    omitted: Option<String>,
    children: Vec<JsonNode>,
}

fn build(
    graph: &DependencyGraph,
    classification: &Classification,
    id: NodeId,
    on_path: &mut HashSet<NodeId>,
) -> JsonNode {
    let node = graph.node(id);
    let artifact = node.artifact.as_ref();
    let property = |key: &str| {
        artifact
            .and_then(|artifact| artifact.property(key))
            .map(str::to_string)
    };

    let mut children = Vec::new();
    if on_path.insert(id) {
        for child in classification.effective_children(graph, id) {
            children.push(build(graph, classification, *child, on_path));
        }
        on_path.remove(&id);
    }

    JsonNode {
        group_id: artifact.map(|a| a.group_id().to_string()),
        artifact_id: artifact.map(|a| a.artifact_id().to_string()),
        kind: artifact.map(|a| a.extension().to_string()),
        version: artifact.map(|a| a.version().to_string()),
        classifier: artifact.and_then(|a| a.classifier()).map(str::to_string),
        scope: node.display_scope(),
        optional: node.is_optional(),
        pre_managed_version: property(PRE_MANAGED_VERSION),
        pre_managed_scope: property(PRE_MANAGED_SCOPE),
        omitted: classification.reason(id).map(|reason| reason.to_string()),
        children,
    }
}

impl VerboseSerializer for JsonSerializer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn serialize(&self, graph: &DependencyGraph) -> String {
        let classification = classify(graph);
        let tree = build(graph, &classification, graph.root(), &mut HashSet::new());
        match serde_json::to_string_pretty(&tree) {
            Ok(mut json) => {
                json.push('\n');
                json
            }
            Err(err) => {
                warn!(error = %err, "failed to serialize dependency tree as JSON");
                String::new()
            }
        }
    }
}
