use std::path::PathBuf;

use serde::Deserialize;

use crate::config::ConfigError;
use crate::core::artifact::Coordinate;
use crate::core::dependency::Scope;
use crate::core::project::{ManagedDependency, Project, ReactorProject};
use crate::graph::viz::{OutputFormat, TreeTokens};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    pub project: ProjectSettings,
    #[serde(default)]
    pub dependency_management: Vec<ManagedEntry>,
    #[serde(default)]
    pub reactor: Vec<ReactorEntry>,
    #[serde(default)]
    pub tree: TreeSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectSettings {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default = "default_packaging")]
    pub packaging: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManagedEntry {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default = "default_packaging", rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub classifier: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReactorEntry {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeSettings {
    #[serde(default)]
    pub output_type: Option<String>,
    #[serde(default)]
    pub tokens: Option<String>,
    #[serde(default)]
    pub output_file: Option<PathBuf>,
    #[serde(default)]
    pub append_output: bool,
}

fn default_packaging() -> String {
    "jar".to_string()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl ManagedEntry {
    pub fn to_managed(&self) -> Result<ManagedDependency, ConfigError> {
        let scope = match non_empty(&self.scope) {
            Some(raw) => Some(raw.parse::<Scope>().map_err(|message| {
                ConfigError::InvalidValue {
                    field: format!(
                        "dependency_management.{}:{}.scope",
                        self.group_id, self.artifact_id
                    ),
                    message,
                }
            })?),
            None => None,
        };

        Ok(ManagedDependency {
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            kind: self.kind.clone(),
            classifier: non_empty(&self.classifier),
            version: non_empty(&self.version),
            scope,
        })
    }
}

impl ProjectConfig {
    pub fn to_project(&self) -> Result<Project, ConfigError> {
        let coordinate = Coordinate::new(
            &self.project.group_id,
            &self.project.artifact_id,
            &self.project.packaging,
            &self.project.version,
        );
        let managed = self
            .dependency_management
            .iter()
            .map(ManagedEntry::to_managed)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Project::new(coordinate).with_management(managed))
    }

    pub fn reactor_projects(&self) -> Vec<ReactorProject> {
        self.reactor
            .iter()
            .map(|entry| ReactorProject {
                group_id: entry.group_id.clone(),
                artifact_id: entry.artifact_id.clone(),
                version: entry.version.clone(),
            })
            .collect()
    }
}

impl TreeSettings {
    pub fn output_format(&self) -> Result<Option<OutputFormat>, ConfigError> {
        self.output_type
            .as_deref()
            .map(|raw| {
                raw.parse().map_err(|message| ConfigError::InvalidValue {
                    field: "tree.output_type".to_string(),
                    message,
                })
            })
            .transpose()
    }

    pub fn tree_tokens(&self) -> Result<Option<TreeTokens>, ConfigError> {
        self.tokens
            .as_deref()
            .map(|raw| {
                raw.parse().map_err(|message| ConfigError::InvalidValue {
                    field: "tree.tokens".to_string(),
                    message,
                })
            })
            .transpose()
    }
}
