pub mod project;
pub mod resolve;

pub use project::{ManagedEntry, ProjectConfig, ProjectSettings, ReactorEntry, TreeSettings};
pub use resolve::{load_project_config, resolve_project_with_override};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no depgraph.toml found in this directory or any parent")]
    ProjectNotFound,
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
