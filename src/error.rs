use thiserror::Error;

use crate::config::ConfigError;
use crate::graph::builder::GraphBuildError;
use crate::resolver::ResolverError;

#[derive(Debug, Error)]
pub enum DepgraphError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("resolver error: {0}")]
    Resolver(#[from] ResolverError),
    #[error("{0}")]
    Build(#[from] GraphBuildError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DepgraphError>;
