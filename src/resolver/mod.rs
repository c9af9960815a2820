pub mod file;
pub mod session;
pub mod traits;

pub use file::FileResolver;
pub use session::{DependencySelector, ResolutionSession};
pub use traits::{DependencyResolver, ResolutionFailure};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("failed to read resolution document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse resolution document at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse resolution document: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("unknown node reference '{0}'")]
    UnknownReference(String),
    #[error("duplicate node id '{0}'")]
    DuplicateId(String),
}
