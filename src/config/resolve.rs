use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, ProjectConfig};

pub const PROJECT_FILE: &str = "depgraph.toml";
pub const PROJECT_ENV: &str = "MVN_DEPGRAPH_PROJECT";

#[derive(Debug, Clone)]
pub struct ResolvedProject {
    pub root: PathBuf,
    pub config_path: PathBuf,
}

pub fn resolve_project_with_override(
    start: impl AsRef<Path>,
    config_path: Option<PathBuf>,
) -> Result<ResolvedProject, ConfigError> {
    if let Some(config) = config_path {
        return resolve_with_config(config);
    }

    if let Ok(path) = env::var(PROJECT_ENV) {
        return resolve_with_config(PathBuf::from(path));
    }

    find_project_from(start.as_ref())
}

pub fn load_project_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_with_config(config_path: PathBuf) -> Result<ResolvedProject, ConfigError> {
    if !config_path.is_file() {
        return Err(ConfigError::ConfigNotFound(config_path));
    }
    let root = config_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(ResolvedProject { root, config_path })
}

fn find_project_from(start: &Path) -> Result<ResolvedProject, ConfigError> {
    for ancestor in start.ancestors() {
        let config_path = ancestor.join(PROJECT_FILE);
        if config_path.is_file() {
            return Ok(ResolvedProject {
                root: ancestor.to_path_buf(),
                config_path,
            });
        }
    }

    Err(ConfigError::ProjectNotFound)
}
