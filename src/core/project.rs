use crate::core::artifact::{management_key, Coordinate};
use crate::core::dependency::Scope;

/// The project whose dependency tree is being rendered.
#[derive(Debug, Clone)]
pub struct Project {
    pub coordinate: Coordinate,
    pub dependency_management: Vec<ManagedDependency>,
}

impl Project {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            dependency_management: Vec::new(),
        }
    }

    pub fn with_management(mut self, managed: Vec<ManagedDependency>) -> Self {
        self.dependency_management = managed;
        self
    }
}

/// One `<dependencyManagement>` entry. Version and scope are optional because
/// the model is lenient about both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub kind: String,
    pub classifier: Option<String>,
    pub version: Option<String>,
    pub scope: Option<Scope>,
}

impl ManagedDependency {
    pub fn key(&self) -> String {
        management_key(
            &self.group_id,
            &self.artifact_id,
            &self.kind,
            self.classifier.as_deref(),
        )
    }
}

/// A module built in the same session, identified by `groupId:artifactId:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReactorProject {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ReactorProject {
    pub fn gav(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
