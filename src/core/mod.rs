pub mod artifact;
pub mod dependency;
pub mod pattern;
pub mod project;

pub use artifact::{Artifact, Coordinate};
pub use dependency::{Dependency, Exclusion, Scope};
pub use pattern::CoordinatePattern;
pub use project::{ManagedDependency, Project, ReactorProject};
