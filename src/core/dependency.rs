use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::artifact::Coordinate;
use crate::core::pattern::CoordinatePattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
}

impl Scope {
    /// Order in which a same-version scope conflict picks its message.
    pub const CONFLICT_PRIORITY: [Scope; 5] = [
        Scope::Compile,
        Scope::Provided,
        Scope::Runtime,
        Scope::Test,
        Scope::System,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::System => "system",
            Scope::Import => "import",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "compile" | "" => Ok(Scope::Compile),
            "provided" => Ok(Scope::Provided),
            "runtime" => Ok(Scope::Runtime),
            "test" => Ok(Scope::Test),
            "system" => Ok(Scope::System),
            "import" => Ok(Scope::Import),
            other => Err(format!("unknown dependency scope '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

impl Exclusion {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        CoordinatePattern::from_segments(&[&self.group_id, &self.artifact_id])
            .map(|pattern| pattern.matches(coordinate))
            .unwrap_or(false)
    }
}

/// Request-time view of a dependency edge, distinct from the artifact's
/// mediated state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependency {
    pub scope: Scope,
    pub optional: bool,
    pub exclusions: Vec<Exclusion>,
}

impl Dependency {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<Exclusion>) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn excludes(&self, coordinate: &Coordinate) -> bool {
        self.exclusions
            .iter()
            .any(|exclusion| exclusion.matches(coordinate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parses_case_insensitively() {
        assert_eq!("Runtime".parse::<Scope>(), Ok(Scope::Runtime));
        assert_eq!("".parse::<Scope>(), Ok(Scope::Compile));
        assert!("bogus".parse::<Scope>().is_err());
    }

    #[test]
    fn exclusion_wildcards_match_any_segment() {
        let coordinate = Coordinate::new("org.slf4j", "slf4j-api", "jar", "2.0.9");
        assert!(Exclusion::new("org.slf4j", "slf4j-api").matches(&coordinate));
        assert!(Exclusion::new("org.slf4j", "*").matches(&coordinate));
        assert!(Exclusion::new("*", "*").matches(&coordinate));
        assert!(!Exclusion::new("org.slf4j", "slf4j-simple").matches(&coordinate));
    }

    #[test]
    fn dependency_excludes_through_any_of_its_exclusions() {
        let dependency = Dependency::new(Scope::Compile).with_exclusions(vec![
            Exclusion::new("org.slf4j", "slf4j-simple"),
            Exclusion::new("commons-logging", "*"),
        ]);

        let logging = Coordinate::new("commons-logging", "commons-logging", "jar", "1.2");
        assert!(dependency.excludes(&logging));
        assert!(!dependency.excludes(&Coordinate::new("org.slf4j", "slf4j-api", "jar", "2.0.9")));
        assert!(!Dependency::new(Scope::Compile).excludes(&Coordinate::new("g", "a", "jar", "1")));
    }
}
