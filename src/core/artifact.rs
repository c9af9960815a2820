use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const PRE_MANAGED_VERSION: &str = "preManagedVersion";
pub const PRE_MANAGED_SCOPE: &str = "preManagedScope";
pub const MANAGED_SCOPE: &str = "managedScope";
pub const CYCLE: &str = "Cycle";

fn default_extension() -> String {
    "jar".to_string()
}

/// Identity of an artifact: `groupId:artifactId:extension[:classifier]:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default = "default_extension", alias = "type")]
    pub extension: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

impl Coordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        extension: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            extension: extension.into(),
            version: version.into(),
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        let classifier = classifier.into();
        self.classifier = if classifier.is_empty() {
            None
        } else {
            Some(classifier)
        };
        self
    }

    /// `groupId:artifactId:version`, the key reactor projects are matched on.
    pub fn gav(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    /// `groupId:artifactId:extension`, ignoring version and scope.
    pub fn versionless(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.extension)
    }

    /// Key used to look up dependency-management entries.
    pub fn management_key(&self) -> String {
        management_key(
            &self.group_id,
            &self.artifact_id,
            &self.extension,
            self.classifier.as_deref(),
        )
    }
}

pub fn management_key(
    group_id: &str,
    artifact_id: &str,
    extension: &str,
    classifier: Option<&str>,
) -> String {
    match classifier.filter(|c| !c.is_empty()) {
        Some(classifier) => format!("{group_id}:{artifact_id}:{extension}:{classifier}"),
        None => format!("{group_id}:{artifact_id}:{extension}"),
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.extension)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        write!(f, ":{}", self.version)
    }
}

/// An artifact value. Treated as immutable: every mutation returns a new
/// artifact with the property bag merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    coordinate: Coordinate,
    properties: BTreeMap<String, String>,
}

impl Artifact {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            properties: BTreeMap::new(),
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn group_id(&self) -> &str {
        &self.coordinate.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.coordinate.artifact_id
    }

    pub fn extension(&self) -> &str {
        &self.coordinate.extension
    }

    pub fn version(&self) -> &str {
        &self.coordinate.version
    }

    pub fn classifier(&self) -> Option<&str> {
        self.coordinate.classifier.as_deref()
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn with_version(&self, version: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.coordinate.version = version.into();
        next
    }

    pub fn with_property(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.properties.insert(key.into(), value.into());
        next
    }

    pub fn with_properties<I, K, V>(&self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut next = self.clone();
        next.properties.extend(
            properties
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn management_key_omits_empty_classifier() {
        let plain = Coordinate::new("g", "a", "jar", "1.0");
        assert_eq!(plain.management_key(), "g:a:jar");

        let empty = Coordinate::new("g", "a", "jar", "1.0").with_classifier("");
        assert_eq!(empty.classifier, None);
        assert_eq!(empty.management_key(), "g:a:jar");

        let tests = Coordinate::new("g", "a", "jar", "1.0").with_classifier("tests");
        assert_eq!(tests.management_key(), "g:a:jar:tests");
        assert_eq!(tests.to_string(), "g:a:jar:tests:1.0");
    }

    #[test]
    fn property_updates_copy_on_write() {
        let original = Artifact::new(Coordinate::new("g", "a", "jar", "1.0"));
        let managed = original
            .with_property(PRE_MANAGED_VERSION, "1.0")
            .with_version("2.0");

        assert_eq!(original.version(), "1.0");
        assert!(original.properties().is_empty());
        assert_eq!(managed.version(), "2.0");
        assert_eq!(managed.property(PRE_MANAGED_VERSION), Some("1.0"));

        let merged = managed.with_properties([(MANAGED_SCOPE, "runtime")]);
        assert_eq!(merged.property(PRE_MANAGED_VERSION), Some("1.0"));
        assert_eq!(merged.property(MANAGED_SCOPE), Some("runtime"));
    }
}
