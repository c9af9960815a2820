use regex::Regex;

use crate::core::artifact::Coordinate;

/// Artifact filter of the form `groupId[:artifactId[:extension[:version]]]`,
/// where any segment may use `*` as a wildcard. Missing trailing segments
/// match anything.
#[derive(Debug, Clone)]
pub struct CoordinatePattern {
    segments: Vec<Regex>,
}

impl CoordinatePattern {
    pub fn parse(raw: &str) -> Result<Self, regex::Error> {
        let segments: Vec<&str> = raw.split(':').collect();
        Self::from_segments(&segments)
    }

    pub fn from_segments(segments: &[&str]) -> Result<Self, regex::Error> {
        let segments = segments
            .iter()
            .take(4)
            .map(|segment| segment_regex(segment.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        let values = [
            coordinate.group_id.as_str(),
            coordinate.artifact_id.as_str(),
            coordinate.extension.as_str(),
            coordinate.version.as_str(),
        ];
        self.segments
            .iter()
            .zip(values)
            .all(|(re, value)| re.is_match(value))
    }
}

fn segment_regex(segment: &str) -> Result<Regex, regex::Error> {
    if segment.is_empty() || segment == "*" {
        return Regex::new("^.*$");
    }
    let escaped = regex::escape(segment).replace(r"\*", ".*");
    Regex::new(&format!("^{escaped}$"))
}
