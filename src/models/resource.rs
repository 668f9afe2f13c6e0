use serde::Serialize;

use super::CategoryLabel;

/// Kind of learning resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Course,
    Book,
    Activity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// How much of a student's time a resource takes.
///
/// Flattened into the resource on the wire, so a course serializes with a
/// `duration` key, a book with `pages` and an activity with `time_required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Extent {
    Duration(&'static str),
    Pages(u32),
    TimeRequired(&'static str),
}

/// Immutable catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    pub title: &'static str,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub difficulty: Difficulty,
    #[serde(flatten)]
    pub extent: Extent,
}

/// A catalog resource recommended on behalf of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub resource: ResourceDescriptor,
    pub category: CategoryLabel,
    /// Score the owning category received from the scoring backend
    pub confidence: f64,
}
