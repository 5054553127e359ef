//! Shared types used across all tagnet crates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A tag assigned to a record within one category.
///
/// `Unspecified` stands in for "no keyword of this category matched" so
/// that grouping operations always have a stable key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    Named(String),
    Unspecified,
}

impl Tag {
    pub fn named(name: impl Into<String>) -> Self {
        Tag::Named(name.into())
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, Tag::Unspecified)
    }

    /// The tag name, or `None` for `Unspecified`.
    pub fn name(&self) -> Option<&str> {
        match self {
            Tag::Named(name) => Some(name),
            Tag::Unspecified => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Named(name) => write!(f, "{}", name),
            Tag::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// Tags matched within a single category, in dictionary order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTags {
    pub category: String,
    pub tags: Vec<String>,
}

/// Per-category tag lists produced by the tagger.
///
/// Every dictionary category is present, possibly with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAssignment {
    entries: Vec<CategoryTags>,
}

impl TagAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category's tags. Duplicate tags are collapsed, keeping
    /// the first occurrence.
    pub fn push(&mut self, category: impl Into<String>, tags: Vec<String>) {
        let mut seen = BTreeSet::new();
        let tags = tags
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect();
        self.entries.push(CategoryTags {
            category: category.into(),
            tags,
        });
    }

    /// Tags for a category. Unknown categories yield an empty slice.
    pub fn get(&self, category: &str) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.tags.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, category: &str, tag: &str) -> bool {
        self.get(category).iter().any(|t| t == tag)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.category.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|e| (e.category.as_str(), e.tags.as_slice()))
    }

    /// All tags across all categories, in category then dictionary order.
    pub fn all_tags(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|e| e.tags.iter().map(|t| t.as_str()))
    }

    /// Tags for a category, or `[Tag::Unspecified]` when none matched.
    pub fn tags_or_unspecified(&self, category: &str) -> Vec<Tag> {
        let tags = self.get(category);
        if tags.is_empty() {
            vec![Tag::Unspecified]
        } else {
            tags.iter().cloned().map(Tag::Named).collect()
        }
    }

    /// First matching tag of a category, or `Tag::Unspecified`.
    pub fn primary(&self, category: &str) -> Tag {
        self.get(category)
            .first()
            .cloned()
            .map(Tag::Named)
            .unwrap_or(Tag::Unspecified)
    }

    /// True when no category has any tag.
    pub fn is_untagged(&self) -> bool {
        self.entries.iter().all(|e| e.tags.is_empty())
    }
}

/// Unique identifier for a record within one corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record-{}", self.0)
    }
}

/// Where a record came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A product listing; weight is sales volume.
    Listing,
    /// A social post; weight is engagement (likes).
    #[default]
    Post,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Listing => write!(f, "listing"),
            SourceKind::Post => write!(f, "post"),
        }
    }
}

/// A tagged record. Created once during ingestion and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub text: String,
    /// Numeric weight (sales or likes). Absent or non-numeric input is 0.
    pub weight: f64,
    pub platform: String,
    pub source: SourceKind,
    pub tags: TagAssignment,
    /// Names of the boolean markers present on this record.
    pub markers: BTreeSet<String>,
}

impl Record {
    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    pub fn has_tag(&self, category: &str, tag: &str) -> bool {
        self.tags.contains(category, tag)
    }
}

/// A position in the layout plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}
