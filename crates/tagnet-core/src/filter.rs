//! Record predicates: selecting the filtered subset an analysis runs over.

use crate::tagger::contains_any;
use crate::types::{Record, SourceKind};
use serde::{Deserialize, Serialize};

/// A boolean condition over records.
///
/// Implemented for closures, so ad-hoc predicates work anywhere a
/// [`RecordFilter`] does.
pub trait RecordPredicate {
    fn matches(&self, record: &Record) -> bool;
}

impl<F> RecordPredicate for F
where
    F: Fn(&Record) -> bool,
{
    fn matches(&self, record: &Record) -> bool {
        self(record)
    }
}

/// Composable, serializable record filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFilter {
    /// Every record.
    All,
    /// Records carrying the named marker.
    Marker(String),
    /// Records from one platform (exact match).
    Platform(String),
    /// Records of one source kind.
    Source(SourceKind),
    /// Records whose text contains any of the keywords.
    TextContains(Vec<String>),
    And(Vec<RecordFilter>),
    Or(Vec<RecordFilter>),
    Not(Box<RecordFilter>),
}

impl RecordFilter {
    pub fn marker(name: impl Into<String>) -> Self {
        RecordFilter::Marker(name.into())
    }

    pub fn and(self, other: RecordFilter) -> Self {
        match self {
            RecordFilter::And(mut parts) => {
                parts.push(other);
                RecordFilter::And(parts)
            }
            first => RecordFilter::And(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        RecordFilter::Not(Box::new(self))
    }

    /// Short human-readable label, used for logging and reports.
    pub fn label(&self) -> String {
        match self {
            RecordFilter::All => "all".to_string(),
            RecordFilter::Marker(m) => m.clone(),
            RecordFilter::Platform(p) => format!("platform:{}", p),
            RecordFilter::Source(s) => format!("source:{}", s),
            RecordFilter::TextContains(k) => format!("text:{}", k.join("|")),
            RecordFilter::And(parts) => join_labels(parts, " & "),
            RecordFilter::Or(parts) => join_labels(parts, " | "),
            RecordFilter::Not(inner) => format!("!{}", inner.label()),
        }
    }
}

fn join_labels(parts: &[RecordFilter], sep: &str) -> String {
    let labels: Vec<String> = parts.iter().map(|p| p.label()).collect();
    format!("({})", labels.join(sep))
}

impl RecordPredicate for RecordFilter {
    fn matches(&self, record: &Record) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::Marker(m) => record.has_marker(m),
            RecordFilter::Platform(p) => record.platform == *p,
            RecordFilter::Source(s) => record.source == *s,
            RecordFilter::TextContains(keywords) => contains_any(&record.text, keywords),
            RecordFilter::And(parts) => parts.iter().all(|p| p.matches(record)),
            RecordFilter::Or(parts) => parts.iter().any(|p| p.matches(record)),
            RecordFilter::Not(inner) => !inner.matches(record),
        }
    }
}
