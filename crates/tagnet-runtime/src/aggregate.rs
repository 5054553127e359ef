//! Co-occurrence aggregation over a predicate-filtered subset of records.
//!
//! Counting here is by occurrence: a record adds 1 to every tag it
//! carries, regardless of its weight. The weighted statistics at the
//! bottom of this module are a separate, coarser view.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tagnet_core::filter::RecordPredicate;
use tagnet_core::types::{Record, Tag};

/// Occurrence counts of tags within one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyCounter {
    counts: BTreeMap<String, u64>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, tag: &str) {
        *self.counts.entry(tag.to_string()).or_insert(0) += 1;
    }

    /// Count for a tag, 0 when never seen.
    pub fn get(&self, tag: &str) -> u64 {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    /// The `k` most frequent tags: count descending, then name ascending.
    pub fn most_common(&self, k: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(tag, count)| (tag.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(k);
        ranked
    }

    /// Names of the `k` most frequent tags, in rank order.
    pub fn top_k(&self, k: usize) -> Vec<String> {
        self.most_common(k)
            .into_iter()
            .map(|(tag, _)| tag.to_string())
            .collect()
    }

    /// Number of distinct tags counted.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(t, c)| (t.as_str(), *c))
    }
}

/// Per-category frequency counters, in the order categories were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoOccurrence {
    /// Number of records that satisfied the predicate.
    pub filtered_records: usize,
    counters: Vec<(String, FrequencyCounter)>,
}

impl CoOccurrence {
    /// Counter for a category. Categories that were not requested, or
    /// that saw no tags, yield an empty counter.
    pub fn get(&self, category: &str) -> &FrequencyCounter {
        static EMPTY: FrequencyCounter = FrequencyCounter {
            counts: BTreeMap::new(),
        };
        self.counters
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, counter)| counter)
            .unwrap_or(&EMPTY)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.counters.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrequencyCounter)> {
        self.counters.iter().map(|(c, counter)| (c.as_str(), counter))
    }

    /// True when every counter is empty.
    pub fn is_empty(&self) -> bool {
        self.counters.iter().all(|(_, c)| c.is_empty())
    }
}

/// Frequency counters per category over the records matching `predicate`.
///
/// An empty filtered subset yields an all-empty result, not an error.
pub fn co_occurrence<'r, I, P, S>(records: I, predicate: &P, categories: &[S]) -> CoOccurrence
where
    I: IntoIterator<Item = &'r Record>,
    P: RecordPredicate + ?Sized,
    S: AsRef<str>,
{
    let mut counters: Vec<(String, FrequencyCounter)> = categories
        .iter()
        .map(|c| (c.as_ref().to_string(), FrequencyCounter::new()))
        .collect();
    let mut filtered_records = 0;

    for record in records.into_iter().filter(|r| predicate.matches(r)) {
        filtered_records += 1;
        for (category, counter) in counters.iter_mut() {
            for tag in record.tags.get(category.as_str()) {
                counter.increment(tag);
            }
        }
    }

    CoOccurrence {
        filtered_records,
        counters,
    }
}

/// Pairwise co-occurrence table between two categories' top-K tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoMatrix {
    /// Top-K tags of the first category, in rank order.
    pub rows: Vec<String>,
    /// Top-K tags of the second category, in rank order.
    pub cols: Vec<String>,
    /// `cells[i][j]` counts records carrying both `rows[i]` and `cols[j]`.
    pub cells: Vec<Vec<u64>>,
}

impl CoMatrix {
    pub fn get(&self, row: &str, col: &str) -> u64 {
        let Some(i) = self.rows.iter().position(|r| r == row) else {
            return 0;
        };
        let Some(j) = self.cols.iter().position(|c| c == col) else {
            return 0;
        };
        self.cells[i][j]
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    /// Largest cell value, 0 for an empty table.
    pub fn max(&self) -> u64 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Co-occurrence table of `category_a` × `category_b`, restricted to
/// each axis's top-K tags.
///
/// Returns an empty table when the filtered subset or either top-K
/// selection is empty, or when no pair was observed at all.
pub fn co_matrix<P: RecordPredicate + ?Sized>(
    records: &[Record],
    predicate: &P,
    category_a: &str,
    category_b: &str,
    top_k_a: usize,
    top_k_b: usize,
) -> CoMatrix {
    let frequencies = co_occurrence(records, predicate, &[category_a, category_b]);
    let rows = frequencies.get(category_a).top_k(top_k_a);
    let cols = frequencies.get(category_b).top_k(top_k_b);
    if rows.is_empty() || cols.is_empty() {
        return CoMatrix::default();
    }

    let mut cells = vec![vec![0u64; cols.len()]; rows.len()];
    let mut observed = false;
    for record in records.iter().filter(|r| predicate.matches(r)) {
        let tags_a = record.tags.get(category_a);
        let tags_b = record.tags.get(category_b);
        for (i, row) in rows.iter().enumerate() {
            if !tags_a.contains(row) {
                continue;
            }
            for (j, col) in cols.iter().enumerate() {
                if tags_b.contains(col) {
                    cells[i][j] += 1;
                    observed = true;
                }
            }
        }
    }

    if !observed {
        return CoMatrix::default();
    }
    CoMatrix { rows, cols, cells }
}

// ---------------------------------------------------------------------------
// Weighted companion statistics
// ---------------------------------------------------------------------------

/// Mean record weight for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicWeight {
    pub topic: String,
    /// Category of a tag topic; `None` for a marker topic.
    pub category: Option<String>,
    pub records: u64,
    pub total_weight: f64,
    pub mean_weight: f64,
}

/// Mean weight (sum of weight / matching records) for every marker and
/// every tag of the given categories, over the filtered subset.
///
/// Sorted by mean descending, then topic name. Topics without any
/// matching record are omitted.
pub fn weighted_mean_by_topic<P, S>(records: &[Record], predicate: &P, categories: &[S]) -> Vec<TopicWeight>
where
    P: RecordPredicate + ?Sized,
    S: AsRef<str>,
{
    let mut sums: BTreeMap<(Option<String>, String), (u64, f64)> = BTreeMap::new();
    for record in records.iter().filter(|r| predicate.matches(r)) {
        for marker in &record.markers {
            let entry = sums.entry((None, marker.clone())).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += record.weight;
        }
        for category in categories {
            let category = category.as_ref();
            for tag in record.tags.get(category) {
                let entry = sums
                    .entry((Some(category.to_string()), tag.clone()))
                    .or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 += record.weight;
            }
        }
    }

    let mut topics: Vec<TopicWeight> = sums
        .into_iter()
        .map(|((category, topic), (count, total))| TopicWeight {
            topic,
            category,
            records: count,
            total_weight: total,
            mean_weight: total / count as f64,
        })
        .collect();
    topics.sort_by(|a, b| {
        b.mean_weight
            .total_cmp(&a.mean_weight)
            .then_with(|| a.topic.cmp(&b.topic))
    });
    topics
}

/// Total weight per tag of one category over the filtered subset.
///
/// Records without a tag in the category are grouped under
/// [`Tag::Unspecified`]. Sorted by total descending, then tag.
pub fn weight_sum_by_tag<P: RecordPredicate + ?Sized>(
    records: &[Record],
    predicate: &P,
    category: &str,
) -> Vec<(Tag, f64)> {
    let mut sums: BTreeMap<Tag, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| predicate.matches(r)) {
        for tag in record.tags.tags_or_unspecified(category) {
            *sums.entry(tag).or_insert(0.0) += record.weight;
        }
    }
    let mut ranked: Vec<(Tag, f64)> = sums.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Record count per primary tag of a category (first match, or
/// [`Tag::Unspecified`]). Sorted by count descending, then tag.
pub fn primary_distribution<P: RecordPredicate + ?Sized>(
    records: &[Record],
    predicate: &P,
    category: &str,
) -> Vec<(Tag, u64)> {
    let mut counts: BTreeMap<Tag, u64> = BTreeMap::new();
    for record in records.iter().filter(|r| predicate.matches(r)) {
        *counts.entry(record.tags.primary(category)).or_insert(0) += 1;
    }
    let mut ranked: Vec<(Tag, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Distinct marker names present on the records, sorted.
pub fn marker_names(records: &[Record]) -> BTreeSet<String> {
    records.iter().flat_map(|r| r.markers.iter().cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagnet_core::filter::RecordFilter;
    use tagnet_core::types::{RecordId, SourceKind, TagAssignment};

    fn record(id: usize, color: &[&str], tech: &[&str], weight: f64, markers: &[&str]) -> Record {
        let mut tags = TagAssignment::new();
        tags.push("color", color.iter().map(|s| s.to_string()).collect());
        tags.push("tech", tech.iter().map(|s| s.to_string()).collect());
        Record {
            id: RecordId(id),
            text: String::new(),
            weight,
            platform: "xhs".into(),
            source: SourceKind::Post,
            tags,
            markers: markers.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record(0, &["brown", "red"], &["foam"], 10.0, &["fair"]),
            record(1, &["brown"], &["foam", "botanical"], 20.0, &["fair"]),
            record(2, &["red"], &[], 5.0, &[]),
            record(3, &["ash"], &["botanical"], 1.0, &["fair"]),
        ]
    }

    #[test]
    fn counts_every_tag_of_a_record() {
        let records = sample();
        let result = co_occurrence(&records, &RecordFilter::All, &["color", "tech"]);
        assert_eq!(result.filtered_records, 4);
        assert_eq!(result.get("color").get("brown"), 2);
        assert_eq!(result.get("color").get("red"), 2);
        assert_eq!(result.get("tech").get("botanical"), 2);
        assert_eq!(result.get("color").total(), 5);
    }

    #[test]
    fn predicate_restricts_the_subset() {
        let records = sample();
        let result = co_occurrence(&records, &RecordFilter::marker("fair"), &["color"]);
        assert_eq!(result.filtered_records, 3);
        assert_eq!(result.get("color").get("red"), 1);
        assert!(result.get("unknown").is_empty());
    }

    #[test]
    fn most_common_breaks_ties_by_name() {
        let records = sample();
        let result = co_occurrence(&records, &RecordFilter::All, &["color"]);
        assert_eq!(
            result.get("color").most_common(3),
            vec![("brown", 2), ("red", 2), ("ash", 1)]
        );
        assert_eq!(result.get("color").top_k(1), vec!["brown".to_string()]);
    }

    #[test]
    fn matrix_counts_top_k_pairs() {
        let records = sample();
        let matrix = co_matrix(&records, &RecordFilter::All, "color", "tech", 2, 2);
        assert_eq!(matrix.rows, vec!["brown", "red"]);
        assert_eq!(matrix.cols, vec!["botanical", "foam"]);
        assert_eq!(matrix.get("brown", "foam"), 2);
        assert_eq!(matrix.get("red", "foam"), 1);
        assert_eq!(matrix.get("red", "botanical"), 0);
        // outside the top-2 colour axis
        assert_eq!(matrix.get("ash", "botanical"), 0);
        assert_eq!(matrix.max(), 2);
    }

    #[test]
    fn matrix_is_empty_without_observed_pairs() {
        let records = vec![record(0, &["brown"], &[], 1.0, &[]), record(1, &[], &["foam"], 1.0, &[])];
        assert!(co_matrix(&records, &RecordFilter::All, "color", "tech", 5, 5).is_empty());
        assert!(co_matrix(&records, &RecordFilter::All, "color", "tech", 0, 5).is_empty());
    }

    #[test]
    fn weighted_means_cover_markers_and_tags() {
        let records = sample();
        let topics = weighted_mean_by_topic(&records, &RecordFilter::All, &["tech"]);
        let fair = topics.iter().find(|t| t.topic == "fair").unwrap();
        assert_eq!(fair.category, None);
        assert_eq!(fair.records, 3);
        assert!((fair.mean_weight - 31.0 / 3.0).abs() < 1e-9);
        assert_eq!(topics[0].topic, "foam");
        assert_eq!(topics[0].mean_weight, 15.0);
    }

    #[test]
    fn weight_sums_group_untagged_records() {
        let records = sample();
        let sums = weight_sum_by_tag(&records, &RecordFilter::All, "tech");
        assert_eq!(sums[0], (Tag::named("foam"), 30.0));
        assert!(sums.contains(&(Tag::Unspecified, 5.0)));
    }

    #[test]
    fn primary_distribution_uses_first_tag() {
        let records = sample();
        let dist = primary_distribution(&records, &RecordFilter::All, "tech");
        assert_eq!(dist[0], (Tag::named("foam"), 2));
        assert!(dist.contains(&(Tag::named("botanical"), 1)));
        assert!(dist.contains(&(Tag::Unspecified, 1)));
    }
}
