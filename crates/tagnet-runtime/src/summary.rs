//! Processed corpus: tagged records plus aggregate statistics.
//!
//! This is the unit stored in the [`CorpusCache`]: one full scan of the
//! input produces both the tagged corpus and its summary.

use crate::aggregate::{co_occurrence, CoOccurrence};
use crate::cache::{CorpusCache, Fingerprint};
use crate::corpus::{Corpus, RawRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tagnet_core::dictionary::TagDictionary;
use tagnet_core::error::Result;
use tagnet_core::filter::RecordFilter;
use tagnet_core::types::SourceKind;
use tracing::info;

/// Corpus-wide statistics, computed over every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub total_records: usize,
    /// Records with no tag in any category.
    pub untagged_records: usize,
    pub total_weight: f64,
    pub by_platform: BTreeMap<String, usize>,
    pub by_source: BTreeMap<SourceKind, usize>,
    /// Records carrying each marker.
    pub by_marker: BTreeMap<String, usize>,
    /// Tag frequency per dictionary category.
    pub frequencies: CoOccurrence,
}

impl CorpusSummary {
    pub fn compute(corpus: &Corpus, dictionary: &TagDictionary) -> Self {
        let mut summary = CorpusSummary {
            total_records: corpus.len(),
            frequencies: co_occurrence(
                corpus.records(),
                &RecordFilter::All,
                dictionary.category_names().as_slice(),
            ),
            ..Self::default()
        };
        for record in corpus.records() {
            if record.tags.is_untagged() {
                summary.untagged_records += 1;
            }
            summary.total_weight += record.weight;
            *summary.by_platform.entry(record.platform.clone()).or_insert(0) += 1;
            *summary.by_source.entry(record.source).or_insert(0) += 1;
            for marker in &record.markers {
                *summary.by_marker.entry(marker.clone()).or_insert(0) += 1;
            }
        }
        summary
    }

    /// Share of records that received at least one tag.
    pub fn coverage(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.total_records - self.untagged_records) as f64 / self.total_records as f64
        }
    }
}

/// A tagged corpus with its summary and input fingerprint.
#[derive(Debug, Clone)]
pub struct ProcessedCorpus {
    pub fingerprint: Fingerprint,
    pub corpus: Corpus,
    pub summary: CorpusSummary,
}

impl ProcessedCorpus {
    /// Tag the raw records and summarize them.
    pub fn process(name: &str, raw: &[RawRecord], dictionary: &TagDictionary) -> Result<Self> {
        let fingerprint = Fingerprint::of(dictionary, raw)?;
        Ok(Self::process_with(fingerprint, name, raw, dictionary))
    }

    fn process_with(
        fingerprint: Fingerprint,
        name: &str,
        raw: &[RawRecord],
        dictionary: &TagDictionary,
    ) -> Self {
        let corpus = Corpus::from_raw(name, raw, dictionary);
        let summary = CorpusSummary::compute(&corpus, dictionary);
        info!(
            corpus = name,
            fingerprint = %fingerprint.short(),
            records = summary.total_records,
            untagged = summary.untagged_records,
            "corpus processed"
        );
        Self {
            fingerprint,
            corpus,
            summary,
        }
    }

    /// Fetch from the cache, processing on a miss.
    pub fn cached(
        cache: &CorpusCache<ProcessedCorpus>,
        name: &str,
        raw: &[RawRecord],
        dictionary: &TagDictionary,
    ) -> Result<Arc<Self>> {
        let fingerprint = Fingerprint::of(dictionary, raw)?;
        cache.get_or_compute(&fingerprint, || {
            Ok(Self::process_with(fingerprint, name, raw, dictionary))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn summary_counts_platforms_sources_and_markers() {
        let dict = TagDictionary::builtin();
        let processed = ProcessedCorpus::process("sample", &crate::corpus::embedded_raw(), &dict).unwrap();
        let summary = &processed.summary;
        assert_eq!(summary.total_records, 16);
        assert_eq!(summary.by_source[&SourceKind::Listing], 8);
        assert_eq!(summary.by_source[&SourceKind::Post], 8);
        assert_eq!(summary.by_platform.values().sum::<usize>(), 16);
        assert!(summary.by_marker.get("whitening").copied().unwrap_or(0) >= 8);
        assert!(summary.coverage() > 0.5);
        assert!(!summary.frequencies.get("color").is_empty());
    }

    #[test]
    fn cached_processing_reuses_the_result() {
        let dict = TagDictionary::builtin();
        let raw = vec![RawRecord::new("奶茶棕 泡沫 显白"), RawRecord::new("brown dye")];
        let cache = CorpusCache::new(Duration::from_secs(60));

        let first = ProcessedCorpus::cached(&cache, "t", &raw, &dict).unwrap();
        let second = ProcessedCorpus::cached(&cache, "t", &raw, &dict).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().misses, 1);

        let changed = vec![RawRecord::new("red dye")];
        let third = ProcessedCorpus::cached(&cache, "t", &changed, &dict).unwrap();
        assert_ne!(third.fingerprint, first.fingerprint);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn empty_corpus_has_zero_coverage() {
        let dict = TagDictionary::builtin();
        let processed = ProcessedCorpus::process("empty", &[], &dict).unwrap();
        assert_eq!(processed.summary.coverage(), 0.0);
        assert!(processed.summary.frequencies.is_empty());
    }
}
