//! Record corpus: raw listings and posts, tagged once and read-only after.
//!
//! Provides a standard way to load raw records from JSON files or a
//! directory of them, or use a built-in embedded sample corpus.
//! Tagging happens exactly once, when the corpus is built.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tagnet_core::dictionary::TagDictionary;
use tagnet_core::error::{CorpusError, Result, TagnetError};
use tagnet_core::filter::RecordPredicate;
use tagnet_core::tagger::Tagger;
use tagnet_core::types::{Record, RecordId, SourceKind};
use tracing::{debug, info};

/// A record as it arrives from an ingestion collaborator.
///
/// Any extra boolean field set to `true` becomes a marker on the tagged
/// record, so inputs like `{"text": "...", "flag": true}` can be
/// filtered on `flag`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, alias = "title", alias = "content")]
    pub text: Option<String>,
    /// Sales or likes. Any JSON value; see [`coerce_weight`].
    #[serde(default, alias = "sales", alias = "likes")]
    pub weight: Value,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub source: Option<SourceKind>,
    #[serde(default)]
    pub markers: BTreeSet<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RawRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Value::from(weight);
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>, source: SourceKind) -> Self {
        self.platform = Some(platform.into());
        self.source = Some(source);
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.insert(marker.into());
        self
    }

    /// Explicit markers plus extra boolean fields that are `true`.
    fn explicit_markers(&self) -> impl Iterator<Item = String> + '_ {
        self.markers.iter().cloned().chain(
            self.extra
                .iter()
                .filter(|(_, v)| v.as_bool() == Some(true))
                .map(|(k, _)| k.clone()),
        )
    }
}

/// Coerce a raw weight to a number.
///
/// JSON numbers and numeric strings are taken as-is; null, absent,
/// non-numeric and non-finite values become `0.0` so sums and means
/// stay well defined.
pub fn coerce_weight(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(w) if w.is_finite() => w,
        _ => 0.0,
    }
}

/// A tagged, read-only corpus of records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    pub name: String,
    /// Version of the dictionary the records were tagged with.
    pub dictionary_version: String,
    records: Vec<Record>,
}

impl Corpus {
    /// Tag raw records against a dictionary.
    pub fn from_raw(name: impl Into<String>, raw: &[RawRecord], dictionary: &TagDictionary) -> Self {
        let tagger = Tagger::new(dictionary);
        let records: Vec<Record> = raw
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let (tags, mut markers) = tagger.annotate(r.text.as_deref());
                markers.extend(r.explicit_markers());
                Record {
                    id: RecordId(i),
                    text: r.text.clone().unwrap_or_default(),
                    weight: coerce_weight(&r.weight),
                    platform: r.platform.clone().unwrap_or_else(|| "unknown".to_string()),
                    source: r.source.unwrap_or_default(),
                    tags,
                    markers,
                }
            })
            .collect();

        let name = name.into();
        info!(corpus = %name, records = records.len(), dictionary = dictionary.version(), "corpus tagged");
        Corpus {
            name,
            dictionary_version: dictionary.version().to_string(),
            records,
        }
    }

    /// Load and tag a JSON array of raw records.
    pub fn from_json_file(path: &Path, dictionary: &TagDictionary) -> Result<Self> {
        let raw = load_raw_file(path)?;
        Ok(Self::from_raw(corpus_name(path), &raw, dictionary))
    }

    /// Load and tag every `.json` file in a directory, in file-name order.
    pub fn from_directory(path: &Path, dictionary: &TagDictionary) -> Result<Self> {
        let raw = load_raw_directory(path)?;
        Ok(Self::from_raw(corpus_name(path), &raw, dictionary))
    }

    /// Built-in sample corpus tagged with the given dictionary.
    pub fn from_embedded(dictionary: &TagDictionary) -> Self {
        Self::from_raw("embedded-sample", &embedded_raw(), dictionary)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.0)
    }

    /// Records satisfying a predicate.
    pub fn filtered<P: RecordPredicate + ?Sized>(&self, predicate: &P) -> Vec<&Record> {
        self.records.iter().filter(|r| predicate.matches(r)).collect()
    }

    /// Number of records in the corpus.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Unique platforms, sorted.
    pub fn platforms(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.platform.as_str()).collect();
        set.into_iter().map(String::from).collect()
    }
}

/// Read a JSON array of raw records.
pub fn load_raw_file(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(CorpusError::NotFound(path.display().to_string()).into());
    }
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    if !value.is_array() {
        return Err(TagnetError::Corpus(CorpusError::NotAnArray(
            path.display().to_string(),
        )));
    }
    let raw: Vec<RawRecord> = serde_json::from_value(value)?;
    debug!(path = %path.display(), records = raw.len(), "raw records loaded");
    Ok(raw)
}

/// Read every `.json` file of a directory, sorted by file name.
pub fn load_raw_directory(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.is_dir() {
        return Err(CorpusError::NotFound(path.display().to_string()).into());
    }
    let mut entries: Vec<_> = std::fs::read_dir(path)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut raw = Vec::new();
    for entry in entries {
        raw.extend(load_raw_file(&entry.path())?);
    }
    Ok(raw)
}

fn corpus_name(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "corpus".to_string())
}

/// Built-in 16-record sample: hair-dye listings and social posts.
///
/// Written against the built-in dictionary so that the whitening
/// subset yields a graph with several edges above the noise threshold.
pub fn embedded_raw() -> Vec<RawRecord> {
    let listings: &[(&str, &str, f64)] = &[
        ("taobao", "欧莱雅 奶茶棕 泡沫染发剂 显白 植物配方", 12000.0),
        ("taobao", "施华蔻 茶棕色 泡泡染 显白不挑肤色", 8600.0),
        ("taobao", "花王 Liese 泡沫染发 摩卡棕 提亮肤色", 15400.0),
        ("taobao", "章华 植萃 无氨 盖白发 染发膏", 3100.0),
        ("jd", "欧莱雅 卓韵霜 遮白 染发霜 自然黑茶色", 5200.0),
        ("jd", "施华蔻 脏橘色 免漂 染发剂 元气 显白", 2700.0),
        ("jd", "Schwarzkopf ash blonde bleach kit", 900.0),
        ("taobao", "爱茉莉 美妆仙 泡沫 蓝黑色 显白 黄皮友好", 6400.0),
    ];
    let posts: &[(&str, &str, f64)] = &[
        ("xhs", "黄皮显白发色合集! 奶茶棕+泡沫染 欧莱雅真的绝", 2300.0),
        ("xhs", "显白天花板 茶棕 花王泡沫染 在家搞定", 1800.0),
        ("xhs", "新中式 东方美学 乌木色 显气色", 950.0),
        ("weibo", "rosy 气色 red tea tone, loreal foam dye", 120.0),
        ("xhs", "冷棕显白 施华蔻泡泡染 植物温和", 1600.0),
        ("weibo", "小红书网页版 推荐 蓝黑", 10.0),
        ("xhs", "无氨植物染 盖白 妈妈也能用", 430.0),
        ("weibo", "whitening brown foam from l'oreal, brightening my skin", 75.0),
    ];

    listings
        .iter()
        .map(|(platform, text, sales)| {
            RawRecord::new(*text)
                .with_weight(*sales)
                .with_platform(*platform, SourceKind::Listing)
        })
        .chain(posts.iter().map(|(platform, text, likes)| {
            RawRecord::new(*text)
                .with_weight(*likes)
                .with_platform(*platform, SourceKind::Post)
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tagnet_core::filter::RecordFilter;

    fn dict() -> TagDictionary {
        TagDictionary::builder("corpus-test")
            .category("color", |c| c.tag("brown", ["brown", "tea"]))
            .category("tech", |c| c.tag("foam", ["foam"]))
            .build()
            .unwrap()
    }

    #[test]
    fn weight_coercion() {
        assert_eq!(coerce_weight(&json!(12)), 12.0);
        assert_eq!(coerce_weight(&json!(2.5)), 2.5);
        assert_eq!(coerce_weight(&json!(" 42 ")), 42.0);
        assert_eq!(coerce_weight(&json!("1.2万+")), 0.0);
        assert_eq!(coerce_weight(&json!(null)), 0.0);
        assert_eq!(coerce_weight(&json!("NaN")), 0.0);
        assert_eq!(coerce_weight(&json!({"v": 1})), 0.0);
    }

    #[test]
    fn boolean_fields_become_markers() {
        let raw: Vec<RawRecord> = serde_json::from_value(json!([
            {"text": "brown foam dye", "flag": true, "weight": "7"},
            {"text": "brown dye", "flag": false},
            {"title": null, "likes": "n/a", "markers": ["manual"]}
        ]))
        .unwrap();
        let corpus = Corpus::from_raw("t", &raw, &dict());
        let records = corpus.records();
        assert!(records[0].has_marker("flag"));
        assert_eq!(records[0].weight, 7.0);
        assert!(!records[1].has_marker("flag"));
        assert_eq!(records[2].text, "");
        assert_eq!(records[2].weight, 0.0);
        assert!(records[2].has_marker("manual"));
        assert!(records[2].tags.is_untagged());
        assert_eq!(corpus.filtered(&RecordFilter::marker("flag")).len(), 1);
    }

    #[test]
    fn embedded_corpus_tags_with_builtin_dictionary() {
        let dict = TagDictionary::builtin();
        let corpus = Corpus::from_embedded(&dict);
        assert_eq!(corpus.len(), 16);
        assert_eq!(corpus.platforms(), vec!["jd", "taobao", "weibo", "xhs"]);
        assert!(corpus.filtered(&RecordFilter::marker("whitening")).len() >= 8);
        assert_eq!(corpus.dictionary_version, "hair-color-v7");
    }

    #[test]
    fn from_json_file_rejects_non_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"text": "brown"}"#).unwrap();
        let err = Corpus::from_json_file(&path, &dict()).unwrap_err();
        assert!(matches!(err, TagnetError::Corpus(CorpusError::NotAnArray(_))));
    }

    #[test]
    fn from_directory_loads_json_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), r#"[{"text": "foam"}]"#).unwrap();
        std::fs::write(dir.path().join("a.json"), r#"[{"text": "brown"}]"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let corpus = Corpus::from_directory(dir.path(), &dict()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.records()[0].text, "brown");
        assert_eq!(corpus.records()[1].tags.get("tech"), ["foam".to_string()]);
    }

    #[test]
    fn missing_path_is_reported() {
        let err = Corpus::from_json_file(Path::new("/definitely/not/here.json"), &dict());
        assert!(matches!(err, Err(TagnetError::Corpus(CorpusError::NotFound(_)))));
    }
}
