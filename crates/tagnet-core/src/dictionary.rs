//! Tag dictionary: the static `category → tag → keyword variants` configuration.
//!
//! A dictionary is an explicit, versioned value owned by the caller.
//! Several dictionaries can coexist (e.g. one per test), there is no
//! global state. Keywords are normalized to lowercase on construction
//! so matching is case-insensitive.
//!
//! Besides categories, a dictionary carries *markers*: named keyword
//! sets evaluated as boolean predicates ("mentions whitening").

use crate::error::{ConfigError, Result, TagnetError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Node colours handed out to categories that don't declare one.
const CATEGORY_PALETTE: &[&str] = &[
    "#B85C5C", "#B85C40", "#E08A6F", "#7A9A7A", "#6F7C99", "#D4B48C",
];

/// A tag and the keyword variants that select it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDef {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Optional swatch colour for this tag (hex).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A category of mutually independent tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    /// Display colour for graph nodes of this category (hex).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagDef>,
}

/// A boolean marker: present when any keyword occurs in the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDef {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Serialized shape of a dictionary before validation.
#[derive(Debug, Clone, Deserialize)]
struct DictionaryDocument {
    version: String,
    #[serde(default)]
    categories: Vec<CategoryDef>,
    #[serde(default)]
    markers: Vec<MarkerDef>,
}

impl TryFrom<DictionaryDocument> for TagDictionary {
    type Error = ConfigError;

    fn try_from(doc: DictionaryDocument) -> std::result::Result<Self, Self::Error> {
        TagDictionary::new(doc.version, doc.categories, doc.markers).map_err(|e| match e {
            TagnetError::Config(c) => c,
            other => ConfigError::InvalidValue {
                field: "dictionary".into(),
                value: String::new(),
                reason: other.to_string(),
            },
        })
    }
}

/// Versioned tag dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DictionaryDocument")]
pub struct TagDictionary {
    version: String,
    categories: Vec<CategoryDef>,
    markers: Vec<MarkerDef>,
}

impl TagDictionary {
    /// Build a dictionary, normalizing keywords and validating names.
    ///
    /// Keywords are trimmed and lowercased; empty keywords are dropped.
    /// A tag left with no keywords is kept and simply never matches.
    pub fn new(
        version: impl Into<String>,
        categories: Vec<CategoryDef>,
        markers: Vec<MarkerDef>,
    ) -> Result<Self> {
        let mut category_names = HashSet::new();
        let mut normalized = Vec::with_capacity(categories.len());

        for (idx, mut category) in categories.into_iter().enumerate() {
            if category.name.trim().is_empty() {
                return Err(ConfigError::EmptyName(format!("category #{}", idx)).into());
            }
            if !category_names.insert(category.name.clone()) {
                return Err(ConfigError::DuplicateCategory(category.name).into());
            }
            if category.color.is_none() {
                category.color = Some(CATEGORY_PALETTE[idx % CATEGORY_PALETTE.len()].to_string());
            }

            let mut tag_names = HashSet::new();
            for tag in &mut category.tags {
                if tag.name.trim().is_empty() {
                    return Err(ConfigError::EmptyName(format!("tag in '{}'", category.name)).into());
                }
                if !tag_names.insert(tag.name.clone()) {
                    return Err(ConfigError::DuplicateTag {
                        category: category.name.clone(),
                        tag: tag.name.clone(),
                    }
                    .into());
                }
                tag.keywords = normalize_keywords(&tag.keywords);
                if tag.keywords.is_empty() {
                    debug!(category = %category.name, tag = %tag.name, "tag has no keywords and will never match");
                }
            }
            normalized.push(category);
        }

        let mut marker_names = HashSet::new();
        let mut markers = markers;
        for marker in &mut markers {
            if marker.name.trim().is_empty() {
                return Err(ConfigError::EmptyName("marker".into()).into());
            }
            if !marker_names.insert(marker.name.clone()) {
                return Err(ConfigError::DuplicateMarker(marker.name.clone()).into());
            }
            marker.keywords = normalize_keywords(&marker.keywords);
        }

        Ok(Self {
            version: version.into(),
            categories: normalized,
            markers,
        })
    }

    /// Start building a dictionary programmatically.
    pub fn builder(version: impl Into<String>) -> DictionaryBuilder {
        DictionaryBuilder {
            version: version.into(),
            categories: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Parse the nested mapping form:
    ///
    /// ```json
    /// {
    ///   "version": "v7",
    ///   "COLOR": { "brown": ["brown", "tea"] },
    ///   "WHITENING": ["fair", "brighten"]
    /// }
    /// ```
    ///
    /// Object values are categories (`tag → [keywords]`); array values are
    /// markers. Anything else fails fast, since it is a configuration defect.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_mapping(&value)
    }

    /// Same as [`from_json_str`](Self::from_json_str) for an already parsed value.
    pub fn from_mapping(value: &Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(TagnetError::malformed("$", "an object of categories"));
        };

        let mut version = String::from("unversioned");
        let mut categories = Vec::new();
        let mut markers = Vec::new();

        for (key, entry) in root {
            match entry {
                Value::String(v) if key == "version" => version = v.clone(),
                Value::Object(tags) => {
                    let mut defs = Vec::with_capacity(tags.len());
                    for (tag, keywords) in tags {
                        let path = format!("$.{}.{}", key, tag);
                        defs.push(TagDef {
                            name: tag.clone(),
                            keywords: string_list(keywords, &path)?,
                            color: None,
                        });
                    }
                    categories.push(CategoryDef {
                        name: key.clone(),
                        color: None,
                        tags: defs,
                    });
                }
                Value::Array(_) => markers.push(MarkerDef {
                    name: key.clone(),
                    keywords: string_list(entry, &format!("$.{}", key))?,
                }),
                _ => {
                    return Err(TagnetError::malformed(
                        format!("$.{}", key),
                        "an object of keyword lists or a keyword list",
                    ))
                }
            }
        }

        Self::new(version, categories, markers)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn categories(&self) -> &[CategoryDef] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Fail with `UnknownCategory` unless every name is a known category.
    pub fn require_categories<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        match names.iter().find(|n| self.category(n.as_ref()).is_none()) {
            Some(missing) => Err(TagnetError::unknown_category(missing.as_ref())),
            None => Ok(()),
        }
    }

    pub fn markers(&self) -> &[MarkerDef] {
        &self.markers
    }

    pub fn marker(&self, name: &str) -> Option<&MarkerDef> {
        self.markers.iter().find(|m| m.name == name)
    }

    /// Display colour of a category's graph nodes.
    pub fn category_color(&self, category: &str) -> Option<&str> {
        self.category(category).and_then(|c| c.color.as_deref())
    }

    /// Swatch colour declared for a tag, if any.
    pub fn tag_color(&self, category: &str, tag: &str) -> Option<&str> {
        self.category(category)?
            .tags
            .iter()
            .find(|t| t.name == tag)
            .and_then(|t| t.color.as_deref())
    }

    /// Total number of tags across categories.
    pub fn tag_count(&self) -> usize {
        self.categories.iter().map(|c| c.tags.len()).sum()
    }

    /// The built-in hair colour dictionary.
    ///
    /// Keywords cover both the Chinese listing vocabulary and English
    /// equivalents.
    pub fn builtin() -> Self {
        let built = Self::builder("hair-color-v7")
            .category("brand", |c| {
                c.color("#B85C40")
                    .tag("loreal", ["欧莱雅", "l'oreal", "loreal"])
                    .tag("schwarzkopf", ["施华蔻", "schwarzkopf"])
                    .tag("kao", ["花王", "liese"])
                    .tag("amorepacific", ["爱茉莉", "美妆仙", "mise en scene"])
                    .tag("zhanghua", ["章华"])
            })
            .category("color", |c| {
                c.color("#B85C5C")
                    .swatch("brown", "#8C6A4F", ["棕", "茶", "摩卡", "巧", "奶茶", "brown", "mocha"])
                    .swatch("red-orange", "#B56D5F", ["红", "橘", "莓", "脏橘", "酒红", "赤", "red", "orange"])
                    .swatch("ash-green", "#7A9A7A", ["亚麻", "青", "闷青", "灰绿", "ash", "khaki"])
                    .swatch("grey-blue-purple", "#6F7C99", ["灰", "蓝", "紫", "芋泥", "蓝黑", "乌木", "grey", "blue", "purple"])
                    .swatch("blonde", "#D4B48C", ["金", "白金", "米金", "浅金", "漂", "blonde", "gold"])
            })
            .category("tech", |c| {
                c.color("#E08A6F")
                    .tag("botanical", ["植物", "植萃", "botanical", "plant"])
                    .tag("ammonia-free", ["无氨", "温和", "ammonia free", "ammonia-free"])
                    .tag("foam", ["泡沫", "泡泡", "foam", "bubble"])
                    .tag("grey-coverage", ["盖白", "遮白", "grey coverage"])
                    .tag("no-bleach", ["免漂", "无需漂", "no bleach"])
            })
            .category("archetype", |c| {
                c.color("#A9A9A9")
                    .swatch("convenience", "#E09C86", ["泡沫", "泡泡", "foam"])
                    .swatch("gentle", "#7A9A7A", ["植物", "植萃", "无氨", "温和", "botanical"])
                    .swatch("efficacy", "#8C6A4F", ["盖白", "遮白", "免漂"])
                    .swatch("classic-cream", "#A9A9A9", ["染发膏", "染发霜", "染发剂", "dye cream"])
                    .swatch("trend-bleach", "#6F7C99", ["漂染", "需漂", "漂发", "bleach"])
            })
            .category("aesthetics", |c| {
                c.tag("oriental", ["东方", "美学", "国风", "中式", "新中式", "oriental"])
            })
            .category("swatch", |c| {
                c.swatch("tea-brown", "#A67B5B", ["茶棕"])
                    .swatch("ebony", "#5B5B5B", ["乌木"])
                    .swatch("red-tea", "#B85C40", ["赤茶"])
                    .swatch("sandal-brown", "#8C5A4A", ["檀棕"])
                    .swatch("black-tea", "#4A4A4A", ["黑茶"])
                    .swatch("blue-black", "#4A4A5B", ["蓝黑"])
                    .swatch("dirty-orange", "#E08A6F", ["脏橘"])
                    .swatch("blue-grey", "#8C8C8C", ["青灰"])
            })
            .marker("whitening", ["显白", "黄皮", "肤色", "提亮", "去黄", "衬肤", "whitening", "brightening"])
            .marker("complexion", ["气色", "红润", "元气", "rosy"])
            .build();

        match built {
            Ok(dict) => dict,
            Err(e) => unreachable!("built-in dictionary is valid: {e}"),
        }
    }
}

/// Programmatic dictionary construction.
pub struct DictionaryBuilder {
    version: String,
    categories: Vec<CategoryDef>,
    markers: Vec<MarkerDef>,
}

impl DictionaryBuilder {
    pub fn category(
        mut self,
        name: impl Into<String>,
        define: impl FnOnce(CategoryBuilder) -> CategoryBuilder,
    ) -> Self {
        let built = define(CategoryBuilder {
            def: CategoryDef {
                name: name.into(),
                color: None,
                tags: Vec::new(),
            },
        });
        self.categories.push(built.def);
        self
    }

    pub fn marker<I, S>(mut self, name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markers.push(MarkerDef {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn build(self) -> Result<TagDictionary> {
        TagDictionary::new(self.version, self.categories, self.markers)
    }
}

/// Builder for one category's tags.
pub struct CategoryBuilder {
    def: CategoryDef,
}

impl CategoryBuilder {
    pub fn color(mut self, hex: impl Into<String>) -> Self {
        self.def.color = Some(hex.into());
        self
    }

    pub fn tag<I, S>(mut self, name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.def.tags.push(TagDef {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            color: None,
        });
        self
    }

    /// A tag with its own swatch colour.
    pub fn swatch<I, S>(mut self, name: impl Into<String>, hex: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.def.tags.push(TagDef {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            color: Some(hex.into()),
        });
        self
    }
}

fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

fn string_list(value: &Value, path: &str) -> Result<Vec<String>> {
    let Value::Array(items) = value else {
        return Err(TagnetError::malformed(path, "a list of keyword strings"));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s.clone()),
            _ => Err(TagnetError::malformed(format!("{}[{}]", path, i), "a keyword string")),
        })
        .collect()
}
