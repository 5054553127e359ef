//! Keyword tagger: text to per-category tag lists.
//!
//! Matching is plain case-insensitive substring containment of any
//! keyword variant. There is no tokenization and no word-boundary
//! awareness: a short keyword embedded in an unrelated token matches.
//! Every tag of a category is tested, so a text can receive several
//! tags within the same category.

use crate::dictionary::{MarkerDef, TagDictionary};
use crate::types::TagAssignment;
use std::collections::BTreeSet;

/// Tag a text against every category of the dictionary.
///
/// `None` or empty text yields an empty list for every category.
/// Pure: identical inputs always produce identical output.
pub fn tag<'a>(text: impl Into<Option<&'a str>>, dictionary: &TagDictionary) -> TagAssignment {
    let lowered = text.into().map(str::to_lowercase).unwrap_or_default();
    tag_lowercase(&lowered, dictionary)
}

/// Names of the dictionary markers whose keywords occur in the text.
pub fn detect_markers<'a>(
    text: impl Into<Option<&'a str>>,
    dictionary: &TagDictionary,
) -> BTreeSet<String> {
    let lowered = text.into().map(str::to_lowercase).unwrap_or_default();
    dictionary
        .markers()
        .iter()
        .filter(|m| marker_matches(&lowered, m))
        .map(|m| m.name.clone())
        .collect()
}

/// Whether any keyword occurs in the text (case-insensitive).
pub fn contains_any<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    if text.is_empty() {
        return false;
    }
    let lowered = text.to_lowercase();
    keywords.iter().any(|k| {
        let k = k.as_ref().trim().to_lowercase();
        !k.is_empty() && lowered.contains(&k)
    })
}

fn tag_lowercase(lowered: &str, dictionary: &TagDictionary) -> TagAssignment {
    let mut assignment = TagAssignment::new();
    for category in dictionary.categories() {
        let matched = if lowered.is_empty() {
            Vec::new()
        } else {
            category
                .tags
                .iter()
                .filter(|t| t.keywords.iter().any(|k| lowered.contains(k.as_str())))
                .map(|t| t.name.clone())
                .collect()
        };
        assignment.push(category.name.clone(), matched);
    }
    assignment
}

fn marker_matches(lowered: &str, marker: &MarkerDef) -> bool {
    !lowered.is_empty() && marker.keywords.iter().any(|k| lowered.contains(k.as_str()))
}

/// Tagger bound to one dictionary, for tagging many texts.
#[derive(Debug, Clone, Copy)]
pub struct Tagger<'d> {
    dictionary: &'d TagDictionary,
}

impl<'d> Tagger<'d> {
    pub fn new(dictionary: &'d TagDictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &'d TagDictionary {
        self.dictionary
    }

    /// Tags and markers of one text, lowercasing it once.
    pub fn annotate(&self, text: Option<&str>) -> (TagAssignment, BTreeSet<String>) {
        let lowered = text.map(str::to_lowercase).unwrap_or_default();
        let tags = tag_lowercase(&lowered, self.dictionary);
        let markers = self
            .dictionary
            .markers()
            .iter()
            .filter(|m| marker_matches(&lowered, m))
            .map(|m| m.name.clone())
            .collect();
        (tags, markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tag;

    fn dict() -> TagDictionary {
        TagDictionary::builder("test")
            .category("color", |c| {
                c.tag("brown", ["brown", "tea"])
                    .tag("red", ["red", "berry"])
                    .tag("silent", Vec::<String>::new())
            })
            .category("tech", |c| c.tag("foam", ["foam"]))
            .marker("target", ["fair"])
            .build()
            .unwrap()
    }

    #[test]
    fn multiple_tags_within_one_category() {
        let result = tag("Red berry TEA dye", &dict());
        assert_eq!(result.get("color"), ["brown".to_string(), "red".to_string()]);
        assert!(result.get("tech").is_empty());
    }

    #[test]
    fn null_and_empty_text_yield_empty_lists() {
        let d = dict();
        for result in [tag(None, &d), tag("", &d)] {
            assert_eq!(result.categories().count(), 2);
            assert!(result.is_untagged());
        }
    }

    #[test]
    fn substring_matching_ignores_word_boundaries() {
        // "steady" contains "tea"
        let result = tag("steady hold", &dict());
        assert_eq!(result.get("color"), ["brown".to_string()]);
    }

    #[test]
    fn tagging_is_deterministic() {
        let d = dict();
        let text = "brown foam with a red tint";
        assert_eq!(tag(text, &d), tag(text, &d));
    }

    #[test]
    fn caller_substitutes_unspecified() {
        let result = tag("plain dye", &dict());
        assert_eq!(result.tags_or_unspecified("tech"), vec![Tag::Unspecified]);
    }

    #[test]
    fn markers_use_the_same_rule() {
        let d = dict();
        assert!(detect_markers("FAIR skin", &d).contains("target"));
        assert!(detect_markers(None, &d).is_empty());
        let (tags, markers) = Tagger::new(&d).annotate(Some("fair brown foam"));
        assert_eq!(tags.get("tech"), ["foam".to_string()]);
        assert_eq!(markers.len(), 1);
    }

    #[test]
    fn contains_any_skips_blank_keywords() {
        assert!(contains_any("Brown Foam", &["foam"]));
        assert!(!contains_any("Brown Foam", &["", " "]));
        assert!(!contains_any("", &["foam"]));
    }
}
