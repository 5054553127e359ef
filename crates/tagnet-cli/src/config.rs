//! Configuration management for the tagnet CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tagnet::prelude::*;

pub const CONFIG_FILE: &str = "tagnet.toml";

/// tagnet project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub layout: LayoutSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// JSON dictionary file; the built-in dictionary when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_edge_threshold")]
    pub edge_threshold: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixConfig {
    #[serde(default = "default_rows")]
    pub rows: String,
    #[serde(default = "default_cols")]
    pub cols: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSection {
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_ideal_edge_length")]
    pub ideal_edge_length: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

// Default value functions
fn default_top_k() -> usize { 5 }
fn default_categories() -> Vec<String> { vec!["color".into(), "brand".into(), "tech".into()] }
fn default_edge_threshold() -> u64 { 1 }
fn default_rows() -> String { "color".into() }
fn default_cols() -> String { "tech".into() }
fn default_iterations() -> usize { 50 }
fn default_ideal_edge_length() -> f64 { 0.8 }
fn default_seed() -> u64 { 42 }

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            categories: default_categories(),
            edge_threshold: default_edge_threshold(),
        }
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            ideal_edge_length: default_ideal_edge_length(),
            seed: default_seed(),
        }
    }
}

impl Config {
    /// Load config from tagnet.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        // Relative dictionary paths are relative to the config file.
        if let (Some(dict), Some(dir)) = (&config.dictionary.path, path.parent()) {
            if dict.is_relative() {
                config.dictionary.path = Some(dir.join(dict));
            }
        }
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// The configured dictionary, or the built-in one.
    pub fn dictionary(&self) -> Result<TagDictionary> {
        match &self.dictionary.path {
            Some(path) => load_dictionary(path),
            None => Ok(TagDictionary::builtin()),
        }
    }

    pub fn graph_builder(&self) -> GraphBuilder {
        GraphBuilder::new(self.graph.top_k)
            .categories(self.graph.categories.iter().cloned())
            .edge_threshold(self.graph.edge_threshold)
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            iterations: self.layout.iterations,
            ideal_edge_length: self.layout.ideal_edge_length,
            seed: self.layout.seed,
            ..LayoutConfig::default()
        }
    }

    pub fn analyzer<'d>(&self, dictionary: &'d TagDictionary) -> Analyzer<'d> {
        Analyzer::new(dictionary)
            .with_builder(self.graph_builder())
            .with_layout(self.layout_config())
            .with_matrix(self.matrix.rows.clone(), self.matrix.cols.clone())
    }
}

/// Read a dictionary file in either the nested mapping form
/// (`{"color": {"brown": [...]}}`) or the serialized form with explicit
/// `categories` and `markers` lists.
pub fn load_dictionary(path: &Path) -> Result<TagDictionary> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dictionary: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dictionary: {}", path.display()))?;
    let dictionary = if is_serialized_form(&value) {
        serde_json::from_value(value).map_err(anyhow::Error::from)
    } else {
        TagDictionary::from_mapping(&value).map_err(anyhow::Error::from)
    };
    dictionary.with_context(|| format!("Invalid dictionary: {}", path.display()))
}

/// The serialized form has a `version` string and a `categories` list of
/// objects. In the mapping form a top-level list is a marker's keywords,
/// so a marker named `categories` holds strings and is not mistaken for it.
fn is_serialized_form(value: &Value) -> bool {
    let versioned = value.get("version").map_or(false, Value::is_string);
    let categories = value
        .get("categories")
        .and_then(Value::as_array)
        .map_or(false, |list| list.iter().all(Value::is_object));
    versioned && categories
}

/// Find tagnet.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}
