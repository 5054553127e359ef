//! Tag a single text against the configured dictionary.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use tagnet::prelude::*;

use crate::config::Config;

pub fn run(text: &str, as_json: bool) -> Result<()> {
    let config = Config::load()?;
    let dictionary = config.dictionary()?;
    let (tags, markers) = Tagger::new(&dictionary).annotate(Some(text));

    if as_json {
        let categories: serde_json::Map<String, serde_json::Value> = tags
            .iter()
            .map(|(category, list)| (category.to_string(), json!(list)))
            .collect();
        let output = json!({
            "dictionary": dictionary.version(),
            "tags": categories,
            "markers": markers,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Tags".white().bold());
    for category in tags.categories() {
        let labels: Vec<String> = tags
            .tags_or_unspecified(category)
            .iter()
            .map(|t| match t {
                Tag::Named(name) => name.as_str().cyan().to_string(),
                Tag::Unspecified => t.to_string().as_str().dimmed().to_string(),
            })
            .collect();
        println!("  {:<12} {}", category, labels.join(", "));
    }

    println!();
    if markers.is_empty() {
        println!("{} {}", "Markers".white().bold(), "none".dimmed());
    } else {
        let names: Vec<&str> = markers.iter().map(String::as_str).collect();
        println!("{} {}", "Markers".white().bold(), names.join(", ").green());
    }
    Ok(())
}
