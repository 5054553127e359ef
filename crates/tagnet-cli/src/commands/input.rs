//! Shared input handling: raw records, processed corpus and targets.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tagnet::prelude::*;
use tagnet::runtime::corpus::{load_raw_directory, load_raw_file};
use tracing::debug;


/// Raw records and a display name for the input.
pub fn load_raw(input: Option<&str>) -> Result<(String, Vec<RawRecord>)> {
    let Some(input) = input else {
        return Ok(("embedded-sample".to_string(), embedded_raw()));
    };
    let path = Path::new(input);
    if !path.exists() {
        bail!("Path does not exist: {}", path.display());
    }
    let raw = if path.is_dir() {
        load_raw_directory(path)
    } else {
        load_raw_file(path)
    }
    .with_context(|| format!("Failed to load records from {}", path.display()))?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| input.to_string());
    debug!(input = %path.display(), records = raw.len(), "raw records loaded");
    Ok((name, raw))
}

/// Tag and summarize the input.
pub fn process(dictionary: &TagDictionary, input: Option<&str>) -> Result<ProcessedCorpus> {
    let (name, raw) = load_raw(input)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Invalid progress template")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Tagging {} records...", raw.len()));

    let processed = ProcessedCorpus::process(&name, &raw, dictionary)?;
    spinner.finish_and_clear();

    println!(
        "{} {} records from {} (dictionary {}, fingerprint {})",
        "→".blue(),
        processed.corpus.len().to_string().cyan(),
        name.cyan(),
        dictionary.version(),
        processed.fingerprint.short().dimmed()
    );
    Ok(processed)
}

/// Parse a target filter: `all`, `platform:<name>`, `source:<kind>`,
/// `text:<kw>|<kw>`, `!<target>`, or a bare marker name.
pub fn parse_target(target: &str) -> Result<RecordFilter> {
    let target = target.trim();
    if target.is_empty() {
        bail!("Empty target");
    }
    if let Some(inner) = target.strip_prefix('!') {
        return Ok(parse_target(inner)?.negate());
    }
    let filter = match target.split_once(':') {
        Some(("platform", name)) => RecordFilter::Platform(name.to_string()),
        Some(("source", "listing")) => RecordFilter::Source(SourceKind::Listing),
        Some(("source", "post")) => RecordFilter::Source(SourceKind::Post),
        Some(("source", other)) => bail!("Unknown source kind: {} (use listing or post)", other),
        Some(("text", keywords)) => {
            RecordFilter::TextContains(keywords.split('|').map(String::from).collect())
        }
        Some((prefix, _)) => bail!("Unknown target prefix: {}", prefix),
        None if target == "all" => RecordFilter::All,
        None => RecordFilter::marker(target),
    };
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_parse_to_filters() {
        assert_eq!(parse_target("all").unwrap(), RecordFilter::All);
        assert_eq!(parse_target("whitening").unwrap(), RecordFilter::marker("whitening"));
        assert_eq!(
            parse_target("platform:xhs").unwrap(),
            RecordFilter::Platform("xhs".into())
        );
        assert_eq!(
            parse_target("source:listing").unwrap(),
            RecordFilter::Source(SourceKind::Listing)
        );
        assert_eq!(
            parse_target("text:foam|泡沫").unwrap(),
            RecordFilter::TextContains(vec!["foam".into(), "泡沫".into()])
        );
        assert_eq!(
            parse_target("!whitening").unwrap(),
            RecordFilter::marker("whitening").negate()
        );
        assert!(parse_target("source:blog").is_err());
        assert!(parse_target("colour:brown").is_err());
        assert!(parse_target("  ").is_err());
    }

    #[test]
    fn missing_input_defaults_to_the_sample() {
        let (name, raw) = load_raw(None).unwrap();
        assert_eq!(name, "embedded-sample");
        assert_eq!(raw.len(), 16);
        assert!(load_raw(Some("/no/such/input.json")).is_err());
    }

    #[test]
    fn files_load_under_their_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.json");
        std::fs::write(&path, r#"[{"title": "brown foam", "sales": 12}, {"content": "显白"}]"#).unwrap();
        let (name, raw) = load_raw(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(name, "listings");
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn processing_is_uncached_and_fingerprinted() {
        let dict = TagDictionary::builtin();
        let first = process(&dict, None).unwrap();
        let second = process(&dict, None).unwrap();
        assert_eq!(first.corpus.len(), 16);
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(first.fingerprint, Fingerprint::of(&dict, &embedded_raw()).unwrap());
    }
}
