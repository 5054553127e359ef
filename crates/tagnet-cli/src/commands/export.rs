//! Export a target's graph as JSON.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;
use tagnet::prelude::*;

use crate::commands::input;
use crate::config::Config;

pub fn run(input: Option<&str>, target: &str, output: &str, format: &str) -> Result<()> {
    if !matches!(format, "edges" | "scene") {
        bail!("Unknown format: {}. Use 'edges' or 'scene'", format);
    }

    let config = Config::load()?;
    let dictionary = config.dictionary()?;
    let filter = input::parse_target(target)?;
    let analyzer = config.analyzer(&dictionary);
    analyzer.validate()?;

    let processed = input::process(&dictionary, input)?;
    let analysis = analyzer.analyze(processed.corpus.records(), &filter, &filter.label())?;

    let json = render(&analysis, format)?;
    let path = Path::new(output);
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    if analysis.is_insufficient() {
        println!("  {} {} has insufficient data", "•".yellow(), analysis.target);
    }
    println!(
        "{} Exported {} nodes, {} edges to {}",
        "✓".green(),
        analysis.graph.node_count().to_string().cyan(),
        analysis.graph.edge_count().to_string().cyan(),
        path.display().to_string().cyan()
    );
    Ok(())
}

fn render(analysis: &TargetAnalysis, format: &str) -> Result<String> {
    let json = match format {
        "scene" => Scene::from_analysis(analysis).to_json()?,
        _ => AnalysisExport::from_analysis(analysis).to_json()?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_formats_serialize_the_sample() {
        let dict = TagDictionary::builtin();
        let corpus = Corpus::from_embedded(&dict);
        let analysis = Config::default()
            .analyzer(&dict)
            .analyze(corpus.records(), &RecordFilter::marker("whitening"), "whitening")
            .unwrap();

        let edges: serde_json::Value = serde_json::from_str(&render(&analysis, "edges").unwrap()).unwrap();
        assert_eq!(edges["target"], "whitening");
        assert!(edges["stats"].is_object());

        let scene: serde_json::Value = serde_json::from_str(&render(&analysis, "scene").unwrap()).unwrap();
        assert_eq!(scene["title"], "whitening");
        assert_eq!(
            scene["nodes"].as_array().map(Vec::len),
            Some(analysis.graph.node_count())
        );
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = run(None, "all", "/tmp/never-written.json", "svg").unwrap_err();
        assert!(err.to_string().contains("Unknown format"));
    }
}
