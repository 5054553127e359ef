//! Build, lay out and print the tag graph for each target.

use anyhow::Result;
use colored::Colorize;
use tagnet::prelude::*;
use tracing::debug;

use crate::commands::input;
use crate::config::Config;

pub fn run(input: Option<&str>, targets: &[String], verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let dictionary = config.dictionary()?;
    let filters = targets
        .iter()
        .map(|t| input::parse_target(t))
        .collect::<Result<Vec<_>>>()?;

    let analyzer = config.analyzer(&dictionary);
    analyzer.validate()?;
    let processed = input::process(&dictionary, input)?;
    let analyses = analyzer.analyze_targets(processed.corpus.records(), &filters)?;

    for analysis in &analyses {
        debug!(
            label = %analysis.target,
            filtered = analysis.filtered_records,
            nodes = analysis.graph.node_count(),
            edges = analysis.graph.edge_count(),
            "target analyzed"
        );
        print_analysis(analysis, verbose);
    }
    Ok(())
}

fn print_analysis(analysis: &TargetAnalysis, verbose: bool) {
    println!();
    println!(
        "{} {} {}",
        "Target".white().bold(),
        analysis.target.cyan().bold(),
        format!("({} records)", analysis.filtered_records).dimmed()
    );
    println!("{}", "─".repeat(40).dimmed());

    if analysis.is_insufficient() {
        println!("  {}", "insufficient data".yellow());
        return;
    }

    println!("{}", "Nodes".blue().bold());
    for node in analysis.graph.nodes() {
        let position = analysis.layout.get(&node.id).unwrap_or_default();
        println!(
            "  {:<16} {:<8} {:>4}   ({:>6.3}, {:>6.3})",
            node.id,
            node.category.as_str().dimmed(),
            node.mention_count.to_string().cyan(),
            position.x,
            position.y
        );
    }

    let edges = export_edges(&analysis.graph);
    println!("{}", "Edges".blue().bold());
    if edges.is_empty() {
        println!("  {}", "no pair co-occurs in more than one record".dimmed());
    }
    for edge in &edges {
        println!(
            "  {} {} {}  {}",
            edge.source,
            "─".dimmed(),
            edge.target,
            edge.weight.to_string().cyan()
        );
    }

    if verbose {
        let stats = edge_stats(&edges);
        println!("{}", "Edge weights".blue().bold());
        println!(
            "  mean {:.2}, median {:.1}, min {}, max {}",
            stats.mean_weight, stats.median_weight, stats.min_weight, stats.max_weight
        );
    }
}
