//! Show corpus statistics.

use anyhow::Result;
use colored::Colorize;
use tagnet::prelude::*;

use crate::commands::input;
use crate::config::Config;

pub fn run(input: Option<&str>, category: &str, top: usize) -> Result<()> {
    let config = Config::load()?;
    let dictionary = config.dictionary()?;
    dictionary.require_categories(&[category])?;
    let processed = input::process(&dictionary, input)?;
    let summary = &processed.summary;
    let records = processed.corpus.records();

    println!();
    println!("{}", "Tagnet Corpus Statistics".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Records".blue().bold());
    println!("  Total records:     {}", summary.total_records.to_string().cyan());
    println!("  Untagged:          {}", summary.untagged_records.to_string().cyan());
    println!("  Tag coverage:      {}", format!("{:.1}%", summary.coverage() * 100.0).cyan());
    println!("  Total weight:      {}", format!("{:.1}", summary.total_weight).cyan());
    println!();

    println!("{}", "Sources".blue().bold());
    for (platform, count) in &summary.by_platform {
        println!("  {:<18} {}", format!("{}:", platform), count.to_string().cyan());
    }
    for (source, count) in &summary.by_source {
        println!("  {:<18} {}", format!("{}:", source), count.to_string().cyan());
    }
    println!();

    println!("{}", "Markers".blue().bold());
    if summary.by_marker.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for (marker, count) in &summary.by_marker {
        println!("  {:<18} {}", format!("{}:", marker), count.to_string().cyan());
    }
    println!();

    println!("{}", format!("Top {} tags per category", top).blue().bold());
    for (name, counter) in summary.frequencies.iter() {
        let ranked: Vec<String> = counter
            .most_common(top)
            .into_iter()
            .map(|(tag, count)| format!("{} ({})", tag, count))
            .collect();
        let line = if ranked.is_empty() {
            "none".dimmed().to_string()
        } else {
            ranked.join(", ")
        };
        println!("  {:<12} {}", name, line);
    }
    println!();

    println!("{}", format!("Primary {} distribution", category).blue().bold());
    for (tag, count) in primary_distribution(records, &RecordFilter::All, category).iter().take(top) {
        println!("  {:<18} {}", format!("{}:", tag), count.to_string().cyan());
    }
    println!();

    println!("{}", format!("Listing sales by {}", category).blue().bold());
    let bars = sales_bars(records, &dictionary, category);
    let max = bars.first().map_or(0.0, |b| b.total_weight).max(f64::EPSILON);
    for bar in bars.iter().take(top) {
        let width = ((bar.total_weight / max) * 24.0).round() as usize;
        println!(
            "  {:<18} {} {:.1} {}",
            bar.label,
            "█".repeat(width).green(),
            bar.total_weight,
            bar.color.as_str().dimmed()
        );
    }
    println!();

    println!("{}", "Mean post likes by topic".blue().bold());
    let topics = likes_by_topic(records, category);
    for topic in topics.iter().take(top) {
        let label = match &topic.category {
            Some(c) => format!("{}/{}", c, topic.topic),
            None => format!("[{}]", topic.topic),
        };
        println!(
            "  {:<24} {:>10.1} {}",
            label,
            topic.mean_weight,
            format!("({} posts)", topic.records).dimmed()
        );
    }

    Ok(())
}

/// Listing weights are sales and post weights are likes, so each ranking
/// reads one source kind only.
fn sales_bars(records: &[Record], dictionary: &TagDictionary, category: &str) -> Vec<SwatchBar> {
    let ranking = weight_sum_by_tag(records, &RecordFilter::Source(SourceKind::Listing), category);
    swatch_bars(&ranking, dictionary, category)
}

fn likes_by_topic(records: &[Record], category: &str) -> Vec<TopicWeight> {
    weighted_mean_by_topic(records, &RecordFilter::Source(SourceKind::Post), &[category])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(dict: &TagDictionary) -> Corpus {
        let raw = vec![
            RawRecord::new("brown foam").with_weight(100.0).with_platform("taobao", SourceKind::Listing),
            RawRecord::new("brown").with_weight(50.0).with_platform("jd", SourceKind::Listing),
            RawRecord::new("brown foam").with_weight(7.0).with_platform("xhs", SourceKind::Post),
            RawRecord::new("red").with_weight(3.0).with_platform("xhs", SourceKind::Post),
        ];
        Corpus::from_raw("mixed", &raw, dict)
    }

    fn dictionary() -> TagDictionary {
        TagDictionary::builder("stats")
            .category("color", |c| c.tag("brown", ["brown"]).tag("red", ["red"]))
            .category("tech", |c| c.tag("foam", ["foam"]))
            .build()
            .unwrap()
    }

    #[test]
    fn sales_come_from_listings_only() {
        let dict = dictionary();
        let corpus = corpus(&dict);
        let bars = sales_bars(corpus.records(), &dict, "color");
        let totals: Vec<(&str, f64)> = bars.iter().map(|b| (b.label.as_str(), b.total_weight)).collect();
        assert_eq!(totals, vec![("brown", 150.0)]);
    }

    #[test]
    fn likes_come_from_posts_only() {
        let dict = dictionary();
        let corpus = corpus(&dict);
        let topics = likes_by_topic(corpus.records(), "color");
        let means: Vec<(&str, f64, u64)> = topics
            .iter()
            .map(|t| (t.topic.as_str(), t.mean_weight, t.records))
            .collect();
        assert_eq!(means, vec![("brown", 7.0, 1), ("red", 3.0, 1)]);
    }
}
