//! Print the co-occurrence matrix between two categories.

use anyhow::Result;
use colored::Colorize;
use tagnet::prelude::*;

use crate::commands::input;
use crate::config::Config;

pub fn run(
    input: Option<&str>,
    target: &str,
    rows: Option<String>,
    cols: Option<String>,
    top_k: Option<usize>,
) -> Result<()> {
    let config = Config::load()?;
    let dictionary = config.dictionary()?;
    let rows = rows.unwrap_or_else(|| config.matrix.rows.clone());
    let cols = cols.unwrap_or_else(|| config.matrix.cols.clone());
    dictionary.require_categories(&[rows.as_str(), cols.as_str()])?;
    let k = top_k.unwrap_or(config.graph.top_k);
    let filter = input::parse_target(target)?;

    let processed = input::process(&dictionary, input)?;
    let matrix = co_matrix(processed.corpus.records(), &filter, &rows, &cols, k, k);

    println!();
    println!(
        "{} {} × {} {}",
        "Co-occurrence".white().bold(),
        rows.cyan(),
        cols.cyan(),
        format!("({})", filter.label()).dimmed()
    );
    println!("{}", "─".repeat(40).dimmed());

    if matrix.is_empty() {
        println!("  {}", "insufficient data".yellow());
        return Ok(());
    }

    print!("{}", render(&matrix));
    Ok(())
}

/// Plain-text table, one row per row tag.
fn render(matrix: &CoMatrix) -> String {
    let label_width = matrix.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0).max(4);
    let widths: Vec<usize> = matrix
        .cols
        .iter()
        .map(|c| c.chars().count().max(matrix.max().to_string().len()))
        .collect();

    let mut out = format!("{:<w$}", "", w = label_width);
    for (col, width) in matrix.cols.iter().zip(&widths) {
        out.push_str(&format!("  {:>w$}", col, w = width));
    }
    out.push('\n');
    for (row, cells) in matrix.rows.iter().zip(&matrix.cells) {
        out.push_str(&format!("{:<w$}", row, w = label_width));
        for (cell, width) in cells.iter().zip(&widths) {
            out.push_str(&format!("  {:>w$}", cell, w = width));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_a_line_per_row() {
        let matrix = CoMatrix {
            rows: vec!["brown".into(), "red".into()],
            cols: vec!["foam".into()],
            cells: vec![vec![3], vec![0]],
        };
        let table = render(&matrix);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("foam"));
        assert!(lines[1].starts_with("brown") && lines[1].ends_with('3'));
        assert!(lines[2].ends_with('0'));
    }
}
