//! Terminal rendering
//!
//! Tables, pattern details and notices, printed with `colored`.

use colored::*;
use scout_core::domain::pattern::{InputKind, QueryPattern};
use scout_core::domain::result::{ConfidenceBand, NaturalQueryResult};
use scout_core::pipeline::pretty_pipeline;
use scout_workbench::projector;
use scout_workbench::{Notice, NoticeLevel};
use serde_json::Value as JsonValue;

/// Widest a table cell is allowed to get
const MAX_CELL_WIDTH: usize = 40;

/// Print result records as a table
///
/// With `all_columns` every field of every record gets a column; otherwise
/// columns come from the first record.
pub fn print_results(results: &[JsonValue], all_columns: bool) {
    if results.is_empty() {
        println!("{}", "No results.".yellow());
        return;
    }

    let columns = if all_columns {
        projector::all_columns(results)
    } else {
        projector::columns(results)
    };
    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| {
            projector::row(r, &columns)
                .into_iter()
                .map(|cell| truncate(&cell, MAX_CELL_WIDTH))
                .collect()
        })
        .collect();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(&truncate(c, *w), *w))
        .collect();
    println!("{}", header.join("  ").bold());
    println!(
        "{}",
        "─".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)).dimmed()
    );
    for row in rows {
        let cells: Vec<String> = row.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
        println!("{}", cells.join("  "));
    }
}

/// Print one line per pattern
pub fn print_pattern_summary(pattern: &QueryPattern, collected: bool) {
    let marker = if collected { "★".yellow() } else { "▸".cyan() };
    println!("  {} {}", marker, pattern.name.bold());
    if !pattern.description.is_empty() {
        println!("    {}", pattern.description.dimmed());
    }
    if !pattern.tags.is_empty() {
        let tags: Vec<&str> = pattern.tags.iter().map(String::as_str).collect();
        println!("    Tags: {}", tags.join(", ").cyan());
    }
}

/// Print a pattern with its parameters and pipeline
pub fn print_pattern_details(pattern: &QueryPattern) {
    println!("{}", "Pattern Details:".bold());
    println!("  Name:        {}", pattern.name.cyan());
    println!("  Type:        {:?}", pattern.kind);
    if !pattern.description.is_empty() {
        println!("  Description: {}", pattern.description);
    }
    if !pattern.tags.is_empty() {
        let tags: Vec<&str> = pattern.tags.iter().map(String::as_str).collect();
        println!("  Tags:        {}", tags.join(", "));
    }
    if let Some(created) = pattern.created_at {
        println!("  Created:     {}", created.format("%Y-%m-%d %H:%M:%S"));
    }

    if !pattern.parameters.is_empty() {
        println!("\n{}", "Parameters:".bold());
        for param in &pattern.parameters {
            let required = if param.required { "*" } else { "" };
            let kind = match param.input_kind() {
                InputKind::Text => "text",
                InputKind::Number => "number",
                InputKind::Checkbox => "boolean",
            };
            println!(
                "  - {}{} ({}) {}",
                param.name.cyan(),
                required.red(),
                param.label(),
                kind.dimmed()
            );
        }
    }

    if let Some(pipeline) = &pattern.pipeline {
        println!("\n{}", "Pipeline:".bold());
        println!("{}", pretty_pipeline(pipeline));
    }
    if let Some(code) = &pattern.python_code {
        println!("\n{}", "Python:".bold());
        println!("{}", code);
    }
}

/// Print a translation with its confidence and optional pipeline
pub fn print_translation(result: &NaturalQueryResult, show_pipeline: bool) {
    let confidence = format!("{:.0}%", result.confidence() * 100.0);
    let confidence = match result.confidence_band() {
        ConfidenceBand::High => confidence.green(),
        ConfidenceBand::Medium => confidence.yellow(),
        ConfidenceBand::Low => confidence.red(),
    };

    println!("{}", "Translation:".bold());
    if !result.explanation.is_empty() {
        println!("  {}", result.explanation);
    }
    println!("  Confidence: {}", confidence);
    if let Some(saved_as) = &result.saved_as {
        println!("  Saved as:   {}", saved_as.cyan());
    }
    if let Some(count) = result.row_count() {
        println!("  Rows:       {}", count);
    }
    if !result.similar_queries.is_empty() {
        println!("  Similar:");
        for similar in &result.similar_queries {
            match similar.similarity {
                Some(score) => println!("    - {} ({:.2})", similar.name.cyan(), score),
                None => println!("    - {}", similar.name.cyan()),
            }
        }
    }
    if show_pipeline {
        println!("\n{}", "Pipeline:".bold());
        println!("{}", pretty_pipeline(&result.pipeline));
    }
}

/// Print the session notice, if any
pub fn print_notice(notice: Option<&Notice>) {
    let Some(notice) = notice else {
        return;
    };
    let text = match notice.level {
        NoticeLevel::Info => notice.text.normal(),
        NoticeLevel::Success => format!("✓ {}", notice.text).green(),
        NoticeLevel::Warning => format!("⚠ {}", notice.text).yellow(),
        NoticeLevel::Error => format!("✗ {}", notice.text).red(),
    };
    println!("{}", text);
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}
