//! Reference data command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use serde_json::Value as JsonValue;

use crate::config::Config;

/// Reference data subcommands
#[derive(Subcommand)]
pub enum ReferenceCommands {
    /// List match identifiers
    Matches,
    /// Show catalog and dataset statistics
    Stats,
}

/// Handle reference data commands
pub async fn handle_reference_command(command: ReferenceCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        ReferenceCommands::Matches => {
            let matches = client.list_matches().await?;
            if matches.is_empty() {
                println!("{}", "No matches found.".yellow());
            } else {
                println!("{}", format!("Found {} match(es):", matches.len()).bold());
                for id in matches {
                    println!("  {} {}", "▸".cyan(), id);
                }
            }
        }
        ReferenceCommands::Stats => {
            let stats = client.get_stats().await?;
            println!("{}", "Statistics:".bold());
            print_stats(&stats, 1);
        }
    }
    Ok(())
}

fn print_stats(value: &JsonValue, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        JsonValue::Object(map) => {
            for (key, value) in map {
                if value.is_object() {
                    println!("{}{}:", indent, key.cyan());
                    print_stats(value, depth + 1);
                } else {
                    println!("{}{}: {}", indent, key.cyan(), scalar(value));
                }
            }
        }
        other => println!("{}{}", indent, scalar(other)),
    }
}

fn scalar(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
