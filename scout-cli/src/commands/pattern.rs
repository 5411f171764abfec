//! Pattern command handlers
//!
//! Listing the catalog, showing and running one pattern, deleting patterns.

use anyhow::{Result, bail};
use clap::Subcommand;
use colored::*;
use scout_client::PatternStore;
use scout_workbench::{ExecutionSession, Session};
use std::sync::Arc;

use super::{confirmer, parse_key_val};
use crate::config::Config;
use crate::name_resolver::resolve_pattern_name;
use crate::render;

/// Pattern subcommands
#[derive(Subcommand)]
pub enum PatternCommands {
    /// List stored patterns
    List {
        /// Only patterns with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show a pattern with its parameters and pipeline
    Show {
        /// Pattern name or unambiguous prefix
        name: String,
    },
    /// Run a pattern
    Run {
        /// Pattern name or unambiguous prefix
        name: String,

        /// Parameter values as key=value pairs (e.g., player=Messi)
        #[arg(short, long, value_parser = parse_key_val)]
        param: Vec<(String, String)>,

        /// Restrict to one match
        #[arg(short, long = "match")]
        match_id: Option<String>,

        /// Maximum number of rows
        #[arg(short, long, default_value_t = scout_core::dto::pattern::DEFAULT_RESULT_LIMIT)]
        limit: u32,

        /// Show every field of every row, not just the first row's
        #[arg(long)]
        all_columns: bool,
    },
    /// Delete a pattern
    Delete {
        /// Exact pattern name
        name: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Handle pattern commands
pub async fn handle_pattern_command(command: PatternCommands, config: &Config) -> Result<()> {
    let store: Arc<dyn PatternStore> = Arc::new(config.client()?);

    match command {
        PatternCommands::List { tag } => list_patterns(store, config, tag).await,
        PatternCommands::Show { name } => show_pattern(store.as_ref(), &name).await,
        PatternCommands::Run {
            name,
            param,
            match_id,
            limit,
            all_columns,
        } => run_pattern(store, &name, param, match_id, limit, all_columns).await,
        PatternCommands::Delete { name, yes } => delete_pattern(store, &name, yes).await,
    }
}

/// List the catalog, marking patterns in the user's collection
async fn list_patterns(
    store: Arc<dyn PatternStore>,
    config: &Config,
    tag: Option<String>,
) -> Result<()> {
    let mut session = ExecutionSession::new(store);
    session.load_queries(tag.as_deref()).await?;

    let client = Arc::new(config.client()?);
    let mut user = Session::with_file(client, &config.session_file);
    user.restore();

    let patterns = session.patterns();
    if patterns.is_empty() {
        println!("{}", "No patterns found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} pattern(s):", patterns.len()).bold());
    println!();
    for pattern in patterns {
        render::print_pattern_summary(pattern, user.is_query_saved(&pattern.name));
        println!();
    }
    Ok(())
}

async fn show_pattern(store: &dyn PatternStore, name: &str) -> Result<()> {
    let name = resolve_pattern_name(store, name).await?;
    let pattern = store.get_pattern(&name).await?;
    render::print_pattern_details(&pattern);
    Ok(())
}

async fn run_pattern(
    store: Arc<dyn PatternStore>,
    name: &str,
    params: Vec<(String, String)>,
    match_id: Option<String>,
    limit: u32,
    all_columns: bool,
) -> Result<()> {
    let name = resolve_pattern_name(store.as_ref(), name).await?;
    let mut session = ExecutionSession::new(store).with_limit(limit);

    session.select(&name).await?;
    for (key, value) in params {
        session.set_parameter(&key, value)?;
    }
    session.select_match(match_id);

    session.execute().await?;
    let Some(result) = session.result() else {
        return Ok(());
    };

    println!(
        "{}",
        format!("{}: {} row(s)", result.query_name, result.row_count()).bold()
    );
    if let Some(error) = &result.error {
        println!("{}", error.red());
    }
    println!();
    render::print_results(&result.results, all_columns);
    Ok(())
}

async fn delete_pattern(store: Arc<dyn PatternStore>, name: &str, yes: bool) -> Result<()> {
    let mut session = ExecutionSession::new(store);

    let deleted = match session.delete_pattern(name, confirmer(yes)).await {
        Ok(deleted) => deleted,
        Err(e) if e.is_not_found() => bail!("Pattern \"{}\" does not exist", name),
        Err(e) => return Err(e.into()),
    };
    if deleted {
        println!(
            "{}",
            format!("✓ Query \"{}\" deleted successfully!", name).green()
        );
        match session.error() {
            Some(error) => println!("  {}", error.yellow()),
            None => println!(
                "  {} pattern(s) remain",
                session.patterns().len().to_string().dimmed()
            ),
        }
    } else {
        println!("{}", "Cancelled.".yellow());
    }
    Ok(())
}
