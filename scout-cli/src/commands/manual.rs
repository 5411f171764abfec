//! Manual pipeline command handlers
//!
//! Test-run or save a pipeline written by hand, or print a translated
//! pipeline as a starting point for editing.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use scout_client::PatternStore;
use scout_workbench::{ManualPipelineSession, NaturalQuerySession};
use std::io::Read;
use std::sync::Arc;

use crate::config::Config;
use crate::render;

/// Manual pipeline subcommands
#[derive(Subcommand)]
pub enum ManualCommands {
    /// Validate and run a pipeline without saving it
    Test {
        #[command(flatten)]
        draft: DraftArgs,

        /// Show every field of every row, not just the first row's
        #[arg(long)]
        all_columns: bool,
    },
    /// Save a pipeline as a new pattern
    Save {
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Print the pipeline generated for a request, ready for editing
    Draft {
        /// The natural-language request
        query: String,
    },
}

#[derive(Args)]
pub struct DraftArgs {
    /// File holding the pipeline as a JSON array ("-" for stdin)
    #[arg(short, long)]
    file: String,

    /// What the pipeline finds
    #[arg(short, long)]
    description: Option<String>,

    /// Pattern the pipeline was derived from
    #[arg(long)]
    based_on: Option<String>,
}

/// Handle manual pipeline commands
pub async fn handle_manual_command(command: ManualCommands, config: &Config) -> Result<()> {
    let store: Arc<dyn PatternStore> = Arc::new(config.client()?);

    match command {
        ManualCommands::Test { draft, all_columns } => {
            test_pipeline(store, &draft, all_columns).await
        }
        ManualCommands::Save { draft } => save_pipeline(store, &draft).await,
        ManualCommands::Draft { query } => print_draft(store, query).await,
    }
}

fn load_session(store: Arc<dyn PatternStore>, args: &DraftArgs) -> Result<ManualPipelineSession> {
    let text = read_pipeline(&args.file)?;

    let mut session = ManualPipelineSession::new(store);
    session.enter(None);
    session.set_pipeline_text(text);
    if let Some(description) = &args.description {
        session.set_description(description.clone());
    }
    session.set_based_on(args.based_on.clone());
    Ok(session)
}

async fn test_pipeline(
    store: Arc<dyn PatternStore>,
    args: &DraftArgs,
    all_columns: bool,
) -> Result<()> {
    let mut session = load_session(store, args)?;

    let outcome = session
        .test_manual_pipeline()
        .await
        .map(|response| response.results.clone().unwrap_or_default());
    let rows = match outcome {
        Ok(rows) => rows,
        Err(e) => {
            render::print_notice(session.notices().current());
            return Err(e.into());
        }
    };

    println!("{}", "✓ Pipeline is valid".green().bold());
    if let Some(count) = session.test_results().and_then(|r| r.row_count()) {
        println!("  Rows: {}", count);
    }
    render::print_notice(session.notices().current());
    println!();
    render::print_results(&rows, all_columns);
    Ok(())
}

async fn save_pipeline(store: Arc<dyn PatternStore>, args: &DraftArgs) -> Result<()> {
    let mut session = load_session(store, args)?;

    match session.save_manual_query().await {
        Ok(name) => {
            println!("{}", format!("✓ Query saved as \"{}\"", name).green().bold());
            Ok(())
        }
        Err(e) => {
            render::print_notice(session.notices().current());
            Err(e.into())
        }
    }
}

/// Translate `query` and print the pipeline the way the editor would start
async fn print_draft(store: Arc<dyn PatternStore>, query: String) -> Result<()> {
    let mut natural = NaturalQuerySession::new(store.clone());
    natural.set_auto_execute(false);
    natural.set_user_query(query);
    natural.execute_query().await?;

    let Some(source) = natural.manual_source() else {
        return Ok(());
    };
    let mut manual = ManualPipelineSession::new(store);
    manual.enter(None);
    manual.copy_current_pipeline(&source);

    let draft = manual.draft();
    eprintln!("{}", format!("# {}", draft.description).dimmed());
    if let Some(based_on) = &draft.based_on {
        eprintln!("{}", format!("# based on {}", based_on).dimmed());
    }
    println!("{}", draft.pipeline);
    Ok(())
}

fn read_pipeline(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read pipeline from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read pipeline file: {}", path))
}
