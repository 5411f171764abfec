//! Natural-language query command
//!
//! Translates a request, optionally refines it, saves the pipeline as a new
//! pattern or deletes the pattern the translator saved.

use anyhow::{Result, bail};
use clap::Args;
use colored::*;
use scout_workbench::NaturalQuerySession;
use scout_workbench::natural::EXAMPLES;
use std::sync::Arc;

use super::confirmer;
use crate::config::Config;
use crate::render;

#[derive(Args)]
pub struct AskArgs {
    /// The request, e.g. "Show me all goals by Messi"
    #[arg(required_unless_present_any = ["example", "similar", "list_examples"])]
    query: Option<String>,

    /// Use one of the built-in example prompts (1-based)
    #[arg(long, conflicts_with_all = ["query", "similar"])]
    example: Option<usize>,

    /// Translate the description of a stored pattern instead
    #[arg(long, conflicts_with = "query")]
    similar: Option<String>,

    /// List the built-in example prompts
    #[arg(long)]
    list_examples: bool,

    /// Refine the translation with extra context
    #[arg(short, long)]
    refine: Option<String>,

    /// Replace the request text when refining
    #[arg(long, requires = "refine")]
    rephrase: Option<String>,

    /// Only translate, do not run the pipeline
    #[arg(long)]
    no_execute: bool,

    /// Restrict to one match
    #[arg(short, long = "match")]
    match_id: Option<String>,

    /// Maximum number of rows
    #[arg(short, long, default_value_t = scout_core::dto::pattern::DEFAULT_RESULT_LIMIT)]
    limit: u32,

    /// Print the generated pipeline
    #[arg(long)]
    show_pipeline: bool,

    /// Show every field of every row, not just the first row's
    #[arg(long)]
    all_columns: bool,

    /// Save the pipeline as a pattern; without a value the name is generated
    #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
    save: Option<String>,

    /// Description for the saved pattern
    #[arg(long, requires = "save")]
    description: Option<String>,

    /// Comma-separated tags for the saved pattern
    #[arg(long, requires = "save")]
    tags: Option<String>,

    /// Delete the pattern the translator saved this request as
    #[arg(long, conflicts_with = "save")]
    delete_saved: bool,

    /// Do not ask for confirmation when deleting
    #[arg(short, long)]
    yes: bool,
}

pub async fn handle_ask(args: AskArgs, config: &Config) -> Result<()> {
    if args.list_examples {
        for (i, example) in EXAMPLES.iter().enumerate() {
            println!("  {} {}", format!("{}.", i + 1).dimmed(), example);
        }
        return Ok(());
    }

    let mut session = NaturalQuerySession::new(Arc::new(config.client()?));
    session.set_auto_execute(!args.no_execute);
    session.set_match(args.match_id.clone());
    session.set_limit(args.limit);

    let translated = if let Some(n) = args.example {
        let Some(example) = n.checked_sub(1).and_then(|i| EXAMPLES.get(i)) else {
            bail!("Example must be between 1 and {}", EXAMPLES.len());
        };
        session.use_example(example).await
    } else if let Some(name) = &args.similar {
        session.use_similar_query(name).await
    } else {
        session.set_user_query(args.query.clone().unwrap_or_default());
        session.execute_query().await
    }
    .map(|_| ());
    if let Err(e) = translated {
        render::print_notice(session.notices().current());
        return Err(e.into());
    }
    show(&session, &args);

    if let Some(hint) = &args.refine {
        session.toggle_refine_form();
        if let Some(text) = &args.rephrase {
            session.set_user_query(text.clone());
        }
        session.set_refinement_hint(hint.clone());
        println!();
        let refined = session.refine_query().await.map(|_| ());
        if let Err(e) = refined {
            render::print_notice(session.notices().current());
            return Err(e.into());
        }
        show(&session, &args);
    }

    if let Some(name) = &args.save {
        save(&mut session, name, &args).await?;
    } else if args.delete_saved {
        if session.delete_query(confirmer(args.yes)).await? {
            render::print_notice(session.notices().current());
        } else {
            println!("{}", "Cancelled.".yellow());
        }
    }
    Ok(())
}

fn show(session: &NaturalQuerySession, args: &AskArgs) {
    let Some(result) = session.result() else {
        return;
    };
    render::print_translation(result, args.show_pipeline || args.no_execute);
    render::print_notice(session.notices().current());
    if let Some(rows) = &result.results {
        println!();
        render::print_results(rows, args.all_columns);
    }
}

async fn save(session: &mut NaturalQuerySession, name: &str, args: &AskArgs) -> Result<()> {
    session.open_save_dialog();
    if !name.is_empty() {
        session.set_save_name(name);
    }
    if let Some(description) = &args.description {
        session.set_save_description(description.clone());
    }
    if let Some(tags) = &args.tags {
        session.set_save_tags(tags.clone());
    }

    println!();
    match session.save_query().await {
        Ok(_) => {
            if let Some(message) = &session.save_dialog().success {
                println!("{}", format!("✓ {}", message).green());
            }
            Ok(())
        }
        Err(e) => {
            if let Some(message) = &session.save_dialog().error {
                println!("{}", format!("✗ {}", message).red());
            }
            Err(e.into())
        }
    }
}
