//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod ask;
mod manual;
mod pattern;
mod reference;
mod user;

pub use ask::AskArgs;
pub use manual::ManualCommands;
pub use pattern::PatternCommands;
pub use reference::ReferenceCommands;
pub use user::UserCommands;

use anyhow::{Context, Result};
use clap::Subcommand;
use std::io::{BufRead, Write};

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Browse, run and delete stored patterns
    Pattern {
        #[command(subcommand)]
        command: PatternCommands,
    },
    /// Translate a natural-language request into a pipeline
    Ask(AskArgs),
    /// Test or save a hand-written pipeline
    Manual {
        #[command(subcommand)]
        command: ManualCommands,
    },
    /// Reference data (matches, statistics)
    Reference {
        #[command(subcommand)]
        command: ReferenceCommands,
    },
    /// Login state and the pattern collection
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Pattern { command } => pattern::handle_pattern_command(command, config).await,
        Commands::Ask(args) => ask::handle_ask(args, config).await,
        Commands::Manual { command } => manual::handle_manual_command(command, config).await,
        Commands::Reference { command } => {
            reference::handle_reference_command(command, config).await
        }
        Commands::User { command } => user::handle_user_command(command, config).await,
    }
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Confirmation callback for destructive operations
///
/// `--yes` skips the prompt; a failed read counts as a no.
fn confirmer(assume_yes: bool) -> impl FnOnce(&str) -> bool {
    move |name: &str| {
        assume_yes
            || confirm(&format!("Are you sure you want to delete query \"{}\"?", name))
                .unwrap_or(false)
    }
}

/// Parse a single key=value pair
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}
