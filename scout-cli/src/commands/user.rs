//! User command handlers
//!
//! Login/logout and the logged-in user's pattern collection.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use scout_workbench::Session;
use std::sync::Arc;

use crate::config::Config;
use crate::render;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Log in with an email address
    Login {
        email: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Forget the logged-in user
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage the pattern collection
    Collection {
        #[command(subcommand)]
        command: CollectionCommands,
    },
}

#[derive(Subcommand)]
pub enum CollectionCommands {
    /// List patterns in the collection
    List,
    /// Add a pattern to the collection
    Add { name: String },
    /// Remove a pattern from the collection
    Remove { name: String },
}

/// Handle user commands
pub async fn handle_user_command(command: UserCommands, config: &Config) -> Result<()> {
    let mut session = Session::with_file(Arc::new(config.client()?), &config.session_file);
    session.restore();

    match command {
        UserCommands::Login { email, name } => {
            let user = session.login(&email, name.as_deref()).await?;
            println!("{}", format!("✓ Logged in as {}", user.email).green());
        }
        UserCommands::Logout => {
            session.logout();
            println!("{}", "Logged out.".green());
        }
        UserCommands::Whoami => match session.current() {
            Some(user) => {
                println!("  Email:    {}", user.email.cyan());
                if !user.name.is_empty() {
                    println!("  Name:     {}", user.name);
                }
                if !user.provider.is_empty() {
                    println!("  Provider: {}", user.provider.dimmed());
                }
                if let Some(last) = user.last_login {
                    println!("  Last login: {}", last.format("%Y-%m-%d %H:%M:%S"));
                }
                println!("  Saved queries: {}", user.saved_queries.len());
            }
            None => println!("{}", "Not logged in.".yellow()),
        },
        UserCommands::Collection { command } => match command {
            CollectionCommands::List => {
                let patterns = session.collection().await?;
                if patterns.is_empty() {
                    println!("{}", "Your collection is empty.".yellow());
                }
                for pattern in &patterns {
                    render::print_pattern_summary(pattern, true);
                }
            }
            CollectionCommands::Add { name } => {
                session.add_to_collection(&name).await?;
                println!("{}", format!("✓ Added \"{}\" to your collection!", name).green());
            }
            CollectionCommands::Remove { name } => {
                session.remove_from_collection(&name).await?;
                println!("{}", format!("✓ Removed \"{}\" from your collection", name).green());
            }
        },
    }
    Ok(())
}
