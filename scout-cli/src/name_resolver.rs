//! Pattern name resolver
//!
//! Lets users type an unambiguous prefix instead of a full pattern name.

use anyhow::{Context, Result, anyhow};
use scout_client::PatternStore;

/// Resolve a pattern name or prefix against the catalog
///
/// An exact name wins even if it is also a prefix of other names.
///
/// # Errors
/// Returns an error if:
/// - No pattern matches the prefix
/// - Multiple patterns match the prefix (ambiguous)
/// - API call fails
pub async fn resolve_pattern_name(store: &dyn PatternStore, input: &str) -> Result<String> {
    let patterns = store
        .list_patterns(None)
        .await
        .context("Failed to fetch patterns for name resolution")?;

    match_name(patterns.iter().map(|p| p.name.as_str()), input)
}

fn match_name<'a>(names: impl Iterator<Item = &'a str>, input: &str) -> Result<String> {
    let prefix = input.to_lowercase();
    let mut matches = Vec::new();
    for name in names {
        if name == input {
            return Ok(name.to_string());
        }
        if name.to_lowercase().starts_with(&prefix) {
            matches.push(name);
        }
    }

    match matches.as_slice() {
        [] => Err(anyhow!("No pattern found with name starting with '{}'", input)),
        [only] => Ok(only.to_string()),
        _ => Err(anyhow!(
            "Ambiguous prefix '{}' matches multiple patterns: {}",
            input,
            matches.join(", ")
        )),
    }
}
