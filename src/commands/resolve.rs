//! Resolve command implementation.
//!
//! Rewrites a raw stack trace (file or stdin) and returns the text.

use super::models::ResolveArgs;
use crate::resolver::StackTraceResolver;
use anyhow::{Context, Result};
use log::debug;
use std::io::Read;

/// Execute the resolve command, returning the rewritten stack trace
pub fn execute_resolve(args: ResolveArgs) -> Result<String> {
    let config = args.source_maps.to_config()?;
    let resolver =
        StackTraceResolver::from_config(&config).context("Failed to load source maps")?;

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stack trace from stdin")?;
            text
        }
    };

    let rewrite = resolver.rewrite(&text);
    debug!(
        "Resolved {} of {} frames ({} unresolved)",
        rewrite.resolved, rewrite.frames, rewrite.unresolved
    );

    Ok(rewrite.text)
}
