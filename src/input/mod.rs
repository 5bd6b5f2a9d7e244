//! Query acquisition for Velg.
//!
//! A query can come from the keyboard or from the microphone; both paths
//! implement the same [`QuerySource`] trait so the orchestrator does not
//! care which one produced the text.

use crate::error::Result;
use async_trait::async_trait;
use console::style;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Trait for query sources.
#[async_trait]
pub trait QuerySource: Send + Sync {
    /// Acquire one query, or None when no usable query was provided.
    async fn acquire(&self) -> Result<Option<String>>;
}

/// Trim a raw input line into a usable query.
pub(crate) fn normalize(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Typed query input: one line from stdin, trimmed.
pub struct TypedInput;

#[async_trait]
impl QuerySource for TypedInput {
    async fn acquire(&self) -> Result<Option<String>> {
        print!("{} ", style("Enter your query:").bold());
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;

        Ok(normalize(&line))
    }
}

/// Interactive input that lets the user pick voice or typed entry.
pub struct InteractiveInput {
    voice: Arc<dyn QuerySource>,
    typed: Arc<dyn QuerySource>,
}

impl InteractiveInput {
    pub fn new(voice: Arc<dyn QuerySource>, typed: Arc<dyn QuerySource>) -> Self {
        Self { voice, typed }
    }
}

#[async_trait]
impl QuerySource for InteractiveInput {
    async fn acquire(&self) -> Result<Option<String>> {
        print!("{} ", style("Use voice or text input? (v/t):").bold());
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;

        // Anything other than 'v' falls back to typed input.
        if line.trim().eq_ignore_ascii_case("v") {
            self.voice.acquire().await
        } else {
            self.typed.acquire().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize("  cats  "), Some("cats".to_string()));
        assert_eq!(normalize("cats\n"), Some("cats".to_string()));
        assert_eq!(normalize("relaxing piano music"), Some("relaxing piano music".to_string()));
    }

    #[test]
    fn test_normalize_empty_is_none() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   \n"), None);
    }
}
