//! Find command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::input::QuerySource;
use crate::orchestrator::{default_query_source, Orchestrator};
use crate::voice::VoiceInput;
use anyhow::Result;
use std::sync::Arc;

/// Run the find command.
pub async fn run_find(
    query: Option<String>,
    voice: bool,
    model: Option<String>,
    days: Option<i64>,
    mut settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check_find(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'velg doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(days) = days {
        settings.search.published_within_days = days;
    }
    if let Some(model) = model {
        settings.recommend.model = model;
    }

    let source: Arc<dyn QuerySource> = if voice {
        Arc::new(VoiceInput::new(&settings.voice))
    } else {
        default_query_source(&settings)
    };

    let orchestrator = Orchestrator::with_query_source(&settings, source)?;

    let query = match query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()) {
        Some(q) => q,
        None => match orchestrator.acquire_query().await? {
            Some(q) => q,
            None => {
                Output::info("No query was provided.");
                return Ok(());
            }
        },
    };

    let spinner = Output::spinner("Searching YouTube for videos...");
    let candidates = match orchestrator.search(&query).await {
        Ok(candidates) => {
            spinner.finish_and_clear();
            candidates
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    if candidates.is_empty() {
        Output::info("No suitable videos found.");
        return Ok(());
    }

    Output::info(&format!(
        "Found {} relevant videos. Asking {} for a pick...",
        candidates.len(),
        settings.recommend.model
    ));

    let spinner = Output::spinner("Evaluating titles...");
    let recommendation = match orchestrator.recommend(&query, &candidates).await {
        Ok(recommendation) => {
            spinner.finish_and_clear();
            recommendation.unwrap_or_default()
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    Output::header("Recommendation");
    println!("\n{}\n", recommendation);

    Output::header("Top Video Links");
    for (index, video) in candidates.iter().enumerate() {
        Output::ranked_item(index + 1, &video.title, &video.url);
    }

    Ok(())
}
