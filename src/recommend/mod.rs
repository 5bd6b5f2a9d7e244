//! Recommendation module for Velg.
//!
//! Asks an LLM to pick the best-titled video from a candidate list.

mod title;

pub use title::TitlePicker;

use crate::error::Result;
use crate::search::VideoCandidate;
use async_trait::async_trait;

/// Trait for recommendation services.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Pick the best candidate for the query.
    ///
    /// Returns None without any outbound call when the candidate list is
    /// empty; otherwise returns the model's free-text answer.
    async fn recommend(
        &self,
        query: &str,
        candidates: &[VideoCandidate],
    ) -> Result<Option<String>>;
}
