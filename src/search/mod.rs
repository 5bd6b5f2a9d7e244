//! Video search module for Velg.
//!
//! Searches YouTube for recent videos matching a query and filters them
//! down to watchable lengths.

mod duration;
mod youtube;

pub use duration::IsoDuration;
pub use youtube::YouTubeClient;

use crate::error::Result;
use async_trait::async_trait;

/// A video surviving the duration filter, in platform relevance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    /// Video title as reported by the platform.
    pub title: String,
    /// Full watch URL.
    pub url: String,
}

/// Trait for video search services.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Search for recent videos matching the query.
    ///
    /// Returns duration-filtered candidates in the platform's relevance
    /// order, or an empty list when nothing matched.
    async fn search(&self, query: &str) -> Result<Vec<VideoCandidate>>;
}
