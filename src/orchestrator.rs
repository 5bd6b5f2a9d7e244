//! Pipeline orchestrator for Velg.
//!
//! Coordinates one run: acquire a query, search for videos, ask the model
//! for a recommendation. The stages are strictly sequential and there is
//! no retry anywhere; search or recommendation failures propagate to the
//! caller.

use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::input::{InteractiveInput, QuerySource, TypedInput};
use crate::recommend::{Recommender, TitlePicker};
use crate::search::{VideoCandidate, VideoSearch, YouTubeClient};
use crate::voice::VoiceInput;
use std::sync::Arc;
use tracing::{info, instrument};

/// How one pipeline run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No usable query was provided.
    NoQuery,
    /// The search returned no suitable videos.
    NoVideos { query: String },
    /// A recommendation was produced.
    Recommended {
        query: String,
        recommendation: String,
        candidates: Vec<VideoCandidate>,
    },
}

/// The main orchestrator for the Velg pipeline.
pub struct Orchestrator {
    source: Arc<dyn QuerySource>,
    searcher: Arc<dyn VideoSearch>,
    recommender: Arc<dyn Recommender>,
}

impl Orchestrator {
    /// Create a new orchestrator with the default interactive query source.
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_query_source(settings, default_query_source(settings))
    }

    /// Create an orchestrator with a specific query source.
    pub fn with_query_source(
        settings: &Settings,
        source: Arc<dyn QuerySource>,
    ) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let searcher = Arc::new(YouTubeClient::new(&settings.search)?);
        let recommender =
            Arc::new(TitlePicker::new(&settings.recommend).with_prompts(prompts));

        Ok(Self {
            source,
            searcher,
            recommender,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        source: Arc<dyn QuerySource>,
        searcher: Arc<dyn VideoSearch>,
        recommender: Arc<dyn Recommender>,
    ) -> Self {
        Self {
            source,
            searcher,
            recommender,
        }
    }

    /// Acquire one query from the configured source.
    pub async fn acquire_query(&self) -> Result<Option<String>> {
        self.source.acquire().await
    }

    /// Search for candidate videos.
    pub async fn search(&self, query: &str) -> Result<Vec<VideoCandidate>> {
        self.searcher.search(query).await
    }

    /// Ask the model to pick the best candidate.
    pub async fn recommend(
        &self,
        query: &str,
        candidates: &[VideoCandidate],
    ) -> Result<Option<String>> {
        self.recommender.recommend(query, candidates).await
    }

    /// Run the full pipeline once.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<RunOutcome> {
        let Some(query) = self.acquire_query().await? else {
            return Ok(RunOutcome::NoQuery);
        };
        info!("Query: {}", query);

        let candidates = self.search(&query).await?;
        if candidates.is_empty() {
            return Ok(RunOutcome::NoVideos { query });
        }
        info!("{} candidates after filtering", candidates.len());

        let recommendation = self
            .recommend(&query, &candidates)
            .await?
            .unwrap_or_default();

        Ok(RunOutcome::Recommended {
            query,
            recommendation,
            candidates,
        })
    }
}

/// The default acquisition path: interactive voice/typed chooser.
pub fn default_query_source(settings: &Settings) -> Arc<dyn QuerySource> {
    Arc::new(InteractiveInput::new(
        Arc::new(VoiceInput::new(&settings.voice)),
        Arc::new(TypedInput),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedSource(Option<String>);

    #[async_trait]
    impl QuerySource for FixedSource {
        async fn acquire(&self) -> Result<Option<String>> {
            Ok(self.0.clone())
        }
    }

    struct FakeSearch {
        results: Vec<VideoCandidate>,
        calls: AtomicUsize,
    }

    impl FakeSearch {
        fn returning(results: Vec<VideoCandidate>) -> Arc<Self> {
            Arc::new(Self {
                results,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl VideoSearch for FakeSearch {
        async fn search(&self, _query: &str) -> Result<Vec<VideoCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.clone())
        }
    }

    #[derive(Default)]
    struct FakeRecommender {
        seen_counts: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Recommender for FakeRecommender {
        async fn recommend(
            &self,
            _query: &str,
            candidates: &[VideoCandidate],
        ) -> Result<Option<String>> {
            self.seen_counts.lock().unwrap().push(candidates.len());
            if candidates.is_empty() {
                return Ok(None);
            }
            Ok(Some(format!("Pick: {}", candidates[0].title)))
        }
    }

    fn candidate(title: &str) -> VideoCandidate {
        VideoCandidate {
            title: title.to_string(),
            url: format!("https://www.youtube.com/watch?v={}", title),
        }
    }

    #[tokio::test]
    async fn test_empty_query_stops_before_search() {
        let searcher = FakeSearch::returning(vec![candidate("Unreachable")]);
        let recommender = Arc::new(FakeRecommender::default());

        let orchestrator = Orchestrator::with_components(
            Arc::new(FixedSource(None)),
            searcher.clone(),
            recommender.clone(),
        );

        let outcome = orchestrator.run().await.unwrap();
        assert!(matches!(outcome, RunOutcome::NoQuery));
        assert_eq!(searcher.calls.load(Ordering::SeqCst), 0);
        assert!(recommender.seen_counts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_search_stops_before_recommendation() {
        let searcher = FakeSearch::returning(Vec::new());
        let recommender = Arc::new(FakeRecommender::default());

        let orchestrator = Orchestrator::with_components(
            Arc::new(FixedSource(Some("cats".to_string()))),
            searcher.clone(),
            recommender.clone(),
        );

        let outcome = orchestrator.run().await.unwrap();
        match outcome {
            RunOutcome::NoVideos { query } => assert_eq!(query, "cats"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(searcher.calls.load(Ordering::SeqCst), 1);
        assert!(recommender.seen_counts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_survivor_reaches_recommender() {
        // The duration filter leaves one of three search hits standing;
        // see the search module tests for the filter itself.
        let searcher = FakeSearch::returning(vec![candidate("Relaxing Piano - 10 Minutes")]);
        let recommender = Arc::new(FakeRecommender::default());

        let orchestrator = Orchestrator::with_components(
            Arc::new(FixedSource(Some("relaxing piano music".to_string()))),
            searcher.clone(),
            recommender.clone(),
        );

        let outcome = orchestrator.run().await.unwrap();
        match outcome {
            RunOutcome::Recommended {
                query,
                recommendation,
                candidates,
            } => {
                assert_eq!(query, "relaxing piano music");
                assert_eq!(candidates.len(), 1);
                assert_eq!(recommendation, "Pick: Relaxing Piano - 10 Minutes");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(*recommender.seen_counts.lock().unwrap(), vec![1]);
    }
}
