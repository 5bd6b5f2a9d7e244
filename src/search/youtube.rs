//! YouTube Data API v3 search implementation.

use super::duration::IsoDuration;
use super::{VideoCandidate, VideoSearch};
use crate::config::SearchSettings;
use crate::error::{Result, VelgError};
use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";

/// Request timeout for YouTube API calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// YouTube Data API search client.
pub struct YouTubeClient {
    http: reqwest::Client,
    api_key: String,
    settings: SearchSettings,
    durations: IsoDuration,
}

impl YouTubeClient {
    /// Create a new client from search settings.
    ///
    /// The API key comes from the YOUTUBE_API_KEY environment variable,
    /// falling back to `[search] api_key` in the config file.
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let api_key = settings.resolve_api_key().ok_or_else(|| {
            VelgError::Config(
                "YOUTUBE_API_KEY not set. Set it with: export YOUTUBE_API_KEY='...'".to_string(),
            )
        })?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            api_key,
            settings: settings.clone(),
            durations: IsoDuration::new(),
        })
    }

    /// Lower bound for video publication time, in explicit UTC.
    fn published_after(&self) -> String {
        let bound = Utc::now() - Duration::days(self.settings.published_within_days);
        bound.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Run the search call and collect the returned video ids.
    async fn search_video_ids(&self, query: &str) -> Result<Vec<String>> {
        let max_results = self.settings.max_results.to_string();
        let published_after = self.published_after();
        let params = [
            ("part", "id"),
            ("q", query),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("publishedAfter", published_after.as_str()),
            ("key", self.api_key.as_str()),
        ];

        let body: SearchListResponse = self
            .http
            .get(format!("{}/search", API_BASE))
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    /// Fetch snippet and duration metadata for the given ids in one call.
    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<VideoResource>> {
        let id_param = ids.join(",");
        let params = [
            ("part", "contentDetails,snippet"),
            ("id", id_param.as_str()),
            ("key", self.api_key.as_str()),
        ];

        let body: VideoListResponse = self
            .http
            .get(format!("{}/videos", API_BASE))
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body.items)
    }

    /// Apply the duration filter and candidate cap, preserving order.
    fn filter_candidates(&self, items: Vec<VideoResource>) -> Result<Vec<VideoCandidate>> {
        let mut survivors = Vec::new();

        for item in items {
            let minutes = self
                .durations
                .minutes(&item.content_details.duration)
                .ok_or_else(|| {
                    VelgError::Search(format!(
                        "unparseable duration '{}' for video {}",
                        item.content_details.duration, item.id
                    ))
                })?;

            if minutes >= self.settings.min_minutes && minutes <= self.settings.max_minutes {
                survivors.push(VideoCandidate {
                    title: item.snippet.title,
                    url: format!("{}{}", WATCH_BASE, item.id),
                });

                if survivors.len() >= self.settings.max_candidates {
                    break;
                }
            }
        }

        Ok(survivors)
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    #[instrument(skip(self), fields(query = %query))]
    async fn search(&self, query: &str) -> Result<Vec<VideoCandidate>> {
        let ids = self.search_video_ids(query).await?;
        debug!("Search returned {} video ids", ids.len());

        if ids.is_empty() {
            // Nothing matched; skip the metadata call entirely.
            return Ok(Vec::new());
        }

        let details = self.fetch_details(&ids).await?;
        debug!("Fetched metadata for {} videos", details.len());

        self.filter_candidates(details)
    }
}

// Response shapes, reduced to the fields this client reads.

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
}

#[derive(Debug, Deserialize)]
struct SearchResultId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    id: String,
    snippet: Snippet,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> YouTubeClient {
        YouTubeClient {
            http: reqwest::Client::new(),
            api_key: "test-key".to_string(),
            settings: SearchSettings::default(),
            durations: IsoDuration::new(),
        }
    }

    fn resource(id: &str, title: &str, duration: &str) -> VideoResource {
        VideoResource {
            id: id.to_string(),
            snippet: Snippet {
                title: title.to_string(),
            },
            content_details: ContentDetails {
                duration: duration.to_string(),
            },
        }
    }

    #[test]
    fn test_filter_keeps_only_durations_in_range() {
        let client = test_client();

        let items = vec![
            resource("a", "Too short", "PT2M"),
            resource("b", "Just right", "PT10M"),
            resource("c", "Too long", "PT30M"),
        ];

        let candidates = client.filter_candidates(items).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Just right");
        assert_eq!(candidates[0].url, "https://www.youtube.com/watch?v=b");
    }

    #[test]
    fn test_filter_bounds_are_inclusive() {
        let client = test_client();

        let items = vec![
            resource("a", "Exactly four", "PT4M"),
            resource("b", "Under four", "PT3M59S"),
            resource("c", "Exactly twenty-five", "PT25M"),
            resource("d", "Over twenty-five", "PT25M1S"),
        ];

        let candidates = client.filter_candidates(items).unwrap();
        let titles: Vec<&str> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Exactly four", "Exactly twenty-five"]);
    }

    #[test]
    fn test_filter_preserves_order_and_caps_at_twenty() {
        let client = test_client();

        let items: Vec<VideoResource> = (0..30)
            .map(|i| resource(&format!("id{}", i), &format!("Video {}", i), "PT10M"))
            .collect();

        let candidates = client.filter_candidates(items).unwrap();
        assert_eq!(candidates.len(), 20);
        assert_eq!(candidates[0].title, "Video 0");
        assert_eq!(candidates[19].title, "Video 19");
    }

    #[test]
    fn test_filter_rejects_unparseable_duration() {
        let client = test_client();

        let items = vec![resource("a", "Broken", "10:00")];
        let result = client.filter_candidates(items);
        assert!(matches!(result, Err(VelgError::Search(_))));
    }

    #[test]
    fn test_published_after_is_utc_rfc3339() {
        let client = test_client();
        let bound = client.published_after();
        assert!(bound.ends_with('Z'));
        assert!(bound.contains('T'));
    }
}
