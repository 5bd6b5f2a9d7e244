//! LLM-backed title recommendation.

use super::Recommender;
use crate::config::{Prompts, RecommendSettings};
use crate::error::{Result, VelgError};
use crate::openai::create_client;
use crate::search::VideoCandidate;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Picks the best video title with a single chat-completion request.
pub struct TitlePicker {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    prompts: Prompts,
}

impl TitlePicker {
    /// Create a new picker from recommendation settings.
    pub fn new(settings: &RecommendSettings) -> Self {
        Self {
            client: create_client(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Render the user prompt for the given query and candidates.
    fn build_prompt(&self, query: &str, candidates: &[VideoCandidate]) -> String {
        let titles = candidates
            .iter()
            .map(|c| format!("- {}", c.title))
            .collect::<Vec<_>>()
            .join("\n");

        let mut vars = HashMap::new();
        vars.insert("query".to_string(), query.to_string());
        vars.insert("titles".to_string(), titles);

        self.prompts
            .render_with_custom(&self.prompts.recommend.user, &vars)
    }
}

#[async_trait]
impl Recommender for TitlePicker {
    #[instrument(skip(self, candidates), fields(query = %query, candidates = candidates.len()))]
    async fn recommend(
        &self,
        query: &str,
        candidates: &[VideoCandidate],
    ) -> Result<Option<String>> {
        if candidates.is_empty() {
            return Ok(None);
        }

        let user_prompt = self.build_prompt(query, candidates);
        debug!("Prompt is {} characters", user_prompt.len());

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.recommend.system.clone())
                .build()
                .map_err(|e| VelgError::Recommend(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| VelgError::Recommend(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| VelgError::Recommend(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| VelgError::OpenAI(format!("Failed to generate recommendation: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| VelgError::Recommend("Empty response from LLM".to_string()))?
            .clone();

        Ok(Some(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str) -> VideoCandidate {
        VideoCandidate {
            title: title.to_string(),
            url: format!("https://www.youtube.com/watch?v={}", title),
        }
    }

    #[test]
    fn test_build_prompt_lists_titles_in_order() {
        let picker = TitlePicker::new(&RecommendSettings::default());
        let candidates = vec![candidate("First"), candidate("Second"), candidate("Third")];

        let prompt = picker.build_prompt("relaxing piano music", &candidates);

        assert!(prompt.contains(r#""relaxing piano music""#));
        assert!(prompt.contains("- First"));
        assert!(prompt.contains("- Second"));
        assert!(prompt.contains("- Third"));

        let first = prompt.find("- First").unwrap();
        let second = prompt.find("- Second").unwrap();
        let third = prompt.find("- Third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_build_prompt_never_includes_urls() {
        let picker = TitlePicker::new(&RecommendSettings::default());
        let candidates = vec![candidate("Only titles")];

        let prompt = picker.build_prompt("anything", &candidates);
        assert!(!prompt.contains("youtube.com/watch"));
    }

    #[tokio::test]
    async fn test_recommend_empty_candidates_skips_model() {
        let picker = TitlePicker::new(&RecommendSettings::default());

        // Returns before any outbound request is made.
        let result = picker.recommend("anything", &[]).await.unwrap();
        assert_eq!(result, None);
    }
}
