//! Prompt templates for Velg.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub recommend: RecommendPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompts for picking the best video title.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendPrompts {
    pub system: String,
    pub user: String,
}

impl Default for RecommendPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a video curation assistant. You evaluate lists of video titles against a user's search query and pick the single best match.

Guidelines:
- Judge only by the titles you are given; you have no other metadata
- Prefer titles that clearly state what the video covers
- Prefer titles that match the user's intent over titles that merely share keywords
- Penalize clickbait phrasing that hides the actual content"#
                .to_string(),

            user: r#"Given the user's query: "{{query}}", evaluate the following video titles:

{{titles}}

Choose the most relevant and well-titled video based on clarity, how well it matches the intent, and how appealing the title is. Respond with the best title and your reasoning."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        // Store custom variables
        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            // Load recommendation prompts if file exists
            let recommend_path = custom_path.join("recommend.toml");
            if recommend_path.exists() {
                let content = std::fs::read_to_string(&recommend_path)?;
                prompts.recommend = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        // Start with custom variables, then override with provided vars
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.recommend.system.is_empty());
        assert!(prompts.recommend.user.contains("{{query}}"));
        assert!(prompts.recommend.user.contains("{{titles}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }
}
