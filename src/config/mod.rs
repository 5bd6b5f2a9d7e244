//! Configuration module for Velg.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RecommendPrompts};
pub use settings::{
    GeneralSettings, PromptSettings, RecommendSettings, SearchSettings, Settings, VoiceSettings,
};
