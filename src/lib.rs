//! Velg - Voice-driven YouTube video picker
//!
//! An interactive CLI that takes a spoken or typed query, searches YouTube
//! for recent videos, filters them by duration, and asks an LLM to pick the
//! best-titled match.
//!
//! The name "Velg" comes from the Norwegian word for "choose."
//!
//! # Overview
//!
//! Velg allows you to:
//! - Speak or type a search query
//! - Search YouTube for videos published in the last few weeks
//! - Filter out videos that are too short or too long
//! - Get an AI recommendation for the best-titled match
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `input` - Query acquisition (voice or typed)
//! - `voice` - Microphone capture and speech recognition
//! - `search` - YouTube search and duration filtering
//! - `recommend` - LLM-based title recommendation
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use velg::config::Settings;
//! use velg::orchestrator::{Orchestrator, RunOutcome};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings)?;
//!
//!     match orchestrator.run().await? {
//!         RunOutcome::Recommended { recommendation, candidates, .. } => {
//!             println!("{}", recommendation);
//!             println!("{} candidates", candidates.len());
//!         }
//!         RunOutcome::NoQuery => println!("No query was provided."),
//!         RunOutcome::NoVideos { .. } => println!("No suitable videos found."),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod openai;
pub mod orchestrator;
pub mod recommend;
pub mod search;
pub mod voice;

pub use error::{Result, VelgError};
