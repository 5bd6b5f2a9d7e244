//! Voice capture module for Velg.
//!
//! Records a spoken query from the microphone and converts it to text
//! through a hosted recognition service. Every failure mode maps to a
//! [`VoiceOutcome`] so the caller decides how to present it; none of them
//! abort the run.

mod capture;
mod recognizer;

pub use capture::{CaptureOutcome, CaptureTuning, MicrophoneCapture, RecordedAudio};
pub use recognizer::{SpeechRecognizer, WhisperRecognizer};

use crate::config::VoiceSettings;
use crate::error::{Result, VelgError};
use crate::input::QuerySource;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// How a voice acquisition attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOutcome {
    /// Speech was captured and recognized.
    Recognized(String),
    /// No input device is available.
    NoMicrophone,
    /// Nothing was said within the listen timeout.
    NoSpeech,
    /// Audio was captured but the recognizer produced no text.
    Unintelligible,
    /// The recognition service failed.
    ServiceError(String),
}

/// Voice-driven query source.
pub struct VoiceInput {
    recognizer: Arc<dyn SpeechRecognizer>,
    settings: VoiceSettings,
}

impl VoiceInput {
    /// Create a voice input using the configured recognition model.
    pub fn new(settings: &VoiceSettings) -> Self {
        Self {
            recognizer: Arc::new(WhisperRecognizer::new(&settings.model)),
            settings: settings.clone(),
        }
    }

    /// Create a voice input with a custom recognizer.
    pub fn with_recognizer(
        recognizer: Arc<dyn SpeechRecognizer>,
        settings: &VoiceSettings,
    ) -> Self {
        Self {
            recognizer,
            settings: settings.clone(),
        }
    }

    /// Listen for one utterance and recognize it.
    pub async fn listen(&self) -> Result<VoiceOutcome> {
        let Some(microphone) = MicrophoneCapture::open() else {
            return Ok(VoiceOutcome::NoMicrophone);
        };

        println!("Listening... Please speak now.");

        let tuning = CaptureTuning::from(&self.settings);

        // The cpal stream is not Send, so the whole capture runs on one
        // blocking thread.
        let outcome = tokio::task::spawn_blocking(move || microphone.record(&tuning))
            .await
            .map_err(|e| VelgError::Audio(format!("capture task failed: {}", e)))??;

        let audio = match outcome {
            CaptureOutcome::Timeout => return Ok(VoiceOutcome::NoSpeech),
            CaptureOutcome::Utterance(audio) => audio,
        };

        println!("Recognizing...");
        info!(
            "Captured {} samples at {} Hz",
            audio.samples.len(),
            audio.sample_rate
        );

        match self
            .recognizer
            .recognize(&audio, &self.settings.language)
            .await
        {
            Ok(text) if text.is_empty() => Ok(VoiceOutcome::Unintelligible),
            Ok(text) => Ok(VoiceOutcome::Recognized(text)),
            Err(e) => Ok(VoiceOutcome::ServiceError(e.to_string())),
        }
    }
}

#[async_trait]
impl QuerySource for VoiceInput {
    async fn acquire(&self) -> Result<Option<String>> {
        match self.listen().await? {
            VoiceOutcome::Recognized(text) => {
                println!("You said: {}", text);
                Ok(Some(text))
            }
            VoiceOutcome::NoMicrophone => {
                eprintln!("No microphone detected.");
                Ok(None)
            }
            VoiceOutcome::NoSpeech => {
                eprintln!("You didn't say anything in time.");
                Ok(None)
            }
            VoiceOutcome::Unintelligible => {
                eprintln!("Couldn't understand your speech. Try again.");
                Ok(None)
            }
            VoiceOutcome::ServiceError(message) => {
                eprintln!("Speech recognition error: {}", message);
                Ok(None)
            }
        }
    }
}
