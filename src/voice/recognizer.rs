//! Speech recognition over captured audio.

use super::capture::RecordedAudio;
use crate::error::{Result, VelgError};
use crate::openai::create_client;
use async_openai::types::CreateTranscriptionRequestArgs;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Trait for speech recognition services.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Convert captured audio to text, with an ISO-639-1 language hint.
    ///
    /// An empty string means the service understood the request but heard
    /// nothing usable.
    async fn recognize(&self, audio: &RecordedAudio, language: &str) -> Result<String>;
}

/// OpenAI Whisper-based recognizer.
pub struct WhisperRecognizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl WhisperRecognizer {
    pub fn new(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperRecognizer {
    #[instrument(skip(self, audio), fields(samples = audio.samples.len()))]
    async fn recognize(&self, audio: &RecordedAudio, language: &str) -> Result<String> {
        let wav = encode_wav(audio)?;
        debug!("Sending {} bytes of audio for recognition", wav.len());

        let request = CreateTranscriptionRequestArgs::default()
            .file(async_openai::types::AudioInput::from_vec_u8(
                "query.wav".to_string(),
                wav,
            ))
            .model(&self.model)
            .language(language)
            .build()
            .map_err(|e| VelgError::Voice(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| VelgError::OpenAI(format!("Transcription API error: {}", e)))?;

        Ok(response.text.trim().to_string())
    }
}

/// Encode mono f32 samples as 16-bit PCM WAV, in memory.
fn encode_wav(audio: &RecordedAudio) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());

    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| VelgError::Audio(format!("WAV encoding failed: {}", e)))?;

    for &sample in &audio.samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|e| VelgError::Audio(format!("WAV encoding failed: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| VelgError::Audio(format!("WAV encoding failed: {}", e)))?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_wav_round_trips_spec() {
        let audio = RecordedAudio {
            samples: vec![0.0, 0.25, -0.25, 1.0, -1.0],
            sample_rate: 16_000,
        };

        let bytes = encode_wav(&audio).unwrap();
        let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();

        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16_000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 5);
    }

    #[test]
    fn test_encode_wav_clamps_out_of_range_samples() {
        let audio = RecordedAudio {
            samples: vec![2.0, -2.0],
            sample_rate: 8_000,
        };

        let bytes = encode_wav(&audio).unwrap();
        let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

        assert_eq!(samples, vec![i16::MAX, -i16::MAX]);
    }
}
