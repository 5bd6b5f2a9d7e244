//! Microphone capture.
//!
//! Records a single utterance from the default input device: calibrate
//! against ambient noise, wait for speech onset, then record until the
//! phrase limit or a trailing-silence tail.

use crate::config::VoiceSettings;
use crate::error::{Result, VelgError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Chunks of pre-onset audio kept so the first word is not clipped.
const PREROLL_CHUNKS: usize = 4;

/// Floor for the speech threshold in very quiet rooms.
const MIN_SPEECH_THRESHOLD: f32 = 0.015;

/// Mono PCM audio captured from the microphone.
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// How a capture attempt ended.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// Speech was detected and recorded.
    Utterance(RecordedAudio),
    /// No speech started within the listen timeout.
    Timeout,
}

/// Capture timing parameters.
#[derive(Debug, Clone)]
pub struct CaptureTuning {
    /// How long to wait for speech to start.
    pub listen_timeout: Duration,
    /// Maximum phrase length once speech has started.
    pub phrase_limit: Duration,
    /// Ambient noise sampling window.
    pub calibration: Duration,
    /// Trailing silence that ends a phrase early.
    pub silence_tail: Duration,
}

impl From<&VoiceSettings> for CaptureTuning {
    fn from(settings: &VoiceSettings) -> Self {
        Self {
            listen_timeout: Duration::from_secs(settings.listen_timeout_seconds),
            phrase_limit: Duration::from_secs(settings.phrase_limit_seconds),
            calibration: Duration::from_millis(settings.calibration_ms),
            silence_tail: Duration::from_millis(settings.silence_tail_ms),
        }
    }
}

/// Handle on the default input device.
pub struct MicrophoneCapture {
    device: cpal::Device,
}

impl MicrophoneCapture {
    /// Open the default input device, or None when no microphone exists.
    pub fn open() -> Option<Self> {
        cpal::default_host()
            .default_input_device()
            .map(|device| Self { device })
    }

    /// Record one utterance.
    ///
    /// The input stream lives only within this call, so the device is
    /// released on every path, including errors.
    pub fn record(&self, tuning: &CaptureTuning) -> Result<CaptureOutcome> {
        let supported = self
            .device
            .default_input_config()
            .map_err(|e| VelgError::Audio(format!("no usable input config: {}", e)))?;

        let sample_format = supported.sample_format();
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let stream_config: cpal::StreamConfig = supported.config();

        let (tx, rx) = std::sync::mpsc::channel::<Vec<f32>>();
        let err_fn = |err: cpal::StreamError| warn!("input stream error: {}", err);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => self.device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let _ = tx.send(downmix(data, channels));
                },
                err_fn,
                None,
            ),
            cpal::SampleFormat::I16 => self.device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let floats: Vec<f32> =
                        data.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
                    let _ = tx.send(downmix(&floats, channels));
                },
                err_fn,
                None,
            ),
            cpal::SampleFormat::U16 => self.device.build_input_stream(
                &stream_config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    let floats: Vec<f32> = data
                        .iter()
                        .map(|&s| (s as f32 - 32_768.0) / 32_768.0)
                        .collect();
                    let _ = tx.send(downmix(&floats, channels));
                },
                err_fn,
                None,
            ),
            other => {
                return Err(VelgError::Audio(format!(
                    "unsupported sample format: {:?}",
                    other
                )))
            }
        }
        .map_err(|e| VelgError::Audio(format!("failed to open input stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| VelgError::Audio(format!("failed to start input stream: {}", e)))?;

        // Calibrate: derive the speech threshold from ambient noise.
        let ambient = collect_rms(&rx, tuning.calibration)?;
        let threshold = speech_threshold(ambient);
        debug!("ambient rms {:.4}, speech threshold {:.4}", ambient, threshold);

        // Wait for speech onset, keeping a short preroll.
        let listen_deadline = Instant::now() + tuning.listen_timeout;
        let mut preroll: VecDeque<Vec<f32>> = VecDeque::new();
        let mut samples: Vec<f32> = Vec::new();

        loop {
            if Instant::now() >= listen_deadline {
                return Ok(CaptureOutcome::Timeout);
            }

            let chunk = match rx.recv_timeout(Duration::from_millis(50)) {
                Ok(chunk) => chunk,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(VelgError::Audio("input stream closed unexpectedly".to_string()))
                }
            };

            if rms(&chunk) >= threshold {
                for buffered in preroll.drain(..) {
                    samples.extend(buffered);
                }
                samples.extend(chunk);
                break;
            }

            preroll.push_back(chunk);
            while preroll.len() > PREROLL_CHUNKS {
                preroll.pop_front();
            }
        }

        // Record until the phrase limit or a run of trailing silence.
        let phrase_deadline = Instant::now() + tuning.phrase_limit;
        let tail_samples = (tuning.silence_tail.as_secs_f64() * sample_rate as f64) as usize;
        let mut silent_samples: usize = 0;

        while Instant::now() < phrase_deadline {
            let chunk = match rx.recv_timeout(Duration::from_millis(50)) {
                Ok(chunk) => chunk,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            if rms(&chunk) >= threshold {
                silent_samples = 0;
            } else {
                silent_samples += chunk.len();
            }

            samples.extend(chunk);

            if silent_samples >= tail_samples {
                debug!("trailing silence reached, stopping capture");
                break;
            }
        }

        drop(stream);

        Ok(CaptureOutcome::Utterance(RecordedAudio {
            samples,
            sample_rate,
        }))
    }
}

/// Overall RMS of everything received within the window.
fn collect_rms(rx: &Receiver<Vec<f32>>, window: Duration) -> Result<f32> {
    let deadline = Instant::now() + window;
    let mut sum_sq = 0.0f64;
    let mut count = 0usize;

    while Instant::now() < deadline {
        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(chunk) => {
                for sample in chunk {
                    sum_sq += sample as f64 * sample as f64;
                    count += 1;
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(VelgError::Audio(
                    "input stream closed during calibration".to_string(),
                ))
            }
        }
    }

    if count == 0 {
        return Ok(0.0);
    }
    Ok((sum_sq / count as f64).sqrt() as f32)
}

/// Average interleaved frames down to mono.
fn downmix(data: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return data.to_vec();
    }
    data.chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Root mean square of a sample chunk.
fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Speech threshold derived from the ambient noise floor.
fn speech_threshold(ambient: f32) -> f32 {
    (ambient * 2.5).max(MIN_SPEECH_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_stereo_averages_frames() {
        let interleaved = [0.5, -0.5, 1.0, 0.0];
        assert_eq!(downmix(&interleaved, 2), vec![0.0, 0.5]);
    }

    #[test]
    fn test_downmix_mono_is_identity() {
        let mono = [0.1, 0.2, 0.3];
        assert_eq!(downmix(&mono, 1), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_rms_of_constant_signal() {
        let samples = vec![0.5f32; 100];
        assert!((rms(&samples) - 0.5).abs() < 1e-6);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_speech_threshold_has_floor() {
        assert_eq!(speech_threshold(0.0), MIN_SPEECH_THRESHOLD);
        assert!((speech_threshold(0.1) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_tuning_from_settings() {
        let settings = VoiceSettings::default();
        let tuning = CaptureTuning::from(&settings);
        assert_eq!(tuning.listen_timeout, Duration::from_secs(8));
        assert_eq!(tuning.phrase_limit, Duration::from_secs(7));
    }
}
