//! Transcription backend traits and implementations for audio-to-text.
//!
//! Unlike generation (which falls back locally), a transcription failure is
//! fatal to the calling operation: the transcript is load-bearing for
//! downstream idea capture.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use brainvault_core::defaults::{
    ENV_WHISPER_BASE_URL, ENV_WHISPER_MODEL, TRANSCRIBE_TIMEOUT_SECS, WHISPER_MODEL,
};
use brainvault_core::{Error, Result};

/// A segment of transcribed audio with timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptSegment {
    pub start_secs: f64,
    pub end_secs: f64,
    pub text: String,
    /// Average log-probability reported by the backend, when available.
    pub confidence: Option<f64>,
}

/// Result of audio transcription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transcript {
    /// Full transcribed text.
    pub text: String,
    /// Timestamped segments.
    pub segments: Vec<TranscriptSegment>,
    /// Detected language (ISO 639-1 code).
    pub language: Option<String>,
    /// Total audio duration in seconds.
    pub duration_secs: Option<f64>,
}

impl Transcript {
    /// Mean per-segment confidence, or None when no segment reports one.
    pub fn mean_confidence(&self) -> Option<f64> {
        let scores: Vec<f64> = self.segments.iter().filter_map(|s| s.confidence).collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }
}

/// Backend for transcribing audio payloads.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Transcribe audio data.
    async fn transcribe(&self, audio_data: &[u8], mime_type: &str) -> Result<Transcript>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// OpenAI-compatible Whisper backend (works with faster-whisper servers).
pub struct WhisperBackend {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl WhisperBackend {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url,
            model,
            client: reqwest::Client::new(),
            timeout_secs: TRANSCRIBE_TIMEOUT_SECS,
        }
    }

    /// Create from environment variables.
    /// Returns None if `WHISPER_BASE_URL` is not set.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var(ENV_WHISPER_BASE_URL).ok().filter(|u| !u.is_empty())?;
        let model =
            std::env::var(ENV_WHISPER_MODEL).unwrap_or_else(|_| WHISPER_MODEL.to_string());
        Some(Self::new(base_url, model))
    }
}

/// Whisper API verbose_json response format.
#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    segments: Option<Vec<WhisperSegment>>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
    #[serde(default)]
    avg_logprob: Option<f64>,
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/ogg" => "ogg",
        _ => "wav",
    }
}

#[async_trait]
impl TranscriptionBackend for WhisperBackend {
    async fn transcribe(&self, audio_data: &[u8], mime_type: &str) -> Result<Transcript> {
        let url = format!("{}/v1/audio/transcriptions", self.base_url);
        let ext = extension_for_mime(mime_type);

        let file_part = reqwest::multipart::Part::bytes(audio_data.to_vec())
            .file_name(format!("audio.{}", ext))
            .mime_str(mime_type)
            .map_err(|e| Error::Transcription(format!("Failed to create multipart: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| Error::Transcription(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transcription(format!(
                "Whisper API returned {}: {}",
                status, body
            )));
        }

        let result: WhisperResponse = response
            .json()
            .await
            .map_err(|e| Error::Transcription(format!("Failed to parse response: {}", e)))?;

        let segments = result
            .segments
            .unwrap_or_default()
            .into_iter()
            .map(|s| TranscriptSegment {
                start_secs: s.start,
                end_secs: s.end,
                text: s.text,
                confidence: s.avg_logprob,
            })
            .collect();

        let transcript = Transcript {
            text: result.text,
            segments,
            language: result.language,
            duration_secs: result.duration,
        };

        debug!(
            subsystem = "inference",
            component = "transcription",
            op = "transcribe",
            model = %self.model,
            audio_size = audio_data.len(),
            text_len = transcript.text.len(),
            "Transcription complete"
        );
        Ok(transcript)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
