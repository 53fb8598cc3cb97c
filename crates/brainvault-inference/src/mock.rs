//! Mock backends for deterministic testing.
//!
//! Enabled for this crate's own tests and, via the `mock` feature, for
//! downstream crates' test suites.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use brainvault_core::{Error, GenerationBackend, Result};

use crate::transcription::{Transcript, TranscriptSegment, TranscriptionBackend};

/// Mock generation backend returning a fixed response (or a fixed failure).
#[derive(Clone)]
pub struct MockGeneration {
    response: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockGeneration {
    /// A backend that always answers with `response`.
    pub fn answering(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A backend whose every call fails.
    pub fn failing() -> Self {
        Self {
            response: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts seen so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for MockGeneration {
    async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
        self.calls.lock().unwrap().push(prompt.to_string());
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => Err(Error::Inference("mock backend failure".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock-gen"
    }
}

/// Mock transcription backend returning a fixed transcript (or failing).
pub struct MockTranscription {
    transcript: Option<Transcript>,
}

impl MockTranscription {
    /// A backend that transcribes everything to `text`, one segment.
    pub fn answering(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            transcript: Some(Transcript {
                segments: vec![TranscriptSegment {
                    start_secs: 0.0,
                    end_secs: 1.0,
                    text: text.clone(),
                    confidence: Some(-0.1),
                }],
                text,
                language: Some("en".to_string()),
                duration_secs: Some(1.0),
            }),
        }
    }

    /// A backend whose every call fails.
    pub fn failing() -> Self {
        Self { transcript: None }
    }
}

#[async_trait]
impl TranscriptionBackend for MockTranscription {
    async fn transcribe(&self, _audio_data: &[u8], _mime_type: &str) -> Result<Transcript> {
        match &self.transcript {
            Some(transcript) => Ok(transcript.clone()),
            None => Err(Error::Transcription("mock backend failure".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock-whisper"
    }
}
