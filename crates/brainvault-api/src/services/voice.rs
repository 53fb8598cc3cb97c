//! Voice intake: validation, transcription, best-effort persistence,
//! candidate extraction.
//!
//! Transcription failure is fatal here — the transcript is load-bearing for
//! downstream capture. Blob storage failure is not: the reference is simply
//! omitted.

use std::sync::Arc;

use tracing::{debug, warn};

use brainvault_core::defaults::{AUDIO_MAX_BYTES, CANDIDATE_MAX_COUNT, CANDIDATE_MIN_LEN};
use brainvault_core::{Error, Result};
use brainvault_db::AudioStorageBackend;
use brainvault_inference::{Transcript, TranscriptionBackend};

/// Result of one voice intake run.
#[derive(Debug, Clone)]
pub struct VoiceCapture {
    pub transcript: Transcript,
    /// Durable audio reference; None when storage is unconfigured or failed.
    pub storage_ref: Option<String>,
}

/// Voice intake service.
pub struct VoiceService {
    transcription: Option<Arc<dyn TranscriptionBackend>>,
    storage: Option<Arc<dyn AudioStorageBackend>>,
}

impl VoiceService {
    pub fn new(
        transcription: Option<Arc<dyn TranscriptionBackend>>,
        storage: Option<Arc<dyn AudioStorageBackend>>,
    ) -> Self {
        Self {
            transcription,
            storage,
        }
    }

    /// Validate and transcribe an audio payload, persisting the raw bytes
    /// as a side effect when storage is configured.
    pub async fn process(&self, owner: &str, audio: &[u8]) -> Result<VoiceCapture> {
        // Size and signature are checked before any transcription call.
        let mime_type = validate_audio(audio)?;

        let backend = self.transcription.as_ref().ok_or_else(|| {
            Error::Config("Transcription backend not configured".to_string())
        })?;

        let transcript = backend.transcribe(audio, mime_type).await?;

        let storage_ref = match &self.storage {
            Some(storage) => match storage.store(owner, audio).await {
                Ok(reference) => Some(reference),
                Err(e) => {
                    warn!(
                        subsystem = "api",
                        component = "voice",
                        error = %e,
                        "Audio persistence failed, reference omitted"
                    );
                    None
                }
            },
            None => None,
        };

        debug!(
            subsystem = "api",
            component = "voice",
            op = "process",
            audio_size = audio.len(),
            text_len = transcript.text.len(),
            stored = storage_ref.is_some(),
            "Voice intake complete"
        );
        Ok(VoiceCapture {
            transcript,
            storage_ref,
        })
    }
}

/// Validate the audio payload and return its sniffed MIME type.
///
/// Rejects payloads over the fixed byte ceiling and byte streams that do
/// not begin with a recognized WAV/MP3/OGG container signature.
pub fn validate_audio(audio: &[u8]) -> Result<&'static str> {
    if audio.len() > AUDIO_MAX_BYTES {
        return Err(Error::InvalidInput(format!(
            "audio exceeds {} bytes",
            AUDIO_MAX_BYTES
        )));
    }
    detect_audio_mime(audio)
        .ok_or_else(|| Error::InvalidInput("unrecognized audio format".to_string()))
}

/// Sniff the container signature of an audio payload.
fn detect_audio_mime(audio: &[u8]) -> Option<&'static str> {
    if audio.starts_with(b"RIFF") {
        return Some("audio/wav");
    }
    if audio.starts_with(b"ID3") || audio.starts_with(&[0xFF, 0xFB]) {
        return Some("audio/mpeg");
    }
    if audio.starts_with(b"OggS") {
        return Some("audio/ogg");
    }
    // Magic-byte fallback for container variants the fixed signatures miss
    // (e.g. other MP3 frame-sync headers).
    match infer::get(audio).map(|kind| kind.mime_type()) {
        Some("audio/mpeg") => Some("audio/mpeg"),
        Some("audio/x-wav") | Some("audio/wav") => Some("audio/wav"),
        Some("audio/ogg") => Some("audio/ogg"),
        _ => None,
    }
}

/// Split a transcript into candidate ideas.
///
/// Sentence boundaries are terminal punctuation; fragments at or below
/// `CANDIDATE_MIN_LEN` characters after trimming are discarded; at most
/// `CANDIDATE_MAX_COUNT` candidates, in document order.
pub fn extract_candidates(transcript: &str) -> Vec<String> {
    transcript
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > CANDIDATE_MIN_LEN)
        .take(CANDIDATE_MAX_COUNT)
        .map(String::from)
        .collect()
}
