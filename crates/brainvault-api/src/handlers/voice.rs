//! Voice intake handlers.
//!
//! Both endpoints accept multipart/form-data with an audio `file` field.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use brainvault_inference::TranscriptSegment;

use crate::auth::Auth;
use crate::error::ApiError;
use crate::services::extract_candidates;
use crate::AppState;

/// Response from `POST /voice/transcribe`.
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    /// Full transcribed text.
    pub text: String,
    /// Timestamped segments.
    pub segments: Vec<TranscriptSegment>,
    /// Detected language (ISO 639-1 code).
    pub language: Option<String>,
    /// Total audio duration in seconds.
    pub duration_secs: Option<f64>,
    /// Mean per-segment confidence, when the backend reports one.
    pub confidence: Option<f64>,
    /// Durable audio reference; omitted when storage is unconfigured or
    /// failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_ref: Option<String>,
}

/// Response from `POST /voice/extract-ideas`.
#[derive(Debug, Serialize)]
pub struct ExtractIdeasResponse {
    /// Candidate ideas in document order, at most ten.
    pub ideas: Vec<String>,
    /// The transcript the candidates were extracted from.
    pub transcription: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_ref: Option<String>,
}

/// Pull the audio `file` field out of a multipart body.
async fn read_audio_field(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let audio = file_data
        .ok_or_else(|| ApiError::BadRequest("Missing file in multipart form".to_string()))?;
    if audio.is_empty() {
        return Err(ApiError::BadRequest("Audio file is empty".to_string()));
    }
    Ok(audio)
}

/// Transcribe an uploaded audio payload.
pub async fn transcribe_audio(
    State(state): State<AppState>,
    auth: Auth,
    multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let audio = read_audio_field(multipart).await?;

    let capture = state.voice.process(&auth.principal.user_id, &audio).await?;
    let confidence = capture.transcript.mean_confidence();

    Ok(Json(TranscribeResponse {
        text: capture.transcript.text,
        segments: capture.transcript.segments,
        language: capture.transcript.language,
        duration_secs: capture.transcript.duration_secs,
        confidence,
        storage_ref: capture.storage_ref,
    }))
}

/// Transcribe an uploaded audio payload and split it into candidate ideas.
pub async fn extract_ideas(
    State(state): State<AppState>,
    auth: Auth,
    multipart: Multipart,
) -> Result<Json<ExtractIdeasResponse>, ApiError> {
    let audio = read_audio_field(multipart).await?;

    let capture = state.voice.process(&auth.principal.user_id, &audio).await?;
    let ideas = extract_candidates(&capture.transcript.text);

    Ok(Json(ExtractIdeasResponse {
        ideas,
        transcription: capture.transcript.text,
        storage_ref: capture.storage_ref,
    }))
}
