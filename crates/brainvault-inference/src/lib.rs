//! # brainvault-inference
//!
//! External AI capability backends for brainvault.
//!
//! This crate provides:
//! - OpenAI-compatible chat-completions generation backend with a
//!   primary/secondary provider chain
//! - Whisper-compatible transcription backend
//! - Emotion classification plumbing over any generation backend
//! - Mock backends for testing (feature `mock`)
//!
//! Every backend applies a call-level timeout; none of them retries.

pub mod classifier;
pub mod generation;
pub mod transcription;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use brainvault_core::*;

pub use classifier::{parse_emotion_label, EmotionClassifier, EMOTION_LABELS, EMOTION_NEUTRAL};
pub use generation::{provider_chain_from_env, ChatCompletionsBackend};
pub use transcription::{Transcript, TranscriptSegment, TranscriptionBackend, WhisperBackend};
