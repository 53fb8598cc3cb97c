//! Service layer between HTTP handlers and repositories/backends.

pub mod transform;
pub mod voice;

pub use transform::TransformService;
pub use voice::{extract_candidates, validate_audio, VoiceCapture, VoiceService};
