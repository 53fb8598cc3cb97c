//! Centralized default constants for the brainvault system.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// IDEA CONTENT
// =============================================================================

/// Minimum idea content length in characters.
pub const CONTENT_MIN_LEN: usize = 1;

/// Maximum idea content length in characters.
pub const CONTENT_MAX_LEN: usize = 10_000;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for the idea list endpoint.
pub const PAGE_LIMIT: i64 = 10;

/// Upper clamp for the idea list page size.
pub const PAGE_LIMIT_MAX: i64 = 100;

// =============================================================================
// GENERATION
// =============================================================================

/// Token budget handed to the generation provider per call.
pub const GEN_MAX_TOKENS: u32 = 1000;

/// Sampling temperature for generation calls.
pub const GEN_TEMPERATURE: f32 = 0.7;

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 30;

/// Default model slug for the primary (x.ai) provider.
pub const PRIMARY_GEN_MODEL: &str = "llama-3-70b";

/// Default model slug for the secondary (OpenAI) provider.
pub const SECONDARY_GEN_MODEL: &str = "gpt-3.5-turbo";

/// Default base URL for the primary provider.
pub const PRIMARY_GEN_URL: &str = "https://api.x.ai/v1";

/// Default base URL for the secondary provider.
pub const SECONDARY_GEN_URL: &str = "https://api.openai.com/v1";

/// System prompt shared by every transformation call.
pub const GEN_SYSTEM_PROMPT: &str =
    "You are an AI assistant that helps transform ideas into actionable content.";

// =============================================================================
// VOICE INTAKE
// =============================================================================

/// Maximum accepted audio payload in bytes (10 MiB).
pub const AUDIO_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Minimum candidate idea length after trimming, in characters.
pub const CANDIDATE_MIN_LEN: usize = 10;

/// Maximum candidate ideas extracted from one transcript.
pub const CANDIDATE_MAX_COUNT: usize = 10;

/// Timeout for transcription requests (seconds). Long to allow for
/// multi-minute audio.
pub const TRANSCRIBE_TIMEOUT_SECS: u64 = 300;

/// Default Whisper-compatible model slug.
pub const WHISPER_MODEL: &str = "whisper-1";

// =============================================================================
// ENRICHMENT WORKER
// =============================================================================

/// Bound on the enrichment queue; a full queue drops the trigger
/// (at-most-once delivery).
pub const ENRICH_QUEUE_CAPACITY: usize = 256;

/// Maximum concurrently running enrichment tasks.
pub const ENRICH_MAX_CONCURRENT: usize = 4;

/// Broadcast capacity for worker events.
pub const WORKER_EVENT_CAPACITY: usize = 64;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8000;

/// Request body limit (audio uploads dominate; headroom over AUDIO_MAX_BYTES
/// for multipart framing).
pub const BODY_LIMIT_BYTES: usize = 12 * 1024 * 1024;

// =============================================================================
// ENVIRONMENT VARIABLE NAMES
// =============================================================================

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_XAI_API_KEY: &str = "XAI_API_KEY";
pub const ENV_XAI_API_URL: &str = "XAI_API_URL";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_API_URL: &str = "OPENAI_API_URL";
pub const ENV_WHISPER_BASE_URL: &str = "WHISPER_BASE_URL";
pub const ENV_WHISPER_MODEL: &str = "WHISPER_MODEL";
pub const ENV_AUDIO_STORAGE_PATH: &str = "AUDIO_STORAGE_PATH";
pub const ENV_SERVER_PORT: &str = "PORT";
pub const ENV_ENRICH_MAX_CONCURRENT: &str = "ENRICH_MAX_CONCURRENT";
pub const ENV_ENRICH_QUEUE_CAPACITY: &str = "ENRICH_QUEUE_CAPACITY";
