//! Emotion classification over a generation backend.
//!
//! Classification is best-effort enrichment: any backend failure or
//! unparseable answer collapses to the neutral default at the call site.

use std::sync::Arc;

use tracing::debug;

use brainvault_core::{Error, GenerationBackend, Result};

/// The closed emotion label set. Classifier output is normalized into this
/// set; anything else reads as neutral.
pub const EMOTION_LABELS: [&str; 5] = ["excited", "happy", "curious", "concerned", "frustrated"];

/// Default emotion when no classifier is configured or the call fails.
pub const EMOTION_NEUTRAL: &str = "neutral";

const CLASSIFY_SYSTEM_PROMPT: &str =
    "You label the emotional tone of short notes. Answer with exactly one word.";

/// Emotion classifier delegating to a configured generation backend.
pub struct EmotionClassifier {
    backend: Arc<dyn GenerationBackend>,
}

impl EmotionClassifier {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Classify content into one of [EMOTION_LABELS] or neutral.
    pub async fn classify(&self, content: &str) -> Result<String> {
        let prompt = classify_prompt(content);
        let raw = self
            .backend
            .generate_with_system(CLASSIFY_SYSTEM_PROMPT, &prompt)
            .await?;

        let label = parse_emotion_label(&raw)
            .ok_or_else(|| Error::Inference(format!("Unrecognized emotion label: {}", raw)))?;

        debug!(
            subsystem = "inference",
            component = "classifier",
            op = "classify",
            model = self.backend.model_name(),
            label = label,
            "Emotion classified"
        );
        Ok(label.to_string())
    }
}

fn classify_prompt(content: &str) -> String {
    format!(
        "Classify the dominant emotion of this note as one of: {}, or {} if none applies.\n\nNote: {}",
        EMOTION_LABELS.join(", "),
        EMOTION_NEUTRAL,
        content
    )
}

/// Normalize a model answer into the closed label set.
///
/// Tolerates case, surrounding punctuation, and chatty answers that contain
/// exactly one known label.
pub fn parse_emotion_label(raw: &str) -> Option<&'static str> {
    let lowered = raw.to_lowercase();

    let exact = lowered.trim().trim_matches(|c: char| !c.is_alphabetic());
    if exact == EMOTION_NEUTRAL {
        return Some(EMOTION_NEUTRAL);
    }
    if let Some(label) = EMOTION_LABELS.iter().copied().find(|l| *l == exact) {
        return Some(label);
    }

    let mentioned: Vec<&'static str> = EMOTION_LABELS
        .iter()
        .copied()
        .filter(|l| lowered.contains(l))
        .collect();
    match mentioned.as_slice() {
        [single] => Some(single),
        _ => None,
    }
}
