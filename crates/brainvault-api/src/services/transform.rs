//! Transformation engine.
//!
//! Exactly one configured generation capability is invoked per run — the
//! first in the priority chain. Any call failure falls through to the
//! deterministic local template, so a transformation only ever fails when
//! the idea itself cannot be loaded.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use brainvault_core::defaults::GEN_SYSTEM_PROMPT;
use brainvault_core::{
    Error, GenerationBackend, IdeaRepository, Result, TransformKind, TransformRequest,
    TransformResponse, UpdateIdeaRequest,
};

/// Transformation service over the idea store and the provider chain.
pub struct TransformService {
    ideas: Arc<dyn IdeaRepository>,
    providers: Vec<Arc<dyn GenerationBackend>>,
}

impl TransformService {
    /// Create a new service. `providers` is the priority-ordered chain;
    /// an empty chain means local fallback only.
    pub fn new(
        ideas: Arc<dyn IdeaRepository>,
        providers: Vec<Arc<dyn GenerationBackend>>,
    ) -> Self {
        Self { ideas, providers }
    }

    /// Transform an idea and persist the result into `transformed_output`.
    pub async fn transform(
        &self,
        owner: &str,
        req: TransformRequest,
    ) -> Result<TransformResponse> {
        let start = Instant::now();

        let idea = self
            .ideas
            .fetch(req.idea_id, owner)
            .await?
            .ok_or(Error::IdeaNotFound(req.idea_id))?;

        let prompt = build_prompt(req.output_type, &idea.content);
        let transformed_content = self.generate(&prompt, req.output_type).await;

        self.ideas
            .update(
                req.idea_id,
                owner,
                UpdateIdeaRequest {
                    transformed_output: Some(transformed_content.clone()),
                    ..Default::default()
                },
            )
            .await?;

        debug!(
            subsystem = "api",
            component = "transform",
            op = "transform",
            idea_id = %req.idea_id,
            kind = %req.output_type,
            duration_ms = start.elapsed().as_millis() as u64,
            "Transformation complete"
        );

        Ok(TransformResponse {
            transformed_content,
            idea_id: req.idea_id,
            output_type: req.output_type,
        })
    }

    /// Invoke the first configured capability; fall back locally on any
    /// failure. Never errors.
    async fn generate(&self, prompt: &str, kind: TransformKind) -> String {
        let Some(backend) = self.providers.first() else {
            return fallback_output(kind).to_string();
        };

        match backend.generate_with_system(GEN_SYSTEM_PROMPT, prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    subsystem = "api",
                    component = "transform",
                    model = backend.model_name(),
                    error = %e,
                    "Generation call failed, using local fallback"
                );
                fallback_output(kind).to_string()
            }
        }
    }
}

/// Kind-specific instruction template embedding the idea content verbatim.
pub fn build_prompt(kind: TransformKind, content: &str) -> String {
    match kind {
        TransformKind::Content => format!(
            "Transform this idea into engaging content:\n\n\
             Original idea: {}\n\n\
             Please create compelling content that expands on this idea, \
             making it more detailed and engaging for readers.",
            content
        ),
        TransformKind::Ip => format!(
            "Transform this idea into intellectual property content:\n\n\
             Original idea: {}\n\n\
             Please create detailed intellectual property content including:\n\
             - Patentable concepts\n\
             - Copyrightable material\n\
             - Trademark considerations\n\
             - Trade secret elements",
            content
        ),
        TransformKind::Tasks => format!(
            "Transform this idea into actionable tasks:\n\n\
             Original idea: {}\n\n\
             Please break down this idea into specific, actionable tasks that \
             can be executed to bring this idea to life.\n\
             Include timelines, priorities, and resource requirements.",
            content
        ),
    }
}

/// Deterministic local output per kind, used when no capability is
/// configured or the call fails.
pub fn fallback_output(kind: TransformKind) -> &'static str {
    match kind {
        TransformKind::Content => {
            "This is a generated content based on your idea. In a production \
             environment, this would be enhanced by AI-powered content generation."
        }
        TransformKind::Ip => {
            "Intellectual Property Analysis:\n\
             - Patent considerations\n\
             - Copyright elements\n\
             - Trademark opportunities\n\
             - Trade secret aspects"
        }
        TransformKind::Tasks => {
            "Actionable Tasks:\n\
             1. Research and validate the idea\n\
             2. Create a detailed plan\n\
             3. Identify required resources\n\
             4. Set milestones and timelines"
        }
    }
}
