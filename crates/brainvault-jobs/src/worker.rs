//! Channel-fed enrichment worker.
//!
//! Capture dispatches one task per created idea into a bounded queue and
//! returns immediately. Delivery is at-most-once: a full queue or stopped
//! worker drops the trigger with a warning, and the idea simply stays
//! unenriched. No ordering is guaranteed across ideas.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use brainvault_core::defaults::{
    ENRICH_MAX_CONCURRENT, ENRICH_QUEUE_CAPACITY, ENV_ENRICH_MAX_CONCURRENT,
    ENV_ENRICH_QUEUE_CAPACITY, WORKER_EVENT_CAPACITY,
};
use brainvault_core::{IdeaRepository, UpdateIdeaRequest};
use brainvault_inference::{EmotionClassifier, EMOTION_NEUTRAL};

use crate::enrichment::{derive_project, derive_theme};

/// Configuration for the enrichment worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Bound on the trigger queue; overflow drops triggers.
    pub queue_capacity: usize,
    /// Maximum number of concurrently running enrichment tasks.
    pub max_concurrent: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: ENRICH_QUEUE_CAPACITY,
            max_concurrent: ENRICH_MAX_CONCURRENT,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `ENRICH_QUEUE_CAPACITY` | `256` | Trigger queue bound |
    /// | `ENRICH_MAX_CONCURRENT` | `4` | Max concurrent enrichment tasks |
    pub fn from_env() -> Self {
        let queue_capacity = std::env::var(ENV_ENRICH_QUEUE_CAPACITY)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(ENRICH_QUEUE_CAPACITY)
            .max(1);

        let max_concurrent = std::env::var(ENV_ENRICH_MAX_CONCURRENT)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(ENRICH_MAX_CONCURRENT)
            .max(1);

        Self {
            queue_capacity,
            max_concurrent,
        }
    }

    /// Set the trigger queue bound.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Set maximum concurrent enrichment tasks.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }
}

/// One enrichment trigger. Content is captured at creation time; the id
/// originated from a just-created record, so the write-back needs no
/// ownership re-check beyond the keyed update.
#[derive(Debug, Clone)]
pub struct EnrichmentTask {
    pub idea_id: Uuid,
    pub owner: String,
    pub content: String,
}

/// Event emitted by the enrichment worker.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// Worker started.
    Started,
    /// An idea's enrichment fields were written back.
    IdeaEnriched { idea_id: Uuid },
    /// Enrichment failed (swallowed, never retried).
    EnrichmentFailed { idea_id: Uuid, error: String },
    /// Worker stopped.
    Stopped,
}

/// Sending side of the trigger queue, cloned into request handlers.
#[derive(Clone)]
pub struct EnrichmentQueue {
    tx: mpsc::Sender<EnrichmentTask>,
}

impl EnrichmentQueue {
    /// Fire-and-forget dispatch. Never blocks the caller; a full queue or a
    /// stopped worker loses the trigger (at-most-once).
    pub fn dispatch(&self, task: EnrichmentTask) {
        match self.tx.try_send(task) {
            Ok(()) => {}
            Err(TrySendError::Full(task)) => {
                warn!(
                    subsystem = "jobs",
                    component = "queue",
                    idea_id = %task.idea_id,
                    "Enrichment queue full, trigger dropped"
                );
            }
            Err(TrySendError::Closed(task)) => {
                warn!(
                    subsystem = "jobs",
                    component = "queue",
                    idea_id = %task.idea_id,
                    "Enrichment worker stopped, trigger dropped"
                );
            }
        }
    }
}

/// Handle for controlling a running worker.
pub struct WorkerHandle {
    shutdown_tx: mpsc::Sender<()>,
    event_rx: broadcast::Receiver<WorkerEvent>,
}

impl WorkerHandle {
    /// Signal the worker to shut down gracefully. In-flight tasks run to
    /// completion (dispatched enrichment is not cancellable); queued
    /// triggers that were not yet picked up are lost.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }

    /// Get a receiver for worker events.
    pub fn events(&self) -> broadcast::Receiver<WorkerEvent> {
        self.event_rx.resubscribe()
    }
}

/// Enrichment worker consuming the trigger queue.
pub struct EnrichmentWorker {
    repo: Arc<dyn IdeaRepository>,
    classifier: Option<Arc<EmotionClassifier>>,
    config: WorkerConfig,
    event_tx: broadcast::Sender<WorkerEvent>,
}

impl EnrichmentWorker {
    /// Create a new worker. `classifier` is the optional external emotion
    /// capability; without it every idea gets the neutral default.
    pub fn new(
        repo: Arc<dyn IdeaRepository>,
        classifier: Option<Arc<EmotionClassifier>>,
        config: WorkerConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(WORKER_EVENT_CAPACITY);
        Self {
            repo,
            classifier,
            config,
            event_tx,
        }
    }

    /// Start the worker, returning the trigger queue and a control handle.
    pub fn start(self) -> (EnrichmentQueue, WorkerHandle) {
        let (task_tx, task_rx) = mpsc::channel(self.config.queue_capacity);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let event_rx = self.event_tx.subscribe();

        let worker = Arc::new(self);
        tokio::spawn(async move {
            worker.run(task_rx, shutdown_rx).await;
        });

        (
            EnrichmentQueue { tx: task_tx },
            WorkerHandle {
                shutdown_tx,
                event_rx,
            },
        )
    }

    async fn run(
        self: Arc<Self>,
        mut task_rx: mpsc::Receiver<EnrichmentTask>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        info!(
            subsystem = "jobs",
            component = "worker",
            queue_capacity = self.config.queue_capacity,
            max_concurrent = self.config.max_concurrent,
            "Enrichment worker started"
        );
        let _ = self.event_tx.send(WorkerEvent::Started);

        let mut tasks: JoinSet<()> = JoinSet::new();

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!(
                        subsystem = "jobs",
                        component = "worker",
                        "Enrichment worker received shutdown signal"
                    );
                    break;
                }
                maybe_task = task_rx.recv() => {
                    let Some(task) = maybe_task else { break };

                    // Concurrency bound: wait for a slot before spawning.
                    while tasks.len() >= self.config.max_concurrent {
                        tasks.join_next().await;
                    }

                    let worker = self.clone();
                    tasks.spawn(async move {
                        worker.process(task).await;
                    });
                }
            }
        }

        // In-flight enrichment is not cancellable once dispatched.
        while tasks.join_next().await.is_some() {}
        let _ = self.event_tx.send(WorkerEvent::Stopped);
    }

    async fn process(&self, task: EnrichmentTask) {
        let theme = derive_theme(&task.content);
        let project = derive_project(&task.content);

        let emotion = match &self.classifier {
            Some(classifier) => match classifier.classify(&task.content).await {
                Ok(label) => label,
                Err(e) => {
                    warn!(
                        subsystem = "jobs",
                        component = "worker",
                        idea_id = %task.idea_id,
                        error = %e,
                        "Emotion classification failed, using neutral"
                    );
                    EMOTION_NEUTRAL.to_string()
                }
            },
            None => EMOTION_NEUTRAL.to_string(),
        };

        let update = UpdateIdeaRequest {
            project: Some(project),
            theme: Some(theme),
            emotion: Some(emotion),
            ..Default::default()
        };

        match self.repo.update(task.idea_id, &task.owner, update).await {
            Ok(Some(_)) => {
                debug!(
                    subsystem = "jobs",
                    component = "worker",
                    op = "enrich",
                    idea_id = %task.idea_id,
                    "Idea enriched"
                );
                let _ = self.event_tx.send(WorkerEvent::IdeaEnriched {
                    idea_id: task.idea_id,
                });
            }
            Ok(None) => {
                debug!(
                    subsystem = "jobs",
                    component = "worker",
                    idea_id = %task.idea_id,
                    "Idea vanished before enrichment write-back"
                );
                let _ = self.event_tx.send(WorkerEvent::EnrichmentFailed {
                    idea_id: task.idea_id,
                    error: "idea no longer present".to_string(),
                });
            }
            Err(e) => {
                warn!(
                    subsystem = "jobs",
                    component = "worker",
                    idea_id = %task.idea_id,
                    error = %e,
                    "Enrichment write-back failed"
                );
                let _ = self.event_tx.send(WorkerEvent::EnrichmentFailed {
                    idea_id: task.idea_id,
                    error: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use brainvault_core::{
        new_v7, CreateIdeaRequest, Error, Idea, IdeaStats, ListIdeasRequest, Result,
    };
    use brainvault_inference::mock::MockGeneration;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory IdeaRepository for worker tests.
    #[derive(Default)]
    struct MemoryIdeaRepository {
        ideas: Mutex<HashMap<Uuid, Idea>>,
    }

    impl MemoryIdeaRepository {
        fn seed(&self, owner: &str, content: &str) -> Idea {
            let idea = Idea {
                id: new_v7(),
                user_id: owner.to_string(),
                content: content.to_string(),
                source: "manual".to_string(),
                timestamp: chrono::Utc::now(),
                project: None,
                theme: None,
                emotion: None,
                transformed_output: None,
            };
            self.ideas.lock().unwrap().insert(idea.id, idea.clone());
            idea
        }

        fn get(&self, id: Uuid) -> Option<Idea> {
            self.ideas.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl IdeaRepository for MemoryIdeaRepository {
        async fn insert(&self, owner: &str, req: CreateIdeaRequest) -> Result<Idea> {
            Ok(self.seed(owner, &req.content))
        }

        async fn fetch(&self, id: Uuid, owner: &str) -> Result<Option<Idea>> {
            Ok(self.get(id).filter(|i| i.user_id == owner))
        }

        async fn list(&self, _owner: &str, _req: ListIdeasRequest) -> Result<Vec<Idea>> {
            Ok(Vec::new())
        }

        async fn search(&self, _owner: &str, _query: &str) -> Result<Vec<Idea>> {
            Ok(Vec::new())
        }

        async fn update(
            &self,
            id: Uuid,
            owner: &str,
            req: UpdateIdeaRequest,
        ) -> Result<Option<Idea>> {
            let mut ideas = self.ideas.lock().unwrap();
            let Some(idea) = ideas.get_mut(&id).filter(|i| i.user_id == owner) else {
                return Ok(None);
            };
            if let Some(content) = req.content {
                idea.content = content;
            }
            if let Some(project) = req.project {
                idea.project = Some(project);
            }
            if let Some(theme) = req.theme {
                idea.theme = Some(theme);
            }
            if let Some(emotion) = req.emotion {
                idea.emotion = Some(emotion);
            }
            if let Some(output) = req.transformed_output {
                idea.transformed_output = Some(output);
            }
            Ok(Some(idea.clone()))
        }

        async fn delete(&self, id: Uuid, owner: &str) -> Result<bool> {
            let mut ideas = self.ideas.lock().unwrap();
            let owned = ideas.get(&id).map(|i| i.user_id == owner).unwrap_or(false);
            if owned {
                ideas.remove(&id);
            }
            Ok(owned)
        }

        async fn stats(&self, _owner: &str) -> Result<IdeaStats> {
            Err(Error::Internal("not used in worker tests".to_string()))
        }
    }

    /// Wait on an event receiver that was subscribed BEFORE dispatch, so
    /// the completion event cannot slip past the subscription.
    async fn wait_for_enriched(events: &mut broadcast::Receiver<WorkerEvent>, idea_id: Uuid) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match events.recv().await {
                    Ok(WorkerEvent::IdeaEnriched { idea_id: done }) if done == idea_id => break,
                    Ok(_) => continue,
                    Err(_) => panic!("event channel closed before enrichment"),
                }
            }
        })
        .await
        .expect("enrichment timed out");
    }

    #[tokio::test]
    async fn test_enrichment_defaults_without_classifier() {
        let repo = Arc::new(MemoryIdeaRepository::default());
        let idea = repo.seed("alice", "We should build a startup around solar panels");

        let worker = EnrichmentWorker::new(repo.clone(), None, WorkerConfig::default());
        let (queue, handle) = worker.start();
        let mut events = handle.events();

        queue.dispatch(EnrichmentTask {
            idea_id: idea.id,
            owner: idea.user_id.clone(),
            content: idea.content.clone(),
        });
        wait_for_enriched(&mut events, idea.id).await;

        let enriched = repo.get(idea.id).unwrap();
        assert_eq!(enriched.project.as_deref(), Some("Startup Ideas"));
        assert_eq!(enriched.theme.as_deref(), Some("general"));
        assert_eq!(enriched.emotion.as_deref(), Some("neutral"));
        // Capture fields are untouched by enrichment.
        assert_eq!(enriched.content, idea.content);
        assert_eq!(enriched.timestamp, idea.timestamp);
    }

    #[tokio::test]
    async fn test_enrichment_uses_classifier_label() {
        let repo = Arc::new(MemoryIdeaRepository::default());
        let idea = repo.seed("alice", "So thrilled about this new blog series");

        let classifier = Arc::new(EmotionClassifier::new(Arc::new(
            MockGeneration::answering("excited"),
        )));
        let worker =
            EnrichmentWorker::new(repo.clone(), Some(classifier), WorkerConfig::default());
        let (queue, handle) = worker.start();
        let mut events = handle.events();

        queue.dispatch(EnrichmentTask {
            idea_id: idea.id,
            owner: idea.user_id.clone(),
            content: idea.content.clone(),
        });
        wait_for_enriched(&mut events, idea.id).await;

        let enriched = repo.get(idea.id).unwrap();
        assert_eq!(enriched.emotion.as_deref(), Some("excited"));
        assert_eq!(enriched.project.as_deref(), Some("Blog Content"));
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back_to_neutral() {
        let repo = Arc::new(MemoryIdeaRepository::default());
        let idea = repo.seed("alice", "plain note");

        let classifier = Arc::new(EmotionClassifier::new(Arc::new(MockGeneration::failing())));
        let worker =
            EnrichmentWorker::new(repo.clone(), Some(classifier), WorkerConfig::default());
        let (queue, handle) = worker.start();
        let mut events = handle.events();

        queue.dispatch(EnrichmentTask {
            idea_id: idea.id,
            owner: idea.user_id.clone(),
            content: idea.content.clone(),
        });
        wait_for_enriched(&mut events, idea.id).await;

        let enriched = repo.get(idea.id).unwrap();
        assert_eq!(enriched.emotion.as_deref(), Some("neutral"));
    }

    #[tokio::test]
    async fn test_missing_idea_reports_failure_event() {
        let repo = Arc::new(MemoryIdeaRepository::default());
        let worker = EnrichmentWorker::new(repo, None, WorkerConfig::default());
        let (queue, handle) = worker.start();
        let mut events = handle.events();

        let ghost = new_v7();
        queue.dispatch(EnrichmentTask {
            idea_id: ghost,
            owner: "alice".to_string(),
            content: "gone".to_string(),
        });

        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match events.recv().await.unwrap() {
                    WorkerEvent::EnrichmentFailed { idea_id, .. } if idea_id == ghost => break,
                    _ => continue,
                }
            }
        })
        .await
        .expect("failure event timed out");
    }

    #[tokio::test]
    async fn test_dispatch_after_shutdown_is_dropped_silently() {
        let repo = Arc::new(MemoryIdeaRepository::default());
        let worker = EnrichmentWorker::new(repo, None, WorkerConfig::default());
        let (queue, handle) = worker.start();
        let mut events = handle.events();

        handle.shutdown().await;
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if matches!(events.recv().await, Ok(WorkerEvent::Stopped) | Err(_)) {
                    break;
                }
            }
        })
        .await
        .expect("shutdown timed out");

        // Must not panic or block; the trigger is simply lost.
        queue.dispatch(EnrichmentTask {
            idea_id: new_v7(),
            owner: "alice".to_string(),
            content: "too late".to_string(),
        });
    }

    #[test]
    fn test_worker_config_clamps_to_one() {
        let config = WorkerConfig::default()
            .with_queue_capacity(0)
            .with_max_concurrent(0);
        assert_eq!(config.queue_capacity, 1);
        assert_eq!(config.max_concurrent, 1);
    }
}
