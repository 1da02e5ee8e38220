//! Roundtable controller
//!
//! Application facade over the discussion core. Owns the session store,
//! the broadcast fan-out and one supervised pipeline task per active
//! session, with explicit pause/resume/teardown semantics so abandoned
//! sessions never leak running tasks.

use crate::ports::message_sink::{Broadcaster, MessageSink};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::session_store::{SessionHandle, SessionStore};
use crate::signal::InterruptSignal;
use crate::use_cases::intervene::InterventionRouter;
use crate::use_cases::respond::{GenerationSettings, PersonaResponder};
use crate::use_cases::run_discussion::{DiscussionPipeline, DiscussionTiming};
use roundtable_domain::{
    AgentRole, Message, PersonaRegistry, PersonaSummary, Roundtable, RoundtableSnapshot,
    RoundtableStatus,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Caller-visible controller errors
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Invalid target role: {0}")]
    InvalidTarget(String),

    #[error("Discussion already running for session {0}")]
    AlreadyRunning(String),
}

/// Runtime state of one session's pipeline
struct SessionRuntime {
    interrupt: Arc<InterruptSignal>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SessionRuntime {
    fn new() -> Self {
        Self {
            interrupt: Arc::new(InterruptSignal::new()),
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

/// Facade exposing the roundtable operations to callers (API layers)
pub struct RoundtableController<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    store: Arc<dyn SessionStore>,
    broadcaster: Arc<Broadcaster>,
    timing: DiscussionTiming,
    settings: GenerationSettings,
    runtimes: Mutex<HashMap<String, SessionRuntime>>,
}

impl<G: LlmGateway + 'static> RoundtableController<G> {
    pub fn new(gateway: Arc<G>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            store,
            broadcaster: Arc::new(Broadcaster::new()),
            timing: DiscussionTiming::default(),
            settings: GenerationSettings::default(),
            runtimes: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_timing(mut self, timing: DiscussionTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register a broadcast subscriber
    pub async fn subscribe(&self, sink: Arc<dyn MessageSink>) {
        self.broadcaster.subscribe(sink).await;
    }

    /// Create a new roundtable session
    pub async fn create_session(
        &self,
        title: impl Into<String>,
        clinical_question: impl Into<String>,
    ) -> RoundtableSnapshot {
        let session = Roundtable::new(title, clinical_question);
        let snapshot = session.snapshot();
        self.store.insert(session).await;
        self.runtimes
            .lock()
            .await
            .insert(snapshot.id.clone(), SessionRuntime::new());
        info!(session = %snapshot.id, "session created");
        snapshot
    }

    /// Start (or restart after a pause) the asynchronous discussion pipeline
    pub async fn start_discussion(&self, session_id: &str) -> Result<(), ControllerError> {
        let handle = self.require_session(session_id).await?;

        let mut runtimes = self.runtimes.lock().await;
        let runtime = runtimes
            .entry(session_id.to_string())
            .or_insert_with(SessionRuntime::new);
        if runtime.is_running() {
            return Err(ControllerError::AlreadyRunning(session_id.to_string()));
        }

        {
            let mut s = handle.write().await;
            match s.status() {
                RoundtableStatus::Init | RoundtableStatus::Paused => {
                    s.set_status(RoundtableStatus::ProblemPresentation);
                }
                _ => return Err(ControllerError::AlreadyRunning(session_id.to_string())),
            }
        }

        let pipeline = DiscussionPipeline::new(self.gateway.clone(), self.broadcaster.clone())
            .with_timing(self.timing)
            .with_settings(self.settings);
        let interrupt = runtime.interrupt.clone();
        let cancel = CancellationToken::new();
        runtime.cancel = cancel.clone();

        info!(session = %session_id, "starting discussion pipeline");
        runtime.task = Some(tokio::spawn(async move {
            pipeline.run(handle, interrupt, cancel).await;
        }));

        Ok(())
    }

    /// Suspend a running discussion; the pipeline task is cancelled and
    /// joined before the session is marked paused.
    pub async fn pause_discussion(&self, session_id: &str) -> Result<(), ControllerError> {
        let handle = self.require_session(session_id).await?;

        let task = {
            let mut runtimes = self.runtimes.lock().await;
            let runtime = runtimes
                .get_mut(session_id)
                .ok_or_else(|| ControllerError::NotFound(session_id.to_string()))?;
            runtime.cancel.cancel();
            runtime.task.take()
        };
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(session = %session_id, "pipeline task ended abnormally: {}", e);
            }
        }

        let mut s = handle.write().await;
        if s.status() != RoundtableStatus::Completed {
            s.set_status(RoundtableStatus::Paused);
            info!(session = %session_id, "discussion paused");
        }
        Ok(())
    }

    /// Resume a paused discussion from the next unattempted stage
    pub async fn resume_discussion(&self, session_id: &str) -> Result<(), ControllerError> {
        self.start_discussion(session_id).await
    }

    /// Append a user message and route it to responding personas.
    ///
    /// The target is validated before anything touches the ledger: an
    /// unknown persona id fails with [`ControllerError::InvalidTarget`] and
    /// leaves the session unchanged.
    pub async fn send_user_message(
        &self,
        session_id: &str,
        content: &str,
        target: &str,
    ) -> Result<Vec<Message>, ControllerError> {
        let handle = self.require_session(session_id).await?;

        let target: Option<AgentRole> = if target == "all" {
            None
        } else {
            Some(
                PersonaRegistry::find(target)
                    .map(|p| p.role)
                    .ok_or_else(|| ControllerError::InvalidTarget(target.to_string()))?,
            )
        };

        let interrupt = {
            let mut runtimes = self.runtimes.lock().await;
            runtimes
                .entry(session_id.to_string())
                .or_insert_with(SessionRuntime::new)
                .interrupt
                .clone()
        };

        let responder = PersonaResponder::new(self.gateway.clone()).with_settings(self.settings);
        let router = InterventionRouter::new(responder, self.broadcaster.clone())
            .with_turn_delay(self.timing.turn_delay);
        Ok(router.route(&handle, content, target, &interrupt).await)
    }

    /// Summaries of all registered personas
    pub fn list_personas(&self) -> Vec<PersonaSummary> {
        PersonaRegistry::all().iter().map(|p| p.summary()).collect()
    }

    /// Point-in-time view of a session
    pub async fn get_session(&self, session_id: &str) -> Result<RoundtableSnapshot, ControllerError> {
        let handle = self.require_session(session_id).await?;
        let snapshot = handle.read().await.snapshot();
        Ok(snapshot)
    }

    /// Snapshots of every stored session
    pub async fn list_sessions(&self) -> Vec<RoundtableSnapshot> {
        let mut snapshots = Vec::new();
        for handle in self.store.list().await {
            snapshots.push(handle.read().await.snapshot());
        }
        snapshots
    }

    /// Await natural completion of a session's pipeline task
    pub async fn join(&self, session_id: &str) -> Result<(), ControllerError> {
        let task = {
            let mut runtimes = self.runtimes.lock().await;
            let runtime = runtimes
                .get_mut(session_id)
                .ok_or_else(|| ControllerError::NotFound(session_id.to_string()))?;
            runtime.task.take()
        };
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(session = %session_id, "pipeline task ended abnormally: {}", e);
            }
        }
        Ok(())
    }

    /// Cancel and join every live pipeline task
    pub async fn shutdown(&self) {
        let tasks: Vec<(String, JoinHandle<()>)> = {
            let mut runtimes = self.runtimes.lock().await;
            runtimes
                .iter_mut()
                .filter_map(|(id, runtime)| {
                    runtime.cancel.cancel();
                    runtime.task.take().map(|t| (id.clone(), t))
                })
                .collect()
        };
        for (id, task) in tasks {
            if let Err(e) = task.await {
                warn!(session = %id, "pipeline task ended abnormally: {}", e);
            }
        }
    }

    async fn require_session(&self, session_id: &str) -> Result<SessionHandle, ControllerError> {
        self.store
            .get(session_id)
            .await
            .ok_or_else(|| ControllerError::NotFound(session_id.to_string()))
    }
}
