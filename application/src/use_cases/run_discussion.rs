//! Discussion pipeline
//!
//! Drives the fixed stage sequence for one session: the stage leader opens,
//! every other persona responds in registry order, and the closing stage is
//! synthesized into a single summary. The pipeline observes its
//! cancellation token and the session's interrupt signal at every
//! suspension point.

use crate::ports::message_sink::Broadcaster;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::session_store::SessionHandle;
use crate::signal::InterruptSignal;
use crate::use_cases::respond::{GenerationSettings, PersonaResponder};
use roundtable_domain::{
    Message, MessageKind, MessageMeta, PersonaRegistry, PromptTemplate, Recipient, RoundtableStatus,
    Sender, Stage, TurnContext,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Pacing configuration for the discussion flow
#[derive(Debug, Clone, Copy)]
pub struct DiscussionTiming {
    /// Delay between consecutive persona turns within a stage
    pub turn_delay: Duration,
    /// Window between stages, short-circuited by a user interruption
    pub stage_delay: Duration,
    /// How long an interruption holds the floor before the pipeline
    /// re-checks
    pub interrupt_holdoff: Duration,
}

impl Default for DiscussionTiming {
    fn default() -> Self {
        Self {
            turn_delay: Duration::from_millis(500),
            stage_delay: Duration::from_millis(1000),
            interrupt_holdoff: Duration::from_millis(2000),
        }
    }
}

/// Runs the staged discussion for one session
pub struct DiscussionPipeline<G: LlmGateway + 'static> {
    responder: PersonaResponder<G>,
    broadcaster: Arc<Broadcaster>,
    timing: DiscussionTiming,
}

impl<G: LlmGateway + 'static> DiscussionPipeline<G> {
    pub fn new(gateway: Arc<G>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            responder: PersonaResponder::new(gateway),
            broadcaster,
            timing: DiscussionTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: DiscussionTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.responder = self.responder.with_settings(settings);
        self
    }

    /// Run the stage loop until completion, cancellation, or pause.
    ///
    /// Resumable: the next stage is derived from the session's round
    /// counter, so a re-spawned pipeline picks up where the last one
    /// stopped.
    pub async fn run(
        &self,
        session: SessionHandle,
        interrupt: Arc<InterruptSignal>,
        cancel: CancellationToken,
    ) {
        loop {
            if cancel.is_cancelled() {
                return;
            }

            let (stage, session_id) = {
                let s = session.read().await;
                if s.status() == RoundtableStatus::Completed {
                    return;
                }
                (Stage::at(s.next_stage_index()), s.id().to_string())
            };
            let Some(stage) = stage else {
                return;
            };

            // A pending user intervention steals the floor for this pass;
            // the stage is re-attempted after the hold-off.
            if interrupt.take() {
                debug!(session = %session_id, stage = %stage, "user intervention, yielding the floor");
                if !self.pause_for(self.timing.interrupt_holdoff, &cancel).await {
                    return;
                }
                continue;
            }

            info!(session = %session_id, stage = %stage, "starting stage");

            if stage.is_synthesis() {
                self.run_summary(&session, stage).await;
                continue;
            }

            if !self.run_stage(&session, stage, &cancel).await {
                return;
            }

            // Inter-stage window: bounded wait, short-circuited by a user
            // message so an intervention is picked up before the next stage.
            if !self.stage_window(&interrupt, &cancel).await {
                return;
            }
        }
    }

    /// Run one peer-discussion stage. Returns false when cancelled.
    async fn run_stage(
        &self,
        session: &SessionHandle,
        stage: Stage,
        cancel: &CancellationToken,
    ) -> bool {
        let leader = stage.leader();

        let (seed, ctx, context) = {
            let mut s = session.write().await;
            s.begin_round();
            let seed = Message::new(
                s.id(),
                Sender::System,
                Recipient::Agent(leader),
                MessageKind::Question,
                PromptTemplate::stage_seed(stage),
            );
            (seed, s.turn_context(stage), s.messages().to_vec())
        };

        let opening = self.responder.respond(leader, &seed, &context, &ctx).await;
        if cancel.is_cancelled() {
            return false;
        }
        let leader_msg = self
            .append_turn(session, Sender::Agent(leader), MessageKind::Proposal, opening, &ctx)
            .await;

        for persona in PersonaRegistry::all() {
            if persona.role == leader {
                continue;
            }
            let context = session.read().await.messages().to_vec();
            let reply = self
                .responder
                .respond(persona.role, &leader_msg, &context, &ctx)
                .await;
            if cancel.is_cancelled() {
                return false;
            }
            self.append_turn(session, Sender::Agent(persona.role), MessageKind::Feedback, reply, &ctx)
                .await;

            if !self.pause_for(self.timing.turn_delay, cancel).await {
                return false;
            }
        }

        true
    }

    /// Closing synthesis: one summary message, then the session completes.
    ///
    /// Status flips only after the summary is in the ledger, so observers
    /// never see a completed session without its summary.
    async fn run_summary(&self, session: &SessionHandle, stage: Stage) {
        let leader = stage.leader();

        let (ctx, context) = {
            let mut s = session.write().await;
            s.begin_round();
            (s.turn_context(stage), s.messages().to_vec())
        };

        let summary = self.responder.summarize(leader, &context, &ctx).await;

        let msg = {
            let mut s = session.write().await;
            let (annotated, citation_ids) = s.citations_mut().annotate(&summary);
            let msg = Message::new(
                s.id(),
                Sender::Agent(leader),
                Recipient::All,
                MessageKind::Summary,
                annotated,
            )
            .with_meta(MessageMeta::for_turn(ctx.stage, ctx.round).with_citations(citation_ids));
            s.append(msg.clone());
            s.complete();
            msg
        };
        self.broadcaster.publish(&msg).await;

        info!(session = %msg.session_id, "discussion completed");
    }

    /// Annotate, append and broadcast one persona turn
    async fn append_turn(
        &self,
        session: &SessionHandle,
        sender: Sender,
        kind: MessageKind,
        content: String,
        ctx: &TurnContext,
    ) -> Message {
        let msg = {
            let mut s = session.write().await;
            let (annotated, citation_ids) = s.citations_mut().annotate(&content);
            let msg = Message::new(s.id(), sender, Recipient::All, kind, annotated)
                .with_meta(MessageMeta::for_turn(ctx.stage, ctx.round).with_citations(citation_ids));
            s.append(msg.clone());
            msg
        };
        self.broadcaster.publish(&msg).await;
        msg
    }

    /// Cancellable sleep. Returns false when cancelled.
    async fn pause_for(&self, duration: Duration, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }

    /// Inter-stage window. Returns false when cancelled.
    async fn stage_window(
        &self,
        interrupt: &InterruptSignal,
        cancel: &CancellationToken,
    ) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = interrupt.triggered() => true,
            _ = tokio::time::sleep(self.timing.stage_delay) => true,
        }
    }
}
