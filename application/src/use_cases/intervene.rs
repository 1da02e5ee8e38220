//! Intervention routing
//!
//! A user message sent mid-discussion is appended to the ledger, raises
//! the session's interrupt signal, and is answered by one or two personas
//! chosen by keyword affinity (or by the explicitly addressed persona).

use crate::ports::message_sink::Broadcaster;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::session_store::SessionHandle;
use crate::signal::InterruptSignal;
use crate::use_cases::respond::PersonaResponder;
use roundtable_domain::{
    AgentRole, Message, MessageKind, MessageMeta, PersonaRegistry, Recipient, Sender, TurnStage,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Routes user interventions to responding personas
pub struct InterventionRouter<G: LlmGateway + 'static> {
    responder: PersonaResponder<G>,
    broadcaster: Arc<Broadcaster>,
    turn_delay: Duration,
}

impl<G: LlmGateway + 'static> InterventionRouter<G> {
    pub fn new(responder: PersonaResponder<G>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            responder,
            broadcaster,
            turn_delay: Duration::from_millis(500),
        }
    }

    pub fn with_turn_delay(mut self, delay: Duration) -> Self {
        self.turn_delay = delay;
        self
    }

    /// Append the user message and generate the selected personas' replies.
    ///
    /// The caller has already validated `target`; routing never reaches a
    /// nonexistent persona.
    pub async fn route(
        &self,
        session: &SessionHandle,
        content: &str,
        target: Option<AgentRole>,
        interrupt: &InterruptSignal,
    ) -> Vec<Message> {
        let user_msg = {
            let mut s = session.write().await;
            let recipient = target.map(Recipient::Agent).unwrap_or(Recipient::All);
            let msg = Message::new(s.id(), Sender::User, recipient, MessageKind::Question, content);
            s.append(msg.clone());
            msg
        };
        self.broadcaster.publish(&user_msg).await;

        // Let the pipeline yield the floor at its next suspension point
        interrupt.raise();

        let responders = Self::select_responders(content, target);
        debug!(?responders, "routing user intervention");

        let mut replies = Vec::with_capacity(responders.len());
        for (i, role) in responders.iter().enumerate() {
            let persona = PersonaRegistry::get(*role);
            let (ctx, context) = {
                let s = session.read().await;
                (s.turn_context(TurnStage::UserIntervention), s.messages().to_vec())
            };
            let text = self.responder.respond(*role, &user_msg, &context, &ctx).await;
            let attributed = format!("【{} {}】\n{}", persona.avatar, persona.name, text);

            let msg = {
                let mut s = session.write().await;
                let (annotated, citation_ids) = s.citations_mut().annotate(&attributed);
                let msg = Message::new(
                    s.id(),
                    Sender::Agent(*role),
                    Recipient::User,
                    MessageKind::Feedback,
                    annotated,
                )
                .with_meta(
                    MessageMeta::for_turn(TurnStage::UserIntervention, ctx.round)
                        .with_citations(citation_ids),
                );
                s.append(msg.clone());
                msg
            };
            self.broadcaster.publish(&msg).await;
            replies.push(msg);

            if i + 1 < responders.len() {
                tokio::time::sleep(self.turn_delay).await;
            }
        }
        replies
    }

    /// Pick 1–2 responding personas.
    ///
    /// An explicit target short-circuits scoring. Otherwise personas are
    /// scored by keyword affinity; zero scorers fall back to the clinical
    /// director with a nominal score of 1. Ties keep registry order (the
    /// sort is stable).
    pub fn select_responders(content: &str, target: Option<AgentRole>) -> Vec<AgentRole> {
        if let Some(role) = target {
            return vec![role];
        }

        let mut scored: Vec<(usize, AgentRole)> = PersonaRegistry::all()
            .iter()
            .map(|p| (p.affinity_score(content), p.role))
            .filter(|(score, _)| *score > 0)
            .collect();

        if scored.is_empty() {
            return vec![AgentRole::ClinicalDirector];
        }

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(2).map(|(_, role)| role).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{GatewayError, GenerationRequest};
    use async_trait::async_trait;
    use roundtable_domain::Roundtable;
    use tokio::sync::RwLock;

    struct OfflineGateway;

    #[async_trait]
    impl LlmGateway for OfflineGateway {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, GatewayError> {
            Err(GatewayError::NotConfigured("offline".to_string()))
        }
    }

    fn router() -> InterventionRouter<OfflineGateway> {
        InterventionRouter::new(
            PersonaResponder::new(Arc::new(OfflineGateway)),
            Arc::new(Broadcaster::new()),
        )
        .with_turn_delay(Duration::from_millis(1))
    }

    fn session() -> SessionHandle {
        Arc::new(RwLock::new(Roundtable::new("t", "二甲双胍与心血管结局")))
    }

    #[test]
    fn test_selection_cardinality() {
        let chosen = InterventionRouter::<OfflineGateway>::select_responders(
            "样本量和统计检验怎么安排？文献里有参考吗？",
            None,
        );
        assert!(!chosen.is_empty() && chosen.len() <= 2);
    }

    #[test]
    fn test_sample_size_keyword_routes_to_statistician() {
        let chosen =
            InterventionRouter::<OfflineGateway>::select_responders("每组样本量需要多少？", None);
        assert_eq!(chosen[0], AgentRole::Statistician);
    }

    #[test]
    fn test_zero_scores_default_to_director() {
        let chosen =
            InterventionRouter::<OfflineGateway>::select_responders("hello there", None);
        assert_eq!(chosen, vec![AgentRole::ClinicalDirector]);
    }

    #[test]
    fn test_explicit_target_skips_scoring() {
        let chosen = InterventionRouter::<OfflineGateway>::select_responders(
            "样本量？",
            Some(AgentRole::ResearchNurse),
        );
        assert_eq!(chosen, vec![AgentRole::ResearchNurse]);
    }

    #[test]
    fn test_ties_keep_registry_order() {
        // Both director ("临床") and nurse ("随访") score exactly once
        let chosen = InterventionRouter::<OfflineGateway>::select_responders(
            "临床上随访怎么做",
            None,
        );
        assert_eq!(chosen[0], AgentRole::ClinicalDirector);
    }

    #[tokio::test]
    async fn test_route_appends_user_message_and_replies() {
        let session = session();
        let interrupt = InterruptSignal::new();
        let replies = router()
            .route(&session, "请问样本量如何确定？", None, &interrupt)
            .await;

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].sender, Sender::Agent(AgentRole::Statistician));
        assert!(replies[0].content.starts_with("【📊 数据统计专家】"));
        assert!(interrupt.is_pending());

        let s = session.read().await;
        // user message + one persona reply
        assert_eq!(s.messages().len(), 2);
        assert!(s.messages()[0].is_from_user());
    }

    #[tokio::test]
    async fn test_route_to_explicit_target() {
        let session = session();
        let interrupt = InterruptSignal::new();
        let replies = router()
            .route(
                &session,
                "执行层面有什么要注意的？",
                Some(AgentRole::ResearchNurse),
                &interrupt,
            )
            .await;

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].sender, Sender::Agent(AgentRole::ResearchNurse));
        assert_eq!(replies[0].recipient, Recipient::User);
        let s = session.read().await;
        assert_eq!(s.messages()[0].recipient, Recipient::Agent(AgentRole::ResearchNurse));
    }
}
