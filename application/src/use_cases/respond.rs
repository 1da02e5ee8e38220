//! Persona response generation
//!
//! Produces a persona-voiced contribution for a turn. Backend failures are
//! fully absorbed here: the caller always receives usable text, at worst
//! the canned fallback reply.

use crate::ports::llm_gateway::{GenerationRequest, LlmGateway};
use roundtable_domain::{
    AgentRole, Message, PersonaRegistry, PromptTemplate, QuestionProfile, TurnContext,
    fallback_reply, fallback_summary,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Sampling parameters for persona turns
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// Generates persona-voiced text, falling back to canned replies
pub struct PersonaResponder<G: LlmGateway> {
    gateway: Arc<G>,
    settings: GenerationSettings,
}

impl<G: LlmGateway> PersonaResponder<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Generate a reply for one persona turn.
    ///
    /// Infallible by contract: a gateway error is logged and replaced with
    /// the persona's canned reply.
    pub async fn respond(
        &self,
        role: AgentRole,
        trigger: &Message,
        context: &[Message],
        ctx: &TurnContext,
    ) -> String {
        let persona = PersonaRegistry::get(role);
        let prompt = PromptTemplate::persona_turn(ctx, context, trigger);
        let request = GenerationRequest::new(persona.system_prompt, prompt)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        match self.gateway.generate(&request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                debug!(role = %role, "backend returned empty text, using fallback");
                self.canned(role, ctx)
            }
            Err(e) => {
                warn!(role = %role, "generation failed, using fallback: {}", e);
                self.canned(role, ctx)
            }
        }
    }

    /// Generate the closing summary for the given persona
    pub async fn summarize(
        &self,
        role: AgentRole,
        context: &[Message],
        ctx: &TurnContext,
    ) -> String {
        let persona = PersonaRegistry::get(role);
        let prompt = PromptTemplate::summary(ctx, context);
        let request = GenerationRequest::new(persona.system_prompt, prompt)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        match self.gateway.generate(&request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) | Err(_) => {
                warn!(role = %role, "summary generation failed, using canned summary");
                let profile = QuestionProfile::analyze(&ctx.clinical_question);
                fallback_summary(&profile, &ctx.title)
            }
        }
    }

    fn canned(&self, role: AgentRole, ctx: &TurnContext) -> String {
        let profile = QuestionProfile::analyze(&ctx.clinical_question);
        fallback_reply(role, &profile, &ctx.clinical_question)
    }
}
