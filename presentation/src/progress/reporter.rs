//! Live discussion output
//!
//! A broadcast subscriber that prints each message as it is appended,
//! with a spinner between turns so the pacing delays read as an ongoing
//! meeting rather than a stall.

use async_trait::async_trait;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use roundtable_application::{MessageSink, SinkError};
use roundtable_domain::{Message, PersonaRegistry, Sender};
use std::time::Duration;

/// Prints messages live as the discussion progresses
pub struct DiscussionReporter {
    spinner: ProgressBar,
}

impl DiscussionReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner.set_message("圆桌会准备中...");
        Self { spinner }
    }

    /// Clear the spinner once the discussion is over
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    fn sender_label(sender: &Sender) -> String {
        match sender {
            Sender::Agent(role) => {
                let persona = PersonaRegistry::get(*role);
                format!("{} {}", persona.avatar, persona.name)
            }
            Sender::User => "👤 用户".to_string(),
            Sender::System => "⚙ 系统".to_string(),
        }
    }
}

impl Default for DiscussionReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSink for DiscussionReporter {
    async fn deliver(&self, message: &Message) -> Result<(), SinkError> {
        let label = Self::sender_label(&message.sender);
        let stage = message
            .meta
            .stage
            .map(|s| format!(" [{}]", s))
            .unwrap_or_default();

        self.spinner.println(format!(
            "\n{}{}\n{}",
            label.yellow().bold(),
            stage.dimmed(),
            message.content
        ));
        self.spinner.set_message("讨论进行中...");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{AgentRole, MessageKind, Recipient};

    #[tokio::test]
    async fn test_deliver_never_fails() {
        let reporter = DiscussionReporter::new();
        let msg = Message::new(
            "s1",
            Sender::Agent(AgentRole::PhdStudent),
            Recipient::All,
            MessageKind::Feedback,
            "文献检索完成",
        );
        assert!(reporter.deliver(&msg).await.is_ok());
        reporter.finish();
    }

    #[test]
    fn test_sender_labels() {
        assert_eq!(
            DiscussionReporter::sender_label(&Sender::User),
            "👤 用户"
        );
        assert!(
            DiscussionReporter::sender_label(&Sender::Agent(AgentRole::Statistician))
                .contains("数据统计专家")
        );
    }
}
