//! Roundtable session entity

use crate::citation::{CitationBook, CitedReference};
use crate::persona::AgentRole;
use crate::session::message::Message;
use crate::stage::{TurnContext, TurnStage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a roundtable session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundtableStatus {
    /// Created, discussion not started
    Init,
    /// Discussion pipeline running
    ProblemPresentation,
    /// Discussion suspended by the user; resumable
    Paused,
    /// All stages and the closing summary are done
    Completed,
}

impl RoundtableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundtableStatus::Init => "init",
            RoundtableStatus::ProblemPresentation => "problem_presentation",
            RoundtableStatus::Paused => "paused",
            RoundtableStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for RoundtableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A roundtable discussion session (Entity)
///
/// Owns the append-only message ledger, the round counter and the
/// session-scoped citation book. Only the orchestrating pipeline mutates a
/// session, and only by appending messages or advancing status.
#[derive(Debug, Clone)]
pub struct Roundtable {
    id: String,
    title: String,
    clinical_question: String,
    status: RoundtableStatus,
    participants: Vec<AgentRole>,
    messages: Vec<Message>,
    current_round: u32,
    citations: CitationBook,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Roundtable {
    pub fn new(title: impl Into<String>, clinical_question: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            clinical_question: clinical_question.into(),
            status: RoundtableStatus::Init,
            participants: AgentRole::ALL.to_vec(),
            messages: Vec::new(),
            current_round: 0,
            citations: CitationBook::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn clinical_question(&self) -> &str {
        &self.clinical_question
    }

    pub fn status(&self) -> RoundtableStatus {
        self.status
    }

    pub fn set_status(&mut self, status: RoundtableStatus) {
        self.status = status;
    }

    pub fn participants(&self) -> &[AgentRole] {
        &self.participants
    }

    /// The full ledger in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Last `n` ledger entries
    pub fn tail(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Append a message to the ledger. The ledger only ever grows.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    /// Begin a new stage attempt: bump the round counter once.
    pub fn begin_round(&mut self) -> u32 {
        self.current_round += 1;
        self.current_round
    }

    /// Zero-based index of the next stage to attempt.
    ///
    /// Rounds map one-to-one onto begun stages, which lets a resumed
    /// pipeline pick up where the previous task stopped.
    pub fn next_stage_index(&self) -> usize {
        self.current_round as usize
    }

    pub fn citations(&self) -> &CitationBook {
        &self.citations
    }

    pub fn citations_mut(&mut self) -> &mut CitationBook {
        &mut self.citations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Mark the session completed and stamp the completion time.
    ///
    /// Called only after the summary message is in the ledger, so an
    /// observer never sees a completed session without its summary.
    pub fn complete(&mut self) {
        self.status = RoundtableStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Typed context for a turn generated within this session
    pub fn turn_context(&self, stage: impl Into<TurnStage>) -> TurnContext {
        TurnContext {
            stage: stage.into(),
            round: self.current_round,
            title: self.title.clone(),
            clinical_question: self.clinical_question.clone(),
        }
    }

    /// Owned point-in-time view for callers
    pub fn snapshot(&self) -> RoundtableSnapshot {
        RoundtableSnapshot {
            id: self.id.clone(),
            title: self.title.clone(),
            clinical_question: self.clinical_question.clone(),
            status: self.status,
            participants: self.participants.clone(),
            messages: self.messages.clone(),
            current_round: self.current_round,
            references: self.citations.entries().to_vec(),
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }
}

/// Serializable snapshot of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundtableSnapshot {
    pub id: String,
    pub title: String,
    pub clinical_question: String,
    pub status: RoundtableStatus,
    pub participants: Vec<AgentRole>,
    pub messages: Vec<Message>,
    pub current_round: u32,
    pub references: Vec<CitedReference>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::{MessageKind, Recipient, Sender};
    use crate::stage::Stage;

    fn sample_message(rt: &Roundtable, content: &str) -> Message {
        Message::new(
            rt.id(),
            Sender::User,
            Recipient::All,
            MessageKind::Question,
            content,
        )
    }

    #[test]
    fn test_new_session_defaults() {
        let rt = Roundtable::new("圆桌会", "二甲双胍的心血管获益");
        assert_eq!(rt.status(), RoundtableStatus::Init);
        assert_eq!(rt.current_round(), 0);
        assert_eq!(rt.participants().len(), 5);
        assert!(rt.messages().is_empty());
        assert!(rt.completed_at().is_none());
    }

    #[test]
    fn test_ledger_append_only_growth() {
        let mut rt = Roundtable::new("t", "q");
        let first_id;
        {
            let msg = sample_message(&rt, "第一条");
            first_id = msg.id.clone();
            rt.append(msg);
        }
        for i in 0..9 {
            let msg = sample_message(&rt, &format!("第{}条", i + 2));
            rt.append(msg);
        }
        assert_eq!(rt.messages().len(), 10);
        assert_eq!(rt.messages()[0].id, first_id);
        assert_eq!(rt.messages()[0].content, "第一条");
    }

    #[test]
    fn test_tail_returns_last_n() {
        let mut rt = Roundtable::new("t", "q");
        for i in 0..7 {
            rt.append(sample_message(&rt, &i.to_string()));
        }
        let tail = rt.tail(5);
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0].content, "2");
        assert_eq!(rt.tail(100).len(), 7);
    }

    #[test]
    fn test_round_monotonicity() {
        let mut rt = Roundtable::new("t", "q");
        assert_eq!(rt.begin_round(), 1);
        assert_eq!(rt.begin_round(), 2);
        assert_eq!(rt.current_round(), 2);
        assert_eq!(rt.next_stage_index(), 2);
    }

    #[test]
    fn test_complete_stamps_time() {
        let mut rt = Roundtable::new("t", "q");
        rt.complete();
        assert_eq!(rt.status(), RoundtableStatus::Completed);
        assert!(rt.completed_at().is_some());
    }

    #[test]
    fn test_turn_context_carries_identity() {
        let mut rt = Roundtable::new("Metformin CV outcomes", "二甲双胍与心血管结局");
        rt.begin_round();
        let ctx = rt.turn_context(Stage::ProblemPresentation);
        assert_eq!(ctx.stage, TurnStage::ProblemPresentation);
        assert_eq!(ctx.round, 1);
        assert_eq!(ctx.title, "Metformin CV outcomes");
    }
}
