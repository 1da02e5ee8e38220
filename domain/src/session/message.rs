//! Message entity and addressing types

use crate::persona::{AgentRole, PersonaRegistry};
use crate::stage::TurnStage;
use chrono::{DateTime, Utc};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use uuid::Uuid;

/// Originator of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Agent(AgentRole),
    User,
    System,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Agent(role) => role.as_str(),
            Sender::User => "user",
            Sender::System => "system",
        }
    }

    /// Display name used when quoting this sender in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Sender::Agent(role) => PersonaRegistry::get(*role).name,
            Sender::User => "用户",
            Sender::System => "系统",
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sender::User),
            "system" => Ok(Sender::System),
            other => other.parse::<AgentRole>().map(Sender::Agent),
        }
    }
}

/// Addressee of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Agent(AgentRole),
    User,
    /// Broadcast to every participant
    All,
}

impl Recipient {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recipient::Agent(role) => role.as_str(),
            Recipient::User => "user",
            Recipient::All => "all",
        }
    }
}

impl FromStr for Recipient {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Recipient::All),
            "user" => Ok(Recipient::User),
            other => other.parse::<AgentRole>().map(Recipient::Agent),
        }
    }
}

// Sender/Recipient travel as plain strings ("user", "all", a role id) so the
// serialized form matches what subscribers expect on the wire.
macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(DeError::custom)
            }
        }
    };
}

string_serde!(Sender);
string_serde!(Recipient);

/// Kind of contribution a message represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Proposal,
    Question,
    Feedback,
    Agreement,
    Objection,
    Summary,
}

/// Typed message metadata
///
/// Stage label, round number and citation ids attached by the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<TurnStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citation_ids: Vec<String>,
}

impl MessageMeta {
    pub fn for_turn(stage: TurnStage, round: u32) -> Self {
        Self {
            stage: Some(stage),
            round: Some(round),
            citation_ids: Vec::new(),
        }
    }

    pub fn with_citations(mut self, ids: Vec<String>) -> Self {
        self.citation_ids = ids;
        self
    }
}

/// A single entry of a session's message ledger (Entity)
///
/// Immutable once appended; the ledger preserves insertion order and that is
/// the only ordering guarantee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub session_id: String,
    pub sender: Sender,
    pub recipient: Recipient,
    pub kind: MessageKind,
    pub content: String,
    #[serde(default)]
    pub meta: MessageMeta,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        session_id: impl Into<String>,
        sender: Sender,
        recipient: Recipient,
        kind: MessageKind,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            sender,
            recipient,
            kind,
            content: content.into(),
            meta: MessageMeta::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_meta(mut self, meta: MessageMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Whether this message came from the live user
    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_string_forms() {
        assert_eq!(Sender::User.as_str(), "user");
        assert_eq!(Sender::Agent(AgentRole::Statistician).as_str(), "statistician");
        assert_eq!("statistician".parse::<Sender>().unwrap(), Sender::Agent(AgentRole::Statistician));
        assert!("imaging_specialist".parse::<Sender>().is_err());
    }

    #[test]
    fn test_recipient_broadcast_token() {
        assert_eq!("all".parse::<Recipient>().unwrap(), Recipient::All);
        assert_eq!(Recipient::All.as_str(), "all");
    }

    #[test]
    fn test_message_serializes_sender_as_string() {
        let msg = Message::new(
            "s1",
            Sender::Agent(AgentRole::ClinicalDirector),
            Recipient::All,
            MessageKind::Proposal,
            "各位好",
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "clinical_director");
        assert_eq!(json["recipient"], "all");
        assert_eq!(json["kind"], "proposal");
    }

    #[test]
    fn test_meta_round_trip() {
        let meta = MessageMeta::for_turn(TurnStage::StudyDesign, 3)
            .with_citations(vec!["ref1".to_string()]);
        let json = serde_json::to_string(&meta).unwrap();
        let back: MessageMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stage, Some(TurnStage::StudyDesign));
        assert_eq!(back.round, Some(3));
        assert_eq!(back.citation_ids, vec!["ref1".to_string()]);
    }
}
