//! Session domain model: messages and the roundtable entity

pub mod message;
pub mod roundtable;

pub use message::{Message, MessageKind, MessageMeta, Recipient, Sender};
pub use roundtable::{Roundtable, RoundtableSnapshot, RoundtableStatus};
