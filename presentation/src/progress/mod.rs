//! Live progress output

pub mod reporter;

pub use reporter::DiscussionReporter;
