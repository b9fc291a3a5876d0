//! All Slack-specific functionality

pub mod client;
pub mod message_formatter;
pub mod payloads;

// Re-export main types for convenience
pub use client::{SlackApi, SlackClient};
