//! Chat models: live messages and stored history entries

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// CSS class of the message bubble ("user-message" / "bot-message")
    pub fn css_class(&self) -> &'static str {
        match self {
            Sender::User => "user-message",
            Sender::Bot => "bot-message",
        }
    }
}

/// A message shown in the live chat pane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// When the message was added to the pane
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    /// Time label under the bubble (e.g. "3:07:45 PM")
    pub fn time_label(&self) -> String {
        self.timestamp.format("%-I:%M:%S %p").to_string()
    }
}

/// One stored exchange from `/get_chat_history`
///
/// Timestamps are kept as the server's `"%Y-%m-%d %H:%M:%S"` strings; the
/// history sidebar only ever slices them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    pub id: i64,
    pub user_message: String,
    pub bot_response: String,
    pub user_timestamp: String,
    pub created_at: String,
}

impl ChatHistoryEntry {
    /// Calendar date of the entry: `created_at` up to the first space
    pub fn date_key(&self) -> &str {
        self.created_at.split(' ').next().unwrap_or_default()
    }

    /// Time part of `user_timestamp` (after the first space)
    pub fn time_label(&self) -> &str {
        self.user_timestamp.split(' ').nth(1).unwrap_or_default()
    }
}
