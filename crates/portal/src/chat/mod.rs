//! Chat page: live conversation, speech input, history and live support

mod controller;
mod history;
mod speech;
mod support;

pub use controller::{CHAT_APOLOGY, ChatController, ChatState};
pub use history::{
    HistoryGroup, HistoryRow, format_date, format_date_on, group_by_date, group_by_date_on,
};
pub use speech::{SPEECH_LANG, SpeechSession};
pub use support::{SUPPORT_SENT, SupportForm};
