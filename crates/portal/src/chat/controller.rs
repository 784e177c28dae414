//! Chat page controller
//!
//! Sending is split in two so a front-end can run the request on a worker
//! thread: `begin_send` updates the pane and hands back the text to post,
//! `complete_send` applies whatever came back. While a request is pending
//! further sends are rejected.

use log::{debug, error, info, warn};
use std::sync::Arc;

use super::history::{HistoryGroup, group_by_date};
use super::speech::SpeechSession;
use crate::api::PortalApi;
use crate::error::RequestResult;
use crate::models::{ChatHistoryEntry, ChatMessage};
use crate::ui::{Notification, PageSurface};

/// Bot text shown when a chat request fails for any reason
pub const CHAT_APOLOGY: &str = "Sorry, there was an error processing your message.";

/// Whether a chat request is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// State of the chat page
pub struct ChatController {
    api: Arc<dyn PortalApi>,
    surface: Arc<dyn PageSurface>,
    state: ChatState,
    input: String,
    messages: Vec<ChatMessage>,
    typing: bool,
    speech: SpeechSession,
    history_open: bool,
    history: Vec<HistoryGroup>,
    quick_links_open: bool,
}

impl ChatController {
    pub fn new(api: Arc<dyn PortalApi>, surface: Arc<dyn PageSurface>) -> Self {
        Self {
            api,
            surface,
            state: ChatState::Idle,
            input: String::new(),
            messages: Vec::new(),
            typing: false,
            speech: SpeechSession::default(),
            history_open: false,
            history: Vec::new(),
            quick_links_open: false,
        }
    }

    /// Enable the microphone button when the front-end can recognise speech
    pub fn with_speech(mut self, supported: bool) -> Self {
        self.speech = SpeechSession::new(supported);
        self
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn typing_indicator(&self) -> bool {
        self.typing
    }

    pub fn speech(&self) -> &SpeechSession {
        &self.speech
    }

    /// Post the current input and wait for the reply.
    /// Returns false when nothing was sent.
    pub fn send(&mut self) -> bool {
        let Some(message) = self.begin_send() else {
            return false;
        };
        let result = self.api.send_chat(&message);
        self.complete_send(result);
        true
    }

    /// First half of a send: validate, append the user message, clear the
    /// input and show the typing indicator. Returns the text to post.
    pub fn begin_send(&mut self) -> Option<String> {
        let message = self.input.trim().to_string();
        if message.is_empty() {
            return None;
        }
        if self.state == ChatState::AwaitingResponse {
            debug!("Chat send ignored, a reply is still pending");
            return None;
        }

        self.messages.push(ChatMessage::user(message.clone()));
        self.input.clear();
        self.typing = true;
        self.state = ChatState::AwaitingResponse;
        Some(message)
    }

    /// Second half of a send: hide the indicator and show the reply, or
    /// the apology on failure
    pub fn complete_send(&mut self, result: RequestResult<String>) {
        self.typing = false;
        self.state = ChatState::Idle;
        match result {
            Ok(reply) => self.messages.push(ChatMessage::bot(reply)),
            Err(e) => {
                error!("Chat request failed: {}", e);
                self.messages.push(ChatMessage::bot(CHAT_APOLOGY));
            }
        }
    }

    /// Send one of the canned quick-link questions
    pub fn quick_query(&mut self, query: &str) -> bool {
        if query.is_empty() {
            return false;
        }
        self.input = query.to_string();
        self.quick_links_open = false;
        self.send()
    }

    pub fn open_quick_links(&mut self) {
        self.quick_links_open = true;
    }

    pub fn close_quick_links(&mut self) {
        self.quick_links_open = false;
    }

    pub fn quick_links_open(&self) -> bool {
        self.quick_links_open
    }

    /// Clear the pane; stored history stays on the server
    pub fn new_chat(&mut self) {
        self.messages.clear();
        self.surface.notify(Notification::info(
            "New chat started! Your chat history is still available.",
        ));
    }

    /// Press the microphone button
    pub fn start_speech(&mut self) -> bool {
        self.speech.start()
    }

    /// Final transcript from the recognizer: fill the input and send it
    pub fn speech_result(&mut self, transcript: &str) -> bool {
        match self.speech.on_result(transcript) {
            Some(text) => {
                self.input = text;
                self.send()
            }
            None => false,
        }
    }

    pub fn speech_error(&mut self, reason: &str) {
        self.speech.on_error(reason);
    }

    pub fn speech_end(&mut self) {
        self.speech.on_end();
    }

    /// Open the history sidebar and (re)load it
    pub fn open_history(&mut self) {
        self.history_open = true;
        self.load_history();
    }

    pub fn close_history(&mut self) {
        self.history_open = false;
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn history(&self) -> &[HistoryGroup] {
        &self.history
    }

    /// Fetch stored exchanges and regroup the sidebar
    pub fn load_history(&mut self) -> bool {
        match self.api.chat_history() {
            Ok(entries) => {
                debug!("Loaded {} chat history entries", entries.len());
                self.history = group_by_date(&entries);
                true
            }
            Err(e) => {
                warn!("Error loading chat history: {}", e);
                self.surface
                    .notify(Notification::danger(e.notice("Failed to load chat history")));
                false
            }
        }
    }

    /// Show a stored exchange in the pane (local only)
    pub fn replay(&mut self, entry: &ChatHistoryEntry) {
        self.messages.clear();
        self.messages.push(ChatMessage::user(entry.user_message.clone()));
        self.messages.push(ChatMessage::bot(entry.bot_response.clone()));
    }

    /// Delete all stored exchanges on the server
    pub fn clear_history(&mut self) -> bool {
        match self.api.clear_chat_history() {
            Ok(()) => {
                info!("Cleared chat history");
                self.history.clear();
                self.surface
                    .notify(Notification::success("Chat history cleared"));
                true
            }
            Err(e) => {
                error!("Failed to clear chat history: {}", e);
                self.surface
                    .notify(Notification::danger(e.notice("Failed to clear chat history")));
                false
            }
        }
    }
}
