//! Speech-to-text session state behind the microphone button

use log::error;

/// Recognition language
pub const SPEECH_LANG: &str = "en-US";

/// A single-shot recognition session
///
/// The recognizer itself lives in the front-end; this tracks whether the
/// button is shown and whether it is currently listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechSession {
    supported: bool,
    active: bool,
}

impl SpeechSession {
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            active: false,
        }
    }

    /// Whether the microphone button is shown at all
    pub fn button_visible(&self) -> bool {
        self.supported
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn lang(&self) -> &'static str {
        SPEECH_LANG
    }

    /// Start listening. Returns false when recognition is unavailable or a
    /// session is already running.
    pub fn start(&mut self) -> bool {
        if !self.supported || self.active {
            return false;
        }
        self.active = true;
        true
    }

    /// Final transcript arrived; the session is over. Returns the text to
    /// put in the input box.
    pub fn on_result(&mut self, transcript: &str) -> Option<String> {
        if !self.active {
            return None;
        }
        self.active = false;
        Some(transcript.to_string())
    }

    pub fn on_error(&mut self, reason: &str) {
        error!("Speech recognition error: {}", reason);
        self.active = false;
    }

    pub fn on_end(&mut self) {
        self.active = false;
    }
}

impl Default for SpeechSession {
    fn default() -> Self {
        Self::new(false)
    }
}
