//! Transient on-screen notifications
//!
//! A notification is shown top-right and removes itself after
//! [`DISMISS_AFTER`]. The center keeps them with the instant they were
//! shown; callers prune with the current instant (pure, so testable without
//! sleeping).

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How long a notification stays on screen
pub const DISMISS_AFTER: Duration = Duration::from_millis(3000);

/// Visual style of a notification (the alert-* class)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Success,
    Info,
    Warning,
    Danger,
}

impl NotificationKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationKind::Success => "alert-success",
            NotificationKind::Info => "alert-info",
            NotificationKind::Warning => "alert-warning",
            NotificationKind::Danger => "alert-danger",
        }
    }
}

/// A message for the notification surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Danger,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Info,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Danger
    }
}

/// Notifications currently on screen
#[derive(Debug, Default)]
pub struct NotificationCenter {
    shown: Vec<(Notification, Instant)>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification as of `now`
    pub fn push(&mut self, notification: Notification, now: Instant) {
        self.shown.push((notification, now));
    }

    /// Drop every notification older than [`DISMISS_AFTER`]; returns how many
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.shown.len();
        self.shown
            .retain(|(_, shown_at)| now.saturating_duration_since(*shown_at) < DISMISS_AFTER);
        before - self.shown.len()
    }

    /// Manual dismissal (the close button)
    pub fn dismiss(&mut self, index: usize) -> Option<Notification> {
        (index < self.shown.len()).then(|| self.shown.remove(index).0)
    }

    /// Visible notifications, oldest first
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.shown.iter().map(|(n, _)| n)
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}
