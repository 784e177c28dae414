//! The page a controller is mounted on

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use super::Notification;

/// Browser-side effects a controller can request
///
/// Controllers never talk to a window directly. The desk app implements this
/// for a terminal; tests implement it with a recorder.
pub trait PageSurface: Send + Sync {
    /// Blocking yes/no confirmation dialog
    fn confirm(&self, message: &str) -> bool;

    /// Show a transient notification
    fn notify(&self, notification: Notification);

    /// Navigate to another page route
    fn navigate(&self, route: &str);

    /// Reload the current page (full state resync)
    fn reload(&self);
}

/// What a [`RecordingSurface`] was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Confirm(String),
    Notify(Notification),
    Navigate(String),
    Reload,
}

/// Surface that answers confirmations with a fixed reply and records
/// everything it is asked to do
#[derive(Debug)]
pub struct RecordingSurface {
    answer: AtomicBool,
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    /// Surface answering every confirmation with `answer`
    pub fn new(answer: bool) -> Self {
        Self {
            answer: AtomicBool::new(answer),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Change the reply to future confirmations
    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Notifications shown so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Confirmation prompts shown so far
    pub fn confirmations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Confirm(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: SurfaceEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl PageSurface for RecordingSurface {
    fn confirm(&self, message: &str) -> bool {
        self.push(SurfaceEvent::Confirm(message.to_string()));
        self.answer.load(Ordering::SeqCst)
    }

    fn notify(&self, notification: Notification) {
        self.push(SurfaceEvent::Notify(notification));
    }

    fn navigate(&self, route: &str) {
        self.push(SurfaceEvent::Navigate(route.to_string()));
    }

    fn reload(&self) {
        self.push(SurfaceEvent::Reload);
    }
}
