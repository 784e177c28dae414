//! Terminal implementation of the page surface

use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use portal::{Notification, NotificationCenter, NotificationKind, PageSurface};

/// Prints notifications, asks confirmations on stdin and opens routes in
/// the system browser
pub struct TerminalSurface {
    base_url: String,
    assume_yes: bool,
    notifications: Mutex<NotificationCenter>,
    reload_requested: AtomicBool,
}

impl TerminalSurface {
    pub fn new(base_url: impl Into<String>, assume_yes: bool) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            assume_yes,
            notifications: Mutex::new(NotificationCenter::new()),
            reload_requested: AtomicBool::new(false),
        }
    }

    /// Whether a reload was asked for since the last call
    pub fn take_reload(&self) -> bool {
        self.reload_requested.swap(false, Ordering::SeqCst)
    }

    /// Notifications still on screen
    pub fn visible(&self) -> Vec<Notification> {
        let mut center = self
            .notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        center.prune(Instant::now());
        center.visible().cloned().collect()
    }
}

fn prefix(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "ok",
        NotificationKind::Info => "info",
        NotificationKind::Warning => "warn",
        NotificationKind::Danger => "error",
    }
}

impl PageSurface for TerminalSurface {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            println!("{} [y/N] y", message);
            return true;
        }

        print!("{} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    fn notify(&self, notification: Notification) {
        println!("[{}] {}", prefix(notification.kind), notification.message);
        let mut center = self
            .notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        center.prune(now);
        center.push(notification, now);
    }

    fn navigate(&self, route: &str) {
        let url = format!("{}{}", self.base_url, route);
        info!("Opening {}", url);
        if let Err(e) = open::that(&url) {
            warn!("Failed to open browser: {}", e);
            println!("Open {} in your browser", url);
        }
    }

    fn reload(&self) {
        self.reload_requested.store(true, Ordering::SeqCst);
    }
}
