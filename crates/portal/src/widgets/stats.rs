//! Animated statistics counters on the home page

use std::time::{Duration, Instant};

/// Length of the count-up animation
pub const COUNT_DURATION: Duration = Duration::from_millis(2000);

/// Fraction of the counter that must be on screen to start it
pub const VISIBILITY_THRESHOLD: f64 = 0.5;

/// Counter value `elapsed` into the animation
pub fn counter_value(elapsed: Duration, target: u64) -> u64 {
    let progress = (elapsed.as_secs_f64() / COUNT_DURATION.as_secs_f64()).min(1.0);
    (progress * target as f64).floor() as u64
}

/// Render with comma thousands separators (e.g. 12,500)
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// One `.stat-number` element
///
/// Starts counting the first time it becomes visible enough and never
/// restarts afterwards.
#[derive(Debug, Clone, Copy)]
pub struct StatCounter {
    target: u64,
    started: Option<Instant>,
}

impl StatCounter {
    pub fn new(target: u64) -> Self {
        Self {
            target,
            started: None,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }

    /// Visibility changed to `ratio` (0.0 to 1.0) at `now`.
    /// Returns true when this call started the animation.
    pub fn on_visible(&mut self, ratio: f64, now: Instant) -> bool {
        if self.started.is_some() || ratio < VISIBILITY_THRESHOLD {
            return false;
        }
        self.started = Some(now);
        true
    }

    pub fn value_at(&self, now: Instant) -> u64 {
        match self.started {
            Some(start) => counter_value(now.saturating_duration_since(start), self.target),
            None => 0,
        }
    }

    pub fn text_at(&self, now: Instant) -> String {
        format_thousands(self.value_at(now))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|start| now.saturating_duration_since(start) >= COUNT_DURATION)
    }
}
