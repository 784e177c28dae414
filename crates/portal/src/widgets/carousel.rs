//! Home-page image carousel

use std::time::Duration;

/// Time between automatic slide changes
pub const CAROUSEL_INTERVAL: Duration = Duration::from_millis(5000);

/// Minimum horizontal swipe (px) that counts as a slide change
const SWIPE_DISTANCE: f64 = 40.0;

/// Slide index of a wrapping, auto-advancing, touch-enabled carousel
#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    index: usize,
    since_change: Duration,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            since_change: Duration::ZERO,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Next slide, wrapping to the first
    pub fn advance(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.since_change = Duration::ZERO;
    }

    /// Previous slide, wrapping to the last
    pub fn back(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.since_change = Duration::ZERO;
    }

    /// Let `elapsed` pass; advances once per full interval.
    /// Returns how many slides were advanced.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        self.since_change += elapsed;
        let mut advanced = 0;
        while self.since_change >= CAROUSEL_INTERVAL {
            let rest = self.since_change - CAROUSEL_INTERVAL;
            self.advance();
            self.since_change = rest;
            advanced += 1;
        }
        advanced
    }

    /// Horizontal swipe of `dx` px; left goes forward
    pub fn swipe(&mut self, dx: f64) {
        if dx <= -SWIPE_DISTANCE {
            self.advance();
        } else if dx >= SWIPE_DISTANCE {
            self.back();
        }
    }
}
