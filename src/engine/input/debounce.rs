// Trailing-edge debounce for bursty external notifications

use std::time::{Duration, Instant};

/// Coalesces notification codes arriving at arbitrary real-world cadence into
/// at most one effective code per quiet window.
///
/// Each `notify` replaces whatever was staged before it (last write wins).
/// `poll` releases the staged code only once the window has elapsed without a
/// newer notification, mirroring a trailing-edge timer debounce. Time is passed
/// in by the caller so the policy is deterministic under test.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    staged: Option<(u8, Instant)>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            staged: None,
        }
    }

    /// Stage a notification code. Any previously staged code is discarded and
    /// the quiet window restarts.
    pub fn notify(&mut self, code: u8, now: Instant) {
        self.staged = Some((code, now));
    }

    /// Release the staged code if the quiet window has fully elapsed since the
    /// last notification. Returns at most one code per staged burst.
    pub fn poll(&mut self, now: Instant) -> Option<u8> {
        match self.staged {
            Some((code, at)) if now.duration_since(at) >= self.quiet => {
                self.staged = None;
                Some(code)
            }
            _ => None,
        }
    }

    /// Whether a notification is staged and waiting out its window.
    pub fn is_pending(&self) -> bool {
        self.staged.is_some()
    }
}
