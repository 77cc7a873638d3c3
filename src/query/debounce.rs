//! Debounced filter input.
//!
//! Raw keystrokes are pushed with their arrival time. A value is released
//! only after the input has been quiet for the whole window, and only if it
//! differs from the last released value.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
    last_emitted: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_emitted: None,
        }
    }

    /// Start from a known current value so re-typing it is not an update.
    pub fn with_current(window: Duration, current: T) -> Self {
        Self {
            window,
            pending: None,
            last_emitted: Some(current),
        }
    }

    /// Replace the baseline after the value changed from elsewhere.
    pub fn set_current(&mut self, current: T) {
        self.last_emitted = Some(current);
    }

    /// Record a keystroke. Restarts the quiet window.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// When the pending value becomes releasable, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending value if its window has elapsed.
    ///
    /// Returns `None` while still inside the window, and also when the
    /// settled value equals the previously released one.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(&self.pending, Some((_, at)) if *at <= now);
        if !ready {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if self.last_emitted.as_ref() == Some(&value) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }
}
