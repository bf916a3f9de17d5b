use std::time::{Duration, Instant};

/// Holds a finished value back until a deadline, for the loading effect
/// between pressing "Calculate" and showing the result.
#[derive(Debug, Clone)]
pub struct DelayedReveal<T> {
    pending: Option<(T, Instant)>,
}

impl<T> Default for DelayedReveal<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> DelayedReveal<T> {
    /// Starts (or restarts) the delay; any value still pending is discarded.
    pub fn start(&mut self, value: T, now: Instant, delay: Duration) {
        self.pending = Some((value, now + delay));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, reveal_at)| reveal_at.saturating_duration_since(now))
    }

    /// Hands out the value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(&self.pending, Some((_, reveal_at)) if now >= *reveal_at);
        if !ready {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }
}
