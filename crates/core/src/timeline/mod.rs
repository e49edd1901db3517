/// Monotonic millisecond clock driving the frame loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    now_ms: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn advance(&mut self, delta_ms: u64) -> u64 {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        self.now_ms
    }

    /// Moves the clock to `now_ms`; earlier timestamps are ignored.
    pub fn observe(&mut self, now_ms: u64) -> u64 {
        self.now_ms = self.now_ms.max(now_ms);
        self.now_ms
    }
}

/// Fires when strictly more than `interval_ms` has passed since it last fired.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    last_ms: u64,
}

impl IntervalTimer {
    pub fn new(start_ms: u64) -> Self {
        Self { last_ms: start_ms }
    }

    #[cfg(test)]
    pub(crate) fn last_ms(&self) -> u64 {
        self.last_ms
    }

    pub fn ready(&mut self, now_ms: u64, interval_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_ms) > interval_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }

    pub fn restart(&mut self, now_ms: u64) {
        self.last_ms = now_ms;
    }
}
