use typed_builder::TypedBuilder;

use slicesim_core::bucket::Tick;

pub const MAX_CONNECTION_ATTEMPTS: u32 = 5;

/// Paces the connection attempts of a node. A failed attempt pushes the next one back by
/// <code>attempts * backoff_unit</code> ticks, and once the counter reaches the maximum the
/// node stops trying until it is reset from outside.
#[derive(Clone, Copy, Debug, PartialEq, TypedBuilder)]
pub struct RetryPacer {
    #[builder(default = MAX_CONNECTION_ATTEMPTS)]
    max_attempts: u32,
    #[builder(default = Tick(1))]
    backoff_unit: Tick,
    #[builder(default)]
    attempts: u32,
    #[builder(default)]
    eligible_at: Tick,
}

impl Default for RetryPacer {
    fn default() -> Self {
        RetryPacer::builder().build()
    }
}

impl RetryPacer {
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn eligible_at(&self) -> Tick {
        self.eligible_at
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    pub fn is_eligible(&self, now: Tick) -> bool {
        !self.is_exhausted() && now >= self.eligible_at
    }

    /// Counts a new attempt and returns its number.
    pub fn register_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    pub fn register_success(&mut self) {
        self.attempts = 0;
        self.eligible_at = Tick::default();
    }

    pub fn register_failure(&mut self, now: Tick) {
        if !self.is_exhausted() {
            let delay = self
                .backoff_unit
                .as_u64()
                .saturating_mul(u64::from(self.attempts));
            self.eligible_at = Tick(now.as_u64().saturating_add(delay));
        }
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
        self.eligible_at = Tick::default();
    }
}
