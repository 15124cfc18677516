//! Pacing between sequential batch generation calls.
//!
//! Upstream generation services rate limit aggressively; the batch loop
//! pauses before every call after the first. The strategy is behind a
//! trait so it can be swapped (fixed interval today, token bucket when a
//! quota is known) without touching orchestration logic.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default pause between batch generation calls.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(2_000);

/// Pacing strategy for sequential generation calls.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Pause as needed before the next call. `completed_calls` is the
    /// number of calls already issued in this run.
    async fn pause(&self, completed_calls: usize);
}

// ---------------------------------------------------------------------------
// FixedInterval
// ---------------------------------------------------------------------------

/// Fixed delay before every call after the first.
#[derive(Debug, Clone)]
pub struct FixedInterval {
    delay: Duration,
}

impl FixedInterval {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedInterval {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_DELAY)
    }
}

#[async_trait]
impl Pacer for FixedInterval {
    async fn pause(&self, completed_calls: usize) {
        if completed_calls > 0 {
            tokio::time::sleep(self.delay).await;
        }
    }
}

// ---------------------------------------------------------------------------
// TokenBucket
// ---------------------------------------------------------------------------

/// Token bucket: up to `capacity` calls may burst, then calls wait for
/// the refill interval.
pub struct TokenBucket {
    capacity: u32,
    refill_every: Duration,
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(capacity: u32, refill_every: Duration) -> Self {
        Self {
            capacity,
            refill_every,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }
}

#[async_trait]
impl Pacer for TokenBucket {
    async fn pause(&self, _completed_calls: usize) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let elapsed = state.last_refill.elapsed();
                if elapsed >= self.refill_every {
                    let refills = (elapsed.as_nanos() / self.refill_every.as_nanos()) as u32;
                    state.tokens = (state.tokens + refills).min(self.capacity);
                    state.last_refill += self.refill_every * refills;
                }
                if state.tokens > 0 {
                    state.tokens -= 1;
                    return;
                }
                self.refill_every.saturating_sub(state.last_refill.elapsed())
            };
            tokio::time::sleep(wait).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
