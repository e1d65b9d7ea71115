//! Call gate and backoff wrapper
//!
//! The provider enforces global rate limits, so all outgoing calls share
//! one [`CallGate`]: a minimum inter-call spacing behind a single mutex.
//! [`GatedClient`] layers exponential backoff on rate-limit responses,
//! bounded by a maximum attempt count. Both are injectable values owned
//! by whoever assembles the client stack, not module globals.

use crate::client::{ChatRequest, ChatResponse, LlmClient};
use crate::error::LlmError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::warn;

/// Fixed-interval gate shared by all calls against one provider
#[derive(Debug)]
pub struct CallGate {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl CallGate {
    /// Create a gate with the given minimum inter-call spacing
    #[inline]
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait until the next call is allowed, then claim the slot
    ///
    /// The lock is held across the sleep so concurrent pipelines queue up
    /// and each departs exactly one interval after the previous one.
    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let earliest = prev + self.min_interval;
            if Instant::now() < earliest {
                sleep_until(earliest).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Client wrapper applying the gate and rate-limit backoff
pub struct GatedClient<C> {
    inner: C,
    gate: Arc<CallGate>,
    max_attempts: u32,
    base_backoff: Duration,
}

impl<C> GatedClient<C> {
    /// Wrap a client with a shared gate
    ///
    /// Defaults: 3 attempts, 1s base backoff (doubled per attempt).
    #[inline]
    #[must_use]
    pub fn new(inner: C, gate: Arc<CallGate>) -> Self {
        Self {
            inner,
            gate,
            max_attempts: 3,
            base_backoff: Duration::from_secs(1),
        }
    }

    /// With a maximum attempt count (minimum 1)
    #[inline]
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// With a base backoff duration
    #[inline]
    #[must_use]
    pub fn with_base_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self
    }
}

#[async_trait]
impl<C: LlmClient> LlmClient for GatedClient<C> {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let mut attempt = 0u32;
        loop {
            self.gate.acquire().await;

            match self.inner.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_rate_limited() && attempt + 1 < self.max_attempts => {
                    let delay = match err {
                        LlmError::RateLimited {
                            retry_after_ms: Some(ms),
                        } => Duration::from_millis(ms),
                        _ => self.base_backoff * 2u32.pow(attempt),
                    };
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "provider rate limited, backing off"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
