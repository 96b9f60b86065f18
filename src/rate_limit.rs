//! Rate limiting for NCBI API compliance
//!
//! NCBI E-utilities allow 3 requests per second without an API key and
//! 10 requests per second with one; violations can result in IP blocking.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

/// Token bucket rate limiter shared between clones of a client
#[derive(Clone)]
pub struct RateLimiter {
    bucket: Arc<Mutex<TokenBucket>>,
}

struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_rate: f64, // tokens per second
    last_refill: Instant,
}

impl TokenBucket {
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }
}

impl RateLimiter {
    /// Create a new rate limiter with the given rate in requests per second
    pub fn new(rate: f64) -> Self {
        let capacity = rate.max(1.0);
        Self {
            bucket: Arc::new(Mutex::new(TokenBucket {
                tokens: capacity,
                capacity,
                refill_rate: rate,
                last_refill: Instant::now(),
            })),
        }
    }

    /// Rate limiter for NCBI access without an API key (3 req/s)
    pub fn ncbi_default() -> Self {
        Self::new(3.0)
    }

    /// Rate limiter for NCBI access with an API key (10 req/s)
    pub fn ncbi_with_key() -> Self {
        Self::new(10.0)
    }

    /// Acquire a token, sleeping until one becomes available
    pub async fn acquire(&self) -> crate::Result<()> {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().unwrap();
                bucket.refill();
                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    debug!(remaining_tokens = bucket.tokens, "Token acquired");
                    None
                } else {
                    // Time until the next whole token is refilled
                    let deficit = 1.0 - bucket.tokens;
                    Some(Duration::from_secs_f64(deficit / bucket.refill_rate))
                }
            };

            match wait {
                None => return Ok(()),
                Some(duration) => {
                    debug!(wait_ms = duration.as_millis() as u64, "Waiting for rate limit");
                    sleep(duration).await;
                }
            }
        }
    }

    /// Check whether a token is available without consuming one
    pub fn check_available(&self) -> bool {
        let mut bucket = self.bucket.lock().unwrap();
        bucket.refill();
        bucket.tokens >= 1.0
    }

    /// Current token count (testing and monitoring)
    pub fn token_count(&self) -> f64 {
        let mut bucket = self.bucket.lock().unwrap();
        bucket.refill();
        bucket.tokens
    }

    /// Configured rate limit in requests per second
    pub fn rate(&self) -> f64 {
        self.bucket.lock().unwrap().refill_rate
    }
}
