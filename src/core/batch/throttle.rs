//! Start-rate throttle for dispatched requests

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use tracing::debug;

/// Token bucket bounding how many items may start per second.
///
/// A throttle built without a rate lets every item start immediately.
pub struct StartThrottle {
    limiter: Option<DefaultDirectRateLimiter>,
}

impl StartThrottle {
    pub fn new(requests_per_second: Option<u32>, burst: Option<u32>) -> Self {
        let limiter = requests_per_second.and_then(NonZeroU32::new).map(|rate| {
            let burst = burst.and_then(NonZeroU32::new).unwrap_or(NonZeroU32::MIN);
            debug!(rate = rate.get(), burst = burst.get(), "Start throttle enabled");
            RateLimiter::direct(Quota::per_second(rate).allow_burst(burst))
        });
        Self { limiter }
    }

    pub fn is_limited(&self) -> bool {
        self.limiter.is_some()
    }

    /// Wait until one more item may start
    pub async fn until_ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for StartThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartThrottle")
            .field("limited", &self.is_limited())
            .finish()
    }
}
