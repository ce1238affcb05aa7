//! `setTimeout`-backed timer for the loading-stage schedule and the
//! staggered restart guidance.

use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use coach_core::ports::TimerPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTimer;

impl BrowserTimer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl TimerPort for BrowserTimer {
    async fn sleep(&self, ms: u64) {
        // Dropping the future clears the pending timeout
        TimeoutFuture::new(u32::try_from(ms).unwrap_or(u32::MAX)).await;
    }
}
