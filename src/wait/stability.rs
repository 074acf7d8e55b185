//! Page stability checks
//!
//! Both checks are advisory. An evaluation error inside either one reports
//! "not stable" so the orchestrator falls back to an extra fixed wait rather
//! than capturing early.

use crate::browser::BrowserSession;
use crate::config::WaitConfig;
use crate::error::Result;
use crate::scripts;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Combined output of the stability checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StabilityVerdict {
    /// Scroll height stopped changing between two consecutive polls
    pub content_stable: bool,
    /// No pending requests and no mutations in the observation window
    pub dynamic_content_settled: bool,
}

impl StabilityVerdict {
    /// Both checks passed
    pub fn is_settled(&self) -> bool {
        self.content_stable && self.dynamic_content_settled
    }
}

/// Decide the extra sleep before measuring the page.
///
/// A configured `fixed` wait always applies. Otherwise a settled page gets
/// none and an unsettled one gets `default`.
pub fn fallback_wait(
    fixed: Option<Duration>,
    verdict: StabilityVerdict,
    default: Duration,
) -> Option<Duration> {
    match fixed {
        Some(wait) => Some(wait),
        None if verdict.is_settled() => None,
        None => Some(default),
    }
}

/// Polls page metrics to decide when the page has stopped changing
pub struct StabilityDetector<'a> {
    config: &'a WaitConfig,
}

impl<'a> StabilityDetector<'a> {
    /// Create a detector using the given timings
    pub fn new(config: &'a WaitConfig) -> Self {
        Self { config }
    }

    /// Poll the scroll height until two consecutive readings match.
    ///
    /// Returns true after the settle pause, or false once the timeout
    /// elapses or a reading fails.
    #[instrument(skip_all)]
    pub async fn wait_for_content_stable<S: BrowserSession + ?Sized>(&self, session: &S) -> bool {
        info!("Waiting for content to stabilize");

        let start = Instant::now();
        let mut last_height: Option<u64> = None;

        while start.elapsed() < self.config.height_timeout {
            let current = match session.evaluate_u64(scripts::SCROLL_HEIGHT).await {
                Ok(height) => height,
                Err(e) => {
                    warn!("Height check failed, treating content as unstable: {}", e);
                    return false;
                }
            };

            if last_height == Some(current) {
                debug!("Height stable at {}", current);
                tokio::time::sleep(self.config.height_settle).await;
                return true;
            }

            last_height = Some(current);
            tokio::time::sleep(self.config.height_poll_interval).await;
        }

        info!(
            "Content height still changing after {}ms",
            self.config.height_timeout.as_millis()
        );
        false
    }

    /// Wait for request activity to drain, then watch for DOM mutations.
    ///
    /// Settled only if the page went idle in time and nothing mutated during
    /// the observation window.
    #[instrument(skip_all)]
    pub async fn wait_for_dynamic_content<S: BrowserSession + ?Sized>(&self, session: &S) -> bool {
        info!("Checking for dynamic content loading");

        match self.dynamic_content_settled(session).await {
            Ok(settled) => settled,
            Err(e) => {
                debug!("Error checking dynamic content: {}", e);
                false
            }
        }
    }

    async fn dynamic_content_settled<S: BrowserSession + ?Sized>(&self, session: &S) -> Result<bool> {
        session
            .wait_for(
                scripts::AJAX_IDLE,
                self.config.ajax_timeout,
                self.config.condition_poll_interval,
            )
            .await?;

        let window_ms = self.config.mutation_window.as_millis() as u64;
        let changes = session
            .evaluate_u64(&scripts::mutation_count(window_ms))
            .await?;

        if changes == 0 {
            info!("No DOM changes detected, content appears stable");
            Ok(true)
        } else {
            debug!("{} DOM mutations in {}ms window", changes, window_ms);
            Ok(false)
        }
    }
}
