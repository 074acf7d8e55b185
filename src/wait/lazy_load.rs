//! Progressive scrolling to mount lazy-loaded content
//!
//! A pass scrolls through the page in equal fractions of its current height,
//! then to the bottom, and re-reads the height. Passes repeat until one
//! leaves the height unchanged or the pass budget runs out. Neither outcome,
//! nor a script error, fails the capture.

use crate::browser::BrowserSession;
use crate::config::WaitConfig;
use crate::error::Result;
use crate::scripts;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// How the scroll loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LazyLoadStatus {
    /// A pass left the scroll height unchanged
    Settled,
    /// The pass budget ran out while the page was still growing
    BudgetExhausted,
    /// A script error stopped the loop
    Aborted,
}

/// Result of a lazy-load run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyLoadOutcome {
    /// Completed scroll passes
    pub passes: u32,
    /// Last scroll height read, if any
    pub final_height: Option<u64>,
    /// How the loop ended
    pub status: LazyLoadStatus,
}

impl LazyLoadOutcome {
    /// Whether the page stopped growing within the budget
    pub fn is_settled(&self) -> bool {
        self.status == LazyLoadStatus::Settled
    }
}

/// Drives progressive scroll passes through a [`BrowserSession`]
pub struct LazyLoadTrigger<'a> {
    config: &'a WaitConfig,
}

impl<'a> LazyLoadTrigger<'a> {
    /// Create a trigger using the given timings
    pub fn new(config: &'a WaitConfig) -> Self {
        Self { config }
    }

    /// Run passes until the height stops changing, then scroll back to the top
    #[instrument(skip_all)]
    pub async fn run<S: BrowserSession + ?Sized>(&self, session: &S) -> LazyLoadOutcome {
        info!("Starting progressive scroll to trigger lazy loading");

        let mut passes = 0;
        let mut height = None;
        let status = match self.scroll_until_stable(session, &mut passes, &mut height).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Progressive scroll aborted after {} passes: {}", passes, e);
                LazyLoadStatus::Aborted
            }
        };

        if status == LazyLoadStatus::BudgetExhausted {
            warn!(
                "Page still growing after {} scroll passes; continuing with partially loaded content",
                passes
            );
        }

        if let Err(e) = session.evaluate(scripts::SCROLL_TO_TOP).await {
            debug!("Failed to scroll back to top: {}", e);
        }

        info!("Completed progressive scroll: {} passes ({:?})", passes, status);
        LazyLoadOutcome {
            passes,
            final_height: height,
            status,
        }
    }

    async fn scroll_until_stable<S: BrowserSession + ?Sized>(
        &self,
        session: &S,
        passes: &mut u32,
        height: &mut Option<u64>,
    ) -> Result<LazyLoadStatus> {
        let mut last_height = session.evaluate_u64(scripts::SCROLL_HEIGHT).await?;
        *height = Some(last_height);

        loop {
            self.scroll_pass(session).await?;
            *passes += 1;

            let new_height = session.evaluate_u64(scripts::SCROLL_HEIGHT).await?;
            *height = Some(new_height);
            debug!("Scroll pass {}: height {} -> {}", passes, last_height, new_height);

            if new_height == last_height {
                return Ok(LazyLoadStatus::Settled);
            }
            if *passes >= self.config.max_scroll_passes {
                return Ok(LazyLoadStatus::BudgetExhausted);
            }
            last_height = new_height;
        }
    }

    async fn scroll_pass<S: BrowserSession + ?Sized>(&self, session: &S) -> Result<()> {
        let steps = self.config.scroll_steps.max(1);
        for i in 1..steps {
            let fraction = f64::from(i) / f64::from(steps);
            session.evaluate(&scripts::scroll_to_fraction(fraction)).await?;
            tokio::time::sleep(self.config.scroll_step_pause).await;
        }

        session.evaluate(scripts::SCROLL_TO_BOTTOM).await?;
        tokio::time::sleep(self.config.scroll_bottom_pause).await;
        Ok(())
    }
}
