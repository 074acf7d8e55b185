//! Capture orchestration
//!
//! [`WebSnapshot`] owns one [`BrowserSession`] and runs the capture stages
//! strictly in order:
//!
//! ```text
//! navigate ─▶ lazy-load scroll ─▶ height stability ─▶ images ─▶ dynamic content
//!                                                                     │
//!   output files ◀─ raster capture ◀─ resize ◀─ measure ◀─ fallback wait?
//! ```
//!
//! Heuristic stages never fail. Navigation, measurement, resize, capture and
//! output failures end the invocation with an error; nothing is retried.

pub mod dimensions;
pub mod metadata;
pub mod output;

pub use dimensions::{DomMetrics, PageDimensions};
pub use metadata::{PageInfo, SnapshotMetadata, WaitReport};
pub use output::{OutputWriter, SnapshotPaths};

use crate::browser::BrowserSession;
use crate::config::SnapshotConfig;
use crate::error::{BrowserError, Error, Result};
use crate::scripts;
use crate::wait::{fallback_wait, wait_for_images, LazyLoadTrigger, StabilityDetector, StabilityVerdict};
use chrono::Local;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument, warn};

/// The stage a capture has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStage {
    /// Loading the URL
    Navigate,
    /// Progressive scrolling
    LazyLoad,
    /// Height stability polling
    ContentStability,
    /// Image-load polling
    Images,
    /// AJAX and mutation checks
    DynamicContent,
    /// Optional extra sleep
    FallbackWait,
    /// Sampling document size
    Measure,
    /// Resizing the viewport
    Resize,
    /// Raster capture
    Capture,
    /// Writing files
    Output,
}

impl fmt::Display for CaptureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaptureStage::Navigate => "navigate",
            CaptureStage::LazyLoad => "lazy_load",
            CaptureStage::ContentStability => "content_stability",
            CaptureStage::Images => "images",
            CaptureStage::DynamicContent => "dynamic_content",
            CaptureStage::FallbackWait => "fallback_wait",
            CaptureStage::Measure => "measure",
            CaptureStage::Resize => "resize",
            CaptureStage::Capture => "capture",
            CaptureStage::Output => "output",
        };
        f.write_str(name)
    }
}

/// A completed capture
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Written PNG
    pub screenshot_path: PathBuf,
    /// Written JSON metadata
    pub metadata_path: PathBuf,
    /// Computed document size
    pub dimensions: PageDimensions,
    /// Wait decisions taken
    pub report: WaitReport,
}

/// Captures full-page snapshots through an owned browser session
pub struct WebSnapshot<S: BrowserSession> {
    session: S,
    config: SnapshotConfig,
}

impl<S: BrowserSession> WebSnapshot<S> {
    /// Take ownership of `session` for the lifetime of this snapshotter
    pub fn new(session: S, config: SnapshotConfig) -> Self {
        Self { session, config }
    }

    /// Capture `url` to a timestamped PNG plus JSON metadata.
    ///
    /// Failures are logged with the stage reached and returned.
    #[instrument(skip(self))]
    pub async fn capture_screenshot(&self, url: &str) -> Result<CaptureResult> {
        info!("Starting screenshot capture for URL: {}", url);

        let mut stage = CaptureStage::Navigate;
        match self.run_stages(url, &mut stage).await {
            Ok(result) => {
                info!(
                    "Screenshot and JSON data saved successfully: {}",
                    result.screenshot_path.display()
                );
                Ok(result)
            }
            Err(e) => {
                if stage == CaptureStage::Navigate && e.is_timeout() {
                    error!(%url, %stage, "Timeout while loading URL: {}", e);
                } else {
                    error!(%url, %stage, "Error capturing screenshot: {}", e);
                }
                Err(e)
            }
        }
    }

    async fn run_stages(&self, url: &str, stage: &mut CaptureStage) -> Result<CaptureResult> {
        let wait = &self.config.wait;

        self.session.navigate(url, wait.ready_timeout).await?;

        *stage = CaptureStage::LazyLoad;
        let lazy_load = LazyLoadTrigger::new(wait).run(&self.session).await;

        let detector = StabilityDetector::new(wait);
        *stage = CaptureStage::ContentStability;
        let content_stable = detector.wait_for_content_stable(&self.session).await;

        *stage = CaptureStage::Images;
        let images_loaded = wait_for_images(&self.session, wait).await;

        *stage = CaptureStage::DynamicContent;
        let dynamic_content_settled = detector.wait_for_dynamic_content(&self.session).await;

        let verdict = StabilityVerdict {
            content_stable,
            dynamic_content_settled,
        };

        *stage = CaptureStage::FallbackWait;
        let extra = fallback_wait(self.config.fixed_wait, verdict, wait.default_fallback_wait);
        match extra {
            Some(duration) => {
                info!(
                    "Waiting additional {:.1} seconds for content to stabilize",
                    duration.as_secs_f64()
                );
                tokio::time::sleep(duration).await;
            }
            None => debug!("Page settled; skipping fallback wait"),
        }

        *stage = CaptureStage::Measure;
        let metrics: DomMetrics =
            serde_json::from_value(self.session.evaluate(scripts::DOM_METRICS).await?)?;
        let dimensions = PageDimensions::from_metrics(&metrics);
        let viewport = dimensions.with_margin(wait.viewport_margin);
        debug!(
            "Document {}x{}, viewport {}x{}",
            dimensions.width, dimensions.height, viewport.width, viewport.height
        );

        *stage = CaptureStage::Resize;
        self.session
            .resize_viewport(viewport.width, viewport.height)
            .await?;
        tokio::time::sleep(wait.resize_settle).await;

        *stage = CaptureStage::Capture;
        let captured_at = Local::now();
        let png = self.session.capture_full_page().await?;
        let page_info = self.page_info().await;

        *stage = CaptureStage::Output;
        let report = WaitReport::new(lazy_load, verdict, images_loaded, extra);
        let metadata = SnapshotMetadata {
            url: url.to_string(),
            timestamp: output::timestamp(&captured_at),
            captured_at,
            dimensions,
            viewport,
            metadata: page_info,
            wait: report.clone(),
        };
        let paths = OutputWriter::new(self.config.output_dir.clone())
            .write(&png, &metadata)
            .await?;

        Ok(CaptureResult {
            screenshot_path: paths.screenshot,
            metadata_path: paths.metadata,
            dimensions,
            report,
        })
    }

    async fn page_info(&self) -> PageInfo {
        let info = match self.session.evaluate(scripts::PAGE_INFO).await {
            Ok(value) => serde_json::from_value::<PageInfo>(value).map_err(Error::from),
            Err(e) => Err(e),
        };
        info.unwrap_or_else(|e| {
            debug!("Page info unavailable: {}", e);
            PageInfo::default()
        })
    }

    /// Release the browser session
    pub async fn close(mut self) -> Result<()> {
        match self.session.close().await {
            Ok(()) => {
                info!("Browser session closed successfully");
                Ok(())
            }
            Err(e @ Error::Browser(BrowserError::CleanupFailed(_))) => Err(e),
            Err(e) => Err(BrowserError::CleanupFailed(e.to_string()).into()),
        }
    }

    /// Capture `url`, then release the session whatever the outcome.
    ///
    /// A release failure is logged; the capture result is returned as is.
    pub async fn capture_and_close(self, url: &str) -> Result<CaptureResult> {
        let result = self.capture_screenshot(url).await;
        if let Err(e) = self.close().await {
            warn!("{}", e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(CaptureStage::Navigate.to_string(), "navigate");
        assert_eq!(CaptureStage::ContentStability.to_string(), "content_stability");
        assert_eq!(CaptureStage::Output.to_string(), "output");
    }
}
