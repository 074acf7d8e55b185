//! Sidecar JSON metadata written next to each screenshot

use super::dimensions::PageDimensions;
use crate::wait::{LazyLoadOutcome, StabilityVerdict};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Page facts reported by the engine; any field may be unavailable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Document title
    #[serde(default)]
    pub title: Option<String>,
    /// Final URL after redirects
    #[serde(default)]
    pub url: Option<String>,
    /// Browser user agent
    #[serde(default, alias = "userAgent")]
    pub user_agent: Option<String>,
}

/// Which waits ran and what they decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitReport {
    /// Progressive scroll outcome
    pub lazy_load: LazyLoadOutcome,
    /// Height stopped changing
    pub content_stable: bool,
    /// Every image finished loading in time
    pub images_loaded: bool,
    /// No pending requests and no mutations observed
    pub dynamic_content_settled: bool,
    /// Extra sleep applied before measuring, if any
    pub fallback_wait_ms: Option<u64>,
}

impl WaitReport {
    /// Assemble a report from the individual wait outcomes
    pub fn new(
        lazy_load: LazyLoadOutcome,
        verdict: StabilityVerdict,
        images_loaded: bool,
        fallback_wait: Option<Duration>,
    ) -> Self {
        Self {
            lazy_load,
            content_stable: verdict.content_stable,
            images_loaded,
            dynamic_content_settled: verdict.dynamic_content_settled,
            fallback_wait_ms: fallback_wait.map(|d| d.as_millis() as u64),
        }
    }

    /// The stability verdict this report recorded
    pub fn verdict(&self) -> StabilityVerdict {
        StabilityVerdict {
            content_stable: self.content_stable,
            dynamic_content_settled: self.dynamic_content_settled,
        }
    }
}

/// Contents of `snapshot_<timestamp>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Requested URL
    pub url: String,
    /// Filename timestamp
    pub timestamp: String,
    /// Capture time
    pub captured_at: DateTime<Local>,
    /// Computed document size
    pub dimensions: PageDimensions,
    /// Viewport used for the capture
    pub viewport: PageDimensions,
    /// Page facts
    pub metadata: PageInfo,
    /// Wait decisions
    pub wait: WaitReport,
}

impl SnapshotMetadata {
    /// Pretty-printed JSON bytes
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }
}
