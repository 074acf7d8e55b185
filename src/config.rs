//! Capture configuration
//!
//! [`SnapshotConfig`] is fixed for the lifetime of a [`crate::WebSnapshot`];
//! [`WaitConfig`] carries every bound and pause the wait heuristics use.

use std::path::PathBuf;
use std::time::Duration;

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "snapshotFile";

/// Timings and bounds for the wait heuristics
#[derive(Debug, Clone, PartialEq)]
pub struct WaitConfig {
    /// Bound on navigation plus the body-present probe (default: 10s)
    pub ready_timeout: Duration,
    /// Scroll steps per lazy-load pass; positions are `i/steps` for `i in 1..steps` (default: 10)
    pub scroll_steps: u32,
    /// Pause after each fractional scroll (default: 500ms)
    pub scroll_step_pause: Duration,
    /// Pause after the final scroll to the bottom of a pass (default: 2s)
    pub scroll_bottom_pause: Duration,
    /// Upper bound on lazy-load passes (default: 10)
    pub max_scroll_passes: u32,
    /// Interval between height readings (default: 1s)
    pub height_poll_interval: Duration,
    /// Bound on the height-stability check (default: 10s)
    pub height_timeout: Duration,
    /// Extra wait once the height is stable (default: 2s)
    pub height_settle: Duration,
    /// Bound on the image-load wait (default: 10s)
    pub image_timeout: Duration,
    /// Interval for polled boolean conditions (default: 500ms)
    pub condition_poll_interval: Duration,
    /// Bound on the AJAX-idle wait (default: 5s)
    pub ajax_timeout: Duration,
    /// Mutation observation window (default: 1s)
    pub mutation_window: Duration,
    /// Fallback sleep when the page did not settle and no fixed wait is set (default: 3s)
    pub default_fallback_wait: Duration,
    /// Pause between the viewport resize and the capture (default: 2s)
    pub resize_settle: Duration,
    /// Margin added to both document dimensions when resizing (default: 100)
    pub viewport_margin: u32,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(10),
            scroll_steps: 10,
            scroll_step_pause: Duration::from_millis(500),
            scroll_bottom_pause: Duration::from_secs(2),
            max_scroll_passes: 10,
            height_poll_interval: Duration::from_secs(1),
            height_timeout: Duration::from_secs(10),
            height_settle: Duration::from_secs(2),
            image_timeout: Duration::from_secs(10),
            condition_poll_interval: Duration::from_millis(500),
            ajax_timeout: Duration::from_secs(5),
            mutation_window: Duration::from_secs(1),
            default_fallback_wait: Duration::from_secs(3),
            resize_settle: Duration::from_secs(2),
            viewport_margin: 100,
        }
    }
}

/// Configuration for one snapshot invocation
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotConfig {
    /// Where screenshots and metadata are written
    pub output_dir: PathBuf,
    /// Explicit extra wait; when set it is always applied
    pub fixed_wait: Option<Duration>,
    /// Wait heuristic timings
    pub wait: WaitConfig,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            fixed_wait: None,
            wait: WaitConfig::default(),
        }
    }
}

impl SnapshotConfig {
    /// Create a new config builder
    pub fn builder() -> SnapshotConfigBuilder {
        SnapshotConfigBuilder::default()
    }
}

/// Builder for SnapshotConfig
#[derive(Default)]
pub struct SnapshotConfigBuilder {
    config: SnapshotConfig,
}

impl SnapshotConfigBuilder {
    /// Set the output directory
    pub fn output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set a fixed extra wait
    pub fn fixed_wait(mut self, wait: Duration) -> Self {
        self.config.fixed_wait = Some(wait);
        self
    }

    /// Set a fixed extra wait in whole seconds
    pub fn fixed_wait_secs(self, secs: u64) -> Self {
        self.fixed_wait(Duration::from_secs(secs))
    }

    /// Bound the number of lazy-load passes
    pub fn max_scroll_passes(mut self, passes: u32) -> Self {
        self.config.wait.max_scroll_passes = passes.max(1);
        self
    }

    /// Replace all wait timings
    pub fn wait(mut self, wait: WaitConfig) -> Self {
        self.config.wait = wait;
        self
    }

    /// Build the config
    pub fn build(self) -> SnapshotConfig {
        self.config
    }
}
