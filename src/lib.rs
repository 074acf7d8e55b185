//! web-snapshot - full-page screenshots of dynamic web pages
//!
//! Drives a headless Chromium over CDP, waits until the page looks finished,
//! then captures the whole document as a PNG with a JSON metadata sidecar.
//!
//! # Architecture
//!
//! ```text
//! CLI ──▶ WebSnapshot ──▶ BrowserSession (ChromeSession / CDP)
//!              │
//!              ├─▶ LazyLoadTrigger     progressive scroll passes
//!              ├─▶ StabilityDetector   height polling, AJAX + mutation checks
//!              ├─▶ image wait
//!              └─▶ PageDimensions ──▶ resize ──▶ PNG + JSON
//! ```
//!
//! Every heuristic is advisory: when one cannot decide, the capture waits a
//! little longer instead of failing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use web_snapshot::{ChromeSession, SnapshotConfig, WebSnapshot};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = ChromeSession::launch().await?;
//!     let snapshot = WebSnapshot::new(session, SnapshotConfig::default());
//!
//!     let result = snapshot.capture_and_close("https://example.com").await?;
//!     println!("Saved {}", result.screenshot_path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod config;
pub mod error;
pub mod logging;
pub mod scripts;
pub mod snapshot;
pub mod wait;

// Re-exports for convenience
pub use browser::{BrowserConfig, BrowserSession, ChromeSession};
pub use config::{SnapshotConfig, WaitConfig};
pub use error::{Error, Result};
pub use snapshot::{CaptureResult, CaptureStage, WebSnapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
