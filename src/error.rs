//! Error types for web-snapshot
//!
//! Errors are grouped by the stage that raises them. Only navigation and
//! capture/output errors ever end a capture; script and wait errors are
//! swallowed by the wait heuristics and turned into a conservative verdict.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for web-snapshot operations
#[derive(Error, Debug)]
pub enum Error {
    /// Browser-related errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Navigation errors
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Script evaluation errors
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Bounded waits that ran out of time
    #[error("Wait error: {0}")]
    Wait(#[from] WaitError),

    /// Capture errors (resize, raster, output files)
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Browser lifecycle errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("Invalid browser configuration: {0}")]
    ConfigError(String),

    /// Browser already closed
    #[error("Browser already closed")]
    AlreadyClosed,

    /// Releasing the browser engine failed
    #[error("Failed to release browser: {0}")]
    CleanupFailed(String),
}

/// Navigation errors
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Page did not become ready in time
    #[error("Navigation timed out after {0}ms")]
    Timeout(u64),

    /// Page load failed
    #[error("Page load failed: {0}")]
    LoadFailed(String),
}

/// Script evaluation errors
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The engine rejected or failed the script
    #[error("JavaScript execution failed: {0}")]
    EvaluationFailed(String),

    /// The script returned something of the wrong shape
    #[error("Unexpected script result: expected {expected}, got {actual}")]
    UnexpectedValue {
        /// What the caller asked for
        expected: &'static str,
        /// The value actually returned
        actual: String,
    },
}

/// Bounded waits that expired
#[derive(Error, Debug)]
pub enum WaitError {
    /// A polled condition never became true
    #[error("Condition not met within {timeout_ms}ms: {condition}")]
    ConditionTimeout {
        /// Short name of the condition
        condition: String,
        /// Bound that expired
        timeout_ms: u64,
    },

    /// Images were still loading when the bound expired
    #[error("Images still loading after {0}ms")]
    ImagesTimeout(u64),
}

/// Capture errors
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Viewport resize failed
    #[error("Viewport resize failed: {0}")]
    ResizeFailed(String),

    /// Screenshot failed
    #[error("Screenshot capture failed: {0}")]
    ScreenshotFailed(String),

    /// Screenshot payload could not be decoded
    #[error("Screenshot decode failed: {0}")]
    DecodeFailed(String),

    /// Output file could not be written
    #[error("Failed to write {path}: {reason}")]
    WriteFailed {
        /// Target path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },
}

/// Result type alias for web-snapshot operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }

    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }

    /// Whether this error is one of the distinguishable timeout kinds
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Navigation(NavigationError::Timeout(_))
                | Error::Wait(WaitError::ConditionTimeout { .. })
                | Error::Wait(WaitError::ImagesTimeout(_))
        )
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}
