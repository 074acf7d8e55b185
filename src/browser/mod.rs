//! Browser automation module
//!
//! The [`BrowserSession`] capability interface and its ChromiumOxide-backed
//! implementation: lifecycle, navigation, viewport sizing and raster capture.

pub mod capture;
pub mod controller;
pub mod navigation;
pub mod session;

pub use capture::PageCapture;
pub use controller::{BrowserConfig, ChromeSession};
pub use navigation::{PageNavigator, UrlValidator};
pub use session::BrowserSession;
