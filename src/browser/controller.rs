//! Browser lifecycle management
//!
//! This module launches Chromium, owns the single page a capture drives, and
//! releases the engine when the session is closed or dropped.

use super::capture::PageCapture;
use super::navigation::PageNavigator;
use super::session::BrowserSession;
use crate::error::{BrowserError, Result, ScriptError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// How long `close` waits for the CDP handler and engine process to exit
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Initial window width (default: 1920)
    pub width: u32,
    /// Initial window height (default: 1080)
    pub height: u32,
    /// Enable sandbox (default: true)
    pub sandbox: bool,
    /// CDP request timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
    /// Path to Chrome/Chromium executable (None = auto-detect)
    pub chrome_path: Option<String>,
    /// Additional Chrome arguments
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            width: 1920,
            height: 1080,
            sandbox: true,
            timeout_ms: 30000,
            chrome_path: None,
            extra_args: vec![
                "--disable-gpu".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ],
        }
    }
}

impl BrowserConfig {
    /// Create a new config builder
    pub fn builder() -> BrowserConfigBuilder {
        BrowserConfigBuilder::default()
    }
}

/// Builder for BrowserConfig
#[derive(Default)]
pub struct BrowserConfigBuilder {
    config: BrowserConfig,
}

impl BrowserConfigBuilder {
    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set initial window dimensions
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Enable/disable sandbox
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    /// Set CDP request timeout
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Set Chrome path
    pub fn chrome_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Add extra Chrome argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.config.extra_args.push(arg.into());
        self
    }

    /// Build the config
    pub fn build(self) -> BrowserConfig {
        self.config
    }
}

/// A launched Chromium with one page, implementing [`BrowserSession`]
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: Option<JoinHandle<()>>,
    config: BrowserConfig,
    closed: bool,
}

impl ChromeSession {
    /// Launch with default config
    #[instrument]
    pub async fn launch() -> Result<Self> {
        Self::with_config(BrowserConfig::default()).await
    }

    /// Launch with custom config
    #[instrument(skip(config))]
    pub async fn with_config(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser with config: headless={} sandbox={}",
            config.headless, config.sandbox
        );

        let mut builder = CdpBrowserConfig::builder()
            .window_size(config.width, config.height)
            .viewport(Viewport {
                width: config.width,
                height: config.height,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .request_timeout(Duration::from_millis(config.timeout_ms));

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        for arg in &config.extra_args {
            builder = builder.arg(arg);
        }

        let cdp_config = builder.build().map_err(BrowserError::ConfigError)?;

        let (mut browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    warn!("Browser handler event error");
                    break;
                }
            }
            debug!("Browser handler finished");
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // Don't leak the engine process when the first tab fails.
                let _ = browser.close().await;
                handler_task.abort();
                return Err(BrowserError::LaunchFailed(e.to_string()).into());
            }
        };

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            page,
            handler: Some(handler_task),
            config,
            closed: false,
        })
    }

    /// Get the browser configuration
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(BrowserError::AlreadyClosed.into());
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&self, url: &str, ready_timeout: Duration) -> Result<()> {
        self.ensure_open()?;
        PageNavigator::goto(&self.page, url, ready_timeout).await
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        self.ensure_open()?;
        let params = EvaluateParams::builder()
            .expression(script)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(ScriptError::EvaluationFailed)?;

        let result = self
            .page
            .evaluate(params)
            .await
            .map_err(|e| ScriptError::EvaluationFailed(e.to_string()))?;

        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn resize_viewport(&self, width: u32, height: u32) -> Result<()> {
        self.ensure_open()?;
        PageCapture::resize_viewport(&self.page, width, height).await
    }

    async fn capture_full_page(&self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        PageCapture::full_page_png(&self.page).await
    }

    #[instrument(skip(self))]
    async fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.closed = true;
        info!("Closing browser");

        let closed = self.browser.close().await;

        if let Some(handler) = self.handler.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, handler).await.is_err() {
                warn!("Browser handler did not stop in time");
            }
        }

        match tokio::time::timeout(SHUTDOWN_GRACE, self.browser.wait()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("Waiting for browser process failed: {}", e),
            Err(_) => warn!("Browser process did not exit in time"),
        }

        closed.map_err(|e| BrowserError::CleanupFailed(e.to_string()))?;
        info!("Browser closed");
        Ok(())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            debug!("Session dropped without close; aborting handler");
            handler.abort();
        }
    }
}
