//! Scripted in-memory browser session shared by the integration tests.
//!
//! Each page probe from `web_snapshot::scripts` is answered from a
//! `PageState`; every call is recorded so tests can assert what the
//! orchestrator did.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use web_snapshot::browser::capture::PNG_SIGNATURE;
use web_snapshot::browser::BrowserSession;
use web_snapshot::error::{BrowserError, CaptureError, NavigationError, Result, ScriptError};
use web_snapshot::scripts;

/// Which probe a script is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Height,
    Scroll,
    Images,
    Ajax,
    Mutations,
    Metrics,
    PageInfo,
    Other,
}

impl Probe {
    pub fn classify(script: &str) -> Self {
        if script == scripts::SCROLL_HEIGHT {
            Probe::Height
        } else if script.starts_with("window.scrollTo") {
            Probe::Scroll
        } else if script == scripts::IMAGES_COMPLETE {
            Probe::Images
        } else if script == scripts::AJAX_IDLE {
            Probe::Ajax
        } else if script.contains("MutationObserver") {
            Probe::Mutations
        } else if script == scripts::DOM_METRICS {
            Probe::Metrics
        } else if script == scripts::PAGE_INFO {
            Probe::PageInfo
        } else {
            Probe::Other
        }
    }
}

/// How the page's scroll height evolves across readings
#[derive(Debug, Clone)]
pub enum Heights {
    /// Readings in order; the last one repeats forever
    Sequence(Vec<u64>),
    /// Grows by `step` on every reading
    Growing { start: u64, step: u64 },
}

#[derive(Debug)]
pub struct PageState {
    pub heights: Heights,
    pub height_reads: usize,
    pub navigation_hangs: bool,
    pub images_complete: bool,
    pub ajax_idle: bool,
    pub mutations: u64,
    pub failing: Vec<Probe>,
    pub capture_fails: bool,
    pub metrics: Value,

    pub navigations: Vec<String>,
    pub scrolls: Vec<String>,
    pub resizes: Vec<(u32, u32)>,
    pub captures: usize,
    pub closed: bool,
}

impl PageState {
    /// A page that never changes: fixed height, no requests, no mutations
    pub fn static_page(height: u64) -> Self {
        Self {
            heights: Heights::Sequence(vec![height]),
            height_reads: 0,
            navigation_hangs: false,
            images_complete: true,
            ajax_idle: true,
            mutations: 0,
            failing: Vec::new(),
            capture_fails: false,
            metrics: metrics(1280, height),
            navigations: Vec::new(),
            scrolls: Vec::new(),
            resizes: Vec::new(),
            captures: 0,
            closed: false,
        }
    }

    pub fn with_heights(mut self, heights: Heights) -> Self {
        self.heights = heights;
        self
    }

    pub fn failing(mut self, probe: Probe) -> Self {
        self.failing.push(probe);
        self
    }

    fn next_height(&mut self) -> u64 {
        let index = self.height_reads;
        self.height_reads += 1;
        match &self.heights {
            Heights::Sequence(values) => values
                .get(index)
                .or_else(|| values.last())
                .copied()
                .unwrap_or(0),
            Heights::Growing { start, step } => start + step * index as u64,
        }
    }
}

/// DOM metrics where the root scroll size is the largest
pub fn metrics(width: u32, height: u64) -> Value {
    json!({
        "bodyScrollWidth": width - 15, "bodyOffsetWidth": width - 15, "bodyClientWidth": width - 15,
        "rootScrollWidth": width, "rootOffsetWidth": width - 15, "rootClientWidth": width - 15,
        "bodyScrollHeight": height - 16, "bodyOffsetHeight": height - 16, "bodyClientHeight": height - 16,
        "rootScrollHeight": height, "rootOffsetHeight": height - 16, "rootClientHeight": 1080
    })
}

/// Minimal bytes that pass as a PNG
pub fn fake_png() -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(b"\0\0\0\rIHDR");
    bytes
}

#[derive(Clone)]
pub struct ScriptedSession {
    state: Arc<Mutex<PageState>>,
}

impl ScriptedSession {
    pub fn new(state: PageState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Inspect the recorded state
    pub fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&self, url: &str, ready_timeout: Duration) -> Result<()> {
        let hangs = {
            let mut state = self.state();
            if state.closed {
                return Err(BrowserError::AlreadyClosed.into());
            }
            state.navigations.push(url.to_string());
            state.navigation_hangs
        };
        if hangs {
            tokio::time::sleep(ready_timeout).await;
            return Err(NavigationError::Timeout(ready_timeout.as_millis() as u64).into());
        }
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        let probe = Probe::classify(script);
        let value = {
            let mut state = self.state();
            if state.closed {
                return Err(BrowserError::AlreadyClosed.into());
            }
            if state.failing.contains(&probe) {
                return Err(ScriptError::EvaluationFailed(format!("{:?} probe failed", probe)).into());
            }
            match probe {
                Probe::Height => json!(state.next_height()),
                Probe::Scroll => {
                    state.scrolls.push(script.to_string());
                    Value::Null
                }
                Probe::Images => json!(state.images_complete),
                Probe::Ajax => json!(state.ajax_idle),
                Probe::Mutations => json!(state.mutations),
                Probe::Metrics => state.metrics.clone(),
                Probe::PageInfo => json!({
                    "title": "Scripted Page",
                    "url": state.navigations.last().cloned().unwrap_or_default(),
                    "userAgent": "ScriptedSession/1.0"
                }),
                Probe::Other => Value::Null,
            }
        };

        if probe == Probe::Mutations {
            // The real observer resolves after its window.
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        Ok(value)
    }

    async fn resize_viewport(&self, width: u32, height: u32) -> Result<()> {
        self.state().resizes.push((width, height));
        Ok(())
    }

    async fn capture_full_page(&self) -> Result<Vec<u8>> {
        let mut state = self.state();
        if state.capture_fails {
            return Err(CaptureError::ScreenshotFailed("renderer crashed".to_string()).into());
        }
        state.captures += 1;
        Ok(fake_png())
    }

    async fn close(&mut self) -> Result<()> {
        let mut state = self.state();
        if state.closed {
            return Err(BrowserError::AlreadyClosed.into());
        }
        state.closed = true;
        Ok(())
    }
}
