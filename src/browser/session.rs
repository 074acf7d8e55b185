//! Browser-engine capability interface
//!
//! Everything the capture flow needs from a browser engine goes through
//! [`BrowserSession`]. The Chrome implementation lives in
//! [`super::controller`]; tests substitute a scripted session.

use crate::error::{Result, ScriptError, WaitError};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

/// A connection to a running browser engine with one active page.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate the page and wait until the root content element exists.
    async fn navigate(&self, url: &str, ready_timeout: Duration) -> Result<()>;

    /// Evaluate a script in the page, awaiting promises, returning its value.
    async fn evaluate(&self, script: &str) -> Result<Value>;

    /// Resize the virtual viewport.
    async fn resize_viewport(&self, width: u32, height: u32) -> Result<()>;

    /// Capture the whole rendered document as PNG bytes.
    async fn capture_full_page(&self) -> Result<Vec<u8>>;

    /// Release the engine connection. Further calls fail.
    async fn close(&mut self) -> Result<()>;

    /// Poll a boolean script until it returns true or `timeout` elapses.
    async fn wait_for(&self, condition: &str, timeout: Duration, poll: Duration) -> Result<()> {
        let start = Instant::now();
        loop {
            if self.evaluate_bool(condition).await? {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(WaitError::ConditionTimeout {
                    condition: summarize(condition),
                    timeout_ms: timeout.as_millis() as u64,
                }
                .into());
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Evaluate a script expected to return a non-negative number.
    async fn evaluate_u64(&self, script: &str) -> Result<u64> {
        let value = self.evaluate(script).await?;
        value_as_u64(&value)
    }

    /// Evaluate a script expected to return a boolean. `null` counts as false.
    async fn evaluate_bool(&self, script: &str) -> Result<bool> {
        match self.evaluate(script).await? {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(ScriptError::UnexpectedValue {
                expected: "boolean",
                actual: other.to_string(),
            }
            .into()),
        }
    }
}

/// Interpret a script result as a whole number, rounding fractional pixels up.
pub fn value_as_u64(value: &Value) -> Result<u64> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 => Ok(f.ceil() as u64),
        _ => Err(ScriptError::UnexpectedValue {
            expected: "non-negative number",
            actual: value.to_string(),
        }
        .into()),
    }
}

fn summarize(script: &str) -> String {
    let flat = script.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.len() > 60 {
        let cut = (0..=60).rev().find(|i| flat.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &flat[..cut])
    } else {
        flat
    }
}
