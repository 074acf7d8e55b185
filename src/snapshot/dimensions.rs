//! Full-document size computation
//!
//! Engines disagree on which of the body/root size properties reflects the
//! real document, so every one is sampled and the maximum wins.

use serde::{Deserialize, Serialize};

/// Size properties sampled from `document.body` and `document.documentElement`
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)]
pub struct DomMetrics {
    pub body_scroll_width: f64,
    pub body_offset_width: f64,
    pub body_client_width: f64,
    pub root_scroll_width: f64,
    pub root_offset_width: f64,
    pub root_client_width: f64,
    pub body_scroll_height: f64,
    pub body_offset_height: f64,
    pub body_client_height: f64,
    pub root_scroll_height: f64,
    pub root_offset_height: f64,
    pub root_client_height: f64,
}

impl DomMetrics {
    /// All sampled widths
    pub fn widths(&self) -> [f64; 6] {
        [
            self.body_scroll_width,
            self.body_offset_width,
            self.body_client_width,
            self.root_scroll_width,
            self.root_offset_width,
            self.root_client_width,
        ]
    }

    /// All sampled heights
    pub fn heights(&self) -> [f64; 6] {
        [
            self.body_scroll_height,
            self.body_offset_height,
            self.body_client_height,
            self.root_scroll_height,
            self.root_offset_height,
            self.root_client_height,
        ]
    }
}

/// Width and height in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PageDimensions {
    /// Document size as the maximum of every sampled metric, rounded up
    pub fn from_metrics(metrics: &DomMetrics) -> Self {
        Self {
            width: max_ceil(&metrics.widths()),
            height: max_ceil(&metrics.heights()),
        }
    }

    /// These dimensions grown by `margin` on both axes
    pub fn with_margin(&self, margin: u32) -> Self {
        Self {
            width: self.width.saturating_add(margin),
            height: self.height.saturating_add(margin),
        }
    }
}

fn max_ceil(values: &[f64]) -> u32 {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    max.ceil().min(f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_metrics_from_script_result() {
        let value = json!({
            "bodyScrollWidth": 1920, "bodyOffsetWidth": 1920, "bodyClientWidth": 1905,
            "rootScrollWidth": 1920, "rootOffsetWidth": 1920, "rootClientWidth": 1920,
            "bodyScrollHeight": 5400, "bodyOffsetHeight": 5380, "bodyClientHeight": 5380,
            "rootScrollHeight": 5416, "rootOffsetHeight": 5400, "rootClientHeight": 1080
        });
        let metrics: DomMetrics = serde_json::from_value(value).unwrap();
        let dims = PageDimensions::from_metrics(&metrics);
        assert_eq!(dims, PageDimensions { width: 1920, height: 5416 });
    }

    #[test]
    fn test_missing_metrics_default_to_zero() {
        let metrics: DomMetrics = serde_json::from_value(json!({ "rootScrollHeight": 800 })).unwrap();
        let dims = PageDimensions::from_metrics(&metrics);
        assert_eq!(dims, PageDimensions { width: 0, height: 800 });
    }

    #[test]
    fn test_fractional_metrics_round_up() {
        let metrics = DomMetrics {
            body_scroll_width: 1023.4,
            root_client_height: 767.01,
            ..Default::default()
        };
        let dims = PageDimensions::from_metrics(&metrics);
        assert_eq!(dims, PageDimensions { width: 1024, height: 768 });
    }

    #[test]
    fn test_with_margin() {
        let dims = PageDimensions { width: 1200, height: 3000 };
        assert_eq!(dims.with_margin(100), PageDimensions { width: 1300, height: 3100 });
    }

    #[test]
    fn test_with_margin_saturates() {
        let dims = PageDimensions { width: u32::MAX, height: 1 };
        assert_eq!(dims.with_margin(100).width, u32::MAX);
    }
}
