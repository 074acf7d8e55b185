//! Viewport sizing and full-page raster capture

use crate::error::{CaptureError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::Page;
use tracing::{debug, info, instrument};

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Page capture functionality
pub struct PageCapture;

impl PageCapture {
    /// Override the device metrics so the layout viewport is `width` x `height`
    #[instrument(skip(page))]
    pub async fn resize_viewport(page: &Page, width: u32, height: u32) -> Result<()> {
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(width as i64)
            .height(height as i64)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(CaptureError::ResizeFailed)?;

        page.execute(params)
            .await
            .map_err(|e| CaptureError::ResizeFailed(e.to_string()))?;

        debug!("Viewport resized to {}x{}", width, height);
        Ok(())
    }

    /// Capture the whole document as PNG
    #[instrument(skip(page))]
    pub async fn full_page_png(page: &Page) -> Result<Vec<u8>> {
        info!("Capturing full-page screenshot");

        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .from_surface(true)
            .capture_beyond_viewport(true)
            .build();

        let resp = page
            .execute(params)
            .await
            .map_err(|e| CaptureError::ScreenshotFailed(e.to_string()))?;

        let data_b64: &str = resp.data.as_ref();
        let data = decode_png(data_b64)?;

        debug!("Screenshot captured: {} bytes", data.len());
        Ok(data)
    }
}

/// Decode a base64 screenshot payload and check it is a PNG
pub fn decode_png(data_b64: &str) -> Result<Vec<u8>> {
    let data = BASE64
        .decode(data_b64.as_bytes())
        .map_err(|e| CaptureError::DecodeFailed(format!("base64 decode failed: {}", e)))?;

    if !data.starts_with(&PNG_SIGNATURE) {
        return Err(CaptureError::DecodeFailed("payload is not a PNG image".to_string()).into());
    }
    Ok(data)
}
