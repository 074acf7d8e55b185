//! Image-load wait

use crate::browser::BrowserSession;
use crate::config::WaitConfig;
use crate::error::WaitError;
use crate::scripts;
use tracing::{info, instrument, warn};

/// Poll until every image reports complete, bounded by `image_timeout`.
///
/// Returns false on timeout or error; the capture goes ahead regardless.
#[instrument(skip_all)]
pub async fn wait_for_images<S: BrowserSession + ?Sized>(session: &S, config: &WaitConfig) -> bool {
    info!("Waiting for images to load");

    match session
        .wait_for(
            scripts::IMAGES_COMPLETE,
            config.image_timeout,
            config.condition_poll_interval,
        )
        .await
    {
        Ok(()) => true,
        Err(e) if e.is_timeout() => {
            let timeout_ms = config.image_timeout.as_millis() as u64;
            warn!("{}", WaitError::ImagesTimeout(timeout_ms));
            false
        }
        Err(e) => {
            warn!("Image load check failed: {}", e);
            false
        }
    }
}
