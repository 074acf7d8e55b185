//! Wait-until-stable heuristics
//!
//! Each heuristic polls the page through a [`crate::browser::BrowserSession`]
//! and degrades to a conservative answer instead of failing.

pub mod images;
pub mod lazy_load;
pub mod stability;

pub use images::wait_for_images;
pub use lazy_load::{LazyLoadOutcome, LazyLoadStatus, LazyLoadTrigger};
pub use stability::{fallback_wait, StabilityDetector, StabilityVerdict};
