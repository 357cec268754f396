//! Page capture: the rendered-side collaborator.
//!
//! Loads a URL in headless Chromium (Playwright via Node.js), dismisses
//! cookie/consent popups, and emits one [`crate::types::PageRecord`] per
//! element with its computed CSS values.
//!
//! # Module Structure
//!
//! - [`capturer`] - Capture session management with concurrency control
//! - [`script`] - The Playwright script and availability checks

mod capturer;
mod script;

pub use capturer::{
    CaptureOptions, PageCapturer, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_NETWORK_IDLE_TIMEOUT,
    DEFAULT_PROCESS_TIMEOUT,
};
