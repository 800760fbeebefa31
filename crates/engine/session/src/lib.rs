//! XR session lifecycle for the xrdemo demos
//!
//! This crate owns the part of the demos with an actual state machine:
//! - Asking the platform whether an immersive mode is supported
//! - Exposing a single toggle control once it is
//! - Requesting and ending sessions from that control
//! - Binding the active session to the renderer
//!
//! # Architecture
//!
//! Everything the browser provides is behind the traits in [`platform`].
//! The wasm backend implements them with `web-sys`; [`sim`] implements them
//! in memory so the whole lifecycle can be driven from native tests and the
//! `xr-sim` tool.
//!
//! All platform calls are single-threaded futures. The controller never
//! holds a borrow of its own state across an `.await`, so the session's
//! termination listener may fire while a click is still in flight.
//!
//! # Example
//!
//! ```rust,ignore
//! use xrdemo_session::{SessionConfig, SessionController};
//!
//! let controller = SessionController::new(platform, binding, SessionConfig::ar());
//! controller.set_view(Box::new(button));
//! if controller.initialize().await.is_supported() {
//!     // wire the button's click to `controller.click()`
//! }
//! ```

pub mod config;
pub mod controller;
pub mod mode;
pub mod platform;
pub mod sim;
pub mod toggle;

pub use config::{ButtonLabels, SessionConfig};
pub use controller::{Availability, SessionController, WeakSessionController};
pub use mode::{ReferenceSpaceType, SessionFeature, SessionInit, SessionMode};
pub use platform::{PlatformAvailability, RendererBinding, ToggleView, XrPlatform, XrSession};
pub use toggle::{ClickHandler, ToggleControl, ToggleState};

/// Errors reported by XR platform calls
///
/// None of these are fatal. The controller logs them and stays usable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XrError {
    #[error("WebXR API not available (secure context: {secure_context})")]
    Unavailable { secure_context: bool },

    #[error("{0} mode not supported")]
    Unsupported(SessionMode),

    #[error("session request rejected: {0}")]
    RequestRejected(String),

    #[error("failed to prepare XR rendering surface: {0}")]
    SurfaceSetup(String),

    #[error("failed to end session: {0}")]
    EndFailed(String),

    #[error("platform error: {0}")]
    Platform(String),
}

/// Result type for XR platform calls
pub type XrResult<T> = std::result::Result<T, XrError>;
