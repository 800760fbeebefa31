//! Platform abstractions
//!
//! These traits are the boundary between the session lifecycle and whatever
//! provides XR: the browser (wasm backend) or the in-memory simulator.
//! Futures are `!Send`; everything runs on the page's single thread.

use futures::future::LocalBoxFuture;

use crate::mode::{ReferenceSpaceType, SessionInit, SessionMode};
use crate::toggle::ToggleControl;
use crate::XrResult;

/// Whether the XR entry point exists at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformAvailability {
    Available,
    /// No XR API; `secure_context` tells whether the page was served securely
    Missing { secure_context: bool },
}

/// The platform's XR system (`navigator.xr` in a browser)
pub trait XrPlatform {
    /// Session handle produced by this platform
    type Session: XrSession + Clone + 'static;

    /// Check for the XR API without any asynchronous work
    fn availability(&self) -> PlatformAvailability;

    /// Ask whether `mode` can be requested
    fn is_session_supported(&self, mode: SessionMode) -> LocalBoxFuture<'_, XrResult<bool>>;

    /// Request a new session
    fn request_session(
        &self,
        mode: SessionMode,
        init: SessionInit,
    ) -> LocalBoxFuture<'_, XrResult<Self::Session>>;
}

/// An active XR session
pub trait XrSession {
    /// Ask the platform to end the session
    ///
    /// Resolving does not mean the session is gone; the `end` listener is the
    /// only signal for that.
    fn end(&self) -> LocalBoxFuture<'static, XrResult<()>>;

    /// Register a listener for the session's termination
    ///
    /// Fires once whether the user or the platform ended the session.
    fn on_end(&self, listener: Box<dyn FnMut()>);
}

/// The renderer's XR hooks
pub trait RendererBinding {
    type Session;

    /// Toggle the renderer's XR mode flag
    fn set_xr_enabled(&mut self, enabled: bool);

    fn set_reference_space_type(&mut self, space: ReferenceSpaceType);

    /// Attach (`Some`) or detach (`None`) the session the renderer presents to
    fn set_session(&mut self, session: Option<&Self::Session>);

    /// Make the output surface compatible with `session` and install it as
    /// the session's base layer
    fn prepare_surface(&self, session: &Self::Session) -> LocalBoxFuture<'static, XrResult<()>>;
}

/// UI presenting the toggle control
pub trait ToggleView {
    /// The control has been created and should become visible
    fn attach(&mut self, control: &ToggleControl);

    /// The control changed state
    fn update(&mut self, control: &ToggleControl);
}
