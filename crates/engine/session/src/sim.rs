//! In-memory XR platform
//!
//! Implements the platform traits without a browser. Every call is recorded
//! in a shared [`CallLog`] so tests and the `xr-sim` tool can check exactly
//! what the controller asked the platform to do. All futures resolve on
//! first poll.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;

use crate::mode::{ReferenceSpaceType, SessionInit, SessionMode};
use crate::platform::{PlatformAvailability, RendererBinding, ToggleView, XrPlatform, XrSession};
use crate::toggle::ToggleControl;
use crate::{XrError, XrResult};

/// A platform call observed by the simulator
#[derive(Debug, Clone, PartialEq)]
pub enum SimCall {
    IsSessionSupported(SessionMode),
    RequestSession { mode: SessionMode, init: SessionInit },
    EndSession(u32),
    SetXrEnabled(bool),
    SetReferenceSpace(ReferenceSpaceType),
    SetSession(Option<u32>),
    PrepareSurface(u32),
}

/// Shared, append-only record of platform calls
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<SimCall>>>);

impl CallLog {
    fn push(&self, call: SimCall) {
        tracing::trace!("sim: {:?}", call);
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<SimCall> {
        self.0.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&SimCall) -> bool) -> usize {
        self.0.borrow().iter().filter(|call| predicate(call)).count()
    }

    /// Number of session requests issued
    pub fn session_requests(&self) -> usize {
        self.count(|call| matches!(call, SimCall::RequestSession { .. }))
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// How the simulated platform answers
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimBehavior {
    /// Whether the XR API exists at all
    pub xr_available: bool,
    /// Whether the page counts as served securely
    pub secure_context: bool,
    /// Modes reported as supported
    pub supported_modes: Vec<SessionMode>,
    /// Reject every session request (permission denied)
    pub reject_requests: bool,
    /// Reject the support query itself
    pub fail_support_query: bool,
}

impl Default for SimBehavior {
    fn default() -> Self {
        Self {
            xr_available: true,
            secure_context: true,
            supported_modes: vec![
                SessionMode::ImmersiveVr,
                SessionMode::ImmersiveAr,
                SessionMode::Inline,
            ],
            reject_requests: false,
            fail_support_query: false,
        }
    }
}

impl SimBehavior {
    /// Platform without XR support for anything but `inline`
    pub fn inline_only() -> Self {
        Self {
            supported_modes: vec![SessionMode::Inline],
            ..Self::default()
        }
    }

    /// Insecure page: the XR API is hidden
    pub fn insecure() -> Self {
        Self {
            xr_available: false,
            secure_context: false,
            ..Self::default()
        }
    }
}

// ============================================================================
// Platform
// ============================================================================

/// Simulated `navigator.xr`
pub struct SimPlatform {
    behavior: RefCell<SimBehavior>,
    log: CallLog,
    next_id: Cell<u32>,
    sessions: RefCell<Vec<SimSession>>,
}

impl SimPlatform {
    pub fn new(behavior: SimBehavior) -> Self {
        Self {
            behavior: RefCell::new(behavior),
            log: CallLog::default(),
            next_id: Cell::new(1),
            sessions: RefCell::new(Vec::new()),
        }
    }

    /// Handle to the call log shared with sessions and bindings
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn update_behavior(&self, f: impl FnOnce(&mut SimBehavior)) {
        f(&mut self.behavior.borrow_mut());
    }

    /// Every session ever granted, oldest first
    pub fn sessions(&self) -> Vec<SimSession> {
        self.sessions.borrow().clone()
    }

    pub fn last_session(&self) -> Option<SimSession> {
        self.sessions.borrow().last().cloned()
    }
}

impl XrPlatform for SimPlatform {
    type Session = SimSession;

    fn availability(&self) -> PlatformAvailability {
        let behavior = self.behavior.borrow();
        if behavior.xr_available {
            PlatformAvailability::Available
        } else {
            PlatformAvailability::Missing {
                secure_context: behavior.secure_context,
            }
        }
    }

    fn is_session_supported(&self, mode: SessionMode) -> LocalBoxFuture<'_, XrResult<bool>> {
        self.log.push(SimCall::IsSessionSupported(mode));
        let behavior = self.behavior.borrow();
        let result = if behavior.fail_support_query {
            Err(XrError::Platform("support query rejected".to_string()))
        } else {
            Ok(behavior.supported_modes.contains(&mode))
        };
        future::ready(result).boxed_local()
    }

    fn request_session(
        &self,
        mode: SessionMode,
        init: SessionInit,
    ) -> LocalBoxFuture<'_, XrResult<SimSession>> {
        self.log.push(SimCall::RequestSession { mode, init });
        let behavior = self.behavior.borrow();

        let result = if behavior.reject_requests {
            Err(XrError::RequestRejected("permission denied".to_string()))
        } else if !behavior.supported_modes.contains(&mode) {
            Err(XrError::Unsupported(mode))
        } else {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            let session = SimSession::new(id, mode, self.log.clone());
            self.sessions.borrow_mut().push(session.clone());
            Ok(session)
        };
        future::ready(result).boxed_local()
    }
}

// ============================================================================
// Session
// ============================================================================

struct SimSessionInner {
    ended: Cell<bool>,
    listeners: RefCell<Vec<Box<dyn FnMut()>>>,
    /// Queue end notifications instead of dispatching them
    hold_events: Cell<bool>,
    held: RefCell<Vec<Box<dyn FnMut()>>>,
}

/// Simulated XR session handle
#[derive(Clone)]
pub struct SimSession {
    id: u32,
    mode: SessionMode,
    log: CallLog,
    inner: Rc<SimSessionInner>,
}

impl SimSession {
    fn new(id: u32, mode: SessionMode, log: CallLog) -> Self {
        Self {
            id,
            mode,
            log,
            inner: Rc::new(SimSessionInner {
                ended: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
                hold_events: Cell::new(false),
                held: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn is_ended(&self) -> bool {
        self.inner.ended.get()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// End the session from the platform side (device lost, system UI, ...)
    ///
    /// Returns false if it had already ended.
    pub fn terminate(&self) -> bool {
        if self.inner.ended.replace(true) {
            return false;
        }
        // Listeners fire once; take them so none can observe a borrow
        let listeners = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        if self.inner.hold_events.get() {
            self.inner.held.borrow_mut().extend(listeners);
        } else {
            for mut listener in listeners {
                listener();
            }
        }
        true
    }

    /// Queue the end notification until [`release_end_events`](Self::release_end_events)
    ///
    /// Models an event loop that delivers `end` late.
    pub fn hold_end_events(&self) {
        self.inner.hold_events.set(true);
    }

    /// Dispatch queued end notifications; returns how many fired
    pub fn release_end_events(&self) -> usize {
        self.inner.hold_events.set(false);
        let held = std::mem::take(&mut *self.inner.held.borrow_mut());
        let count = held.len();
        for mut listener in held {
            listener();
        }
        count
    }
}

impl fmt::Debug for SimSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimSession")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("ended", &self.is_ended())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl XrSession for SimSession {
    fn end(&self) -> LocalBoxFuture<'static, XrResult<()>> {
        self.log.push(SimCall::EndSession(self.id));
        let session = self.clone();
        async move {
            if session.terminate() {
                Ok(())
            } else {
                Err(XrError::EndFailed(format!("session {} already ended", session.id)))
            }
        }
        .boxed_local()
    }

    fn on_end(&self, listener: Box<dyn FnMut()>) {
        self.inner.listeners.borrow_mut().push(listener);
    }
}

// ============================================================================
// Renderer binding
// ============================================================================

/// Simulated renderer XR hooks
#[derive(Debug)]
pub struct SimBinding {
    log: CallLog,
    xr_enabled: bool,
    reference_space: Option<ReferenceSpaceType>,
    session: Option<u32>,
    fail_surface: bool,
}

impl SimBinding {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            xr_enabled: false,
            reference_space: None,
            session: None,
            fail_surface: false,
        }
    }

    /// Make every surface preparation fail
    pub fn with_surface_failure(mut self) -> Self {
        self.fail_surface = true;
        self
    }

    pub fn xr_enabled(&self) -> bool {
        self.xr_enabled
    }

    pub fn reference_space(&self) -> Option<ReferenceSpaceType> {
        self.reference_space
    }

    /// Id of the bound session
    pub fn session(&self) -> Option<u32> {
        self.session
    }
}

impl RendererBinding for SimBinding {
    type Session = SimSession;

    fn set_xr_enabled(&mut self, enabled: bool) {
        self.log.push(SimCall::SetXrEnabled(enabled));
        self.xr_enabled = enabled;
    }

    fn set_reference_space_type(&mut self, space: ReferenceSpaceType) {
        self.log.push(SimCall::SetReferenceSpace(space));
        self.reference_space = Some(space);
    }

    fn set_session(&mut self, session: Option<&SimSession>) {
        let id = session.map(SimSession::id);
        self.log.push(SimCall::SetSession(id));
        self.session = id;
    }

    fn prepare_surface(&self, session: &SimSession) -> LocalBoxFuture<'static, XrResult<()>> {
        self.log.push(SimCall::PrepareSurface(session.id));
        let result = if self.fail_surface {
            Err(XrError::SurfaceSetup("context lost".to_string()))
        } else {
            Ok(())
        };
        future::ready(result).boxed_local()
    }
}

// ============================================================================
// Toggle view
// ============================================================================

#[derive(Debug, Default)]
struct SimViewState {
    attached: bool,
    history: Vec<String>,
}

/// Records what a toggle button would have displayed
#[derive(Debug, Clone, Default)]
pub struct SimView {
    inner: Rc<RefCell<SimViewState>>,
}

impl SimView {
    pub fn is_attached(&self) -> bool {
        self.inner.borrow().attached
    }

    /// Current label
    pub fn label(&self) -> Option<String> {
        self.inner.borrow().history.last().cloned()
    }

    /// Every label shown, in order
    pub fn history(&self) -> Vec<String> {
        self.inner.borrow().history.clone()
    }
}

impl ToggleView for SimView {
    fn attach(&mut self, control: &ToggleControl) {
        let mut inner = self.inner.borrow_mut();
        inner.attached = true;
        inner.history.push(control.label().to_string());
    }

    fn update(&mut self, control: &ToggleControl) {
        self.inner
            .borrow_mut()
            .history
            .push(control.label().to_string());
    }
}
