//! XR session controller
//!
//! Owns the toggle control, the current session and the renderer binding.
//! The lifecycle is a linear pipeline that short-circuits on failure:
//!
//! ```text
//! support query → control created
//! click (idle)   → request → pending + end listener → [surface] → bind → Active
//! click (active) → end request ............ end listener → unbind → Idle
//! ```
//!
//! State is only touched in short synchronous sections between awaits.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::mode::SessionMode;
use crate::platform::{PlatformAvailability, RendererBinding, ToggleView, XrPlatform, XrSession};
use crate::toggle::{ClickHandler, ToggleControl, ToggleState};
use crate::XrError;

/// Outcome of [`SessionController::initialize`]
#[derive(Debug, Clone, PartialEq)]
pub enum Availability {
    /// The mode is supported and the toggle control exists
    Supported,
    /// The platform answered that the mode is unsupported
    Unsupported,
    /// No XR API on this platform
    Unavailable { secure_context: bool },
    /// The support query itself failed
    QueryFailed(XrError),
}

impl Availability {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported)
    }
}

struct State<S> {
    availability: Option<Availability>,
    control: Option<ToggleControl>,
    /// Bound session; set exactly while the control is active
    session: Option<S>,
    /// Granted session still being prepared
    pending: Option<S>,
    /// Bumped for every new session so stale end notifications are ignored
    session_serial: u64,
    /// A request or end call is outstanding
    busy: bool,
    view: Option<Box<dyn ToggleView>>,
    on_started: Option<Box<dyn FnMut()>>,
}

struct Shared<P: XrPlatform, B> {
    platform: P,
    binding: RefCell<B>,
    config: SessionConfig,
    state: RefCell<State<P::Session>>,
}

/// Drives the XR session lifecycle for one demo instance
///
/// Cloning is cheap and yields a handle to the same controller.
pub struct SessionController<P: XrPlatform, B> {
    shared: Rc<Shared<P, B>>,
}

impl<P: XrPlatform, B> Clone for SessionController<P, B> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

/// Non-owning handle to a [`SessionController`]
///
/// For callbacks owned by the controller's own view or session.
pub struct WeakSessionController<P: XrPlatform, B> {
    shared: Weak<Shared<P, B>>,
}

impl<P: XrPlatform, B> Clone for WeakSessionController<P, B> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<P: XrPlatform, B> WeakSessionController<P, B> {
    pub fn upgrade(&self) -> Option<SessionController<P, B>> {
        self.shared.upgrade().map(|shared| SessionController { shared })
    }
}

impl<P, B> SessionController<P, B>
where
    P: XrPlatform + 'static,
    B: RendererBinding<Session = P::Session> + 'static,
{
    pub fn new(platform: P, binding: B, config: SessionConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                platform,
                binding: RefCell::new(binding),
                config,
                state: RefCell::new(State {
                    availability: None,
                    control: None,
                    session: None,
                    pending: None,
                    session_serial: 0,
                    busy: false,
                    view: None,
                    on_started: None,
                }),
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    pub fn platform(&self) -> &P {
        &self.shared.platform
    }

    pub fn downgrade(&self) -> WeakSessionController<P, B> {
        WeakSessionController {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Inspect the renderer binding
    pub fn with_binding<R>(&self, f: impl FnOnce(&B) -> R) -> R {
        f(&self.shared.binding.borrow())
    }

    /// Install the UI for the toggle control
    ///
    /// If the control already exists it is attached right away.
    pub fn set_view(&self, mut view: Box<dyn ToggleView>) {
        let mut state = self.shared.state.borrow_mut();
        if let Some(control) = state.control.as_ref() {
            view.attach(control);
        }
        state.view = Some(view);
    }

    /// Hook run after a session has been bound to the renderer
    pub fn set_on_session_started(&self, hook: Box<dyn FnMut()>) {
        self.shared.state.borrow_mut().on_started = Some(hook);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Control state, or `None` if no control was created
    pub fn state(&self) -> Option<ToggleState> {
        self.shared.state.borrow().control.as_ref().map(|c| c.state())
    }

    pub fn label(&self) -> Option<String> {
        self.shared
            .state
            .borrow()
            .control
            .as_ref()
            .map(|c| c.label().to_string())
    }

    pub fn handler(&self) -> Option<ClickHandler> {
        self.shared.state.borrow().control.as_ref().map(|c| c.handler())
    }

    pub fn control(&self) -> Option<ToggleControl> {
        self.shared.state.borrow().control.clone()
    }

    pub fn has_session(&self) -> bool {
        self.shared.state.borrow().session.is_some()
    }

    pub fn session(&self) -> Option<P::Session> {
        self.shared.state.borrow().session.clone()
    }

    /// True while a session request or end call is outstanding
    pub fn is_busy(&self) -> bool {
        self.shared.state.borrow().busy
    }

    /// Closure reporting whether a session is active
    ///
    /// Holds only a weak reference, so it can live inside callbacks the
    /// controller itself owns. Reports false once the controller is dropped.
    pub fn session_probe(&self) -> impl Fn() -> bool + 'static {
        let weak = Rc::downgrade(&self.shared);
        move || {
            weak.upgrade()
                .map(|shared| shared.state.borrow().session.is_some())
                .unwrap_or(false)
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Query support for the configured mode and create the control if supported
    ///
    /// Runs once; later calls return the first result.
    pub async fn initialize(&self) -> Availability {
        let previous = self.shared.state.borrow().availability.clone();
        if let Some(previous) = previous {
            warn!("XR session controller already initialized");
            return previous;
        }

        let availability = self.query_support().await;
        self.shared.state.borrow_mut().availability = Some(availability.clone());
        availability
    }

    async fn query_support(&self) -> Availability {
        let config = &self.shared.config;
        self.shared.binding.borrow_mut().set_xr_enabled(true);

        if let PlatformAvailability::Missing { secure_context } = self.shared.platform.availability()
        {
            if secure_context {
                warn!("WebXR not available");
            } else {
                warn!("WebXR needs HTTPS");
            }
            return Availability::Unavailable { secure_context };
        }

        match self.shared.platform.is_session_supported(config.mode).await {
            Ok(true) => {
                self.create_control();
                info!("{} supported, XR control created", config.mode);
                Availability::Supported
            }
            Ok(false) => {
                warn!("{} mode not found", config.mode);
                if let Some(fallback) = config.fallback_probe {
                    self.probe_fallback(fallback).await;
                }
                Availability::Unsupported
            }
            Err(e) => {
                warn!("WebXR not supported: {}", e);
                Availability::QueryFailed(e)
            }
        }
    }

    // Diagnostic only: the answer is logged and never acted on.
    async fn probe_fallback(&self, mode: SessionMode) {
        match self.shared.platform.is_session_supported(mode).await {
            Ok(true) => info!("{} session supported", mode),
            Ok(false) => info!("{} not supported", mode),
            Err(e) => warn!("{} support query failed: {}", mode, e),
        }
    }

    fn create_control(&self) {
        let mut state = self.shared.state.borrow_mut();
        let State { control, view, .. } = &mut *state;
        let control = control.insert(ToggleControl::new(self.shared.config.labels.clone()));
        if let Some(view) = view.as_mut() {
            view.attach(control);
        }
    }

    /// Handle a click on the toggle control
    ///
    /// Dispatches to the one handler attached for the current state. Clicks
    /// while a platform call is outstanding are dropped.
    pub async fn click(&self) {
        enum Call<S> {
            Request,
            End(S),
        }

        let call = {
            let mut state = self.shared.state.borrow_mut();
            let handler = match state.control.as_ref() {
                Some(control) => control.handler(),
                None => {
                    warn!("Click ignored: no XR control");
                    return;
                }
            };
            if state.busy {
                debug!("Click ignored: a session call is still outstanding");
                return;
            }
            match handler {
                ClickHandler::RequestSession => {
                    state.busy = true;
                    Call::Request
                }
                ClickHandler::EndSession => match state.session.clone() {
                    Some(session) => {
                        state.busy = true;
                        Call::End(session)
                    }
                    None => {
                        error!("Active XR control without a session");
                        return;
                    }
                },
            }
        };

        match call {
            Call::Request => self.request_session().await,
            Call::End(session) => self.end_session(session).await,
        }
    }

    async fn request_session(&self) {
        let config = &self.shared.config;
        info!("Requesting {} session", config.mode);

        let result = self
            .shared
            .platform
            .request_session(config.mode, config.init.clone())
            .await;

        match result {
            Ok(session) => self.start_session(session).await,
            Err(e) => {
                warn!("request disabled: {}", e);
                self.set_busy(false);
            }
        }
    }

    async fn start_session(&self, session: P::Session) {
        let config = &self.shared.config;
        debug!("Starting {} session", config.mode);

        let serial = {
            let mut state = self.shared.state.borrow_mut();
            state.session_serial += 1;
            state.pending = Some(session.clone());
            state.session_serial
        };

        let weak = self.downgrade();
        session.on_end(Box::new(move || {
            if let Some(controller) = weak.upgrade() {
                controller.finish_session(Some(serial));
            }
        }));

        if config.prepare_surface {
            let prepare = self.shared.binding.borrow().prepare_surface(&session);
            if let Err(e) = prepare.await {
                error!("{}", e);
                self.abandon_session(serial, &session).await;
                return;
            }
        }
        if !self.is_current(serial) {
            warn!("Session ended before it was bound");
            self.set_busy(false);
            return;
        }

        {
            let mut binding = self.shared.binding.borrow_mut();
            if let Some(space) = config.reference_space {
                binding.set_reference_space_type(space);
            }
            binding.set_session(Some(&session));
        }

        {
            let mut state = self.shared.state.borrow_mut();
            state.busy = false;
            state.session = state.pending.take();
            let State { control, view, .. } = &mut *state;
            if let Some(control) = control.as_mut() {
                if control.activate() {
                    if let Some(view) = view.as_mut() {
                        view.update(control);
                    }
                }
            }
        }

        info!("{} session started", config.mode);
        self.notify_started();
    }

    // Drop a session that could not be bound. The serial bump makes its end
    // notification stale so the control is left untouched.
    async fn abandon_session(&self, serial: u64, session: &P::Session) {
        {
            let mut state = self.shared.state.borrow_mut();
            if state.session_serial == serial {
                state.pending = None;
                state.session_serial += 1;
            }
        }
        if let Err(e) = session.end().await {
            warn!("{}", e);
        }
        self.set_busy(false);
    }

    async fn end_session(&self, session: P::Session) {
        info!("Ending session...");
        if let Err(e) = session.end().await {
            warn!("{}", e);
        }
        self.set_busy(false);
    }

    /// Termination notification
    ///
    /// Called by the session's end listener; safe to call when no session is
    /// active.
    pub fn session_ended(&self) {
        self.finish_session(None);
    }

    fn finish_session(&self, serial: Option<u64>) {
        let ended = {
            let mut state = self.shared.state.borrow_mut();
            if let Some(serial) = serial {
                if serial != state.session_serial {
                    debug!("Ignoring end notification from a previous session");
                    return;
                }
            }
            if state.pending.take().is_some() {
                debug!("Session ended before it was bound");
                return;
            }
            state.session.take()
        };

        if ended.is_none() {
            debug!("Session end notification without an active session");
            return;
        }

        self.shared.binding.borrow_mut().set_session(None);

        let mut state = self.shared.state.borrow_mut();
        let State { control, view, .. } = &mut *state;
        if let Some(control) = control.as_mut() {
            if control.deactivate() {
                if let Some(view) = view.as_mut() {
                    view.update(control);
                }
            }
        }
        info!("Session ended");
    }

    fn is_current(&self, serial: u64) -> bool {
        let state = self.shared.state.borrow();
        state.session_serial == serial && state.pending.is_some()
    }

    fn set_busy(&self, busy: bool) {
        self.shared.state.borrow_mut().busy = busy;
    }

    fn notify_started(&self) {
        let hook = self.shared.state.borrow_mut().on_started.take();
        if let Some(mut hook) = hook {
            hook();
            let mut state = self.shared.state.borrow_mut();
            if state.on_started.is_none() {
                state.on_started = Some(hook);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimBehavior, SimBinding, SimCall, SimPlatform, SimSession, SimView};
    use crate::XrResult;
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::future::LocalBoxFuture;
    use futures::task::LocalSpawnExt;
    use futures::FutureExt;

    fn controller(
        config: SessionConfig,
        behavior: SimBehavior,
    ) -> (SessionController<SimPlatform, SimBinding>, SimView) {
        let platform = SimPlatform::new(behavior);
        let binding = SimBinding::new(platform.log());
        let controller = SessionController::new(platform, binding, config);
        let view = SimView::default();
        controller.set_view(Box::new(view.clone()));
        (controller, view)
    }

    #[test]
    fn supported_mode_creates_idle_control() {
        let (controller, view) = controller(SessionConfig::vr(), SimBehavior::default());
        assert_eq!(controller.state(), None);

        let availability = block_on(controller.initialize());
        assert!(availability.is_supported());
        assert_eq!(controller.state(), Some(ToggleState::Idle));
        assert_eq!(controller.handler(), Some(ClickHandler::RequestSession));
        assert!(view.is_attached());
        assert_eq!(view.label().as_deref(), Some("Enter XR"));
        assert!(controller.with_binding(|b| b.xr_enabled()));
    }

    #[test]
    fn initialize_runs_once() {
        let (controller, _) = controller(SessionConfig::vr(), SimBehavior::default());
        block_on(controller.initialize());
        block_on(controller.initialize());
        let queries = controller
            .platform()
            .log()
            .count(|c| matches!(c, SimCall::IsSessionSupported(_)));
        assert_eq!(queries, 1);
    }

    #[test]
    fn vr_round_trip() {
        let (controller, view) = controller(SessionConfig::vr(), SimBehavior::default());
        block_on(controller.initialize());

        block_on(controller.click());
        assert_eq!(controller.state(), Some(ToggleState::Active));
        assert_eq!(controller.label().as_deref(), Some("Exit XR"));
        assert!(controller.has_session());
        assert!(!controller.is_busy());
        assert!(controller.with_binding(|b| b.session().is_some()));
        // VR binds the session without touching the reference space
        assert_eq!(controller.with_binding(|b| b.reference_space()), None);

        block_on(controller.click());
        assert_eq!(controller.state(), Some(ToggleState::Idle));
        assert!(!controller.has_session());
        assert!(controller.with_binding(|b| b.session().is_none()));
        assert_eq!(view.history(), vec!["Enter XR", "Exit XR", "Enter XR"]);
    }

    #[test]
    fn stale_session_end_is_ignored() {
        let (controller, view) = controller(SessionConfig::vr(), SimBehavior::default());
        block_on(controller.initialize());
        block_on(controller.click());
        let first = controller.session().unwrap();

        // The first session's end event is delivered only after a second
        // session has started
        first.hold_end_events();
        block_on(controller.click());
        assert!(first.is_ended());
        assert_eq!(controller.state(), Some(ToggleState::Active));
        controller.session_ended();
        assert_eq!(controller.state(), Some(ToggleState::Idle));

        block_on(controller.click());
        let second = controller.session().unwrap();
        assert_ne!(first.id(), second.id());

        assert_eq!(first.release_end_events(), 1);
        assert!(controller.has_session());
        assert_eq!(controller.session().map(|s| s.id()), Some(second.id()));
        assert_eq!(controller.state(), Some(ToggleState::Active));
        assert_eq!(controller.label().as_deref(), Some("Exit XR"));
        assert_eq!(
            controller.with_binding(|b| b.session()),
            Some(second.id())
        );
        assert_eq!(
            view.history(),
            vec!["Enter XR", "Exit XR", "Enter XR", "Exit XR"]
        );
    }

    #[test]
    fn session_end_after_its_successor_started_is_ignored() {
        let (controller, _) = controller(SessionConfig::ar(), SimBehavior::default());
        block_on(controller.initialize());
        block_on(controller.click());
        let first = controller.session().unwrap();

        first.hold_end_events();
        block_on(controller.click());
        controller.session_ended();
        block_on(controller.click());
        first.release_end_events();

        // The frame loop keeps seeing the live session
        let probe = controller.session_probe();
        assert!(probe());
        assert_eq!(controller.label().as_deref(), Some("STOP AR"));
        assert_eq!(controller.handler(), Some(ClickHandler::EndSession));
    }

    #[test]
    fn busy_controller_ignores_clicks() {
        let (controller, _) = controller(SessionConfig::vr(), SimBehavior::default());
        block_on(controller.initialize());
        controller.shared.state.borrow_mut().busy = true;
        block_on(controller.click());
        assert_eq!(
            controller
                .platform()
                .log()
                .count(|c| matches!(c, SimCall::RequestSession { .. })),
            0
        );
    }

    #[test]
    fn weak_handles_do_not_keep_controller_alive() {
        let (controller, _) = controller(SessionConfig::vr(), SimBehavior::default());
        block_on(controller.initialize());
        block_on(controller.click());
        let weak = controller.downgrade();
        let probe = controller.session_probe();
        assert!(probe());
        assert!(weak.upgrade().is_some());

        drop(controller);
        assert!(weak.upgrade().is_none());
        assert!(!probe());
    }

    #[test]
    fn started_hook_runs_after_binding() {
        let (controller, _) = controller(SessionConfig::ar(), SimBehavior::default());
        let started = Rc::new(std::cell::Cell::new(0));
        let counter = started.clone();
        let probe = controller.clone();
        controller.set_on_session_started(Box::new(move || {
            assert!(probe.has_session());
            counter.set(counter.get() + 1);
        }));

        block_on(controller.initialize());
        block_on(controller.click());
        assert_eq!(started.get(), 1);

        block_on(controller.click());
        block_on(controller.click());
        assert_eq!(started.get(), 2);
    }

    /// Binding whose surface preparation waits for a signal
    struct GatedBinding {
        inner: SimBinding,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl RendererBinding for GatedBinding {
        type Session = SimSession;

        fn set_xr_enabled(&mut self, enabled: bool) {
            self.inner.set_xr_enabled(enabled);
        }

        fn set_reference_space_type(&mut self, space: crate::ReferenceSpaceType) {
            self.inner.set_reference_space_type(space);
        }

        fn set_session(&mut self, session: Option<&SimSession>) {
            self.inner.set_session(session);
        }

        fn prepare_surface(&self, session: &SimSession) -> LocalBoxFuture<'static, XrResult<()>> {
            let ready = self.inner.prepare_surface(session);
            let gate = self.gate.borrow_mut().take();
            async move {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                ready.await
            }
            .boxed_local()
        }
    }

    fn gated_ar_controller() -> (
        SessionController<SimPlatform, GatedBinding>,
        oneshot::Sender<()>,
    ) {
        let (open, gate) = oneshot::channel();
        let platform = SimPlatform::new(SimBehavior::default());
        let binding = GatedBinding {
            inner: SimBinding::new(platform.log()),
            gate: RefCell::new(Some(gate)),
        };
        let controller = SessionController::new(platform, binding, SessionConfig::ar());
        block_on(controller.initialize());
        (controller, open)
    }

    fn spawn_click(pool: &LocalPool, controller: &SessionController<SimPlatform, GatedBinding>) {
        let controller = controller.clone();
        pool.spawner()
            .spawn_local(async move { controller.click().await })
            .unwrap();
    }

    #[test]
    fn session_is_not_active_until_surface_is_ready() {
        let (controller, open) = gated_ar_controller();
        let probe = controller.session_probe();
        let mut pool = LocalPool::new();
        spawn_click(&pool, &controller);
        pool.run_until_stalled();

        assert!(controller.is_busy());
        assert!(!controller.has_session());
        assert!(!probe());
        assert_eq!(controller.state(), Some(ToggleState::Idle));
        assert_eq!(controller.label().as_deref(), Some("Enter XR"));
        assert!(controller.with_binding(|b| b.inner.session().is_none()));

        open.send(()).unwrap();
        pool.run_until_stalled();

        assert!(!controller.is_busy());
        assert!(controller.has_session());
        assert!(probe());
        assert_eq!(controller.state(), Some(ToggleState::Active));
        assert_eq!(controller.label().as_deref(), Some("STOP AR"));
        assert!(controller.with_binding(|b| b.inner.session().is_some()));
    }

    #[test]
    fn session_ending_during_surface_setup_is_never_bound() {
        let (controller, open) = gated_ar_controller();
        let mut pool = LocalPool::new();
        spawn_click(&pool, &controller);
        pool.run_until_stalled();

        let session = controller.platform().last_session().unwrap();
        assert!(session.terminate());
        open.send(()).unwrap();
        pool.run_until_stalled();

        assert!(!controller.is_busy());
        assert!(!controller.has_session());
        assert_eq!(controller.state(), Some(ToggleState::Idle));
        assert!(controller.with_binding(|b| b.inner.session().is_none()));
    }
}
