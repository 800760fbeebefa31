//! Frame stepping
//!
//! A [`RenderDriver`] owns the scene and its animation. The scheduler
//! callback built by [`arm`] asks a context closure for the current
//! [`FrameContext`] and passes it to [`RenderDriver::step`], so the driver
//! never reaches into controller state on its own.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace, warn};
use xrdemo_scene::{Scene, Viewport};

use crate::animation::{Animation, FrameTime};
use crate::renderer::{AnimationLoop, ClearMask, SceneRenderer};

/// When the driver draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderPolicy {
    /// Every frame, session or not
    #[default]
    Always,
    /// Only with an active session; otherwise clear
    RequireSession,
}

/// Facts about the outside world for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameContext {
    pub session_active: bool,
    /// Current display size, when the platform reports one
    pub display: Option<Viewport>,
}

/// What a step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Animation advanced and one draw call issued
    Drawn,
    /// No session under [`RenderPolicy::RequireSession`]; surface cleared
    Cleared,
}

/// Owns the scene and advances it one frame at a time
pub struct RenderDriver<A> {
    scene: Scene,
    animation: A,
    policy: RenderPolicy,
    track_resize: bool,
    frame: u64,
    last_time_ms: Option<f64>,
    frames_drawn: u64,
    frames_cleared: u64,
}

impl<A: Animation> RenderDriver<A> {
    pub fn new(scene: Scene, animation: A, policy: RenderPolicy) -> Self {
        Self {
            scene,
            animation,
            policy,
            track_resize: false,
            frame: 0,
            last_time_ms: None,
            frames_drawn: 0,
            frames_cleared: 0,
        }
    }

    /// Refit the camera to the display size before every draw
    pub fn with_resize_tracking(mut self) -> Self {
        self.track_resize = true;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn policy(&self) -> RenderPolicy {
        self.policy
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn frames_cleared(&self) -> u64 {
        self.frames_cleared
    }

    /// Run one frame
    pub fn step<R: SceneRenderer + ?Sized>(
        &mut self,
        time_ms: f64,
        context: &FrameContext,
        renderer: &mut R,
    ) -> FrameOutcome {
        if let Some(last) = self.last_time_ms {
            if time_ms < last {
                debug!("Frame timestamp went backwards: {} < {}", time_ms, last);
            }
        }
        self.last_time_ms = Some(time_ms);

        if self.policy == RenderPolicy::RequireSession && !context.session_active {
            renderer.clear(ClearMask::ALL);
            self.frames_cleared += 1;
            return FrameOutcome::Cleared;
        }

        let time = FrameTime::new(time_ms, self.frame);
        self.frame += 1;

        if self.track_resize {
            if let Some(display) = context.display {
                if self.scene.camera.fit_viewport(display) {
                    trace!("Camera aspect now {}", self.scene.camera.aspect);
                    renderer.set_size(display);
                }
            }
        }

        if let Err(e) = self.animation.update(&mut self.scene, &time) {
            warn!("Animation update failed: {}", e);
        }

        renderer.render(&self.scene);
        self.frames_drawn += 1;
        FrameOutcome::Drawn
    }
}

/// Register `driver` as the scheduler's frame callback
///
/// `context` is evaluated once per frame. Calling this again replaces the
/// previous callback.
pub fn arm<A, R, S>(
    driver: Rc<RefCell<RenderDriver<A>>>,
    mut renderer: R,
    scheduler: &S,
    context: Rc<dyn Fn() -> FrameContext>,
) where
    A: Animation + 'static,
    R: SceneRenderer + 'static,
    S: AnimationLoop + ?Sized,
{
    debug!("Arming render driver");
    scheduler.set_animation_loop(Some(Box::new(move |time_ms| {
        let frame_context = context();
        driver
            .borrow_mut()
            .step(time_ms, &frame_context, &mut renderer);
    })));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{BobAnimation, SpinAnimation};
    use crate::headless::{HeadlessRenderer, RenderCall};
    use xrdemo_scene::{build_ar_scene, build_vr_scene};

    #[test]
    fn always_policy_draws_without_session() {
        let (scene, handles) = build_vr_scene(1.0);
        let mut driver = RenderDriver::new(scene, SpinAnimation::new(&handles), RenderPolicy::Always);
        let mut renderer = HeadlessRenderer::default();

        let outcome = driver.step(16.0, &FrameContext::default(), &mut renderer);
        assert_eq!(outcome, FrameOutcome::Drawn);
        assert_eq!(renderer.draw_count(), 1);
        assert_eq!(driver.frames_drawn(), 1);
    }

    #[test]
    fn require_session_clears_instead_of_drawing() {
        let (scene, handles) = build_ar_scene(1.0);
        let start = scene.node(handles.cube).unwrap().transform;
        let mut driver =
            RenderDriver::new(scene, BobAnimation::new(&handles), RenderPolicy::RequireSession);
        let mut renderer = HeadlessRenderer::default();

        let outcome = driver.step(500.0, &FrameContext::default(), &mut renderer);
        assert_eq!(outcome, FrameOutcome::Cleared);
        assert_eq!(renderer.draw_count(), 0);
        assert_eq!(renderer.calls(), vec![RenderCall::Clear(ClearMask::ALL)]);
        // The cube did not move
        assert_eq!(driver.scene().node(handles.cube).unwrap().transform, start);
    }

    #[test]
    fn resize_tracking_refits_camera() {
        let (scene, handles) = build_vr_scene(1.0);
        let mut driver = RenderDriver::new(scene, SpinAnimation::new(&handles), RenderPolicy::Always)
            .with_resize_tracking();
        let mut renderer = HeadlessRenderer::default();

        let context = FrameContext {
            session_active: false,
            display: Some(Viewport::new(1920, 1080)),
        };
        driver.step(0.0, &context, &mut renderer);
        assert!((driver.scene().camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        // The renderer saw the refitted camera
        assert!((renderer.last_aspect().unwrap() - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn without_resize_tracking_camera_is_fixed() {
        let (scene, handles) = build_vr_scene(1.0);
        let mut driver = RenderDriver::new(scene, SpinAnimation::new(&handles), RenderPolicy::Always);
        let mut renderer = HeadlessRenderer::default();
        let context = FrameContext {
            session_active: false,
            display: Some(Viewport::new(300, 100)),
        };
        driver.step(0.0, &context, &mut renderer);
        assert_eq!(driver.scene().camera.aspect, 1.0);
    }
}
