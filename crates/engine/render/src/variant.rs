//! Demo presets
//!
//! The VR and AR demos share every component and differ in data plus one
//! wiring decision: VR renders from page load, AR only starts its frame loop
//! once a session has been bound.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use tracing::{debug, info};
use xrdemo_scene::{build_ar_scene, build_vr_scene, Viewport};
use xrdemo_session::{RendererBinding, SessionConfig, SessionController, XrPlatform};

use crate::animation::{Animation, BobAnimation, SpinAnimation};
use crate::driver::{arm, FrameContext, RenderDriver, RenderPolicy};
use crate::renderer::{AnimationLoop, SceneRenderer};

/// Which demo is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DemoVariant {
    #[default]
    Vr,
    Ar,
}

impl DemoVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vr => "vr",
            Self::Ar => "ar",
        }
    }

    /// Session controller preset
    pub fn session_config(&self) -> SessionConfig {
        match self {
            Self::Vr => SessionConfig::vr(),
            Self::Ar => SessionConfig::ar(),
        }
    }

    pub fn render_policy(&self) -> RenderPolicy {
        match self {
            Self::Vr => RenderPolicy::Always,
            Self::Ar => RenderPolicy::RequireSession,
        }
    }

    /// Whether the frame loop starts at page load rather than on session start
    pub fn arms_at_load(&self) -> bool {
        matches!(self, Self::Vr)
    }

    /// Build the scene and a driver for it
    pub fn driver(&self, aspect: f32) -> RenderDriver<Box<dyn Animation>> {
        match self {
            Self::Vr => {
                let (scene, handles) = build_vr_scene(aspect);
                let animation: Box<dyn Animation> = Box::new(SpinAnimation::new(&handles));
                RenderDriver::new(scene, animation, self.render_policy()).with_resize_tracking()
            }
            Self::Ar => {
                let (scene, handles) = build_ar_scene(aspect);
                let animation: Box<dyn Animation> = Box::new(BobAnimation::new(&handles));
                RenderDriver::new(scene, animation, self.render_policy())
            }
        }
    }
}

impl fmt::Display for DemoVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemoVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vr" => Ok(Self::Vr),
            "ar" => Ok(Self::Ar),
            other => Err(format!("unknown demo variant '{}'", other)),
        }
    }
}

/// Connect a driver to the controller and the frame scheduler
///
/// The per-frame context reads the controller's session state through a weak
/// probe. `display` reports the current surface size, if known.
pub fn wire_demo<P, B, R, S, A>(
    variant: DemoVariant,
    controller: &SessionController<P, B>,
    driver: Rc<RefCell<RenderDriver<A>>>,
    renderer: R,
    scheduler: S,
    display: Rc<dyn Fn() -> Option<Viewport>>,
) where
    P: XrPlatform + 'static,
    B: RendererBinding<Session = P::Session> + 'static,
    R: SceneRenderer + Clone + 'static,
    S: AnimationLoop + 'static,
    A: Animation + 'static,
{
    let probe = controller.session_probe();
    let context: Rc<dyn Fn() -> FrameContext> = Rc::new(move || FrameContext {
        session_active: probe(),
        display: display(),
    });

    if variant.arms_at_load() {
        info!("{} demo: frame loop armed at load", variant);
        arm(driver, renderer, &scheduler, context);
        return;
    }

    info!("{} demo: frame loop waits for a session", variant);
    controller.set_on_session_started(Box::new(move || {
        debug!("Session started, arming frame loop");
        arm(driver.clone(), renderer.clone(), &scheduler, context.clone());
    }));
}
