//! Render driver for the xrdemo demos
//!
//! The platform's animation scheduler calls one callback per frame. That
//! callback is a [`RenderDriver`] step: advance the procedural animation,
//! then draw the scene once, or clear the surface when the demo needs a
//! session and has none.
//!
//! # Modules
//!
//! - [`animation`]: the VR spin and AR bob animations
//! - [`driver`]: frame stepping and arming against a scheduler
//! - [`headless`]: in-memory renderer and manually ticked scheduler
//! - [`renderer`]: traits the rendering backend implements
//! - [`variant`]: per-demo presets and the wiring between controller and driver

pub mod animation;
pub mod driver;
pub mod headless;
pub mod renderer;
pub mod variant;

pub use animation::{Animation, BobAnimation, FrameTime, SpinAnimation};
pub use driver::{arm, FrameContext, FrameOutcome, RenderDriver, RenderPolicy};
pub use headless::{HeadlessRenderer, ManualScheduler, RenderCall};
pub use renderer::{AnimationLoop, ClearMask, FrameCallback, SceneRenderer};
pub use variant::{wire_demo, DemoVariant};
