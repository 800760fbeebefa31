//! Rendering backend traits

use xrdemo_scene::{Scene, Viewport};

/// Which buffers a clear touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
    pub stencil: bool,
}

impl ClearMask {
    pub const ALL: Self = Self {
        color: true,
        depth: true,
        stencil: true,
    };
}

impl Default for ClearMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Draws a [`Scene`] to the output surface
pub trait SceneRenderer {
    /// Draw the full scene against its camera (one draw call)
    fn render(&mut self, scene: &Scene);

    /// Clear the output surface without drawing
    fn clear(&mut self, mask: ClearMask);

    /// Resize the output surface
    fn set_size(&mut self, viewport: Viewport) {
        let _ = viewport;
    }
}

/// Per-frame callback; receives the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnMut(f64)>;

/// The platform's per-frame scheduler
///
/// Only one callback is registered at a time; setting a new one replaces
/// the previous. There is no cancellation beyond passing `None`.
pub trait AnimationLoop {
    fn set_animation_loop(&self, callback: Option<FrameCallback>);
}
