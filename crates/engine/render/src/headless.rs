//! Headless rendering backend
//!
//! Used by tests and the `xr-sim` tool. The renderer records what it was
//! asked to do; the scheduler only fires when ticked.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use xrdemo_scene::{Scene, Viewport};

use crate::renderer::{AnimationLoop, ClearMask, FrameCallback, SceneRenderer};

/// A call received by [`HeadlessRenderer`]
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Render { nodes: usize, aspect: f32 },
    Clear(ClearMask),
    Resize(Viewport),
}

/// Renderer that records calls instead of drawing
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    calls: Rc<RefCell<Vec<RenderCall>>>,
}

impl HeadlessRenderer {
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.borrow().clone()
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, RenderCall::Render { .. }))
            .count()
    }

    pub fn clear_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, RenderCall::Clear(_)))
            .count()
    }

    /// Camera aspect seen by the most recent draw
    pub fn last_aspect(&self) -> Option<f32> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            RenderCall::Render { aspect, .. } => Some(*aspect),
            _ => None,
        })
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn render(&mut self, scene: &Scene) {
        self.calls.borrow_mut().push(RenderCall::Render {
            nodes: scene.len(),
            aspect: scene.camera.aspect,
        });
    }

    fn clear(&mut self, mask: ClearMask) {
        self.calls.borrow_mut().push(RenderCall::Clear(mask));
    }

    fn set_size(&mut self, viewport: Viewport) {
        self.calls.borrow_mut().push(RenderCall::Resize(viewport));
    }
}

/// Scheduler that fires its callback only when [`tick`](Self::tick)ed
#[derive(Clone, Default)]
pub struct ManualScheduler {
    callback: Rc<RefCell<Option<FrameCallback>>>,
    registrations: Rc<Cell<usize>>,
}

impl ManualScheduler {
    /// Deliver one frame. Returns false when nothing is registered.
    pub fn tick(&self, time_ms: f64) -> bool {
        // Taken out so the callback may re-register itself
        let callback = self.callback.borrow_mut().take();
        match callback {
            Some(mut callback) => {
                callback(time_ms);
                let mut slot = self.callback.borrow_mut();
                if slot.is_none() {
                    *slot = Some(callback);
                }
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.callback.borrow().is_some()
    }

    /// How many times a callback was installed
    pub fn registrations(&self) -> usize {
        self.registrations.get()
    }
}

impl AnimationLoop for ManualScheduler {
    fn set_animation_loop(&self, callback: Option<FrameCallback>) {
        if callback.is_some() {
            self.registrations.set(self.registrations.get() + 1);
        }
        *self.callback.borrow_mut() = callback;
    }
}
