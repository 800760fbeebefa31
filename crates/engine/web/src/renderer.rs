//! three.js `WebGLRenderer` adapters

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{WebGl2RenderingContext, XrRenderStateInit, XrWebGlLayer};
use xrdemo_render::{AnimationLoop, ClearMask, FrameCallback, SceneRenderer};
use xrdemo_scene::{Scene, Viewport};
use xrdemo_session::{ReferenceSpaceType, RendererBinding, XrError, XrResult};

use crate::js_error_message;
use crate::mirror::ThreeScene;
use crate::platform::WebXrSession;
use crate::three;

// ============================================================================
// Drawing and frame scheduling
// ============================================================================

/// Draws through a `WebGLRenderer` and schedules frames with its
/// `setAnimationLoop`, which follows the XR session's frame rate while one
/// is presenting
#[derive(Clone)]
pub struct ThreeRenderer {
    renderer: three::WebGLRenderer,
    mirror: Rc<RefCell<ThreeScene>>,
    frame_callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl ThreeRenderer {
    pub fn new(renderer: three::WebGLRenderer, mirror: ThreeScene) -> Self {
        Self {
            renderer,
            mirror: Rc::new(RefCell::new(mirror)),
            frame_callback: Rc::new(RefCell::new(None)),
        }
    }
}

impl SceneRenderer for ThreeRenderer {
    fn render(&mut self, scene: &Scene) {
        let mut mirror = self.mirror.borrow_mut();
        mirror.sync(scene);
        self.renderer.render(&mirror.scene, &mirror.camera);
    }

    fn clear(&mut self, mask: ClearMask) {
        self.renderer.clear(mask.color, mask.depth, mask.stencil);
    }

    fn set_size(&mut self, viewport: Viewport) {
        self.renderer.set_size(viewport.width, viewport.height);
    }
}

impl AnimationLoop for ThreeRenderer {
    fn set_animation_loop(&self, callback: Option<FrameCallback>) {
        match callback {
            Some(callback) => {
                let closure = Closure::<dyn FnMut(f64)>::wrap(callback);
                self.renderer
                    .set_animation_loop(Some(closure.as_ref().unchecked_ref()));
                // Replacing drops the previous closure; it is no longer registered
                *self.frame_callback.borrow_mut() = Some(closure);
            }
            None => {
                self.renderer.set_animation_loop(None);
                self.frame_callback.borrow_mut().take();
            }
        }
    }
}

// ============================================================================
// Session binding
// ============================================================================

/// The renderer's `xr` manager as the session controller sees it
pub struct ThreeXrBinding {
    renderer: three::WebGLRenderer,
}

impl ThreeXrBinding {
    pub fn new(renderer: three::WebGLRenderer) -> Self {
        Self { renderer }
    }
}

fn surface_error(value: JsValue) -> XrError {
    XrError::SurfaceSetup(js_error_message(&value))
}

impl RendererBinding for ThreeXrBinding {
    type Session = WebXrSession;

    fn set_xr_enabled(&mut self, enabled: bool) {
        self.renderer.xr().set_enabled(enabled);
    }

    fn set_reference_space_type(&mut self, space: ReferenceSpaceType) {
        self.renderer.xr().set_reference_space_type(space.as_str());
    }

    fn set_session(&mut self, session: Option<&WebXrSession>) {
        let Some(session) = session else {
            // The xr manager drops the session on its own end event
            debug!("Session detached from renderer");
            return;
        };

        let promise = self.renderer.xr().set_session(session.inner());
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                warn!("Renderer rejected XR session: {}", js_error_message(&e));
            }
        });
    }

    fn prepare_surface(&self, session: &WebXrSession) -> LocalBoxFuture<'static, XrResult<()>> {
        let context = self.renderer.get_context();
        let session = session.inner().clone();

        async move {
            let gl: WebGl2RenderingContext = context
                .dyn_into()
                .map_err(|_| XrError::SurfaceSetup("renderer has no WebGL2 context".to_string()))?;
            JsFuture::from(gl.make_xr_compatible())
                .await
                .map_err(surface_error)?;

            let layer = XrWebGlLayer::new_with_web_gl2_rendering_context(&session, &gl)
                .map_err(surface_error)?;
            let state = XrRenderStateInit::new();
            state.set_base_layer(Some(&layer));
            session.update_render_state_with_state(&state);
            debug!("XR base layer installed");
            Ok(())
        }
        .boxed_local()
    }
}
