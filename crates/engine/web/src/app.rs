//! Page setup for a demo
//!
//! Creates the renderer and canvas, mirrors the scene into three.js, builds
//! the session controller with its button and wires the frame loop. The
//! controller lives in a thread-local for the lifetime of the page.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Object, Reflect};
use tracing::{debug, info};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement, Window};
use xrdemo_render::{wire_demo, DemoVariant};
use xrdemo_scene::Viewport;
use xrdemo_session::{SessionController, WeakSessionController};

use crate::button::ButtonView;
use crate::mirror::ThreeScene;
use crate::options::RendererOptions;
use crate::platform::WebXrPlatform;
use crate::renderer::{ThreeRenderer, ThreeXrBinding};
use crate::three;
use crate::{Result, WebError};

type WebController = SessionController<WebXrPlatform, ThreeXrBinding>;

thread_local! {
    static DEMO: RefCell<Option<WebController>> = const { RefCell::new(None) };
}

/// Id of the VR demo's button
const VR_BUTTON_ID: &str = "btn";

fn display_size(window: &Window) -> Option<Viewport> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Viewport::new(width as u32, height as u32))
}

fn create_renderer(variant: DemoVariant, window: &Window, size: Viewport) -> Result<three::WebGLRenderer> {
    let options = RendererOptions::for_variant(variant);
    let params = Object::new();
    Reflect::set(&params, &"antialias".into(), &JsValue::from_bool(options.antialias))?;
    Reflect::set(&params, &"alpha".into(), &JsValue::from_bool(options.alpha))?;

    let renderer = three::WebGLRenderer::new(&params)?;
    if let Some(space) = options.output_color_space {
        renderer.set_output_color_space(space);
    }
    renderer.set_pixel_ratio(window.device_pixel_ratio());
    renderer.set_size(size.width, size.height);
    Ok(renderer)
}

fn button_parent(variant: DemoVariant, document: &Document, body: HtmlElement) -> HtmlElement {
    if variant == DemoVariant::Vr {
        return body;
    }
    document
        .query_selector("header")
        .ok()
        .flatten()
        .and_then(|header| header.dyn_into::<HtmlElement>().ok())
        .unwrap_or(body)
}

fn click_handler(controller: WeakSessionController<WebXrPlatform, ThreeXrBinding>) -> Rc<dyn Fn()> {
    Rc::new(move || {
        let Some(controller) = controller.upgrade() else {
            return;
        };
        spawn_local(async move { controller.click().await });
    })
}

/// Set up `variant` on the current page
pub fn start(variant: DemoVariant) -> Result<()> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::MissingElement("document"))?;
    let body = document.body().ok_or(WebError::MissingElement("body"))?;

    let size = display_size(&window).unwrap_or_default();
    let renderer = create_renderer(variant, &window, size)?;
    body.append_child(&renderer.dom_element())?;

    let driver = variant.driver(size.aspect().unwrap_or(1.0));
    let mirror = ThreeScene::build(driver.scene(), renderer.capabilities().get_max_anisotropy())?;
    let three_renderer = ThreeRenderer::new(renderer.clone(), mirror);

    let controller = SessionController::new(
        WebXrPlatform::new(&window),
        ThreeXrBinding::new(renderer),
        variant.session_config(),
    );

    let parent = button_parent(variant, &document, body);
    let mut view = ButtonView::new(document, parent, click_handler(controller.downgrade()));
    if variant == DemoVariant::Vr {
        view = view.with_id(VR_BUTTON_ID);
    }
    controller.set_view(Box::new(view));

    let display_window = window.clone();
    wire_demo(
        variant,
        &controller,
        Rc::new(RefCell::new(driver)),
        three_renderer.clone(),
        three_renderer,
        Rc::new(move || display_size(&display_window)),
    );

    DEMO.with(|demo| *demo.borrow_mut() = Some(controller.clone()));
    info!("{} demo started", variant);

    spawn_local(async move {
        let availability = controller.initialize().await;
        debug!("XR availability: {:?}", availability);
    });
    Ok(())
}
