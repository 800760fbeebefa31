//! Immersive AR demo
//!
//! Nothing is drawn until an AR session starts; the button goes in the
//! page's `<header>` when there is one.

use xrdemo_render::DemoVariant;

pub const VARIANT: DemoVariant = DemoVariant::Ar;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    if let Err(e) = xrdemo_web::start(VARIANT) {
        tracing::error!("AR demo failed to start: {}", e);
    }
}
