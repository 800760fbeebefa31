//! Immersive VR demo
//!
//! Build with `wasm-pack build crates/apps/vr-demo --target web` and serve
//! over HTTPS next to a page that loads three.js as `THREE`.

use xrdemo_render::DemoVariant;

pub const VARIANT: DemoVariant = DemoVariant::Vr;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    if let Err(e) = xrdemo_web::start(VARIANT) {
        tracing::error!("VR demo failed to start: {}", e);
    }
}
