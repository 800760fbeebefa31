//! Browser backend for the xrdemo demos
//!
//! Implements the platform traits of `xrdemo-session` on top of the WebXR
//! Device API (through `web-sys`) and the rendering traits of
//! `xrdemo-render` on top of three.js, which the page loads as the global
//! `THREE` namespace.
//!
//! # Modules
//!
//! - [`three`]: `wasm-bindgen` bindings for the parts of three.js in use
//! - [`mirror`]: three.js objects built from an `xrdemo_scene::Scene`
//! - [`renderer`]: `SceneRenderer`, `AnimationLoop` and `RendererBinding` on a `WebGLRenderer`
//! - [`platform`]: `navigator.xr` and `XRSession`
//! - [`button`]: the toggle control as an HTML button
//! - [`app`]: page setup shared by both demo entry points
//! - [`options`]: renderer construction options per demo
//!
//! Everything except [`options`] and [`WebError`] is wasm32-only.

#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod button;
#[cfg(target_arch = "wasm32")]
pub mod mirror;
pub mod options;
#[cfg(target_arch = "wasm32")]
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
#[cfg(target_arch = "wasm32")]
pub mod three;

#[cfg(target_arch = "wasm32")]
pub use app::start;

/// Page setup errors
///
/// Session-level failures are `xrdemo_session::XrError` and never reach
/// this type.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("no global window")]
    NoWindow,

    #[error("document has no {0}")]
    MissingElement(&'static str),

    #[error("JavaScript error: {0}")]
    Js(String),

    #[error("scene error: {0}")]
    Scene(#[from] xrdemo_scene::SceneError),
}

pub type Result<T> = std::result::Result<T, WebError>;

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        WebError::Js(js_error_message(&value))
    }
}

/// Best-effort text for a thrown JavaScript value
#[cfg(target_arch = "wasm32")]
pub(crate) fn js_error_message(value: &wasm_bindgen::JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
