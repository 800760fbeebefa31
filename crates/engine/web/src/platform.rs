//! WebXR Device API platform

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use js_sys::{Array, Function, Reflect};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Window, XrSessionInit, XrSessionMode, XrSystem};
use xrdemo_session::{
    PlatformAvailability, SessionFeature, SessionInit, SessionMode, XrError, XrPlatform,
    XrResult, XrSession,
};

use crate::js_error_message;

fn web_mode(mode: SessionMode) -> XrSessionMode {
    match mode {
        SessionMode::ImmersiveVr => XrSessionMode::ImmersiveVr,
        SessionMode::ImmersiveAr => XrSessionMode::ImmersiveAr,
        SessionMode::Inline => XrSessionMode::Inline,
    }
}

fn feature_array(features: &[SessionFeature]) -> Array {
    features
        .iter()
        .map(|feature| JsValue::from_str(feature.as_str()))
        .collect()
}

fn session_init(init: &SessionInit) -> XrSessionInit {
    let options = XrSessionInit::new();
    if !init.required_features.is_empty() {
        options.set_required_features(&feature_array(&init.required_features));
    }
    if !init.optional_features.is_empty() {
        options.set_optional_features(&feature_array(&init.optional_features));
    }
    options
}

/// `navigator.xr`
pub struct WebXrPlatform {
    xr: Option<XrSystem>,
    secure_context: bool,
}

impl WebXrPlatform {
    pub fn new(window: &Window) -> Self {
        // Browsers hide `navigator.xr` on insecure pages
        let xr = Reflect::get(&window.navigator(), &JsValue::from_str("xr"))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
            .map(|value| value.unchecked_into::<XrSystem>());

        Self {
            xr,
            secure_context: window.is_secure_context(),
        }
    }

    fn unavailable(&self) -> XrError {
        XrError::Unavailable {
            secure_context: self.secure_context,
        }
    }
}

impl XrPlatform for WebXrPlatform {
    type Session = WebXrSession;

    fn availability(&self) -> PlatformAvailability {
        match self.xr {
            Some(_) => PlatformAvailability::Available,
            None => PlatformAvailability::Missing {
                secure_context: self.secure_context,
            },
        }
    }

    fn is_session_supported(&self, mode: SessionMode) -> LocalBoxFuture<'_, XrResult<bool>> {
        let Some(xr) = &self.xr else {
            return future::ready(Err(self.unavailable())).boxed_local();
        };

        let promise = xr.is_session_supported(web_mode(mode));
        async move {
            let supported = JsFuture::from(promise)
                .await
                .map_err(|e| XrError::Platform(js_error_message(&e)))?;
            Ok(supported.as_bool().unwrap_or(false))
        }
        .boxed_local()
    }

    fn request_session(
        &self,
        mode: SessionMode,
        init: SessionInit,
    ) -> LocalBoxFuture<'_, XrResult<WebXrSession>> {
        let Some(xr) = &self.xr else {
            return future::ready(Err(self.unavailable())).boxed_local();
        };

        // Issued before the first await so the click's user activation applies
        let promise = xr.request_session_with_options(web_mode(mode), &session_init(&init));
        async move {
            let session = JsFuture::from(promise)
                .await
                .map_err(|e| XrError::RequestRejected(js_error_message(&e)))?;
            Ok(WebXrSession::new(session.unchecked_into()))
        }
        .boxed_local()
    }
}

/// `XRSession`
#[derive(Clone)]
pub struct WebXrSession {
    inner: web_sys::XrSession,
}

impl WebXrSession {
    pub fn new(inner: web_sys::XrSession) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &web_sys::XrSession {
        &self.inner
    }
}

impl XrSession for WebXrSession {
    fn end(&self) -> LocalBoxFuture<'static, XrResult<()>> {
        let promise = self.inner.end();
        async move {
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| XrError::EndFailed(js_error_message(&e)))
        }
        .boxed_local()
    }

    fn on_end(&self, mut listener: Box<dyn FnMut()>) {
        // `end` fires once per session; the closure frees itself after the call
        let callback = Closure::once_into_js(move || listener());
        if let Err(e) = self
            .inner
            .add_event_listener_with_callback("end", callback.unchecked_ref::<Function>())
        {
            warn!("Failed to register session end listener: {}", js_error_message(&e));
        }
    }
}
