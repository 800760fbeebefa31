//! HTML button for the XR toggle control

use std::rc::Rc;

use tracing::error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlButtonElement, HtmlElement};
use xrdemo_session::{ToggleControl, ToggleView};

use crate::js_error_message;

/// Shows a [`ToggleControl`] as a `<button>`
///
/// The element is created when the control is attached, so an unsupported
/// mode leaves the page without a button. Its single `onclick` handler is
/// installed once; state changes only touch the label.
pub struct ButtonView {
    document: Document,
    parent: HtmlElement,
    id: Option<String>,
    on_click: Rc<dyn Fn()>,
    button: Option<HtmlButtonElement>,
    click_closure: Option<Closure<dyn FnMut()>>,
}

impl ButtonView {
    pub fn new(document: Document, parent: HtmlElement, on_click: Rc<dyn Fn()>) -> Self {
        Self {
            document,
            parent,
            id: None,
            on_click,
            button: None,
            click_closure: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    fn create(&mut self, label: &str) -> Result<(), JsValue> {
        let button: HtmlButtonElement = self.document.create_element("button")?.dyn_into()?;
        button.set_text_content(Some(label));
        if let Some(id) = &self.id {
            button.set_id(id);
        }

        let on_click = self.on_click.clone();
        let closure = Closure::<dyn FnMut()>::wrap(Box::new(move || on_click()));
        button.set_onclick(Some(closure.as_ref().unchecked_ref()));
        self.parent.append_child(&button)?;

        self.button = Some(button);
        self.click_closure = Some(closure);
        Ok(())
    }
}

impl ToggleView for ButtonView {
    fn attach(&mut self, control: &ToggleControl) {
        if self.button.is_some() {
            return;
        }
        if let Err(e) = self.create(control.label()) {
            error!("Failed to create XR button: {}", js_error_message(&e));
        }
    }

    fn update(&mut self, control: &ToggleControl) {
        if let Some(button) = &self.button {
            button.set_text_content(Some(control.label()));
        }
    }
}
