//! Browser tests; run with `wasm-pack test --headless --chrome crates/engine/web`

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;
use xrdemo_session::{ButtonLabels, ToggleControl, ToggleView};
use xrdemo_web::button::ButtonView;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn button_follows_control_label() {
    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();

    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    let mut view = ButtonView::new(
        document.clone(),
        body,
        Rc::new(move || counter.set(counter.get() + 1)),
    )
    .with_id("xr-test-button");

    let mut control = ToggleControl::new(ButtonLabels::ar());
    view.attach(&control);
    // A second attach must not add another element
    view.attach(&control);

    let button: HtmlElement = document
        .get_element_by_id("xr-test-button")
        .unwrap()
        .dyn_into()
        .unwrap();
    assert_eq!(button.text_content().as_deref(), Some("Enter XR"));
    assert_eq!(document.query_selector_all("#xr-test-button").unwrap().length(), 1);

    button.click();
    button.click();
    assert_eq!(clicks.get(), 2);

    control.activate();
    view.update(&control);
    assert_eq!(button.text_content().as_deref(), Some("STOP AR"));

    control.deactivate();
    view.update(&control);
    assert_eq!(button.text_content().as_deref(), Some("START AR"));
}
