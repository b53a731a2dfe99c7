#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use js_sys::{Function, Promise};
use tipwire_web::{install, install_with_config};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{
    Document, Element, FocusEvent, FocusEventInit, HtmlElement, KeyboardEvent, KeyboardEventInit,
    PointerEvent,
};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .and_then(|w| w.document())
        .expect("document")
}

fn append(doc: &Document, tag: &str, id: &str) -> Element {
    let el = doc.create_element(tag).expect("create");
    el.set_id(id);
    doc.body().expect("body").append_child(&el).expect("append");
    el
}

fn inline_style(el: &Element, property: &str) -> String {
    el.unchecked_ref::<HtmlElement>()
        .style()
        .get_property_value(property)
        .expect("style")
}

fn focus_in(target: &Element) {
    let init = FocusEventInit::new();
    init.set_bubbles(true);
    let event = FocusEvent::new_with_focus_event_init_dict("focusin", &init).expect("event");
    target.dispatch_event(&event).expect("dispatch");
}

fn key_down(target: &Element, key: &str) {
    let init = KeyboardEventInit::new();
    init.set_bubbles(true);
    init.set_key(key);
    let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).expect("event");
    target.dispatch_event(&event).expect("dispatch");
}

fn pointer(target: &Element, kind: &str) {
    let event = PointerEvent::new(kind).expect("event");
    target.dispatch_event(&event).expect("dispatch");
}

/// Resolves on the next animation frame, after callbacks registered earlier.
async fn next_frame() {
    let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
        web_sys::window()
            .expect("window")
            .request_animation_frame(&resolve)
            .expect("requestAnimationFrame");
    });
    JsFuture::from(promise).await.expect("frame");
}

#[wasm_bindgen_test]
fn install_builds_hidden_surface_and_normalizes_triggers() {
    let doc = document();
    let span = append(&doc, "span", "web-span");
    span.set_attribute("data-tooltip", "Hello").expect("attr");
    let button = append(&doc, "button", "web-button");
    button.set_attribute("data-tooltip", "Native").expect("attr");

    let handle = install().expect("install");
    let id = handle.surface_id().expect("surface id");
    let surface = doc.get_element_by_id(&id).expect("surface in body");

    assert_eq!(surface.get_attribute("role").as_deref(), Some("tooltip"));
    assert_eq!(surface.get_attribute("aria-hidden").as_deref(), Some("true"));
    assert_eq!(span.get_attribute("tabindex").as_deref(), Some("0"));
    assert_eq!(button.get_attribute("tabindex"), None);
    assert!(!handle.is_visible());
}

#[wasm_bindgen_test]
fn add_button_inserts_focusable_trigger() {
    let doc = document();
    let container = append(&doc, "div", "web-container");
    let add = append(&doc, "button", "web-add");

    let mut handle = install().expect("install");
    assert!(!handle.attach_add_button("missing-button", "web-container").expect("attach"));
    assert!(handle.attach_add_button("web-add", "web-container").expect("attach"));

    add.unchecked_ref::<HtmlElement>().click();

    let inserted = container.first_element_child().expect("inserted span");
    assert_eq!(inserted.tag_name().to_ascii_lowercase(), "span");
    assert_eq!(inserted.class_name(), "dynamic");
    assert_eq!(
        inserted.get_attribute("data-tooltip").as_deref(),
        Some("Dynamically added tooltip description")
    );
    assert_eq!(inserted.text_content().as_deref(), Some("Dynamically added element"));
    assert_eq!(inserted.get_attribute("tabindex").as_deref(), Some("0"));
}

#[wasm_bindgen_test]
fn teardown_is_idempotent() {
    let handle = install().expect("install");
    assert!(handle.teardown());
    assert!(!handle.teardown());
    assert!(!handle.is_visible());
}

#[wasm_bindgen_test]
fn config_json_is_validated() {
    assert!(install_with_config(r#"{"gap": -1.0}"#).is_err());

    let doc = document();
    let el = append(&doc, "em", "web-hint");
    el.set_attribute("data-hint", "Custom").expect("attr");
    let _handle = install_with_config(r#"{"trigger_attribute": "data-hint"}"#).expect("install");
    assert_eq!(el.get_attribute("tabindex").as_deref(), Some("0"));
}

#[wasm_bindgen_test]
async fn focus_shows_and_positions_on_next_frame() {
    let doc = document();
    let button = append(&doc, "button", "web-focus");
    button.set_attribute("data-tooltip", "Focused").expect("attr");
    button.set_text_content(Some("Focus me"));

    let handle = install().expect("install");
    let id = handle.surface_id().expect("surface id");
    let surface = doc.get_element_by_id(&id).expect("surface");

    focus_in(&button);
    assert!(handle.is_visible());
    assert!(handle.frame_pending());
    assert_eq!(surface.get_attribute("aria-hidden").as_deref(), Some("false"));
    assert_eq!(surface.text_content().as_deref(), Some("Focused"));
    assert_eq!(button.get_attribute("aria-describedby"), Some(id));

    next_frame().await;
    assert!(!handle.frame_pending());
    let left = inline_style(&surface, "left");
    assert!(left.ends_with("px"), "{left}");
    assert!(inline_style(&surface, "top").ends_with("px"));
    assert_ne!(inline_style(&surface, "visibility"), "hidden");
    assert!(surface.get_attribute("data-placement").is_some());

    key_down(&button, "Escape");
    assert!(!handle.is_visible());
    assert_eq!(surface.get_attribute("aria-hidden").as_deref(), Some("true"));
    assert_eq!(button.get_attribute("aria-describedby"), None);
}

#[wasm_bindgen_test]
fn pointer_enter_and_leave_toggle_the_tooltip() {
    let doc = document();
    let span = append(&doc, "span", "web-pointer");
    span.set_attribute("data-tooltip", "Hovered").expect("attr");

    let handle = install().expect("install");
    pointer(&span, "pointerenter");
    assert!(handle.is_visible());
    pointer(&span, "pointerleave");
    assert!(!handle.is_visible());
}

#[wasm_bindgen_test]
fn teardown_cancels_the_pending_frame() {
    let doc = document();
    let span = append(&doc, "span", "web-cancel");
    span.set_attribute("data-tooltip", "Cancelled").expect("attr");

    let handle = install().expect("install");
    focus_in(&span);
    assert!(handle.frame_pending());
    assert!(handle.teardown());
    assert!(!handle.frame_pending());
}

#[wasm_bindgen_test]
async fn freeing_the_handle_leaves_no_frame_behind() {
    let doc = document();
    let span = append(&doc, "span", "web-free");
    span.set_attribute("data-tooltip", "Freed").expect("attr");

    let handle = install().expect("install");
    let surface = doc
        .get_element_by_id(&handle.surface_id().expect("surface id"))
        .expect("surface");
    focus_in(&span);
    assert!(handle.frame_pending());
    drop(handle);

    // The cancelled callback never runs, so no positioning pass writes `left`.
    next_frame().await;
    next_frame().await;
    assert_eq!(inline_style(&surface, "left"), "");
    assert_eq!(surface.get_attribute("aria-hidden").as_deref(), Some("true"));
    assert_eq!(span.get_attribute("aria-describedby"), None);
}
