#![forbid(unsafe_code)]

//! `web-sys` host and the JS-facing API.
//!
//! The controller lives in an `Rc<RefCell<Option<_>>>` slot. Every browser
//! callback (listeners, `requestAnimationFrame`, `MutationObserver`) holds a
//! weak reference to that slot, so dropping the [`TooltipHandle`] frees the
//! controller even while closures are still registered.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Function};
use tipwire::{
    DomHost, FrameScheduler, MutationSource, TooltipConfig, TooltipController, TooltipError,
};
use tipwire_core::geometry::{Rect, ScrollOffset, Size};
use tipwire_core::logging::TARGET_WEB;
use tracing::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, FocusEvent, HtmlElement,
    KeyboardEvent, MouseEvent, MutationObserver, MutationObserverInit, MutationRecord, Node,
    Window,
};

use crate::bindings::{
    DYNAMIC_ELEMENT_CLASS, DYNAMIC_ELEMENT_TAG, DYNAMIC_ELEMENT_TEXT, DYNAMIC_TOOLTIP_TEXT,
    LISTENERS, ListenerTarget, RawEvent, attribute_selector, translate,
};

type Controller = TooltipController<WebHost>;
type Slot = RefCell<Option<Controller>>;

fn host_error(context: &str, err: &JsValue) -> TooltipError {
    let detail = err.as_string().unwrap_or_else(|| format!("{err:?}"));
    TooltipError::host(format!("{context}: {detail}"))
}

fn to_js(err: &TooltipError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn with_controller(slot: &Weak<Slot>, f: impl FnOnce(&mut Controller)) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let Ok(mut guard) = slot.try_borrow_mut() else {
        warn!(target: TARGET_WEB, "re-entrant browser callback dropped");
        return;
    };
    if let Some(controller) = guard.as_mut() {
        f(controller);
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// Live browser document as a tooltip host.
pub struct WebHost {
    window: Window,
    document: Document,
    frame_fn: Option<Function>,
    mutation_fn: Option<Function>,
    observer: Option<MutationObserver>,
    pending_frame: Option<i32>,
}

impl WebHost {
    fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            frame_fn: None,
            mutation_fn: None,
            observer: None,
            pending_frame: None,
        }
    }

    /// `requestAnimationFrame` id still outstanding.
    pub fn pending_frame(&self) -> Option<i32> {
        self.pending_frame
    }

    fn frame_fired(&mut self) {
        self.pending_frame = None;
    }

    /// Cancel the outstanding frame callback, so it cannot outlive the
    /// closure it points at.
    fn cancel_pending_frame(&mut self) {
        let Some(id) = self.pending_frame.take() else {
            return;
        };
        match self.window.cancel_animation_frame(id) {
            Ok(()) => trace!(target: TARGET_WEB, id, "animation frame cancelled"),
            Err(err) => {
                warn!(target: TARGET_WEB, id, error = ?err, "cancelAnimationFrame failed");
            }
        }
    }

    fn html_element(node: &Node) -> Option<&HtmlElement> {
        node.dyn_ref::<HtmlElement>()
    }
}

impl DomHost for WebHost {
    type Node = Node;

    fn document_root(&self) -> Node {
        self.document.clone().into()
    }

    fn is_element(&self, node: &Node) -> bool {
        node.dyn_ref::<Element>().is_some()
    }

    fn tag_name(&self, node: &Node) -> Option<String> {
        node.dyn_ref::<Element>()
            .map(|el| el.tag_name().to_ascii_lowercase())
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>()?.get_attribute(name)
    }

    fn has_attribute(&self, node: &Node, name: &str) -> bool {
        node.dyn_ref::<Element>()
            .is_some_and(|el| el.has_attribute(name))
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) {
        if let Some(el) = node.dyn_ref::<Element>() {
            if let Err(err) = el.set_attribute(name, value) {
                warn!(target: TARGET_WEB, attribute = name, error = ?err, "setAttribute failed");
            }
        }
    }

    fn remove_attribute(&mut self, node: &Node, name: &str) {
        if let Some(el) = node.dyn_ref::<Element>() {
            if let Err(err) = el.remove_attribute(name) {
                warn!(target: TARGET_WEB, attribute = name, error = ?err, "removeAttribute failed");
            }
        }
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn contains(&self, ancestor: &Node, node: &Node) -> bool {
        ancestor.contains(Some(node))
    }

    fn closest_with_attribute(&self, node: &Node, name: &str) -> Option<Node> {
        let el = node.dyn_ref::<Element>()?;
        el.closest(&attribute_selector(name)).ok().flatten().map(Into::into)
    }

    fn elements_with_attribute(&self, root: &Node, name: &str) -> Vec<Node> {
        let selector = attribute_selector(name);
        let mut out = Vec::new();
        let list = if let Some(el) = root.dyn_ref::<Element>() {
            if el.matches(&selector).unwrap_or(false) {
                out.push(root.clone());
            }
            el.query_selector_all(&selector)
        } else if let Some(doc) = root.dyn_ref::<Document>() {
            doc.query_selector_all(&selector)
        } else {
            return out;
        };
        match list {
            Ok(list) => {
                out.extend((0..list.length()).filter_map(|i| list.get(i)));
            }
            Err(err) => {
                warn!(
                    target: TARGET_WEB,
                    selector = %selector,
                    error = ?err,
                    "querySelectorAll failed"
                );
            }
        }
        out
    }

    fn create_element(&mut self, tag: &str) -> Result<Node, TooltipError> {
        self.document
            .create_element(tag)
            .map(Into::into)
            .map_err(|err| host_error("createElement", &err))
    }

    fn append_to_body(&mut self, node: &Node) -> Result<(), TooltipError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| TooltipError::host("document has no body"))?;
        body.append_child(node)
            .map(|_| ())
            .map_err(|err| host_error("appendChild", &err))
    }

    fn set_text(&mut self, node: &Node, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_style(&mut self, node: &Node, property: &str, value: &str) {
        let Some(el) = Self::html_element(node) else {
            return;
        };
        let style = el.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            warn!(target: TARGET_WEB, property, error = ?err, "style write failed");
        }
    }

    fn style(&self, node: &Node, property: &str) -> String {
        Self::html_element(node)
            .and_then(|el| el.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn bounding_rect(&self, node: &Node) -> Rect {
        node.dyn_ref::<Element>()
            .map(|el| {
                let rect = el.get_bounding_client_rect();
                Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
            })
            .unwrap_or_default()
    }

    fn viewport(&self) -> Size {
        self.document
            .document_element()
            .map(|root| Size::new(f64::from(root.client_width()), f64::from(root.client_height())))
            .unwrap_or_default()
    }

    fn scroll_offset(&self) -> ScrollOffset {
        ScrollOffset::new(
            self.window.scroll_x().unwrap_or(0.0),
            self.window.scroll_y().unwrap_or(0.0),
        )
    }
}

impl FrameScheduler for WebHost {
    fn request_frame(&mut self) -> Result<(), TooltipError> {
        let callback = self
            .frame_fn
            .as_ref()
            .ok_or_else(|| TooltipError::host("frame callback not bound"))?;
        let id = self
            .window
            .request_animation_frame(callback)
            .map_err(|err| host_error("requestAnimationFrame", &err))?;
        self.pending_frame = Some(id);
        Ok(())
    }
}

impl MutationSource for WebHost {
    fn observe_insertions(&mut self, root: &Node) -> Result<(), TooltipError> {
        let callback = self
            .mutation_fn
            .as_ref()
            .ok_or_else(|| TooltipError::host("mutation callback not bound"))?;
        let observer =
            MutationObserver::new(callback).map_err(|err| host_error("MutationObserver", &err))?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(root, &init)
            .map_err(|err| host_error("MutationObserver.observe", &err))?;
        self.observer = Some(observer);
        Ok(())
    }

    fn stop_observing(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
            debug!(target: TARGET_WEB, "mutation observer disconnected");
        }
        self.cancel_pending_frame();
    }
}

// ---------------------------------------------------------------------------
// JS API
// ---------------------------------------------------------------------------

struct Listener {
    target: EventTarget,
    event: &'static str,
    capture: bool,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn detach(&self) {
        let callback: &Function = self.closure.as_ref().unchecked_ref();
        let result = if self.capture {
            self.target
                .remove_event_listener_with_callback_and_bool(self.event, callback, true)
        } else {
            self.target
                .remove_event_listener_with_callback(self.event, callback)
        };
        if let Err(err) = result {
            warn!(
                target: TARGET_WEB,
                event = self.event,
                error = ?err,
                "removeEventListener failed"
            );
        }
    }
}

/// Installed tooltip controller. Dropping it (or calling `free()` from JS)
/// removes every listener and tears the controller down.
#[wasm_bindgen]
pub struct TooltipHandle {
    slot: Rc<Slot>,
    document: Document,
    listeners: Vec<Listener>,
    _frame: Closure<dyn FnMut(f64)>,
    _mutations: Closure<dyn FnMut(Array, MutationObserver)>,
}

fn raw_event(event: &Event) -> RawEvent<Node> {
    let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
    let related = event
        .dyn_ref::<MouseEvent>()
        .and_then(MouseEvent::related_target)
        .or_else(|| event.dyn_ref::<FocusEvent>().and_then(FocusEvent::related_target))
        .and_then(|t| t.dyn_into::<Node>().ok());
    let key = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key);
    RawEvent {
        target,
        related,
        key,
    }
}

fn added_nodes(records: &Array) -> Vec<Node> {
    let mut nodes = Vec::new();
    for record in records.iter() {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            continue;
        };
        let added = record.added_nodes();
        nodes.extend((0..added.length()).filter_map(|i| added.get(i)));
    }
    nodes
}

fn install_into(config: TooltipConfig) -> Result<TooltipHandle, TooltipError> {
    let window = web_sys::window().ok_or_else(|| TooltipError::host("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| TooltipError::host("no document"))?;
    let slot: Rc<Slot> = Rc::new(RefCell::new(None));

    let weak = Rc::downgrade(&slot);
    let frame = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
        with_controller(&weak, |controller| {
            controller.host_mut().frame_fired();
            controller.on_frame();
        });
    });

    let weak = Rc::downgrade(&slot);
    let mutations = Closure::<dyn FnMut(Array, MutationObserver)>::new(
        move |records: Array, _observer: MutationObserver| {
            let nodes = added_nodes(&records);
            if nodes.is_empty() {
                return;
            }
            with_controller(&weak, |controller| {
                let transition = controller.handle(tipwire::TooltipEvent::NodesInserted(nodes));
                trace!(target: TARGET_WEB, ?transition, "insertions handled");
            });
        },
    );

    let mut host = WebHost::new(window.clone(), document.clone());
    host.frame_fn = Some(frame.as_ref().unchecked_ref::<Function>().clone());
    host.mutation_fn = Some(mutations.as_ref().unchecked_ref::<Function>().clone());

    let controller = TooltipController::install(host, config)?;
    *slot.borrow_mut() = Some(controller);

    let mut listeners = Vec::with_capacity(LISTENERS.len());
    for spec in LISTENERS {
        let target: EventTarget = match spec.target {
            ListenerTarget::Document => document.clone().into(),
            ListenerTarget::Window => window.clone().into(),
        };
        let weak = Rc::downgrade(&slot);
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(tooltip_event) = translate(spec.kind, raw_event(&event)) else {
                return;
            };
            with_controller(&weak, |controller| {
                let transition = controller.handle(tooltip_event);
                trace!(target: TARGET_WEB, event = spec.event, ?transition, "event handled");
            });
        });

        let options = AddEventListenerOptions::new();
        options.set_capture(spec.capture);
        options.set_passive(spec.passive);
        let added = target.add_event_listener_with_callback_and_add_event_listener_options(
            spec.event,
            closure.as_ref().unchecked_ref(),
            &options,
        );
        if let Err(err) = added {
            release(&slot, &listeners);
            return Err(host_error("addEventListener", &err));
        }
        listeners.push(Listener {
            target,
            event: spec.event,
            capture: spec.capture,
            closure,
        });
    }

    debug!(target: TARGET_WEB, listeners = listeners.len(), "tooltip binding installed");
    Ok(TooltipHandle {
        slot,
        document,
        listeners,
        _frame: frame,
        _mutations: mutations,
    })
}

/// Install tooltips on the current document with the default config.
#[wasm_bindgen]
pub fn install() -> Result<TooltipHandle, JsValue> {
    install_into(TooltipConfig::default()).map_err(|err| to_js(&err))
}

/// Install with a JSON config (see `TooltipConfig` for the fields).
#[wasm_bindgen(js_name = installWithConfig)]
pub fn install_with_config(json: &str) -> Result<TooltipHandle, JsValue> {
    let config =
        TooltipConfig::from_json_str(json).map_err(|err| to_js(&TooltipError::from(err)))?;
    install_into(config).map_err(|err| to_js(&err))
}

#[wasm_bindgen]
impl TooltipHandle {
    /// Wire a button that inserts a new trigger into `container_id` on click.
    ///
    /// Returns `false` when no element has id `button_id`.
    #[wasm_bindgen(js_name = attachAddButton)]
    pub fn attach_add_button(
        &mut self,
        button_id: &str,
        container_id: &str,
    ) -> Result<bool, JsValue> {
        let Some(button) = self.document.get_element_by_id(button_id) else {
            return Ok(false);
        };
        let trigger_attribute = self
            .slot
            .borrow()
            .as_ref()
            .map(|controller| controller.config().trigger_attribute.clone())
            .ok_or_else(|| to_js(&TooltipError::host("tooltip controller released")))?;

        let document = self.document.clone();
        let container_id = container_id.to_owned();
        let weak = Rc::downgrade(&self.slot);
        let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let span = match document.create_element(DYNAMIC_ELEMENT_TAG) {
                Ok(span) => span,
                Err(err) => {
                    warn!(target: TARGET_WEB, error = ?err, "createElement failed");
                    return;
                }
            };
            span.set_class_name(DYNAMIC_ELEMENT_CLASS);
            if let Err(err) = span.set_attribute(&trigger_attribute, DYNAMIC_TOOLTIP_TEXT) {
                warn!(target: TARGET_WEB, error = ?err, "setAttribute failed");
            }
            span.set_text_content(Some(DYNAMIC_ELEMENT_TEXT));
            if let Some(container) = document.get_element_by_id(&container_id) {
                if let Err(err) = container.append_child(&span) {
                    warn!(target: TARGET_WEB, error = ?err, "appendChild failed");
                }
            }
            let node: Node = span.into();
            with_controller(&weak, |controller| {
                controller.ensure_focusable(&node);
            });
        });

        let target: EventTarget = button.into();
        target
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(|err| to_js(&host_error("addEventListener", &err)))?;
        self.listeners.push(Listener {
            target,
            event: "click",
            capture: false,
            closure,
        });
        Ok(true)
    }

    /// Whether the tooltip is showing.
    #[wasm_bindgen(js_name = isVisible)]
    pub fn is_visible(&self) -> bool {
        self.slot
            .borrow()
            .as_ref()
            .is_some_and(TooltipController::is_visible)
    }

    /// Id of the surface element.
    #[wasm_bindgen(js_name = surfaceId)]
    pub fn surface_id(&self) -> Option<String> {
        self.slot
            .borrow()
            .as_ref()
            .map(|controller| controller.surface().id().to_owned())
    }

    /// Whether an animation frame callback is outstanding.
    #[wasm_bindgen(js_name = framePending)]
    pub fn frame_pending(&self) -> bool {
        self.slot
            .borrow()
            .as_ref()
            .is_some_and(|controller| controller.host().pending_frame().is_some())
    }

    /// Stop observing, cancel any pending frame and hide. Listeners stay
    /// attached but go quiet.
    pub fn teardown(&self) -> bool {
        self.slot
            .borrow_mut()
            .as_mut()
            .is_some_and(TooltipController::teardown)
    }
}

/// Detach `listeners` and drop the controller, whose teardown disconnects
/// the observer and cancels any pending frame. Runs before the closures the
/// browser holds references to are freed.
fn release(slot: &Slot, listeners: &[Listener]) {
    for listener in listeners {
        listener.detach();
    }
    match slot.try_borrow_mut() {
        Ok(mut slot) => {
            if let Some(mut controller) = slot.take() {
                controller.teardown();
                controller.host_mut().cancel_pending_frame();
            }
        }
        Err(_) => warn!(target: TARGET_WEB, "controller busy during release"),
    }
}

impl Drop for TooltipHandle {
    fn drop(&mut self) {
        release(&self.slot, &self.listeners);
    }
}
