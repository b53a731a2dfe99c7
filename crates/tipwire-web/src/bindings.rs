#![forbid(unsafe_code)]

//! Browser event wiring, independent of `web-sys`.
//!
//! The listener table says which DOM events the binding subscribes to, on
//! which target, and with which options. [`translate`] turns the pieces the
//! browser hands a listener into a [`TooltipEvent`]. Both are plain data and
//! are tested natively; `wasm.rs` only does the `web-sys` plumbing.
//!
//! | event | target | capture | passive |
//! |---|---|---|---|
//! | `pointerenter` | document | yes | no |
//! | `pointerleave` | document | yes | no |
//! | `focusin` | document | no | no |
//! | `focusout` | document | no | no |
//! | `keydown` | document | no | no |
//! | `scroll` | window | no | yes |
//! | `resize` | window | no | no |
//! | `unload` | window | no | no |
//!
//! `pointerenter`/`pointerleave` do not bubble, hence capture on the
//! document to see them for every descendant.

use tipwire::{Key, TooltipEvent};

/// Element the add-button collaborator inserts.
pub const DYNAMIC_ELEMENT_TAG: &str = "span";
/// Class of the inserted element.
pub const DYNAMIC_ELEMENT_CLASS: &str = "dynamic";
/// Tooltip text of the inserted element.
pub const DYNAMIC_TOOLTIP_TEXT: &str = "Dynamically added tooltip description";
/// Visible text of the inserted element.
pub const DYNAMIC_ELEMENT_TEXT: &str = "Dynamically added element";

/// Where a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerTarget {
    Document,
    Window,
}

/// Which [`TooltipEvent`] a listener produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEventKind {
    PointerEnter,
    PointerLeave,
    FocusIn,
    FocusOut,
    KeyDown,
    Scroll,
    Resize,
    Unload,
}

/// One `addEventListener` registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerSpec {
    /// DOM event type.
    pub event: &'static str,
    pub target: ListenerTarget,
    pub capture: bool,
    pub passive: bool,
    pub kind: DomEventKind,
}

const fn spec(
    event: &'static str,
    target: ListenerTarget,
    capture: bool,
    passive: bool,
    kind: DomEventKind,
) -> ListenerSpec {
    ListenerSpec {
        event,
        target,
        capture,
        passive,
        kind,
    }
}

/// Every listener the binding installs.
pub const LISTENERS: [ListenerSpec; 8] = [
    spec("pointerenter", ListenerTarget::Document, true, false, DomEventKind::PointerEnter),
    spec("pointerleave", ListenerTarget::Document, true, false, DomEventKind::PointerLeave),
    spec("focusin", ListenerTarget::Document, false, false, DomEventKind::FocusIn),
    spec("focusout", ListenerTarget::Document, false, false, DomEventKind::FocusOut),
    spec("keydown", ListenerTarget::Document, false, false, DomEventKind::KeyDown),
    spec("scroll", ListenerTarget::Window, false, true, DomEventKind::Scroll),
    spec("resize", ListenerTarget::Window, false, false, DomEventKind::Resize),
    spec("unload", ListenerTarget::Window, false, false, DomEventKind::Unload),
];

/// Raw listener arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent<N> {
    /// `event.target`, when it is a node.
    pub target: Option<N>,
    /// `event.relatedTarget`, when it is a node.
    pub related: Option<N>,
    /// `event.key` for keyboard events.
    pub key: Option<String>,
}

impl<N> Default for RawEvent<N> {
    fn default() -> Self {
        Self {
            target: None,
            related: None,
            key: None,
        }
    }
}

/// Build the controller event for a listener of `kind`.
///
/// `None` when the browser event lacks what the kind needs (a pointer event
/// whose target is not a node, a key event without a key).
pub fn translate<N>(kind: DomEventKind, raw: RawEvent<N>) -> Option<TooltipEvent<N>> {
    let RawEvent {
        target,
        related,
        key,
    } = raw;
    let event = match kind {
        DomEventKind::PointerEnter => TooltipEvent::PointerEnter { target: target? },
        DomEventKind::PointerLeave => TooltipEvent::PointerLeave {
            target: target?,
            related,
        },
        DomEventKind::FocusIn => TooltipEvent::FocusIn { target: target? },
        DomEventKind::FocusOut => TooltipEvent::FocusOut {
            target: target?,
            related,
        },
        DomEventKind::KeyDown => TooltipEvent::KeyDown {
            key: Key::from_dom(&key?),
        },
        DomEventKind::Scroll => TooltipEvent::Scroll,
        DomEventKind::Resize => TooltipEvent::Resize,
        DomEventKind::Unload => TooltipEvent::Unload,
    };
    Some(event)
}

/// CSS selector matching elements that carry `attribute`.
#[must_use]
pub fn attribute_selector(attribute: &str) -> String {
    format!("[{attribute}]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn listener_table_has_one_entry_per_kind() {
        let kinds = [
            DomEventKind::PointerEnter,
            DomEventKind::PointerLeave,
            DomEventKind::FocusIn,
            DomEventKind::FocusOut,
            DomEventKind::KeyDown,
            DomEventKind::Scroll,
            DomEventKind::Resize,
            DomEventKind::Unload,
        ];
        for kind in kinds {
            assert_eq!(LISTENERS.iter().filter(|l| l.kind == kind).count(), 1, "{kind:?}");
        }
    }

    #[test]
    fn pointer_listeners_capture_and_scroll_is_passive() {
        for listener in LISTENERS {
            let pointer = listener.event.starts_with("pointer");
            assert_eq!(listener.capture, pointer, "{}", listener.event);
            assert_eq!(listener.passive, listener.event == "scroll", "{}", listener.event);
            let on_window = matches!(listener.event, "scroll" | "resize" | "unload");
            assert_eq!(
                listener.target == ListenerTarget::Window,
                on_window,
                "{}",
                listener.event
            );
        }
    }

    #[test]
    fn translate_requires_node_targets() {
        assert_eq!(translate::<u32>(DomEventKind::PointerEnter, RawEvent::default()), None);
        assert_eq!(
            translate(
                DomEventKind::PointerEnter,
                RawEvent {
                    target: Some(7u32),
                    ..RawEvent::default()
                }
            ),
            Some(TooltipEvent::PointerEnter { target: 7 })
        );
        assert_eq!(
            translate(
                DomEventKind::FocusOut,
                RawEvent {
                    target: Some(1u32),
                    related: Some(2),
                    key: None,
                }
            ),
            Some(TooltipEvent::FocusOut {
                target: 1,
                related: Some(2)
            })
        );
    }

    #[test]
    fn translate_keys_and_window_events() {
        assert_eq!(
            translate::<u32>(
                DomEventKind::KeyDown,
                RawEvent {
                    key: Some("Escape".into()),
                    ..RawEvent::default()
                }
            ),
            Some(TooltipEvent::KeyDown { key: Key::Escape })
        );
        assert_eq!(translate::<u32>(DomEventKind::KeyDown, RawEvent::default()), None);
        assert_eq!(
            translate::<u32>(DomEventKind::Scroll, RawEvent::default()),
            Some(TooltipEvent::Scroll)
        );
        assert_eq!(
            translate::<u32>(DomEventKind::Unload, RawEvent::default()),
            Some(TooltipEvent::Unload)
        );
    }

    #[test]
    fn selector_wraps_attribute() {
        assert_eq!(attribute_selector("data-tooltip"), "[data-tooltip]");
    }
}
