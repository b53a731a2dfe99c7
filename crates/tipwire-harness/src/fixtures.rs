#![forbid(unsafe_code)]

//! Reference pages.
//!
//! [`demo_page`] builds a small document covering every kind of trigger the
//! controller distinguishes. Geometry is fixed so placement results are
//! reproducible.

use tipwire_core::geometry::Rect;

use crate::dom::{MemoryDom, NodeId};

/// Text of the element the add-button collaborator inserts.
pub const DYNAMIC_TOOLTIP_TEXT: &str = "Dynamically added tooltip description";

/// Handles into [`demo_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoPage {
    /// `<button data-tooltip="Save file">` in the middle of the page.
    pub save: NodeId,
    /// `<span data-tooltip="Corner" data-placement="top">` at the top-left.
    pub corner: NodeId,
    /// `<div data-tooltip="Card" data-placement="bottom" tabindex="-1">` with
    /// a `<strong>` child and a text child.
    pub card: NodeId,
    /// Child element of `card`.
    pub card_label: NodeId,
    /// Text node inside `card`.
    pub card_text: NodeId,
    /// `<a data-tooltip="Docs" href="/docs">`.
    pub link: NodeId,
    /// `<a data-tooltip="Anchor">` without `href`.
    pub bare_anchor: NodeId,
    /// `<span data-tooltip="">`.
    pub empty: NodeId,
    /// `<p>` without a tooltip.
    pub plain: NodeId,
    /// `<div id="container">` for dynamic content.
    pub container: NodeId,
}

/// Build the reference page.
#[must_use]
pub fn demo_page() -> (MemoryDom, DemoPage) {
    let mut dom = MemoryDom::new();
    let body = dom.body();

    let save = trigger(&mut dom, body, "button", "Save file");
    dom.set_rect(save, Rect::new(480.0, 360.0, 80.0, 32.0));

    let corner = trigger(&mut dom, body, "span", "Corner");
    dom.with_attribute(corner, "data-placement", "top");
    dom.set_rect(corner, Rect::new(0.0, 0.0, 40.0, 40.0));

    let card = trigger(&mut dom, body, "div", "Card");
    dom.with_attribute(card, "data-placement", "bottom");
    dom.with_attribute(card, "tabindex", "-1");
    dom.set_rect(card, Rect::new(200.0, 500.0, 240.0, 120.0));
    let card_label = dom.element("strong");
    dom.append_child(card, card_label);
    let card_text = dom.text_node("details");
    dom.append_child(card, card_text);

    let link = trigger(&mut dom, body, "a", "Docs");
    dom.with_attribute(link, "href", "/docs");
    dom.set_rect(link, Rect::new(700.0, 100.0, 60.0, 20.0));

    let bare_anchor = trigger(&mut dom, body, "a", "Anchor");
    dom.set_rect(bare_anchor, Rect::new(700.0, 200.0, 60.0, 20.0));

    let empty = trigger(&mut dom, body, "span", "");

    let plain = dom.element("p");
    dom.append_child(body, plain);

    let container = dom.element("div");
    dom.with_attribute(container, "id", "container");
    dom.append_child(body, container);

    let page = DemoPage {
        save,
        corner,
        card,
        card_label,
        card_text,
        link,
        bare_anchor,
        empty,
        plain,
        container,
    };
    (dom, page)
}

/// Append `<tag data-tooltip=text>` under `parent`.
pub fn trigger(dom: &mut MemoryDom, parent: NodeId, tag: &str, text: &str) -> NodeId {
    let node = dom.element(tag);
    dom.with_attribute(node, "data-tooltip", text);
    dom.append_child(parent, node);
    node
}

/// Detached `<span class="dynamic">` like the add-button collaborator builds.
pub fn dynamic_span(dom: &mut MemoryDom) -> NodeId {
    let span = dom.element("span");
    dom.with_attribute(span, "class", "dynamic");
    dom.with_attribute(span, "data-tooltip", DYNAMIC_TOOLTIP_TEXT);
    span
}
