#![forbid(unsafe_code)]

//! Arena-backed in-memory document.
//!
//! [`MemoryDom`] implements every host trait deterministically:
//!
//! - Geometry is whatever the test sets. Elements without an explicit rect
//!   are laid out at their inline `left`/`top` with a size derived from
//!   their text (7 px per char + 16 px padding, 24 px tall) unless a natural
//!   size is set.
//! - Frame requests are counted, never run. The [`Harness`] pumps them.
//! - Insertions under the observed root are queued as records, like a
//!   `MutationObserver` batch, until taken.
//! - Every attribute write is appended to a journal so ordering can be
//!   asserted.
//!
//! [`Harness`]: crate::Harness

use tipwire::{DomHost, FrameScheduler, MutationSource, TooltipError};
use tipwire_core::geometry::{Rect, ScrollOffset, Size};

/// Width per character of derived natural sizes.
pub const CHAR_WIDTH: f64 = 7.0;
/// Horizontal padding of derived natural sizes.
pub const TEXT_PADDING: f64 = 16.0;
/// Height of derived natural sizes.
pub const LINE_HEIGHT: f64 = 24.0;

/// Handle into a [`MemoryDom`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The document node.
    pub const DOCUMENT: NodeId = NodeId(0);

    /// Arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Document,
    Element { tag: String },
    Text,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    text: String,
    rect: Option<Rect>,
    natural_size: Option<Size>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
            style: Vec::new(),
            text: String::new(),
            rect: None,
            natural_size: None,
        }
    }
}

/// One attribute write, in the order the host saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomChange {
    Set {
        node: NodeId,
        name: String,
        value: String,
    },
    Removed {
        node: NodeId,
        name: String,
    },
}

/// Deterministic document for tests.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    body: NodeId,
    viewport: Size,
    scroll: ScrollOffset,
    journal: Vec<DomChange>,
    pending_frames: usize,
    frame_requests: usize,
    fail_frames: bool,
    fail_create: bool,
    observed_root: Option<NodeId>,
    observe_calls: usize,
    stop_calls: usize,
    insertions: Vec<NodeId>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Viewport of a fresh document.
    pub const DEFAULT_VIEWPORT: Size = Size::new(1024.0, 768.0);

    /// Empty document with a `<body>` and a 1024x768 viewport.
    #[must_use]
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: vec![NodeData::new(NodeKind::Document)],
            body: NodeId::DOCUMENT,
            viewport: Self::DEFAULT_VIEWPORT,
            scroll: ScrollOffset::default(),
            journal: Vec::new(),
            pending_frames: 0,
            frame_requests: 0,
            fail_frames: false,
            fail_create: false,
            observed_root: None,
            observe_calls: 0,
            stop_calls: 0,
            insertions: Vec::new(),
        };
        let body = dom.element("body");
        dom.link(NodeId::DOCUMENT, body);
        dom.body = body;
        dom
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.index())
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.node(child).and_then(|n| n.parent) {
            if let Some(old) = self.node_mut(old) {
                old.children.retain(|c| *c != child);
            }
        }
        if let Some(data) = self.node_mut(child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.node_mut(parent) {
            data.children.push(child);
        }
    }

    // ── Building ────────────────────────────────────────────────────────

    /// The `<body>` element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element.
    pub fn element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::new(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
        }))
    }

    /// Create a detached text node.
    pub fn text_node(&mut self, content: &str) -> NodeId {
        let mut data = NodeData::new(NodeKind::Text);
        data.text = content.to_owned();
        self.alloc(data)
    }

    /// Append `child` under `parent`, moving it if already attached.
    ///
    /// Queues an insertion record when `parent` lies under the observed root.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.link(parent, child);
        let observed = self
            .observed_root
            .is_some_and(|root| self.contains(&root, &parent));
        if observed {
            self.insertions.push(child);
        }
    }

    /// Builder-style attribute write that bypasses the journal.
    pub fn with_attribute(&mut self, node: NodeId, name: &str, value: &str) -> NodeId {
        if let Some(data) = self.node_mut(node) {
            upsert(&mut data.attributes, name, value);
        }
        node
    }

    /// Fix the bounding rect of `node` (viewport coordinates).
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(data) = self.node_mut(node) {
            data.rect = Some(rect);
        }
    }

    /// Override the text-derived natural size of `node`.
    pub fn set_natural_size(&mut self, node: NodeId, size: Size) {
        if let Some(data) = self.node_mut(node) {
            data.natural_size = Some(size);
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn set_scroll(&mut self, scroll: ScrollOffset) {
        self.scroll = scroll;
    }

    /// Make subsequent `request_frame` calls fail.
    pub fn fail_frame_requests(&mut self, fail: bool) {
        self.fail_frames = fail;
    }

    /// Make subsequent `create_element` calls fail.
    pub fn fail_element_creation(&mut self, fail: bool) {
        self.fail_create = fail;
    }

    // ── Inspection ──────────────────────────────────────────────────────

    /// Attribute value as a borrowed string.
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)
            .and_then(|data| lookup(&data.attributes, name))
    }

    /// Inline style value, `None` when unset.
    #[must_use]
    pub fn style_of(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node).and_then(|data| lookup(&data.style, property))
    }

    /// Text content.
    #[must_use]
    pub fn text_of(&self, node: NodeId) -> &str {
        self.node(node).map_or("", |data| data.text.as_str())
    }

    /// Children of `node`.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |data| data.children.as_slice())
    }

    /// Elements carrying `class`, in document order.
    #[must_use]
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(NodeId::DOCUMENT, &mut |id, data| {
            let matches = lookup(&data.attributes, "class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class));
            if matches {
                out.push(id);
            }
        });
        out
    }

    /// Attribute writes so far.
    #[must_use]
    pub fn journal(&self) -> &[DomChange] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Frame callbacks requested and not yet taken.
    #[must_use]
    pub const fn pending_frames(&self) -> usize {
        self.pending_frames
    }

    /// Frame callbacks requested over the document's lifetime.
    #[must_use]
    pub const fn frame_requests(&self) -> usize {
        self.frame_requests
    }

    /// Consume one pending frame request.
    pub fn take_frame_request(&mut self) -> bool {
        if self.pending_frames == 0 {
            return false;
        }
        self.pending_frames -= 1;
        true
    }

    /// Root passed to `observe_insertions`, while observing.
    #[must_use]
    pub const fn observed_root(&self) -> Option<NodeId> {
        self.observed_root
    }

    #[must_use]
    pub const fn observe_calls(&self) -> usize {
        self.observe_calls
    }

    #[must_use]
    pub const fn stop_calls(&self) -> usize {
        self.stop_calls
    }

    /// Drain queued insertion records.
    pub fn take_insertions(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.insertions)
    }

    fn walk(&self, root: NodeId, visit: &mut impl FnMut(NodeId, &NodeData)) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(data) = self.node(id) else {
                continue;
            };
            visit(id, data);
            stack.extend(data.children.iter().rev().copied());
        }
    }

    fn natural_size(&self, data: &NodeData) -> Size {
        data.natural_size.unwrap_or_else(|| {
            let chars = data.text.chars().count() as f64;
            Size::new(chars * CHAR_WIDTH + TEXT_PADDING, LINE_HEIGHT)
        })
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn upsert(pairs: &mut Vec<(String, String)>, name: &str, value: &str) {
    match pairs.iter_mut().find(|(key, _)| key == name) {
        Some((_, existing)) => value.clone_into(existing),
        None => pairs.push((name.to_owned(), value.to_owned())),
    }
}

fn parse_px(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.strip_suffix("px"))
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.0)
}

impl DomHost for MemoryDom {
    type Node = NodeId;

    fn document_root(&self) -> NodeId {
        NodeId::DOCUMENT
    }

    fn is_element(&self, node: &NodeId) -> bool {
        matches!(
            self.node(*node).map(|d| &d.kind),
            Some(NodeKind::Element { .. })
        )
    }

    fn tag_name(&self, node: &NodeId) -> Option<String> {
        match &self.node(*node)?.kind {
            NodeKind::Element { tag } => Some(tag.clone()),
            _ => None,
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        if !self.is_element(node) {
            return None;
        }
        self.attr(*node, name).map(str::to_owned)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if !self.is_element(node) {
            return;
        }
        if let Some(data) = self.node_mut(*node) {
            upsert(&mut data.attributes, name, value);
        }
        self.journal.push(DomChange::Set {
            node: *node,
            name: name.to_owned(),
            value: value.to_owned(),
        });
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        let Some(data) = self.node_mut(*node) else {
            return;
        };
        let before = data.attributes.len();
        data.attributes.retain(|(key, _)| key != name);
        if data.attributes.len() != before {
            self.journal.push(DomChange::Removed {
                node: *node,
                name: name.to_owned(),
            });
        }
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.node(*node)?.parent
    }

    fn elements_with_attribute(&self, root: &NodeId, name: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(*root, &mut |id, data| {
            let is_element = matches!(data.kind, NodeKind::Element { .. });
            if is_element && lookup(&data.attributes, name).is_some() {
                out.push(id);
            }
        });
        out
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, TooltipError> {
        if self.fail_create {
            return Err(TooltipError::host(format!("createElement({tag}) refused")));
        }
        Ok(self.element(tag))
    }

    fn append_to_body(&mut self, node: &NodeId) -> Result<(), TooltipError> {
        if self.node(*node).is_none() {
            return Err(TooltipError::host(format!("unknown node {node:?}")));
        }
        let body = self.body;
        self.append_child(body, *node);
        Ok(())
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        if let Some(data) = self.node_mut(*node) {
            text.clone_into(&mut data.text);
        }
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        let Some(data) = self.node_mut(*node) else {
            return;
        };
        if value.is_empty() {
            data.style.retain(|(key, _)| key != property);
        } else {
            upsert(&mut data.style, property, value);
        }
    }

    fn style(&self, node: &NodeId, property: &str) -> String {
        self.style_of(*node, property).unwrap_or_default().to_owned()
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        let Some(data) = self.node(*node) else {
            return Rect::default();
        };
        if let Some(rect) = data.rect {
            return rect;
        }
        let left = parse_px(lookup(&data.style, "left")) - self.scroll.x;
        let top = parse_px(lookup(&data.style, "top")) - self.scroll.y;
        Rect::from_origin(left, top, self.natural_size(data))
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn scroll_offset(&self) -> ScrollOffset {
        self.scroll
    }
}

impl FrameScheduler for MemoryDom {
    fn request_frame(&mut self) -> Result<(), TooltipError> {
        if self.fail_frames {
            return Err(TooltipError::host("requestAnimationFrame unavailable"));
        }
        self.pending_frames += 1;
        self.frame_requests += 1;
        Ok(())
    }
}

impl MutationSource for MemoryDom {
    fn observe_insertions(&mut self, root: &NodeId) -> Result<(), TooltipError> {
        self.observe_calls += 1;
        self.observed_root = Some(*root);
        Ok(())
    }

    fn stop_observing(&mut self) {
        self.stop_calls += 1;
        self.observed_root = None;
        self.insertions.clear();
    }
}
