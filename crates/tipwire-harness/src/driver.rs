#![forbid(unsafe_code)]

//! Event driver over a [`MemoryDom`].
//!
//! [`Harness`] owns a controller installed into a [`MemoryDom`] and plays
//! the browser's part: it turns test actions into [`TooltipEvent`]s,
//! forwards insertion records, and fires frame callbacks on demand.

use tipwire::{
    Key, PlacementOutcome, TooltipConfig, TooltipController, TooltipError, TooltipEvent,
    Transition,
};
use tipwire_core::geometry::{ScrollOffset, Size};
use tipwire_core::logging::TARGET_HARNESS;

use crate::dom::{MemoryDom, NodeId};

/// Surface id seed used by [`Harness::new`], so ids are reproducible.
pub const HARNESS_SEED: u64 = 0x7157_0001;

/// Controller plus in-memory document.
#[derive(Debug)]
pub struct Harness {
    controller: TooltipController<MemoryDom>,
}

impl Harness {
    /// Install with the default config.
    pub fn new(dom: MemoryDom) -> Result<Self, TooltipError> {
        Self::with_config(dom, TooltipConfig::default())
    }

    /// Install with `config`.
    pub fn with_config(dom: MemoryDom, config: TooltipConfig) -> Result<Self, TooltipError> {
        let controller = TooltipController::install_with_seed(dom, config, HARNESS_SEED)?;
        Ok(Self { controller })
    }

    #[must_use]
    pub fn controller(&self) -> &TooltipController<MemoryDom> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TooltipController<MemoryDom> {
        &mut self.controller
    }

    #[must_use]
    pub fn dom(&self) -> &MemoryDom {
        self.controller.host()
    }

    pub fn dom_mut(&mut self) -> &mut MemoryDom {
        self.controller.host_mut()
    }

    /// Surface element.
    #[must_use]
    pub fn surface(&self) -> NodeId {
        *self.controller.surface().node()
    }

    /// Surface attribute, read back from the document.
    #[must_use]
    pub fn surface_attr(&self, name: &str) -> Option<&str> {
        self.dom().attr(self.surface(), name)
    }

    /// Deliver a raw event.
    pub fn dispatch(&mut self, event: TooltipEvent<NodeId>) -> Transition {
        let transition = self.controller.handle(event);
        tracing::trace!(target: TARGET_HARNESS, ?transition, "event dispatched");
        transition
    }

    pub fn pointer_enter(&mut self, target: NodeId) -> Transition {
        self.dispatch(TooltipEvent::PointerEnter { target })
    }

    pub fn pointer_leave(&mut self, target: NodeId, related: Option<NodeId>) -> Transition {
        self.dispatch(TooltipEvent::PointerLeave { target, related })
    }

    pub fn focus_in(&mut self, target: NodeId) -> Transition {
        self.dispatch(TooltipEvent::FocusIn { target })
    }

    pub fn focus_out(&mut self, target: NodeId, related: Option<NodeId>) -> Transition {
        self.dispatch(TooltipEvent::FocusOut { target, related })
    }

    /// Key press by DOM `key` value.
    pub fn key(&mut self, key: &str) -> Transition {
        self.dispatch(TooltipEvent::KeyDown {
            key: Key::from_dom(key),
        })
    }

    /// Scroll the page to `(x, y)` and report it.
    pub fn scroll_to(&mut self, x: f64, y: f64) -> Transition {
        self.dom_mut().set_scroll(ScrollOffset::new(x, y));
        self.dispatch(TooltipEvent::Scroll)
    }

    /// Resize the viewport and report it.
    pub fn resize(&mut self, width: f64, height: f64) -> Transition {
        self.dom_mut().set_viewport(Size::new(width, height));
        self.dispatch(TooltipEvent::Resize)
    }

    pub fn unload(&mut self) -> Transition {
        self.dispatch(TooltipEvent::Unload)
    }

    /// Append `child` under `parent` and deliver any insertion records.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Transition {
        self.dom_mut().append_child(parent, child);
        self.flush_insertions()
    }

    /// Deliver queued insertion records as one batch.
    pub fn flush_insertions(&mut self) -> Transition {
        let inserted = self.dom_mut().take_insertions();
        if inserted.is_empty() {
            return Transition::Ignored;
        }
        self.dispatch(TooltipEvent::NodesInserted(inserted))
    }

    /// Fire one pending frame callback, if any.
    pub fn run_frame(&mut self) -> Option<PlacementOutcome> {
        if !self.dom_mut().take_frame_request() {
            return None;
        }
        self.controller.on_frame()
    }

    /// Fire frame callbacks until none are pending. Returns how many ran.
    pub fn run_frames(&mut self) -> usize {
        let mut fired = 0;
        while self.dom_mut().take_frame_request() {
            self.controller.on_frame();
            fired += 1;
        }
        fired
    }
}
