#![forbid(unsafe_code)]

//! Tooltip lifecycle engine.
//!
//! # Role
//! [`TooltipController`] owns the one tooltip surface and the one
//! active-trigger reference for a document. Hosts feed it
//! [`TooltipEvent`]s and call [`TooltipController::on_frame`] when a
//! requested frame fires; everything else happens synchronously inside
//! [`TooltipController::handle`].
//!
//! # States
//! ```text
//!            show(e)                       show(e2), e2 != e
//!   Hidden ──────────▶ Visible(e) ─────────────────────────▶ Visible(e2)
//!     ▲                   │          (hide(e) runs first)
//!     └───────────────────┘
//!   leave / focus out / Escape / teardown
//! ```
//!
//! The active trigger is set if and only if the surface is visible. A switch
//! between triggers fully hides the old one (association removed) before the
//! new one is described.
//!
//! # Positioning
//! Shows, scrolls and resizes request a frame through [`FrameGate`]; repeated
//! requests before the frame fires are absorbed. The frame callback reads the
//! trigger that is active *at fire time*, so a pass that fires after a hide
//! is a no-op.

use tipwire_core::config::{TooltipConfig, entropy_seed};
use tipwire_core::frame::{FrameGate, FrameStats};
use tipwire_core::logging::{TARGET_LIFECYCLE, TARGET_PLACEMENT};
use tipwire_core::placement::{Placement, PlacementEngine, PlacementOutcome, PlacementRequest};

use crate::error::TooltipError;
use crate::event::{Key, TooltipEvent};
use crate::focusable::{FocusNormalizer, FocusOutcome, NormalizeReport, ensure_focusable};
use crate::host::TooltipHost;
use crate::surface::{ARIA_DESCRIBEDBY, TooltipSurface};
use crate::watch::MutationWatch;

/// Observable result of [`TooltipController::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `Hidden -> Visible`.
    Shown,
    /// Show on the already-active trigger: text and placement rewritten.
    Refreshed,
    /// `Visible(a) -> Hidden -> Visible(b)`.
    Switched,
    /// `Visible -> Hidden`.
    Hidden,
    /// A positioning pass was requested (or coalesced into a pending one).
    Scheduled,
    /// Inserted nodes were normalised; the count is `tabindex` assignments.
    Normalized(usize),
    /// Insertion observation stopped.
    TornDown,
    /// Nothing changed.
    Ignored,
}

#[derive(Debug, Clone)]
struct ActiveTrigger<N> {
    node: N,
    requested: Placement,
}

/// Owns the tooltip surface and drives it from host events.
pub struct TooltipController<H: TooltipHost> {
    host: H,
    config: TooltipConfig,
    engine: PlacementEngine,
    normalizer: FocusNormalizer,
    surface: TooltipSurface<H::Node>,
    active: Option<ActiveTrigger<H::Node>>,
    frames: FrameGate,
    watch: MutationWatch,
    torn_down: bool,
}

impl<H: TooltipHost> core::fmt::Debug for TooltipController<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TooltipController")
            .field("surface", &self.surface)
            .field("active", &self.active.as_ref().map(|a| &a.node))
            .field("frames", &self.frames)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl<H: TooltipHost> TooltipController<H> {
    /// Install with a wall-clock seed for the surface id.
    pub fn install(host: H, config: TooltipConfig) -> Result<Self, TooltipError> {
        Self::install_with_seed(host, config, entropy_seed())
    }

    /// Install into `host`.
    ///
    /// Validates `config`, creates and appends the surface, makes every
    /// existing trigger focusable and starts observing insertions.
    pub fn install_with_seed(
        mut host: H,
        config: TooltipConfig,
        seed: u64,
    ) -> Result<Self, TooltipError> {
        let config = config.validated()?;
        let surface = TooltipSurface::install(&mut host, &config, seed)?;
        let normalizer = FocusNormalizer::new(config.trigger_attribute.clone());
        let root = host.document_root();
        let report = normalizer.normalize_subtree(&mut host, &root);
        let watch = MutationWatch::start(&mut host, &root).inspect_err(|err| {
            tracing::warn!(target: TARGET_LIFECYCLE, error = %err, "insertion observer failed");
        })?;

        tracing::debug!(
            target: TARGET_LIFECYCLE,
            surface_id = surface.id(),
            triggers = report.triggers,
            assigned = report.assigned,
            "tooltip controller installed"
        );

        Ok(Self {
            engine: PlacementEngine::new(config.placement_config()),
            host,
            config,
            normalizer,
            surface,
            active: None,
            frames: FrameGate::new(),
            watch,
            torn_down: false,
        })
    }

    /// Apply one host event.
    pub fn handle(&mut self, event: TooltipEvent<H::Node>) -> Transition {
        if self.torn_down {
            tracing::trace!(target: TARGET_LIFECYCLE, "event after teardown ignored");
            return Transition::Ignored;
        }
        match event {
            TooltipEvent::PointerEnter { target } | TooltipEvent::FocusIn { target } => {
                match self.host.closest_with_attribute(&target, &self.config.trigger_attribute) {
                    Some(trigger) => self.show(trigger),
                    None => Transition::Ignored,
                }
            }
            TooltipEvent::PointerLeave { target, related }
            | TooltipEvent::FocusOut { target, related } => self.leave(&target, related.as_ref()),
            TooltipEvent::KeyDown { key: Key::Escape } => {
                if self.hide() {
                    Transition::Hidden
                } else {
                    Transition::Ignored
                }
            }
            TooltipEvent::KeyDown { key: Key::Other(_) } => Transition::Ignored,
            TooltipEvent::Scroll | TooltipEvent::Resize => {
                if self.active.is_some() {
                    self.schedule_position();
                    Transition::Scheduled
                } else {
                    Transition::Ignored
                }
            }
            TooltipEvent::NodesInserted(nodes) => {
                let assigned = nodes
                    .iter()
                    .map(|node| self.normalizer.normalize_subtree(&mut self.host, node).assigned)
                    .sum();
                Transition::Normalized(assigned)
            }
            TooltipEvent::Unload => {
                if self.teardown() {
                    Transition::TornDown
                } else {
                    Transition::Ignored
                }
            }
        }
    }

    fn show(&mut self, trigger: H::Node) -> Transition {
        let text = match self.host.attribute(&trigger, &self.config.trigger_attribute) {
            Some(text) if !text.is_empty() => text,
            _ => {
                tracing::trace!(target: TARGET_LIFECYCLE, "trigger without text ignored");
                return Transition::Ignored;
            }
        };
        let requested = self.requested_placement(&trigger);

        let same_trigger = self.active.as_ref().map(|active| active.node == trigger);
        let transition = match same_trigger {
            Some(true) => Transition::Refreshed,
            Some(false) => {
                self.hide();
                Transition::Switched
            }
            None => Transition::Shown,
        };

        self.surface.show(&mut self.host, &text, requested);
        self.host
            .set_attribute(&trigger, ARIA_DESCRIBEDBY, self.surface.id());
        self.active = Some(ActiveTrigger {
            node: trigger,
            requested,
        });
        self.schedule_position();

        tracing::debug!(
            target: TARGET_LIFECYCLE,
            transition = ?transition,
            placement = %requested,
            text = %text,
            "tooltip shown"
        );
        transition
    }

    fn leave(&mut self, target: &H::Node, related: Option<&H::Node>) -> Transition {
        let Some(from) = self
            .host
            .closest_with_attribute(target, &self.config.trigger_attribute)
        else {
            return Transition::Ignored;
        };
        if related.is_some_and(|related| self.host.contains(&from, related)) {
            return Transition::Ignored;
        }
        let is_active = self.active.as_ref().is_some_and(|active| active.node == from);
        if is_active && self.hide() {
            Transition::Hidden
        } else {
            Transition::Ignored
        }
    }

    /// Hide the tooltip and clear the association. Returns whether anything
    /// was visible.
    pub fn hide(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        self.surface.hide(&mut self.host);
        self.host.remove_attribute(&active.node, ARIA_DESCRIBEDBY);
        tracing::debug!(target: TARGET_LIFECYCLE, "tooltip hidden");
        true
    }

    fn requested_placement(&self, trigger: &H::Node) -> Placement {
        self.host
            .attribute(trigger, &self.config.placement_attribute)
            .and_then(|value| Placement::parse(&value))
            .unwrap_or(self.config.default_placement)
    }

    /// Request a positioning pass at the next frame.
    ///
    /// When the host cannot schedule one the pass runs immediately instead.
    pub fn schedule_position(&mut self) {
        if !self.frames.request() {
            tracing::trace!(target: TARGET_LIFECYCLE, "frame request coalesced");
            return;
        }
        if let Err(err) = self.host.request_frame() {
            tracing::warn!(
                target: TARGET_LIFECYCLE,
                error = %err,
                "frame request failed, positioning synchronously"
            );
            self.frames.begin_frame();
            self.position();
        }
    }

    /// Frame callback. Runs the pending positioning pass, if any trigger is
    /// still active.
    pub fn on_frame(&mut self) -> Option<PlacementOutcome> {
        self.frames.begin_frame();
        if self.torn_down {
            return None;
        }
        self.position()
    }

    /// Measure and place the surface next to the active trigger.
    ///
    /// No-op without an active trigger.
    pub fn position(&mut self) -> Option<PlacementOutcome> {
        let (trigger, preferred) = match &self.active {
            Some(active) => (active.node.clone(), active.requested),
            None => {
                tracing::trace!(target: TARGET_PLACEMENT, "no active trigger, pass skipped");
                return None;
            }
        };

        let measurement = self.surface.begin_measure(&mut self.host);
        let request = PlacementRequest {
            anchor: self.host.bounding_rect(&trigger),
            tooltip: measurement.size,
            viewport: self.host.viewport(),
            preferred,
        };
        let outcome = self.engine.resolve(&request);
        let page_rect = outcome.rect.offset_by(self.host.scroll_offset());
        self.surface
            .finish_measure(&mut self.host, measurement, page_rect, outcome.placement);

        tracing::debug!(
            target: TARGET_PLACEMENT,
            preferred = %preferred,
            chosen = %outcome.placement,
            fits = outcome.fits,
            left = page_rect.x,
            top = page_rect.y,
            "tooltip positioned"
        );
        Some(outcome)
    }

    /// Make one node focusable, for collaborators inserting triggers.
    pub fn ensure_focusable(&mut self, node: &H::Node) -> FocusOutcome {
        ensure_focusable(&mut self.host, node)
    }

    /// Normalise every trigger at or below `root`.
    pub fn normalize_subtree(&mut self, root: &H::Node) -> NormalizeReport {
        self.normalizer.normalize_subtree(&mut self.host, root)
    }

    /// Stop observing insertions and hide any visible tooltip.
    ///
    /// Returns `false` when already torn down. Later events are ignored.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        self.hide();
        self.watch.release(&mut self.host);
        tracing::debug!(target: TARGET_LIFECYCLE, "tooltip controller torn down");
        true
    }

    /// Trigger currently described by the surface.
    #[must_use]
    pub fn active_trigger(&self) -> Option<&H::Node> {
        self.active.as_ref().map(|active| &active.node)
    }

    /// Placement requested by the active trigger.
    #[must_use]
    pub fn requested_placement_of_active(&self) -> Option<Placement> {
        self.active.as_ref().map(|active| active.requested)
    }

    #[must_use]
    pub fn surface(&self) -> &TooltipSurface<H::Node> {
        &self.surface
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        debug_assert_eq!(self.active.is_some(), self.surface.is_visible());
        self.active.is_some()
    }

    /// Whether a frame callback is outstanding.
    #[must_use]
    pub const fn frame_pending(&self) -> bool {
        self.frames.is_pending()
    }

    #[must_use]
    pub const fn frame_stats(&self) -> FrameStats {
        self.frames.stats()
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    #[must_use]
    pub fn config(&self) -> &TooltipConfig {
        &self.config
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, for hosts that change geometry between events.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: TooltipHost> Drop for TooltipController<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
