#![forbid(unsafe_code)]

//! Anchored placement with ordered fallback.
//!
//! [`PlacementEngine`] positions a tooltip of a known natural size next to a
//! trigger rectangle. It is a pure function of its inputs: trigger geometry,
//! tooltip size, viewport size, and the preferred side.
//!
//! # Algorithm
//!
//! 1. Candidates are the preferred side followed by `top`, `right`, `bottom`,
//!    `left`, with duplicates removed.
//! 2. Each candidate sits `gap` pixels off the trigger edge, centered on the
//!    trigger's cross axis. Coordinates are rounded half-up.
//! 3. The first candidate fully inside the viewport wins. Otherwise the
//!    candidate with the largest visible area wins; ties keep list order.
//! 4. The winner is clamped so no edge comes closer than `edge_padding` to
//!    the viewport boundary. The clamp may push the tooltip back over the
//!    trigger.
//!
//! ```
//! use tipwire_core::geometry::{Rect, Size};
//! use tipwire_core::placement::{Placement, PlacementEngine, PlacementRequest};
//!
//! let engine = PlacementEngine::default();
//! let outcome = engine.resolve(&PlacementRequest {
//!     anchor: Rect::new(0.0, 0.0, 40.0, 40.0),
//!     tooltip: Size::new(60.0, 24.0),
//!     viewport: Size::new(800.0, 600.0),
//!     preferred: Placement::Top,
//! });
//! // No room above the trigger, so the engine falls back to the right side.
//! assert_eq!(outcome.placement, Placement::Right);
//! assert!(outcome.fits);
//! ```

use core::fmt;
use core::str::FromStr;

use crate::geometry::{Rect, Size, round_half_up};
#[cfg(feature = "tracing")]
use crate::logging::TARGET_PLACEMENT;

/// Default distance between the trigger edge and the tooltip.
pub const DEFAULT_GAP: f64 = 8.0;

/// Default minimum distance between the tooltip and any viewport edge.
pub const DEFAULT_EDGE_PADDING: f64 = 6.0;

/// Side of the trigger the tooltip is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Placement {
    /// Above the trigger, horizontally centered.
    #[default]
    Top,
    /// Right of the trigger, vertically centered.
    Right,
    /// Below the trigger, horizontally centered.
    Bottom,
    /// Left of the trigger, vertically centered.
    Left,
}

impl Placement {
    /// Fallback order used after the preferred side.
    pub const FALLBACK_ORDER: [Placement; 4] = [
        Placement::Top,
        Placement::Right,
        Placement::Bottom,
        Placement::Left,
    ];

    /// Parse an attribute value (`top`, `right`, `bottom`, `left`).
    ///
    /// Surrounding whitespace and ASCII case are ignored. Anything else is
    /// `None`; callers fall back to their default side.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::FALLBACK_ORDER
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value))
    }

    /// Attribute spelling of this side.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a placement name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePlacementError(pub String);

impl fmt::Display for ParsePlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown placement: {:?}", self.0)
    }
}

impl std::error::Error for ParsePlacementError {}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParsePlacementError(s.to_owned()))
    }
}

/// Ordered, de-duplicated candidate list with the preferred side first.
#[must_use]
pub fn candidate_order(preferred: Placement) -> [Placement; 4] {
    let mut order = [preferred; 4];
    let mut len = 1;
    for placement in Placement::FALLBACK_ORDER {
        if placement != preferred {
            order[len] = placement;
            len += 1;
        }
    }
    order
}

/// Spacing knobs for the placement engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    /// Distance between trigger edge and tooltip.
    pub gap: f64,
    /// Minimum distance between tooltip and viewport edges after clamping.
    pub edge_padding: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            edge_padding: DEFAULT_EDGE_PADDING,
        }
    }
}

/// Inputs for a single positioning pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    /// Trigger bounding rectangle in viewport coordinates.
    pub anchor: Rect,
    /// Natural (unclamped) tooltip size.
    pub tooltip: Size,
    /// Current viewport size.
    pub viewport: Size,
    /// Side requested by the trigger.
    pub preferred: Placement,
}

/// One evaluated candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementCandidate {
    pub placement: Placement,
    /// Unclamped tooltip rectangle for this side.
    pub rect: Rect,
}

/// Result of a positioning pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOutcome {
    /// Winning side. Written back to the surface for arrow styling.
    pub placement: Placement,
    /// The winning candidate before clamping.
    pub candidate: Rect,
    /// Final rectangle in viewport coordinates, after edge clamping.
    pub rect: Rect,
    /// Whether the winning candidate fit the viewport without clipping.
    pub fits: bool,
}

/// Candidate search and clamping for anchored tooltips.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlacementEngine {
    config: PlacementConfig,
}

impl PlacementEngine {
    /// Create an engine with the given spacing.
    #[must_use]
    pub const fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// Spacing in use.
    #[must_use]
    pub const fn config(&self) -> PlacementConfig {
        self.config
    }

    /// Tooltip rectangle for `placement`, before any viewport logic.
    pub fn candidate(
        &self,
        placement: Placement,
        anchor: Rect,
        tooltip: Size,
    ) -> PlacementCandidate {
        let gap = self.config.gap;
        let (left, top) = match placement {
            Placement::Top => (
                anchor.left() + (anchor.width - tooltip.width) / 2.0,
                anchor.top() - tooltip.height - gap,
            ),
            Placement::Bottom => (
                anchor.left() + (anchor.width - tooltip.width) / 2.0,
                anchor.bottom() + gap,
            ),
            Placement::Left => (
                anchor.left() - tooltip.width - gap,
                anchor.top() + (anchor.height - tooltip.height) / 2.0,
            ),
            Placement::Right => (
                anchor.right() + gap,
                anchor.top() + (anchor.height - tooltip.height) / 2.0,
            ),
        };
        PlacementCandidate {
            placement,
            rect: Rect::from_origin(round_half_up(left), round_half_up(top), tooltip),
        }
    }

    /// All candidates in search order.
    pub fn candidates(&self, request: &PlacementRequest) -> [PlacementCandidate; 4] {
        candidate_order(request.preferred)
            .map(|placement| self.candidate(placement, request.anchor, request.tooltip))
    }

    /// Run the full search: first fit, else best visible area, then clamp.
    pub fn resolve(&self, request: &PlacementRequest) -> PlacementOutcome {
        let candidates = self.candidates(request);
        let viewport = request.viewport;

        let fitting = candidates
            .iter()
            .find(|candidate| candidate.rect.fits_within(viewport));

        let (chosen, fits) = match fitting {
            Some(candidate) => (*candidate, true),
            None => (best_overlap(&candidates, viewport), false),
        };

        let rect = self.clamp(chosen.rect, viewport);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: TARGET_PLACEMENT,
            preferred = %request.preferred,
            chosen = %chosen.placement,
            fits,
            left = rect.x,
            top = rect.y,
            "placement resolved"
        );

        PlacementOutcome {
            placement: chosen.placement,
            candidate: chosen.rect,
            rect,
            fits,
        }
    }

    /// Keep `rect` at least `edge_padding` away from every viewport edge.
    ///
    /// The lower bound is applied first, so a tooltip wider than the padded
    /// viewport ends up pinned to the far edge rather than panicking the way
    /// `f64::clamp` would.
    pub fn clamp(&self, rect: Rect, viewport: Size) -> Rect {
        let pad = self.config.edge_padding;
        let left = rect.x.max(pad).min(viewport.width - rect.width - pad);
        let top = rect.y.max(pad).min(viewport.height - rect.height - pad);
        Rect::new(left, top, rect.width, rect.height)
    }
}

/// Candidate with the largest visible area; earlier candidates win ties.
fn best_overlap(candidates: &[PlacementCandidate; 4], viewport: Size) -> PlacementCandidate {
    let mut best = candidates[0];
    let mut best_area = -1.0;
    for candidate in candidates {
        let area = candidate.rect.visible_area(viewport);
        if area > best_area {
            best_area = area;
            best = *candidate;
        }
    }
    best
}
