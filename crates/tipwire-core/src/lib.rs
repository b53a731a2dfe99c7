#![forbid(unsafe_code)]

//! Core: geometry, placement, frame coalescing, and configuration.
//!
//! # Role in tipwire
//! `tipwire-core` holds everything about tooltips that does not depend on a
//! document. The controller in `tipwire` feeds it trigger geometry and
//! tooltip size read from a host, and writes its results back.
//!
//! # Primary responsibilities
//! - **Geometry**: f64 rectangles, sizes, and scroll offsets in CSS pixels.
//! - **PlacementEngine**: candidate search with fallback to best overlap and
//!   edge clamping.
//! - **FrameGate**: at most one pending positioning pass per frame.
//! - **TooltipConfig**: attribute names, spacing, surface markup, loading
//!   and validation.

pub mod config;
pub mod frame;
pub mod geometry;
pub mod logging;
pub mod placement;

pub use config::{ConfigError, TooltipConfig};
pub use frame::{FrameGate, FrameStats};
pub use geometry::{Rect, ScrollOffset, Size};
pub use placement::{
    Placement, PlacementCandidate, PlacementConfig, PlacementEngine, PlacementOutcome,
    PlacementRequest,
};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
