#![forbid(unsafe_code)]

//! Accessible, auto-positioned tooltips for a host document.
//!
//! # Role in tipwire
//! This crate is the controller layer. It knows nothing about browsers: a
//! host implements [`DomHost`], [`FrameScheduler`] and [`MutationSource`]
//! and forwards its events to a [`TooltipController`]. `tipwire-web` does
//! this for real pages; `tipwire-harness` does it for tests.
//!
//! # Primary responsibilities
//! - **Focusability**: every element carrying the trigger attribute becomes
//!   keyboard-reachable, at install and whenever nodes are inserted.
//! - **Lifecycle**: one surface, at most one active trigger, hide-before-show
//!   when switching, `aria-describedby` kept in sync.
//! - **Positioning**: measured on the next frame through
//!   [`tipwire_core::PlacementEngine`], coalesced to one pass per frame.
//!
//! # Example
//! ```ignore
//! let mut controller = TooltipController::install(host, TooltipConfig::default())?;
//! controller.handle(TooltipEvent::PointerEnter { target: button });
//! // ... next animation frame
//! controller.on_frame();
//! ```

pub mod controller;
pub mod error;
pub mod event;
pub mod focusable;
pub mod host;
pub mod surface;
pub mod watch;

pub use controller::{TooltipController, Transition};
pub use error::TooltipError;
pub use event::{Key, TooltipEvent};
pub use focusable::{FocusNormalizer, FocusOutcome, NormalizeReport, ensure_focusable};
pub use host::{DomHost, FrameScheduler, MutationSource, TooltipHost};
pub use surface::{TooltipSurface, Visibility};
pub use watch::MutationWatch;

pub use tipwire_core::{
    ConfigError, Placement, PlacementEngine, PlacementOutcome, Rect, ScrollOffset, Size,
    TooltipConfig,
};
