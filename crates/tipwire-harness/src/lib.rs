#![forbid(unsafe_code)]

//! Test harness for tipwire.
//!
//! # Role
//! Runs the tooltip controller against a deterministic, in-memory document
//! so lifecycle, focus and placement behavior can be asserted without a
//! browser.
//!
//! # Contents
//! - [`MemoryDom`]: arena document implementing every host trait.
//! - [`Harness`]: owns a controller and replays host events.
//! - [`fixtures`]: reference pages.

pub mod dom;
pub mod driver;
pub mod fixtures;

pub use dom::{DomChange, MemoryDom, NodeId};
pub use driver::{HARNESS_SEED, Harness};
pub use fixtures::{DYNAMIC_TOOLTIP_TEXT, DemoPage, demo_page, dynamic_span, trigger};
