#![forbid(unsafe_code)]

//! Browser frontend for tipwire.
//!
//! # Role in tipwire
//! `tipwire-web` wires a [`tipwire::TooltipController`] to a live document:
//! DOM listeners become [`tipwire::TooltipEvent`]s, `requestAnimationFrame`
//! drives positioning, and a `MutationObserver` reports inserted nodes.
//!
//! # JS API
//! | export | purpose |
//! |---|---|
//! | `install()` | attach to `document` with the default config |
//! | `installWithConfig(json)` | same, with a JSON [`tipwire::TooltipConfig`] |
//! | `TooltipHandle.attachAddButton(button, container)` | click inserts a new trigger |
//! | `TooltipHandle.isVisible()` / `surfaceId()` | inspection |
//! | `TooltipHandle.teardown()` / `free()` | stop; `free` also removes listeners |
//!
//! Everything outside the `wasm32` target is plain data (see [`bindings`])
//! so the event table can be tested natively.

pub mod bindings;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use bindings::{
    DomEventKind, LISTENERS, ListenerSpec, ListenerTarget, RawEvent, attribute_selector, translate,
};

#[cfg(target_arch = "wasm32")]
pub use wasm::{TooltipHandle, WebHost, install, install_with_config};
