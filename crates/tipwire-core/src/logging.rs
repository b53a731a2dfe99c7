#![forbid(unsafe_code)]

//! Structured logging re-exports.
//!
//! With the `tracing` feature enabled, the `tracing` macros are re-exported
//! here (and at the crate root) so downstream crates can log through
//! `tipwire_core` without naming `tracing` themselves. Targets used across
//! the workspace are collected here and every call site logs through them.

/// Lifecycle transitions (show, hide, switch, teardown).
pub const TARGET_LIFECYCLE: &str = "tipwire.lifecycle";
/// Placement decisions.
pub const TARGET_PLACEMENT: &str = "tipwire.placement";
/// Focusability normalisation.
pub const TARGET_FOCUS: &str = "tipwire.focus";
/// Browser binding.
pub const TARGET_WEB: &str = "tipwire.web";
/// Test harness event replay.
pub const TARGET_HARNESS: &str = "tipwire.harness";

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

#[cfg(all(test, feature = "tracing"))]
mod tests {
    #[test]
    fn reexported_macros_accept_workspace_targets() {
        use super::{TARGET_FOCUS, TARGET_LIFECYCLE, TARGET_PLACEMENT, TARGET_WEB};

        super::debug!(target: TARGET_LIFECYCLE, "lifecycle");
        super::trace!(target: TARGET_PLACEMENT, fits = true, "placement");
        let span = super::info_span!(target: TARGET_FOCUS, "normalize");
        let _entered = span.enter();
        super::warn!(target: TARGET_WEB, "web");
    }
}

#[cfg(test)]
mod target_tests {
    use super::*;

    #[test]
    fn targets_share_the_workspace_prefix() {
        for target in [
            TARGET_LIFECYCLE,
            TARGET_PLACEMENT,
            TARGET_FOCUS,
            TARGET_WEB,
            TARGET_HARNESS,
        ] {
            assert!(target.starts_with("tipwire."), "{target}");
        }
    }
}
