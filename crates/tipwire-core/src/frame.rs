#![forbid(unsafe_code)]

//! Per-frame coalescing of positioning passes.
//!
//! Scroll and resize events can arrive many times per display refresh. A
//! positioning pass only needs to run once per frame, reading whatever trigger
//! is active when the frame fires. [`FrameGate`] tracks whether a frame
//! callback is already outstanding so callers ask the host for at most one.
//!
//! ```
//! use tipwire_core::frame::FrameGate;
//!
//! let mut gate = FrameGate::new();
//! assert!(gate.request());   // first request: ask the host for a frame
//! assert!(!gate.request());  // coalesced into the pending frame
//! assert!(gate.begin_frame());
//! assert!(gate.request());   // a new frame may be requested again
//! ```

/// Tracks the single outstanding frame request.
///
/// Not thread-safe; lives on the event-handling thread alongside the
/// controller that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameGate {
    pending: bool,
    stats: FrameStats,
}

/// Counters for frame scheduling, exposed for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame callbacks requested from the host.
    pub requested: u64,
    /// Requests absorbed by an already-pending frame.
    pub coalesced: u64,
    /// Frame callbacks that actually ran.
    pub fired: u64,
}

impl FrameGate {
    /// Create an idle gate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: false,
            stats: FrameStats {
                requested: 0,
                coalesced: 0,
                fired: 0,
            },
        }
    }

    /// Record a request for a positioning pass.
    ///
    /// Returns `true` when the caller must ask the host for a frame callback,
    /// `false` when one is already pending.
    pub fn request(&mut self) -> bool {
        if self.pending {
            self.stats.coalesced = self.stats.coalesced.saturating_add(1);
            return false;
        }
        self.pending = true;
        self.stats.requested = self.stats.requested.saturating_add(1);
        true
    }

    /// Mark the pending frame as firing.
    ///
    /// Returns whether a frame was actually pending. A callback that fires
    /// without a pending request (for example a stray host callback) still
    /// clears the gate.
    pub fn begin_frame(&mut self) -> bool {
        let was_pending = core::mem::take(&mut self.pending);
        if was_pending {
            self.stats.fired = self.stats.fired.saturating_add(1);
        }
        was_pending
    }

    /// Whether a frame callback is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Scheduling counters.
    #[must_use]
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }
}
