#![forbid(unsafe_code)]

//! Scoped insertion observation.
//!
//! [`MutationWatch`] records that the host is delivering insertion events and
//! makes sure `stop_observing` reaches the host exactly once, whether the
//! release comes from an unload event, an explicit teardown, or a drop.

use crate::error::TooltipError;
use crate::host::MutationSource;

/// Lifetime of one `observe_insertions` subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationWatch {
    active: bool,
}

impl MutationWatch {
    /// Start observing insertions under `root`.
    pub fn start<H>(host: &mut H, root: &H::Node) -> Result<Self, TooltipError>
    where
        H: MutationSource + ?Sized,
    {
        host.observe_insertions(root)?;
        Ok(Self { active: true })
    }

    /// Whether the subscription is still live.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Stop observing. Returns `false` when already released.
    pub fn release<H>(&mut self, host: &mut H) -> bool
    where
        H: MutationSource + ?Sized,
    {
        if !core::mem::take(&mut self.active) {
            return false;
        }
        host.stop_observing();
        true
    }
}
