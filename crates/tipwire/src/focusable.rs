#![forbid(unsafe_code)]

//! Focusability normaliser.
//!
//! Every trigger must be reachable with the keyboard, otherwise keyboard
//! users never see its tooltip. Elements that are not natively focusable get
//! `tabindex="0"`, which puts them in the sequential focus order without
//! reordering it. An explicit `tabindex` already on the element is left
//! alone, whatever its value.

use tipwire_core::logging::TARGET_FOCUS;

use crate::host::DomHost;

/// Attribute declaring an explicit focus order.
pub const TABINDEX_ATTRIBUTE: &str = "tabindex";

/// Tags that are focusable without a `tabindex`. `a` only counts with `href`.
pub const NATIVELY_FOCUSABLE: [&str; 5] = ["a", "button", "input", "textarea", "select"];

/// What [`ensure_focusable`] did to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Not an element; nothing to do.
    NotElement,
    /// Natively focusable; untouched.
    Native,
    /// Already declares a `tabindex`; untouched.
    ExplicitOrder,
    /// `tabindex="0"` was added.
    Assigned,
}

impl FocusOutcome {
    /// Whether the node's attributes were changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Assigned)
    }
}

/// Whether an element with `tag` (and link destination presence) is
/// focusable on its own.
#[must_use]
pub fn is_native_tag(tag: &str, has_href: bool) -> bool {
    match tag {
        "a" => has_href,
        other => NATIVELY_FOCUSABLE.contains(&other),
    }
}

/// Make `node` keyboard-focusable if it is not already.
///
/// Idempotent: a second call observes the `tabindex` written by the first and
/// returns [`FocusOutcome::ExplicitOrder`].
pub fn ensure_focusable<H: DomHost + ?Sized>(host: &mut H, node: &H::Node) -> FocusOutcome {
    if !host.is_element(node) {
        return FocusOutcome::NotElement;
    }
    let Some(tag) = host.tag_name(node) else {
        return FocusOutcome::NotElement;
    };
    if is_native_tag(&tag, host.has_attribute(node, "href")) {
        return FocusOutcome::Native;
    }
    if host.has_attribute(node, TABINDEX_ATTRIBUTE) {
        return FocusOutcome::ExplicitOrder;
    }
    host.set_attribute(node, TABINDEX_ATTRIBUTE, "0");
    tracing::trace!(target: TARGET_FOCUS, tag = %tag, "tabindex assigned");
    FocusOutcome::Assigned
}

/// Summary of a [`FocusNormalizer::normalize_subtree`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Triggers found at or below the root.
    pub triggers: usize,
    /// Triggers that received `tabindex="0"`.
    pub assigned: usize,
}

/// Applies [`ensure_focusable`] to every trigger in a subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusNormalizer {
    trigger_attribute: String,
}

impl FocusNormalizer {
    /// Normaliser for elements carrying `trigger_attribute`.
    pub fn new(trigger_attribute: impl Into<String>) -> Self {
        Self {
            trigger_attribute: trigger_attribute.into(),
        }
    }

    /// Normalise `root` (when it is a trigger) and every trigger below it.
    ///
    /// Presence of the attribute is enough; an empty description still gets
    /// focus so that it becomes reachable once text is filled in.
    pub fn normalize_subtree<H: DomHost + ?Sized>(
        &self,
        host: &mut H,
        root: &H::Node,
    ) -> NormalizeReport {
        let triggers = host.elements_with_attribute(root, &self.trigger_attribute);
        let mut report = NormalizeReport {
            triggers: triggers.len(),
            assigned: 0,
        };
        for trigger in &triggers {
            if ensure_focusable(host, trigger).changed() {
                report.assigned += 1;
            }
        }
        if report.triggers > 0 {
            tracing::debug!(
                target: TARGET_FOCUS,
                triggers = report.triggers,
                assigned = report.assigned,
                "subtree normalised"
            );
        }
        report
    }
}
