#![forbid(unsafe_code)]

//! Host events consumed by the controller.
//!
//! Hosts translate their native events into [`TooltipEvent`] values. Targets
//! are raw event targets: they may be text nodes or descendants of a trigger;
//! the controller resolves the nearest trigger itself.

/// Canonical input event for the tooltip controller.
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipEvent<N> {
    /// Pointer entered `target` (capture phase, so every descendant reports).
    PointerEnter { target: N },

    /// Pointer left `target` towards `related`.
    PointerLeave { target: N, related: Option<N> },

    /// Keyboard focus moved into `target`.
    FocusIn { target: N },

    /// Keyboard focus left `target` towards `related`.
    FocusOut { target: N, related: Option<N> },

    /// A key was pressed anywhere in the document.
    KeyDown { key: Key },

    /// The page scrolled.
    Scroll,

    /// The viewport was resized.
    Resize,

    /// Nodes were inserted somewhere under the observed root.
    NodesInserted(Vec<N>),

    /// The page is being torn down.
    Unload,
}

/// Keys the controller distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Dismisses the tooltip.
    Escape,
    /// Any other key, by its DOM `key` value.
    Other(String),
}

impl Key {
    /// Build from a DOM `KeyboardEvent.key` value.
    ///
    /// Accepts the legacy `"Esc"` spelling some older engines report.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Key;

    #[test]
    fn escape_spellings() {
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("escape"), Key::Other("escape".into()));
        assert_eq!(Key::from_dom("Enter"), Key::Other("Enter".into()));
    }
}
