#![forbid(unsafe_code)]

//! The single tooltip surface element.
//!
//! [`TooltipSurface`] mirrors what has been written to the surface element so
//! the controller can answer questions without reading the document back.
//! Every mutation goes through the host first, then updates the mirror.
//!
//! # Markup
//!
//! | attribute | hidden | visible |
//! |---|---|---|
//! | `role` | `tooltip` | `tooltip` |
//! | `aria-hidden` | `true` | `false` |
//! | `data-state` | `hidden` | `visible` |
//! | `data-placement` | last value | resolved side |
//!
//! # Measuring
//!
//! Positioning is two-pass: [`TooltipSurface::begin_measure`] parks the
//! element at the origin with `visibility: hidden` and reads its natural
//! size; [`TooltipSurface::finish_measure`] writes the final coordinates and
//! restores the previous visibility. Nothing is painted at a stale position
//! in between.

use tipwire_core::config::TooltipConfig;
use tipwire_core::geometry::{Rect, Size};
use tipwire_core::placement::Placement;

use crate::error::TooltipError;
use crate::host::DomHost;

/// Attribute reflecting visibility for stylesheets.
pub const STATE_ATTRIBUTE: &str = "data-state";
/// Attribute reflecting visibility for assistive technology.
pub const ARIA_HIDDEN: &str = "aria-hidden";
/// Attribute linking a trigger to the surface.
pub const ARIA_DESCRIBEDBY: &str = "aria-describedby";

/// Visibility state of the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

impl Visibility {
    /// `data-state` value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Visible => "visible",
        }
    }

    /// `aria-hidden` value.
    #[must_use]
    pub const fn aria_hidden(self) -> &'static str {
        match self {
            Self::Hidden => "true",
            Self::Visible => "false",
        }
    }
}

/// State carried between the two measuring passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Natural size of the surface with its current text.
    pub size: Size,
    saved_visibility: String,
}

/// Mirror of the surface element.
#[derive(Debug, Clone)]
pub struct TooltipSurface<N> {
    node: N,
    id: String,
    placement_attribute: String,
    text: String,
    placement: Placement,
    visibility: Visibility,
    position: Option<Rect>,
}

impl<N: Clone + PartialEq + core::fmt::Debug> TooltipSurface<N> {
    /// Create the surface element, mark it up as hidden and append it to the
    /// body.
    pub fn install<H>(host: &mut H, config: &TooltipConfig, seed: u64) -> Result<Self, TooltipError>
    where
        H: DomHost<Node = N> + ?Sized,
    {
        let id = config.resolve_surface_id(seed);
        let node = host.create_element("div")?;
        host.set_attribute(&node, "class", &config.surface_class);
        host.set_attribute(&node, "role", "tooltip");
        host.set_attribute(&node, ARIA_HIDDEN, Visibility::Hidden.aria_hidden());
        host.set_attribute(&node, STATE_ATTRIBUTE, Visibility::Hidden.as_str());
        host.set_attribute(&node, "id", &id);
        host.append_to_body(&node)?;

        Ok(Self {
            node,
            id,
            placement_attribute: config.placement_attribute.clone(),
            text: String::new(),
            placement: config.default_placement,
            visibility: Visibility::Hidden,
            position: None,
        })
    }

    /// Surface element.
    #[must_use]
    pub fn node(&self) -> &N {
        &self.node
    }

    /// Stable id used for `aria-describedby`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placement last written to the element.
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// Current visibility.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// Page-coordinate rectangle from the last positioning pass.
    #[must_use]
    pub const fn position(&self) -> Option<Rect> {
        self.position
    }

    /// Write text and requested placement, then mark visible.
    pub fn show<H>(&mut self, host: &mut H, text: &str, placement: Placement)
    where
        H: DomHost<Node = N> + ?Sized,
    {
        host.set_text(&self.node, text);
        self.text.clear();
        self.text.push_str(text);
        self.set_placement(host, placement);
        self.set_visibility(host, Visibility::Visible);
    }

    /// Mark hidden. Text and placement are kept for the next show.
    pub fn hide<H>(&mut self, host: &mut H)
    where
        H: DomHost<Node = N> + ?Sized,
    {
        self.set_visibility(host, Visibility::Hidden);
    }

    /// Write the placement attribute.
    pub fn set_placement<H>(&mut self, host: &mut H, placement: Placement)
    where
        H: DomHost<Node = N> + ?Sized,
    {
        host.set_attribute(&self.node, &self.placement_attribute, placement.as_str());
        self.placement = placement;
    }

    fn set_visibility<H>(&mut self, host: &mut H, visibility: Visibility)
    where
        H: DomHost<Node = N> + ?Sized,
    {
        host.set_attribute(&self.node, STATE_ATTRIBUTE, visibility.as_str());
        host.set_attribute(&self.node, ARIA_HIDDEN, visibility.aria_hidden());
        self.visibility = visibility;
    }

    /// First pass: park at the origin, hide from paint, read the natural size.
    pub fn begin_measure<H>(&self, host: &mut H) -> Measurement
    where
        H: DomHost<Node = N> + ?Sized,
    {
        host.set_style(&self.node, "left", "0px");
        host.set_style(&self.node, "top", "0px");
        let saved_visibility = host.style(&self.node, "visibility");
        host.set_style(&self.node, "visibility", "hidden");
        host.set_style(&self.node, "display", "inline-block");
        let size = host.bounding_rect(&self.node).size();
        Measurement {
            size,
            saved_visibility,
        }
    }

    /// Second pass: write `page_rect` and the resolved side, restore
    /// visibility.
    pub fn finish_measure<H>(
        &mut self,
        host: &mut H,
        measurement: Measurement,
        page_rect: Rect,
        placement: Placement,
    ) where
        H: DomHost<Node = N> + ?Sized,
    {
        self.set_placement(host, placement);
        host.set_style(&self.node, "left", &px(page_rect.x));
        host.set_style(&self.node, "top", &px(page_rect.y));
        host.set_style(&self.node, "visibility", &measurement.saved_visibility);
        self.position = Some(page_rect);
    }
}

/// CSS pixel length. `-0` prints as `0px`.
#[must_use]
pub fn px(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}px")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_formatting() {
        assert_eq!(px(12.0), "12px");
        assert_eq!(px(-0.0), "0px");
        assert_eq!(px(6.5), "6.5px");
        assert_eq!(px(-14.0), "-14px");
    }

    #[test]
    fn visibility_strings() {
        assert_eq!(Visibility::default(), Visibility::Hidden);
        assert_eq!(Visibility::Hidden.as_str(), "hidden");
        assert_eq!(Visibility::Hidden.aria_hidden(), "true");
        assert_eq!(Visibility::Visible.as_str(), "visible");
        assert_eq!(Visibility::Visible.aria_hidden(), "false");
    }
}
