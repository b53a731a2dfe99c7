#![forbid(unsafe_code)]

//! Host capabilities the controller depends on.
//!
//! The controller never touches a concrete document. Hosts implement three
//! narrow traits:
//!
//! - [`DomHost`]: tree navigation, attributes, inline style, and geometry.
//! - [`FrameScheduler`]: "call me back at the next display refresh".
//! - [`MutationSource`]: "tell me about nodes inserted under this root".
//!
//! [`TooltipHost`] bundles all three and is implemented automatically.
//! Each trait is also implemented for `&mut T`, so a controller can borrow
//! a host instead of owning it.
//!
//! Node handles are cheap references into the host's document. Holding one
//! does not keep the element in the document; the controller only uses it
//! as a relation to the currently active trigger.

use core::fmt::Debug;

use tipwire_core::geometry::{Rect, ScrollOffset, Size};

use crate::error::TooltipError;

/// Read/write access to a document.
pub trait DomHost {
    /// Handle to a node in the document.
    type Node: Clone + PartialEq + Debug;

    /// The document node. Whole-document normalisation starts here.
    fn document_root(&self) -> Self::Node;

    /// Whether `node` is an element (not text, comment, or document).
    fn is_element(&self, node: &Self::Node) -> bool;

    /// Lower-case tag name, `None` for non-elements.
    fn tag_name(&self, node: &Self::Node) -> Option<String>;

    /// Attribute value, `None` when absent or `node` is not an element.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Whether the attribute is present, with any value.
    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Set an attribute. No-op on non-elements.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Remove an attribute. No-op when absent.
    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    /// Parent node, `None` at the root or for detached nodes.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Inclusive descendant check: `node` is `ancestor` or lies below it.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if candidate == *ancestor {
                return true;
            }
            current = self.parent(&candidate);
        }
        false
    }

    /// Nearest element carrying `name`, starting at `node` itself.
    ///
    /// Returns `None` when `node` is not an element, mirroring
    /// `Element.closest` being unavailable on text nodes.
    fn closest_with_attribute(&self, node: &Self::Node, name: &str) -> Option<Self::Node> {
        if !self.is_element(node) {
            return None;
        }
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if self.is_element(&candidate) && self.has_attribute(&candidate, name) {
                return Some(candidate);
            }
            current = self.parent(&candidate);
        }
        None
    }

    /// Elements at or below `root` carrying `name`, in document order.
    ///
    /// `root` itself is included when it is a matching element.
    fn elements_with_attribute(&self, root: &Self::Node, name: &str) -> Vec<Self::Node>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, TooltipError>;

    /// Append `node` to the document body.
    fn append_to_body(&mut self, node: &Self::Node) -> Result<(), TooltipError>;

    /// Replace the text content of an element.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Set an inline style property (`left`, `visibility`, ...).
    ///
    /// An empty value removes the property.
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Inline style property value, empty when unset.
    fn style(&self, node: &Self::Node, property: &str) -> String;

    /// Border box in viewport coordinates (`getBoundingClientRect`).
    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// Current viewport size. Read fresh on every positioning pass.
    fn viewport(&self) -> Size;

    /// Current page scroll offset.
    fn scroll_offset(&self) -> ScrollOffset;
}

/// Deferred work at the next display refresh.
pub trait FrameScheduler {
    /// Ask the host to call [`TooltipController::on_frame`] once, at the next
    /// frame.
    ///
    /// The controller guarantees at most one outstanding request.
    ///
    /// [`TooltipController::on_frame`]: crate::TooltipController::on_frame
    fn request_frame(&mut self) -> Result<(), TooltipError>;
}

/// Insertion notifications for a subtree.
pub trait MutationSource: DomHost {
    /// Start delivering [`TooltipEvent::NodesInserted`] for nodes inserted
    /// anywhere under `root`.
    ///
    /// [`TooltipEvent::NodesInserted`]: crate::TooltipEvent::NodesInserted
    fn observe_insertions(&mut self, root: &Self::Node) -> Result<(), TooltipError>;

    /// Stop delivering insertion notifications.
    fn stop_observing(&mut self);
}

impl<T: DomHost + ?Sized> DomHost for &mut T {
    type Node = T::Node;

    fn document_root(&self) -> Self::Node {
        (**self).document_root()
    }
    fn is_element(&self, node: &Self::Node) -> bool {
        (**self).is_element(node)
    }
    fn tag_name(&self, node: &Self::Node) -> Option<String> {
        (**self).tag_name(node)
    }
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String> {
        (**self).attribute(node, name)
    }
    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        (**self).has_attribute(node, name)
    }
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) {
        (**self).set_attribute(node, name, value);
    }
    fn remove_attribute(&mut self, node: &Self::Node, name: &str) {
        (**self).remove_attribute(node, name);
    }
    fn parent(&self, node: &Self::Node) -> Option<Self::Node> {
        (**self).parent(node)
    }
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool {
        (**self).contains(ancestor, node)
    }
    fn closest_with_attribute(&self, node: &Self::Node, name: &str) -> Option<Self::Node> {
        (**self).closest_with_attribute(node, name)
    }
    fn elements_with_attribute(&self, root: &Self::Node, name: &str) -> Vec<Self::Node> {
        (**self).elements_with_attribute(root, name)
    }
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, TooltipError> {
        (**self).create_element(tag)
    }
    fn append_to_body(&mut self, node: &Self::Node) -> Result<(), TooltipError> {
        (**self).append_to_body(node)
    }
    fn set_text(&mut self, node: &Self::Node, text: &str) {
        (**self).set_text(node, text);
    }
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str) {
        (**self).set_style(node, property, value);
    }
    fn style(&self, node: &Self::Node, property: &str) -> String {
        (**self).style(node, property)
    }
    fn bounding_rect(&self, node: &Self::Node) -> Rect {
        (**self).bounding_rect(node)
    }
    fn viewport(&self) -> Size {
        (**self).viewport()
    }
    fn scroll_offset(&self) -> ScrollOffset {
        (**self).scroll_offset()
    }
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for &mut T {
    fn request_frame(&mut self) -> Result<(), TooltipError> {
        (**self).request_frame()
    }
}

impl<T: MutationSource + ?Sized> MutationSource for &mut T {
    fn observe_insertions(&mut self, root: &Self::Node) -> Result<(), TooltipError> {
        (**self).observe_insertions(root)
    }
    fn stop_observing(&mut self) {
        (**self).stop_observing();
    }
}

/// Everything the controller needs from its environment.
pub trait TooltipHost: DomHost + FrameScheduler + MutationSource {}

impl<T> TooltipHost for T where T: DomHost + FrameScheduler + MutationSource {}
