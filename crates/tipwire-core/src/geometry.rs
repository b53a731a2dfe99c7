#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are CSS pixels in viewport coordinates (origin at the top-left
//! of the visible area) unless noted otherwise.

/// A rectangle for trigger bounds, tooltip candidates, and clipping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at `(x, y)` with the given size.
    #[inline]
    pub const fn from_origin(x: f64, y: f64, size: Size) -> Self {
        Self::new(x, y, size.width, size.height)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the whole rectangle lies inside `[0, w] x [0, h]`.
    #[inline]
    pub fn fits_within(&self, viewport: Size) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= viewport.width
            && self.bottom() <= viewport.height
    }

    /// Area of the part of the rectangle that is inside the viewport.
    ///
    /// Zero when the rectangle is entirely outside.
    pub fn visible_area(&self, viewport: Size) -> f64 {
        let x1 = self.x.max(0.0);
        let y1 = self.y.max(0.0);
        let x2 = self.right().min(viewport.width);
        let y2 = self.bottom().min(viewport.height);
        (x2 - x1).max(0.0) * (y2 - y1).max(0.0)
    }

    /// Translate by a scroll offset (viewport to page coordinates).
    #[inline]
    pub fn offset_by(&self, scroll: ScrollOffset) -> Rect {
        Rect::new(self.x + scroll.x, self.y + scroll.y, self.width, self.height)
    }
}

/// Width and height of a box or of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Page scroll position (`window.scrollX` / `window.scrollY`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    /// Create a new scroll offset.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Round half toward positive infinity, matching DOM pixel snapping.
#[inline]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::{Rect, ScrollOffset, Size, round_half_up};

    #[test]
    fn rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.size(), Size::new(100.0, 50.0));
    }

    #[test]
    fn fits_within_is_inclusive_at_edges() {
        let viewport = Size::new(100.0, 50.0);
        assert!(Rect::new(0.0, 0.0, 100.0, 50.0).fits_within(viewport));
        assert!(!Rect::new(-0.5, 0.0, 10.0, 10.0).fits_within(viewport));
        assert!(!Rect::new(95.0, 0.0, 10.0, 10.0).fits_within(viewport));
        assert!(!Rect::new(0.0, 45.0, 10.0, 10.0).fits_within(viewport));
    }

    #[test]
    fn visible_area_clips_to_viewport() {
        let viewport = Size::new(100.0, 100.0);
        assert_eq!(Rect::new(90.0, 90.0, 20.0, 20.0).visible_area(viewport), 100.0);
        assert_eq!(Rect::new(-30.0, 0.0, 20.0, 20.0).visible_area(viewport), 0.0);
        assert_eq!(Rect::new(10.0, 10.0, 20.0, 20.0).visible_area(viewport), 400.0);
    }

    #[test]
    fn offset_by_scroll() {
        let rect = Rect::new(5.0, 6.0, 7.0, 8.0);
        let moved = rect.offset_by(ScrollOffset::new(100.0, 200.0));
        assert_eq!(moved, Rect::new(105.0, 206.0, 7.0, 8.0));
    }

    #[test]
    fn rounding_goes_up_on_half() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(1.49), 1.0);
    }
}
