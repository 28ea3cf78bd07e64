//! Pixel geometry primitives: [`Size`] and [`Rect`].

use std::fmt;

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A width/height pair in pixels (or CSS pixels for viewports).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
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

    /// Width divided by height. A zero height yields infinity, which the
    /// viewport policy treats as "very wide".
    #[inline]
    pub fn aspect(self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            f64::INFINITY
        }
    }

    /// Whether either side is zero or negative.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<(u32, u32)> for Size {
    fn from((w, h): (u32, u32)) -> Self {
        Self::new(f64::from(w), f64::from(h))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// An axis-aligned pixel rectangle: origin plus extent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    #[inline]
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A square of side `side` at `(x, y)`.
    #[inline]
    pub const fn square(x: usize, y: usize, side: usize) -> Self {
        Self::new(x, y, side, side)
    }

    /// Exclusive right edge.
    #[inline]
    pub const fn right(self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub const fn bottom(self) -> usize {
        self.y + self.height
    }

    /// Whether the pixel `(x, y)` lies inside the rectangle.
    #[inline]
    pub const fn contains(self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}x{}", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_wide_and_degenerate_sizes() {
        assert_eq!(Size::new(200.0, 100.0).aspect(), 2.0);
        assert!(Size::new(10.0, 0.0).aspect().is_infinite());
        assert!(Size::new(0.0, 10.0).is_empty());
    }

    #[test]
    fn rect_edges_and_containment() {
        let r = Rect::square(16, 32, 16);
        assert_eq!(r.right(), 32);
        assert_eq!(r.bottom(), 48);
        assert!(r.contains(16, 32));
        assert!(r.contains(31, 47));
        assert!(!r.contains(32, 47));
    }
}
