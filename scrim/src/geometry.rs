//! Geometry primitives for dismissal hit testing.
//!
//! Overlay boundaries are plain axis-aligned regions in whatever coordinate
//! space the host uses (CSS pixels for a browser host). The engine never
//! measures anything itself; hosts report boundary rectangles and pointer
//! positions in the same space.

/// A pointer position in the host's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in the host's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    /// Create a region from its top-left corner and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside this region.
    ///
    /// Edges follow the half-open convention: the top-left edge is inside,
    /// the bottom-right edge is not.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_half_open_edges() {
        let region = Region::new(10.0, 10.0, 20.0, 20.0);
        assert!(region.contains(Point::new(10.0, 10.0)));
        assert!(region.contains(Point::new(29.9, 29.9)));
        assert!(!region.contains(Point::new(30.0, 30.0)));
        assert!(!region.contains(Point::new(9.9, 15.0)));
    }
}
