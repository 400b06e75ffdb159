//! Rectangular bounds assigned to scales by layout.

use chartkit_core::math::DVec2;

/// Rectangular bounds in pixels, `y` growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left)
    pub x: f64,
    /// Y position (top)
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create from position and size.
    pub fn from_pos_size(pos: DVec2, size: DVec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Get the center point.
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Inset the rect by a padding amount.
    pub fn inset(&self, padding: f64) -> Self {
        Self {
            x: self.x + padding,
            y: self.y + padding,
            width: (self.width - padding * 2.0).max(0.0),
            height: (self.height - padding * 2.0).max(0.0),
        }
    }

    /// Check if a point is inside the rect.
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Get the left edge.
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Get the top edge.
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Get the right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Clamp a point into the rect.
    pub fn clamp(&self, point: DVec2) -> DVec2 {
        DVec2::new(
            point.x.clamp(self.left(), self.right().max(self.left())),
            point.y.clamp(self.top(), self.bottom().max(self.top())),
        )
    }
}
