//! Geometry assignment for scales.

use crate::rect::Rect;
use crate::scale::ScaleSet;

/// Assigns each scale its pixel area before ticks are built.
pub trait LayoutProvider {
    /// Lay out `scales` on a `width` x `height` canvas and return the chart
    /// area datasets are drawn in.
    fn update(&mut self, scales: &mut ScaleSet, width: f64, height: f64) -> Rect;
}

/// Gives every scale the padded canvas as its area.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChartAreaLayout {
    pub padding: f64,
}

impl ChartAreaLayout {
    pub fn new(padding: f64) -> Self {
        Self { padding }
    }
}

impl LayoutProvider for ChartAreaLayout {
    fn update(&mut self, scales: &mut ScaleSet, width: f64, height: f64) -> Rect {
        let area = Rect::new(0.0, 0.0, width.max(0.0), height.max(0.0)).inset(self.padding);
        for scale in scales.iter_mut() {
            scale.set_geometry(area);
        }
        area
    }
}
