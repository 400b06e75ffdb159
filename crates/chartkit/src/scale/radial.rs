use std::f64::consts::{FRAC_PI_2, TAU};

use chartkit_core::math::DVec2;

use crate::config::ScaleOptions;
use crate::rect::Rect;
use crate::scale::ticks::Tick;
use crate::scale::{LinearBase, ScaleContext, numeric_limits, safe_ratio};

/// Linear scale measuring distance from the center of a radar chart.
///
/// "Pixels" of this scale are distances from [`RadialLinearScale::center`];
/// use [`RadialLinearScale::point_position`] to turn a spoke index and a
/// distance into canvas coordinates.
#[derive(Debug, Clone)]
pub struct RadialLinearScale {
    options: ScaleOptions,
    rect: Rect,
    base: LinearBase,
    ticks: Vec<Tick>,
    spoke_count: usize,
}

impl RadialLinearScale {
    pub fn new(options: ScaleOptions) -> Self {
        Self {
            options,
            rect: Rect::default(),
            base: LinearBase::default(),
            ticks: Vec::new(),
            spoke_count: 0,
        }
    }

    pub fn options(&self) -> &ScaleOptions {
        &self.options
    }

    pub fn determine_data_limits(&mut self, ctx: &ScaleContext<'_>) {
        self.spoke_count = ctx.labels.len();
        let limits = numeric_limits(ctx, &self.options, false, |_| true);
        self.base = LinearBase::from_limits(limits);
        self.base.handle_tick_range_options(&self.options.ticks);
    }

    pub fn set_geometry(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn geometry(&self) -> Rect {
        self.rect
    }

    /// Radius available to the outermost tick.
    pub fn drawing_area(&self) -> f64 {
        self.rect.width.min(self.rect.height).max(0.0) / 2.0
    }

    pub fn center(&self) -> DVec2 {
        self.rect.center()
    }

    /// Number of spokes, one per label.
    pub fn spoke_count(&self) -> usize {
        self.spoke_count
    }

    fn tick_limit(&self) -> usize {
        let ticks = &self.options.ticks;
        let wanted = (self.drawing_area() / (1.5 * ticks.font_size.max(1.0))).ceil();
        let limit = ticks.max_ticks_limit.max(1) as f64;
        let count = if wanted.is_finite() { wanted.min(limit) } else { limit };
        count.max(2.0) as usize
    }

    pub fn build_ticks(&mut self) {
        let max_ticks = self.tick_limit();
        self.ticks = self.base.build_ticks(&self.options.ticks, max_ticks, false);
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn min(&self) -> f64 {
        self.base.min
    }

    pub fn max(&self) -> f64 {
        self.base.max
    }

    /// Distance from the center for `value`.
    pub fn pixel_for_value(&self, value: f64) -> f64 {
        self.base.fraction(value) * self.drawing_area()
    }

    /// Value at `distance` from the center.
    pub fn value_for_pixel(&self, distance: f64) -> f64 {
        self.base.value_at(safe_ratio(distance, self.drawing_area()))
    }

    pub fn pixel_for_tick(&self, index: usize) -> Option<f64> {
        self.ticks.get(index).map(|tick| self.pixel_for_value(tick.value))
    }

    /// Distance of the value points grow from.
    pub fn base_pixel(&self) -> f64 {
        self.pixel_for_value(self.base.base_value())
    }

    /// Canvas position `distance` away from the center along spoke `index`.
    /// Spoke 0 points up, the others follow clockwise.
    pub fn point_position(&self, index: usize, distance: f64) -> DVec2 {
        let spokes = self.spoke_count.max(1) as f64;
        let angle = index as f64 * TAU / spokes - FRAC_PI_2;
        self.center() + DVec2::new(angle.cos(), angle.sin()) * distance
    }

    /// Canvas position of `value` on spoke `index`.
    pub fn point_for_value(&self, index: usize, value: f64) -> DVec2 {
        self.point_position(index, self.pixel_for_value(value))
    }
}
