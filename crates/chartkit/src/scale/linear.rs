use crate::config::ScaleOptions;
use crate::rect::Rect;
use crate::scale::ticks::Tick;
use crate::scale::{
    LinearBase, ScaleContext, cartesian_tick_limit, fraction_at_pixel, numeric_limits,
    pixel_at_fraction,
};

/// Linear numeric scale.
#[derive(Debug, Clone)]
pub struct LinearScale {
    options: ScaleOptions,
    rect: Rect,
    base: LinearBase,
    ticks: Vec<Tick>,
}

impl LinearScale {
    pub fn new(options: ScaleOptions) -> Self {
        Self {
            options,
            rect: Rect::default(),
            base: LinearBase::default(),
            ticks: Vec::new(),
        }
    }

    pub fn options(&self) -> &ScaleOptions {
        &self.options
    }

    pub fn determine_data_limits(&mut self, ctx: &ScaleContext<'_>) {
        let limits = numeric_limits(ctx, &self.options, true, |_| true);
        self.base = LinearBase::from_limits(limits);
        self.base.handle_tick_range_options(&self.options.ticks);
        tracing::trace!(
            id = %self.options.id,
            min = self.base.min,
            max = self.base.max,
            "linear limits"
        );
    }

    pub fn set_geometry(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn geometry(&self) -> Rect {
        self.rect
    }

    pub fn build_ticks(&mut self) {
        let max_ticks = cartesian_tick_limit(&self.options, &self.rect);
        let descending = !self.options.is_horizontal();
        self.ticks = self.base.build_ticks(&self.options.ticks, max_ticks, descending);
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

    /// Index of the tick at zero, if zero is a tick.
    pub fn zero_line_index(&self) -> Option<usize> {
        self.base.zero_line_index
    }

    pub fn pixel_for_value(&self, value: f64) -> f64 {
        pixel_at_fraction(&self.rect, self.options.is_horizontal(), self.base.fraction(value))
    }

    pub fn value_for_pixel(&self, pixel: f64) -> f64 {
        self.base
            .value_at(fraction_at_pixel(&self.rect, self.options.is_horizontal(), pixel))
    }

    pub fn pixel_for_tick(&self, index: usize) -> Option<f64> {
        self.ticks.get(index).map(|tick| self.pixel_for_value(tick.value))
    }

    pub fn base_pixel(&self) -> f64 {
        self.pixel_for_value(self.base.base_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetSamples;
    use crate::types::{AxisId, AxisPosition, ChartKind, DataValue, ScaleKind};

    fn scale(position: AxisPosition, values: &[f64]) -> LinearScale {
        let mut options = ScaleOptions::new(ScaleKind::Linear, AxisId::Y_PRIMARY);
        options.position = position;
        if position.is_horizontal() {
            options.id = AxisId::X_PRIMARY;
        }
        let datasets = [DatasetSamples {
            index: 0,
            kind: ChartKind::Line,
            visible: true,
            x_axis_id: Some(AxisId::X_PRIMARY),
            y_axis_id: Some(AxisId::Y_PRIMARY),
            values: values.iter().map(|v| DataValue::Number(*v)).collect(),
            hidden: vec![false; values.len()],
        }];
        let ctx = ScaleContext {
            labels: &[],
            x_labels: None,
            y_labels: None,
            datasets: &datasets,
        };

        let mut scale = LinearScale::new(options);
        scale.determine_data_limits(&ctx);
        scale.set_geometry(Rect::new(10.0, 20.0, 400.0, 200.0));
        scale.build_ticks();
        scale
    }

    #[test]
    fn test_vertical_mapping() {
        let scale = scale(AxisPosition::Left, &[0.0, 50.0, 100.0]);
        assert_eq!(scale.min(), 0.0);
        assert_eq!(scale.max(), 100.0);
        assert_eq!(scale.pixel_for_value(0.0), 220.0);
        assert_eq!(scale.pixel_for_value(100.0), 20.0);
        assert_eq!(scale.pixel_for_value(50.0), 120.0);
        assert_eq!(scale.base_pixel(), 220.0);
        assert_eq!(scale.ticks().first().map(|t| t.value), Some(100.0));
    }

    #[test]
    fn test_horizontal_mapping_round_trip() {
        let scale = scale(AxisPosition::Bottom, &[-20.0, 80.0]);
        for value in [-20.0, 0.0, 13.5, 80.0] {
            let pixel = scale.pixel_for_value(value);
            assert!((scale.value_for_pixel(pixel) - value).abs() < 1e-9);
        }
        assert_eq!(scale.pixel_for_tick(0), Some(10.0));
        assert!(scale.zero_line_index().is_some());
    }

    #[test]
    fn test_base_pixel_clamps_to_domain() {
        let scale = scale(AxisPosition::Left, &[40.0, 60.0]);
        assert!(scale.min() > 0.0);
        assert_eq!(scale.base_pixel(), 220.0);
    }
}
