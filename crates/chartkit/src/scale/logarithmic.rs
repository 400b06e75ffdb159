use crate::config::ScaleOptions;
use crate::rect::Rect;
use crate::scale::ticks::{LogTickParams, Tick, format_log_label, generate_log_ticks};
use crate::scale::{
    Extent, ScaleContext, fraction_at_pixel, numeric_limits, pixel_at_fraction, safe_ratio,
};

/// Share of the axis given to `(0, min_not_zero]` when the domain starts at
/// zero. The value is arbitrary and kept for visual compatibility.
const ZERO_LEAD_IN: f64 = 0.02;

/// Base-10 logarithmic scale.
///
/// Negative samples cannot be placed and are ignored. A domain starting at
/// zero maps values up to `min_not_zero` linearly into the first 2% of the
/// axis and the log range into the rest.
#[derive(Debug, Clone)]
pub struct LogarithmicScale {
    options: ScaleOptions,
    rect: Rect,
    min: f64,
    max: f64,
    min_not_zero: f64,
    ticks: Vec<Tick>,
}

impl LogarithmicScale {
    pub fn new(options: ScaleOptions) -> Self {
        Self {
            options,
            rect: Rect::default(),
            min: 1.0,
            max: 10.0,
            min_not_zero: 1.0,
            ticks: Vec::new(),
        }
    }

    pub fn options(&self) -> &ScaleOptions {
        &self.options
    }

    /// Smallest positive value in the domain.
    pub fn min_not_zero(&self) -> f64 {
        self.min_not_zero
    }

    pub fn determine_data_limits(&mut self, ctx: &ScaleContext<'_>) {
        let horizontal = self.options.is_horizontal();
        let non_negative = |v: f64| v >= 0.0;

        let limits = numeric_limits(ctx, &self.options, false, non_negative);

        let mut smallest_positive = Extent::default();
        for ds in ctx.bound_datasets(&self.options) {
            for (_, value) in ds.numeric_samples(horizontal).filter(|(_, v)| *v > 0.0) {
                smallest_positive.include(value);
            }
        }

        let ticks = &self.options.ticks;
        let (mut min, mut max) = limits.unwrap_or((0.0, 0.0));
        if let Some(explicit) = ticks.min.as_ref().and_then(|b| b.as_value()) {
            min = explicit;
        }
        if let Some(explicit) = ticks.max.as_ref().and_then(|b| b.as_value()) {
            max = explicit;
        }
        min = min.max(0.0);
        max = max.max(0.0);
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }

        if min == max {
            if min > 0.0 {
                let exp = min.log10().floor();
                min = 10f64.powf(exp - 1.0);
                max = 10f64.powf(exp + 1.0);
            } else {
                min = 1.0;
                max = 10.0;
            }
        }

        self.min = min;
        self.max = max;
        self.min_not_zero = smallest_positive
            .get()
            .map(|(smallest, _)| smallest)
            .filter(|v| *v < max)
            .unwrap_or_else(|| self.fallback_min_not_zero());

        tracing::trace!(
            id = %self.options.id,
            min = self.min,
            max = self.max,
            min_not_zero = self.min_not_zero,
            "logarithmic limits"
        );
    }

    fn fallback_min_not_zero(&self) -> f64 {
        if self.min > 0.0 {
            self.min
        } else {
            10f64.powf(self.max.log10().floor() - 1.0)
        }
    }

    pub fn set_geometry(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn geometry(&self) -> Rect {
        self.rect
    }

    pub fn build_ticks(&mut self) {
        let ticks = &self.options.ticks;
        let explicit = |bound: Option<f64>, resolved: f64| bound.filter(|b| *b == resolved);
        let params = LogTickParams {
            min: explicit(ticks.min.as_ref().and_then(|b| b.as_value()), self.min),
            max: explicit(ticks.max.as_ref().and_then(|b| b.as_value()), self.max),
        };

        let mut values = generate_log_ticks(params, self.min, self.max, self.min_not_zero);
        if !self.options.is_horizontal() {
            values.reverse();
        }
        if ticks.reverse {
            values.reverse();
        }

        self.min = values.iter().copied().fold(f64::INFINITY, f64::min);
        self.max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if self.min > 0.0 && self.min_not_zero > self.min {
            self.min_not_zero = self.min;
        }

        let count = values.len();
        self.ticks = values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let (label, major) = format_log_label(value, index, count);
                Tick { value, label, major }
            })
            .collect();
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Position of `value` as a fraction of the axis, from `min` to `max`.
    fn fraction(&self, value: f64) -> f64 {
        if value <= 0.0 {
            return 0.0;
        }
        if self.min == 0.0 {
            let mnz = self.min_not_zero;
            if value <= mnz {
                return ZERO_LEAD_IN * safe_ratio(value, mnz);
            }
            return ZERO_LEAD_IN
                + (1.0 - ZERO_LEAD_IN)
                    * safe_ratio(value.log10() - mnz.log10(), self.max.log10() - mnz.log10());
        }
        safe_ratio(
            value.log10() - self.min.log10(),
            self.max.log10() - self.min.log10(),
        )
    }

    fn value_at(&self, fraction: f64) -> f64 {
        if self.min == 0.0 {
            let mnz = self.min_not_zero;
            if fraction <= 0.0 {
                return 0.0;
            }
            if fraction <= ZERO_LEAD_IN {
                return fraction / ZERO_LEAD_IN * mnz;
            }
            let t = (fraction - ZERO_LEAD_IN) / (1.0 - ZERO_LEAD_IN);
            return 10f64.powf(mnz.log10() + t * (self.max.log10() - mnz.log10()));
        }
        10f64.powf(self.min.log10() + fraction * (self.max.log10() - self.min.log10()))
    }

    pub fn pixel_for_value(&self, value: f64) -> f64 {
        let mut fraction = self.fraction(value);
        if self.options.ticks.reverse {
            fraction = 1.0 - fraction;
        }
        pixel_at_fraction(&self.rect, self.options.is_horizontal(), fraction)
    }

    pub fn value_for_pixel(&self, pixel: f64) -> f64 {
        let mut fraction = fraction_at_pixel(&self.rect, self.options.is_horizontal(), pixel);
        if self.options.ticks.reverse {
            fraction = 1.0 - fraction;
        }
        self.value_at(fraction)
    }

    pub fn pixel_for_tick(&self, index: usize) -> Option<f64> {
        self.ticks.get(index).map(|tick| self.pixel_for_value(tick.value))
    }

    /// The start edge: log scales have no zero to grow from.
    pub fn base_pixel(&self) -> f64 {
        self.pixel_for_value(self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetSamples;
    use crate::types::{AxisId, ChartKind, DataValue, ScaleKind};

    fn scale(values: &[f64]) -> LogarithmicScale {
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

        let mut scale =
            LogarithmicScale::new(ScaleOptions::new(ScaleKind::Logarithmic, AxisId::Y_PRIMARY));
        scale.determine_data_limits(&ctx);
        scale.set_geometry(Rect::new(0.0, 0.0, 100.0, 300.0));
        scale.build_ticks();
        scale
    }

    #[test]
    fn test_decades() {
        let scale = scale(&[1.0, 1000.0]);
        assert_eq!(scale.min(), 1.0);
        assert_eq!(scale.max(), 1000.0);
        assert_eq!(scale.pixel_for_value(1.0), 300.0);
        assert_eq!(scale.pixel_for_value(1000.0), 0.0);
        assert!((scale.pixel_for_value(10.0) - 200.0).abs() < 1e-9);
        assert_eq!(scale.ticks()[0].label, "1e+3");
    }

    #[test]
    fn test_zero_lead_in() {
        let scale = scale(&[0.0, 10.0, 100.0]);
        assert_eq!(scale.min(), 0.0);
        assert_eq!(scale.min_not_zero(), 10.0);
        assert_eq!(scale.pixel_for_value(0.0), 300.0);
        assert!((scale.pixel_for_value(10.0) - 294.0).abs() < 1e-9);
        assert!(scale.pixel_for_value(100.0).abs() < 1e-9);
        assert!((scale.value_for_pixel(297.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_collapsed_domains() {
        let scale_single = scale(&[50.0]);
        assert_eq!(scale_single.min(), 1.0);
        assert_eq!(scale_single.max(), 100.0);

        let scale_zero = scale(&[0.0]);
        assert_eq!(scale_zero.min(), 1.0);
        assert_eq!(scale_zero.max(), 10.0);

        let empty = scale(&[]);
        assert_eq!((empty.min(), empty.max()), (1.0, 10.0));
    }

    #[test]
    fn test_negative_samples_are_ignored() {
        let scale = scale(&[-5.0, 10.0, 100.0]);
        assert_eq!(scale.min(), 10.0);
        assert!(scale.pixel_for_value(-5.0).is_finite());
    }
}
