//! Numeric domain shared by the linear and radial-linear scales.

use crate::config::TickOptions;
use crate::scale::ticks::{LinearTickParams, Tick, format_linear_label, generate_linear_ticks};

/// Numeric domain plus the mapping endpoints.
///
/// `start`/`end` are `min`/`max`, swapped when the ticks are reversed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearBase {
    pub min: f64,
    pub max: f64,
    pub start: f64,
    pub end: f64,
    /// Index of the `0` tick, if any.
    pub zero_line_index: Option<usize>,
}

impl Default for LinearBase {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            start: 0.0,
            end: 0.0,
            zero_line_index: None,
        }
    }
}

impl LinearBase {
    /// Start from the data limits; an empty domain starts as `0..0`.
    pub fn from_limits(limits: Option<(f64, f64)>) -> Self {
        let (min, max) = limits.unwrap_or((0.0, 0.0));
        Self {
            min,
            max,
            start: min,
            end: max,
            zero_line_index: None,
        }
    }

    /// Apply `begin_at_zero`, explicit and suggested bounds, then widen a
    /// collapsed domain.
    pub fn handle_tick_range_options(&mut self, ticks: &TickOptions) {
        if ticks.begin_at_zero {
            if self.min < 0.0 && self.max < 0.0 {
                self.max = 0.0;
            } else if self.min > 0.0 && self.max > 0.0 {
                self.min = 0.0;
            }
        }

        if let Some(min) = ticks.min.as_ref().and_then(|b| b.as_value()) {
            self.min = min;
        } else if let Some(suggested) = ticks.suggested_min {
            self.min = self.min.min(suggested);
        }

        if let Some(max) = ticks.max.as_ref().and_then(|b| b.as_value()) {
            self.max = max;
        } else if let Some(suggested) = ticks.suggested_max {
            self.max = self.max.max(suggested);
        }

        if self.min > self.max {
            std::mem::swap(&mut self.min, &mut self.max);
        }

        if self.min == self.max {
            self.max += 1.0;
            if !ticks.begin_at_zero {
                self.min -= 1.0;
            }
        }

        self.start = self.min;
        self.end = self.max;
    }

    /// Generate numeric ticks and re-derive the domain from their extremes.
    ///
    /// `descending` lists ticks from the largest value, as vertical axes do.
    pub fn build_ticks(
        &mut self,
        ticks: &TickOptions,
        max_ticks: usize,
        descending: bool,
    ) -> Vec<Tick> {
        // Explicit bounds only pin the end ticks when they survived range handling.
        let explicit = |bound: Option<f64>, resolved: f64| bound.filter(|b| *b == resolved);
        let params = LinearTickParams {
            min: explicit(ticks.min.as_ref().and_then(|b| b.as_value()), self.min),
            max: explicit(ticks.max.as_ref().and_then(|b| b.as_value()), self.max),
            step_size: ticks.step_size,
            max_ticks: max_ticks.max(2),
        };

        let mut values = generate_linear_ticks(params, self.min, self.max);
        if descending {
            values.reverse();
        }

        self.min = values.iter().copied().fold(f64::INFINITY, f64::min);
        self.max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if ticks.reverse {
            values.reverse();
            self.start = self.max;
            self.end = self.min;
        } else {
            self.start = self.min;
            self.end = self.max;
        }

        self.zero_line_index = values.iter().position(|v| *v == 0.0);
        values
            .iter()
            .map(|&v| Tick::new(v, format_linear_label(v, &values)))
            .collect()
    }

    /// `(v - start) / (end - start)`, zero for a collapsed mapping.
    pub fn fraction(&self, value: f64) -> f64 {
        let range = self.end - self.start;
        if range == 0.0 || !range.is_finite() {
            return 0.0;
        }
        (value - self.start) / range
    }

    /// Inverse of [`LinearBase::fraction`].
    pub fn value_at(&self, fraction: f64) -> f64 {
        self.start + fraction * (self.end - self.start)
    }

    /// Zero clamped into the domain.
    pub fn base_value(&self) -> f64 {
        0.0_f64.clamp(self.min.min(self.max), self.max.max(self.min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TickBound;

    #[test]
    fn test_single_value_is_widened() {
        let mut base = LinearBase::from_limits(Some((5.0, 5.0)));
        base.handle_tick_range_options(&TickOptions::default());
        assert_eq!((base.min, base.max), (4.0, 6.0));

        let mut base = LinearBase::from_limits(Some((5.0, 5.0)));
        base.handle_tick_range_options(&TickOptions {
            begin_at_zero: true,
            ..Default::default()
        });
        assert_eq!((base.min, base.max), (0.0, 5.0));
    }

    #[test]
    fn test_empty_domain() {
        let mut base = LinearBase::from_limits(None);
        base.handle_tick_range_options(&TickOptions::default());
        assert_eq!((base.min, base.max), (-1.0, 1.0));

        let mut base = LinearBase::from_limits(None);
        base.handle_tick_range_options(&TickOptions {
            begin_at_zero: true,
            ..Default::default()
        });
        assert_eq!((base.min, base.max), (0.0, 1.0));
    }

    #[test]
    fn test_begin_at_zero_and_suggested() {
        let mut base = LinearBase::from_limits(Some((-8.0, -2.0)));
        base.handle_tick_range_options(&TickOptions {
            begin_at_zero: true,
            suggested_min: Some(-5.0),
            ..Default::default()
        });
        assert_eq!((base.min, base.max), (-8.0, 0.0));

        let mut base = LinearBase::from_limits(Some((2.0, 8.0)));
        base.handle_tick_range_options(&TickOptions {
            suggested_max: Some(20.0),
            max: None,
            min: Some(TickBound::Value(1.0)),
            ..Default::default()
        });
        assert_eq!((base.min, base.max), (1.0, 20.0));
    }

    #[test]
    fn test_build_ticks_extends_domain() {
        let mut base = LinearBase::from_limits(Some((3.0, 97.0)));
        base.handle_tick_range_options(&TickOptions::default());
        let ticks = base.build_ticks(&TickOptions::default(), 11, false);
        assert_eq!((base.min, base.max), (0.0, 100.0));
        assert_eq!(ticks[0].label, "0");
        assert_eq!(ticks[10].label, "100");
        assert_eq!(base.zero_line_index, Some(0));
    }

    #[test]
    fn test_reverse_swaps_endpoints() {
        let opts = TickOptions {
            reverse: true,
            ..Default::default()
        };
        let mut base = LinearBase::from_limits(Some((0.0, 10.0)));
        base.handle_tick_range_options(&opts);
        let ticks = base.build_ticks(&opts, 11, true);
        assert_eq!(base.start, 10.0);
        assert_eq!(base.end, 0.0);
        assert_eq!(ticks[0].value, 0.0);
    }
}
