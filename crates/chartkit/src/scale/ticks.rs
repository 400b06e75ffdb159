//! Tick generation and tick label formatting.

/// Upper bound on ticks a generator produces, whatever the options ask for.
const MAX_GENERATED_TICKS: f64 = 1000.0;

/// One tick of a scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Data value (category scales: absolute label index).
    pub value: f64,
    /// Formatted label; empty for unlabelled minor ticks.
    pub label: String,
    /// Major ticks carry a label.
    pub major: bool,
}

impl Tick {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            major: true,
        }
    }
}

/// A "nice" number close to `range`: 1, 2, 5 or 10 times a power of ten.
///
/// With `round` the closest nice number is picked, otherwise the smallest
/// one not below `range`.
pub fn nice_num(range: f64, round: bool) -> f64 {
    if !range.is_finite() || range <= 0.0 {
        return 1.0;
    }

    let exponent = range.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = range / magnitude;

    let nice_fraction = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice_fraction * magnitude
}

fn almost_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn almost_whole(value: f64, epsilon: f64) -> bool {
    let rounded = value.round();
    rounded - epsilon < value && rounded + epsilon > value
}

/// Inputs of the linear tick generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTickParams {
    /// Explicit lower bound from the tick options.
    pub min: Option<f64>,
    /// Explicit upper bound from the tick options.
    pub max: Option<f64>,
    pub step_size: Option<f64>,
    pub max_ticks: usize,
}

/// Generate evenly spaced ticks covering `[data_min, data_max]`, ascending.
///
/// Explicit bounds replace the first and last nice tick, which may leave the
/// outer intervals shorter than the spacing.
pub fn generate_linear_ticks(params: LinearTickParams, data_min: f64, data_max: f64) -> Vec<f64> {
    let max_ticks = params.max_ticks.max(2) as f64;
    let auto_spacing = || nice_num(nice_num(data_max - data_min, false) / (max_ticks - 1.0), true);

    let mut spacing = match params.step_size {
        Some(step) if step > 0.0 && step.is_finite() => step,
        _ => auto_spacing(),
    };
    if (data_max - data_min) / spacing > MAX_GENERATED_TICKS {
        tracing::warn!(spacing, data_min, data_max, "tick step too small, using nice spacing");
        spacing = auto_spacing();
    }

    let mut nice_min = (data_min / spacing).floor() * spacing;
    let mut nice_max = (data_max / spacing).ceil() * spacing;

    if let (Some(min), Some(max), Some(step)) = (params.min, params.max, params.step_size)
        && step > 0.0
        && almost_whole((max - min) / step, spacing / 1000.0)
    {
        nice_min = min;
        nice_max = max;
    }

    let spaces = (nice_max - nice_min) / spacing;
    let num_spaces = if almost_equal(spaces, spaces.round(), spacing / 1000.0) {
        spaces.round()
    } else {
        spaces.ceil()
    }
    .max(0.0) as usize;

    let mut ticks = Vec::with_capacity(num_spaces + 1);
    ticks.push(params.min.unwrap_or(nice_min));
    for j in 1..num_spaces {
        ticks.push(nice_min + j as f64 * spacing);
    }
    ticks.push(params.max.unwrap_or(nice_max));
    ticks
}

/// Inputs of the logarithmic tick generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogTickParams {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Generate the significands 1..9 of every decade in `[data_min, data_max]`,
/// ascending. A zero minimum emits `0` and continues from the decade of
/// `min_not_zero`.
pub fn generate_log_ticks(
    params: LogTickParams,
    data_min: f64,
    data_max: f64,
    min_not_zero: f64,
) -> Vec<f64> {
    let end_exp = data_max.log10().floor();
    let end_significand = (data_max / 10f64.powf(end_exp)).ceil();

    let mut ticks = Vec::new();
    let start = params.min.filter(|min| *min > 0.0).or_else(|| {
        let min = params.min.unwrap_or(data_min);
        if min > 0.0 {
            Some(decade_value(1.0, min.log10().floor()))
        } else {
            ticks.push(0.0);
            (min_not_zero > 0.0).then_some(min_not_zero)
        }
    });
    let Some(first) = start.filter(|v| v.is_finite()) else {
        ticks.push(params.max.unwrap_or(data_max));
        return ticks;
    };

    let mut exp = first.log10().floor();
    let mut significand = (first / 10f64.powf(exp)).floor().max(1.0);
    let mut tick_value = if ticks.is_empty() {
        first
    } else {
        decade_value(significand, exp)
    };

    if !end_exp.is_finite() {
        ticks.push(params.max.unwrap_or(tick_value));
        return ticks;
    }

    loop {
        ticks.push(tick_value);

        significand += 1.0;
        if significand == 10.0 {
            significand = 1.0;
            exp += 1.0;
        }
        tick_value = decade_value(significand, exp);

        let more = exp < end_exp || (exp == end_exp && significand < end_significand);
        if !more || ticks.len() as f64 > MAX_GENERATED_TICKS {
            break;
        }
    }

    ticks.push(params.max.unwrap_or(tick_value));
    ticks
}

/// `significand * 10^exp`, dividing for negative exponents so 0.1, 0.2, ...
/// come out exact.
fn decade_value(significand: f64, exp: f64) -> f64 {
    if exp < 0.0 {
        significand / 10f64.powf(-exp)
    } else {
        significand * 10f64.powf(exp)
    }
}

/// Label for a linear tick: decimals follow the spacing of the tick list.
pub fn format_linear_label(value: f64, ticks: &[f64]) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }

    let mut delta = match ticks {
        [_, b, c, _, ..] => c - b,
        [a, b, ..] => b - a,
        _ => 0.0,
    };
    if delta.abs() > 1.0 && value != value.floor() {
        delta = value - value.floor();
    }

    let decimals = if delta == 0.0 || !delta.is_finite() {
        0
    } else {
        (-delta.abs().log10().floor()).clamp(0.0, 20.0) as usize
    };
    format!("{:.*}", decimals, value)
}

/// Exponential notation with an explicit exponent sign: `1e+2`, `5e-1`.
pub fn format_exponential(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Label for a logarithmic tick, and whether the tick is major.
///
/// Significands 1, 2 and 5 and the outermost ticks are labelled; everything
/// else gets an empty label.
pub fn format_log_label(value: f64, index: usize, count: usize) -> (String, bool) {
    if value == 0.0 {
        return ("0".to_owned(), true);
    }

    let remain = value / 10f64.powf(value.abs().log10().floor());
    let is_nice = [1.0, 2.0, 5.0]
        .iter()
        .any(|nice| almost_equal(remain, *nice, 1e-9));
    let is_edge = index == 0 || index + 1 == count;

    if is_nice || is_edge {
        (format_exponential(value), true)
    } else {
        (String::new(), false)
    }
}
