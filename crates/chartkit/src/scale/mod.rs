//! Scales: data value to pixel mapping and tick generation.
//!
//! Four kinds share one interface through the closed [`Scale`] enum:
//!
//! - [`CategoryScale`]: discrete labels, one slot per label
//! - [`LinearScale`]: evenly spaced numeric ticks
//! - [`LogarithmicScale`]: base-10 decades, with a linear lead-in for zero
//! - [`RadialLinearScale`]: distance from the center of a radar chart
//!
//! Per update the chart calls, in order, [`Scale::determine_data_limits`],
//! [`Scale::set_geometry`] (through the layout provider) and
//! [`Scale::build_ticks`]. After that the mapping functions are valid until
//! the next update.

mod category;
mod linear;
mod linear_base;
mod logarithmic;
mod radial;
mod registry;
pub mod ticks;

pub use category::CategoryScale;
pub use linear::LinearScale;
pub use linear_base::LinearBase;
pub use logarithmic::LogarithmicScale;
pub use radial::RadialLinearScale;
pub use registry::ScaleRegistry;
pub use ticks::Tick;

use chartkit_core::alloc::HashMap;
use indexmap::IndexMap;

use crate::config::ScaleOptions;
use crate::dataset::DatasetSamples;
use crate::rect::Rect;
use crate::types::{AxisId, ChartKind, DataValue, ScaleKind};

/// What scales read from the chart while determining limits and ticks.
#[derive(Debug, Clone, Copy)]
pub struct ScaleContext<'a> {
    pub labels: &'a [String],
    pub x_labels: Option<&'a [String]>,
    pub y_labels: Option<&'a [String]>,
    pub datasets: &'a [DatasetSamples],
}

impl<'a> ScaleContext<'a> {
    /// Category labels for an axis of the given orientation.
    pub fn labels_for(&self, horizontal: bool) -> &'a [String] {
        let specific = if horizontal { self.x_labels } else { self.y_labels };
        specific.unwrap_or(self.labels)
    }

    /// Visible datasets bound to the scale described by `options`.
    pub(crate) fn bound_datasets<'s>(
        &'s self,
        options: &'s ScaleOptions,
    ) -> impl Iterator<Item = &'a DatasetSamples> + 's {
        let horizontal = options.is_horizontal();
        self.datasets.iter().filter(move |ds| {
            if !ds.visible {
                return false;
            }
            if options.kind == ScaleKind::RadialLinear {
                return ds.kind == ChartKind::Radar;
            }
            let bound = if horizontal { ds.x_axis_id } else { ds.y_axis_id };
            bound == Some(options.id)
        })
    }
}

impl DatasetSamples {
    /// `(index, value)` of every usable sample for an axis orientation:
    /// numeric, finite and not on a hidden element.
    pub(crate) fn numeric_samples(
        &self,
        horizontal: bool,
    ) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().enumerate().filter_map(move |(i, value)| {
            if self.hidden.get(i).copied().unwrap_or(false) {
                return None;
            }
            value.coordinate(horizontal).map(|v| (i, v))
        })
    }
}

/// Running min/max.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Extent(Option<(f64, f64)>);

impl Extent {
    pub fn include(&mut self, value: f64) {
        self.0 = Some(match self.0 {
            Some((min, max)) => (min.min(value), max.max(value)),
            None => (value, value),
        });
    }

    pub fn get(self) -> Option<(f64, f64)> {
        self.0
    }
}

/// Per-index sums of one dataset kind.
#[derive(Debug, Default)]
struct StackTotals {
    positive: Vec<Option<f64>>,
    negative: Vec<Option<f64>>,
}

fn slot_at(slots: &mut Vec<Option<f64>>, index: usize) -> &mut Option<f64> {
    if slots.len() <= index {
        slots.resize(index + 1, None);
    }
    &mut slots[index]
}

fn add_at(slots: &mut Vec<Option<f64>>, index: usize, value: f64) {
    let slot = slot_at(slots, index);
    *slot = Some(slot.unwrap_or(0.0) + value);
}

/// Data limits of a numeric scale.
///
/// Stacked scales sum samples per index and dataset kind, positive and
/// negative contributions apart unless `split_sign` is off. Only sums that
/// received a contribution count towards the extent.
pub(crate) fn numeric_limits(
    ctx: &ScaleContext<'_>,
    options: &ScaleOptions,
    split_sign: bool,
    accept: impl Fn(f64) -> bool,
) -> Option<(f64, f64)> {
    let horizontal = options.is_horizontal();
    let mut extent = Extent::default();

    if !options.stacked || options.kind == ScaleKind::RadialLinear {
        for ds in ctx.bound_datasets(options) {
            for (_, value) in ds.numeric_samples(horizontal).filter(|(_, v)| accept(*v)) {
                extent.include(value);
            }
        }
        return extent.get();
    }

    let mut per_kind: HashMap<ChartKind, StackTotals> = HashMap::default();
    for ds in ctx.bound_datasets(options) {
        let totals = per_kind.entry(ds.kind).or_default();
        for (index, value) in ds.numeric_samples(horizontal).filter(|(_, v)| accept(*v)) {
            if options.relative_points {
                *slot_at(&mut totals.positive, index) = Some(100.0);
            } else if split_sign && value < 0.0 {
                add_at(&mut totals.negative, index, value);
            } else {
                add_at(&mut totals.positive, index, value);
            }
        }
    }

    for totals in per_kind.values() {
        for sum in totals.positive.iter().chain(&totals.negative).flatten() {
            extent.include(*sum);
        }
    }
    extent.get()
}

/// Tick budget of a cartesian axis, from the pixels available to it.
pub(crate) fn cartesian_tick_limit(options: &ScaleOptions, rect: &Rect) -> usize {
    let limit = options.ticks.max_ticks_limit.max(1) as f64;
    let wanted = if options.is_horizontal() {
        (rect.width / 50.0).ceil()
    } else {
        (rect.height / (2.0 * options.ticks.font_size.max(1.0))).ceil()
    };
    let count = if wanted.is_finite() { wanted.min(limit) } else { limit };
    count.max(2.0) as usize
}

/// Divide, yielding zero instead of a non-finite result.
pub(crate) fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Position along a cartesian axis from a fraction of its length.
///
/// Horizontal axes grow rightwards from `left`, vertical ones upwards from
/// `bottom`.
pub(crate) fn pixel_at_fraction(rect: &Rect, horizontal: bool, fraction: f64) -> f64 {
    if horizontal {
        rect.left() + rect.width * fraction
    } else {
        rect.bottom() - rect.height * fraction
    }
}

/// Inverse of [`pixel_at_fraction`].
pub(crate) fn fraction_at_pixel(rect: &Rect, horizontal: bool, pixel: f64) -> f64 {
    if horizontal {
        safe_ratio(pixel - rect.left(), rect.width)
    } else {
        safe_ratio(rect.bottom() - pixel, rect.height)
    }
}

/// A scale of any kind.
#[derive(Debug, Clone)]
pub enum Scale {
    Category(CategoryScale),
    Linear(LinearScale),
    Logarithmic(LogarithmicScale),
    RadialLinear(RadialLinearScale),
}

macro_rules! each_scale {
    ($self:expr, $scale:ident => $body:expr) => {
        match $self {
            Scale::Category($scale) => $body,
            Scale::Linear($scale) => $body,
            Scale::Logarithmic($scale) => $body,
            Scale::RadialLinear($scale) => $body,
        }
    };
}

impl Scale {
    /// Create a scale of `options.kind`.
    pub fn new(options: ScaleOptions) -> Self {
        match options.kind {
            ScaleKind::Category => Scale::Category(CategoryScale::new(options)),
            ScaleKind::Linear => Scale::Linear(LinearScale::new(options)),
            ScaleKind::Logarithmic => Scale::Logarithmic(LogarithmicScale::new(options)),
            ScaleKind::RadialLinear => Scale::RadialLinear(RadialLinearScale::new(options)),
        }
    }

    pub fn options(&self) -> &ScaleOptions {
        each_scale!(self, s => s.options())
    }

    pub fn id(&self) -> AxisId {
        self.options().id
    }

    pub fn kind(&self) -> ScaleKind {
        self.options().kind
    }

    /// Horizontal scales map along x. Radial scales are never horizontal.
    pub fn is_horizontal(&self) -> bool {
        self.options().is_horizontal()
    }

    /// Compute the domain from the bound datasets.
    pub fn determine_data_limits(&mut self, ctx: &ScaleContext<'_>) {
        each_scale!(self, s => s.determine_data_limits(ctx))
    }

    /// Assign the pixel area; called by the layout provider.
    pub fn set_geometry(&mut self, rect: Rect) {
        each_scale!(self, s => s.set_geometry(rect))
    }

    pub fn geometry(&self) -> Rect {
        each_scale!(self, s => s.geometry())
    }

    /// Generate ticks and their labels for the current domain and geometry.
    pub fn build_ticks(&mut self) {
        chartkit_core::profiling::profile_function!();
        each_scale!(self, s => s.build_ticks())
    }

    pub fn ticks(&self) -> &[Tick] {
        each_scale!(self, s => s.ticks())
    }

    /// Lower end of the domain (category scales: first visible index).
    pub fn min(&self) -> f64 {
        each_scale!(self, s => s.min())
    }

    /// Upper end of the domain (category scales: last visible index).
    pub fn max(&self) -> f64 {
        each_scale!(self, s => s.max())
    }

    /// Pixel for a data value. For category scales the value is a label index.
    /// Radial scales return the distance from the center.
    pub fn pixel_for_value(&self, value: f64) -> f64 {
        each_scale!(self, s => s.pixel_for_value(value))
    }

    /// Inverse of [`Scale::pixel_for_value`].
    pub fn value_for_pixel(&self, pixel: f64) -> f64 {
        each_scale!(self, s => s.value_for_pixel(pixel))
    }

    /// Pixel of the tick at `index`. Category ticks are placed on grid lines,
    /// without the half-slot offset of values.
    pub fn pixel_for_tick(&self, index: usize) -> Option<f64> {
        each_scale!(self, s => s.pixel_for_tick(index))
    }

    /// Pixel at a fraction of the scale's length: `left + width * d` or
    /// `top + height * d`.
    pub fn pixel_for_decimal(&self, decimal: f64) -> f64 {
        let rect = self.geometry();
        if self.is_horizontal() {
            rect.left() + rect.width * decimal
        } else {
            rect.top() + rect.height * decimal
        }
    }

    /// Pixel for a raw sample at `index` of its dataset. `None` when the
    /// sample cannot be placed on this scale.
    pub fn pixel_for_data(&self, value: &DataValue, index: usize) -> Option<f64> {
        match self {
            Scale::Category(s) => Some(s.pixel_for_data(value, index)),
            _ => value
                .coordinate(self.is_horizontal())
                .map(|v| self.pixel_for_value(v)),
        }
    }

    /// Pixel bars and reset points grow from.
    pub fn base_pixel(&self) -> f64 {
        each_scale!(self, s => s.base_pixel())
    }

    pub fn as_radial(&self) -> Option<&RadialLinearScale> {
        match self {
            Scale::RadialLinear(s) => Some(s),
            _ => None,
        }
    }
}

/// The scales of a chart, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct ScaleSet {
    scales: IndexMap<AxisId, Scale>,
}

impl ScaleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a scale. Returns the scale it replaced, if any.
    pub fn insert(&mut self, scale: Scale) -> Option<Scale> {
        self.scales.insert(scale.id(), scale)
    }

    pub fn get(&self, id: AxisId) -> Option<&Scale> {
        self.scales.get(&id)
    }

    pub fn get_mut(&mut self, id: AxisId) -> Option<&mut Scale> {
        self.scales.get_mut(&id)
    }

    pub fn contains(&self, id: AxisId) -> bool {
        self.scales.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scale> {
        self.scales.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Scale> {
        self.scales.values_mut()
    }

    /// The radial scale, if the chart has one.
    pub fn radial(&self) -> Option<&RadialLinearScale> {
        self.iter().find_map(Scale::as_radial)
    }

    pub fn clear(&mut self) {
        self.scales.clear();
    }
}
