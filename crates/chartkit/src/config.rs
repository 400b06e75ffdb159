//! Typed chart configuration.
//!
//! User options are *patches* (`*Config` types, every field optional) that
//! are resolved into complete option structures with this precedence:
//!
//! 1. global defaults (`Default` impls),
//! 2. scale-kind defaults from the chart's [`ScaleRegistry`],
//! 3. chart-kind defaults ([`chart_kind_defaults`]),
//! 4. user options.
//!
//! Axes are merged by position in their list. Chart-kind defaults for an axis
//! are dropped when the user picks a different scale kind for it. Labels and
//! datasets are never merged: they are replaced wholesale.

use std::rc::Rc;
use std::time::Duration;

use chartkit_core::EasingFunction;

use crate::animation::AnimationProgress;
use crate::dataset::Dataset;
use crate::scale::ScaleRegistry;
use crate::types::{AxisId, AxisPosition, ChartKind, ScaleKind};

/// Callback invoked by the animation service.
pub type AnimationCallback = Rc<dyn Fn(&AnimationProgress)>;

/// An explicit tick bound: a number for numeric scales, a label name for
/// category scales.
#[derive(Debug, Clone, PartialEq)]
pub enum TickBound {
    Value(f64),
    Label(String),
}

impl TickBound {
    /// Numeric bound; numeric label strings are accepted.
    pub fn as_value(&self) -> Option<f64> {
        match self {
            TickBound::Value(v) => v.is_finite().then_some(*v),
            TickBound::Label(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl From<f64> for TickBound {
    fn from(value: f64) -> Self {
        TickBound::Value(value)
    }
}

impl From<&str> for TickBound {
    fn from(label: &str) -> Self {
        TickBound::Label(label.to_owned())
    }
}

/// Resolved tick options.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOptions {
    /// Hard lower bound.
    pub min: Option<TickBound>,
    /// Hard upper bound.
    pub max: Option<TickBound>,
    /// Lower bound that only widens the data range.
    pub suggested_min: Option<f64>,
    /// Upper bound that only widens the data range.
    pub suggested_max: Option<f64>,
    /// Pull a one-signed range to zero.
    pub begin_at_zero: bool,
    /// Fixed spacing between numeric ticks.
    pub step_size: Option<f64>,
    /// Upper limit on generated ticks.
    pub max_ticks_limit: usize,
    /// Swap the start and end of the mapping.
    pub reverse: bool,
    /// Tick label font size, drives vertical and radial tick density.
    pub font_size: f64,
}

impl Default for TickOptions {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            suggested_min: None,
            suggested_max: None,
            begin_at_zero: false,
            step_size: None,
            max_ticks_limit: 11,
            reverse: false,
            font_size: 12.0,
        }
    }
}

/// Resolved options of one scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleOptions {
    pub kind: ScaleKind,
    pub id: AxisId,
    pub position: AxisPosition,
    pub stacked: bool,
    /// Stacked percentage mode: every positive accumulation counts as 100.
    pub relative_points: bool,
    /// Center category values in their slots.
    pub offset_grid_lines: bool,
    /// Share of a category slot used by its bars.
    pub category_percentage: f64,
    /// Share of a bar's lane that the bar fills.
    pub bar_percentage: f64,
    pub ticks: TickOptions,
}

impl ScaleOptions {
    /// Global defaults for a scale of `kind`.
    pub fn new(kind: ScaleKind, id: AxisId) -> Self {
        Self {
            kind,
            id,
            position: AxisPosition::Left,
            stacked: false,
            relative_points: false,
            offset_grid_lines: false,
            category_percentage: 0.8,
            bar_percentage: 0.9,
            ticks: TickOptions::default(),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.position.is_horizontal()
    }
}

/// Patch over [`TickOptions`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickConfig {
    pub min: Option<TickBound>,
    pub max: Option<TickBound>,
    pub suggested_min: Option<f64>,
    pub suggested_max: Option<f64>,
    pub begin_at_zero: Option<bool>,
    pub step_size: Option<f64>,
    pub max_ticks_limit: Option<usize>,
    pub reverse: Option<bool>,
    pub font_size: Option<f64>,
}

impl TickConfig {
    fn merged(&self, over: &TickConfig) -> TickConfig {
        TickConfig {
            min: over.min.clone().or_else(|| self.min.clone()),
            max: over.max.clone().or_else(|| self.max.clone()),
            suggested_min: over.suggested_min.or(self.suggested_min),
            suggested_max: over.suggested_max.or(self.suggested_max),
            begin_at_zero: over.begin_at_zero.or(self.begin_at_zero),
            step_size: over.step_size.or(self.step_size),
            max_ticks_limit: over.max_ticks_limit.or(self.max_ticks_limit),
            reverse: over.reverse.or(self.reverse),
            font_size: over.font_size.or(self.font_size),
        }
    }

    fn apply(&self, ticks: &mut TickOptions) {
        if let Some(min) = &self.min {
            ticks.min = Some(min.clone());
        }
        if let Some(max) = &self.max {
            ticks.max = Some(max.clone());
        }
        if self.suggested_min.is_some() {
            ticks.suggested_min = self.suggested_min;
        }
        if self.suggested_max.is_some() {
            ticks.suggested_max = self.suggested_max;
        }
        if let Some(v) = self.begin_at_zero {
            ticks.begin_at_zero = v;
        }
        if self.step_size.is_some() {
            ticks.step_size = self.step_size;
        }
        if let Some(v) = self.max_ticks_limit {
            ticks.max_ticks_limit = v;
        }
        if let Some(v) = self.reverse {
            ticks.reverse = v;
        }
        if let Some(v) = self.font_size {
            ticks.font_size = v;
        }
    }
}

/// Patch over [`ScaleOptions`].
///
/// ```
/// use chartkit::{ScaleConfig, ScaleKind};
///
/// let axis = ScaleConfig::of(ScaleKind::Logarithmic).stacked(true).min(1.0);
/// assert_eq!(axis.kind, Some(ScaleKind::Logarithmic));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleConfig {
    pub kind: Option<ScaleKind>,
    pub id: Option<AxisId>,
    pub position: Option<AxisPosition>,
    pub stacked: Option<bool>,
    pub relative_points: Option<bool>,
    pub offset_grid_lines: Option<bool>,
    pub category_percentage: Option<f64>,
    pub bar_percentage: Option<f64>,
    pub ticks: TickConfig,
}

impl ScaleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch selecting a scale kind.
    pub fn of(kind: ScaleKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: AxisId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn position(mut self, position: AxisPosition) -> Self {
        self.position = Some(position);
        self
    }

    pub fn stacked(mut self, stacked: bool) -> Self {
        self.stacked = Some(stacked);
        self
    }

    pub fn relative_points(mut self, relative: bool) -> Self {
        self.relative_points = Some(relative);
        self
    }

    pub fn offset_grid_lines(mut self, offset: bool) -> Self {
        self.offset_grid_lines = Some(offset);
        self
    }

    pub fn begin_at_zero(mut self, begin_at_zero: bool) -> Self {
        self.ticks.begin_at_zero = Some(begin_at_zero);
        self
    }

    pub fn min(mut self, min: impl Into<TickBound>) -> Self {
        self.ticks.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<TickBound>) -> Self {
        self.ticks.max = Some(max.into());
        self
    }

    pub fn suggested_min(mut self, min: f64) -> Self {
        self.ticks.suggested_min = Some(min);
        self
    }

    pub fn suggested_max(mut self, max: f64) -> Self {
        self.ticks.suggested_max = Some(max);
        self
    }

    pub fn step_size(mut self, step: f64) -> Self {
        self.ticks.step_size = Some(step);
        self
    }

    pub fn max_ticks_limit(mut self, limit: usize) -> Self {
        self.ticks.max_ticks_limit = Some(limit);
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.ticks.reverse = Some(reverse);
        self
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.ticks.font_size = Some(size);
        self
    }

    /// Field-wise merge, `over` wins.
    pub fn merged(&self, over: &ScaleConfig) -> ScaleConfig {
        ScaleConfig {
            kind: over.kind.or(self.kind),
            id: over.id.or(self.id),
            position: over.position.or(self.position),
            stacked: over.stacked.or(self.stacked),
            relative_points: over.relative_points.or(self.relative_points),
            offset_grid_lines: over.offset_grid_lines.or(self.offset_grid_lines),
            category_percentage: over.category_percentage.or(self.category_percentage),
            bar_percentage: over.bar_percentage.or(self.bar_percentage),
            ticks: self.ticks.merged(&over.ticks),
        }
    }

    /// Write every set field into `options`. `kind` and `id` are resolved
    /// separately.
    pub fn apply(&self, options: &mut ScaleOptions) {
        if let Some(v) = self.position {
            options.position = v;
        }
        if let Some(v) = self.stacked {
            options.stacked = v;
        }
        if let Some(v) = self.relative_points {
            options.relative_points = v;
        }
        if let Some(v) = self.offset_grid_lines {
            options.offset_grid_lines = v;
        }
        if let Some(v) = self.category_percentage {
            options.category_percentage = v;
        }
        if let Some(v) = self.bar_percentage {
            options.bar_percentage = v;
        }
        self.ticks.apply(&mut options.ticks);
    }
}

/// Point element defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct PointOptions {
    pub radius: f64,
    pub hit_radius: f64,
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
}

/// Line element defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct LineOptions {
    pub tension: f64,
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
    pub fill: bool,
}

/// Bar element defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleOptions {
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
}

/// Resolved element defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementOptions {
    pub point: PointOptions,
    pub line: LineOptions,
    pub rectangle: RectangleOptions,
}

const DEFAULT_COLOR: &str = "rgba(0,0,0,0.1)";

impl Default for ElementOptions {
    fn default() -> Self {
        Self {
            point: PointOptions {
                radius: 3.0,
                hit_radius: 1.0,
                background_color: DEFAULT_COLOR.to_owned(),
                border_color: DEFAULT_COLOR.to_owned(),
                border_width: 1.0,
            },
            line: LineOptions {
                tension: 0.4,
                background_color: DEFAULT_COLOR.to_owned(),
                border_color: DEFAULT_COLOR.to_owned(),
                border_width: 3.0,
                fill: true,
            },
            rectangle: RectangleOptions {
                background_color: DEFAULT_COLOR.to_owned(),
                border_color: DEFAULT_COLOR.to_owned(),
                border_width: 0.0,
            },
        }
    }
}

/// Patch over [`ElementOptions`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementConfig {
    pub point_radius: Option<f64>,
    pub point_hit_radius: Option<f64>,
    pub point_background_color: Option<String>,
    pub point_border_color: Option<String>,
    pub point_border_width: Option<f64>,
    pub line_tension: Option<f64>,
    pub line_background_color: Option<String>,
    pub line_border_color: Option<String>,
    pub line_border_width: Option<f64>,
    pub line_fill: Option<bool>,
    pub rectangle_background_color: Option<String>,
    pub rectangle_border_color: Option<String>,
    pub rectangle_border_width: Option<f64>,
}

impl ElementConfig {
    pub fn apply(&self, elements: &mut ElementOptions) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }

        set(&mut elements.point.radius, &self.point_radius);
        set(&mut elements.point.hit_radius, &self.point_hit_radius);
        set(&mut elements.point.background_color, &self.point_background_color);
        set(&mut elements.point.border_color, &self.point_border_color);
        set(&mut elements.point.border_width, &self.point_border_width);
        set(&mut elements.line.tension, &self.line_tension);
        set(&mut elements.line.background_color, &self.line_background_color);
        set(&mut elements.line.border_color, &self.line_border_color);
        set(&mut elements.line.border_width, &self.line_border_width);
        set(&mut elements.line.fill, &self.line_fill);
        set(
            &mut elements.rectangle.background_color,
            &self.rectangle_background_color,
        );
        set(&mut elements.rectangle.border_color, &self.rectangle_border_color);
        set(&mut elements.rectangle.border_width, &self.rectangle_border_width);
    }
}

/// Resolved animation options.
#[derive(Clone)]
pub struct AnimationOptions {
    /// Zero disables animation.
    pub duration: Duration,
    pub easing: EasingFunction,
    /// Called after every animation step.
    pub on_progress: Option<AnimationCallback>,
    /// Called once the last step was drawn, or right away when not animating.
    pub on_complete: Option<AnimationCallback>,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1000),
            easing: EasingFunction::QuartOut,
            on_progress: None,
            on_complete: None,
        }
    }
}

impl std::fmt::Debug for AnimationOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationOptions")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Patch over [`AnimationOptions`].
#[derive(Clone, Default)]
pub struct AnimationConfig {
    pub duration: Option<Duration>,
    pub easing: Option<EasingFunction>,
    pub on_progress: Option<AnimationCallback>,
    pub on_complete: Option<AnimationCallback>,
}

impl std::fmt::Debug for AnimationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationConfig")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Resolved chart options.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub animation: AnimationOptions,
    /// Animation duration used by `resize`.
    pub responsive_animation_duration: Duration,
    /// Padding between the canvas edge and the chart area.
    pub layout_padding: f64,
    pub x_axes: Vec<ScaleOptions>,
    pub y_axes: Vec<ScaleOptions>,
    /// The radial scale, for radar charts.
    pub scale: Option<ScaleOptions>,
    pub elements: ElementOptions,
}

impl ChartOptions {
    /// Every configured scale, in build order.
    pub fn all_scales(&self) -> impl Iterator<Item = &ScaleOptions> {
        self.x_axes
            .iter()
            .chain(self.y_axes.iter())
            .chain(self.scale.iter())
    }
}

/// User options for a chart; every field is a patch.
#[derive(Debug, Clone, Default)]
pub struct ChartOptionsConfig {
    pub animation: AnimationConfig,
    pub responsive_animation_duration: Option<Duration>,
    pub layout_padding: Option<f64>,
    pub x_axes: Vec<ScaleConfig>,
    pub y_axes: Vec<ScaleConfig>,
    pub scale: Option<ScaleConfig>,
    pub elements: ElementConfig,
}

/// Defaults contributed by the chart kind.
pub fn chart_kind_defaults(kind: ChartKind) -> ChartOptionsConfig {
    let mut defaults = ChartOptionsConfig::default();
    match kind {
        ChartKind::Line => {
            defaults.x_axes = vec![ScaleConfig::of(ScaleKind::Category)];
            defaults.y_axes = vec![ScaleConfig::of(ScaleKind::Linear)];
        }
        ChartKind::Bar => {
            defaults.x_axes = vec![ScaleConfig::of(ScaleKind::Category).offset_grid_lines(true)];
            defaults.y_axes = vec![ScaleConfig::of(ScaleKind::Linear)];
        }
        ChartKind::Scatter | ChartKind::Bubble => {
            defaults.x_axes =
                vec![ScaleConfig::of(ScaleKind::Linear).position(AxisPosition::Bottom)];
            defaults.y_axes = vec![ScaleConfig::of(ScaleKind::Linear).position(AxisPosition::Left)];
        }
        ChartKind::Radar => {
            defaults.scale = Some(ScaleConfig::of(ScaleKind::RadialLinear));
            defaults.elements.line_tension = Some(0.0);
        }
    }
    defaults
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisList {
    X,
    Y,
    Radial,
}

impl AxisList {
    fn fallback_kind(self) -> ScaleKind {
        match self {
            AxisList::X => ScaleKind::Category,
            AxisList::Y => ScaleKind::Linear,
            AxisList::Radial => ScaleKind::RadialLinear,
        }
    }

    fn auto_id(self, index: usize) -> AxisId {
        match self {
            AxisList::X => AxisId::x(index),
            AxisList::Y => AxisId::y(index),
            AxisList::Radial => AxisId::RADIAL,
        }
    }
}

fn resolve_axis(
    list: AxisList,
    index: usize,
    kind_default: Option<&ScaleConfig>,
    user: Option<&ScaleConfig>,
    registry: &ScaleRegistry,
) -> ScaleOptions {
    let kind = user
        .and_then(|u| u.kind)
        .or_else(|| kind_default.and_then(|d| d.kind))
        .unwrap_or_else(|| list.fallback_kind());

    // Chart-kind defaults only apply to the scale kind they were written for.
    let kind_default = kind_default.filter(|d| d.kind.is_none_or(|k| k == kind));

    let id = user
        .and_then(|u| u.id)
        .or_else(|| kind_default.and_then(|d| d.id))
        .unwrap_or_else(|| list.auto_id(index));

    let mut options = ScaleOptions::new(kind, id);
    match registry.defaults(kind) {
        Some(defaults) => defaults.apply(&mut options),
        None => tracing::warn!(?kind, "no registered defaults for scale kind"),
    }
    if let Some(defaults) = kind_default {
        defaults.apply(&mut options);
    }
    if let Some(user) = user {
        user.apply(&mut options);
    }
    options
}

fn resolve_axis_list(
    list: AxisList,
    defaults: &[ScaleConfig],
    user: &[ScaleConfig],
    registry: &ScaleRegistry,
) -> Vec<ScaleOptions> {
    (0..defaults.len().max(user.len()))
        .map(|i| resolve_axis(list, i, defaults.get(i), user.get(i), registry))
        .collect()
}

/// Resolve user options for a chart of `kind`.
pub fn resolve_options(
    kind: ChartKind,
    user: &ChartOptionsConfig,
    registry: &ScaleRegistry,
) -> ChartOptions {
    let defaults = chart_kind_defaults(kind);

    let mut animation = AnimationOptions::default();
    for patch in [&defaults.animation, &user.animation] {
        if let Some(duration) = patch.duration {
            animation.duration = duration;
        }
        if let Some(easing) = patch.easing {
            animation.easing = easing;
        }
        if patch.on_progress.is_some() {
            animation.on_progress = patch.on_progress.clone();
        }
        if patch.on_complete.is_some() {
            animation.on_complete = patch.on_complete.clone();
        }
    }

    let mut elements = ElementOptions::default();
    defaults.elements.apply(&mut elements);
    user.elements.apply(&mut elements);

    let scale = match (&defaults.scale, &user.scale) {
        (None, None) => None,
        (kind_default, user) => Some(resolve_axis(
            AxisList::Radial,
            0,
            kind_default.as_ref(),
            user.as_ref(),
            registry,
        )),
    };

    ChartOptions {
        animation,
        responsive_animation_duration: user
            .responsive_animation_duration
            .or(defaults.responsive_animation_duration)
            .unwrap_or(Duration::ZERO),
        layout_padding: user
            .layout_padding
            .or(defaults.layout_padding)
            .unwrap_or(0.0),
        x_axes: resolve_axis_list(AxisList::X, &defaults.x_axes, &user.x_axes, registry),
        y_axes: resolve_axis_list(AxisList::Y, &defaults.y_axes, &user.y_axes, registry),
        scale,
        elements,
    }
}

/// Chart data: labels and datasets.
#[derive(Debug, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    /// Labels for horizontal category scales, if different from `labels`.
    pub x_labels: Option<Vec<String>>,
    /// Labels for vertical category scales.
    pub y_labels: Option<Vec<String>>,
    pub datasets: Vec<Dataset>,
}

/// Everything needed to construct a chart.
///
/// ```
/// use chartkit::{ChartConfig, ChartKind, Dataset};
///
/// let config = ChartConfig::new(ChartKind::Bar)
///     .labels(["a", "b"])
///     .dataset(Dataset::new("sales", [3.0, 4.0]))
///     .size(400.0, 200.0);
/// assert_eq!(config.data.datasets.len(), 1);
/// ```
#[derive(Debug)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptionsConfig,
    pub width: f64,
    pub height: f64,
}

impl ChartConfig {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            data: ChartData::default(),
            options: ChartOptionsConfig::default(),
            width: 640.0,
            height: 320.0,
        }
    }

    pub fn labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.data.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.data.datasets.push(dataset);
        self
    }

    pub fn options(mut self, options: ChartOptionsConfig) -> Self {
        self.options = options;
        self
    }

    pub fn x_axis(mut self, axis: ScaleConfig) -> Self {
        self.options.x_axes.push(axis);
        self
    }

    pub fn y_axis(mut self, axis: ScaleConfig) -> Self {
        self.options.y_axes.push(axis);
        self
    }

    pub fn radial_scale(mut self, scale: ScaleConfig) -> Self {
        self.options.scale = Some(scale);
        self
    }

    pub fn animation_duration(mut self, duration: Duration) -> Self {
        self.options.animation.duration = Some(duration);
        self
    }

    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.options.animation.easing = Some(easing);
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}
