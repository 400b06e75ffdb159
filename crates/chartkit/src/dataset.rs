//! Datasets and their controllers.
//!
//! A [`DatasetController`] owns the [`DatasetMeta`] of one dataset: one
//! [`Element`] per sample plus, for line and radar datasets, an aggregate
//! line element. The meta listens to the dataset's [`DataArray`] so element
//! counts follow tracked mutations immediately; newly inserted elements are
//! flagged for reset and receive their reset-state model on the next update,
//! right before their regular model, so they animate in.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::config::ElementOptions;
use crate::data::{DataArray, DataListener, DataMutation, ListenerHandle};
use crate::element::{Attr, Element, Model};
use crate::scale::{Scale, ScaleSet};
use crate::types::{AxisId, ChartKind, DataValue};

/// Per-dataset style overrides. Unset fields use the chart's element options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetStyle {
    /// Fill of bars and of the line area.
    pub background_color: Option<String>,
    /// Stroke of bars and of the line.
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    pub point_radius: Option<f64>,
    pub point_background_color: Option<String>,
    pub point_border_color: Option<String>,
    pub point_border_width: Option<f64>,
    pub hit_radius: Option<f64>,
    /// Bezier tension of the line.
    pub tension: Option<f64>,
    pub fill: Option<bool>,
}

/// One series of samples.
///
/// ```
/// use chartkit::{ChartKind, Dataset};
///
/// let dataset = Dataset::new("visitors", [3.0, 7.0, 4.0]).kind(ChartKind::Bar);
/// dataset.data().append([9.0]);
/// assert_eq!(dataset.data().len(), 4);
/// ```
#[derive(Debug)]
pub struct Dataset {
    pub label: String,
    /// Overrides the chart kind for this dataset (combo charts).
    pub kind: Option<ChartKind>,
    data: DataArray,
    /// Hidden unless the meta override says otherwise.
    pub hidden: bool,
    pub x_axis_id: Option<AxisId>,
    pub y_axis_id: Option<AxisId>,
    pub style: DatasetStyle,
    pub(crate) controller: Option<DatasetController>,
}

impl Dataset {
    pub fn new<T, I>(label: impl Into<String>, values: I) -> Self
    where
        T: Into<DataValue>,
        I: IntoIterator<Item = T>,
    {
        Self::with_data(label, DataArray::from_values(values))
    }

    /// Dataset over an existing, possibly shared, sequence.
    pub fn with_data(label: impl Into<String>, data: DataArray) -> Self {
        Self {
            label: label.into(),
            kind: None,
            data,
            hidden: false,
            x_axis_id: None,
            y_axis_id: None,
            style: DatasetStyle::default(),
            controller: None,
        }
    }

    pub fn kind(mut self, kind: ChartKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn x_axis(mut self, id: AxisId) -> Self {
        self.x_axis_id = Some(id);
        self
    }

    pub fn y_axis(mut self, id: AxisId) -> Self {
        self.y_axis_id = Some(id);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn style(mut self, style: DatasetStyle) -> Self {
        self.style = style;
        self
    }

    /// The observed sample sequence. Mutations through it are tracked.
    pub fn data(&self) -> &DataArray {
        &self.data
    }

    /// Replace the sample sequence. The next update switches observation to
    /// the new sequence and resynchronizes the elements.
    pub fn set_data(&mut self, data: DataArray) {
        self.data = data;
    }

    /// Snapshot of what scales need from this dataset.
    pub(crate) fn samples(&self, index: usize, kind: ChartKind, visible: bool) -> DatasetSamples {
        let (x_axis_id, y_axis_id, hidden) = match &self.controller {
            Some(controller) => {
                let meta = controller.meta();
                let hidden = meta.data.iter().map(|el| el.hidden).collect();
                (meta.x_axis_id, meta.y_axis_id, hidden)
            }
            None => (self.x_axis_id, self.y_axis_id, Vec::new()),
        };
        DatasetSamples {
            index,
            kind,
            visible,
            x_axis_id,
            y_axis_id,
            values: self.data.to_vec(),
            hidden,
        }
    }
}

/// Read-only snapshot of a dataset used for limits and stacking.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSamples {
    pub index: usize,
    pub kind: ChartKind,
    pub visible: bool,
    pub x_axis_id: Option<AxisId>,
    pub y_axis_id: Option<AxisId>,
    pub values: Vec<DataValue>,
    /// Hidden flag of the element at each index.
    pub hidden: Vec<bool>,
}

impl DatasetSamples {
    fn sample(&self, index: usize) -> Option<f64> {
        if self.hidden.get(index).copied().unwrap_or(false) {
            return None;
        }
        self.values.get(index)?.coordinate(false)
    }
}

/// Elements and bindings of one dataset.
#[derive(Debug, Default)]
pub struct DatasetMeta {
    pub kind: ChartKind,
    /// One element per sample.
    pub data: Vec<Element>,
    /// Aggregate line element of line and radar datasets.
    pub dataset: Option<Element>,
    pub x_axis_id: Option<AxisId>,
    pub y_axis_id: Option<AxisId>,
    /// Visibility override; `None` defers to [`Dataset::hidden`].
    pub hidden: Option<bool>,
}

fn pending(count: usize) -> impl Iterator<Item = Element> {
    std::iter::repeat_with(Element::pending_reset).take(count)
}

impl DataListener for DatasetMeta {
    fn on_data_mutation(&mut self, mutation: &DataMutation<'_>) {
        match *mutation {
            DataMutation::Append(items) => self.data.extend(pending(items.len())),
            DataMutation::RemoveLast => {
                self.data.pop();
            }
            DataMutation::RemoveFirst => {
                if !self.data.is_empty() {
                    self.data.remove(0);
                }
            }
            DataMutation::Splice {
                start,
                delete_count,
                items,
            } => {
                let start = start.min(self.data.len());
                let end = start + delete_count.min(self.data.len() - start);
                self.data.splice(start..end, pending(items.len()));
            }
            DataMutation::Prepend(items) => {
                self.data.splice(0..0, pending(items.len()));
            }
        }
    }
}

/// Scales and options a controller reads while computing models.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UpdateContext<'a> {
    pub scales: &'a ScaleSet,
    pub elements: &'a ElementOptions,
    pub samples: &'a [DatasetSamples],
}

/// Keeps the elements of one dataset in sync with its data and computes
/// their models.
#[derive(Debug)]
pub struct DatasetController {
    index: usize,
    kind: ChartKind,
    meta: Rc<RefCell<DatasetMeta>>,
    observed: Option<DataArray>,
}

impl DatasetController {
    pub(crate) fn new(index: usize, kind: ChartKind) -> Self {
        tracing::debug!(index, ?kind, "creating dataset controller");
        let meta = DatasetMeta {
            kind,
            dataset: kind.has_line_element().then(Element::new),
            ..DatasetMeta::default()
        };
        Self {
            index,
            kind,
            meta: Rc::new(RefCell::new(meta)),
            observed: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn meta(&self) -> Ref<'_, DatasetMeta> {
        self.meta.borrow()
    }

    pub fn meta_mut(&self) -> RefMut<'_, DatasetMeta> {
        self.meta.borrow_mut()
    }

    pub(crate) fn update_index(&mut self, index: usize) {
        if self.index != index {
            tracing::debug!(from = self.index, to = index, "reindexing dataset controller");
            self.index = index;
        }
    }

    /// Bind to the dataset's axes, or to the first x and y axes.
    pub(crate) fn link_scales(
        &mut self,
        dataset: &Dataset,
        first_x: Option<AxisId>,
        first_y: Option<AxisId>,
    ) {
        let mut meta = self.meta.borrow_mut();
        if self.kind.is_cartesian() {
            meta.x_axis_id = dataset.x_axis_id.or(first_x);
            meta.y_axis_id = dataset.y_axis_id.or(first_y);
        } else {
            meta.x_axis_id = None;
            meta.y_axis_id = None;
        }
    }

    fn listener(&self) -> ListenerHandle {
        let listener: Rc<RefCell<dyn DataListener>> = self.meta.clone();
        Rc::downgrade(&listener)
    }

    /// Observe `data` (dropping a replaced sequence) and resynchronize.
    pub(crate) fn build_or_update_elements(&mut self, data: &DataArray) {
        chartkit_core::profiling::profile_function!();

        let replaced = self.observed.as_ref().is_none_or(|observed| !observed.ptr_eq(data));
        if replaced {
            if let Some(stale) = self.observed.take() {
                tracing::debug!(index = self.index, "dataset data replaced, switching observation");
                stale.unlisten(&self.listener());
            }
            data.listen(self.listener());
            self.observed = Some(data.clone());
        }

        self.resync_elements(data.len());
    }

    /// Truncate or extend the element list to `len`. Added elements are reset.
    fn resync_elements(&mut self, len: usize) {
        let mut meta = self.meta.borrow_mut();
        let current = meta.data.len();
        if len < current {
            meta.data.truncate(len);
        } else if len > current {
            meta.data.extend(pending(len - current));
        }
    }

    /// Put every element in its reset state.
    pub(crate) fn reset(&self, ctx: &UpdateContext<'_>, dataset: &Dataset) {
        self.update(ctx, dataset, true);
    }

    /// Recompute every model and pivot.
    pub(crate) fn update(&self, ctx: &UpdateContext<'_>, dataset: &Dataset, reset: bool) {
        let values = dataset.data().to_vec();
        let mut guard = self.meta.borrow_mut();
        let meta = &mut *guard;
        let models = ModelBuilder {
            ctx,
            dataset,
            meta_x: meta.x_axis_id,
            meta_y: meta.y_axis_id,
            index: self.index,
            kind: self.kind,
            values: &values,
        };

        if let Some(line) = meta.dataset.as_mut() {
            line.set_model(models.line_model());
            line.pivot();
        }

        for (index, element) in meta.data.iter_mut().enumerate() {
            if element.pending_reset {
                element.discard_view();
                element.set_model(models.element_model(index, true));
                element.pivot();
                element.pending_reset = false;
            }
            element.set_model(models.element_model(index, reset));
            element.pivot();
        }
    }

    /// Move every element towards its model. Elements still waiting for
    /// their reset model are left alone.
    pub(crate) fn transition(&self, ease: f64) {
        let mut meta = self.meta.borrow_mut();
        for element in meta.data.iter_mut().filter(|el| !el.pending_reset) {
            element.transition(ease);
        }
        if let Some(line) = meta.dataset.as_mut() {
            line.transition(ease);
        }
    }

    /// Stop observing the data sequence.
    pub(crate) fn destroy(&mut self) {
        if let Some(observed) = self.observed.take() {
            observed.unlisten(&self.listener());
        }
        tracing::debug!(index = self.index, "dataset controller destroyed");
    }
}

/// Computes element models for one controller update.
struct ModelBuilder<'a> {
    ctx: &'a UpdateContext<'a>,
    dataset: &'a Dataset,
    meta_x: Option<AxisId>,
    meta_y: Option<AxisId>,
    index: usize,
    kind: ChartKind,
    values: &'a [DataValue],
}

impl ModelBuilder<'_> {
    fn scale(&self, id: Option<AxisId>) -> Option<&Scale> {
        id.and_then(|id| self.ctx.scales.get(id))
    }

    fn element_model(&self, index: usize, reset: bool) -> Model {
        match self.kind {
            ChartKind::Bar => self.bar_model(index, reset),
            ChartKind::Radar => self.radar_model(index, reset),
            ChartKind::Line | ChartKind::Scatter | ChartKind::Bubble => {
                self.point_model(index, reset)
            }
        }
    }

    fn point_style(&self, model: &mut Model, radius: f64) {
        let style = &self.dataset.style;
        let point = &self.ctx.elements.point;
        model.insert("radius".into(), Attr::Number(radius));
        model.insert(
            "hitRadius".into(),
            Attr::Number(style.hit_radius.unwrap_or(point.hit_radius)),
        );
        model.insert(
            "backgroundColor".into(),
            Attr::Text(
                style
                    .point_background_color
                    .clone()
                    .unwrap_or_else(|| point.background_color.clone()),
            ),
        );
        model.insert(
            "borderColor".into(),
            Attr::Text(
                style
                    .point_border_color
                    .clone()
                    .unwrap_or_else(|| point.border_color.clone()),
            ),
        );
        model.insert(
            "borderWidth".into(),
            Attr::Number(style.point_border_width.unwrap_or(point.border_width)),
        );
    }

    fn point_radius(&self) -> f64 {
        self.dataset
            .style
            .point_radius
            .unwrap_or(self.ctx.elements.point.radius)
    }

    /// Sum of the samples at `index` of the preceding visible datasets of the
    /// same kind on the same y axis, on the side of zero `value` is on.
    fn stack_base(&self, index: usize, value: f64) -> f64 {
        self.ctx
            .samples
            .iter()
            .filter(|ds| {
                ds.index < self.index
                    && ds.visible
                    && ds.kind == self.kind
                    && ds.y_axis_id == self.meta_y
            })
            .filter_map(|ds| ds.sample(index))
            .filter(|v| (*v < 0.0) == (value < 0.0))
            .sum()
    }

    fn is_stacked(&self, scale: &Scale) -> bool {
        scale.options().stacked
    }

    /// Pixel of the sample on the y scale, and the pixel of its stack base.
    fn y_pixels(&self, y_scale: &Scale, index: usize) -> Option<(f64, f64)> {
        let value = self.values.get(index)?;
        if self.is_stacked(y_scale) {
            let v = value.coordinate(false)?;
            let base = self.stack_base(index, v);
            let base_pixel = if base == 0.0 {
                y_scale.base_pixel()
            } else {
                y_scale.pixel_for_value(base)
            };
            Some((y_scale.pixel_for_value(base + v), base_pixel))
        } else {
            y_scale
                .pixel_for_data(value, index)
                .map(|pixel| (pixel, y_scale.base_pixel()))
        }
    }

    fn point_model(&self, index: usize, reset: bool) -> Model {
        let mut model = Model::new();
        let (Some(x_scale), Some(y_scale)) = (self.scale(self.meta_x), self.scale(self.meta_y))
        else {
            model.insert("skip".into(), Attr::Flag(true));
            return model;
        };

        let value = self.values.get(index).cloned().unwrap_or_default();
        let x = x_scale.pixel_for_data(&value, index);
        let y = self.y_pixels(y_scale, index).map(|(y, _)| y);
        let base = y_scale.base_pixel();

        let (x, y, radius) = match (reset, self.kind) {
            (true, ChartKind::Bubble) => (Some(x_scale.pixel_for_decimal(0.5)), Some(base), 0.0),
            (true, _) => (x, Some(base), 0.0),
            (false, _) => (x, y, self.point_radius()),
        };
        let skip = x.is_none() || y.is_none();

        model.insert("x".into(), Attr::Number(x.unwrap_or_else(|| x_scale.base_pixel())));
        model.insert("y".into(), Attr::Number(y.unwrap_or(base)));
        self.point_style(&mut model, radius);
        model.insert("skip".into(), Attr::Flag(skip));
        model.insert("_index".into(), Attr::Number(index as f64));
        model.insert("_datasetIndex".into(), Attr::Number(self.index as f64));
        model
    }

    /// Visible bar datasets sharing this dataset's x axis, and this
    /// dataset's lane among them.
    fn bar_lanes(&self, stacked: bool) -> (usize, usize) {
        if stacked {
            return (0, 1);
        }
        let bars = self.ctx.samples.iter().filter(|ds| {
            ds.visible && ds.kind == ChartKind::Bar && ds.x_axis_id == self.meta_x
        });
        let mut lane = 0;
        let mut count = 0;
        for ds in bars {
            if ds.index < self.index {
                lane += 1;
            }
            count += 1;
        }
        (lane, count.max(1))
    }

    fn bar_model(&self, index: usize, reset: bool) -> Model {
        let mut model = Model::new();
        let (Some(x_scale), Some(y_scale)) = (self.scale(self.meta_x), self.scale(self.meta_y))
        else {
            model.insert("skip".into(), Attr::Flag(true));
            return model;
        };

        let options = x_scale.options();
        let slots = x_scale.ticks().len().max(1) as f64;
        let category_width = x_scale.geometry().width / slots * options.category_percentage;
        let stacked = self.is_stacked(x_scale) || self.is_stacked(y_scale);
        let (lane, lanes) = self.bar_lanes(stacked);
        let lane_width = category_width / lanes as f64;

        let value = self.values.get(index).cloned().unwrap_or_default();
        let center = x_scale.pixel_for_data(&value, index);
        let x = center.map(|c| c - category_width / 2.0 + lane_width * (lane as f64 + 0.5));
        let y_pixels = self.y_pixels(y_scale, index);
        let base = y_pixels.map_or_else(|| y_scale.base_pixel(), |(_, base)| base);
        let y = if reset { Some(base) } else { y_pixels.map(|(y, _)| y) };

        let style = &self.dataset.style;
        let rect = &self.ctx.elements.rectangle;
        model.insert("x".into(), Attr::Number(x.unwrap_or_else(|| x_scale.base_pixel())));
        model.insert("y".into(), Attr::Number(y.unwrap_or(base)));
        model.insert("base".into(), Attr::Number(base));
        model.insert("width".into(), Attr::Number(lane_width * options.bar_percentage));
        model.insert(
            "backgroundColor".into(),
            Attr::Text(
                style
                    .background_color
                    .clone()
                    .unwrap_or_else(|| rect.background_color.clone()),
            ),
        );
        model.insert(
            "borderColor".into(),
            Attr::Text(
                style
                    .border_color
                    .clone()
                    .unwrap_or_else(|| rect.border_color.clone()),
            ),
        );
        model.insert(
            "borderWidth".into(),
            Attr::Number(style.border_width.unwrap_or(rect.border_width)),
        );
        model.insert("skip".into(), Attr::Flag(x.is_none() || y.is_none()));
        model.insert("_index".into(), Attr::Number(index as f64));
        model.insert("_datasetIndex".into(), Attr::Number(self.index as f64));
        model
    }

    fn radar_model(&self, index: usize, reset: bool) -> Model {
        let mut model = Model::new();
        let Some(scale) = self.ctx.scales.radial() else {
            model.insert("skip".into(), Attr::Flag(true));
            return model;
        };

        let center = scale.center();
        let value = self.values.get(index).and_then(|v| v.coordinate(false));
        let position = match (reset, value) {
            (false, Some(v)) => scale.point_for_value(index, v),
            _ => center,
        };

        model.insert("x".into(), Attr::Number(position.x));
        model.insert("y".into(), Attr::Number(position.y));
        model.insert("tension".into(), Attr::Number(self.tension()));
        self.point_style(&mut model, self.point_radius());
        model.insert("skip".into(), Attr::Flag(value.is_none()));
        model.insert("_index".into(), Attr::Number(index as f64));
        model.insert("_datasetIndex".into(), Attr::Number(self.index as f64));
        model
    }

    fn tension(&self) -> f64 {
        self.dataset
            .style
            .tension
            .unwrap_or(self.ctx.elements.line.tension)
    }

    /// Model of the aggregate line element.
    fn line_model(&self) -> Model {
        let style = &self.dataset.style;
        let line = &self.ctx.elements.line;
        let scale_zero = match self.kind {
            ChartKind::Radar => self.ctx.scales.radial().map(|s| s.base_pixel()),
            _ => self.scale(self.meta_y).map(Scale::base_pixel),
        };

        let mut model = Model::new();
        model.insert("tension".into(), Attr::Number(self.tension()));
        model.insert(
            "backgroundColor".into(),
            Attr::Text(
                style
                    .background_color
                    .clone()
                    .unwrap_or_else(|| line.background_color.clone()),
            ),
        );
        model.insert(
            "borderColor".into(),
            Attr::Text(
                style
                    .border_color
                    .clone()
                    .unwrap_or_else(|| line.border_color.clone()),
            ),
        );
        model.insert(
            "borderWidth".into(),
            Attr::Number(style.border_width.unwrap_or(line.border_width)),
        );
        model.insert("fill".into(), Attr::Flag(style.fill.unwrap_or(line.fill)));
        if let Some(zero) = scale_zero {
            model.insert("scaleZero".into(), Attr::Number(zero));
        }
        model.insert("_loop".into(), Attr::Flag(self.kind == ChartKind::Radar));
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_for(dataset: &Dataset) -> DatasetController {
        let mut controller = DatasetController::new(0, ChartKind::Line);
        controller.build_or_update_elements(dataset.data());
        controller
    }

    #[test]
    fn test_elements_follow_tracked_mutations() {
        let dataset = Dataset::new("a", [1.0, 2.0, 3.0]);
        let controller = controller_for(&dataset);
        assert_eq!(controller.meta().data.len(), 3);

        dataset.data().append([4.0, 5.0]);
        assert_eq!(controller.meta().data.len(), 5);
        assert!(controller.meta().data[4].is_pending_reset());

        dataset.data().remove_first();
        dataset.data().remove_last();
        assert_eq!(controller.meta().data.len(), 3);

        dataset.data().splice_replace(1, 1, [7.0, 8.0]);
        dataset.data().prepend([0.0]);
        assert_eq!(controller.meta().data.len(), dataset.data().len());
        assert!(controller.meta().data[0].is_pending_reset());
        assert!(controller.meta().data[2].is_pending_reset());
    }

    #[test]
    fn test_replaced_data_switches_observation() {
        let mut dataset = Dataset::new("a", [1.0, 2.0]);
        let mut controller = controller_for(&dataset);
        let old = dataset.data().clone();
        assert!(old.is_observed());

        dataset.set_data(DataArray::from_values([1.0, 2.0, 3.0, 4.0]));
        controller.build_or_update_elements(dataset.data());
        assert!(!old.is_observed());
        assert!(dataset.data().is_observed());
        assert_eq!(controller.meta().data.len(), 4);

        old.append([9.0]);
        assert_eq!(controller.meta().data.len(), 4);

        dataset.set_data(DataArray::from_values([1.0]));
        controller.build_or_update_elements(dataset.data());
        assert_eq!(controller.meta().data.len(), 1);
    }

    #[test]
    fn test_destroy_unlistens() {
        let dataset = Dataset::new("a", [1.0]);
        let mut controller = controller_for(&dataset);
        controller.destroy();
        assert!(!dataset.data().is_observed());
    }

    #[test]
    fn test_line_controllers_have_aggregate_element() {
        assert!(DatasetController::new(0, ChartKind::Line).meta().dataset.is_some());
        assert!(DatasetController::new(0, ChartKind::Radar).meta().dataset.is_some());
        assert!(DatasetController::new(0, ChartKind::Bar).meta().dataset.is_none());
    }

    #[test]
    fn test_link_scales_defaults_to_first_axes() {
        let dataset = Dataset::new("a", [1.0]).y_axis(AxisId::y(1));
        let mut controller = DatasetController::new(0, ChartKind::Line);
        controller.link_scales(&dataset, Some(AxisId::X_PRIMARY), Some(AxisId::Y_PRIMARY));
        assert_eq!(controller.meta().x_axis_id, Some(AxisId::X_PRIMARY));
        assert_eq!(controller.meta().y_axis_id, Some(AxisId::y(1)));

        let mut radar = DatasetController::new(0, ChartKind::Radar);
        radar.link_scales(&dataset, Some(AxisId::X_PRIMARY), Some(AxisId::Y_PRIMARY));
        assert_eq!(radar.meta().y_axis_id, None);
    }
}
