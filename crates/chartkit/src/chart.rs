//! The chart controller.
//!
//! A [`Chart`] owns the data, the resolved options, the scales and one
//! controller per dataset, and drives the update cycle:
//!
//! 1. rebuild the scales if options changed,
//! 2. create, reindex or rebuild dataset controllers and resync their
//!    elements with the data,
//! 3. determine scale limits, lay the scales out when the size or options
//!    changed, build ticks,
//! 4. reset new controllers so they animate in, update every controller,
//! 5. render: draw right away, or queue an animation that the host steps
//!    with [`Chart::advance_frame`].

use std::cell::{Ref, RefMut};
use std::time::Duration;

use crate::animation::{AnimationProgress, AnimationService};
use crate::config::{ChartConfig, ChartData, ChartOptions, ChartOptionsConfig, resolve_options};
use crate::dataset::{Dataset, DatasetController, DatasetMeta, DatasetSamples, UpdateContext};
use crate::error::{ChartError, ChartResult};
use crate::layout::{ChartAreaLayout, LayoutProvider};
use crate::rect::Rect;
use crate::scale::{Scale, ScaleContext, ScaleRegistry, ScaleSet};
use crate::types::{AxisId, ChartKind};

bitflags::bitflags! {
    /// What changed since the last update.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChartDirtyFlags: u8 {
        /// User options or scale defaults changed.
        const OPTIONS_CHANGED = 0b0000_0001;
        /// The canvas was resized.
        const BOUNDS_CHANGED = 0b0000_0010;
    }
}

impl ChartDirtyFlags {
    /// Whether the scales must be rebuilt from options.
    pub fn needs_scale_rebuild(&self) -> bool {
        self.contains(Self::OPTIONS_CHANGED)
    }

    /// Whether the layout provider must assign scale geometry again.
    /// Rebuilt scales start without geometry, so option changes count too.
    pub fn needs_layout(&self) -> bool {
        self.intersects(Self::OPTIONS_CHANGED | Self::BOUNDS_CHANGED)
    }
}

/// A chart: data, options, scales and dataset controllers.
///
/// ```
/// use std::time::Duration;
/// use chartkit::{Chart, ChartConfig, ChartKind, Dataset};
///
/// let mut chart = Chart::new(
///     ChartConfig::new(ChartKind::Line)
///         .labels(["a", "b", "c"])
///         .dataset(Dataset::new("visits", [3.0, 1.0, 4.0]))
///         .animation_duration(Duration::ZERO),
/// )
/// .unwrap();
///
/// chart.data().datasets[0].data().append([1.0]);
/// assert_eq!(chart.dataset_meta(0).unwrap().data.len(), 4);
/// chart.update().unwrap();
/// ```
pub struct Chart {
    kind: ChartKind,
    data: ChartData,
    user_options: ChartOptionsConfig,
    options: ChartOptions,
    registry: ScaleRegistry,
    scales: ScaleSet,
    layout: Box<dyn LayoutProvider>,
    custom_layout: bool,
    chart_area: Rect,
    width: f64,
    height: f64,
    animations: AnimationService,
    is_combo: bool,
    dirty: ChartDirtyFlags,
    destroyed: bool,
}

impl std::fmt::Debug for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("kind", &self.kind)
            .field("datasets", &self.data.datasets.len())
            .field("scales", &self.scales.len())
            .field("chart_area", &self.chart_area)
            .field("size", &(self.width, self.height))
            .field("animations", &self.animations)
            .field("is_combo", &self.is_combo)
            .field("dirty", &self.dirty)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl Chart {
    /// Build a chart and run the first update.
    pub fn new(config: ChartConfig) -> ChartResult<Self> {
        Self::build(config, None)
    }

    /// Build a chart that lays its scales out with `layout`.
    pub fn with_layout(
        config: ChartConfig,
        layout: impl LayoutProvider + 'static,
    ) -> ChartResult<Self> {
        Self::build(config, Some(Box::new(layout)))
    }

    fn build(config: ChartConfig, layout: Option<Box<dyn LayoutProvider>>) -> ChartResult<Self> {
        let registry = ScaleRegistry::new();
        let options = resolve_options(config.kind, &config.options, &registry);
        let custom_layout = layout.is_some();
        let layout =
            layout.unwrap_or_else(|| Box::new(ChartAreaLayout::new(options.layout_padding)));

        tracing::debug!(
            kind = ?config.kind,
            datasets = config.data.datasets.len(),
            width = config.width,
            height = config.height,
            "creating chart"
        );

        let mut chart = Self {
            kind: config.kind,
            data: config.data,
            user_options: config.options,
            options,
            registry,
            scales: ScaleSet::new(),
            layout,
            custom_layout,
            chart_area: Rect::default(),
            width: config.width,
            height: config.height,
            animations: AnimationService::new(),
            is_combo: false,
            dirty: ChartDirtyFlags::all(),
            destroyed: false,
        };
        chart.update()?;
        Ok(chart)
    }

    fn ensure_alive(&self) -> ChartResult<()> {
        if self.destroyed {
            Err(ChartError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn kind_of(&self, dataset: &Dataset) -> ChartKind {
        dataset.kind.unwrap_or(self.kind)
    }

    fn first_axes(&self) -> (Option<AxisId>, Option<AxisId>) {
        (
            self.options.x_axes.first().map(|axis| axis.id),
            self.options.y_axes.first().map(|axis| axis.id),
        )
    }

    /// Update with the configured animation duration.
    pub fn update(&mut self) -> ChartResult<()> {
        self.update_with(None, false)
    }

    /// Run an update pass, then render over `duration` (the configured
    /// animation duration when `None`).
    pub fn update_with(&mut self, duration: Option<Duration>, lazy: bool) -> ChartResult<()> {
        self.ensure_alive()?;
        chartkit_core::profiling::profile_function!();
        tracing::debug!(
            dirty = ?self.dirty,
            datasets = self.data.datasets.len(),
            "updating chart"
        );

        if self.dirty.needs_scale_rebuild() {
            self.build_scales()?;
        }
        self.validate_bindings()?;

        let created = self.build_or_update_controllers();
        let samples = self.samples();
        let relayout = self.dirty.needs_layout();
        self.update_scales(&samples, relayout);

        {
            chartkit_core::profiling::profile_scope!("update_datasets");
            let ctx = UpdateContext {
                scales: &self.scales,
                elements: &self.options.elements,
                samples: &samples,
            };
            for (index, dataset) in self.data.datasets.iter().enumerate() {
                let Some(controller) = dataset.controller.as_ref() else {
                    continue;
                };
                if created.contains(&index) {
                    controller.reset(&ctx, dataset);
                }
                controller.update(&ctx, dataset, false);
            }
        }

        self.dirty = ChartDirtyFlags::empty();
        self.render(duration, lazy)
    }

    fn build_scales(&mut self) -> ChartResult<()> {
        let options = resolve_options(self.kind, &self.user_options, &self.registry);

        let mut scales = ScaleSet::new();
        for scale_options in options.all_scales() {
            let id = scale_options.id;
            if scales.insert(self.registry.create(scale_options.clone())).is_some() {
                return Err(ChartError::DuplicateAxis(id));
            }
        }
        tracing::debug!(count = scales.len(), "scales rebuilt");

        if !self.custom_layout {
            self.layout = Box::new(ChartAreaLayout::new(options.layout_padding));
        }
        self.options = options;
        self.scales = scales;
        Ok(())
    }

    fn validate_bindings(&self) -> ChartResult<()> {
        let (first_x, first_y) = self.first_axes();
        for (index, dataset) in self.data.datasets.iter().enumerate() {
            if !self.kind_of(dataset).is_cartesian() {
                if self.scales.radial().is_none() {
                    return Err(ChartError::MissingRadialScale { dataset: index });
                }
                continue;
            }
            let axes = [dataset.x_axis_id.or(first_x), dataset.y_axis_id.or(first_y)];
            for axis in axes.into_iter().flatten() {
                if !self.scales.contains(axis) {
                    return Err(ChartError::UnknownAxis {
                        dataset: index,
                        axis,
                    });
                }
            }
        }
        Ok(())
    }

    /// Give every dataset a controller of its kind and resync its elements.
    /// Returns the indices of controllers created by this call.
    fn build_or_update_controllers(&mut self) -> Vec<usize> {
        chartkit_core::profiling::profile_function!();
        let (first_x, first_y) = self.first_axes();
        let chart_kind = self.kind;
        let mut created = Vec::new();
        let mut kinds = Vec::with_capacity(self.data.datasets.len());

        for (index, dataset) in self.data.datasets.iter_mut().enumerate() {
            let kind = dataset.kind.unwrap_or(chart_kind);
            kinds.push(kind);

            let mut controller = match dataset.controller.take() {
                Some(mut controller) if controller.kind() == kind => {
                    controller.update_index(index);
                    controller
                }
                stale => {
                    if let Some(mut stale) = stale {
                        tracing::debug!(
                            index,
                            from = ?stale.kind(),
                            to = ?kind,
                            "dataset kind changed"
                        );
                        stale.destroy();
                    }
                    created.push(index);
                    DatasetController::new(index, kind)
                }
            };
            controller.link_scales(dataset, first_x, first_y);
            controller.build_or_update_elements(dataset.data());
            dataset.controller = Some(controller);
        }

        self.is_combo = kinds.windows(2).any(|pair| pair[0] != pair[1]);
        created
    }

    fn samples(&self) -> Vec<DatasetSamples> {
        self.data
            .datasets
            .iter()
            .enumerate()
            .map(|(index, dataset)| {
                dataset.samples(index, self.kind_of(dataset), is_visible(dataset))
            })
            .collect()
    }

    fn update_scales(&mut self, samples: &[DatasetSamples], relayout: bool) {
        chartkit_core::profiling::profile_function!();
        let ctx = ScaleContext {
            labels: &self.data.labels,
            x_labels: self.data.x_labels.as_deref(),
            y_labels: self.data.y_labels.as_deref(),
            datasets: samples,
        };
        for scale in self.scales.iter_mut() {
            scale.determine_data_limits(&ctx);
        }
        if relayout {
            self.chart_area = self.layout.update(&mut self.scales, self.width, self.height);
        }
        for scale in self.scales.iter_mut() {
            scale.build_ticks();
        }
    }

    /// Draw the current models over `duration`, or right away when it is
    /// zero. `None` uses the configured animation duration.
    pub fn render(&mut self, duration: Option<Duration>, lazy: bool) -> ChartResult<()> {
        self.ensure_alive()?;
        let duration = duration.unwrap_or(self.options.animation.duration);
        if !duration.is_zero() {
            self.animations.add(duration, &self.options.animation, lazy);
            return Ok(());
        }

        self.draw(1.0);
        if let Some(on_complete) = self.options.animation.on_complete.clone() {
            on_complete(&AnimationProgress {
                current_step: 0.0,
                num_steps: 0.0,
                step_decimal: 1.0,
                ease: 1.0,
            });
        }
        Ok(())
    }

    /// Transition the elements of every visible dataset to `ease`.
    pub fn draw(&self, ease: f64) {
        chartkit_core::profiling::profile_function!();
        let ease = ease.clamp(0.0, 1.0);
        for dataset in self.data.datasets.iter().filter(|ds| is_visible(ds)) {
            if let Some(controller) = &dataset.controller {
                controller.transition(ease);
            }
        }
    }

    /// Step the running animation by the time elapsed since the previous
    /// frame and draw it. Returns the progress, or `None` when idle.
    pub fn advance_frame(&mut self, elapsed: Duration) -> Option<AnimationProgress> {
        chartkit_core::profiling::new_frame();
        chartkit_core::profiling::profile_function!();

        let step = self.animations.advance(elapsed)?;
        self.draw(step.progress.ease);

        if let Some(on_progress) = &step.on_progress {
            on_progress(&step.progress);
        }
        if step.progress.is_complete() {
            tracing::trace!("animation complete");
            if let Some(on_complete) = &step.on_complete {
                on_complete(&step.progress);
            }
        }
        Some(step.progress)
    }

    /// Cancel the running animation. Elements keep their current views.
    pub fn stop(&mut self) {
        self.animations.cancel();
    }

    /// Put every element into its reset state. Takes effect on the next draw.
    pub fn reset(&mut self) -> ChartResult<()> {
        self.ensure_alive()?;
        tracing::debug!("resetting chart elements");
        let samples = self.samples();
        let ctx = UpdateContext {
            scales: &self.scales,
            elements: &self.options.elements,
            samples: &samples,
        };
        for dataset in &self.data.datasets {
            if let Some(controller) = &dataset.controller {
                controller.reset(&ctx, dataset);
            }
        }
        Ok(())
    }

    /// Change the canvas size and update with the responsive animation
    /// duration. A no-op when the size is unchanged.
    pub fn resize(&mut self, width: f64, height: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        if width == self.width && height == self.height {
            return Ok(());
        }
        tracing::debug!(width, height, "resizing chart");
        self.width = width;
        self.height = height;
        self.dirty |= ChartDirtyFlags::BOUNDS_CHANGED;
        self.stop();
        self.update_with(Some(self.options.responsive_animation_duration), false)
    }

    /// Stop animating, detach every controller from its data and drop the
    /// scales. Later updates fail with [`ChartError::Destroyed`].
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.stop();
        for dataset in &mut self.data.datasets {
            if let Some(mut controller) = dataset.controller.take() {
                controller.destroy();
            }
        }
        self.scales.clear();
        self.destroyed = true;
        tracing::debug!("chart destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn controller(&self, index: usize) -> ChartResult<&DatasetController> {
        self.ensure_alive()?;
        let len = self.data.datasets.len();
        let dataset = self
            .data
            .datasets
            .get(index)
            .ok_or(ChartError::DatasetOutOfRange { index, len })?;
        dataset
            .controller
            .as_ref()
            .ok_or(ChartError::NotUpdated { dataset: index })
    }

    /// Elements and bindings of dataset `index`.
    pub fn dataset_meta(&self, index: usize) -> ChartResult<Ref<'_, DatasetMeta>> {
        Ok(self.controller(index)?.meta())
    }

    pub fn dataset_meta_mut(&mut self, index: usize) -> ChartResult<RefMut<'_, DatasetMeta>> {
        Ok(self.controller(index)?.meta_mut())
    }

    /// Whether dataset `index` is drawn. The meta override wins over
    /// [`Dataset::hidden`]; unknown indices are not visible.
    pub fn is_dataset_visible(&self, index: usize) -> bool {
        self.data.datasets.get(index).is_some_and(is_visible)
    }

    /// Set the visibility override of dataset `index`. `None` defers to
    /// [`Dataset::hidden`]. Takes effect on the next update.
    pub fn set_dataset_hidden(&mut self, index: usize, hidden: Option<bool>) -> ChartResult<()> {
        self.controller(index)?.meta_mut().hidden = hidden;
        Ok(())
    }

    pub fn visible_dataset_count(&self) -> usize {
        self.data.datasets.iter().filter(|ds| is_visible(ds)).count()
    }

    /// Whether the datasets are of more than one kind.
    pub fn is_combo(&self) -> bool {
        self.is_combo
    }

    /// Whether a non-lazy animation is running.
    pub fn is_animating(&self) -> bool {
        self.animations.is_animating()
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    /// Edit labels or datasets. Call [`Chart::update`] afterwards.
    pub fn data_mut(&mut self) -> &mut ChartData {
        &mut self.data
    }

    /// The resolved options.
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Edit the user options. The next update re-resolves them and rebuilds
    /// the scales.
    pub fn options_mut(&mut self) -> &mut ChartOptionsConfig {
        self.dirty |= ChartDirtyFlags::OPTIONS_CHANGED;
        &mut self.user_options
    }

    pub fn registry(&self) -> &ScaleRegistry {
        &self.registry
    }

    /// Edit this chart's scale defaults. The next update rebuilds the scales.
    pub fn registry_mut(&mut self) -> &mut ScaleRegistry {
        self.dirty |= ChartDirtyFlags::OPTIONS_CHANGED;
        &mut self.registry
    }

    pub fn scales(&self) -> &ScaleSet {
        &self.scales
    }

    pub fn scale(&self, id: AxisId) -> Option<&Scale> {
        self.scales.get(id)
    }

    /// Area datasets are drawn in, as assigned by the layout provider.
    pub fn chart_area(&self) -> Rect {
        self.chart_area
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn dirty_flags(&self) -> ChartDirtyFlags {
        self.dirty
    }
}

fn is_visible(dataset: &Dataset) -> bool {
    let hidden = dataset
        .controller
        .as_ref()
        .and_then(|controller| controller.meta().hidden)
        .unwrap_or(dataset.hidden);
    !hidden
}
