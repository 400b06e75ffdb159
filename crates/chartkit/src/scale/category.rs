use crate::config::{ScaleOptions, TickBound};
use crate::rect::Rect;
use crate::scale::ScaleContext;
use crate::scale::ticks::Tick;
use crate::types::DataValue;

/// Scale over a list of labels, one slot per label.
///
/// Values are absolute label indices. `ticks.min` / `ticks.max` name the
/// first and last visible label.
#[derive(Debug, Clone)]
pub struct CategoryScale {
    options: ScaleOptions,
    rect: Rect,
    labels: Vec<String>,
    min_index: usize,
    max_index: usize,
    ticks: Vec<Tick>,
}

fn find_label(labels: &[String], bound: &TickBound) -> Option<usize> {
    match bound {
        TickBound::Label(name) => labels.iter().position(|l| l == name),
        TickBound::Value(value) => labels
            .iter()
            .position(|l| l.trim().parse::<f64>().is_ok_and(|v| v == *value)),
    }
}

impl CategoryScale {
    pub fn new(options: ScaleOptions) -> Self {
        Self {
            options,
            rect: Rect::default(),
            labels: Vec::new(),
            min_index: 0,
            max_index: 0,
            ticks: Vec::new(),
        }
    }

    pub fn options(&self) -> &ScaleOptions {
        &self.options
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn determine_data_limits(&mut self, ctx: &ScaleContext<'_>) {
        self.labels = ctx.labels_for(self.options.is_horizontal()).to_vec();
        self.min_index = 0;
        self.max_index = self.labels.len().saturating_sub(1);

        let ticks = &self.options.ticks;
        if let Some(index) = ticks.min.as_ref().and_then(|b| find_label(&self.labels, b)) {
            self.min_index = index;
        }
        if let Some(index) = ticks.max.as_ref().and_then(|b| find_label(&self.labels, b)) {
            self.max_index = index;
        }
        if self.min_index > self.max_index {
            std::mem::swap(&mut self.min_index, &mut self.max_index);
        }
    }

    pub fn set_geometry(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn geometry(&self) -> Rect {
        self.rect
    }

    pub fn build_ticks(&mut self) {
        self.ticks = self
            .labels
            .iter()
            .enumerate()
            .skip(self.min_index)
            .take(self.max_index + 1 - self.min_index)
            .map(|(index, label)| Tick::new(index as f64, label.as_str()))
            .collect();
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn min(&self) -> f64 {
        self.min_index as f64
    }

    pub fn max(&self) -> f64 {
        self.max_index as f64
    }

    fn slot_count(&self) -> f64 {
        let visible = self.max_index + 1 - self.min_index;
        let slots = if self.options.offset_grid_lines {
            visible
        } else {
            visible - 1
        };
        slots.max(1) as f64
    }

    fn slot_size(&self) -> f64 {
        let length = if self.options.is_horizontal() {
            self.rect.width
        } else {
            self.rect.height
        };
        length / self.slot_count()
    }

    fn origin(&self) -> f64 {
        if self.options.is_horizontal() {
            self.rect.left()
        } else {
            self.rect.top()
        }
    }

    /// Values sit in the middle of their slot with offset grid lines, and
    /// always when only one label is visible.
    fn half_slot(&self) -> f64 {
        if self.options.offset_grid_lines || self.min_index == self.max_index {
            self.slot_size() / 2.0
        } else {
            0.0
        }
    }

    pub fn pixel_for_value(&self, index: f64) -> f64 {
        self.origin() + self.slot_size() * (index - self.min_index as f64) + self.half_slot()
    }

    /// Nearest visible label index.
    pub fn value_for_pixel(&self, pixel: f64) -> f64 {
        let slot = self.slot_size();
        let offset = pixel - self.origin() - self.half_slot();
        let steps = if slot > 0.0 { (offset / slot).round() } else { 0.0 };
        (self.min_index as f64 + steps).clamp(self.min_index as f64, self.max_index as f64)
    }

    /// Grid line position of the tick at `index`.
    pub fn pixel_for_tick(&self, index: usize) -> Option<f64> {
        (index < self.ticks.len()).then(|| self.origin() + self.slot_size() * index as f64)
    }

    /// Label samples are placed on their label, everything else on its index.
    pub fn pixel_for_data(&self, value: &DataValue, index: usize) -> f64 {
        let position = value
            .as_label()
            .and_then(|label| self.labels.iter().position(|l| l == label))
            .unwrap_or(index);
        self.pixel_for_value(position as f64)
    }

    pub fn base_pixel(&self) -> f64 {
        if self.options.is_horizontal() {
            self.rect.left()
        } else {
            self.rect.bottom()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AxisId, AxisPosition, ScaleKind};

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn scale(options: ScaleOptions, names: &[&str]) -> CategoryScale {
        let labels = labels(names);
        let ctx = ScaleContext {
            labels: &labels,
            x_labels: None,
            y_labels: None,
            datasets: &[],
        };
        let mut scale = CategoryScale::new(options);
        scale.determine_data_limits(&ctx);
        scale.set_geometry(Rect::new(0.0, 0.0, 300.0, 100.0));
        scale.build_ticks();
        scale
    }

    fn bottom() -> ScaleOptions {
        let mut options = ScaleOptions::new(ScaleKind::Category, AxisId::X_PRIMARY);
        options.position = AxisPosition::Bottom;
        options
    }

    #[test]
    fn test_grid_aligned_slots() {
        let scale = scale(bottom(), &["a", "b", "c", "d"]);
        assert_eq!(scale.ticks().len(), 4);
        assert_eq!(scale.pixel_for_value(0.0), 0.0);
        assert_eq!(scale.pixel_for_value(3.0), 300.0);
        assert_eq!(scale.value_for_pixel(110.0), 1.0);
        assert_eq!(scale.value_for_pixel(-40.0), 0.0);
        assert_eq!(scale.pixel_for_tick(2), Some(200.0));
    }

    #[test]
    fn test_offset_grid_lines() {
        let mut options = bottom();
        options.offset_grid_lines = true;
        let scale = scale(options, &["a", "b", "c"]);
        assert_eq!(scale.pixel_for_value(0.0), 50.0);
        assert_eq!(scale.pixel_for_value(2.0), 250.0);
        assert_eq!(scale.pixel_for_tick(1), Some(100.0));
        assert_eq!(scale.value_for_pixel(250.0), 2.0);
    }

    #[test]
    fn test_restricted_range() {
        let mut options = bottom();
        options.ticks.min = Some(TickBound::from("b"));
        options.ticks.max = Some(TickBound::from("c"));
        let scale = scale(options, &["a", "b", "c", "d"]);
        assert_eq!((scale.min(), scale.max()), (1.0, 2.0));
        let names: Vec<&str> = scale.ticks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
        assert_eq!(scale.ticks()[0].value, 1.0);
        assert_eq!(scale.pixel_for_value(1.0), 0.0);
    }

    #[test]
    fn test_unknown_bound_is_ignored_and_labels_map() {
        let mut options = bottom();
        options.ticks.min = Some(TickBound::from("zzz"));
        let scale = scale(options, &["a", "b", "c"]);
        assert_eq!(scale.min(), 0.0);
        assert_eq!(scale.pixel_for_data(&DataValue::from("c"), 0), 300.0);
        assert_eq!(scale.pixel_for_data(&DataValue::from(7.0), 1), 150.0);
    }

    #[test]
    fn test_single_and_empty_labels() {
        let single = scale(bottom(), &["only"]);
        assert_eq!(single.pixel_for_value(0.0), 150.0);

        let empty = scale(bottom(), &[]);
        assert!(empty.ticks().is_empty());
        assert!(empty.pixel_for_value(0.0).is_finite());
        assert_eq!(empty.pixel_for_tick(0), None);
    }
}
