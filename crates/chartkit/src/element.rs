//! Animated visual elements.
//!
//! An [`Element`] carries a *model* (where it should end up), a *view* (what
//! is currently drawn) and, while animating, a *start* snapshot. Dataset
//! controllers write the model and call [`Element::pivot`]; the render loop
//! then calls [`Element::transition`] with increasing eased fractions until
//! it reaches exactly `1.0`, which settles the view onto the model.

use chartkit_core::Color;
use chartkit_core::math::DVec2;
use indexmap::IndexMap;

/// One animatable attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    /// Interpolated linearly.
    Number(f64),
    /// Color-like string, blended in RGBA space.
    Text(String),
    /// Snaps to the target.
    Flag(bool),
}

impl Attr {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Attr::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Attr::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Attr::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for Attr {
    fn from(value: f64) -> Self {
        Attr::Number(value)
    }
}

impl From<bool> for Attr {
    fn from(value: bool) -> Self {
        Attr::Flag(value)
    }
}

impl From<&str> for Attr {
    fn from(value: &str) -> Self {
        Attr::Text(value.to_owned())
    }
}

impl From<String> for Attr {
    fn from(value: String) -> Self {
        Attr::Text(value)
    }
}

/// Ordered attribute map. Keys starting with `_` are private and never
/// interpolated.
pub type Model = IndexMap<String, Attr>;

/// A visual primitive (point, bar, line) with its animation state.
#[derive(Debug, Clone, Default)]
pub struct Element {
    model: Model,
    view: Option<Model>,
    start: Option<Model>,
    /// Excluded from drawing and from scale limits.
    pub hidden: bool,
    pub(crate) pending_reset: bool,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new element that receives its reset-state model on the next update.
    pub(crate) fn pending_reset() -> Self {
        Self {
            pending_reset: true,
            ..Self::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Attr>) -> Self {
        self.model.insert(key.into(), value.into());
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Replace the whole target model.
    pub fn set_model(&mut self, model: Model) {
        self.model = model;
    }

    /// The displayed attributes, once the element has been pivoted or
    /// transitioned at least once.
    pub fn view(&self) -> Option<&Model> {
        self.view.as_ref()
    }

    /// The snapshot taken by the last pivot, while an animation is in flight.
    pub fn start(&self) -> Option<&Model> {
        self.start.as_ref()
    }

    /// Whether the element waits for its reset-state model.
    pub fn is_pending_reset(&self) -> bool {
        self.pending_reset
    }

    pub fn is_animating(&self) -> bool {
        self.start.is_some()
    }

    /// Forget the displayed state so the next pivot starts from the model.
    pub(crate) fn discard_view(&mut self) {
        self.view = None;
        self.start = None;
    }

    /// Number from the displayed view, falling back to the model.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.view
            .as_ref()
            .and_then(|view| view.get(key))
            .or_else(|| self.model.get(key))
            .and_then(Attr::as_number)
    }

    /// Snapshot the current view as the start of the next animation.
    ///
    /// Creates the view from the model if the element was never rendered.
    pub fn pivot(&mut self) {
        let view = self.view.get_or_insert_with(|| self.model.clone());
        self.start = Some(view.clone());
    }

    /// Move the view towards the model by the eased fraction `ease`.
    ///
    /// `ease == 1.0` settles: the view becomes an exact copy of the model and
    /// the start snapshot is dropped.
    pub fn transition(&mut self, ease: f64) {
        if ease == 1.0 {
            self.view = Some(self.model.clone());
            self.start = None;
            return;
        }

        if self.view.is_none() {
            self.view = Some(self.model.clone());
        }
        if self.start.is_none() {
            self.pivot();
        }

        let (Some(view), Some(start)) = (self.view.as_mut(), self.start.as_ref()) else {
            return;
        };

        for (key, target) in &self.model {
            if key.starts_with('_') {
                continue;
            }

            let Some(current) = view.get_mut(key) else {
                let initial = match target {
                    Attr::Number(n) => Attr::Number(n * ease),
                    other => other.clone(),
                };
                view.insert(key.clone(), initial);
                continue;
            };

            if current == target {
                continue;
            }

            *current = match target {
                Attr::Text(to) => blend_colors(start.get(key), to, ease),
                Attr::Number(to) => {
                    let from = start
                        .get(key)
                        .and_then(Attr::as_number)
                        .filter(|n| !n.is_nan())
                        .unwrap_or(0.0);
                    Attr::Number(from + (to - from) * ease)
                }
                Attr::Flag(_) => target.clone(),
            };
        }
    }

    /// Anchor for tooltips: the model's `x`/`y`.
    pub fn tooltip_position(&self) -> DVec2 {
        let coord = |key| self.model.get(key).and_then(Attr::as_number).unwrap_or(0.0);
        DVec2::new(coord("x"), coord("y"))
    }

    /// Whether the model has finite numeric `x` and `y`.
    pub fn has_value(&self) -> bool {
        let finite = |key| {
            self.model
                .get(key)
                .and_then(Attr::as_number)
                .is_some_and(f64::is_finite)
        };
        finite("x") && finite("y")
    }
}

fn blend_colors(from: Option<&Attr>, to: &str, ease: f64) -> Attr {
    let colors = from
        .and_then(Attr::as_text)
        .and_then(|from| Color::parse(from).ok())
        .zip(Color::parse(to).ok());

    match colors {
        Some((from, to_color)) => Attr::Text(from.mix(to_color, ease as f32).to_css_string()),
        None => {
            tracing::trace!(color = to, "color blend failed, snapping to target");
            Attr::Text(to.to_owned())
        }
    }
}
