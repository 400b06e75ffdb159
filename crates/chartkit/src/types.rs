//! Core chart types.

use std::fmt;

/// A unique identifier for a scale axis.
///
/// Axes are referenced by name (`"x-axis-0"`, `"y-axis-1"`, `"scale"`); the
/// name is hashed with FNV-1a so the same name always yields the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisId(pub u32);

impl AxisId {
    /// First horizontal axis (`"x-axis-0"`).
    pub const X_PRIMARY: AxisId = AxisId::from_name("x-axis-0");
    /// First vertical axis (`"y-axis-0"`).
    pub const Y_PRIMARY: AxisId = AxisId::from_name("y-axis-0");
    /// The single radial scale of radar charts (`"scale"`).
    pub const RADIAL: AxisId = AxisId::from_name("scale");

    /// Create an axis ID from a name using FNV-1a hash.
    ///
    /// # Example
    ///
    /// ```
    /// use chartkit::AxisId;
    ///
    /// assert_eq!(AxisId::from_name("x-axis-0"), AxisId::X_PRIMARY);
    /// assert_eq!(AxisId::x(0), AxisId::X_PRIMARY);
    /// ```
    pub const fn from_name(name: &str) -> Self {
        const FNV_OFFSET_BASIS: u32 = 2166136261;
        const FNV_PRIME: u32 = 16777619;

        let bytes = name.as_bytes();
        let mut hash = FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u32;
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Id given to the `index`-th horizontal axis when none is configured.
    pub fn x(index: usize) -> Self {
        Self::from_name(&format!("x-axis-{}", index))
    }

    /// Id given to the `index`-th vertical axis when none is configured.
    pub fn y(index: usize) -> Self {
        Self::from_name(&format!("y-axis-{}", index))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axis#{:08x}", self.0)
    }
}

/// Position of an axis on the chart. Top and bottom axes are horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisPosition {
    /// Left side (for Y axes)
    #[default]
    Left,
    /// Right side (for Y axes)
    Right,
    /// Top (for X axes)
    Top,
    /// Bottom (for X axes)
    Bottom,
    /// Centered in the chart area (radial scales)
    ChartArea,
}

impl AxisPosition {
    /// Check if an axis at this position runs horizontally.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, AxisPosition::Top | AxisPosition::Bottom)
    }
}

/// The kind of chart a dataset is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    /// Points joined by a line
    #[default]
    Line,
    /// Vertical bars
    Bar,
    /// Points on two linear axes
    Scatter,
    /// Scatter points with a radius
    Bubble,
    /// Polygon on a radial scale
    Radar,
}

impl ChartKind {
    /// Whether datasets of this kind have an aggregate line element.
    pub fn has_line_element(&self) -> bool {
        matches!(self, ChartKind::Line | ChartKind::Radar)
    }

    /// Whether datasets of this kind bind to cartesian x/y axes.
    pub fn is_cartesian(&self) -> bool {
        !matches!(self, ChartKind::Radar)
    }
}

/// The kind of a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleKind {
    /// Discrete labels
    Category,
    /// Linear numeric axis
    Linear,
    /// Base-10 logarithmic numeric axis
    Logarithmic,
    /// Linear distance from the center of a radar chart
    RadialLinear,
}

/// An `{x, y}` data point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DataPoint {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl DataPoint {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// One raw sample of a dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataValue {
    /// A plain number.
    Number(f64),
    /// An `{x, y}` pair.
    Point(DataPoint),
    /// A label or a numeric string.
    Label(String),
    /// No sample.
    #[default]
    Missing,
}

impl DataValue {
    /// The value this sample contributes to an axis.
    ///
    /// Points contribute their `x` to horizontal axes and their `y` to
    /// vertical ones. Strings are parsed as numbers. Returns `None` for
    /// missing, non-numeric and non-finite samples.
    pub fn coordinate(&self, horizontal: bool) -> Option<f64> {
        let value = match self {
            DataValue::Number(n) => *n,
            DataValue::Point(p) => {
                if horizontal {
                    p.x
                } else {
                    p.y
                }
            }
            DataValue::Label(s) => s.trim().parse::<f64>().ok()?,
            DataValue::Missing => return None,
        };
        value.is_finite().then_some(value)
    }

    /// The label text, if this sample is a label.
    pub fn as_label(&self) -> Option<&str> {
        match self {
            DataValue::Label(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Number(value as f64)
    }
}

impl From<DataPoint> for DataValue {
    fn from(point: DataPoint) -> Self {
        DataValue::Point(point)
    }
}

impl From<(f64, f64)> for DataValue {
    fn from(pair: (f64, f64)) -> Self {
        DataValue::Point(pair.into())
    }
}

impl From<&str> for DataValue {
    fn from(label: &str) -> Self {
        DataValue::Label(label.to_owned())
    }
}

impl From<String> for DataValue {
    fn from(label: String) -> Self {
        DataValue::Label(label)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DataValue::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_id_from_name_is_stable() {
        assert_eq!(AxisId::from_name("pressure"), AxisId::from_name("pressure"));
        assert_ne!(AxisId::from_name("pressure"), AxisId::from_name("temperature"));
        assert_eq!(AxisId::y(0), AxisId::Y_PRIMARY);
        assert_ne!(AxisId::x(1), AxisId::X_PRIMARY);
    }

    #[test]
    fn test_coordinate_coercion() {
        assert_eq!(DataValue::from(3.5).coordinate(true), Some(3.5));
        assert_eq!(DataValue::from((1.0, 2.0)).coordinate(true), Some(1.0));
        assert_eq!(DataValue::from((1.0, 2.0)).coordinate(false), Some(2.0));
        assert_eq!(DataValue::from(" 42 ").coordinate(false), Some(42.0));
        assert_eq!(DataValue::from("abc").coordinate(false), None);
        assert_eq!(DataValue::from(f64::NAN).coordinate(false), None);
        assert_eq!(DataValue::Missing.coordinate(false), None);
        assert_eq!(DataValue::from(None::<f64>), DataValue::Missing);
    }

    #[test]
    fn test_position_orientation() {
        assert!(AxisPosition::Bottom.is_horizontal());
        assert!(AxisPosition::Top.is_horizontal());
        assert!(!AxisPosition::Left.is_horizontal());
        assert!(!AxisPosition::ChartArea.is_horizontal());
    }
}
