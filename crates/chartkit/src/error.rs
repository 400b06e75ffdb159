use crate::types::AxisId;

/// Errors that can occur while building or updating a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Two configured scales resolved to the same id.
    DuplicateAxis(AxisId),

    /// A dataset references a scale that does not exist.
    UnknownAxis { dataset: usize, axis: AxisId },

    /// A radar dataset was added to a chart without a radial scale.
    MissingRadialScale { dataset: usize },

    /// A dataset index is out of range.
    DatasetOutOfRange { index: usize, len: usize },

    /// The dataset was added after the last update and has no controller yet.
    NotUpdated { dataset: usize },

    /// The chart was destroyed.
    Destroyed,
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::DuplicateAxis(id) => write!(f, "Duplicate scale id: {}", id),
            ChartError::UnknownAxis { dataset, axis } => {
                write!(f, "Dataset {} is bound to unknown scale {}", dataset, axis)
            }
            ChartError::MissingRadialScale { dataset } => {
                write!(f, "Dataset {} needs a radial scale but none is configured", dataset)
            }
            ChartError::DatasetOutOfRange { index, len } => write!(
                f,
                "Dataset index {} out of range (chart has {} datasets)",
                index, len
            ),
            ChartError::NotUpdated { dataset } => {
                write!(f, "Dataset {} has no controller until the next update", dataset)
            }
            ChartError::Destroyed => write!(f, "Chart was destroyed"),
        }
    }
}

impl std::error::Error for ChartError {}

/// Result type for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ChartError::DatasetOutOfRange { index: 3, len: 2 };
        assert_eq!(
            err.to_string(),
            "Dataset index 3 out of range (chart has 2 datasets)"
        );

        let err = ChartError::UnknownAxis {
            dataset: 0,
            axis: AxisId(0xab),
        };
        assert_eq!(err.to_string(), "Dataset 0 is bound to unknown scale axis#000000ab");
    }
}
