//! Chartkit - chart update and render engine.
//!
//! Recomputes layout, coordinate mappings and visual state whenever chart
//! data or configuration changes, and animates elements between states.
//!
//! - [`scale`]: data value to pixel mapping and tick generation
//! - [`element`]: model / view / pivot / transition state machine
//! - [`data`]: observable sample sequences
//! - [`dataset`]: controllers keeping elements in sync with their data
//! - [`chart`]: the update cycle, rendering and animation
//!
//! The host owns the frame loop: it calls [`Chart::advance_frame`] while
//! [`Chart::is_animating`] and draws from the elements' views.
//!
//! ```
//! use std::time::Duration;
//! use chartkit::{AxisId, Chart, ChartConfig, ChartKind, Dataset};
//!
//! let mut chart = Chart::new(
//!     ChartConfig::new(ChartKind::Bar)
//!         .labels(["q1", "q2", "q3"])
//!         .dataset(Dataset::new("revenue", [12.0, 19.0, 7.0]))
//!         .animation_duration(Duration::from_millis(100)),
//! )
//! .unwrap();
//!
//! while chart.is_animating() {
//!     chart.advance_frame(Duration::from_millis(16));
//! }
//!
//! let y = chart.scale(AxisId::Y_PRIMARY).unwrap();
//! assert!(y.max() >= 19.0);
//! ```

pub mod animation;
pub mod chart;
pub mod config;
pub mod data;
pub mod dataset;
pub mod element;
pub mod error;
pub mod layout;
pub mod rect;
pub mod scale;
pub mod types;

pub use animation::{AnimationProgress, AnimationService};
pub use chart::{Chart, ChartDirtyFlags};
pub use config::{
    AnimationConfig, AnimationOptions, ChartConfig, ChartData, ChartOptions, ChartOptionsConfig,
    ElementConfig, ElementOptions, ScaleConfig, ScaleOptions, TickBound, TickConfig, TickOptions,
};
pub use data::{DataArray, DataListener, DataMutation};
pub use dataset::{Dataset, DatasetMeta, DatasetStyle};
pub use element::{Attr, Element, Model};
pub use error::{ChartError, ChartResult};
pub use layout::{ChartAreaLayout, LayoutProvider};
pub use rect::Rect;
pub use scale::{Scale, ScaleContext, ScaleRegistry, ScaleSet, Tick};
pub use types::{AxisId, AxisPosition, ChartKind, DataPoint, DataValue, ScaleKind};

pub use chartkit_core::EasingFunction;
