//! Chartkit Core
//!
//! Shared services for the chartkit engine: logging bootstrap, profiling
//! hooks, hash collections, color handling and easing curves.

pub mod alloc;
pub mod color;
pub mod easing;
pub mod logging;
pub mod math;
pub mod profiling;

pub use color::{Color, ColorParseError};
pub use easing::EasingFunction;
