//! Double precision `glam` types used for chart geometry.
//!
//! Pixel mapping has to round-trip data values exactly, so the engine works
//! in `f64` throughout and re-exports the `D*` family from [`glam`].

pub use glam::{DVec2, dvec2};
