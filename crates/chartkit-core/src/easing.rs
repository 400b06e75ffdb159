//! Easing curves for chart animations.

/// Easing functions for animations.
///
/// All curves map `0.0 -> 0.0` and `1.0 -> 1.0`. Inputs at or past the end of
/// the animation return exactly `1.0` so the final frame always settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EasingFunction {
    /// Linear interpolation
    Linear,
    /// Ease in (slow start)
    EaseIn,
    /// Ease out (slow end)
    EaseOut,
    /// Ease in and out (slow start and end)
    EaseInOut,
    /// Bounce effect
    Bounce,
    /// Elastic effect
    Elastic,
    /// Quadratic ease in
    QuadIn,
    /// Quadratic ease out
    QuadOut,
    /// Quadratic ease in-out
    QuadInOut,
    /// Cubic ease in
    CubicIn,
    /// Cubic ease out
    CubicOut,
    /// Cubic ease in-out
    CubicInOut,
    /// Quartic ease in
    QuartIn,
    /// Quartic ease out
    #[default]
    QuartOut,
    /// Quartic ease in-out
    QuartInOut,
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f64) -> f64 {
        if t >= 1.0 {
            return 1.0;
        }
        let t = t.max(0.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseIn | EasingFunction::QuadIn => t * t,
            EasingFunction::EaseOut | EasingFunction::QuadOut => t * (2.0 - t),
            EasingFunction::EaseInOut | EasingFunction::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            EasingFunction::Bounce => {
                if t < 1.0 / 2.75 {
                    7.5625 * t * t
                } else if t < 2.0 / 2.75 {
                    let t = t - 1.5 / 2.75;
                    7.5625 * t * t + 0.75
                } else if t < 2.5 / 2.75 {
                    let t = t - 2.25 / 2.75;
                    7.5625 * t * t + 0.9375
                } else {
                    let t = t - 2.625 / 2.75;
                    7.5625 * t * t + 0.984375
                }
            }
            EasingFunction::Elastic => {
                if t == 0.0 {
                    t
                } else {
                    let p = 0.3;
                    let s = p / 4.0;
                    let t = t - 1.0;
                    -(2.0f64.powf(10.0 * t) * ((t - s) * (2.0 * std::f64::consts::PI) / p).sin())
                }
            }
            EasingFunction::CubicIn => t * t * t,
            EasingFunction::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            EasingFunction::CubicInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t * t
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * t + 2.0)
                }
            }
            EasingFunction::QuartIn => t * t * t * t,
            EasingFunction::QuartOut => {
                let t = t - 1.0;
                -(t * t * t * t - 1.0)
            }
            EasingFunction::QuartInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t * t * t
                } else {
                    let t = t - 2.0;
                    -0.5 * (t * t * t * t - 2.0)
                }
            }
        }
    }
}
