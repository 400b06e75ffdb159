//! Frame stepping for chart animations.
//!
//! The chart owns one [`AnimationService`]. Rendering with a non-zero
//! duration queues an animation of `duration / 16.66 ms` steps, replacing any
//! animation already in flight. The host drives it with
//! [`crate::Chart::advance_frame`]; frames dropped by the host are derived
//! from the elapsed time so animations finish on time, and the last step
//! always eases exactly `1.0`.

use std::time::Duration;

use chartkit_core::EasingFunction;

use crate::config::{AnimationCallback, AnimationOptions};

/// Nominal frame length (60 fps).
pub const FRAME_DURATION: Duration = Duration::from_micros(16_660);

/// State of an animation after a step, passed to the callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationProgress {
    pub current_step: f64,
    pub num_steps: f64,
    /// Linear progress, `current_step / num_steps`.
    pub step_decimal: f64,
    /// Eased progress handed to `transition`.
    pub ease: f64,
}

impl AnimationProgress {
    pub fn is_complete(&self) -> bool {
        self.current_step >= self.num_steps
    }
}

struct Animation {
    current_step: f64,
    num_steps: f64,
    easing: EasingFunction,
    on_progress: Option<AnimationCallback>,
    on_complete: Option<AnimationCallback>,
}

/// One advanced frame: what to draw and whom to notify.
pub(crate) struct FrameStep {
    pub progress: AnimationProgress,
    pub on_progress: Option<AnimationCallback>,
    pub on_complete: Option<AnimationCallback>,
}

/// Animation queue of one chart.
#[derive(Default)]
pub struct AnimationService {
    current: Option<Animation>,
    animating: bool,
}

impl std::fmt::Debug for AnimationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationService")
            .field("active", &self.current.is_some())
            .field("animating", &self.animating)
            .field("progress", &self.current.as_ref().map(|a| (a.current_step, a.num_steps)))
            .finish()
    }
}

impl AnimationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an animation, replacing the current one.
    ///
    /// A lazy animation runs without marking the chart as animating.
    pub fn add(&mut self, duration: Duration, options: &AnimationOptions, lazy: bool) {
        let num_steps = duration.as_nanos() as f64 / FRAME_DURATION.as_nanos() as f64;
        tracing::trace!(num_steps, lazy, "queueing animation");
        if self.current.is_some() {
            tracing::trace!("replacing in-flight animation");
        }
        self.current = Some(Animation {
            current_step: 0.0,
            num_steps,
            easing: options.easing,
            on_progress: options.on_progress.clone(),
            on_complete: options.on_complete.clone(),
        });
        if !lazy {
            self.animating = true;
        }
    }

    /// Drop the current animation without completing it.
    pub fn cancel(&mut self) {
        if self.current.take().is_some() {
            tracing::trace!("animation cancelled");
        }
        self.animating = false;
    }

    /// Whether an animation is queued.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Whether a non-lazy animation is running.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Advance by the time elapsed since the previous frame.
    pub(crate) fn advance(&mut self, elapsed: Duration) -> Option<FrameStep> {
        let animation = self.current.as_mut()?;

        let steps = (elapsed.as_nanos() / FRAME_DURATION.as_nanos()).max(1) as f64;
        animation.current_step = (animation.current_step + steps).min(animation.num_steps);

        let step_decimal = if animation.num_steps > 0.0 {
            animation.current_step / animation.num_steps
        } else {
            1.0
        };
        let progress = AnimationProgress {
            current_step: animation.current_step,
            num_steps: animation.num_steps,
            step_decimal,
            ease: animation.easing.apply(step_decimal),
        };
        tracing::trace!(step = progress.current_step, ease = progress.ease, "animation frame");

        let step = FrameStep {
            progress,
            on_progress: animation.on_progress.clone(),
            on_complete: animation.on_complete.clone(),
        };
        if progress.is_complete() {
            self.current = None;
            self.animating = false;
        }
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(easing: EasingFunction) -> AnimationOptions {
        AnimationOptions {
            easing,
            ..Default::default()
        }
    }

    #[test]
    fn test_steps_follow_frames() {
        let mut service = AnimationService::new();
        service.add(FRAME_DURATION * 4, &options(EasingFunction::Linear), false);
        assert!(service.is_animating());

        let step = service.advance(FRAME_DURATION).unwrap();
        assert!((step.progress.ease - 0.25).abs() < 1e-9);

        let step = service.advance(FRAME_DURATION * 2).unwrap();
        assert!((step.progress.ease - 0.75).abs() < 1e-9);

        let step = service.advance(FRAME_DURATION * 10).unwrap();
        assert_eq!(step.progress.ease, 1.0);
        assert!(step.progress.is_complete());
        assert!(!service.is_active());
        assert!(!service.is_animating());
        assert!(service.advance(FRAME_DURATION).is_none());
    }

    #[test]
    fn test_short_frames_still_advance() {
        let mut service = AnimationService::new();
        service.add(FRAME_DURATION * 2, &options(EasingFunction::Linear), false);
        let step = service.advance(Duration::from_millis(1)).unwrap();
        assert!((step.progress.ease - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_lazy_and_replace() {
        let mut service = AnimationService::new();
        service.add(Duration::from_secs(1), &options(EasingFunction::QuartOut), true);
        assert!(service.is_active());
        assert!(!service.is_animating());

        service.add(FRAME_DURATION, &options(EasingFunction::Linear), false);
        let step = service.advance(FRAME_DURATION).unwrap();
        assert_eq!(step.progress.ease, 1.0);

        service.add(Duration::from_secs(1), &options(EasingFunction::Linear), false);
        service.cancel();
        assert!(!service.is_active());
        assert!(!service.is_animating());
    }
}
