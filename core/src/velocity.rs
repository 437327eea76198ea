//! Horizontal drag speed.
//!
//! Speed is the instantaneous `|Δx| / Δt` between consecutive samples, in
//! pixels per millisecond. There is deliberately no smoothing: a child's
//! change of pace has to show up on the very next sample. On coarse timers
//! this jitters; a zero or negative Δt keeps the previous value.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Below this speed (px/ms) a drag is slow enough for letter sounds.
pub const DEFAULT_SLOW_THRESHOLD: f64 = 0.3;

/// One pointer observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self { x, y, timestamp_ms }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Speed classification driving the feedback granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pace {
    /// Phoneme-level feedback.
    Slow,
    /// Whole-word feedback.
    Fast,
}

#[derive(Debug, Clone)]
pub struct VelocityEstimator {
    last: Option<PointerSample>,
    speed: f64,
    slow_threshold: f64,
}

impl Default for VelocityEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_SLOW_THRESHOLD)
    }
}

impl VelocityEstimator {
    pub fn new(slow_threshold: f64) -> Self {
        Self {
            last: None,
            speed: 0.0,
            slow_threshold,
        }
    }

    /// Feed a sample and return the current speed.
    pub fn push(&mut self, sample: PointerSample) -> f64 {
        if let Some(prev) = self.last {
            let dt = sample.timestamp_ms - prev.timestamp_ms;
            if dt > 0.0 {
                self.speed = (sample.x - prev.x).abs() / dt;
            }
            tracing::trace!(speed = self.speed, dt, "velocity sample");
        }
        self.last = Some(sample);
        self.speed
    }

    /// Last computed speed in px/ms (0 before two samples were seen).
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// True once a sample has been seen since the last reset.
    pub fn has_previous(&self) -> bool {
        self.last.is_some()
    }

    pub fn pace(&self) -> Pace {
        if self.speed < self.slow_threshold {
            Pace::Slow
        } else {
            Pace::Fast
        }
    }

    /// Forget history; called when a new drag starts.
    pub fn reset(&mut self) {
        self.last = None;
        self.speed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_has_no_speed() {
        let mut v = VelocityEstimator::default();
        assert_eq!(v.push(PointerSample::new(10.0, 0.0, 0.0)), 0.0);
        assert_eq!(v.pace(), Pace::Slow);
    }

    #[test]
    fn speed_is_horizontal_only() {
        let mut v = VelocityEstimator::default();
        v.push(PointerSample::new(0.0, 0.0, 0.0));
        let s = v.push(PointerSample::new(-5.0, 400.0, 10.0));
        assert!((s - 0.5).abs() < 1e-9);
        assert_eq!(v.pace(), Pace::Fast);
    }

    #[test]
    fn zero_elapsed_keeps_previous_speed() {
        let mut v = VelocityEstimator::default();
        v.push(PointerSample::new(0.0, 0.0, 0.0));
        v.push(PointerSample::new(1.0, 0.0, 10.0));
        let s = v.push(PointerSample::new(50.0, 0.0, 10.0));
        assert!((s - 0.1).abs() < 1e-9);
        assert!(s.is_finite());
    }

    #[test]
    fn threshold_boundary_is_fast() {
        let mut v = VelocityEstimator::new(0.3);
        v.push(PointerSample::new(0.0, 0.0, 0.0));
        v.push(PointerSample::new(3.0, 0.0, 10.0));
        assert_eq!(v.pace(), Pace::Fast);
    }

    #[test]
    fn reset_clears_history() {
        let mut v = VelocityEstimator::default();
        v.push(PointerSample::new(0.0, 0.0, 0.0));
        v.push(PointerSample::new(10.0, 0.0, 1.0));
        v.reset();
        assert_eq!(v.speed(), 0.0);
        assert!(!v.has_previous());
    }
}
