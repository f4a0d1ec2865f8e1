#![forbid(unsafe_code)]

//! Release velocity and inertial projection for dragged panels.
//!
//! When a drag ends the host may ask for a short inertial slide: the panel's
//! final position is pushed once along the release velocity, scaled by a
//! decay factor, before snapping and clamping.
//!
//! # Invariants
//!
//! 1. [`VelocityTracker::velocity`] only considers samples inside the
//!    trailing window (default 100ms) relative to the newest sample.
//! 2. Fewer than two usable samples, or a zero time span, yields zero
//!    velocity.
//! 3. [`Momentum::project`] is applied exactly once per release; it never
//!    integrates over time.
//!
//! # Failure Modes
//!
//! - Non-monotonic timestamps (a host replaying events out of order): samples
//!   older than the newest are still accepted, but a non-positive span
//!   produces zero velocity rather than a sign flip.
//! - Non-finite velocities collapse to zero.

use std::collections::VecDeque;

use crate::geometry::Point;

/// Default trailing window for velocity estimation, in milliseconds.
pub const DEFAULT_VELOCITY_WINDOW_MS: f64 = 100.0;

/// Default decay applied to the release velocity.
pub const DEFAULT_MOMENTUM_DECAY: f64 = 0.95;

const MAX_SAMPLES: usize = 16;

/// A 2D velocity in CSS pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn sanitized(self) -> Self {
        if self.x.is_finite() && self.y.is_finite() {
            self
        } else {
            Self::ZERO
        }
    }
}

/// Estimates pointer velocity from the most recent move samples.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    window_ms: f64,
    samples: VecDeque<(Point, f64)>,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_VELOCITY_WINDOW_MS)
    }
}

impl VelocityTracker {
    /// Create a tracker with the given trailing window.
    #[must_use]
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: window_ms.max(1.0),
            samples: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    /// Record a pointer position at `timestamp_ms`.
    pub fn push(&mut self, position: Point, timestamp_ms: f64) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back((position, timestamp_ms));
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Velocity over the trailing window, in px/s.
    #[must_use]
    pub fn velocity(&self) -> Velocity {
        let Some(&(last_pos, last_t)) = self.samples.back() else {
            return Velocity::ZERO;
        };
        let cutoff = last_t - self.window_ms;
        let Some(&(first_pos, first_t)) = self.samples.iter().find(|(_, t)| *t >= cutoff) else {
            return Velocity::ZERO;
        };
        let span_ms = last_t - first_t;
        if span_ms <= 0.0 {
            return Velocity::ZERO;
        }
        let (dx, dy) = last_pos.delta_from(first_pos);
        let scale = 1000.0 / span_ms;
        Velocity::new(dx * scale, dy * scale).sanitized()
    }
}

/// One-shot inertial projection applied on release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Momentum {
    decay: f64,
}

impl Default for Momentum {
    fn default() -> Self {
        Self::new(DEFAULT_MOMENTUM_DECAY)
    }
}

impl Momentum {
    /// Create a projection with the given decay, clamped to `[0, 1]`.
    #[must_use]
    pub fn new(decay: f64) -> Self {
        let decay = if decay.is_finite() {
            decay.clamp(0.0, 1.0)
        } else {
            DEFAULT_MOMENTUM_DECAY
        };
        Self { decay }
    }

    #[must_use]
    pub const fn decay(&self) -> f64 {
        self.decay
    }

    /// `position + velocity * decay`.
    #[must_use]
    pub fn project(&self, position: Point, velocity: Velocity) -> Point {
        let v = velocity.sanitized();
        let projected = position.offset(v.x * self.decay, v.y * self.decay);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "folio.drag",
            vx = v.x,
            vy = v.y,
            decay = self.decay,
            x = projected.x,
            y = projected.y,
            "momentum projection"
        );
        projected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tracker_has_zero_velocity() {
        assert_eq!(VelocityTracker::default().velocity(), Velocity::ZERO);
    }

    #[test]
    fn single_sample_has_zero_velocity() {
        let mut t = VelocityTracker::default();
        t.push(Point::new(10.0, 10.0), 5.0);
        assert_eq!(t.velocity(), Velocity::ZERO);
    }

    #[test]
    fn velocity_is_pixels_per_second() {
        let mut t = VelocityTracker::default();
        t.push(Point::new(0.0, 0.0), 0.0);
        t.push(Point::new(5.0, -2.0), 10.0);
        t.push(Point::new(10.0, -4.0), 20.0);
        let v = t.velocity();
        assert!((v.x - 500.0).abs() < 1e-9);
        assert!((v.y + 200.0).abs() < 1e-9);
    }

    #[test]
    fn samples_outside_window_are_ignored() {
        let mut t = VelocityTracker::new(50.0);
        t.push(Point::new(-1000.0, 0.0), 0.0);
        t.push(Point::new(0.0, 0.0), 100.0);
        t.push(Point::new(10.0, 0.0), 120.0);
        let v = t.velocity();
        assert!((v.x - 500.0).abs() < 1e-9);
    }

    #[test]
    fn stale_pause_before_release_stops_motion() {
        let mut t = VelocityTracker::new(100.0);
        t.push(Point::new(0.0, 0.0), 0.0);
        t.push(Point::new(100.0, 0.0), 10.0);
        t.push(Point::new(100.0, 0.0), 500.0);
        assert_eq!(t.velocity(), Velocity::ZERO);
    }

    #[test]
    fn out_of_order_timestamps_yield_zero() {
        let mut t = VelocityTracker::default();
        t.push(Point::new(0.0, 0.0), 50.0);
        t.push(Point::new(10.0, 0.0), 50.0);
        assert_eq!(t.velocity(), Velocity::ZERO);
    }

    #[test]
    fn tracker_is_bounded() {
        let mut t = VelocityTracker::default();
        for i in 0..100 {
            t.push(Point::new(f64::from(i), 0.0), f64::from(i));
        }
        assert_eq!(t.len(), MAX_SAMPLES);
        t.clear();
        assert!(t.is_empty());
    }

    #[test]
    fn momentum_applies_decay_once() {
        let m = Momentum::default();
        let p = m.project(Point::new(100.0, 100.0), Velocity::new(100.0, -20.0));
        assert!((p.x - 195.0).abs() < 1e-9);
        assert!((p.y - 81.0).abs() < 1e-9);
    }

    #[test]
    fn momentum_decay_is_clamped() {
        assert_eq!(Momentum::new(4.0).decay(), 1.0);
        assert_eq!(Momentum::new(-1.0).decay(), 0.0);
        assert_eq!(Momentum::new(f64::NAN).decay(), DEFAULT_MOMENTUM_DECAY);
    }

    #[test]
    fn momentum_ignores_non_finite_velocity() {
        let p = Momentum::default().project(Point::new(1.0, 2.0), Velocity::new(f64::NAN, 3.0));
        assert_eq!(p, Point::new(1.0, 2.0));
    }
}
