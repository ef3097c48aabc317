//! Critically damped follow filter.
//!
//! Approximates a critically damped spring with the closed-form
//! exponential decay from Game Programming Gems 4 (ch. 1.10). The filter
//! carries its velocity between calls, which is what keeps it from
//! overshooting or oscillating when the target moves every frame.

use glam::Vec3;

/// Smallest smoothing time accepted; shorter values are raised to this.
pub const MIN_SMOOTH_TIME: f32 = 1e-4;

/// Velocity state of a smooth-damp filter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothDamp {
    /// Current velocity in units per second.
    pub velocity: Vec3,
}

impl SmoothDamp {
    /// Filter at rest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any carried velocity.
    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    /// Advance from `current` toward `target` by `dt` seconds, reaching it
    /// in roughly `smooth_time` seconds. Returns the new position.
    ///
    /// A non-positive or non-finite `dt` returns `current` and leaves the
    /// velocity untouched.
    pub fn step(
        &mut self,
        current: Vec3,
        target: Vec3,
        smooth_time: f32,
        dt: f32,
    ) -> Vec3 {
        if !dt.is_finite() || dt <= 0.0 {
            return current;
        }
        let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
        let omega = 2.0 / smooth_time;
        let x = omega * dt;
        let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let change = current - target;
        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * decay;
        let output = target + (change + temp) * decay;

        // Passed the target: land on it instead of swinging back.
        if (target - current).dot(output - target) > 0.0 {
            self.velocity = Vec3::ZERO;
            return target;
        }
        output
    }
}
