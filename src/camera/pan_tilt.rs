use glam::{Quat, Vec2};

use crate::options::LookOptions;

/// Wrap an angle in degrees into `[0, 360)`.
///
/// Keeps the stored pan from growing without bound; the rotation it
/// produces is unchanged.
#[inline]
#[must_use]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Frame time usable as a divisor: `None` for zero, negative or non-finite
/// `dt`, otherwise `dt` floored at `min_dt`.
#[inline]
#[must_use]
pub fn effective_dt(dt: f32, min_dt: f32) -> Option<f32> {
    if !dt.is_finite() || dt <= 0.0 {
        None
    } else {
        Some(dt.max(min_dt))
    }
}

/// Pan (yaw) and tilt (pitch) angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanTilt {
    pan: f32,
    tilt: f32,
}

impl PanTilt {
    /// Angles as given, with pan wrapped and tilt clamped to `look`'s range.
    #[must_use]
    pub fn new(pan: f32, tilt: f32, look: &LookOptions) -> Self {
        let mut angles = Self {
            pan: if pan.is_finite() { wrap_degrees(pan) } else { 0.0 },
            tilt: if tilt.is_nan() { 0.0 } else { tilt },
        };
        angles.tilt = clamp_tilt(angles.tilt, look);
        angles
    }

    /// Pan in `[0, 360)` degrees.
    #[must_use]
    pub fn pan(&self) -> f32 {
        self.pan
    }

    /// Tilt in degrees, within the configured range.
    #[must_use]
    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    /// Apply one tick of pointer input. Unusable `dt` leaves the angles
    /// alone.
    pub fn apply(&mut self, look: &LookOptions, dt: f32, delta: Vec2) {
        let Some(dt) = effective_dt(dt, look.min_delta_time) else {
            return;
        };

        let pan_step = delta.x * look.look_speed / dt;
        if pan_step.is_finite() {
            self.pan = wrap_degrees(self.pan + wrap_degrees(pan_step));
        }

        let sign = if look.invert_tilt { -1.0 } else { 1.0 };
        let tilt_step = sign * delta.y * look.pivot_speed / dt;
        if !tilt_step.is_nan() {
            self.tilt = clamp_tilt(self.tilt - tilt_step, look);
        }
    }

    /// Yaw-only rotation for the anchor.
    #[must_use]
    pub fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.pan.to_radians())
    }

    /// Pitch-only rotation for the mount.
    #[must_use]
    pub fn pitch_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.tilt.to_radians())
    }
}

/// Clamp without `f32::clamp`, which panics on an inverted range.
fn clamp_tilt(tilt: f32, look: &LookOptions) -> f32 {
    tilt.max(look.minimum_tilt).min(look.maximum_tilt)
}
