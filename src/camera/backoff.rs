//! Collision back-off: keeps the camera in front of whatever sits between
//! it and the mount.
//!
//! Each tick a sphere is swept from the mount toward the camera. A hit
//! shortens the stand-off to the hit distance minus a margin, never below
//! the minimum offset, and the camera's local Z is then blended toward that
//! target over a fixed settle window.

use glam::Vec3;

use crate::options::CollisionOptions;
use crate::physics::SphereCaster;

/// Nominal time for the camera offset to reach its target, in seconds.
/// Used as a linear blend factor (`dt / SETTLE_TIME`), not as an
/// exponential time constant.
pub const SETTLE_TIME: f32 = 0.2;

/// Outcome of the most recent back-off evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackoffState {
    /// Nothing between mount and camera.
    #[default]
    Clear,
    /// The probe hit geometry; the camera is pulled in.
    Blocked,
    /// Back-off disabled; the camera offset is left alone.
    XRay,
}

/// Signed stand-off target for the camera's local Z.
///
/// `hit_distance` is the distance from the mount to the contact point, if
/// the probe hit anything. The result is never positive and its magnitude
/// is never below `minimum_collision_offset`. A hit closer than the margin
/// floors the stand-off at zero before the minimum applies, so the sign
/// cannot flip.
#[must_use]
pub fn resolve_target(
    backup_distance: f32,
    hit_distance: Option<f32>,
    options: &CollisionOptions,
) -> f32 {
    let standoff = match hit_distance {
        Some(distance) => (distance - options.collision_margin).max(0.0),
        None => backup_distance.abs(),
    };
    -standoff.max(options.minimum_collision_offset)
}

/// Blend `current` toward `target` by `dt / SETTLE_TIME`, clamped to a full
/// step. Unusable `dt` leaves `current` unchanged.
#[must_use]
pub fn settle(current: f32, target: f32, dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return current;
    }
    let t = (dt / SETTLE_TIME).min(1.0);
    current + (target - current) * t
}

/// Back-off state carried between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionBackoff {
    state: BackoffState,
    target: Option<f32>,
    probe_failing: bool,
}

impl CollisionBackoff {
    /// Fresh state: clear, no target computed yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State from the last evaluation.
    #[must_use]
    pub fn state(&self) -> BackoffState {
        self.state
    }

    /// Target from the last evaluation; `None` before the first one or
    /// while x-ray is on.
    #[must_use]
    pub fn target(&self) -> Option<f32> {
        self.target
    }

    fn enter(&mut self, state: BackoffState) {
        if self.state != state {
            log::debug!("camera back-off {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Record that back-off was skipped because x-ray is on.
    pub fn bypass(&mut self) {
        self.enter(BackoffState::XRay);
        self.target = None;
    }

    /// Probe from `mount` toward `camera` and compute the new target.
    ///
    /// `fallback_dir` is used when mount and camera coincide. A failing
    /// probe counts as a clear path.
    pub fn evaluate<C: SphereCaster + ?Sized>(
        &mut self,
        caster: &C,
        mount: Vec3,
        camera: Vec3,
        fallback_dir: Vec3,
        backup_distance: f32,
        options: &CollisionOptions,
    ) -> f32 {
        let dir = (camera - mount).try_normalize().unwrap_or(fallback_dir);

        let hit = match caster.sphere_cast(
            mount,
            options.sphere_radius,
            dir,
            backup_distance.abs(),
            options.probe_mask(),
        ) {
            Ok(hit) => {
                self.probe_failing = false;
                hit
            }
            Err(e) => {
                if !self.probe_failing {
                    log::warn!("camera probe failed, treating as clear: {e}");
                }
                self.probe_failing = true;
                None
            }
        };

        let hit_distance = hit.map(|h| mount.distance(h.point));
        self.enter(if hit.is_some() {
            BackoffState::Blocked
        } else {
            BackoffState::Clear
        });
        let target = resolve_target(backup_distance, hit_distance, options);
        self.target = Some(target);
        target
    }
}
