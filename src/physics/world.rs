//! Minimal collider world answering sphere casts.
//!
//! Sphere casts are reduced to ray casts against colliders inflated by the
//! probe radius (Minkowski sum). Box colliders are inflated into larger
//! boxes, so their rounded corners are treated as square, which only ever
//! reports a contact slightly early.

use glam::Vec3;

use super::probe::{LayerMask, ProbeError, ProbeHit, SphereCaster};

/// Collision shape in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Solid sphere.
    Sphere {
        /// Centre in world space.
        center: Vec3,
        /// Radius in world units.
        radius: f32,
    },
    /// Axis-aligned box.
    Aabb {
        /// Minimum corner.
        min: Vec3,
        /// Maximum corner.
        max: Vec3,
    },
}

impl Shape {
    /// Distance along `dir` at which a sphere of `probe_radius` starting at
    /// `origin` first touches this shape. `None` when it never does or
    /// already overlaps it at the start.
    fn sweep(&self, origin: Vec3, dir: Vec3, probe_radius: f32) -> Option<f32> {
        match *self {
            Self::Sphere { center, radius } => {
                ray_sphere_entry(origin, dir, center, radius + probe_radius)
            }
            Self::Aabb { min, max } => ray_aabb_entry(
                origin,
                dir,
                min - Vec3::splat(probe_radius),
                max + Vec3::splat(probe_radius),
            ),
        }
    }

    /// Point on the shape's surface closest to `point`.
    fn closest_surface_point(&self, point: Vec3) -> Vec3 {
        match *self {
            Self::Sphere { center, radius } => {
                center + (point - center).normalize_or_zero() * radius
            }
            Self::Aabb { min, max } => point.clamp(min, max),
        }
    }
}

/// Entry distance of a ray into a sphere; `None` if missed, behind, or the
/// origin is already inside.
fn ray_sphere_entry(
    origin: Vec3,
    dir: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let oc = origin - center;
    let c = oc.length_squared() - radius * radius;
    if c <= 0.0 {
        return None;
    }
    let b = oc.dot(dir);
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Entry distance of a ray into an AABB (slab method); `None` if missed,
/// behind, or the origin is already inside.
fn ray_aabb_entry(
    origin: Vec3,
    dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let inv = |d: f32| {
        if d.abs() > 1e-10 {
            1.0 / d
        } else {
            f32::MAX * d.signum()
        }
    };
    let inv_dir = Vec3::new(inv(dir.x), inv(dir.y), inv(dir.z));

    let t1 = (aabb_min - origin) * inv_dir;
    let t2 = (aabb_max - origin) * inv_dir;
    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_min >= 0.0 {
        Some(t_min)
    } else {
        None
    }
}

/// A shape on a collision layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Geometry.
    pub shape: Shape,
    /// Layer in `0..32`, matched against the probe's [`LayerMask`].
    pub layer: u8,
}

/// Flat list of static colliders.
#[derive(Debug, Clone, Default)]
pub struct ColliderWorld {
    colliders: Vec<Collider>,
}

impl ColliderWorld {
    /// Empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collider.
    pub fn add(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    /// Add a sphere on `layer`.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, layer: u8) {
        self.add(Collider {
            shape: Shape::Sphere { center, radius },
            layer,
        });
    }

    /// Add an axis-aligned box on `layer`. Corners may be given in any order.
    pub fn add_box(&mut self, a: Vec3, b: Vec3, layer: u8) {
        self.add(Collider {
            shape: Shape::Aabb {
                min: a.min(b),
                max: a.max(b),
            },
            layer,
        });
    }

    /// Number of colliders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the world has no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Remove every collider.
    pub fn clear(&mut self) {
        self.colliders.clear();
    }
}

impl SphereCaster for ColliderWorld {
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Result<Option<ProbeHit>, ProbeError> {
        if !origin.is_finite() {
            return Err(ProbeError::InvalidQuery("origin is not finite"));
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(ProbeError::InvalidQuery("radius must be >= 0"));
        }
        if max_distance.is_nan() || max_distance < 0.0 {
            return Err(ProbeError::InvalidQuery("max distance must be >= 0"));
        }
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return Err(ProbeError::InvalidQuery("direction has no length"));
        }

        let nearest = self
            .colliders
            .iter()
            .filter(|c| mask.contains(c.layer))
            .filter_map(|c| {
                c.shape
                    .sweep(origin, dir, radius)
                    .filter(|&t| t <= max_distance)
                    .map(|t| (c, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));

        Ok(nearest.map(|(collider, t)| ProbeHit {
            point: collider.shape.closest_surface_point(origin + dir * t),
            distance: t,
        }))
    }
}
