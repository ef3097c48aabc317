use glam::{Quat, Vec3};

/// Rigid transform (translation + rotation) of a scene node, expressed
/// relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Offset from the parent's origin, in the parent's frame.
    pub translation: Vec3,
    /// Orientation relative to the parent.
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, no rotation.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Pure translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Translation plus rotation.
    #[must_use]
    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Compose `self` (parent) with `child`, yielding the child's transform
    /// in the parent's parent frame.
    #[must_use]
    pub fn mul_transform(&self, child: &Self) -> Self {
        Self {
            translation: self.translation + self.rotation * child.translation,
            rotation: (self.rotation * child.rotation).normalize(),
        }
    }

    /// Map a point from this transform's local frame into the outer frame.
    #[inline]
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * point
    }

    /// Inverse rigid transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            translation: rotation * -self.translation,
            rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_undoes_transform() {
        let t = Transform::from_translation_rotation(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.7),
        );
        let p = Vec3::new(-4.0, 0.5, 2.0);
        let back = t.inverse().transform_point(t.transform_point(p));
        assert!((back - p).length() < 1e-5);
    }

    #[test]
    fn composition_applies_parent_rotation_to_child_offset() {
        let parent = Transform::from_translation_rotation(
            Vec3::new(0.0, 1.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let child = Transform::from_translation(Vec3::new(0.0, 0.0, -2.0));
        let world = parent.mul_transform(&child);
        // Yaw of +90 degrees maps local -Z onto world -X.
        assert!((world.translation - Vec3::new(-2.0, 1.0, 0.0)).length() < 1e-5);
    }
}
