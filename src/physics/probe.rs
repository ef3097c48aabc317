use std::fmt;

use glam::Vec3;

/// Number of collision layers a [`LayerMask`] can address.
pub const LAYER_COUNT: u8 = 32;

/// Bit set of collision layers a probe is allowed to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(u32);

impl LayerMask {
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Mask containing exactly `layers`. Layers outside `0..32` are ignored.
    #[must_use]
    pub fn from_layers(layers: &[u8]) -> Self {
        Self(
            layers
                .iter()
                .filter(|&&layer| layer < LAYER_COUNT)
                .fold(0, |bits, &layer| bits | (1 << layer)),
        )
    }

    /// Copy of this mask with `layers` removed.
    #[must_use]
    pub fn excluding(self, layers: &[u8]) -> Self {
        Self(self.0 & !Self::from_layers(layers).0)
    }

    /// Whether `layer` is part of the mask.
    #[inline]
    #[must_use]
    pub fn contains(self, layer: u8) -> bool {
        layer < LAYER_COUNT && self.0 & (1 << layer) != 0
    }

    /// Raw bits.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// First contact reported by a sphere cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// World-space contact point on the obstacle surface.
    pub point: Vec3,
    /// Distance the sphere travelled along the cast direction before
    /// touching the obstacle.
    pub distance: f32,
}

/// Why a probe query could not be answered.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// The query parameters were unusable (NaN origin, zero direction, ...).
    InvalidQuery(&'static str),
    /// The physics backend could not service the query.
    Unavailable(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidQuery(why) => write!(f, "invalid probe query: {why}"),
            Self::Unavailable(msg) => {
                write!(f, "physics backend unavailable: {msg}")
            }
        }
    }
}

impl std::error::Error for ProbeError {}

/// Spatial sphere-cast capability supplied by the host physics world.
pub trait SphereCaster {
    /// Sweep a sphere of `radius` from `origin` along `direction` for at most
    /// `max_distance`, considering only colliders whose layer is in `mask`.
    ///
    /// Returns the nearest hit, `Ok(None)` when the path is clear.
    ///
    /// # Errors
    ///
    /// Implementations return [`ProbeError`] when the query cannot be
    /// answered. Callers in this crate treat that as a clear path.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Result<Option<ProbeHit>, ProbeError>;
}

impl<T: SphereCaster + ?Sized> SphereCaster for &T {
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Result<Option<ProbeHit>, ProbeError> {
        (**self).sphere_cast(origin, radius, direction, max_distance, mask)
    }
}
