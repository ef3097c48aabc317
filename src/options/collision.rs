use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::physics::LayerMask;

/// Camera collision probe and back-off parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Collision", inline)]
#[serde(default)]
pub struct CollisionOptions {
    /// Radius of the sphere swept from the mount toward the camera.
    #[schemars(title = "Probe Radius", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub sphere_radius: f32,
    /// Gap kept between the camera and the obstacle it backs away from.
    #[schemars(title = "Collision Margin", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub collision_margin: f32,
    /// Closest the camera may come to the mount.
    #[schemars(title = "Minimum Offset", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub minimum_collision_offset: f32,
    /// Camera offset along the mount's local Z when nothing is in the way
    /// (negative = behind). Unset adopts the camera's authored offset.
    #[schemars(title = "Backup Distance")]
    pub backup_distance: Option<f32>,
    /// Disable collision back-off entirely.
    #[schemars(title = "Wall X-Ray")]
    pub xray: bool,
    /// Layers the probe never hits (subject body, rig).
    #[schemars(skip)]
    pub ignore_layers: Vec<u8>,
}

impl Default for CollisionOptions {
    fn default() -> Self {
        Self {
            sphere_radius: 0.2,
            collision_margin: 0.2,
            minimum_collision_offset: 0.2,
            backup_distance: None,
            xray: false,
            ignore_layers: vec![8, 9, 10],
        }
    }
}

impl CollisionOptions {
    /// Probe mask: every layer except the ignored ones.
    #[must_use]
    pub fn probe_mask(&self) -> LayerMask {
        LayerMask::ALL.excluding(&self.ignore_layers)
    }
}
