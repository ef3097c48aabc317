use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Follow smoothing parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Follow", inline)]
#[serde(default)]
pub struct FollowOptions {
    /// Divisor turning the frame time into the smooth-damp smoothing time
    /// (`dt / follow_speed`). Larger values trail the subject further.
    #[schemars(title = "Follow Speed", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub follow_speed: f32,
}

impl Default for FollowOptions {
    fn default() -> Self {
        Self { follow_speed: 0.1 }
    }
}
