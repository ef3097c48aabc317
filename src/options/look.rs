use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pan/tilt response to pointer input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Look", inline)]
#[serde(default)]
pub struct LookOptions {
    /// Horizontal (pan) sensitivity.
    #[schemars(title = "Look Speed", range(min = 0.001, max = 1.0), extend("step" = 0.005))]
    pub look_speed: f32,
    /// Vertical (tilt) sensitivity.
    #[schemars(title = "Pivot Speed", range(min = 0.001, max = 1.0), extend("step" = 0.005))]
    pub pivot_speed: f32,
    /// Lowest tilt in degrees (looking up).
    #[schemars(title = "Minimum Tilt", range(min = -89.0, max = 0.0), extend("step" = 1.0))]
    pub minimum_tilt: f32,
    /// Highest tilt in degrees (looking down).
    #[schemars(title = "Maximum Tilt", range(min = 0.0, max = 89.0), extend("step" = 1.0))]
    pub maximum_tilt: f32,
    /// Flip the vertical axis.
    #[schemars(title = "Invert Tilt")]
    pub invert_tilt: bool,
    /// Floor applied to the frame time before it divides input deltas.
    #[schemars(skip)]
    pub min_delta_time: f32,
}

impl Default for LookOptions {
    fn default() -> Self {
        Self {
            look_speed: 0.1,
            pivot_speed: 0.03,
            minimum_tilt: -35.0,
            maximum_tilt: 35.0,
            invert_tilt: false,
            min_delta_time: 0.001,
        }
    }
}
