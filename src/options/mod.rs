//! Rig tuning options with TOML preset support.
//!
//! Everything a settings panel would expose (follow smoothing, look
//! sensitivity and tilt range, collision probe parameters) lives here.
//! Options serialize to/from TOML so tuned rigs can be stored as presets.

mod collision;
mod follow;
mod look;

use std::path::Path;

pub use collision::CollisionOptions;
pub use follow::FollowOptions;
pub use look::LookOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::physics::LAYER_COUNT;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[look]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct RigOptions {
    /// Anchor follow smoothing.
    pub follow: FollowOptions,
    /// Pan/tilt sensitivity and limits.
    pub look: LookOptions,
    /// Collision probe and back-off.
    pub collision: CollisionOptions,
}

impl RigOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(RigOptions)
    }

    /// The JSON Schema as pretty-printed text.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::OptionsParse`] if the schema cannot be encoded.
    pub fn json_schema_string() -> Result<String, RigError> {
        serde_json::to_string_pretty(&Self::json_schema())
            .map_err(|e| RigError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// The result is not validated; [`CameraRig::new`] does that.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::Io`] if the file cannot be read and
    /// [`RigError::OptionsParse`] if it is not valid options TOML.
    ///
    /// [`CameraRig::new`]: crate::camera::CameraRig::new
    pub fn load(path: &Path) -> Result<Self, RigError> {
        let content = std::fs::read_to_string(path).map_err(RigError::Io)?;
        let options = Self::from_toml(&content)?;
        log::info!("loaded rig options from {}", path.display());
        Ok(options)
    }

    /// Parse options from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::OptionsParse`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, RigError> {
        toml::from_str(content)
            .map_err(|e| RigError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`RigError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), RigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RigError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(RigError::Io)?;
        }
        std::fs::write(path, content).map_err(RigError::Io)?;
        log::info!("saved rig options to {}", path.display());
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Check that the options describe a usable rig.
    ///
    /// # Errors
    ///
    /// Returns [`RigError::InvalidOptions`] naming the first offending field.
    pub fn validate(&self) -> Result<(), RigError> {
        let invalid = |msg: String| -> Result<(), RigError> {
            Err(RigError::InvalidOptions(msg))
        };
        let follow = &self.follow;
        let look = &self.look;
        let collision = &self.collision;

        if !(follow.follow_speed.is_finite() && follow.follow_speed > 0.0) {
            return invalid(format!(
                "follow.follow_speed must be > 0, got {}",
                follow.follow_speed
            ));
        }
        if !(look.look_speed.is_finite() && look.pivot_speed.is_finite()) {
            return invalid("look speeds must be finite".to_owned());
        }
        if !(look.minimum_tilt.is_finite() && look.maximum_tilt.is_finite())
            || look.minimum_tilt > look.maximum_tilt
        {
            return invalid(format!(
                "look tilt range [{}, {}] is empty",
                look.minimum_tilt, look.maximum_tilt
            ));
        }
        if !(look.min_delta_time.is_finite() && look.min_delta_time > 0.0) {
            return invalid(format!(
                "look.min_delta_time must be > 0, got {}",
                look.min_delta_time
            ));
        }
        for (name, value) in [
            ("sphere_radius", collision.sphere_radius),
            ("collision_margin", collision.collision_margin),
            ("minimum_collision_offset", collision.minimum_collision_offset),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(format!(
                    "collision.{name} must be >= 0, got {value}"
                ));
            }
        }
        if let Some(backup) = collision.backup_distance {
            if !(backup.is_finite() && backup <= 0.0) {
                return invalid(format!(
                    "collision.backup_distance must be <= 0, got {backup}"
                ));
            }
        }
        if let Some(layer) = collision
            .ignore_layers
            .iter()
            .find(|&&layer| layer >= LAYER_COUNT)
        {
            return invalid(format!(
                "collision.ignore_layers entry {layer} is not below \
                 {LAYER_COUNT}"
            ));
        }
        Ok(())
    }
}
