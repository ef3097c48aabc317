//! Third-person camera rig.
//!
//! The rig drives three scene nodes: an anchor that follows the subject and
//! carries pan, a mount under it that carries tilt, and the camera under the
//! mount, pulled in along its local Z when geometry blocks the view.

/// Collision back-off between mount and camera.
pub mod backoff;
/// Pan/tilt angle state and input scaling.
pub mod pan_tilt;
/// The rig itself, tying follow, rotation and back-off to scene nodes.
pub mod rig;
/// Critically damped follow filter.
pub mod smooth_damp;

pub use backoff::{BackoffState, CollisionBackoff};
pub use pan_tilt::PanTilt;
pub use rig::{CameraRig, RigNodes};
pub use smooth_damp::SmoothDamp;
