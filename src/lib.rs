// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Third-person follow camera rig.
//!
//! A rig drives a small transform hierarchy: an anchor that smoothly
//! follows a subject and carries pan, a mount that carries tilt, and a
//! camera that is pulled in toward the mount whenever a sphere probe finds
//! geometry in the way.
//!
//! # Key entry points
//!
//! - [`CameraRig`] - per-tick follow, rotate and collision back-off
//! - [`SceneGraph`] - the transform hierarchy the rig reads and writes
//! - [`RigOptions`] - tuning options with TOML presets and a JSON Schema
//! - [`SphereCaster`] - the probe seam; [`ColliderWorld`] implements it
//!
//! # Tick order
//!
//! The host calls [`CameraRig::follow`] (which finishes with the back-off
//! step) and then [`CameraRig::rotate`] once per tick, or
//! [`CameraRig::tick`] for both. Rotation therefore reaches the probe one
//! tick late, which is not noticeable at interactive frame rates.

pub mod camera;
pub mod error;
pub mod options;
pub mod physics;
pub mod scene;

pub use camera::{BackoffState, CameraRig, RigNodes};
pub use error::RigError;
pub use options::RigOptions;
pub use physics::{ColliderWorld, LayerMask, ProbeHit, SphereCaster};
pub use scene::{NodeId, SceneGraph, Transform};
