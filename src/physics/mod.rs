//! Collision probing.
//!
//! The rig only depends on the [`SphereCaster`] trait; hosts wire in their
//! own physics world. [`ColliderWorld`] is a small self-contained
//! implementation used by the demo driver and the tests.

mod probe;
mod world;

pub use probe::{LayerMask, ProbeError, ProbeHit, SphereCaster, LAYER_COUNT};
pub use world::{Collider, ColliderWorld, Shape};
