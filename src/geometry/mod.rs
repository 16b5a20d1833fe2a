//! Geometric kernel for tube scanning and extract sampling.
//!
//! - [`cylinder`] – finite-cylinder membership tests (pure vector algebra).
//! - [`rotation`] – axis-to-axis rotation used to orient primitives in space.
//! - [`sampling`] – seeded area-uniform surface sampling of primitives.

pub mod cylinder;
pub mod rotation;
pub mod sampling;

pub use cylinder::{contained_indices, Cylinder, DEGENERATE_AXIS_EPS};
pub use rotation::rotation_between;
pub use sampling::{Cuboid, FacetedCylinder, SurfacePrimitive, SurfaceSampler};
