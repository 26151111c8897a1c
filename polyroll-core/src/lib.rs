/// Polyroll Core Library - Dice geometry and camera placement
///
/// This library provides the stateless core of the dice viewer: the catalog
/// of polyhedral dice, renderer-agnostic mesh data, the camera eye that
/// presents a rolled face, dice notation and the roll engine.

pub mod camera;
pub mod catalog;
pub mod color;
pub mod dice;
pub mod error;
pub mod mesh;
pub mod notation;
pub mod roll;
pub mod style;
pub mod transform;

// Re-export commonly used types
pub use camera::{camera_eye, compute_camera_eye, Camera, ProjectionMode, EYE_SCALE};
pub use catalog::{Catalog, Edge, Polyhedron};
pub use color::{ColorScale, Rgb};
pub use dice::DieType;
pub use error::{DiceError, Result};
pub use mesh::{build_mesh, MeshData};
pub use notation::parse_notation;
pub use roll::{roll, RollOutcome, RollRequest};
pub use style::RenderStyle;
pub use transform::{Orbit, Transform};

/// Resolve a die-type identifier against the global catalog.
pub fn lookup(id: &str) -> Result<&'static Polyhedron> {
    Catalog::global().lookup(id)
}
