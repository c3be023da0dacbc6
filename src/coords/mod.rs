//! Discrete grid coordinates: cube/axial cell coordinates and per-face
//! addressing with overage handling.

pub mod cube;
pub mod face;

pub use cube::{CubeCoord, Digit};
pub use face::{CellBoundary, FaceCoord, Overage};
