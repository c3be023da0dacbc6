//! Cell topology: the hexagon/pentagon distinction and the pentagon
//! correction tables.
//!
//! Twelve base cells are pentagons; a cell is pentagonal iff its base cell
//! is one of them and every digit is center. Rather than scattering
//! pentagon conditionals through the traversal and local-frame algorithms,
//! the distortion data is collected here: which direction pairs cannot be
//! unfolded, and how many rotations compensate the deleted K subsequence
//! when crossing into or out of a pentagon's frame.

use crate::base_cells::is_base_cell_pentagon;
use crate::coords::Digit;

use super::CellIndex;

/// Topological shape of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellShape {
  /// An ordinary six-sided cell.
  Hexagon,
  /// One of the twelve five-sided cells per resolution.
  Pentagon,
}

impl CellShape {
  /// Number of vertices (and neighbors) for the shape.
  #[must_use]
  pub const fn num_verts(self) -> usize {
    match self {
      CellShape::Hexagon => 6,
      CellShape::Pentagon => 5,
    }
  }

  /// Number of children a cell of this shape has one resolution finer.
  #[must_use]
  pub const fn num_children(self) -> usize {
    match self {
      CellShape::Hexagon => 7,
      CellShape::Pentagon => 6,
    }
  }
}

impl CellIndex {
  /// The topological shape of this cell.
  #[must_use]
  pub fn shape(self) -> CellShape {
    if is_base_cell_pentagon(self.base_cell()) && self.leading_nonzero_digit() == Digit::Center {
      CellShape::Pentagon
    } else {
      CellShape::Hexagon
    }
  }
}

/// Clockwise rotations to apply when unfolding across a pentagon, indexed
/// by the pentagon-side digit then the far-side digit. -1 marks the
/// unreachable deleted K subsequence.
#[rustfmt::skip]
pub(crate) static PENTAGON_ROTATIONS: [[i32; 7]; 7] = [
    [0, -1, 0, 0, 0, 0, 0],       // center
    [-1, -1, -1, -1, -1, -1, -1], // K (deleted)
    [0, -1, 0, 0, 0, 1, 0],       // J
    [0, -1, 0, 0, 1, 1, 0],       // JK
    [0, -1, 0, 5, 0, 0, 0],       // I
    [0, -1, 5, 5, 0, 0, 0],       // IK
    [0, -1, 0, 0, 0, 0, 0],       // IJ
];

/// Counter-clockwise rotations reversing `PENTAGON_ROTATIONS` when the
/// origin of the local frame is the pentagon.
#[rustfmt::skip]
pub(crate) static PENTAGON_ROTATIONS_REVERSE: [[i32; 7]; 7] = [
    [0, 0, 0, 0, 0, 0, 0],        // center
    [-1, -1, -1, -1, -1, -1, -1], // K (deleted)
    [0, 1, 0, 0, 0, 0, 0],        // J
    [0, 1, 0, 0, 0, 1, 0],        // JK
    [0, 5, 0, 0, 0, 0, 0],        // I
    [0, 5, 0, 5, 0, 0, 0],        // IK
    [0, 0, 0, 0, 0, 0, 0],        // IJ
];

/// Reverse rotations when the target of the local frame is a non-polar
/// pentagon, indexed by the direction from the pentagon back to the origin
/// then the pentagon index's leading digit.
#[rustfmt::skip]
pub(crate) static PENTAGON_ROTATIONS_REVERSE_NONPOLAR: [[i32; 7]; 7] = [
    [0, 0, 0, 0, 0, 0, 0],        // center
    [-1, -1, -1, -1, -1, -1, -1], // K (deleted)
    [0, 1, 0, 0, 0, 0, 0],        // J
    [0, 1, 0, 0, 0, 1, 0],        // JK
    [0, 5, 0, 0, 0, 0, 0],        // I
    [0, 1, 0, 5, 1, 1, 0],        // IK
    [0, 0, 0, 0, 0, 0, 0],        // IJ
];

/// Reverse rotations when the target pentagon is polar.
#[rustfmt::skip]
pub(crate) static PENTAGON_ROTATIONS_REVERSE_POLAR: [[i32; 7]; 7] = [
    [0, 0, 0, 0, 0, 0, 0],        // center
    [-1, -1, -1, -1, -1, -1, -1], // K (deleted)
    [0, 1, 1, 1, 1, 1, 1],        // J
    [0, 1, 0, 0, 0, 1, 0],        // JK
    [0, 1, 0, 0, 1, 1, 1],        // I
    [0, 1, 0, 5, 1, 1, 0],        // IK
    [0, 1, 1, 0, 1, 1, 1],        // IJ
];

/// Direction pairs whose unfolding across a pentagon cannot be represented
/// in one local frame.
#[rustfmt::skip]
pub(crate) static FAILED_DIRECTIONS: [[bool; 7]; 7] = [
    [false, false, false, false, false, false, false], // center
    [false, false, false, false, false, false, false], // K (deleted)
    [false, false, false, false, true,  true,  false], // J
    [false, false, false, false, true,  false, true],  // JK
    [false, false, true,  true,  false, false, false], // I
    [false, false, true,  false, false, false, true],  // IK
    [false, false, false, true,  false, true,  false], // IJ
];
