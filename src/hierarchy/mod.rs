//! Parent/child resolution operations.

pub mod children;
pub mod compact;

pub use children::ChildIter;
pub use compact::{compact, uncompact, uncompact_size};

use crate::constants::{ipow, MAX_RESOLUTION};
use crate::coords::Digit;
use crate::error::{GridError, Result};
use crate::index::{CellIndex, CellShape};

/// Zeroes the digits from `start_res` through `end_res` inclusive.
pub(crate) fn zero_digits(mut cell: CellIndex, start_res: i32, end_res: i32) -> CellIndex {
  for r in start_res..=end_res {
    cell.set_digit(r, Digit::Center);
  }
  cell
}

/// The ancestor of `cell` at the coarser `parent_res`: digits below the
/// target resolution are blanked and the resolution field lowered.
///
/// # Errors
///
/// `InvalidCell` for an invalid index; `InvalidResolution` when
/// `parent_res` is negative or finer than the cell's resolution.
pub fn cell_to_parent(cell: CellIndex, parent_res: i32) -> Result<CellIndex> {
  if !cell.is_valid_cell() {
    return Err(GridError::InvalidCell);
  }
  let child_res = cell.resolution();
  if parent_res < 0 || parent_res > child_res {
    return Err(GridError::InvalidResolution);
  }
  if parent_res == child_res {
    return Ok(cell);
  }

  let mut parent = cell;
  parent.set_resolution(parent_res);
  for r in (parent_res + 1)..=child_res {
    parent.set_digit(r, Digit::Invalid);
  }
  Ok(parent)
}

/// The center child of `cell` at the finer `child_res`.
///
/// # Errors
///
/// `InvalidCell` for an invalid index; `InvalidResolution` when
/// `child_res` is coarser than the cell or beyond the finest resolution.
pub fn cell_to_center_child(cell: CellIndex, child_res: i32) -> Result<CellIndex> {
  if !cell.is_valid_cell() {
    return Err(GridError::InvalidCell);
  }
  let parent_res = cell.resolution();
  if child_res < parent_res || child_res > MAX_RESOLUTION {
    return Err(GridError::InvalidResolution);
  }

  let mut child = cell;
  child.set_resolution(child_res);
  Ok(zero_digits(child, parent_res + 1, child_res))
}

/// Exact number of descendants of `cell` at `child_res`, in closed form:
/// `7^(child_res - res)` for hexagons, `1 + 5 * (7^n - 1) / 6` for
/// pentagons. No enumeration.
///
/// # Errors
///
/// `InvalidCell` for an invalid index; `InvalidResolution` when
/// `child_res` is out of range for the cell.
pub fn cell_to_children_size(cell: CellIndex, child_res: i32) -> Result<i64> {
  if !cell.is_valid_cell() {
    return Err(GridError::InvalidCell);
  }
  let res = cell.resolution();
  if child_res < res || child_res > MAX_RESOLUTION {
    return Err(GridError::InvalidResolution);
  }

  let n = i64::from(child_res - res);
  Ok(match cell.shape() {
    CellShape::Pentagon => 1 + 5 * (ipow(7, n) - 1) / 6,
    CellShape::Hexagon => ipow(7, n),
  })
}

/// All descendants of `cell` at `child_res`.
///
/// # Errors
///
/// As [`cell_to_children_size`].
pub fn cell_to_children(cell: CellIndex, child_res: i32) -> Result<Vec<CellIndex>> {
  let size = cell_to_children_size(cell, child_res)?;
  let mut out = Vec::with_capacity(size as usize);
  out.extend(ChildIter::new(cell, child_res));
  debug_assert_eq!(out.len() as i64, size);
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geo::GeoCoord;
  use crate::indexing::geo_to_cell;

  #[test]
  fn test_cell_to_parent() {
    let geo = GeoCoord::from_degrees(37.779, -122.419);
    let child = geo_to_cell(&geo, 10).unwrap();

    let parent9 = cell_to_parent(child, 9).unwrap();
    assert_eq!(parent9.0, 0x89283082877ffff);
    let parent5 = cell_to_parent(child, 5).unwrap();
    assert_eq!(parent5.0, 0x85283083fffffff);

    assert_eq!(cell_to_parent(child, 10), Ok(child));
    assert_eq!(cell_to_parent(child, 11), Err(GridError::InvalidResolution));
    assert_eq!(cell_to_parent(child, -1), Err(GridError::InvalidResolution));
    assert_eq!(cell_to_parent(CellIndex::NULL, 5), Err(GridError::InvalidCell));
  }

  #[test]
  fn test_children_size() {
    let hex = CellIndex::with_digits(5, 10, crate::coords::Digit::Center);
    assert_eq!(cell_to_children_size(hex, 5), Ok(1));
    assert_eq!(cell_to_children_size(hex, 6), Ok(7));
    assert_eq!(cell_to_children_size(hex, 7), Ok(49));
    assert_eq!(cell_to_children_size(hex, 4), Err(GridError::InvalidResolution));

    let pent = CellIndex::with_digits(5, 4, crate::coords::Digit::Center);
    assert!(pent.is_pentagon());
    assert_eq!(cell_to_children_size(pent, 6), Ok(6));
    assert_eq!(cell_to_children_size(pent, 7), Ok(41));
  }

  #[test]
  fn test_center_child() {
    let cell = CellIndex::with_digits(5, 10, crate::coords::Digit::Ij);
    assert_eq!(cell_to_center_child(cell, 5), Ok(cell));

    let child = cell_to_center_child(cell, 7).unwrap();
    assert_eq!(child.resolution(), 7);
    assert_eq!(child.digit(6), crate::coords::Digit::Center);
    assert_eq!(child.digit(7), crate::coords::Digit::Center);
    for r in 1..=5 {
      assert_eq!(child.digit(r), cell.digit(r));
    }
    assert_eq!(cell_to_parent(child, 5), Ok(cell));
  }

  #[test]
  fn test_parent_children_inverse() {
    let geo = GeoCoord::from_degrees(-11.3, 47.9);
    for res in 1..=6 {
      let cell = geo_to_cell(&geo, res).unwrap();
      let parent = cell_to_parent(cell, res - 1).unwrap();
      let siblings = cell_to_children(parent, res).unwrap();
      assert!(siblings.contains(&cell), "parent's children include the cell at res {res}");
    }
  }

  #[test]
  fn test_children_of_pentagon() {
    let pent = CellIndex::with_digits(1, 4, crate::coords::Digit::Center);
    let children = cell_to_children(pent, 2).unwrap();
    assert_eq!(children.len(), cell_to_children_size(pent, 2).unwrap() as usize);
    for child in &children {
      assert!(child.is_valid_cell(), "pentagon child {child} is valid");
      assert_eq!(cell_to_parent(*child, 1), Ok(pent));
    }
  }
}
