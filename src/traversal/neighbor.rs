//! Stepping to an adjacent cell in a digit direction.
//!
//! The digit fields act as positions in nested rotated apertures, so a
//! single step at the finest level can cascade adjustments up through
//! coarser digits and finally move to another base cell. Crossing into or
//! out of a pentagon's deleted K subsequence needs corrective rotations on
//! top of the per-base-cell orientation change.

use crate::base_cells::{
  base_cell_home, base_cell_is_cw_offset, is_base_cell_pentagon, is_base_cell_polar_pentagon,
  BASE_CELL_NEIGHBORS, BASE_CELL_NEIGHBOR_60CCW_ROTS, INVALID_BASE_CELL,
};
use crate::constants::{is_class_iii, NUM_BASE_CELLS};
use crate::coords::Digit;
use crate::error::{GridError, Result};
use crate::index::{CellIndex, CellShape};

/// New digit when moving `dir` out of a cell whose digit is the row index,
/// Class II orientation.
#[rustfmt::skip]
const NEW_DIGIT_II: [[Digit; 7]; 7] = [
    [Digit::Center, Digit::K,      Digit::J,      Digit::Jk,     Digit::I,      Digit::Ik,     Digit::Ij],
    [Digit::K,      Digit::I,      Digit::Jk,     Digit::Ij,     Digit::Ik,     Digit::J,      Digit::Center],
    [Digit::J,      Digit::Jk,     Digit::K,      Digit::I,      Digit::Ij,     Digit::Center, Digit::Ik],
    [Digit::Jk,     Digit::Ij,     Digit::I,      Digit::Ik,     Digit::Center, Digit::K,      Digit::J],
    [Digit::I,      Digit::Ik,     Digit::Ij,     Digit::Center, Digit::J,      Digit::Jk,     Digit::K],
    [Digit::Ik,     Digit::J,      Digit::Center, Digit::K,      Digit::Jk,     Digit::Ij,     Digit::I],
    [Digit::Ij,     Digit::Center, Digit::Ik,     Digit::J,      Digit::K,      Digit::I,      Digit::Jk],
];

/// Continued direction to adjust the next coarser digit, Class II.
#[rustfmt::skip]
const NEW_ADJUSTMENT_II: [[Digit; 7]; 7] = [
    [Digit::Center, Digit::Center, Digit::Center, Digit::Center, Digit::Center, Digit::Center, Digit::Center],
    [Digit::Center, Digit::K,      Digit::Center, Digit::K,      Digit::Center, Digit::Ik,     Digit::Center],
    [Digit::Center, Digit::Center, Digit::J,      Digit::Jk,     Digit::Center, Digit::Center, Digit::J],
    [Digit::Center, Digit::K,      Digit::Jk,     Digit::Jk,     Digit::Center, Digit::Center, Digit::Center],
    [Digit::Center, Digit::Center, Digit::Center, Digit::Center, Digit::I,      Digit::I,      Digit::Ij],
    [Digit::Center, Digit::Ik,     Digit::Center, Digit::Center, Digit::I,      Digit::Ik,     Digit::Center],
    [Digit::Center, Digit::Center, Digit::J,      Digit::Center, Digit::Ij,     Digit::Center, Digit::Ij],
];

/// New digit when moving `dir`, Class III orientation.
#[rustfmt::skip]
const NEW_DIGIT_III: [[Digit; 7]; 7] = [
    [Digit::Center, Digit::K,      Digit::J,      Digit::Jk,     Digit::I,      Digit::Ik,     Digit::Ij],
    [Digit::K,      Digit::J,      Digit::Jk,     Digit::I,      Digit::Ik,     Digit::Ij,     Digit::Center],
    [Digit::J,      Digit::Jk,     Digit::I,      Digit::Ik,     Digit::Ij,     Digit::Center, Digit::K],
    [Digit::Jk,     Digit::I,      Digit::Ik,     Digit::Ij,     Digit::Center, Digit::K,      Digit::J],
    [Digit::I,      Digit::Ik,     Digit::Ij,     Digit::Center, Digit::K,      Digit::J,      Digit::Jk],
    [Digit::Ik,     Digit::Ij,     Digit::Center, Digit::K,      Digit::J,      Digit::Jk,     Digit::I],
    [Digit::Ij,     Digit::Center, Digit::K,      Digit::J,      Digit::Jk,     Digit::I,      Digit::Ik],
];

/// Continued direction to adjust the next coarser digit, Class III.
#[rustfmt::skip]
const NEW_ADJUSTMENT_III: [[Digit; 7]; 7] = [
    [Digit::Center, Digit::Center, Digit::Center, Digit::Center, Digit::Center, Digit::Center, Digit::Center],
    [Digit::Center, Digit::K,      Digit::Center, Digit::Jk,     Digit::Center, Digit::K,      Digit::Center],
    [Digit::Center, Digit::Center, Digit::J,      Digit::J,      Digit::Center, Digit::Center, Digit::Ij],
    [Digit::Center, Digit::Jk,     Digit::J,      Digit::Jk,     Digit::Center, Digit::Center, Digit::Center],
    [Digit::Center, Digit::Center, Digit::Center, Digit::Center, Digit::I,      Digit::Ik,     Digit::I],
    [Digit::Center, Digit::K,      Digit::Center, Digit::Center, Digit::Ik,     Digit::Ik,     Digit::Center],
    [Digit::Center, Digit::Center, Digit::Ij,     Digit::Center, Digit::I,      Digit::Center, Digit::Ij],
];

/// The neighbor of `origin` in direction `dir`, rotated `rotations` times
/// 60 degrees ccw beforehand. On success, `rotations` accumulates the
/// additional orientation change of the traversal.
///
/// # Errors
///
/// `Pentagon` when the step would enter a pentagon's deleted K
/// subsequence; `InvalidCell` for malformed input.
pub(crate) fn neighbor_rotations(origin: CellIndex, mut dir: Digit, rotations: &mut i32) -> Result<CellIndex> {
  if dir == Digit::Center || dir == Digit::Invalid {
    return Err(GridError::Internal);
  }

  let mut out = origin;

  *rotations = rotations.rem_euclid(6);
  for _ in 0..*rotations {
    dir = dir.rotate60_ccw();
  }

  let mut new_rotations = 0;
  let old_base_cell = out.base_cell();
  if !(0..NUM_BASE_CELLS).contains(&old_base_cell) {
    return Err(GridError::InvalidCell);
  }
  let old_leading_digit = out.leading_nonzero_digit();

  // adjust the indexing digits and, if needed, the base cell
  let mut r = out.resolution() - 1;
  loop {
    if r == -1 {
      if is_base_cell_pentagon(old_base_cell) && dir == Digit::K {
        // no neighbor in the deleted direction of a pentagon
        return Err(GridError::Pentagon);
      }

      out.set_base_cell(BASE_CELL_NEIGHBORS[old_base_cell as usize][dir as usize]);
      new_rotations = BASE_CELL_NEIGHBOR_60CCW_ROTS[old_base_cell as usize][dir as usize];

      if out.base_cell() == INVALID_BASE_CELL {
        // the K neighbor of this hexagon is a pentagon; detour through
        // the IK neighbor and note the extra rotation
        out.set_base_cell(BASE_CELL_NEIGHBORS[old_base_cell as usize][Digit::Ik as usize]);
        new_rotations = BASE_CELL_NEIGHBOR_60CCW_ROTS[old_base_cell as usize][Digit::Ik as usize];

        out = out.rotate60_ccw();
        *rotations += 1;
      }
      break;
    }

    let old_digit = out.digit(r + 1);
    if old_digit == Digit::Invalid {
      return Err(GridError::InvalidCell);
    }

    let next_dir;
    if is_class_iii(r + 1) {
      out.set_digit(r + 1, NEW_DIGIT_II[old_digit as usize][dir as usize]);
      next_dir = NEW_ADJUSTMENT_II[old_digit as usize][dir as usize];
    } else {
      out.set_digit(r + 1, NEW_DIGIT_III[old_digit as usize][dir as usize]);
      next_dir = NEW_ADJUSTMENT_III[old_digit as usize][dir as usize];
    }

    if next_dir == Digit::Center {
      // no further adjustment needed
      break;
    }
    dir = next_dir;
    r -= 1;
  }

  let new_base_cell = out.base_cell();
  if is_base_cell_pentagon(new_base_cell) {
    let mut already_adjusted_k_subsequence = false;

    // force rotation out of the missing K-axes subsequence
    if out.leading_nonzero_digit() == Digit::K {
      if old_base_cell != new_base_cell {
        // entered the deleted subsequence from another base cell; the
        // unwind direction depends on which offset face we came over
        out = if base_cell_is_cw_offset(new_base_cell, base_cell_home(old_base_cell).face) {
          out.rotate60_cw()
        } else {
          out.rotate60_ccw()
        };
        already_adjusted_k_subsequence = true;
      } else {
        // entered the deleted subsequence from within the pentagon itself
        match old_leading_digit {
          Digit::Center => return Err(GridError::Pentagon),
          Digit::Jk => {
            out = out.rotate60_ccw();
            *rotations += 1;
          }
          Digit::Ik => {
            out = out.rotate60_cw();
            *rotations += 5;
          }
          _ => return Err(GridError::Internal),
        }
      }
    }

    for _ in 0..new_rotations {
      out = out.rotate_pent60_ccw();
    }

    if old_base_cell != new_base_cell {
      if is_base_cell_polar_pentagon(new_base_cell) {
        // the two polar pentagons have one aligned neighbor each
        if old_base_cell != 118 && old_base_cell != 8 && out.leading_nonzero_digit() != Digit::Jk {
          *rotations += 1;
        }
      } else if out.leading_nonzero_digit() == Digit::Ik && !already_adjusted_k_subsequence {
        *rotations += 1;
      }
    }
  } else {
    for _ in 0..new_rotations {
      out = out.rotate60_ccw();
    }
  }

  *rotations = (*rotations + new_rotations).rem_euclid(6);
  Ok(out)
}

/// The digit direction from `origin` to a neighboring cell, or
/// `Digit::Invalid` when the cells are not neighbors.
#[must_use]
pub fn neighbor_direction(origin: CellIndex, destination: CellIndex) -> Digit {
  if origin == destination {
    return Digit::Center;
  }

  let start = match origin.shape() {
    CellShape::Pentagon => Digit::J as u8,
    CellShape::Hexagon => Digit::K as u8,
  };
  for d in start..=(Digit::Ij as u8) {
    let dir = Digit::from_u8(d);
    let mut rotations = 0;
    match neighbor_rotations(origin, dir, &mut rotations) {
      Ok(neighbor) if neighbor == destination => return dir,
      _ => {}
    }
  }
  Digit::Invalid
}

/// Whether the two cells share an edge.
///
/// # Errors
///
/// `InvalidCell` for malformed indexes; `ResolutionMismatch` when the
/// resolutions differ.
pub fn are_neighbor_cells(origin: CellIndex, destination: CellIndex) -> Result<bool> {
  if !origin.is_valid_cell() || !destination.is_valid_cell() {
    return Err(GridError::InvalidCell);
  }
  if origin == destination {
    return Ok(false);
  }
  if origin.resolution() != destination.resolution() {
    return Err(GridError::ResolutionMismatch);
  }
  Ok(neighbor_direction(origin, destination) != Digit::Invalid)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geo::GeoCoord;
  use crate::indexing::geo_to_cell;
  use crate::traversal::disk::{grid_disk, max_grid_disk_size};

  #[test]
  fn test_direction_roundtrip() {
    let origin = geo_to_cell(&GeoCoord::from_degrees(37.779_265, -122.419_277), 9).unwrap();
    let ring = grid_disk(origin, 1).unwrap();

    let mut found = 0;
    for cell in ring.iter().copied() {
      if cell == CellIndex::NULL || cell == origin {
        continue;
      }
      found += 1;
      let dir = neighbor_direction(origin, cell);
      assert_ne!(dir, Digit::Invalid);
      assert_ne!(dir, Digit::Center);

      let mut rotations = 0;
      let recovered = neighbor_rotations(origin, dir, &mut rotations).unwrap();
      assert_eq!(recovered, cell);
    }
    assert_eq!(found, 6);
  }

  #[test]
  fn test_pentagon_has_five_neighbors() {
    let pent = crate::hierarchy::cell_to_center_child(crate::base_cells::base_cell_to_cell(4), 2).unwrap();
    assert!(pent.is_pentagon());

    let ring = grid_disk(pent, 1).unwrap();
    let mut found = 0;
    for cell in ring.iter().copied() {
      if cell == CellIndex::NULL || cell == pent {
        continue;
      }
      found += 1;
      let dir = neighbor_direction(pent, cell);
      assert_ne!(dir, Digit::Invalid);
      assert_ne!(dir, Digit::K, "no neighbor across the deleted axis");
    }
    assert_eq!(found, 5);

    let mut rotations = 0;
    assert_eq!(
      neighbor_rotations(pent, Digit::K, &mut rotations),
      Err(GridError::Pentagon)
    );
  }

  #[test]
  fn test_are_neighbor_cells() {
    let geo = GeoCoord::from_degrees(37.779, -122.419);
    let origin = geo_to_cell(&geo, 9).unwrap();
    let ring1 = grid_disk(origin, 1).unwrap();

    for cell in ring1.iter().copied().filter(|&c| c != CellIndex::NULL) {
      if cell == origin {
        assert_eq!(are_neighbor_cells(origin, cell), Ok(false));
      } else {
        assert_eq!(are_neighbor_cells(origin, cell), Ok(true));
      }
    }

    let ring2 = grid_disk(origin, 2).unwrap();
    let outer: Vec<_> = ring2
      .iter()
      .copied()
      .filter(|&c| c != CellIndex::NULL && !ring1.contains(&c))
      .collect();
    assert!(!outer.is_empty());
    for cell in outer {
      assert_eq!(are_neighbor_cells(origin, cell), Ok(false));
    }

    let coarser = geo_to_cell(&geo, 8).unwrap();
    assert_eq!(are_neighbor_cells(origin, coarser), Err(GridError::ResolutionMismatch));
    assert_eq!(are_neighbor_cells(origin, CellIndex::NULL), Err(GridError::InvalidCell));
  }

  #[test]
  fn test_disk_size_formula() {
    assert_eq!(max_grid_disk_size(0), Ok(1));
    assert_eq!(max_grid_disk_size(1), Ok(7));
    assert_eq!(max_grid_disk_size(2), Ok(19));
  }
}
