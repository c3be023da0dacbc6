//! Origin-anchored local cube coordinates.
//!
//! Expresses a target cell's position in the coordinate frame of an origin
//! cell by walking the base-cell adjacency graph: the target is rotated
//! into the origin base cell's orientation using the per-base-cell-pair
//! rotation counts, its digits are unfolded into base-cell coordinate
//! space, and the inter-base-cell offset is scaled down through the
//! aperture sequence. Pentagon distortion is folded in through the tables
//! at the topology seam; pairs the unfolding cannot represent fail with a
//! distinct error rather than a wrong answer.

use crate::base_cells::{
  base_cell_direction, base_cell_neighbor, is_base_cell_pentagon, is_base_cell_polar_pentagon,
  BASE_CELL_NEIGHBOR_60CCW_ROTS, INVALID_BASE_CELL,
};
use crate::constants::{is_class_iii, CELL_MODE, INDEX_INIT, NUM_BASE_CELLS};
use crate::coords::{CubeCoord, Digit, FaceCoord};
use crate::error::{GridError, Result};
use crate::index::topology::{
  FAILED_DIRECTIONS, PENTAGON_ROTATIONS, PENTAGON_ROTATIONS_REVERSE, PENTAGON_ROTATIONS_REVERSE_NONPOLAR,
  PENTAGON_ROTATIONS_REVERSE_POLAR,
};
use crate::index::{cell_to_face_coord_on_home, CellIndex};

/// Produces the coordinates of `index` relative to `origin`.
///
/// # Errors
///
/// `ResolutionMismatch` for differing resolutions; `TooFar` when the base
/// cells are not neighbors (the frames cannot be unfolded); `Pentagon`
/// when the pair straddles a pentagon distortion the unfolding cannot
/// represent; `InvalidCell` for malformed input.
pub fn cell_to_local_cube(origin: CellIndex, index: CellIndex) -> Result<CubeCoord> {
  let res = origin.resolution();
  if res != index.resolution() {
    return Err(GridError::ResolutionMismatch);
  }
  if !origin.is_valid_cell() || !index.is_valid_cell() {
    return Err(GridError::InvalidCell);
  }

  let origin_base_cell = origin.base_cell();
  let base_cell = index.base_cell();

  // direction from the origin base cell to the index base cell
  let mut dir = Digit::Center;
  let mut rev_dir = Digit::Center;
  if origin_base_cell != base_cell {
    dir = base_cell_direction(origin_base_cell, base_cell);
    if dir == Digit::Invalid {
      // base cells are not neighbors: one local frame cannot hold both
      return Err(GridError::TooFar);
    }
    rev_dir = base_cell_direction(base_cell, origin_base_cell);
    debug_assert_ne!(rev_dir, Digit::Invalid);
  }

  let origin_on_pent = is_base_cell_pentagon(origin_base_cell);
  let index_on_pent = is_base_cell_pentagon(base_cell);

  let mut h = index;
  if dir != Digit::Center {
    // rotate the index into the origin base cell's orientation; cw-wise
    // this undoes the rotation into its own base cell
    let mut base_cell_rotations = BASE_CELL_NEIGHBOR_60CCW_ROTS[origin_base_cell as usize][dir as usize];
    if index_on_pent {
      while base_cell_rotations > 0 {
        h = h.rotate_pent60_ccw();
        rev_dir = rev_dir.rotate60_ccw();
        if rev_dir == Digit::K {
          rev_dir = rev_dir.rotate60_ccw();
        }
        base_cell_rotations -= 1;
      }
    } else {
      while base_cell_rotations > 0 {
        h = h.rotate60_ccw();
        rev_dir = rev_dir.rotate60_ccw();
        base_cell_rotations -= 1;
      }
    }
  }

  // unfold the digits into base cell coordinate space; the face is unused
  let mut index_fijk = FaceCoord::default();
  cell_to_face_coord_on_home(h, &mut index_fijk);

  if dir != Digit::Center {
    debug_assert_ne!(base_cell, origin_base_cell);
    debug_assert!(!(origin_on_pent && index_on_pent));

    let mut pentagon_rotations = 0;
    let mut direction_rotations = 0;

    if origin_on_pent {
      let origin_leading = origin.leading_nonzero_digit();
      if FAILED_DIRECTIONS[origin_leading as usize][dir as usize] {
        return Err(GridError::Pentagon);
      }
      direction_rotations = PENTAGON_ROTATIONS[origin_leading as usize][dir as usize];
      pentagon_rotations = direction_rotations;
    } else if index_on_pent {
      let index_leading = h.leading_nonzero_digit();
      if FAILED_DIRECTIONS[index_leading as usize][rev_dir as usize] {
        return Err(GridError::Pentagon);
      }
      pentagon_rotations = PENTAGON_ROTATIONS[rev_dir as usize][index_leading as usize];
    }

    if pentagon_rotations < 0 || direction_rotations < 0 {
      return Err(GridError::InvalidCell);
    }

    for _ in 0..pentagon_rotations {
      index_fijk.coord = index_fijk.coord.rotate60_cw();
    }

    // unit offset of the neighboring base cell, scaled down to `res`
    let mut offset = CubeCoord::ZERO.neighbor(dir);
    for r in (0..res).rev() {
      offset = if is_class_iii(r + 1) {
        offset.down_aperture7()
      } else {
        offset.down_aperture7r()
      };
    }

    for _ in 0..direction_rotations {
      offset = offset.rotate60_cw();
    }

    index_fijk.coord = (index_fijk.coord + offset).normalized();
  } else if origin_on_pent && index_on_pent {
    // same pentagon base cell; may still need rotation between sequences
    let origin_leading = origin.leading_nonzero_digit();
    let index_leading = index.leading_nonzero_digit();
    if FAILED_DIRECTIONS[origin_leading as usize][index_leading as usize] {
      return Err(GridError::Pentagon);
    }
    let rotations = PENTAGON_ROTATIONS[origin_leading as usize][index_leading as usize];
    if rotations < 0 {
      return Err(GridError::InvalidCell);
    }
    for _ in 0..rotations {
      index_fijk.coord = index_fijk.coord.rotate60_cw();
    }
  }

  let mut origin_fijk = FaceCoord::default();
  cell_to_face_coord_on_home(origin, &mut origin_fijk);

  Ok(index_fijk.coord - origin_fijk.coord)
}

/// The inverse: produces the cell at local coordinates `coord` anchored by
/// `origin`.
///
/// # Errors
///
/// `TooFar` when the coordinates leave the reachable neighborhood;
/// `Pentagon` when the position falls in a deleted subsequence;
/// `InvalidCell` for malformed input.
pub fn local_cube_to_cell(origin: CellIndex, coord: &CubeCoord) -> Result<CellIndex> {
  let res = origin.resolution();
  let origin_base_cell = origin.base_cell();
  if !(0..NUM_BASE_CELLS).contains(&origin_base_cell) {
    return Err(GridError::InvalidCell);
  }
  let origin_on_pent = is_base_cell_pentagon(origin_base_cell);

  let mut out = CellIndex(INDEX_INIT);
  out.set_mode(CELL_MODE);
  out.set_resolution(res);

  if res == 0 {
    if coord.i > 1 || coord.j > 1 || coord.k > 1 {
      return Err(GridError::TooFar);
    }
    let dir = coord.unit_digit();
    if dir == Digit::Invalid {
      return Err(GridError::TooFar);
    }
    let new_base_cell = base_cell_neighbor(origin_base_cell, dir);
    if new_base_cell == INVALID_BASE_CELL {
      return Err(GridError::Pentagon);
    }
    out.set_base_cell(new_base_cell);
    return Ok(out);
  }

  // build the index from the finest digit up, leaving the base-cell
  // offset in `ijk`
  let mut ijk = *coord;
  for r in (0..res).rev() {
    let last = ijk;
    let last_center;
    if is_class_iii(r + 1) {
      ijk = ijk.up_aperture7();
      last_center = ijk.down_aperture7();
    } else {
      ijk = ijk.up_aperture7r();
      last_center = ijk.down_aperture7r();
    }
    let digit = (last - last_center).normalized().unit_digit();
    if digit == Digit::Invalid {
      return Err(GridError::TooFar);
    }
    out.set_digit(r + 1, digit);
  }

  if ijk.i > 1 || ijk.j > 1 || ijk.k > 1 {
    return Err(GridError::TooFar);
  }

  let mut dir = ijk.unit_digit();
  if dir == Digit::Invalid {
    return Err(GridError::TooFar);
  }
  let mut base_cell = base_cell_neighbor(origin_base_cell, dir);
  // pentagon base cells never border each other, so a valid neighbor of a
  // pentagon is never itself a pentagon
  let index_on_pent = base_cell != INVALID_BASE_CELL && is_base_cell_pentagon(base_cell);

  if dir != Digit::Center {
    // unwarp the base cell direction, then rotate the digits back
    let mut pentagon_rotations = 0;
    if origin_on_pent {
      let origin_leading = origin.leading_nonzero_digit();
      if origin_leading == Digit::Invalid {
        return Err(GridError::InvalidCell);
      }
      pentagon_rotations = PENTAGON_ROTATIONS_REVERSE[origin_leading as usize][dir as usize];
      if pentagon_rotations < 0 {
        return Err(GridError::InvalidCell);
      }
      for _ in 0..pentagon_rotations {
        dir = dir.rotate60_ccw();
      }
      // a direction still on the deleted axis means the position falls in
      // a subsequence with no cells
      if dir == Digit::K {
        return Err(GridError::Pentagon);
      }
      base_cell = base_cell_neighbor(origin_base_cell, dir);
      debug_assert_ne!(base_cell, INVALID_BASE_CELL);
      debug_assert!(!is_base_cell_pentagon(base_cell));
    }

    let base_cell_rotations = BASE_CELL_NEIGHBOR_60CCW_ROTS[origin_base_cell as usize][dir as usize];
    debug_assert!(base_cell_rotations >= 0);

    if index_on_pent {
      let rev_dir = base_cell_direction(base_cell, origin_base_cell);
      debug_assert_ne!(rev_dir, Digit::Invalid);

      // adjust for the coordinate space change first; the pentagon
      // rotations depend on the leading digit in the pentagon's own frame
      for _ in 0..base_cell_rotations {
        out = out.rotate60_ccw();
      }

      let index_leading = out.leading_nonzero_digit();
      let table = if is_base_cell_polar_pentagon(base_cell) {
        &PENTAGON_ROTATIONS_REVERSE_POLAR
      } else {
        &PENTAGON_ROTATIONS_REVERSE_NONPOLAR
      };
      let rotations = table[rev_dir as usize][index_leading as usize];
      if rotations < 0 {
        return Err(GridError::InvalidCell);
      }
      for _ in 0..rotations {
        out = out.rotate_pent60_ccw();
      }
    } else {
      for _ in 0..base_cell_rotations {
        out = out.rotate60_ccw();
      }
    }
  } else if origin_on_pent && out.leading_nonzero_digit() == Digit::K {
    // within the origin pentagon itself, the K subsequence holds no cells
    return Err(GridError::Pentagon);
  }

  out.set_base_cell(base_cell);
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geo::GeoCoord;
  use crate::indexing::geo_to_cell;
  use crate::traversal::disk::grid_disk;

  #[test]
  fn test_identity() {
    let origin = geo_to_cell(&GeoCoord::from_degrees(37.779, -122.419), 5).unwrap();
    assert_eq!(cell_to_local_cube(origin, origin), Ok(CubeCoord::ZERO));
    assert_eq!(local_cube_to_cell(origin, &CubeCoord::ZERO), Ok(origin));
  }

  #[test]
  fn test_neighbors_roundtrip() {
    let origin = geo_to_cell(&GeoCoord::from_degrees(37.779, -122.419), 5).unwrap();
    for cell in grid_disk(origin, 2).unwrap() {
      if cell == CellIndex::NULL {
        continue;
      }
      let local = match cell_to_local_cube(origin, cell) {
        Ok(c) => c,
        // pairs straddling a pentagon distortion legitimately fail
        Err(GridError::Pentagon | GridError::TooFar) => continue,
        Err(e) => panic!("unexpected error {e}"),
      };
      assert_eq!(local_cube_to_cell(origin, &local), Ok(cell), "round trip for {cell}");
    }
  }

  #[test]
  fn test_direct_neighbor_is_unit() {
    let origin = geo_to_cell(&GeoCoord::from_degrees(37.779, -122.419), 5).unwrap();
    for cell in grid_disk(origin, 1).unwrap() {
      if cell == CellIndex::NULL || cell == origin {
        continue;
      }
      let local = cell_to_local_cube(origin, cell).unwrap();
      let n = local.normalized();
      assert_eq!(
        n.i.abs().max(n.j.abs()).max(n.k.abs()),
        1,
        "direct neighbor {cell} sits one step away"
      );
    }
  }

  #[test]
  fn test_res_mismatch() {
    let geo = GeoCoord::from_degrees(37.779, -122.419);
    let a = geo_to_cell(&geo, 5).unwrap();
    let b = geo_to_cell(&geo, 6).unwrap();
    assert_eq!(cell_to_local_cube(a, b), Err(GridError::ResolutionMismatch));
  }

  #[test]
  fn test_distant_base_cells_too_far() {
    // opposite sides of the globe
    let a = geo_to_cell(&GeoCoord::from_degrees(37.0, -122.0), 3).unwrap();
    let b = geo_to_cell(&GeoCoord::from_degrees(-37.0, 58.0), 3).unwrap();
    assert_eq!(cell_to_local_cube(a, b), Err(GridError::TooFar));
  }

  #[test]
  fn test_res0_neighbors() {
    let origin = crate::base_cells::base_cell_to_cell(0);
    for d in 1u8..7 {
      let dir = Digit::from_u8(d);
      let coord = CubeCoord::ZERO.neighbor(dir);
      let cell = local_cube_to_cell(origin, &coord).unwrap();
      assert_eq!(cell.base_cell(), crate::base_cells::base_cell_neighbor(0, dir));
    }
  }

  #[test]
  fn test_res0_pentagon_deleted_direction() {
    let pent = crate::base_cells::base_cell_to_cell(4);
    let k = CubeCoord::ZERO.neighbor(Digit::K);
    assert_eq!(local_cube_to_cell(pent, &k), Err(GridError::Pentagon));
  }
}
