//! Grid distance and line tracing.

use crate::coords::CubeCoord;
use crate::error::Result;
use crate::index::CellIndex;
use crate::traversal::local_ijk::{cell_to_local_cube, local_cube_to_cell};

/// Grid distance between two cells: the Chebyshev distance of their local
/// cube coordinates in a shared origin frame.
///
/// # Errors
///
/// Propagates the local-frame failures: `ResolutionMismatch`, `TooFar`,
/// `Pentagon`, `InvalidCell`.
pub fn grid_distance(origin: CellIndex, destination: CellIndex) -> Result<i64> {
  let origin_coord = cell_to_local_cube(origin, origin)?;
  let destination_coord = cell_to_local_cube(origin, destination)?;
  Ok(i64::from(origin_coord.distance_to(destination_coord)))
}

/// Number of cells in the line from `start` to `end`:
/// `grid_distance + 1`.
///
/// # Errors
///
/// As [`grid_distance`].
pub fn grid_path_cells_size(start: CellIndex, end: CellIndex) -> Result<i64> {
  grid_distance(start, end).map(|d| d + 1)
}

/// The line of cells from `start` to `end`, inclusive.
///
/// Both endpoints are mapped into a shared origin frame, converted to
/// floating cube coordinates and interpolated linearly; each interpolated
/// point is rounded back to a cell with the largest-remainder rule. The
/// result has exactly `grid_distance + 1` cells and consecutive cells are
/// neighbors, but the specific path is grid-space, not a great circle, and
/// is not otherwise canonical.
///
/// # Errors
///
/// As [`grid_distance`].
pub fn grid_path_cells(start: CellIndex, end: CellIndex) -> Result<Vec<CellIndex>> {
  let distance = grid_distance(start, end)?;

  let start_local = cell_to_local_cube(start, start)?;
  let end_local = cell_to_local_cube(start, end)?;

  let start_cube = start_local.to_cube();
  let end_cube = end_local.to_cube();

  let mut out = Vec::with_capacity((distance + 1) as usize);

  if distance == 0 {
    out.push(start);
    return Ok(out);
  }

  let inv = 1.0 / distance as f64;
  let i_step = f64::from(end_cube.i - start_cube.i) * inv;
  let j_step = f64::from(end_cube.j - start_cube.j) * inv;
  let k_step = f64::from(end_cube.k - start_cube.k) * inv;

  for n in 0..=distance {
    let local = if n == distance {
      // land exactly on the endpoint, no rounding
      end_local
    } else {
      let rounded = CubeCoord::round_cube(
        f64::from(start_cube.i) + i_step * n as f64,
        f64::from(start_cube.j) + j_step * n as f64,
        f64::from(start_cube.k) + k_step * n as f64,
      );
      CubeCoord::from_cube(rounded)
    };
    out.push(local_cube_to_cell(start, &local)?);
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::GridError;
  use crate::geo::GeoCoord;
  use crate::indexing::geo_to_cell;
  use crate::traversal::disk::grid_disk;
  use crate::traversal::neighbor::are_neighbor_cells;

  #[test]
  fn test_distance_identity() {
    let cell = geo_to_cell(&GeoCoord::from_degrees(37.779, -122.419), 5).unwrap();
    assert_eq!(grid_distance(cell, cell), Ok(0));
  }

  #[test]
  fn test_distance_to_neighbors() {
    let origin = geo_to_cell(&GeoCoord::from_degrees(37.779, -122.419), 5).unwrap();
    for cell in grid_disk(origin, 1).unwrap() {
      if cell != CellIndex::NULL && cell != origin {
        assert_eq!(grid_distance(origin, cell), Ok(1), "neighbor {cell} at distance 1");
      }
    }
  }

  #[test]
  fn test_distance_res_mismatch() {
    let geo = GeoCoord::from_degrees(37.779, -122.419);
    let a = geo_to_cell(&geo, 5).unwrap();
    let b = geo_to_cell(&geo, 6).unwrap();
    assert_eq!(grid_distance(a, b), Err(GridError::ResolutionMismatch));
  }

  #[test]
  fn test_path_identity() {
    let cell = geo_to_cell(&GeoCoord::from_degrees(37.779, -122.419), 5).unwrap();
    assert_eq!(grid_path_cells_size(cell, cell), Ok(1));
    assert_eq!(grid_path_cells(cell, cell), Ok(vec![cell]));
  }

  #[test]
  fn test_path_properties() {
    let start = geo_to_cell(&GeoCoord::from_degrees(20.0, 10.0), 5).unwrap();
    let end = geo_to_cell(&GeoCoord::from_degrees(20.0, 10.5), 5).unwrap();

    let distance = grid_distance(start, end).unwrap();
    assert!(distance > 1, "endpoints chosen more than one step apart");

    let path = grid_path_cells(start, end).unwrap();
    assert_eq!(path.len() as i64, distance + 1);
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&end));

    for pair in path.windows(2) {
      assert_eq!(
        are_neighbor_cells(pair[0], pair[1]),
        Ok(true),
        "{} and {} are consecutive path cells",
        pair[0],
        pair[1]
      );
    }
  }
}
