//! Point-to-cell and cell-to-point conversion.

use crate::constants::{EPSILON_RAD, MAX_RESOLUTION, M_PI_2, NUM_HEX_VERTS, NUM_PENT_VERTS};
use crate::coords::{face, CellBoundary, CubeCoord, FaceCoord};
use crate::error::{GridError, Result};
use crate::geo::GeoCoord;
use crate::index::{cell_to_face_coord, face_coord_to_cell, CellIndex, CellShape};
use crate::projection::{geo_to_hex2d, hex2d_to_geo};

/// Finds the cell containing the given point at the given resolution.
///
/// # Errors
///
/// `InvalidResolution` for a resolution outside 0..=15; `InvalidLatLng`
/// for non-finite coordinates or a latitude outside the poles.
pub fn geo_to_cell(geo: &GeoCoord, res: i32) -> Result<CellIndex> {
  if !(0..=MAX_RESOLUTION).contains(&res) {
    return Err(GridError::InvalidResolution);
  }
  if !geo.lat.is_finite() || !geo.lng.is_finite() || geo.lat.abs() > M_PI_2 + EPSILON_RAD {
    return Err(GridError::InvalidLatLng);
  }

  let (face, v) = geo_to_hex2d(geo, res);
  let fc = FaceCoord::new(face, CubeCoord::from_hex2d(&v));

  let cell = face_coord_to_cell(&fc, res);
  if cell == CellIndex::NULL {
    Err(GridError::Internal)
  } else {
    Ok(cell)
  }
}

/// Center point of the given cell.
///
/// # Errors
///
/// `InvalidCell` when the index is not a valid cell.
pub fn cell_to_geo(cell: CellIndex) -> Result<GeoCoord> {
  if !cell.is_valid_cell() {
    return Err(GridError::InvalidCell);
  }
  let fijk = cell_to_face_coord(cell)?;
  Ok(hex2d_to_geo(&fijk.coord.to_hex2d(), fijk.face, cell.resolution(), false))
}

/// Ordered boundary vertices of the given cell: five topological vertices
/// for a pentagon, six for a hexagon, with extra vertices inserted where a
/// Class III cell edge crosses an icosahedron edge.
///
/// # Errors
///
/// `InvalidCell` when the index is not a valid cell.
pub fn cell_to_boundary(cell: CellIndex) -> Result<CellBoundary> {
  if !cell.is_valid_cell() {
    return Err(GridError::InvalidCell);
  }
  let fijk = cell_to_face_coord(cell)?;
  let res = cell.resolution();

  Ok(match cell.shape() {
    CellShape::Pentagon => face::pent_boundary(&fijk, res, 0, NUM_PENT_VERTS),
    CellShape::Hexagon => face::hex_boundary(&fijk, res, 0, NUM_HEX_VERTS),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_geo_to_cell_domain() {
    let geo = GeoCoord::from_degrees(37.77, -122.4);
    assert_eq!(geo_to_cell(&geo, -1), Err(GridError::InvalidResolution));
    assert_eq!(geo_to_cell(&geo, 16), Err(GridError::InvalidResolution));

    let bad_lat = GeoCoord::from_degrees(100.0, -122.4);
    assert_eq!(geo_to_cell(&bad_lat, 5), Err(GridError::InvalidLatLng));
    let nan = GeoCoord::new(0.0, f64::NAN);
    assert_eq!(geo_to_cell(&nan, 5), Err(GridError::InvalidLatLng));
  }

  #[test]
  fn test_known_indexes() {
    let sf = GeoCoord::from_degrees(37.779_265, -122.419_277);
    assert_eq!(geo_to_cell(&sf, 5).unwrap().0, 0x85283083fffffff);
    assert_eq!(geo_to_cell(&sf, 10).unwrap().0, 0x8a2830828767fff);

    let north_pole = GeoCoord::from_degrees(90.0, 0.0);
    assert_eq!(geo_to_cell(&north_pole, 3).unwrap().0, 0x830326fffffffff);
    let south_pole = GeoCoord::from_degrees(-90.0, 0.0);
    assert_eq!(geo_to_cell(&south_pole, 4).unwrap().0, 0x84f2939ffffffff);
  }

  #[test]
  fn test_null_origin_encoding() {
    // the reference cell over (0, 0): base cell 58 at res 0
    let cell = geo_to_cell(&GeoCoord::new(0.0, 0.0), 0).unwrap();
    assert_eq!(cell.0, 0x8075fffffffffff);
    assert_eq!(cell.base_cell(), 58);
  }

  #[test]
  fn test_cell_to_geo_invalid() {
    assert_eq!(cell_to_geo(CellIndex::NULL), Err(GridError::InvalidCell));
    let mut bad = CellIndex(0x85283083fffffff);
    bad.set_mode(2);
    assert_eq!(cell_to_geo(bad), Err(GridError::InvalidCell));
    assert_eq!(cell_to_boundary(CellIndex::NULL), Err(GridError::InvalidCell));
  }

  #[test]
  fn test_center_reindexes_to_same_cell() {
    let geo = GeoCoord::from_degrees(37.779, -122.419);
    for res in 0..=10 {
      let cell = geo_to_cell(&geo, res).unwrap();
      let center = cell_to_geo(cell).unwrap();
      assert_eq!(geo_to_cell(&center, res).unwrap(), cell, "idempotent at res {res}");
    }
  }

  #[test]
  fn test_boundary_vert_counts() {
    let geo = GeoCoord::from_degrees(37.779, -122.419);
    for res in 0..=10 {
      let cell = geo_to_cell(&geo, res).unwrap();
      let boundary = cell_to_boundary(cell).unwrap();
      let min_verts = cell.shape().num_verts();
      assert!(
        boundary.num_verts >= min_verts,
        "at least the topological vertex count at res {res}"
      );
      for vert in boundary.as_slice() {
        assert!(vert.lat.is_finite() && vert.lng.is_finite());
        assert!(vert.lat.abs() <= M_PI_2 + EPSILON_RAD);
      }
    }
  }
}
