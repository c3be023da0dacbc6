//! Point indexing round-trip behavior over the public API.

use hexsphere::{cell_to_boundary, cell_to_geo, geo_to_cell, CellIndex, GeoCoord, Polygon};

#[test]
fn origin_res0_is_stable() {
  // the fixed reference index over (0, 0)
  let cell = geo_to_cell(&GeoCoord::new(0.0, 0.0), 0).unwrap();
  assert_eq!(cell, CellIndex(0x8075fffffffffff));
  assert_eq!(cell.base_cell(), 58);
  assert_eq!(cell.to_string(), "8075fffffffffff");
}

#[test]
fn center_lies_within_own_boundary() {
  let points = [
    GeoCoord::from_degrees(37.779, -122.419),
    GeoCoord::from_degrees(-35.6, 149.1),
    GeoCoord::from_degrees(64.1, -21.9),
    GeoCoord::from_degrees(0.0, 0.0),
    GeoCoord::from_degrees(-89.9, 10.0),
  ];
  for geo in points {
    for res in 0..=9 {
      let cell = geo_to_cell(&geo, res).unwrap();
      let center = cell_to_geo(cell).unwrap();
      let boundary = cell_to_boundary(cell).unwrap();
      let outline = Polygon::new(boundary.as_slice().to_vec());
      assert!(
        outline.contains(&center),
        "center of {cell} lies within its own boundary (res {res})"
      );
    }
  }
}

#[test]
fn reindexing_is_idempotent() {
  for (lat, lng) in [(37.779, -122.419), (51.5, -0.13), (-33.9, 18.4), (78.2, 15.6)] {
    let geo = GeoCoord::from_degrees(lat, lng);
    for res in 0..=12 {
      let cell = geo_to_cell(&geo, res).unwrap();
      let center = cell_to_geo(cell).unwrap();
      assert_eq!(
        geo_to_cell(&center, res),
        Ok(cell),
        "repeated application is idempotent at res {res}"
      );
    }
  }
}

#[test]
fn string_form_round_trips() {
  let cell = geo_to_cell(&GeoCoord::from_degrees(37.779, -122.419), 9).unwrap();
  let hex = cell.to_string();
  assert_eq!(hex.parse::<CellIndex>(), Ok(cell));
  assert_eq!(CellIndex::parse_or_null(&hex), cell);
  assert_eq!(CellIndex::parse_or_null("zzz"), CellIndex::NULL);
}

#[test]
fn pentagon_boundary_has_five_topological_verts() {
  for res in [0, 2, 4] {
    for pent in hexsphere::pentagons(res).unwrap() {
      let boundary = cell_to_boundary(pent).unwrap();
      assert_eq!(
        boundary.num_verts, 5,
        "Class II pentagon boundary is exactly its 5 vertices"
      );
    }
  }
  for res in [1, 3] {
    for pent in hexsphere::pentagons(res).unwrap() {
      let boundary = cell_to_boundary(pent).unwrap();
      assert_eq!(
        boundary.num_verts, 10,
        "Class III pentagon edges all cross icosa edges"
      );
    }
  }
}
