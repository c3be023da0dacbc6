//! Polygon fill and outline reconstruction over the public API.

use hexsphere::{
  cell_to_geo, cells_to_linked_polygons, geo_to_cell, grid_disk, max_polygon_to_cells_size, polygon_to_cells,
  CellIndex, GeoCoord, Polygon,
};
use std::collections::HashSet;

fn square(center: GeoCoord, half: f64) -> Polygon {
  Polygon::new(vec![
    GeoCoord::new(center.lat - half, center.lng - half),
    GeoCoord::new(center.lat - half, center.lng + half),
    GeoCoord::new(center.lat + half, center.lng + half),
    GeoCoord::new(center.lat + half, center.lng - half),
  ])
}

#[test]
fn single_hexagon_square() {
  // a square spanning one hexagon at res 5 fills to exactly the cell
  // whose center is nearest the square's centroid
  let centroid = GeoCoord::from_degrees(37.0, -122.0);
  let expected = geo_to_cell(&centroid, 5).unwrap();
  let center = cell_to_geo(expected).unwrap();
  let polygon = square(center, 2e-5);
  assert_eq!(polygon_to_cells(&polygon, 5), Ok(vec![expected]));
}

#[test]
fn fill_respects_containment() {
  let polygon = square(GeoCoord::from_degrees(45.0, 7.0), 0.01);
  let cells = polygon_to_cells(&polygon, 6).unwrap();
  assert!(!cells.is_empty());
  assert!((cells.len() as i64) <= max_polygon_to_cells_size(&polygon, 6).unwrap());
  for cell in cells {
    assert!(polygon.contains(&cell_to_geo(cell).unwrap()));
  }
}

#[test]
fn fill_excludes_hole_centers() {
  let outer = square(GeoCoord::from_degrees(45.0, 7.0), 0.01).outer;
  let hole = square(GeoCoord::from_degrees(45.0, 7.0), 0.004).outer;
  let polygon = Polygon {
    outer,
    holes: vec![hole.clone()],
  };
  let cells = polygon_to_cells(&polygon, 6).unwrap();
  assert!(!cells.is_empty());

  let hole_polygon = Polygon::new(hole);
  for cell in cells {
    let center = cell_to_geo(cell).unwrap();
    assert!(polygon.contains(&center));
    assert!(!hole_polygon.contains(&center), "no cell center inside the hole");
  }
}

#[test]
fn antimeridian_fill_has_no_seam_gap() {
  use std::f64::consts::PI;
  // vertices near longitude +/-179
  let polygon = Polygon::new(vec![
    GeoCoord::new(-0.02, PI - 0.017),
    GeoCoord::new(-0.02, -PI + 0.017),
    GeoCoord::new(0.02, -PI + 0.017),
    GeoCoord::new(0.02, PI - 0.017),
  ]);
  let cells: HashSet<CellIndex> = polygon_to_cells(&polygon, 4).unwrap().into_iter().collect();
  assert!(!cells.is_empty());

  // every interior cell's full neighborhood that passes the containment
  // test is present: no gaps along the seam
  for &cell in &cells {
    for neighbor in grid_disk(cell, 1).unwrap() {
      if neighbor == CellIndex::NULL || cells.contains(&neighbor) {
        continue;
      }
      let center = cell_to_geo(neighbor).unwrap();
      assert!(
        !polygon.contains(&center),
        "cell {neighbor} inside the polygon missing from the fill"
      );
    }
  }

  let east = cells
    .iter()
    .filter(|c| cell_to_geo(**c).unwrap().lng > 0.0)
    .count();
  assert!(east > 0 && east < cells.len(), "fill covers both sides of the seam");
}

#[test]
fn fill_and_outline_are_inverse_like() {
  let polygon = square(GeoCoord::from_degrees(45.0, 7.0), 0.008);
  let cells = polygon_to_cells(&polygon, 6).unwrap();
  assert!(!cells.is_empty());

  let outline = cells_to_linked_polygons(&cells).unwrap();
  assert_eq!(outline.dropped_holes, 0);
  assert!(!outline.polygons.is_empty());

  // every original cell center lies inside one of the reconstructed
  // outlines
  for cell in &cells {
    let center = cell_to_geo(*cell).unwrap();
    let contained = outline.polygons.iter().any(|p| {
      let poly = Polygon {
        outer: p.outer.clone(),
        holes: p.holes.clone(),
      };
      poly.contains(&center)
    });
    assert!(contained, "center of {cell} inside the reconstructed outline");
  }
}

#[test]
fn donut_outline_round_trip() {
  let origin = geo_to_cell(&GeoCoord::from_degrees(20.0, 30.0), 5).unwrap();
  let donut: Vec<CellIndex> = grid_disk(origin, 2)
    .unwrap()
    .into_iter()
    .filter(|&c| c != CellIndex::NULL && c != origin)
    .collect();

  let outline = cells_to_linked_polygons(&donut).unwrap();
  assert_eq!(outline.polygons.len(), 1);
  assert_eq!(outline.polygons[0].holes.len(), 1);
  assert_eq!(outline.dropped_holes, 0);

  // the hole contains the removed center, the outer contains everything
  let center = cell_to_geo(origin).unwrap();
  let as_polygon = Polygon {
    outer: outline.polygons[0].outer.clone(),
    holes: outline.polygons[0].holes.clone(),
  };
  assert!(!as_polygon.contains(&center), "the removed center is inside the hole");
  let outer_only = Polygon::new(outline.polygons[0].outer.clone());
  assert!(outer_only.contains(&center));
}
