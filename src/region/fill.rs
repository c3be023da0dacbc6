//! Polygon-to-cell filling.
//!
//! Two phases. First every edge of the outer loop and the holes is traced
//! at an edge-length-dependent step count, and each sample point's cell is
//! inserted into a search set backed by a linear-probed hash sized by
//! [`max_polygon_to_cells_size`]. Then the search set is expanded one ring
//! at a time: the k-ring of every search cell is probed against the output
//! hash, and newly seen cells whose centers pass the point-in-polygon test
//! join both the output and the next search set, until a pass finds
//! nothing new. Adjacent polygons with zero overlap fill to disjoint cell
//! sets because membership is decided by cell centers alone.

use crate::error::{GridError, Result};
use crate::geo::{great_circle_distance_km, GeoCoord};
use crate::index::CellIndex;
use crate::indexing::{cell_to_boundary, cell_to_geo, geo_to_cell};
use crate::inspection::pentagons;
use crate::region::bbox::BBox;
use crate::region::polygon::Polygon;
use crate::traversal::disk::grid_disk;
use tracing::{debug, trace};

/// Extra slots beyond the estimate; covers very small polygons whose edge
/// trace alone can exceed the area estimate.
const FILL_BUFFER: i64 = 12;

/// Circumradius in kilometers of a cell, measured center to first
/// boundary vertex.
fn cell_radius_km(cell: CellIndex) -> Result<f64> {
  let center = cell_to_geo(cell)?;
  let boundary = cell_to_boundary(cell)?;
  Ok(great_circle_distance_km(&center, &boundary.verts[0]))
}

/// Radius of the most distorted (pentagon) cell at a resolution; the unit
/// for the conservative fill estimates.
fn pentagon_radius_km(res: i32) -> Result<f64> {
  let pents = pentagons(res)?;
  cell_radius_km(pents[0])
}

/// Estimated number of cells needed to trace the line between two points.
fn line_cell_estimate(origin: &GeoCoord, destination: &GeoCoord, res: i32) -> Result<i64> {
  let radius = pentagon_radius_km(res)?;
  let dist = great_circle_distance_km(origin, destination);
  let estimate = (dist / (2.0 * radius)).ceil();
  if !estimate.is_finite() {
    return Err(GridError::Internal);
  }
  Ok((estimate as i64).max(1))
}

/// Estimated number of cells needed to fill a bounding box.
fn bbox_cell_estimate(bbox: &BBox, res: i32) -> Result<i64> {
  let radius = pentagon_radius_km(res)?;
  // the pentagon has the most distortion (smallest edges) and shares them
  // with hexagons, so the most distorted hexagons have its area, shrunk
  // 20% in case the box bounds a pentagon exactly
  let pentagon_area_km2 = 0.8 * (2.598_076_211_35 * radius * radius);

  let p1 = GeoCoord::new(bbox.north, bbox.east);
  let p2 = GeoCoord::new(bbox.south, bbox.west);
  let d = great_circle_distance_km(&p1, &p2);

  let lng_diff = (p1.lng - p2.lng).abs();
  let lat_diff = (p1.lat - p2.lat).abs();
  if lng_diff == 0.0 || lat_diff == 0.0 {
    return Err(GridError::InvalidLatLng);
  }
  // treat the box as a rectangle with diagonal d and the same aspect ratio
  let ratio = lng_diff.max(lat_diff) / lng_diff.min(lat_diff);
  let area = (d * d) / (ratio + 1.0 / ratio);

  let estimate = (area / pentagon_area_km2).ceil();
  if !estimate.is_finite() {
    return Err(GridError::Internal);
  }
  Ok((estimate as i64).max(1))
}

/// Upper bound on the number of cells [`polygon_to_cells`] can produce, for
/// allocation sizing: the larger of the bounding-box estimate and the
/// total boundary vertex count, plus a fixed buffer. Conservative for
/// single-resolution, non-self-intersecting input.
///
/// # Errors
///
/// `InvalidResolution` for a resolution out of range; `InvalidLatLng` for
/// a degenerate polygon.
pub fn max_polygon_to_cells_size(polygon: &Polygon, res: i32) -> Result<i64> {
  let bbox = BBox::from_loop(&polygon.outer);
  let mut estimate = bbox_cell_estimate(&bbox, res)?;

  // the vertex count usually loses, but when it wins the trace alone
  // would overflow the area estimate
  let total_verts = (polygon.outer.len() + polygon.holes.iter().map(Vec::len).sum::<usize>()) as i64;
  if estimate < total_verts {
    estimate = total_verts;
  }

  Ok(estimate + FILL_BUFFER)
}

/// Open-addressing insert keyed by the index value. Returns `Ok(None)` if
/// the cell was already present, `Ok(Some(slot))` for the free slot, and
/// fails when probing wraps the whole table.
fn probe(table: &[CellIndex], cell: CellIndex) -> Result<Option<usize>> {
  let capacity = table.len();
  let mut loc = (cell.0 % capacity as u64) as usize;
  let mut loop_count = 0;
  while table[loc] != CellIndex::NULL {
    if loop_count > capacity {
      // the size estimate is proven only for sane input; a pathological
      // polygon overflows here rather than corrupting output
      return Err(GridError::CapacityExceeded);
    }
    if table[loc] == cell {
      return Ok(None);
    }
    loc = (loc + 1) % capacity;
    loop_count += 1;
  }
  Ok(Some(loc))
}

/// Traces one loop's edges into the search set, deduplicating through the
/// hash.
fn trace_loop_edges(
  verts: &[GeoCoord],
  res: i32,
  hash: &mut [CellIndex],
  search: &mut Vec<CellIndex>,
) -> Result<()> {
  for (i, origin) in verts.iter().enumerate() {
    let destination = &verts[(i + 1) % verts.len()];
    let steps = line_cell_estimate(origin, destination, res)?;
    let inv = 1.0 / steps as f64;
    for j in 0..steps {
      let interpolate = GeoCoord::new(
        origin.lat * (steps - j) as f64 * inv + destination.lat * j as f64 * inv,
        origin.lng * (steps - j) as f64 * inv + destination.lng * j as f64 * inv,
      );
      let cell = geo_to_cell(&interpolate, res)?;
      if let Some(slot) = probe(hash, cell)? {
        hash[slot] = cell;
        search.push(cell);
      }
    }
  }
  Ok(())
}

/// The set of cells at `res` whose centers lie inside the polygon.
///
/// # Errors
///
/// `InvalidResolution` / `InvalidLatLng` for bad input;
/// `CapacityExceeded` when a pathological (self-intersecting) polygon
/// overflows the sized working set, in which case no partial output is
/// returned.
pub fn polygon_to_cells(polygon: &Polygon, res: i32) -> Result<Vec<CellIndex>> {
  if polygon.outer.is_empty() {
    return Ok(Vec::new());
  }

  let bboxes = polygon.bboxes();
  let capacity = max_polygon_to_cells_size(polygon, res)? as usize;
  debug!(res, capacity, "polygon fill");

  // `out` doubles as the membership hash; `search`/`found` are the dense
  // frontier sets of the current and next pass
  let mut out = vec![CellIndex::NULL; capacity];
  let mut hash = vec![CellIndex::NULL; capacity];
  let mut search: Vec<CellIndex> = Vec::new();
  let mut found: Vec<CellIndex> = Vec::new();

  trace_loop_edges(&polygon.outer, res, &mut hash, &mut search)?;
  for hole in &polygon.holes {
    trace_loop_edges(hole, res, &mut hash, &mut search)?;
  }

  let mut passes = 0;
  while !search.is_empty() {
    passes += 1;
    for &search_cell in &search {
      let ring = grid_disk(search_cell, 1)?;
      for cell in ring {
        if cell == CellIndex::NULL {
          continue;
        }
        let Some(slot) = probe(&out, cell)? else {
          continue;
        };

        let center = cell_to_geo(cell)?;
        if !polygon.contains_point(&bboxes, &center) {
          continue;
        }

        out[slot] = cell;
        found.push(cell);
      }
    }
    trace!(pass = passes, frontier = found.len(), "fill pass");
    std::mem::swap(&mut search, &mut found);
    found.clear();
  }

  let mut cells: Vec<CellIndex> = out.into_iter().filter(|&c| c != CellIndex::NULL).collect();
  cells.sort_unstable();
  Ok(cells)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn square(center: &GeoCoord, half: f64) -> Polygon {
    Polygon::new(vec![
      GeoCoord::new(center.lat - half, center.lng - half),
      GeoCoord::new(center.lat - half, center.lng + half),
      GeoCoord::new(center.lat + half, center.lng + half),
      GeoCoord::new(center.lat + half, center.lng - half),
    ])
  }

  #[test]
  fn test_estimate_bounds_fill() {
    let polygon = square(&GeoCoord::from_degrees(37.0, -122.0), 0.01);
    let bound = max_polygon_to_cells_size(&polygon, 7).unwrap();
    let cells = polygon_to_cells(&polygon, 7).unwrap();
    assert!(!cells.is_empty());
    assert!((cells.len() as i64) <= bound);
  }

  #[test]
  fn test_tiny_square_fills_to_one_cell() {
    // a square much smaller than a res 5 cell, centered on a cell center
    let anchor = geo_to_cell(&GeoCoord::from_degrees(37.0, -122.0), 5).unwrap();
    let center = cell_to_geo(anchor).unwrap();
    let polygon = square(&center, 1e-5);
    let cells = polygon_to_cells(&polygon, 5).unwrap();
    assert_eq!(cells, vec![anchor]);
  }

  #[test]
  fn test_fill_centers_are_contained() {
    let polygon = square(&GeoCoord::from_degrees(10.0, 20.0), 0.005);
    let bboxes = polygon.bboxes();
    let cells = polygon_to_cells(&polygon, 6).unwrap();
    assert!(!cells.is_empty());
    for cell in cells {
      let center = cell_to_geo(cell).unwrap();
      assert!(polygon.contains_point(&bboxes, &center), "center of {cell} inside");
    }
  }

  #[test]
  fn test_hole_cells_excluded() {
    let outer = square(&GeoCoord::from_degrees(10.0, 20.0), 0.01).outer;
    let hole = square(&GeoCoord::from_degrees(10.0, 20.0), 0.004).outer;
    let with_hole = Polygon {
      outer: outer.clone(),
      holes: vec![hole.clone()],
    };
    let without_hole = Polygon::new(outer);

    let filled_with = polygon_to_cells(&with_hole, 6).unwrap();
    let filled_without = polygon_to_cells(&without_hole, 6).unwrap();
    assert!(filled_with.len() < filled_without.len(), "the hole removes cells");

    let hole_polygon = Polygon::new(hole);
    let hole_bboxes = hole_polygon.bboxes();
    for cell in filled_with {
      let center = cell_to_geo(cell).unwrap();
      assert!(
        !hole_polygon.contains_point(&hole_bboxes, &center),
        "no cell center inside the hole"
      );
    }
  }

  #[test]
  fn test_empty_polygon() {
    let polygon = Polygon::default();
    assert_eq!(polygon_to_cells(&polygon, 5), Ok(vec![]));
  }

  #[test]
  fn test_antimeridian_fill_no_seam() {
    use crate::constants::M_PI;
    // a box from longitude 179 to -179 across the seam
    let polygon = Polygon::new(vec![
      GeoCoord::new(-0.01, M_PI - 0.017),
      GeoCoord::new(-0.01, -M_PI + 0.017),
      GeoCoord::new(0.01, -M_PI + 0.017),
      GeoCoord::new(0.01, M_PI - 0.017),
    ]);
    let cells = polygon_to_cells(&polygon, 4).unwrap();
    assert!(!cells.is_empty());

    // both sides of the seam are present
    let mut east = 0;
    let mut west = 0;
    for cell in &cells {
      let center = cell_to_geo(*cell).unwrap();
      if center.lng > 0.0 {
        east += 1;
      } else {
        west += 1;
      }
    }
    assert!(east > 0 && west > 0, "cells on both sides of the antimeridian");
  }
}
