//! Boundary reconstruction: from a cell set back to polygon outlines.
//!
//! Every cell contributes its directed boundary edges to a vertex graph;
//! an edge seen in both directions was shared by two cells and cancels,
//! leaving only genuine outer and hole edges. Walking from-vertex to
//! to-vertex stitches the survivors into closed loops, one per connected
//! boundary. Counter-clockwise loops are outers, clockwise loops are
//! holes; each hole attaches to the most deeply nested outer that contains
//! its first vertex.

use crate::error::{GridError, Result};
use crate::geo::GeoCoord;
use crate::index::CellIndex;
use crate::indexing::cell_to_boundary;
use crate::region::bbox::BBox;
use crate::region::polygon::{loop_is_clockwise, point_inside_loop};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One reconstructed polygon: an outer ring plus its holes, in GeoJSON
/// MultiPolygon ring order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolygonOutline {
  /// The outer loop, counter-clockwise.
  pub outer: Vec<GeoCoord>,
  /// Hole loops, clockwise.
  pub holes: Vec<Vec<GeoCoord>>,
}

/// The reconstructed outline of a cell set: one or more polygons with
/// holes.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkedPolygon {
  /// The polygons, each with outer-first ring ordering.
  pub polygons: Vec<PolygonOutline>,
  /// Number of hole loops that were contained by no outer loop and
  /// dropped from the result. Non-zero only for invalid (non-contiguous
  /// winding) input; never silently zero when holes were discarded.
  pub dropped_holes: usize,
}

/// A directed boundary edge.
#[derive(Debug, Clone, Copy)]
struct Edge {
  from: GeoCoord,
  to: GeoCoord,
}

/// Multiset of directed edges bucketed by a spatial hash of the
/// from-vertex. Built and discarded within one reconstruction; buckets are
/// plain vectors and removal swaps the last element in.
struct VertexGraph {
  buckets: Vec<Vec<Edge>>,
  len: usize,
}

impl VertexGraph {
  fn new(num_buckets: usize) -> Self {
    Self {
      buckets: vec![Vec::new(); num_buckets.max(1)],
      len: 0,
    }
  }

  /// Buckets on the quantized vertex position. Vertices of adjacent cells
  /// are produced by the same substrate computation, so equal vertices
  /// hash equally.
  fn bucket_of(&self, vertex: &GeoCoord) -> usize {
    let quantized = ((vertex.lat * 1e7).round() as i64) ^ (((vertex.lng * 1e7).round() as i64) << 1);
    (quantized.unsigned_abs() % self.buckets.len() as u64) as usize
  }

  fn insert(&mut self, from: GeoCoord, to: GeoCoord) {
    let bucket = self.bucket_of(&from);
    self.buckets[bucket].push(Edge { from, to });
    self.len += 1;
  }

  /// Removes the edge `from -> to` if present.
  fn remove(&mut self, from: &GeoCoord, to: &GeoCoord) -> bool {
    let bucket = self.bucket_of(from);
    let edges = &mut self.buckets[bucket];
    if let Some(pos) = edges
      .iter()
      .position(|e| e.from.almost_eq(from) && e.to.almost_eq(to))
    {
      edges.swap_remove(pos);
      self.len -= 1;
      true
    } else {
      false
    }
  }

  /// Removes and returns any edge leaving `from`.
  fn take_from(&mut self, from: &GeoCoord) -> Option<Edge> {
    let bucket = self.bucket_of(from);
    let edges = &mut self.buckets[bucket];
    let pos = edges.iter().position(|e| e.from.almost_eq(from))?;
    self.len -= 1;
    Some(edges.swap_remove(pos))
  }

  /// Removes and returns any remaining edge.
  fn take_any(&mut self) -> Option<Edge> {
    for edges in &mut self.buckets {
      if let Some(edge) = edges.pop() {
        self.len -= 1;
        return Some(edge);
      }
    }
    None
  }
}

/// Builds the cancelled edge graph of a cell set's boundaries.
fn cells_to_vertex_graph(cells: &[CellIndex]) -> Result<VertexGraph> {
  let live: Vec<CellIndex> = cells.iter().copied().filter(|&c| c != CellIndex::NULL).collect();

  let mut graph = VertexGraph::new(live.len().max(6));
  if live.is_empty() {
    return Ok(graph);
  }

  let res = live[0].resolution();
  for &cell in &live {
    if !cell.is_valid_cell() {
      return Err(GridError::InvalidCell);
    }
    if cell.resolution() != res {
      return Err(GridError::ResolutionMismatch);
    }

    let boundary = cell_to_boundary(cell)?;
    let verts = boundary.as_slice();
    for (j, from) in verts.iter().enumerate() {
      let to = verts[(j + 1) % verts.len()];
      // an edge already present in reverse was shared with a neighbor in
      // the set; both cancel
      if !graph.remove(&to, from) {
        graph.insert(*from, to);
      }
    }
  }
  Ok(graph)
}

/// Walks the remaining edges into closed loops. The edge count bounds the
/// walk; a dangling chain that cannot close is an invariant violation.
fn graph_to_loops(graph: &mut VertexGraph) -> Result<Vec<Vec<GeoCoord>>> {
  let mut loops = Vec::new();
  while let Some(start) = graph.take_any() {
    let mut ring = vec![start.from];
    let mut next = start.to;
    let mut remaining = graph.len + 1;
    while !next.almost_eq(&start.from) {
      ring.push(next);
      let edge = graph.take_from(&next).ok_or(GridError::Internal)?;
      next = edge.to;
      remaining -= 1;
      if remaining == 0 {
        return Err(GridError::Internal);
      }
    }
    loops.push(ring);
  }
  Ok(loops)
}

/// Index of the outer polygon a hole belongs to: among the outers that
/// contain the hole's first vertex, the most deeply nested one (the outer
/// contained by every other candidate).
fn find_outer_for_hole(
  outers: &[Vec<GeoCoord>],
  bboxes: &[BBox],
  hole: &[GeoCoord],
) -> Option<usize> {
  let probe = hole.first()?;

  let mut candidates: Vec<usize> = Vec::new();
  for (i, outer) in outers.iter().enumerate() {
    // cell loops never cross, so the first vertex decides containment
    if point_inside_loop(outer, &bboxes[i], probe) {
      candidates.push(i);
    }
  }

  let mut parent: Option<usize> = None;
  for &candidate in &candidates {
    let deeper = match parent {
      None => true,
      Some(p) => point_inside_loop(&outers[p], &bboxes[p], &outers[candidate][0]),
    };
    if deeper {
      parent = Some(candidate);
    }
  }
  parent
}

/// Reconstructs the polygon outlines of a cell set.
///
/// All cells must share one resolution. Holes that no outer loop contains
/// (possible only for degenerate input) are dropped and counted in
/// [`LinkedPolygon::dropped_holes`] rather than silently discarded or
/// misassigned.
///
/// # Errors
///
/// `InvalidCell` for invalid indexes; `ResolutionMismatch` for mixed
/// resolutions.
pub fn cells_to_linked_polygons(cells: &[CellIndex]) -> Result<LinkedPolygon> {
  let mut graph = cells_to_vertex_graph(cells)?;
  let loops = graph_to_loops(&mut graph)?;

  let mut outers: Vec<Vec<GeoCoord>> = Vec::new();
  let mut holes: Vec<Vec<GeoCoord>> = Vec::new();
  for ring in loops {
    if loop_is_clockwise(&ring) {
      holes.push(ring);
    } else {
      outers.push(ring);
    }
  }
  debug!(outers = outers.len(), holes = holes.len(), "classified boundary loops");

  let bboxes: Vec<BBox> = outers.iter().map(|l| BBox::from_loop(l)).collect();

  let mut result = LinkedPolygon {
    polygons: outers
      .iter()
      .map(|outer| PolygonOutline {
        outer: outer.clone(),
        holes: Vec::new(),
      })
      .collect(),
    dropped_holes: 0,
  };

  for hole in holes {
    match find_outer_for_hole(&outers, &bboxes, &hole) {
      Some(i) => result.polygons[i].holes.push(hole),
      None => result.dropped_holes += 1,
    }
  }
  Ok(result)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geo::GeoCoord;
  use crate::index::CellShape;
  use crate::indexing::geo_to_cell;
  use crate::traversal::disk::grid_disk;

  #[test]
  fn test_empty_set() {
    let outline = cells_to_linked_polygons(&[]).unwrap();
    assert!(outline.polygons.is_empty());
    assert_eq!(outline.dropped_holes, 0);
  }

  #[test]
  fn test_single_cell() {
    let cell = geo_to_cell(&GeoCoord::from_degrees(20.0, 30.0), 5).unwrap();
    let outline = cells_to_linked_polygons(&[cell]).unwrap();
    assert_eq!(outline.polygons.len(), 1);
    assert!(outline.polygons[0].holes.is_empty());
    assert_eq!(
      outline.polygons[0].outer.len(),
      cell_to_boundary(cell).unwrap().num_verts
    );
  }

  #[test]
  fn test_disjoint_cells_make_two_polygons() {
    let a = geo_to_cell(&GeoCoord::from_degrees(0.0, 0.0), 5).unwrap();
    let b = geo_to_cell(&GeoCoord::from_degrees(10.0, 10.0), 5).unwrap();
    let outline = cells_to_linked_polygons(&[a, b]).unwrap();
    assert_eq!(outline.polygons.len(), 2);
  }

  #[test]
  fn test_contiguous_disk_merges() {
    let origin = geo_to_cell(&GeoCoord::from_degrees(20.0, 30.0), 4).unwrap();
    let cells: Vec<_> = grid_disk(origin, 1)
      .unwrap()
      .into_iter()
      .filter(|&c| c != CellIndex::NULL)
      .collect();
    let outline = cells_to_linked_polygons(&cells).unwrap();
    assert_eq!(outline.polygons.len(), 1, "a filled disk traces one polygon");
    assert!(outline.polygons[0].holes.is_empty());
    // 42 cell edges, 12 interior pairs cancelled, 18 remain
    assert_eq!(outline.polygons[0].outer.len(), 18);
  }

  #[test]
  fn test_donut_has_hole() {
    let origin = geo_to_cell(&GeoCoord::from_degrees(20.0, 30.0), 4).unwrap();
    assert_eq!(origin.shape(), CellShape::Hexagon);
    let ring: Vec<_> = grid_disk(origin, 1)
      .unwrap()
      .into_iter()
      .filter(|&c| c != CellIndex::NULL && c != origin)
      .collect();
    assert_eq!(ring.len(), 6);

    let outline = cells_to_linked_polygons(&ring).unwrap();
    assert_eq!(outline.polygons.len(), 1);
    assert_eq!(outline.polygons[0].holes.len(), 1, "the removed center is a hole");
    assert_eq!(outline.dropped_holes, 0);

    let hole = &outline.polygons[0].holes[0];
    assert_eq!(hole.len(), 6, "the hole is the center cell's outline");
    assert!(loop_is_clockwise(hole));
    assert!(!loop_is_clockwise(&outline.polygons[0].outer));
  }

  #[test]
  fn test_mixed_resolution_rejected() {
    let a = geo_to_cell(&GeoCoord::from_degrees(0.0, 0.0), 5).unwrap();
    let b = geo_to_cell(&GeoCoord::from_degrees(0.0, 0.0), 6).unwrap();
    assert_eq!(cells_to_linked_polygons(&[a, b]), Err(GridError::ResolutionMismatch));
  }
}
