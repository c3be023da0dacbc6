//! Face addressing: cube coordinates pinned to an icosahedron face.
//!
//! A cell or boundary vertex whose substrate coordinates spill past its
//! face's maximum dimension has "overage" and must be remapped into the
//! frame of the adjacent face: rotate by the inter-face orientation,
//! translate by the scaled inter-face offset, renormalize. Vertices can
//! spill across two face boundaries in sequence, so the vertex form
//! iterates; landing exactly on an edge terminates the adjustment.

use crate::constants::{
  is_class_iii, MAX_BOUNDARY_VERTS, MAX_DIM_BY_CII_RES, M_SQRT3_2, NUM_FACES, NUM_HEX_VERTS, NUM_PENT_VERTS,
  UNIT_SCALE_BY_CII_RES,
};
use crate::geo::GeoCoord;
use crate::math::{vec2, Vec2};
use crate::projection::hex2d_to_geo;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::cube::CubeCoord;

/// Direction indexes into `FACE_NEIGHBORS`, named for the coordinate
/// quadrant that spills onto that neighbor.
pub(crate) const IJ_QUADRANT: usize = 1;
pub(crate) const KI_QUADRANT: usize = 2;
pub(crate) const JK_QUADRANT: usize = 3;

/// Sentinel for a missing face.
pub(crate) const INVALID_FACE: i32 = -1;

/// A face number (0-19) paired with cube coordinates in that face's
/// coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceCoord {
  /// Icosahedron face number, 0..=19.
  pub face: i32,
  /// Cube coordinates on that face.
  pub coord: CubeCoord,
}

/// Result of an overage adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overage {
  /// The coordinates lie on the original face.
  None,
  /// The coordinates lie exactly on a face edge (substrate grids only).
  FaceEdge,
  /// The coordinates spilled into the interior of a new face.
  NewFace,
}

/// Orientation of an adjacent face: its number, the res 0 translation
/// relative to the primary face, and the ccw rotation count between the
/// two coordinate systems.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FaceOrient {
  pub face: i32,
  pub translate: CubeCoord,
  pub ccw_rot60: i32,
}

const fn fo(face: i32, i: i32, j: i32, k: i32, ccw_rot60: i32) -> FaceOrient {
  FaceOrient {
    face,
    translate: CubeCoord::new(i, j, k),
    ccw_rot60,
  }
}

/// Which faces neighbor each face, indexed by quadrant (`0` is the face
/// itself).
#[rustfmt::skip]
pub(crate) const FACE_NEIGHBORS: [[FaceOrient; 4]; NUM_FACES as usize] = [
    [fo(0,  0, 0, 0, 0), fo(4,  2, 0, 2, 1), fo(1,  2, 2, 0, 5), fo(5,  0, 2, 2, 3)], // face 0
    [fo(1,  0, 0, 0, 0), fo(0,  2, 0, 2, 1), fo(2,  2, 2, 0, 5), fo(6,  0, 2, 2, 3)], // face 1
    [fo(2,  0, 0, 0, 0), fo(1,  2, 0, 2, 1), fo(3,  2, 2, 0, 5), fo(7,  0, 2, 2, 3)], // face 2
    [fo(3,  0, 0, 0, 0), fo(2,  2, 0, 2, 1), fo(4,  2, 2, 0, 5), fo(8,  0, 2, 2, 3)], // face 3
    [fo(4,  0, 0, 0, 0), fo(3,  2, 0, 2, 1), fo(0,  2, 2, 0, 5), fo(9,  0, 2, 2, 3)], // face 4
    [fo(5,  0, 0, 0, 0), fo(10, 2, 2, 0, 3), fo(14, 2, 0, 2, 3), fo(0,  0, 2, 2, 3)], // face 5
    [fo(6,  0, 0, 0, 0), fo(11, 2, 2, 0, 3), fo(10, 2, 0, 2, 3), fo(1,  0, 2, 2, 3)], // face 6
    [fo(7,  0, 0, 0, 0), fo(12, 2, 2, 0, 3), fo(11, 2, 0, 2, 3), fo(2,  0, 2, 2, 3)], // face 7
    [fo(8,  0, 0, 0, 0), fo(13, 2, 2, 0, 3), fo(12, 2, 0, 2, 3), fo(3,  0, 2, 2, 3)], // face 8
    [fo(9,  0, 0, 0, 0), fo(14, 2, 2, 0, 3), fo(13, 2, 0, 2, 3), fo(4,  0, 2, 2, 3)], // face 9
    [fo(10, 0, 0, 0, 0), fo(5,  2, 2, 0, 3), fo(6,  2, 0, 2, 3), fo(15, 0, 2, 2, 3)], // face 10
    [fo(11, 0, 0, 0, 0), fo(6,  2, 2, 0, 3), fo(7,  2, 0, 2, 3), fo(16, 0, 2, 2, 3)], // face 11
    [fo(12, 0, 0, 0, 0), fo(7,  2, 2, 0, 3), fo(8,  2, 0, 2, 3), fo(17, 0, 2, 2, 3)], // face 12
    [fo(13, 0, 0, 0, 0), fo(8,  2, 2, 0, 3), fo(9,  2, 0, 2, 3), fo(18, 0, 2, 2, 3)], // face 13
    [fo(14, 0, 0, 0, 0), fo(9,  2, 2, 0, 3), fo(5,  2, 0, 2, 3), fo(19, 0, 2, 2, 3)], // face 14
    [fo(15, 0, 0, 0, 0), fo(16, 2, 0, 2, 1), fo(19, 2, 2, 0, 5), fo(10, 0, 2, 2, 3)], // face 15
    [fo(16, 0, 0, 0, 0), fo(17, 2, 0, 2, 1), fo(15, 2, 2, 0, 5), fo(11, 0, 2, 2, 3)], // face 16
    [fo(17, 0, 0, 0, 0), fo(18, 2, 0, 2, 1), fo(16, 2, 2, 0, 5), fo(12, 0, 2, 2, 3)], // face 17
    [fo(18, 0, 0, 0, 0), fo(19, 2, 0, 2, 1), fo(17, 2, 2, 0, 5), fo(13, 0, 2, 2, 3)], // face 18
    [fo(19, 0, 0, 0, 0), fo(15, 2, 0, 2, 1), fo(18, 2, 2, 0, 5), fo(14, 0, 2, 2, 3)], // face 19
];

/// Quadrant direction from each face to each adjacent face, in the origin
/// face's coordinate system, or -1 for non-adjacent faces. Derived from
/// `FACE_NEIGHBORS`.
pub(crate) const ADJACENT_FACE_DIR: [[i32; NUM_FACES as usize]; NUM_FACES as usize] = build_adjacent_face_dir();

const fn build_adjacent_face_dir() -> [[i32; NUM_FACES as usize]; NUM_FACES as usize] {
  let mut table = [[INVALID_FACE; NUM_FACES as usize]; NUM_FACES as usize];
  let mut from = 0;
  while from < NUM_FACES as usize {
    table[from][from] = 0;
    table[from][FACE_NEIGHBORS[from][IJ_QUADRANT].face as usize] = IJ_QUADRANT as i32;
    table[from][FACE_NEIGHBORS[from][KI_QUADRANT].face as usize] = KI_QUADRANT as i32;
    table[from][FACE_NEIGHBORS[from][JK_QUADRANT].face as usize] = JK_QUADRANT as i32;
    from += 1;
  }
  table
}

/// An ordered ring of cell boundary vertices in spherical coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellBoundary {
  /// Number of vertices actually present.
  pub num_verts: usize,
  /// Vertex storage; entries past `num_verts` are not significant.
  pub verts: [GeoCoord; MAX_BOUNDARY_VERTS],
}

impl Default for CellBoundary {
  fn default() -> Self {
    Self {
      num_verts: 0,
      verts: [GeoCoord::default(); MAX_BOUNDARY_VERTS],
    }
  }
}

impl CellBoundary {
  /// The populated vertices.
  #[must_use]
  pub fn as_slice(&self) -> &[GeoCoord] {
    &self.verts[..self.num_verts]
  }

  fn push(&mut self, vert: GeoCoord) {
    if self.num_verts < MAX_BOUNDARY_VERTS {
      self.verts[self.num_verts] = vert;
      self.num_verts += 1;
    }
  }
}

impl FaceCoord {
  /// Creates a face coordinate.
  #[must_use]
  pub const fn new(face: i32, coord: CubeCoord) -> Self {
    Self { face, coord }
  }

  /// Adjusts the coordinates for overage into an adjacent face if needed.
  ///
  /// `res` is a Class II resolution. `pent_leading_4` compensates a
  /// pentagon cell whose leading digit is 4 for its structurally missing
  /// subsequence before translation. `substrate` marks the finer boundary
  /// grid, which triples the maximum dimension and can land exactly on a
  /// face edge.
  pub(crate) fn adjust_overage_class_ii(&mut self, res: i32, pent_leading_4: bool, substrate: bool) -> Overage {
    let mut max_dim = MAX_DIM_BY_CII_RES[res as usize];
    if substrate {
      max_dim *= 3;
    }

    let sum = self.coord.i + self.coord.j + self.coord.k;
    if substrate && sum == max_dim {
      return Overage::FaceEdge;
    }
    if sum <= max_dim {
      return Overage::None;
    }

    let orient: FaceOrient = if self.coord.k > 0 {
      if self.coord.j > 0 {
        FACE_NEIGHBORS[self.face as usize][JK_QUADRANT]
      } else {
        // ik quadrant
        if pent_leading_4 {
          // rotate about the pentagon corner to absorb the missing
          // subsequence
          let origin = CubeCoord::new(max_dim, 0, 0);
          self.coord = (self.coord - origin).rotate60_cw() + origin;
        }
        FACE_NEIGHBORS[self.face as usize][KI_QUADRANT]
      }
    } else {
      FACE_NEIGHBORS[self.face as usize][IJ_QUADRANT]
    };

    self.face = orient.face;

    for _ in 0..orient.ccw_rot60 {
      self.coord = self.coord.rotate60_ccw();
    }

    let mut unit_scale = UNIT_SCALE_BY_CII_RES[res as usize];
    if substrate {
      unit_scale *= 3;
    }
    self.coord = (self.coord + orient.translate.scaled(unit_scale)).normalized();

    // overage points on pentagon boundaries can land on an edge of the
    // new face
    if substrate && self.coord.i + self.coord.j + self.coord.k == max_dim {
      Overage::FaceEdge
    } else {
      Overage::NewFace
    }
  }

  /// Iterated overage adjustment for pentagon boundary vertices, which can
  /// spill across two face boundaries in sequence. Terminates on `None` or
  /// `FaceEdge`; the face count bounds the loop.
  pub(crate) fn adjust_pentagon_vert_overage(&mut self, res: i32) -> Overage {
    loop {
      let overage = self.adjust_overage_class_ii(res, false, true);
      if overage != Overage::NewFace {
        return overage;
      }
    }
  }

  /// Substrate vertices of the hexagonal cell centered here. Scales the
  /// center into an aperture 33r substrate grid (plus 7r for Class III)
  /// and offsets by the fixed vertex vectors. Updates `self` and `res` to
  /// the substrate frame.
  pub(crate) fn hex_verts(&mut self, res: &mut i32) -> [FaceCoord; NUM_HEX_VERTS] {
    // vertices of an origin-centered Class II cell on the substrate grid,
    // ccw from the i-axis
    #[rustfmt::skip]
    const VERTS_CII: [CubeCoord; NUM_HEX_VERTS] = [
        CubeCoord::new(2, 1, 0), CubeCoord::new(1, 2, 0),
        CubeCoord::new(0, 2, 1), CubeCoord::new(0, 1, 2),
        CubeCoord::new(1, 0, 2), CubeCoord::new(2, 0, 1),
    ];
    #[rustfmt::skip]
    const VERTS_CIII: [CubeCoord; NUM_HEX_VERTS] = [
        CubeCoord::new(5, 4, 0), CubeCoord::new(1, 5, 0),
        CubeCoord::new(0, 5, 4), CubeCoord::new(0, 1, 5),
        CubeCoord::new(4, 0, 5), CubeCoord::new(5, 0, 1),
    ];

    let verts: &[CubeCoord; NUM_HEX_VERTS] = if is_class_iii(*res) { &VERTS_CIII } else { &VERTS_CII };

    self.coord = self.coord.down_aperture3().down_aperture3r();
    if is_class_iii(*res) {
      self.coord = self.coord.down_aperture7r();
      *res += 1;
    }

    let mut out = [FaceCoord::default(); NUM_HEX_VERTS];
    for (v, vert) in verts.iter().enumerate() {
      out[v] = FaceCoord::new(self.face, (self.coord + *vert).normalized());
    }
    out
  }

  /// Substrate vertices of the pentagonal cell centered here.
  pub(crate) fn pent_verts(&mut self, res: &mut i32) -> [FaceCoord; NUM_PENT_VERTS] {
    #[rustfmt::skip]
    const VERTS_CII: [CubeCoord; NUM_PENT_VERTS] = [
        CubeCoord::new(2, 1, 0), CubeCoord::new(1, 2, 0),
        CubeCoord::new(0, 2, 1), CubeCoord::new(0, 1, 2),
        CubeCoord::new(1, 0, 2),
    ];
    #[rustfmt::skip]
    const VERTS_CIII: [CubeCoord; NUM_PENT_VERTS] = [
        CubeCoord::new(5, 4, 0), CubeCoord::new(1, 5, 0),
        CubeCoord::new(0, 5, 4), CubeCoord::new(0, 1, 5),
        CubeCoord::new(4, 0, 5),
    ];

    let verts: &[CubeCoord; NUM_PENT_VERTS] = if is_class_iii(*res) { &VERTS_CIII } else { &VERTS_CII };

    self.coord = self.coord.down_aperture3().down_aperture3r();
    if is_class_iii(*res) {
      self.coord = self.coord.down_aperture7r();
      *res += 1;
    }

    let mut out = [FaceCoord::default(); NUM_PENT_VERTS];
    for (v, vert) in verts.iter().enumerate() {
      out[v] = FaceCoord::new(self.face, (self.coord + *vert).normalized());
    }
    out
  }
}

/// The icosahedron edge endpoints bounding a face in substrate hex-plane
/// coordinates, selected by quadrant direction.
fn icosa_edge(max_dim: i32, dir: i32) -> (Vec2, Vec2) {
  let d = f64::from(max_dim);
  let v0 = Vec2::new(3.0 * d, 0.0);
  let v1 = Vec2::new(-1.5 * d, 3.0 * M_SQRT3_2 * d);
  let v2 = Vec2::new(-1.5 * d, -3.0 * M_SQRT3_2 * d);
  match dir as usize {
    IJ_QUADRANT => (v0, v1),
    JK_QUADRANT => (v1, v2),
    _ => {
      debug_assert_eq!(dir as usize, KI_QUADRANT);
      (v2, v0)
    }
  }
}

/// Boundary of the hexagonal cell at `fc`, in ccw vertex order starting
/// from `start`, covering `length` topological vertices.
///
/// Class III cell edges can cross an icosahedron edge; each crossing gets
/// an extra vertex at the intersection so both halves of the edge project
/// through the correct face plane.
pub(crate) fn hex_boundary(fc: &FaceCoord, res: i32, start: usize, length: usize) -> CellBoundary {
  let mut adj_res = res;
  let mut center = *fc;
  let verts = center.hex_verts(&mut adj_res);

  // one extra iteration tests for a distortion vertex on the closing edge
  let additional = usize::from(length == NUM_HEX_VERTS);

  let mut boundary = CellBoundary::default();
  let mut last_face = INVALID_FACE;
  let mut last_overage = Overage::None;

  for vert in start..start + length + additional {
    let v = vert % NUM_HEX_VERTS;

    let mut fijk = verts[v];
    let overage = fijk.adjust_overage_class_ii(adj_res, false, true);

    if is_class_iii(res) && vert > start && fijk.face != last_face && last_overage != Overage::FaceEdge {
      // the edge crossed an icosa edge; project both endpoints through the
      // center face and intersect with that edge
      let last_v = (v + NUM_HEX_VERTS - 1) % NUM_HEX_VERTS;
      let orig0 = verts[last_v].coord.to_hex2d();
      let orig1 = verts[v].coord.to_hex2d();

      let face2 = if last_face == center.face { fijk.face } else { last_face };
      let dir = ADJACENT_FACE_DIR[center.face as usize][face2 as usize];
      if dir > 0 {
        let (edge0, edge1) = icosa_edge(MAX_DIM_BY_CII_RES[adj_res as usize], dir);
        let inter = vec2::intersect(&orig0, &orig1, &edge0, &edge1);
        // a crossing exactly at a hexagon vertex needs no extra point
        if !orig0.almost_eq(&inter) && !orig1.almost_eq(&inter) {
          boundary.push(hex2d_to_geo(&inter, center.face, adj_res, true));
        }
      }
    }

    // vert == start + NUM_HEX_VERTS only probes the closing edge
    if vert < start + NUM_HEX_VERTS {
      boundary.push(hex2d_to_geo(&fijk.coord.to_hex2d(), fijk.face, adj_res, true));
    }

    last_face = fijk.face;
    last_overage = overage;
  }

  boundary
}

/// Boundary of the pentagonal cell at `fc`. All Class III pentagon edges
/// cross icosahedron edges (Class II pentagons have their vertices on the
/// edges instead), so every edge contributes an intersection vertex.
pub(crate) fn pent_boundary(fc: &FaceCoord, res: i32, start: usize, length: usize) -> CellBoundary {
  let mut adj_res = res;
  let mut center = *fc;
  let verts = center.pent_verts(&mut adj_res);

  let additional = usize::from(length == NUM_PENT_VERTS);

  let mut boundary = CellBoundary::default();
  let mut last_fijk = FaceCoord::default();

  for vert in start..start + length + additional {
    let v = vert % NUM_PENT_VERTS;

    let mut fijk = verts[v];
    fijk.adjust_pentagon_vert_overage(adj_res);

    if is_class_iii(res) && vert > start {
      // project the previous vertex into this vertex's face frame, then
      // intersect the edge with the boundary between the faces
      let mut tmp = fijk;
      let orig0 = last_fijk.coord.to_hex2d();

      let to_last_dir = ADJACENT_FACE_DIR[tmp.face as usize][last_fijk.face as usize];
      debug_assert!(to_last_dir > 0, "consecutive pentagon vertices on non-adjacent faces");
      let orient = FACE_NEIGHBORS[tmp.face as usize][to_last_dir as usize];

      tmp.face = orient.face;
      for _ in 0..orient.ccw_rot60 {
        tmp.coord = tmp.coord.rotate60_ccw();
      }
      tmp.coord =
        (tmp.coord + orient.translate.scaled(UNIT_SCALE_BY_CII_RES[adj_res as usize] * 3)).normalized();

      let orig1 = tmp.coord.to_hex2d();

      let dir = ADJACENT_FACE_DIR[tmp.face as usize][fijk.face as usize];
      debug_assert!(dir > 0);
      let (edge0, edge1) = icosa_edge(MAX_DIM_BY_CII_RES[adj_res as usize], dir);
      let inter = vec2::intersect(&orig0, &orig1, &edge0, &edge1);
      boundary.push(hex2d_to_geo(&inter, tmp.face, adj_res, true));
    }

    if vert < start + NUM_PENT_VERTS {
      boundary.push(hex2d_to_geo(&fijk.coord.to_hex2d(), fijk.face, adj_res, true));
    }

    last_fijk = fijk;
  }

  boundary
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_adjacent_face_dir_matches_neighbors() {
    for f in 0..NUM_FACES as usize {
      assert_eq!(ADJACENT_FACE_DIR[f][f], 0);
      let mut adjacent = 0;
      for to in 0..NUM_FACES as usize {
        let dir = ADJACENT_FACE_DIR[f][to];
        if to != f && dir != INVALID_FACE {
          adjacent += 1;
          assert_eq!(FACE_NEIGHBORS[f][dir as usize].face, to as i32);
        }
      }
      assert_eq!(adjacent, 3, "every face has exactly three neighbors");
    }
  }

  #[test]
  fn test_no_overage_at_center() {
    let mut fc = FaceCoord::new(1, CubeCoord::ZERO);
    assert_eq!(fc.adjust_overage_class_ii(2, false, false), Overage::None);
    assert_eq!(fc.face, 1);
    assert_eq!(fc.coord, CubeCoord::ZERO);
  }

  #[test]
  fn test_substrate_edge_detected() {
    // sum 42 == 3 * max dim at Class II res 2
    let mut fc = FaceCoord::new(1, CubeCoord::new(42, 0, 0));
    assert_eq!(fc.adjust_overage_class_ii(2, false, true), Overage::FaceEdge);
    assert_eq!(fc.face, 1, "on-edge coordinates stay put");
    assert_eq!(fc.coord, CubeCoord::new(42, 0, 0));
  }

  #[test]
  fn test_overage_onto_new_face() {
    let mut fc = FaceCoord::new(0, CubeCoord::new(3, 0, 0));
    assert_eq!(fc.adjust_overage_class_ii(0, false, false), Overage::NewFace);
    assert_eq!(fc.face, 4);
    assert_eq!(fc.coord, CubeCoord::new(3, 1, 0));
  }

  #[test]
  fn test_pent_vert_overage_terminates() {
    let mut fc = FaceCoord::new(0, CubeCoord::new(43, 0, 0));
    let overage = fc.adjust_pentagon_vert_overage(2);
    assert_ne!(overage, Overage::NewFace);
  }

  #[test]
  fn test_hex_boundary_class_ii() {
    let fc = FaceCoord::new(1, CubeCoord::new(2, 1, 0).normalized());
    let boundary = hex_boundary(&fc, 2, 0, NUM_HEX_VERTS);
    assert_eq!(boundary.num_verts, NUM_HEX_VERTS, "Class II hexagon has no extra verts");
  }

  #[test]
  fn test_pent_boundary_class_ii() {
    let fc = FaceCoord::new(0, CubeCoord::new(14, 0, 0));
    let boundary = pent_boundary(&fc, 2, 0, NUM_PENT_VERTS);
    assert_eq!(boundary.num_verts, NUM_PENT_VERTS, "Class II pentagon has no extra verts");
  }

  #[test]
  fn test_pent_boundary_class_iii_distortion() {
    // home of a polar pentagon base cell at res 1
    let fc = FaceCoord::new(0, CubeCoord::new(2, 0, 0));
    let boundary = pent_boundary(&fc, 1, 0, NUM_PENT_VERTS);
    assert_eq!(
      boundary.num_verts,
      2 * NUM_PENT_VERTS,
      "every Class III pentagon edge crosses an icosa edge"
    );
  }

  #[test]
  fn test_hex_vert_substrate_res_bump() {
    let mut fc = FaceCoord::new(0, CubeCoord::new(1, 1, 0));
    let mut res = 1;
    let verts = fc.hex_verts(&mut res);
    assert_eq!(res, 2, "Class III substrate uses the next Class II res");
    for v in verts {
      assert_eq!(v.face, 0);
    }
  }
}
