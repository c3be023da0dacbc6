//! Polygons and the point-in-polygon primitive.

use crate::constants::M_PI;
use crate::geo::GeoCoord;
use crate::region::bbox::{normalize_lng, BBox, LngNormalization};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A polygon on the sphere: one outer loop and zero or more hole loops.
///
/// Loops are ordered rings of vertices without a closing repeat. Winding
/// order is not assumed on input; outputs of this crate use
/// counter-clockwise outer loops and clockwise holes.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon {
  /// The outer loop.
  pub outer: Vec<GeoCoord>,
  /// Hole loops.
  pub holes: Vec<Vec<GeoCoord>>,
}

impl Polygon {
  /// A polygon with no holes.
  #[must_use]
  pub fn new(outer: Vec<GeoCoord>) -> Self {
    Self { outer, holes: Vec::new() }
  }

  /// Bounding boxes for the outer loop and each hole, in that order.
  #[must_use]
  pub(crate) fn bboxes(&self) -> Vec<BBox> {
    let mut out = Vec::with_capacity(1 + self.holes.len());
    out.push(BBox::from_loop(&self.outer));
    for hole in &self.holes {
      out.push(BBox::from_loop(hole));
    }
    out
  }

  /// Whether a point is inside the outer loop and outside every hole.
  #[must_use]
  pub fn contains(&self, coord: &GeoCoord) -> bool {
    self.contains_point(&self.bboxes(), coord)
  }

  /// As [`Polygon::contains`], with the bounding boxes precomputed by
  /// [`Polygon::bboxes`] for repeated tests.
  #[must_use]
  pub(crate) fn contains_point(&self, bboxes: &[BBox], coord: &GeoCoord) -> bool {
    if self.outer.is_empty() {
      return false;
    }
    if !point_inside_loop(&self.outer, &bboxes[0], coord) {
      return false;
    }
    for (hole, bbox) in self.holes.iter().zip(&bboxes[1..]) {
      if !hole.is_empty() && point_inside_loop(hole, bbox, coord) {
        return false;
      }
    }
    true
  }
}

/// Even-odd ray cast of `coord` against one loop.
///
/// The ray is cast eastward. A point exactly on a vertex latitude is
/// nudged north, and a ray exactly hitting a vertex longitude is broken by
/// nudging the point west; both are tie-break policy, not accident. The
/// loop's bounding box decides whether longitudes are compared in
/// east-normalized (antimeridian) form.
#[must_use]
pub(crate) fn point_inside_loop(verts: &[GeoCoord], bbox: &BBox, coord: &GeoCoord) -> bool {
  if verts.is_empty() {
    return false;
  }
  // fail fast well away from the loop
  if !bbox.contains_point(coord) {
    return false;
  }

  let norm = if bbox.is_transmeridian() {
    LngNormalization::East
  } else {
    LngNormalization::None
  };

  let mut contains = false;
  let mut lat = coord.lat;
  let mut lng = normalize_lng(coord.lng, norm);

  for (i, v) in verts.iter().enumerate() {
    let w = &verts[(i + 1) % verts.len()];

    // the ray casting below needs the segment low-to-high in latitude
    let (a, b) = if v.lat > w.lat { (w, v) } else { (v, w) };

    // a point at exactly a vertex latitude would intersect both segments
    // meeting there; bias north
    if lat == a.lat || lat == b.lat {
      lat += f64::EPSILON;
    }

    if lat < a.lat || lat > b.lat {
      continue;
    }

    let a_lng = normalize_lng(a.lng, norm);
    let b_lng = normalize_lng(b.lng, norm);

    // a ray exactly through a vertex longitude: bias west
    if a_lng == lng || b_lng == lng {
      lng -= f64::EPSILON;
    }

    let ratio = (lat - a.lat) / (b.lat - a.lat);
    let test_lng = normalize_lng(a_lng + (b_lng - a_lng) * ratio, norm);

    if test_lng > lng {
      contains = !contains;
    }
  }
  contains
}

/// Whether a loop winds clockwise, by the signed sum of longitude deltas
/// times latitude sums. A longitude jump over pi means the loop spans the
/// antimeridian and the sum is recomputed with east normalization.
#[must_use]
pub(crate) fn loop_is_clockwise(verts: &[GeoCoord]) -> bool {
  loop_winding_sum(verts, false) > 0.0
}

fn loop_winding_sum(verts: &[GeoCoord], is_transmeridian: bool) -> f64 {
  let norm = if is_transmeridian {
    LngNormalization::East
  } else {
    LngNormalization::None
  };

  let mut sum = 0.0;
  for (i, a) in verts.iter().enumerate() {
    let b = &verts[(i + 1) % verts.len()];
    if !is_transmeridian && (a.lng - b.lng).abs() > M_PI {
      return loop_winding_sum(verts, true);
    }
    sum += (normalize_lng(b.lng, norm) - normalize_lng(a.lng, norm)) * (b.lat + a.lat);
  }
  sum
}

#[cfg(test)]
mod tests {
  use super::*;

  // a small region near San Francisco, in radians
  fn sf_loop() -> Vec<GeoCoord> {
    [
      [0.659_966_917_655, -2.136_439_851_939_6],
      [0.659_501_110_221_9, -2.135_943_427_940_5],
      [0.658_334_811_402_5, -2.135_488_420_604_5],
      [0.658_122_003_406_8, -2.138_243_771_894_6],
      [0.659_447_999_852_7, -2.138_459_756_389_6],
      [0.659_999_000_297_6, -2.137_677_115_846_4],
    ]
    .into_iter()
    .map(|[lat, lng]| GeoCoord::new(lat, lng))
    .collect()
  }

  #[test]
  fn test_point_inside_loop() {
    let verts = sf_loop();
    let bbox = BBox::from_loop(&verts);
    assert!(point_inside_loop(&verts, &bbox, &GeoCoord::new(0.659, -2.136)));
    assert!(!point_inside_loop(&verts, &bbox, &GeoCoord::new(1.0, 2.0)));
  }

  #[test]
  fn test_point_inside_transmeridian_loop() {
    let verts = vec![
      GeoCoord::new(0.01, M_PI - 0.01),
      GeoCoord::new(0.01, -M_PI + 0.01),
      GeoCoord::new(-0.01, -M_PI + 0.01),
      GeoCoord::new(-0.01, M_PI - 0.01),
    ];
    let bbox = BBox::from_loop(&verts);
    assert!(point_inside_loop(&verts, &bbox, &GeoCoord::new(0.0, M_PI - 0.001)));
    assert!(point_inside_loop(&verts, &bbox, &GeoCoord::new(0.0, -M_PI + 0.001)));
    assert!(!point_inside_loop(&verts, &bbox, &GeoCoord::new(0.0, 0.0)));
  }

  #[test]
  fn test_winding() {
    let ccw = vec![
      GeoCoord::new(0.0, 0.0),
      GeoCoord::new(0.0, 0.4),
      GeoCoord::new(0.4, 0.4),
      GeoCoord::new(0.4, 0.0),
    ];
    // traversing lng-increasing at low lat then back at high lat sums
    // negative: counter-clockwise
    assert!(!loop_is_clockwise(&ccw));

    let cw: Vec<_> = ccw.iter().rev().copied().collect();
    assert!(loop_is_clockwise(&cw));
  }

  #[test]
  fn test_winding_transmeridian() {
    let ccw = vec![
      GeoCoord::new(0.0, M_PI - 0.1),
      GeoCoord::new(0.0, -M_PI + 0.1),
      GeoCoord::new(0.2, -M_PI + 0.1),
      GeoCoord::new(0.2, M_PI - 0.1),
    ];
    assert!(!loop_is_clockwise(&ccw));
    let cw: Vec<_> = ccw.iter().rev().copied().collect();
    assert!(loop_is_clockwise(&cw));
  }

  #[test]
  fn test_polygon_with_hole() {
    let outer = vec![
      GeoCoord::new(0.0, 0.0),
      GeoCoord::new(0.0, 0.4),
      GeoCoord::new(0.4, 0.4),
      GeoCoord::new(0.4, 0.0),
    ];
    let hole = vec![
      GeoCoord::new(0.1, 0.1),
      GeoCoord::new(0.1, 0.3),
      GeoCoord::new(0.3, 0.3),
      GeoCoord::new(0.3, 0.1),
    ];
    let polygon = Polygon {
      outer,
      holes: vec![hole],
    };
    let bboxes = polygon.bboxes();
    assert!(polygon.contains_point(&bboxes, &GeoCoord::new(0.05, 0.05)));
    assert!(!polygon.contains_point(&bboxes, &GeoCoord::new(0.2, 0.2)), "inside the hole");
    assert!(!polygon.contains_point(&bboxes, &GeoCoord::new(0.5, 0.5)));
  }
}
