//! Geographic bounding boxes.
//!
//! `east < west` is the encoding for a box that crosses the antimeridian;
//! there is no separate flag, and every consumer must respect the
//! comparison.

use crate::constants::{M_2PI, M_PI};
use crate::geo::GeoCoord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A latitude/longitude-aligned bounding box in radians.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BBox {
  /// North latitude.
  pub north: f64,
  /// South latitude.
  pub south: f64,
  /// East longitude.
  pub east: f64,
  /// West longitude.
  pub west: f64,
}

/// How to shift longitudes so values on both sides of the antimeridian
/// compare on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LngNormalization {
  None,
  East,
  West,
}

/// Applies a normalization scheme to a longitude.
#[inline]
#[must_use]
pub(crate) fn normalize_lng(lng: f64, normalization: LngNormalization) -> f64 {
  match normalization {
    LngNormalization::None => lng,
    LngNormalization::East => {
      if lng < 0.0 {
        lng + M_2PI
      } else {
        lng
      }
    }
    LngNormalization::West => {
      if lng > 0.0 {
        lng - M_2PI
      } else {
        lng
      }
    }
  }
}

impl BBox {
  /// Whether the box crosses the antimeridian.
  #[inline]
  #[must_use]
  pub fn is_transmeridian(&self) -> bool {
    self.east < self.west
  }

  /// Longitudinal extent in radians.
  #[must_use]
  pub fn width_rads(&self) -> f64 {
    if self.is_transmeridian() {
      self.east - self.west + M_2PI
    } else {
      self.east - self.west
    }
  }

  /// Latitudinal extent in radians.
  #[must_use]
  pub fn height_rads(&self) -> f64 {
    self.north - self.south
  }

  /// Whether a point falls inside the box.
  #[must_use]
  pub fn contains_point(&self, point: &GeoCoord) -> bool {
    if point.lat < self.south || point.lat > self.north {
      return false;
    }
    if self.is_transmeridian() {
      point.lng >= self.west || point.lng <= self.east
    } else {
      point.lng >= self.west && point.lng <= self.east
    }
  }

  /// The tight bounding box of a vertex loop. Arcs spanning more than
  /// half the sphere flag the box transmeridian, in which case the west
  /// edge is the smallest positive and the east edge the largest negative
  /// longitude seen.
  #[must_use]
  pub fn from_loop(verts: &[GeoCoord]) -> BBox {
    if verts.is_empty() {
      return BBox::default();
    }

    let mut bbox = BBox {
      south: f64::MAX,
      west: f64::MAX,
      north: -f64::MAX,
      east: -f64::MAX,
    };
    let mut min_pos_lng = f64::MAX;
    let mut max_neg_lng = -f64::MAX;
    let mut is_transmeridian = false;

    for (j, coord) in verts.iter().enumerate() {
      let next = &verts[(j + 1) % verts.len()];

      bbox.south = bbox.south.min(coord.lat);
      bbox.north = bbox.north.max(coord.lat);
      bbox.west = bbox.west.min(coord.lng);
      bbox.east = bbox.east.max(coord.lng);

      if coord.lng > 0.0 && coord.lng < min_pos_lng {
        min_pos_lng = coord.lng;
      }
      if coord.lng < 0.0 && coord.lng > max_neg_lng {
        max_neg_lng = coord.lng;
      }

      if (coord.lng - next.lng).abs() > M_PI {
        is_transmeridian = true;
      }
    }

    if is_transmeridian {
      bbox.west = min_pos_lng;
      bbox.east = max_neg_lng;
    }
    bbox
  }

  /// The normalization schemes that bring this box and `other` onto one
  /// longitude line.
  #[must_use]
  pub(crate) fn normalization_with(&self, other: &BBox) -> (LngNormalization, LngNormalization) {
    let a_tm = self.is_transmeridian();
    let b_tm = other.is_transmeridian();

    // a non-transmeridian box needs no shift; when only one crosses, the
    // shorter shift that overlaps the other wins
    let a_to_b_east = (self.west - other.east).abs() < (other.west - self.east).abs();

    let a_norm = if !a_tm {
      LngNormalization::None
    } else if b_tm || a_to_b_east {
      LngNormalization::East
    } else {
      LngNormalization::West
    };
    let b_norm = if !b_tm {
      LngNormalization::None
    } else if a_tm || !a_to_b_east {
      LngNormalization::East
    } else {
      LngNormalization::West
    };
    (a_norm, b_norm)
  }

  /// Whether the two boxes overlap.
  #[must_use]
  pub fn overlaps(&self, other: &BBox) -> bool {
    if self.north < other.south || self.south > other.north {
      return false;
    }
    let (a_norm, b_norm) = self.normalization_with(other);
    !(normalize_lng(self.east, a_norm) < normalize_lng(other.west, b_norm)
      || normalize_lng(self.west, a_norm) > normalize_lng(other.east, b_norm))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::EPSILON_RAD;

  #[test]
  fn test_width_height() {
    let bbox = BBox {
      north: 0.1,
      south: 0.0,
      east: 0.2,
      west: 0.0,
    };
    assert!((bbox.width_rads() - 0.2).abs() < EPSILON_RAD);
    assert!((bbox.height_rads() - 0.1).abs() < EPSILON_RAD);

    let tm = BBox {
      north: 0.1,
      south: -0.1,
      east: -M_PI + 0.2,
      west: M_PI - 0.2,
    };
    assert!(tm.is_transmeridian());
    assert!((tm.width_rads() - 0.4).abs() < EPSILON_RAD);
  }

  #[test]
  fn test_contains_point() {
    let bbox = BBox {
      north: 0.1,
      south: -0.1,
      east: 0.2,
      west: -0.2,
    };
    assert!(bbox.contains_point(&GeoCoord::new(0.0, 0.0)));
    assert!(!bbox.contains_point(&GeoCoord::new(0.5, 0.0)));
    assert!(!bbox.contains_point(&GeoCoord::new(0.0, 0.5)));

    let tm = BBox {
      north: 0.1,
      south: -0.1,
      east: -M_PI + 0.1,
      west: M_PI - 0.1,
    };
    assert!(tm.contains_point(&GeoCoord::new(0.0, -M_PI + 0.05)));
    assert!(tm.contains_point(&GeoCoord::new(0.0, M_PI - 0.05)));
    assert!(!tm.contains_point(&GeoCoord::new(0.0, 0.0)));
  }

  #[test]
  fn test_from_loop_simple() {
    let verts = [
      GeoCoord::new(0.0, 0.0),
      GeoCoord::new(0.2, 0.0),
      GeoCoord::new(0.2, 0.3),
      GeoCoord::new(0.0, 0.3),
    ];
    let bbox = BBox::from_loop(&verts);
    assert_eq!(bbox.north, 0.2);
    assert_eq!(bbox.south, 0.0);
    assert_eq!(bbox.east, 0.3);
    assert_eq!(bbox.west, 0.0);
    assert!(!bbox.is_transmeridian());
  }

  #[test]
  fn test_from_loop_transmeridian() {
    let verts = [
      GeoCoord::new(0.1, M_PI - 0.1),
      GeoCoord::new(0.1, -M_PI + 0.1),
      GeoCoord::new(-0.1, -M_PI + 0.1),
      GeoCoord::new(-0.1, M_PI - 0.1),
    ];
    let bbox = BBox::from_loop(&verts);
    assert!(bbox.is_transmeridian(), "east < west encodes the crossing");
    assert!((bbox.west - (M_PI - 0.1)).abs() < EPSILON_RAD);
    assert!((bbox.east - (-M_PI + 0.1)).abs() < EPSILON_RAD);
  }

  #[test]
  fn test_overlaps() {
    let a = BBox {
      north: 0.2,
      south: 0.0,
      east: 0.2,
      west: 0.0,
    };
    let b = BBox {
      north: 0.3,
      south: 0.1,
      east: 0.3,
      west: 0.1,
    };
    let c = BBox {
      north: 0.9,
      south: 0.8,
      east: 0.9,
      west: 0.8,
    };
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
    assert!(!a.overlaps(&c));
  }
}
