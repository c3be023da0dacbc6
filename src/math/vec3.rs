//! 3-D Cartesian point on the unit sphere.

use crate::geo::GeoCoord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 3-D floating point vector.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3 {
  /// X component.
  pub x: f64,
  /// Y component.
  pub y: f64,
  /// Z component.
  pub z: f64,
}

impl Vec3 {
  /// Creates a vector from components.
  #[must_use]
  pub const fn new(x: f64, y: f64, z: f64) -> Self {
    Self { x, y, z }
  }

  /// Unit-sphere point for a spherical coordinate.
  #[must_use]
  pub(crate) fn from_geo(geo: &GeoCoord) -> Self {
    let r = geo.lat.cos();
    Self {
      x: geo.lng.cos() * r,
      y: geo.lng.sin() * r,
      z: geo.lat.sin(),
    }
  }

  /// Squared Euclidean distance to another point.
  #[inline]
  #[must_use]
  pub(crate) fn square_dist(&self, other: &Vec3) -> f64 {
    let dx = self.x - other.x;
    let dy = self.y - other.y;
    let dz = self.z - other.z;
    dx * dx + dy * dy + dz * dz
  }
}
