//! Integer cube-coordinate algebra for the hexagonal lattice.
//!
//! A cell position on a face is an `(i, j, k)` triple of non-negative
//! integers with the minimum component zero after normalization. All of the
//! aperture-7 and aperture-3 grid transforms, the 60 degree rotations, and
//! the digit mapping live here; everything is a pure function of its inputs
//! and consults no lookup tables.

use crate::constants::{M_ONESEVENTH, M_RSIN60, M_SQRT3_2};
use crate::math::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::ops::{Add, Sub};

/// One of the seven child positions at a resolution level, or the unused
/// sentinel. Values 1..=6 double as the six traversal directions out of a
/// cell; `K` is the direction a pentagon lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize_repr, Deserialize_repr))]
#[repr(u8)]
pub enum Digit {
  /// Center position.
  #[default]
  Center = 0,
  /// K-axes direction; absent from pentagon cells.
  K = 1,
  /// J-axes direction.
  J = 2,
  /// J == K direction.
  Jk = 3,
  /// I-axes direction.
  I = 4,
  /// I == K direction.
  Ik = 5,
  /// I == J direction.
  Ij = 6,
  /// Unused / sentinel digit.
  Invalid = 7,
}

impl Digit {
  /// The six traversal directions in the order the disk algorithms walk
  /// them.
  pub(crate) const RING_DIRECTIONS: [Digit; 6] = [Digit::J, Digit::Jk, Digit::K, Digit::Ik, Digit::I, Digit::Ij];

  /// Converts a raw 3-bit value.
  #[inline]
  #[must_use]
  pub(crate) fn from_u8(value: u8) -> Digit {
    debug_assert!(value <= 7);
    match value {
      0 => Digit::Center,
      1 => Digit::K,
      2 => Digit::J,
      3 => Digit::Jk,
      4 => Digit::I,
      5 => Digit::Ik,
      6 => Digit::Ij,
      _ => Digit::Invalid,
    }
  }

  /// Rotation 60 degrees counter-clockwise.
  #[inline]
  #[must_use]
  pub(crate) fn rotate60_ccw(self) -> Digit {
    match self {
      Digit::K => Digit::Ik,
      Digit::Ik => Digit::I,
      Digit::I => Digit::Ij,
      Digit::Ij => Digit::J,
      Digit::J => Digit::Jk,
      Digit::Jk => Digit::K,
      other => other,
    }
  }

  /// Rotation 60 degrees clockwise.
  #[inline]
  #[must_use]
  pub(crate) fn rotate60_cw(self) -> Digit {
    match self {
      Digit::K => Digit::Jk,
      Digit::Jk => Digit::J,
      Digit::J => Digit::Ij,
      Digit::Ij => Digit::I,
      Digit::I => Digit::Ik,
      Digit::Ik => Digit::K,
      other => other,
    }
  }
}

/// A position in the hexagonal lattice in cube (i, j, k) coordinates,
/// relative to an implicit origin on one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubeCoord {
  /// I component.
  pub i: i32,
  /// J component.
  pub j: i32,
  /// K component.
  pub k: i32,
}

/// Unit vectors for each digit, indexed by digit value.
#[rustfmt::skip]
pub(crate) const UNIT_VECS: [CubeCoord; 7] = [
    CubeCoord::new(0, 0, 0), // Center
    CubeCoord::new(0, 0, 1), // K
    CubeCoord::new(0, 1, 0), // J
    CubeCoord::new(0, 1, 1), // Jk
    CubeCoord::new(1, 0, 0), // I
    CubeCoord::new(1, 0, 1), // Ik
    CubeCoord::new(1, 1, 0), // Ij
];

impl Add for CubeCoord {
  type Output = CubeCoord;

  #[inline]
  fn add(self, rhs: CubeCoord) -> CubeCoord {
    CubeCoord::new(
      self.i.saturating_add(rhs.i),
      self.j.saturating_add(rhs.j),
      self.k.saturating_add(rhs.k),
    )
  }
}

impl Sub for CubeCoord {
  type Output = CubeCoord;

  #[inline]
  fn sub(self, rhs: CubeCoord) -> CubeCoord {
    CubeCoord::new(
      self.i.saturating_sub(rhs.i),
      self.j.saturating_sub(rhs.j),
      self.k.saturating_sub(rhs.k),
    )
  }
}

impl CubeCoord {
  /// The origin.
  pub const ZERO: CubeCoord = CubeCoord::new(0, 0, 0);

  /// Creates a coordinate from components.
  #[must_use]
  pub const fn new(i: i32, j: i32, k: i32) -> Self {
    Self { i, j, k }
  }

  /// Uniform scale by an integer factor.
  #[inline]
  #[must_use]
  pub fn scaled(self, factor: i32) -> CubeCoord {
    CubeCoord::new(
      self.i.saturating_mul(factor),
      self.j.saturating_mul(factor),
      self.k.saturating_mul(factor),
    )
  }

  /// Normalizes to the minimal non-negative form.
  ///
  /// First clears each negative component by shifting its magnitude into
  /// the other two (components can be transiently negative after
  /// subtraction), then subtracts the minimum so it lands on zero.
  #[must_use]
  pub fn normalized(self) -> CubeCoord {
    let mut c = self;
    if c.i < 0 {
      c.j = c.j.saturating_sub(c.i);
      c.k = c.k.saturating_sub(c.i);
      c.i = 0;
    }
    if c.j < 0 {
      c.i = c.i.saturating_sub(c.j);
      c.k = c.k.saturating_sub(c.j);
      c.j = 0;
    }
    if c.k < 0 {
      c.i = c.i.saturating_sub(c.k);
      c.j = c.j.saturating_sub(c.k);
      c.k = 0;
    }

    let min = c.i.min(c.j).min(c.k);
    if min > 0 {
      c.i -= min;
      c.j -= min;
      c.k -= min;
    }
    c
  }

  /// The digit whose unit vector equals this coordinate after
  /// normalization, or `Digit::Invalid` for a non-unit vector.
  #[must_use]
  pub fn unit_digit(self) -> Digit {
    let c = self.normalized();
    for (d, unit) in UNIT_VECS.iter().enumerate() {
      if c == *unit {
        return Digit::from_u8(d as u8);
      }
    }
    Digit::Invalid
  }

  /// The normalized coordinate one step away in the given digit direction.
  #[must_use]
  pub fn neighbor(self, digit: Digit) -> CubeCoord {
    match digit {
      Digit::Center | Digit::Invalid => self,
      d => (self + UNIT_VECS[d as usize]).normalized(),
    }
  }

  /// Rotation 60 degrees counter-clockwise about the origin, via the unit
  /// vector rotation identities.
  #[must_use]
  pub fn rotate60_ccw(self) -> CubeCoord {
    (CubeCoord::new(1, 1, 0).scaled(self.i) + CubeCoord::new(0, 1, 1).scaled(self.j)
      + CubeCoord::new(1, 0, 1).scaled(self.k))
    .normalized()
  }

  /// Rotation 60 degrees clockwise about the origin.
  #[must_use]
  pub fn rotate60_cw(self) -> CubeCoord {
    (CubeCoord::new(1, 0, 1).scaled(self.i) + CubeCoord::new(1, 1, 0).scaled(self.j)
      + CubeCoord::new(0, 1, 1).scaled(self.k))
    .normalized()
  }

  /// The indexing parent in a counter-clockwise aperture 7 grid
  /// (Class III).
  #[must_use]
  pub fn up_aperture7(self) -> CubeCoord {
    // axial conversion first
    let i = self.i - self.k;
    let j = self.j - self.k;

    CubeCoord::new(
      lround((3 * i - j) as f64 * M_ONESEVENTH),
      lround((i + 2 * j) as f64 * M_ONESEVENTH),
      0,
    )
    .normalized()
  }

  /// The indexing parent in a clockwise aperture 7 grid (Class II).
  #[must_use]
  pub fn up_aperture7r(self) -> CubeCoord {
    let i = self.i - self.k;
    let j = self.j - self.k;

    CubeCoord::new(
      lround((2 * i + j) as f64 * M_ONESEVENTH),
      lround((3 * j - i) as f64 * M_ONESEVENTH),
      0,
    )
    .normalized()
  }

  /// The center child in a counter-clockwise aperture 7 grid (Class III).
  #[must_use]
  pub fn down_aperture7(self) -> CubeCoord {
    // res r unit vectors expressed in the res r+1 grid
    (CubeCoord::new(3, 0, 1).scaled(self.i) + CubeCoord::new(1, 3, 0).scaled(self.j)
      + CubeCoord::new(0, 1, 3).scaled(self.k))
    .normalized()
  }

  /// The center child in a clockwise aperture 7 grid (Class II).
  #[must_use]
  pub fn down_aperture7r(self) -> CubeCoord {
    (CubeCoord::new(3, 1, 0).scaled(self.i) + CubeCoord::new(0, 3, 1).scaled(self.j)
      + CubeCoord::new(1, 0, 3).scaled(self.k))
    .normalized()
  }

  /// The center child in a counter-clockwise aperture 3 grid.
  #[must_use]
  pub fn down_aperture3(self) -> CubeCoord {
    (CubeCoord::new(2, 0, 1).scaled(self.i) + CubeCoord::new(1, 2, 0).scaled(self.j)
      + CubeCoord::new(0, 1, 2).scaled(self.k))
    .normalized()
  }

  /// The center child in a clockwise aperture 3 grid.
  #[must_use]
  pub fn down_aperture3r(self) -> CubeCoord {
    (CubeCoord::new(2, 1, 0).scaled(self.i) + CubeCoord::new(0, 2, 1).scaled(self.j)
      + CubeCoord::new(1, 0, 2).scaled(self.k))
    .normalized()
  }

  /// Grid (Chebyshev) distance to another coordinate.
  #[must_use]
  pub fn distance_to(self, other: CubeCoord) -> i32 {
    let diff = (self - other).normalized();
    diff.i.abs().max(diff.j.abs()).max(diff.k.abs())
  }

  /// Converts the normalized form to true cube coordinates with
  /// `i + j + k == 0`, for interpolation.
  #[must_use]
  pub(crate) fn to_cube(self) -> CubeCoord {
    let i = -self.i + self.k;
    let j = self.j - self.k;
    CubeCoord::new(i, j, -i - j)
  }

  /// Converts true cube coordinates back to the normalized form.
  #[must_use]
  pub(crate) fn from_cube(cube: CubeCoord) -> CubeCoord {
    CubeCoord::new(cube.i.saturating_neg(), cube.j, 0).normalized()
  }

  /// Rounds fractional cube coordinates to the containing cell, correcting
  /// the axis with the largest rounding error so `i + j + k == 0` holds.
  #[must_use]
  pub(crate) fn round_cube(i: f64, j: f64, k: f64) -> CubeCoord {
    let mut ri = lround64(i);
    let mut rj = lround64(j);
    let mut rk = lround64(k);

    let i_diff = (ri - i).abs();
    let j_diff = (rj - j).abs();
    let k_diff = (rk - k).abs();

    if i_diff > j_diff && i_diff > k_diff {
      ri = -rj - rk;
    } else if j_diff > k_diff {
      rj = -ri - rk;
    } else {
      rk = -ri - rj;
    }

    CubeCoord::new(ri as i32, rj as i32, rk as i32)
  }

  /// Quantizes a hex-plane point into the containing cell coordinate.
  #[must_use]
  pub(crate) fn from_hex2d(v: &Vec2) -> CubeCoord {
    let mut h = CubeCoord::ZERO;

    let a1 = v.x.abs();
    let a2 = v.y.abs();

    // reverse the conversion in `to_hex2d`
    let x2 = a2 * M_RSIN60;
    let x1 = a1 + x2 / 2.0;

    let m1 = x1 as i32;
    let m2 = x2 as i32;

    let r1 = x1 - f64::from(m1);
    let r2 = x2 - f64::from(m2);

    if r1 < 0.5 {
      if r1 < 1.0 / 3.0 {
        if r2 < (1.0 + r1) / 2.0 {
          h.i = m1;
          h.j = m2;
        } else {
          h.i = m1;
          h.j = m2 + 1;
        }
      } else {
        h.j = if r2 < 1.0 - r1 { m2 } else { m2 + 1 };
        h.i = if (1.0 - r1) <= r2 && r2 < 2.0 * r1 { m1 + 1 } else { m1 };
      }
    } else if r1 < 2.0 / 3.0 {
      h.j = if r2 < 1.0 - r1 { m2 } else { m2 + 1 };
      h.i = if (2.0 * r1 - 1.0) < r2 && r2 < 1.0 - r1 { m1 } else { m1 + 1 };
    } else if r2 < r1 / 2.0 {
      h.i = m1 + 1;
      h.j = m2;
    } else {
      h.i = m1 + 1;
      h.j = m2 + 1;
    }

    // fold across the axes if necessary
    if v.x < 0.0 {
      if h.j % 2 == 0 {
        let axis_i = i64::from(h.j) / 2;
        let diff = i64::from(h.i) - axis_i;
        h.i = (i64::from(h.i) - 2 * diff) as i32;
      } else {
        let axis_i = (i64::from(h.j) + 1) / 2;
        let diff = i64::from(h.i) - axis_i;
        h.i = (i64::from(h.i) - (2 * diff + 1)) as i32;
      }
    }

    if v.y < 0.0 {
      h.i = (i64::from(h.i) - (2 * i64::from(h.j) + 1) / 2) as i32;
      h.j = -h.j;
    }

    h.normalized()
  }

  /// Center point of the cell in hex-plane coordinates. Assumes the
  /// coordinate is normalized.
  #[must_use]
  pub(crate) fn to_hex2d(self) -> Vec2 {
    let i = self.i - self.k;
    let j = self.j - self.k;

    Vec2::new(f64::from(i) - 0.5 * f64::from(j), f64::from(j) * M_SQRT3_2)
  }
}

/// Round half away from zero, matching the C library rounding the
/// reference grids were built with.
#[inline]
fn lround(value: f64) -> i32 {
  lround64(value) as i32
}

#[inline]
fn lround64(value: f64) -> f64 {
  if value > 0.0 {
    (value + 0.5).floor()
  } else if value < 0.0 {
    (value - 0.5).ceil()
  } else {
    0.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalized() {
    assert_eq!(CubeCoord::new(0, 0, 0).normalized(), CubeCoord::ZERO);
    assert_eq!(CubeCoord::new(2, 3, 4).normalized(), CubeCoord::new(0, 1, 2));
    assert_eq!(CubeCoord::new(-2, -3, -4).normalized(), CubeCoord::new(2, 1, 0));
    assert_eq!(CubeCoord::new(2, -1, 0).normalized(), CubeCoord::new(3, 0, 1));
    assert_eq!(CubeCoord::new(10, 20, 5).normalized(), CubeCoord::new(5, 15, 0));
  }

  #[test]
  fn test_unit_digit() {
    for d in 0u8..=6 {
      assert_eq!(UNIT_VECS[d as usize].unit_digit(), Digit::from_u8(d));
    }
    // non-unit after normalization
    assert_eq!(CubeCoord::new(2, 0, 0).unit_digit(), Digit::Invalid);
    assert_eq!(CubeCoord::new(1, 2, 3).unit_digit(), Digit::Invalid);
    // normalizes down to a unit vector
    assert_eq!(CubeCoord::new(1, 1, 2).unit_digit(), Digit::K);
    assert_eq!(CubeCoord::new(2, 2, 2).unit_digit(), Digit::Center);
  }

  #[test]
  fn test_neighbor() {
    assert_eq!(CubeCoord::ZERO.neighbor(Digit::Center), CubeCoord::ZERO);
    assert_eq!(CubeCoord::ZERO.neighbor(Digit::I), UNIT_VECS[Digit::I as usize]);
    assert_eq!(CubeCoord::ZERO.neighbor(Digit::Invalid), CubeCoord::ZERO);
  }

  #[test]
  fn test_rotate60_roundtrip() {
    for d in 1u8..=6 {
      let v = UNIT_VECS[d as usize];
      assert_eq!(v.rotate60_ccw().rotate60_cw(), v);
      // six rotations come back around
      let mut r = v;
      for _ in 0..6 {
        r = r.rotate60_ccw();
      }
      assert_eq!(r, v);
    }
  }

  #[test]
  fn test_digit_rotation_matches_vector_rotation() {
    for d in 1u8..=6 {
      let digit = Digit::from_u8(d);
      let vec = UNIT_VECS[d as usize];
      assert_eq!(vec.rotate60_ccw().unit_digit(), digit.rotate60_ccw());
      assert_eq!(vec.rotate60_cw().unit_digit(), digit.rotate60_cw());
    }
  }

  #[test]
  fn test_aperture7_parent_of_center_child() {
    for coord in [CubeCoord::new(1, 0, 0), CubeCoord::new(0, 2, 1), CubeCoord::new(3, 1, 0)] {
      assert_eq!(coord.down_aperture7().up_aperture7(), coord);
      assert_eq!(coord.down_aperture7r().up_aperture7r(), coord);
    }
  }

  #[test]
  fn test_down_aperture7_unit() {
    assert_eq!(CubeCoord::new(1, 0, 0).down_aperture7(), CubeCoord::new(3, 0, 1));
    assert_eq!(CubeCoord::new(1, 0, 0).down_aperture7r(), CubeCoord::new(3, 1, 0));
  }

  #[test]
  fn test_distance() {
    assert_eq!(CubeCoord::ZERO.distance_to(CubeCoord::ZERO), 0);
    assert_eq!(CubeCoord::ZERO.distance_to(CubeCoord::new(1, 0, 0)), 1);
    assert_eq!(CubeCoord::new(3, 0, 0).distance_to(CubeCoord::new(0, 3, 0)), 3);
  }

  #[test]
  fn test_cube_conversion() {
    let coord = CubeCoord::new(1, 0, 0);
    let cube = coord.to_cube();
    assert_eq!(cube.i + cube.j + cube.k, 0);
    assert_eq!(CubeCoord::from_cube(cube), coord);
  }

  #[test]
  fn test_round_cube_preserves_invariant() {
    let rounded = CubeCoord::round_cube(1.4, -0.7, -0.7);
    assert_eq!(rounded.i + rounded.j + rounded.k, 0);
    let rounded = CubeCoord::round_cube(2.5, -1.2, -1.3);
    assert_eq!(rounded.i + rounded.j + rounded.k, 0);
  }

  #[test]
  fn test_hex2d_roundtrip() {
    for coord in [
      CubeCoord::ZERO,
      CubeCoord::new(1, 0, 0),
      CubeCoord::new(0, 3, 1),
      CubeCoord::new(5, 2, 0),
    ] {
      let v = coord.to_hex2d();
      assert_eq!(CubeCoord::from_hex2d(&v), coord);
    }
  }
}
