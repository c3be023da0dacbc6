//! Grid system constants: mathematical values, the 64-bit index field
//! layout, and the per-resolution Class II scale tables.

use std::f64::consts;

/// pi
pub const M_PI: f64 = consts::PI;
/// pi / 2
pub const M_PI_2: f64 = consts::FRAC_PI_2;
/// 2 * pi
pub const M_2PI: f64 = 2.0 * consts::PI;

/// General-purpose floating point threshold.
pub const EPSILON: f64 = 0.000_000_000_000_000_1;
/// Comparison epsilon in degrees, roughly 0.1mm on the Earth's surface.
pub const EPSILON_DEG: f64 = 0.000_000_001;
/// Comparison epsilon in radians, roughly 0.1mm on the Earth's surface.
pub const EPSILON_RAD: f64 = EPSILON_DEG * consts::PI / 180.0;

/// sqrt(3) / 2, i.e. sin(60 degrees)
pub const M_SQRT3_2: f64 = 0.866_025_403_784_438_6;
/// 1 / sin(60 degrees)
pub const M_RSIN60: f64 = 1.0 / M_SQRT3_2;
/// sqrt(7)
pub const M_SQRT7: f64 = 2.645_751_311_064_590_6;
/// 1 / sqrt(7)
pub const M_RSQRT7: f64 = 1.0 / M_SQRT7;
/// 1 / 3
pub const M_ONETHIRD: f64 = 1.0 / 3.0;
/// 1 / 7
pub const M_ONESEVENTH: f64 = 1.0 / 7.0;

/// Rotation angle between Class II and Class III resolution axes,
/// asin(sqrt(3 / 28)).
pub const M_AP7_ROT_RADS: f64 = 0.333_473_172_251_832_1;

/// Scaling factor from hex-plane resolution 0 unit length (the distance
/// between adjacent cell centers on the plane) to gnomonic unit length.
pub const RES0_U_GNOMONIC: f64 = 0.381_966_011_250_105;
/// Inverse of `RES0_U_GNOMONIC`.
pub const INV_RES0_U_GNOMONIC: f64 = 1.0 / RES0_U_GNOMONIC;

/// Earth authalic radius in kilometers (WGS84).
pub const EARTH_RADIUS_KM: f64 = 6371.007_180_918_475;

/// Finest grid resolution; the grid has 16 resolutions, 0 through 15.
pub const MAX_RESOLUTION: i32 = 15;
/// Number of icosahedron faces.
pub const NUM_FACES: i32 = 20;
/// Number of resolution 0 base cells.
pub const NUM_BASE_CELLS: i32 = 122;
/// Number of base cells that are pentagons.
pub const NUM_PENTAGONS: i32 = 12;
/// Vertices in a hexagonal cell.
pub const NUM_HEX_VERTS: usize = 6;
/// Vertices in a pentagonal cell.
pub const NUM_PENT_VERTS: usize = 5;
/// Maximum vertices in a cell boundary; worst case is a pentagon with
/// an edge-crossing vertex inserted after each topological vertex.
pub const MAX_BOUNDARY_VERTS: usize = 10;

/// Total number of cells at the finest resolution: 2 + 120 * 7^15.
pub const NUM_CELLS_MAX_RES: i64 = 569_707_381_193_162;

// 64-bit index layout. From the high bit down: 1 reserved high bit,
// 4 mode bits, 3 reserved bits, 4 resolution bits, 7 base cell bits and
// fifteen 3-bit resolution digits.

/// Bit offset of the mode field.
pub const MODE_OFFSET: u64 = 59;
/// Bit offset of the reserved bits.
pub const RESERVED_OFFSET: u64 = 56;
/// Bit offset of the resolution field.
pub const RES_OFFSET: u64 = 52;
/// Bit offset of the base cell field.
pub const BASE_CELL_OFFSET: u64 = 45;
/// Width in bits of one resolution digit.
pub const PER_DIGIT_OFFSET: u64 = 3;

/// 1 in the highest bit, 0 elsewhere.
pub const HIGH_BIT_MASK: u64 = 1 << 63;
/// 1s in the 4 mode bits, 0 elsewhere.
pub const MODE_MASK: u64 = 0b1111 << MODE_OFFSET;
/// 1s in the 3 reserved bits, 0 elsewhere.
pub const RESERVED_MASK: u64 = 0b111 << RESERVED_OFFSET;
/// 1s in the 4 resolution bits, 0 elsewhere.
pub const RES_MASK: u64 = 0b1111 << RES_OFFSET;
/// 1s in the 7 base cell bits, 0 elsewhere.
pub const BASE_CELL_MASK: u64 = 0b111_1111 << BASE_CELL_OFFSET;
/// 1s in the 3 bits of a single digit, unshifted.
pub const DIGIT_MASK: u64 = 0b111;

/// Mode value for cell indexes.
pub const CELL_MODE: u8 = 1;

/// Blank index pattern: mode 0, resolution 0, base cell 0 and every digit
/// set to the unused sentinel (7). Encoding starts from this value.
pub const INDEX_INIT: u64 = 0x0000_1fff_ffff_ffff;

/// Maximum dimension of the face coordinate system, indexed by Class II
/// resolution. Entries at odd (Class III) resolutions are unused; Class III
/// callers look up `res + 1`, so the table carries one extra entry.
#[rustfmt::skip]
pub const MAX_DIM_BY_CII_RES: [i32; (MAX_RESOLUTION + 2) as usize] = [
    2,          // res  0
    -1,         // res  1
    14,         // res  2
    -1,         // res  3
    98,         // res  4
    -1,         // res  5
    686,        // res  6
    -1,         // res  7
    4802,       // res  8
    -1,         // res  9
    33614,      // res 10
    -1,         // res 11
    235_298,    // res 12
    -1,         // res 13
    1_647_086,  // res 14
    -1,         // res 15
    11_529_602, // res 16
];

/// Unit scale distance of the face coordinate system, indexed by Class II
/// resolution, with the same one-extra-entry convention.
#[rustfmt::skip]
pub const UNIT_SCALE_BY_CII_RES: [i32; (MAX_RESOLUTION + 2) as usize] = [
    1,         // res  0
    -1,        // res  1
    7,         // res  2
    -1,        // res  3
    49,        // res  4
    -1,        // res  5
    343,       // res  6
    -1,        // res  7
    2401,      // res  8
    -1,        // res  9
    16807,     // res 10
    -1,        // res 11
    117_649,   // res 12
    -1,        // res 13
    823_543,   // res 14
    -1,        // res 15
    5_764_801, // res 16
];

/// Whether a resolution uses Class III (odd) axes orientation.
#[inline]
#[must_use]
pub fn is_class_iii(res: i32) -> bool {
  res % 2 == 1
}

/// Integer exponentiation, wrapping on overflow.
#[inline]
pub(crate) fn ipow(mut base: i64, mut exp: i64) -> i64 {
  debug_assert!(exp >= 0);
  let mut result: i64 = 1;
  loop {
    if exp & 1 != 0 {
      result = result.wrapping_mul(base);
    }
    exp >>= 1;
    if exp == 0 {
      break;
    }
    base = base.wrapping_mul(base);
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_index_init_pattern() {
    // All fifteen digits set to 7, everything above them zero.
    assert_eq!(INDEX_INIT, (1u64 << 45) - 1);
  }

  #[test]
  fn test_class_iii() {
    assert!(!is_class_iii(0));
    assert!(is_class_iii(1));
    assert!(!is_class_iii(14));
    assert!(is_class_iii(15));
  }

  #[test]
  fn test_ipow() {
    assert_eq!(ipow(7, 0), 1);
    assert_eq!(ipow(7, 3), 343);
    assert_eq!(ipow(2, 20), 1_048_576);
  }

  #[test]
  fn test_scale_tables_are_powers_of_seven() {
    for r in (0..=16).step_by(2) {
      assert_eq!(UNIT_SCALE_BY_CII_RES[r] as i64, ipow(7, r as i64 / 2));
      assert_eq!(MAX_DIM_BY_CII_RES[r] as i64, 2 * ipow(7, r as i64 / 2));
    }
  }
}
