//! The 64-bit cell index codec.
//!
//! A cell index packs a mode tag, a resolution, a base cell number and one
//! 3-bit digit per resolution level into a single integer. All field access
//! goes through the accessors here; no other module manipulates the bits
//! directly. Digits at levels above the cell's resolution hold the unused
//! sentinel (7).

pub mod topology;

use crate::base_cells::{
  self, base_cell_is_cw_offset, face_coord_to_base_cell, face_coord_to_ccw_rot60, INVALID_BASE_CELL,
  INVALID_ROTATIONS, MAX_FACE_COORD,
};
use crate::constants::{
  is_class_iii, BASE_CELL_MASK, BASE_CELL_OFFSET, CELL_MODE, DIGIT_MASK, HIGH_BIT_MASK, INDEX_INIT, MAX_RESOLUTION,
  MODE_MASK, MODE_OFFSET, NUM_BASE_CELLS, PER_DIGIT_OFFSET, RESERVED_MASK, RESERVED_OFFSET, RES_MASK, RES_OFFSET,
};
use crate::coords::{CubeCoord, Digit, FaceCoord, Overage};
use crate::error::{GridError, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use topology::CellShape;

/// A 64-bit hierarchical grid cell identifier.
///
/// The all-zero value is not a valid cell and doubles as the "invalid"
/// sentinel ([`CellIndex::NULL`]).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellIndex(pub u64);

impl CellIndex {
  /// The invalid / missing cell sentinel.
  pub const NULL: CellIndex = CellIndex(0);

  /// Mode field (cell indexes use mode 1).
  #[inline]
  #[must_use]
  pub const fn mode(self) -> u8 {
    ((self.0 & MODE_MASK) >> MODE_OFFSET) as u8
  }

  #[inline]
  pub(crate) fn set_mode(&mut self, mode: u8) {
    self.0 = (self.0 & !MODE_MASK) | ((mode as u64) << MODE_OFFSET);
  }

  /// Resolution field, 0..=15.
  #[inline]
  #[must_use]
  pub const fn resolution(self) -> i32 {
    ((self.0 & RES_MASK) >> RES_OFFSET) as i32
  }

  #[inline]
  pub(crate) fn set_resolution(&mut self, res: i32) {
    self.0 = (self.0 & !RES_MASK) | ((res as u64) << RES_OFFSET);
  }

  /// Base cell field, 0..=121 for valid cells.
  #[inline]
  #[must_use]
  pub const fn base_cell(self) -> i32 {
    ((self.0 & BASE_CELL_MASK) >> BASE_CELL_OFFSET) as i32
  }

  #[inline]
  pub(crate) fn set_base_cell(&mut self, base_cell: i32) {
    self.0 = (self.0 & !BASE_CELL_MASK) | ((base_cell as u64) << BASE_CELL_OFFSET);
  }

  /// The digit at resolution level `res` (1-based).
  #[inline]
  #[must_use]
  pub fn digit(self, res: i32) -> Digit {
    debug_assert!((1..=MAX_RESOLUTION).contains(&res));
    let shift = (MAX_RESOLUTION - res) as u64 * PER_DIGIT_OFFSET;
    Digit::from_u8(((self.0 >> shift) & DIGIT_MASK) as u8)
  }

  #[inline]
  pub(crate) fn set_digit(&mut self, res: i32, digit: Digit) {
    debug_assert!((1..=MAX_RESOLUTION).contains(&res));
    let shift = (MAX_RESOLUTION - res) as u64 * PER_DIGIT_OFFSET;
    self.0 = (self.0 & !(DIGIT_MASK << shift)) | ((digit as u64) << shift);
  }

  /// Reserved bits; zero for valid cells.
  #[inline]
  #[must_use]
  pub(crate) const fn reserved_bits(self) -> u8 {
    ((self.0 & RESERVED_MASK) >> RESERVED_OFFSET) as u8
  }

  /// High bit; zero for valid cells.
  #[inline]
  #[must_use]
  pub(crate) const fn high_bit(self) -> u8 {
    ((self.0 & HIGH_BIT_MASK) >> 63) as u8
  }

  /// Builds a cell-mode index with the given resolution and base cell,
  /// every digit through `res` set to `digit`.
  #[must_use]
  pub(crate) fn with_digits(res: i32, base_cell: i32, digit: Digit) -> CellIndex {
    let mut cell = CellIndex(INDEX_INIT);
    cell.set_mode(CELL_MODE);
    cell.set_resolution(res);
    cell.set_base_cell(base_cell);
    for r in 1..=res {
      cell.set_digit(r, digit);
    }
    cell
  }

  /// The coarsest non-center digit, or `Digit::Center` if all digits are
  /// center.
  #[must_use]
  pub(crate) fn leading_nonzero_digit(self) -> Digit {
    for r in 1..=self.resolution() {
      let digit = self.digit(r);
      if digit != Digit::Center {
        return digit;
      }
    }
    Digit::Center
  }

  /// Rotates the index 60 degrees counter-clockwise: every digit rotates
  /// independently.
  #[must_use]
  pub(crate) fn rotate60_ccw(mut self) -> CellIndex {
    for r in 1..=self.resolution() {
      self.set_digit(r, self.digit(r).rotate60_ccw());
    }
    self
  }

  /// Rotates the index 60 degrees clockwise.
  #[must_use]
  pub(crate) fn rotate60_cw(mut self) -> CellIndex {
    for r in 1..=self.resolution() {
      self.set_digit(r, self.digit(r).rotate60_cw());
    }
    self
  }

  /// Rotates a pentagon-centered index 60 degrees counter-clockwise.
  ///
  /// If the rotation leaves the leading non-zero digit on the deleted K
  /// axis, one corrective rotation unwinds it; skipping that correction
  /// yields a syntactically valid but wrong index.
  #[must_use]
  pub(crate) fn rotate_pent60_ccw(mut self) -> CellIndex {
    let res = self.resolution();
    let mut found_first = false;
    for r in 1..=res {
      self.set_digit(r, self.digit(r).rotate60_ccw());
      if !found_first && self.digit(r) != Digit::Center {
        found_first = true;
        if self.leading_nonzero_digit() == Digit::K {
          self = self.rotate_pent60_ccw();
        }
      }
    }
    self
  }

  /// Rotates a pentagon-centered index 60 degrees clockwise.
  #[must_use]
  pub(crate) fn rotate_pent60_cw(mut self) -> CellIndex {
    let res = self.resolution();
    let mut found_first = false;
    for r in 1..=res {
      self.set_digit(r, self.digit(r).rotate60_cw());
      if !found_first && self.digit(r) != Digit::Center {
        found_first = true;
        if self.leading_nonzero_digit() == Digit::K {
          self = self.rotate_pent60_cw();
        }
      }
    }
    self
  }

  /// Whether the bit pattern is a well-formed cell index.
  #[must_use]
  pub fn is_valid_cell(self) -> bool {
    if self.high_bit() != 0 || self.mode() != CELL_MODE || self.reserved_bits() != 0 {
      return false;
    }

    let res = self.resolution();
    let base_cell = self.base_cell();
    if !(0..NUM_BASE_CELLS).contains(&base_cell) {
      return false;
    }

    for r in 1..=res {
      if self.digit(r) == Digit::Invalid {
        return false;
      }
    }
    for r in (res + 1)..=MAX_RESOLUTION {
      if self.digit(r) != Digit::Invalid {
        return false;
      }
    }

    // pentagons never lead with the deleted K axis
    if base_cells::is_base_cell_pentagon(base_cell) && self.leading_nonzero_digit() == Digit::K {
      return false;
    }

    true
  }

  /// Whether the cell is a pentagon: a pentagon base cell with all center
  /// digits.
  #[must_use]
  pub fn is_pentagon(self) -> bool {
    self.shape() == CellShape::Pentagon
  }

  /// Parses hex first, decimal as a fallback, yielding `NULL` for
  /// unparseable input.
  #[must_use]
  pub fn parse_or_null(s: &str) -> CellIndex {
    s.parse().unwrap_or(CellIndex::NULL)
  }
}

/// Lowercase hexadecimal of the 64-bit value.
impl fmt::Display for CellIndex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:x}", self.0)
  }
}

impl FromStr for CellIndex {
  type Err = GridError;

  fn from_str(s: &str) -> Result<CellIndex> {
    if s.is_empty() {
      return Err(GridError::InvalidCell);
    }
    u64::from_str_radix(s, 16)
      .or_else(|_| s.parse::<u64>())
      .map(CellIndex)
      .map_err(|_| GridError::InvalidCell)
  }
}

/// Encodes the cell at a face address and resolution.
///
/// For resolution > 0 the index is built bottom-up: starting from the
/// finest level, apply the up-aperture-7 transform (Class II/III alternating
/// by level parity) and compare the pre- and post-image center to recover
/// each digit, finishing at a res 0 coordinate that must land in the base
/// cell lookup range.
#[must_use]
pub(crate) fn face_coord_to_cell(fc: &FaceCoord, res: i32) -> CellIndex {
  let mut cell = CellIndex(INDEX_INIT);
  cell.set_mode(CELL_MODE);
  cell.set_resolution(res);

  if res == 0 {
    if fc.coord.i > MAX_FACE_COORD || fc.coord.j > MAX_FACE_COORD || fc.coord.k > MAX_FACE_COORD {
      return CellIndex::NULL;
    }
    let base_cell = face_coord_to_base_cell(fc);
    if base_cell == INVALID_BASE_CELL {
      return CellIndex::NULL;
    }
    cell.set_base_cell(base_cell);
    return cell;
  }

  let mut fijk = *fc;
  for r in (1..=res).rev() {
    let last = fijk.coord;
    let last_center;
    if is_class_iii(r) {
      fijk.coord = fijk.coord.up_aperture7();
      last_center = fijk.coord.down_aperture7();
    } else {
      fijk.coord = fijk.coord.up_aperture7r();
      last_center = fijk.coord.down_aperture7r();
    }

    let digit = (last - last_center).normalized().unit_digit();
    if digit == Digit::Invalid {
      return CellIndex::NULL;
    }
    cell.set_digit(r, digit);
  }

  // fijk now holds the res 0 coordinates of the base cell
  if fijk.coord.i > MAX_FACE_COORD || fijk.coord.j > MAX_FACE_COORD || fijk.coord.k > MAX_FACE_COORD {
    return CellIndex::NULL;
  }

  let base_cell = face_coord_to_base_cell(&fijk);
  if base_cell == INVALID_BASE_CELL {
    return CellIndex::NULL;
  }
  cell.set_base_cell(base_cell);

  let num_rots = face_coord_to_ccw_rot60(&fijk);
  if num_rots == INVALID_ROTATIONS {
    return CellIndex::NULL;
  }

  if base_cells::is_base_cell_pentagon(base_cell) {
    if cell.leading_nonzero_digit() == Digit::K {
      // rotate out of the deleted K-axes subsequence, direction chosen by
      // which offset face we approached from
      cell = if base_cell_is_cw_offset(base_cell, fijk.face) {
        cell.rotate60_cw()
      } else {
        cell.rotate60_ccw()
      };
    }
    for _ in 0..num_rots {
      cell = cell.rotate_pent60_ccw();
    }
  } else {
    for _ in 0..num_rots {
      cell = cell.rotate60_ccw();
    }
  }
  cell
}

/// Applies the index's digits to its base cell's home coordinates, leaving
/// a face address on the home face. Returns whether the result can have
/// spilled past the face boundary.
pub(crate) fn cell_to_face_coord_on_home(cell: CellIndex, fijk: &mut FaceCoord) -> bool {
  let res = cell.resolution();
  let base_cell = cell.base_cell();

  // a hexagon base cell centered on its face at res 0 cannot spill
  let mut possible_overage = true;
  if !base_cells::is_base_cell_pentagon(base_cell) && (res == 0 || fijk.coord == CubeCoord::ZERO) {
    possible_overage = false;
  }

  for r in 1..=res {
    if is_class_iii(r) {
      fijk.coord = fijk.coord.down_aperture7();
    } else {
      fijk.coord = fijk.coord.down_aperture7r();
    }
    fijk.coord = fijk.coord.neighbor(cell.digit(r));
  }
  possible_overage
}

/// Decodes a cell index to its canonical face address.
pub(crate) fn cell_to_face_coord(cell: CellIndex) -> Result<FaceCoord> {
  let base_cell = cell.base_cell();
  if !(0..NUM_BASE_CELLS).contains(&base_cell) {
    return Err(GridError::InvalidCell);
  }

  // a pentagon with a leading digit 5 was rotated into the deleted
  // subsequence's frame; undo before applying digits
  let mut h = cell;
  if base_cells::is_base_cell_pentagon(base_cell) && h.leading_nonzero_digit() == Digit::Ik {
    h = h.rotate60_cw();
  }

  let mut fijk = base_cells::base_cell_home(base_cell);
  if !cell_to_face_coord_on_home(h, &mut fijk) {
    return Ok(fijk);
  }

  let orig_coord = fijk.coord;

  // overage adjustment always works in a Class II grid
  let res = cell.resolution();
  let mut adj_res = res;
  if is_class_iii(res) {
    fijk.coord = fijk.coord.down_aperture7r();
    adj_res += 1;
  }

  let pent_leading_4 =
    base_cells::is_base_cell_pentagon(base_cell) && h.leading_nonzero_digit() == Digit::I;

  let mut overage = fijk.adjust_overage_class_ii(adj_res, pent_leading_4, false);
  if overage != Overage::None {
    // pentagon base cells can spill across more than one face boundary
    if base_cells::is_base_cell_pentagon(base_cell) {
      while overage == Overage::NewFace {
        overage = fijk.adjust_overage_class_ii(adj_res, false, false);
      }
    }
    if adj_res != res {
      fijk.coord = fijk.coord.up_aperture7r();
    }
  } else if adj_res != res {
    fijk.coord = orig_coord;
  }
  Ok(fijk)
}
