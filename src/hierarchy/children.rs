//! Iterator over the children of a cell at a finer resolution.
//!
//! Children are visited in digit order by treating the digit fields as a
//! base-7 counter: incrementing the digit at the finest level carries into
//! coarser digits through plain integer addition, because an overflowing
//! digit (7 + 1) spills its carry bit into the adjacent field. Under a
//! pentagon, the first non-zero digit between the parent and child
//! resolutions is never K, so one level at a time skips that digit as the
//! counter passes it.

use crate::constants::{MAX_RESOLUTION, PER_DIGIT_OFFSET};
use crate::coords::Digit;
use crate::hierarchy::zero_digits;
use crate::index::CellIndex;

/// Iterator over the descendants of one cell at a fixed resolution.
#[derive(Debug, Clone, Copy)]
pub struct ChildIter {
  current: CellIndex,
  parent_res: i32,
  // finest level still responsible for skipping the deleted K digit;
  // -1 outside a pentagon
  skip_digit: i32,
}

impl ChildIter {
  /// Creates an iterator over the children of `parent` at `child_res`.
  /// Yields nothing when the inputs are invalid.
  #[must_use]
  pub fn new(parent: CellIndex, child_res: i32) -> Self {
    let parent_res = parent.resolution();
    if child_res < parent_res || child_res > MAX_RESOLUTION || !parent.is_valid_cell() {
      return Self::exhausted();
    }

    let mut first = parent;
    first.set_resolution(child_res);
    first = zero_digits(first, parent_res + 1, child_res);

    // the center child of a pentagon is itself a pentagon
    let skip_digit = if first.is_pentagon() { child_res } else { -1 };

    Self {
      current: first,
      parent_res,
      skip_digit,
    }
  }

  fn exhausted() -> Self {
    Self {
      current: CellIndex::NULL,
      parent_res: -1,
      skip_digit: -1,
    }
  }

  /// Adds one to the digit at `res`, letting overflow carry into the next
  /// coarser digit field.
  fn increment_digit(&mut self, res: i32) {
    self.current.0 += 1 << ((MAX_RESOLUTION - res) as u64 * PER_DIGIT_OFFSET);
  }

  fn step(&mut self) {
    let child_res = self.current.resolution();
    self.increment_digit(child_res);

    let mut i = child_res;
    while i >= self.parent_res {
      if i == self.parent_res {
        // carried into the parent's own digits: done
        *self = Self::exhausted();
        return;
      }
      if i == self.skip_digit && self.current.digit(i) == Digit::K {
        // jump over the deleted subsequence; the next-coarser level
        // takes over skip duty
        self.increment_digit(i);
        self.skip_digit -= 1;
        return;
      }
      if self.current.digit(i) == Digit::Invalid {
        // the carry left a sentinel here; roll it over and continue
        // cascading at the next coarser level
        self.increment_digit(i);
      } else {
        break;
      }
      i -= 1;
    }
  }
}

impl Iterator for ChildIter {
  type Item = CellIndex;

  fn next(&mut self) -> Option<CellIndex> {
    if self.current == CellIndex::NULL {
      return None;
    }
    let cell = self.current;
    self.step();
    Some(cell)
  }
}
