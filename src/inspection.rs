//! Whole-grid inspection helpers.

use crate::base_cells::{base_cell_to_cell, is_base_cell_pentagon};
use crate::constants::{ipow, MAX_RESOLUTION, NUM_BASE_CELLS, NUM_PENTAGONS};
use crate::error::{GridError, Result};
use crate::hierarchy::cell_to_center_child;
use crate::index::CellIndex;

/// Total number of cells at a resolution: `2 + 120 * 7^res`.
///
/// # Errors
///
/// `InvalidResolution` for a resolution outside 0..=15.
pub fn num_cells(res: i32) -> Result<i64> {
  if !(0..=MAX_RESOLUTION).contains(&res) {
    return Err(GridError::InvalidResolution);
  }
  Ok(2 + 120 * ipow(7, i64::from(res)))
}

/// The twelve pentagon cells at a resolution: the center descendants of
/// the pentagon base cells.
///
/// # Errors
///
/// `InvalidResolution` for a resolution outside 0..=15.
pub fn pentagons(res: i32) -> Result<Vec<CellIndex>> {
  if !(0..=MAX_RESOLUTION).contains(&res) {
    return Err(GridError::InvalidResolution);
  }
  let mut out = Vec::with_capacity(NUM_PENTAGONS as usize);
  for bc in 0..NUM_BASE_CELLS {
    if is_base_cell_pentagon(bc) {
      out.push(cell_to_center_child(base_cell_to_cell(bc), res)?);
    }
  }
  debug_assert_eq!(out.len(), NUM_PENTAGONS as usize);
  Ok(out)
}

/// All 122 resolution 0 cells.
#[must_use]
pub fn res0_cells() -> Vec<CellIndex> {
  (0..NUM_BASE_CELLS).map(base_cell_to_cell).collect()
}
