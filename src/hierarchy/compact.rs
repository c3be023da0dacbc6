//! Multi-resolution set compaction.
//!
//! A parent collapses when every one of its children is present: seven for
//! a hexagon parent, six for a pentagon. Collapsed parents re-enter the
//! pool one resolution coarser and the process repeats until resolution 0.

use crate::constants::MAX_RESOLUTION;
use crate::error::{GridError, Result};
use crate::hierarchy::{cell_to_children_size, cell_to_parent, ChildIter};
use crate::index::CellIndex;
use std::collections::HashMap;
use tracing::trace;

/// Compacts a cell set into the minimal mixed-resolution set covering the
/// same cells. Accepts same- or mixed-resolution input; `NULL` entries are
/// skipped.
///
/// # Errors
///
/// `InvalidCell` for an invalid index; `DuplicateInput` when the same cell
/// appears twice.
pub fn compact(cells: &[CellIndex]) -> Result<Vec<CellIndex>> {
  let mut pool: Vec<CellIndex> = Vec::with_capacity(cells.len());
  for &cell in cells {
    if cell == CellIndex::NULL {
      continue;
    }
    if !cell.is_valid_cell() {
      return Err(GridError::InvalidCell);
    }
    pool.push(cell);
  }

  pool.sort_unstable();
  if pool.windows(2).any(|w| w[0] == w[1]) {
    return Err(GridError::DuplicateInput);
  }

  let mut out: Vec<CellIndex> = Vec::new();

  while let Some(current_res) = pool.iter().map(|c| c.resolution()).max() {
    if current_res == 0 {
      // base cells cannot collapse further
      out.append(&mut pool);
      break;
    }

    // pull out the finest level; coarser cells wait for their turn
    let (level, rest): (Vec<_>, Vec<_>) = pool.into_iter().partition(|c| c.resolution() == current_res);
    pool = rest;

    let mut groups: HashMap<CellIndex, Vec<CellIndex>> = HashMap::new();
    for cell in level {
      let parent = cell_to_parent(cell, current_res - 1)?;
      groups.entry(parent).or_default().push(cell);
    }

    let mut promoted = 0usize;
    for (parent, members) in groups {
      if members.len() == parent.shape().num_children() {
        pool.push(parent);
        promoted += 1;
      } else {
        out.extend(members);
      }
    }
    trace!(res = current_res, promoted, "compaction round");

    // a promoted parent colliding with an input cell at the coarser level
    // means the input double-covered that area
    pool.sort_unstable();
    if pool.windows(2).any(|w| w[0] == w[1]) {
      return Err(GridError::DuplicateInput);
    }
  }

  out.sort_unstable();
  Ok(out)
}

/// Exact output size of [`uncompact`] for the given set and resolution.
///
/// # Errors
///
/// As [`uncompact`].
pub fn uncompact_size(cells: &[CellIndex], res: i32) -> Result<i64> {
  if !(0..=MAX_RESOLUTION).contains(&res) {
    return Err(GridError::InvalidResolution);
  }
  let mut count: i64 = 0;
  for &cell in cells {
    if cell == CellIndex::NULL {
      continue;
    }
    if !cell.is_valid_cell() {
      return Err(GridError::InvalidCell);
    }
    if cell.resolution() > res {
      return Err(GridError::ResolutionMismatch);
    }
    count = count.saturating_add(cell_to_children_size(cell, res)?);
  }
  Ok(count)
}

/// Expands a compacted set so every output cell has resolution `res`.
/// Cells already at the target resolution are kept; coarser cells are
/// replaced by their descendants.
///
/// # Errors
///
/// `InvalidResolution` when `res` is out of range; `ResolutionMismatch`
/// when an input cell is finer than `res`; `InvalidCell` for invalid
/// indexes.
pub fn uncompact(cells: &[CellIndex], res: i32) -> Result<Vec<CellIndex>> {
  let size = uncompact_size(cells, res)?;
  let mut out = Vec::with_capacity(size as usize);
  for &cell in cells {
    if cell == CellIndex::NULL {
      continue;
    }
    if cell.resolution() == res {
      out.push(cell);
    } else {
      out.extend(ChildIter::new(cell, res));
    }
  }
  debug_assert_eq!(out.len() as i64, size);
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::hierarchy::cell_to_children;

  #[test]
  fn test_compact_full_sibling_set() {
    let parent = CellIndex(0x85283473fffffff);
    let children = cell_to_children(parent, 6).unwrap();
    assert_eq!(compact(&children), Ok(vec![parent]));
  }

  #[test]
  fn test_compact_partial_set_unchanged() {
    let parent = CellIndex(0x85283473fffffff);
    let mut children = cell_to_children(parent, 6).unwrap();
    children.pop();
    let mut compacted = compact(&children).unwrap();
    compacted.sort_unstable();
    children.sort_unstable();
    assert_eq!(compacted, children, "six of seven children cannot collapse");
  }

  #[test]
  fn test_compact_two_levels() {
    // all grandchildren of one cell collapse straight back to it
    let parent = CellIndex(0x85283473fffffff);
    let grandchildren = cell_to_children(parent, 7).unwrap();
    assert_eq!(compact(&grandchildren), Ok(vec![parent]));
  }

  #[test]
  fn test_compact_pentagon_six_children() {
    let pent = crate::base_cells::base_cell_to_cell(4);
    let children = cell_to_children(pent, 1).unwrap();
    assert_eq!(children.len(), 6);
    assert_eq!(compact(&children), Ok(vec![pent]));
  }

  #[test]
  fn test_compact_duplicate_errors() {
    let cell = CellIndex(0x86283470fffffff);
    assert_eq!(compact(&[cell, cell]), Err(GridError::DuplicateInput));
  }

  #[test]
  fn test_compact_res0_passthrough() {
    let cells = [crate::base_cells::base_cell_to_cell(0), crate::base_cells::base_cell_to_cell(1)];
    let mut out = compact(&cells).unwrap();
    out.sort_unstable();
    assert_eq!(out, cells.to_vec());
  }

  #[test]
  fn test_uncompact_roundtrip() {
    let parent = CellIndex(0x85283473fffffff);
    let children = cell_to_children(parent, 6).unwrap();
    let compacted = compact(&children).unwrap();
    let mut expanded = uncompact(&compacted, 6).unwrap();
    expanded.sort_unstable();
    let mut expected = children;
    expected.sort_unstable();
    assert_eq!(expanded, expected);
  }

  #[test]
  fn test_uncompact_errors() {
    let cell = CellIndex(0x85283473fffffff);
    assert_eq!(uncompact(&[cell], 4), Err(GridError::ResolutionMismatch));
    assert_eq!(uncompact(&[cell], 16), Err(GridError::InvalidResolution));
    assert_eq!(uncompact_size(&[CellIndex::NULL], 5), Ok(0));
  }

  #[test]
  fn test_uncompact_size_pentagon() {
    let pent = crate::base_cells::base_cell_to_cell(4);
    assert_eq!(uncompact_size(&[pent], 1), Ok(6));
    assert_eq!(uncompact_size(&[pent], 2), Ok(41));
  }
}
