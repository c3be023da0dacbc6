//! K-rings: all cells within grid distance k of an origin.

use crate::constants::NUM_CELLS_MAX_RES;
use crate::coords::Digit;
use crate::error::{GridError, Result};
use crate::index::CellIndex;
use crate::traversal::neighbor::neighbor_rotations;

/// A k value large enough to cover every cell at the finest resolution;
/// the size formula is capped there.
const K_ALL_CELLS_AT_MAX_RES: i32 = 13_780_510;

/// Maximum number of cells in a k-ring disk: `3k(k+1) + 1`.
///
/// # Errors
///
/// `InvalidResolution` for negative `k`.
pub fn max_grid_disk_size(k: i32) -> Result<i64> {
  if k < 0 {
    return Err(GridError::InvalidResolution);
  }
  if k >= K_ALL_CELLS_AT_MAX_RES {
    return Ok(NUM_CELLS_MAX_RES);
  }
  let k = i64::from(k);
  Ok(3 * k * (k + 1) + 1)
}

/// Marks `cell` at `distance` in the output hash, then recurses into its
/// six neighbors. The output buffer doubles as an open-addressing hash
/// keyed by the index value; revisiting a cell by a longer path stops the
/// recursion.
fn disk_recurse(
  cell: CellIndex,
  k: i32,
  out: &mut [CellIndex],
  distances: &mut [i32],
  current_k: i32,
) -> Result<()> {
  if cell == CellIndex::NULL {
    return Ok(());
  }

  let capacity = out.len() as u64;
  let mut loc = (cell.0 % capacity) as usize;
  loop {
    if out[loc] == CellIndex::NULL {
      break;
    }
    if out[loc] == cell {
      if distances[loc] <= current_k {
        return Ok(());
      }
      break;
    }
    loc = (loc + 1) % capacity as usize;
  }

  out[loc] = cell;
  distances[loc] = current_k;

  if current_k >= k {
    return Ok(());
  }

  for dir in Digit::RING_DIRECTIONS {
    let mut rotations = 0;
    match neighbor_rotations(cell, dir, &mut rotations) {
      Ok(neighbor) => disk_recurse(neighbor, k, out, distances, current_k + 1)?,
      // no neighbor across a pentagon's deleted axis
      Err(GridError::Pentagon) => continue,
      Err(e) => return Err(e),
    }
  }
  Ok(())
}

/// All cells within grid distance `k` of `origin`, with their distances.
///
/// The returned buffers have length [`max_grid_disk_size`]`(k)` and are
/// laid out as a hash table: unused slots hold [`CellIndex::NULL`] and
/// callers must tolerate those sentinel entries. The non-null count equals
/// the closed-form size only when no pentagon lies within `k` steps.
///
/// # Errors
///
/// `InvalidResolution` for negative `k`; `InvalidCell` for an invalid
/// origin.
pub fn grid_disk_distances(origin: CellIndex, k: i32) -> Result<(Vec<CellIndex>, Vec<i32>)> {
  let size = max_grid_disk_size(k)? as usize;
  if !origin.is_valid_cell() {
    return Err(GridError::InvalidCell);
  }

  let mut out = vec![CellIndex::NULL; size];
  let mut distances = vec![0; size];
  disk_recurse(origin, k, &mut out, &mut distances, 0)?;
  Ok((out, distances))
}

/// All cells within grid distance `k` of `origin`. Same sentinel layout as
/// [`grid_disk_distances`].
///
/// # Errors
///
/// As [`grid_disk_distances`].
pub fn grid_disk(origin: CellIndex, k: i32) -> Result<Vec<CellIndex>> {
  grid_disk_distances(origin, k).map(|(cells, _)| cells)
}

/// Only the hollow ring of cells at exactly distance `k`, by walking the
/// ring boundary directly.
///
/// The direct walk cannot represent pentagon distortion: if any cell on or
/// inside the ring path is a pentagon the walk fails outright with
/// `Pentagon` and no partial output. That failure contract is load-bearing;
/// callers needing pentagon tolerance should filter
/// [`grid_disk_distances`] instead.
///
/// # Errors
///
/// `InvalidResolution` for negative `k`; `InvalidCell` for an invalid
/// origin; `Pentagon` per the contract above.
pub fn grid_ring_unsafe(origin: CellIndex, k: i32) -> Result<Vec<CellIndex>> {
  if k < 0 {
    return Err(GridError::InvalidResolution);
  }
  if !origin.is_valid_cell() {
    return Err(GridError::InvalidCell);
  }
  if k == 0 {
    return Ok(vec![origin]);
  }

  let expected = (6 * k) as usize;
  let mut out = Vec::with_capacity(expected);

  let mut rotations = 0;
  let mut current = origin;
  if current.is_pentagon() {
    return Err(GridError::Pentagon);
  }

  // move out to the first cell of ring k
  for _ in 0..k {
    current = neighbor_rotations(current, Digit::I, &mut rotations)?;
    if current.is_pentagon() {
      return Err(GridError::Pentagon);
    }
  }

  let first = current;
  out.push(current);

  for side in Digit::RING_DIRECTIONS {
    for _ in 0..k {
      current = neighbor_rotations(current, side, &mut rotations)?;
      if current.is_pentagon() {
        return Err(GridError::Pentagon);
      }
      if out.len() < expected {
        out.push(current);
      } else if current != first {
        // the walk failed to close on itself: distortion
        return Err(GridError::Pentagon);
      }
    }
  }

  if out.len() != expected || current != first {
    return Err(GridError::Pentagon);
  }
  Ok(out)
}
