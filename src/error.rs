//! Crate-wide error type.

#[cfg(feature = "serde")]
use serde_repr::{Deserialize_repr, Serialize_repr};
use thiserror::Error;

/// Failures of grid operations.
///
/// Three families: invalid input (`InvalidCell`, `InvalidLatLng`,
/// `InvalidResolution`, `ResolutionMismatch`, `DuplicateInput`), geometric
/// incomputability over individually valid inputs (`Pentagon`, `TooFar`,
/// `NotNeighbors`, `UnassignedHole`), and working-set exhaustion
/// (`CapacityExceeded`). `Internal` marks a violated invariant and is not
/// reachable from valid library usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize_repr, Deserialize_repr))]
#[repr(u8)]
pub enum GridError {
  /// The cell index argument is not a valid cell.
  #[error("invalid cell index")]
  InvalidCell = 1,
  /// Latitude or longitude is non-finite or out of range.
  #[error("latitude or longitude out of range")]
  InvalidLatLng = 2,
  /// Resolution is outside 0..=15.
  #[error("resolution out of range")]
  InvalidResolution = 3,
  /// The operation crossed a pentagon distortion it cannot represent.
  #[error("pentagon distortion encountered")]
  Pentagon = 4,
  /// The cells cannot be expressed in one local coordinate frame.
  #[error("cells are too far apart to compare")]
  TooFar = 5,
  /// The cell arguments have different resolutions.
  #[error("cell resolutions do not match")]
  ResolutionMismatch = 6,
  /// The cell arguments are not adjacent.
  #[error("cells are not neighbors")]
  NotNeighbors = 7,
  /// The input set contains the same cell more than once.
  #[error("duplicate cell in input set")]
  DuplicateInput = 8,
  /// A transient working set outgrew its proven bound.
  #[error("working-set capacity exceeded")]
  CapacityExceeded = 9,
  /// A hole loop could not be assigned to any outer loop.
  #[error("hole loop not contained by any outer loop")]
  UnassignedHole = 10,
  /// An internal invariant was violated; indicates a library bug.
  #[error("internal invariant violated")]
  Internal = 11,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;
