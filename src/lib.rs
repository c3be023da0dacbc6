#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)] // fixed-width grid math casts are checked by construction
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unreadable_literal)] // reference constants read better unbroken
#![allow(clippy::similar_names)]

//! `hexsphere` is a hierarchical hexagonal discrete global grid.
//!
//! Points and regions on the sphere map to and from compact 64-bit cell
//! indexes ([`CellIndex`]); on top of the indexing sit grid-space
//! algorithms: neighbor rings, grid distances and lines, polygon-to-cell
//! filling, multi-resolution set compaction, and reconstruction of polygon
//! outlines from cell sets.
//!
//! The grid tiles an icosahedron with hexagons at 16 resolutions; twelve
//! cells per resolution are pentagons, and the pentagon distortion is
//! threaded through every traversal routine via the tables in
//! [`index::topology`].
//!
//! All operations are synchronous pure functions over in-memory values:
//! no I/O, no shared mutable state, no internal parallelism. The static
//! geometric tables are process-wide immutable data, safe to share across
//! threads without synchronization.

pub mod base_cells;
pub mod constants;
pub mod coords;
pub mod error;
pub mod geo;
pub mod hierarchy;
pub mod index;
pub mod indexing;
pub mod inspection;
pub mod math;
pub mod projection;
pub mod region;
pub mod traversal;

pub use constants::MAX_RESOLUTION;
pub use coords::{CellBoundary, CubeCoord, Digit, FaceCoord};
pub use error::{GridError, Result};
pub use geo::{great_circle_distance_km, great_circle_distance_m, great_circle_distance_rads, GeoCoord};
pub use hierarchy::{
  cell_to_center_child, cell_to_children, cell_to_children_size, cell_to_parent, compact, uncompact,
  uncompact_size, ChildIter,
};
pub use index::{CellIndex, CellShape};
pub use indexing::{cell_to_boundary, cell_to_geo, geo_to_cell};
pub use inspection::{num_cells, pentagons, res0_cells};
pub use region::{
  cells_to_linked_polygons, max_polygon_to_cells_size, polygon_to_cells, BBox, LinkedPolygon, Polygon,
  PolygonOutline,
};
pub use traversal::{
  are_neighbor_cells, grid_disk, grid_disk_distances, grid_distance, grid_path_cells, grid_path_cells_size,
  grid_ring_unsafe, max_grid_disk_size, neighbor_direction,
};
