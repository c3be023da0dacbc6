//! Grid-space traversal: neighbors, rings, local frames, distances, lines.

pub mod disk;
pub mod local_ijk;
pub mod neighbor;
pub mod path;

pub use disk::{grid_disk, grid_disk_distances, grid_ring_unsafe, max_grid_disk_size};
pub use local_ijk::{cell_to_local_cube, local_cube_to_cell};
pub use neighbor::{are_neighbor_cells, neighbor_direction};
pub use path::{grid_distance, grid_path_cells, grid_path_cells_size};
