//! Region operations: polygon fill and boundary reconstruction.

pub mod bbox;
pub mod fill;
pub mod outline;
pub mod polygon;

pub use bbox::BBox;
pub use fill::{max_polygon_to_cells_size, polygon_to_cells};
pub use outline::{cells_to_linked_polygons, LinkedPolygon, PolygonOutline};
pub use polygon::Polygon;
