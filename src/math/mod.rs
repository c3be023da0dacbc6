//! Small planar and 3-D vector helpers used by the projection.

pub mod vec2;
pub mod vec3;

pub use vec2::Vec2;
pub use vec3::Vec3;
