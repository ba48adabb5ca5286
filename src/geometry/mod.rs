//! 2D vector algebra and the collision primitives the arena is built on.

pub mod collision;
pub mod vector;

pub use collision::{circle_overlap, point_in_bounds, point_in_circle, segment_circle_intersect};
pub use vector::Vector2;
