pub mod geometry;
pub mod id;
pub mod input;
pub mod sphere;
pub mod style;

pub use geometry::{Geometry, GeometryKind, is_rectangle, rectangle_angle, segment_angle};
pub use id::{FeatureId, LayerId};
pub use input::{parse_input_float, parse_number};
pub use style::IgnStyle;

// Re-export kurbo types so downstream crates don't need a direct dependency
pub use kurbo::{Point, Vec2};
