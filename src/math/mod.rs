pub mod distance_2d;
pub mod polygon_2d;

/// 2D point type. Layout coordinates are screen-style: x to the right, y down.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
