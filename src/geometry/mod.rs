pub mod rect;
pub mod shape;
pub mod wall;

pub use rect::Rect;
pub use shape::{Shape, ShapeId, ShapeOutline};
pub use wall::{normal_from_angle, SharedWall, SharedWallId, WallSegment, WallSpan};
