//! Geometry core of a facility-layout editor.
//!
//! Rooms are [`Shape`]s. From a snapshot of them the crate derives boundary
//! walls ([`extract_walls`]), finds walls two rooms have in common
//! ([`detect_shared_walls`]), keeps doors anchored on those walls
//! ([`DoorStore`], [`DoorDrag`]), checks with an external service whether
//! two rooms may be connected ([`ConnectionSession`]) and merges rectangles
//! into outline polygons ([`merge_rectangles`]).
//!
//! All geometry is pure: every call takes the current snapshot and returns
//! fresh results.

pub mod connection;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
mod params;

pub use connection::{ClassificationService, ConnectionSession, ValidationOutcome};
pub use error::{PlangeoError, Result};
pub use geometry::{Rect, Shape, ShapeId, SharedWall, WallSegment};
pub use operations::adjacency::{detect_shared_walls, find_shared_wall, AdjacencyParams};
pub use operations::door::{
    door_endpoints, position_from_normalized, project_point_onto_wall, DoorDrag, DoorStore,
};
pub use operations::merge::{merge_rectangles, MergedPolygon};
pub use operations::walls::extract_walls;
pub use params::LayoutParams;
