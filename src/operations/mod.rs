pub mod adjacency;
pub mod door;
pub mod merge;
pub mod walls;
