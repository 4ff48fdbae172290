use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{ShapeId, SharedWall, SharedWallId};
use crate::math::{Point2, TOLERANCE};

use super::door_endpoints;

slotmap::new_key_type! {
    /// Unique identifier for a door in a [`DoorStore`](super::DoorStore).
    pub struct DoorId;
}

/// Category of traffic a door lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Material,
    Personnel,
    Waste,
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Material => "material",
            Self::Personnel => "personnel",
            Self::Waste => "waste",
        })
    }
}

/// Which way a one-way door lets traffic pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnidirectionalDirection {
    FromFirstToSecond,
    FromSecondToFirst,
}

/// Traffic direction through a door.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "direction", rename_all = "camelCase")]
pub enum FlowDirection {
    #[default]
    Bidirectional,
    Unidirectional(UnidirectionalDirection),
}

/// What the host asks for when it places a new door.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorSpec {
    /// Span along the wall, in layout units.
    pub width: f64,
    pub flow_type: FlowType,
    #[serde(default)]
    pub flow_direction: FlowDirection,
}

impl DoorSpec {
    /// A bidirectional door of the given width and flow type.
    #[must_use]
    pub fn new(width: f64, flow_type: FlowType) -> Self {
        Self {
            width,
            flow_type,
            flow_direction: FlowDirection::Bidirectional,
        }
    }

    #[must_use]
    pub fn with_direction(mut self, direction: FlowDirection) -> Self {
        self.flow_direction = direction;
        self
    }
}

/// A door sitting on a shared wall.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorPlacement {
    pub id: DoorId,
    pub shared_wall_id: SharedWallId,
    pub shape1: ShapeId,
    pub shape2: ShapeId,
    /// Door centre on the wall.
    pub position: Point2,
    /// Location of `position` along the wall, in `[0, 1]`.
    pub normalized_position: f64,
    /// Direction of the wall the door was last anchored to, in radians.
    pub wall_angle: f64,
    pub width: f64,
    pub flow_type: FlowType,
    pub flow_direction: FlowDirection,
}

impl DoorPlacement {
    /// The two ends of the door opening, `±width/2` along the wall.
    #[must_use]
    pub fn endpoints(&self, wall: &SharedWall) -> (Point2, Point2) {
        door_endpoints(wall, &self.position, self.width)
    }

    /// Returns `true` if the door is no wider than the wall.
    #[must_use]
    pub fn fits(&self, wall: &SharedWall) -> bool {
        self.width <= wall.length + TOLERANCE
    }

    /// For one-way doors, the `(from, to)` shapes. `None` when bidirectional.
    #[must_use]
    pub fn one_way(&self) -> Option<(&ShapeId, &ShapeId)> {
        match self.flow_direction {
            FlowDirection::Bidirectional => None,
            FlowDirection::Unidirectional(UnidirectionalDirection::FromFirstToSecond) => {
                Some((&self.shape1, &self.shape2))
            }
            FlowDirection::Unidirectional(UnidirectionalDirection::FromSecondToFirst) => {
                Some((&self.shape2, &self.shape1))
            }
        }
    }
}
