use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::error::DoorError;
use crate::geometry::{SharedWall, SharedWallId, WallSpan};
use crate::math::distance_2d::point_to_line_dist;
use crate::math::Point2;
use crate::operations::adjacency::{is_parallel, AdjacencyParams};

use super::placement::{DoorId, DoorPlacement, DoorSpec, FlowDirection, FlowType};
use super::{position_from_normalized, project_point_onto_wall, WallProjection};

/// Arena that owns the doors of a layout.
///
/// Doors reference their wall by [`SharedWallId`] only; walls themselves are
/// recomputed by the host on every shape change and fed back through
/// [`DoorStore::reanchor`].
#[derive(Debug, Default)]
pub struct DoorStore {
    doors: SlotMap<DoorId, DoorPlacement>,
}

impl DoorStore {
    /// Creates a new, empty door store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a door on `wall` at the projection of `point`.
    ///
    /// # Errors
    ///
    /// Returns [`DoorError::InvalidWidth`] if the width is not positive and
    /// finite.
    pub fn place(&mut self, wall: &SharedWall, point: &Point2, spec: DoorSpec) -> Result<DoorId, DoorError> {
        if !(spec.width.is_finite() && spec.width > 0.0) {
            return Err(DoorError::InvalidWidth(spec.width));
        }
        let proj = project_point_onto_wall(wall, point);
        let id = self.doors.insert_with_key(|id| DoorPlacement {
            id,
            shared_wall_id: wall.id.clone(),
            shape1: wall.shape1.clone(),
            shape2: wall.shape2.clone(),
            position: proj.position,
            normalized_position: proj.normalized_position,
            wall_angle: wall.angle,
            width: spec.width,
            flow_type: spec.flow_type,
            flow_direction: spec.flow_direction,
        });
        debug!(wall = %wall.id, t = proj.normalized_position, "door placed");
        Ok(id)
    }

    /// Returns a reference to the door, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DoorError::NotFound`] if the id is stale.
    pub fn door(&self, id: DoorId) -> Result<&DoorPlacement, DoorError> {
        self.doors.get(id).ok_or(DoorError::NotFound)
    }

    fn door_on_wall_mut(&mut self, id: DoorId, wall: &SharedWall) -> Result<&mut DoorPlacement, DoorError> {
        let door = self.doors.get_mut(id).ok_or(DoorError::NotFound)?;
        if door.shared_wall_id != wall.id {
            return Err(DoorError::WrongWall {
                expected: door.shared_wall_id.to_string(),
                actual: wall.id.to_string(),
            });
        }
        Ok(door)
    }

    /// Slides the door to the projection of `point` onto its own wall.
    ///
    /// # Errors
    ///
    /// Returns [`DoorError::NotFound`] for a stale id and
    /// [`DoorError::WrongWall`] if `wall` is not the door's wall.
    pub fn move_to(&mut self, id: DoorId, wall: &SharedWall, point: &Point2) -> Result<WallProjection, DoorError> {
        let door = self.door_on_wall_mut(id, wall)?;
        let proj = project_point_onto_wall(wall, point);
        door.position = proj.position;
        door.normalized_position = proj.normalized_position;
        door.wall_angle = wall.angle;
        Ok(proj)
    }

    /// Moves the door to normalized location `t` on its own wall.
    ///
    /// # Errors
    ///
    /// Same as [`DoorStore::move_to`].
    pub fn set_normalized_position(&mut self, id: DoorId, wall: &SharedWall, t: f64) -> Result<Point2, DoorError> {
        let door = self.door_on_wall_mut(id, wall)?;
        let position = position_from_normalized(wall, t);
        door.position = position;
        door.normalized_position = project_point_onto_wall(wall, &position).normalized_position;
        door.wall_angle = wall.angle;
        Ok(position)
    }

    /// Changes what flows through the door.
    ///
    /// # Errors
    ///
    /// Returns [`DoorError::NotFound`] if the id is stale.
    pub fn reconfigure(&mut self, id: DoorId, flow_type: FlowType, flow_direction: FlowDirection) -> Result<(), DoorError> {
        let door = self.doors.get_mut(id).ok_or(DoorError::NotFound)?;
        door.flow_type = flow_type;
        door.flow_direction = flow_direction;
        Ok(())
    }

    /// Deletes the door and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`DoorError::NotFound`] if the id is stale.
    pub fn remove(&mut self, id: DoorId) -> Result<DoorPlacement, DoorError> {
        self.doors.remove(id).ok_or(DoorError::NotFound)
    }

    /// Re-seats every door on the freshly detected `walls` using the default
    /// adjacency tolerances. See [`DoorStore::reanchor_with`].
    pub fn reanchor(&mut self, walls: &[SharedWall]) -> Vec<DoorId> {
        self.reanchor_with(walls, &AdjacencyParams::default())
    }

    /// Re-seats every door on the freshly detected `walls`.
    ///
    /// Doors keep their normalized position, so a door halfway along a wall
    /// stays halfway when the wall grows or moves.
    ///
    /// A door only follows a wall that still lies on its line. Ids number the
    /// walls of a pair in detection order, so when a pair loses a wall the
    /// remaining ones may be renumbered: a door whose id now names another
    /// stretch moves to the pair's wall on its line and takes over that id.
    /// Doors with no such wall are left untouched and returned for the host
    /// to handle.
    pub fn reanchor_with(&mut self, walls: &[SharedWall], params: &AdjacencyParams) -> Vec<DoorId> {
        let mut orphans = Vec::new();
        for (id, door) in &mut self.doors {
            let wall = walls
                .iter()
                .find(|w| w.id == door.shared_wall_id)
                .filter(|w| lies_on(door, w, params))
                .or_else(|| {
                    walls
                        .iter()
                        .find(|w| w.connects(&door.shape1, &door.shape2) && lies_on(door, w, params))
                });
            let Some(wall) = wall else {
                orphans.push(id);
                continue;
            };
            if wall.id != door.shared_wall_id {
                trace!(from = %door.shared_wall_id, to = %wall.id, "door follows renumbered wall");
                door.shared_wall_id = wall.id.clone();
            }
            door.position = position_from_normalized(wall, door.normalized_position);
            door.wall_angle = wall.angle;
            door.shape1 = wall.shape1.clone();
            door.shape2 = wall.shape2.clone();
        }
        if !orphans.is_empty() {
            debug!(orphans = orphans.len(), "doors lost their wall");
        }
        orphans
    }

    /// Iterates over all doors.
    pub fn iter(&self) -> impl Iterator<Item = &DoorPlacement> {
        self.doors.values()
    }

    /// Iterates over the doors sitting on `wall_id`.
    pub fn doors_on<'a>(&'a self, wall_id: &'a SharedWallId) -> impl Iterator<Item = &'a DoorPlacement> {
        self.doors.values().filter(move |d| &d.shared_wall_id == wall_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.doors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }
}

/// Returns `true` if `wall` runs along the line the door sits on.
fn lies_on(door: &DoorPlacement, wall: &SharedWall, params: &AdjacencyParams) -> bool {
    is_parallel(door.wall_angle, wall.angle, params.angle_tolerance)
        && point_to_line_dist(&door.position, &wall.start, &wall.direction()) < params.distance_tolerance
}
