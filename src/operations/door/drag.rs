use serde::{Deserialize, Serialize};

use crate::error::DoorError;
use crate::geometry::SharedWall;
use crate::math::Point2;

use super::placement::DoorId;
use super::store::DoorStore;
use super::WallProjection;

/// Pointer settings for door dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragParams {
    /// Pointer travel below which a press-release counts as a click.
    pub threshold: f64,
}

impl Default for DragParams {
    fn default() -> Self {
        Self { threshold: 5.0 }
    }
}

/// How a press on a door ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// The pointer never left the threshold radius.
    Click,
    /// The door was dragged; carries its final location.
    Moved(WallProjection),
}

/// An in-progress pointer gesture on a door.
#[derive(Debug, Clone)]
pub struct DoorDrag {
    door: DoorId,
    press: Point2,
    threshold: f64,
    last: Option<WallProjection>,
}

impl DoorDrag {
    /// Starts tracking a press on `door` at `at`.
    #[must_use]
    pub fn press(door: DoorId, at: Point2, params: &DragParams) -> Self {
        Self {
            door,
            press: at,
            threshold: params.threshold,
            last: None,
        }
    }

    /// The door being held.
    #[must_use]
    pub fn door(&self) -> DoorId {
        self.door
    }

    /// Returns `true` once the pointer has left the threshold radius.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }

    /// Handles a pointer move.
    ///
    /// Jitter inside the threshold radius is ignored and returns `Ok(None)`.
    /// Past it, the door slides along `wall`, which must be its own wall.
    ///
    /// # Errors
    ///
    /// Propagates [`DoorStore::move_to`] errors.
    pub fn pointer_moved(
        &mut self,
        store: &mut DoorStore,
        wall: &SharedWall,
        pointer: &Point2,
    ) -> Result<Option<WallProjection>, DoorError> {
        if self.last.is_none() && (pointer - self.press).norm() < self.threshold {
            return Ok(None);
        }
        let proj = store.move_to(self.door, wall, pointer)?;
        self.last = Some(proj);
        Ok(Some(proj))
    }

    /// Ends the gesture.
    #[must_use]
    pub fn release(self) -> DragOutcome {
        match self.last {
            Some(proj) => DragOutcome::Moved(proj),
            None => DragOutcome::Click,
        }
    }
}
