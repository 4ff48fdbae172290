//! Walks a small cleanroom layout through the whole pipeline and logs what
//! the core computes.
//!
//! Usage:
//! ```text
//! cargo run --example layout
//! RUST_LOG=plangeo=debug cargo run --example layout
//! ```

use std::collections::BTreeMap;

use futures::executor::block_on;
use futures::future::{self, BoxFuture, FutureExt};
use plangeo::connection::{ClassificationError, ValidationStatus};
use plangeo::geometry::Rect;
use plangeo::math::Point2;
use plangeo::operations::door::{DoorSpec, DragOutcome, FlowType};
use plangeo::{
    detect_shared_walls, extract_walls, merge_rectangles, ClassificationService, ConnectionSession,
    DoorDrag, DoorStore, LayoutParams, Shape, ShapeId, ValidationOutcome,
};
use tracing::{info, warn};

/// Cleanroom grades: rooms may only be connected to the same or a
/// neighbouring grade.
struct GradeRules {
    grades: BTreeMap<ShapeId, u8>,
}

impl ClassificationService for GradeRules {
    fn classify(
        &self,
        first: &ShapeId,
        second: &ShapeId,
    ) -> BoxFuture<'static, Result<ValidationOutcome, ClassificationError>> {
        let outcome = match (self.grades.get(first), self.grades.get(second)) {
            (Some(a), Some(b)) if a.abs_diff(*b) <= 1 => {
                ValidationOutcome::allowed([FlowType::Personnel, FlowType::Material])
            }
            (Some(a), Some(b)) => ValidationOutcome::disallowed(
                ValidationStatus::Disallowed,
                format!("grade {a} cannot open onto grade {b}"),
            ),
            _ => ValidationOutcome::disallowed(ValidationStatus::NoClassification, "unclassified room"),
        };
        future::ready(Ok(outcome)).boxed()
    }
}

fn main() -> plangeo::Result<()> {
    // Default: WARN for everything, INFO for the demo and the library.
    // Override with RUST_LOG (e.g. RUST_LOG=plangeo=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("layout=info".parse().unwrap_or_default())
        .add_directive("plangeo=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let params = LayoutParams::default();
    let shapes = vec![
        Shape::rectangle("gowning", 0.0, 0.0, 200.0, 150.0),
        Shape::rectangle("fill", 200.0, 0.0, 300.0, 150.0),
        Shape::rectangle("corridor", 0.0, 150.0, 500.0, 80.0),
        Shape::rectangle("storage", 600.0, 0.0, 100.0, 100.0),
    ];

    let walls = extract_walls(&shapes);
    info!(shapes = shapes.len(), segments = walls.len(), "walls extracted");

    let shared = detect_shared_walls(&shapes);
    for wall in &shared {
        info!(id = %wall.id, length = wall.length, "shared wall");
    }

    let rules = GradeRules {
        grades: [("gowning", 2), ("fill", 1), ("corridor", 3), ("storage", 3)]
            .into_iter()
            .map(|(id, grade)| (ShapeId::from(id), grade))
            .collect(),
    };

    let mut doors = DoorStore::new();
    let mut session = ConnectionSession::new().with_params(params.adjacency);
    for (a, b, pick) in [
        ("gowning", "fill", Point2::new(200.0, 60.0)),
        ("fill", "corridor", Point2::new(350.0, 150.0)),
        ("corridor", "storage", Point2::new(550.0, 100.0)),
    ] {
        session.begin_connection(a.into());
        session.advance_connection(b.into())?;
        let pending = session.resolve_edge_point(pick, FlowType::Personnel, &rules)?;
        match session.complete(block_on(pending), &shapes) {
            Ok(accepted) => {
                let id = doors.place(
                    &accepted.wall,
                    &accepted.projection.position,
                    DoorSpec::new(40.0, accepted.flow_type),
                )?;
                info!(?id, wall = %accepted.wall.id, t = accepted.projection.normalized_position, "door placed");
            }
            Err(err) => warn!(first = a, second = b, %err, "connection refused"),
        }
    }

    let first_door = doors.iter().next().map(|d| (d.id, d.clone()));
    if let Some((id, door)) = first_door {
        if let Some(wall) = shared.iter().find(|w| w.id == door.shared_wall_id) {
            let mut drag = DoorDrag::press(id, door.position, &params.drag);
            drag.pointer_moved(&mut doors, wall, &Point2::new(210.0, 120.0))?;
            if let DragOutcome::Moved(at) = drag.release() {
                info!(x = at.position.x, y = at.position.y, t = at.normalized_position, "door dragged");
            }
        }
    }

    let outline = merge_rectangles(
        &shapes
            .iter()
            .take(3)
            .map(Shape::bounds)
            .collect::<Vec<Rect>>(),
    )?;
    info!(vertices = outline.len(), area = outline.area(), "merged outline");

    Ok(())
}
