use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{AbortHandle, Abortable, Aborted, BoxFuture};
use futures::FutureExt;
use tracing::{debug, trace};

use crate::geometry::{Shape, ShapeId, SharedWall};
use crate::math::Point2;
use crate::operations::adjacency::{shared_walls_between, AdjacencyParams};
use crate::operations::door::{pick_wall, project_point_onto_wall, FlowType, WallProjection};

use super::classify::{ClassificationError, ClassificationService, ValidationOutcome};
use super::ConnectionError;

/// Identifies one validation request of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Where an in-progress connection attempt stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConnectionState {
    #[default]
    Idle,
    SelectSecondShape {
        first: ShapeId,
    },
    SelectEdgePoint {
        first: ShapeId,
        second: ShapeId,
    },
    Validating {
        first: ShapeId,
        second: ShapeId,
        point: Point2,
        flow_type: FlowType,
        ticket: Ticket,
    },
}

impl ConnectionState {
    fn describe(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SelectSecondShape { .. } => "selecting the second shape",
            Self::SelectEdgePoint { .. } => "selecting an edge point",
            Self::Validating { .. } => "validating",
        }
    }
}

/// What came back for a validation request.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Outcome(ValidationOutcome),
    Failed(ClassificationError),
    /// The request was cancelled before the service answered.
    Aborted,
}

/// Response message for a [`PendingValidation`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReply {
    pub ticket: Ticket,
    pub result: ValidationResult,
}

/// An in-flight classification request.
///
/// Resolves to a [`ValidationReply`] to be handed back to
/// [`ConnectionSession::complete`]. Cancelling the session makes it resolve
/// to [`ValidationResult::Aborted`] at the next poll.
pub struct PendingValidation {
    ticket: Ticket,
    inner: Abortable<BoxFuture<'static, Result<ValidationOutcome, ClassificationError>>>,
}

impl PendingValidation {
    #[must_use]
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }
}

impl Future for PendingValidation {
    type Output = ValidationReply;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let ticket = self.ticket;
        self.inner.poll_unpin(cx).map(|res| ValidationReply {
            ticket,
            result: match res {
                Ok(Ok(outcome)) => ValidationResult::Outcome(outcome),
                Ok(Err(err)) => ValidationResult::Failed(err),
                Err(Aborted) => ValidationResult::Aborted,
            },
        })
    }
}

/// A connection the policy accepted, snapped onto the shapes' common wall.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedConnection {
    pub first: ShapeId,
    pub second: ShapeId,
    pub wall: SharedWall,
    /// The picked point projected onto `wall`.
    pub projection: WallProjection,
    pub flow_type: FlowType,
    pub outcome: ValidationOutcome,
}

/// State machine for creating a connection between two shapes.
///
/// `Idle -> SelectSecondShape -> SelectEdgePoint -> Validating -> Idle`.
/// At most one validation is in flight; starting over or cancelling aborts
/// it and any reply that still arrives is rejected as stale.
#[derive(Debug, Default)]
pub struct ConnectionSession {
    state: ConnectionState,
    params: AdjacencyParams,
    next_ticket: u64,
    in_flight: Option<AbortHandle>,
}

impl ConnectionSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tolerances used to find the shared wall on acceptance.
    #[must_use]
    pub fn with_params(mut self, params: AdjacencyParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Starts a new attempt from `first`, abandoning any previous one.
    pub fn begin_connection(&mut self, first: ShapeId) {
        self.abort_in_flight();
        self.transition(ConnectionState::SelectSecondShape { first });
    }

    /// Picks the second shape. Picking the first shape again cancels.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::InvalidTransition`] unless a second shape
    /// is being selected; the state is left unchanged.
    pub fn advance_connection(&mut self, second: ShapeId) -> Result<(), ConnectionError> {
        let ConnectionState::SelectSecondShape { first } = &self.state else {
            return Err(self.invalid("pick a second shape"));
        };
        if *first == second {
            self.transition(ConnectionState::Idle);
            return Ok(());
        }
        let first = first.clone();
        self.transition(ConnectionState::SelectEdgePoint { first, second });
        Ok(())
    }

    /// Picks the door location and asks `service` to classify the pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::InvalidTransition`] unless an edge point
    /// is being selected; the state is left unchanged.
    pub fn resolve_edge_point(
        &mut self,
        point: Point2,
        flow_type: FlowType,
        service: &dyn ClassificationService,
    ) -> Result<PendingValidation, ConnectionError> {
        let ConnectionState::SelectEdgePoint { first, second } = &self.state else {
            return Err(self.invalid("resolve an edge point"));
        };
        let (first, second) = (first.clone(), second.clone());

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        let (inner, handle) = futures::future::abortable(service.classify(&first, &second));
        self.in_flight = Some(handle);

        self.transition(ConnectionState::Validating {
            first,
            second,
            point,
            flow_type,
            ticket,
        });
        Ok(PendingValidation { ticket, inner })
    }

    /// Returns to `Idle` from any state, discarding in-flight work.
    pub fn cancel_connection(&mut self) {
        self.abort_in_flight();
        self.transition(ConnectionState::Idle);
    }

    /// Applies the connection policy to a validation reply.
    ///
    /// Any reply for the current request returns the session to `Idle`,
    /// whatever the verdict. When the two shapes share several walls, the
    /// connection lands on the one nearest the picked point.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::Stale`] if `reply` is not for the pending
    ///   request; the state is left unchanged.
    /// - [`ConnectionError::Cancelled`] if the request was aborted.
    /// - [`ConnectionError::Classification`] if the service failed.
    /// - [`ConnectionError::Rejected`] if the service refused the pair.
    /// - [`ConnectionError::FlowTypeNotAllowed`] if the requested flow type
    ///   is not among the allowed ones.
    /// - [`ConnectionError::NoSharedEdge`] if the shapes have no common wall.
    pub fn complete(
        &mut self,
        reply: ValidationReply,
        shapes: &[Shape],
    ) -> Result<AcceptedConnection, ConnectionError> {
        match &self.state {
            ConnectionState::Validating { ticket, .. } if *ticket == reply.ticket => {}
            _ => {
                trace!(ticket = reply.ticket.0, "stale validation reply dropped");
                return Err(ConnectionError::Stale);
            }
        }
        self.in_flight = None;
        let ConnectionState::Validating {
            first,
            second,
            point,
            flow_type,
            ..
        } = mem::take(&mut self.state)
        else {
            return Err(ConnectionError::Stale);
        };
        debug!(ticket = reply.ticket.0, "validation finished, back to idle");

        let outcome = match reply.result {
            ValidationResult::Outcome(outcome) => outcome,
            ValidationResult::Failed(err) => return Err(err.into()),
            ValidationResult::Aborted => return Err(ConnectionError::Cancelled),
        };
        if !outcome.can_connect {
            return Err(ConnectionError::Rejected {
                message: outcome.message,
                details: outcome.details,
            });
        }
        if !outcome.allowed_flow_types.contains(&flow_type) {
            return Err(ConnectionError::FlowTypeNotAllowed {
                requested: flow_type,
                allowed: outcome.allowed_flow_types.into_iter().collect(),
            });
        }

        // The pair may share several walls; the picked point says which.
        let walls = shared_walls_between(shapes, &first, &second, &self.params);
        let Some(wall) = pick_wall(&walls, &point, f64::INFINITY).cloned() else {
            return Err(ConnectionError::NoSharedEdge { first, second });
        };
        let projection = project_point_onto_wall(&wall, &point);
        Ok(AcceptedConnection {
            first,
            second,
            wall,
            projection,
            flow_type,
            outcome,
        })
    }

    fn transition(&mut self, next: ConnectionState) {
        debug!(from = self.state.describe(), to = next.describe(), "connection state changed");
        self.state = next;
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    fn invalid(&self, action: &'static str) -> ConnectionError {
        ConnectionError::InvalidTransition {
            state: self.state.describe(),
            action,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::connection::ValidationStatus;
    use approx::assert_abs_diff_eq;
    use futures::executor::block_on;
    use futures::future;

    struct Fixed(Result<ValidationOutcome, ClassificationError>);

    impl ClassificationService for Fixed {
        fn classify(
            &self,
            _: &ShapeId,
            _: &ShapeId,
        ) -> BoxFuture<'static, Result<ValidationOutcome, ClassificationError>> {
            future::ready(self.0.clone()).boxed()
        }
    }

    struct Never;

    impl ClassificationService for Never {
        fn classify(
            &self,
            _: &ShapeId,
            _: &ShapeId,
        ) -> BoxFuture<'static, Result<ValidationOutcome, ClassificationError>> {
            future::pending().boxed()
        }
    }

    fn allow(types: &[FlowType]) -> Fixed {
        Fixed(Ok(ValidationOutcome::allowed(types.iter().copied())))
    }

    fn rooms() -> Vec<Shape> {
        vec![
            Shape::rectangle("a", 0.0, 0.0, 100.0, 100.0),
            Shape::rectangle("b", 100.0, 0.0, 100.0, 100.0),
        ]
    }

    fn at_edge_point(session: &mut ConnectionSession) {
        session.begin_connection("a".into());
        session.advance_connection("b".into()).unwrap();
    }

    fn run(
        session: &mut ConnectionSession,
        service: &dyn ClassificationService,
        flow_type: FlowType,
        shapes: &[Shape],
    ) -> Result<AcceptedConnection, ConnectionError> {
        at_edge_point(session);
        let pending = session
            .resolve_edge_point(Point2::new(95.0, 30.0), flow_type, service)
            .unwrap();
        let reply = block_on(pending);
        session.complete(reply, shapes)
    }

    #[test]
    fn picking_the_same_shape_cancels() {
        let mut session = ConnectionSession::new();
        session.begin_connection("a".into());
        session.advance_connection("a".into()).unwrap();
        assert_eq!(session.state(), &ConnectionState::Idle);
    }

    #[test]
    fn out_of_order_calls_are_rejected() {
        let mut session = ConnectionSession::new();
        let err = session.advance_connection("b".into()).unwrap_err();
        assert!(matches!(err, ConnectionError::InvalidTransition { state: "idle", .. }));

        session.begin_connection("a".into());
        let err = session
            .resolve_edge_point(Point2::origin(), FlowType::Waste, &allow(&[]))
            .err()
            .unwrap();
        assert!(matches!(err, ConnectionError::InvalidTransition { .. }));
        assert_eq!(
            session.state(),
            &ConnectionState::SelectSecondShape { first: "a".into() }
        );
    }

    #[test]
    fn accepted_connection_snaps_to_the_wall() {
        let mut session = ConnectionSession::new();
        let service = allow(&[FlowType::Personnel, FlowType::Material]);
        let accepted = run(&mut session, &service, FlowType::Personnel, &rooms()).unwrap();

        assert_eq!(accepted.wall.id.as_str(), "shared:a:b");
        assert_abs_diff_eq!(accepted.projection.position, Point2::new(100.0, 30.0), epsilon = 1e-9);
        assert_abs_diff_eq!(accepted.projection.normalized_position, 0.3, epsilon = 1e-9);
        assert_eq!(accepted.flow_type, FlowType::Personnel);
        assert_eq!(session.state(), &ConnectionState::Idle);
    }

    #[test]
    fn picked_point_selects_among_several_walls() {
        // A U-shaped room wraps a core on three sides.
        let u = Shape::polygon(
            "u",
            Point2::new(0.0, 0.0),
            300.0,
            200.0,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(100.0, 0.0),
                Point2::new(100.0, 100.0),
                Point2::new(200.0, 100.0),
                Point2::new(200.0, 0.0),
                Point2::new(300.0, 0.0),
                Point2::new(300.0, 200.0),
                Point2::new(0.0, 200.0),
            ],
        );
        let shapes = vec![u, Shape::rectangle("core", 100.0, 0.0, 100.0, 100.0)];
        let service = allow(&[FlowType::Material]);

        let mut session = ConnectionSession::new();
        session.begin_connection("u".into());
        session.advance_connection("core".into()).unwrap();
        let pending = session
            .resolve_edge_point(Point2::new(203.0, 50.0), FlowType::Material, &service)
            .unwrap();
        let accepted = session.complete(block_on(pending), &shapes).unwrap();
        assert_eq!(accepted.wall.id.as_str(), "shared:core:u:2");
        assert_abs_diff_eq!(accepted.projection.position, Point2::new(200.0, 50.0), epsilon = 1e-9);

        session.begin_connection("u".into());
        session.advance_connection("core".into()).unwrap();
        let pending = session
            .resolve_edge_point(Point2::new(150.0, 104.0), FlowType::Material, &service)
            .unwrap();
        let accepted = session.complete(block_on(pending), &shapes).unwrap();
        assert_eq!(accepted.wall.id.as_str(), "shared:core:u:1");
        assert_abs_diff_eq!(accepted.projection.position, Point2::new(150.0, 100.0), epsilon = 1e-9);
    }

    #[test]
    fn refusal_surfaces_message_and_details() {
        let mut session = ConnectionSession::new();
        let service = Fixed(Ok(ValidationOutcome::disallowed(
            ValidationStatus::Disallowed,
            "not compatible",
        )
        .with_details("grade A next to grade D")));
        let err = run(&mut session, &service, FlowType::Personnel, &rooms()).unwrap_err();
        match err {
            ConnectionError::Rejected { message, details } => {
                assert_eq!(message, "not compatible");
                assert_eq!(details.as_deref(), Some("grade A next to grade D"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(session.state(), &ConnectionState::Idle);
    }

    #[test]
    fn flow_type_outside_allowed_set() {
        let mut session = ConnectionSession::new();
        let service = allow(&[FlowType::Waste, FlowType::Material]);
        let err = run(&mut session, &service, FlowType::Personnel, &rooms()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "flow type personnel is not allowed here (allowed: material, waste)"
        );
        assert_eq!(session.state(), &ConnectionState::Idle);
    }

    #[test]
    fn allowed_but_not_adjacent() {
        let mut session = ConnectionSession::new();
        let apart = vec![
            Shape::rectangle("a", 0.0, 0.0, 100.0, 100.0),
            Shape::rectangle("b", 300.0, 0.0, 100.0, 100.0),
        ];
        let err = run(&mut session, &allow(&[FlowType::Waste]), FlowType::Waste, &apart).unwrap_err();
        assert!(matches!(err, ConnectionError::NoSharedEdge { .. }));
        assert_eq!(err.to_string(), "shapes must share a common edge");
        assert_eq!(session.state(), &ConnectionState::Idle);
    }

    #[test]
    fn service_failure_is_reported() {
        let mut session = ConnectionSession::new();
        let service = Fixed(Err(ClassificationError("timeout".into())));
        let err = run(&mut session, &service, FlowType::Waste, &rooms()).unwrap_err();
        assert!(matches!(err, ConnectionError::Classification(_)));
        assert_eq!(session.state(), &ConnectionState::Idle);
    }

    #[test]
    fn cancel_discards_in_flight_validation() {
        let mut session = ConnectionSession::new();
        at_edge_point(&mut session);
        let pending = session
            .resolve_edge_point(Point2::new(100.0, 50.0), FlowType::Waste, &Never)
            .unwrap();
        assert!(matches!(session.state(), ConnectionState::Validating { .. }));

        session.cancel_connection();
        let reply = block_on(pending);
        assert_eq!(reply.result, ValidationResult::Aborted);
        assert!(matches!(session.complete(reply, &rooms()), Err(ConnectionError::Stale)));
        assert_eq!(session.state(), &ConnectionState::Idle);
    }

    #[test]
    fn new_attempt_supersedes_pending_one() {
        let mut session = ConnectionSession::new();
        let service = allow(&[FlowType::Waste]);
        at_edge_point(&mut session);
        let old = session
            .resolve_edge_point(Point2::new(100.0, 50.0), FlowType::Waste, &service)
            .unwrap();

        at_edge_point(&mut session);
        let new = session
            .resolve_edge_point(Point2::new(100.0, 50.0), FlowType::Waste, &service)
            .unwrap();
        assert_ne!(old.ticket(), new.ticket());

        let old_reply = block_on(old);
        assert!(matches!(session.complete(old_reply, &rooms()), Err(ConnectionError::Stale)));
        assert!(matches!(session.state(), ConnectionState::Validating { .. }));

        let accepted = session.complete(block_on(new), &rooms()).unwrap();
        assert_eq!(accepted.first, ShapeId::from("a"));
    }
}
