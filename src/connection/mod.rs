//! Connection validation between two shapes.
//!
//! A [`ConnectionSession`] walks the host through picking two shapes and a
//! point on their common wall, asks a [`ClassificationService`] whether the
//! connection is permitted, and applies the local accept/reject policy to
//! the answer.

mod classify;
mod session;

pub use classify::{ClassificationError, ClassificationService, ValidationOutcome, ValidationStatus};
pub use session::{
    AcceptedConnection, ConnectionSession, ConnectionState, PendingValidation, Ticket, ValidationReply,
    ValidationResult,
};

use thiserror::Error;

use crate::geometry::ShapeId;
use crate::operations::door::FlowType;

/// Errors raised by the connection state machine and its policy.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("connection rejected: {message}")]
    Rejected {
        message: String,
        details: Option<String>,
    },

    #[error("flow type {requested} is not allowed here (allowed: {})", list_flow_types(.allowed))]
    FlowTypeNotAllowed {
        requested: FlowType,
        allowed: Vec<FlowType>,
    },

    #[error("shapes must share a common edge")]
    NoSharedEdge { first: ShapeId, second: ShapeId },

    #[error("connection validation was cancelled")]
    Cancelled,

    #[error("validation reply does not belong to the pending request")]
    Stale,

    #[error(transparent)]
    Classification(#[from] ClassificationError),
}

fn list_flow_types(types: &[FlowType]) -> String {
    if types.is_empty() {
        return "none".to_string();
    }
    types.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
