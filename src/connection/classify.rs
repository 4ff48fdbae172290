use std::collections::BTreeSet;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::ShapeId;
use crate::operations::door::FlowType;

/// Verdict category returned by the classification service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationStatus {
    Allowed,
    #[default]
    Disallowed,
    /// One of the shapes has no classification to check against.
    NoClassification,
}

/// Answer to "may these two shapes be connected, and with what?".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOutcome {
    pub can_connect: bool,
    pub allowed_flow_types: BTreeSet<FlowType>,
    pub status: ValidationStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ValidationOutcome {
    /// A positive answer permitting `flow_types`.
    pub fn allowed(flow_types: impl IntoIterator<Item = FlowType>) -> Self {
        Self {
            can_connect: true,
            allowed_flow_types: flow_types.into_iter().collect(),
            status: ValidationStatus::Allowed,
            message: String::new(),
            details: None,
        }
    }

    /// A negative answer.
    pub fn disallowed(status: ValidationStatus, message: impl Into<String>) -> Self {
        Self {
            can_connect: false,
            allowed_flow_types: BTreeSet::new(),
            status,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Failure reported by the classification service itself, as opposed to a
/// negative verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("classification service failed: {0}")]
pub struct ClassificationError(pub String);

/// The external oracle that knows which rooms may be connected.
///
/// Implementations typically wrap a remote call. The returned future must
/// not borrow from `self` so it can be awaited after the session moves on.
pub trait ClassificationService {
    fn classify(
        &self,
        first: &ShapeId,
        second: &ShapeId,
    ) -> BoxFuture<'static, Result<ValidationOutcome, ClassificationError>>;
}
