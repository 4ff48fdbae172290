use serde::{Deserialize, Serialize};

use crate::operations::adjacency::AdjacencyParams;
use crate::operations::door::DragParams;

/// All tunable tolerances of the layout core in one place.
///
/// Every field falls back to its default when missing, so a host can load a
/// partial JSON document:
///
/// ```
/// let params: plangeo::LayoutParams =
///     serde_json::from_str(r#"{ "adjacency": { "min_overlap": 4.0 } }"#).unwrap();
/// assert_eq!(params.adjacency.min_overlap, 4.0);
/// assert_eq!(params.drag.threshold, 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub adjacency: AdjacencyParams,
    pub drag: DragParams,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = LayoutParams::default();
        assert_eq!(params.adjacency.distance_tolerance, 5.0);
        assert!(!params.adjacency.broad_phase);
        assert_eq!(params.drag.threshold, 5.0);
    }

    #[test]
    fn empty_document_gives_defaults() {
        let params: LayoutParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, LayoutParams::default());
    }
}
