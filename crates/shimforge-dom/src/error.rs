use shimforge_engine::ObjectError;
use thiserror::Error;

use crate::tree::NodeId;

/// Failures of tree mutation and selector evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("HierarchyRequestError: {0}")]
    HierarchyRequest(String),
    #[error("NotFoundError: {0}")]
    NotFound(String),
}

/// Script-visible failures surface as `TypeError` in the realm.
impl From<DomError> for ObjectError {
    fn from(err: DomError) -> Self {
        ObjectError::TypeError(err.to_string())
    }
}
