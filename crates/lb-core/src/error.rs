use crate::id::ElementId;
use thiserror::Error;

/// Integrity failures when committing elements to a [`DiagramModel`](crate::DiagramModel).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("element {0} is already part of the diagram")]
    DuplicateId(ElementId),

    #[error("link {link} refers to box {endpoint}, which is not in the diagram")]
    DanglingEndpoint { link: ElementId, endpoint: ElementId },
}
