/// Error types for canvas validation, graph execution and the workflow service
///
/// The display strings are shown to end users verbatim, so they are kept short
/// and free of internal detail.

use thiserror::Error;

/// A canvas that cannot be accepted as a workflow graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("canvas must include valid node and edge arrays.")]
    InvalidCanvas,

    #[error("each node must have an id and a type.")]
    MissingNodeFields,

    #[error("node type not allowed: {0}")]
    UnknownNodeType(String),

    #[error("duplicate node: {0}")]
    DuplicateNode(String),

    #[error("node '{node_id}' has a non-numeric {axis} coordinate")]
    InvalidCoordinate { node_id: String, axis: &'static str },

    #[error("each connection must have a source and a target.")]
    MissingEdgeEndpoints,

    #[error("all connections must point to existing nodes.")]
    DanglingEdge,
}

/// A validated graph whose connections form at least one cycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("the flow contains cycles; an acyclic graph is required")]
pub struct CyclicGraphError {
    /// Some node lying on a cycle, for diagnostics only
    pub node_id: Option<String>,
}

/// Anything `validate` followed by `run` can fail with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Cyclic(#[from] CyclicGraphError),
}

/// Errors surfaced by the workflow service to its callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("workflow not found: {0}")]
    WorkflowNotFound(u64),

    #[error(transparent)]
    Flow(#[from] FlowError),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Flow(err.into())
    }
}

impl From<CyclicGraphError> for ServiceError {
    fn from(err: CyclicGraphError) -> Self {
        ServiceError::Flow(err.into())
    }
}

impl ServiceError {
    /// Every service error is caused by the request, never by the server
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// HTTP-style status a transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::WorkflowNotFound(_) => 404,
            ServiceError::Flow(_) => 400,
        }
    }
}
