/// Nodeflow: business process graphs with deterministic run traces
///
/// A process is a directed graph of typed steps. This library validates a
/// raw canvas into a `Graph`, orders it topologically and resolves every node
/// into a human-readable step result.

// Core configuration and setup
pub mod config;

// Typed errors shared by validation, execution and the service facade
pub mod error;

// Workflow layer - node/edge types, canvas validation and the workflow catalog
pub mod workflow;

// Runtime layer - topological execution, per-type resolvers and run history
pub mod runtime;

// In-process collaborator wiring catalog, engine and history together
pub mod service;

// Re-export commonly used types for external consumers
pub use error::{CyclicGraphError, FlowError, ServiceError, ValidationError};
pub use runtime::{run, RunResult, StepResult, StepStatus};
pub use service::WorkflowService;
pub use workflow::{validate, Edge, Graph, Node, NodeType};
