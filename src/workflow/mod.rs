/// Workflow Layer
///
/// This module handles workflow definitions and their validation:
/// - Type definitions (Node, NodeType, Edge, Graph)
/// - Canvas validation from raw JSON
/// - In-memory workflow catalog using ArcSwap

// Core workflow type definitions
pub mod types;

// Raw canvas to validated graph
pub mod validator;

// Lock-free catalog of saved workflows
pub mod registry;

// Re-export commonly used types
pub use registry::{WorkflowExport, WorkflowRecord, WorkflowRegistry, WorkflowSummary};
pub use types::{Edge, Graph, Node, NodeConfig, NodeType};
pub use validator::validate;
