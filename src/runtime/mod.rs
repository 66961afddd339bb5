/// Runtime Execution Layer
///
/// This module runs validated graphs. It handles:
/// - Kahn-ordered topological execution
/// - Per-type outcome resolution
/// - Recording run summaries

// Ordering and result assembly
pub mod engine;

// Per-type node resolvers
pub mod executor;

// In-memory run history
pub mod history;

// Re-export main types
pub use engine::{execution_order, run, RunResult, StepResult};
pub use executor::{execute_node, Outcome, StepStatus};
pub use history::{RunHistory, RunRecord};
