/// Service setup and initialization
///
/// Wires the workflow catalog, the execution engine and the run history into
/// a single facade that a transport layer (or the bundled binary) can call.
/// Stored canvases were validated on save; ad-hoc canvases go through
/// `validate` then `run`.

use crate::{
    config::Config,
    error::{FlowError, ServiceError},
    runtime::{engine, history::RunHistory, RunRecord, RunResult},
    workflow::{
        registry::{WorkflowExport, WorkflowRecord, WorkflowRegistry, WorkflowSummary},
        types::{node_type_catalog, NodeType},
        validator::validate,
    },
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Initialize the tracing subscriber from configuration
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init_tracing(config: &Config) {
    let level = config
        .logging
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .with_max_level(level)
        .try_init();
}

/// Catalog-wide counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_workflows: usize,
    pub total_runs: usize,
    pub node_types_available: usize,
}

/// In-process workflow service
#[derive(Debug)]
pub struct WorkflowService {
    config: Config,
    registry: WorkflowRegistry,
    history: RunHistory,
}

impl WorkflowService {
    pub fn new(config: Config) -> Self {
        let registry = WorkflowRegistry::new();
        if config.catalog.seed_demo {
            registry.seed_demo();
        }
        tracing::info!("✅ Workflow service ready ({} workflows)", registry.len());

        Self {
            config,
            registry,
            history: RunHistory::new(),
        }
    }

    /// Available node types as (name, default label)
    pub fn node_types(&self) -> Vec<(&'static str, &'static str)> {
        node_type_catalog()
    }

    pub fn create_workflow(&self, name: &str, description: &str) -> u64 {
        self.registry.create(name, description)
    }

    pub fn list_workflows(&self) -> Vec<WorkflowSummary> {
        self.registry.list()
    }

    pub fn get_workflow(&self, id: u64) -> Result<Arc<WorkflowRecord>, ServiceError> {
        self.registry.get(id)
    }

    pub fn update_workflow(
        &self,
        id: u64,
        name: &str,
        description: &str,
        raw_canvas: &Value,
    ) -> Result<Arc<WorkflowRecord>, ServiceError> {
        self.registry.update(id, name, description, raw_canvas)
    }

    /// Delete a workflow together with its runs
    pub fn delete_workflow(&self, id: u64) -> Result<(), ServiceError> {
        if !self.registry.delete(id) {
            return Err(ServiceError::WorkflowNotFound(id));
        }
        self.history.forget(id);
        Ok(())
    }

    pub fn duplicate_workflow(&self, id: u64) -> Result<u64, ServiceError> {
        self.registry.duplicate(id)
    }

    pub fn export_workflow(&self, id: u64) -> Result<WorkflowExport, ServiceError> {
        self.registry.export(id)
    }

    /// Run a stored workflow and record the result under a fresh run id
    pub fn run_workflow(&self, id: u64) -> Result<(Uuid, RunResult), ServiceError> {
        let record = self.registry.get(id)?;
        tracing::info!("🚀 Run requested for workflow {} ({})", id, record.name);

        let result = engine::run(&record.canvas).inspect_err(|e| {
            tracing::warn!("Run of workflow {} rejected: {}", id, e);
        })?;

        let run_id = Uuid::new_v4();
        self.record_run(id, run_id, &result)?;
        tracing::info!("🎉 Workflow {} run {} finished with {} steps", id, run_id, result.steps.len());
        Ok((run_id, result))
    }

    /// Store a finished run, unless its workflow was deleted meanwhile
    ///
    /// `delete_workflow` removes the record before forgetting its runs, so a
    /// run stored after that forget always sees the record gone here.
    fn record_run(&self, id: u64, run_id: Uuid, result: &RunResult) -> Result<(), ServiceError> {
        self.history.record(run_id, id, result.clone());
        if self.registry.get(id).is_err() {
            tracing::warn!("Workflow {} was deleted during run {}", id, run_id);
            self.history.forget(id);
            return Err(ServiceError::WorkflowNotFound(id));
        }
        Ok(())
    }

    /// Validate and run a canvas without storing anything
    pub fn run_canvas(&self, raw_canvas: &Value) -> Result<RunResult, FlowError> {
        let graph = validate(raw_canvas)?;
        Ok(engine::run(&graph)?)
    }

    /// Recent runs of a workflow, newest first
    pub fn list_runs(&self, id: u64) -> Vec<Arc<RunRecord>> {
        self.history.list(id, self.config.runs.list_limit)
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total_workflows: self.registry.len(),
            total_runs: self.history.total(),
            node_types_available: NodeType::ALL.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogConfig, LoggingConfig, RunsConfig};

    fn service() -> WorkflowService {
        WorkflowService::new(Config {
            logging: LoggingConfig { level: "warn".to_string() },
            runs: RunsConfig { list_limit: 20 },
            catalog: CatalogConfig { seed_demo: true },
        })
    }

    #[test]
    fn run_finishing_after_delete_leaves_no_history() {
        let service = service();
        let id = service.list_workflows()[0].id;
        let record = service.get_workflow(id).unwrap();
        let result = engine::run(&record.canvas).unwrap();

        service.delete_workflow(id).unwrap();
        let err = service.record_run(id, Uuid::new_v4(), &result).unwrap_err();

        assert_eq!(err, ServiceError::WorkflowNotFound(id));
        assert!(service.list_runs(id).is_empty());
        assert_eq!(service.stats().total_runs, 0);
    }

    #[test]
    fn run_of_live_workflow_is_kept() {
        let service = service();
        let id = service.list_workflows()[0].id;
        let result = service.run_canvas(&crate::workflow::registry::demo_canvas()).unwrap();
        service.record_run(id, Uuid::new_v4(), &result).unwrap();
        assert_eq!(service.stats().total_runs, 1);
    }
}
