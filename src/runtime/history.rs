/// In-memory run history
///
/// Stores every run summary under the run id chosen by the caller. The map
/// sits behind a `RwLock`: each write appends to one workflow's list in
/// place, and listings only take the read lock.

use crate::runtime::engine::RunResult;
use crate::runtime::executor::StepStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use uuid::Uuid;

/// A stored run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub run_id: Uuid,
    pub workflow_id: u64,
    pub status: StepStatus,
    pub summary: RunResult,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct RunHistory {
    /// Key: workflow id, Value: runs oldest first
    runs: RwLock<HashMap<u64, Vec<Arc<RunRecord>>>>,
}

impl Default for RunHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl RunHistory {
    pub fn new() -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
        }
    }

    /// Store a run summary under `run_id`
    pub fn record(&self, run_id: Uuid, workflow_id: u64, summary: RunResult) -> Arc<RunRecord> {
        let record = Arc::new(RunRecord {
            run_id,
            workflow_id,
            status: summary.status,
            summary,
            created_at: Utc::now(),
        });

        self.write()
            .entry(workflow_id)
            .or_default()
            .push(Arc::clone(&record));

        tracing::debug!(
            "Recorded run {} for workflow {} ({} steps)",
            run_id,
            workflow_id,
            record.summary.steps.len()
        );
        record
    }

    /// Most recent runs of a workflow, newest first
    pub fn list(&self, workflow_id: u64, limit: usize) -> Vec<Arc<RunRecord>> {
        self.read()
            .get(&workflow_id)
            .map(|runs| runs.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.read().values().map(Vec::len).sum()
    }

    /// Drop all runs of a deleted workflow
    pub fn forget(&self, workflow_id: u64) {
        self.write().remove(&workflow_id);
    }

    // Poisoning is ignored: every write is a single push or remove.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<u64, Vec<Arc<RunRecord>>>> {
        self.runs.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<u64, Vec<Arc<RunRecord>>>> {
        self.runs.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
