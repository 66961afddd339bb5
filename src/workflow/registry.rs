/// Workflow catalog using ArcSwap
///
/// Keeps saved workflows in memory behind an atomically swapped map. Each
/// write builds a fresh map with `rcu`, so readers holding an older snapshot
/// (for example a run in progress) are never blocked or disturbed.
///
/// Canvases are validated before they are stored; a record always holds a
/// well-formed `Graph`. Cycles are still only detected when the flow runs.

use crate::error::ServiceError;
use crate::workflow::types::Graph;
use crate::workflow::validator::validate;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

const NEW_WORKFLOW_NAME: &str = "New business flow";
const UPDATED_WORKFLOW_NAME: &str = "Business flow";

/// A saved workflow with its validated canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub canvas: Graph,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing entry, without the canvas
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Portable copy of a workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExport {
    pub name: String,
    pub description: String,
    pub canvas: Graph,
    pub exported_at: DateTime<Utc>,
}

impl From<&WorkflowRecord> for WorkflowSummary {
    fn from(record: &WorkflowRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug)]
pub struct WorkflowRegistry {
    /// Key: workflow id, ascending
    workflows: ArcSwap<BTreeMap<u64, Arc<WorkflowRecord>>>,
    next_id: AtomicU64,
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self {
            workflows: ArcSwap::from_pointee(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create an empty workflow and return its id
    pub fn create(&self, name: &str, description: &str) -> u64 {
        let name = non_blank(name, NEW_WORKFLOW_NAME);
        let id = self.insert(name, description.trim().to_string(), Graph::default());
        tracing::info!("Created workflow {}", id);
        id
    }

    /// All workflows, newest first
    pub fn list(&self) -> Vec<WorkflowSummary> {
        self.workflows
            .load()
            .values()
            .rev()
            .map(|record| WorkflowSummary::from(record.as_ref()))
            .collect()
    }

    pub fn get(&self, id: u64) -> Result<Arc<WorkflowRecord>, ServiceError> {
        self.workflows
            .load()
            .get(&id)
            .cloned()
            .ok_or(ServiceError::WorkflowNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.workflows.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace name, description and canvas of an existing workflow
    ///
    /// The raw canvas is validated before the workflow is looked up; on
    /// failure nothing changes.
    pub fn update(
        &self,
        id: u64,
        name: &str,
        description: &str,
        raw_canvas: &Value,
    ) -> Result<Arc<WorkflowRecord>, ServiceError> {
        let canvas = validate(raw_canvas).inspect_err(|e| {
            tracing::warn!("Rejected canvas for workflow {}: {}", id, e);
        })?;
        let name = non_blank(name, UPDATED_WORKFLOW_NAME);
        let description = description.trim().to_string();

        let mut updated = None;
        self.workflows.rcu(|current| {
            let mut next = (**current).clone();
            let record = next.get(&id).map(|existing| {
                Arc::new(WorkflowRecord {
                    name: name.clone(),
                    description: description.clone(),
                    canvas: canvas.clone(),
                    updated_at: Utc::now(),
                    ..existing.as_ref().clone()
                })
            });
            if let Some(record) = &record {
                next.insert(id, Arc::clone(record));
            }
            updated = record;
            next
        });

        let record = updated.ok_or(ServiceError::WorkflowNotFound(id))?;
        tracing::info!(
            "🔥 Updated workflow {} ({} nodes, {} edges)",
            id,
            record.canvas.nodes().len(),
            record.canvas.edges().len()
        );
        Ok(record)
    }

    /// Remove a workflow; returns whether it existed
    pub fn delete(&self, id: u64) -> bool {
        let mut removed = false;
        self.workflows.rcu(|current| {
            let mut next = (**current).clone();
            removed = next.remove(&id).is_some();
            next
        });
        if removed {
            tracing::info!("Deleted workflow {}", id);
        }
        removed
    }

    /// Copy a workflow under a new id
    pub fn duplicate(&self, id: u64) -> Result<u64, ServiceError> {
        let source = self.get(id)?;
        let copy_id = self.insert(
            format!("{} (copy)", source.name),
            source.description.clone(),
            source.canvas.clone(),
        );
        tracing::info!("Duplicated workflow {} as {}", id, copy_id);
        Ok(copy_id)
    }

    pub fn export(&self, id: u64) -> Result<WorkflowExport, ServiceError> {
        let record = self.get(id)?;
        Ok(WorkflowExport {
            name: record.name.clone(),
            description: record.description.clone(),
            canvas: record.canvas.clone(),
            exported_at: Utc::now(),
        })
    }

    /// Insert the example order flow when the catalog is empty
    ///
    /// Returns the id of the seeded workflow, if one was added.
    pub fn seed_demo(&self) -> Option<u64> {
        if !self.is_empty() {
            return None;
        }
        let canvas = match validate(&demo_canvas()) {
            Ok(canvas) => canvas,
            Err(e) => {
                tracing::error!("❌ Demo canvas failed validation: {}", e);
                return None;
            }
        };
        let id = self.insert(
            "Order ERP flow".to_string(),
            "Basic order handling example: intake, stock check and notification.".to_string(),
            canvas,
        );
        tracing::info!("Seeded demo workflow {}", id);
        Some(id)
    }

    fn insert(&self, name: String, description: String, canvas: Graph) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        let record = Arc::new(WorkflowRecord {
            id,
            name,
            description,
            canvas,
            created_at: now,
            updated_at: now,
        });
        self.workflows.rcu(|current| {
            let mut next = (**current).clone();
            next.insert(id, Arc::clone(&record));
            next
        });
        id
    }
}

fn non_blank(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Four-step order flow: trigger, order intake, stock check, notification
pub fn demo_canvas() -> Value {
    json!({
        "nodes": [
            { "id": "n-trigger", "type": "trigger", "label": "Flow start", "x": 120, "y": 170, "config": {} },
            { "id": "n-order", "type": "order-input", "label": "Order intake", "x": 360, "y": 170, "config": { "channel": "email" } },
            { "id": "n-stock", "type": "stock-check", "label": "Stock validation", "x": 600, "y": 170, "config": { "warehouse": "MAD-01" } },
            { "id": "n-notify", "type": "notify", "label": "Notify customer", "x": 840, "y": 170, "config": { "channel": "whatsapp" } }
        ],
        "edges": [
            { "id": "e-1", "source": "n-trigger", "target": "n-order" },
            { "id": "e-2", "source": "n-order", "target": "n-stock" },
            { "id": "e-3", "source": "n-stock", "target": "n-notify" }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FlowError, ValidationError};

    #[test]
    fn create_uses_default_name_and_empty_canvas() {
        let registry = WorkflowRegistry::new();
        let id = registry.create("   ", " notes ");
        let record = registry.get(id).unwrap();
        assert_eq!(record.name, "New business flow");
        assert_eq!(record.description, "notes");
        assert!(record.canvas.is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let registry = WorkflowRegistry::new();
        let first = registry.create("a", "");
        let second = registry.create("b", "");
        let ids: Vec<u64> = registry.list().iter().map(|w| w.id).collect();
        assert_eq!(ids, [second, first]);
    }

    #[test]
    fn update_validates_before_storing() {
        let registry = WorkflowRegistry::new();
        let id = registry.create("flow", "");
        let bad = json!({ "nodes": [{ "id": "x", "type": "bogus" }], "edges": [] });
        let err = registry.update(id, "renamed", "", &bad).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Flow(FlowError::Validation(ValidationError::UnknownNodeType(
                "bogus".to_string()
            )))
        );
        assert_eq!(registry.get(id).unwrap().name, "flow");

        let record = registry.update(id, "", "d", &demo_canvas()).unwrap();
        assert_eq!(record.name, "Business flow");
        assert_eq!(record.canvas.nodes().len(), 4);
        assert!(record.updated_at >= record.created_at);
    }

    #[test]
    fn missing_workflow_is_not_found() {
        let registry = WorkflowRegistry::new();
        assert_eq!(registry.get(9).unwrap_err(), ServiceError::WorkflowNotFound(9));
        assert_eq!(
            registry.update(9, "x", "", &demo_canvas()).unwrap_err(),
            ServiceError::WorkflowNotFound(9)
        );
        assert!(!registry.delete(9));
    }

    #[test]
    fn duplicate_and_export() {
        let registry = WorkflowRegistry::new();
        let id = registry.seed_demo().unwrap();
        let copy = registry.duplicate(id).unwrap();
        assert_ne!(copy, id);
        let copied = registry.get(copy).unwrap();
        assert_eq!(copied.name, "Order ERP flow (copy)");
        assert_eq!(copied.canvas, registry.get(id).unwrap().canvas);

        let export = registry.export(id).unwrap();
        assert_eq!(export.name, "Order ERP flow");
        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["canvas"]["nodes"][1]["type"], json!("order-input"));
        assert!(value.get("exportedAt").is_some());
    }

    #[test]
    fn seed_only_when_empty() {
        let registry = WorkflowRegistry::new();
        registry.create("existing", "");
        assert_eq!(registry.seed_demo(), None);
        assert_eq!(registry.len(), 1);
    }
}
