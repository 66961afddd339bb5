use nodeflow::{
    config::{CatalogConfig, Config, LoggingConfig, RunsConfig},
    workflow::registry::demo_canvas,
    FlowError, ServiceError, ValidationError, WorkflowService,
};
use serde_json::json;

fn config(list_limit: usize, seed_demo: bool) -> Config {
    Config {
        logging: LoggingConfig { level: "warn".to_string() },
        runs: RunsConfig { list_limit },
        catalog: CatalogConfig { seed_demo },
    }
}

#[test]
fn seeded_demo_runs_and_is_recorded() {
    let service = WorkflowService::new(config(20, true));
    let workflows = service.list_workflows();
    assert_eq!(workflows.len(), 1);
    assert_eq!(workflows[0].name, "Order ERP flow");

    let (run_id, result) = service.run_workflow(workflows[0].id).unwrap();
    let messages: Vec<&str> = result.steps.iter().map(|s| s.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "start of flow 'Flow start'.",
            "order registered via channel email.",
            "stock validated in warehouse MAD-01.",
            "customer notified via whatsapp.",
        ]
    );

    let runs = service.list_runs(workflows[0].id);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, run_id);
    assert_eq!(runs[0].summary, result);

    let value = serde_json::to_value(runs[0].as_ref()).unwrap();
    assert_eq!(value["summary"]["steps"][3]["nodeId"], json!("n-notify"));
    assert_eq!(value["status"], json!("ok"));
}

#[test]
fn run_listing_respects_limit() {
    let service = WorkflowService::new(config(3, true));
    let id = service.list_workflows()[0].id;
    let mut run_ids = Vec::new();
    for _ in 0..5 {
        run_ids.push(service.run_workflow(id).unwrap().0);
    }
    let listed: Vec<_> = service.list_runs(id).iter().map(|r| r.run_id).collect();
    assert_eq!(listed, [run_ids[4], run_ids[3], run_ids[2]]);
    assert_eq!(service.stats().total_runs, 5);
}

#[test]
fn cyclic_workflow_saves_but_fails_to_run() {
    let service = WorkflowService::new(config(20, false));
    assert!(service.list_workflows().is_empty());

    let id = service.create_workflow("loop", "");
    let cyclic = json!({
        "nodes": [{ "id": "a", "type": "trigger" }, { "id": "b", "type": "invoice" }],
        "edges": [{ "source": "a", "target": "b" }, { "source": "b", "target": "a" }]
    });
    service.update_workflow(id, "loop", "", &cyclic).unwrap();

    let err = service.run_workflow(id).unwrap_err();
    assert!(matches!(err, ServiceError::Flow(FlowError::Cyclic(_))));
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.to_string(), "the flow contains cycles; an acyclic graph is required");
    assert!(service.list_runs(id).is_empty());
}

#[test]
fn invalid_update_is_a_client_error() {
    let service = WorkflowService::new(config(20, false));
    let id = service.create_workflow("", "");
    let err = service
        .update_workflow(id, "x", "", &json!({ "nodes": "nope", "edges": [] }))
        .unwrap_err();
    assert_eq!(err, ServiceError::from(ValidationError::InvalidCanvas));
    assert!(err.is_client_error());
    assert_eq!(err.to_string(), "canvas must include valid node and edge arrays.");
}

#[test]
fn unknown_workflow_is_not_found() {
    let service = WorkflowService::new(config(20, false));
    let err = service.run_workflow(404).unwrap_err();
    assert_eq!(err, ServiceError::WorkflowNotFound(404));
    assert_eq!(err.status_code(), 404);
    assert_eq!(service.delete_workflow(404), Err(ServiceError::WorkflowNotFound(404)));
}

#[test]
fn delete_removes_runs() {
    let service = WorkflowService::new(config(20, true));
    let id = service.list_workflows()[0].id;
    service.run_workflow(id).unwrap();
    service.delete_workflow(id).unwrap();
    assert!(service.get_workflow(id).is_err());
    assert!(service.list_runs(id).is_empty());
    assert_eq!(service.stats().total_runs, 0);
}

#[test]
fn duplicate_export_and_stats() {
    let service = WorkflowService::new(config(20, true));
    let id = service.list_workflows()[0].id;
    let copy = service.duplicate_workflow(id).unwrap();
    assert_eq!(service.list_workflows()[0].id, copy);

    let export = service.export_workflow(copy).unwrap();
    assert_eq!(export.name, "Order ERP flow (copy)");
    assert_eq!(export.canvas.nodes().len(), 4);

    let stats = service.stats();
    assert_eq!(stats.total_workflows, 2);
    assert_eq!(stats.node_types_available, 11);
    assert_eq!(service.node_types().len(), 11);
}

#[test]
fn run_canvas_does_not_store() {
    let service = WorkflowService::new(config(20, false));
    let result = service.run_canvas(&demo_canvas()).unwrap();
    assert_eq!(result.steps.len(), 4);
    assert_eq!(service.stats().total_runs, 0);

    let err = service
        .run_canvas(&json!({ "nodes": [{ "id": "a" }], "edges": [] }))
        .unwrap_err();
    assert_eq!(err, FlowError::Validation(ValidationError::MissingNodeFields));
}

#[test]
fn concurrent_runs_are_independent() {
    let service = WorkflowService::new(config(100, true));
    let id = service.list_workflows()[0].id;
    let expected = service.run_canvas(&demo_canvas()).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..10 {
                    let (_, result) = service.run_workflow(id).unwrap();
                    assert_eq!(result, expected);
                }
            });
        }
    });

    assert_eq!(service.stats().total_runs, 40);
    assert_eq!(service.list_runs(id).len(), 40);
}
