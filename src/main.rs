/// Nodeflow command line entry point
///
/// `nodeflow [CANVAS.json]` validates and runs the given canvas file. Without
/// an argument it runs the seeded demo workflow through the service. The run
/// summary is printed to stdout as JSON.

use anyhow::{Context, Result};
use nodeflow::{config::Config, service::init_tracing, WorkflowService};
use serde_json::Value;

fn main() -> Result<()> {
    // Load configuration (environment overrides, then defaults)
    let config = Config::default();
    init_tracing(&config);

    let summary = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("📥 Loading canvas from {}", path);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read canvas file '{}'", path))?;
            let raw: Value = serde_json::from_str(&text)
                .with_context(|| format!("'{}' is not valid JSON", path))?;
            let service = WorkflowService::new(config);
            service.run_canvas(&raw)?
        }
        None => {
            let service = WorkflowService::new(Config {
                catalog: nodeflow::config::CatalogConfig { seed_demo: true },
                ..config
            });
            let id = service
                .list_workflows()
                .first()
                .map(|workflow| workflow.id)
                .context("no workflow available to run")?;
            let (run_id, summary) = service.run_workflow(id)?;
            tracing::info!("Run id: {}", run_id);
            summary
        }
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
