/// Per-type node outcome resolution
///
/// Each node type maps to exactly one resolver: a pure function of the
/// node's label and config that reports a status and a human-readable
/// message. Dispatch is an exhaustive match over `NodeType`, so adding a
/// type without a resolver does not compile.
///
/// No external system is contacted; every resolver currently succeeds.

use crate::workflow::types::{Node, NodeConfig, NodeType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome status of a step or of a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Ok,
}

/// What a resolver reports for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: StepStatus,
    pub message: String,
}

impl Outcome {
    fn ok(message: String) -> Self {
        Self { status: StepStatus::Ok, message }
    }
}

/// Resolve the outcome of a single node
pub fn execute_node(node: &Node) -> Outcome {
    tracing::debug!("Resolving node '{}' (type: {})", node.id, node.node_type);
    let label = node.label.as_str();
    let config = &node.config;

    match node.node_type {
        NodeType::Trigger => trigger(label),
        NodeType::OrderInput => order_input(config),
        NodeType::CustomerCheck => customer_check(),
        NodeType::StockCheck => stock_check(config),
        NodeType::FinanceApproval => finance_approval(),
        NodeType::Invoice => invoice(),
        NodeType::Notify => notify(config),
        NodeType::Archive => archive(),
        NodeType::AiSummary => ai_summary(config),
        NodeType::ConditionalCheck => conditional_check(config),
        NodeType::DataTransform => data_transform(config),
    }
}

fn trigger(label: &str) -> Outcome {
    Outcome::ok(format!("start of flow '{label}'."))
}

fn order_input(config: &NodeConfig) -> Outcome {
    let channel = config_text(config, "channel", "web");
    Outcome::ok(format!("order registered via channel {channel}."))
}

fn customer_check() -> Outcome {
    Outcome::ok("customer verified in CRM.".to_string())
}

fn stock_check(config: &NodeConfig) -> Outcome {
    let warehouse = config_text(config, "warehouse", "main");
    Outcome::ok(format!("stock validated in warehouse {warehouse}."))
}

fn finance_approval() -> Outcome {
    Outcome::ok("financial approval granted for the order.".to_string())
}

fn invoice() -> Outcome {
    Outcome::ok("invoice generated and linked to the order.".to_string())
}

fn notify(config: &NodeConfig) -> Outcome {
    let channel = config_text(config, "channel", "email");
    Outcome::ok(format!("customer notified via {channel}."))
}

fn archive() -> Outcome {
    Outcome::ok("order archived in the document ERP.".to_string())
}

fn ai_summary(config: &NodeConfig) -> Outcome {
    let tone = config_text(config, "tone", "professional");
    Outcome::ok(format!("AI summary generated for leadership with tone {tone}."))
}

// The condition is reported, not evaluated.
fn conditional_check(config: &NodeConfig) -> Outcome {
    let condition = config_text(config, "condition", "amount > 0");
    Outcome::ok(format!("condition evaluated: {condition} → result OK."))
}

fn data_transform(config: &NodeConfig) -> Outcome {
    let format = config_text(config, "format", "JSON");
    Outcome::ok(format!("data transformed using format {format}."))
}

/// Render a config value for a message: strings verbatim, other values as JSON
fn config_text(config: &NodeConfig, key: &str, default: &str) -> String {
    match config.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
