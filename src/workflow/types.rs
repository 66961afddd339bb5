/// Core workflow type definitions
///
/// Defines nodes, edges and the validated graph the execution engine works on.
/// A `Graph` can only be produced by the canvas validator, so everything
/// downstream may assume unique node ids, known node types and edges that
/// point at existing nodes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Free-form node configuration, read only by the node's resolver
pub type NodeConfig = Map<String, Value>;

/// Coordinate used when a node carries no position
pub const DEFAULT_COORDINATE: i64 = 80;

/// The closed set of node kinds a process can be built from
///
/// Serialized in kebab-case (`order-input`). The snake_case spellings used by
/// older saved canvases are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    /// Entry point of the flow
    Trigger,
    /// Order reception. Config: { "channel": "web" }
    #[serde(alias = "order_input")]
    OrderInput,
    #[serde(alias = "customer_check")]
    CustomerCheck,
    /// Warehouse stock validation. Config: { "warehouse": "main" }
    #[serde(alias = "stock_check")]
    StockCheck,
    #[serde(alias = "finance_approval")]
    FinanceApproval,
    Invoice,
    /// Customer notification. Config: { "channel": "email" }
    Notify,
    Archive,
    /// Leadership summary. Config: { "tone": "professional" }
    #[serde(alias = "ai_summary")]
    AiSummary,
    /// Config: { "condition": "amount > 0" }
    #[serde(alias = "conditional_check")]
    ConditionalCheck,
    /// Config: { "format": "JSON" }
    #[serde(alias = "data_transform")]
    DataTransform,
}

impl NodeType {
    /// Every node type, in catalog order
    pub const ALL: [NodeType; 11] = [
        NodeType::Trigger,
        NodeType::OrderInput,
        NodeType::CustomerCheck,
        NodeType::StockCheck,
        NodeType::FinanceApproval,
        NodeType::Invoice,
        NodeType::Notify,
        NodeType::Archive,
        NodeType::AiSummary,
        NodeType::ConditionalCheck,
        NodeType::DataTransform,
    ];

    /// Look up a node type by its canonical or legacy snake_case name
    pub fn parse(name: &str) -> Option<NodeType> {
        let canonical = name.replace('_', "-");
        Self::ALL.into_iter().find(|t| t.as_str() == canonical)
    }

    /// Canonical wire name
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Trigger => "trigger",
            NodeType::OrderInput => "order-input",
            NodeType::CustomerCheck => "customer-check",
            NodeType::StockCheck => "stock-check",
            NodeType::FinanceApproval => "finance-approval",
            NodeType::Invoice => "invoice",
            NodeType::Notify => "notify",
            NodeType::Archive => "archive",
            NodeType::AiSummary => "ai-summary",
            NodeType::ConditionalCheck => "conditional-check",
            NodeType::DataTransform => "data-transform",
        }
    }

    /// Label given to nodes submitted without one
    pub fn default_label(self) -> &'static str {
        match self {
            NodeType::Trigger => "Start",
            NodeType::OrderInput => "Order intake",
            NodeType::CustomerCheck => "Customer validation",
            NodeType::StockCheck => "Stock validation",
            NodeType::FinanceApproval => "Financial approval",
            NodeType::Invoice => "Invoice generation",
            NodeType::Notify => "Customer notification",
            NodeType::Archive => "ERP archive",
            NodeType::AiSummary => "AI summary (example)",
            NodeType::ConditionalCheck => "Conditional check",
            NodeType::DataTransform => "Data transform",
        }
    }

    /// Starter configuration an editor offers when a node is placed
    pub fn default_config(self) -> NodeConfig {
        let value = match self {
            NodeType::OrderInput => json!({ "channel": "web" }),
            NodeType::StockCheck => json!({ "warehouse": "MAD-01" }),
            NodeType::Notify => json!({ "channel": "email" }),
            NodeType::AiSummary => json!({ "tone": "professional" }),
            NodeType::ConditionalCheck => json!({ "condition": "amount > 100" }),
            NodeType::DataTransform => json!({ "format": "JSON" }),
            _ => json!({}),
        };
        match value {
            Value::Object(map) => map,
            _ => NodeConfig::new(),
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog of available node types as (canonical name, default label)
pub fn node_type_catalog() -> Vec<(&'static str, &'static str)> {
    NodeType::ALL
        .iter()
        .map(|t| (t.as_str(), t.default_label()))
        .collect()
}

/// A single step in a process graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Unique within its graph (e.g. "n-order")
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Display name, never blank after validation
    pub label: String,
    /// Canvas position, cosmetic only
    pub x: i64,
    pub y: i64,
    /// Per-node settings interpreted by the resolver for `node_type`
    pub config: NodeConfig,
}

/// Directed connection between two nodes of the same graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Caller-supplied or generated as `e-<n>`
    pub id: String,
    pub source: String,
    pub target: String,
}

/// A validated canvas
///
/// Immutable once built: fields are private and the only constructor lives
/// in the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub(crate) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Nodes in submission order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Deduplicated edges in submission order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Canvas JSON this graph normalizes to; validating it again yields an equal graph
    pub fn to_canvas(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({ "nodes": [], "edges": [] }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_both_spellings() {
        assert_eq!(NodeType::parse("order-input"), Some(NodeType::OrderInput));
        assert_eq!(NodeType::parse("order_input"), Some(NodeType::OrderInput));
        assert_eq!(NodeType::parse("bogus"), None);
        assert_eq!(NodeType::parse(""), None);
    }

    #[test]
    fn serde_names_match_as_str() {
        for node_type in NodeType::ALL {
            let encoded = serde_json::to_value(node_type).unwrap();
            assert_eq!(encoded, Value::String(node_type.as_str().to_string()));
        }
        let legacy: NodeType = serde_json::from_str("\"ai_summary\"").unwrap();
        assert_eq!(legacy, NodeType::AiSummary);
    }

    #[test]
    fn catalog_lists_every_type() {
        let catalog = node_type_catalog();
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog[0], ("trigger", "Start"));
        assert_eq!(catalog[10], ("data-transform", "Data transform"));
    }

    #[test]
    fn default_config_is_fresh_per_call() {
        let mut first = NodeType::Notify.default_config();
        first.insert("channel".to_string(), json!("sms"));
        assert_eq!(NodeType::Notify.default_config()["channel"], json!("email"));
        assert!(NodeType::Invoice.default_config().is_empty());
    }
}
