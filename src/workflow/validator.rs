/// Canvas validation
///
/// Turns a raw, caller-supplied canvas (`{"nodes": [...], "edges": [...]}`)
/// into a `Graph`. Checks run eagerly in a fixed order and the first failure
/// rejects the whole canvas; there is no partially accepted graph.
///
/// Cycles are not checked here. A canvas with cyclic connections is a valid
/// graph and only fails when it is run.

use crate::error::ValidationError;
use crate::workflow::types::{Edge, Graph, Node, NodeConfig, NodeType, DEFAULT_COORDINATE};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Validate and normalize a raw canvas
pub fn validate(raw: &Value) -> Result<Graph, ValidationError> {
    let nodes = raw.get("nodes").and_then(Value::as_array);
    let edges = raw.get("edges").and_then(Value::as_array);
    let (Some(raw_nodes), Some(raw_edges)) = (nodes, edges) else {
        return Err(ValidationError::InvalidCanvas);
    };

    let mut node_ids: HashSet<String> = HashSet::with_capacity(raw_nodes.len());
    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for raw_node in raw_nodes {
        let node = validate_node(raw_node, &node_ids)?;
        node_ids.insert(node.id.clone());
        nodes.push(node);
    }

    let mut seen_pairs: HashSet<(String, String)> = HashSet::with_capacity(raw_edges.len());
    let mut edges: Vec<Edge> = Vec::with_capacity(raw_edges.len());
    for raw_edge in raw_edges {
        let Some(obj) = raw_edge.as_object() else {
            return Err(ValidationError::MissingEdgeEndpoints);
        };

        let mut id = text_field(obj, "id");
        if id.is_empty() {
            id = format!("e-{}", edges.len() + 1);
        }
        let source = text_field(obj, "source");
        let target = text_field(obj, "target");
        if source.is_empty() || target.is_empty() {
            return Err(ValidationError::MissingEdgeEndpoints);
        }
        if !node_ids.contains(&source) || !node_ids.contains(&target) {
            return Err(ValidationError::DanglingEdge);
        }

        // first occurrence of a (source, target) pair wins
        if !seen_pairs.insert((source.clone(), target.clone())) {
            tracing::debug!("Dropping duplicate connection {} -> {}", source, target);
            continue;
        }
        edges.push(Edge { id, source, target });
    }

    tracing::debug!("Canvas accepted: {} nodes, {} edges", nodes.len(), edges.len());
    Ok(Graph::from_parts(nodes, edges))
}

fn validate_node(raw: &Value, seen: &HashSet<String>) -> Result<Node, ValidationError> {
    let Some(obj) = raw.as_object() else {
        return Err(ValidationError::MissingNodeFields);
    };

    let id = text_field(obj, "id");
    let type_name = text_field(obj, "type");
    if id.is_empty() || type_name.is_empty() {
        return Err(ValidationError::MissingNodeFields);
    }
    let node_type =
        NodeType::parse(&type_name).ok_or(ValidationError::UnknownNodeType(type_name))?;
    if seen.contains(&id) {
        return Err(ValidationError::DuplicateNode(id));
    }

    let mut label = text_field(obj, "label");
    if label.is_empty() {
        label = node_type.default_label().to_string();
    }
    let x = coordinate(obj, &id, "x")?;
    let y = coordinate(obj, &id, "y")?;
    let config = match obj.get("config") {
        Some(Value::Object(map)) => map.clone(),
        _ => NodeConfig::new(),
    };

    Ok(Node { id, node_type, label, x, y, config })
}

/// Read a key as a trimmed string; numbers are stringified, anything else is empty
fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn coordinate(
    obj: &Map<String, Value>,
    node_id: &str,
    axis: &'static str,
) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidCoordinate { node_id: node_id.to_string(), axis };
    match obj.get(axis) {
        None => Ok(DEFAULT_COORDINATE),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(f64::trunc).filter(|f| in_i64_range(*f)).map(|f| f as i64))
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

// i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
fn in_i64_range(value: f64) -> bool {
    value >= i64::MIN as f64 && value < i64::MAX as f64
}
