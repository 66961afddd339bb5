/// Graph execution engine
///
/// Orders a validated graph with Kahn's algorithm and resolves every node in
/// that order, producing the run trace. Runs are synchronous, stateless and
/// side-effect free, so any number of them may execute concurrently.
///
/// Ordering is deterministic: zero in-degree nodes are seeded in declaration
/// order and later ones are enqueued FIFO as their last incoming edge is
/// consumed, visiting successors in edge declaration order.

use crate::error::CyclicGraphError;
use crate::runtime::executor::{execute_node, StepStatus};
use crate::workflow::types::{Graph, Node, NodeType};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// One executed node in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    /// 1-based position in execution order
    pub step: usize,
    pub node_id: String,
    pub node_label: String,
    pub node_type: NodeType,
    pub status: StepStatus,
    pub message: String,
}

/// Summary of one run of a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub status: StepStatus,
    pub total_nodes: usize,
    pub total_edges: usize,
    /// One entry per node, in execution order
    pub steps: Vec<StepResult>,
}

/// Petgraph view of a validated graph
///
/// Successor lists are kept separately because petgraph walks adjacency in
/// reverse insertion order, and the FIFO tie-break depends on edge order.
struct WorkflowGraph<'a> {
    graph: DiGraph<&'a Node, ()>,
    successors: Vec<Vec<NodeIndex>>,
    in_degree: Vec<usize>,
}

impl<'a> WorkflowGraph<'a> {
    fn build(source: &'a Graph) -> Self {
        let mut graph = DiGraph::with_capacity(source.nodes().len(), source.edges().len());
        let mut node_id_to_index: HashMap<&str, NodeIndex> = HashMap::new();
        for node in source.nodes() {
            let index = graph.add_node(node);
            node_id_to_index.insert(node.id.as_str(), index);
        }

        let mut successors = vec![Vec::new(); graph.node_count()];
        let mut in_degree = vec![0usize; graph.node_count()];
        for edge in source.edges() {
            let (Some(&from), Some(&to)) = (
                node_id_to_index.get(edge.source.as_str()),
                node_id_to_index.get(edge.target.as_str()),
            ) else {
                continue;
            };
            graph.add_edge(from, to, ());
            successors[from.index()].push(to);
            in_degree[to.index()] += 1;
        }

        Self { graph, successors, in_degree }
    }

    fn cycle_hint(&self) -> Option<String> {
        toposort(&self.graph, None)
            .err()
            .map(|cycle| self.graph[cycle.node_id()].id.clone())
    }
}

/// Compute the execution order of a graph
///
/// Fails with `CyclicGraphError` when some nodes can never reach zero
/// in-degree. Isolated nodes are roots like any other.
pub fn execution_order(graph: &Graph) -> Result<Vec<&Node>, CyclicGraphError> {
    let mut workflow = WorkflowGraph::build(graph);

    let mut queue: VecDeque<NodeIndex> = workflow
        .graph
        .node_indices()
        .filter(|index| workflow.in_degree[index.index()] == 0)
        .collect();
    let mut order = Vec::with_capacity(workflow.graph.node_count());

    while let Some(current) = queue.pop_front() {
        order.push(current);
        for &next in &workflow.successors[current.index()] {
            let degree = &mut workflow.in_degree[next.index()];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() < workflow.graph.node_count() {
        let node_id = workflow.cycle_hint();
        tracing::warn!("Flow rejected: cycle detected (at node {:?})", node_id);
        return Err(CyclicGraphError { node_id });
    }

    Ok(order.into_iter().map(|index| workflow.graph[index]).collect())
}

/// Run a validated graph and assemble its step-by-step result
pub fn run(graph: &Graph) -> Result<RunResult, CyclicGraphError> {
    let started = std::time::Instant::now();
    tracing::info!(
        "🚀 Running flow with {} nodes and {} edges",
        graph.nodes().len(),
        graph.edges().len()
    );

    let order = execution_order(graph)?;
    tracing::debug!(
        "📋 Execution order: {:?}",
        order.iter().map(|node| node.id.as_str()).collect::<Vec<_>>()
    );

    let steps: Vec<StepResult> = order
        .into_iter()
        .enumerate()
        .map(|(position, node)| {
            let outcome = execute_node(node);
            StepResult {
                step: position + 1,
                node_id: node.id.clone(),
                node_label: node.label.clone(),
                node_type: node.node_type,
                status: outcome.status,
                message: outcome.message,
            }
        })
        .collect();

    tracing::info!("✅ Flow completed: {} steps in {:?}", steps.len(), started.elapsed());

    Ok(RunResult {
        status: StepStatus::Ok,
        total_nodes: graph.nodes().len(),
        total_edges: graph.edges().len(),
        steps,
    })
}
