//! Stable indexing for solver integration.
//!
//! Maps graph objects to contiguous solver unknowns: one per non-reference node
//! reachable from ground, then one per voltage-source branch.

use cs_core::{BranchId, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

/// Index map from node and source-branch IDs to positions in the MNA system.
///
/// Nodes without a path to the reference node get no unknown; the solver
/// reports them at zero volts.
#[derive(Debug, Clone)]
pub struct IndexMap {
    /// Contiguous list of solved node IDs (index -> NodeId).
    node_ids: Vec<NodeId>,

    /// Source branches with an extra current unknown (offset by node count).
    source_ids: Vec<BranchId>,

    /// Reverse lookup: NodeId slot -> unknown index.
    node_to_idx: Vec<Option<usize>>,

    /// Reverse lookup: BranchId slot -> unknown index.
    source_to_idx: Vec<Option<usize>>,
}

impl IndexMap {
    /// Build an index map from a graph.
    pub fn from_graph(graph: &Graph) -> Self {
        let reachable = graph.reachable_from_ground();
        let ground = graph.ground();

        let node_ids: Vec<NodeId> = graph
            .nodes()
            .iter()
            .map(|n| n.id)
            .filter(|&id| id != ground && reachable[id.slot()])
            .collect();

        // A source with an unreachable terminal would leave its constraint row
        // referencing an unknown that does not exist.
        let solved = |id: NodeId| id == ground || reachable[id.slot()];
        let source_ids: Vec<BranchId> = graph
            .source_branches()
            .filter(|b| solved(b.start) && solved(b.end))
            .map(|b| b.id)
            .collect();

        let mut node_to_idx = vec![None; graph.nodes().len()];
        for (i, &id) in node_ids.iter().enumerate() {
            node_to_idx[id.slot()] = Some(i);
        }

        let mut source_to_idx = vec![None; graph.branches().len()];
        for (i, &id) in source_ids.iter().enumerate() {
            source_to_idx[id.slot()] = Some(node_ids.len() + i);
        }

        Self {
            node_ids,
            source_ids,
            node_to_idx,
            source_to_idx,
        }
    }

    /// Number of solved node voltages.
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Number of source current unknowns.
    pub fn source_count(&self) -> usize {
        self.source_ids.len()
    }

    /// Total system size.
    pub fn size(&self) -> usize {
        self.node_ids.len() + self.source_ids.len()
    }

    /// Unknown index for a node, `None` for the reference node and unsolved nodes.
    pub fn node_idx(&self, id: NodeId) -> Option<usize> {
        self.node_to_idx.get(id.slot()).copied().flatten()
    }

    /// Unknown index for a source branch.
    pub fn source_idx(&self, id: BranchId) -> GraphResult<usize> {
        self.source_to_idx
            .get(id.slot())
            .copied()
            .flatten()
            .ok_or(GraphError::IdNotFound { what: "BranchId" })
    }

    /// Get the node ID for a contiguous index (panics if out of bounds).
    pub fn node_id(&self, i: usize) -> NodeId {
        self.node_ids[i]
    }

    /// Solved node IDs in index order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Source branch IDs in index order.
    pub fn source_ids(&self) -> &[BranchId] {
        &self.source_ids
    }
}
