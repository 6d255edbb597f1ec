//! Core graph data structures.

use cs_components::ComponentKind;
use cs_core::numeric::Complex64;
use cs_core::{BranchId, NodeId};
use std::collections::{HashMap, VecDeque};

/// What a branch was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchOwner {
    /// Index into the component list the graph was built from.
    Component(usize),
    /// Index into the wire list the graph was built from.
    Wire(usize),
    /// Bond tying an extra ground component (by index) to the reference node.
    GroundBond(usize),
}

/// A node in the circuit graph: one per component port.
///
/// Nodes are rebuilt every tick and hold no voltage themselves; the solver
/// returns voltages indexed by node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Id of the port this node stands for.
    pub port: String,
    /// Index of the owning component.
    pub component: usize,
}

/// An edge between two nodes with a complex impedance.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub id: BranchId,
    pub owner: BranchOwner,
    /// Kind tag: the owning component's kind, `Wire` for wires and bonds.
    pub kind: ComponentKind,
    pub start: NodeId,
    pub end: NodeId,
    pub impedance: Complex64,
    pub nominal: f64,
    /// EMF in series with the impedance (start terminal positive).
    pub emf: Option<Complex64>,
}

impl Branch {
    /// True for branches stamped as ideal voltage sources.
    pub fn is_source(&self) -> bool {
        self.emf.is_some()
    }

    /// The other end of the branch, seen from `node`.
    pub fn opposite(&self, node: NodeId) -> NodeId {
        if self.start == node {
            self.end
        } else {
            self.start
        }
    }
}

/// How the reference node was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundSelection {
    /// First port of the first ground component.
    Designated,
    /// No ground component; the first node stands in.
    Fallback,
}

/// The graph: a validated, immutable collection of nodes and branches with a
/// designated reference node.
///
/// The graph stores:
/// - All nodes and branches in vectors (indexed by their IDs).
/// - Compact adjacency: for each node, which branches are incident.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) branches: Vec<Branch>,
    pub(crate) ground: NodeId,
    pub(crate) ground_selection: GroundSelection,
    pub(crate) port_index: HashMap<String, NodeId>,

    /// Offsets for node->branch adjacency: node i's branches are in node_branches[offsets[i]..offsets[i+1]].
    pub(crate) node_branch_offsets: Vec<usize>,

    /// Flat list of incident branch IDs (sorted by node ID then branch ID for determinism).
    pub(crate) node_branches: Vec<BranchId>,
}

impl Graph {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all branches.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// The reference node, fixed at zero volts.
    pub fn ground(&self) -> NodeId {
        self.ground
    }

    pub fn ground_selection(&self) -> GroundSelection {
        self.ground_selection
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    /// Get a branch by ID (returns None if ID out of bounds).
    pub fn branch(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(id.slot())
    }

    /// Node standing for a port id.
    pub fn node_for_port(&self, port: &str) -> Option<NodeId> {
        self.port_index.get(port).copied()
    }

    /// Branch IDs incident to a given node.
    pub fn node_branches(&self, node_id: NodeId) -> &[BranchId] {
        let idx = node_id.slot();
        if idx >= self.nodes.len() {
            return &[];
        }
        let start = self.node_branch_offsets[idx];
        let end = self.node_branch_offsets[idx + 1];
        &self.node_branches[start..end]
    }

    /// Iterate over voltage-source branches in ID order.
    pub fn source_branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.iter().filter(|b| b.is_source())
    }

    /// Branch built for a given owner, if any.
    pub fn branch_for(&self, owner: BranchOwner) -> Option<&Branch> {
        self.branches.iter().find(|b| b.owner == owner)
    }

    /// For every node, whether a branch path connects it to the reference node.
    ///
    /// Isolated nodes and islands without a path to ground are `false`.
    pub fn reachable_from_ground(&self) -> Vec<bool> {
        let mut seen = vec![false; self.nodes.len()];
        let Some(slot) = seen.get_mut(self.ground.slot()) else {
            return seen;
        };
        *slot = true;

        let mut queue = VecDeque::from([self.ground]);
        while let Some(node) = queue.pop_front() {
            for &bid in self.node_branches(node) {
                let next = self.branches[bid.slot()].opposite(node);
                if !seen[next.slot()] {
                    seen[next.slot()] = true;
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::numeric::cplx;
    use cs_core::Id;

    #[test]
    fn branch_helpers() {
        let b = Branch {
            id: Id::from_index(0),
            owner: BranchOwner::Wire(0),
            kind: ComponentKind::Wire,
            start: Id::from_index(3),
            end: Id::from_index(7),
            impedance: cplx(0.01, 0.0),
            nominal: 0.01,
            emf: None,
        };
        assert!(!b.is_source());
        assert_eq!(b.opposite(Id::from_index(3)), Id::from_index(7));
        assert_eq!(b.opposite(Id::from_index(7)), Id::from_index(3));
    }
}
