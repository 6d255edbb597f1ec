//! Incremental graph builder and circuit translation.

use std::collections::HashMap;

use cs_components::{
    BranchContext, BranchModel, Component, ComponentKind, Wire, branch_model, wire_model,
};
use cs_core::{BranchId, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Branch, BranchOwner, Graph, GroundSelection, Node};
use crate::validate;

/// Builder for constructing a graph incrementally.
///
/// Use `add_node` and `add_branch` to build up the graph,
/// then call `build()` to validate and freeze it into an immutable `Graph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    branches: Vec<Branch>,
    port_index: HashMap<String, NodeId>,
    ground: Option<NodeId>,
    next_node_id: u32,
    next_branch_id: u32,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node standing for `port` (owned by component index `component`).
    pub fn add_node(&mut self, port: impl Into<String>, component: usize) -> GraphResult<NodeId> {
        let port = port.into();
        if self.port_index.contains_key(&port) {
            return Err(GraphError::DuplicatePort { port });
        }
        let id = NodeId::from_index(self.next_node_id);
        self.next_node_id += 1;
        self.port_index.insert(port.clone(), id);
        self.nodes.push(Node {
            id,
            port,
            component,
        });
        Ok(id)
    }

    /// Add a branch between two nodes and return its ID.
    pub fn add_branch(
        &mut self,
        owner: BranchOwner,
        kind: ComponentKind,
        start: NodeId,
        end: NodeId,
        model: BranchModel,
    ) -> BranchId {
        let id = BranchId::from_index(self.next_branch_id);
        self.next_branch_id += 1;
        self.branches.push(Branch {
            id,
            owner,
            kind,
            start,
            end,
            impedance: model.impedance,
            nominal: model.nominal,
            emf: model.emf,
        });
        id
    }

    /// Designate the reference node. The first call wins.
    pub fn set_ground(&mut self, node: NodeId) {
        self.ground.get_or_insert(node);
    }

    /// Node previously added for a port.
    pub fn node_for_port(&self, port: &str) -> Option<NodeId> {
        self.port_index.get(port).copied()
    }

    /// Build and validate the graph.
    ///
    /// Returns `Ok(None)` when there is nothing to solve (no nodes). Without a
    /// designated ground the first node becomes the reference.
    pub fn build(self) -> GraphResult<Option<Graph>> {
        let Some(first) = self.nodes.first() else {
            return Ok(None);
        };

        let (ground, ground_selection) = match self.ground {
            Some(node) => (node, GroundSelection::Designated),
            None => {
                tracing::debug!(node = %first.id, "no ground component, using first node as reference");
                (first.id, GroundSelection::Fallback)
            }
        };

        validate::validate_structure(&self.nodes, &self.branches)?;

        let (node_branch_offsets, node_branches) =
            Self::build_adjacency(&self.nodes, &self.branches);

        Ok(Some(Graph {
            nodes: self.nodes,
            branches: self.branches,
            ground,
            ground_selection,
            port_index: self.port_index,
            node_branch_offsets,
            node_branches,
        }))
    }

    /// Build compact adjacency lists: for each node, collect its incident branches.
    fn build_adjacency(nodes: &[Node], branches: &[Branch]) -> (Vec<usize>, Vec<BranchId>) {
        let mut per_node: Vec<Vec<BranchId>> = vec![Vec::new(); nodes.len()];
        for branch in branches {
            per_node[branch.start.slot()].push(branch.id);
            if branch.end != branch.start {
                per_node[branch.end.slot()].push(branch.id);
            }
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut flat = Vec::with_capacity(branches.len() * 2);
        offsets.push(0);
        for list in &per_node {
            flat.extend_from_slice(list);
            offsets.push(flat.len());
        }

        (offsets, flat)
    }
}

/// Translate a component/wire list into a circuit graph.
///
/// - one node per port of every component, keyed by port id
/// - one branch per component with at least two ports (except grounds), between
///   its first two ports, using the kind's branch model
/// - one branch per wire
/// - the first port of the first ground component is the reference node; the
///   other ground ports are bonded to it
///
/// Returns `Ok(None)` when the circuit has no ports at all. Contract
/// violations (missing ports, duplicate ids, dangling wires) are errors.
pub fn build_circuit(
    components: &[Component],
    wires: &[Wire],
    ctx: &BranchContext,
) -> GraphResult<Option<Graph>> {
    validate::validate_components(components, wires)?;

    let mut builder = GraphBuilder::new();
    let mut port_nodes: Vec<Vec<NodeId>> = Vec::with_capacity(components.len());
    for (ci, component) in components.iter().enumerate() {
        let ids = component
            .ports
            .iter()
            .map(|port| builder.add_node(port.id.clone(), ci))
            .collect::<GraphResult<Vec<_>>>()?;
        port_nodes.push(ids);
    }

    let grounds: Vec<usize> = components
        .iter()
        .enumerate()
        .filter(|(ci, c)| c.kind == ComponentKind::Ground && !port_nodes[*ci].is_empty())
        .map(|(ci, _)| ci)
        .collect();
    if let Some(&first) = grounds.first() {
        builder.set_ground(port_nodes[first][0]);
    }

    for (ci, component) in components.iter().enumerate() {
        let ports = &port_nodes[ci];
        if ports.len() < 2 {
            continue;
        }
        if let Some(model) = branch_model(component, ctx) {
            builder.add_branch(
                BranchOwner::Component(ci),
                component.kind,
                ports[0],
                ports[1],
                model,
            );
        }
    }

    for (wi, wire) in wires.iter().enumerate() {
        let (Some(from), Some(to)) = (
            builder.node_for_port(&wire.from),
            builder.node_for_port(&wire.to),
        ) else {
            // validate_components rejects dangling wires before we get here
            return Err(GraphError::UnknownPort {
                wire: wire.id.clone(),
                port: wire.from.clone(),
            });
        };
        builder.add_branch(
            BranchOwner::Wire(wi),
            ComponentKind::Wire,
            from,
            to,
            wire_model(),
        );
    }

    if let Some(&first) = grounds.first() {
        let reference = port_nodes[first][0];
        for &gi in &grounds {
            for &node in &port_nodes[gi] {
                if node != reference {
                    builder.add_branch(
                        BranchOwner::GroundBond(gi),
                        ComponentKind::Wire,
                        reference,
                        node,
                        wire_model(),
                    );
                }
            }
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::numeric::cplx;
    use cs_core::units::hz;

    fn ctx() -> BranchContext {
        BranchContext {
            frequency: hz(60.0),
            clock_s: 0.0,
        }
    }

    #[test]
    fn builder_basic() {
        let mut builder = GraphBuilder::new();
        let n1 = builder.add_node("a", 0).unwrap();
        let n2 = builder.add_node("b", 0).unwrap();
        let b1 = builder.add_branch(
            BranchOwner::Component(0),
            ComponentKind::Resistor,
            n1,
            n2,
            wire_model(),
        );

        assert_eq!(n1.index(), 0);
        assert_eq!(n2.index(), 1);
        assert_eq!(b1.index(), 0);
        assert_eq!(builder.nodes.len(), 2);
        assert_eq!(builder.branches.len(), 1);
    }

    #[test]
    fn builder_rejects_duplicate_port() {
        let mut builder = GraphBuilder::new();
        builder.add_node("a", 0).unwrap();
        let err = builder.add_node("a", 1).unwrap_err();
        assert_eq!(err, GraphError::DuplicatePort { port: "a".into() });
    }

    #[test]
    fn empty_builder_builds_nothing() {
        assert!(GraphBuilder::new().build().unwrap().is_none());
    }

    #[test]
    fn first_ground_wins() {
        let mut builder = GraphBuilder::new();
        let n1 = builder.add_node("a", 0).unwrap();
        let n2 = builder.add_node("b", 1).unwrap();
        builder.set_ground(n2);
        builder.set_ground(n1);
        let graph = builder.build().unwrap().unwrap();
        assert_eq!(graph.ground(), n2);
        assert_eq!(graph.ground_selection(), GroundSelection::Designated);
    }

    #[test]
    fn circuit_branch_per_component_and_wire() {
        let v = Component::dc_source("V1", 10.0);
        let r = Component::resistor("R1", 1000.0);
        let g = Component::ground("G");
        let wires = vec![
            Wire::new("w1", v.port(0), r.port(0)),
            Wire::new("w2", r.port(1), v.port(1)),
            Wire::new("w3", v.port(1), g.port(0)),
        ];
        let components = vec![v, r, g];

        let graph = build_circuit(&components, &wires, &ctx()).unwrap().unwrap();

        assert_eq!(graph.nodes().len(), 5);
        // 2 component branches + 3 wires, ground forms none
        assert_eq!(graph.branches().len(), 5);
        assert_eq!(graph.ground(), graph.node_for_port("G.0").unwrap());
        assert_eq!(graph.source_branches().count(), 1);

        let r_branch = graph.branch_for(BranchOwner::Component(1)).unwrap();
        assert_eq!(r_branch.impedance, cplx(1000.0, 0.0));
        assert_eq!(r_branch.kind, ComponentKind::Resistor);
    }

    #[test]
    fn extra_grounds_are_bonded() {
        let components = vec![Component::ground("G1"), Component::ground("G2")];
        let graph = build_circuit(&components, &[], &ctx()).unwrap().unwrap();
        assert_eq!(graph.branches().len(), 1);
        let bond = &graph.branches()[0];
        assert_eq!(bond.owner, BranchOwner::GroundBond(1));
        assert_eq!(bond.start, graph.ground());
    }

    #[test]
    fn missing_ports_rejected() {
        let broken = Component::new("R1", ComponentKind::Resistor, 1);
        let err = build_circuit(&[broken], &[], &ctx()).unwrap_err();
        assert!(matches!(err, GraphError::MissingPorts { .. }));
    }
}
