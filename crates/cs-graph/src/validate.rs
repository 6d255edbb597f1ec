//! Graph validation logic.

use std::collections::{HashMap, HashSet};

use cs_components::{Component, Wire};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Branch, Node};

/// Validate the component/wire contract before any node is created:
/// unique component ids, unique port ids, ports owned by their component,
/// enough ports per kind, and wires that only reference existing ports.
pub(crate) fn validate_components(components: &[Component], wires: &[Wire]) -> GraphResult<()> {
    let mut component_ids = HashSet::with_capacity(components.len());
    let mut port_owner: HashMap<&str, &str> = HashMap::new();

    for component in components {
        if !component_ids.insert(component.id.as_str()) {
            return Err(GraphError::DuplicateComponent {
                component: component.id.clone(),
            });
        }

        component.check_ports()?;

        for port in &component.ports {
            if port.component != component.id {
                return Err(GraphError::PortOwnerMismatch {
                    port: port.id.clone(),
                    expected: component.id.clone(),
                    actual: port.component.clone(),
                });
            }
            if port_owner.insert(&port.id, &component.id).is_some() {
                return Err(GraphError::DuplicatePort {
                    port: port.id.clone(),
                });
            }
        }
    }

    for wire in wires {
        for end in [&wire.from, &wire.to] {
            if !port_owner.contains_key(end.as_str()) {
                return Err(GraphError::UnknownPort {
                    wire: wire.id.clone(),
                    port: end.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Validate the frozen structure: every branch endpoint names an existing node.
pub(crate) fn validate_structure(nodes: &[Node], branches: &[Branch]) -> GraphResult<()> {
    for (i, node) in nodes.iter().enumerate() {
        if node.id.slot() != i {
            return Err(GraphError::IdNotFound { what: "NodeId" });
        }
    }

    for branch in branches {
        for node in [branch.start, branch.end] {
            if node.slot() >= nodes.len() {
                return Err(GraphError::InvalidNodeRef {
                    branch: branch.id,
                    node,
                });
            }
        }
    }

    Ok(())
}
