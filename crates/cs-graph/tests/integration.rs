//! Integration tests for cs-graph.

use cs_components::{BranchContext, Component, ComponentKind, Wire};
use cs_core::units::hz;
use cs_graph::{BranchOwner, GraphError, GroundSelection, IndexMap, build_circuit};
use proptest::prelude::*;

fn ctx() -> BranchContext {
    BranchContext {
        frequency: hz(60.0),
        clock_s: 0.0,
    }
}

/// V1 + R1 loop with G on the source's negative terminal.
fn series_loop() -> (Vec<Component>, Vec<Wire>) {
    let v = Component::dc_source("V1", 10.0);
    let r = Component::resistor("R1", 1000.0);
    let g = Component::ground("G");
    let wires = vec![
        Wire::new("w1", v.port(0), r.port(0)),
        Wire::new("w2", r.port(1), v.port(1)),
        Wire::new("w3", v.port(1), g.port(0)),
    ];
    (vec![v, r, g], wires)
}

#[test]
fn series_loop_graph() {
    let (components, wires) = series_loop();
    let graph = build_circuit(&components, &wires, &ctx()).unwrap().unwrap();

    assert_eq!(graph.nodes().len(), 5);
    assert_eq!(graph.branches().len(), 5);
    assert_eq!(graph.ground_selection(), GroundSelection::Designated);

    // Every node is reachable from ground.
    assert!(graph.reachable_from_ground().iter().all(|&r| r));

    // The source's negative terminal touches the source, w2 and w3.
    let v_neg = graph.node_for_port("V1.1").unwrap();
    assert_eq!(graph.node_branches(v_neg).len(), 3);

    let idx = IndexMap::from_graph(&graph);
    assert_eq!(idx.node_count(), 4);
    assert_eq!(idx.source_count(), 1);
}

#[test]
fn empty_circuit_has_no_graph() {
    assert!(build_circuit(&[], &[], &ctx()).unwrap().is_none());

    let unknown = Component::new("X", ComponentKind::Other, 0);
    assert!(build_circuit(&[unknown], &[], &ctx()).unwrap().is_none());
}

#[test]
fn missing_ground_falls_back_to_first_node() {
    let r = Component::resistor("R1", 10.0);
    let graph = build_circuit(&[r], &[], &ctx()).unwrap().unwrap();
    assert_eq!(graph.ground_selection(), GroundSelection::Fallback);
    assert_eq!(graph.ground(), graph.node_for_port("R1.0").unwrap());
}

#[test]
fn isolated_component_is_unreachable() {
    let (mut components, wires) = series_loop();
    components.push(Component::resistor("R9", 47.0));
    let graph = build_circuit(&components, &wires, &ctx()).unwrap().unwrap();

    let reach = graph.reachable_from_ground();
    let r9a = graph.node_for_port("R9.0").unwrap();
    let r9b = graph.node_for_port("R9.1").unwrap();
    assert!(!reach[r9a.slot()]);
    assert!(!reach[r9b.slot()]);

    let idx = IndexMap::from_graph(&graph);
    assert_eq!(idx.node_idx(r9a), None);
}

#[test]
fn failed_source_has_no_emf() {
    let (mut components, wires) = series_loop();
    components[0].state.is_failed = true;
    let graph = build_circuit(&components, &wires, &ctx()).unwrap().unwrap();
    assert_eq!(graph.source_branches().count(), 0);
    let b = graph.branch_for(BranchOwner::Component(0)).unwrap();
    assert!(b.impedance.norm() >= 1e12);
}

#[test]
fn dangling_wire_is_an_error() {
    let (components, mut wires) = series_loop();
    wires.push(Wire::new("w4", "R1.0", "ghost.1"));
    let err = build_circuit(&components, &wires, &ctx()).unwrap_err();
    assert_eq!(
        err,
        GraphError::UnknownPort {
            wire: "w4".into(),
            port: "ghost.1".into()
        }
    );
}

#[test]
fn error_messages_name_the_offender() {
    let mut v = Component::dc_source("V1", 1.0);
    v.ports.pop();
    let err = build_circuit(&[v], &[], &ctx()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("V1"), "{msg}");
    assert!(msg.contains("dcSource"), "{msg}");
}

proptest! {
    /// A resistor chain hung off ground: every port is reachable, and the
    /// graph holds one branch per resistor plus one per wire.
    #[test]
    fn resistor_chain_is_connected(
        values in proptest::collection::vec(1.0f64..1e6, 1..12)
    ) {
        let mut components = vec![Component::ground("G")];
        let mut wires = Vec::new();
        let mut prev = "G.0".to_string();
        for (i, ohms) in values.iter().enumerate() {
            let r = Component::resistor(format!("R{i}"), *ohms);
            wires.push(Wire::new(format!("w{i}"), prev.clone(), r.port(0)));
            prev = r.port(1).to_string();
            components.push(r);
        }

        let graph = build_circuit(&components, &wires, &ctx()).unwrap().unwrap();

        prop_assert_eq!(graph.nodes().len(), 1 + 2 * values.len());
        prop_assert_eq!(graph.branches().len(), 2 * values.len());
        prop_assert!(graph.reachable_from_ground().iter().all(|&r| r));

        let idx = IndexMap::from_graph(&graph);
        prop_assert_eq!(idx.size(), 2 * values.len());
    }
}
