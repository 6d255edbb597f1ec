//! End-to-end tests of the simulation handle.

use cs_components::{Component, ComponentKind, FailureType, WarningLevel, Wire};
use cs_core::GeoPoint;
use cs_field::GridSpec;
use cs_graph::GraphError;
use cs_sim::{SimError, SimSettings, SimStatus, Simulation, StepOutcome, ValidationIssue};
use proptest::prelude::*;

/// Source driving `part`, ground on the source's negative terminal.
fn series(part: Component, volts: f64, settings: SimSettings) -> Simulation {
    let v = Component::dc_source("V1", volts);
    let g = Component::ground("G");
    let wires = vec![
        Wire::new("w1", v.port(0), part.port(0)),
        Wire::new("w2", part.port(1), v.port(1)),
        Wire::new("w3", v.port(1), g.port(0)),
    ];
    Simulation::with_circuit(vec![v, part, g], wires, settings).unwrap()
}

fn advanced(outcome: StepOutcome) -> cs_sim::TickReport {
    match outcome {
        StepOutcome::Advanced(report) => report,
        other => panic!("expected an advanced tick, got {other:?}"),
    }
}

#[test]
fn overheated_resistor_fails_and_stays_failed() {
    let mut sim = series(Component::resistor("R1", 10.0), 10.0, SimSettings::default());
    assert!(sim.start().is_valid);

    let first = advanced(sim.step(10.0).unwrap());
    assert!(first.newly_failed.is_empty());
    let r = sim.component("R1").unwrap();
    assert!(r.state.temperature > 120.0);
    assert!(!r.state.is_failed);

    let second = advanced(sim.step(10.0).unwrap());
    assert_eq!(second.newly_failed, vec!["R1".to_string()]);
    let r = sim.component("R1").unwrap();
    assert!(r.state.is_failed);
    assert_eq!(r.state.failure_type, Some(FailureType::Thermal));
    assert_eq!(r.state.warning_level, WarningLevel::Critical);

    // Open circuit from now on: it cools, but the failure is sticky.
    for _ in 0..20 {
        let report = advanced(sim.step(10.0).unwrap());
        assert!(report.newly_failed.is_empty());
        let r = sim.component("R1").unwrap();
        assert!(r.state.is_failed);
        assert!(r.state.current_flow < 1e-6);
    }
    assert!(sim.component("R1").unwrap().state.temperature < 155.0);

    sim.reset();
    let r = sim.component("R1").unwrap();
    assert!(!r.state.is_failed);
    assert_eq!(r.state.failure_type, None);
    assert_eq!(r.state.temperature, 25.0);
    assert_eq!(r.state.warning_level, WarningLevel::None);
    assert_eq!(sim.status(), SimStatus::Idle);
    assert_eq!(sim.clock(), 0.0);
    assert!(sim.wires().iter().all(|w| w.state.current == 0.0));
}

#[test]
fn loop_cut_off_from_ground_carries_no_current() {
    let v = Component::dc_source("V1", 9.0);
    let r = Component::resistor("R1", 1000.0);
    let g = Component::ground("G");
    let wires = vec![
        Wire::new("w1", v.port(0), r.port(0)),
        Wire::new("w2", r.port(1), v.port(1)),
    ];
    let mut sim = Simulation::with_circuit(vec![v, r, g], wires, SimSettings::default()).unwrap();
    let validation = sim.start();
    assert!(validation.is_valid);
    assert!(validation.warnings.is_empty());

    let report = advanced(sim.step(1.0).unwrap());
    assert_eq!(report.system_size, 0);
    for id in ["V1", "R1"] {
        let state = &sim.component(id).unwrap().state;
        assert_eq!(state.current_flow, 0.0, "{id}");
        assert_eq!(state.power_dissipation, 0.0, "{id}");
    }
    assert!(sim.wires().iter().all(|w| w.state.current == 0.0));
}

#[test]
fn shorted_resistor_heats_through_its_floor_resistance() {
    let mut sim = series(Component::resistor("R1", 0.0), 10.0, SimSettings::default());
    sim.start();
    sim.step(0.1).unwrap();

    let r = &sim.component("R1").unwrap().state;
    let v = &sim.component("V1").unwrap().state;
    // Source internal resistance plus two wires limit the current.
    assert!((r.current_flow - 10.0 / 0.030001).abs() < 1e-3);
    let implied_ohms = r.power_dissipation / (r.current_flow * r.current_flow);
    assert!((implied_ohms - 1e-6).abs() < 1e-12);
    assert!(r.power_dissipation < v.power_dissipation);
}

#[test]
fn enormous_timestep_still_returns() {
    let settings = SimSettings {
        enable_failures: false,
        ..SimSettings::default()
    };
    let mut sim = series(Component::resistor("R1", 1000.0), 10.0, settings);
    sim.start();
    advanced(sim.step(1e300).unwrap());

    // 0.1 W through a carbon resistor at 50 K/W settles 5 °C over ambient.
    let r = &sim.component("R1").unwrap().state;
    assert!((r.temperature - 30.0).abs() < 1e-3, "{}", r.temperature);
}

#[test]
fn failures_can_be_disabled() {
    let settings = SimSettings {
        enable_failures: false,
        ..SimSettings::default()
    };
    let mut sim = series(Component::resistor("R1", 10.0), 10.0, settings);
    sim.start();
    for _ in 0..5 {
        sim.step(10.0).unwrap();
    }
    let r = sim.component("R1").unwrap();
    assert!(r.state.temperature > 155.0);
    assert!(!r.state.is_failed);
}

#[test]
fn thermal_can_be_disabled() {
    let settings = SimSettings {
        enable_thermal: false,
        ..SimSettings::default()
    };
    let mut sim = series(Component::resistor("R1", 10.0), 10.0, settings);
    sim.start();
    let report = advanced(sim.step(10.0).unwrap());
    assert!(report.thermal.is_empty());
    let r = sim.component("R1").unwrap();
    assert_eq!(r.state.temperature, 25.0);
    // Power is still reported.
    assert!(r.state.power_dissipation > 9.0);
}

#[test]
fn overvoltage_fails_a_rated_part() {
    let mut c = Component::capacitor("C1", 1e-6);
    c.properties.voltage_rating = Some(5.0);
    let mut sim = series(c, 10.0, SimSettings::default());
    sim.start();
    let report = advanced(sim.step(0.01).unwrap());
    assert_eq!(report.newly_failed, vec!["C1".to_string()]);
    let c = sim.component("C1").unwrap();
    assert_eq!(c.state.failure_type, Some(FailureType::Overvoltage));
}

#[test]
fn stop_freezes_state() {
    let mut sim = series(Component::resistor("R1", 100.0), 5.0, SimSettings::default());
    sim.start();
    sim.step(1.0).unwrap();
    let before = sim.snapshot();
    sim.stop();
    assert_eq!(sim.status(), SimStatus::Stopped);
    assert_eq!(sim.step(1.0).unwrap(), StepOutcome::NotRunning);
    let after = sim.snapshot();
    assert_eq!(before.components, after.components);
    assert_eq!(after.status, SimStatus::Stopped);
}

#[test]
fn start_requires_a_valid_circuit() {
    let r = Component::resistor("R1", 100.0);
    let g = Component::ground("G");
    let wires = vec![Wire::new("w1", r.port(0), g.port(0))];
    let mut sim = Simulation::with_circuit(vec![r, g], wires, SimSettings::default()).unwrap();

    let report = sim.start();
    assert!(!report.is_valid);
    assert_eq!(report.errors, vec![ValidationIssue::MissingPowerSource]);
    assert_eq!(sim.status(), SimStatus::Idle);
    assert_eq!(sim.step(1.0).unwrap(), StepOutcome::NotRunning);
}

#[test]
fn unconnected_component_only_warns() {
    let mut sim = series(Component::resistor("R1", 100.0), 5.0, SimSettings::default());
    sim.add_component(Component::resistor("R2", 100.0).with_name("Spare"))
        .unwrap();
    let report = sim.start();
    assert!(report.is_valid);
    assert_eq!(
        report.warnings,
        vec![ValidationIssue::UnconnectedComponent {
            id: "R2".into(),
            name: "Spare".into()
        }]
    );
    assert_eq!(sim.status(), SimStatus::Running);
    sim.step(1.0).unwrap();
    assert_eq!(sim.component("R2").unwrap().state.current_flow, 0.0);
}

#[test]
fn emptied_circuit_idles() {
    let mut sim = series(Component::resistor("R1", 100.0), 5.0, SimSettings::default());
    sim.start();
    for id in ["V1", "R1", "G"] {
        sim.remove_component(id).unwrap();
    }
    assert_eq!(sim.step(1.0).unwrap(), StepOutcome::Idle);
    assert_eq!(sim.clock(), 0.0);
}

#[test]
fn dangling_wire_is_a_contract_error() {
    let mut sim = series(Component::resistor("R1", 100.0), 5.0, SimSettings::default());
    sim.add_wire(Wire::new("w9", "R1.0", "ghost.0")).unwrap();
    sim.start();
    let err = sim.step(1.0).unwrap_err();
    assert_eq!(
        err,
        SimError::Graph(GraphError::UnknownPort {
            wire: "w9".into(),
            port: "ghost.0".into()
        })
    );
}

#[test]
fn pulse_generator_follows_the_clock() {
    let mut p = Component::with_kind("P1", ComponentKind::PulseGenerator);
    p.properties.voltage = Some(5.0);
    let r = Component::resistor("R1", 100.0);
    let g = Component::ground("G");
    let wires = vec![
        Wire::new("w1", p.port(0), r.port(0)),
        Wire::new("w2", r.port(1), p.port(1)),
        Wire::new("w3", p.port(1), g.port(0)),
    ];
    let mut sim = Simulation::with_circuit(vec![p, r, g], wires, SimSettings::default()).unwrap();
    sim.start();

    // 1 Hz, 50% duty: high during [0, 0.5), low during [0.5, 1).
    sim.step(0.6).unwrap();
    assert!(sim.component("R1").unwrap().state.current_flow > 0.04);
    sim.step(0.1).unwrap();
    assert!(sim.component("R1").unwrap().state.current_flow < 1e-9);
}

#[test]
fn energized_coil_produces_a_field() {
    let at = GeoPoint::new(48.85, 2.35, 35.0);
    let mut coil = Component::with_kind("L1", ComponentKind::Coil);
    coil.properties.position = Some(at);
    coil.properties.inductance = Some(1e-3);
    let mut sim = series(Component::resistor("R1", 10.0), 1.0, SimSettings::default());
    // Put the coil in series with the resistor.
    sim.remove_wire("w2").unwrap();
    sim.add_component(coil).unwrap();
    sim.add_wire(Wire::new("w4", "R1.1", "L1.0")).unwrap();
    sim.add_wire(Wire::new("w5", "L1.1", "V1.1")).unwrap();

    assert_eq!(sim.field_at(at).unwrap().magnitude, 0.0);

    sim.start();
    sim.step(0.1).unwrap();
    let i = sim.component("L1").unwrap().state.current_flow;
    assert!(i > 0.09);

    let sample = sim.field_at(at).unwrap();
    let expected = cs_core::units::constants::MU_0 * 10.0 * i / (2.0 * 0.05);
    assert!((sample.magnitude - expected).abs() / expected < 1e-6);

    let grid = sim.field_grid(&GridSpec::cube(at, 0.2, 7)).unwrap();
    assert_eq!(grid.metadata.resolution, 7);
    assert_eq!(grid.sources.len(), 1);
    assert!(grid.metadata.max_magnitude > 0.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Once failed, a component stays failed until reset, whatever the timesteps.
    #[test]
    fn failure_is_monotonic(dts in proptest::collection::vec(0.1f64..20.0, 1..15)) {
        let mut sim = series(Component::resistor("R1", 5.0), 10.0, SimSettings::default());
        sim.start();
        let mut seen_failed = false;
        for dt in dts {
            sim.step(dt).unwrap();
            let failed = sim.component("R1").unwrap().state.is_failed;
            prop_assert!(failed || !seen_failed);
            seen_failed |= failed;
        }
    }
}
