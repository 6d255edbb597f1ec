use cs_netlist::{NetlistError, ValidationError, load, parse_json, parse_yaml};
use cs_sim::StepOutcome;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

#[test]
fn divider_runs_to_expected_voltages() {
    let netlist = load(&fixture("divider.yaml")).unwrap();
    assert_eq!(netlist.name, "Voltage divider");

    let mut sim = netlist.into_simulation().unwrap();
    let report = sim.start();
    assert!(report.is_valid, "{:?}", report.errors);

    let outcome = sim.step(0.1).unwrap();
    assert!(matches!(outcome, StepOutcome::Advanced(_)));

    let r1 = sim.component("R1").unwrap();
    let r2 = sim.component("R2").unwrap();
    // 12 V across 3 kΩ plus a few hundredths of an ohm of wiring.
    assert!((r1.state.current_flow - 0.004).abs() < 1e-6);
    assert!((r1.state.voltage_drop - 4.0).abs() < 1e-3);
    assert!((r2.state.voltage_drop - 8.0).abs() < 1e-3);
}

#[test]
fn helmholtz_pair_produces_field() {
    let netlist = load(&fixture("helmholtz.json")).unwrap();
    let center = netlist.components[1].properties.position.unwrap();

    let mut sim = netlist.into_simulation().unwrap();
    assert!(sim.start().is_valid);
    sim.step(0.05).unwrap();

    let coil = sim.component("H1").unwrap();
    assert!(coil.state.current_flow > 0.4);

    let sample = sim.field_at(center).unwrap();
    assert!(sample.magnitude > 0.0);
    assert!(sample.magnitude.is_finite());
}

#[test]
fn legacy_netlist_is_migrated() {
    let netlist = load(&fixture("legacy_v0.yaml")).unwrap();
    assert_eq!(netlist.version, cs_netlist::LATEST_VERSION);
    let ids: Vec<_> = netlist.wires.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, ["wire1", "wire2", "wire3", "wire4"]);

    let mut sim = netlist.into_simulation().unwrap();
    assert!(sim.start().is_valid);
    sim.step(0.1).unwrap();
    let r1 = sim.component("R1").unwrap();
    assert!((r1.state.current_flow - 0.1).abs() < 1e-3);
}

#[test]
fn unknown_extension_is_rejected() {
    let err = load(&PathBuf::from("circuit.txt")).unwrap_err();
    assert!(matches!(err, NetlistError::UnknownFormat { .. }));
}

#[test]
fn missing_file_is_io_error() {
    let err = load(&fixture("does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, NetlistError::Io(_)));
}

#[test]
fn dangling_wire_fails_validation() {
    let yaml = r#"
version: 1
name: Broken
components:
  - id: R1
    kind: resistor
wires:
  - id: w1
    from: R1.0
    to: R9.1
"#;
    let err = parse_yaml(yaml).unwrap_err();
    match err {
        NetlistError::Validation(ValidationError::MissingReference { id, context }) => {
            assert_eq!(id, "R9.1");
            assert_eq!(context, "wire w1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_json_is_reported() {
    let err = parse_json("{ \"version\": 1, ").unwrap_err();
    assert!(matches!(err, NetlistError::Json(_)));
}

#[test]
fn invalid_field_config_is_a_sim_error() {
    let json = r#"{
        "version": 1,
        "name": "Bad field",
        "settings": { "field": { "pointSegments": 0 } },
        "components": []
    }"#;
    let netlist = parse_json(json).unwrap();
    let err = netlist.into_simulation().unwrap_err();
    assert!(matches!(err, NetlistError::Sim(_)));
}
