//! The simulation handle: circuit ownership, lifecycle and the per-tick pipeline.
//!
//! A tick runs graph build → nodal solve → branch currents → thermal update →
//! failure detection. Every pass reads the component list immutably and
//! returns deltas; the handle merges them once at the end of the tick.

use crate::error::{SimError, SimResult};
use crate::settings::SimSettings;
use crate::thermal::{self, ThermalAssessment};
use crate::validation::{ValidationReport, validate_circuit};
use cs_components::{
    BranchContext, Component, ComponentState, FailureType, ThermalProperties, WarningLevel, Wire,
    WireState, heating_load,
};
use cs_core::GeoPoint;
use cs_core::units::hz;
use cs_field::{FieldGrid, FieldSample, GridSpec, collect_sources, field_at, sample_grid};
use cs_graph::{BranchOwner, Graph, build_circuit};
use cs_solver::{BranchCurrent, SolveStatus, branch_currents, solve_nodal};
use serde::{Deserialize, Serialize};

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimStatus {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Per-component thermal outlook recorded with a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentThermal {
    pub id: String,
    pub assessment: ThermalAssessment,
}

/// Summary of one advanced tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    /// Simulated time after the tick, seconds.
    pub clock: f64,
    pub dt: f64,
    pub node_count: usize,
    /// Unknowns in the nodal system.
    pub system_size: usize,
    /// True when the nodal system was singular and voltages were zeroed.
    pub solver_fallback: bool,
    /// Components that failed during this tick.
    pub newly_failed: Vec<String>,
    /// Empty when thermal simulation is disabled.
    pub thermal: Vec<ComponentThermal>,
}

/// What a call to [`Simulation::step`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The simulation is not running; nothing changed.
    NotRunning,
    /// The circuit has no nodes to solve; nothing changed.
    Idle,
    Advanced(TickReport),
}

/// Serializable view of the whole circuit state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub status: SimStatus,
    pub clock: f64,
    pub step_count: u64,
    pub components: Vec<ComponentReading>,
    pub wires: Vec<WireReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReading {
    pub id: String,
    pub name: String,
    pub state: ComponentState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReading {
    pub id: String,
    pub state: WireState,
}

/// Electrical readings for one component.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ElectricalDelta {
    current_flow: f64,
    voltage_drop: f64,
    power_dissipation: f64,
}

/// Thermal update for one component.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ThermalDelta {
    temperature: f64,
    warning_level: WarningLevel,
    assessment: ThermalAssessment,
}

/// A circuit simulation with an owned lifecycle.
///
/// All mutation goes through `&mut self`; hosts that share an instance across
/// threads wrap it in a `Mutex`.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    components: Vec<Component>,
    wires: Vec<Wire>,
    settings: SimSettings,
    clock: f64,
    status: SimStatus,
    step_count: u64,
    last_report: Option<TickReport>,
}

impl Simulation {
    pub fn new(settings: SimSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Build a simulation from a prepared circuit.
    pub fn with_circuit(
        components: Vec<Component>,
        wires: Vec<Wire>,
        settings: SimSettings,
    ) -> SimResult<Self> {
        check_settings(&settings)?;
        let mut sim = Self::new(settings);
        for c in components {
            sim.add_component(c)?;
        }
        for w in wires {
            sim.add_wire(w)?;
        }
        Ok(sim)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn wire(&self, id: &str) -> Option<&Wire> {
        self.wires.iter().find(|w| w.id == id)
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    pub fn status(&self) -> SimStatus {
        self.status
    }

    /// Simulated time, seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            clock: self.clock,
            step_count: self.step_count,
            components: self
                .components
                .iter()
                .map(|c| ComponentReading {
                    id: c.id.clone(),
                    name: c.label().to_string(),
                    state: c.state.clone(),
                })
                .collect(),
            wires: self
                .wires
                .iter()
                .map(|w| WireReading {
                    id: w.id.clone(),
                    state: w.state,
                })
                .collect(),
        }
    }

    /// Replace the settings. Takes effect on the next tick.
    pub fn set_settings(&mut self, settings: SimSettings) -> SimResult<()> {
        check_settings(&settings)?;
        self.settings = settings;
        Ok(())
    }

    pub fn add_component(&mut self, component: Component) -> SimResult<()> {
        if self.component(&component.id).is_some() {
            return Err(SimError::DuplicateId { id: component.id });
        }
        self.components.push(component);
        Ok(())
    }

    /// Remove a component and every wire attached to its ports.
    pub fn remove_component(&mut self, id: &str) -> SimResult<Component> {
        let idx = self
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| SimError::UnknownComponent { id: id.to_string() })?;
        let removed = self.components.remove(idx);
        self.wires
            .retain(|w| !removed.ports.iter().any(|p| w.touches(&p.id)));
        Ok(removed)
    }

    /// Add a wire. Port references are checked when the next tick builds the graph.
    pub fn add_wire(&mut self, wire: Wire) -> SimResult<()> {
        if self.wire(&wire.id).is_some() {
            return Err(SimError::DuplicateId { id: wire.id });
        }
        self.wires.push(wire);
        Ok(())
    }

    pub fn remove_wire(&mut self, id: &str) -> SimResult<Wire> {
        let idx = self
            .wires
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| SimError::UnknownWire { id: id.to_string() })?;
        Ok(self.wires.remove(idx))
    }

    pub fn validate(&self) -> ValidationReport {
        validate_circuit(&self.components, &self.wires)
    }

    /// Validate and, if the circuit is valid, start running.
    pub fn start(&mut self) -> ValidationReport {
        let report = self.validate();
        if report.is_valid {
            self.status = SimStatus::Running;
            tracing::info!(
                components = self.components.len(),
                wires = self.wires.len(),
                "simulation started"
            );
        } else {
            tracing::info!(errors = report.errors.len(), "simulation not started");
        }
        report
    }

    /// Stop running. Component state is left as is.
    pub fn stop(&mut self) {
        if self.status != SimStatus::Stopped {
            tracing::info!(clock = self.clock, "simulation stopped");
        }
        self.status = SimStatus::Stopped;
    }

    /// Return every component and wire to its initial state and go idle.
    pub fn reset(&mut self) {
        let ambient = self.settings.ambient_temperature;
        for c in &mut self.components {
            c.state = ComponentState::at_ambient(ambient);
        }
        for w in &mut self.wires {
            w.state = WireState::default();
        }
        self.clock = 0.0;
        self.step_count = 0;
        self.last_report = None;
        self.status = SimStatus::Idle;
        tracing::info!("simulation reset");
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f64) -> SimResult<StepOutcome> {
        if self.status != SimStatus::Running {
            return Ok(StepOutcome::NotRunning);
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidTimestep { dt });
        }

        let ctx = BranchContext {
            frequency: hz(self.settings.frequency),
            clock_s: self.clock,
        };
        let Some(graph) = build_circuit(&self.components, &self.wires, &ctx)? else {
            tracing::debug!(clock = self.clock, "no nodes to solve, idle tick");
            return Ok(StepOutcome::Idle);
        };

        let solution = solve_nodal(&graph)?;
        let currents = branch_currents(&graph, &solution);

        let electrical = electrical_pass(&self.components, &graph, &currents);
        let wires = wire_pass(self.wires.len(), &graph, &currents);
        let thermal = if self.settings.enable_thermal {
            thermal_pass(&self.components, &electrical, self.settings.ambient_temperature, dt)
        } else {
            Vec::new()
        };
        let failures = if self.settings.enable_failures {
            failure_pass(
                &self.components,
                &electrical,
                &thermal,
                self.settings.ambient_temperature,
            )
        } else {
            vec![None; self.components.len()]
        };

        self.clock += dt;
        let report = TickReport {
            clock: self.clock,
            dt,
            node_count: graph.nodes().len(),
            system_size: solution.size,
            solver_fallback: solution.status == SolveStatus::Zeroed,
            newly_failed: Vec::new(),
            thermal: Vec::new(),
        };
        let report = self.commit(report, &electrical, &wires, &thermal, &failures);

        self.step_count += 1;
        tracing::debug!(
            nodes = report.node_count,
            size = report.system_size,
            clock = self.clock,
            "tick"
        );
        self.last_report = Some(report.clone());
        Ok(StepOutcome::Advanced(report))
    }

    /// Merge the tick's deltas into the owned state.
    fn commit(
        &mut self,
        mut report: TickReport,
        electrical: &[ElectricalDelta],
        wires: &[WireState],
        thermal: &[ThermalDelta],
        failures: &[Option<FailureType>],
    ) -> TickReport {
        for (i, c) in self.components.iter_mut().enumerate() {
            let e = electrical[i];
            c.state.current_flow = e.current_flow;
            c.state.voltage_drop = e.voltage_drop;
            c.state.power_dissipation = e.power_dissipation;

            if let Some(t) = thermal.get(i) {
                c.state.temperature = t.temperature;
                c.state.warning_level = t.warning_level;
                report.thermal.push(ComponentThermal {
                    id: c.id.clone(),
                    assessment: t.assessment,
                });
            }

            if let Some(kind) = failures[i] {
                c.state.is_failed = true;
                c.state.failure_type = Some(kind);
                tracing::info!(component = %c.id, failure = %kind, "component failed");
                report.newly_failed.push(c.id.clone());
            }
        }
        for (w, state) in self.wires.iter_mut().zip(wires) {
            w.state = *state;
        }
        report
    }

    /// Field of the active magnetic components at a geodetic point.
    pub fn field_at(&self, point: GeoPoint) -> SimResult<FieldSample> {
        let sources = collect_sources(&self.components);
        Ok(field_at(&sources, point, &self.settings.field)?)
    }

    /// Field of the active magnetic components sampled over a grid.
    pub fn field_grid(&self, spec: &GridSpec) -> SimResult<FieldGrid> {
        let sources = collect_sources(&self.components);
        Ok(sample_grid(&sources, spec, &self.settings.field)?)
    }
}

fn check_settings(settings: &SimSettings) -> SimResult<()> {
    if !settings.frequency.is_finite() {
        return Err(SimError::InvalidSettings { what: "frequency" });
    }
    if !settings.ambient_temperature.is_finite() {
        return Err(SimError::InvalidSettings {
            what: "ambient temperature",
        });
    }
    settings.field.validate()?;
    Ok(())
}

fn reading(owner: BranchOwner, graph: &Graph, currents: &[BranchCurrent]) -> (f64, f64) {
    graph
        .branch_for(owner)
        .and_then(|b| currents.get(b.id.slot()))
        .map_or((0.0, 0.0), |c| (c.magnitude(), c.voltage_drop()))
}

/// Current, voltage drop and heat generation for every component.
fn electrical_pass(
    components: &[Component],
    graph: &Graph,
    currents: &[BranchCurrent],
) -> Vec<ElectricalDelta> {
    components
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let (current, voltage) = reading(BranchOwner::Component(i), graph, currents);
            ElectricalDelta {
                current_flow: current,
                voltage_drop: voltage,
                power_dissipation: heating_load(c).heat(current, voltage),
            }
        })
        .collect()
}

fn wire_pass(count: usize, graph: &Graph, currents: &[BranchCurrent]) -> Vec<WireState> {
    (0..count)
        .map(|i| {
            let (current, voltage_drop) = reading(BranchOwner::Wire(i), graph, currents);
            WireState {
                current,
                voltage_drop,
            }
        })
        .collect()
}

/// New temperature and classification for every component.
fn thermal_pass(
    components: &[Component],
    electrical: &[ElectricalDelta],
    ambient: f64,
    dt: f64,
) -> Vec<ThermalDelta> {
    components
        .iter()
        .zip(electrical)
        .map(|(c, e)| {
            let props = ThermalProperties::for_component(c, ambient);
            let temperature =
                thermal::integrate(&props, c.state.temperature, e.power_dissipation, dt);
            let assessment = thermal::assess(&props, temperature, e.power_dissipation);
            ThermalDelta {
                temperature,
                warning_level: assessment.warning_level,
                assessment,
            }
        })
        .collect()
}

/// Failures newly triggered this tick; already-failed parts are skipped.
fn failure_pass(
    components: &[Component],
    electrical: &[ElectricalDelta],
    thermal: &[ThermalDelta],
    ambient: f64,
) -> Vec<Option<FailureType>> {
    components
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if c.state.is_failed {
                return None;
            }
            let props = ThermalProperties::for_component(c, ambient);
            let temperature = thermal.get(i).map_or(c.state.temperature, |t| t.temperature);
            thermal::detect_failure(
                &props,
                temperature,
                electrical[i].voltage_drop,
                c.properties.voltage_rating,
            )
        })
        .collect()
}
