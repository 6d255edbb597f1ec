//! Complex impedance model and the per-kind branch table.
//!
//! Impedances are `R + jX` values in ohms. Degenerate inputs never fault:
//! a capacitor without a usable frequency or capacitance is an open circuit,
//! an inductor without one is a (strictly positive) short.

use crate::common::{finite_or, positive_or};
use crate::component::Component;
use crate::kind::ComponentKind;
use cs_core::numeric::{Complex64, cplx};
use cs_core::units::{Capacitance, Frequency, Inductance, Resistance};
use std::f64::consts::PI;

/// Stand-in for infinite impedance (open switch, blocked capacitor, failed part).
pub const OPEN_CIRCUIT_OHMS: f64 = 1e12;

/// Smallest impedance magnitude ever produced.
pub const SHORT_CIRCUIT_OHMS: f64 = 1e-6;

/// Wires, closed switches, source internals and unknown parts.
pub const CONDUCTOR_OHMS: f64 = 0.01;

/// Resistor value when the property is missing.
pub const DEFAULT_RESISTANCE_OHMS: f64 = 1000.0;

/// Pulse generator repetition rate when the property is missing.
pub const DEFAULT_PULSE_FREQUENCY_HZ: f64 = 1.0;

/// Pulse generator duty cycle when the property is missing.
pub const DEFAULT_DUTY_CYCLE: f64 = 0.5;

/// Resistance of a resistor as both the branch and the heating model see it:
/// the property (or [`DEFAULT_RESISTANCE_OHMS`]) floored at [`SHORT_CIRCUIT_OHMS`].
pub fn resistor_ohms(resistance: Option<f64>) -> f64 {
    finite_or(resistance, DEFAULT_RESISTANCE_OHMS).max(SHORT_CIRCUIT_OHMS)
}

/// Purely resistive impedance, floored at [`SHORT_CIRCUIT_OHMS`].
pub fn resistive(r: Resistance) -> Complex64 {
    let ohms = finite_or(Some(r.value), DEFAULT_RESISTANCE_OHMS);
    cplx(ohms.max(SHORT_CIRCUIT_OHMS), 0.0)
}

/// `0 - j/(2πfC)`, or an open circuit when `f ≤ 0` or `C ≤ 0`.
pub fn capacitive(c: Capacitance, f: Frequency) -> Complex64 {
    let (c, f) = (c.value, f.value);
    if !(c.is_finite() && f.is_finite()) || c <= 0.0 || f <= 0.0 {
        return open_circuit();
    }
    let x = 1.0 / (2.0 * PI * f * c);
    if !x.is_finite() || x > OPEN_CIRCUIT_OHMS {
        return open_circuit();
    }
    cplx(0.0, -x.max(SHORT_CIRCUIT_OHMS))
}

/// `0 + j2πfL`, or a short when `f ≤ 0` or `L ≤ 0`.
pub fn inductive(l: Inductance, f: Frequency) -> Complex64 {
    let (l, f) = (l.value, f.value);
    if !(l.is_finite() && f.is_finite()) || l <= 0.0 || f <= 0.0 {
        return short_circuit();
    }
    let x = 2.0 * PI * f * l;
    if !x.is_finite() {
        return open_circuit();
    }
    cplx(0.0, x.clamp(SHORT_CIRCUIT_OHMS, OPEN_CIRCUIT_OHMS))
}

pub fn open_circuit() -> Complex64 {
    cplx(OPEN_CIRCUIT_OHMS, 0.0)
}

pub fn short_circuit() -> Complex64 {
    cplx(SHORT_CIRCUIT_OHMS, 0.0)
}

/// `Y = 1/Z`.
pub fn admittance(z: Complex64) -> Complex64 {
    z.inv()
}

/// True when `z` is the open-circuit stand-in (or larger).
pub fn is_open(z: Complex64) -> bool {
    z.norm() >= OPEN_CIRCUIT_OHMS
}

/// Excitation context shared by every branch in one solve.
#[derive(Debug, Clone, Copy)]
pub struct BranchContext {
    /// Excitation frequency for reactive branches.
    pub frequency: Frequency,
    /// Simulated clock, seconds; drives pulse generators.
    pub clock_s: f64,
}

/// Electrical model of one component branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchModel {
    /// Series impedance (internal resistance for sources).
    pub impedance: Complex64,
    /// Headline value of the part: ohms, farads, henries, volts, or 0/1 for switches.
    pub nominal: f64,
    /// EMF in series with the impedance, first port positive.
    pub emf: Option<Complex64>,
}

impl BranchModel {
    fn passive(impedance: Complex64, nominal: f64) -> Self {
        Self {
            impedance,
            nominal,
            emf: None,
        }
    }
}

/// Branch model of a plain wire (and of ground bonds).
pub fn wire_model() -> BranchModel {
    BranchModel::passive(cplx(CONDUCTOR_OHMS, 0.0), CONDUCTOR_OHMS)
}

/// Branch model for a component, or `None` for kinds that never form a branch.
///
/// Failed components are rebuilt as open circuits without EMF.
pub fn branch_model(component: &Component, ctx: &BranchContext) -> Option<BranchModel> {
    use cs_core::units::{farad, henry, ohm};

    let props = &component.properties;
    let model = match component.kind {
        ComponentKind::Ground => return None,
        ComponentKind::Resistor => {
            let r = resistor_ohms(props.resistance);
            BranchModel::passive(resistive(ohm(r)), r)
        }
        ComponentKind::Capacitor => {
            let c = finite_or(props.capacitance, 0.0);
            BranchModel::passive(capacitive(farad(c), ctx.frequency), c)
        }
        ComponentKind::Inductor
        | ComponentKind::Coil
        | ComponentKind::Solenoid
        | ComponentKind::Helmholtz => {
            let l = finite_or(props.inductance, 0.0);
            BranchModel::passive(inductive(henry(l), ctx.frequency), l)
        }
        ComponentKind::DcSource | ComponentKind::AcSource | ComponentKind::PulseGenerator => {
            let v = finite_or(props.voltage, 0.0);
            BranchModel {
                impedance: cplx(CONDUCTOR_OHMS, 0.0),
                nominal: v,
                emf: Some(source_emf(component, ctx.clock_s)),
            }
        }
        ComponentKind::Switch => {
            if component.is_closed() {
                BranchModel::passive(cplx(CONDUCTOR_OHMS, 0.0), 1.0)
            } else {
                BranchModel::passive(open_circuit(), 0.0)
            }
        }
        ComponentKind::Wire | ComponentKind::Other => wire_model(),
    };

    if component.state.is_failed {
        return Some(BranchModel {
            impedance: open_circuit(),
            nominal: model.nominal,
            emf: None,
        });
    }
    Some(model)
}

/// EMF phasor of a source at simulated time `clock_s`.
///
/// DC sources are constant, AC sources are a zero-phase phasor of amplitude
/// `voltage` at the shared excitation frequency, pulse generators are a square
/// wave that is `voltage` while high and 0 while low.
pub fn source_emf(component: &Component, clock_s: f64) -> Complex64 {
    let props = &component.properties;
    let v = finite_or(props.voltage, 0.0);
    match component.kind {
        ComponentKind::PulseGenerator => {
            let freq = positive_or(props.pulse_frequency, DEFAULT_PULSE_FREQUENCY_HZ);
            let duty = finite_or(props.duty_cycle, DEFAULT_DUTY_CYCLE).clamp(0.0, 1.0);
            let phase = (clock_s * freq).rem_euclid(1.0);
            if phase < duty { cplx(v, 0.0) } else { cplx(0.0, 0.0) }
        }
        ComponentKind::DcSource | ComponentKind::AcSource => cplx(v, 0.0),
        _ => cplx(0.0, 0.0),
    }
}
