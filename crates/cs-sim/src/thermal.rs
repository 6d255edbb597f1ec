//! Lumped per-component thermal model.
//!
//! Each component is a single thermal mass coupled to ambient through a
//! thermal resistance:
//!
//! ```text
//! C_th · dT/dt = P_gen - (T - T_amb) / R_th
//! ```
//!
//! integrated with forward Euler, split into sub-steps no longer than the
//! time constant `R_th · C_th`.

use crate::integrator::ForwardEuler;
use cs_components::{FailureType, ThermalProperties, WarningLevel};
use serde::{Deserialize, Serialize};

/// Net heat flow (W) into the component at temperature `temperature`.
pub fn net_heat(props: &ThermalProperties, heat_generation: f64, temperature: f64) -> f64 {
    let dissipation = (temperature - props.ambient_temperature) / props.thermal_resistance;
    heat_generation - dissipation
}

/// Temperature after `dt` seconds with constant `heat_generation` watts.
///
/// A `dt` longer than [`MAX_SUBSTEPS`](crate::integrator::MAX_SUBSTEPS) time constants lands on the steady
/// state directly.
pub fn integrate(props: &ThermalProperties, temperature: f64, heat_generation: f64, dt: f64) -> f64 {
    let euler = ForwardEuler::with_max_step(props.time_constant());
    if euler.saturates(dt) {
        return props.ambient_temperature + heat_generation * props.thermal_resistance;
    }
    let rate = |t: f64| net_heat(props, heat_generation, t) / props.thermal_mass;
    euler.step(&rate, temperature, dt)
}

/// Warning bucket for a temperature, by its fraction of the rated maximum.
pub fn warning_level(props: &ThermalProperties, temperature: f64) -> WarningLevel {
    let stress = temperature / props.max_temperature;
    if stress > 0.95 {
        WarningLevel::Critical
    } else if stress > 0.90 {
        WarningLevel::High
    } else if stress > 0.80 {
        WarningLevel::Medium
    } else if temperature > props.warning_temperature() {
        WarningLevel::Low
    } else {
        WarningLevel::None
    }
}

/// Predictive summary of a component's thermal condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalAssessment {
    pub temperature: f64,
    /// `T / T_max`.
    pub thermal_stress: f64,
    pub warning_level: WarningLevel,
    /// `T_amb + P · R_th`.
    pub steady_state_temperature: f64,
    pub will_overheat: bool,
    pub will_fail: bool,
    /// Seconds until `T_max` at the current load, if it will ever be reached.
    pub time_to_failure: Option<f64>,
}

/// Classify a component at `temperature` dissipating `heat_generation` watts.
pub fn assess(props: &ThermalProperties, temperature: f64, heat_generation: f64) -> ThermalAssessment {
    let max = props.max_temperature;
    let steady = props.ambient_temperature + heat_generation * props.thermal_resistance;
    let time_to_failure = if temperature >= max {
        Some(0.0)
    } else if steady > max {
        // T(t) = Tss - (Tss - T0)·e^(-t/τ) reaches max at t = τ·ln((Tss - T0)/(Tss - max)).
        Some(props.time_constant() * ((steady - temperature) / (steady - max)).ln())
    } else {
        None
    };

    ThermalAssessment {
        temperature,
        thermal_stress: temperature / max,
        warning_level: warning_level(props, temperature),
        steady_state_temperature: steady,
        will_overheat: steady > props.warning_temperature(),
        will_fail: steady >= max,
        time_to_failure,
    }
}

/// Failure triggered this tick, if any.
///
/// Thermal failure wins over overvoltage when both apply.
pub fn detect_failure(
    props: &ThermalProperties,
    temperature: f64,
    voltage_drop: f64,
    voltage_rating: Option<f64>,
) -> Option<FailureType> {
    if temperature >= props.max_temperature {
        return Some(FailureType::Thermal);
    }
    match voltage_rating {
        Some(rating) if rating.is_finite() && rating > 0.0 && voltage_drop > rating => {
            Some(FailureType::Overvoltage)
        }
        _ => None,
    }
}
