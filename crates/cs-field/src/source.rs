//! Current-loop sources derived from magnetic components.

use cs_components::common::positive_or;
use cs_components::{Component, ComponentKind};
use cs_core::GeoPoint;
use serde::{Deserialize, Serialize};

/// Components carrying less than this (A) contribute no field.
pub const MIN_SOURCE_CURRENT: f64 = 1e-9;

/// At most this many loops are sampled along a solenoid.
pub const MAX_SOLENOID_LOOPS: u32 = 20;

pub const COIL_RADIUS_M: f64 = 0.05;
pub const COIL_TURNS: u32 = 10;
pub const SOLENOID_RADIUS_M: f64 = 0.02;
pub const SOLENOID_LENGTH_M: f64 = 0.1;
pub const SOLENOID_TURNS: u32 = 100;
pub const HELMHOLTZ_RADIUS_M: f64 = 0.1;
pub const HELMHOLTZ_TURNS: u32 = 50;

/// One circular current loop, axis along the local vertical at `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagneticSource {
    /// Id of the component this loop was sampled from.
    pub component: String,
    pub kind: ComponentKind,
    pub position: GeoPoint,
    /// Metres.
    pub radius: f64,
    /// Effective turn count carried by this loop.
    pub turns: f64,
    /// Amperes.
    pub current: f64,
}

fn turns(v: Option<u32>, default: u32) -> u32 {
    v.filter(|&n| n > 0).unwrap_or(default)
}

/// Loops for a single component, empty unless it is an active magnetic part.
pub fn component_sources(component: &Component) -> Vec<MagneticSource> {
    let current = component.state.current_flow;
    if !component.kind.is_magnetic()
        || component.state.is_failed
        || !current.is_finite()
        || current.abs() <= MIN_SOURCE_CURRENT
    {
        return Vec::new();
    }

    let props = &component.properties;
    let position = props.position.unwrap_or_default();
    let make = |position: GeoPoint, radius: f64, turns: f64| MagneticSource {
        component: component.id.clone(),
        kind: component.kind,
        position,
        radius,
        turns,
        current,
    };

    match component.kind {
        ComponentKind::Coil => {
            let r = positive_or(props.radius, COIL_RADIUS_M);
            let n = turns(props.turns, COIL_TURNS);
            vec![make(position, r, f64::from(n))]
        }
        ComponentKind::Solenoid => {
            let r = positive_or(props.radius, SOLENOID_RADIUS_M);
            let len = positive_or(props.length, SOLENOID_LENGTH_M);
            let n = turns(props.turns, SOLENOID_TURNS);
            let stride = n.div_ceil(MAX_SOLENOID_LOOPS);
            let count = n.div_ceil(stride);
            (0..count)
                .map(|k| {
                    let carried = if k + 1 == count {
                        n - stride * (count - 1)
                    } else {
                        stride
                    };
                    let z = -len / 2.0 + len * (f64::from(k) + 0.5) / f64::from(count);
                    make(position.raised(z), r, f64::from(carried))
                })
                .collect()
        }
        ComponentKind::Helmholtz => {
            let r = positive_or(props.radius, HELMHOLTZ_RADIUS_M);
            let n = turns(props.turns, HELMHOLTZ_TURNS);
            let sep = positive_or(props.separation, r);
            [-sep / 2.0, sep / 2.0]
                .into_iter()
                .map(|z| make(position.raised(z), r, f64::from(n)))
                .collect()
        }
        _ => Vec::new(),
    }
}

/// All loops contributed by a component list, in component order.
pub fn collect_sources(components: &[Component]) -> Vec<MagneticSource> {
    components.iter().flat_map(component_sources).collect()
}
