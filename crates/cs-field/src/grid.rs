//! Point and grid field queries.

use crate::biot_savart::{FieldConfig, LocalLoop, superpose};
use crate::error::{FieldError, FieldResult};
use crate::frame::EnuFrame;
use crate::source::MagneticSource;
use cs_components::ComponentKind;
use cs_core::GeoPoint;
use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Plain `{x, y, z}` record for serialized vectors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Vector3<f64>> for Xyz {
    fn from(v: Vector3<f64>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Xyz> for Vector3<f64> {
    fn from(v: Xyz) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

/// Field at a single point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSample {
    /// Tesla, in the East-North-Up frame at the query point.
    pub field: Xyz,
    pub magnitude: f64,
}

/// Evaluate the field of `sources` at a geodetic point.
pub fn field_at(
    sources: &[MagneticSource],
    point: GeoPoint,
    config: &FieldConfig,
) -> FieldResult<FieldSample> {
    config.validate()?;
    if !point.is_finite() {
        return Err(FieldError::NonFinite {
            what: "query point",
        });
    }
    let frame = EnuFrame::new(point);
    let loops: Vec<LocalLoop> = sources
        .iter()
        .map(|s| LocalLoop::from_source(s, &frame))
        .collect();
    let b = superpose(&loops, &Vector3::zeros(), config.point_segments);
    Ok(FieldSample {
        field: b.into(),
        magnitude: b.norm(),
    })
}

/// Extent of one grid axis, metres relative to the grid centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Symmetric range `[-half, half]`.
    pub fn symmetric(half: f64) -> Self {
        Self::new(-half, half)
    }

    fn check(&self, axis: &'static str) -> FieldResult<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(FieldError::InvalidBounds {
                axis,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    fn sample(&self, i: usize, resolution: usize) -> f64 {
        self.min + (self.max - self.min) * i as f64 / (resolution - 1) as f64
    }
}

/// Axis-aligned sampling box around a geodetic centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub center: GeoPoint,
    /// East.
    pub x: AxisRange,
    /// North.
    pub y: AxisRange,
    /// Up.
    pub z: AxisRange,
    /// Requested points per axis; clamped to the configured range.
    pub resolution: usize,
}

impl GridSpec {
    /// Cube of side `2 * half_extent` centred on `center`.
    pub fn cube(center: GeoPoint, half_extent: f64, resolution: usize) -> Self {
        let r = AxisRange::symmetric(half_extent);
        Self {
            center,
            x: r,
            y: r,
            z: r,
            resolution,
        }
    }

    pub fn validate(&self) -> FieldResult<()> {
        if !self.center.is_finite() {
            return Err(FieldError::NonFinite {
                what: "grid centre",
            });
        }
        self.x.check("x")?;
        self.y.check("y")?;
        self.z.check("z")
    }
}

/// One retained grid sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPoint {
    /// Metres from the grid centre (east, north, up).
    pub position: Xyz,
    /// Tesla.
    pub field: Xyz,
    pub magnitude: f64,
}

/// Source loop as placed in the grid frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub component: String,
    pub kind: ComponentKind,
    pub position: GeoPoint,
    /// Loop centre in the grid frame.
    pub local: Xyz,
    pub radius: f64,
    pub turns: f64,
    pub current: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridMetadata {
    /// Points per axis after clamping.
    pub resolution: usize,
    pub segments: usize,
    pub source_count: usize,
    /// Points evaluated (`resolution³`).
    pub sampled_points: usize,
    /// Points kept above the magnitude floor.
    pub returned_points: usize,
    pub max_magnitude: f64,
}

/// Result of a grid query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGrid {
    pub field: Vec<FieldPoint>,
    pub sources: Vec<SourceInfo>,
    pub metadata: GridMetadata,
}

/// Sample the field of `sources` over the grid described by `spec`.
///
/// Only points whose magnitude exceeds `config.magnitude_floor` are returned.
/// Planes along x are evaluated in parallel and concatenated in index order,
/// so the output does not depend on scheduling.
pub fn sample_grid(
    sources: &[MagneticSource],
    spec: &GridSpec,
    config: &FieldConfig,
) -> FieldResult<FieldGrid> {
    config.validate()?;
    spec.validate()?;

    let res = config.clamp_resolution(spec.resolution);
    let segments = config.grid_segments;
    let floor = config.magnitude_floor;
    let frame = EnuFrame::new(spec.center);
    let loops: Vec<LocalLoop> = sources
        .iter()
        .map(|s| LocalLoop::from_source(s, &frame))
        .collect();

    let planes: Vec<Vec<FieldPoint>> = (0..res)
        .into_par_iter()
        .map(|i| {
            let x = spec.x.sample(i, res);
            let mut plane = Vec::new();
            for j in 0..res {
                let y = spec.y.sample(j, res);
                for k in 0..res {
                    let p = Vector3::new(x, y, spec.z.sample(k, res));
                    let b = superpose(&loops, &p, segments);
                    let magnitude = b.norm();
                    if magnitude > floor {
                        plane.push(FieldPoint {
                            position: p.into(),
                            field: b.into(),
                            magnitude,
                        });
                    }
                }
            }
            plane
        })
        .collect();
    let field: Vec<FieldPoint> = planes.into_iter().flatten().collect();

    let max_magnitude = field.iter().map(|p| p.magnitude).fold(0.0, f64::max);
    let metadata = GridMetadata {
        resolution: res,
        segments,
        source_count: sources.len(),
        sampled_points: res * res * res,
        returned_points: field.len(),
        max_magnitude,
    };
    tracing::debug!(
        resolution = res,
        sources = sources.len(),
        returned = field.len(),
        "sampled field grid"
    );

    let sources = sources
        .iter()
        .zip(&loops)
        .map(|(s, l)| SourceInfo {
            component: s.component.clone(),
            kind: s.kind,
            position: s.position,
            local: l.center.into(),
            radius: s.radius,
            turns: s.turns,
            current: s.current,
        })
        .collect();

    Ok(FieldGrid {
        field,
        sources,
        metadata,
    })
}
