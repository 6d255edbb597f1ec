//! Discretized Biot–Savart integration over circular loops.

use crate::error::{FieldError, FieldResult};
use crate::frame::{EnuFrame, up_ecef};
use crate::source::MagneticSource;
use cs_core::units::constants::MU_0;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Segments closer than this (m) to the query point are skipped.
const SINGULAR_DISTANCE: f64 = 1e-9;

/// Accuracy and payload knobs for field queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldConfig {
    /// Segments per loop for single-point queries.
    pub point_segments: usize,
    /// Segments per loop for grid sampling.
    pub grid_segments: usize,
    /// Grid points at or below this magnitude (T) are dropped.
    pub magnitude_floor: f64,
    pub min_resolution: usize,
    pub max_resolution: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            point_segments: 72,
            grid_segments: 36,
            magnitude_floor: 1e-15,
            min_resolution: 5,
            max_resolution: 30,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> FieldResult<()> {
        if self.point_segments < 3 || self.grid_segments < 3 {
            return Err(FieldError::InvalidConfig {
                what: "segment count must be at least 3",
            });
        }
        if self.min_resolution < 2 || self.min_resolution > self.max_resolution {
            return Err(FieldError::InvalidConfig {
                what: "resolution range",
            });
        }
        if !self.magnitude_floor.is_finite() || self.magnitude_floor < 0.0 {
            return Err(FieldError::InvalidConfig {
                what: "magnitude floor",
            });
        }
        Ok(())
    }

    /// Clamp a requested per-axis resolution into the configured range.
    pub fn clamp_resolution(&self, requested: usize) -> usize {
        requested.clamp(self.min_resolution, self.max_resolution)
    }
}

/// A loop resolved into a local Cartesian frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalLoop {
    pub center: Vector3<f64>,
    /// In-plane unit vectors; `u × v` is the loop axis.
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
    pub radius: f64,
    /// `μ₀·N·I / 4π`.
    pub strength: f64,
}

impl LocalLoop {
    /// Place a loop with the given centre and axis.
    pub fn new(center: Vector3<f64>, axis: Vector3<f64>, radius: f64, turns: f64, current: f64) -> Self {
        let axis = axis.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
        // Any vector not parallel to the axis seeds the in-plane basis.
        let seed = if axis.z.abs() < 0.9 {
            Vector3::z()
        } else {
            Vector3::y()
        };
        let u = seed.cross(&axis).normalize();
        let v = axis.cross(&u);
        Self {
            center,
            u,
            v,
            radius,
            strength: MU_0 * turns * current / (4.0 * PI),
        }
    }

    /// Resolve a geodetic source into `frame`.
    pub fn from_source(source: &MagneticSource, frame: &EnuFrame) -> Self {
        Self::new(
            frame.to_local(source.position),
            frame.direction(up_ecef(source.position)),
            source.radius,
            source.turns,
            source.current,
        )
    }

    pub fn axis(&self) -> Vector3<f64> {
        self.u.cross(&self.v)
    }

    /// Field (T) of this loop at `point`, summed over `segments` midpoints.
    pub fn field_at(&self, point: &Vector3<f64>, segments: usize) -> Vector3<f64> {
        let dtheta = 2.0 * PI / segments as f64;
        let mut b = Vector3::zeros();
        for i in 0..segments {
            let theta = (i as f64 + 0.5) * dtheta;
            let (s, c) = theta.sin_cos();
            let mid = self.center + self.radius * (c * self.u + s * self.v);
            let dl = self.radius * dtheta * (-s * self.u + c * self.v);
            let r = point - mid;
            let dist = r.norm();
            if dist < SINGULAR_DISTANCE {
                continue;
            }
            b += dl.cross(&r) / (dist * dist * dist);
        }
        b * self.strength
    }
}

/// Superposed field of `loops` at `point`.
pub fn superpose(loops: &[LocalLoop], point: &Vector3<f64>, segments: usize) -> Vector3<f64> {
    loops
        .iter()
        .map(|l| l.field_at(point, segments))
        .fold(Vector3::zeros(), |acc, b| acc + b)
}
