//! Fixed-step explicit integration for lumped first-order models.

/// Right-hand side of a scalar ODE `dx/dt = f(x)`.
pub trait ScalarModel {
    fn rhs(&self, x: f64) -> f64;
}

impl<F: Fn(f64) -> f64> ScalarModel for F {
    fn rhs(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Upper bound on sub-steps for a single call to [`ForwardEuler::step`].
pub const MAX_SUBSTEPS: usize = 10_000;

/// Forward Euler (explicit, 1st order).
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler {
    /// Longest single step; larger `dt` is split into equal sub-steps.
    /// `None` always takes one step.
    pub max_step: Option<f64>,
}

impl ForwardEuler {
    pub fn with_max_step(max_step: f64) -> Self {
        Self {
            max_step: Some(max_step),
        }
    }

    /// Number of equal sub-steps used for `dt`, at most [`MAX_SUBSTEPS`].
    pub fn substeps(&self, dt: f64) -> usize {
        match self.max_step {
            Some(h) if h.is_finite() && h > 0.0 && dt > h => {
                (dt / h).ceil().min(MAX_SUBSTEPS as f64) as usize
            }
            _ => 1,
        }
    }

    /// True when `dt` needs more sub-steps than [`MAX_SUBSTEPS`] allows.
    pub fn saturates(&self, dt: f64) -> bool {
        match self.max_step {
            Some(h) if h.is_finite() && h > 0.0 => dt > h * MAX_SUBSTEPS as f64,
            _ => false,
        }
    }

    /// Advance `x` by `dt`.
    pub fn step<M: ScalarModel>(&self, model: &M, x: f64, dt: f64) -> f64 {
        let n = self.substeps(dt);
        let h = dt / n as f64;
        (0..n).fold(x, |x, _| x + h * model.rhs(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_step_matches_formula() {
        let euler = ForwardEuler::default();
        let x = euler.step(&|_x: f64| 2.0, 25.0, 1.0);
        assert_eq!(x, 27.0);
    }

    #[test]
    fn substeps_only_when_needed() {
        let euler = ForwardEuler::with_max_step(0.5);
        assert_eq!(euler.substeps(0.25), 1);
        assert_eq!(euler.substeps(0.5), 1);
        assert_eq!(euler.substeps(1.2), 3);
    }

    #[test]
    fn substeps_are_bounded() {
        let euler = ForwardEuler::with_max_step(6.4);
        assert_eq!(euler.substeps(1e6), 156_250.min(MAX_SUBSTEPS));
        assert_eq!(euler.substeps(1e300), MAX_SUBSTEPS);
        assert_eq!(euler.substeps(f64::MAX), MAX_SUBSTEPS);
        assert!(euler.saturates(1e300));
        assert!(!euler.saturates(64.0));
        assert!(!ForwardEuler::default().saturates(1e300));
    }

    #[test]
    fn substepping_keeps_decay_stable() {
        // dx/dt = -x, tau = 1. A single Euler step of 10 would overshoot to -9.
        let decay = |x: f64| -x;
        let raw = ForwardEuler::default().step(&decay, 1.0, 10.0);
        let split = ForwardEuler::with_max_step(1.0).step(&decay, 1.0, 10.0);
        assert_eq!(raw, -9.0);
        assert!((0.0..1.0).contains(&split));
    }
}
