//! Branch current evaluation from a nodal solution.

use crate::nodal::{NodalSolution, branch_voltage};
use cs_core::BranchId;
use cs_core::numeric::{Complex64, cplx};
use cs_graph::{Branch, BranchOwner, Graph};

/// Current and voltage of one branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchCurrent {
    pub branch: BranchId,
    pub owner: BranchOwner,
    /// Complex current from start to end.
    pub current: Complex64,
    /// Complex voltage, start minus end.
    pub voltage: Complex64,
}

impl BranchCurrent {
    /// Reported scalar current, `|I|`.
    pub fn magnitude(&self) -> f64 {
        self.current.norm()
    }

    /// Reported voltage drop, `|V_start - V_end|`.
    pub fn voltage_drop(&self) -> f64 {
        self.voltage.norm()
    }

    /// `S = V * conj(I)`.
    pub fn complex_power(&self) -> Complex64 {
        self.voltage * self.current.conj()
    }

    pub fn real_power(&self) -> f64 {
        self.complex_power().re
    }
}

/// Current through a single branch.
///
/// Passive: `(V_start - V_end) / Z`. Source: `(V_start - V_end - EMF) / Z_int`.
/// Branches with a terminal outside the solved system carry no current.
pub fn branch_current(branch: &Branch, solution: &NodalSolution) -> BranchCurrent {
    let voltage = branch_voltage(branch, solution);
    let isolated = !(solution.is_solved(branch.start) && solution.is_solved(branch.end));
    let current = if solution.is_fallback() || isolated {
        cplx(0.0, 0.0)
    } else {
        let driving = match branch.emf {
            Some(emf) => voltage - emf,
            None => voltage,
        };
        driving / branch.impedance
    };
    BranchCurrent {
        branch: branch.id,
        owner: branch.owner,
        current,
        voltage,
    }
}

/// Currents for every branch of `graph`, in branch order.
pub fn branch_currents(graph: &Graph, solution: &NodalSolution) -> Vec<BranchCurrent> {
    graph
        .branches()
        .iter()
        .map(|b| branch_current(b, solution))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodal::SolveStatus;
    use cs_core::Id;
    use cs_components::ComponentKind;

    fn solution(voltages: Vec<Complex64>, status: SolveStatus) -> NodalSolution {
        NodalSolution {
            size: voltages.len(),
            solved: vec![true; voltages.len()],
            voltages,
            source_currents: Vec::new(),
            status,
        }
    }

    fn branch(z: Complex64, emf: Option<Complex64>) -> Branch {
        Branch {
            id: Id::from_index(0),
            owner: BranchOwner::Component(0),
            kind: ComponentKind::Resistor,
            start: Id::from_index(0),
            end: Id::from_index(1),
            impedance: z,
            nominal: 0.0,
            emf,
        }
    }

    #[test]
    fn ten_volts_over_one_kilohm() {
        let sol = solution(vec![cplx(10.0, 0.0), cplx(0.0, 0.0)], SolveStatus::Direct);
        let bc = branch_current(&branch(cplx(1000.0, 0.0), None), &sol);
        assert!((bc.magnitude() - 0.01).abs() < 1e-12);
        assert!((bc.voltage_drop() - 10.0).abs() < 1e-12);
        assert!((bc.real_power() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn purely_reactive_branch_magnitude() {
        let sol = solution(vec![cplx(10.0, 0.0), cplx(0.0, 0.0)], SolveStatus::Direct);
        let bc = branch_current(&branch(cplx(0.0, -2652.58), None), &sol);
        assert!((bc.magnitude() - 10.0 / 2652.58).abs() < 1e-12);
        // No real power in an ideal reactance.
        assert!(bc.real_power().abs() < 1e-12);
    }

    #[test]
    fn source_current_subtracts_emf() {
        let sol = solution(vec![cplx(9.9, 0.0), cplx(0.0, 0.0)], SolveStatus::Direct);
        let bc = branch_current(&branch(cplx(0.01, 0.0), Some(cplx(10.0, 0.0))), &sol);
        assert!((bc.current - cplx(-10.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn fallback_reports_no_current() {
        let sol = solution(vec![cplx(0.0, 0.0); 2], SolveStatus::Zeroed);
        let bc = branch_current(&branch(cplx(0.01, 0.0), Some(cplx(10.0, 0.0))), &sol);
        assert_eq!(bc.magnitude(), 0.0);
    }

    #[test]
    fn isolated_source_reports_no_current() {
        let mut sol = solution(vec![cplx(0.0, 0.0); 2], SolveStatus::Direct);
        sol.solved = vec![false, false];
        let bc = branch_current(&branch(cplx(0.01, 0.0), Some(cplx(9.0, 0.0))), &sol);
        assert_eq!(bc.magnitude(), 0.0);
        assert_eq!(bc.real_power(), 0.0);
    }
}
