//! Complex nodal analysis with modified-nodal source rows.
//!
//! Unknowns are the voltages of every non-reference node reachable from
//! ground, followed by one current per voltage-source branch. Passive branches
//! stamp their admittance; a source branch stamps the constraint
//! `V_a - V_b - Z_int * I = EMF`, where `I` flows from its first terminal
//! through the source to the second.

use crate::error::{SolverError, SolverResult};
use crate::linear::solve_complex;
use cs_core::numeric::{Complex64, cplx, is_finite_complex};
use cs_core::{BranchId, NodeId};
use cs_graph::{Branch, Graph, IndexMap};
use nalgebra::{DMatrix, DVector};

/// Solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct NodalConfig {
    /// Shunt conductance (S) added to node diagonals when the plain system is singular.
    pub gmin: f64,
}

impl Default for NodalConfig {
    fn default() -> Self {
        Self { gmin: 1e-12 }
    }
}

/// How the solution was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Plain LU solve succeeded.
    Direct,
    /// Solved after adding the `gmin` shunt.
    Regularized,
    /// Both attempts failed; every voltage is zero.
    Zeroed,
}

/// Node voltages and source currents for one solve.
#[derive(Debug, Clone)]
pub struct NodalSolution {
    /// Complex voltage per node, indexed by node slot. Ground is exactly zero.
    pub voltages: Vec<Complex64>,
    /// Per node slot: ground or part of the solved system.
    pub solved: Vec<bool>,
    /// MNA current unknown per source branch, in graph order.
    pub source_currents: Vec<(BranchId, Complex64)>,
    pub status: SolveStatus,
    /// Number of unknowns in the solved system.
    pub size: usize,
}

impl NodalSolution {
    fn zeroed(graph: &Graph, size: usize) -> Self {
        Self {
            voltages: vec![cplx(0.0, 0.0); graph.nodes().len()],
            solved: vec![false; graph.nodes().len()],
            source_currents: Vec::new(),
            status: SolveStatus::Zeroed,
            size,
        }
    }

    /// Voltage at a node; zero for unknown ids.
    pub fn voltage(&self, node: NodeId) -> Complex64 {
        self.voltages
            .get(node.slot())
            .copied()
            .unwrap_or_else(|| cplx(0.0, 0.0))
    }

    /// False for nodes left out of the system (no path to ground).
    pub fn is_solved(&self, node: NodeId) -> bool {
        self.solved.get(node.slot()).copied().unwrap_or(false)
    }

    /// True when the solve gave up and reported zero voltages.
    pub fn is_fallback(&self) -> bool {
        self.status == SolveStatus::Zeroed
    }
}

/// Assembled MNA system for a graph.
#[derive(Debug, Clone)]
pub struct MnaSystem {
    pub matrix: DMatrix<Complex64>,
    pub rhs: DVector<Complex64>,
    pub index: IndexMap,
}

impl MnaSystem {
    /// Stamp every branch of `graph`.
    pub fn assemble(graph: &Graph) -> SolverResult<Self> {
        let index = IndexMap::from_graph(graph);
        let n = index.size();
        let mut matrix = DMatrix::from_element(n, n, cplx(0.0, 0.0));
        let mut rhs = DVector::from_element(n, cplx(0.0, 0.0));

        for branch in graph.branches() {
            let z = branch.impedance;
            if !is_finite_complex(z) || z.norm() == 0.0 {
                return Err(SolverError::DegenerateBranch {
                    branch: branch.id.to_string(),
                });
            }

            let a = index.node_idx(branch.start);
            let b = index.node_idx(branch.end);

            match branch.emf {
                Some(emf) => {
                    // Sources with an unsolved terminal carry no unknown.
                    let Ok(k) = index.source_idx(branch.id) else {
                        continue;
                    };
                    stamp_source(&mut matrix, &mut rhs, a, b, k, z, emf);
                }
                None => stamp_admittance(&mut matrix, a, b, z.inv()),
            }
        }

        Ok(Self { matrix, rhs, index })
    }

    /// Number of unknowns.
    pub fn size(&self) -> usize {
        self.index.size()
    }
}

fn stamp_admittance(
    matrix: &mut DMatrix<Complex64>,
    a: Option<usize>,
    b: Option<usize>,
    y: Complex64,
) {
    if let Some(a) = a {
        matrix[(a, a)] += y;
    }
    if let Some(b) = b {
        matrix[(b, b)] += y;
    }
    if let (Some(a), Some(b)) = (a, b) {
        matrix[(a, b)] -= y;
        matrix[(b, a)] -= y;
    }
}

fn stamp_source(
    matrix: &mut DMatrix<Complex64>,
    rhs: &mut DVector<Complex64>,
    a: Option<usize>,
    b: Option<usize>,
    k: usize,
    z_int: Complex64,
    emf: Complex64,
) {
    let one = cplx(1.0, 0.0);
    if let Some(a) = a {
        matrix[(a, k)] += one;
        matrix[(k, a)] += one;
    }
    if let Some(b) = b {
        matrix[(b, k)] -= one;
        matrix[(k, b)] -= one;
    }
    matrix[(k, k)] -= z_int;
    rhs[k] = emf;
}

/// Solve a graph with the default configuration.
pub fn solve_nodal(graph: &Graph) -> SolverResult<NodalSolution> {
    solve_nodal_with(graph, &NodalConfig::default())
}

/// Solve a graph for node voltages and source currents.
///
/// Never fails on a singular system: after a plain LU attempt and one retry
/// with a `gmin` shunt on node diagonals, the solution is all zeros with
/// [`SolveStatus::Zeroed`].
pub fn solve_nodal_with(graph: &Graph, config: &NodalConfig) -> SolverResult<NodalSolution> {
    let system = MnaSystem::assemble(graph)?;
    let size = system.size();
    let mut voltages = vec![cplx(0.0, 0.0); graph.nodes().len()];
    let mut solved = vec![false; graph.nodes().len()];
    for &node in system.index.node_ids() {
        solved[node.slot()] = true;
    }
    solved[graph.ground().slot()] = true;

    if size == 0 {
        return Ok(NodalSolution {
            voltages,
            solved,
            source_currents: Vec::new(),
            status: SolveStatus::Direct,
            size,
        });
    }

    let (x, status) = match solve_complex(&system.matrix, &system.rhs)? {
        Some(x) => (x, SolveStatus::Direct),
        None => {
            let mut shunted = system.matrix.clone();
            for i in 0..system.index.node_count() {
                shunted[(i, i)] += cplx(config.gmin, 0.0);
            }
            match solve_complex(&shunted, &system.rhs)? {
                Some(x) => {
                    tracing::debug!(size, gmin = config.gmin, "nodal system solved with gmin shunt");
                    (x, SolveStatus::Regularized)
                }
                None => {
                    tracing::warn!(size, "nodal system is singular, reporting zero voltages");
                    return Ok(NodalSolution::zeroed(graph, size));
                }
            }
        }
    };

    for (i, &node) in system.index.node_ids().iter().enumerate() {
        voltages[node.slot()] = x[i];
    }
    voltages[graph.ground().slot()] = cplx(0.0, 0.0);

    let node_count = system.index.node_count();
    let source_currents = system
        .index
        .source_ids()
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, x[node_count + i]))
        .collect();

    Ok(NodalSolution {
        voltages,
        solved,
        source_currents,
        status,
        size,
    })
}

/// Voltage across a branch, start minus end.
pub fn branch_voltage(branch: &Branch, solution: &NodalSolution) -> Complex64 {
    solution.voltage(branch.start) - solution.voltage(branch.end)
}
