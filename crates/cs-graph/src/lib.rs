//! cs-graph: circuit graph layer for circuitsim.
//!
//! Provides:
//! - Core graph data structures (Node, Branch, Graph)
//! - Incremental graph builder with validation
//! - Translation of component/wire lists into a graph
//! - Stable indexing for solver integration
//!
//! Graphs are rebuilt from the component list every tick and never persist.
//!
//! # Example
//!
//! ```
//! use cs_components::{BranchContext, Component, Wire};
//! use cs_core::units::hz;
//! use cs_graph::build_circuit;
//!
//! let r = Component::resistor("R1", 100.0);
//! let g = Component::ground("G");
//! let wires = vec![Wire::new("w1", r.port(1), g.port(0))];
//! let ctx = BranchContext { frequency: hz(60.0), clock_s: 0.0 };
//!
//! let graph = build_circuit(&[r, g], &wires, &ctx).unwrap().unwrap();
//! assert_eq!(graph.nodes().len(), 3);
//! assert_eq!(graph.branches().len(), 2);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::{GraphBuilder, build_circuit};
pub use error::{GraphError, GraphResult};
pub use graph::{Branch, BranchOwner, Graph, GroundSelection, Node};
pub use indexing::IndexMap;
