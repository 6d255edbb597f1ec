//! cs-core: stable foundation for circuitsim.
//!
//! Contains:
//! - units (uom SI types + constructors, physical constants)
//! - numeric (Real, Complex64, complex helpers)
//! - ids (compact IDs for graph objects)
//! - geo (geodetic points used to place magnetic components)
//! - error (shared error types)

pub mod error;
pub mod geo;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CsError, CsResult};
pub use geo::GeoPoint;
pub use ids::*;
pub use numeric::*;
pub use units::*;
