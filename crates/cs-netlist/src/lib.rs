//! cs-netlist: circuit netlist file format, migration and validation.
//!
//! Netlists are loaded, never written back: a loaded netlist becomes a
//! [`Simulation`] through [`Netlist::into_simulation`].

pub mod migrate;
pub mod schema;
pub mod validate;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_netlist};

use cs_sim::{SimError, Simulation};
use std::path::Path;

pub type NetlistResult<T> = Result<T, NetlistError>;

#[derive(thiserror::Error, Debug)]
pub enum NetlistError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Unsupported netlist extension: {path}")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),
}

impl Netlist {
    /// Build a simulation holding this netlist's components and wires.
    pub fn into_simulation(self) -> NetlistResult<Simulation> {
        let components = self.components.iter().map(ComponentDef::to_component).collect();
        let wires = self.wires.iter().map(WireDef::to_wire).collect();
        Ok(Simulation::with_circuit(components, wires, self.settings)?)
    }
}

fn finish(netlist: Netlist) -> NetlistResult<Netlist> {
    let netlist = migrate_to_latest(netlist)?;
    validate_netlist(&netlist)?;
    Ok(netlist)
}

pub fn parse_yaml(content: &str) -> NetlistResult<Netlist> {
    finish(serde_yaml::from_str(content)?)
}

pub fn parse_json(content: &str) -> NetlistResult<Netlist> {
    finish(serde_json::from_str(content)?)
}

pub fn load_yaml(path: &Path) -> NetlistResult<Netlist> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml(&content)
}

pub fn load_json(path: &Path) -> NetlistResult<Netlist> {
    let content = std::fs::read_to_string(path)?;
    parse_json(&content)
}

/// Load a netlist, picking the format from the file extension.
pub fn load(path: &Path) -> NetlistResult<Netlist> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(NetlistError::UnknownFormat {
            path: path.display().to_string(),
        }),
    }
}
