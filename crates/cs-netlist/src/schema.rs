//! Netlist schema definitions.

use cs_components::{Component, ComponentKind, Port, Properties, Wire};
use cs_sim::SimSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Netlist {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub settings: SimSettings,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default)]
    pub wires: Vec<WireDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub kind: ComponentKind,
    /// Port ids in terminal order. When omitted, the kind's required ports are
    /// created as `<id>.0`, `<id>.1`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<String>>,
    #[serde(default)]
    pub properties: Properties,
}

impl ComponentDef {
    /// Port ids this definition resolves to.
    pub fn port_ids(&self) -> Vec<String> {
        match &self.ports {
            Some(ports) => ports.clone(),
            None => Component::new(self.id.clone(), self.kind, self.kind.required_ports())
                .ports
                .into_iter()
                .map(|p| p.id)
                .collect(),
        }
    }

    pub fn to_component(&self) -> Component {
        let mut component = Component::new(self.id.clone(), self.kind, 0);
        component.ports = self
            .port_ids()
            .into_iter()
            .map(|id| Port {
                id,
                component: self.id.clone(),
            })
            .collect();
        if !self.name.is_empty() {
            component.name = self.name.clone();
        }
        component.properties = self.properties.clone();
        component
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireDef {
    /// Version 0 netlists had no wire ids; migration assigns them.
    #[serde(default)]
    pub id: String,
    pub from: String,
    pub to: String,
}

impl WireDef {
    pub fn to_wire(&self) -> Wire {
        Wire::new(self.id.clone(), self.from.clone(), self.to.clone())
    }
}
