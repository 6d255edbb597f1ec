//! Schema migration framework.

use crate::NetlistError;
use crate::schema::Netlist;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut netlist: Netlist) -> Result<Netlist, NetlistError> {
    while netlist.version < LATEST_VERSION {
        netlist = migrate_one_version(netlist)?;
    }
    Ok(netlist)
}

fn migrate_one_version(netlist: Netlist) -> Result<Netlist, NetlistError> {
    match netlist.version {
        0 => migrate_v0_to_v1(netlist),
        v => Err(NetlistError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 wires were anonymous; give each a stable id.
fn migrate_v0_to_v1(mut netlist: Netlist) -> Result<Netlist, NetlistError> {
    for (i, wire) in netlist.wires.iter_mut().enumerate() {
        if wire.id.is_empty() {
            wire.id = format!("wire{}", i + 1);
        }
    }
    netlist.version = 1;
    Ok(netlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::WireDef;
    use cs_sim::SimSettings;

    #[test]
    fn v0_wires_get_ids() {
        let netlist = Netlist {
            version: 0,
            name: "Legacy".to_string(),
            settings: SimSettings::default(),
            components: vec![],
            wires: vec![
                WireDef {
                    id: String::new(),
                    from: "a".to_string(),
                    to: "b".to_string(),
                },
                WireDef {
                    id: "keep".to_string(),
                    from: "b".to_string(),
                    to: "c".to_string(),
                },
            ],
        };

        let migrated = migrate_to_latest(netlist).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.wires[0].id, "wire1");
        assert_eq!(migrated.wires[1].id, "keep");
    }
}
