//! Cross-module merge with id remapping.

use crate::gate::GateId;
use crate::module::{Module, Port};
use std::collections::BTreeMap;

/// Absorbs `parts` into `main`, remapping every gate into a fresh id space.
///
/// Gate ids are never aliased across modules: each absorbed gate gets the
/// next free id in `main`, and all of its plain and portal edges are
/// rewritten through the remap table. Sequential-node membership carries
/// over, and each part's ports are re-registered under
/// `"<part name>.<port name>"` with flags and display metadata preserved.
///
/// # Panics
///
/// Panics if a part's edges reference gates outside that part.
pub fn merge_modules(main: &mut Module, parts: &[Module]) {
    let mut counter: u64 = 0;

    for part in parts {
        // Remap every gate of this part into main's free id space.
        let mut lookup: BTreeMap<GateId, GateId> = BTreeMap::new();
        for (&old_id, gate) in &part.gates {
            let new_id = next_free_id(main, &mut counter);
            main.gates.insert(new_id, gate.clone());
            lookup.insert(old_id, new_id);
            if part.sequential_nodes.contains(&old_id) {
                main.sequential_nodes.insert(new_id);
            }
        }

        // Rewrite the absorbed gates' edges through the remap table.
        let remap = |id: &GateId| -> GateId {
            *lookup
                .get(id)
                .unwrap_or_else(|| panic!("merged edge references foreign gate {id}"))
        };
        for old_id in part.gates.keys() {
            let new_id = lookup[old_id];
            let gate = main.gates.get_mut(&new_id).unwrap();
            gate.srcs = gate.srcs.iter().map(remap).collect();
            gate.dsts = gate.dsts.iter().map(remap).collect();
            gate.portal_srcs = gate.portal_srcs.iter().map(|(k, &v)| (remap(k), v)).collect();
            gate.portal_dsts = gate.portal_dsts.iter().map(|(k, &v)| (remap(k), v)).collect();
        }

        // Lower the part's ports under prefixed names.
        for (port_name, port) in &part.inputs {
            let new_name = format!("{}.{}", part.name, port_name);
            main.inputs.insert(new_name, remap_port(port, &lookup));
        }
        for (port_name, port) in &part.outputs {
            let new_name = format!("{}.{}", part.name, port_name);
            main.outputs.insert(new_name, remap_port(port, &lookup));
        }
    }
}

/// The next id not currently used by `main`, scanning upward from `counter`.
fn next_free_id(main: &Module, counter: &mut u64) -> GateId {
    while main.gates.contains_key(&GateId::from_raw(*counter)) {
        *counter += 1;
    }
    let id = GateId::from_raw(*counter);
    *counter += 1;
    id
}

fn remap_port(port: &Port, lookup: &BTreeMap<GateId, GateId>) -> Port {
    Port {
        gates: port.gates.iter().map(|g| lookup[g]).collect(),
        is_clock: port.is_clock,
        color: port.color.clone(),
        device: port.device.clone(),
    }
}
