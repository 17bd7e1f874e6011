//! Level-order depth propagation over the gate graph.

use relay_netlist::{Gate, GateId, Module};
use std::collections::{BTreeMap, BTreeSet};

/// Which way depth accumulates through the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthDirection {
    /// Depth grows along plain edges from sources toward sinks; a gate's
    /// depth is the longest distance from a seed at the input side.
    FromInputs,
    /// Depth grows against plain edges from sinks toward sources; a gate's
    /// depth is the longest distance to a seed at the output side.
    FromOutputs,
}

fn prevs(gate: &Gate, direction: DepthDirection) -> &BTreeSet<GateId> {
    match direction {
        DepthDirection::FromInputs => &gate.srcs,
        DepthDirection::FromOutputs => &gate.dsts,
    }
}

fn nexts(gate: &Gate, direction: DepthDirection) -> &BTreeSet<GateId> {
    match direction {
        DepthDirection::FromInputs => &gate.dsts,
        DepthDirection::FromOutputs => &gate.srcs,
    }
}

fn prev_portals(gate: &Gate, direction: DepthDirection) -> &BTreeMap<GateId, u32> {
    match direction {
        DepthDirection::FromInputs => &gate.portal_srcs,
        DepthDirection::FromOutputs => &gate.portal_dsts,
    }
}

fn next_portals(gate: &Gate, direction: DepthDirection) -> &BTreeMap<GateId, u32> {
    match direction {
        DepthDirection::FromInputs => &gate.portal_dsts,
        DepthDirection::FromOutputs => &gate.portal_srcs,
    }
}

/// Computes the per-node combinational depth table for one direction.
///
/// Seeds are the gates with no predecessors in the chosen direction (or any
/// sequential gate, which resets depth) provided they have no portal
/// predecessors; a sequential seed starts at 0, a combinational one at 1.
/// Each wave resolves every frontier gate whose predecessors are all known to
/// one plus their maximum depth (portal predecessors contribute their own
/// tick depth instead of one), with sequential gates adjusted down by one.
/// Propagation stops when a wave resolves nothing new, so gates on
/// unresolvable combinational cycles simply stay out of the table.
pub fn depth_table(module: &Module, direction: DepthDirection) -> BTreeMap<GateId, i64> {
    let mut table: BTreeMap<GateId, i64> = BTreeMap::new();
    let mut frontier: BTreeSet<GateId> = BTreeSet::new();

    for (&id, gate) in &module.gates {
        let sequential = module.is_sequential(id);
        if !(prevs(gate, direction).is_empty() || sequential) {
            continue;
        }
        if !prev_portals(gate, direction).is_empty() {
            continue;
        }
        table.insert(id, if sequential { 0 } else { 1 });
        push_unresolved_nexts(gate, direction, &table, &mut frontier);
    }

    while !frontier.is_empty() {
        let mut next_frontier: BTreeSet<GateId> = BTreeSet::new();
        let mut changed = false;
        for &id in &frontier {
            if table.contains_key(&id) {
                continue;
            }
            match resolved_depth(module, id, direction, &table) {
                Some(depth) => {
                    table.insert(id, depth);
                    push_unresolved_nexts(&module.gates[&id], direction, &table, &mut next_frontier);
                    changed = true;
                }
                None => {
                    next_frontier.insert(id);
                }
            }
        }
        if !changed {
            break;
        }
        frontier = next_frontier;
    }

    table
}

fn push_unresolved_nexts(
    gate: &Gate,
    direction: DepthDirection,
    table: &BTreeMap<GateId, i64>,
    frontier: &mut BTreeSet<GateId>,
) {
    for next in nexts(gate, direction) {
        if !table.contains_key(next) {
            frontier.insert(*next);
        }
    }
    for next in next_portals(gate, direction).keys() {
        if !table.contains_key(next) {
            frontier.insert(*next);
        }
    }
}

/// The depth of `id` if every predecessor is resolved, else `None`.
fn resolved_depth(
    module: &Module,
    id: GateId,
    direction: DepthDirection,
    table: &BTreeMap<GateId, i64>,
) -> Option<i64> {
    let gate = &module.gates[&id];
    let sequential = module.is_sequential(id);
    let mut depth_max: i64 = 0;
    for prev in prevs(gate, direction) {
        let depth = table.get(prev)?;
        depth_max = depth_max.max(depth + 1);
    }
    for (prev, additional) in prev_portals(gate, direction) {
        let depth = table.get(prev)?;
        depth_max = depth_max.max(depth + i64::from(*additional));
    }
    Some(depth_max + if sequential { -1 } else { 0 })
}
