//! The top-level netlist container and its port tables.

use crate::gate::{Gate, GateId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A named gate network with port tables and sequential-node bookkeeping.
///
/// The module exclusively owns its gates; mutation goes through a
/// [`NetBuilder`](crate::NetBuilder) with exclusive access. Ordered maps keep
/// iteration and the serialized JSON deterministic (the persisted form sorts
/// its keys).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// The name of the module.
    pub name: String,
    /// All gates, keyed by id.
    pub gates: BTreeMap<GateId, Gate>,
    /// Gates whose output is treated as stable state for timing purposes.
    /// Record keeping only; used to stop depth propagation and to gate which
    /// peephole rewrites are legal.
    #[serde(
        rename = "sequentialNodes",
        default,
        skip_serializing_if = "BTreeSet::is_empty"
    )]
    pub sequential_nodes: BTreeSet<GateId>,
    /// Input ports and the gates making up their bits.
    pub inputs: BTreeMap<String, Port>,
    /// Output ports and the gates making up their bits.
    pub outputs: BTreeMap<String, Port>,
    /// Optional display color for the whole module.
    #[serde(rename = "colorHex", default, skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
}

/// One port: an ordered list of bit gates plus display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// The gate backing each bit, least significant first.
    pub gates: Vec<GateId>,
    /// Whether this port drives a clock domain.
    #[serde(rename = "isClock", default, skip_serializing_if = "is_false")]
    pub is_clock: bool,
    /// Optional display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Optional device binding hint for downstream tooling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Port {
    /// Creates a port over the given bit gates.
    pub fn new(gates: Vec<GateId>, is_clock: bool) -> Self {
        Self {
            gates,
            is_clock,
            color: None,
            device: None,
        }
    }
}

impl Module {
    /// The maximum number of destinations a single gate may drive directly.
    pub const FANOUT_LIMIT: usize = 256;

    /// Creates an empty, unnamed module.
    pub fn new() -> Self {
        Self {
            name: "untitled".to_string(),
            gates: BTreeMap::new(),
            sequential_nodes: BTreeSet::new(),
            inputs: BTreeMap::new(),
            outputs: BTreeMap::new(),
            color_hex: None,
        }
    }

    /// Returns `true` if the module contains no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// The next free gate id: one past the largest live id.
    pub fn next_id(&self) -> GateId {
        match self.gates.keys().next_back() {
            Some(max) => GateId::from_raw(max.as_raw() + 1),
            None => GateId::from_raw(0),
        }
    }

    /// Total number of plain edges (counted on the source side).
    pub fn connection_count(&self) -> usize {
        self.gates.values().map(|g| g.srcs.len()).sum()
    }

    /// Returns `true` if the gate is flagged sequential.
    pub fn is_sequential(&self, id: GateId) -> bool {
        self.sequential_nodes.contains(&id)
    }

    /// The union of every input and output port's bit gates.
    ///
    /// These are the "keeping" gates: peephole passes may rewire them but
    /// must not remove them.
    pub fn keeping_gates(&self) -> BTreeSet<GateId> {
        self.inputs
            .values()
            .chain(self.outputs.values())
            .flat_map(|p| p.gates.iter().copied())
            .collect()
    }

    /// The bit gates of every input port flagged as a clock.
    pub fn clock_gates(&self) -> BTreeSet<GateId> {
        self.inputs
            .values()
            .filter(|p| p.is_clock)
            .flat_map(|p| p.gates.iter().copied())
            .collect()
    }
}

impl Default for Module {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{GateKind, LogicKind};

    fn or_gate() -> Gate {
        Gate::new(GateKind::Logic {
            kind: LogicKind::Or,
        })
    }

    #[test]
    fn empty_module() {
        let module = Module::new();
        assert!(module.is_empty());
        assert_eq!(module.next_id(), GateId::from_raw(0));
        assert_eq!(module.connection_count(), 0);
    }

    #[test]
    fn next_id_is_max_plus_one() {
        let mut module = Module::new();
        module.gates.insert(GateId::from_raw(3), or_gate());
        module.gates.insert(GateId::from_raw(7), or_gate());
        assert_eq!(module.next_id(), GateId::from_raw(8));
    }

    #[test]
    fn connection_count_sums_sources() {
        let mut module = Module::new();
        let a = GateId::from_raw(0);
        let b = GateId::from_raw(1);
        let mut gb = or_gate();
        gb.srcs.insert(a);
        let mut ga = or_gate();
        ga.dsts.insert(b);
        module.gates.insert(a, ga);
        module.gates.insert(b, gb);
        assert_eq!(module.connection_count(), 1);
    }

    #[test]
    fn keeping_gates_unions_ports() {
        let mut module = Module::new();
        for i in 0..4 {
            module.gates.insert(GateId::from_raw(i), or_gate());
        }
        module.inputs.insert(
            "a".to_string(),
            Port::new(vec![GateId::from_raw(0), GateId::from_raw(1)], false),
        );
        module
            .outputs
            .insert("y".to_string(), Port::new(vec![GateId::from_raw(3)], false));
        let keeping = module.keeping_gates();
        assert_eq!(keeping.len(), 3);
        assert!(!keeping.contains(&GateId::from_raw(2)));
    }

    #[test]
    fn clock_gates_filters_flag() {
        let mut module = Module::new();
        module.gates.insert(GateId::from_raw(0), or_gate());
        module.gates.insert(GateId::from_raw(1), or_gate());
        module
            .inputs
            .insert("clk".to_string(), Port::new(vec![GateId::from_raw(0)], true));
        module
            .inputs
            .insert("d".to_string(), Port::new(vec![GateId::from_raw(1)], false));
        let clocks = module.clock_gates();
        assert_eq!(clocks.len(), 1);
        assert!(clocks.contains(&GateId::from_raw(0)));
    }

    #[test]
    fn serde_roundtrip_structural() {
        let mut module = Module::new();
        module.name = "adder".to_string();
        let a = GateId::from_raw(0);
        let b = GateId::from_raw(1);
        let mut ga = Gate::new(GateKind::Logic {
            kind: LogicKind::Xor,
        });
        ga.dsts.insert(b);
        let mut gb = Gate::new(GateKind::Timer { delay: 2 });
        gb.srcs.insert(a);
        module.gates.insert(a, ga);
        module.gates.insert(b, gb);
        module.sequential_nodes.insert(b);
        module
            .inputs
            .insert("x".to_string(), Port::new(vec![a], false));
        module
            .outputs
            .insert("y".to_string(), Port::new(vec![b], false));

        let json = serde_json::to_string(&module).unwrap();
        let once: Module = serde_json::from_str(&json).unwrap();
        let json_again = serde_json::to_string(&once).unwrap();
        let twice: Module = serde_json::from_str(&json_again).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice, module);
    }

    #[test]
    fn serde_omits_empty_optionals() {
        let module = Module::new();
        let json = serde_json::to_string(&module).unwrap();
        assert!(!json.contains("sequentialNodes"));
        assert!(!json.contains("colorHex"));
    }

    #[test]
    fn serde_gate_map_keys_are_strings() {
        let mut module = Module::new();
        module.gates.insert(GateId::from_raw(12), or_gate());
        let json = serde_json::to_string(&module).unwrap();
        assert!(json.contains(r#""12":"#));
    }

    #[test]
    fn port_serde_defaults() {
        let json = r#"{"gates":[1,2]}"#;
        let port: Port = serde_json::from_str(json).unwrap();
        assert!(!port.is_clock);
        assert!(port.color.is_none());
        assert!(port.device.is_none());

        let back = serde_json::to_string(&port).unwrap();
        assert!(!back.contains("isClock"));
    }

    #[test]
    fn port_serde_keeps_clock_flag() {
        let port = Port::new(vec![GateId::from_raw(0)], true);
        let json = serde_json::to_string(&port).unwrap();
        assert!(json.contains(r#""isClock":true"#));
    }
}
