//! The sole sanctioned mutator of a [`Module`].
//!
//! The builder owns id allocation and guarantees that every edge insertion,
//! removal, and gate deletion keeps both sides of the edge tables consistent.
//! Contract violations (referencing a missing gate, connecting a gate to
//! itself) are programming errors and panic; recoverable auditing lives in
//! [`Module::check`](crate::Module::check).

use crate::gate::{Gate, GateId, GateKind, LogicKind};
use crate::module::{Module, Port};

/// Mutating wrapper around a [`Module`].
///
/// Wraps an existing module (re-seeding the id counter to one past the
/// largest live id) or starts from an empty one. Passes that rebuild a module
/// wholesale construct a fresh builder seeded with the current module, work
/// on it, and swap the result back with [`into_module`](Self::into_module).
pub struct NetBuilder {
    module: Module,
    next_id: u64,
    /// Whether newly added gates are flagged sequential when the caller does
    /// not say otherwise.
    pub default_keep_timing: bool,
}

impl NetBuilder {
    /// Creates a builder over an empty module.
    pub fn new() -> Self {
        Self::from_module(Module::new())
    }

    /// Wraps an existing module, re-seeding the id counter past its gates.
    pub fn from_module(module: Module) -> Self {
        Self {
            next_id: module.next_id().as_raw(),
            module,
            default_keep_timing: false,
        }
    }

    /// Read access to the module being built.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Consumes the builder, returning the finished module.
    pub fn into_module(self) -> Module {
        self.module
    }

    /// Sets the module name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.module.name = name.into();
    }

    /// Registers (or replaces) an input port over the given bit gates.
    pub fn register_input(&mut self, port: &str, gates: Vec<GateId>, is_clock: bool) {
        self.module
            .inputs
            .insert(port.to_string(), Port::new(gates, is_clock));
    }

    /// Removes an input port. The bit gates themselves are untouched.
    pub fn unregister_input(&mut self, port: &str) {
        self.module.inputs.remove(port);
    }

    /// Registers (or replaces) an output port over the given bit gates.
    pub fn register_output(&mut self, port: &str, gates: Vec<GateId>, is_clock: bool) {
        self.module
            .outputs
            .insert(port.to_string(), Port::new(gates, is_clock));
    }

    /// Removes an output port. The bit gates themselves are untouched.
    pub fn unregister_output(&mut self, port: &str) {
        self.module.outputs.remove(port);
    }

    /// Adds a logic gate, using the builder-wide keep-timing default.
    pub fn add_logic(&mut self, kind: LogicKind) -> GateId {
        self.add_gate(GateKind::Logic { kind }, None)
    }

    /// Adds a logic gate with an explicit keep-timing flag.
    pub fn add_logic_with_timing(&mut self, kind: LogicKind, keep_timing: bool) -> GateId {
        self.add_gate(GateKind::Logic { kind }, Some(keep_timing))
    }

    /// Adds a timer gate. Timers are never flagged sequential on creation.
    pub fn add_timer(&mut self, delay: u32) -> GateId {
        self.add_gate(GateKind::Timer { delay }, Some(false))
    }

    /// Adds a gate of the given kind, allocating the next free id.
    ///
    /// `keep_timing` of `None` falls back to
    /// [`default_keep_timing`](Self::default_keep_timing); `true` inserts the
    /// new id into the module's sequential set.
    pub fn add_gate(&mut self, kind: GateKind, keep_timing: Option<bool>) -> GateId {
        let id = GateId::from_raw(self.next_id);
        self.module.gates.insert(id, Gate::new(kind));
        self.next_id += 1;
        if keep_timing.unwrap_or(self.default_keep_timing) {
            self.module.sequential_nodes.insert(id);
        }
        id
    }

    /// Replaces the kind of an existing gate, edges untouched.
    ///
    /// # Panics
    ///
    /// Panics if the gate does not exist.
    pub fn change_gate_kind(&mut self, id: GateId, kind: GateKind) {
        let gate = self
            .module
            .gates
            .get_mut(&id)
            .unwrap_or_else(|| panic!("gate {id} does not exist"));
        gate.kind = kind;
    }

    /// Removes a gate and every reference to it.
    ///
    /// All neighbors across `srcs`, `dsts`, `portal_srcs`, and `portal_dsts`
    /// have their back-reference stripped; the id also leaves the sequential
    /// set. Removing an id that is not present is a no-op.
    pub fn remove_gate(&mut self, id: GateId) {
        self.module.sequential_nodes.remove(&id);
        let Some(gate) = self.module.gates.remove(&id) else {
            return;
        };
        for n in &gate.srcs {
            self.neighbor_mut(*n).dsts.remove(&id);
        }
        for n in &gate.dsts {
            self.neighbor_mut(*n).srcs.remove(&id);
        }
        for n in gate.portal_srcs.keys() {
            self.neighbor_mut(*n).portal_dsts.remove(&id);
        }
        for n in gate.portal_dsts.keys() {
            self.neighbor_mut(*n).portal_srcs.remove(&id);
        }
    }

    fn neighbor_mut(&mut self, id: GateId) -> &mut Gate {
        self.module
            .gates
            .get_mut(&id)
            .unwrap_or_else(|| panic!("edge references missing gate {id}"))
    }

    /// Inserts a symmetric portal edge with the given tick depth.
    ///
    /// With `keep_old_delay`, an existing edge's depth is merged by maximum
    /// instead of overwritten; used when several paths contribute timing to
    /// the same dependency.
    ///
    /// # Panics
    ///
    /// Panics if either gate does not exist or `src == dst`.
    pub fn portal(&mut self, src: GateId, dst: GateId, delay: u32, keep_old_delay: bool) {
        self.assert_exists(src);
        self.assert_exists(dst);
        assert!(src != dst, "gate {dst} cannot connect to itself");
        let new_delay = if keep_old_delay {
            let old = self
                .module
                .gates
                .get(&src)
                .and_then(|g| g.portal_dsts.get(&dst).copied())
                .unwrap_or(0);
            old.max(delay)
        } else {
            delay
        };
        self.neighbor_mut(src).portal_dsts.insert(dst, new_delay);
        self.neighbor_mut(dst).portal_srcs.insert(src, new_delay);
    }

    /// Re-homes all portal edges of `from` onto `to`, shifting depths.
    ///
    /// Destination-side depths shift by `-delay_delta` and source-side depths
    /// by `+delay_delta`, clamped at zero; used when a gate is eliminated and
    /// its temporal role must be preserved on its replacement. The original
    /// edges on `from` stay in place (the caller usually removes `from` right
    /// after, which strips them).
    ///
    /// # Panics
    ///
    /// Panics if either gate does not exist or `from == to`.
    pub fn transfer_portals(&mut self, from: GateId, to: GateId, delay_delta: i64) {
        self.assert_exists(from);
        self.assert_exists(to);
        assert!(from != to, "gate {to} cannot connect to itself");
        let portal_dsts: Vec<(GateId, u32)> = self.module.gates[&from]
            .portal_dsts
            .iter()
            .map(|(k, v)| (*k, *v))
            .collect();
        for (portal_dst, delay) in portal_dsts {
            let shifted = (delay as i64 - delay_delta).max(0) as u32;
            self.portal(to, portal_dst, shifted, false);
        }
        let portal_srcs: Vec<(GateId, u32)> = self.module.gates[&from]
            .portal_srcs
            .iter()
            .map(|(k, v)| (*k, *v))
            .collect();
        for (portal_src, delay) in portal_srcs {
            let shifted = (delay as i64 + delay_delta).max(0) as u32;
            self.portal(to, portal_src, shifted, false);
        }
    }

    /// Connects `src` to `dst`, maintaining both edge sets.
    ///
    /// # Panics
    ///
    /// Panics if either gate does not exist or `src == dst`.
    pub fn connect(&mut self, src: GateId, dst: GateId) {
        self.assert_exists(src);
        self.assert_exists(dst);
        assert!(src != dst, "gate {dst} cannot connect to itself");
        self.neighbor_mut(dst).srcs.insert(src);
        self.neighbor_mut(src).dsts.insert(dst);
    }

    /// Connects every source in the collection to `dst`.
    ///
    /// # Panics
    ///
    /// Panics if any gate does not exist or the sources contain `dst`.
    pub fn connect_many(&mut self, srcs: impl IntoIterator<Item = GateId>, dst: GateId) {
        for src in srcs {
            self.connect(src, dst);
        }
    }

    /// Connects `src` to every destination in the collection.
    ///
    /// # Panics
    ///
    /// Panics if any gate does not exist or the destinations contain `src`.
    pub fn connect_fanout(&mut self, src: GateId, dsts: impl IntoIterator<Item = GateId>) {
        for dst in dsts {
            self.connect(src, dst);
        }
    }

    /// Connects the ids into a chain, each driving the next.
    ///
    /// # Panics
    ///
    /// Panics if any gate does not exist or two adjacent ids are equal.
    pub fn connect_chain(&mut self, ids: &[GateId]) {
        for pair in ids.windows(2) {
            self.connect(pair[0], pair[1]);
        }
    }

    /// Removes the edge from `src` to `dst`. Neither gate is deleted.
    ///
    /// # Panics
    ///
    /// Panics if either gate does not exist.
    pub fn disconnect(&mut self, src: GateId, dst: GateId) {
        self.assert_exists(src);
        self.assert_exists(dst);
        self.neighbor_mut(dst).srcs.remove(&src);
        self.neighbor_mut(src).dsts.remove(&dst);
    }

    /// Removes the edges from every source in the collection to `dst`.
    pub fn disconnect_many(&mut self, srcs: impl IntoIterator<Item = GateId>, dst: GateId) {
        for src in srcs {
            self.disconnect(src, dst);
        }
    }

    /// Removes the edges from `src` to every destination in the collection.
    pub fn disconnect_fanout(&mut self, src: GateId, dsts: impl IntoIterator<Item = GateId>) {
        for dst in dsts {
            self.disconnect(src, dst);
        }
    }

    /// Repairs fan-out ceiling violations by inserting OR buffers.
    ///
    /// Every gate driving more than [`Module::FANOUT_LIMIT`] destinations has
    /// the excess re-routed through freshly created OR buffers, split evenly.
    /// A sequential gate keeps its sequential destinations directly attached
    /// so state-holding paths gain no timing-visible buffer. Returns whether
    /// anything changed.
    pub fn legalize(&mut self) -> bool {
        let mut changed = false;
        let all_ids: Vec<GateId> = self.module.gates.keys().copied().collect();
        for gate_id in all_ids {
            let gate = &self.module.gates[&gate_id];
            if gate.dsts.len() <= Module::FANOUT_LIMIT {
                continue;
            }
            changed = true;
            let dsts: Vec<GateId> = if self.module.is_sequential(gate_id) {
                gate.dsts
                    .iter()
                    .copied()
                    .filter(|d| !self.module.sequential_nodes.contains(d))
                    .collect()
            } else {
                gate.dsts.iter().copied().collect()
            };

            self.disconnect_fanout(gate_id, dsts.iter().copied());

            let buffer_count = dsts.len().div_ceil(Module::FANOUT_LIMIT);
            let buffers: Vec<GateId> = (0..buffer_count)
                .map(|_| self.add_logic_with_timing(LogicKind::Or, false))
                .collect();
            self.connect_fanout(gate_id, buffers.iter().copied());

            for (i, dst) in dsts.iter().enumerate() {
                self.connect(buffers[i / Module::FANOUT_LIMIT], *dst);
            }
        }
        changed
    }

    fn assert_exists(&self, id: GateId) {
        assert!(
            self.module.gates.contains_key(&id),
            "gate {id} does not exist"
        );
    }
}

impl Default for NetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
