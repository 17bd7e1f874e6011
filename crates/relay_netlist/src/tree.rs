//! Balanced drive-tree construction for fan-outs past the ceiling.

use crate::builder::NetBuilder;
use crate::gate::{GateId, GateKind, LogicKind};
use crate::module::Module;

/// A handle over a built drive tree, handing out leaf slots in order.
///
/// Slot `n` resolves to leaf `n / FANOUT_LIMIT`, so consumers roll over to
/// the next leaf once one saturates. Requesting more slots than the declared
/// fan-out is a contract violation and panics.
pub struct TreeHandle {
    handles: Vec<GateId>,
    counter: usize,
    capacity: usize,
}

impl TreeHandle {
    /// The total number of slots this tree was built for.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Claims the next slot and returns the leaf gate serving it.
    ///
    /// # Panics
    ///
    /// Panics when the declared capacity is exhausted.
    pub fn next_slot(&mut self) -> GateId {
        assert!(self.counter < self.capacity, "drive tree capacity exceeded");
        let src = self.handles[self.counter / Module::FANOUT_LIMIT];
        self.counter += 1;
        src
    }

    /// Claims the next slot and connects its leaf to `dst`.
    ///
    /// # Panics
    ///
    /// Panics when the capacity is exhausted or `dst` does not exist.
    pub fn connect_next(&mut self, builder: &mut NetBuilder, dst: GateId) {
        let src = self.next_slot();
        builder.connect(src, dst);
    }
}

impl NetBuilder {
    /// Builds a delay-wise symmetric fan-out tree rooted at `src`.
    ///
    /// Constructs the minimum-depth tree of OR buffers such that every
    /// leaf-to-root path has the same length (added delay is uniform across
    /// all consumers) and no node drives more than
    /// [`Module::FANOUT_LIMIT`] destinations. `keep_timing` of `None`
    /// inherits the root's sequential flag for the buffers.
    ///
    /// # Panics
    ///
    /// Panics if `src` does not exist, already has outputs, or `fanout == 0`.
    pub fn build_drive_tree(
        &mut self,
        src: GateId,
        fanout: usize,
        keep_timing: Option<bool>,
    ) -> TreeHandle {
        assert!(fanout >= 1, "drive tree needs a fan-out of at least 1");
        let src_gate = self
            .module()
            .gates
            .get(&src)
            .unwrap_or_else(|| panic!("gate {src} does not exist"));
        assert!(
            src_gate.dsts.is_empty(),
            "cannot build tree from {src}: it already has outputs"
        );

        if fanout == 1 {
            return TreeHandle {
                handles: vec![src],
                counter: 0,
                capacity: fanout,
            };
        }

        let limit = Module::FANOUT_LIMIT;
        let sequential = keep_timing.unwrap_or_else(|| self.module().is_sequential(src));

        // Plan layer widths backwards from the leaves; the final 1-wide layer
        // is the root itself.
        let mut widths: Vec<usize> = Vec::new();
        let mut current_fanout = fanout;
        while current_fanout != 1 {
            let prev_layer_width = current_fanout.div_ceil(limit);
            current_fanout = prev_layer_width;
            widths.push(prev_layer_width);
        }
        widths.pop();

        let mut handles: Vec<GateId> = vec![src];
        while let Some(width) = widths.pop() {
            let mut new_handles = Vec::with_capacity(width);
            for i in 0..width {
                let parent = handles[i / limit];
                let child = self.add_gate(
                    GateKind::Logic {
                        kind: LogicKind::Or,
                    },
                    Some(sequential),
                );
                self.connect(parent, child);
                new_handles.push(child);
            }
            handles = new_handles;
        }

        TreeHandle {
            handles,
            counter: 0,
            capacity: fanout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_slot_tree_is_the_root() {
        let mut builder = NetBuilder::new();
        let src = builder.add_logic(LogicKind::Or);
        let mut tree = builder.build_drive_tree(src, 1, None);
        assert_eq!(tree.capacity(), 1);
        assert_eq!(tree.next_slot(), src);
        assert_eq!(builder.module().gates.len(), 1);
    }

    #[test]
    fn small_tree_adds_one_layer() {
        let mut builder = NetBuilder::new();
        let src = builder.add_logic(LogicKind::Or);
        let mut tree = builder.build_drive_tree(src, 300, None);

        // ceil(300 / 256) = 2 leaves under the root.
        assert_eq!(builder.module().gates.len(), 3);
        assert_eq!(builder.module().gates[&src].dsts.len(), 2);

        let dsts: Vec<GateId> = (0..300).map(|_| builder.add_logic(LogicKind::Or)).collect();
        for dst in &dsts {
            tree.connect_next(&mut builder, *dst);
        }

        let module = builder.module();
        for (id, gate) in &module.gates {
            assert!(
                gate.dsts.len() <= Module::FANOUT_LIMIT,
                "gate {id} exceeds the ceiling"
            );
        }
        module.check().unwrap();
    }

    #[test]
    fn leaf_depths_are_uniform() {
        let mut builder = NetBuilder::new();
        let src = builder.add_logic(LogicKind::Or);
        // Two layers: ceil(70000/256) = 274 leaves, ceil(274/256) = 2 middles.
        builder.build_drive_tree(src, 70_000, None);

        let module = builder.module();
        // Walk depth from the root; every leaf (gate with no dsts) must sit
        // at the same distance.
        let mut depth = 0;
        let mut frontier = vec![src];
        let mut leaf_depths = Vec::new();
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for id in &frontier {
                let gate = &module.gates[id];
                if gate.dsts.is_empty() {
                    leaf_depths.push(depth);
                } else {
                    next.extend(gate.dsts.iter().copied());
                }
            }
            frontier = next;
            depth += 1;
        }
        assert!(!leaf_depths.is_empty());
        assert!(leaf_depths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn slots_roll_over_between_leaves() {
        let mut builder = NetBuilder::new();
        let src = builder.add_logic(LogicKind::Or);
        let mut tree = builder.build_drive_tree(src, 300, None);

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..300 {
            seen.insert(tree.next_slot());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn tree_inherits_sequential_flag() {
        let mut builder = NetBuilder::new();
        let src = builder.add_logic_with_timing(LogicKind::Or, true);
        builder.build_drive_tree(src, 300, None);
        let module = builder.module();
        for id in module.gates.keys() {
            assert!(module.is_sequential(*id));
        }
    }

    #[test]
    #[should_panic(expected = "capacity exceeded")]
    fn exhausted_tree_panics() {
        let mut builder = NetBuilder::new();
        let src = builder.add_logic(LogicKind::Or);
        let mut tree = builder.build_drive_tree(src, 1, None);
        tree.next_slot();
        tree.next_slot();
    }

    #[test]
    #[should_panic(expected = "already has outputs")]
    fn tree_from_driven_gate_panics() {
        let mut builder = NetBuilder::new();
        let src = builder.add_logic(LogicKind::Or);
        let dst = builder.add_logic(LogicKind::Or);
        builder.connect(src, dst);
        builder.build_drive_tree(src, 2, None);
    }
}
