//! Identical-sibling joining.
//!
//! Two gates fed by exactly the same source set and computing an equivalent
//! function are interchangeable; the duplicate's fan-out moves onto the
//! survivor. A hash of each gate's source set buckets candidates first so the
//! pairwise comparison never runs over the whole graph.
//!
//! This pass does not change timing: the survivor sits at the same depth as
//! the duplicate it absorbs.

use crate::optimize::PeepholePass;
use relay_common::{hash_id_set, SetHash};
use relay_diagnostics::DiagnosticSink;
use relay_netlist::{GateId, Module, NetBuilder};
use std::collections::{BTreeSet, HashSet};

/// The identical-sibling joining pass.
pub struct SiblingJoinPass;

impl PeepholePass for SiblingJoinPass {
    fn name(&self) -> &'static str {
        "join-siblings"
    }

    fn run(
        &self,
        builder: &mut NetBuilder,
        keeping: &BTreeSet<GateId>,
        _sink: &DiagnosticSink,
    ) -> bool {
        let mut change_count = 0usize;

        let targets: Vec<GateId> = builder
            .module()
            .gates
            .keys()
            .filter(|id| !keeping.contains(id))
            .copied()
            .collect();

        // Bucket pre-pass: only gates whose source-set hash occurs more than
        // once can have a sibling.
        let mut seen: HashSet<SetHash> = HashSet::new();
        let mut duplicated: HashSet<SetHash> = HashSet::new();
        for &id in &targets {
            let hash = source_hash(builder.module(), id);
            if !seen.insert(hash) {
                duplicated.insert(hash);
            }
        }
        let candidates: Vec<GateId> = targets
            .iter()
            .copied()
            .filter(|id| duplicated.contains(&source_hash(builder.module(), *id)))
            .collect();

        for &gate_id in &candidates {
            if !builder.module().gates.contains_key(&gate_id) {
                continue;
            }
            for &gate2_id in &candidates {
                if gate2_id == gate_id {
                    continue;
                }
                // Re-read the survivor every round: its fan-out grows as it
                // absorbs siblings.
                let transfer: Vec<GateId> = {
                    let module = builder.module();
                    let Some(gate) = module.gates.get(&gate_id) else {
                        break;
                    };
                    let Some(gate2) = module.gates.get(&gate2_id) else {
                        continue;
                    };
                    let (Some(kind), Some(kind2)) = (gate.kind.logic(), gate2.kind.logic()) else {
                        continue;
                    };
                    if module.is_sequential(gate_id) || module.is_sequential(gate2_id) {
                        continue;
                    }
                    if !kind.is_equivalent_to(kind2, gate.srcs.len()) {
                        continue;
                    }
                    if gate.srcs != gate2.srcs {
                        continue;
                    }
                    if gate.dsts.union(&gate2.dsts).count() > Module::FANOUT_LIMIT {
                        continue;
                    }
                    gate2.dsts.iter().copied().collect()
                };

                builder.transfer_portals(gate2_id, gate_id, 0);
                builder.remove_gate(gate2_id);
                builder.connect_fanout(gate_id, transfer);
                change_count += 1;
            }
        }

        change_count > 0
    }
}

fn source_hash(module: &Module, id: GateId) -> SetHash {
    hash_id_set(module.gates[&id].srcs.iter().map(|g| g.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_netlist::LogicKind;

    fn run_pass(builder: &mut NetBuilder, keeping: &BTreeSet<GateId>) -> bool {
        let sink = DiagnosticSink::new();
        SiblingJoinPass.run(builder, keeping, &sink)
    }

    /// Two AND siblings over (a, b), each with a distinct consumer.
    fn sibling_net() -> (NetBuilder, BTreeSet<GateId>, [GateId; 2]) {
        let mut builder = NetBuilder::new();
        let a = builder.add_logic(LogicKind::Or);
        let b = builder.add_logic(LogicKind::Or);
        let and1 = builder.add_logic(LogicKind::And);
        let and2 = builder.add_logic(LogicKind::And);
        let use1 = builder.add_logic(LogicKind::Or);
        let use2 = builder.add_logic(LogicKind::Or);
        builder.connect_many([a, b], and1);
        builder.connect_many([a, b], and2);
        builder.connect(and1, use1);
        builder.connect(and2, use2);
        builder.register_input("a", vec![a], false);
        builder.register_input("b", vec![b], false);
        builder.register_output("u1", vec![use1], false);
        builder.register_output("u2", vec![use2], false);
        let keeping = builder.module().keeping_gates();
        (builder, keeping, [and1, and2])
    }

    #[test]
    fn joins_identical_siblings() {
        let (mut builder, keeping, [and1, and2]) = sibling_net();
        assert!(run_pass(&mut builder, &keeping));

        let module = builder.module();
        module.check().unwrap();
        // The lower id survives and inherits both consumers.
        assert!(module.gates.contains_key(&and1));
        assert!(!module.gates.contains_key(&and2));
        assert_eq!(module.gates[&and1].dsts.len(), 2);
    }

    #[test]
    fn idempotent_on_converged_graph() {
        let (mut builder, keeping, _) = sibling_net();
        assert!(run_pass(&mut builder, &keeping));
        // A second run on the already-joined graph changes nothing.
        assert!(!run_pass(&mut builder, &keeping));
    }

    #[test]
    fn different_kinds_not_joined() {
        let mut builder = NetBuilder::new();
        let a = builder.add_logic(LogicKind::Or);
        let b = builder.add_logic(LogicKind::Or);
        let and = builder.add_logic(LogicKind::And);
        let or = builder.add_logic(LogicKind::Or);
        builder.connect_many([a, b], and);
        builder.connect_many([a, b], or);
        let use1 = builder.add_logic(LogicKind::Or);
        let use2 = builder.add_logic(LogicKind::Or);
        builder.connect(and, use1);
        builder.connect(or, use2);
        builder.register_input("a", vec![a], false);
        builder.register_input("b", vec![b], false);
        builder.register_output("u1", vec![use1], false);
        builder.register_output("u2", vec![use2], false);
        let keeping = builder.module().keeping_gates();

        assert!(!run_pass(&mut builder, &keeping));
    }

    #[test]
    fn single_input_joins_across_kinds() {
        // With one input, AND and OR are both buffers; they join.
        let mut builder = NetBuilder::new();
        let a = builder.add_logic(LogicKind::Or);
        let buf_and = builder.add_logic(LogicKind::And);
        let buf_or = builder.add_logic(LogicKind::Or);
        builder.connect(a, buf_and);
        builder.connect(a, buf_or);
        let use1 = builder.add_logic(LogicKind::Or);
        let use2 = builder.add_logic(LogicKind::Or);
        builder.connect(buf_and, use1);
        builder.connect(buf_or, use2);
        builder.register_input("a", vec![a], false);
        builder.register_output("u1", vec![use1], false);
        builder.register_output("u2", vec![use2], false);
        let keeping = builder.module().keeping_gates();

        assert!(run_pass(&mut builder, &keeping));
        builder.module().check().unwrap();
        assert_eq!(builder.module().gates.len(), 4);
    }

    #[test]
    fn different_sources_not_joined() {
        let mut builder = NetBuilder::new();
        let a = builder.add_logic(LogicKind::Or);
        let b = builder.add_logic(LogicKind::Or);
        let c = builder.add_logic(LogicKind::Or);
        let and1 = builder.add_logic(LogicKind::And);
        let and2 = builder.add_logic(LogicKind::And);
        builder.connect_many([a, b], and1);
        builder.connect_many([a, c], and2);
        let use1 = builder.add_logic(LogicKind::Or);
        builder.connect(and1, use1);
        builder.connect(and2, use1);
        builder.register_input("a", vec![a], false);
        builder.register_input("b", vec![b], false);
        builder.register_input("c", vec![c], false);
        builder.register_output("u1", vec![use1], false);
        let keeping = builder.module().keeping_gates();

        assert!(!run_pass(&mut builder, &keeping));
    }

    #[test]
    fn kept_gates_not_joined() {
        let (mut builder, _, [and1, and2]) = sibling_net();
        // Pretend both ANDs are port gates.
        let mut keeping = builder.module().keeping_gates();
        keeping.insert(and1);
        keeping.insert(and2);
        assert!(!run_pass(&mut builder, &keeping));
    }

    #[test]
    fn sequential_gates_not_joined() {
        let mut builder = NetBuilder::new();
        let a = builder.add_logic(LogicKind::Or);
        let s1 = builder.add_logic_with_timing(LogicKind::And, true);
        let s2 = builder.add_logic_with_timing(LogicKind::And, true);
        builder.connect(a, s1);
        builder.connect(a, s2);
        let use1 = builder.add_logic(LogicKind::Or);
        let use2 = builder.add_logic(LogicKind::Or);
        builder.connect(s1, use1);
        builder.connect(s2, use2);
        builder.register_input("a", vec![a], false);
        builder.register_output("u1", vec![use1], false);
        builder.register_output("u2", vec![use2], false);
        let keeping = builder.module().keeping_gates();

        assert!(!run_pass(&mut builder, &keeping));
        assert!(builder.module().gates.contains_key(&s2));
    }

    #[test]
    fn skips_merge_that_would_exceed_fanout() {
        let mut builder = NetBuilder::new();
        let a = builder.add_logic(LogicKind::Or);
        let and1 = builder.add_logic(LogicKind::And);
        let and2 = builder.add_logic(LogicKind::And);
        builder.connect(a, and1);
        builder.connect(a, and2);
        // Fill both siblings far enough that the union would overflow.
        let mut consumers = Vec::new();
        for _ in 0..200 {
            let d = builder.add_logic(LogicKind::Or);
            builder.connect(and1, d);
            consumers.push(d);
        }
        for _ in 0..200 {
            let d = builder.add_logic(LogicKind::Or);
            builder.connect(and2, d);
            consumers.push(d);
        }
        builder.register_input("a", vec![a], false);
        builder.register_output("d", consumers, false);
        let keeping = builder.module().keeping_gates();

        assert!(!run_pass(&mut builder, &keeping));
        assert!(builder.module().gates.contains_key(&and1));
        assert!(builder.module().gates.contains_key(&and2));
    }

    #[test]
    fn merged_gate_count_matches() {
        let (mut builder, keeping, _) = sibling_net();
        let before = builder.module().gates.len();
        run_pass(&mut builder, &keeping);
        assert_eq!(builder.module().gates.len(), before - 1);
    }
}
