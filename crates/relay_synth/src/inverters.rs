//! Inverter reduction: sink a lone inverter into its single-consumer source.
//!
//! An inverting gate with one source whose source has no other consumer can
//! disappear entirely: the source flips to its negated kind and takes over
//! the inverter's fan-out. Chains of inverters collapse into kind changes at
//! zero gate cost. A source with no inputs is refused: its output is
//! definitionally low and cannot be negated by flipping its kind; constant
//! folding owns that case.

use crate::optimize::PeepholePass;
use relay_diagnostics::DiagnosticSink;
use relay_netlist::{GateId, GateKind, NetBuilder};
use std::collections::BTreeSet;

/// The inverter-reduction pass.
pub struct ReduceInvertersPass;

impl PeepholePass for ReduceInvertersPass {
    fn name(&self) -> &'static str {
        "reduce-inverters"
    }

    fn run(
        &self,
        builder: &mut NetBuilder,
        keeping: &BTreeSet<GateId>,
        _sink: &DiagnosticSink,
    ) -> bool {
        let mut removal_count = 0usize;

        let targets: Vec<GateId> = builder
            .module()
            .gates
            .keys()
            .filter(|id| !keeping.contains(id))
            .copied()
            .collect();

        for &gate_id in &targets {
            let (src_id, negated, transfer): (GateId, GateKind, Vec<GateId>) = {
                let module = builder.module();
                let Some(gate) = module.gates.get(&gate_id) else {
                    continue;
                };
                let Some(kind) = gate.kind.logic() else {
                    continue;
                };
                if !kind.is_inverter() || gate.srcs.len() != 1 || module.is_sequential(gate_id) {
                    continue;
                }
                let src_id = *gate.srcs.iter().next().unwrap();
                let source = &module.gates[&src_id];
                let Some(source_kind) = source.kind.logic() else {
                    continue;
                };
                if keeping.contains(&src_id)
                    || source.dsts.len() != 1
                    || source.srcs.is_empty()
                    || module.is_sequential(src_id)
                {
                    continue;
                }
                (
                    src_id,
                    GateKind::Logic {
                        kind: source_kind.negated(),
                    },
                    gate.dsts.iter().copied().collect(),
                )
            };

            builder.remove_gate(gate_id);
            builder.connect_fanout(src_id, transfer);
            builder.change_gate_kind(src_id, negated);
            removal_count += 1;
        }

        removal_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_netlist::LogicKind;

    fn run_pass(builder: &mut NetBuilder, keeping: &BTreeSet<GateId>) -> bool {
        let sink = DiagnosticSink::new();
        ReduceInvertersPass.run(builder, keeping, &sink)
    }

    fn keeping_of(builder: &NetBuilder) -> BTreeSet<GateId> {
        builder.module().keeping_gates()
    }

    #[test]
    fn sinks_inverter_into_source() {
        let mut builder = NetBuilder::new();
        let a = builder.add_logic(LogicKind::Or);
        let b = builder.add_logic(LogicKind::Or);
        let and = builder.add_logic(LogicKind::And);
        let inv = builder.add_logic(LogicKind::Nor);
        let out = builder.add_logic(LogicKind::Or);
        builder.connect_many([a, b], and);
        builder.connect_chain(&[and, inv, out]);
        builder.register_input("a", vec![a], false);
        builder.register_input("b", vec![b], false);
        builder.register_output("out", vec![out], false);
        let keeping = keeping_of(&builder);

        assert!(run_pass(&mut builder, &keeping));
        let module = builder.module();
        module.check().unwrap();
        // NOT(AND) became NAND driving out directly.
        assert!(!module.gates.contains_key(&inv));
        assert_eq!(
            module.gates[&and].kind,
            GateKind::Logic {
                kind: LogicKind::Nand
            }
        );
        assert!(module.gates[&and].dsts.contains(&out));
    }

    #[test]
    fn refuses_source_with_other_consumers() {
        let mut builder = NetBuilder::new();
        let a = builder.add_logic(LogicKind::Or);
        let src = builder.add_logic(LogicKind::And);
        let inv = builder.add_logic(LogicKind::Nor);
        let other = builder.add_logic(LogicKind::Or);
        builder.connect(a, src);
        builder.connect(src, inv);
        builder.connect(src, other);
        builder.register_input("a", vec![a], false);
        builder.register_output("other", vec![other], false);
        let keeping = keeping_of(&builder);

        // Flipping src would also negate what `other` sees.
        assert!(!run_pass(&mut builder, &keeping));
        assert!(builder.module().gates.contains_key(&inv));
    }

    #[test]
    fn refuses_source_without_inputs() {
        let mut builder = NetBuilder::new();
        let src = builder.add_logic(LogicKind::Or);
        let inv = builder.add_logic(LogicKind::Nor);
        let out = builder.add_logic(LogicKind::Or);
        builder.connect_chain(&[src, inv, out]);
        builder.register_output("out", vec![out], false);
        let keeping = keeping_of(&builder);

        // A source-less gate idles low; flipping it to NOR would turn it
        // into a constant high instead of negating a live signal.
        assert!(!run_pass(&mut builder, &keeping));
        assert!(builder.module().gates.contains_key(&inv));
    }

    #[test]
    fn refuses_kept_source() {
        let mut builder = NetBuilder::new();
        let a = builder.add_logic(LogicKind::Or);
        let src = builder.add_logic(LogicKind::And);
        let inv = builder.add_logic(LogicKind::Nor);
        builder.connect(a, src);
        builder.connect(src, inv);
        builder.register_input("a", vec![a], false);
        // The source doubles as an output port bit.
        builder.register_output("src", vec![src], false);
        let keeping = keeping_of(&builder);

        assert!(!run_pass(&mut builder, &keeping));
    }

    #[test]
    fn refuses_sequential_endpoints() {
        let mut builder = NetBuilder::new();
        let a = builder.add_logic(LogicKind::Or);
        let src = builder.add_logic_with_timing(LogicKind::And, true);
        let inv = builder.add_logic(LogicKind::Nor);
        let out = builder.add_logic(LogicKind::Or);
        builder.connect(a, src);
        builder.connect_chain(&[src, inv, out]);
        builder.register_input("a", vec![a], false);
        builder.register_output("out", vec![out], false);
        let keeping = keeping_of(&builder);

        assert!(!run_pass(&mut builder, &keeping));
    }

    #[test]
    fn collapses_double_inversion() {
        let mut builder = NetBuilder::new();
        let a = builder.add_logic(LogicKind::Or);
        let g = builder.add_logic(LogicKind::And);
        let inv1 = builder.add_logic(LogicKind::Nor);
        let inv2 = builder.add_logic(LogicKind::Nor);
        let out = builder.add_logic(LogicKind::Or);
        builder.connect(a, g);
        builder.connect_chain(&[g, inv1, inv2, out]);
        builder.register_input("a", vec![a], false);
        builder.register_output("out", vec![out], false);
        let keeping = keeping_of(&builder);

        // One sweep sinks inv1 into g (AND -> NAND), then inv2 into the
        // now-negated g (NAND -> AND).
        assert!(run_pass(&mut builder, &keeping));
        assert!(!run_pass(&mut builder, &keeping));
        let module = builder.module();
        module.check().unwrap();
        assert_eq!(
            module.gates[&g].kind,
            GateKind::Logic {
                kind: LogicKind::And
            }
        );
        assert!(module.gates[&g].dsts.contains(&out));
        assert_eq!(module.gates.len(), 3);
    }
}
