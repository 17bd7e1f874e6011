//! Buffer reduction: splice out single-input non-inverting gates.
//!
//! A non-inverting logic gate with exactly one source forwards its input
//! unchanged, so its source can drive the gate's consumers directly. The
//! splice is skipped when the combined destination set would push the source
//! past the fan-out ceiling, and never touches sequential gates (their output
//! is timing-visible state).

use crate::optimize::PeepholePass;
use relay_diagnostics::DiagnosticSink;
use relay_netlist::{GateId, Module, NetBuilder};
use std::collections::BTreeSet;

/// The buffer-reduction pass.
pub struct ReduceBuffersPass;

impl PeepholePass for ReduceBuffersPass {
    fn name(&self) -> &'static str {
        "reduce-buffers"
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
            let (src, transfer): (GateId, Vec<GateId>) = {
                let module = builder.module();
                let Some(gate) = module.gates.get(&gate_id) else {
                    continue;
                };
                let Some(kind) = gate.kind.logic() else {
                    continue;
                };
                if kind.is_inverter() || gate.srcs.len() != 1 || module.is_sequential(gate_id) {
                    continue;
                }
                let src = *gate.srcs.iter().next().unwrap();

                // The source inherits the buffer's consumers; ceiling check
                // on the combined destination set.
                let mut combined: BTreeSet<GateId> = module.gates[&src]
                    .dsts
                    .iter()
                    .copied()
                    .filter(|d| *d != gate_id)
                    .collect();
                combined.extend(gate.dsts.iter().copied());
                if combined.len() > Module::FANOUT_LIMIT {
                    continue;
                }
                (src, gate.dsts.iter().copied().collect())
            };

            builder.remove_gate(gate_id);
            builder.connect_fanout(src, transfer);
            removal_count += 1;
        }

        removal_count > 0
    }
}
