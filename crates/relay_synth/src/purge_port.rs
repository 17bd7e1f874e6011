//! Dead input-port removal.
//!
//! Earlier folding can leave an input port with no remaining consumers on any
//! of its bit gates. Such ports are unregistered and their gates deleted.
//! Removing one port can orphan another, so the pass repeats to a local
//! fixpoint.

use crate::optimize::PeepholePass;
use relay_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use relay_netlist::{GateId, NetBuilder};
use std::collections::BTreeSet;

/// The input-port purging pass.
pub struct PurgePortsPass;

impl PeepholePass for PurgePortsPass {
    fn name(&self) -> &'static str {
        "purge-ports"
    }

    fn run(
        &self,
        builder: &mut NetBuilder,
        _keeping: &BTreeSet<GateId>,
        sink: &DiagnosticSink,
    ) -> bool {
        let mut ever_changed = false;
        loop {
            let changed = purge_round(builder, sink);
            if changed {
                ever_changed = true;
            } else {
                break;
            }
        }
        ever_changed
    }
}

fn purge_round(builder: &mut NetBuilder, sink: &DiagnosticSink) -> bool {
    let mut changed = false;

    let inputs: Vec<(String, Vec<GateId>)> = builder
        .module()
        .inputs
        .iter()
        .map(|(name, port)| (name.clone(), port.gates.clone()))
        .collect();

    for (port_name, gates) in inputs {
        let all_unused = gates
            .iter()
            .all(|id| builder.module().gates[id].dsts.is_empty());
        if all_unused {
            builder.unregister_input(&port_name);
            let mut diag = Diagnostic::note(
                DiagnosticCode::new(Category::Optimize, 1),
                format!("removed unused input port '{port_name}'"),
            );
            for id in gates {
                diag = diag.with_gate(id.as_raw());
                builder.remove_gate(id);
            }
            sink.emit(diag);
            changed = true;
        }
    }

    changed
}
