//! Clock-domain path balancing.
//!
//! The execution substrate evaluates all gates in lockstep ticks, so every
//! path from a clock source to the sequential nodes it reaches must have the
//! same length, otherwise different state elements latch the clock edge on
//! different ticks. Balancing stretches every short branch with neutral OR
//! buffers until the shortest source-to-sink path equals the longest.

use crate::optimize::PeepholePass;
use crate::siblings::SiblingJoinPass;
use relay_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use relay_netlist::{GateId, LogicKind, Module, NetBuilder};
use std::collections::BTreeSet;

/// Balances every clock domain of the module.
///
/// Applies [`sync_clock_domain`] to each bit gate of each input port flagged
/// as a clock. Called standalone on unoptimized modules and as the tail of
/// [`optimize`](crate::optimize) (a pass that merges siblings can coalesce
/// previously-distinct, already-balanced paths).
pub fn sync_clocks(module: &mut Module, sink: &DiagnosticSink) {
    for clock in module.clock_gates() {
        sync_clock_domain(module, clock, sink);
    }
}

/// Balances the domain of one clock source gate.
///
/// Inserts buffers until every path to a sequential sink has the length of
/// the longest one, then joins identical siblings to a fixpoint so parallel
/// buffer chains created on a common branch collapse again.
pub fn sync_clock_domain(module: &mut Module, clock: GateId, sink: &DiagnosticSink) {
    let keeping = module.keeping_gates();
    let mut builder = NetBuilder::from_module(std::mem::take(module));

    ensure_clock_sync(&mut builder, clock, sink);
    while SiblingJoinPass.run(&mut builder, &keeping, sink) {}

    *module = builder.into_module();
}

/// Stretches short branches until the domain is balanced.
///
/// Runs `longest` rounds of level-order traversal from the clock source; in
/// each round, every edge about to land on a sequential node is spliced with
/// a fresh OR buffer, which joins the next frontier. A sink keeps being
/// pushed one level deeper each round until its branch reaches the longest
/// length, and edges already at the longest length are never traversed.
fn ensure_clock_sync(builder: &mut NetBuilder, clock: GateId, sink: &DiagnosticSink) {
    let longest = longest_path_from(builder.module(), clock);
    let Some(shortest) = shortest_path_from(builder.module(), clock) else {
        // No sequential sink in this domain; nothing to balance.
        return;
    };
    if longest == shortest {
        return;
    }

    sink.emit(
        Diagnostic::warning(
            DiagnosticCode::new(Category::Clock, 10),
            format!(
                "clock domain is unbalanced (shortest path {shortest}, longest {longest}); \
                 inserting synchronization buffers"
            ),
        )
        .with_gate(clock.as_raw()),
    );

    let mut frontier: BTreeSet<GateId> = BTreeSet::from([clock]);
    for _ in 0..longest {
        let mut next: BTreeSet<GateId> = BTreeSet::new();
        for &gate_id in &frontier {
            let dsts: Vec<GateId> = builder.module().gates[&gate_id].dsts.iter().copied().collect();
            for dst in dsts {
                if builder.module().is_sequential(dst) {
                    let buffer = builder.add_logic(LogicKind::Or);
                    builder.disconnect(gate_id, dst);
                    builder.connect(gate_id, buffer);
                    builder.connect(buffer, dst);
                }
            }
            // Re-read after splicing: spliced sinks left, buffers joined.
            next.extend(builder.module().gates[&gate_id].dsts.iter().copied());
        }
        frontier = next;
    }

    debug_assert_eq!(
        shortest_path_from(builder.module(), clock),
        Some(longest),
        "clock domain still unbalanced after buffer insertion"
    );
}

/// The number of non-sequential frontier levels reachable from `clock`.
///
/// Level-order expansion that drops sequential nodes from the frontier,
/// counting how many levels produce new work. Termination relies on
/// sequential nodes breaking every feedback cycle.
pub fn longest_path_from(module: &Module, clock: GateId) -> usize {
    let mut frontier: BTreeSet<GateId> = BTreeSet::from([clock]);
    let mut iterations = 0;
    loop {
        let mut next: BTreeSet<GateId> = BTreeSet::new();
        for gate_id in &frontier {
            next.extend(
                module.gates[gate_id]
                    .dsts
                    .iter()
                    .copied()
                    .filter(|d| !module.is_sequential(*d)),
            );
        }
        if next.is_empty() {
            break;
        }
        iterations += 1;
        frontier = next;
    }
    iterations
}

/// The frontier level at which the first sequential sink appears.
///
/// Returns `None` when the domain drains without touching any sequential
/// node (nothing to synchronize).
pub fn shortest_path_from(module: &Module, clock: GateId) -> Option<usize> {
    let mut frontier: BTreeSet<GateId> = BTreeSet::from([clock]);
    let mut iterations = 0;
    loop {
        let mut next: BTreeSet<GateId> = BTreeSet::new();
        for gate_id in &frontier {
            let dsts = &module.gates[gate_id].dsts;
            if dsts.iter().any(|d| module.is_sequential(*d)) {
                return Some(iterations);
            }
            next.extend(dsts.iter().copied());
        }
        if next.is_empty() {
            return None;
        }
        iterations += 1;
        frontier = next;
    }
}
