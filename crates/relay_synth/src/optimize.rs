//! Optimization pass trait and the fixpoint runner.

use crate::buffers::ReduceBuffersPass;
use crate::const_fold::ConstFoldPass;
use crate::inverters::ReduceInvertersPass;
use crate::purge_port::PurgePortsPass;
use crate::siblings::SiblingJoinPass;
use crate::sync_clock::sync_clocks;
use relay_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use relay_netlist::{GateId, Module, NetBuilder};
use std::collections::BTreeSet;

/// A single local, equivalence-preserving rewrite pass.
///
/// Each pass inspects and modifies the network through the builder, returning
/// `true` if any change was made (which may enable further rewrites in other
/// passes). `keeping` is the set of port-connected gates a pass may rewire
/// but must never remove.
pub trait PeepholePass {
    /// Short name for display and diagnostics.
    fn name(&self) -> &'static str;

    /// Runs the pass once, returning `true` if it made changes.
    fn run(
        &self,
        builder: &mut NetBuilder,
        keeping: &BTreeSet<GateId>,
        sink: &DiagnosticSink,
    ) -> bool;
}

/// Optimizes the module to a global fixpoint, then re-balances clocks.
///
/// Runs all five passes in a fixed order, repeating the whole cycle while any
/// pass reports change. Termination is guaranteed because every rewrite
/// strictly reduces the gate count or the multiset of (source-set, kind)
/// pairs. Clock synchronization runs once on the converged result, because
/// joining siblings can merge two previously-distinct, already-balanced
/// paths.
pub fn optimize(module: &mut Module, sink: &DiagnosticSink) {
    let keeping = module.keeping_gates();
    let mut builder = NetBuilder::from_module(std::mem::take(module));

    let passes: Vec<Box<dyn PeepholePass>> = vec![
        Box::new(ConstFoldPass),
        Box::new(PurgePortsPass),
        Box::new(SiblingJoinPass),
        Box::new(ReduceBuffersPass),
        Box::new(ReduceInvertersPass),
    ];

    let mut rounds = 0usize;
    loop {
        rounds += 1;
        let mut changed = false;
        for pass in &passes {
            if pass.run(&mut builder, &keeping, sink) {
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    sink.emit(Diagnostic::note(
        DiagnosticCode::new(Category::Optimize, 2),
        format!("optimization converged after {rounds} rounds"),
    ));

    *module = builder.into_module();
    sync_clocks(module, sink);
}
