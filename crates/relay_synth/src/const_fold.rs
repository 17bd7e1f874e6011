//! Constant folding: propagate source-less drivers through the network.
//!
//! A gate with no sources idles low, so once drive-elimination leaves such a
//! gate behind, its constant value can be pushed into every consumer. How a
//! consumer resolves depends on its aggregation class: a low drive dominates
//! the AND family, a high drive dominates the OR family, and the XOR family
//! just toggles to its negated kind. A dominated gate becomes the new
//! constant source for everything downstream. Port gates that would resolve
//! to a constant are re-driven from shared low/high generators instead of
//! being removed.

use crate::optimize::PeepholePass;
use relay_diagnostics::DiagnosticSink;
use relay_netlist::{Aggregation, DeferredGate, GateId, GateKind, LogicKind, NetBuilder};
use std::collections::{BTreeMap, BTreeSet};

/// The constant-folding pass.
pub struct ConstFoldPass;

impl PeepholePass for ConstFoldPass {
    fn name(&self) -> &'static str {
        "const-fold"
    }

    fn run(
        &self,
        builder: &mut NetBuilder,
        keeping: &BTreeSet<GateId>,
        _sink: &DiagnosticSink,
    ) -> bool {
        let old_count = builder.module().gates.len();

        let mut redrives: BTreeMap<GateId, bool> = BTreeMap::new();
        while fold_round(builder, keeping, &mut redrives) {}

        // Re-drive port gates that resolved to a constant. High needs an
        // inverted low (a source-less gate idles low), so the generator is an
        // idle OR feeding a NOR.
        let mut high_driver = DeferredGate::new(|b| {
            let feed = b.add_logic(LogicKind::Or);
            let inv = b.add_logic(LogicKind::Nor);
            b.connect(feed, inv);
            inv
        });
        let mut low_driver = DeferredGate::new(|b| b.add_logic(LogicKind::Or));

        for (&gate_id, &drive) in &redrives {
            let src = if drive {
                high_driver.acquire(builder)
            } else {
                low_driver.acquire(builder)
            };
            builder.connect(src, gate_id);
        }

        let new_count = builder.module().gates.len();
        new_count < old_count
    }
}

/// One folding wave: eliminate every live constant source, then purge gates
/// left without outputs until stable.
fn fold_round(
    builder: &mut NetBuilder,
    keeping: &BTreeSet<GateId>,
    redrives: &mut BTreeMap<GateId, bool>,
) -> bool {
    let of_interest: Vec<GateId> = builder
        .module()
        .gates
        .keys()
        .filter(|id| !keeping.contains(id))
        .copied()
        .collect();
    let mut changed = false;

    for &gate_id in &of_interest {
        let Some(gate) = builder.module().gates.get(&gate_id) else {
            continue;
        };
        if gate.srcs.is_empty() && !gate.dsts.is_empty() {
            eliminate_const_drive(builder, gate_id, keeping, redrives);
            changed = true;
        }
    }

    loop {
        let mut stable = true;
        for &gate_id in &of_interest {
            let Some(gate) = builder.module().gates.get(&gate_id) else {
                continue;
            };
            if gate.dsts.is_empty() {
                builder.remove_gate(gate_id);
                stable = false;
                changed = true;
            }
        }
        if stable {
            break;
        }
    }

    changed
}

#[derive(Clone, Copy)]
struct Frame {
    gate: GateId,
    drive: Option<bool>,
}

/// Pushes the constant value of `root` through its drive cone.
///
/// Uses an explicit frame stack instead of recursion; propagation chains can
/// be as long as the network is deep. Each edge is disconnected before the
/// consumer's frame is pushed, so every edge is visited exactly once.
fn eliminate_const_drive(
    builder: &mut NetBuilder,
    root: GateId,
    keeping: &BTreeSet<GateId>,
    redrives: &mut BTreeMap<GateId, bool>,
) {
    let mut stack: Vec<Frame> = vec![Frame {
        gate: root,
        drive: None,
    }];

    while let Some(&frame) = stack.last() {
        let (kind, srcs, first_dst) = {
            let gate = &builder.module().gates[&frame.gate];
            (
                gate.kind,
                gate.srcs.iter().copied().collect::<Vec<GateId>>(),
                gate.dsts.iter().next().copied(),
            )
        };

        // The gate still has inputs beyond the constant one: resolve what the
        // drive does to it.
        if !srcs.is_empty() {
            let drive = frame
                .drive
                .expect("constant propagation reached a multi-input gate without a drive state");
            let logic = match kind {
                GateKind::Logic { kind } => kind,
                GateKind::Timer { .. } => {
                    panic!("constant drive landed on a timer with live inputs")
                }
            };
            match drive_resolution(logic, drive) {
                DriveResolution::Convert(new_kind) => {
                    // The drive is absorbed; the gate keeps its function
                    // (possibly toggled) and the cone ends here.
                    builder.change_gate_kind(frame.gate, GateKind::Logic { kind: new_kind });
                    stack.pop();
                }
                DriveResolution::Dominate(state) => {
                    // The drive pins the output; the gate becomes the new
                    // constant source for its own cone.
                    builder.disconnect_many(srcs, frame.gate);
                    builder.change_gate_kind(
                        frame.gate,
                        GateKind::Logic {
                            kind: LogicKind::Or,
                        },
                    );
                    stack.last_mut().unwrap().drive = Some(state);
                }
            }
            continue;
        }

        if let Some(dst) = first_dst {
            builder.disconnect(frame.gate, dst);
            let new_state = match frame.drive {
                Some(drive) => match kind {
                    GateKind::Logic { kind } => drive != kind.is_inverter(),
                    GateKind::Timer { .. } => drive,
                },
                // A source-less root idles low no matter its kind.
                None => false,
            };
            stack.push(Frame {
                gate: dst,
                drive: Some(new_state),
            });
        } else {
            // Cone drained. Port gates must stay present and get re-driven
            // with their resolved constant.
            if keeping.contains(&frame.gate) {
                if let Some(drive) = frame.drive {
                    redrives.insert(frame.gate, drive);
                }
            }
            stack.pop();
        }
    }
}

enum DriveResolution {
    /// The gate survives, possibly as a different kind.
    Convert(LogicKind),
    /// The gate's output is pinned to the given state.
    Dominate(bool),
}

/// What happens when one input of a multi-input gate is driven constant.
fn drive_resolution(kind: LogicKind, drive: bool) -> DriveResolution {
    match kind.aggregation() {
        Aggregation::And => {
            if !drive {
                DriveResolution::Dominate(kind.is_inverter())
            } else {
                DriveResolution::Convert(kind)
            }
        }
        Aggregation::Or => {
            if drive {
                DriveResolution::Dominate(!kind.is_inverter())
            } else {
                DriveResolution::Convert(kind)
            }
        }
        Aggregation::Chain => DriveResolution::Convert(if drive { kind.negated() } else { kind }),
    }
}
