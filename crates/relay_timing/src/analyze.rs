//! Timing and complexity analysis entry points.

use crate::depth::{depth_table, DepthDirection};
use crate::report::{ComplexityReport, TimingReport, TimingType};
use relay_common::RelayResult;
use relay_netlist::{GateId, Module};
use std::collections::BTreeMap;

/// Analyzes combinational depth across the module.
///
/// Two independent propagation runs populate the full picture: the
/// from-outputs table gives each input port's distance to the farthest sink
/// (and the global maximum), the from-inputs table gives each output port's
/// distance from the farthest source. Port depth is the maximum over the
/// port's bit gates. The critical depth adds a fixed two-tick
/// state-transition latency when any sequential node exists.
pub fn analyze_timing(module: &Module) -> RelayResult<TimingReport> {
    let to_sink = depth_table(module, DepthDirection::FromOutputs);
    let from_source = depth_table(module, DepthDirection::FromInputs);

    let total_depth = to_sink.values().copied().max().unwrap_or(0);

    let mut input_timing: BTreeMap<String, i64> = BTreeMap::new();
    for (name, port) in &module.inputs {
        input_timing.insert(name.clone(), port_depth(&port.gates, &to_sink));
    }
    let mut output_timing: BTreeMap<String, i64> = BTreeMap::new();
    for (name, port) in &module.outputs {
        output_timing.insert(name.clone(), port_depth(&port.gates, &from_source));
    }

    let pure_combinational = module.sequential_nodes.is_empty();

    Ok(TimingReport {
        critical_depth: Some(if pure_combinational {
            total_depth
        } else {
            total_depth + 2
        }),
        timing_type: Some(if pure_combinational {
            TimingType::Combinational
        } else {
            TimingType::Sequential
        }),
        input_timing,
        output_timing,
    })
}

/// The maximum resolved depth over a port's bit gates.
fn port_depth(bits: &[GateId], table: &BTreeMap<GateId, i64>) -> i64 {
    bits.iter()
        .map(|id| table.get(id).copied().unwrap_or(0))
        .max()
        .unwrap_or(0)
}

/// Counts the structural statistics of the module.
pub fn analyze_complexity(module: &Module) -> ComplexityReport {
    let gate_count = module.gates.len();
    let input_gate_count: usize = module.inputs.values().map(|p| p.gates.len()).sum();
    let output_gate_count: usize = module.outputs.values().map(|p| p.gates.len()).sum();
    let internal_gate_count = gate_count as i64 - input_gate_count as i64 - output_gate_count as i64;
    let sequential_gate_count = module.sequential_nodes.len();
    let combinational_gate_count = internal_gate_count - sequential_gate_count as i64;
    let connection_count = module.connection_count();
    let average_gate_input_count = if gate_count == 0 {
        0.0
    } else {
        connection_count as f32 / gate_count as f32
    };

    ComplexityReport {
        gate_count,
        input_gate_count,
        output_gate_count,
        internal_gate_count,
        sequential_gate_count,
        combinational_gate_count,
        connection_count,
        average_gate_input_count,
    }
}
