//! Serializable analysis reports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The combined output of the analysis stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisReport {
    /// Structural statistics of the network.
    #[serde(rename = "complexity_report")]
    pub complexity: ComplexityReport,
    /// Depth analysis results.
    #[serde(rename = "timing_report")]
    pub timing: TimingReport,
}

/// Structural statistics of a gate network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexityReport {
    /// Total number of gates.
    #[serde(rename = "gate_count")]
    pub gate_count: usize,
    /// Gates backing input-port bits.
    #[serde(rename = "in_gate_count")]
    pub input_gate_count: usize,
    /// Gates backing output-port bits.
    #[serde(rename = "out_gate_count")]
    pub output_gate_count: usize,
    /// Gates not backing any port bit.
    #[serde(rename = "internal_gate_count")]
    pub internal_gate_count: i64,
    /// Gates flagged sequential.
    #[serde(rename = "seq_gate_count")]
    pub sequential_gate_count: usize,
    /// Internal gates not flagged sequential.
    #[serde(rename = "comb_gate_count")]
    pub combinational_gate_count: i64,
    /// Total number of plain edges.
    #[serde(rename = "conn_count")]
    pub connection_count: usize,
    /// Mean fan-in across all gates.
    #[serde(rename = "avg_gate_count")]
    pub average_gate_input_count: f32,
}

/// Depth analysis results for a module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingReport {
    /// The synthesis timing metric: the longest combinational depth, plus a
    /// fixed two-tick state-transition latency when the network holds state.
    #[serde(
        rename = "crit_depth",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub critical_depth: Option<i64>,
    /// Whether the network holds state.
    #[serde(
        rename = "timing_type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub timing_type: Option<TimingType>,
    /// Per input port: the longest depth from that port to any sink.
    #[serde(rename = "input_depth")]
    pub input_timing: BTreeMap<String, i64>,
    /// Per output port: the longest depth from any source to that port.
    #[serde(rename = "output_depth")]
    pub output_timing: BTreeMap<String, i64>,
}

/// Whether a network is purely combinational or holds state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingType {
    /// No sequential nodes; outputs are a pure function of inputs.
    Combinational,
    /// At least one sequential node; timing includes state-transition cost.
    Sequential,
}
