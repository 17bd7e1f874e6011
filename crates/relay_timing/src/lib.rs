//! Timing-depth analysis and report types for Relay gate networks.
//!
//! [`depth_table`] computes, for a chosen traversal direction, the longest
//! acyclic combinational depth at every node, treating sequential nodes as
//! depth-reset points and portal edges as edges carrying their own tick
//! delta. [`analyze_timing`] runs it in both directions to produce per-port
//! depths and the critical depth; [`analyze_complexity`] counts the
//! network's structural statistics. Both feed the serializable
//! [`SynthesisReport`].

#![warn(missing_docs)]

mod analyze;
mod depth;
mod report;

pub use analyze::{analyze_complexity, analyze_timing};
pub use depth::{depth_table, DepthDirection};
pub use report::{ComplexityReport, SynthesisReport, TimingReport, TimingType};
