//! Peephole optimization and clock synchronization for Relay gate networks.
//!
//! [`optimize`] drives five local, equivalence-preserving rewrite passes to a
//! global fixpoint and then re-balances every clock domain. Each pass
//! preserves the Boolean function at every output port and the tick-by-tick
//! behavior of every sequential node; only internal structure changes.
//!
//! The passes are exported individually for targeted use and testing:
//! constant folding, dead input-port purging, identical-sibling joining,
//! buffer reduction, and inverter reduction.

#![warn(missing_docs)]

mod buffers;
mod const_fold;
mod inverters;
mod optimize;
mod purge_port;
mod siblings;
mod sync_clock;

pub use buffers::ReduceBuffersPass;
pub use const_fold::ConstFoldPass;
pub use inverters::ReduceInvertersPass;
pub use optimize::{optimize, PeepholePass};
pub use purge_port::PurgePortsPass;
pub use siblings::SiblingJoinPass;
pub use sync_clock::{longest_path_from, shortest_path_from, sync_clock_domain, sync_clocks};
