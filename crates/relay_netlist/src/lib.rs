//! Gate-network model for the Relay synthesis toolchain.
//!
//! A [`Module`] is a graph of [`Gate`]s connected by symmetric source/
//! destination edge sets, with a second, delay-annotated "portal" edge kind
//! between sequential gates. All mutation goes through the [`NetBuilder`],
//! which owns id allocation and keeps both sides of every edge consistent;
//! [`Module::check`] audits a finished graph against the structural
//! invariants (edge symmetry, fan-out ceiling, no short cycles, timer and
//! portal shape rules).
//!
//! The serialized form is JSON with sorted keys, stable across map-iteration
//! order; see [`Module`] field attributes for the exact layout.

#![warn(missing_docs)]

mod builder;
mod check;
mod defer;
mod dot;
mod error;
mod gate;
mod merge;
mod module;
mod tree;

pub use builder::NetBuilder;
pub use defer::DeferredGate;
pub use dot::to_dot;
pub use error::NetlistError;
pub use gate::{Aggregation, Gate, GateId, GateKind, LogicKind};
pub use merge::merge_modules;
pub use module::{Module, Port};
pub use tree::TreeHandle;
