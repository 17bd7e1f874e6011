//! Flow configuration for the Relay toolchain.
//!
//! A `relay.toml` file describes how a netlist should be processed: whether
//! the peephole optimizer runs and whether clock domains are re-balanced.
//! The CLI loads one with [`load_config`] (or falls back to
//! [`FlowConfig::default`]) and threads it through the flow.

#![warn(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{FlowConfig, ProjectSection, SynthSection};
