//! The `relay opt` subcommand: the optimize-and-balance flow.

use crate::{io, GlobalArgs, OptArgs};
use relay_config::{load_config, FlowConfig};
use relay_diagnostics::DiagnosticSink;
use relay_synth::{optimize, sync_clocks};
use std::error::Error;
use std::path::Path;

/// Loads a netlist, runs the configured flow, validates, and stores.
///
/// With optimization enabled (the default) the peephole pipeline runs to
/// fixpoint and re-balances clock domains itself; with `--no-opt` (or
/// `optimize = false` in the config) only clock synchronization runs.
pub fn run(args: &OptArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => load_config(Path::new(path))?,
        None => FlowConfig::default(),
    };

    let mut module = io::load_module(&args.input)?;
    let gates_before = module.gates.len();

    let sink = DiagnosticSink::new();
    if config.synth.optimize && !args.no_opt {
        optimize(&mut module, &sink);
    } else if config.synth.sync_clocks {
        sync_clocks(&mut module, &sink);
    }

    module.check()?;
    io::print_diagnostics(&sink, global);

    if !global.quiet {
        println!(
            "{}: {} -> {} gates",
            module.name,
            gates_before,
            module.gates.len()
        );
    }

    io::store_module(&args.output, &module, global)?;
    Ok(0)
}
