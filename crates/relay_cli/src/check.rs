//! The `relay check` subcommand.

use crate::{io, CheckArgs, GlobalArgs};
use std::error::Error;

/// Loads and validates a netlist, reporting basic statistics.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let module = io::load_module(&args.netlist)?;
    if !global.quiet {
        println!(
            "{}: ok ({} gates, {} connections)",
            module.name,
            module.gates.len(),
            module.connection_count()
        );
    }
    Ok(0)
}
