//! The `relay dot` subcommand.

use crate::{io, DotArgs, GlobalArgs};
use relay_netlist::to_dot;
use std::error::Error;

/// Loads a netlist and prints it as a graphviz digraph.
pub fn run(args: &DotArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let module = io::load_module(&args.netlist)?;
    println!("{}", to_dot(&module, args.ids));
    Ok(0)
}
