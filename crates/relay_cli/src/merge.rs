//! The `relay merge` subcommand.

use crate::{io, GlobalArgs, MergeArgs};
use relay_netlist::merge_modules;
use std::error::Error;

/// Merges part netlists into a main module and stores the result.
pub fn run(args: &MergeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let mut main = io::load_module(&args.main)?;
    let mut parts = Vec::with_capacity(args.parts.len());
    for path in &args.parts {
        parts.push(io::load_module(path)?);
    }

    merge_modules(&mut main, &parts);
    main.check()?;

    if !global.quiet {
        println!(
            "{}: absorbed {} modules ({} gates total)",
            main.name,
            parts.len(),
            main.gates.len()
        );
    }

    io::store_module(&args.output, &main, global)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_netlist::{LogicKind, NetBuilder};

    fn write_net(path: &std::path::Path, name: &str) {
        let mut builder = NetBuilder::new();
        builder.set_name(name);
        let a = builder.add_logic(LogicKind::Or);
        let b = builder.add_logic(LogicKind::And);
        builder.connect(a, b);
        builder.register_input("in", vec![a], false);
        builder.register_output("out", vec![b], false);
        let json = serde_json::to_string(builder.module()).unwrap();
        std::fs::write(path, json).unwrap();
    }

    #[test]
    fn merge_flow() {
        let dir = tempfile::tempdir().unwrap();
        let main_path = dir.path().join("main.json");
        let part_path = dir.path().join("part.json");
        let out_path = dir.path().join("out.json");
        write_net(&main_path, "main");
        write_net(&part_path, "part");

        let args = MergeArgs {
            output: out_path.to_str().unwrap().to_string(),
            main: main_path.to_str().unwrap().to_string(),
            parts: vec![part_path.to_str().unwrap().to_string()],
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);

        let merged = io::load_module(out_path.to_str().unwrap()).unwrap();
        assert_eq!(merged.gates.len(), 4);
        assert!(merged.inputs.contains_key("in"));
        assert!(merged.inputs.contains_key("part.in"));
    }
}
