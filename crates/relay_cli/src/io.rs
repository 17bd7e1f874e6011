//! Netlist load/store and diagnostic printing shared by all commands.

use crate::GlobalArgs;
use relay_diagnostics::{render_text, DiagnosticSink, Severity};
use relay_netlist::Module;
use std::error::Error;

/// Reads a netlist JSON file and validates it.
pub fn load_module(path: &str) -> Result<Module, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read \"{path}\": {e}"))?;
    let module: Module =
        serde_json::from_str(&content).map_err(|e| format!("cannot parse \"{path}\": {e}"))?;
    module.check()?;
    Ok(module)
}

/// Writes a netlist as JSON with sorted keys.
pub fn store_module(path: &str, module: &Module, global: &GlobalArgs) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(module)?;
    std::fs::write(path, json).map_err(|e| format!("cannot write \"{path}\": {e}"))?;
    if global.verbose {
        println!("netlist written to \"{path}\"");
    }
    Ok(())
}

/// Prints collected diagnostics to stderr, honoring quiet/verbose flags.
///
/// Quiet keeps only errors; the default also shows warnings; verbose adds
/// notes.
pub fn print_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) {
    let floor = if global.quiet {
        Severity::Error
    } else if global.verbose {
        Severity::Note
    } else {
        Severity::Warning
    };
    for diag in sink.take_all() {
        if diag.severity >= floor {
            eprintln!("{}", render_text(&diag));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_netlist::{LogicKind, NetBuilder};

    fn global() -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            verbose: false,
        }
    }

    fn sample_module() -> Module {
        let mut builder = NetBuilder::new();
        builder.set_name("sample");
        let a = builder.add_logic(LogicKind::Or);
        let b = builder.add_logic(LogicKind::And);
        builder.connect(a, b);
        builder.register_input("a", vec![a], false);
        builder.register_output("b", vec![b], false);
        builder.into_module()
    }

    #[test]
    fn store_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        let path = path.to_str().unwrap();

        let module = sample_module();
        store_module(path, &module, &global()).unwrap();
        let loaded = load_module(path).unwrap();
        assert_eq!(loaded, module);
    }

    #[test]
    fn load_missing_file_fails() {
        let err = load_module("/nonexistent/net.json").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn load_malformed_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_module(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("cannot parse"));
    }

    #[test]
    fn load_rejects_invalid_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        // Gate 0 claims destination 1, but gate 1 does not list 0 as source.
        let json = r#"{
            "name": "broken",
            "gates": {
                "0": {"type": {"logic": {"type": "OR"}}, "srcs": [], "dsts": [1]},
                "1": {"type": {"logic": {"type": "OR"}}, "srcs": [], "dsts": []}
            },
            "inputs": {},
            "outputs": {}
        }"#;
        std::fs::write(&path, json).unwrap();
        let err = load_module(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("does not list"));
    }
}
