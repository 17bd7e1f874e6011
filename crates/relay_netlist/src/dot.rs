//! Graphviz export of a module for visual inspection.

use crate::module::Module;
use std::fmt::Write;

/// Renders the module as a graphviz digraph.
///
/// Sequential gates are colored, plain edges drawn solid, portal edges dashed
/// with their depth as the label, and port bits attached as filled marker
/// nodes. With `show_ids` each gate label carries its id.
pub fn to_dot(module: &Module, show_ids: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph \"{}\" {{", module.name);
    let _ = writeln!(out, "  label=\"{}\";", module.name);
    let _ = writeln!(out, "  rankdir=\"LR\";");
    let _ = writeln!(out, "  remincross=true;");

    for (id, gate) in &module.gates {
        let mut name = gate.kind.to_string();
        if show_ids {
            let _ = write!(name, "[{id}]");
        }
        let color = if module.is_sequential(*id) {
            "royalblue"
        } else {
            "black"
        };
        let _ = writeln!(
            out,
            "  n{id} [ shape=record, fontcolor={color}, label=\"{name}\" ];"
        );
    }

    for (dst_id, gate) in &module.gates {
        for src_id in &gate.srcs {
            let _ = writeln!(out, "  n{src_id} -> n{dst_id};");
        }
    }

    for (dst_id, gate) in &module.gates {
        for (src_id, depth) in &gate.portal_srcs {
            let _ = writeln!(
                out,
                "  n{src_id} -> n{dst_id} [ style=dashed, color=forestgreen, label=\"{depth}\" ];"
            );
        }
    }

    for (index, (port_name, port)) in module.inputs.iter().enumerate() {
        for (bit, gate_id) in port.gates.iter().enumerate() {
            let _ = writeln!(
                out,
                "  i{index}_{bit} [ style=filled, color=gray, label=\"{port_name}\\n{bit}/{}\" ];",
                port.gates.len()
            );
            let _ = writeln!(out, "  i{index}_{bit} -> n{gate_id} [ style=dashed ];");
        }
    }
    for (index, (port_name, port)) in module.outputs.iter().enumerate() {
        for (bit, gate_id) in port.gates.iter().enumerate() {
            let _ = writeln!(
                out,
                "  o{index}_{bit} [ style=filled, color=gray, label=\"{port_name}\\n{bit}/{}\" ];",
                port.gates.len()
            );
            let _ = writeln!(out, "  n{gate_id} -> o{index}_{bit} [ style=dashed ];");
        }
    }

    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NetBuilder;
    use crate::gate::LogicKind;

    fn sample_module() -> Module {
        let mut builder = NetBuilder::new();
        builder.set_name("sample");
        let a = builder.add_logic(LogicKind::And);
        let b = builder.add_logic_with_timing(LogicKind::Nor, true);
        let t = builder.add_timer(2);
        builder.connect(a, b);
        builder.connect(b, t);
        builder.register_input("x", vec![a], false);
        builder.register_output("y", vec![t], false);
        builder.into_module()
    }

    #[test]
    fn renders_header_and_gates() {
        let dot = to_dot(&sample_module(), false);
        assert!(dot.starts_with("digraph \"sample\" {"));
        assert!(dot.ends_with('}'));
        assert!(dot.contains("label=\"AND\""));
        assert!(dot.contains("label=\"TIMER(2)\""));
    }

    #[test]
    fn sequential_gates_are_colored() {
        let dot = to_dot(&sample_module(), false);
        assert!(dot.contains("fontcolor=royalblue, label=\"NOR\""));
        assert!(dot.contains("fontcolor=black, label=\"AND\""));
    }

    #[test]
    fn edges_and_ports_render() {
        let dot = to_dot(&sample_module(), false);
        assert!(dot.contains("n0 -> n1;"));
        assert!(dot.contains("i0_0 -> n0 [ style=dashed ];"));
        assert!(dot.contains("n2 -> o0_0 [ style=dashed ];"));
    }

    #[test]
    fn show_ids_appends_ids() {
        let dot = to_dot(&sample_module(), true);
        assert!(dot.contains("label=\"AND[0]\""));
    }

    #[test]
    fn portal_edges_are_dashed_with_depth() {
        let mut builder = NetBuilder::new();
        let a = builder.add_logic_with_timing(LogicKind::Or, true);
        let b = builder.add_logic_with_timing(LogicKind::Or, true);
        builder.portal(a, b, 5, false);
        let dot = to_dot(builder.module(), false);
        assert!(dot.contains("n0 -> n1 [ style=dashed, color=forestgreen, label=\"5\" ];"));
    }
}
