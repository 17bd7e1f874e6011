//! The `relay analyze` subcommand: timing and complexity reports.

use crate::{io, AnalyzeArgs, GlobalArgs, ReportFormat};
use relay_timing::{analyze_complexity, analyze_timing, SynthesisReport, TimingType};
use std::error::Error;

/// Loads a netlist and prints its synthesis report.
pub fn run(args: &AnalyzeArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let module = io::load_module(&args.netlist)?;

    let report = SynthesisReport {
        complexity: analyze_complexity(&module),
        timing: analyze_timing(&module)?,
    };

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print_text_report(&module.name, &report),
    }
    Ok(0)
}

fn print_text_report(name: &str, report: &SynthesisReport) {
    let c = &report.complexity;
    println!(
        "module {name}: {} gates ({} in, {} out, {} internal; {} sequential), {} connections",
        c.gate_count,
        c.input_gate_count,
        c.output_gate_count,
        c.internal_gate_count,
        c.sequential_gate_count,
        c.connection_count
    );

    let t = &report.timing;
    let kind = match t.timing_type {
        Some(TimingType::Sequential) => "sequential",
        _ => "combinational",
    };
    println!(
        "timing: {kind}, critical depth {}",
        t.critical_depth.unwrap_or(0)
    );
    for (port, depth) in &t.input_timing {
        println!("  input {port}: {depth}");
    }
    for (port, depth) in &t.output_timing {
        println!("  output {port}: {depth}");
    }
}
