//! Relay CLI: the command-line interface for the Relay synthesis backend.
//!
//! Provides `relay check` for validating a netlist, `relay opt` for running
//! the optimization and clock-balancing flow, `relay analyze` for timing and
//! complexity reports, `relay merge` for combining modules, and `relay dot`
//! for graphviz export.

#![warn(missing_docs)]

mod analyze;
mod check;
mod dot;
mod io;
mod merge;
mod opt;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Relay, a synthesis backend for lockstep gate networks.
#[derive(Parser, Debug)]
#[command(name = "relay", version, about = "Relay synthesis toolchain")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print informational notes in addition to warnings.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a netlist against the structural invariants.
    Check(CheckArgs),
    /// Optimize a netlist and balance its clock domains.
    Opt(OptArgs),
    /// Report timing and complexity statistics.
    Analyze(AnalyzeArgs),
    /// Merge modules into one, remapping gate ids.
    Merge(MergeArgs),
    /// Export a netlist as a graphviz digraph.
    Dot(DotArgs),
}

/// Arguments for the `relay check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// The netlist JSON file to read.
    pub netlist: String,
}

/// Arguments for the `relay opt` subcommand.
#[derive(Parser, Debug)]
pub struct OptArgs {
    /// The netlist JSON file to read.
    pub input: String,

    /// The netlist JSON file to write.
    pub output: String,

    /// Skip peephole optimization; only balance clock domains.
    #[arg(long)]
    pub no_opt: bool,

    /// Path to a `relay.toml` flow configuration.
    #[arg(long)]
    pub config: Option<String>,
}

/// Arguments for the `relay analyze` subcommand.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// The netlist JSON file to read.
    pub netlist: String,

    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `relay merge` subcommand.
#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// The netlist JSON file to write.
    pub output: String,

    /// The main netlist absorbing the parts.
    pub main: String,

    /// Netlists to merge into the main module.
    #[arg(required = true)]
    pub parts: Vec<String>,
}

/// Arguments for the `relay dot` subcommand.
#[derive(Parser, Debug)]
pub struct DotArgs {
    /// The netlist JSON file to read.
    pub netlist: String,

    /// Include gate ids in node labels.
    #[arg(long)]
    pub ids: bool,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print informational notes.
    pub verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Command::Check(ref args) => check::run(args, &global),
        Command::Opt(ref args) => opt::run(args, &global),
        Command::Analyze(ref args) => analyze::run(args, &global),
        Command::Merge(ref args) => merge::run(args, &global),
        Command::Dot(ref args) => dot::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
