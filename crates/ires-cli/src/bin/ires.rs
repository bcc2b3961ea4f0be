//! ires - command-line interface for the Infra Resilience Explorer
//!
//! Usage:
//!   ires fit --graph <FILE>                          # Fit a mixture, write mixture.json + report.json
//!   ires fit --graph <FILE> --iters 200 --seed 7     # Custom learner parameters
//!   ires report --graph <FILE> --mixture <FILE>      # Recompute report.json from a stored mixture
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use ires_core::engine::learner::{DEFAULT_BOOST, DEFAULT_CANDIDATES, DEFAULT_ITERS};
use ires_core::report::NODE_DISPLAY_LIMIT;
use ires_core::storage::{self, MixtureFile, MIXTURE_FILE, REPORT_FILE};
use ires_core::{assemble_report, fit_with_config, load_graph, FitConfig, Report, ReportOptions};
use tracing_subscriber::EnvFilter;

/// Number of rows shown per ranking in the terminal summary.
const SUMMARY_ROWS: usize = 5;

#[derive(Parser)]
#[command(name = "ires")]
#[command(version)]
#[command(about = "Infra Resilience Explorer - critical edges and bottleneck cuts from tree mixtures")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit a tree mixture and write mixture.json and report.json
    Fit(FitArgs),
    /// Recompute report.json from a stored mixture
    Report(ReportArgs),
}

#[derive(Args)]
struct FitArgs {
    /// Undirected weighted edge list (`u v capacity` per line)
    #[arg(long, value_name = "FILE")]
    graph: PathBuf,

    /// Number of learner rounds
    #[arg(long, default_value_t = DEFAULT_ITERS)]
    iters: usize,

    /// Candidate trees sampled per round
    #[arg(long, default_value_t = DEFAULT_CANDIDATES)]
    candidates: usize,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Weight multiplier applied to each round's winning edges
    #[arg(long, default_value_t = DEFAULT_BOOST)]
    boost: f64,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct ReportArgs {
    /// Edge list the mixture was fitted on
    #[arg(long, value_name = "FILE")]
    graph: PathBuf,

    /// Stored mixture.json
    #[arg(long, value_name = "FILE")]
    mixture: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct OutputArgs {
    /// Output directory
    #[arg(long, default_value = "outputs", value_name = "DIR")]
    out: PathBuf,

    /// Keep only the N highest-congestion edges in the report
    #[arg(long, value_name = "N")]
    top_edges: Option<usize>,

    /// Keep only the N sparsest cuts in the report
    #[arg(long, value_name = "N")]
    top_cuts: Option<usize>,
}

impl OutputArgs {
    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top_edges: self.top_edges,
            top_cuts: self.top_cuts,
            node_display_limit: NODE_DISPLAY_LIMIT,
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Fit(args) => run_fit(args),
        Command::Report(args) => run_report(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_fit(args: &FitArgs) -> ires_core::Result<()> {
    let graph = load_graph(&args.graph)?;
    let config = FitConfig {
        iters: args.iters,
        candidates: args.candidates,
        seed: args.seed,
        boost: args.boost,
    };
    let mixture = fit_with_config(&graph, &config)?;

    let file = MixtureFile::new(&graph, &mixture, config, Some(display_path(&args.graph)));
    let mixture_path = args.output.out.join(MIXTURE_FILE);
    storage::write_json(&mixture_path, &file)?;

    // Report from the persisted form so `fit` and `report` agree byte for byte.
    let stored = file.to_mixture(&graph)?;
    let report = assemble_report(
        &graph,
        &stored,
        Some(file.parameters),
        &args.output.report_options(),
    );
    let report_path = args.output.out.join(REPORT_FILE);
    storage::write_json(&report_path, &report)?;

    print_summary(&report);
    println!(
        "\n✓ Wrote {} and {}",
        mixture_path.display(),
        report_path.display()
    );
    Ok(())
}

fn run_report(args: &ReportArgs) -> ires_core::Result<()> {
    let graph = load_graph(&args.graph)?;
    let file = storage::read_mixture(&args.mixture)?;
    let mixture = file.to_mixture(&graph)?;
    tracing::info!(
        path = %args.mixture.display(),
        trees = mixture.len(),
        "loaded stored mixture"
    );

    let report = assemble_report(
        &graph,
        &mixture,
        Some(file.parameters),
        &args.output.report_options(),
    );
    let report_path = args.output.out.join(REPORT_FILE);
    storage::write_json(&report_path, &report)?;

    print_summary(&report);
    println!("\n✓ Wrote {}", report_path.display());
    Ok(())
}

fn print_summary(report: &Report) {
    println!(
        "Graph: {} nodes, {} edges",
        report.graph.nodes, report.graph.edges
    );
    if let Some(params) = &report.parameters {
        println!(
            "Parameters: iters={} candidates={} seed={} boost={}",
            params.iters, params.candidates, params.seed, params.boost
        );
    }
    println!(
        "Mixture: {} distinct trees over {} rounds",
        report.mixture.unique_trees, report.mixture.total_rounds
    );

    if !report.critical_edges.is_empty() {
        println!("\nCritical edges (top {}):", SUMMARY_ROWS);
        for entry in report.critical_edges.iter().take(SUMMARY_ROWS) {
            println!(
                "  {} - {}  capacity={:.3}  expected_congestion={:.6}  load={:.3}",
                entry.source,
                entry.target,
                entry.capacity,
                entry.expected_congestion,
                entry.expected_load
            );
        }
    }

    if !report.bottleneck_cuts.is_empty() {
        println!("\nBottleneck cuts (top {}):", SUMMARY_ROWS);
        for cut in report.bottleneck_cuts.iter().take(SUMMARY_ROWS) {
            let more = if cut.truncated { ", ..." } else { "" };
            println!(
                "  sparsity={:.4}  crossing={}  p={:.3}  [{}{}] | {} nodes",
                cut.sparsity,
                cut.crossing_edges,
                cut.probability,
                cut.nodes.join(", "),
                more,
                cut.other_side_size
            );
        }
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
