use std::path::PathBuf;

use clap::Parser;
use log::info;

use dqbdd_rs::heuristic::UnivVarElimHeuristic;
use dqbdd_rs::solver::{DqbfSolver, SolverConfig};

#[derive(Debug, Parser)]
#[command(author, version, about = "DQBF solver based on BDD variable elimination")]
struct Cli {
    /// Input file in DQDIMACS format.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Heuristic for choosing the next universal variable to eliminate (`once` or `continuous`).
    #[arg(long, value_name = "NAME", default_value = "continuous")]
    heuristic: String,

    /// BDD size (in bits, so the actual size is `2^size` nodes).
    #[arg(long, value_name = "INT", default_value = "20")]
    size: usize,

    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: simplelog::LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    info!("args = {:?}", args);

    let heuristic: UnivVarElimHeuristic = args.heuristic.parse()?;
    let config = SolverConfig::default()
        .with_heuristic(heuristic)
        .with_storage_bits(args.size);

    let solver = DqbfSolver::new(config);
    let result = solver.solve_file(&args.input)?;

    println!("{}", result);
    std::process::exit(result.exit_code());
}
