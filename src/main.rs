/*!
 * Partition Simulator - Main Entry Point
 *
 * Loads a workload, runs the selected placement strategies through the
 * scripted phases and prints the per-strategy reports and a summary.
 */

use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::info;

use partition_sim::core::limits::{DEFAULT_INPUT_FILE, DEFAULT_LARGE_PERCENT};
use partition_sim::simulation::compare_strategies;
use partition_sim::{
    init_tracing, load_from_path, report, AllocatorConfig, FitKind, SimulationPlan, Termination,
};

/// Contiguous partition allocation simulator
#[derive(Parser, Debug)]
#[command(
    name = "partition-sim",
    version,
    about = "Compare first-fit, best-fit and worst-fit partition allocation"
)]
struct Args {
    /// Workload file (first line capacity, then `id size [arrival] [duration]`)
    #[arg(default_value = DEFAULT_INPUT_FILE)]
    input: PathBuf,

    /// Processes to allocate in phase 1 (default: all)
    #[arg(short, long)]
    initial: Option<usize>,

    /// Processes to terminate in phase 2: none, all, or a list such as 1,3
    #[arg(short, long, default_value = "none")]
    terminate: Termination,

    /// Further processes to allocate in phase 3
    #[arg(short, long, default_value_t = 0)]
    additional: usize,

    /// Large allocation in phase 4, as a percentage of free memory (1-100)
    #[arg(short, long, default_value_t = DEFAULT_LARGE_PERCENT)]
    large_percent: f64,

    /// Strategy to run
    #[arg(short, long, value_enum, default_value = "all")]
    strategy: StrategyArg,

    /// Leftover size at or below which blocks are not split
    #[arg(long, env = "PARTSIM_SPLIT_THRESHOLD")]
    split_threshold: Option<usize>,

    /// Maximum number of blocks in the table
    #[arg(long, env = "PARTSIM_MAX_BLOCKS")]
    max_blocks: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    First,
    Best,
    Worst,
    All,
}

impl StrategyArg {
    fn kinds(self) -> Vec<FitKind> {
        match self {
            StrategyArg::First => vec![FitKind::First],
            StrategyArg::Best => vec![FitKind::Best],
            StrategyArg::Worst => vec![FitKind::Worst],
            StrategyArg::All => FitKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let workload = load_from_path(&args.input)?;
    let strategies = args.strategy.kinds();

    let mut config = AllocatorConfig::from_env(workload.capacity, strategies[0]);
    if let Some(threshold) = args.split_threshold {
        config = config.with_split_threshold(threshold);
    }
    if let Some(max_blocks) = args.max_blocks {
        config = config.with_max_blocks(max_blocks);
    }

    let plan = SimulationPlan {
        initial: args.initial.unwrap_or(workload.processes.len()),
        termination: args.terminate,
        additional: args.additional,
        large_percent: args.large_percent,
    };
    info!(?plan, "Running simulation");

    let comparison = compare_strategies(config, &strategies, &workload.processes, &plan)?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", report::to_json(&comparison)?);
        }
        OutputFormat::Text => {
            let source = args.input.display().to_string();
            println!("{}", report::render_workload(&workload, &source));
            for strategy_report in &comparison.reports {
                println!("{}", report::render_strategy(strategy_report));
            }
            println!("{}", report::render_summary(&comparison));
        }
    }

    std::io::Write::flush(&mut std::io::stdout()).into_diagnostic()?;
    Ok(())
}
