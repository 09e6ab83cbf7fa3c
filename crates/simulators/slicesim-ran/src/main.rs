use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use thiserror::Error;

use slicesim_output::error::OutputError;

use slicesim_ran::simulation::builder::{BuildError, SimulationBuilder};
use slicesim_ran::simulation::runner::{run_headless, run_with_ui};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["config", "demo"])))]
struct CliArgs {
    /// TOML scenario file.
    #[arg(short = 'c', long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,
    /// Run the built-in four station scenario.
    #[arg(short = 'd', long)]
    demo: bool,
    /// Log tick summaries instead of drawing the terminal UI.
    #[arg(long)]
    headless: bool,
    /// Overrides the duration of the scenario.
    #[arg(short = 's', long, value_name = "TICKS")]
    steps: Option<u64>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Run(#[from] OutputError),
}

fn run(args: CliArgs) -> Result<(), CliError> {
    let mut builder = match &args.config {
        Some(config_file) => SimulationBuilder::new(config_file)?,
        None => SimulationBuilder::demo(),
    };
    builder.initiate_logger()?;
    let steps = args.steps.unwrap_or(builder.duration().as_u64());
    let simulator = builder.build()?;

    if args.headless {
        for report in run_headless(simulator, steps) {
            println!(
                "Tick {}: {}/{} connected ({:.1}%)",
                report.tick,
                report.connected,
                report.total,
                report.connection_ratio() * 100.0
            );
        }
    } else {
        run_with_ui(simulator, steps, builder.metadata(), builder.renderer())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let start = std::time::Instant::now();
    match run(args) {
        Ok(()) => {
            println!("Simulation finished in {} ms.", start.elapsed().as_millis());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("slicesim: {}", e);
            ExitCode::FAILURE
        }
    }
}
