use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    curve::{self, CurveArgs},
    grid::{self, GridArgs},
    init::{self, InitArgs},
    trials::{self, TrialsArgs},
    validate::{self, ValidateArgs},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser, Debug)]
#[command(name = "nsim", about = "NSIM experiment record tooling", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a `log.txt` record and print its summary.
    Validate(ValidateArgs),
    /// Expand the estimator parameter grid of a record.
    Grid(GridArgs),
    /// Describe the trials of a record for one manifold.
    Trials(TrialsArgs),
    /// Write `log.txt` for every manifold of a sweep configuration.
    Init(InitArgs),
    /// Sample basepoints along a test curve.
    Curve(CurveArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nsim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate(args) => validate::run(&args),
        Command::Grid(args) => grid::run(&args),
        Command::Trials(args) => trials::run(&args),
        Command::Init(args) => init::run(&args),
        Command::Curve(args) => curve::run(&args),
    }
}
