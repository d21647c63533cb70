use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formica::{Config, driver::Driver};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file (defaults apply if omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed overriding the one in the configuration.
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Run {
        #[arg(long, default_value_t = 1000)]
        ticks: u64,

        #[arg(long)]
        report: Option<PathBuf>,
    },

    Check,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mut cfg = match &args.config {
        Some(file) => Config::from_file(file).context("failed to construct cfg")?,
        None => Config::default(),
    };
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    cfg.validate().context("failed to validate cfg")?;
    log::info!("{cfg:#?}");

    match args.command {
        Command::Run { ticks, report } => {
            let mut driver = Driver::new(cfg).context("failed to construct driver")?;
            driver.run(ticks)?;
            if let Some(report) = report {
                driver.save_results(report)?;
            }
        }
        Command::Check => log::info!("config is valid"),
    }

    Ok(())
}
