//! pinkshirt — interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use pinkshirt::app::run;
use pinkshirt::config::{AppConfig, SourceKind};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Source {
    Sim,
    Stdin,
}

impl From<Source> for SourceKind {
    fn from(s: Source) -> Self {
        match s {
            Source::Sim   => SourceKind::Sim,
            Source::Stdin => SourceKind::Stdin,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pinkshirt", version, about = "Sloppy stick-figure dance mirror")]
struct Cli {
    /// TOML config file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where poses come from.
    #[arg(long, value_enum)]
    source: Option<Source>,

    /// Fixed seed for jitter and the simulated dancers.
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the video overlay on.
    #[arg(long)]
    show_video: bool,

    /// No MIDI output; the track still runs and drives the background.
    #[arg(long)]
    silent: bool,

    /// Skip the config file and start on built-in defaults.
    #[arg(long)]
    quick: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = try_main(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn try_main(cli: Cli) -> anyhow::Result<()> {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║         Pink Shirt Day — Sloppy Skeleton Dance Mirror        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut cfg = match &cli.config {
        Some(path) if !cli.quick => AppConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        _ => {
            println!("  Quick-start: built-in defaults, simulated dancers, looping groove\n");
            AppConfig::default()
        }
    };

    if let Some(source) = cli.source { cfg.source = source.into(); }
    if cli.seed.is_some()            { cfg.seed = cli.seed; }
    if cli.show_video                { cfg.show_video = true; }
    if cli.silent                    { cfg.track.silent = true; }

    cfg.validate().context("invalid configuration")?;

    match cfg.source {
        SourceKind::Sim   => println!("  Mode: simulated dancers  (Space / 2 / L to steer, V video, Q quit)"),
        SourceKind::Stdin => println!("  Mode: JSON poses on stdin"),
    }
    println!();

    run(cfg).context("application failed")
}
