//! Pong entry point
//!
//! Parses the command line, loads the config file and runs the game loop.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pong::config::{Backend, Config, Demo};
use pong::error::{PongError, Result};
use pong::sim::TimestepMode;

#[derive(Debug, Parser)]
#[command(name = "pong", version, about = "Two paddles, one ball, fixed timestep")]
struct Cli {
    /// JSON config file (defaults are used when it doesn't exist)
    #[arg(long, default_value = "pong.json")]
    config: PathBuf,

    /// Presentation backend: gpu or software
    #[arg(long)]
    backend: Option<String>,

    /// Timestep strategy: fixed, variable or vsync-locked
    #[arg(long)]
    timestep: Option<String>,

    /// Wait for vertical blank when presenting
    #[arg(long, conflicts_with = "no_vsync")]
    vsync: bool,

    /// Present as fast as possible
    #[arg(long)]
    no_vsync: bool,

    /// What to show: pong or checkerboard
    #[arg(long)]
    demo: Option<String>,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Score needed to win a match (0 = endless)
    #[arg(long)]
    winning_score: Option<u32>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(name) = &self.backend {
            config.backend = Backend::from_str(name)
                .ok_or_else(|| PongError::InvalidConfig(format!("unknown backend: {name}")))?;
        }
        if let Some(name) = &self.timestep {
            config.timestep.mode = TimestepMode::from_str(name)
                .ok_or_else(|| PongError::InvalidConfig(format!("unknown timestep: {name}")))?;
        }
        if let Some(name) = &self.demo {
            config.demo = Demo::from_str(name)
                .ok_or_else(|| PongError::InvalidConfig(format!("unknown demo: {name}")))?;
        }
        if self.vsync {
            config.window.vsync = true;
        }
        if self.no_vsync {
            config.window.vsync = false;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(score) = self.winning_score {
            config.rules.winning_score = score;
        }
        Ok(())
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::load(&cli.config)?;
    cli.apply(&mut config)?;
    config.validate()?;

    log::info!("Pong starting...");
    pong::app::run(config)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
