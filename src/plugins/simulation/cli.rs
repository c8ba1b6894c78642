use crate::core::config::UploadConfig;
use crate::plugins::registry::{CliPlugin, UploadCliConfig};
use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub struct SimulationCliPlugin;

impl SimulationCliPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl CliPlugin for SimulationCliPlugin {
    fn name(&self) -> &'static str {
        "simulation"
    }

    // No default_value on the knobs: unset flags must not shadow the config file.
    fn augment_upload_command(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new("sim_config")
                .long("config")
                .help_heading("Simulation")
                .help("TOML file with tick_ms / min_seconds / max_seconds")
                .num_args(1),
        )
        .arg(
            Arg::new("sim_tick_ms")
                .long("tick-ms")
                .help_heading("Simulation")
                .help("Scheduler tick period in milliseconds [default: 120]")
                .num_args(1),
        )
        .arg(
            Arg::new("sim_min_seconds")
                .long("min-seconds")
                .help_heading("Simulation")
                .help("Shortest simulated upload in seconds [default: 10]")
                .num_args(1),
        )
        .arg(
            Arg::new("sim_max_seconds")
                .long("max-seconds")
                .help_heading("Simulation")
                .help("Longest simulated upload in seconds [default: 15]")
                .num_args(1),
        )
        .arg(
            Arg::new("sim_seed")
                .long("seed")
                .help_heading("Simulation")
                .help("Seed for the duration draw, for reproducible runs")
                .num_args(1),
        )
    }

    fn apply_upload_matches(&self, matches: &ArgMatches, cfg: &mut UploadCliConfig) -> anyhow::Result<()> {
        if let Some(path) = matches.get_one::<String>("sim_config") {
            let path = PathBuf::from(path);
            cfg.upload = UploadConfig::load(&path).with_context(|| format!("load config {}", path.display()))?;
        }
        if let Some(s) = matches.get_one::<String>("sim_tick_ms") {
            cfg.upload.tick_ms = s.parse().with_context(|| format!("invalid --tick-ms: {}", s))?;
        }
        if let Some(s) = matches.get_one::<String>("sim_min_seconds") {
            cfg.upload.min_seconds = s.parse().with_context(|| format!("invalid --min-seconds: {}", s))?;
        }
        if let Some(s) = matches.get_one::<String>("sim_max_seconds") {
            cfg.upload.max_seconds = s.parse().with_context(|| format!("invalid --max-seconds: {}", s))?;
        }
        if let Some(s) = matches.get_one::<String>("sim_seed") {
            cfg.seed = Some(s.parse().with_context(|| format!("invalid --seed: {}", s))?);
        }
        Ok(())
    }
}
