use crate::core::config::UploadConfig;
use crate::i18n::Locale;
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use std::time::Duration;

/// Everything the `upload` subcommand needs beyond the file list.
#[derive(Debug, Clone, Default)]
pub struct UploadCliConfig {
    pub upload: UploadConfig,
    pub seed: Option<u64>,
    pub pause_at: Option<u32>,
    pub resume_after: Option<Duration>,
    pub restore_db: Option<PathBuf>,
    pub locale: Locale,
}

pub trait CliPlugin: Send + Sync {
    fn name(&self) -> &'static str;
    fn augment_upload_command(&self, cmd: Command) -> Command;
    fn apply_upload_matches(&self, matches: &ArgMatches, cfg: &mut UploadCliConfig) -> anyhow::Result<()>;
}

pub struct PluginRegistry {
    cli_plugins: Vec<Box<dyn CliPlugin>>,
}

impl PluginRegistry {
    pub fn with_defaults() -> Self {
        let mut reg = Self { cli_plugins: vec![] };

        // simulation goes first: it loads --config, which later flags may override
        reg.cli_plugins.push(Box::new(crate::plugins::simulation::cli::SimulationCliPlugin::new()));
        reg.cli_plugins.push(Box::new(crate::plugins::control::cli::ControlCliPlugin::new()));
        reg.cli_plugins.push(Box::new(crate::plugins::restore::cli::RestoreCliPlugin::new()));
        reg
    }

    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.cli_plugins.iter().map(|p| p.name()).collect()
    }

    pub fn augment_upload_command(&self, cmd: Command) -> Command {
        self.cli_plugins
            .iter()
            .fold(cmd, |c, p| p.augment_upload_command(c))
    }

    pub fn apply_upload_matches(&self, matches: &ArgMatches, cfg: &mut UploadCliConfig) -> anyhow::Result<()> {
        for p in &self.cli_plugins {
            p.apply_upload_matches(matches, cfg)?;
        }
        cfg.upload.validate()?;
        Ok(())
    }
}
