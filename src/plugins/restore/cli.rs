use crate::plugins::registry::{CliPlugin, UploadCliConfig};
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub struct RestoreCliPlugin;

impl RestoreCliPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl CliPlugin for RestoreCliPlugin {
    fn name(&self) -> &'static str {
        "restore"
    }

    fn augment_upload_command(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new("restore_db")
                .long("restore-db")
                .help_heading("State")
                .help("SQLite file holding previously uploaded images; restored as completed")
                .num_args(1),
        )
    }

    fn apply_upload_matches(&self, matches: &ArgMatches, cfg: &mut UploadCliConfig) -> anyhow::Result<()> {
        if let Some(p) = matches.get_one::<String>("restore_db") {
            cfg.restore_db = Some(PathBuf::from(p));
        }
        Ok(())
    }
}
