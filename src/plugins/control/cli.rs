use crate::plugins::registry::{CliPlugin, UploadCliConfig};
use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use std::time::Duration;

/// Scripted pause/resume, standing in for the pause and play buttons.
pub struct ControlCliPlugin;

impl ControlCliPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl CliPlugin for ControlCliPlugin {
    fn name(&self) -> &'static str {
        "control"
    }

    fn augment_upload_command(&self, cmd: Command) -> Command {
        cmd.arg(
            Arg::new("ctl_pause_at")
                .long("pause-at")
                .help_heading("Control")
                .help("Pause everything once overall progress reaches this percentage")
                .num_args(1),
        )
        .arg(
            Arg::new("ctl_resume_after_ms")
                .long("resume-after-ms")
                .help_heading("Control")
                .help("Resume this many milliseconds after --pause-at fired")
                .num_args(1),
        )
    }

    fn apply_upload_matches(&self, matches: &ArgMatches, cfg: &mut UploadCliConfig) -> anyhow::Result<()> {
        if let Some(s) = matches.get_one::<String>("ctl_pause_at") {
            let pct: u32 = s.parse().with_context(|| format!("invalid --pause-at: {}", s))?;
            if pct > 100 {
                anyhow::bail!("--pause-at must be within 0..=100, got {}", pct);
            }
            cfg.pause_at = Some(pct);
        }
        if let Some(s) = matches.get_one::<String>("ctl_resume_after_ms") {
            let ms: u64 = s.parse().with_context(|| format!("invalid --resume-after-ms: {}", s))?;
            cfg.resume_after = Some(Duration::from_millis(ms));
        }
        Ok(())
    }
}
