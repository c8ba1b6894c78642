use anyhow::Context;
use bytes::Bytes;
use clap::{Arg, ArgAction, Command};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vessel_uploader::core::engine::UploadEngine;
use vessel_uploader::core::model::{guess_mime, FileDescriptor, SlotKey, SlotsSnapshot, MAX_FILE_SIZE};
use vessel_uploader::core::store::PlaceholderStore;
use vessel_uploader::i18n::{get_messages, Locale, Messages};
use vessel_uploader::indicator::{IndicatorConfig, WhipIndicator};
use vessel_uploader::plugins::registry::{PluginRegistry, UploadCliConfig};
use vessel_uploader::session::{drain_events, drive, save_completed, Script};
use vessel_uploader::ui::{fmt_bytes, SlotBars, TerminalSurface};

const INDICATOR_COLUMNS: usize = 48;

fn build_cli(registry: &PluginRegistry) -> Command {
    let upload = Command::new("upload")
        .about("Simulate uploading up to three images")
        .arg(
            Arg::new("files")
                .help("Image files, assigned to the free slots in order")
                .action(ArgAction::Append)
                .num_args(1..=3),
        );

    let upload = registry.augment_upload_command(upload);

    Command::new("vessel-uploader")
        .about("Three-slot image upload simulator")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("locale")
                .long("locale")
                .help("Output language (en, zh)")
                .global(true)
                .default_value("en")
                .num_args(1),
        )
        .subcommand(upload)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let registry = PluginRegistry::with_defaults();
    let app = build_cli(&registry);
    let matches = app.get_matches();

    match matches.subcommand() {
        Some(("upload", m)) => {
            let mut cfg = UploadCliConfig {
                locale: m.get_one::<String>("locale").map(|s| Locale::parse(s)).unwrap_or_default(),
                ..Default::default()
            };
            registry.apply_upload_matches(m, &mut cfg)?;

            let files: Vec<PathBuf> = m
                .get_many::<String>("files")
                .map(|v| v.map(PathBuf::from).collect())
                .unwrap_or_default();

            run_upload(cfg, files).await?;
        }
        _ => {}
    }

    Ok(())
}

async fn run_upload(cfg: UploadCliConfig, files: Vec<PathBuf>) -> anyhow::Result<()> {
    let msgs = get_messages(cfg.locale);
    let mut engine = match cfg.seed {
        Some(seed) => UploadEngine::with_seed(cfg.upload.clone(), seed)?,
        None => UploadEngine::new(cfg.upload.clone())?,
    };
    let mut rx = engine.subscribe();
    let bars = SlotBars::new(false);

    let store = match &cfg.restore_db {
        Some(path) => Some(PlaceholderStore::open(path).await?),
        None => None,
    };
    if let Some(store) = &store {
        let placeholders = store.load_placeholders().await?;
        engine.import_completed(&placeholders);
    }

    let snapshot = engine.snapshot();
    let free: Vec<SlotKey> = SlotKey::ALL.iter().copied().filter(|s| snapshot.get(*s).is_none()).collect();
    if files.len() > free.len() {
        bars.println(format!(
            "[{}] {} file(s) ignored, no free slot",
            msgs.warn_prefix,
            files.len() - free.len()
        ));
    }
    for (slot, path) in free.into_iter().zip(&files) {
        let file = read_descriptor(path).await?;
        if let Err(e) = engine.assign(slot, file) {
            bars.println(format!("[{}] {}: {}", msgs.invalid_prefix, slot, e));
        }
    }

    let ind_cfg = IndicatorConfig::default();
    let surface = TerminalSurface::new(bars.add_line(), INDICATOR_COLUMNS, ind_cfg.height);
    let mut indicator = WhipIndicator::new(ind_cfg, surface);

    let agg = engine.aggregate();
    bars.update(&engine.snapshot(), &agg, msgs);
    drain_events(&mut rx, &bars, msgs);

    if !agg.show_start_button {
        let reason = if agg.all_completed { msgs.nothing_to_start } else { msgs.need_three };
        bars.println(format!("[{}] {}", msgs.info_prefix, reason));
        bars.finish();
        print_summary(&engine.snapshot(), msgs);
        return Ok(());
    }

    let script = Script { pause_at: cfg.pause_at, resume_after: cfg.resume_after };
    let report = drive(&mut engine, &mut indicator, &bars, msgs, script).await;
    debug!(ticks = report.ticks, resumed = report.resumed, "run finished");

    let snapshot = engine.snapshot();
    if let Some(store) = &store {
        save_completed(store, &snapshot).await?;
    }

    bars.finish();
    indicator.surface().bar().abandon();
    print_summary(&snapshot, msgs);
    Ok(())
}

async fn read_descriptor(path: &Path) -> anyhow::Result<FileDescriptor> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let mime = guess_mime(&name).unwrap_or("application/octet-stream");

    let meta = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("stat {}", path.display()))?;
    if meta.len() > MAX_FILE_SIZE {
        // rejected by assign anyway; don't pull the payload into memory
        return Ok(FileDescriptor::placeholder(name, mime, meta.len()));
    }

    let payload = tokio::fs::read(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    Ok(FileDescriptor::new(name, mime, Bytes::from(payload)))
}

fn print_summary(snapshot: &SlotsSnapshot, msgs: &Messages) {
    println!();
    println!("{}:", msgs.summary_header);
    for slot in SlotKey::ALL {
        match snapshot.get(slot) {
            Some(v) => println!(
                "- slot={} status={} progress={:.0}% size={} name={} preview={}",
                slot,
                v.status.as_str(),
                v.progress,
                fmt_bytes(v.size),
                v.name,
                v.preview.as_str(),
            ),
            None => println!("- slot={} ({})", slot, msgs.slot_empty),
        }
    }
}
