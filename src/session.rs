use crate::core::engine::UploadEngine;
use crate::core::events::UploadEvent;
use crate::core::model::{Placeholder, SlotsSnapshot, UploadStatus};
use crate::core::store::PlaceholderStore;
use crate::i18n::Messages;
use crate::indicator::{Mode, WhipIndicator};
use crate::ui::{SlotBars, TerminalSurface};
use rand::RngCore;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::debug;

pub const FRAME: Duration = Duration::from_millis(16);

/// Scripted stand-ins for the pause and play buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Script {
    pub pause_at: Option<u32>,
    pub resume_after: Option<Duration>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Engine ticks delivered while the driver was running.
    pub ticks: u64,
    pub paused_at: Option<u32>,
    pub resumed: bool,
    /// Indicator modes in the order they were entered.
    pub modes: Vec<Mode>,
}

/// Start the upload and run the host loop until nothing is ticking, animating or
/// waiting to resume.
pub async fn drive<R: RngCore>(
    engine: &mut UploadEngine<R>,
    indicator: &mut WhipIndicator<TerminalSurface>,
    bars: &SlotBars,
    msgs: &Messages,
    script: Script,
) -> RunReport {
    let mut rx = engine.subscribe();
    let mut report = RunReport { modes: vec![indicator.mode()], ..Default::default() };

    engine.start_upload();

    let mut ticks = interval(engine.config().tick());
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut frames = interval(FRAME);
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut pause_at = script.pause_at;
    let mut resume_at: Option<Instant> = None;

    loop {
        let resume_deadline = resume_at.unwrap_or_else(Instant::now);
        tokio::select! {
            _ = ticks.tick(), if engine.is_ticking() => {
                engine.tick();
                report.ticks += 1;
                let agg = engine.aggregate();
                if let Some(pct) = pause_at {
                    if agg.overall_progress >= pct && !agg.all_completed {
                        pause_at = None;
                        engine.pause_all();
                        indicator.pause();
                        report.paused_at = Some(agg.overall_progress);
                        resume_at = script.resume_after.map(|d| Instant::now() + d);
                        debug!(progress = agg.overall_progress, "scripted pause");
                    }
                }
            }
            _ = frames.tick(), if indicator.is_animating() => {
                indicator.advance(FRAME);
            }
            _ = sleep_until(resume_deadline), if resume_at.is_some() => {
                resume_at = None;
                if engine.resume_all() {
                    indicator.play();
                    report.resumed = true;
                }
            }
            else => break,
        }

        let agg = engine.aggregate();
        indicator.set_progress(agg.overall_progress as f64);
        if report.modes.last() != Some(&indicator.mode()) {
            report.modes.push(indicator.mode());
        }
        indicator.surface().bar().set_prefix(indicator.mode().as_str());
        bars.update(&engine.snapshot(), &agg, msgs);
        drain_events(&mut rx, bars, msgs);
    }

    report
}

/// Record a fully completed board so the next run restores it. Returns the rows written.
pub async fn save_completed(store: &PlaceholderStore, snapshot: &SlotsSnapshot) -> anyhow::Result<usize> {
    let filled: Vec<_> = snapshot.filled().collect();
    if filled.is_empty() || filled.iter().any(|v| v.status != UploadStatus::Completed) {
        return Ok(0);
    }
    for v in &filled {
        store
            .put_placeholder(&Placeholder { slot: v.slot, name: v.name.clone(), size: v.size })
            .await?;
    }
    Ok(filled.len())
}

pub fn drain_events(rx: &mut broadcast::Receiver<UploadEvent>, bars: &SlotBars, msgs: &Messages) {
    loop {
        match rx.try_recv() {
            Ok(UploadEvent::Warning { scope, message }) => {
                bars.println(format!("[{}] {}: {}", msgs.warn_prefix, scope, message));
            }
            Ok(UploadEvent::Info { scope, message }) => {
                bars.println(format!("[{}] {}: {}", msgs.info_prefix, scope, message));
            }
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}
