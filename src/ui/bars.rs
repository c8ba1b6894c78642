use crate::core::model::{SlotKey, SlotView, SlotsSnapshot, UploadStatus};
use crate::core::projector::{Aggregate, Headline};
use crate::i18n::Messages;
use crate::ui::fmt_bytes;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Headline line plus one bar per slot, all on a shared `MultiProgress`.
pub struct SlotBars {
    mp: MultiProgress,
    header: ProgressBar,
    slots: Vec<ProgressBar>,
}

impl SlotBars {
    pub fn new(quiet: bool) -> Self {
        let mp = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };

        let sty_header = ProgressStyle::with_template("{prefix:>9} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let sty_bar = ProgressStyle::with_template("{prefix:>9} {bar:30.magenta/white} {pos:>3}% {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        let header = mp.add(ProgressBar::new(100));
        header.set_style(sty_header);

        let slots = SlotKey::ALL
            .iter()
            .map(|slot| {
                let pb = mp.add(ProgressBar::new(100));
                pb.set_style(sty_bar.clone());
                pb.set_prefix(format!("[{}]", slot));
                pb
            })
            .collect();

        Self { mp, header, slots }
    }

    /// Extra bar below the slots, e.g. for the indicator line.
    pub fn add_line(&self) -> ProgressBar {
        self.mp.add(ProgressBar::new(0))
    }

    pub fn println(&self, line: impl AsRef<str>) {
        let _ = self.mp.println(line);
    }

    pub fn update(&self, snapshot: &SlotsSnapshot, agg: &Aggregate, msgs: &Messages) {
        self.header.set_position(agg.overall_progress as u64);
        self.header.set_message(headline_text(agg, msgs));

        for (slot, pb) in SlotKey::ALL.iter().zip(&self.slots) {
            let view = snapshot.get(*slot);
            pb.set_position(view.map(|v| v.progress.floor() as u64).unwrap_or(0));
            pb.set_message(slot_text(view, msgs));
        }
    }

    /// Leaves the last frame on screen.
    pub fn finish(&self) {
        self.header.abandon();
        for pb in &self.slots {
            pb.abandon();
        }
    }
}

pub fn headline_text(agg: &Aggregate, msgs: &Messages) -> String {
    match agg.headline {
        Headline::Idle if agg.complete_badge => format!("{} | {}", msgs.title_idle, msgs.all_uploaded),
        Headline::Idle => msgs.title_idle.to_string(),
        Headline::Uploading { active } => format!(
            "{} {} {} | {}% | {} {}",
            msgs.title_uploading, active, msgs.files_label, agg.overall_progress, agg.total_time_left, msgs.seconds_left
        ),
        Headline::Paused { remaining } => format!(
            "{} | {} {} | {}%",
            msgs.title_paused, remaining, msgs.remaining_label, agg.overall_progress
        ),
    }
}

pub fn slot_text(view: Option<&SlotView>, msgs: &Messages) -> String {
    let Some(v) = view else {
        return format!("({})", msgs.slot_empty);
    };
    match v.status {
        UploadStatus::Uploading => format!(
            "{} {} | {} {} | {}",
            v.status.as_str(),
            fmt_bytes(v.size),
            v.time_left,
            msgs.seconds_left,
            v.name
        ),
        _ => format!("{} {} | {}", v.status.as_str(), fmt_bytes(v.size), v.name),
    }
}
