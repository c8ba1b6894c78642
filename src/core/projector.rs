use crate::core::model::{SlotView, SlotsSnapshot, UploadStatus, UploadingFile};

/// The per-slot fields the projection looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotSample {
    pub progress: f64,
    pub status: UploadStatus,
    pub time_left: u64,
}

impl From<&UploadingFile> for SlotSample {
    fn from(f: &UploadingFile) -> Self {
        Self { progress: f.progress, status: f.status, time_left: f.time_left }
    }
}

impl From<&SlotView> for SlotSample {
    fn from(v: &SlotView) -> Self {
        Self { progress: v.progress, status: v.status, time_left: v.time_left }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Headline {
    Idle,
    Uploading { active: usize },
    Paused { remaining: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub overall_progress: u32,
    pub all_slots_have_files: bool,
    pub all_completed: bool,
    pub any_uploading: bool,
    pub show_start_button: bool,
    pub total_time_left: u64,
    pub headline: Headline,
    /// Shown next to the title once every filled slot has finished.
    pub complete_badge: bool,
}

pub fn project(slots: &[Option<SlotSample>; 3]) -> Aggregate {
    let filled: Vec<SlotSample> = slots.iter().flatten().copied().collect();

    let overall_progress = if filled.is_empty() {
        0
    } else {
        let sum: f64 = filled.iter().map(|s| s.progress).sum();
        (sum / filled.len() as f64).round().clamp(0.0, 100.0) as u32
    };

    let all_slots_have_files = filled.len() == slots.len();
    let all_completed = !filled.is_empty() && filled.iter().all(|s| s.status == UploadStatus::Completed);
    let active = filled.iter().filter(|s| s.status == UploadStatus::Uploading).count();
    let paused = filled.iter().filter(|s| s.status == UploadStatus::Paused).count();
    let any_uploading = active + paused > 0;
    let remaining = filled.iter().filter(|s| s.status != UploadStatus::Completed).count();
    let total_time_left = filled
        .iter()
        .filter(|s| s.status != UploadStatus::Completed)
        .map(|s| s.time_left)
        .sum();

    let headline = if paused > 0 {
        Headline::Paused { remaining }
    } else if active > 0 {
        Headline::Uploading { active }
    } else {
        Headline::Idle
    };

    Aggregate {
        overall_progress,
        all_slots_have_files,
        all_completed,
        any_uploading,
        show_start_button: all_slots_have_files && !all_completed && !any_uploading,
        total_time_left,
        headline,
        complete_badge: all_completed,
    }
}

pub fn project_snapshot(snapshot: &SlotsSnapshot) -> Aggregate {
    let [a, b, c] = &snapshot.slots;
    project(&[a.as_ref().map(SlotSample::from), b.as_ref().map(SlotSample::from), c.as_ref().map(SlotSample::from)])
}
