use crate::core::errors::TickFault;
use crate::core::model::{SlotKey, TaskMeta, UploadStatus, UploadingFile};
use crate::core::planner::steps_for;
use std::time::Duration;

const COMPLETION_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Created,
    Running,
    Stopped,
}

/// The single periodic driver shared by all slots.
///
/// It does not own a timer; the host loop asks `is_running` before delivering a
/// tick. `start` and `stop` are idempotent and report whether the state changed.
#[derive(Debug, Clone)]
pub struct TickDriver {
    state: DriverState,
    interval: Duration,
    ticks: u64,
}

impl TickDriver {
    pub fn new(interval: Duration) -> Self {
        Self { state: DriverState::Created, interval, ticks: 0 }
    }

    pub fn start(&mut self) -> bool {
        if self.state == DriverState::Running {
            return false;
        }
        self.state = DriverState::Running;
        true
    }

    pub fn stop(&mut self) -> bool {
        if self.state != DriverState::Running {
            return false;
        }
        self.state = DriverState::Stopped;
        true
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks delivered while running, over the driver's whole life.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotAdvance {
    pub progress: f64,
    pub time_left: u64,
    pub status: UploadStatus,
}

impl SlotAdvance {
    pub fn apply(self, file: &mut UploadingFile) {
        file.progress = self.progress;
        file.time_left = self.time_left;
        file.status = self.status;
    }
}

/// One tick's worth of progress for a slot, or `None` when the slot is not eligible.
pub fn advance(slot: SlotKey, file: &UploadingFile, meta: &TaskMeta, tick: Duration) -> Result<Option<SlotAdvance>, TickFault> {
    if meta.paused || file.status != UploadStatus::Uploading {
        return Ok(None);
    }
    if !file.progress.is_finite() {
        return Err(TickFault::CorruptProgress { slot, progress: file.progress });
    }
    if file.progress >= 100.0 {
        return Ok(None);
    }
    let Some(duration) = meta.duration else {
        return Err(TickFault::MissingDuration { slot });
    };

    let steps = steps_for(duration, tick);
    let increment = 100.0 / steps as f64;
    let mut progress = (file.progress + increment).min(100.0);
    if progress >= 100.0 - COMPLETION_EPSILON {
        progress = 100.0;
    }

    if progress >= 100.0 {
        return Ok(Some(SlotAdvance { progress, time_left: 0, status: UploadStatus::Completed }));
    }

    let duration_ms = duration.as_secs_f64() * 1000.0;
    let remaining_ms = duration_ms * (1.0 - progress / 100.0);
    let time_left = (remaining_ms / 1000.0).ceil().max(0.0) as u64;
    Ok(Some(SlotAdvance { progress, time_left, status: UploadStatus::Uploading }))
}
