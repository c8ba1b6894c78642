use crate::core::config::{ConfigError, UploadConfig};
use crate::core::errors::{AssignError, PreviewError, TickFault};
use crate::core::events::UploadEvent;
use crate::core::model::*;
use crate::core::planner::draw_duration;
use crate::core::preview::{BlobPreviews, PreviewBackend};
use crate::core::projector::{project, Aggregate, SlotSample};
use crate::core::scheduler::{advance, TickDriver};
use crate::core::slots::SlotStore;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Three-slot upload simulator.
///
/// All mutation goes through `&mut self`; the host loop owns the engine and calls
/// [`UploadEngine::tick`] every `tick_ms` while [`UploadEngine::is_ticking`] holds.
pub struct UploadEngine<R: RngCore = StdRng> {
    cfg: UploadConfig,
    slots: SlotStore,
    meta: [TaskMeta; 3],
    driver: TickDriver,
    rng: R,
    is_uploading: bool,
    is_paused: bool,
    event_tx: broadcast::Sender<UploadEvent>,
}

impl UploadEngine<StdRng> {
    pub fn new(cfg: UploadConfig) -> Result<Self, ConfigError> {
        Self::with_parts(cfg, Box::new(BlobPreviews::new()), StdRng::from_entropy())
    }

    pub fn with_seed(cfg: UploadConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_parts(cfg, Box::new(BlobPreviews::new()), StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> UploadEngine<R> {
    pub fn with_parts(cfg: UploadConfig, previews: Box<dyn PreviewBackend>, rng: R) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let (event_tx, _) = broadcast::channel(256);
        Ok(Self {
            driver: TickDriver::new(cfg.tick()),
            cfg,
            slots: SlotStore::new(previews),
            meta: [TaskMeta::default(); 3],
            rng,
            is_uploading: false,
            is_paused: false,
            event_tx,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.event_tx.subscribe()
    }

    pub fn config(&self) -> &UploadConfig {
        &self.cfg
    }

    pub fn assign(&mut self, slot: SlotKey, file: FileDescriptor) -> Result<(), AssignError> {
        let (name, size) = (file.name.clone(), file.size);
        let warning = self.slots.assign(slot, file)?;
        if let Some(w) = warning {
            self.report_release(w);
        }
        self.meta[slot.index()] = TaskMeta::default();
        let _ = self.event_tx.send(UploadEvent::SlotAssigned { slot, name, size });
        let _ = self.event_tx.send(UploadEvent::StatusChanged { slot, status: UploadStatus::Pending });
        self.settle_driver();
        Ok(())
    }

    pub fn clear(&mut self, slot: SlotKey) {
        let had_file = self.slots.get(slot).is_some();
        if let Some(w) = self.slots.clear(slot) {
            self.report_release(w);
        }
        self.meta[slot.index()] = TaskMeta::default();
        if had_file {
            let _ = self.event_tx.send(UploadEvent::SlotCleared { slot });
        }
        self.settle_driver();
    }

    pub fn clear_all(&mut self) {
        self.stop_driver();
        self.is_uploading = false;
        self.is_paused = false;

        let filled: Vec<SlotKey> = self.slots.iter().filter(|(_, f)| f.is_some()).map(|(s, _)| s).collect();
        for w in self.slots.clear_all() {
            self.report_release(w);
        }
        self.meta = [TaskMeta::default(); 3];
        for slot in filled {
            let _ = self.event_tx.send(UploadEvent::SlotCleared { slot });
        }
    }

    /// Stop the driver and rewind every filled slot to `pending`, keeping its file.
    pub fn reset_upload(&mut self) {
        self.stop_driver();
        self.is_uploading = false;
        self.is_paused = false;
        self.meta = [TaskMeta::default(); 3];

        for slot in SlotKey::ALL {
            if let Some(f) = self.slots.get_mut(slot) {
                f.progress = 0.0;
                f.time_left = 0;
                f.status = UploadStatus::Pending;
                let _ = self.event_tx.send(UploadEvent::StatusChanged { slot, status: UploadStatus::Pending });
            }
        }
    }

    /// Begin every pending slot. Returns how many slots were started.
    pub fn start_upload(&mut self) -> usize {
        let pending: Vec<SlotKey> = self
            .slots
            .iter()
            .filter(|(_, f)| matches!(f, Some(f) if f.status == UploadStatus::Pending))
            .map(|(s, _)| s)
            .collect();
        if pending.is_empty() {
            return 0;
        }

        for slot in &pending {
            let duration = draw_duration(&mut self.rng, &self.cfg);
            self.meta[slot.index()] = TaskMeta { duration: Some(duration), paused: false };
            if let Some(f) = self.slots.get_mut(*slot) {
                f.status = UploadStatus::Uploading;
            }
            debug!(slot = %slot, duration_ms = duration.as_millis() as u64, "upload started");
            let _ = self.event_tx.send(UploadEvent::StatusChanged { slot: *slot, status: UploadStatus::Uploading });
        }

        self.is_uploading = true;
        self.is_paused = false;
        self.start_driver();
        pending.len()
    }

    pub fn pause_all(&mut self) {
        for m in self.meta.iter_mut() {
            m.paused = true;
        }
        for slot in SlotKey::ALL {
            if let Some(f) = self.slots.get_mut(slot) {
                if f.status == UploadStatus::Uploading {
                    f.status = UploadStatus::Paused;
                    let _ = self.event_tx.send(UploadEvent::StatusChanged { slot, status: UploadStatus::Paused });
                }
            }
        }
        self.is_paused = true;
        self.stop_driver();
    }

    /// Resume every paused slot. Returns whether the driver has work again.
    pub fn resume_all(&mut self) -> bool {
        for m in self.meta.iter_mut() {
            m.paused = false;
        }
        for slot in SlotKey::ALL {
            if let Some(f) = self.slots.get_mut(slot) {
                if f.status == UploadStatus::Paused {
                    f.status = UploadStatus::Uploading;
                    let _ = self.event_tx.send(UploadEvent::StatusChanged { slot, status: UploadStatus::Uploading });
                }
            }
        }

        let has_work = self
            .slots
            .iter()
            .any(|(_, f)| matches!(f, Some(f) if f.progress < 100.0 && f.status == UploadStatus::Uploading));
        self.is_paused = false;
        if has_work {
            self.is_uploading = true;
            self.start_driver();
        }
        has_work
    }

    /// Deliver one tick. A no-op unless the driver is running.
    /// Returns the number of slots that advanced.
    pub fn tick(&mut self) -> usize {
        if !self.driver.is_running() {
            return 0;
        }
        self.driver.record_tick();

        let tick = self.driver.interval();
        let mut advanced = 0;
        for slot in SlotKey::ALL {
            let step = match self.slots.get(slot) {
                Some(f) => advance(slot, f, &self.meta[slot.index()], tick),
                None => continue,
            };
            match step {
                Ok(Some(adv)) => {
                    if let Some(f) = self.slots.get_mut(slot) {
                        let before = f.status;
                        adv.apply(f);
                        advanced += 1;
                        let _ = self.event_tx.send(UploadEvent::Progress {
                            slot,
                            progress: adv.progress,
                            time_left: adv.time_left,
                        });
                        if before != adv.status {
                            let _ = self.event_tx.send(UploadEvent::StatusChanged { slot, status: adv.status });
                        }
                    }
                }
                Ok(None) => {}
                Err(fault) => self.report_fault(fault),
            }
        }

        self.settle_driver();
        advanced
    }

    pub fn is_ticking(&self) -> bool {
        self.driver.is_running()
    }

    pub fn driver(&self) -> &TickDriver {
        &self.driver
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn snapshot(&self) -> SlotsSnapshot {
        self.slots.snapshot()
    }

    pub fn aggregate(&self) -> Aggregate {
        let sample = |slot: SlotKey| self.slots.get(slot).map(SlotSample::from);
        project(&[sample(SlotKey::First), sample(SlotKey::Second), sample(SlotKey::Third)])
    }

    pub fn outstanding_previews(&self) -> usize {
        self.slots.outstanding_previews()
    }

    /// One-shot import of previously finished uploads; each lands as `completed`.
    pub fn import_completed(&mut self, placeholders: &[Placeholder]) -> usize {
        let mut imported = 0;
        for p in placeholders {
            let name = sanitize_filename::sanitize(&p.name);
            let name = if name.is_empty() { format!("{}.jpeg", p.slot) } else { name };
            let mime = guess_mime(&name).unwrap_or("image/jpeg");
            let file = FileDescriptor::placeholder(name.clone(), mime, p.size);

            if let Some(w) = self.slots.install_completed(p.slot, file) {
                self.report_release(w);
            }
            self.meta[p.slot.index()] = TaskMeta::default();
            let _ = self.event_tx.send(UploadEvent::SlotAssigned { slot: p.slot, name, size: p.size });
            let _ = self.event_tx.send(UploadEvent::StatusChanged { slot: p.slot, status: UploadStatus::Completed });
            imported += 1;
        }
        if imported > 0 {
            let _ = self.event_tx.send(UploadEvent::Info {
                scope: "import".to_string(),
                message: format!("restored {} completed upload(s)", imported),
            });
        }
        self.settle_driver();
        imported
    }

    #[cfg(test)]
    pub(crate) fn task_meta(&self, slot: SlotKey) -> TaskMeta {
        self.meta[slot.index()]
    }

    fn start_driver(&mut self) {
        if self.driver.start() {
            debug!(tick_ms = self.cfg.tick_ms, "tick driver started");
            let _ = self.event_tx.send(UploadEvent::DriverStarted);
        }
    }

    fn stop_driver(&mut self) {
        if self.driver.stop() {
            debug!(ticks = self.driver.ticks(), "tick driver stopped");
            let _ = self.event_tx.send(UploadEvent::DriverStopped);
        }
    }

    /// Stop the driver once nothing is left uploading.
    fn settle_driver(&mut self) {
        let still_uploading = self
            .slots
            .iter()
            .any(|(_, f)| matches!(f, Some(f) if f.status == UploadStatus::Uploading));
        if !still_uploading {
            self.stop_driver();
            self.is_uploading = self
                .slots
                .iter()
                .any(|(_, f)| matches!(f, Some(f) if f.status == UploadStatus::Paused));
        }
    }

    fn report_release(&self, err: PreviewError) {
        warn!(error = %err, "preview release failed");
        let _ = self.event_tx.send(UploadEvent::Warning {
            scope: "preview".to_string(),
            message: err.to_string(),
        });
    }

    fn report_fault(&self, fault: TickFault) {
        warn!(error = %fault, "tick skipped a slot");
        let _ = self.event_tx.send(UploadEvent::Warning {
            scope: "tick".to_string(),
            message: fault.to_string(),
        });
    }
}
