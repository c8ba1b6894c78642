use crate::core::model::{SlotKey, UploadStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    SlotAssigned { slot: SlotKey, name: String, size: u64 },
    SlotCleared { slot: SlotKey },
    StatusChanged { slot: SlotKey, status: UploadStatus },
    Progress { slot: SlotKey, progress: f64, time_left: u64 },
    DriverStarted,
    DriverStopped,
    Warning { scope: String, message: String },
    Info { scope: String, message: String },
}
