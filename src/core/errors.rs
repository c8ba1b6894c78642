use crate::core::model::SlotKey;

/// Rejection reported back from `assign`; the slot is left untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidFileError {
    #[error("{name}: max file size is 20MB (got {size} bytes)")]
    TooLarge { name: String, size: u64 },

    #[error("{name}: .jpg, .jpeg, .png and .webp files are accepted (got {mime})")]
    UnsupportedType { name: String, mime: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    #[error("failed to release preview {handle}: {reason}")]
    Release { handle: String, reason: String },
}

/// A single slot could not be advanced; the rest of the tick still runs.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TickFault {
    #[error("slot {slot}: uploading without an assigned duration")]
    MissingDuration { slot: SlotKey },

    #[error("slot {slot}: progress is not a finite number ({progress})")]
    CorruptProgress { slot: SlotKey, progress: f64 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    #[error(transparent)]
    InvalidFile(#[from] InvalidFileError),
}
