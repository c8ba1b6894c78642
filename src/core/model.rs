use bytes::Bytes;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;
pub const ACCEPTED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotKey {
    First,
    Second,
    Third,
}

impl SlotKey {
    pub const ALL: [SlotKey; 3] = [SlotKey::First, SlotKey::Second, SlotKey::Third];

    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" | "1" => Ok(Self::First),
            "second" | "2" => Ok(Self::Second),
            "third" | "3" => Ok(Self::Third),
            other => Err(anyhow::anyhow!("unknown slot: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Paused,
    Completed,
}

impl UploadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploading => "uploading",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

/// MIME type implied by a file name's extension, for the image types we care about.
pub fn guess_mime(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// A file handed over by the host's file picker.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub payload: Bytes,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, payload: Bytes) -> Self {
        Self {
            name: name.into(),
            size: payload.len() as u64,
            mime: mime.into(),
            payload,
        }
    }

    /// Metadata-only descriptor: the payload stays empty while `size` reports the real length.
    pub fn placeholder(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
            payload: Bytes::new(),
        }
    }
}

/// Opaque display handle for a slot's payload, e.g. `blob:<uuid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(pub String);

impl PreviewHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
pub struct UploadingFile {
    pub file: FileDescriptor,
    pub preview: PreviewHandle,
    pub progress: f64,
    pub status: UploadStatus,
    pub time_left: u64,
}

/// Per-slot simulation parameters. Never leaves the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaskMeta {
    /// `None` until `start_upload` draws one. A drawn zero is valid.
    pub duration: Option<Duration>,
    pub paused: bool,
}

/// Read-only copy of a filled slot handed to consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    pub slot: SlotKey,
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub preview: PreviewHandle,
    pub progress: f64,
    pub status: UploadStatus,
    pub time_left: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotsSnapshot {
    pub slots: [Option<SlotView>; 3],
}

impl SlotsSnapshot {
    pub fn get(&self, slot: SlotKey) -> Option<&SlotView> {
        self.slots[slot.index()].as_ref()
    }

    pub fn filled(&self) -> impl Iterator<Item = &SlotView> {
        self.slots.iter().flatten()
    }
}

/// A previously uploaded file restored as already completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub slot: SlotKey,
    pub name: String,
    pub size: u64,
}
