use crate::core::errors::PreviewError;
use crate::core::model::{FileDescriptor, PreviewHandle};
use std::collections::HashSet;
use uuid::Uuid;

/// Allocates and releases display handles for slot payloads.
pub trait PreviewBackend: Send {
    fn allocate(&mut self, file: &FileDescriptor) -> PreviewHandle;
    fn release(&mut self, handle: &PreviewHandle) -> Result<(), PreviewError>;
    /// Handles allocated and not yet released.
    fn outstanding(&self) -> usize;
}

/// In-process `blob:` handle table.
#[derive(Debug, Default)]
pub struct BlobPreviews {
    live: HashSet<PreviewHandle>,
}

impl BlobPreviews {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreviewBackend for BlobPreviews {
    fn allocate(&mut self, _file: &FileDescriptor) -> PreviewHandle {
        let handle = PreviewHandle(format!("blob:vessel/{}", Uuid::new_v4()));
        self.live.insert(handle.clone());
        handle
    }

    fn release(&mut self, handle: &PreviewHandle) -> Result<(), PreviewError> {
        if !handle.as_str().starts_with("blob:") {
            return Ok(());
        }
        if self.live.remove(handle) {
            Ok(())
        } else {
            Err(PreviewError::Release {
                handle: handle.0.clone(),
                reason: "unknown handle".to_string(),
            })
        }
    }

    fn outstanding(&self) -> usize {
        self.live.len()
    }
}
