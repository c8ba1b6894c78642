use crate::core::errors::{AssignError, InvalidFileError, PreviewError};
use crate::core::model::*;
use crate::core::preview::PreviewBackend;

pub fn validate_file(file: &FileDescriptor) -> Result<(), InvalidFileError> {
    if file.size > MAX_FILE_SIZE {
        return Err(InvalidFileError::TooLarge { name: file.name.clone(), size: file.size });
    }
    let mime = file.mime.to_ascii_lowercase();
    if !ACCEPTED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(InvalidFileError::UnsupportedType { name: file.name.clone(), mime: file.mime.clone() });
    }
    Ok(())
}

/// The three upload slots and the preview handles they own.
///
/// Release failures never abort a clear or replace; they are handed back to the
/// caller as warnings.
pub struct SlotStore {
    slots: [Option<UploadingFile>; 3],
    previews: Box<dyn PreviewBackend>,
}

impl SlotStore {
    pub fn new(previews: Box<dyn PreviewBackend>) -> Self {
        Self { slots: [None, None, None], previews }
    }

    pub fn assign(&mut self, slot: SlotKey, file: FileDescriptor) -> Result<Option<PreviewError>, AssignError> {
        validate_file(&file)?;
        Ok(self.install(slot, file, UploadStatus::Pending, 0.0))
    }

    /// Fill a slot with an already finished upload, bypassing validation.
    pub fn install_completed(&mut self, slot: SlotKey, file: FileDescriptor) -> Option<PreviewError> {
        self.install(slot, file, UploadStatus::Completed, 100.0)
    }

    fn install(
        &mut self,
        slot: SlotKey,
        file: FileDescriptor,
        status: UploadStatus,
        progress: f64,
    ) -> Option<PreviewError> {
        let preview = self.previews.allocate(&file);
        let warning = self.release_slot(slot);
        self.slots[slot.index()] = Some(UploadingFile { file, preview, progress, status, time_left: 0 });
        warning
    }

    pub fn clear(&mut self, slot: SlotKey) -> Option<PreviewError> {
        self.release_slot(slot)
    }

    pub fn clear_all(&mut self) -> Vec<PreviewError> {
        SlotKey::ALL.iter().filter_map(|s| self.release_slot(*s)).collect()
    }

    fn release_slot(&mut self, slot: SlotKey) -> Option<PreviewError> {
        let old = self.slots[slot.index()].take()?;
        self.previews.release(&old.preview).err()
    }

    pub fn get(&self, slot: SlotKey) -> Option<&UploadingFile> {
        self.slots[slot.index()].as_ref()
    }

    pub fn get_mut(&mut self, slot: SlotKey) -> Option<&mut UploadingFile> {
        self.slots[slot.index()].as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, Option<&UploadingFile>)> {
        SlotKey::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    pub fn outstanding_previews(&self) -> usize {
        self.previews.outstanding()
    }

    pub fn snapshot(&self) -> SlotsSnapshot {
        let view = |slot: SlotKey| {
            self.get(slot).map(|f| SlotView {
                slot,
                name: f.file.name.clone(),
                size: f.file.size,
                mime: f.file.mime.clone(),
                preview: f.preview.clone(),
                progress: f.progress,
                status: f.status,
                time_left: f.time_left,
            })
        };
        SlotsSnapshot { slots: [view(SlotKey::First), view(SlotKey::Second), view(SlotKey::Third)] }
    }
}
