//! In-process blob store.
//!
//! Keeps files in memory and can be told to fail writes for chosen names,
//! which lets callers exercise partial-failure paths deterministically.

use crate::storage::blob::{validate_segment, BlobError, BlobResult, BlobStore, FileRef, FolderId};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct MemoryFile {
    folder: FolderId,
    name: String,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<String, MemoryFile>,
    failing_replaces: HashSet<String>,
    offline: bool,
}

/// Blob store backed by a process-local map keyed by generated ids.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    state: Mutex<MemoryState>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `replace` of a file called `name` fail.
    pub fn fail_replace_of(&self, name: &str) {
        self.lock().failing_replaces.insert(name.to_string());
    }

    /// Makes every operation fail until [`MemoryBlobStore::clear_failures`].
    pub fn go_offline(&self) {
        self.lock().offline = true;
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.failing_replaces.clear();
        state.offline = false;
    }

    /// Returns the content of the file called `name` in `folder`, if any.
    pub fn bytes_of(&self, folder: &FolderId, name: &str) -> Option<Vec<u8>> {
        self.lock()
            .files
            .values()
            .find(|file| &file.folder == folder && file.name == name)
            .map(|file| file.bytes.clone())
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned map is still structurally valid; keep serving it.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn online(&self) -> BlobResult<MutexGuard<'_, MemoryState>> {
        let state = self.lock();
        if state.offline {
            return Err(BlobError::Unavailable("memory store is offline".to_string()));
        }
        Ok(state)
    }
}

impl BlobStore for MemoryBlobStore {
    fn list(&self, folder: &FolderId) -> BlobResult<Vec<FileRef>> {
        let state = self.online()?;
        let mut files = state
            .files
            .iter()
            .filter(|(_, file)| &file.folder == folder)
            .map(|(id, file)| FileRef {
                id: id.clone(),
                name: file.name.clone(),
            })
            .collect::<Vec<_>>();
        files.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(files)
    }

    fn fetch(&self, file: &FileRef) -> BlobResult<Vec<u8>> {
        let state = self.online()?;
        state
            .files
            .get(&file.id)
            .map(|stored| stored.bytes.clone())
            .ok_or_else(|| BlobError::NotFound(file.id.clone()))
    }

    fn replace(&self, file: &FileRef, bytes: &[u8]) -> BlobResult<FileRef> {
        let mut state = self.online()?;
        if state.failing_replaces.contains(&file.name) {
            return Err(BlobError::Unavailable(format!(
                "replace of `{}` rejected",
                file.name
            )));
        }
        let stored = state
            .files
            .get_mut(&file.id)
            .ok_or_else(|| BlobError::NotFound(file.id.clone()))?;
        stored.bytes = bytes.to_vec();
        Ok(FileRef {
            id: file.id.clone(),
            name: stored.name.clone(),
        })
    }

    fn create_file(&self, folder: &FolderId, name: &str, bytes: &[u8]) -> BlobResult<FileRef> {
        validate_segment(name)?;
        let mut state = self.online()?;
        let id = Uuid::new_v4().to_string();
        state.files.insert(
            id.clone(),
            MemoryFile {
                folder: folder.clone(),
                name: name.to_string(),
                bytes: bytes.to_vec(),
            },
        );
        Ok(FileRef {
            id,
            name: name.to_string(),
        })
    }

    fn delete_file(&self, file: &FileRef) -> BlobResult<bool> {
        let mut state = self.online()?;
        Ok(state.files.remove(&file.id).is_some())
    }
}
