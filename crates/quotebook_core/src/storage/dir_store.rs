//! Local-directory blob store.
//!
//! # Responsibility
//! - Treat subdirectories of one root as remote folders.
//! - Replace file content through a temp file and an atomic rename.
//!
//! # Invariants
//! - File ids have the shape `<folder>/<name>`.
//! - Folder ids and file names are single path segments.

use crate::storage::blob::{validate_segment, BlobError, BlobResult, BlobStore, FileRef, FolderId};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Blob store rooted at one local directory.
#[derive(Debug, Clone)]
pub struct DirBlobStore {
    root: PathBuf,
}

impl DirBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn folder_dir(&self, folder: &FolderId) -> BlobResult<PathBuf> {
        validate_segment(folder.as_str())?;
        Ok(self.root.join(folder.as_str()))
    }

    fn file_path(&self, file: &FileRef) -> BlobResult<(PathBuf, PathBuf)> {
        let (folder, name) = file
            .id
            .split_once('/')
            .ok_or_else(|| BlobError::InvalidName(file.id.clone()))?;
        validate_segment(name)?;
        let dir = self.folder_dir(&FolderId::new(folder))?;
        let path = dir.join(name);
        Ok((dir, path))
    }
}

impl BlobStore for DirBlobStore {
    fn list(&self, folder: &FolderId) -> BlobResult<Vec<FileRef>> {
        let dir = self.folder_dir(folder)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            // Folders come into existence with their first file.
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            files.push(FileRef {
                id: format!("{folder}/{name}"),
                name,
            });
        }
        files.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(files)
    }

    fn fetch(&self, file: &FileRef) -> BlobResult<Vec<u8>> {
        let (_, path) = self.file_path(file)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(BlobError::NotFound(file.id.clone())),
            Err(err) => Err(err.into()),
        }
    }

    fn replace(&self, file: &FileRef, bytes: &[u8]) -> BlobResult<FileRef> {
        let (dir, path) = self.file_path(file)?;
        if !path.is_file() {
            return Err(BlobError::NotFound(file.id.clone()));
        }

        let mut staged = NamedTempFile::new_in(&dir)?;
        staged.write_all(bytes)?;
        staged.flush()?;
        staged.persist(&path).map_err(|err| BlobError::Io(err.error))?;
        Ok(file.clone())
    }

    fn create_file(&self, folder: &FolderId, name: &str, bytes: &[u8]) -> BlobResult<FileRef> {
        validate_segment(name)?;
        let dir = self.folder_dir(folder)?;
        fs::create_dir_all(&dir)?;

        let file = FileRef {
            id: format!("{folder}/{name}"),
            name: name.to_string(),
        };
        let mut staged = NamedTempFile::new_in(&dir)?;
        staged.write_all(bytes)?;
        staged.flush()?;
        staged
            .persist_noclobber(dir.join(name))
            .map_err(|err| match err.error.kind() {
                ErrorKind::AlreadyExists => BlobError::AlreadyExists(file.id.clone()),
                _ => BlobError::Io(err.error),
            })?;
        Ok(file)
    }

    fn delete_file(&self, file: &FileRef) -> BlobResult<bool> {
        let (_, path) = self.file_path(file)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DirBlobStore;
    use crate::storage::blob::{BlobError, BlobStore, FileRef, FolderId};

    #[test]
    fn create_list_replace_delete_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirBlobStore::new(dir.path());
        let folder = FolderId::new("shelf");

        let created = store.create_file(&folder, "a.db", b"one").unwrap();
        assert_eq!(created.id, "shelf/a.db");
        assert_eq!(store.list(&folder).unwrap(), vec![created.clone()]);

        store.replace(&created, b"two").unwrap();
        assert_eq!(store.fetch(&created).unwrap(), b"two");

        assert!(store.delete_file(&created).unwrap());
        assert!(!store.delete_file(&created).unwrap());
    }

    #[test]
    fn unknown_folder_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirBlobStore::new(dir.path());
        assert!(store.list(&FolderId::new("fresh")).unwrap().is_empty());
    }

    #[test]
    fn create_refuses_to_overwrite_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirBlobStore::new(dir.path());
        let folder = FolderId::new("shelf");
        store.create_file(&folder, "a.db", b"one").unwrap();

        let err = store.create_file(&folder, "a.db", b"two").unwrap_err();
        assert!(matches!(err, BlobError::AlreadyExists(_)));
    }

    #[test]
    fn path_traversal_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirBlobStore::new(dir.path());
        let escaped = FileRef {
            id: "shelf/../secret".to_string(),
            name: "secret".to_string(),
        };
        assert!(matches!(
            store.fetch(&escaped),
            Err(BlobError::InvalidName(_))
        ));
        assert!(matches!(
            store.list(&FolderId::new("..")),
            Err(BlobError::InvalidName(_))
        ));
    }
}
