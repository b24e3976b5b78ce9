//! Remote folder storage seam.
//!
//! # Responsibility
//! - Define the blocking whole-blob contract a remote folder must satisfy.
//! - Provide a local-directory backend and an in-memory backend.
//!
//! # Invariants
//! - Transfers are whole-file; there is no partial read or write.
//! - Backends never interpret file content.

pub mod blob;
pub mod dir_store;
pub mod folder;
pub mod memory_store;

pub use blob::{BlobError, BlobResult, BlobStore, FileRef, FolderId};
pub use dir_store::DirBlobStore;
pub use folder::extract_folder_id;
pub use memory_store::MemoryBlobStore;
