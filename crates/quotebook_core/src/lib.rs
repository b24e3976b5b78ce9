//! Core domain logic for Quotebook.
//! This crate is the single source of truth for quote-collection invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod storage;
pub mod store;

pub use config::{ConfigError, QuotebookConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::quote::{
    merge_tags, normalize_content, parse_tags, Quote, QuoteDraft, QuoteId, ValidationError,
};
pub use model::table::QuoteTable;
pub use repo::quote_repo::{QuoteRepository, RepoError, RepoResult, SqliteQuoteRepository};
pub use search::select::{
    filter_by_tags, find_duplicates, random_pick, random_pick_filtered, search, TagFilter,
};
pub use service::editor::{delete_quotes, insert_quote, renumber_quotes, update_quote, EditError};
pub use service::session::{Session, SessionError, SessionResult};
pub use service::transfer::{copy_quotes, move_quotes, TransferError, TransferOutcome};
pub use storage::{
    extract_folder_id, BlobError, BlobStore, DirBlobStore, FileRef, FolderId, MemoryBlobStore,
};
pub use store::{QuoteStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
