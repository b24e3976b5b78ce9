//! Collection load/save between a blob store and in-memory tables.
//!
//! # Responsibility
//! - Materialize remote collection files into local SQLite files and back.
//! - Create, list and delete collection files inside a remote folder.
//!
//! # Invariants
//! - Every load/save is a full-file transfer.
//! - A failed transfer leaves the caller's in-memory table untouched.

pub mod quote_store;

pub use quote_store::{
    decode_collection, encode_collection, QuoteStore, StoreError, StoreResult,
    DEFAULT_COLLECTION_EXTENSION, DEFAULT_COLLECTION_NAME,
};
