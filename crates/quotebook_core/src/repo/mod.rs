//! Repository layer over one opened collection file.
//!
//! # Responsibility
//! - Isolate SQLite query details from the store and session layers.
//!
//! # Invariants
//! - Repository writes replace the whole `quotes` table in one transaction.
//! - Read paths map NULL text columns to empty strings.

pub mod quote_repo;
