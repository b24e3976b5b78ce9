//! Domain model for quote collections.
//!
//! # Responsibility
//! - Define the quote record and the form-level field set used to write it.
//! - Hold the in-memory table that mirrors one collection file.
//!
//! # Invariants
//! - Quote ids are unique within one table whenever it is persisted.
//! - A tag set never contains an empty token.

pub mod quote;
pub mod table;
