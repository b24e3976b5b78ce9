//! Core use-case services.
//!
//! # Responsibility
//! - Apply validated edits to the in-memory table.
//! - Orchestrate cross-collection transfers and the session lifecycle.
//!
//! # See also
//! - `store` for whole-file persistence.

pub mod editor;
pub mod session;
pub mod transfer;
