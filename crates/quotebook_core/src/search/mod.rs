//! Selection and filter queries over an in-memory quote table.
//!
//! # Responsibility
//! - Random sampling, tag include/exclude filtering, substring search and
//!   duplicate detection.
//!
//! # Invariants
//! - Every function is pure: inputs are borrowed, never mutated.

pub mod select;
