//! Storage layer over the notes directory.
//!
//! # Responsibility
//! - Own filename resolution against the configured root.
//! - Translate I/O failures into one store error type.
//!
//! # Invariants
//! - No operation touches anything outside the configured root.

pub mod note_store;
