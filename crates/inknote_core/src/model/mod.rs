//! Domain model for notes stored as plain files.
//!
//! # Responsibility
//! - Define the value types returned to UI and FFI layers.
//!
//! # Invariants
//! - Model values are derived from the filesystem and never cached.

pub mod note;
