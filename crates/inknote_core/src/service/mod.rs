//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into UI-level flows.
//! - Keep UI/FFI layers decoupled from filesystem details.

pub mod note_service;
