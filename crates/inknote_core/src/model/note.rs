//! Note projection derived from one file in the notes directory.
//!
//! # Responsibility
//! - Define the `{filename, title}` pair handed to UI layers.
//! - Own the literal suffix rules used for listing and renaming.
//!
//! # Invariants
//! - `title` is `filename` with exactly one trailing `NOTE_EXTENSION` removed.
//! - Suffix handling is literal string work, never extension parsing.

use serde::{Deserialize, Serialize};

/// Recognized note file suffix (case-sensitive).
pub const NOTE_EXTENSION: &str = ".html";

/// Transient view of a note file. Built fresh on every listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    /// On-disk file name including `NOTE_EXTENSION`.
    pub filename: String,
    /// Display title (`filename` without the suffix).
    pub title: String,
}

impl Note {
    /// Builds a note from an on-disk name, or `None` when the name does not
    /// carry the recognized suffix.
    pub fn from_filename(filename: impl Into<String>) -> Option<Self> {
        let filename = filename.into();
        let title = title_from_filename(&filename)?.to_string();
        Some(Self { filename, title })
    }

    /// Builds the note a title maps to after a rename or create.
    pub fn from_title(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            filename: filename_for_title(&title),
            title,
        }
    }
}

/// Returns whether `name` ends with the recognized note suffix.
pub fn is_note_filename(name: &str) -> bool {
    name.ends_with(NOTE_EXTENSION)
}

/// Strips one trailing `NOTE_EXTENSION`.
///
/// `a.b.html` yields `a.b`; `.html` yields an empty title.
pub fn title_from_filename(name: &str) -> Option<&str> {
    name.strip_suffix(NOTE_EXTENSION)
}

/// Appends `NOTE_EXTENSION` to `title` verbatim.
///
/// A title already ending in the suffix gets it twice.
pub fn filename_for_title(title: &str) -> String {
    format!("{title}{NOTE_EXTENSION}")
}
