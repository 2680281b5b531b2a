//! Directory chooser seam for interactive root selection.
//!
//! # Responsibility
//! - Abstract the native "pick a folder" dialog owned by the UI shell.
//! - Normalize cancel semantics so callers only see `Option<PathBuf>`.
//!
//! # Invariants
//! - A cancelled dialog is `Ok(None)`, never an error.
//! - An empty selection is treated exactly like a cancel.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Title shown by dialog-backed choosers.
pub const CHOOSE_DIRECTORY_TITLE: &str = "Choose notes folder";

/// Failure reported by the chooser collaborator itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserError(pub String);

impl ChooserError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Display for ChooserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "directory chooser failed: {}", self.0)
    }
}

impl Error for ChooserError {}

/// External collaborator that lets the user pick the notes directory.
pub trait DirectoryChooser {
    /// Shows the picker with `title` and returns the selection.
    ///
    /// `Ok(None)` means the user cancelled.
    fn choose_directory(&self, title: &str) -> Result<Option<PathBuf>, ChooserError>;
}

impl<F> DirectoryChooser for F
where
    F: Fn(&str) -> Result<Option<PathBuf>, ChooserError>,
{
    fn choose_directory(&self, title: &str) -> Result<Option<PathBuf>, ChooserError> {
        self(title)
    }
}

/// Chooser that replays a selection already made elsewhere.
///
/// Used when the host UI shows the native dialog itself and hands the result
/// back across the bridge.
#[derive(Debug, Clone, Default)]
pub struct PresetChooser {
    selection: Option<PathBuf>,
}

impl PresetChooser {
    /// Wraps a raw selection; blank strings become a cancel.
    pub fn new(selection: Option<String>) -> Self {
        let selection = selection
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);
        Self { selection }
    }
}

impl DirectoryChooser for PresetChooser {
    fn choose_directory(&self, _title: &str) -> Result<Option<PathBuf>, ChooserError> {
        Ok(self.selection.clone())
    }
}

/// Drops empty selections so every chooser shares one cancel shape.
pub(crate) fn normalize_selection(selection: Option<PathBuf>) -> Option<PathBuf> {
    selection.filter(|path| !path.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{normalize_selection, DirectoryChooser, PresetChooser};
    use std::path::PathBuf;

    #[test]
    fn preset_chooser_treats_blank_as_cancel() {
        let chooser = PresetChooser::new(Some("   ".to_string()));
        assert_eq!(chooser.choose_directory("t").unwrap(), None);
    }

    #[test]
    fn preset_chooser_returns_trimmed_selection() {
        let chooser = PresetChooser::new(Some(" /notes ".to_string()));
        assert_eq!(
            chooser.choose_directory("t").unwrap(),
            Some(PathBuf::from("/notes"))
        );
    }

    #[test]
    fn normalize_selection_drops_empty_path() {
        assert_eq!(normalize_selection(Some(PathBuf::new())), None);
        assert_eq!(
            normalize_selection(Some(PathBuf::from("/a"))),
            Some(PathBuf::from("/a"))
        );
    }
}
