//! Note use-case service.
//!
//! # Responsibility
//! - Provide the UI-level flows (open, create, rename, choose folder) on top
//!   of `NoteStore`.
//! - Keep the chosen notes directory in sync with persisted settings.
//!
//! # Invariants
//! - `list_notes` is sorted by title (case-insensitive), then filename.
//! - New notes get the first free `New note N` title above existing ones.
//! - A failed settings write leaves the notes directory unchanged.

use crate::chooser::{ChooserError, DirectoryChooser};
use crate::model::note::Note;
use crate::repo::note_store::{FilesystemError, NoteStore, StoreResult};
use crate::settings::{AppSettings, SettingsError};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Body written into freshly created notes.
pub const NEW_NOTE_BODY: &str = "<p></p>";
/// Title prefix used for freshly created notes.
pub const NEW_NOTE_TITLE_PREFIX: &str = "New note";

static NEW_NOTE_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^New note (\d+)$").expect("valid new note title regex"));

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Store-level filesystem failure.
    Filesystem(FilesystemError),
    /// Directory chooser collaborator failed.
    Chooser(ChooserError),
    /// Settings could not be read or written.
    Settings(SettingsError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filesystem(err) => write!(f, "{err}"),
            Self::Chooser(err) => write!(f, "{err}"),
            Self::Settings(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Filesystem(err) => Some(err),
            Self::Chooser(err) => Some(err),
            Self::Settings(err) => Some(err),
        }
    }
}

impl From<FilesystemError> for NoteServiceError {
    fn from(value: FilesystemError) -> Self {
        Self::Filesystem(value)
    }
}

impl From<ChooserError> for NoteServiceError {
    fn from(value: ChooserError) -> Self {
        Self::Chooser(value)
    }
}

impl From<SettingsError> for NoteServiceError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}

pub type ServiceResult<T> = Result<T, NoteServiceError>;

/// Note together with its current content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedNote {
    pub note: Note,
    pub content: String,
}

/// Note service facade over one `NoteStore`.
pub struct NoteService {
    store: NoteStore,
    settings_path: Option<PathBuf>,
}

impl NoteService {
    /// Creates a service without settings persistence.
    pub fn new(store: NoteStore) -> Self {
        Self {
            store,
            settings_path: None,
        }
    }

    /// Creates a service whose root is restored from, and saved to,
    /// `settings_path`.
    pub fn with_settings(settings_path: impl Into<PathBuf>) -> ServiceResult<Self> {
        let settings_path = settings_path.into();
        let settings = AppSettings::load(&settings_path)?;
        let mut store = NoteStore::new();
        if let Some(dir) = settings.data_dir {
            store.set_root(dir);
        }
        Ok(Self {
            store,
            settings_path: Some(settings_path),
        })
    }

    /// Like `with_settings`, but an unreadable settings file only costs the
    /// remembered directory. The next successful save replaces the file.
    pub fn restore(settings_path: impl Into<PathBuf>) -> Self {
        let settings_path = settings_path.into();
        match Self::with_settings(&settings_path) {
            Ok(service) => service,
            Err(err) => {
                warn!("event=settings_restore module=service status=error error={err}");
                Self {
                    store: NoteStore::new(),
                    settings_path: Some(settings_path),
                }
            }
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.store.root()
    }

    /// Sets the notes directory and persists it when settings are enabled.
    pub fn set_data_dir(&mut self, dir: impl Into<PathBuf>) -> ServiceResult<()> {
        let previous = self.store.root().map(Path::to_path_buf);
        self.store.set_root(dir);
        self.persist_or_revert(previous)
    }

    /// Lets the user pick the notes directory.
    ///
    /// Cancel returns `Ok(None)` and keeps the current directory.
    pub fn choose_data_dir(
        &mut self,
        chooser: &dyn DirectoryChooser,
    ) -> ServiceResult<Option<PathBuf>> {
        let previous = self.store.root().map(Path::to_path_buf);
        let chosen = self.store.choose_root(chooser)?;
        if chosen.is_some() {
            self.persist_or_revert(previous)?;
        }
        Ok(chosen)
    }

    /// Lists notes sorted for display.
    pub fn list_notes(&self) -> StoreResult<Vec<Note>> {
        let mut notes = self.store.list()?;
        notes.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.filename.cmp(&b.filename))
        });
        Ok(notes)
    }

    /// Reads one note for editing.
    pub fn open_note(&self, filename: &str) -> ServiceResult<OpenedNote> {
        let content = self.store.read(filename)?;
        let note = Note::from_filename(filename).unwrap_or_else(|| Note {
            filename: filename.to_string(),
            title: filename.to_string(),
        });
        Ok(OpenedNote { note, content })
    }

    /// Creates an empty note under the next free default title.
    pub fn create_note(&self) -> ServiceResult<Note> {
        let existing = self.store.list()?;
        let note = Note::from_title(next_new_note_title(&existing));
        self.store.save(&note.filename, NEW_NOTE_BODY)?;
        info!("event=note_create module=service status=ok");
        Ok(note)
    }

    pub fn save_note(&self, filename: &str, content: &str) -> ServiceResult<()> {
        Ok(self.store.save(filename, content)?)
    }

    pub fn delete_note(&self, filename: &str) -> ServiceResult<()> {
        Ok(self.store.delete(filename)?)
    }

    /// Renames a note and returns the note under its new name.
    ///
    /// `new_title` is used verbatim, blank titles included.
    pub fn rename_note(&self, filename: &str, new_title: &str) -> ServiceResult<Note> {
        let new_filename = self.store.rename(filename, new_title)?;
        Ok(Note {
            filename: new_filename,
            title: new_title.to_string(),
        })
    }

    fn persist_or_revert(&mut self, previous: Option<PathBuf>) -> ServiceResult<()> {
        if let Err(err) = self.persist_data_dir() {
            self.store.set_root(previous.unwrap_or_default());
            return Err(err);
        }
        Ok(())
    }

    fn persist_data_dir(&self) -> ServiceResult<()> {
        let Some(path) = self.settings_path.as_deref() else {
            return Ok(());
        };
        let mut settings = AppSettings::load_or_default(path);
        settings.data_dir = self.store.root().map(Path::to_path_buf);
        settings.save(path)?;
        Ok(())
    }
}

/// Picks `New note N` with N one above the highest existing default title.
pub fn next_new_note_title(existing: &[Note]) -> String {
    let highest = existing
        .iter()
        .filter_map(|note| NEW_NOTE_TITLE_RE.captures(&note.title))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{NEW_NOTE_TITLE_PREFIX} {}", highest.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::next_new_note_title;
    use crate::model::note::Note;

    #[test]
    fn first_default_title_is_one() {
        assert_eq!(next_new_note_title(&[]), "New note 1");
    }

    #[test]
    fn default_title_skips_past_highest_existing_number() {
        let existing = vec![
            Note::from_title("New note 1"),
            Note::from_title("New note 7"),
            Note::from_title("New note x"),
            Note::from_title("groceries"),
        ];
        assert_eq!(next_new_note_title(&existing), "New note 8");
    }
}
