//! Core domain logic for InkNote.
//! Notes are plain `.html` files in one user-chosen directory; this crate is
//! the single source of truth for how they are listed, named, and changed.

pub mod chooser;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod settings;

pub use chooser::{ChooserError, DirectoryChooser, PresetChooser, CHOOSE_DIRECTORY_TITLE};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NOTE_EXTENSION};
pub use repo::note_store::{FilesystemError, NoteStore, StoreOp, StoreResult};
pub use service::note_service::{
    NoteService, NoteServiceError, OpenedNote, ServiceResult, NEW_NOTE_BODY,
};
pub use settings::{default_settings_path, AppSettings, SettingsError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
