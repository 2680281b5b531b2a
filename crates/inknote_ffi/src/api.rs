//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the note folder operations to Dart via FRB.
//! - Own the single process-wide `NoteService` used by the UI.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Calls are serialized through one lock, so a directory change never
//!   overlaps an in-flight note operation.
//! - Failures come back as `ok=false` envelopes with `<fn> failed: ...`.
//! - An unreadable settings file never disables the API; it only loses the
//!   remembered folder until the next successful save.

use inknote_core::{
    core_version as core_version_inner, default_settings_path, init_logging as init_logging_inner,
    ping as ping_inner, Note, NoteService, NoteStore, PresetChooser,
};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

const SETTINGS_PATH_ENV: &str = "INKNOTE_SETTINGS_PATH";

static NOTE_CONTROLLER: Mutex<Option<NoteService>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Note list item exposed to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    /// File name including `.html`; pass back to read/save/delete/rename.
    pub filename: String,
    /// Display title.
    pub title: String,
}

impl From<Note> for NoteItem {
    fn from(note: Note) -> Self {
        Self {
            filename: note.filename,
            title: note.title,
        }
    }
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

/// Result of `choose_directory`. `data_dir` is empty when cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirResponse {
    pub ok: bool,
    pub data_dir: String,
    pub message: String,
}

/// Listing envelope. `items` is empty on failure or when no folder is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    pub ok: bool,
    pub items: Vec<NoteItem>,
    pub message: String,
}

/// Read envelope. `content` is empty on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentResponse {
    pub ok: bool,
    pub content: String,
    pub message: String,
}

/// Rename envelope. `new_filename` is empty on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameResponse {
    pub ok: bool,
    pub new_filename: String,
    pub message: String,
}

/// Create envelope carrying the new note on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteResponse {
    pub ok: bool,
    pub note: Option<NoteItem>,
    pub message: String,
}

/// Applies the result of the native folder dialog shown by Flutter.
///
/// Input semantics:
/// - `selected`: picked path, or `None`/blank when the user cancelled.
///
/// # FFI contract
/// - Cancel keeps the current folder and returns `ok=true, data_dir=""`.
/// - A selection becomes the notes folder and is persisted to settings.
#[flutter_rust_bridge::frb(sync)]
pub fn choose_directory(selected: Option<String>) -> DirResponse {
    let chooser = PresetChooser::new(selected);
    match with_note_service(|service| {
        service
            .choose_data_dir(&chooser)
            .map_err(|err| err.to_string())
    }) {
        Ok(Some(dir)) => DirResponse {
            ok: true,
            data_dir: path_to_string(&dir),
            message: "Notes folder updated.".to_string(),
        },
        Ok(None) => DirResponse {
            ok: true,
            data_dir: String::new(),
            message: "Cancelled.".to_string(),
        },
        Err(err) => DirResponse {
            ok: false,
            data_dir: String::new(),
            message: format!("choose_directory failed: {err}"),
        },
    }
}

/// Returns the current notes folder, or empty string when unset.
#[flutter_rust_bridge::frb(sync)]
pub fn get_data_dir() -> String {
    with_note_service(|service| Ok(service.data_dir().map(path_to_string).unwrap_or_default()))
        .unwrap_or_default()
}

/// Sets the notes folder exactly as given, without validating it.
///
/// # FFI contract
/// - An empty `path` clears the folder.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn set_data_dir(path: String) -> String {
    match with_note_service(|service| {
        service
            .set_data_dir(path.as_str())
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => String::new(),
        Err(err) => format!("set_data_dir failed: {err}"),
    }
}

/// Lists notes in the current folder, sorted by title.
#[flutter_rust_bridge::frb(sync)]
pub fn get_notes() -> NotesResponse {
    match with_note_service(|service| service.list_notes().map_err(|err| err.to_string())) {
        Ok(notes) => {
            let items = notes.into_iter().map(NoteItem::from).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No notes.".to_string()
            } else {
                format!("Found {} note(s).", items.len())
            };
            NotesResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => NotesResponse {
            ok: false,
            items: Vec::new(),
            message: format!("get_notes failed: {err}"),
        },
    }
}

/// Reads one note's full content.
#[flutter_rust_bridge::frb(sync)]
pub fn read_note(filename: String) -> ContentResponse {
    match with_note_service(|service| {
        service
            .open_note(filename.as_str())
            .map_err(|err| err.to_string())
    }) {
        Ok(opened) => ContentResponse {
            ok: true,
            content: opened.content,
            message: String::new(),
        },
        Err(err) => ContentResponse {
            ok: false,
            content: String::new(),
            message: format!("read_note failed: {err}"),
        },
    }
}

/// Creates or overwrites one note.
#[flutter_rust_bridge::frb(sync)]
pub fn save_note(filename: String, content: String) -> ActionResponse {
    action_response(
        "save_note",
        "Note saved.",
        with_note_service(|service| {
            service
                .save_note(filename.as_str(), content.as_str())
                .map_err(|err| err.to_string())
        }),
    )
}

/// Deletes one note file permanently.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_note(filename: String) -> ActionResponse {
    action_response(
        "delete_note",
        "Note deleted.",
        with_note_service(|service| {
            service
                .delete_note(filename.as_str())
                .map_err(|err| err.to_string())
        }),
    )
}

/// Renames a note to `new_title` + `.html`.
///
/// # FFI contract
/// - Returns the new filename so the UI can retarget the open note.
#[flutter_rust_bridge::frb(sync)]
pub fn rename_note(old_filename: String, new_title: String) -> RenameResponse {
    match with_note_service(|service| {
        service
            .rename_note(old_filename.as_str(), new_title.as_str())
            .map_err(|err| err.to_string())
    }) {
        Ok(note) => RenameResponse {
            ok: true,
            new_filename: note.filename,
            message: "Note renamed.".to_string(),
        },
        Err(err) => RenameResponse {
            ok: false,
            new_filename: String::new(),
            message: format!("rename_note failed: {err}"),
        },
    }
}

/// Creates an empty note under the next `New note N` title.
#[flutter_rust_bridge::frb(sync)]
pub fn create_note() -> NoteResponse {
    match with_note_service(|service| service.create_note().map_err(|err| err.to_string())) {
        Ok(note) => NoteResponse {
            ok: true,
            note: Some(note.into()),
            message: "Note created.".to_string(),
        },
        Err(err) => NoteResponse {
            ok: false,
            note: None,
            message: format!("create_note failed: {err}"),
        },
    }
}

fn action_response(
    fn_name: &str,
    success: &str,
    result: Result<(), String>,
) -> ActionResponse {
    match result {
        Ok(()) => ActionResponse {
            ok: true,
            message: success.to_string(),
        },
        Err(err) => ActionResponse {
            ok: false,
            message: format!("{fn_name} failed: {err}"),
        },
    }
}

fn with_note_service<T>(
    f: impl FnOnce(&mut NoteService) -> Result<T, String>,
) -> Result<T, String> {
    let mut guard = NOTE_CONTROLLER
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let service = guard.get_or_insert_with(|| build_note_service(resolve_settings_path()));
    f(service)
}

fn build_note_service(settings_path: Option<PathBuf>) -> NoteService {
    match settings_path {
        Some(path) => NoteService::restore(path),
        None => {
            warn!("event=controller_init module=ffi status=ok settings=disabled");
            NoteService::new(NoteStore::new())
        }
    }
}

fn resolve_settings_path() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var(SETTINGS_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    default_settings_path()
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::{
        build_note_service, choose_directory, core_version, create_note, delete_note,
        get_data_dir, get_notes, init_logging, ping, read_note, rename_note, save_note,
        set_data_dir, NOTE_CONTROLLER,
    };
    use inknote_core::NoteService;
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use tempfile::TempDir;

    static TEST_LOCK: Mutex<()> = Mutex::new(());

    struct Fixture {
        _guard: MutexGuard<'static, ()>,
        notes: TempDir,
        config: TempDir,
    }

    impl Fixture {
        fn notes_dir(&self) -> String {
            self.notes.path().to_str().expect("utf-8 temp path").to_string()
        }
    }

    fn fixture() -> Fixture {
        let guard = TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let notes = tempfile::tempdir().expect("notes dir");
        let config = tempfile::tempdir().expect("config dir");
        let service = NoteService::with_settings(config.path().join("settings.json"))
            .expect("fresh settings should load");
        *NOTE_CONTROLLER
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(service);
        Fixture {
            _guard: guard,
            notes,
            config,
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn unset_folder_lists_nothing() {
        let _fixture = fixture();
        assert_eq!(get_data_dir(), "");
        let listed = get_notes();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed.items.is_empty());
    }

    #[test]
    fn save_list_read_rename_delete_flow() {
        let fixture = fixture();
        assert_eq!(set_data_dir(fixture.notes_dir()), "");
        assert_eq!(get_data_dir(), fixture.notes_dir());

        let saved = save_note("draft.html".to_string(), "<p>hi</p>".to_string());
        assert!(saved.ok, "{}", saved.message);

        let listed = get_notes();
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].title, "draft");

        let renamed = rename_note("draft.html".to_string(), "final".to_string());
        assert!(renamed.ok, "{}", renamed.message);
        assert_eq!(renamed.new_filename, "final.html");

        let read = read_note("final.html".to_string());
        assert_eq!(read.content, "<p>hi</p>");
        assert!(!read_note("draft.html".to_string()).ok);

        assert!(delete_note("final.html".to_string()).ok);
        assert!(get_notes().items.is_empty());
    }

    #[test]
    fn failures_return_envelopes_with_function_name() {
        let fixture = fixture();
        set_data_dir(fixture.notes_dir());

        let deleted = delete_note("missing.html".to_string());
        assert!(!deleted.ok);
        assert!(deleted.message.starts_with("delete_note failed:"));

        let renamed = rename_note("missing.html".to_string(), "x".to_string());
        assert!(!renamed.ok);
        assert!(renamed.new_filename.is_empty());
    }

    #[test]
    fn choose_directory_cancel_keeps_folder() {
        let fixture = fixture();
        set_data_dir(fixture.notes_dir());

        let response = choose_directory(None);
        assert!(response.ok);
        assert_eq!(response.data_dir, "");
        assert_eq!(get_data_dir(), fixture.notes_dir());
    }

    #[test]
    fn choose_directory_selection_updates_folder() {
        let fixture = fixture();
        let response = choose_directory(Some(fixture.notes_dir()));
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.data_dir, fixture.notes_dir());
        assert_eq!(get_data_dir(), fixture.notes_dir());
    }

    #[test]
    fn create_note_returns_default_titled_note() {
        let fixture = fixture();
        set_data_dir(fixture.notes_dir());

        let first = create_note();
        assert!(first.ok, "{}", first.message);
        let second = create_note();
        let second_note = second.note.expect("second note should be created");
        assert_eq!(second_note.title, "New note 2");
        assert_eq!(read_note(second_note.filename).content, "<p></p>");
    }

    #[test]
    fn corrupt_settings_do_not_block_the_api() {
        let fixture = fixture();
        let settings_path = fixture.config.path().join("broken.json");
        std::fs::write(&settings_path, "{not json").expect("write corrupt settings");
        *NOTE_CONTROLLER
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(build_note_service(Some(
            settings_path.clone(),
        )));

        assert_eq!(get_data_dir(), "");
        assert!(get_notes().ok);

        assert_eq!(set_data_dir(fixture.notes_dir()), "");
        assert_eq!(get_data_dir(), fixture.notes_dir());
        let listed = get_notes();
        assert!(listed.ok, "{}", listed.message);

        let rewritten = std::fs::read_to_string(&settings_path).expect("settings rewritten");
        assert!(rewritten.contains("data_dir"));
    }

    #[test]
    fn set_data_dir_keeps_surrounding_spaces() {
        let fixture = fixture();
        let spaced = format!("{}/ spaced ", fixture.notes_dir());
        std::fs::create_dir(&spaced).expect("create spaced dir");

        assert_eq!(set_data_dir(spaced.clone()), "");
        assert_eq!(get_data_dir(), spaced);

        assert!(save_note("a.html".to_string(), "x".to_string()).ok);
        assert!(std::path::Path::new(&spaced).join("a.html").exists());
    }

    #[test]
    fn rename_note_accepts_blank_title() {
        let fixture = fixture();
        set_data_dir(fixture.notes_dir());
        save_note("a.html".to_string(), "x".to_string());

        let renamed = rename_note("a.html".to_string(), String::new());
        assert!(renamed.ok, "{}", renamed.message);
        assert_eq!(renamed.new_filename, ".html");
    }
}
