//! Filesystem-backed note store.
//!
//! # Responsibility
//! - Hold the configured notes root directory.
//! - Map list/read/save/delete/rename onto single filesystem calls.
//!
//! # Invariants
//! - The filesystem is the only source of truth; nothing is cached.
//! - Every caller-supplied filename must be one plain path component.
//! - Errors are surfaced as-is; no retries and no partial results.
//! - Listing an unset root is an empty result, not a failure.

use crate::chooser::{
    normalize_selection, ChooserError, DirectoryChooser, CHOOSE_DIRECTORY_TITLE,
};
use crate::model::note::{filename_for_title, is_note_filename, Note};
use log::{debug, info, warn};
use std::error::Error;
use std::ffi::OsStr;
use std::fmt::{Display, Formatter};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

/// Permission bits for newly created note files (umask still applies).
#[cfg(unix)]
const NOTE_FILE_MODE: u32 = 0o644;

pub type StoreResult<T> = Result<T, FilesystemError>;

/// Store operation that produced a filesystem failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    List,
    Read,
    Save,
    Delete,
    Rename,
}

impl StoreOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Read => "read",
            Self::Save => "save",
            Self::Delete => "delete",
            Self::Rename => "rename",
        }
    }
}

/// Single error type for every store operation.
///
/// Wraps the underlying `io::Error` verbatim together with the operation and
/// the path it targeted.
#[derive(Debug)]
pub struct FilesystemError {
    op: StoreOp,
    path: PathBuf,
    source: io::Error,
}

impl FilesystemError {
    fn new(op: StoreOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            op,
            path: path.into(),
            source,
        }
    }

    pub fn op(&self) -> StoreOp {
        self.op
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Kind of the underlying cause (`NotFound`, `PermissionDenied`, ...).
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

impl Display for FilesystemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} `{}` failed: {}",
            self.op.as_str(),
            self.path.display(),
            self.source
        )
    }
}

impl Error for FilesystemError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Notes directory handle.
///
/// Mutation (`set_root`, `choose_root`) needs `&mut self`, so a root change
/// can never interleave with an operation borrowing the same store.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    root: Option<PathBuf>,
}

impl NoteStore {
    /// Creates a store with no root configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let mut store = Self::new();
        store.set_root(root);
        store
    }

    /// Sets the notes root. Existence is not checked until first use.
    ///
    /// An empty path clears the root.
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        let root = root.into();
        if root.as_os_str().is_empty() {
            self.root = None;
            info!("event=root_set module=store status=ok configured=false");
            return;
        }
        info!("event=root_set module=store status=ok configured=true");
        debug!("event=root_set module=store root={}", root.display());
        self.root = Some(root);
    }

    /// Returns the configured root, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Asks `chooser` for a new root.
    ///
    /// On selection the root is replaced and returned. Cancel returns
    /// `Ok(None)` and a chooser failure is returned as-is; both leave the
    /// current root untouched.
    pub fn choose_root(
        &mut self,
        chooser: &dyn DirectoryChooser,
    ) -> Result<Option<PathBuf>, ChooserError> {
        let selection = match chooser.choose_directory(CHOOSE_DIRECTORY_TITLE) {
            Ok(selection) => normalize_selection(selection),
            Err(err) => {
                warn!("event=root_choose module=store status=error error={err}");
                return Err(err);
            }
        };

        match selection {
            Some(path) => {
                self.set_root(path.clone());
                Ok(Some(path))
            }
            None => {
                info!("event=root_choose module=store status=cancelled");
                Ok(None)
            }
        }
    }

    /// Lists note files directly under the root.
    ///
    /// Order follows directory enumeration and is not sorted. Directories,
    /// other suffixes, and non UTF-8 names are skipped.
    pub fn list(&self) -> StoreResult<Vec<Note>> {
        let Some(root) = self.root.as_deref() else {
            debug!("event=note_list module=store status=ok configured=false count=0");
            return Ok(Vec::new());
        };

        let entries = fs::read_dir(root).map_err(|err| self.fail(StoreOp::List, root, err))?;

        let mut notes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| self.fail(StoreOp::List, root, err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| self.fail(StoreOp::List, entry.path(), err))?;
            if file_type.is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                debug!("event=note_list module=store skipped=non_utf8_name");
                continue;
            };
            if !is_note_filename(&name) {
                continue;
            }
            notes.extend(Note::from_filename(name));
        }

        debug!(
            "event=note_list module=store status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    /// Reads the whole note as UTF-8 text.
    pub fn read(&self, filename: &str) -> StoreResult<String> {
        let path = self.resolve(StoreOp::Read, filename)?;
        let content =
            fs::read_to_string(&path).map_err(|err| self.fail(StoreOp::Read, &path, err))?;
        debug!(
            "event=note_read module=store status=ok bytes={}",
            content.len()
        );
        Ok(content)
    }

    /// Creates or fully overwrites the note with `content`.
    ///
    /// A failure mid-write can leave a truncated file behind.
    pub fn save(&self, filename: &str, content: &str) -> StoreResult<()> {
        let path = self.resolve(StoreOp::Save, filename)?;
        write_note_file(&path, content).map_err(|err| self.fail(StoreOp::Save, &path, err))?;
        debug!(
            "event=note_save module=store status=ok bytes={}",
            content.len()
        );
        Ok(())
    }

    /// Removes the note file. There is no undo.
    pub fn delete(&self, filename: &str) -> StoreResult<()> {
        let path = self.resolve(StoreOp::Delete, filename)?;
        fs::remove_file(&path).map_err(|err| self.fail(StoreOp::Delete, &path, err))?;
        info!("event=note_delete module=store status=ok");
        Ok(())
    }

    /// Renames `old_filename` to `new_title` + `.html` and returns the new
    /// filename.
    ///
    /// The suffix is appended verbatim. Whether an existing target is
    /// replaced is left to the platform rename.
    pub fn rename(&self, old_filename: &str, new_title: &str) -> StoreResult<String> {
        let new_filename = filename_for_title(new_title);
        let old_path = self.resolve(StoreOp::Rename, old_filename)?;
        let new_path = self.resolve(StoreOp::Rename, &new_filename)?;

        fs::rename(&old_path, &new_path)
            .map_err(|err| self.fail(StoreOp::Rename, &old_path, err))?;
        info!("event=note_rename module=store status=ok");
        Ok(new_filename)
    }

    fn resolve(&self, op: StoreOp, filename: &str) -> StoreResult<PathBuf> {
        let Some(root) = self.root.as_deref() else {
            let err = io::Error::new(
                io::ErrorKind::InvalidInput,
                "notes directory is not configured",
            );
            return Err(self.fail(op, filename, err));
        };
        check_plain_filename(filename).map_err(|err| self.fail(op, filename, err))?;
        Ok(root.join(filename))
    }

    fn fail(&self, op: StoreOp, path: impl AsRef<Path>, err: io::Error) -> FilesystemError {
        let path = path.as_ref();
        warn!(
            "event=note_{} module=store status=error error_kind={:?}",
            op.as_str(),
            err.kind()
        );
        FilesystemError::new(op, path, err)
    }
}

/// Accepts only names that stay inside the root when joined onto it.
fn check_plain_filename(filename: &str) -> io::Result<()> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == OsStr::new(filename) => Ok(()),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("`{filename}` is not a plain file name inside the notes directory"),
        )),
    }
}

fn write_note_file(path: &Path, content: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(NOTE_FILE_MODE);
    }
    let mut file = options.open(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()
}
