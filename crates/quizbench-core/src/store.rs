//! JSON persistence for result documents.
//!
//! The runner writes a document once with [`ResultDocument::write_new`]. The
//! editor overwrites it with [`ResultDocument::save_with_backup`], which moves
//! the previous file to a `.bak` sibling first and puts it back if the write
//! fails.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{PersistenceError, RestoreOutcome};
use crate::model::ResultDocument;

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Where the previous version was moved, if there was one.
    pub backup: Option<PathBuf>,
}

/// `run.json` -> `run.json.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

impl ResultDocument {
    /// Load a result document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        let content = std::fs::read_to_string(path).map_err(|source| PersistenceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| PersistenceError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize as pretty JSON with four-space indentation.
    pub fn to_json(&self) -> Result<Vec<u8>, PersistenceError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser).map_err(PersistenceError::Encode)?;
        Ok(buf)
    }

    /// Write the document to a fresh path, creating parent directories.
    pub fn write_new(&self, path: &Path) -> Result<(), PersistenceError> {
        let json = self.to_json()?;
        let write_err = |source: io::Error| PersistenceError::Write {
            path: path.to_path_buf(),
            restore: RestoreOutcome::NoBackup,
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, json).map_err(write_err)
    }

    /// Overwrite `path`, keeping the previous version as a `.bak` sibling.
    pub fn save_with_backup(&self, path: &Path) -> Result<SaveOutcome, PersistenceError> {
        self.save_with_backup_using(path, |p, bytes| std::fs::write(p, bytes))
    }

    pub(crate) fn save_with_backup_using<F>(
        &self,
        path: &Path,
        write: F,
    ) -> Result<SaveOutcome, PersistenceError>
    where
        F: FnOnce(&Path, &[u8]) -> io::Result<()>,
    {
        let json = self.to_json()?;
        let backup = make_backup(path);

        match write(path, &json) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "saved result document");
                Ok(SaveOutcome { backup })
            }
            Err(source) => {
                let restore = match &backup {
                    Some(bak) => restore_backup(path, bak),
                    None => RestoreOutcome::NoBackup,
                };
                Err(PersistenceError::Write {
                    path: path.to_path_buf(),
                    restore,
                    source,
                })
            }
        }
    }
}

/// Move an existing file aside. A failure here is logged and the save goes on.
fn make_backup(path: &Path) -> Option<PathBuf> {
    if !path.exists() {
        return None;
    }

    let bak = backup_path(path);
    if bak.exists() {
        if let Err(e) = std::fs::remove_file(&bak) {
            tracing::warn!(backup = %bak.display(), "could not remove old backup: {e}");
            return None;
        }
    }

    match std::fs::rename(path, &bak) {
        Ok(()) => {
            tracing::info!(backup = %bak.display(), "backup of previous version created");
            Some(bak)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "could not create backup: {e}");
            None
        }
    }
}

fn restore_backup(path: &Path, bak: &Path) -> RestoreOutcome {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            return RestoreOutcome::Failed(format!("could not remove partial file: {e}"));
        }
    }
    match std::fs::rename(bak, path) {
        Ok(()) => {
            tracing::warn!(path = %path.display(), "restored from backup after failed save");
            RestoreOutcome::Restored
        }
        Err(e) => RestoreOutcome::Failed(e.to_string()),
    }
}
