//! Flat-file credential store.
//!
//! The whole username → digest mapping lives in one pretty-printed JSON
//! object. Every write replaces the file through a same-directory temp file
//! and a rename, and read-modify-write cycles are serialized by a writer lock.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// Snapshot of every user record, keyed by username.
pub type Credentials = BTreeMap<String, String>;

/// Failures while persisting the credential file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("credential serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable username → password-hash mapping backed by a single file.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted mapping.
    ///
    /// A missing file is initialized to an empty mapping on disk. Unreadable
    /// or unparseable content is logged and treated as empty.
    pub fn load(&self) -> Credentials {
        if let Some(creds) = self.read_snapshot() {
            return creds;
        }

        let _guard = self.lock_writer();
        // Another writer may have created the file while we waited.
        if let Some(creds) = self.read_snapshot() {
            return creds;
        }
        let empty = Credentials::new();
        if let Err(error) = self.write_snapshot(&empty) {
            warn!(path = %self.path.display(), %error, "could not initialize credential file");
        } else {
            debug!(path = %self.path.display(), "initialized empty credential file");
        }
        empty
    }

    /// Overwrite the persisted mapping in full.
    pub fn save(&self, creds: &Credentials) -> Result<(), StoreError> {
        let _guard = self.lock_writer();
        self.write_snapshot(creds)
    }

    /// Look up the stored digest for a username.
    pub fn lookup(&self, username: &str) -> Option<String> {
        self.load().get(username).cloned()
    }

    /// Run a read-modify-write cycle while holding the writer lock.
    ///
    /// The snapshot is saved only when `f` succeeds; an error from `f`
    /// leaves the file untouched. A file that exists but cannot be read
    /// fails the cycle with [`StoreError::Io`] instead of being replaced.
    pub fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Credentials) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.lock_writer();
        let mut creds = match self.read_raw().map_err(StoreError::Io)? {
            Some(raw) => self.parse_snapshot(&raw),
            None => Credentials::new(),
        };
        let out = f(&mut creds)?;
        self.write_snapshot(&creds)?;
        Ok(out)
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Raw file content; `Ok(None)` when the file does not exist. Invalid
    /// UTF-8 surfaces as `InvalidData`.
    fn read_raw(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `None` only when the file does not exist.
    fn read_snapshot(&self) -> Option<Credentials> {
        match self.read_raw() {
            Ok(raw) => raw.map(|raw| self.parse_snapshot(&raw)),
            Err(error) => {
                warn!(path = %self.path.display(), %error, "credential file unreadable; treating as empty");
                Some(Credentials::new())
            }
        }
    }

    /// Empty or unparseable content is an empty mapping.
    fn parse_snapshot(&self, raw: &str) -> Credentials {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Credentials::new();
        }

        match serde_json::from_str::<Credentials>(trimmed) {
            Ok(creds) => creds,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "credential file is corrupt; treating as empty");
                Credentials::new()
            }
        }
    }

    fn write_snapshot(&self, creds: &Credentials) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, creds)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}
