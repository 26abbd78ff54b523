//! The persisted login: one JSON file holding the current [`Session`].
//!
//! Written at login, removed at logout. Its presence alone means "logged in";
//! nothing expires and nothing is checked against the store.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use stockroom_common::identity::Session;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/stockroom/session.json`.
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        base.join("stockroom").join("session.json")
    }

    pub fn at_default_location() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved session, or `None` when nobody is logged in.
    pub fn load(&self) -> Result<Option<Session>, CatalogError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };
        let session = serde_json::from_str(&data).map_err(|source| CatalogError::SessionFormat {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "loaded session");
        Ok(Some(session))
    }

    /// Write the session atomically: an owner-only temp file next to the
    /// target is renamed over it, so a crash never leaves a half-written file.
    pub fn save(&self, session: &Session) -> Result<(), CatalogError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;
        let data = serde_json::to_vec_pretty(session).map_err(|source| CatalogError::SessionFormat {
            path: self.path.clone(),
            source,
        })?;

        // NamedTempFile is created 0600 on unix.
        let mut file = NamedTempFile::new_in(dir).map_err(|source| self.io_error(source))?;
        file.write_all(&data).map_err(|source| self.io_error(source))?;
        file.as_file()
            .sync_all()
            .map_err(|source| self.io_error(source))?;
        file.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        info!(path = %self.path.display(), user = %session.id, "saved session");
        Ok(())
    }

    /// Remove the saved session. Returns whether there was one.
    pub fn clear(&self) -> Result<bool, CatalogError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "cleared session");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> CatalogError {
        CatalogError::SessionIo {
            path: self.path.clone(),
            source,
        }
    }
}
