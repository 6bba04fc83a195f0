//! Durable session storage.
//!
//! The session is persisted as three independently keyed values under one
//! state directory: the access token, the refresh token, and the serialized
//! user record. Loads are best effort — a missing or unreadable value reads
//! back as absent, never as an error — while writes report failures so the
//! store can log them. The files and the in-memory session are not updated
//! transactionally; a crash between the two can leave them inconsistent.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::net::types::User;
use crate::session::store::Session;

const ACCESS_TOKEN_FILE: &str = "access_token";
const REFRESH_TOKEN_FILE: &str = "refresh_token";
const USER_FILE: &str = "user.json";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("state directory write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("user record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed session storage rooted at one state directory.
#[derive(Debug, Clone)]
pub struct SessionFile {
    dir: PathBuf,
}

impl SessionFile {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default state directory under the user's config dir.
    /// Returns `None` when the platform exposes no config dir.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("loginapp"))
    }

    /// Read whatever session was persisted by a previous process.
    /// Corrupt or missing values read as absent.
    #[must_use]
    pub fn load(&self) -> Session {
        let access_token = self.read_value(ACCESS_TOKEN_FILE);
        let refresh_token = self.read_value(REFRESH_TOKEN_FILE);
        let user: Option<User> = self
            .read_value(USER_FILE)
            .and_then(|raw| serde_json::from_str(&raw).ok());
        Session { access_token, refresh_token, user }
    }

    fn read_value(&self, name: &str) -> Option<String> {
        let raw = std::fs::read_to_string(self.dir.join(name)).ok()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(trimmed.to_owned())
    }

    /// Write both token values.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory or either file cannot be
    /// written.
    pub fn save_tokens(&self, access_token: &str, refresh_token: &str) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(ACCESS_TOKEN_FILE), access_token)?;
        std::fs::write(self.dir.join(REFRESH_TOKEN_FILE), refresh_token)?;
        Ok(())
    }

    /// Write the serialized user record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save_user(&self, user: &User) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(USER_FILE), serde_json::to_string(user)?)?;
        Ok(())
    }

    /// Remove all three persisted values. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be removed.
    pub fn clear(&self) -> Result<(), PersistError> {
        for name in [ACCESS_TOKEN_FILE, REFRESH_TOKEN_FILE, USER_FILE] {
            match std::fs::remove_file(self.dir.join(name)) {
                Ok(()) => {}
                Err(error) if error.kind() == ErrorKind::NotFound => {}
                Err(error) => return Err(error.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "persist_test.rs"]
mod tests;
