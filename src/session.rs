//! Local sign-in session persisted next to the favorites snapshot.

use std::fs;
use std::io;
use std::path::PathBuf;

use fitmalta_core::Session;
use thiserror::Error;

const SESSION_FILE: &str = "session.json";

/// Loads and saves the [`Session`] as `<data_dir>/session.json`.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    data_dir: PathBuf,
}

impl SessionStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    /// Loads the session. A missing file means signed out; an unreadable
    /// one is logged and also treated as signed out.
    pub fn load(&self) -> Result<Session, SessionError> {
        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(session) => Ok(session),
                Err(e) => {
                    tracing::warn!("Ignoring malformed session {}: {}", path.display(), e);
                    Ok(Session::new())
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Session::new()),
            Err(e) => Err(SessionError::Io(path, e)),
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| SessionError::Io(self.data_dir.clone(), e))?;

        let path = self.path();
        let text = serde_json::to_string_pretty(session).map_err(SessionError::Encode)?;
        fs::write(&path, text).map_err(|e| SessionError::Io(path, e))?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    #[error("Failed to encode session: {0}")]
    Encode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitmalta_core::{AuthProvider, CurrentUser, UserType};
    use tempfile::TempDir;

    fn test_storage() -> (SessionStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = SessionStorage::new(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    #[test]
    fn test_missing_session_is_signed_out() {
        let (storage, _temp) = test_storage();
        let session = storage.load().unwrap();
        assert!(!session.is_signed_in());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (storage, _temp) = test_storage();
        let mut session = Session::new();
        session.set_return_to("/workouts/push-day");
        storage.save(&session).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.return_to.as_deref(), Some("/workouts/push-day"));

        let mut loaded = loaded;
        loaded.sign_in(CurrentUser::new("Luca", UserType::Member));
        storage.save(&loaded).unwrap();

        let reloaded = storage.load().unwrap();
        assert_eq!(reloaded.current_user().unwrap().name, "Luca");
        assert!(reloaded.return_to.is_none());
    }

    #[test]
    fn test_malformed_session_is_signed_out() {
        let (storage, _temp) = test_storage();
        fs::write(storage.path(), "{ broken").unwrap();

        let session = storage.load().unwrap();
        assert!(!session.is_signed_in());
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let storage = SessionStorage::new(nested.clone());

        storage.save(&Session::new()).unwrap();
        assert!(nested.join("session.json").exists());
    }
}
