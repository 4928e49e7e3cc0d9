// hr-client/src/session/storage.rs
// 会话持久化 - JSON 文件存储

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Session as written to disk
///
/// Every field is optional so a partially written or hand-edited file
/// still loads; completeness is checked on rehydration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

/// JSON file holding the persisted session
#[derive(Debug, Clone)]
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    pub const FILE_NAME: &'static str = "session.json";

    /// Storage at `{base_path}/session.json`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self::with_file(base_path, Self::FILE_NAME)
    }

    pub fn with_file(base_path: impl Into<PathBuf>, filename: &str) -> Self {
        Self {
            path: base_path.into().join(filename),
        }
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write via temp file + rename so a crash never leaves half a file
    pub fn save(&self, session: &PersistedSession) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(session)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }

    /// Missing or unreadable file loads as `None`
    pub fn load(&self) -> Option<PersistedSession> {
        if !self.path.exists() {
            return None;
        }
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt session file ignored");
                None
            }
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove the file; a missing file is not an error
    pub fn clear(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let storage = SessionStorage::new(dir.path().join("nested"));
        assert!(!storage.exists());
        assert!(storage.load().is_none());

        let session = PersistedSession {
            access_token: Some("t".into()),
            refresh_token: None,
            username: Some("rh".into()),
            roles: Some(vec!["RH".into()]),
        };
        storage.save(&session).unwrap();
        assert!(storage.exists());
        assert_eq!(storage.load(), Some(session));

        storage.clear().unwrap();
        assert!(!storage.exists());
        // idempotent
        storage.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = SessionStorage::new(dir.path());
        fs::write(storage.path(), "{not json").unwrap();
        assert!(storage.load().is_none());
    }
}
