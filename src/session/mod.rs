//! Persisted session state.
//!
//! The live transport reads the bearer token from here. Values are stored as a
//! small JSON object under fixed keys, either in a file or in memory.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "livego_token";
/// Storage key for the current-user object.
pub const USER_KEY: &str = "livego_user";

/// Errors raised by the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt session file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },
}

/// Key/value session storage.
pub struct SessionStore {
    path: Option<PathBuf>,
    values: RwLock<Map<String, Value>>,
}

impl SessionStore {
    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: RwLock::new(Map::new()),
        }
    }

    /// Open (or lazily create) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str(&content).map_err(|e| SessionError::Corrupt {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path: Some(path),
            values: RwLock::new(values),
        })
    }

    pub fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY)
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        self.set(TOKEN_KEY, Value::String(token.to_string()))
    }

    pub fn user(&self) -> Option<Value> {
        self.get(USER_KEY)
    }

    pub fn set_user(&self, user: Value) -> Result<(), SessionError> {
        self.set(USER_KEY, user)
    }

    /// Remove token and user.
    pub fn clear(&self) -> Result<(), SessionError> {
        {
            let mut values = self.write();
            values.remove(TOKEN_KEY);
            values.remove(USER_KEY);
        }
        self.persist()
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SessionError> {
        self.write().insert(key.to_string(), value);
        self.persist()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Map<String, Value>> {
        self.values.write().unwrap_or_else(|p| p.into_inner())
    }

    fn persist(&self) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = {
            let values = self.values.read().unwrap_or_else(|p| p.into_inner());
            serde_json::to_string_pretty(&*values).map_err(|e| SessionError::Corrupt {
                path: path.clone(),
                message: e.to_string(),
            })?
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
