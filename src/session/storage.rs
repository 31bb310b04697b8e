use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::core::{Result, SyncError};
use crate::model::{Role, User};

/// What survives a restart: the token, the user and their role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
    pub role: Role,
}

#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<StoredSession>>;
    async fn save(&self, session: &StoredSession) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<StoredSession>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> Result<Option<StoredSession>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, session: &StoredSession) -> Result<()> {
        *self.slot.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.slot.lock().await.take();
        Ok(())
    }
}

/// Session persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<StoredSession>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(SyncError::Session(format!(
                    "Failed to read session file '{}': {}",
                    self.path.display(),
                    err
                )));
            }
        };
        let session = serde_json::from_slice(&bytes)?;
        Ok(Some(session))
    }

    async fn save(&self, session: &StoredSession) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(session)?;
        atomic_write(&self.path, &bytes).await
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SyncError::Session(format!(
                "Failed to remove session file '{}': {}",
                self.path.display(),
                err
            ))),
        }
    }
}

async fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|err| {
            SyncError::Session(format!(
                "Failed to create parent directory '{}': {}",
                parent.display(),
                err
            ))
        })?;
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).await.map_err(|err| {
        SyncError::Session(format!(
            "Failed to write temp file '{}': {}",
            tmp.display(),
            err
        ))
    })?;

    fs::rename(&tmp, path).await.map_err(|err| {
        SyncError::Session(format!(
            "Failed to rename temp file '{}' -> '{}': {}",
            tmp.display(),
            path.display(),
            err
        ))
    })?;
    Ok(())
}
