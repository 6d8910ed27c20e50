//! Local filesystem implementation of `SnapshotStore`.
//! One pretty-printed JSON document, replaced atomically on every save.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domains::{ForumError, ForumSnapshot, Result, SnapshotStore, SNAPSHOT_VERSION};
use tokio::fs;
use tracing::{debug, info};

pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp file, so the final rename stays on one filesystem.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn storage_err(context: &str, err: impl std::fmt::Display) -> ForumError {
    ForumError::Storage(format!("{context}: {err}"))
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn load(&self) -> Result<Option<ForumSnapshot>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot on disk");
                return Ok(None);
            }
            Err(e) => return Err(storage_err("read snapshot", e)),
        };
        let snapshot: ForumSnapshot =
            serde_json::from_slice(&bytes).map_err(|e| storage_err("decode snapshot", e))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(ForumError::Storage(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }
        info!(
            path = %self.path.display(),
            users = snapshot.users.len(),
            threads = snapshot.threads.len(),
            "snapshot loaded"
        );
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &ForumSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_err("create snapshot directory", e))?;
        }
        let bytes =
            serde_json::to_vec_pretty(snapshot).map_err(|e| storage_err("encode snapshot", e))?;

        let temp = self.temp_path();
        fs::write(&temp, &bytes)
            .await
            .map_err(|e| storage_err("write snapshot", e))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| storage_err("replace snapshot", e))?;

        info!(path = %self.path.display(), bytes = bytes.len(), "snapshot saved");
        Ok(())
    }
}
