use async_trait::async_trait;
use domains::{ForumSnapshot, Result, SnapshotStore};
use parking_lot::Mutex;

/// Keeps the latest snapshot in memory. Useful for tests and for
/// hosts that persist through some other channel.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    latest: Mutex<Option<ForumSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<ForumSnapshot> {
        self.latest.lock().clone()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Option<ForumSnapshot>> {
        Ok(self.latest.lock().clone())
    }

    async fn save(&self, snapshot: &ForumSnapshot) -> Result<()> {
        *self.latest.lock() = Some(snapshot.clone());
        Ok(())
    }
}
