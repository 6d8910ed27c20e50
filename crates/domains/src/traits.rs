//! # Core Traits (Ports)
//!
//! Collaborators the engine talks to without owning them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::events::ForumEvent;
use crate::snapshot::ForumSnapshot;

/// Relays committed events to external listeners (sockets, queues, logs).
///
/// Fire-and-forget: the engine never depends on delivery.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait EventNotifier: Send + Sync {
    fn notify(&self, event: &ForumEvent);
}

/// Durable storage for whole-engine snapshots.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns `None` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<ForumSnapshot>>;
    async fn save(&self, snapshot: &ForumSnapshot) -> Result<()>;
}

/// Source of the current time. Injected so windows can be tested.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
