//! # ForumSnapshot
//!
//! Point-in-time copy of the whole engine state, handed to a
//! `SnapshotStore` for durable storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Thread, User};

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Running totals. These only grow, even when threads are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumCounters {
    pub total_threads: u64,
    pub total_replies: u64,
    pub total_users: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumSnapshot {
    pub version: u32,
    pub taken_at: DateTime<Utc>,
    pub counters: ForumCounters,
    /// Registration order.
    pub users: Vec<User>,
    /// Creation order.
    pub threads: Vec<Thread>,
}
