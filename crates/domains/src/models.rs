//! # Domain Models
//!
//! These structs represent the core entities of the forum.
//! We use UUID v7 for time-ordered, globally unique identification.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rank::Rank;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifies a registered user.
    UserId
);
entity_id!(
    /// Identifies a thread.
    ThreadId
);
entity_id!(
    /// Identifies a reply within its thread.
    ReplyId
);

// ── Users ───────────────────────────────────────────────────────────────────

/// Activity counters. Only ever incremented by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub posts: u64,
    pub threads: u64,
    pub reactions_given: u64,
    pub reputation: u64,
}

/// Registration input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

impl NewUser {
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}

/// A registered member.
///
/// `stats` and `rank` are private: the rank is recomputed every time
/// `posts` changes, so callers go through the `record_*` methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
    pub bio: String,
    pub joined_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    stats: UserStats,
    rank: Rank,
    badges: BTreeSet<String>,
}

impl User {
    pub fn new(input: NewUser, now: DateTime<Utc>) -> Self {
        let username = input.username.trim().to_string();
        let display_name = input
            .display_name
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| username.clone());
        Self {
            id: UserId::new(),
            display_name,
            username,
            avatar: input.avatar.unwrap_or_default(),
            bio: input.bio.unwrap_or_default(),
            joined_at: now,
            last_active: now,
            stats: UserStats::default(),
            rank: Rank::Observer,
            badges: BTreeSet::new(),
        }
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn badges(&self) -> &BTreeSet<String> {
        &self.badges
    }

    /// Counts an authored thread: one thread and one post.
    pub fn record_thread(&mut self) {
        self.stats.threads += 1;
        self.stats.posts += 1;
        self.recompute_rank();
    }

    /// Counts an authored reply.
    pub fn record_reply(&mut self) {
        self.stats.posts += 1;
        self.recompute_rank();
    }

    pub fn record_reaction_given(&mut self) {
        self.stats.reactions_given += 1;
    }

    pub fn add_reputation(&mut self, amount: u64) {
        self.stats.reputation = self.stats.reputation.saturating_add(amount);
    }

    /// Returns false when the badge was already held.
    pub fn add_badge(&mut self, badge: impl Into<String>) -> bool {
        self.badges.insert(badge.into())
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_active {
            self.last_active = now;
        }
    }

    /// Re-derives `rank` from `posts`. Also used after deserialising,
    /// so a tampered snapshot cannot carry a drifted rank.
    pub fn recompute_rank(&mut self) {
        self.rank = Rank::for_posts(self.stats.posts);
    }
}

// ── Reactions ───────────────────────────────────────────────────────────────

/// The fixed set of reactions a thread or reply can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Fire,
    Helpful,
    Insightful,
    Funny,
    MindBlown,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 6] = [
        ReactionKind::Like,
        ReactionKind::Fire,
        ReactionKind::Helpful,
        ReactionKind::Insightful,
        ReactionKind::Funny,
        ReactionKind::MindBlown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Fire => "fire",
            ReactionKind::Helpful => "helpful",
            ReactionKind::Insightful => "insightful",
            ReactionKind::Funny => "funny",
            ReactionKind::MindBlown => "mind_blown",
        }
    }

    /// Case-insensitive lookup. Unknown names yield `None`, never an error.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One counter per `ReactionKind`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionCounts {
    pub like: u64,
    pub fire: u64,
    pub helpful: u64,
    pub insightful: u64,
    pub funny: u64,
    pub mind_blown: u64,
}

impl ReactionCounts {
    fn slot(&mut self, kind: ReactionKind) -> &mut u64 {
        match kind {
            ReactionKind::Like => &mut self.like,
            ReactionKind::Fire => &mut self.fire,
            ReactionKind::Helpful => &mut self.helpful,
            ReactionKind::Insightful => &mut self.insightful,
            ReactionKind::Funny => &mut self.funny,
            ReactionKind::MindBlown => &mut self.mind_blown,
        }
    }

    pub fn increment(&mut self, kind: ReactionKind) {
        *self.slot(kind) += 1;
    }

    pub fn get(&self, kind: ReactionKind) -> u64 {
        match kind {
            ReactionKind::Like => self.like,
            ReactionKind::Fire => self.fire,
            ReactionKind::Helpful => self.helpful,
            ReactionKind::Insightful => self.insightful,
            ReactionKind::Funny => self.funny,
            ReactionKind::MindBlown => self.mind_blown,
        }
    }

    pub fn total(&self) -> u64 {
        ReactionKind::ALL.iter().map(|k| self.get(*k)).sum()
    }
}

// ── Threads ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreadStatus {
    #[default]
    Active,
    /// Soft-removed by a moderator; hidden from every read path.
    Removed,
}

/// A response nested under a thread. Not addressable outside its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: ReplyId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub reactions: ReactionCounts,
    pub is_answer: bool,
}

impl Reply {
    pub fn new(author_id: UserId, content: String, now: DateTime<Utc>) -> Self {
        Self {
            id: ReplyId::new(),
            author_id,
            content,
            created_at: now,
            reactions: ReactionCounts::default(),
            is_answer: false,
        }
    }
}

/// Input for creating a thread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThread {
    pub category_id: String,
    pub subcategory_id: Option<String>,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Top-level discussion post within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: ThreadId,
    pub title: String,
    pub category_id: String,
    pub subcategory_id: Option<String>,
    pub author_id: UserId,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub views: u64,
    /// Insertion order is chronological order.
    pub replies: Vec<Reply>,
    pub reactions: ReactionCounts,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub status: ThreadStatus,
}

impl Thread {
    pub fn is_active(&self) -> bool {
        self.status == ThreadStatus::Active
    }

    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    pub fn reply(&self, id: ReplyId) -> Option<&Reply> {
        self.replies.iter().find(|r| r.id == id)
    }

    pub fn reply_mut(&mut self, id: ReplyId) -> Option<&mut Reply> {
        self.replies.iter_mut().find(|r| r.id == id)
    }

    /// Case-insensitive substring match on title, content or any tag.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Trims tags, drops empties and case-insensitive duplicates, keeps first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}
