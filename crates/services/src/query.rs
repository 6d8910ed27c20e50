//! # Query Engine
//!
//! Stateless read-side computations over a consistent `ForumState`.
//! Nothing here is cached; every call recomputes from current state.

use std::cmp::Reverse;

use chrono::{DateTime, Duration, Utc};
use domains::{Category, Result, Taxonomy, Thread, ThreadId, User, UserId};
use serde::Serialize;

use crate::identity::UserProfile;
use crate::state::ForumState;

/// `views + 3 × replies + 2 × thread reactions`.
pub fn trending_score(thread: &Thread) -> u64 {
    thread.views + 3 * thread.reply_count() as u64 + 2 * thread.reactions.total()
}

/// Active threads updated within `window` of `now`, highest score first.
/// Threads outside the window are excluded outright. Ties keep store order.
pub fn trending_threads(
    state: &ForumState,
    now: DateTime<Utc>,
    window: Duration,
    limit: usize,
) -> Vec<Thread> {
    let cutoff = now - window;
    let mut scored: Vec<(u64, &Thread)> = state
        .content()
        .active()
        .filter(|t| t.updated_at >= cutoff)
        .map(|t| (trending_score(t), t))
        .collect();
    scored.sort_by_key(|(score, _)| Reverse(*score));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, t)| t.clone())
        .collect()
}

/// Active threads, newest first.
pub fn latest_threads(state: &ForumState, limit: usize) -> Vec<Thread> {
    let mut threads: Vec<&Thread> = state.content().active().collect();
    threads.sort_by_key(|t| Reverse(t.created_at));
    threads.into_iter().take(limit).cloned().collect()
}

fn users_ranked_by<K: Ord>(
    state: &ForumState,
    limit: usize,
    key: impl Fn(&User) -> K,
) -> Vec<UserProfile> {
    let mut users: Vec<&User> = state.registry().users().collect();
    users.sort_by_key(|u| Reverse(key(u)));
    users.into_iter().take(limit).map(UserProfile::from).collect()
}

/// Users by reputation, descending.
pub fn top_contributors(state: &ForumState, limit: usize) -> Vec<UserProfile> {
    users_ranked_by(state, limit, |u| u.stats().reputation)
}

/// Users by post count, descending.
pub fn most_active_users(state: &ForumState, limit: usize) -> Vec<UserProfile> {
    users_ranked_by(state, limit, |u| u.stats().posts)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub id: ThreadId,
    pub title: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<&Thread> for ThreadSummary {
    fn from(thread: &Thread) -> Self {
        Self {
            id: thread.id,
            title: thread.title.clone(),
            author_id: thread.author_id,
            created_at: thread.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub thread_count: u64,
    pub reply_count: u64,
    pub view_count: u64,
    pub latest_thread: Option<ThreadSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryWithStats {
    #[serde(flatten)]
    pub category: Category,
    pub stats: CategoryStats,
}

/// Aggregates over the active threads of one category.
pub fn category_stats(
    state: &ForumState,
    taxonomy: &Taxonomy,
    category_id: &str,
) -> Result<CategoryStats> {
    taxonomy.validate(category_id, None)?;
    Ok(collect_category_stats(state, category_id))
}

fn collect_category_stats(state: &ForumState, category_id: &str) -> CategoryStats {
    let mut stats = CategoryStats::default();
    let mut latest: Option<&Thread> = None;
    for thread in state.content().active().filter(|t| t.category_id == category_id) {
        stats.thread_count += 1;
        stats.reply_count += thread.reply_count() as u64;
        stats.view_count += thread.views;
        // later insertion wins ties
        if latest.map_or(true, |l| thread.created_at >= l.created_at) {
            latest = Some(thread);
        }
    }
    stats.latest_thread = latest.map(ThreadSummary::from);
    stats
}

/// Every taxonomy category, in taxonomy order, with its stats.
pub fn categories_with_stats(state: &ForumState, taxonomy: &Taxonomy) -> Vec<CategoryWithStats> {
    taxonomy
        .categories()
        .iter()
        .map(|category| CategoryWithStats {
            category: category.clone(),
            stats: collect_category_stats(state, &category.id),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_threads: u64,
    pub total_replies: u64,
    pub total_users: u64,
    /// Users whose `lastActive` falls inside the online window. An
    /// estimate: it only sees activity that went through the engine.
    pub online_users: u64,
}

pub fn global_stats(
    state: &ForumState,
    now: DateTime<Utc>,
    online_window: Duration,
) -> GlobalStats {
    let cutoff = now - online_window;
    let counters = state.counters();
    GlobalStats {
        total_threads: counters.total_threads,
        total_replies: counters.total_replies,
        total_users: counters.total_users,
        online_users: state
            .registry()
            .users()
            .filter(|u| u.last_active >= cutoff)
            .count() as u64,
    }
}
