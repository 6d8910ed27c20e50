//! # ForumEngine
//!
//! Shared handle over a single `ForumState`. Every mutation, including the
//! view counter bump in `get_thread`, runs under the write lock from start
//! to finish, so readers never see a reply without its stat updates.
//! Aggregate reads run under the read lock against a consistent state.
//!
//! Events are dispatched to the notifier after the lock is released.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    Clock, Entity, EventNotifier, ForumError, ForumEvent, ForumSnapshot, NewThread, NewUser,
    ReactionKind, Reply, ReplyId, Result, SnapshotStore, SystemClock, Taxonomy, Thread, ThreadId,
    User, UserId,
};
use parking_lot::RwLock;
use tracing::info;

use crate::content::{ListOptions, ThreadPage};
use crate::identity::UserProfile;
use crate::query::{self, CategoryStats, CategoryWithStats, GlobalStats};
use crate::rules::{ForumRules, MAX_SEARCH_RESULTS};
use crate::state::{Applied, ForumState};

/// Result of a committed mutation together with the events it emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<T> {
    pub value: T,
    pub events: Vec<ForumEvent>,
}

pub struct ForumEngine {
    state: RwLock<ForumState>,
    taxonomy: Arc<Taxonomy>,
    rules: ForumRules,
    clock: Arc<dyn Clock>,
    notifier: Option<Arc<dyn EventNotifier>>,
}

impl ForumEngine {
    pub fn new(taxonomy: Taxonomy, rules: ForumRules) -> Self {
        Self {
            state: RwLock::new(ForumState::new(&rules)),
            taxonomy: Arc::new(taxonomy),
            rules,
            clock: Arc::new(SystemClock),
            notifier: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn EventNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn rules(&self) -> &ForumRules {
        &self.rules
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Runs `op` under the write lock, then relays its events.
    ///
    /// The clock is read after the lock is taken so commit order and
    /// timestamp order agree.
    fn commit<T>(
        &self,
        op: impl FnOnce(
            &mut ForumState,
            &Taxonomy,
            &ForumRules,
            DateTime<Utc>,
        ) -> Result<Applied<T>>,
    ) -> Result<Committed<T>> {
        let (value, events) = {
            let mut state = self.state.write();
            let now = self.now();
            op(&mut *state, &*self.taxonomy, &self.rules, now)?
        };
        if let Some(notifier) = &self.notifier {
            for event in &events {
                notifier.notify(event);
            }
        }
        Ok(Committed { value, events })
    }

    // ── Identity Registry ───────────────────────────────────────────────────

    pub fn register_user(&self, input: NewUser) -> Result<Committed<User>> {
        self.commit(|state, _, _, now| state.register_user(input, now))
    }

    pub fn get_user(&self, id: UserId) -> Result<User> {
        self.state.read().registry().get(id).cloned()
    }

    pub fn get_user_profile(&self, id: UserId) -> Result<UserProfile> {
        self.state.read().registry().get(id).map(UserProfile::from)
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.state.read().registry().find_by_username(username).cloned()
    }

    /// Returns whether the badge was newly awarded.
    pub fn add_badge(&self, user_id: UserId, badge: &str) -> Result<Committed<bool>> {
        self.commit(|state, _, _, _| state.add_badge(user_id, badge))
    }

    // ── Content Store ───────────────────────────────────────────────────────

    pub fn create_thread(&self, input: NewThread) -> Result<Committed<Thread>> {
        self.commit(|state, taxonomy, rules, now| state.create_thread(taxonomy, rules, input, now))
    }

    /// Returns the thread and increments its view counter.
    pub fn get_thread(&self, id: ThreadId) -> Result<Thread> {
        self.state.write().view_thread(id)
    }

    pub fn add_reply(
        &self,
        thread_id: ThreadId,
        author_id: UserId,
        content: impl Into<String>,
    ) -> Result<Committed<Reply>> {
        let content = content.into();
        self.commit(|state, _, rules, now| {
            state.add_reply(rules, thread_id, author_id, content, now)
        })
    }

    /// Anonymous reaction. Unknown reaction names succeed as no-ops.
    pub fn add_reaction(
        &self,
        thread_id: ThreadId,
        reaction: &str,
        reply_id: Option<ReplyId>,
    ) -> Result<Committed<Option<ReactionKind>>> {
        self.commit(|state, _, _, now| state.add_reaction(thread_id, reaction, reply_id, None, now))
    }

    /// Reaction credited to `reactor`'s `reactionsGiven`.
    pub fn add_reaction_as(
        &self,
        reactor: UserId,
        thread_id: ThreadId,
        reaction: &str,
        reply_id: Option<ReplyId>,
    ) -> Result<Committed<Option<ReactionKind>>> {
        self.commit(|state, _, _, now| {
            state.add_reaction(thread_id, reaction, reply_id, Some(reactor), now)
        })
    }

    pub fn set_pinned(&self, thread_id: ThreadId, pinned: bool) -> Result<Committed<Thread>> {
        self.commit(|state, _, _, _| state.set_pinned(thread_id, pinned))
    }

    pub fn set_locked(&self, thread_id: ThreadId, locked: bool) -> Result<Committed<Thread>> {
        self.commit(|state, _, _, _| state.set_locked(thread_id, locked))
    }

    pub fn remove_thread(&self, thread_id: ThreadId) -> Result<Committed<Thread>> {
        self.commit(|state, _, _, _| state.remove_thread(thread_id))
    }

    pub fn mark_answer(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<Committed<Reply>> {
        self.commit(|state, _, _, _| state.mark_answer(thread_id, reply_id))
    }

    pub fn list_by_category(
        &self,
        category_id: &str,
        subcategory_id: Option<&str>,
        options: ListOptions,
    ) -> Result<ThreadPage> {
        self.taxonomy.validate(category_id, subcategory_id)?;
        let limit = options
            .limit
            .unwrap_or(self.rules.default_page_size)
            .clamp(1, self.rules.max_page_size.max(1));
        Ok(self.state.read().content().list_by_category(
            category_id,
            subcategory_id,
            options.sort,
            options.page,
            limit,
        ))
    }

    /// At most `search_limit` matches, never more than
    /// [`MAX_SEARCH_RESULTS`], in store order.
    pub fn search(&self, query: &str) -> Vec<Thread> {
        let limit = self.rules.search_limit.min(MAX_SEARCH_RESULTS);
        self.state.read().content().search(query, limit)
    }

    // ── Query Engine ────────────────────────────────────────────────────────

    pub fn trending_threads(&self, limit: usize) -> Vec<Thread> {
        let now = self.now();
        query::trending_threads(&self.state.read(), now, self.rules.trending_window, limit)
    }

    pub fn latest_threads(&self, limit: usize) -> Vec<Thread> {
        query::latest_threads(&self.state.read(), limit)
    }

    pub fn top_contributors(&self, limit: usize) -> Vec<UserProfile> {
        query::top_contributors(&self.state.read(), limit)
    }

    pub fn most_active_users(&self, limit: usize) -> Vec<UserProfile> {
        query::most_active_users(&self.state.read(), limit)
    }

    pub fn category_stats(&self, category_id: &str) -> Result<CategoryStats> {
        query::category_stats(&self.state.read(), &self.taxonomy, category_id)
    }

    pub fn categories_with_stats(&self) -> Vec<CategoryWithStats> {
        query::categories_with_stats(&self.state.read(), &self.taxonomy)
    }

    pub fn global_stats(&self) -> GlobalStats {
        let now = self.now();
        query::global_stats(&self.state.read(), now, self.rules.online_window)
    }

    // ── Persistence ─────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> ForumSnapshot {
        let now = self.now();
        self.state.read().to_snapshot(now)
    }

    /// Replaces all state with `snapshot`. Threads filed under categories
    /// the taxonomy no longer knows, or written by users the snapshot does
    /// not carry, are rejected.
    pub fn restore(&self, snapshot: ForumSnapshot) -> Result<()> {
        if let Some(orphan) = snapshot
            .threads
            .iter()
            .find(|t| self.taxonomy.validate(&t.category_id, t.subcategory_id.as_deref()).is_err())
        {
            return Err(ForumError::InvalidCategory(orphan.category_id.clone()));
        }
        let known: HashSet<UserId> = snapshot.users.iter().map(|u| u.id).collect();
        let authors = snapshot.threads.iter().flat_map(|t| {
            std::iter::once(t.author_id).chain(t.replies.iter().map(|r| r.author_id))
        });
        for author in authors {
            if !known.contains(&author) {
                return Err(ForumError::not_found(Entity::User, author));
            }
        }
        let (users, threads) = (snapshot.users.len(), snapshot.threads.len());
        *self.state.write() = ForumState::from_snapshot(snapshot, &self.rules);
        info!(users, threads, "state restored from snapshot");
        Ok(())
    }

    pub async fn save_to(&self, store: &dyn SnapshotStore) -> Result<()> {
        let snapshot = self.snapshot();
        store.save(&snapshot).await
    }

    /// Restores from `store`. Returns false when the store was empty.
    pub async fn load_from(&self, store: &dyn SnapshotStore) -> Result<bool> {
        match store.load().await? {
            Some(snapshot) => {
                self.restore(snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
