//! # ForumState
//!
//! The single aggregate the engine locks. Holds the identity registry, the
//! content store and the running counters, and applies every mutation that
//! spans more than one of them.
//!
//! Each mutator validates everything before touching state, so a failed
//! call leaves the aggregate exactly as it found it. Successful calls
//! return the value plus the events to relay.

use chrono::{DateTime, Utc};
use domains::{
    normalize_tags, Entity, ForumCounters, ForumError, ForumEvent, ForumSnapshot, NewThread,
    NewUser, ReactionCounts, ReactionKind, Reply, ReplyId, Result, Taxonomy, Thread,
    ThreadChange, ThreadId, ThreadStatus, User, UserId, SNAPSHOT_VERSION,
};
use tracing::{debug, info, warn};

use crate::content::ContentStore;
use crate::identity::IdentityRegistry;
use crate::rules::ForumRules;

/// A committed value and the events it produced.
pub type Applied<T> = (T, Vec<ForumEvent>);

#[derive(Debug, Clone, Default)]
pub struct ForumState {
    registry: IdentityRegistry,
    content: ContentStore,
    counters: ForumCounters,
}

impl ForumState {
    pub fn new(rules: &ForumRules) -> Self {
        Self {
            registry: IdentityRegistry::new(rules.unique_usernames),
            content: ContentStore::new(),
            counters: ForumCounters::default(),
        }
    }

    pub fn from_snapshot(snapshot: ForumSnapshot, rules: &ForumRules) -> Self {
        Self {
            registry: IdentityRegistry::from_users(snapshot.users, rules.unique_usernames),
            content: ContentStore::from_threads(snapshot.threads),
            counters: snapshot.counters,
        }
    }

    pub fn to_snapshot(&self, now: DateTime<Utc>) -> ForumSnapshot {
        ForumSnapshot {
            version: SNAPSHOT_VERSION,
            taken_at: now,
            counters: self.counters,
            users: self.registry.users().cloned().collect(),
            threads: self.content.threads().cloned().collect(),
        }
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn counters(&self) -> ForumCounters {
        self.counters
    }

    // ── Identity ────────────────────────────────────────────────────────────

    pub fn register_user(&mut self, input: NewUser, now: DateTime<Utc>) -> Result<Applied<User>> {
        let (user, event) = self.registry.register(input, now)?;
        self.counters.total_users += 1;
        Ok((user, vec![event]))
    }

    pub fn add_badge(&mut self, user_id: UserId, badge: &str) -> Result<Applied<bool>> {
        let event = self.registry.add_badge(user_id, badge)?;
        let awarded = event.is_some();
        Ok((awarded, event.into_iter().collect()))
    }

    // ── Threads ─────────────────────────────────────────────────────────────

    pub fn create_thread(
        &mut self,
        taxonomy: &Taxonomy,
        rules: &ForumRules,
        input: NewThread,
        now: DateTime<Utc>,
    ) -> Result<Applied<Thread>> {
        taxonomy
            .validate(&input.category_id, input.subcategory_id.as_deref())
            .inspect_err(|e| warn!(error = %e, "thread rejected"))?;
        self.registry.get(input.author_id)?;

        let title = input.title.trim().to_string();
        validate_title(&title, rules)?;
        validate_content(&input.content, rules)?;
        let tags = normalize_tags(input.tags);
        if tags.len() > rules.max_tags {
            return Err(ForumError::validation(format!(
                "at most {} tags are allowed",
                rules.max_tags
            )));
        }

        let thread = Thread {
            id: ThreadId::new(),
            title,
            category_id: input.category_id,
            subcategory_id: input.subcategory_id,
            author_id: input.author_id,
            content: input.content,
            tags,
            created_at: now,
            updated_at: now,
            views: 0,
            replies: Vec::new(),
            reactions: ReactionCounts::default(),
            is_pinned: false,
            is_locked: false,
            status: ThreadStatus::Active,
        };

        let author = self.registry.get_mut(thread.author_id)?;
        author.record_thread();
        author.add_reputation(rules.reputation.thread_created);
        author.touch(now);

        self.counters.total_threads += 1;
        self.content.insert(thread.clone());

        info!(
            thread_id = %thread.id,
            category = %thread.category_id,
            author_id = %thread.author_id,
            "thread created"
        );
        let event = ForumEvent::ThreadCreated {
            thread_id: thread.id,
            category_id: thread.category_id.clone(),
            author_id: thread.author_id,
        };
        Ok((thread, vec![event]))
    }

    /// Returns the thread and counts the view.
    pub fn view_thread(&mut self, id: ThreadId) -> Result<Thread> {
        let thread = self.content.get_active_mut(id)?;
        thread.views += 1;
        debug!(thread_id = %id, views = thread.views, "thread viewed");
        Ok(thread.clone())
    }

    pub fn add_reply(
        &mut self,
        rules: &ForumRules,
        thread_id: ThreadId,
        author_id: UserId,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Applied<Reply>> {
        let thread = self.content.get_active_mut(thread_id)?;
        if thread.is_locked {
            warn!(thread_id = %thread_id, author_id = %author_id, "reply rejected: thread locked");
            return Err(ForumError::ThreadLocked(thread_id.to_string()));
        }
        self.registry.get(author_id)?;
        let thread_author = thread.author_id;
        self.registry.get(thread_author)?;
        validate_content(&content, rules)?;

        // replies stay in chronological order even if the clock steps back
        let at = thread
            .replies
            .last()
            .map_or(now, |last| last.created_at.max(now));
        let reply = Reply::new(author_id, content, at);
        thread.replies.push(reply.clone());
        thread.updated_at = thread.updated_at.max(at);

        let author = self.registry.get_mut(author_id)?;
        author.record_reply();
        author.add_reputation(rules.reputation.reply_created);
        author.touch(now);
        if thread_author != author_id {
            self.registry
                .add_reputation(thread_author, rules.reputation.engagement)?;
        }
        self.counters.total_replies += 1;

        info!(
            thread_id = %thread_id,
            reply_id = %reply.id,
            author_id = %author_id,
            "reply created"
        );
        let event = ForumEvent::ReplyCreated {
            thread_id,
            reply_id: reply.id,
            author_id,
        };
        Ok((reply, vec![event]))
    }

    /// Increments a reaction counter on the thread or one of its replies.
    ///
    /// Unknown reaction names are accepted and change nothing; the returned
    /// kind is `None` in that case.
    pub fn add_reaction(
        &mut self,
        thread_id: ThreadId,
        reaction: &str,
        reply_id: Option<ReplyId>,
        reactor: Option<UserId>,
        now: DateTime<Utc>,
    ) -> Result<Applied<Option<ReactionKind>>> {
        let thread = self.content.get_active_mut(thread_id)?;
        if let Some(reply_id) = reply_id {
            if thread.reply(reply_id).is_none() {
                return Err(ForumError::not_found(Entity::Reply, reply_id));
            }
        }
        if let Some(user_id) = reactor {
            self.registry.get(user_id)?;
        }

        let Some(kind) = ReactionKind::from_name(reaction) else {
            debug!(thread_id = %thread_id, reaction, "ignoring unknown reaction");
            return Ok((None, Vec::new()));
        };

        match reply_id {
            Some(id) => {
                if let Some(reply) = thread.reply_mut(id) {
                    reply.reactions.increment(kind);
                }
            }
            None => thread.reactions.increment(kind),
        }

        if let Some(user_id) = reactor {
            let user = self.registry.get_mut(user_id)?;
            user.record_reaction_given();
            user.touch(now);
        }

        debug!(thread_id = %thread_id, reply_id = ?reply_id, reaction = %kind, "reaction added");
        let event = ForumEvent::ReactionAdded {
            thread_id,
            reply_id,
            reaction_type: kind,
        };
        Ok((Some(kind), vec![event]))
    }

    // ── Moderation ──────────────────────────────────────────────────────────

    pub fn set_pinned(&mut self, thread_id: ThreadId, pinned: bool) -> Result<Applied<Thread>> {
        self.moderate(thread_id, ThreadChange::Pinned(pinned))
    }

    pub fn set_locked(&mut self, thread_id: ThreadId, locked: bool) -> Result<Applied<Thread>> {
        self.moderate(thread_id, ThreadChange::Locked(locked))
    }

    /// Soft removal; the thread stays in storage with status `REMOVED`.
    pub fn remove_thread(&mut self, thread_id: ThreadId) -> Result<Applied<Thread>> {
        self.moderate(thread_id, ThreadChange::Removed)
    }

    fn moderate(&mut self, thread_id: ThreadId, change: ThreadChange) -> Result<Applied<Thread>> {
        let thread = self.content.get_active_mut(thread_id)?;
        match change {
            ThreadChange::Pinned(pinned) => thread.is_pinned = pinned,
            ThreadChange::Locked(locked) => thread.is_locked = locked,
            ThreadChange::Removed => thread.status = ThreadStatus::Removed,
        }
        info!(thread_id = %thread_id, change = ?change, "thread moderated");
        Ok((
            thread.clone(),
            vec![ForumEvent::ThreadUpdated { thread_id, change }],
        ))
    }

    /// Marks one reply as the accepted answer, clearing any previous one.
    pub fn mark_answer(
        &mut self,
        thread_id: ThreadId,
        reply_id: ReplyId,
    ) -> Result<Applied<Reply>> {
        let thread = self.content.get_active_mut(thread_id)?;
        if thread.reply(reply_id).is_none() {
            return Err(ForumError::not_found(Entity::Reply, reply_id));
        }
        let mut accepted = None;
        for reply in &mut thread.replies {
            reply.is_answer = reply.id == reply_id;
            if reply.is_answer {
                accepted = Some(reply.clone());
            }
        }
        let reply = accepted.ok_or_else(|| ForumError::not_found(Entity::Reply, reply_id))?;
        Ok((reply, vec![ForumEvent::ReplyAnswered { thread_id, reply_id }]))
    }
}

fn validate_title(title: &str, rules: &ForumRules) -> Result<()> {
    if title.is_empty() {
        return Err(ForumError::validation("thread title cannot be empty"));
    }
    if title.chars().count() > rules.max_title_len {
        return Err(ForumError::validation(format!(
            "thread title exceeds maximum length of {} characters",
            rules.max_title_len
        )));
    }
    Ok(())
}

fn validate_content(content: &str, rules: &ForumRules) -> Result<()> {
    if content.trim().is_empty() {
        return Err(ForumError::validation("content cannot be empty"));
    }
    if content.len() > rules.max_content_len {
        return Err(ForumError::validation(format!(
            "content exceeds maximum size of {} bytes",
            rules.max_content_len
        )));
    }
    Ok(())
}
