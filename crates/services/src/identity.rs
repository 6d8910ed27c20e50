//! # Identity Registry
//!
//! Owns user records. Ranks are derived inside `User` itself; this module
//! only decides who exists and who gets credited.

use chrono::{DateTime, Utc};
use domains::{
    Entity, ForumError, ForumEvent, NewUser, Rank, RankInfo, Result, User, UserId, UserStats,
};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Longest accepted username, in characters.
pub const MAX_USERNAME_LEN: usize = 32;

/// Read-only public projection of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
    pub bio: String,
    pub joined_at: DateTime<Utc>,
    pub stats: UserStats,
    pub rank: Rank,
    pub rank_info: RankInfo,
    pub next_rank: Option<RankInfo>,
    pub badges: Vec<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        let rank = user.rank();
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar: user.avatar.clone(),
            bio: user.bio.clone(),
            joined_at: user.joined_at,
            stats: *user.stats(),
            rank,
            rank_info: *rank.info(),
            next_rank: rank.next().map(|r| *r.info()),
            badges: user.badges().iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    /// Registration order is preserved for stable leaderboards.
    users: IndexMap<UserId, User>,
    unique_usernames: bool,
}

impl IdentityRegistry {
    pub fn new(unique_usernames: bool) -> Self {
        Self {
            users: IndexMap::new(),
            unique_usernames,
        }
    }

    /// Rebuilds a registry from stored users, re-deriving every rank.
    pub fn from_users(users: Vec<User>, unique_usernames: bool) -> Self {
        let users = users
            .into_iter()
            .map(|mut user| {
                user.recompute_rank();
                (user.id, user)
            })
            .collect();
        Self {
            users,
            unique_usernames,
        }
    }

    pub fn register(&mut self, input: NewUser, now: DateTime<Utc>) -> Result<(User, ForumEvent)> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(ForumError::validation("username cannot be empty"));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(ForumError::validation(format!(
                "username exceeds maximum length of {MAX_USERNAME_LEN} characters"
            )));
        }
        if self.unique_usernames && self.find_by_username(username).is_some() {
            warn!(username, "registration rejected: duplicate username");
            return Err(ForumError::DuplicateUsername(username.to_string()));
        }

        let user = User::new(input, now);
        let event = ForumEvent::UserRegistered {
            user_id: user.id,
            username: user.username.clone(),
        };
        info!(user_id = %user.id, username = %user.username, "user registered");
        self.users.insert(user.id, user.clone());
        Ok((user, event))
    }

    pub fn get(&self, id: UserId) -> Result<&User> {
        self.users
            .get(&id)
            .ok_or_else(|| ForumError::not_found(Entity::User, id))
    }

    pub fn get_mut(&mut self, id: UserId) -> Result<&mut User> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| ForumError::not_found(Entity::User, id))
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.users.contains_key(&id)
    }

    /// Case-insensitive lookup.
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        let username = username.trim();
        self.users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
    }

    /// Monotonic-additive; no cap.
    pub fn add_reputation(&mut self, id: UserId, amount: u64) -> Result<()> {
        self.get_mut(id)?.add_reputation(amount);
        Ok(())
    }

    /// Awards a badge. Returns an event only when the badge is new.
    pub fn add_badge(&mut self, id: UserId, badge: &str) -> Result<Option<ForumEvent>> {
        let badge = badge.trim();
        if badge.is_empty() {
            return Err(ForumError::validation("badge cannot be empty"));
        }
        let user = self.get_mut(id)?;
        if !user.add_badge(badge) {
            debug!(user_id = %id, badge, "badge already held");
            return Ok(None);
        }
        Ok(Some(ForumEvent::BadgeAwarded {
            user_id: id,
            badge: badge.to_string(),
        }))
    }

    pub fn touch(&mut self, id: UserId, now: DateTime<Utc>) -> Result<()> {
        self.get_mut(id)?.touch(now);
        Ok(())
    }

    /// Users in registration order.
    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
