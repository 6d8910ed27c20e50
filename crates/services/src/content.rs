//! # Content Store
//!
//! Owns threads together with their embedded replies and reactions.
//! Mutations that also touch users live on `ForumState`; this module holds
//! storage plus the content-only reads (category listing and search).

use std::cmp::Reverse;

use domains::{Entity, ForumError, Result, Thread, ThreadId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordering applied before pinned threads are lifted to the front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// `createdAt` descending.
    Newest,
    /// `views` descending.
    Popular,
    /// `updatedAt` descending.
    #[default]
    Active,
}

impl SortOrder {
    /// Unknown names fall back to `None`; callers usually default to `Active`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "newest" => Some(SortOrder::Newest),
            "popular" => Some(SortOrder::Popular),
            "active" => Some(SortOrder::Active),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    pub sort: SortOrder,
    /// 1-indexed.
    pub page: usize,
    /// Falls back to the configured default page size.
    pub limit: Option<usize>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort: SortOrder::Active,
            page: 1,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPage {
    pub threads: Vec<Thread>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    /// Insertion order is the "natural store order" used by search and ties.
    threads: IndexMap<ThreadId, Thread>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_threads(threads: Vec<Thread>) -> Self {
        Self {
            threads: threads.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub fn insert(&mut self, thread: Thread) {
        self.threads.insert(thread.id, thread);
    }

    /// Any thread regardless of status.
    pub fn get(&self, id: ThreadId) -> Option<&Thread> {
        self.threads.get(&id)
    }

    /// An `ACTIVE` thread; removed threads report `NotFound`.
    pub fn get_active(&self, id: ThreadId) -> Result<&Thread> {
        self.threads
            .get(&id)
            .filter(|t| t.is_active())
            .ok_or_else(|| ForumError::not_found(Entity::Thread, id))
    }

    pub fn get_active_mut(&mut self, id: ThreadId) -> Result<&mut Thread> {
        self.threads
            .get_mut(&id)
            .filter(|t| t.is_active())
            .ok_or_else(|| ForumError::not_found(Entity::Thread, id))
    }

    /// Every thread in store order, including removed ones.
    pub fn threads(&self) -> impl Iterator<Item = &Thread> {
        self.threads.values()
    }

    /// `ACTIVE` threads in store order.
    pub fn active(&self) -> impl Iterator<Item = &Thread> {
        self.threads.values().filter(|t| t.is_active())
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Sorted, pin-first, paginated slice of a category's active threads.
    ///
    /// `limit` is the resolved page size; zero is treated as one.
    pub fn list_by_category(
        &self,
        category_id: &str,
        subcategory_id: Option<&str>,
        sort: SortOrder,
        page: usize,
        limit: usize,
    ) -> ThreadPage {
        let mut matching: Vec<&Thread> = self
            .active()
            .filter(|t| t.category_id == category_id)
            .filter(|t| subcategory_id.map_or(true, |s| t.subcategory_id.as_deref() == Some(s)))
            .collect();

        match sort {
            SortOrder::Newest => matching.sort_by_key(|t| Reverse(t.created_at)),
            SortOrder::Popular => matching.sort_by_key(|t| Reverse(t.views)),
            SortOrder::Active => matching.sort_by_key(|t| Reverse(t.updated_at)),
        }
        // stable: keeps the sort order inside each group
        matching.sort_by_key(|t| !t.is_pinned);

        let total = matching.len();
        let limit = limit.max(1);
        let page = page.max(1);
        let threads = matching
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect();

        ThreadPage {
            threads,
            total,
            page,
            total_pages: total.div_ceil(limit),
        }
    }

    /// Case-insensitive substring search over title, content and tags.
    /// Blank queries match nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Thread> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.active()
            .filter(|t| t.matches(&needle))
            .take(limit)
            .cloned()
            .collect()
    }
}
