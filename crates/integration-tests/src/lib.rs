//! Shared fixtures for the cross-crate test suites in `tests/`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use domains::{Clock, NewThread, NewUser, Taxonomy, ThreadId, UserId};
use parking_lot::Mutex;
use services::{ForumEngine, ForumRules};

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

pub fn engine() -> ForumEngine {
    ForumEngine::new(Taxonomy::builtin(), ForumRules::default())
}

pub fn engine_with_clock(clock: Arc<ManualClock>) -> ForumEngine {
    engine().with_clock(clock)
}

pub fn user(engine: &ForumEngine, username: &str) -> UserId {
    engine
        .register_user(NewUser::named(username))
        .expect("register user")
        .value
        .id
}

pub fn new_thread(category: &str, author: UserId, title: &str) -> NewThread {
    NewThread {
        category_id: category.into(),
        author_id: author,
        title: title.into(),
        content: format!("Body of {title}"),
        ..NewThread::default()
    }
}

pub fn thread(engine: &ForumEngine, category: &str, author: UserId, title: &str) -> ThreadId {
    engine
        .create_thread(new_thread(category, author, title))
        .expect("create thread")
        .value
        .id
}
