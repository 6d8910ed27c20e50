//! # services
//!
//! The forum engine: identity registry, content store, query engine and
//! the locking `ForumEngine` handle that ties them together.

pub mod content;
pub mod engine;
pub mod identity;
pub mod notify;
pub mod query;
pub mod rules;
pub mod state;

pub use content::{ContentStore, ListOptions, SortOrder, ThreadPage};
pub use engine::{Committed, ForumEngine};
pub use identity::{IdentityRegistry, UserProfile};
pub use notify::{BroadcastNotifier, LogNotifier};
pub use query::{CategoryStats, CategoryWithStats, GlobalStats, ThreadSummary};
pub use rules::{ForumRules, ReputationRules, MAX_SEARCH_RESULTS};
pub use state::ForumState;
