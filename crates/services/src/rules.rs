//! Tunable limits and reputation awards the engine enforces.

use chrono::Duration;

/// Hard ceiling on search results, whatever `search_limit` says.
pub const MAX_SEARCH_RESULTS: usize = 50;

/// Reputation granted per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReputationRules {
    /// Granted to the author of a new thread.
    pub thread_created: u64,
    /// Granted to the author of a new reply.
    pub reply_created: u64,
    /// Granted to a thread author when someone else replies.
    pub engagement: u64,
}

impl Default for ReputationRules {
    fn default() -> Self {
        Self {
            thread_created: 5,
            reply_created: 1,
            engagement: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumRules {
    pub default_page_size: usize,
    pub max_page_size: usize,
    /// Capped at [`MAX_SEARCH_RESULTS`].
    pub search_limit: usize,
    pub trending_window: Duration,
    pub online_window: Duration,
    pub unique_usernames: bool,
    pub max_title_len: usize,
    pub max_content_len: usize,
    pub max_tags: usize,
    pub reputation: ReputationRules,
}

impl Default for ForumRules {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            search_limit: 50,
            trending_window: Duration::hours(24),
            online_window: Duration::minutes(15),
            unique_usernames: true,
            max_title_len: 200,
            max_content_len: 100 * 1024,
            max_tags: 10,
            reputation: ReputationRules::default(),
        }
    }
}
