//! # Forum Events
//!
//! Events are pure data emitted after each committed mutation.
//! Mutating operations return them to the caller; relaying them to
//! listeners is the job of an `EventNotifier`.

use serde::{Deserialize, Serialize};

use crate::models::{ReactionKind, ReplyId, ThreadId, UserId};

/// Moderation change applied to a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadChange {
    Pinned(bool),
    Locked(bool),
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum ForumEvent {
    #[serde(rename = "user:registered")]
    UserRegistered { user_id: UserId, username: String },

    #[serde(rename = "thread:created")]
    ThreadCreated {
        thread_id: ThreadId,
        category_id: String,
        author_id: UserId,
    },

    #[serde(rename = "reply:created")]
    ReplyCreated {
        thread_id: ThreadId,
        reply_id: ReplyId,
        author_id: UserId,
    },

    #[serde(rename = "reaction:added")]
    ReactionAdded {
        thread_id: ThreadId,
        #[serde(skip_serializing_if = "Option::is_none")]
        reply_id: Option<ReplyId>,
        reaction_type: ReactionKind,
    },

    #[serde(rename = "thread:updated")]
    ThreadUpdated { thread_id: ThreadId, change: ThreadChange },

    #[serde(rename = "reply:answered")]
    ReplyAnswered { thread_id: ThreadId, reply_id: ReplyId },

    #[serde(rename = "badge:awarded")]
    BadgeAwarded { user_id: UserId, badge: String },
}

impl ForumEvent {
    /// Wire name of the event, e.g. `thread:created`.
    pub fn name(&self) -> &'static str {
        match self {
            ForumEvent::UserRegistered { .. } => "user:registered",
            ForumEvent::ThreadCreated { .. } => "thread:created",
            ForumEvent::ReplyCreated { .. } => "reply:created",
            ForumEvent::ReactionAdded { .. } => "reaction:added",
            ForumEvent::ThreadUpdated { .. } => "thread:updated",
            ForumEvent::ReplyAnswered { .. } => "reply:answered",
            ForumEvent::BadgeAwarded { .. } => "badge:awarded",
        }
    }

    /// JSON form handed to transports.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_name_and_camel_case_payload() {
        let thread_id = ThreadId::new();
        let event = ForumEvent::ReactionAdded {
            thread_id,
            reply_id: None,
            reaction_type: ReactionKind::Fire,
        };
        let json = event.to_json().unwrap();
        assert_eq!(json["event"], "reaction:added");
        assert_eq!(json["threadId"], thread_id.to_string());
        assert_eq!(json["reactionType"], "fire");
        assert!(json.get("replyId").is_none());
        assert_eq!(event.name(), "reaction:added");
    }

    #[test]
    fn every_event_serializes_under_its_name() {
        let (user_id, thread_id, reply_id) = (UserId::new(), ThreadId::new(), ReplyId::new());
        let events = [
            ForumEvent::UserRegistered {
                user_id,
                username: "neo".into(),
            },
            ForumEvent::ThreadCreated {
                thread_id,
                category_id: "GAMES".into(),
                author_id: user_id,
            },
            ForumEvent::ReplyCreated {
                thread_id,
                reply_id,
                author_id: user_id,
            },
            ForumEvent::ReactionAdded {
                thread_id,
                reply_id: Some(reply_id),
                reaction_type: ReactionKind::Helpful,
            },
            ForumEvent::ThreadUpdated {
                thread_id,
                change: ThreadChange::Locked(true),
            },
            ForumEvent::ReplyAnswered {
                thread_id,
                reply_id,
            },
            ForumEvent::BadgeAwarded {
                user_id,
                badge: "founder".into(),
            },
        ];
        for event in &events {
            let json = event.to_json().unwrap();
            assert_eq!(json["event"], event.name());
        }
    }
}
