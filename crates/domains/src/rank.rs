//! # Rank
//!
//! Tier labels derived from a user's cumulative post count.
//! A rank is never stored independently of `posts`; it is always
//! recomputed from the threshold table below.

use serde::{Deserialize, Serialize};

/// Rank tiers in ascending order of required posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Observer,
    Initiate,
    Awakened,
    Architect,
    Oracle,
    Elder,
    Divine,
}

/// Presentation metadata attached to each rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankInfo {
    pub rank: Rank,
    pub title: &'static str,
    pub min_posts: u64,
    pub color: &'static str,
    pub icon: &'static str,
}

const RANK_TABLE: [RankInfo; 7] = [
    RankInfo {
        rank: Rank::Observer,
        title: "Observer",
        min_posts: 0,
        color: "#8a8f98",
        icon: "👁",
    },
    RankInfo {
        rank: Rank::Initiate,
        title: "Initiate",
        min_posts: 5,
        color: "#4fc3f7",
        icon: "🔹",
    },
    RankInfo {
        rank: Rank::Awakened,
        title: "Awakened",
        min_posts: 25,
        color: "#66bb6a",
        icon: "✦",
    },
    RankInfo {
        rank: Rank::Architect,
        title: "Architect",
        min_posts: 100,
        color: "#ffa726",
        icon: "⬢",
    },
    RankInfo {
        rank: Rank::Oracle,
        title: "Oracle",
        min_posts: 500,
        color: "#ab47bc",
        icon: "◈",
    },
    RankInfo {
        rank: Rank::Elder,
        title: "Elder",
        min_posts: 1000,
        color: "#ef5350",
        icon: "✶",
    },
    RankInfo {
        rank: Rank::Divine,
        title: "Divine",
        min_posts: 5000,
        color: "#ffd700",
        icon: "☀",
    },
];

impl Rank {
    /// All ranks, lowest first.
    pub const ALL: [Rank; 7] = [
        Rank::Observer,
        Rank::Initiate,
        Rank::Awakened,
        Rank::Architect,
        Rank::Oracle,
        Rank::Elder,
        Rank::Divine,
    ];

    /// Highest rank whose threshold does not exceed `posts`.
    pub fn for_posts(posts: u64) -> Rank {
        RANK_TABLE
            .iter()
            .rev()
            .find(|info| info.min_posts <= posts)
            .map(|info| info.rank)
            .unwrap_or(Rank::Observer)
    }

    pub fn info(self) -> &'static RankInfo {
        &RANK_TABLE[self as usize]
    }

    pub fn min_posts(self) -> u64 {
        self.info().min_posts
    }

    /// The next tier up, if any.
    pub fn next(self) -> Option<Rank> {
        Rank::ALL.get(self as usize + 1).copied()
    }
}
