//! # seed
//!
//! Restores the forum from its snapshot, or populates a demo community when
//! no snapshot exists yet, then reports stats and writes the snapshot back.

mod demo;

use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use configs::Settings;
use domains::Taxonomy;
use services::{ForumEngine, ForumRules, LogNotifier, ReputationRules};
use storage_adapters::JsonFileSnapshotStore;
use tracing::info;

fn forum_rules(settings: &Settings) -> ForumRules {
    let engine = &settings.engine;
    ForumRules {
        default_page_size: engine.default_page_size,
        max_page_size: engine.max_page_size,
        search_limit: engine.search_limit,
        trending_window: Duration::hours(engine.trending_window_hours),
        online_window: Duration::minutes(engine.online_window_minutes),
        unique_usernames: engine.unique_usernames,
        max_title_len: engine.max_title_len,
        max_content_len: engine.max_content_len,
        max_tags: engine.max_tags,
        reputation: ReputationRules {
            thread_created: settings.reputation.thread_created,
            reply_created: settings.reputation.reply_created,
            engagement: settings.reputation.engagement,
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    configs::init_tracing("seed", &settings.logging);

    let engine = ForumEngine::new(Taxonomy::builtin(), forum_rules(&settings))
        .with_notifier(Arc::new(LogNotifier));
    let store = JsonFileSnapshotStore::new(&settings.storage.snapshot_path);

    if engine.load_from(&store).await? {
        info!(path = %store.path().display(), "existing community restored");
    } else {
        demo::populate(&engine).context("seeding demo community")?;
    }

    let stats = engine.global_stats();
    info!(
        threads = stats.total_threads,
        replies = stats.total_replies,
        users = stats.total_users,
        online = stats.online_users,
        "global stats"
    );
    for category in engine.categories_with_stats() {
        info!(
            category = %category.category.id,
            threads = category.stats.thread_count,
            replies = category.stats.reply_count,
            views = category.stats.view_count,
            "category"
        );
    }
    for (position, thread) in engine.trending_threads(5).iter().enumerate() {
        info!(position = position + 1, title = %thread.title, views = thread.views, "trending");
    }
    for profile in engine.top_contributors(3) {
        info!(
            username = %profile.username,
            reputation = profile.stats.reputation,
            rank = profile.rank_info.title,
            "top contributor"
        );
    }

    engine.save_to(&store).await?;
    Ok(())
}
