use domains::{NewThread, NewUser, Result, ThreadId, UserId};
use services::ForumEngine;
use tracing::info;

struct Cast {
    neo: UserId,
    trinity: UserId,
    morpheus: UserId,
    oracle: UserId,
}

fn register(engine: &ForumEngine, username: &str, display_name: &str, bio: &str) -> Result<UserId> {
    let user = engine.register_user(NewUser {
        username: username.into(),
        display_name: Some(display_name.into()),
        avatar: None,
        bio: Some(bio.into()),
    })?;
    Ok(user.value.id)
}

fn thread(
    engine: &ForumEngine,
    author: UserId,
    category: &str,
    subcategory: Option<&str>,
    title: &str,
    content: &str,
    tags: &[&str],
) -> Result<ThreadId> {
    let created = engine.create_thread(NewThread {
        category_id: category.into(),
        subcategory_id: subcategory.map(Into::into),
        author_id: author,
        title: title.into(),
        content: content.into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    })?;
    Ok(created.value.id)
}

/// Fills an empty engine with a small, realistic community.
pub fn populate(engine: &ForumEngine) -> Result<()> {
    let cast = Cast {
        neo: register(engine, "neo", "Neo", "Still learning to dodge.")?,
        trinity: register(engine, "trinity", "Trinity", "Ops and infrastructure.")?,
        morpheus: register(engine, "morpheus", "Morpheus", "Community lead.")?,
        oracle: register(engine, "oracle", "The Oracle", "Knows what you'll post next.")?,
    };

    let welcome = thread(
        engine,
        cast.morpheus,
        "ANNOUNCEMENTS",
        Some("NEWS"),
        "Welcome to the community",
        "Read the guidelines, introduce yourself, and have fun.",
        &["welcome", "rules"],
    )?;
    engine.set_pinned(welcome, true)?;
    engine.set_locked(welcome, true)?;

    let guide = thread(
        engine,
        cast.oracle,
        "GAMES",
        Some("STRATEGY"),
        "Oracle strategy guide",
        "Control the centre early and never trade your bishops cheaply.",
        &["strategy", "openings"],
    )?;
    engine.add_reply(guide, cast.neo, "The bishop advice changed my games.")?;
    engine.add_reply(guide, cast.trinity, "Works in blitz too.")?;
    engine.add_reaction_as(cast.neo, guide, "fire", None)?;
    engine.add_reaction_as(cast.trinity, guide, "helpful", None)?;

    let question = thread(
        engine,
        cast.neo,
        "HELP",
        Some("QUESTIONS"),
        "How do ranks work?",
        "What do I need to reach Initiate?",
        &["ranks"],
    )?;
    let answer = engine.add_reply(
        question,
        cast.morpheus,
        "Five posts. Threads and replies both count.",
    )?;
    engine.mark_answer(question, answer.value.id)?;
    engine.add_reaction_as(cast.neo, question, "helpful", Some(answer.value.id))?;

    thread(
        engine,
        cast.trinity,
        "TECH",
        Some("AI"),
        "Local models on modest hardware",
        "Share what runs well on a laptop GPU.",
        &["ai", "hardware"],
    )?;

    for _ in 0..3 {
        engine.get_thread(guide)?;
    }
    engine.add_badge(cast.morpheus, "founder")?;
    engine.add_badge(cast.oracle, "guide-author")?;

    info!(
        users = engine.global_stats().total_users,
        threads = engine.global_stats().total_threads,
        "demo community seeded"
    );
    Ok(())
}
