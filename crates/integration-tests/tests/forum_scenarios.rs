use chrono::{Duration, Utc};
use domains::{Entity, ForumError, ForumEvent, NewThread, ReactionKind, ThreadId};
use integration_tests::{engine, engine_with_clock, new_thread, thread, user, ManualClock};
use services::{ListOptions, SortOrder};

#[test]
fn unknown_category_is_rejected_and_store_unchanged() {
    let engine = engine();
    let author = user(&engine, "neo");

    let err = engine
        .create_thread(new_thread("NOPE", author, "lost"))
        .unwrap_err();

    assert_eq!(err, ForumError::InvalidCategory("NOPE".into()));
    assert_eq!(engine.global_stats().total_threads, 0);
    assert!(engine.latest_threads(10).is_empty());
    assert_eq!(engine.get_user(author).unwrap().stats().posts, 0);
}

#[test]
fn subcategory_must_belong_to_category() {
    let engine = engine();
    let author = user(&engine, "neo");

    let wrong = NewThread {
        subcategory_id: Some("AI".into()),
        ..new_thread("GAMES", author, "misfiled")
    };
    assert!(matches!(
        engine.create_thread(wrong),
        Err(ForumError::InvalidCategory(_))
    ));

    let right = NewThread {
        subcategory_id: Some("STRATEGY".into()),
        ..new_thread("GAMES", author, "filed")
    };
    let created = engine.create_thread(right).unwrap().value;
    assert_eq!(created.subcategory_id.as_deref(), Some("STRATEGY"));
}

#[test]
fn second_page_of_twenty_five_holds_five() {
    let clock = ManualClock::starting_at(Utc::now());
    let engine = engine_with_clock(clock.clone());
    let author = user(&engine, "neo");
    for i in 0..25 {
        thread(&engine, "GAMES", author, &format!("thread {i}"));
        clock.advance(Duration::seconds(1));
    }

    let page = engine
        .list_by_category(
            "GAMES",
            None,
            ListOptions {
                sort: SortOrder::Newest,
                page: 2,
                limit: Some(20),
            },
        )
        .unwrap();

    assert_eq!(page.threads.len(), 5);
    assert_eq!(page.total, 25);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page, 2);
    // newest first, so the second page holds the five oldest
    assert_eq!(page.threads[0].title, "thread 4");
    assert_eq!(page.threads[4].title, "thread 0");
}

#[test]
fn listing_defaults_to_active_sort_and_twenty_per_page() {
    let clock = ManualClock::starting_at(Utc::now());
    let engine = engine_with_clock(clock.clone());
    let author = user(&engine, "neo");
    let old = thread(&engine, "GAMES", author, "old");
    for i in 0..21 {
        clock.advance(Duration::seconds(1));
        thread(&engine, "GAMES", author, &format!("filler {i}"));
    }
    clock.advance(Duration::seconds(1));
    engine.add_reply(old, author, "bump").unwrap();

    let page = engine
        .list_by_category("GAMES", None, ListOptions::default())
        .unwrap();

    assert_eq!(page.threads.len(), 20);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.threads[0].id, old);
}

#[test]
fn listing_filters_by_subcategory() {
    let engine = engine();
    let author = user(&engine, "neo");
    engine
        .create_thread(NewThread {
            subcategory_id: Some("GUIDES".into()),
            ..new_thread("GAMES", author, "guide")
        })
        .unwrap();
    thread(&engine, "GAMES", author, "general");

    let page = engine
        .list_by_category("GAMES", Some("GUIDES"), ListOptions::default())
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.threads[0].title, "guide");
}

#[test]
fn search_matches_title_and_tags_case_insensitively() {
    let engine = engine();
    let author = user(&engine, "neo");
    engine
        .create_thread(NewThread {
            tags: vec!["strategy".into()],
            content: "Open with the knight.".into(),
            ..new_thread("GAMES", author, "Oracle strategy guide")
        })
        .unwrap();
    engine
        .create_thread(NewThread {
            tags: vec!["Strategy".into()],
            content: "Nothing to see.".into(),
            ..new_thread("GAMES", author, "Weekly tips")
        })
        .unwrap();
    thread(&engine, "TECH", author, "Unrelated");

    let by_title = engine.search("oracle");
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].title, "Oracle strategy guide");

    let by_tag = engine.search("STRATEGY");
    let titles: Vec<_> = by_tag.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Oracle strategy guide", "Weekly tips"]);

    assert!(engine.search("knight").iter().any(|t| t.title.starts_with("Oracle")));
}

#[test]
fn search_is_capped_at_fifty() {
    let engine = engine();
    let author = user(&engine, "neo");
    for i in 0..55 {
        thread(&engine, "GENERAL", author, &format!("match {i}"));
    }
    let results = engine.search("MATCH");
    assert_eq!(results.len(), 50);
    assert_eq!(results[0].title, "match 0");
}

#[test]
fn unknown_reaction_is_a_silent_no_op() {
    let engine = engine();
    let author = user(&engine, "neo");
    let id = thread(&engine, "GAMES", author, "react to me");
    let before = engine.snapshot();

    let outcome = engine.add_reaction(id, "unknown_kind", None).unwrap();

    assert_eq!(outcome.value, None);
    assert!(outcome.events.is_empty());
    assert_eq!(engine.snapshot().threads, before.threads);
    assert_eq!(engine.snapshot().users, before.users);
}

#[test]
fn reactions_on_missing_targets_are_not_found() {
    let engine = engine();
    let author = user(&engine, "neo");
    let id = thread(&engine, "GAMES", author, "t");

    assert!(engine
        .add_reaction(ThreadId::new(), "fire", None)
        .unwrap_err()
        .is_not_found(Entity::Thread));
    assert!(engine
        .add_reaction(id, "fire", Some(domains::ReplyId::new()))
        .unwrap_err()
        .is_not_found(Entity::Reply));
}

#[test]
fn reaction_emits_event_and_counts() {
    let engine = engine();
    let author = user(&engine, "neo");
    let id = thread(&engine, "GAMES", author, "t");

    let outcome = engine.add_reaction(id, "Fire", None).unwrap();

    assert_eq!(outcome.value, Some(ReactionKind::Fire));
    assert_eq!(
        outcome.events,
        vec![ForumEvent::ReactionAdded {
            thread_id: id,
            reply_id: None,
            reaction_type: ReactionKind::Fire,
        }]
    );
    assert_eq!(engine.get_thread(id).unwrap().reactions.fire, 1);
}

#[test]
fn get_thread_counts_each_view() {
    let engine = engine();
    let author = user(&engine, "neo");
    let id = thread(&engine, "GAMES", author, "t");

    assert_eq!(engine.get_thread(id).unwrap().views, 1);
    assert_eq!(engine.get_thread(id).unwrap().views, 2);
    assert_eq!(engine.get_thread(id).unwrap().views, 3);
    assert!(engine
        .get_thread(ThreadId::new())
        .unwrap_err()
        .is_not_found(Entity::Thread));
}

#[test]
fn events_carry_documented_payloads() {
    let engine = engine();
    let registered = engine.register_user(domains::NewUser::named("neo")).unwrap();
    let author = registered.value.id;
    let json = registered.events[0].to_json().unwrap();
    assert_eq!(json["event"], "user:registered");
    assert_eq!(json["username"], "neo");

    let created = engine.create_thread(new_thread("GAMES", author, "t")).unwrap();
    let json = created.events[0].to_json().unwrap();
    assert_eq!(json["event"], "thread:created");
    assert_eq!(json["categoryId"], "GAMES");
    assert_eq!(json["authorId"], author.to_string());

    let reply = engine.add_reply(created.value.id, author, "r").unwrap();
    let json = reply.events[0].to_json().unwrap();
    assert_eq!(json["event"], "reply:created");
    assert_eq!(json["replyId"], reply.value.id.to_string());
    assert_eq!(json["threadId"], created.value.id.to_string());
}

#[test]
fn locked_thread_rejects_replies() {
    let engine = engine();
    let author = user(&engine, "neo");
    let other = user(&engine, "smith");
    let id = thread(&engine, "GAMES", author, "closed");
    engine.set_locked(id, true).unwrap();

    let err = engine.add_reply(id, other, "no").unwrap_err();

    assert!(matches!(err, ForumError::ThreadLocked(_)));
    assert_eq!(engine.get_thread(id).unwrap().replies.len(), 0);
    assert_eq!(engine.get_user(other).unwrap().stats().posts, 0);
    assert_eq!(engine.get_user(author).unwrap().stats().reputation, 5);

    engine.set_locked(id, false).unwrap();
    assert!(engine.add_reply(id, other, "yes").is_ok());
}

#[test]
fn removed_threads_disappear_from_reads() {
    let engine = engine();
    let author = user(&engine, "neo");
    let id = thread(&engine, "GAMES", author, "Oracle spam");
    engine.remove_thread(id).unwrap();

    assert!(engine.search("oracle").is_empty());
    assert!(engine.latest_threads(10).is_empty());
    assert!(engine.trending_threads(10).is_empty());
    assert_eq!(engine.category_stats("GAMES").unwrap().thread_count, 0);
    assert!(engine.get_thread(id).is_err());
    // running counter is not rewound
    assert_eq!(engine.global_stats().total_threads, 1);
}
