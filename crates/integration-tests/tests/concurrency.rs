use std::sync::Arc;
use std::thread as std_thread;

use chrono::{Duration, Utc};
use integration_tests::{engine, engine_with_clock, thread, user, ManualClock};
use services::ForumEngine;

const WORKERS: usize = 8;
const PER_WORKER: usize = 250;

#[test]
fn concurrent_views_are_not_lost() {
    let engine = engine();
    let author = user(&engine, "neo");
    let id = thread(&engine, "GAMES", author, "hot");

    std_thread::scope(|scope| {
        for _ in 0..WORKERS {
            scope.spawn(|| {
                for _ in 0..PER_WORKER {
                    engine.get_thread(id).unwrap();
                }
            });
        }
    });

    let views = engine.get_thread(id).unwrap().views;
    assert_eq!(views, (WORKERS * PER_WORKER) as u64 + 1);
}

#[test]
fn concurrent_replies_keep_stats_in_step() {
    let engine = Arc::new(engine());
    let author = user(&engine, "neo");
    let id = thread(&engine, "GAMES", author, "busy");
    let repliers: Vec<_> = (0..WORKERS)
        .map(|i| user(&engine, &format!("replier{i}")))
        .collect();

    let handles: Vec<_> = repliers
        .iter()
        .copied()
        .map(|replier| {
            let engine = Arc::clone(&engine);
            std_thread::spawn(move || {
                for n in 0..PER_WORKER {
                    engine.add_reply(id, replier, format!("reply {n}")).unwrap();
                }
            })
        })
        .collect();

    // readers racing the writers must always see matching totals
    let reader = {
        let engine = Arc::clone(&engine);
        std_thread::spawn(move || {
            for _ in 0..200 {
                check_consistent(&engine);
            }
        })
    };

    for handle in handles {
        handle.join().unwrap();
    }
    reader.join().unwrap();

    let total = (WORKERS * PER_WORKER) as u64;
    let thread = engine.get_thread(id).unwrap();
    assert_eq!(thread.replies.len() as u64, total);
    assert_eq!(engine.global_stats().total_replies, total);
    assert_eq!(engine.get_user(author).unwrap().stats().reputation, 5 + total);
    for replier in repliers {
        assert_eq!(
            engine.get_user(replier).unwrap().stats().posts,
            PER_WORKER as u64
        );
    }
}

#[test]
fn concurrent_replies_stay_chronological() {
    let clock = ManualClock::starting_at(Utc::now());
    let engine = Arc::new(engine_with_clock(Arc::clone(&clock)));
    let author = user(&engine, "neo");
    let id = thread(&engine, "GAMES", author, "timeline");

    let ticker = {
        let clock = Arc::clone(&clock);
        std_thread::spawn(move || {
            for _ in 0..PER_WORKER {
                clock.advance(Duration::milliseconds(7));
                std_thread::yield_now();
            }
        })
    };
    let writers: Vec<_> = (0..WORKERS)
        .map(|i| {
            let engine = Arc::clone(&engine);
            std_thread::spawn(move || {
                for n in 0..PER_WORKER {
                    engine.add_reply(id, author, format!("{i}-{n}")).unwrap();
                }
            })
        })
        .collect();

    ticker.join().unwrap();
    for writer in writers {
        writer.join().unwrap();
    }

    let thread = engine.get_thread(id).unwrap();
    assert!(thread
        .replies
        .windows(2)
        .all(|pair| pair[0].created_at <= pair[1].created_at));
    let newest = thread.replies.last().map(|r| r.created_at);
    assert_eq!(Some(thread.updated_at), newest);
}

fn check_consistent(engine: &ForumEngine) {
    let snapshot = engine.snapshot();
    let replies: u64 = snapshot.threads.iter().map(|t| t.replies.len() as u64).sum();
    let posts: u64 = snapshot.users.iter().map(|u| u.stats().posts).sum();
    let threads = snapshot.threads.len() as u64;
    assert_eq!(snapshot.counters.total_replies, replies);
    assert_eq!(posts, replies + threads);
}
