//! Poll voting against the real in-memory store, including the
//! lost-update scenario: many concurrent voters on one poll.

use std::collections::HashSet;

use uuid::Uuid;

use domains::error::AppError;
use domains::models::{PollOption, Thread, ThreadContent};
use integration_tests::Engine;

fn poll_content(options: &[&str]) -> ThreadContent {
    ThreadContent::Poll {
        question: "what should we screen next".into(),
        options: options.iter().map(|o| PollOption::new(*o)).collect(),
        voted_users: HashSet::new(),
    }
}

fn poll_parts(thread: &Thread) -> (&Vec<PollOption>, &HashSet<Uuid>) {
    match &thread.content {
        ThreadContent::Poll { options, voted_users, .. } => (options, voted_users),
        _ => panic!("expected a poll"),
    }
}

#[tokio::test]
async fn fifty_concurrent_votes_lose_nothing() {
    let engine = Engine::new();
    let creator = engine.user("organizer").await;

    let mut voters = Vec::new();
    for i in 0..50 {
        voters.push(engine.user(&format!("voter_{i}")).await.id);
    }
    let circle = engine.circle(creator.id, "blockbusters", &voters).await;

    let thread = engine
        .threads
        .create_thread(circle.id, creator.id, poll_content(&["Jaws", "Alien"]))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for voter in voters {
        let polls = engine.polls.clone();
        let thread_id = thread.id;
        handles.push(tokio::spawn(async move {
            polls.vote(thread_id, voter, "Jaws").await
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("every distinct voter succeeds");
    }

    let final_thread = engine.threads.get_thread(thread.id).await.unwrap();
    let (options, voted_users) = poll_parts(&final_thread);
    assert_eq!(options[0].vote_count, 50);
    assert_eq!(options[1].vote_count, 0);
    assert_eq!(voted_users.len(), 50);
}

#[tokio::test]
async fn tally_always_matches_the_voter_set() {
    let engine = Engine::new();
    let creator = engine.user("host").await;
    let a = engine.user("guest_a").await;
    let b = engine.user("guest_b").await;
    let circle = engine.circle(creator.id, "sum-check", &[a.id, b.id]).await;

    let thread = engine
        .threads
        .create_thread(circle.id, creator.id, poll_content(&["yes", "no"]))
        .await
        .unwrap();

    for (voter, option) in [(creator.id, "yes"), (a.id, "no"), (b.id, "yes")] {
        let updated = engine.polls.vote(thread.id, voter, option).await.unwrap();
        let (options, voted_users) = poll_parts(&updated);
        let sum: u64 = options.iter().map(|o| o.vote_count).sum();
        assert_eq!(sum as usize, voted_users.len());
    }
}

#[tokio::test]
async fn second_vote_conflicts_and_changes_nothing() {
    let engine = Engine::new();
    let creator = engine.user("solo").await;
    let circle = engine.circle(creator.id, "one-shot", &[]).await;
    let thread = engine
        .threads
        .create_thread(circle.id, creator.id, poll_content(&["a", "b"]))
        .await
        .unwrap();

    engine.polls.vote(thread.id, creator.id, "a").await.unwrap();
    let err = engine.polls.vote(thread.id, creator.id, "b").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let after = engine.threads.get_thread(thread.id).await.unwrap();
    let (options, voted_users) = poll_parts(&after);
    assert_eq!(options[0].vote_count, 1);
    assert_eq!(options[1].vote_count, 0);
    assert_eq!(voted_users.len(), 1);
}

#[tokio::test]
async fn unknown_option_text_is_rejected_without_side_effects() {
    let engine = Engine::new();
    let creator = engine.user("precise").await;
    let circle = engine.circle(creator.id, "exact-match", &[]).await;
    let thread = engine
        .threads
        .create_thread(circle.id, creator.id, poll_content(&["Heat", "Ronin"]))
        .await
        .unwrap();

    // Case matters and nothing is trimmed.
    for option in ["heat", " Heat", "Heat ", "RONIN"] {
        let err = engine.polls.vote(thread.id, creator.id, option).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "option {option:?}");
    }

    let after = engine.threads.get_thread(thread.id).await.unwrap();
    let (options, voted_users) = poll_parts(&after);
    assert!(options.iter().all(|o| o.vote_count == 0));
    assert!(voted_users.is_empty());
}

#[tokio::test]
async fn voting_on_a_discussion_is_not_found() {
    let engine = Engine::new();
    let creator = engine.user("talker").await;
    let circle = engine.circle(creator.id, "chatter", &[]).await;
    let thread = engine
        .threads
        .create_thread(
            circle.id,
            creator.id,
            ThreadContent::Discussion { title: "no polls here".into(), body: "just words today".into() },
        )
        .await
        .unwrap();

    let err = engine.polls.vote(thread.id, creator.id, "a").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(kind, _) if kind == "Poll"));
}
