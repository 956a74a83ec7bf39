//! Thread listing: pagination metadata, newest-first ordering and kind
//! filtering.

use std::collections::HashSet;

use domains::error::AppError;
use domains::models::{PollOption, ThreadContent, ThreadKind, ThreadSort};
use integration_tests::Engine;

fn discussion(n: usize) -> ThreadContent {
    ThreadContent::Discussion {
        title: format!("topic number {n}"),
        body: "plenty to talk about here".into(),
    }
}

#[tokio::test]
async fn twenty_five_threads_make_three_pages() {
    let engine = Engine::new();
    let creator = engine.user("prolific").await;
    let circle = engine.circle(creator.id, "busy-circle", &[]).await;

    for n in 0..25 {
        engine
            .threads
            .create_thread(circle.id, creator.id, discussion(n))
            .await
            .unwrap();
    }

    let first = engine
        .threads
        .list_threads(circle.id, None, Some(1), Some(10), None)
        .await
        .unwrap();
    assert_eq!(first.total, 25);
    assert_eq!(first.pages, 3);
    assert_eq!(first.items.len(), 10);

    let last = engine
        .threads
        .list_threads(circle.id, None, Some(3), Some(10), None)
        .await
        .unwrap();
    assert_eq!(last.items.len(), 5);

    // Newest first across the page boundary.
    let newest = &first.items[0];
    let oldest = last.items.last().unwrap();
    assert!(newest.created_at >= oldest.created_at);
}

#[tokio::test]
async fn default_page_size_is_ten() {
    let engine = Engine::new();
    let creator = engine.user("defaulter").await;
    let circle = engine.circle(creator.id, "defaults", &[]).await;
    for n in 0..12 {
        engine
            .threads
            .create_thread(circle.id, creator.id, discussion(n))
            .await
            .unwrap();
    }

    let page = engine
        .threads
        .list_threads(circle.id, None, None, None, None)
        .await
        .unwrap();
    assert_eq!(page.page_size, 10);
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.pages, 2);
}

#[tokio::test]
async fn oldest_first_sort_reverses_the_default_order() {
    let engine = Engine::new();
    let creator = engine.user("chronological").await;
    let circle = engine.circle(creator.id, "archive", &[]).await;
    for n in 0..4 {
        engine
            .threads
            .create_thread(circle.id, creator.id, discussion(n))
            .await
            .unwrap();
    }

    let newest = engine
        .threads
        .list_threads(circle.id, None, None, None, Some(ThreadSort::Newest))
        .await
        .unwrap();
    let oldest = engine
        .threads
        .list_threads(circle.id, None, None, None, Some(ThreadSort::Oldest))
        .await
        .unwrap();

    assert!(oldest
        .items
        .windows(2)
        .all(|w| w[0].created_at <= w[1].created_at));
    assert_eq!(newest.items.first().unwrap().id, oldest.items.last().unwrap().id);
    assert_eq!(newest.items.last().unwrap().id, oldest.items.first().unwrap().id);
}

#[tokio::test]
async fn kind_filter_narrows_the_listing() {
    let engine = Engine::new();
    let creator = engine.user("mixed_poster").await;
    let circle = engine.circle(creator.id, "variety", &[]).await;

    for n in 0..3 {
        engine
            .threads
            .create_thread(circle.id, creator.id, discussion(n))
            .await
            .unwrap();
    }
    engine
        .threads
        .create_thread(
            circle.id,
            creator.id,
            ThreadContent::Poll {
                question: "filter check".into(),
                options: vec![PollOption::new("yes"), PollOption::new("no")],
                voted_users: HashSet::new(),
            },
        )
        .await
        .unwrap();
    engine
        .threads
        .create_thread(
            circle.id,
            creator.id,
            ThreadContent::Recommendation {
                media_name: "Le Samouraï".into(),
                review: "minimalism with a trench coat".into(),
                rating: 10,
            },
        )
        .await
        .unwrap();

    let polls = engine
        .threads
        .list_threads(circle.id, Some(ThreadKind::Poll), None, None, None)
        .await
        .unwrap();
    assert_eq!(polls.total, 1);
    assert_eq!(polls.items[0].kind(), ThreadKind::Poll);

    let discussions = engine
        .threads
        .list_threads(circle.id, Some(ThreadKind::Discussion), None, None, None)
        .await
        .unwrap();
    assert_eq!(discussions.total, 3);

    let everything = engine
        .threads
        .list_threads(circle.id, None, None, None, None)
        .await
        .unwrap();
    assert_eq!(everything.total, 5);
}

#[tokio::test]
async fn listing_a_missing_circle_is_not_found() {
    let engine = Engine::new();
    let err = engine
        .threads
        .list_threads(uuid::Uuid::now_v7(), None, None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_, _)));
}
