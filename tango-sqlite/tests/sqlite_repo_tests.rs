use chrono::{Duration, FixedOffset, TimeZone, Utc};
use tango_core::{CardContent, CoreError, DayWindow, Repository, ScheduleUpdate};
use tango_sqlite::SqliteRepo;

fn content(word: &str) -> CardContent {
    CardContent {
        sentence: format!("{word} を使った例文"),
        word: word.to_string(),
        pronounce: "かな".to_string(),
        meaning: "meaning".to_string(),
        translate: "translation".to_string(),
    }
}

#[tokio::test]
async fn deck_and_card_roundtrip() {
    let repo = SqliteRepo::open_memory().await.unwrap();
    let deck = repo.create_deck("N5", "JLPT vocabulary").await.unwrap();
    let card = repo.create_card(deck.id, &content("犬")).await.unwrap();

    let stored = repo.get_card(card.id).await.unwrap();
    assert_eq!(stored.word, "犬");
    assert_eq!(stored.success_count, 0);
    assert_eq!(stored.next_date, card.next_date);

    let renamed = repo.update_deck(deck.id, "N4", "next level").await.unwrap();
    assert_eq!(renamed.name, "N4");
    assert_eq!(repo.get_deck(deck.id).await.unwrap().description, "next level");

    repo.delete_card(card.id).await.unwrap();
    assert!(matches!(
        repo.get_card(card.id).await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn schedule_writes_leave_content_and_updated_at_alone() {
    let repo = SqliteRepo::open_memory().await.unwrap();
    let deck = repo.create_deck("N5", "").await.unwrap();
    let card = repo.create_card(deck.id, &content("猫")).await.unwrap();

    let next = Utc::now() + Duration::days(3);
    repo.persist_schedule(
        deck.id,
        card.id,
        ScheduleUpdate {
            success_count: 2,
            next_date: next,
        },
    )
    .await
    .unwrap();

    let stored = repo.get_card(card.id).await.unwrap();
    assert_eq!(stored.success_count, 2);
    assert_eq!(stored.word, "猫");
    assert_eq!(stored.updated_at, card.updated_at);
}

#[tokio::test]
async fn due_window_is_a_range_predicate_in_sql() {
    let repo = SqliteRepo::open_memory().await.unwrap();
    let deck = repo.create_deck("N5", "").await.unwrap();

    let now = FixedOffset::east_opt(9 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 10, 9, 0, 0)
        .unwrap();
    let window = DayWindow::containing(&now);

    let missed = repo.create_card(deck.id, &content("a")).await.unwrap();
    let due = repo.create_card(deck.id, &content("b")).await.unwrap();
    let on_the_edge = repo.create_card(deck.id, &content("c")).await.unwrap();
    let future = repo.create_card(deck.id, &content("d")).await.unwrap();

    for (card, next_date) in [
        (&missed, window.start - Duration::hours(1)),
        (&due, window.start + Duration::hours(9)),
        (&on_the_edge, window.end),
        (&future, window.end + Duration::days(1)),
    ] {
        repo.persist_schedule(
            deck.id,
            card.id,
            ScheduleUpdate {
                success_count: 0,
                next_date,
            },
        )
        .await
        .unwrap();
    }

    let mut fetched: Vec<_> = repo
        .fetch_due_cards(deck.id, window)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    fetched.sort();
    let mut expected = vec![due.id, on_the_edge.id];
    expected.sort();
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn deleting_a_deck_cascades_to_cards() {
    let repo = SqliteRepo::open_memory().await.unwrap();
    let deck = repo.create_deck("N5", "").await.unwrap();
    let card = repo.create_card(deck.id, &content("鳥")).await.unwrap();

    repo.delete_deck(deck.id).await.unwrap();
    assert!(matches!(
        repo.get_card(card.id).await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn list_cards_is_newest_first() {
    let repo = SqliteRepo::open_memory().await.unwrap();
    let deck = repo.create_deck("N5", "").await.unwrap();
    for w in ["一", "二", "三"] {
        repo.create_card(deck.id, &content(w)).await.unwrap();
    }

    let listed = repo.list_cards(deck.id).await.unwrap();
    assert_eq!(listed.len(), 3);
    for pair in listed.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}
