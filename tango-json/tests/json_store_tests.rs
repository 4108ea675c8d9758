use chrono::{Duration, Utc};
use tango_core::{CardContent, DayWindow, Repository, ScheduleUpdate};
use tango_json::JsonStore;
use tempfile::tempdir;

fn content() -> CardContent {
    CardContent {
        sentence: "猫が好きです".to_string(),
        word: "猫".to_string(),
        pronounce: "ねこ".to_string(),
        meaning: "cat".to_string(),
        translate: "I like cats".to_string(),
    }
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("tango.json");
    let backups = dir.path().join("backups");

    let next = Utc::now() + Duration::days(3);
    let (deck_id, card_id) = {
        let store = JsonStore::open_with(file.clone(), backups.clone(), 3)
            .await
            .unwrap();
        let deck = store.create_deck("N5", "JLPT vocabulary").await.unwrap();
        let card = store.create_card(deck.id, &content()).await.unwrap();
        store
            .persist_schedule(
                deck.id,
                card.id,
                ScheduleUpdate {
                    success_count: 4,
                    next_date: next,
                },
            )
            .await
            .unwrap();
        (deck.id, card.id)
    };

    let store = JsonStore::open_with(file, backups, 3).await.unwrap();
    let deck = store.get_deck(deck_id).await.unwrap();
    assert_eq!(deck.name, "N5");
    let card = store.get_card(card_id).await.unwrap();
    assert_eq!(card.word, "猫");
    assert_eq!(card.success_count, 4);
    assert_eq!(card.next_date, next);
}

#[tokio::test]
async fn due_window_filtering_matches_the_core_policy() {
    let dir = tempdir().unwrap();
    let store = JsonStore::open_with(
        dir.path().join("tango.json"),
        dir.path().join("backups"),
        2,
    )
    .await
    .unwrap();

    let deck = store.create_deck("N5", "").await.unwrap();
    let due = store.create_card(deck.id, &content()).await.unwrap();
    let future = store.create_card(deck.id, &content()).await.unwrap();
    store
        .persist_schedule(
            deck.id,
            future.id,
            ScheduleUpdate {
                success_count: 1,
                next_date: Utc::now() + Duration::days(2),
            },
        )
        .await
        .unwrap();

    let window = DayWindow::containing(&Utc::now());
    let fetched = store.fetch_due_cards(deck.id, window).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, due.id);
}

#[tokio::test]
async fn backups_are_rotated() {
    let dir = tempdir().unwrap();
    let backups = dir.path().join("backups");
    let store = JsonStore::open_with(dir.path().join("tango.json"), backups.clone(), 2)
        .await
        .unwrap();

    let deck = store.create_deck("N5", "").await.unwrap();
    for _ in 0..5 {
        store.create_card(deck.id, &content()).await.unwrap();
    }

    let count = std::fs::read_dir(&backups)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .count();
    assert!(count <= 2, "kept {count} backups");
}
