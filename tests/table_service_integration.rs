//! Controller-boundary integration tests: seating, seat tokens, per-table
//! serialization, snapshot broadcast, and the persistence seam.

use std::collections::HashMap;
use std::sync::Arc;

use holdem_table::{
    Phase, PlayerAction, PlayerId, SeatToken, TableConfig, TableService, TableSnapshot, Username,
    table::InMemoryStore,
};

fn service() -> Arc<TableService> {
    Arc::new(TableService::new(Arc::new(InMemoryStore::new())))
}

/// Open a table and seat `names`, returning token and player id per name.
async fn seated_table(
    service: &TableService,
    names: &[&str],
) -> (TableSnapshot, HashMap<String, (SeatToken, PlayerId)>) {
    let table = service.open_table(TableConfig::default()).await.unwrap();
    let mut seats = HashMap::new();
    let mut latest = table;
    for name in names {
        let (token, snapshot) = service
            .join_table(latest.id, Username::new(name), 1000)
            .await
            .unwrap();
        let player_id = snapshot.players.last().unwrap().id;
        seats.insert((*name).to_string(), (token, player_id));
        latest = snapshot;
    }
    (latest, seats)
}

fn credentials_at_seat(
    snapshot: &TableSnapshot,
    seats: &HashMap<String, (SeatToken, PlayerId)>,
    seat: usize,
) -> (SeatToken, PlayerId) {
    let player = snapshot.player_at_seat(seat).unwrap();
    *seats
        .values()
        .find(|(_, player_id)| *player_id == player.id)
        .unwrap()
}

#[tokio::test]
async fn test_full_hand_through_the_service() {
    let service = service();
    let (table, seats) = seated_table(&service, &["alice", "bob", "carol"]).await;

    let snapshot = service.start_hand(table.id).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Setup);

    // Post both blinds from whichever seats the button landed on.
    let (token, player_id) = credentials_at_seat(&snapshot, &seats, snapshot.turn_seat.unwrap());
    let snapshot = service
        .take_action(token, &PlayerAction::PostSmallBlind { player_id })
        .await
        .unwrap();
    let (token, player_id) = credentials_at_seat(&snapshot, &seats, snapshot.turn_seat.unwrap());
    let snapshot = service
        .take_action(token, &PlayerAction::PostBigBlind { player_id })
        .await
        .unwrap();
    assert_eq!(snapshot.phase, Phase::Preflop);
    assert_eq!(snapshot.pot, 15);

    // Everyone else folds; the big blind wins the pot without a showdown.
    let (token, player_id) = credentials_at_seat(&snapshot, &seats, snapshot.turn_seat.unwrap());
    let snapshot = service
        .take_action(token, &PlayerAction::Fold { player_id })
        .await
        .unwrap();
    let (token, player_id) = credentials_at_seat(&snapshot, &seats, snapshot.turn_seat.unwrap());
    let snapshot = service
        .take_action(token, &PlayerAction::Fold { player_id })
        .await
        .unwrap();

    assert_eq!(snapshot.phase, Phase::HandOver);
    assert_eq!(snapshot.pot, 0);
    assert_eq!(snapshot.total_chips(), 3000);

    // And the table rolls into the next hand.
    let snapshot = service.next_hand(table.id).await.unwrap();
    assert_eq!(snapshot.phase, Phase::Setup);
    assert!(snapshot.turn_seat.is_some());
}

#[tokio::test]
async fn test_rejected_action_leaves_persisted_state_unchanged() {
    let service = service();
    let (table, seats) = seated_table(&service, &["alice", "bob"]).await;
    let snapshot = service.start_hand(table.id).await.unwrap();

    // The non-turn player tries to act.
    let other_seat = snapshot
        .players
        .iter()
        .map(|p| p.seat)
        .find(|&s| Some(s) != snapshot.turn_seat)
        .unwrap();
    let (token, player_id) = credentials_at_seat(&snapshot, &seats, other_seat);
    let result = service
        .take_action(token, &PlayerAction::Fold { player_id })
        .await;
    assert!(result.is_err());

    let persisted = service.snapshot(table.id).await.unwrap();
    assert_eq!(persisted, snapshot);
}

#[tokio::test]
async fn test_concurrent_callers_cannot_lose_updates() {
    let service = service();
    let (table, seats) = seated_table(&service, &["alice", "bob", "carol"]).await;
    let snapshot = service.start_hand(table.id).await.unwrap();

    // Blinds first, deterministically.
    let (token, player_id) = credentials_at_seat(&snapshot, &seats, snapshot.turn_seat.unwrap());
    let snapshot = service
        .take_action(token, &PlayerAction::PostSmallBlind { player_id })
        .await
        .unwrap();
    let (token, player_id) = credentials_at_seat(&snapshot, &seats, snapshot.turn_seat.unwrap());
    service
        .take_action(token, &PlayerAction::PostBigBlind { player_id })
        .await
        .unwrap();

    // All three players hammer the table concurrently with calls. The
    // per-table gate serializes them; however the attempts interleave,
    // each player matches the blind exactly once.
    let mut tasks = tokio::task::JoinSet::new();
    for (token, player_id) in seats.values().copied() {
        let service = Arc::clone(&service);
        tasks.spawn(async move {
            // Retry until this player's call lands; the round cannot close
            // before every contender has matched the blind.
            loop {
                match service
                    .take_action(token, &PlayerAction::Call { player_id })
                    .await
                {
                    Ok(_) => break,
                    Err(_) => tokio::task::yield_now().await,
                }
            }
        });
    }
    while tasks.join_next().await.is_some() {}

    let settled = service.snapshot(table.id).await.unwrap();
    assert_eq!(settled.total_chips(), 3000);
    assert_eq!(settled.pot, 30);
    assert!(settled.players.iter().all(|p| p.chips == 990));
}

#[tokio::test]
async fn test_observers_follow_the_table() {
    let service = service();
    let (table, seats) = seated_table(&service, &["alice", "bob"]).await;
    let mut updates = service.subscribe(table.id).await.unwrap();

    let snapshot = service.start_hand(table.id).await.unwrap();
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().phase, Phase::Setup);

    let (token, player_id) = credentials_at_seat(&snapshot, &seats, snapshot.turn_seat.unwrap());
    service
        .take_action(token, &PlayerAction::PostSmallBlind { player_id })
        .await
        .unwrap();
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().pot, 5);
}

#[tokio::test]
async fn test_room_code_lookup_and_snapshot_serialization() {
    let service = service();
    let (table, _) = seated_table(&service, &["alice", "bob"]).await;

    let snapshot = service.snapshot(table.id).await.unwrap();
    let found = service.find_by_room_code(&snapshot.room_code).await;
    assert_eq!(found, Some(table.id));

    // The controller persists and broadcasts snapshots as plain data.
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: TableSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
}
