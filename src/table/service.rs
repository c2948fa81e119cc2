//! Table service: the controller-facing boundary around the engine.
//!
//! The engine's precondition checks are only valid against a consistent,
//! current snapshot, so the service serializes mutations per table: one
//! `Mutex` per table id guards the load-apply-save cycle, keeping at most
//! one mutation in flight per table. There are no retries; a rejection is
//! terminal for that call and the caller must re-fetch and reconsider.
//!
//! Accepted snapshots are persisted through the [`SnapshotStore`] seam and
//! then published on a per-table watch channel for observers.

use log::{debug, info};
use rand::Rng;
use rand::distr::Alphanumeric;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::game::constants::{FIRST_SEAT, ROOM_CODE_LENGTH};
use crate::game::entities::{
    Chips, PlayerAction, PlayerId, RoomCode, TableId, TableSnapshot, Username,
};
use crate::game::{engine, lifecycle};

use super::config::TableConfig;
use super::errors::{ServiceError, ServiceResult};
use super::store::SnapshotStore;

/// Bearer token associating a person with a seat. Issued on join; the
/// service refuses actions whose actor differs from the token's claim.
pub type SeatToken = Uuid;

#[derive(Clone, Copy, Debug)]
struct SeatClaim {
    table_id: TableId,
    player_id: PlayerId,
}

struct TableEntry {
    config: TableConfig,
    /// Serializes the load-apply-save cycle for this table.
    gate: Arc<Mutex<()>>,
    updates: watch::Sender<TableSnapshot>,
}

/// Registry of open tables plus the serialization and broadcast plumbing
/// around the pure engine.
pub struct TableService {
    store: Arc<dyn SnapshotStore>,
    tables: RwLock<HashMap<TableId, TableEntry>>,
    rooms: RwLock<HashMap<RoomCode, TableId>>,
    claims: RwLock<HashMap<SeatToken, SeatClaim>>,
}

impl TableService {
    #[must_use]
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            store,
            tables: RwLock::new(HashMap::new()),
            rooms: RwLock::new(HashMap::new()),
            claims: RwLock::new(HashMap::new()),
        }
    }

    /// Open a table with a fresh room code.
    pub async fn open_table(&self, config: TableConfig) -> ServiceResult<TableSnapshot> {
        config.validate()?;

        let mut rooms = self.rooms.write().await;
        let room_code = loop {
            let code = generate_room_code();
            if !rooms.contains_key(&code) {
                break code;
            }
        };

        let snapshot = TableSnapshot::new(room_code.clone(), config.small_blind, config.big_blind);
        self.store.save(&snapshot).await?;

        let (updates, _) = watch::channel(snapshot.clone());
        self.tables.write().await.insert(
            snapshot.id,
            TableEntry {
                config,
                gate: Arc::new(Mutex::new(())),
                updates,
            },
        );
        rooms.insert(room_code.clone(), snapshot.id);
        info!("opened table {} with room code {room_code}", snapshot.id);
        Ok(snapshot)
    }

    /// Look a table up by its shareable room code.
    pub async fn find_by_room_code(&self, room_code: &RoomCode) -> Option<TableId> {
        self.rooms.read().await.get(room_code).copied()
    }

    /// The table's latest persisted snapshot.
    pub async fn snapshot(&self, table_id: TableId) -> ServiceResult<TableSnapshot> {
        self.store
            .load(table_id)
            .await?
            .ok_or(ServiceError::TableNotFound)
    }

    /// Watch the table; the receiver always holds the latest snapshot.
    pub async fn subscribe(
        &self,
        table_id: TableId,
    ) -> ServiceResult<watch::Receiver<TableSnapshot>> {
        let tables = self.tables.read().await;
        let entry = tables.get(&table_id).ok_or(ServiceError::TableNotFound)?;
        Ok(entry.updates.subscribe())
    }

    /// Seat a player at the lowest free seat and issue their seat token.
    pub async fn join_table(
        &self,
        table_id: TableId,
        name: Username,
        buy_in: Chips,
    ) -> ServiceResult<(SeatToken, TableSnapshot)> {
        let (gate, config) = {
            let tables = self.tables.read().await;
            let entry = tables.get(&table_id).ok_or(ServiceError::TableNotFound)?;
            (entry.gate.clone(), entry.config.clone())
        };
        let _guard = gate.lock().await;

        if buy_in < config.min_buy_in || buy_in > config.max_buy_in {
            return Err(ServiceError::InvalidBuyIn {
                min: config.min_buy_in,
                max: config.max_buy_in,
            });
        }

        let current = self
            .store
            .load(table_id)
            .await?
            .ok_or(ServiceError::TableNotFound)?;
        let seat = (FIRST_SEAT..FIRST_SEAT + config.max_seats)
            .find(|&seat| current.player_at_seat(seat).is_none())
            .ok_or(ServiceError::TableFull)?;
        let (next, player_id) = current.with_player_seated(name, seat, buy_in)?;
        self.store.save(&next).await?;
        self.publish(table_id, &next).await;

        let token = Uuid::new_v4();
        self.claims.write().await.insert(
            token,
            SeatClaim {
                table_id,
                player_id,
            },
        );
        info!("seated player {player_id} at table {table_id} seat {seat}");
        Ok((token, next))
    }

    /// Apply an action on behalf of a seat token's holder.
    pub async fn take_action(
        &self,
        token: SeatToken,
        action: &PlayerAction,
    ) -> ServiceResult<TableSnapshot> {
        let claim = *self
            .claims
            .read()
            .await
            .get(&token)
            .ok_or(ServiceError::InvalidToken)?;
        // A win declaration names the winner, not the actor, so any seated
        // token at the table may submit it.
        if !matches!(action, PlayerAction::DeclareWin { .. })
            && action.player_id() != claim.player_id
        {
            return Err(ServiceError::TokenMismatch);
        }
        self.apply_action(claim.table_id, action).await
    }

    /// Apply an action directly (trusted callers).
    pub async fn apply_action(
        &self,
        table_id: TableId,
        action: &PlayerAction,
    ) -> ServiceResult<TableSnapshot> {
        self.mutate(table_id, |current| Ok(engine::apply(current, action)?))
            .await
    }

    /// Start the first hand of the game.
    pub async fn start_hand(&self, table_id: TableId) -> ServiceResult<TableSnapshot> {
        self.mutate(table_id, |current| Ok(lifecycle::start_game(current)?))
            .await
    }

    /// Advance a finished hand to the next one.
    pub async fn next_hand(&self, table_id: TableId) -> ServiceResult<TableSnapshot> {
        self.mutate(table_id, |current| {
            Ok(lifecycle::advance_to_next_hand(current)?)
        })
        .await
    }

    /// Award the pot to a manually chosen winner.
    pub async fn declare_winner(
        &self,
        table_id: TableId,
        winner_id: PlayerId,
    ) -> ServiceResult<TableSnapshot> {
        self.mutate(table_id, |current| {
            Ok(lifecycle::resolve_showdown(current, winner_id)?)
        })
        .await
    }

    /// Load-apply-save under the table's gate, then broadcast.
    async fn mutate<F>(&self, table_id: TableId, transition: F) -> ServiceResult<TableSnapshot>
    where
        F: FnOnce(&TableSnapshot) -> ServiceResult<TableSnapshot>,
    {
        let gate = {
            let tables = self.tables.read().await;
            let entry = tables.get(&table_id).ok_or(ServiceError::TableNotFound)?;
            entry.gate.clone()
        };
        let _guard = gate.lock().await;

        let current = self
            .store
            .load(table_id)
            .await?
            .ok_or(ServiceError::TableNotFound)?;
        let next = match transition(&current) {
            Ok(next) => next,
            Err(rejection) => {
                debug!("mutation rejected on table {table_id}: {rejection}");
                return Err(rejection);
            }
        };
        self.store.save(&next).await?;
        self.publish(table_id, &next).await;
        Ok(next)
    }

    async fn publish(&self, table_id: TableId, snapshot: &TableSnapshot) {
        let tables = self.tables.read().await;
        if let Some(entry) = tables.get(&table_id) {
            // Nobody watching is fine.
            let _ = entry.updates.send(snapshot.clone());
        }
    }
}

fn generate_room_code() -> RoomCode {
    let raw: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ROOM_CODE_LENGTH)
        .map(char::from)
        .collect();
    RoomCode::new(&raw)
}
