//! # Holdem Table
//!
//! A Texas Hold'em cash-game table engine.
//!
//! The core is a pure state-transition function: a [`TableSnapshot`] plus a
//! [`PlayerAction`] produces the next snapshot or a structured rejection.
//! Snapshots are functional: an accepted action supersedes the old value
//! and never mutates it in place, which keeps concurrent reasoning and
//! testing trivial. Winner selection is manual (the engine never ranks
//! hands), and the whole pot goes to one declared winner.
//!
//! ## Architecture
//!
//! A hand moves through a fixed set of phases:
//!
//! - **Setup**: blinds requested from the derived blind seats
//! - **Preflop/Flop/Turn/River**: betting rounds; the engine closes each
//!   round and advances the street itself
//! - **Showdown**: betting done, waiting for a win declaration
//! - **HandOver**: pot awarded, waiting for the next hand
//! - **GameOver**: one occupant holds all the chips
//!
//! ## Core Modules
//!
//! - [`game`]: snapshot model, positions, round detection, action engine,
//!   hand lifecycle
//! - [`table`]: the controller boundary (seating, seat tokens, per-table
//!   serialization, snapshot broadcast, persistence seam)
//!
//! ## Example
//!
//! ```
//! use holdem_table::{RoomCode, TableSnapshot, Username, game::lifecycle};
//!
//! let table = TableSnapshot::new(RoomCode::new("QK7T2A"), 5, 10);
//! let (table, _alice) = table
//!     .with_player_seated(Username::new("alice"), 1, 1000)
//!     .unwrap();
//! let (table, _bob) = table
//!     .with_player_seated(Username::new("bob"), 2, 1000)
//!     .unwrap();
//!
//! // The dealer gets the button; the turn lands on the small blind.
//! let table = lifecycle::start_game_with_dealer(&table, 1).unwrap();
//! assert!(table.turn_seat.is_some());
//! ```

/// Core game logic: snapshot model, action engine, and hand lifecycle.
pub mod game;
pub use game::{
    ActionKind, ActionRecord, Chips, EngineError, EngineResult, Phase, Player, PlayerAction,
    PlayerId, RoomCode, SeatNumber, TableId, TableSnapshot, Username, apply,
    constants::{self, DEFAULT_BIG_BLIND, DEFAULT_BUY_IN, DEFAULT_SMALL_BLIND},
};

/// Controller boundary: seating, tokens, serialization, persistence seam.
pub mod table;
pub use table::{SeatToken, ServiceError, ServiceResult, SnapshotStore, TableConfig, TableService};
