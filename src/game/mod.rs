//! Core table engine: snapshot model, position calculator, round-completion
//! detector, action engine, and hand lifecycle.
//!
//! Everything in here is pure: a snapshot plus an action deterministically
//! produces the next snapshot or a rejection, with no I/O and no shared
//! mutable state.

pub mod constants;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod lifecycle;
pub mod positions;
pub mod rounds;

pub use engine::apply;
pub use entities::{
    ActionKind, ActionRecord, Chips, Phase, Player, PlayerAction, PlayerId, RoomCode, SeatNumber,
    TableId, TableSnapshot, Username,
};
pub use errors::{EngineError, EngineResult};
pub use lifecycle::{
    advance_to_next_hand, reset_for_next_hand, resolve_showdown, start_game,
    start_game_with_dealer,
};
