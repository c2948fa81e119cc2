//! Engine error types.
//!
//! Every engine operation returns either a successor snapshot or one of these
//! rejections. Invalid actions are data, not panics: the engine never throws
//! on bad input, and a rejection always leaves the caller's snapshot untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::{ActionKind, Chips, Phase};

/// Rejections produced by the action engine and hand lifecycle.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum EngineError {
    /// Action is malformed or unsupported right now (e.g. checking into a bet).
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Actor does not hold the turn (or the blind seat they tried to post from).
    #[error("not your turn")]
    NotYourTurn,

    /// No occupant with the given id at this table.
    #[error("player not found")]
    PlayerNotFound,

    /// Stack cannot cover the transfer; stacks never go negative.
    #[error("need ${required}, have ${available}")]
    InsufficientFunds { required: Chips, available: Chips },

    /// Bet or raise below the minimum legal total.
    #[error("bet must be at least ${minimum}")]
    InvalidBetAmount { minimum: Chips },

    /// Action kind is disallowed in the current phase.
    #[error("cannot {action} during {phase}")]
    InvalidActionPhase { action: ActionKind, phase: Phase },

    /// Fewer than two occupants are eligible to play the next hand.
    #[error("need 2+ players with chips")]
    NotEnoughPlayers,

    /// Invariant violation: blind-seat computation failed with 2+ eligible
    /// occupants. Unreachable unless the snapshot itself is corrupt.
    #[error("invalid game state: {0}")]
    Internal(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
