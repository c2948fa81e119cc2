//! Table service and storage error types.

use thiserror::Error;

use crate::game::entities::Chips;
use crate::game::errors::EngineError;

/// Storage seam errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage backend failure
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the table service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The engine rejected the action; the table state is unchanged
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No table with the given id or room code
    #[error("table not found")]
    TableNotFound,

    /// Every seat is taken
    #[error("table is full")]
    TableFull,

    /// Buy-in outside the table's configured bounds
    #[error("buy-in must be between ${min} and ${max}")]
    InvalidBuyIn { min: Chips, max: Chips },

    /// Unknown seat token
    #[error("invalid seat token")]
    InvalidToken,

    /// Seat token belongs to a different player than the action names
    #[error("seat token does not match acting player")]
    TokenMismatch,

    /// Rejected table configuration
    #[error("invalid table config: {0}")]
    InvalidConfig(String),
}

/// Result type for table service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
