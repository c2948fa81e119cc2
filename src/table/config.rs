//! Table configuration models.

use serde::{Deserialize, Serialize};

use crate::game::constants::{
    DEFAULT_BIG_BLIND, DEFAULT_BUY_IN, DEFAULT_SMALL_BLIND, MAX_SEATS,
};
use crate::game::entities::Chips;

use super::errors::{ServiceError, ServiceResult};

/// Configuration for opening a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table name, for lobby listings.
    pub name: String,

    /// Number of seats (default: 10)
    pub max_seats: usize,

    /// Small blind amount
    pub small_blind: Chips,

    /// Big blind amount
    pub big_blind: Chips,

    /// Minimum buy-in
    pub min_buy_in: Chips,

    /// Maximum buy-in
    pub max_buy_in: Chips,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "cash game".to_string(),
            max_seats: MAX_SEATS,
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            min_buy_in: 20 * DEFAULT_BIG_BLIND,
            max_buy_in: DEFAULT_BUY_IN,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.max_seats < 2 || self.max_seats > MAX_SEATS {
            return Err(ServiceError::InvalidConfig(format!(
                "seat count must be between 2 and {MAX_SEATS}"
            )));
        }
        if self.small_blind == 0 || self.big_blind < self.small_blind {
            return Err(ServiceError::InvalidConfig(
                "blinds must be positive and the big blind at least the small".into(),
            ));
        }
        if self.min_buy_in < self.big_blind {
            return Err(ServiceError::InvalidConfig(
                "minimum buy-in must cover the big blind".into(),
            ));
        }
        if self.max_buy_in < self.min_buy_in {
            return Err(ServiceError::InvalidConfig(
                "maximum buy-in below the minimum".into(),
            ));
        }
        Ok(())
    }
}
