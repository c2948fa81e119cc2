//! Table defaults and limits.

use super::entities::Chips;

/// Maximum number of seats at a single table.
pub const MAX_SEATS: usize = 10;

/// Seats are numbered starting from 1.
pub const FIRST_SEAT: usize = 1;

pub const DEFAULT_SMALL_BLIND: Chips = 5;
pub const DEFAULT_BIG_BLIND: Chips = 2 * DEFAULT_SMALL_BLIND;

// A default buy-in worth 100 big blinds keeps early all-ins rare.
pub const DEFAULT_BUY_IN: Chips = 100 * DEFAULT_BIG_BLIND;

/// Display names are truncated to this many characters.
pub const MAX_NAME_LENGTH: usize = 16;

/// Length of the shareable room code generated for each table.
pub const ROOM_CODE_LENGTH: usize = 6;
