use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self};
use uuid::Uuid;

use super::constants;

/// Type alias for whole chips. All bets and player stacks are represented
/// as whole chips (there's no point arguing over fractions of one).
///
/// If the total money at a table ever surpasses ~4.2 billion, then we may
/// have a problem.
pub type Chips = u32;

/// Type alias for seat positions at the table. Seats are stable for a
/// player's tenure and unique per table.
pub type SeatNumber = usize;

/// Opaque player identity.
pub type PlayerId = Uuid;

/// Opaque table identity.
pub type TableId = Uuid;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        let mut username: String = s
            .chars()
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .collect();
        username.truncate(constants::MAX_NAME_LENGTH);
        Self(username)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// Shareable code identifying a table to people joining it.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn new(s: &str) -> Self {
        let mut code: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        code.truncate(constants::ROOM_CODE_LENGTH);
        Self(code)
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for RoomCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

/// Betting phases of a hand, plus the terminal table states.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Phase {
    /// Table opened or hand reset; blinds not yet collected.
    Setup,
    Preflop,
    Flop,
    Turn,
    River,
    /// Betting is over; a winner must be declared externally.
    Showdown,
    /// Pot awarded; waiting for the next hand to start.
    HandOver,
    /// At most one occupant still has chips. Terminal.
    GameOver,
}

impl Phase {
    /// Phases in which betting actions can close a round and advance play.
    #[must_use]
    pub fn is_betting(self) -> bool {
        matches!(self, Self::Preflop | Self::Flop | Self::Turn | Self::River)
    }

    /// The street that follows this one, for the betting phases only.
    #[must_use]
    pub fn next_street(self) -> Option<Self> {
        match self {
            Self::Preflop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River => Some(Self::Showdown),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Setup => "setup",
            Self::Preflop => "pre-flop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
            Self::HandOver => "hand over",
            Self::GameOver => "game over",
        };
        write!(f, "{repr}")
    }
}

/// Kinds of entries in the append-only action history.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    SmallBlind,
    BigBlind,
    Win,
    SitOut,
    SitIn,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Fold => "fold",
            Self::Check => "check",
            Self::Call => "call",
            Self::Bet => "bet",
            Self::Raise => "raise",
            Self::SmallBlind => "post the small blind",
            Self::BigBlind => "post the big blind",
            Self::Win => "win",
            Self::SitOut => "sit out",
            Self::SitIn => "sit in",
        };
        write!(f, "{repr}")
    }
}

/// One entry of the action history. Append-only; never mutated.
///
/// The history is what "has a raise occurred this round" and "who was the
/// last aggressor" are reconstructed from. A `Win` entry marks a hand
/// boundary; entries at or before the latest `Win` belong to a previous hand.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ActionRecord {
    pub kind: ActionKind,
    /// Acting player. Absent only for a system-declared win (fold-out).
    pub player_id: Option<PlayerId>,
    /// Present for monetary actions.
    pub amount: Option<Chips>,
    pub at: DateTime<Utc>,
}

impl ActionRecord {
    #[must_use]
    pub fn new(kind: ActionKind, player_id: Option<PlayerId>, amount: Option<Chips>) -> Self {
        Self {
            kind,
            player_id,
            amount,
            at: Utc::now(),
        }
    }
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.amount {
            Some(amount) => write!(f, "{} (${amount})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// A player's request against the table, applied via [`apply`].
///
/// This is the single typed entry point for every supported action kind;
/// there is no string-keyed dispatch.
///
/// [`apply`]: crate::game::engine::apply
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum PlayerAction {
    Fold { player_id: PlayerId },
    Check { player_id: PlayerId },
    Call { player_id: PlayerId },
    /// Open the betting. `amount` is the total round contribution to reach.
    Bet { player_id: PlayerId, amount: Chips },
    /// Raise an existing bet. Same monetary contract as `Bet`.
    Raise { player_id: PlayerId, amount: Chips },
    PostSmallBlind { player_id: PlayerId },
    PostBigBlind { player_id: PlayerId },
    SitOut { player_id: PlayerId },
    SitIn { player_id: PlayerId },
    /// Award the whole pot to `winner_id`. Winner selection is manual; the
    /// engine never ranks hands.
    DeclareWin { winner_id: PlayerId },
}

impl PlayerAction {
    /// The player the action concerns (the winner, for `DeclareWin`).
    #[must_use]
    pub fn player_id(&self) -> PlayerId {
        match self {
            Self::Fold { player_id }
            | Self::Check { player_id }
            | Self::Call { player_id }
            | Self::Bet { player_id, .. }
            | Self::Raise { player_id, .. }
            | Self::PostSmallBlind { player_id }
            | Self::PostBigBlind { player_id }
            | Self::SitOut { player_id }
            | Self::SitIn { player_id } => *player_id,
            Self::DeclareWin { winner_id } => *winner_id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Fold { .. } => ActionKind::Fold,
            Self::Check { .. } => ActionKind::Check,
            Self::Call { .. } => ActionKind::Call,
            Self::Bet { .. } => ActionKind::Bet,
            Self::Raise { .. } => ActionKind::Raise,
            Self::PostSmallBlind { .. } => ActionKind::SmallBlind,
            Self::PostBigBlind { .. } => ActionKind::BigBlind,
            Self::SitOut { .. } => ActionKind::SitOut,
            Self::SitIn { .. } => ActionKind::SitIn,
            Self::DeclareWin { .. } => ActionKind::Win,
        }
    }
}

/// A seat occupant and their in-hand betting state.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: Username,
    pub seat: SeatNumber,
    pub chips: Chips,
    /// Chips committed this betting round. Reset every round.
    pub round_bet: Chips,
    /// Reset every hand.
    pub has_folded: bool,
    /// Persists across hands until the player sits back in.
    pub sitting_out: bool,
}

impl Player {
    #[must_use]
    pub fn new(name: Username, seat: SeatNumber, chips: Chips) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            seat,
            chips,
            round_bet: 0,
            has_folded: false,
            sitting_out: false,
        }
    }

    /// Holds chips behind and is not sitting out. Derived, so a player who
    /// goes all-in mid-hand immediately stops taking turns.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.chips > 0 && !self.sitting_out
    }

    /// Eligible to take the next turn.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.is_active() && !self.has_folded
    }

    /// Still eligible to win the current hand. All-in players count.
    #[must_use]
    pub fn is_contender(&self) -> bool {
        !self.has_folded && !self.sitting_out
    }
}

/// One table's complete state.
///
/// Snapshots are functional: an accepted action produces a new snapshot and
/// never mutates the one the caller holds, so two requests racing on the same
/// table can be reasoned about (and tested) without shared mutable state.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub id: TableId,
    pub room_code: RoomCode,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub phase: Phase,
    pub pot: Chips,
    /// Seat holding the action, if any.
    pub turn_seat: Option<SeatNumber>,
    pub dealer_seat: Option<SeatNumber>,
    /// Highest total round contribution. Monotone within a round; reset to 0
    /// when a new round opens.
    pub highest_bet: Chips,
    /// Minimum legal raise increment over `highest_bet`.
    pub min_raise: Chips,
    pub players: Vec<Player>,
    pub last_action: Option<ActionRecord>,
    /// Append-only across hands; segmented by `Win` records.
    pub actions: Vec<ActionRecord>,
}

impl TableSnapshot {
    #[must_use]
    pub fn new(room_code: RoomCode, small_blind: Chips, big_blind: Chips) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_code,
            small_blind,
            big_blind,
            phase: Phase::Setup,
            pot: 0,
            turn_seat: None,
            dealer_seat: None,
            highest_bet: 0,
            min_raise: big_blind,
            players: Vec::with_capacity(constants::MAX_SEATS),
            last_action: None,
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn player_at_seat(&self, seat: SeatNumber) -> Option<&Player> {
        self.players.iter().find(|p| p.seat == seat)
    }

    /// The occupant currently holding the action.
    #[must_use]
    pub fn player_on_turn(&self) -> Option<&Player> {
        self.turn_seat.and_then(|seat| self.player_at_seat(seat))
    }

    /// Total chips in play: stacks plus pot. `Win` only moves chips from the
    /// pot to a stack, so this is invariant across every action.
    #[must_use]
    pub fn total_chips(&self) -> Chips {
        self.players.iter().map(|p| p.chips).sum::<Chips>() + self.pot
    }

    /// Seat a new occupant, preserving the one-occupant-per-seat invariant.
    /// Joining mid-hand folds the newcomer out of the hand in progress; the
    /// flag clears at the next hand reset.
    pub fn with_player_seated(
        &self,
        name: Username,
        seat: SeatNumber,
        buy_in: Chips,
    ) -> crate::game::errors::EngineResult<(Self, PlayerId)> {
        use crate::game::errors::EngineError;

        if buy_in == 0 {
            return Err(EngineError::InvalidAction("buy-in must be positive".into()));
        }
        if self.player_at_seat(seat).is_some() {
            return Err(EngineError::InvalidAction(format!(
                "seat {seat} is already taken"
            )));
        }
        let mut next = self.clone();
        let mut player = Player::new(name, seat, buy_in);
        player.has_folded = self.phase.is_betting() || self.phase == Phase::Showdown;
        let id = player.id;
        next.players.push(player);
        next.players.sort_unstable_by_key(|p| p.seat);
        Ok((next, id))
    }
}
