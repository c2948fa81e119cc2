//! Hand lifecycle: starting the game, resetting between hands, and
//! resolving showdowns.
//!
//! The engine computes *what* the next state is; deciding *when* to start
//! the next hand (a button press, a timer) belongs to the controller, which
//! calls back in here. After a reset the controller is expected to request
//! the two blind posts separately.

use log::error;
use rand::seq::IndexedRandom;

use super::entities::{Phase, PlayerAction, PlayerId, SeatNumber, TableSnapshot};
use super::errors::{EngineError, EngineResult};
use super::positions;

/// Start the first hand, drawing the first dealer at random from the
/// eligible seats.
pub fn start_game(snapshot: &TableSnapshot) -> EngineResult<TableSnapshot> {
    let eligible = eligible_seats(snapshot);
    let Some(&dealer) = eligible.choose(&mut rand::rng()) else {
        return Err(EngineError::NotEnoughPlayers);
    };
    start_game_with_dealer(snapshot, dealer)
}

/// Start the first hand with a caller-chosen first dealer.
pub fn start_game_with_dealer(
    snapshot: &TableSnapshot,
    dealer_seat: SeatNumber,
) -> EngineResult<TableSnapshot> {
    if snapshot.phase != Phase::Setup || snapshot.dealer_seat.is_some() {
        return Err(EngineError::InvalidAction("game already started".into()));
    }
    if !eligible_seats(snapshot).contains(&dealer_seat) {
        return Err(EngineError::InvalidAction(format!(
            "seat {dealer_seat} cannot take the button"
        )));
    }
    let mut next = snapshot.clone();
    begin_hand(&mut next, dealer_seat)?;
    Ok(next)
}

/// Hand-reset primitive: rotate the button, clear per-hand state, and leave
/// the table in SETUP with the turn on the small blind.
pub fn reset_for_next_hand(snapshot: &TableSnapshot) -> EngineResult<TableSnapshot> {
    let mut next = snapshot.clone();
    // Folded flags clear before the button moves so last hand's folders can
    // take it.
    for p in &mut next.players {
        p.round_bet = 0;
        p.has_folded = false;
    }
    let Some(dealer) = positions::next_active_seat(&next.players, snapshot.dealer_seat) else {
        return Err(EngineError::NotEnoughPlayers);
    };
    begin_hand(&mut next, dealer)?;
    Ok(next)
}

/// Advance from a finished hand to the next one. Thin phase-guarded wrapper
/// over [`reset_for_next_hand`].
pub fn advance_to_next_hand(snapshot: &TableSnapshot) -> EngineResult<TableSnapshot> {
    if snapshot.phase != Phase::HandOver {
        return Err(EngineError::InvalidAction(format!(
            "cannot start the next hand during {}",
            snapshot.phase
        )));
    }
    reset_for_next_hand(snapshot)
}

/// Resolve a showdown by awarding the pot to the manually chosen winner.
pub fn resolve_showdown(
    snapshot: &TableSnapshot,
    winner_id: PlayerId,
) -> EngineResult<TableSnapshot> {
    snapshot.apply(&PlayerAction::DeclareWin { winner_id })
}

fn eligible_seats(snapshot: &TableSnapshot) -> Vec<SeatNumber> {
    snapshot
        .players
        .iter()
        .filter(|p| p.is_active())
        .map(|p| p.seat)
        .collect()
}

fn begin_hand(next: &mut TableSnapshot, dealer_seat: SeatNumber) -> EngineResult<()> {
    if eligible_seats(next).len() < 2 {
        return Err(EngineError::NotEnoughPlayers);
    }
    for p in &mut next.players {
        p.round_bet = 0;
        p.has_folded = false;
    }
    next.dealer_seat = Some(dealer_seat);
    next.phase = Phase::Setup;
    next.pot = 0;
    next.highest_bet = 0;
    next.min_raise = next.big_blind;
    next.last_action = None;

    let Some(small_blind) = positions::small_blind_seat(next) else {
        error!("small-blind seat underivable on table {}", next.id);
        return Err(EngineError::Internal(
            "small-blind seat could not be derived".into(),
        ));
    };
    if positions::big_blind_seat(next, Some(small_blind)).is_none() {
        error!("big-blind seat underivable on table {}", next.id);
        return Err(EngineError::Internal(
            "big-blind seat could not be derived".into(),
        ));
    }
    next.turn_seat = Some(small_blind);
    Ok(())
}
