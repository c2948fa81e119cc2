//! Action engine: the betting-round state machine.
//!
//! [`apply`] is a pure transition function from one snapshot and one player
//! action to the next snapshot or a rejection. It performs no I/O, holds no
//! state, and never panics on bad input; callers that race each other on the
//! same table must serialize around it (see [`crate::table`]).

use log::error;

use super::entities::{
    ActionKind, ActionRecord, Chips, Phase, Player, PlayerAction, PlayerId, SeatNumber,
    TableSnapshot,
};
use super::errors::{EngineError, EngineResult};
use super::positions;
use super::rounds;

/// Apply one action to a snapshot, producing the successor snapshot.
///
/// The input snapshot is never modified; on rejection the caller's state is
/// exactly as it was, and the rejection is data rather than a panic.
pub fn apply(snapshot: &TableSnapshot, action: &PlayerAction) -> EngineResult<TableSnapshot> {
    match action {
        PlayerAction::Fold { player_id } => fold(snapshot, *player_id),
        PlayerAction::Check { player_id } => check(snapshot, *player_id),
        PlayerAction::Call { player_id } => call(snapshot, *player_id),
        PlayerAction::Bet { player_id, amount } => {
            wager(snapshot, *player_id, *amount, ActionKind::Bet)
        }
        PlayerAction::Raise { player_id, amount } => {
            wager(snapshot, *player_id, *amount, ActionKind::Raise)
        }
        PlayerAction::PostSmallBlind { player_id } => post_small_blind(snapshot, *player_id),
        PlayerAction::PostBigBlind { player_id } => post_big_blind(snapshot, *player_id),
        PlayerAction::SitOut { player_id } => sit_out(snapshot, *player_id),
        PlayerAction::SitIn { player_id } => sit_in(snapshot, *player_id),
        PlayerAction::DeclareWin { winner_id } => declare_win(snapshot, *winner_id),
    }
}

impl TableSnapshot {
    /// Convenience for [`apply`].
    pub fn apply(&self, action: &PlayerAction) -> EngineResult<TableSnapshot> {
        apply(self, action)
    }
}

/// Locate the actor and confirm they hold the turn.
fn acting_player(snapshot: &TableSnapshot, player_id: PlayerId) -> EngineResult<usize> {
    let idx = snapshot
        .players
        .iter()
        .position(|p| p.id == player_id)
        .ok_or(EngineError::PlayerNotFound)?;
    if snapshot.turn_seat != Some(snapshot.players[idx].seat) {
        return Err(EngineError::NotYourTurn);
    }
    Ok(idx)
}

fn reject_during_showdown(snapshot: &TableSnapshot, kind: ActionKind) -> EngineResult<()> {
    if snapshot.phase == Phase::Showdown {
        return Err(EngineError::InvalidActionPhase {
            action: kind,
            phase: snapshot.phase,
        });
    }
    Ok(())
}

/// Append to the history and update `last_action` in one step.
fn record(
    snapshot: &mut TableSnapshot,
    kind: ActionKind,
    player_id: Option<PlayerId>,
    amount: Option<Chips>,
) {
    let entry = ActionRecord::new(kind, player_id, amount);
    snapshot.last_action = Some(entry.clone());
    snapshot.actions.push(entry);
}

fn advance_turn(snapshot: &mut TableSnapshot, from_seat: SeatNumber) {
    snapshot.turn_seat = positions::next_active_seat(&snapshot.players, Some(from_seat));
}

/// Deduct from a stack, rejecting instead of going negative.
fn deduct(player: &mut Player, amount: Chips) -> EngineResult<()> {
    if amount > player.chips {
        return Err(EngineError::InsufficientFunds {
            required: amount,
            available: player.chips,
        });
    }
    player.chips -= amount;
    Ok(())
}

/// Close the round if the detector says so: move to the next street, zero
/// the round's betting state, and hand the action to the street's opener.
fn settle_round_if_complete(snapshot: &mut TableSnapshot) {
    if !snapshot.phase.is_betting() || !rounds::is_betting_round_complete(snapshot) {
        return;
    }
    let Some(next_street) = snapshot.phase.next_street() else {
        return;
    };
    snapshot.phase = next_street;
    snapshot.highest_bet = 0;
    snapshot.min_raise = snapshot.big_blind;
    for p in &mut snapshot.players {
        p.round_bet = 0;
    }
    // Showdown waits for an external win declaration; the turn pointer is
    // recomputed but nobody may bet with it.
    snapshot.turn_seat = positions::first_to_act_seat(snapshot);
}

/// Move the whole pot to `winner_idx` and resolve the hand. A win with no
/// acting player id is system-declared (last player standing after folds).
fn award_pot(snapshot: &mut TableSnapshot, winner_idx: usize, system_declared: bool) {
    let amount = snapshot.pot;
    snapshot.players[winner_idx].chips += amount;
    snapshot.pot = 0;
    let winner_id = snapshot.players[winner_idx].id;
    let recorded_actor = if system_declared { None } else { Some(winner_id) };
    record(snapshot, ActionKind::Win, recorded_actor, Some(amount));

    let funded = snapshot.players.iter().filter(|p| p.chips > 0).count();
    if funded <= 1 {
        snapshot.phase = Phase::GameOver;
        snapshot.turn_seat = None;
        snapshot.dealer_seat = None;
    } else {
        snapshot.phase = Phase::HandOver;
        snapshot.turn_seat = None;
        snapshot.highest_bet = 0;
        snapshot.min_raise = snapshot.big_blind;
    }
}

fn fold(snapshot: &TableSnapshot, player_id: PlayerId) -> EngineResult<TableSnapshot> {
    reject_during_showdown(snapshot, ActionKind::Fold)?;
    let idx = acting_player(snapshot, player_id)?;

    let mut next = snapshot.clone();
    let seat = next.players[idx].seat;
    next.players[idx].has_folded = true;
    record(&mut next, ActionKind::Fold, Some(player_id), None);
    advance_turn(&mut next, seat);

    let contenders: Vec<usize> = next
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_contender())
        .map(|(i, _)| i)
        .collect();
    if let [survivor] = contenders[..] {
        award_pot(&mut next, survivor, true);
        return Ok(next);
    }

    settle_round_if_complete(&mut next);
    Ok(next)
}

fn check(snapshot: &TableSnapshot, player_id: PlayerId) -> EngineResult<TableSnapshot> {
    reject_during_showdown(snapshot, ActionKind::Check)?;
    let idx = acting_player(snapshot, player_id)?;
    let player = &snapshot.players[idx];
    if snapshot.highest_bet > 0 && player.round_bet != snapshot.highest_bet {
        return Err(EngineError::InvalidAction(
            "cannot check facing a bet".into(),
        ));
    }

    let mut next = snapshot.clone();
    let seat = next.players[idx].seat;
    record(&mut next, ActionKind::Check, Some(player_id), None);
    advance_turn(&mut next, seat);
    settle_round_if_complete(&mut next);
    Ok(next)
}

fn call(snapshot: &TableSnapshot, player_id: PlayerId) -> EngineResult<TableSnapshot> {
    reject_during_showdown(snapshot, ActionKind::Call)?;
    let idx = acting_player(snapshot, player_id)?;

    let mut next = snapshot.clone();
    let seat = next.players[idx].seat;
    let owed = next.highest_bet.saturating_sub(next.players[idx].round_bet);
    deduct(&mut next.players[idx], owed)?;
    next.players[idx].round_bet = next.highest_bet;
    next.pot += owed;
    record(&mut next, ActionKind::Call, Some(player_id), Some(owed));
    advance_turn(&mut next, seat);
    settle_round_if_complete(&mut next);
    Ok(next)
}

/// Bet and raise share one monetary contract: `amount` is the total round
/// contribution to reach, and must top `highest_bet` by at least `min_raise`.
fn wager(
    snapshot: &TableSnapshot,
    player_id: PlayerId,
    amount: Chips,
    kind: ActionKind,
) -> EngineResult<TableSnapshot> {
    reject_during_showdown(snapshot, kind)?;
    let idx = acting_player(snapshot, player_id)?;

    let minimum = snapshot.highest_bet + snapshot.min_raise;
    if amount < minimum {
        return Err(EngineError::InvalidBetAmount { minimum });
    }

    let mut next = snapshot.clone();
    let seat = next.players[idx].seat;
    let delta = amount - next.players[idx].round_bet;
    deduct(&mut next.players[idx], delta)?;
    next.players[idx].round_bet = amount;
    next.pot += delta;
    next.min_raise = amount - next.highest_bet;
    next.highest_bet = amount;
    record(&mut next, kind, Some(player_id), Some(amount));
    advance_turn(&mut next, seat);
    settle_round_if_complete(&mut next);
    Ok(next)
}

fn post_small_blind(snapshot: &TableSnapshot, player_id: PlayerId) -> EngineResult<TableSnapshot> {
    reject_during_showdown(snapshot, ActionKind::SmallBlind)?;
    let idx = snapshot
        .players
        .iter()
        .position(|p| p.id == player_id)
        .ok_or(EngineError::PlayerNotFound)?;

    let Some(small_blind_seat) = positions::small_blind_seat(snapshot) else {
        error!("small-blind seat underivable on table {}", snapshot.id);
        return Err(EngineError::Internal(
            "small-blind seat could not be derived".into(),
        ));
    };
    if snapshot.players[idx].seat != small_blind_seat {
        return Err(EngineError::NotYourTurn);
    }

    let mut next = snapshot.clone();
    let amount = next.small_blind;
    deduct(&mut next.players[idx], amount)?;
    next.players[idx].round_bet = amount;
    next.pot += amount;
    next.highest_bet = amount;
    record(&mut next, ActionKind::SmallBlind, Some(player_id), Some(amount));

    let Some(big_blind_seat) = positions::big_blind_seat(&next, Some(small_blind_seat)) else {
        error!("big-blind seat underivable on table {}", snapshot.id);
        return Err(EngineError::Internal(
            "big-blind seat could not be derived".into(),
        ));
    };
    next.turn_seat = Some(big_blind_seat);
    Ok(next)
}

fn post_big_blind(snapshot: &TableSnapshot, player_id: PlayerId) -> EngineResult<TableSnapshot> {
    reject_during_showdown(snapshot, ActionKind::BigBlind)?;
    let idx = snapshot
        .players
        .iter()
        .position(|p| p.id == player_id)
        .ok_or(EngineError::PlayerNotFound)?;

    let small_blind_seat = positions::small_blind_seat(snapshot);
    let Some(big_blind_seat) = positions::big_blind_seat(snapshot, small_blind_seat) else {
        error!("big-blind seat underivable on table {}", snapshot.id);
        return Err(EngineError::Internal(
            "big-blind seat could not be derived".into(),
        ));
    };
    if snapshot.players[idx].seat != big_blind_seat {
        return Err(EngineError::NotYourTurn);
    }

    let mut next = snapshot.clone();
    let amount = next.big_blind;
    deduct(&mut next.players[idx], amount)?;
    next.players[idx].round_bet = amount;
    next.pot += amount;
    next.highest_bet = amount;
    next.min_raise = amount;
    record(&mut next, ActionKind::BigBlind, Some(player_id), Some(amount));

    if next.phase == Phase::Setup {
        next.phase = Phase::Preflop;
    }
    next.turn_seat = positions::first_to_act_seat(&next);
    if next.turn_seat.is_none() {
        error!("no seat can open the betting on table {}", snapshot.id);
        return Err(EngineError::Internal(
            "first-to-act seat could not be derived".into(),
        ));
    }
    Ok(next)
}

fn sit_out(snapshot: &TableSnapshot, player_id: PlayerId) -> EngineResult<TableSnapshot> {
    let idx = snapshot
        .players
        .iter()
        .position(|p| p.id == player_id)
        .ok_or(EngineError::PlayerNotFound)?;

    let mut next = snapshot.clone();
    let seat = next.players[idx].seat;
    let held_turn = next.turn_seat == Some(seat);
    next.players[idx].sitting_out = true;
    record(&mut next, ActionKind::SitOut, Some(player_id), None);
    if held_turn {
        advance_turn(&mut next, seat);
    }
    Ok(next)
}

fn sit_in(snapshot: &TableSnapshot, player_id: PlayerId) -> EngineResult<TableSnapshot> {
    let idx = snapshot
        .players
        .iter()
        .position(|p| p.id == player_id)
        .ok_or(EngineError::PlayerNotFound)?;

    let mut next = snapshot.clone();
    next.players[idx].sitting_out = false;
    record(&mut next, ActionKind::SitIn, Some(player_id), None);
    Ok(next)
}

fn declare_win(snapshot: &TableSnapshot, winner_id: PlayerId) -> EngineResult<TableSnapshot> {
    let idx = snapshot
        .players
        .iter()
        .position(|p| p.id == winner_id)
        .ok_or(EngineError::PlayerNotFound)?;

    let mut next = snapshot.clone();
    award_pot(&mut next, idx, false);
    Ok(next)
}
