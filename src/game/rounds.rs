//! Round-completion detector.
//!
//! Decides, after each betting action, whether the current betting round has
//! closed. All reasoning is scoped to the current hand: the append-only
//! action history is segmented at the most recent `Win` record, and nothing
//! before that boundary is consulted.

use super::entities::{ActionKind, ActionRecord, Phase, SeatNumber, TableSnapshot};
use super::positions;

/// The slice of the action history belonging to the hand in progress.
///
/// A `Win` record concludes a hand, so the current hand starts right after
/// the latest one.
#[must_use]
pub fn current_hand_actions(actions: &[ActionRecord]) -> &[ActionRecord] {
    match actions.iter().rposition(|r| r.kind == ActionKind::Win) {
        Some(boundary) => &actions[boundary + 1..],
        None => actions,
    }
}

/// The seat of the contender whose bet or raise most recently set
/// `highest_bet`, if any bet or raise has happened this hand.
#[must_use]
pub fn last_aggressor_seat(snapshot: &TableSnapshot) -> Option<SeatNumber> {
    current_hand_actions(&snapshot.actions)
        .iter()
        .rev()
        .find(|r| matches!(r.kind, ActionKind::Bet | ActionKind::Raise))
        .and_then(|r| r.player_id)
        .and_then(|id| snapshot.player(id))
        .map(|p| p.seat)
}

/// Whether the current betting round has closed.
///
/// The closing rule is a three-way disjunction over where the turn pointer
/// must have landed, gated by every contender having matched `highest_bet`:
///
/// 1. Pre-flop with no raise and `highest_bet` still equal to the big blind,
///    the big blind keeps the option to raise: the round stays open until
///    the turn pointer has moved past the big-blind seat.
/// 2. With a live aggressor, the round closes when the pointer returns to
///    the aggressor's seat (or to the first eligible seat after it, when the
///    raise put the aggressor all-in and turn advancement skips them).
/// 3. Otherwise (check-around, or a stale aggressor from an earlier round),
///    the round closes when the pointer returns to the phase's first seat
///    to act.
#[must_use]
pub fn is_betting_round_complete(snapshot: &TableSnapshot) -> bool {
    let contenders: Vec<_> = snapshot
        .players
        .iter()
        .filter(|p| p.is_contender())
        .collect();
    if contenders.len() <= 1 {
        return true;
    }

    let hand = current_hand_actions(&snapshot.actions);
    if snapshot.phase != Phase::Preflop && hand.is_empty() {
        return false;
    }

    if !contenders
        .iter()
        .all(|p| p.round_bet == snapshot.highest_bet)
    {
        return false;
    }

    let aggressor = last_aggressor_seat(snapshot);

    if snapshot.phase == Phase::Preflop
        && aggressor.is_none()
        && snapshot.highest_bet == snapshot.big_blind
    {
        // Everyone merely called the blind; the big blind still gets to act.
        let small_blind = positions::small_blind_seat(snapshot);
        return match positions::big_blind_seat(snapshot, small_blind) {
            Some(big_blind) => snapshot.turn_seat != Some(big_blind),
            None => true,
        };
    }

    if let Some(aggressor) = aggressor {
        if snapshot.highest_bet > 0 {
            let past_aggressor = positions::next_active_seat(&snapshot.players, Some(aggressor));
            return snapshot.turn_seat == Some(aggressor) || snapshot.turn_seat == past_aggressor;
        }
    }

    match positions::first_to_act_seat(snapshot) {
        Some(first) => snapshot.turn_seat == Some(first),
        None => true,
    }
}
