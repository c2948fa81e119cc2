//! Position calculator: pure functions deriving blind seats, the first
//! seat to act, and the next seat to act from dealer position and seat
//! occupancy.
//!
//! All of these work on seat numbers in ascending circular order; after the
//! highest occupied seat the search wraps back to the lowest.

use super::entities::{Phase, Player, SeatNumber, TableSnapshot};

/// The next seat eligible to act after `from_seat`, in circular order.
///
/// Only seats whose occupant can act (has chips, not folded, not sitting
/// out) are candidates. The anchor seat itself does not need to be eligible;
/// a folder's seat still anchors the search. `None` when no seat is
/// eligible, the first eligible seat when `from_seat` is `None`.
#[must_use]
pub fn next_active_seat(players: &[Player], from_seat: Option<SeatNumber>) -> Option<SeatNumber> {
    let mut seats: Vec<SeatNumber> = players
        .iter()
        .filter(|p| p.can_act())
        .map(|p| p.seat)
        .collect();
    seats.sort_unstable();
    let from = match from_seat {
        Some(from) => from,
        None => return seats.first().copied(),
    };
    seats
        .iter()
        .find(|&&seat| seat > from)
        .or_else(|| seats.first())
        .copied()
}

/// The seat that posts the small blind, or `None` before a dealer exists.
///
/// Heads-up the dealer posts the small blind; otherwise it is the next
/// eligible seat after the dealer.
#[must_use]
pub fn small_blind_seat(snapshot: &TableSnapshot) -> Option<SeatNumber> {
    let dealer = snapshot.dealer_seat?;
    let active = snapshot.players.iter().filter(|p| p.is_active()).count();
    if active == 2 {
        return Some(dealer);
    }
    next_active_seat(&snapshot.players, Some(dealer))
}

/// The seat that posts the big blind: the next eligible seat after the
/// small blind.
#[must_use]
pub fn big_blind_seat(
    snapshot: &TableSnapshot,
    small_blind: Option<SeatNumber>,
) -> Option<SeatNumber> {
    let small_blind = small_blind?;
    next_active_seat(&snapshot.players, Some(small_blind))
}

/// The seat that opens the betting for the snapshot's phase.
///
/// Pre-flop action starts after the big blind (after the dealer if no big
/// blind seat can be derived); on later streets it starts at the first
/// eligible seat after the dealer.
#[must_use]
pub fn first_to_act_seat(snapshot: &TableSnapshot) -> Option<SeatNumber> {
    let dealer = snapshot.dealer_seat?;
    match snapshot.phase {
        Phase::Setup | Phase::Preflop => {
            let small_blind = small_blind_seat(snapshot);
            match big_blind_seat(snapshot, small_blind) {
                Some(big_blind) => next_active_seat(&snapshot.players, Some(big_blind)),
                None => next_active_seat(&snapshot.players, Some(dealer)),
            }
        }
        _ => next_active_seat(&snapshot.players, Some(dealer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{RoomCode, Username};

    fn table_with_seats(seats: &[SeatNumber]) -> TableSnapshot {
        let mut snapshot = TableSnapshot::new(RoomCode::new("POS123"), 5, 10);
        for &seat in seats {
            let (next, _) = snapshot
                .with_player_seated(Username::new(&format!("p{seat}")), seat, 1000)
                .unwrap();
            snapshot = next;
        }
        snapshot
    }

    #[test]
    fn test_next_active_seat_wraps() {
        let snapshot = table_with_seats(&[1, 3, 5]);
        assert_eq!(next_active_seat(&snapshot.players, Some(1)), Some(3));
        assert_eq!(next_active_seat(&snapshot.players, Some(5)), Some(1));
    }

    #[test]
    fn test_next_active_seat_from_none_returns_first() {
        let snapshot = table_with_seats(&[2, 4]);
        assert_eq!(next_active_seat(&snapshot.players, None), Some(2));
    }

    #[test]
    fn test_next_active_seat_skips_folded_and_sitting_out() {
        let mut snapshot = table_with_seats(&[1, 2, 3, 4]);
        snapshot.players[1].has_folded = true;
        snapshot.players[2].sitting_out = true;
        assert_eq!(next_active_seat(&snapshot.players, Some(1)), Some(4));
    }

    #[test]
    fn test_next_active_seat_skips_all_in_players() {
        let mut snapshot = table_with_seats(&[1, 2, 3]);
        snapshot.players[1].chips = 0;
        assert_eq!(next_active_seat(&snapshot.players, Some(1)), Some(3));
    }

    #[test]
    fn test_next_active_seat_anchor_need_not_be_eligible() {
        let mut snapshot = table_with_seats(&[1, 2, 3]);
        snapshot.players[1].has_folded = true;
        // Seat 2 just folded; the action still moves to seat 3, not back
        // to seat 1.
        assert_eq!(next_active_seat(&snapshot.players, Some(2)), Some(3));
    }

    #[test]
    fn test_next_active_seat_empty_table() {
        let snapshot = table_with_seats(&[]);
        assert_eq!(next_active_seat(&snapshot.players, Some(1)), None);
        assert_eq!(next_active_seat(&snapshot.players, None), None);
    }

    #[test]
    fn test_turn_order_is_circular_over_contenders() {
        let snapshot = table_with_seats(&[1, 4, 7, 9]);
        let mut seat = Some(4);
        for _ in 0..4 {
            seat = next_active_seat(&snapshot.players, seat);
        }
        assert_eq!(seat, Some(4));
    }

    #[test]
    fn test_small_blind_requires_dealer() {
        let snapshot = table_with_seats(&[1, 2, 3]);
        assert_eq!(small_blind_seat(&snapshot), None);
    }

    #[test]
    fn test_small_blind_follows_dealer() {
        let mut snapshot = table_with_seats(&[1, 2, 3]);
        snapshot.dealer_seat = Some(1);
        assert_eq!(small_blind_seat(&snapshot), Some(2));
        assert_eq!(big_blind_seat(&snapshot, Some(2)), Some(3));
    }

    #[test]
    fn test_heads_up_dealer_posts_small_blind() {
        let mut snapshot = table_with_seats(&[2, 6]);
        snapshot.dealer_seat = Some(2);
        assert_eq!(small_blind_seat(&snapshot), Some(2));
        assert_eq!(big_blind_seat(&snapshot, Some(2)), Some(6));
    }

    #[test]
    fn test_first_to_act_preflop_is_after_big_blind() {
        let mut snapshot = table_with_seats(&[1, 2, 3, 4]);
        snapshot.dealer_seat = Some(1);
        snapshot.phase = Phase::Preflop;
        // Small blind 2, big blind 3, so action opens on 4.
        assert_eq!(first_to_act_seat(&snapshot), Some(4));
    }

    #[test]
    fn test_first_to_act_postflop_is_after_dealer() {
        let mut snapshot = table_with_seats(&[1, 2, 3, 4]);
        snapshot.dealer_seat = Some(1);
        snapshot.phase = Phase::Flop;
        assert_eq!(first_to_act_seat(&snapshot), Some(2));
    }

    #[test]
    fn test_first_to_act_heads_up_preflop_is_dealer() {
        let mut snapshot = table_with_seats(&[2, 6]);
        snapshot.dealer_seat = Some(2);
        snapshot.phase = Phase::Preflop;
        assert_eq!(first_to_act_seat(&snapshot), Some(2));
    }
}
