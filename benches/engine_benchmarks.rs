use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use holdem_table::{
    PlayerAction, PlayerId, RoomCode, SeatNumber, TableSnapshot, Username, game::lifecycle,
};

/// Helper to create a table with N players, blinds posted, action open
fn setup_table_with_players(n_players: usize) -> TableSnapshot {
    let mut snapshot = TableSnapshot::new(RoomCode::new("BENCH1"), 5, 10);
    for i in 0..n_players {
        let (next, _) = snapshot
            .with_player_seated(Username::new(&format!("player{i}")), i + 1, 1000)
            .unwrap();
        snapshot = next;
    }
    let snapshot = lifecycle::start_game_with_dealer(&snapshot, 1).unwrap();

    let small_blind = snapshot.turn_seat.unwrap();
    let snapshot = snapshot
        .apply(&PlayerAction::PostSmallBlind {
            player_id: id_at(&snapshot, small_blind),
        })
        .unwrap();
    let big_blind = snapshot.turn_seat.unwrap();
    snapshot
        .apply(&PlayerAction::PostBigBlind {
            player_id: id_at(&snapshot, big_blind),
        })
        .unwrap()
}

fn id_at(snapshot: &TableSnapshot, seat: SeatNumber) -> PlayerId {
    snapshot.player_at_seat(seat).unwrap().id
}

/// Benchmark a single call applied to a ready table
fn bench_apply_call(c: &mut Criterion) {
    let snapshot = setup_table_with_players(6);
    let action = PlayerAction::Call {
        player_id: id_at(&snapshot, snapshot.turn_seat.unwrap()),
    };

    c.bench_function("apply_call", |b| {
        b.iter(|| snapshot.apply(&action).unwrap());
    });
}

/// Benchmark a raise, which touches bet tracking and round detection
fn bench_apply_raise(c: &mut Criterion) {
    let snapshot = setup_table_with_players(6);
    let action = PlayerAction::Raise {
        player_id: id_at(&snapshot, snapshot.turn_seat.unwrap()),
        amount: 30,
    };

    c.bench_function("apply_raise", |b| {
        b.iter(|| snapshot.apply(&action).unwrap());
    });
}

/// Benchmark a full pre-flop of calls for varying table sizes
fn bench_preflop_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("preflop_round");
    for n_players in [2, 6, 9] {
        group.bench_with_input(
            BenchmarkId::from_parameter(n_players),
            &n_players,
            |b, &n| {
                let ready = setup_table_with_players(n);
                b.iter(|| {
                    let mut snapshot = ready.clone();
                    while snapshot.phase == holdem_table::Phase::Preflop {
                        let seat = snapshot.turn_seat.unwrap();
                        let call = PlayerAction::Call {
                            player_id: id_at(&snapshot, seat),
                        };
                        snapshot = snapshot.apply(&call).unwrap();
                    }
                    snapshot
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_apply_call,
    bench_apply_raise,
    bench_preflop_round
);
criterion_main!(benches);
