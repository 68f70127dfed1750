use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use holdem_core::cards::{Card, Rank, Suit};
use holdem_core::equity::{run_equity, EquityRequest, PlayerHand};
use holdem_core::hand::{Board, HoleCards};

fn heads_up_preflop(trials: u64) -> EquityRequest {
    let aces = HoleCards::try_new(
        Card::new(Rank::Ace, Suit::Spades),
        Card::new(Rank::Ace, Suit::Hearts),
    )
    .unwrap();
    let kings = HoleCards::try_new(
        Card::new(Rank::King, Suit::Spades),
        Card::new(Rank::King, Suit::Hearts),
    )
    .unwrap();
    EquityRequest::new(
        vec![PlayerHand::Specific(aces), PlayerHand::Specific(kings)],
        Board::try_new(Vec::new()).unwrap(),
        trials,
        42,
    )
}

fn bench_heads_up_preflop(c: &mut Criterion) {
    let mut g = c.benchmark_group("heads_up_preflop");
    for &trials in &[1_000u64, 10_000] {
        g.bench_with_input(BenchmarkId::new("trials", trials), &trials, |b, &trials| {
            let request = heads_up_preflop(trials);
            b.iter(|| run_equity(black_box(&request)).unwrap())
        });
    }
    g.finish();
}

fn bench_flop_three_way(c: &mut Criterion) {
    let a = HoleCards::try_new(
        Card::new(Rank::Ace, Suit::Hearts),
        Card::new(Rank::King, Suit::Hearts),
    )
    .unwrap();
    let b_hole = HoleCards::try_new(
        Card::new(Rank::Queen, Suit::Clubs),
        Card::new(Rank::Queen, Suit::Diamonds),
    )
    .unwrap();
    let c_hole = HoleCards::try_new(
        Card::new(Rank::Seven, Suit::Spades),
        Card::new(Rank::Six, Suit::Spades),
    )
    .unwrap();
    let board = Board::try_new(vec![
        Card::new(Rank::Jack, Suit::Hearts),
        Card::new(Rank::Eight, Suit::Spades),
        Card::new(Rank::Two, Suit::Clubs),
    ])
    .unwrap();
    let request = EquityRequest::new(
        vec![
            PlayerHand::Specific(a),
            PlayerHand::Specific(b_hole),
            PlayerHand::Specific(c_hole),
        ],
        board,
        5_000,
        7,
    );
    c.bench_function("flop_three_way_5000_trials", |b| {
        b.iter(|| run_equity(black_box(&request)).unwrap())
    });
}

#[cfg(feature = "parallel")]
fn bench_heads_up_preflop_parallel(c: &mut Criterion) {
    use holdem_core::equity::run_equity_parallel;

    let request = heads_up_preflop(50_000);
    c.bench_function("heads_up_preflop_parallel_50000_trials", |b| {
        b.iter(|| run_equity_parallel(black_box(&request)).unwrap())
    });
}

#[cfg(feature = "parallel")]
criterion_group!(
    benches,
    bench_heads_up_preflop,
    bench_flop_three_way,
    bench_heads_up_preflop_parallel
);
#[cfg(not(feature = "parallel"))]
criterion_group!(benches, bench_heads_up_preflop, bench_flop_three_way);

criterion_main!(benches);
