//! Pricing Benchmarks - Hot-Path Performance Validation
//!
//! Benchmarks the pure functions that run on every quote and order:
//! ladder alignment, odds conversion and net margin.
//!
//! Run with: cargo bench --bench pricing_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;

use venue_runtime::domain::ladder::{OddsLadder, align};
use venue_runtime::domain::margin::{NetMarginInputs, compute_net_margin};
use venue_runtime::domain::odds;

/// Benchmark fixed-step alignment.
fn bench_align_step(c: &mut Criterion) {
    let ladder = OddsLadder::Step(0.05);

    c.bench_function("align_step", |b| {
        b.iter(|| {
            let _aligned = align(black_box(1.934), black_box(&ladder));
        });
    });
}

/// Benchmark alignment against a realistic explicit ladder (1.01..=10.0).
fn bench_align_levels(c: &mut Criterion) {
    let levels: Vec<f64> = (101..=1000).map(|cents| f64::from(cents) / 100.0).collect();
    let ladder = OddsLadder::Levels(levels);

    c.bench_function("align_levels_900", |b| {
        b.iter(|| {
            let _aligned = align(black_box(4.567), black_box(&ladder));
        });
    });
}

/// Benchmark overround removal on a three-way market.
fn bench_remove_overround(c: &mut Criterion) {
    let prices = [2.1, 3.4, 3.9];

    c.bench_function("remove_overround_3way", |b| {
        b.iter(|| {
            let _fair = odds::remove_overround(black_box(&prices));
        });
    });
}

/// Benchmark Decimal net margin for one two-leg opportunity.
fn bench_net_margin(c: &mut Criterion) {
    let inputs = NetMarginInputs {
        odds_ladder: dec!(2.10),
        odds_simulation: dec!(2.05),
        fees_ladder: dec!(0.002),
        fees_simulation: dec!(0.003),
        gas_cost: dec!(0.001),
        slippage_ladder: dec!(0.001),
        slippage_simulation: dec!(0.001),
    };

    c.bench_function("net_margin", |b| {
        b.iter(|| {
            let _margin = compute_net_margin(black_box(&inputs));
        });
    });
}

criterion_group!(
    benches,
    bench_align_step,
    bench_align_levels,
    bench_remove_overround,
    bench_net_margin,
);
criterion_main!(benches);
