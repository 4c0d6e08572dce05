//! Benchmarks for the order book and the matching engine.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- single_match
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;
use std::time::Duration;

use tradematch::types::price::units;
use tradematch::{MatchingEngine, Order, OrderBook, OrderId, OrderType, Side};

const SYMBOL: &str = "AAPL";

/// 150.00000000
const BASE_PRICE: u64 = 15_000_000_000;

// ============================================================================
// HELPER FUNCTIONS - Deterministic order generation
// ============================================================================

fn make_order(id: OrderId, side: Side, price: u64, quantity: u64) -> Order {
    Order::limit(id, 1, SYMBOL, side, price, quantity, id).unwrap()
}

/// Book with `count` asks from `base_price` upward, one order per level.
/// Order ids are 1..=count.
fn book_with_asks(count: usize, base_price: u64, price_step: u64, quantity: u64) -> OrderBook {
    let mut book = OrderBook::with_capacity(SYMBOL, count * 2);
    for i in 0..count as u64 {
        let order = make_order(i + 1, Side::Sell, base_price + i * price_step, quantity);
        book.add_order(order).unwrap();
    }
    book
}

/// Add `count` bids from `base_price` downward, ids starting at `first_id`.
fn add_bids(book: &mut OrderBook, first_id: OrderId, count: usize, base_price: u64, price_step: u64, quantity: u64) {
    for i in 0..count as u64 {
        let order = make_order(first_id + i, Side::Buy, base_price - i * price_step, quantity);
        book.add_order(order).unwrap();
    }
}

fn generate_order_batch(count: usize, seed: u64) -> Vec<Order> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            // ±5.00000000 around the base
            let price_offset: i64 = rng.gen_range(-500_000_000i64..=500_000_000i64);
            let price = (BASE_PRICE as i64 + price_offset) as u64;
            let quantity: u64 = rng.gen_range(1_000_000..=100_000_000);
            make_order((i + 1) as u64, side, price, quantity)
        })
        .collect()
}

// ============================================================================
// BENCHMARK: Single Match Latency
// ============================================================================

fn bench_single_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_match");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("against_1k_orders", |b| {
        b.iter_batched(
            || {
                let book = book_with_asks(1_000, BASE_PRICE, units(1) / 100, units(1));
                (book, make_order(1_000_000, Side::Buy, BASE_PRICE, units(1)))
            },
            |(mut book, buy)| black_box(book.add_order(buy)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("multi_level_sweep", |b| {
        b.iter_batched(
            || {
                let book = book_with_asks(100, BASE_PRICE, units(1) / 100, units(1) / 10);
                // Large enough to sweep 10 levels
                (book, make_order(1_000_000, Side::Buy, BASE_PRICE + units(1), units(1)))
            },
            |(mut book, buy)| black_box(book.add_order(buy)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("no_match_rest_on_book", |b| {
        b.iter_batched(
            || {
                let book = book_with_asks(1_000, BASE_PRICE, units(1) / 100, units(1));
                (book, make_order(1_000_000, Side::Buy, BASE_PRICE - units(1), units(1)))
            },
            |(mut book, buy)| black_box(book.add_order(buy)),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Order Operations
// ============================================================================

fn bench_order_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_operations");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("add_to_empty", |b| {
        b.iter_batched(
            || OrderBook::new(SYMBOL),
            |mut book| black_box(book.add_order(make_order(1, Side::Buy, BASE_PRICE, units(1)))),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("cancel_order", |b| {
        b.iter_batched(
            || {
                let mut book = OrderBook::with_capacity(SYMBOL, 2_000);
                add_bids(&mut book, 1, 1_000, BASE_PRICE, units(1) / 100, units(1));
                book
            },
            // Middle of the book
            |mut book| black_box(book.cancel_order(500)),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Throughput
// ============================================================================

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(15));
    group.sample_size(50);

    for batch_size in [1_000, 10_000, 50_000] {
        group.throughput(Throughput::Elements(batch_size as u64));

        group.bench_with_input(BenchmarkId::new("orders", batch_size), &batch_size, |b, &size| {
            let orders = generate_order_batch(size, 42);

            b.iter_batched(
                || (OrderBook::with_capacity(SYMBOL, size), orders.clone()),
                |(mut book, orders)| {
                    for order in orders {
                        let _ = black_box(book.add_order(order));
                    }
                    book.order_count()
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Engine with ledgers
// ============================================================================

fn bench_engine_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("submit_crossing_pair", |b| {
        let mut engine = MatchingEngine::new();
        engine.register_trader(1, "Buyer", Decimal::from(u32::MAX));
        engine.register_trader(2, "Seller", Decimal::from(u32::MAX));
        engine
            .trader_mut(2)
            .unwrap()
            .apply_fill(SYMBOL, units(10_000_000), units(1), Side::Buy)
            .unwrap();

        b.iter(|| {
            let sell = engine.submit_order(2, SYMBOL, units(1), BASE_PRICE, Side::Sell, OrderType::Limit);
            let buy = engine.submit_order(1, SYMBOL, units(1), BASE_PRICE, Side::Buy, OrderType::Limit);
            black_box((sell, buy))
        });
    });

    group.finish();
}

// ============================================================================
// CRITERION ENTRY POINT
// ============================================================================

criterion_group!(
    benches,
    bench_single_match,
    bench_order_operations,
    bench_throughput,
    bench_engine_submit
);

criterion_main!(benches);
