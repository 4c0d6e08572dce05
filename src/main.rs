//! TradeMatch - demo binary
//!
//! Registers a few traders, runs a short trading session through the
//! matching engine and prints the resulting market data. Set `RUST_LOG`
//! (e.g. `RUST_LOG=tradematch=debug`) to see the engine's log output.

use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use tradematch::types::price::{from_fixed_trimmed, units};
use tradematch::{FillEvent, LiquidityRole, MatchingEngine, OrderType, Side};

fn price_or_dash(price: Option<u64>) -> String {
    price.map(from_fixed_trimmed).unwrap_or_else(|| "-".to_string())
}

fn main() -> tradematch::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tradematch=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    println!("===========================================");
    println!("  TradeMatch - continuous matching engine");
    println!("===========================================");
    println!();

    let mut engine = MatchingEngine::new();
    engine.register_trader(1, "Alice", Decimal::from(50_000));
    engine.register_trader(2, "Bob", Decimal::from(75_000));
    engine.register_trader_with_default_cash(3, "Charlie");

    // Opening inventory
    if let Some(bob) = engine.trader_mut(2) {
        bob.apply_fill("AAPL", units(200), units(140), Side::Buy)?;
    }
    if let Some(charlie) = engine.trader_mut(3) {
        charlie.apply_fill("AAPL", units(100), units(145), Side::Buy)?;
    }

    engine.add_listener(|event: &FillEvent| {
        let role = match event.role {
            LiquidityRole::Maker => "maker",
            LiquidityRole::Taker => "taker",
        };
        println!(
            "  fill: trader {} {:?} {} {} @ {} ({})",
            event.trader_id,
            event.side,
            from_fixed_trimmed(event.quantity),
            event.symbol,
            from_fixed_trimmed(event.price),
            role
        );
    });

    println!("Quoting AAPL...");
    engine.submit_order(2, "AAPL", units(50), units(151), Side::Sell, OrderType::Limit)?;
    engine.submit_order(2, "AAPL", units(50), units(152), Side::Sell, OrderType::Limit)?;
    engine.submit_order(3, "AAPL", units(40), units(150), Side::Sell, OrderType::Limit)?;
    engine.submit_order(1, "AAPL", units(30), units(148), Side::Buy, OrderType::Limit)?;

    println!("Sweeping the offer...");
    let sweep = engine.submit_order(1, "AAPL", units(120), units(152), Side::Buy, OrderType::Limit)?;

    println!();
    println!("Market data (AAPL):");
    println!("  best bid:   {}", price_or_dash(engine.best_bid("AAPL")));
    println!("  best ask:   {}", price_or_dash(engine.best_ask("AAPL")));
    println!("  spread:     {}", price_or_dash(engine.spread("AAPL")));
    println!("  last price: {}", price_or_dash(engine.last_price("AAPL")));
    if let Some(order) = engine.order(sweep) {
        println!(
            "  sweep order #{}: {:?}, filled {}",
            order.id,
            order.status(),
            from_fixed_trimmed(order.filled_quantity())
        );
    }
    if let Some(book) = engine.order_book("AAPL") {
        println!("  state root: {}", book.state_root_hex());
    }

    engine.update_marks("AAPL");

    println!();
    println!("Traders:");
    let mut traders: Vec<_> = engine.traders().collect();
    traders.sort_by_key(|t| t.id());
    for trader in traders {
        println!(
            "  {:<8} cash {:>10}  portfolio {:>10}  unrealized {:>8}",
            trader.name(),
            trader.cash().round_dp(2),
            trader.portfolio_value().round_dp(2),
            trader.total_unrealized_pnl().round_dp(2)
        );
    }

    println!();
    println!(
        "{} trades, volume {}",
        engine.total_trade_count(),
        from_fixed_trimmed(engine.total_volume())
    );

    Ok(())
}
