//! The matching engine: participant registry, per-symbol books, and the
//! order entry path that ties them together.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::engine::{EngineConfig, FillEvent, LedgerSettlement, MonotonicClock, TradeListener};
use crate::error::{EngineError, Result};
use crate::ledger::Trader;
use crate::orderbook::OrderBook;
use crate::types::{Order, OrderId, OrderType, Side, Trade, TraderId};

/// Continuous-matching engine over any number of symbols.
///
/// All operations take `&self` or `&mut self`; the exclusive borrow
/// serializes every book and ledger mutation. Share an engine across
/// threads by wrapping it in a mutex.
///
/// ## Example
///
/// ```
/// use rust_decimal::Decimal;
/// use tradematch::engine::MatchingEngine;
/// use tradematch::types::{OrderType, Side};
/// use tradematch::types::price::units;
///
/// let mut engine = MatchingEngine::new();
/// engine.register_trader(1, "Alice", Decimal::from(50_000));
/// engine.register_trader(2, "Bob", Decimal::from(50_000));
/// engine.trader_mut(2).unwrap()
///     .apply_fill("AAPL", units(100), units(100), Side::Buy)
///     .unwrap();
///
/// engine.submit_order(2, "AAPL", units(100), units(150), Side::Sell, OrderType::Limit).unwrap();
/// engine.submit_order(1, "AAPL", units(100), units(150), Side::Buy, OrderType::Limit).unwrap();
///
/// assert_eq!(engine.last_price("AAPL"), Some(units(150)));
/// assert_eq!(engine.trader(1).unwrap().cash(), Decimal::from(35_000));
/// ```
pub struct MatchingEngine {
    config: EngineConfig,

    books: HashMap<String, OrderBook>,

    traders: HashMap<TraderId, Trader>,

    /// Order id to symbol, for every accepted order not cancelled via the
    /// engine
    orders: HashMap<OrderId, String>,

    next_order_id: OrderId,

    clock: MonotonicClock,

    listeners: Vec<Box<dyn TradeListener + Send>>,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            books: HashMap::new(),
            traders: HashMap::new(),
            orders: HashMap::new(),
            next_order_id: 1,
            clock: MonotonicClock::new(),
            listeners: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Participants
    // ========================================================================

    /// Register a participant, replacing and returning any previous
    /// registration under the same id.
    pub fn register_trader(
        &mut self,
        id: TraderId,
        name: impl Into<String>,
        initial_cash: Decimal,
    ) -> Option<Trader> {
        let trader = Trader::new(id, name, initial_cash).with_position_epsilon(self.config.position_epsilon);
        info!(trader_id = id, name = trader.name(), cash = %initial_cash, "trader registered");

        let previous = self.traders.insert(id, trader);
        if previous.is_some() {
            warn!(trader_id = id, "trader registration replaced");
        }
        previous
    }

    /// Register a participant with the configured default cash.
    pub fn register_trader_with_default_cash(&mut self, id: TraderId, name: impl Into<String>) -> Option<Trader> {
        let cash = self.config.default_initial_cash;
        self.register_trader(id, name, cash)
    }

    #[inline]
    pub fn trader(&self, id: TraderId) -> Option<&Trader> {
        self.traders.get(&id)
    }

    #[inline]
    pub fn trader_mut(&mut self, id: TraderId) -> Option<&mut Trader> {
        self.traders.get_mut(&id)
    }

    pub fn traders(&self) -> impl Iterator<Item = &Trader> {
        self.traders.values()
    }

    /// Deposit or withdraw cash for a registered participant.
    pub fn add_cash(&mut self, id: TraderId, amount: Decimal) -> Result<()> {
        self.traders
            .get_mut(&id)
            .ok_or(EngineError::TraderNotFound(id))?
            .add_cash(amount)
    }

    /// Subscribe to fill notifications.
    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: TradeListener + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // ========================================================================
    // Order Entry
    // ========================================================================

    /// Validate, match and (if not fully filled) rest a new order.
    ///
    /// Returns the new order id. Ids start at 1 and are only consumed by
    /// accepted orders.
    ///
    /// # Errors
    ///
    /// - [`EngineError::TraderNotFound`] for an unregistered trader
    /// - [`EngineError::InsufficientFunds`] if a buy's `quantity * price`
    ///   exceeds the trader's cash
    /// - [`EngineError::InsufficientInventory`] if a sell exceeds holdings
    /// - [`EngineError::InvalidArgument`] for a zero quantity, or a zero
    ///   price on a limit order
    ///
    /// A rejected submission changes nothing.
    pub fn submit_order(
        &mut self,
        trader_id: TraderId,
        symbol: &str,
        quantity: u64,
        price: u64,
        side: Side,
        order_type: OrderType,
    ) -> Result<OrderId> {
        let order = self
            .validate(trader_id, symbol, quantity, price, side, order_type)
            .inspect_err(|e| warn!(trader_id, symbol, ?side, error = %e, "order rejected"))?;
        let order_id = order.id;

        let capacity = self.config.book_capacity;
        let book = self
            .books
            .entry(symbol.to_string())
            .or_insert_with(|| OrderBook::with_capacity(symbol, capacity));

        let result = book.add_order_with(order, &mut LedgerSettlement::new(&mut self.traders))?;

        self.next_order_id += 1;
        self.orders.insert(order_id, symbol.to_string());

        debug!(
            order_id,
            trader_id,
            symbol,
            ?side,
            filled = result.filled_quantity,
            resting = result.resting_quantity,
            status = ?result.status,
            "order accepted"
        );

        for trade in &result.trades {
            self.publish(trade);
        }

        Ok(order_id)
    }

    /// Cancel a resting order.
    ///
    /// Returns `false` if the id is unknown, already cancelled, or already
    /// filled.
    pub fn cancel_order(&mut self, order_id: OrderId) -> bool {
        let Some(symbol) = self.orders.get(&order_id) else {
            return false;
        };
        let cancelled = self
            .books
            .get_mut(symbol)
            .is_some_and(|book| book.cancel_order(order_id));

        if cancelled {
            self.orders.remove(&order_id);
            debug!(order_id, "order cancelled");
        }
        cancelled
    }

    /// Pre-trade checks plus order construction. Books and ledgers are not
    /// touched.
    fn validate(
        &mut self,
        trader_id: TraderId,
        symbol: &str,
        quantity: u64,
        price: u64,
        side: Side,
        order_type: OrderType,
    ) -> Result<Order> {
        let trader = self
            .traders
            .get(&trader_id)
            .ok_or(EngineError::TraderNotFound(trader_id))?;
        trader.check_fill(symbol, quantity, price, side)?;

        let timestamp = self.clock.now();
        Order::new(
            self.next_order_id,
            trader_id,
            symbol,
            side,
            order_type,
            price,
            quantity,
            timestamp,
        )
    }

    fn publish(&mut self, trade: &Trade) {
        info!(
            symbol = %trade.symbol,
            quantity = trade.quantity,
            price = trade.price,
            buyer = trade.buy_trader_id,
            seller = trade.sell_trader_id,
            "trade executed"
        );

        for event in FillEvent::pair(trade) {
            for listener in &mut self.listeners {
                listener.on_fill(&event);
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Snapshot of an accepted order. Orders cancelled through
    /// [`MatchingEngine::cancel_order`] are forgotten.
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        let symbol = self.orders.get(&order_id)?;
        self.books.get(symbol)?.find_order(order_id)
    }

    /// Number of orders known to the engine.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn order_book(&self, symbol: &str) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    /// Symbols with a book, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.books.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn best_bid(&self, symbol: &str) -> Option<u64> {
        self.books.get(symbol)?.best_bid()
    }

    pub fn best_ask(&self, symbol: &str) -> Option<u64> {
        self.books.get(symbol)?.best_ask()
    }

    pub fn spread(&self, symbol: &str) -> Option<u64> {
        self.books.get(symbol)?.spread()
    }

    pub fn last_price(&self, symbol: &str) -> Option<u64> {
        self.books.get(symbol)?.last_trade_price()
    }

    /// Every trade on every book, in execution order.
    pub fn all_trades(&self) -> Vec<&Trade> {
        let mut trades: Vec<&Trade> = self.books.values().flat_map(|b| b.trades()).collect();
        // Stable: trades from one submission keep their book order
        trades.sort_by_key(|t| t.timestamp);
        trades
    }

    pub fn total_trade_count(&self) -> usize {
        self.books.values().map(OrderBook::trade_count).sum()
    }

    /// Traded quantity across all books (fixed-point), saturating.
    pub fn total_volume(&self) -> u64 {
        self.books
            .values()
            .fold(0u64, |acc, b| acc.saturating_add(b.total_volume()))
    }

    /// Re-mark every participant's position in `symbol` at its last trade
    /// price. No-op before the first trade.
    pub fn update_marks(&mut self, symbol: &str) {
        let Some(price) = self.last_price(symbol) else {
            return;
        };
        for trader in self.traders.values_mut() {
            trader.update_position(symbol, price);
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::units;
    use crate::types::OrderStatus;
    use std::sync::{Arc, Mutex};

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    /// Engine with a buyer (1) holding cash and a seller (2) holding 1_000 AAPL.
    fn setup() -> MatchingEngine {
        let mut engine = MatchingEngine::new();
        engine.register_trader(1, "Buyer", dec(100_000));
        engine.register_trader(2, "Seller", dec(100_000));
        engine
            .trader_mut(2)
            .unwrap()
            .apply_fill("AAPL", units(1_000), units(100), Side::Buy)
            .unwrap();
        engine
    }

    fn limit(engine: &mut MatchingEngine, trader: TraderId, side: Side, quantity: u64, price: u64) -> Result<OrderId> {
        engine.submit_order(trader, "AAPL", units(quantity), units(price), side, OrderType::Limit)
    }

    #[test]
    fn test_order_ids_start_at_one() {
        let mut engine = setup();
        assert_eq!(limit(&mut engine, 1, Side::Buy, 10, 140).unwrap(), 1);
        assert_eq!(limit(&mut engine, 1, Side::Buy, 10, 141).unwrap(), 2);
        assert_eq!(engine.order_count(), 2);
    }

    #[test]
    fn test_unknown_trader_rejected() {
        let mut engine = setup();
        let err = limit(&mut engine, 999, Side::Buy, 10, 150).unwrap_err();
        assert_eq!(err, EngineError::TraderNotFound(999));
        assert_eq!(engine.order_count(), 0);
        assert!(engine.order_book("AAPL").is_none());
    }

    #[test]
    fn test_rejections_do_not_consume_ids() {
        let mut engine = setup();

        assert!(matches!(
            limit(&mut engine, 1, Side::Buy, 10_000, 150),
            Err(EngineError::InsufficientFunds { .. })
        ));
        assert!(matches!(
            limit(&mut engine, 1, Side::Sell, 10, 150),
            Err(EngineError::InsufficientInventory { .. })
        ));
        assert!(matches!(
            limit(&mut engine, 1, Side::Buy, 0, 150),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            limit(&mut engine, 1, Side::Buy, 10, 0),
            Err(EngineError::InvalidArgument(_))
        ));

        assert_eq!(engine.order_count(), 0);
        assert_eq!(engine.trader(1).unwrap().cash(), dec(100_000));
        assert_eq!(limit(&mut engine, 1, Side::Buy, 10, 150).unwrap(), 1);
    }

    #[test]
    fn test_trade_updates_both_ledgers() {
        let mut engine = setup();
        limit(&mut engine, 2, Side::Sell, 100, 150).unwrap();
        limit(&mut engine, 1, Side::Buy, 100, 150).unwrap();

        let buyer = engine.trader(1).unwrap();
        assert_eq!(buyer.cash(), dec(85_000));
        assert_eq!(buyer.position_quantity("AAPL"), dec(100));

        let seller = engine.trader(2).unwrap();
        assert_eq!(seller.cash(), dec(15_000));
        assert_eq!(seller.position_quantity("AAPL"), dec(900));
    }

    #[test]
    fn test_price_improvement_goes_to_aggressor() {
        let mut engine = setup();
        limit(&mut engine, 2, Side::Sell, 10, 149).unwrap();
        limit(&mut engine, 1, Side::Buy, 10, 155).unwrap();

        assert_eq!(engine.last_price("AAPL"), Some(units(149)));
        assert_eq!(engine.trader(1).unwrap().cash(), dec(98_510));
    }

    #[test]
    fn test_unfunded_resting_order_is_skipped() {
        let mut engine = setup();
        // Two resting bids; together they exceed the buyer's cash
        let first = limit(&mut engine, 1, Side::Buy, 500, 150).unwrap();
        let second = limit(&mut engine, 1, Side::Buy, 500, 150).unwrap();
        engine.add_cash(1, dec(-20_000)).unwrap();

        let sell = limit(&mut engine, 2, Side::Sell, 1_000, 150).unwrap();

        assert_eq!(engine.order(first).unwrap().status(), OrderStatus::Filled);
        assert_eq!(engine.order(second).unwrap().status(), OrderStatus::Cancelled);
        let resting = engine.order(sell).unwrap();
        assert_eq!(resting.status(), OrderStatus::PartiallyFilled);
        assert_eq!(resting.remaining(), units(500));
        assert_eq!(engine.trader(1).unwrap().cash(), dec(5_000));
        assert_eq!(engine.total_trade_count(), 1);
    }

    #[test]
    fn test_cancel_forgets_order() {
        let mut engine = setup();
        let id = limit(&mut engine, 1, Side::Buy, 10, 140).unwrap();

        assert!(engine.cancel_order(id));
        assert!(engine.order(id).is_none());
        assert!(!engine.cancel_order(id));
        assert!(!engine.cancel_order(12_345));
        assert!(engine.best_bid("AAPL").is_none());
    }

    #[test]
    fn test_filled_order_cannot_be_cancelled() {
        let mut engine = setup();
        let sell = limit(&mut engine, 2, Side::Sell, 10, 150).unwrap();
        limit(&mut engine, 1, Side::Buy, 10, 150).unwrap();

        assert!(!engine.cancel_order(sell));
        assert_eq!(engine.order(sell).unwrap().status(), OrderStatus::Filled);
    }

    #[test]
    fn test_listeners_receive_two_events_per_trade() {
        let mut engine = setup();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        engine.add_listener(move |event: &FillEvent| sink.lock().unwrap().push(event.clone()));

        limit(&mut engine, 2, Side::Sell, 10, 150).unwrap();
        limit(&mut engine, 2, Side::Sell, 10, 151).unwrap();
        limit(&mut engine, 1, Side::Buy, 20, 151).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 4);
        let traders: Vec<TraderId> = events.iter().map(|e| e.trader_id).collect();
        assert_eq!(traders, vec![1, 2, 1, 2]);
        assert_eq!(events[0].role, crate::engine::LiquidityRole::Taker);
        assert_eq!(events[1].role, crate::engine::LiquidityRole::Maker);
        assert_eq!(events[3].price, units(151));
    }

    #[test]
    fn test_register_replaces_and_default_cash() {
        let mut engine = MatchingEngine::new();
        assert!(engine.register_trader_with_default_cash(7, "Grace").is_none());
        assert_eq!(engine.trader(7).unwrap().cash(), dec(100_000));

        let previous = engine.register_trader(7, "Grace II", dec(5)).unwrap();
        assert_eq!(previous.name(), "Grace");
        assert_eq!(engine.trader(7).unwrap().cash(), dec(5));
    }

    #[test]
    fn test_add_cash_unknown_trader() {
        let mut engine = MatchingEngine::new();
        assert_eq!(engine.add_cash(3, dec(10)), Err(EngineError::TraderNotFound(3)));
    }

    #[test]
    fn test_update_marks() {
        let mut engine = setup();
        limit(&mut engine, 2, Side::Sell, 10, 120).unwrap();
        limit(&mut engine, 1, Side::Buy, 10, 120).unwrap();
        engine.update_marks("AAPL");
        engine.update_marks("NONE");

        // Seller holds 990 at cost 100, marked at 120
        assert_eq!(engine.trader(2).unwrap().total_unrealized_pnl(), dec(19_800));
        assert_eq!(engine.trader(1).unwrap().total_unrealized_pnl(), Decimal::ZERO);
    }

    #[test]
    fn test_market_order_matches_at_resting_price() {
        let mut engine = setup();
        limit(&mut engine, 2, Side::Sell, 10, 150).unwrap();

        // A market sell with price 0 crosses any bid
        limit(&mut engine, 1, Side::Buy, 5, 149).unwrap();
        engine
            .submit_order(2, "AAPL", units(5), 0, Side::Sell, OrderType::Market)
            .unwrap();

        assert_eq!(engine.last_price("AAPL"), Some(units(149)));
    }
}
