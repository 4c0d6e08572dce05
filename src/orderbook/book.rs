//! Per-symbol order book with a price-time priority matching loop.
//!
//! ## Architecture
//!
//! - **Slab**: arena holding every resting order
//! - **BTreeMap**: sorted price levels for best bid/ask lookup
//! - **HashMap**: order ID to slab key mapping for O(1) cancel
//! - **Archive**: filled and cancelled orders, kept for lookup by id
//!
//! ## Price Ordering
//!
//! - **Bids**: keyed by `Reverse(price)`, first entry is the highest bid
//! - **Asks**: keyed by price, first entry is the lowest ask
//!
//! ## Purging
//!
//! A resting order leaves its level, the index, and the slab the moment it
//! becomes terminal, and empty levels are dropped immediately. Every
//! structure therefore holds live orders only, so depth counts are exact and
//! the best level never needs skipping.
//!
//! ## Example
//!
//! ```
//! use tradematch::orderbook::OrderBook;
//! use tradematch::types::{Order, OrderStatus, Side};
//! use tradematch::types::price::units;
//!
//! let mut book = OrderBook::with_capacity("AAPL", 1_000);
//!
//! let sell = Order::limit(1, 10, "AAPL", Side::Sell, units(150), units(100), 1).unwrap();
//! book.add_order(sell).unwrap();
//!
//! let buy = Order::limit(2, 20, "AAPL", Side::Buy, units(151), units(40), 2).unwrap();
//! let result = book.add_order(buy).unwrap();
//!
//! assert_eq!(result.status, OrderStatus::Filled);
//! assert_eq!(result.trades[0].price, units(150));
//! assert_eq!(book.depth_at(Side::Sell, units(150)), units(60));
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use sha2::{Digest, Sha256};
use slab::Slab;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::orderbook::{NoSettlement, OrderNode, PriceLevel, Settlement};
use crate::types::{Order, OrderId, OrderStatus, Side, Trade};

/// Outcome of adding one order to a book.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub order_id: OrderId,

    /// Trades produced by this call, in execution order
    pub trades: Vec<Trade>,

    /// Total quantity filled on the incoming order
    pub filled_quantity: u64,

    /// Quantity left resting on the book (0 if nothing rests)
    pub resting_quantity: u64,

    /// Status of the incoming order after matching
    pub status: OrderStatus,
}

impl MatchResult {
    #[inline]
    pub fn is_fully_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }
}

/// Aggregate view of one price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLevel {
    pub price: u64,
    pub quantity: u64,
    pub order_count: usize,
}

impl From<&PriceLevel> for DepthLevel {
    fn from(level: &PriceLevel) -> Self {
        Self {
            price: level.price,
            quantity: level.total_quantity,
            order_count: level.order_count,
        }
    }
}

/// Order book for a single symbol.
#[derive(Debug)]
pub struct OrderBook {
    symbol: String,

    /// Resting orders only
    orders: Slab<OrderNode>,

    /// Bid price levels (sorted high to low)
    bids: BTreeMap<Reverse<u64>, PriceLevel>,

    /// Ask price levels (sorted low to high)
    asks: BTreeMap<u64, PriceLevel>,

    /// Order ID to slab key mapping for resting orders
    order_index: HashMap<OrderId, usize>,

    /// Filled and cancelled orders
    archive: HashMap<OrderId, Order>,

    /// Append-only trade log
    trades: Vec<Trade>,

    total_volume: u64,

    bid_count: usize,

    ask_count: usize,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::with_capacity(symbol, 0)
    }

    /// Create a book with `order_capacity` pre-allocated resting slots.
    ///
    /// ```
    /// use tradematch::orderbook::OrderBook;
    ///
    /// let book = OrderBook::with_capacity("MSFT", 10_000);
    /// assert!(book.capacity() >= 10_000);
    /// assert_eq!(book.symbol(), "MSFT");
    /// ```
    pub fn with_capacity(symbol: impl Into<String>, order_capacity: usize) -> Self {
        Self {
            symbol: symbol.into(),
            orders: Slab::with_capacity(order_capacity),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::with_capacity(order_capacity),
            archive: HashMap::new(),
            trades: Vec::new(),
            total_volume: 0,
            bid_count: 0,
            ask_count: 0,
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Number of resting orders on both sides
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of resting buy orders
    #[inline]
    pub fn bid_depth(&self) -> usize {
        self.bid_count
    }

    /// Number of resting sell orders
    #[inline]
    pub fn ask_depth(&self) -> usize {
        self.ask_count
    }

    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Match an incoming order and rest any remainder, with no settlement.
    pub fn add_order(&mut self, order: Order) -> Result<MatchResult> {
        self.add_order_with(order, &mut NoSettlement)
    }

    /// Match an incoming order against the opposite side, then rest any
    /// remainder on its own side.
    ///
    /// Each prospective trade is passed to `settlement` first. If the
    /// resting side is refused, that resting order is cancelled and
    /// matching moves on; if the incoming side is refused, matching stops.
    ///
    /// # Errors
    ///
    /// - [`EngineError::SymbolMismatch`] if the order is for another symbol
    /// - [`EngineError::InvalidArgument`] if the order is already terminal
    ///   or its id is already known to this book
    ///
    /// Nothing is modified when an error is returned.
    pub fn add_order_with<S>(&mut self, mut order: Order, settlement: &mut S) -> Result<MatchResult>
    where
        S: Settlement + ?Sized,
    {
        if order.symbol != self.symbol {
            return Err(EngineError::SymbolMismatch {
                book: self.symbol.clone(),
                order: order.symbol,
            });
        }
        if order.is_terminal() || order.is_complete() {
            return Err(EngineError::invalid(format!("order {} is not live", order.id)));
        }
        if self.contains_order(order.id) || self.archive.contains_key(&order.id) {
            return Err(EngineError::invalid(format!("duplicate order id {}", order.id)));
        }

        let mut trades = Vec::new();

        while !order.is_complete() {
            let Some((level_price, key)) = self.best_opposite(order.side) else {
                break;
            };
            if !order.crosses(level_price) {
                break;
            }

            let resting = &self.orders[key].order;
            let quantity = order.remaining().min(resting.remaining());
            let trade = Self::make_trade(&order, resting, quantity);

            if let Err(failure) = settlement.settle(&trade) {
                if failure.side == order.side {
                    warn!(
                        symbol = %self.symbol,
                        order_id = order.id,
                        error = %failure.error,
                        "aggressor cannot settle, matching stopped"
                    );
                    break;
                }
                warn!(
                    symbol = %self.symbol,
                    order_id = resting.id,
                    error = %failure.error,
                    "resting order cannot settle, cancelled"
                );
                self.cancel_key(key);
                continue;
            }

            order.fill(quantity)?;
            self.fill_resting(key, quantity)?;

            self.total_volume = self.total_volume.saturating_add(quantity);
            self.trades.push(trade.clone());
            trades.push(trade);
        }

        let order_id = order.id;
        let filled_quantity = order.filled_quantity();
        let status = order.status();
        let resting_quantity = if order.is_complete() {
            self.archive.insert(order_id, order);
            0
        } else {
            let remaining = order.remaining();
            self.rest(order);
            remaining
        };

        Ok(MatchResult {
            order_id,
            trades,
            filled_quantity,
            resting_quantity,
            status,
        })
    }

    /// Cancel a resting order by id.
    ///
    /// Returns `false` if the id is not resting on this book (unknown,
    /// already filled, or already cancelled). Fills applied before the
    /// cancel are kept.
    ///
    /// ```
    /// use tradematch::orderbook::OrderBook;
    /// use tradematch::types::{Order, OrderStatus, Side};
    ///
    /// let mut book = OrderBook::new("AAPL");
    /// let order = Order::limit(42, 1, "AAPL", Side::Buy, 15_000_000_000, 100_000_000, 0).unwrap();
    /// book.add_order(order).unwrap();
    ///
    /// assert!(book.cancel_order(42));
    /// assert!(!book.cancel_order(42));
    /// assert_eq!(book.find_order(42).unwrap().status(), OrderStatus::Cancelled);
    /// ```
    pub fn cancel_order(&mut self, order_id: OrderId) -> bool {
        match self.order_index.get(&order_id) {
            Some(&key) => {
                self.cancel_key(key);
                true
            }
            None => false,
        }
    }

    /// A resting order by id.
    #[inline]
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        let key = *self.order_index.get(&order_id)?;
        self.orders.get(key).map(|node| &node.order)
    }

    /// Any order this book has seen, resting or terminal.
    pub fn find_order(&self, order_id: OrderId) -> Option<&Order> {
        self.get_order(order_id).or_else(|| self.archive.get(&order_id))
    }

    #[inline]
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.order_index.contains_key(&order_id)
    }

    // ========================================================================
    // Best Bid/Ask
    // ========================================================================

    /// Highest resting buy price
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.keys().next().map(|r| r.0)
    }

    /// Lowest resting sell price
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.keys().next().copied()
    }

    /// `best_ask - best_bid`, if both sides are present
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    // ========================================================================
    // Market Data
    // ========================================================================

    /// Resting quantity at `price` on `side`; 0 if there is no such level.
    pub fn depth_at(&self, side: Side, price: u64) -> u64 {
        let level = match side {
            Side::Buy => self.bids.get(&Reverse(price)),
            Side::Sell => self.asks.get(&price),
        };
        level.map_or(0, |l| l.total_quantity)
    }

    /// Price levels on `side`, best first.
    pub fn depth(&self, side: Side) -> Vec<DepthLevel> {
        match side {
            Side::Buy => self.bids.values().map(DepthLevel::from).collect(),
            Side::Sell => self.asks.values().map(DepthLevel::from).collect(),
        }
    }

    /// Resting orders on `side` in matching priority.
    pub fn resting_orders(&self, side: Side) -> Vec<&Order> {
        let slab = &self.orders;
        let collect = |level: &PriceLevel| level.keys(slab).map(|k| &slab[k].order).collect::<Vec<_>>();
        match side {
            Side::Buy => self.bids.values().flat_map(collect).collect(),
            Side::Sell => self.asks.values().flat_map(collect).collect(),
        }
    }

    #[inline]
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    #[inline]
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// Sum of all traded quantity (fixed-point), saturating.
    #[inline]
    pub fn total_volume(&self) -> u64 {
        self.total_volume
    }

    #[inline]
    pub fn last_trade_price(&self) -> Option<u64> {
        self.trades.last().map(|t| t.price)
    }

    /// SHA-256 digest of the resting book and the trade log.
    ///
    /// Two books fed the same orders in the same sequence produce the same
    /// root.
    pub fn compute_state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.symbol.as_bytes());

        for side in [Side::Buy, Side::Sell] {
            for order in self.resting_orders(side) {
                hasher.update(order.id.to_le_bytes());
                hasher.update(order.trader_id.to_le_bytes());
                hasher.update(order.price.to_le_bytes());
                hasher.update(order.remaining().to_le_bytes());
                hasher.update(order.timestamp.to_le_bytes());
            }
        }

        for trade in &self.trades {
            hasher.update(trade.buy_order_id.to_le_bytes());
            hasher.update(trade.sell_order_id.to_le_bytes());
            hasher.update(trade.price.to_le_bytes());
            hasher.update(trade.quantity.to_le_bytes());
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        root
    }

    /// Hex form of [`OrderBook::compute_state_root`]
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.compute_state_root())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Price and head slab key of the best level opposite `side`.
    fn best_opposite(&self, side: Side) -> Option<(u64, usize)> {
        let level = match side {
            Side::Buy => self.asks.values().next(),
            Side::Sell => self.bids.values().next(),
        }?;
        Some((level.price, level.peek_head()?))
    }

    fn make_trade(aggressor: &Order, resting: &Order, quantity: u64) -> Trade {
        let (buy, sell) = match aggressor.side {
            Side::Buy => (aggressor, resting),
            Side::Sell => (resting, aggressor),
        };
        Trade {
            buy_order_id: buy.id,
            sell_order_id: sell.id,
            buy_trader_id: buy.trader_id,
            sell_trader_id: sell.trader_id,
            symbol: aggressor.symbol.clone(),
            price: resting.price,
            quantity,
            timestamp: aggressor.timestamp,
            aggressor_side: aggressor.side,
        }
    }

    fn level_mut(&mut self, side: Side, price: u64) -> Option<&mut PriceLevel> {
        match side {
            Side::Buy => self.bids.get_mut(&Reverse(price)),
            Side::Sell => self.asks.get_mut(&price),
        }
    }

    fn fill_resting(&mut self, key: usize, quantity: u64) -> Result<()> {
        let node = &mut self.orders[key];
        node.fill(quantity)?;
        let (side, price, done) = (node.order.side, node.price(), node.is_filled());

        if let Some(level) = self.level_mut(side, price) {
            level.reduce_quantity(quantity);
        }
        if done {
            if let Some(order) = self.detach(key) {
                self.archive.insert(order.id, order);
            }
        }
        Ok(())
    }

    fn cancel_key(&mut self, key: usize) {
        if let Some(mut order) = self.detach(key) {
            order.cancel();
            debug!(symbol = %self.symbol, order_id = order.id, "order cancelled");
            self.archive.insert(order.id, order);
        }
    }

    /// Insert a live order into its side's level.
    fn rest(&mut self, order: Order) {
        let (order_id, side, price) = (order.id, order.side, order.price);
        debug!(
            symbol = %self.symbol,
            order_id,
            ?side,
            price,
            remaining = order.remaining(),
            "order resting"
        );

        let key = self.orders.insert(OrderNode::new(order));
        self.order_index.insert(order_id, key);

        match side {
            Side::Buy => {
                let level = self.bids.entry(Reverse(price)).or_insert_with(|| PriceLevel::new(price));
                level.insert_by_time(key, &mut self.orders);
                self.bid_count += 1;
            }
            Side::Sell => {
                let level = self.asks.entry(price).or_insert_with(|| PriceLevel::new(price));
                level.insert_by_time(key, &mut self.orders);
                self.ask_count += 1;
            }
        }
    }

    /// Unlink a resting order from its level, the index and the slab.
    fn detach(&mut self, key: usize) -> Option<Order> {
        let node = self.orders.get(key)?;
        let (order_id, side, price) = (node.order_id(), node.order.side, node.price());

        match side {
            Side::Buy => {
                if let Some(level) = self.bids.get_mut(&Reverse(price)) {
                    level.remove(key, &mut self.orders);
                    if level.is_empty() {
                        self.bids.remove(&Reverse(price));
                    }
                }
                self.bid_count = self.bid_count.saturating_sub(1);
            }
            Side::Sell => {
                if let Some(level) = self.asks.get_mut(&price) {
                    level.remove(key, &mut self.orders);
                    if level.is_empty() {
                        self.asks.remove(&price);
                    }
                }
                self.ask_count = self.ask_count.saturating_sub(1);
            }
        }

        self.order_index.remove(&order_id);
        Some(self.orders.remove(key).order)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
