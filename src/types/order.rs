//! Order types and the order lifecycle.
//!
//! ## Lifecycle
//!
//! ```text
//! Pending ──fill──> PartiallyFilled ──fill──> Filled
//!    │                    │
//!    └──────cancel────────┴──────> Cancelled
//! ```
//!
//! Status is derived from the filled quantity plus explicit cancellation.
//! `Rejected` exists for reporting only: a rejected submission never
//! produces an `Order` value.
//!
//! ## Fixed-Point Representation
//!
//! Prices and quantities are u64 scaled by 10^8 (see [`crate::types::price`]).

use std::cmp::Ordering;

use crate::error::{EngineError, Result};
use crate::types::{OrderId, TraderId};

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order (bid)
    #[default]
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

// ============================================================================
// OrderType enum
// ============================================================================

/// Order type enumeration
///
/// Only `Limit` changes validation (it requires a non-zero price). Every
/// type is matched with limit semantics at its stated price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderType {
    Market,
    #[default]
    Limit,
    Stop,
    StopLimit,
}

// ============================================================================
// OrderStatus enum
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    /// Filled and cancelled orders can no longer match.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// An order submitted by a trader.
///
/// The identifying fields are public and fixed at construction; fill
/// progress and status change only through [`Order::fill`] and
/// [`Order::cancel`], which keep `filled <= quantity` at all times.
///
/// ## Example
///
/// ```
/// use tradematch::types::{Order, OrderStatus, Side};
/// use tradematch::types::price::units;
///
/// let mut order = Order::limit(1, 7, "AAPL", Side::Buy, units(150), units(100), 1).unwrap();
/// order.fill(units(40)).unwrap();
///
/// assert_eq!(order.status(), OrderStatus::PartiallyFilled);
/// assert_eq!(order.remaining(), units(60));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Unique order identifier (assigned by the engine)
    pub id: OrderId,

    /// Owning trader
    pub trader_id: TraderId,

    pub symbol: String,

    pub side: Side,

    pub order_type: OrderType,

    /// Limit price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// Requested quantity in fixed-point (scaled by 10^8)
    pub quantity: u64,

    /// Submission instant on the engine's monotonic clock.
    /// Only used to break price ties.
    pub timestamp: u64,

    filled: u64,

    status: OrderStatus,
}

impl Order {
    /// Create a new order
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidArgument`] when `quantity` is zero, or when a
    /// limit order has a zero price.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        trader_id: TraderId,
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        price: u64,
        quantity: u64,
        timestamp: u64,
    ) -> Result<Self> {
        if quantity == 0 {
            return Err(EngineError::invalid("quantity must be positive"));
        }
        if order_type == OrderType::Limit && price == 0 {
            return Err(EngineError::invalid("price must be positive for limit orders"));
        }

        Ok(Self {
            id,
            trader_id,
            symbol: symbol.into(),
            side,
            order_type,
            price,
            quantity,
            timestamp,
            filled: 0,
            status: OrderStatus::Pending,
        })
    }

    /// Shorthand for [`Order::new`] with [`OrderType::Limit`].
    pub fn limit(
        id: OrderId,
        trader_id: TraderId,
        symbol: impl Into<String>,
        side: Side,
        price: u64,
        quantity: u64,
        timestamp: u64,
    ) -> Result<Self> {
        Self::new(id, trader_id, symbol, side, OrderType::Limit, price, quantity, timestamp)
    }

    #[inline]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    #[inline]
    pub fn filled_quantity(&self) -> u64 {
        self.filled
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.quantity - self.filled
    }

    /// True once the whole requested quantity has traded.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.filled >= self.quantity
    }

    /// True for filled or cancelled orders.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    #[inline]
    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    #[inline]
    pub fn is_sell(&self) -> bool {
        self.side == Side::Sell
    }

    /// Record an execution of `quantity` against this order.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidArgument`] if `quantity` is zero, exceeds the
    /// remaining quantity, or the order was cancelled. The order is left
    /// untouched on error.
    pub fn fill(&mut self, quantity: u64) -> Result<()> {
        if quantity == 0 {
            return Err(EngineError::invalid("fill quantity must be positive"));
        }
        if self.status == OrderStatus::Cancelled {
            return Err(EngineError::invalid(format!("order {} is cancelled", self.id)));
        }
        if quantity > self.remaining() {
            return Err(EngineError::invalid(format!(
                "fill of {} exceeds remaining {} on order {}",
                quantity,
                self.remaining(),
                self.id
            )));
        }

        self.filled += quantity;
        self.status = if self.is_complete() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
        Ok(())
    }

    /// Mark the order cancelled. Fills already applied stay applied.
    ///
    /// Returns `false` if the order was already terminal.
    pub fn cancel(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = OrderStatus::Cancelled;
        true
    }

    /// Price-time priority between two orders on the same side.
    ///
    /// `Ordering::Less` means `self` is matched before `other`: bids rank
    /// higher prices first, asks rank lower prices first, and equal prices
    /// fall back to the earlier timestamp.
    pub fn priority_cmp(&self, other: &Order) -> Ordering {
        debug_assert_eq!(self.side, other.side, "priority is only defined within one side");

        let by_price = match self.side {
            Side::Buy => other.price.cmp(&self.price),
            Side::Sell => self.price.cmp(&other.price),
        };
        by_price.then_with(|| self.timestamp.cmp(&other.timestamp))
    }

    /// True if `self` would be matched before `other`.
    #[inline]
    pub fn has_priority_over(&self, other: &Order) -> bool {
        self.priority_cmp(other) == Ordering::Less
    }

    /// Whether this order's limit crosses a resting order priced at `price`.
    #[inline]
    pub fn crosses(&self, price: u64) -> bool {
        match self.side {
            Side::Buy => self.price >= price,
            Side::Sell => self.price <= price,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
