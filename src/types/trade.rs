//! Trade type representing an executed match between two orders.

use rust_decimal::Decimal;

use crate::types::price::notional;
use crate::types::{OrderId, Side, TraderId};

/// A single execution between a buy order and a sell order.
///
/// ## Price Discovery
///
/// The trade always executes at the resting order's price, never the
/// aggressor's. `aggressor_side` records which side arrived last.
///
/// ## Example
///
/// ```
/// use tradematch::types::{Side, Trade};
/// use tradematch::types::price::units;
///
/// let trade = Trade {
///     buy_order_id: 2,
///     sell_order_id: 1,
///     buy_trader_id: 20,
///     sell_trader_id: 10,
///     symbol: "AAPL".to_string(),
///     price: units(150),
///     quantity: units(50),
///     timestamp: 2,
///     aggressor_side: Side::Buy,
/// };
///
/// assert_eq!(trade.notional(), 7_500.into());
/// assert_eq!(trade.maker_order_id(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub buy_order_id: OrderId,

    pub sell_order_id: OrderId,

    pub buy_trader_id: TraderId,

    pub sell_trader_id: TraderId,

    pub symbol: String,

    /// Execution price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// Executed quantity in fixed-point (scaled by 10^8)
    pub quantity: u64,

    /// Clock value of the aggressing order
    pub timestamp: u64,

    /// Side of the incoming order that triggered the match
    pub aggressor_side: Side,
}

impl Trade {
    /// Cash exchanged: price * quantity, as a decimal.
    #[inline]
    pub fn notional(&self) -> Decimal {
        notional(self.quantity, self.price)
    }

    /// The resting (maker) order.
    pub fn maker_order_id(&self) -> OrderId {
        match self.aggressor_side {
            Side::Buy => self.sell_order_id,
            Side::Sell => self.buy_order_id,
        }
    }

    /// The incoming (taker) order.
    pub fn taker_order_id(&self) -> OrderId {
        match self.aggressor_side {
            Side::Buy => self.buy_order_id,
            Side::Sell => self.sell_order_id,
        }
    }

    /// Trader on the given side of the trade.
    pub fn trader_on(&self, side: Side) -> TraderId {
        match side {
            Side::Buy => self.buy_trader_id,
            Side::Sell => self.sell_trader_id,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
