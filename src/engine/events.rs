//! Per-participant fill notifications.
//!
//! Every trade yields two [`FillEvent`]s, buyer first, delivered to each
//! registered [`TradeListener`] before `submit_order` returns.

use crate::types::{OrderId, Side, Trade, TraderId};

/// Whether the participant's order was resting or incoming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiquidityRole {
    /// Resting order
    Maker,
    /// Incoming order
    Taker,
}

/// One participant's side of a trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillEvent {
    pub trader_id: TraderId,
    pub order_id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub quantity: u64,
    pub price: u64,
    pub role: LiquidityRole,
}

impl FillEvent {
    /// The `side` participant's view of `trade`.
    pub fn from_trade(trade: &Trade, side: Side) -> Self {
        let order_id = match side {
            Side::Buy => trade.buy_order_id,
            Side::Sell => trade.sell_order_id,
        };
        let role = if side == trade.aggressor_side {
            LiquidityRole::Taker
        } else {
            LiquidityRole::Maker
        };

        Self {
            trader_id: trade.trader_on(side),
            order_id,
            symbol: trade.symbol.clone(),
            side,
            quantity: trade.quantity,
            price: trade.price,
            role,
        }
    }

    /// Buyer's and seller's events for `trade`, in that order.
    pub fn pair(trade: &Trade) -> [FillEvent; 2] {
        [Self::from_trade(trade, Side::Buy), Self::from_trade(trade, Side::Sell)]
    }
}

/// Receives fill notifications from the engine.
pub trait TradeListener {
    fn on_fill(&mut self, event: &FillEvent);
}

impl<F> TradeListener for F
where
    F: FnMut(&FillEvent),
{
    fn on_fill(&mut self, event: &FillEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::units;

    fn trade() -> Trade {
        Trade {
            buy_order_id: 2,
            sell_order_id: 1,
            buy_trader_id: 20,
            sell_trader_id: 10,
            symbol: "AAPL".to_string(),
            price: units(150),
            quantity: units(5),
            timestamp: 9,
            aggressor_side: Side::Buy,
        }
    }

    #[test]
    fn test_pair_assigns_roles() {
        let [buyer, seller] = FillEvent::pair(&trade());

        assert_eq!(buyer.trader_id, 20);
        assert_eq!(buyer.order_id, 2);
        assert_eq!(buyer.side, Side::Buy);
        assert_eq!(buyer.role, LiquidityRole::Taker);

        assert_eq!(seller.trader_id, 10);
        assert_eq!(seller.order_id, 1);
        assert_eq!(seller.role, LiquidityRole::Maker);
        assert_eq!(seller.quantity, units(5));
        assert_eq!(seller.price, units(150));
    }

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |event: &FillEvent| seen.push(event.trader_id);
            for event in FillEvent::pair(&trade()) {
                listener.on_fill(&event);
            }
        }
        assert_eq!(seen, vec![20, 10]);
    }
}
