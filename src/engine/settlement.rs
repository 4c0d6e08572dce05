//! Ledger-backed settlement of trades.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::ledger::Trader;
use crate::orderbook::{Settlement, SettlementFailure};
use crate::types::{Side, Trade, TraderId};

/// Settles trades against the engine's participant ledgers.
///
/// Both counterparties are checked before either ledger is touched, so a
/// refused trade leaves every ledger unchanged. A self-trade settles the
/// buy leg first, then the sell leg.
pub struct LedgerSettlement<'a> {
    traders: &'a mut HashMap<TraderId, Trader>,
}

impl<'a> LedgerSettlement<'a> {
    pub fn new(traders: &'a mut HashMap<TraderId, Trader>) -> Self {
        Self { traders }
    }

    fn check(&self, trade: &Trade, side: Side) -> Result<(), SettlementFailure> {
        let trader_id = trade.trader_on(side);
        let trader = self
            .traders
            .get(&trader_id)
            .ok_or_else(|| SettlementFailure::new(side, EngineError::TraderNotFound(trader_id)))?;
        trader
            .check_fill(&trade.symbol, trade.quantity, trade.price, side)
            .map_err(|e| SettlementFailure::new(side, e))
    }

    fn apply(&mut self, trade: &Trade, side: Side) -> Result<(), SettlementFailure> {
        let trader_id = trade.trader_on(side);
        let trader = self
            .traders
            .get_mut(&trader_id)
            .ok_or_else(|| SettlementFailure::new(side, EngineError::TraderNotFound(trader_id)))?;
        trader
            .apply_fill(&trade.symbol, trade.quantity, trade.price, side)
            .map_err(|e| SettlementFailure::new(side, e))
    }
}

impl Settlement for LedgerSettlement<'_> {
    fn settle(&mut self, trade: &Trade) -> Result<(), SettlementFailure> {
        self.check(trade, Side::Buy)?;
        self.check(trade, Side::Sell)?;

        self.apply(trade, Side::Buy)?;
        self.apply(trade, Side::Sell)
    }
}
