//! Participant ledger: cash plus per-symbol positions.
//!
//! Cash never goes negative through an accepted operation. Fills are
//! validated by [`Trader::check_fill`] before anything is mutated, so a
//! rejected fill leaves the ledger exactly as it was.
//!
//! ## Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use tradematch::ledger::Trader;
//! use tradematch::types::Side;
//! use tradematch::types::price::units;
//!
//! let mut alice = Trader::new(1, "Alice", Decimal::from(10_000));
//! alice.apply_fill("AAPL", units(50), units(100), Side::Buy).unwrap();
//!
//! assert_eq!(alice.cash(), Decimal::from(5_000));
//! assert_eq!(alice.position("AAPL").unwrap().quantity, Decimal::from(50));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{EngineError, Result};
use crate::ledger::Position;
use crate::types::price::{fixed_to_decimal, notional};
use crate::types::{Side, TraderId};

/// Positions smaller than this in magnitude are dropped.
pub const DEFAULT_POSITION_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

#[derive(Debug, Clone, PartialEq)]
pub struct Trader {
    id: TraderId,
    name: String,
    cash: Decimal,
    positions: BTreeMap<String, Position>,
    epsilon: Decimal,
}

impl Trader {
    pub fn new(id: TraderId, name: impl Into<String>, initial_cash: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            cash: initial_cash,
            positions: BTreeMap::new(),
            epsilon: DEFAULT_POSITION_EPSILON,
        }
    }

    /// Override the threshold below which a position counts as closed.
    pub fn with_position_epsilon(mut self, epsilon: Decimal) -> Self {
        self.epsilon = epsilon.abs();
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn id(&self) -> TraderId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn cash(&self) -> Decimal {
        self.cash
    }

    #[inline]
    pub fn positions(&self) -> &BTreeMap<String, Position> {
        &self.positions
    }

    #[inline]
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    /// Signed holding in `symbol`, zero when there is no position.
    pub fn position_quantity(&self, symbol: &str) -> Decimal {
        self.positions.get(symbol).map_or(Decimal::ZERO, |p| p.quantity)
    }

    // ========================================================================
    // Pre-trade checks
    // ========================================================================

    #[inline]
    pub fn has_sufficient_cash(&self, amount: Decimal) -> bool {
        self.cash >= amount
    }

    /// Whether at least `quantity` (fixed-point) units of `symbol` are held.
    pub fn has_sufficient_shares(&self, symbol: &str, quantity: u64) -> bool {
        self.position_quantity(symbol) >= fixed_to_decimal(quantity)
    }

    /// Validate a fill without applying it.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidArgument`] for a zero quantity
    /// - [`EngineError::InsufficientFunds`] if a buy costs more than cash
    /// - [`EngineError::InsufficientInventory`] if a sell exceeds holdings
    pub fn check_fill(&self, symbol: &str, quantity: u64, price: u64, side: Side) -> Result<()> {
        if quantity == 0 {
            return Err(EngineError::invalid("fill quantity must be positive"));
        }

        match side {
            Side::Buy => {
                let cost = notional(quantity, price);
                if !self.has_sufficient_cash(cost) {
                    return Err(EngineError::InsufficientFunds {
                        required: cost,
                        available: self.cash,
                    });
                }
            }
            Side::Sell => {
                if !self.has_sufficient_shares(symbol, quantity) {
                    return Err(EngineError::InsufficientInventory {
                        symbol: symbol.to_string(),
                        required: fixed_to_decimal(quantity),
                        available: self.position_quantity(symbol),
                    });
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Settle one side of a trade: move cash and update the position.
    ///
    /// Buys debit `quantity * price` and sells credit it. Nothing changes
    /// if [`Trader::check_fill`] rejects the fill.
    pub fn apply_fill(&mut self, symbol: &str, quantity: u64, price: u64, side: Side) -> Result<()> {
        self.check_fill(symbol, quantity, price, side)?;

        let value = notional(quantity, price);
        let units = fixed_to_decimal(quantity);
        let delta = match side {
            Side::Buy => {
                self.cash -= value;
                units
            }
            Side::Sell => {
                self.cash += value;
                -units
            }
        };

        let epsilon = self.epsilon;
        let position = self
            .positions
            .entry(symbol.to_string())
            .or_insert_with(|| Position::new(symbol));
        position.apply(delta, fixed_to_decimal(price));
        if position.is_flat(epsilon) {
            self.positions.remove(symbol);
        }
        Ok(())
    }

    /// Deposit (positive) or withdraw (negative) cash.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidArgument`] if a withdrawal exceeds the balance.
    pub fn add_cash(&mut self, amount: Decimal) -> Result<()> {
        let updated = self.cash + amount;
        if updated.is_sign_negative() && !updated.is_zero() {
            return Err(EngineError::invalid(format!(
                "withdrawal of {} exceeds cash balance {}",
                -amount, self.cash
            )));
        }
        self.cash = updated;
        Ok(())
    }

    /// Mark the position in `symbol` to `market_price`. Unknown symbols are
    /// ignored.
    pub fn update_position(&mut self, symbol: &str, market_price: u64) {
        if let Some(position) = self.positions.get_mut(symbol) {
            position.mark(fixed_to_decimal(market_price));
        }
    }

    // ========================================================================
    // Valuation
    // ========================================================================

    /// Cash plus every position at average cost.
    pub fn portfolio_value(&self) -> Decimal {
        self.cash + self.positions.values().map(Position::book_value).sum::<Decimal>()
    }

    pub fn total_unrealized_pnl(&self) -> Decimal {
        self.positions.values().map(|p| p.unrealized_pnl).sum()
    }
}
