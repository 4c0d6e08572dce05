//! Net inventory and cost basis in one symbol.

use rust_decimal::Decimal;

/// A participant's holding in one symbol.
///
/// `quantity` is signed: positive is long. The fill guard in
/// [`crate::ledger::Trader`] keeps it non-negative in practice, but
/// [`Position::apply`] defines the short side too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub symbol: String,

    pub quantity: Decimal,

    /// Volume-weighted cost of the units currently held
    pub average_cost: Decimal,

    /// `quantity * (mark - average_cost)` as of the last mark
    pub unrealized_pnl: Decimal,
}

impl Position {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
        }
    }

    /// Apply a signed quantity change executed at `price`.
    ///
    /// - Adding in the same direction re-weights the average cost
    /// - Reducing without crossing zero keeps the average cost
    /// - Crossing zero leaves a residual that adopts `price`
    pub fn apply(&mut self, delta: Decimal, price: Decimal) {
        if delta.is_zero() {
            return;
        }

        let current = self.quantity;
        let updated = current + delta;

        if current.is_zero() {
            self.average_cost = price;
        } else if current.is_sign_positive() == delta.is_sign_positive() {
            self.average_cost = (current * self.average_cost + delta * price) / updated;
        } else if !updated.is_zero() && updated.is_sign_positive() != current.is_sign_positive() {
            // flipped through zero
            self.average_cost = price;
        }

        self.quantity = updated;
    }

    /// Refresh unrealized P&L against `market_price`.
    pub fn mark(&mut self, market_price: Decimal) {
        self.unrealized_pnl = self.quantity * (market_price - self.average_cost);
    }

    /// Quantity valued at average cost
    #[inline]
    pub fn book_value(&self) -> Decimal {
        self.quantity * self.average_cost
    }

    #[inline]
    pub fn is_flat(&self, epsilon: Decimal) -> bool {
        self.quantity.abs() < epsilon
    }
}
