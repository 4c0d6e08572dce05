//! Engine configuration.

use rust_decimal::Decimal;

use crate::ledger::DEFAULT_POSITION_EPSILON;

/// Tunables for a [`crate::engine::MatchingEngine`].
///
/// ```
/// use rust_decimal::Decimal;
/// use tradematch::engine::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_book_capacity(50_000)
///     .with_default_initial_cash(Decimal::from(250_000));
///
/// assert_eq!(config.book_capacity, 50_000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Resting-order slots pre-allocated for each new book
    pub book_capacity: usize,

    /// Cash given to traders registered without an explicit amount
    pub default_initial_cash: Decimal,

    /// Positions smaller than this are removed from ledgers
    pub position_epsilon: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            book_capacity: 1024,
            default_initial_cash: Decimal::from(100_000),
            position_epsilon: DEFAULT_POSITION_EPSILON,
        }
    }
}

impl EngineConfig {
    pub fn with_book_capacity(mut self, capacity: usize) -> Self {
        self.book_capacity = capacity;
        self
    }

    pub fn with_default_initial_cash(mut self, cash: Decimal) -> Self {
        self.default_initial_cash = cash;
        self
    }

    pub fn with_position_epsilon(mut self, epsilon: Decimal) -> Self {
        self.position_epsilon = epsilon;
        self
    }
}
