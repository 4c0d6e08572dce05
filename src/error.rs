//! Error types for the matching engine
//!
//! Every rejection is a normal business outcome: the engine stays fully
//! usable after any of these, and none of them is returned after state has
//! been partially mutated.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::TraderId;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by orders, books, ledgers and the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Malformed input: zero quantity or price, over-fill, or a cash
    /// withdrawal larger than the balance.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("trader not found: {0}")]
    TraderNotFound(TraderId),

    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("insufficient inventory in {symbol}: required {required}, available {available}")]
    InsufficientInventory {
        symbol: String,
        required: Decimal,
        available: Decimal,
    },

    /// An order was routed to a book for a different symbol.
    #[error("order symbol {order} does not match book symbol {book}")]
    SymbolMismatch { book: String, order: String },
}

impl EngineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidArgument(message.into())
    }
}
