//! # tradematch
//!
//! Continuous-matching trade engine for a set of symbols.
//!
//! ## Architecture
//!
//! - **Types**: Order, Trade, fixed-point price helpers
//! - **OrderBook**: per-symbol book with slab-based storage and price-time
//!   priority matching
//! - **Ledger**: participant cash and positions with average-cost tracking
//! - **Engine**: registry of participants and books, pre-trade checks,
//!   settlement, fill notifications
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical order sequences produce identical books
//! 2. **No Floating Point**: prices and quantities are fixed-point (10^8),
//!    money is `rust_decimal::Decimal`
//! 3. **Pre-allocated Memory**: slab allocation for resting orders
//! 4. **Synchronous Execution**: single writer, no async

// ============================================================================
// Module declarations
// ============================================================================

/// Error taxonomy and result alias
pub mod error;

/// Core data types: Order, Trade, prices
pub mod types;

/// Order book: slab-based storage and the matching loop
pub mod orderbook;

/// Participant ledgers: Trader and Position
pub mod ledger;

/// Matching engine: orchestration across books and ledgers
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use engine::{EngineConfig, FillEvent, LiquidityRole, MatchingEngine, TradeListener};
pub use error::{EngineError, Result};
pub use ledger::{Position, Trader};
pub use orderbook::{MatchResult, OrderBook};
pub use types::{Order, OrderId, OrderStatus, OrderType, Side, Trade, TraderId};
