//! Matching engine module.
//!
//! ## Order Entry Path
//!
//! 1. Resolve the trader and run the pre-trade check against its ledger
//! 2. Stamp the order from the engine's [`MonotonicClock`] and allocate an id
//! 3. Route it to the symbol's book, creating the book on first use
//! 4. Settle each match against both ledgers through [`LedgerSettlement`]
//! 5. Publish a [`FillEvent`] per counterparty per trade
//!
//! ## Matching Rules
//!
//! - **Buy orders** match against asks (lowest price first)
//! - **Sell orders** match against bids (highest price first)
//! - **Execution price** is always the resting order's price
//! - **Unfilled quantity** rests on the book

pub mod clock;
pub mod config;
pub mod events;
pub mod matcher;
pub mod settlement;

pub use clock::MonotonicClock;
pub use config::EngineConfig;
pub use events::{FillEvent, LiquidityRole, TradeListener};
pub use matcher::MatchingEngine;
pub use settlement::LedgerSettlement;
