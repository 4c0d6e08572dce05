//! Participant ledgers.
//!
//! - [`Trader`]: cash balance, positions, pre-trade checks, fill application
//! - [`Position`]: signed quantity with volume-weighted average cost

pub mod position;
pub mod trader;

pub use position::Position;
pub use trader::{Trader, DEFAULT_POSITION_EPSILON};
