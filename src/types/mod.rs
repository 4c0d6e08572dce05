//! Core data types for the trade engine
//!
//! All order prices and quantities use fixed-point representation
//! (scaled by 10^8). Cash and P&L are [`rust_decimal::Decimal`].
//!
//! ## Types
//!
//! - [`Order`]: An order with its fill progress and status
//! - [`Side`]: Buy or Sell
//! - [`OrderType`]: Limit, Market, Stop, StopLimit
//! - [`OrderStatus`]: Lifecycle state of an order
//! - [`Trade`]: An executed match between a buy and a sell order
//!
//! ## Fixed-Point Arithmetic
//!
//! Example: 150.25 is stored as 15_025_000_000u64

mod order;
mod trade;
pub mod price;

pub use order::{Order, OrderStatus, OrderType, Side};
pub use trade::Trade;

/// Engine-assigned order identifier. The first order is 1.
pub type OrderId = u64;

/// Trader identifier chosen by the caller at registration.
pub type TraderId = u64;
