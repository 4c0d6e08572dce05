//! Order book module.
//!
//! ## Architecture
//!
//! One [`OrderBook`] per symbol, each with:
//!
//! - **Slab-based storage**: O(1) order insertion, removal, and lookup
//! - **Price levels**: Orders grouped by price using BTreeMap
//! - **Price-time priority**: timestamp-ordered FIFO at each price level
//!
//! ## Components
//!
//! - [`OrderNode`]: Wrapper around `Order` with linked-list pointers
//! - [`PriceLevel`]: Collection of orders at a single price point
//! - [`OrderBook`]: Bid/ask sides, matching loop, trade log
//! - [`Settlement`]: Hook that may veto a match before it is applied
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Rest order | O(log n) |
//! | Cancel order by ID | O(log n) |
//! | Best bid/ask | O(log n) |
//! | Match order | O(k log n) |

pub mod book;
pub mod level;
pub mod node;
pub mod settlement;

pub use book::{DepthLevel, MatchResult, OrderBook};
pub use level::PriceLevel;
pub use node::OrderNode;
pub use settlement::{NoSettlement, Settlement, SettlementFailure};
