//! Settlement hook consulted by the matching loop.
//!
//! Every match is offered to a [`Settlement`] before either order is
//! touched. A rejection names the side whose participant could not settle,
//! which tells the book whether to drop the resting order or stop matching.

use crate::error::EngineError;
use crate::types::{Side, Trade};

/// Rejection of a prospective trade.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementFailure {
    /// Side of the trade whose participant could not settle
    pub side: Side,
    pub error: EngineError,
}

impl SettlementFailure {
    pub fn new(side: Side, error: EngineError) -> Self {
        Self { side, error }
    }
}

/// Applies the economic effect of a trade, or refuses it.
///
/// Implementations must be all-or-nothing: on `Err` nothing may have been
/// applied for either side.
pub trait Settlement {
    fn settle(&mut self, trade: &Trade) -> Result<(), SettlementFailure>;
}

/// Accepts every trade without side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSettlement;

impl Settlement for NoSettlement {
    #[inline]
    fn settle(&mut self, _trade: &Trade) -> Result<(), SettlementFailure> {
        Ok(())
    }
}

impl<F> Settlement for F
where
    F: FnMut(&Trade) -> Result<(), SettlementFailure>,
{
    fn settle(&mut self, trade: &Trade) -> Result<(), SettlementFailure> {
        self(trade)
    }
}
