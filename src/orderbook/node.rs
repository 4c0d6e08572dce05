//! Order node for slab-based storage.
//!
//! ## Design
//!
//! `OrderNode` wraps a resting `Order` with doubly-linked list pointers so
//! a price level can unlink any order in O(1) given its slab key.
//!
//! ## Linked List
//!
//! Orders at the same price level form a doubly-linked list:
//! - `next`: the order queued behind this one (later timestamp)
//! - `prev`: the order queued ahead of this one (earlier timestamp)
//!
//! Pointers are slab keys, not references. Keys may be reused once a node
//! is removed from the slab.

use crate::error::Result;
use crate::types::{Order, OrderId};

/// A resting order plus its position in a price level queue.
#[derive(Debug, Clone)]
pub struct OrderNode {
    pub order: Order,

    /// Next order in the price level queue (slab key).
    /// None if this is the tail.
    pub next: Option<usize>,

    /// Previous order in the price level queue (slab key).
    /// None if this is the head.
    pub prev: Option<usize>,
}

impl OrderNode {
    /// Wrap an order in an unlinked node
    ///
    /// # Example
    ///
    /// ```
    /// use tradematch::orderbook::OrderNode;
    /// use tradematch::types::{Order, Side};
    ///
    /// let order = Order::limit(1, 100, "AAPL", Side::Buy, 15_000_000_000, 100_000_000, 0).unwrap();
    /// let node = OrderNode::new(order);
    ///
    /// assert!(node.is_unlinked());
    /// ```
    #[inline]
    pub fn new(order: Order) -> Self {
        Self {
            order,
            next: None,
            prev: None,
        }
    }

    /// Check if this node is unlinked (not part of any price level)
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> OrderId {
        self.order.id
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.order.timestamp
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.order.remaining()
    }

    /// Fill a portion of the wrapped order.
    #[inline]
    pub fn fill(&mut self, quantity: u64) -> Result<()> {
        self.order.fill(quantity)
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.order.is_complete()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::units;
    use crate::types::Side;

    fn create_test_order(id: OrderId, price: u64, quantity: u64) -> Order {
        Order::limit(id, 100, "AAPL", Side::Sell, units(price), units(quantity), id).unwrap()
    }

    #[test]
    fn test_order_node_accessors() {
        let node = OrderNode::new(create_test_order(42, 150, 10));

        assert_eq!(node.order_id(), 42);
        assert_eq!(node.price(), units(150));
        assert_eq!(node.timestamp(), 42);
        assert_eq!(node.remaining(), units(10));
        assert!(node.is_unlinked());
        assert!(!node.is_filled());
    }

    #[test]
    fn test_order_node_fill() {
        let mut node = OrderNode::new(create_test_order(1, 150, 10));

        node.fill(units(4)).unwrap();
        assert_eq!(node.remaining(), units(6));
        assert!(!node.is_filled());

        // Over-fill is refused and nothing changes
        assert!(node.fill(units(7)).is_err());
        assert_eq!(node.remaining(), units(6));

        node.fill(units(6)).unwrap();
        assert!(node.is_filled());
    }

    #[test]
    fn test_order_node_linking() {
        let mut node = OrderNode::new(create_test_order(1, 150, 10));

        node.next = Some(2);
        assert!(!node.is_unlinked());

        node.next = None;
        node.prev = Some(0);
        assert!(!node.is_unlinked());
    }
}
