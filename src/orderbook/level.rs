//! Price level management for orders at the same price.
//!
//! ## Queue Structure
//!
//! ```text
//! head (earliest) <-> order2 <-> order3 <-> tail (latest)
//! ```
//!
//! - Orders are kept in timestamp order; appending at the tail is the
//!   common case because the engine clock only moves forward
//! - Matching consumes orders from the head
//! - Any order can be unlinked in O(1) using its slab key

use slab::Slab;

use crate::orderbook::OrderNode;

/// A price level containing orders at a single price.
///
/// The order data lives in the slab; this struct only holds the queue
/// metadata and the aggregate remaining quantity.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Sum of the remaining quantity of every queued order
    pub total_quantity: u64,

    /// First order to be matched (slab key)
    pub head: Option<usize>,

    /// Last order in the queue (slab key)
    pub tail: Option<usize>,

    pub order_count: usize,
}

impl PriceLevel {
    pub fn new(price: u64) -> Self {
        Self {
            price,
            total_quantity: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Append an order at the tail of the queue.
    ///
    /// Does nothing if `key` is not in the slab.
    pub fn push_back(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let tail = self.tail;
        let Some(node) = slab.get_mut(key) else {
            return;
        };
        node.prev = tail;
        node.next = None;
        let quantity = node.remaining();

        match tail.and_then(|t| slab.get_mut(t)) {
            Some(tail_node) => tail_node.next = Some(key),
            None => self.head = Some(key),
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_quantity = self.total_quantity.saturating_add(quantity);
    }

    /// Queue an order behind every order with an earlier or equal
    /// timestamp.
    ///
    /// Walks backwards from the tail, so an order that is the latest
    /// arrival costs O(1).
    pub fn insert_by_time(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let Some(timestamp) = slab.get(key).map(OrderNode::timestamp) else {
            return;
        };

        // Find the last node that stays ahead of the new one
        let mut ahead = self.tail;
        while let Some(candidate) = ahead {
            match slab.get(candidate) {
                Some(node) if node.timestamp() > timestamp => ahead = node.prev,
                _ => break,
            }
        }

        if ahead == self.tail {
            self.push_back(key, slab);
            return;
        }

        let behind = match ahead {
            Some(a) => slab.get(a).and_then(|n| n.next),
            None => self.head,
        };

        let quantity = {
            let node = &mut slab[key];
            node.prev = ahead;
            node.next = behind;
            node.remaining()
        };

        match ahead.and_then(|a| slab.get_mut(a)) {
            Some(prev) => prev.next = Some(key),
            None => self.head = Some(key),
        }
        if let Some(next) = behind.and_then(|b| slab.get_mut(b)) {
            next.prev = Some(key);
        }

        self.order_count += 1;
        self.total_quantity = self.total_quantity.saturating_add(quantity);
    }

    /// Unlink an order from the queue by slab key.
    ///
    /// Returns the remaining quantity of the unlinked order, or 0 if the
    /// key is not in the slab.
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> u64 {
        let Some(node) = slab.get_mut(key) else {
            return 0;
        };
        let quantity = node.remaining();
        let prev_key = node.prev.take();
        let next_key = node.next.take();

        match prev_key.and_then(|p| slab.get_mut(p)) {
            Some(prev) => prev.next = next_key,
            None => self.head = next_key,
        }
        match next_key.and_then(|n| slab.get_mut(n)) {
            Some(next) => next.prev = prev_key,
            None => self.tail = prev_key,
        }

        self.order_count = self.order_count.saturating_sub(1);
        self.total_quantity = self.total_quantity.saturating_sub(quantity);

        quantity
    }

    /// First order to be matched at this price.
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Account for a partial fill of a queued order.
    pub fn reduce_quantity(&mut self, filled_quantity: u64) {
        self.total_quantity = self.total_quantity.saturating_sub(filled_quantity);
    }

    /// Slab keys from head to tail.
    pub fn keys<'a>(&self, slab: &'a Slab<OrderNode>) -> LevelKeys<'a> {
        LevelKeys {
            slab,
            cursor: self.head,
        }
    }
}

/// Iterator over the slab keys of a price level in queue order.
pub struct LevelKeys<'a> {
    slab: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl Iterator for LevelKeys<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let key = self.cursor?;
        self.cursor = self.slab.get(key).and_then(|n| n.next);
        Some(key)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
