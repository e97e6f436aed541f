//! Binary heap priority queue keyed on weight.
//!
//! Ties between equal weights are broken by insertion order (first in, first
//! out). Every insert stamps a sequence number, so the same sequence of
//! operations always yields the same sequence of removals. The Huffman tree
//! builder depends on this to produce bit-identical containers for identical
//! input.

use crate::error::{Error, Result};

/// Anything that can be ordered by a weight.
pub trait Weighted {
    fn weight(&self) -> u64;
}

impl Weighted for u64 {
    fn weight(&self) -> u64 {
        *self
    }
}

/// Which end of the weight order the queue yields first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Min,
    Max,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    weight: u64,
    seq: u64,
    item: T,
}

/// Array-backed binary heap.
///
/// # Invariants
/// - `entries[0]` is the entry that `remove_min` returns next
/// - every parent precedes its children under (weight, seq) in `order`
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
    order: Order,
}

impl<T: Weighted> PriorityQueue<T> {
    /// Empty min-ordered queue.
    pub fn new() -> Self {
        Self::with_order(Order::Min)
    }

    /// Empty max-ordered queue. Equal weights still come out first-in first-out.
    pub fn max() -> Self {
        Self::with_order(Order::Max)
    }

    pub fn with_order(order: Order) -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
            order,
        }
    }

    /// Build a queue from `items` in O(n).
    ///
    /// Items are stamped in iteration order, so earlier items win ties.
    pub fn from_iter_ordered<I: IntoIterator<Item = T>>(items: I, order: Order) -> Self {
        let entries: Vec<Entry<T>> = items
            .into_iter()
            .enumerate()
            .map(|(seq, item)| Entry {
                weight: item.weight(),
                seq: seq as u64,
                item,
            })
            .collect();

        let mut queue = Self {
            next_seq: entries.len() as u64,
            entries,
            order,
        };
        for i in (0..queue.entries.len() / 2).rev() {
            queue.sift_down(i);
        }
        queue
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Add an item in O(log n).
    pub fn insert(&mut self, item: T) {
        let entry = Entry {
            weight: item.weight(),
            seq: self.next_seq,
            item,
        };
        self.next_seq += 1;
        self.entries.push(entry);
        self.sift_up(self.entries.len() - 1);
    }

    /// Top item without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.entries.first().map(|entry| &entry.item)
    }

    /// Remove and return the top item.
    ///
    /// For a max-ordered queue this is the heaviest item; the name follows
    /// the min-heap the tree builder uses.
    ///
    /// # Errors
    /// Returns `Error::EmptyQueue` if the queue is empty.
    pub fn remove_min(&mut self) -> Result<T> {
        if self.entries.is_empty() {
            return Err(Error::EmptyQueue);
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let entry = self.entries.pop().ok_or(Error::EmptyQueue)?;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok(entry.item)
    }

    /// Remove every item, yielding them in priority order.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { queue: self }
    }

    /// Whether entry `a` must come out before entry `b`.
    fn precedes(&self, a: usize, b: usize) -> bool {
        let (a, b) = (&self.entries[a], &self.entries[b]);
        if a.weight == b.weight {
            return a.seq < b.seq;
        }
        match self.order {
            Order::Min => a.weight < b.weight,
            Order::Max => a.weight > b.weight,
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.precedes(i, parent) {
                break;
            }
            self.entries.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.entries.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut top = i;

            if left < n && self.precedes(left, top) {
                top = left;
            }
            if right < n && self.precedes(right, top) {
                top = right;
            }
            if top == i {
                break;
            }
            self.entries.swap(i, top);
            i = top;
        }
    }
}

impl<T: Weighted> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Weighted> FromIterator<T> for PriorityQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
        Self::from_iter_ordered(items, Order::Min)
    }
}

/// Draining iterator returned by [`PriorityQueue::drain`].
pub struct Drain<'a, T: Weighted> {
    queue: &'a mut PriorityQueue<T>,
}

impl<T: Weighted> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.queue.remove_min().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}
