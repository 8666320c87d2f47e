//! Priority queue behind A*: lowest priority first, first-in first-out among
//! equal priorities.
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A heap entry. Ordered so that `BinaryHeap` (a max-heap) pops the lowest
/// priority first and, among equal priorities, the earliest insertion.
struct Entry<T> {
    priority: u32,
    sequence: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Stable min-priority queue.
///
/// Items with equal priority come out in the order they were pushed: every
/// push is stamped with an ever-increasing sequence number. Duplicate items
/// are allowed; the queue never looks inside them.
///
/// # Examples
/// ```
/// use slide_solver::frontier::PriorityFrontier;
/// let mut frontier = PriorityFrontier::new();
/// frontier.push("b", 3);
/// frontier.push("a", 1);
/// frontier.push("c", 3);
/// assert_eq!(frontier.pop(), Some("a"));
/// assert_eq!(frontier.pop(), Some("b"));
/// assert_eq!(frontier.pop(), Some("c"));
/// assert_eq!(frontier.pop(), None);
/// ```
pub struct PriorityFrontier<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> PriorityFrontier<T> {
    /// Creates an empty frontier.
    pub fn new() -> Self {
        PriorityFrontier {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Queues `item` behind every item already queued with the same priority.
    pub fn push(&mut self, item: T, priority: u32) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Entry {
            priority,
            sequence,
            item,
        });
    }

    /// Removes and returns the item with the lowest priority, the earliest
    /// pushed one on ties.
    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    /// Priority of the item `pop` would return next.
    pub fn peek_priority(&self) -> Option<u32> {
        self.heap.peek().map(|entry| entry.priority)
    }

    /// Number of queued items, duplicates included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for PriorityFrontier<T> {
    fn default() -> Self {
        Self::new()
    }
}
