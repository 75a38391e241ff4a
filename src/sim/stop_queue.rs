//! Direction-ordered stop queues used for SCAN/LOOK servicing.

use std::collections::{BinaryHeap, HashSet};

use super::types::Direction;

/// Which end of the queue is served first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOrder {
    /// Lowest floor first (stops ahead of upward travel).
    Ascending,
    /// Highest floor first (stops ahead of downward travel).
    Descending,
}

/// Pending floor stops for one travel direction of one cabin.
///
/// Backed by a binary max-heap over a direction-adjusted key, so
/// [`peek_nearest`](Self::peek_nearest) is O(1) and insert/extract are
/// O(log n). A membership set keeps floors unique.
///
/// # Examples
///
/// ```
/// use elevator_sim::sim::stop_queue::{QueueOrder, StopQueue};
///
/// let mut up = StopQueue::new(QueueOrder::Ascending);
/// up.insert(7);
/// up.insert(3);
/// up.insert(3);
/// assert_eq!(up.len(), 2);
/// assert_eq!(up.extract_nearest(), Some(3));
/// assert_eq!(up.peek_nearest(), Some(7));
/// ```
#[derive(Debug, Clone)]
pub struct StopQueue {
    order: QueueOrder,
    heap: BinaryHeap<i32>,
    members: HashSet<i32>,
}

impl StopQueue {
    pub fn new(order: QueueOrder) -> Self {
        Self {
            order,
            heap: BinaryHeap::new(),
            members: HashSet::new(),
        }
    }

    pub fn order(&self) -> QueueOrder {
        self.order
    }

    fn key(&self, floor: i32) -> i32 {
        match self.order {
            QueueOrder::Ascending => -floor,
            QueueOrder::Descending => floor,
        }
    }

    fn floor(&self, key: i32) -> i32 {
        match self.order {
            QueueOrder::Ascending => -key,
            QueueOrder::Descending => key,
        }
    }

    /// Adds `floor`; returns `false` if it was already queued.
    pub fn insert(&mut self, floor: i32) -> bool {
        if !self.members.insert(floor) {
            return false;
        }
        let key = self.key(floor);
        self.heap.push(key);
        true
    }

    /// Floor that would be served next in this queue's direction.
    pub fn peek_nearest(&self) -> Option<i32> {
        self.heap.peek().map(|&k| self.floor(k))
    }

    /// Removes and returns the next floor to serve.
    pub fn extract_nearest(&mut self) -> Option<i32> {
        let key = self.heap.pop()?;
        let floor = self.floor(key);
        self.members.remove(&floor);
        Some(floor)
    }

    /// Drops every floor already passed relative to `reference`.
    ///
    /// For an ascending queue that means floors below `reference`; for a
    /// descending queue, floors above it. Returns the dropped floors in
    /// ascending order so the caller can decide whether any still matter.
    pub fn prune_behind(&mut self, reference: i32) -> Vec<i32> {
        let order = self.order;
        let behind = |floor: i32| match order {
            QueueOrder::Ascending => floor < reference,
            QueueOrder::Descending => floor > reference,
        };

        let mut pruned: Vec<i32> = self.members.iter().copied().filter(|&f| behind(f)).collect();
        if pruned.is_empty() {
            return pruned;
        }
        pruned.sort_unstable();

        for floor in &pruned {
            self.members.remove(floor);
        }
        let members = &self.members;
        self.heap.retain(|&k| {
            let floor = match order {
                QueueOrder::Ascending => -k,
                QueueOrder::Descending => k,
            };
            members.contains(&floor)
        });
        pruned
    }

    /// Removes `floor` wherever it sits in the queue.
    pub fn remove(&mut self, floor: i32) -> bool {
        if !self.members.remove(&floor) {
            return false;
        }
        let key = self.key(floor);
        self.heap.retain(|&k| k != key);
        true
    }

    pub fn contains(&self, floor: i32) -> bool {
        self.members.contains(&floor)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.members.clear();
    }

    /// Queued floors in service order.
    pub fn floors(&self) -> Vec<i32> {
        let mut floors: Vec<i32> = self.members.iter().copied().collect();
        match self.order {
            QueueOrder::Ascending => floors.sort_unstable(),
            QueueOrder::Descending => floors.sort_unstable_by(|a, b| b.cmp(a)),
        }
        floors
    }
}

/// The pair of stop queues owned by one cabin, plus SCAN/LOOK direction
/// resolution over them.
///
/// A floor is never queued in both directions at once. A stop found behind
/// the cabin while pruning is still owed a visit, so it is re-filed into the
/// opposite queue instead of being lost.
#[derive(Debug, Clone)]
pub struct StopPlan {
    up: StopQueue,
    down: StopQueue,
}

impl Default for StopPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl StopPlan {
    pub fn new() -> Self {
        Self {
            up: StopQueue::new(QueueOrder::Ascending),
            down: StopQueue::new(QueueOrder::Descending),
        }
    }

    pub fn up(&self) -> &StopQueue {
        &self.up
    }

    pub fn down(&self) -> &StopQueue {
        &self.down
    }

    /// Queue that serves travel in `direction`, if any.
    pub fn queue_for(&self, direction: Direction) -> Option<&StopQueue> {
        match direction {
            Direction::Up => Some(&self.up),
            Direction::Down => Some(&self.down),
            Direction::Idle => None,
        }
    }

    /// Files `floor` relative to the cabin at `position`.
    ///
    /// `heading` is the direction the cabin is physically travelling in
    /// (`Idle` when it is standing at a floor). A stop at `position` while
    /// travelling is served on the return pass.
    pub fn insert(&mut self, floor: i32, position: i32, heading: Direction) -> bool {
        if self.contains(floor) {
            return false;
        }
        let upward = match floor.cmp(&position) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => heading != Direction::Up,
        };
        if upward {
            self.up.insert(floor)
        } else {
            self.down.insert(floor)
        }
    }

    /// Removes `floor` from both queues.
    pub fn consume(&mut self, floor: i32) -> bool {
        let up = self.up.remove(floor);
        let down = self.down.remove(floor);
        up || down
    }

    pub fn contains(&self, floor: i32) -> bool {
        self.up.contains(floor) || self.down.contains(floor)
    }

    pub fn len(&self) -> usize {
        self.up.len() + self.down.len()
    }

    pub fn is_empty(&self) -> bool {
        self.up.is_empty() && self.down.is_empty()
    }

    pub fn clear(&mut self) {
        self.up.clear();
        self.down.clear();
    }

    /// Every queued floor, ascending.
    pub fn floors(&self) -> Vec<i32> {
        let mut floors = self.up.floors();
        floors.extend(self.down.floors());
        floors.sort_unstable();
        floors
    }

    /// Next floor to head for from `position`, updating `direction`.
    ///
    /// A stop at `position` wins outright. Otherwise a travelling cabin keeps
    /// its direction while stops remain ahead, turns around when they run
    /// out, and goes idle when both queues are empty. An idle cabin takes
    /// whichever nearest stop is closer, preferring up on a tie.
    pub fn next_target(&mut self, position: i32, direction: &mut Direction) -> Option<i32> {
        if self.contains(position) {
            return Some(position);
        }

        match *direction {
            Direction::Up | Direction::Down => {
                let ahead = *direction;
                if let Some(floor) = self.nearest_ahead(ahead, position) {
                    return Some(floor);
                }
                if let Some(floor) = self.nearest_ahead(ahead.opposite(), position) {
                    *direction = ahead.opposite();
                    return Some(floor);
                }
                *direction = Direction::Idle;
                None
            }
            Direction::Idle => {
                let up = self.nearest_ahead(Direction::Up, position);
                let down = self.nearest_ahead(Direction::Down, position);
                let (next, chosen) = match (up, down) {
                    (Some(u), Some(d)) if (u - position) <= (position - d) => (u, Direction::Up),
                    (Some(_), Some(d)) => (d, Direction::Down),
                    (Some(u), None) => (u, Direction::Up),
                    (None, Some(d)) => (d, Direction::Down),
                    (None, None) => return None,
                };
                *direction = chosen;
                Some(next)
            }
        }
    }

    /// Prunes the `direction` queue behind `position` and peeks it.
    fn nearest_ahead(&mut self, direction: Direction, position: i32) -> Option<i32> {
        let (queue, other) = match direction {
            Direction::Up => (&mut self.up, &mut self.down),
            Direction::Down => (&mut self.down, &mut self.up),
            Direction::Idle => return None,
        };
        for floor in queue.prune_behind(position) {
            other.insert(floor);
        }
        queue.peek_nearest()
    }
}
