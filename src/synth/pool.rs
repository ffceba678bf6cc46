use std::collections::VecDeque;

/// FIFO free list over a fixed set of voice slots.
///
/// The queue gives allocation order (oldest freed first); the flags answer
/// "is this slot free" in O(1) and make `release` idempotent, so a slot can
/// never sit in the queue twice.
#[derive(Debug, Clone)]
pub struct FreeList {
    queue: VecDeque<usize>,
    free: Vec<bool>,
}

impl FreeList {
    /// All `capacity` slots free, handed out in index order.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: (0..capacity).collect(),
            free: vec![true; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.free.len()
    }

    /// Number of free slots.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_free(&self, slot: usize) -> bool {
        self.free.get(slot).copied().unwrap_or(false)
    }

    /// Take the slot that has been free the longest.
    pub fn acquire(&mut self) -> Option<usize> {
        let slot = self.queue.pop_front()?;
        self.free[slot] = false;
        Some(slot)
    }

    /// Return a slot. Releasing a slot that is already free does nothing.
    pub fn release(&mut self, slot: usize) {
        if slot < self.free.len() && !self.free[slot] {
            self.free[slot] = true;
            self.queue.push_back(slot);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.capacity());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hands_out_oldest_free_first() {
        let mut list = FreeList::new(3);
        assert_eq!(list.acquire(), Some(0));
        assert_eq!(list.acquire(), Some(1));
        list.release(0);
        assert_eq!(list.acquire(), Some(2));
        assert_eq!(list.acquire(), Some(0));
        assert_eq!(list.acquire(), None);
    }

    #[test]
    fn release_is_idempotent() {
        let mut list = FreeList::new(2);
        let slot = list.acquire().unwrap();
        list.release(slot);
        list.release(slot);
        list.release(7);
        assert_eq!(list.len(), 2);
        assert!(list.is_free(slot));
    }

    #[test]
    fn reset_frees_everything() {
        let mut list = FreeList::new(4);
        while list.acquire().is_some() {}
        assert!(list.is_empty());
        list.reset();
        assert_eq!(list.len(), 4);
        assert_eq!(list.acquire(), Some(0));
    }
}
