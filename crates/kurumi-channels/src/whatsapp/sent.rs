//! Recently sent message IDs, used to drop echoes of our own sends.

use std::collections::{HashSet, VecDeque};

/// Outbound IDs remembered before the oldest is evicted.
pub(crate) const SENT_ID_CAPACITY: usize = 512;

/// Insertion-ordered set of message IDs with a fixed capacity.
#[derive(Debug)]
pub(crate) struct SentIds {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl SentIds {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Remember `id`, evicting the oldest entry once full.
    pub(crate) fn insert(&mut self, id: String) {
        if self.capacity == 0 || self.ids.contains(&id) {
            return;
        }
        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        self.ids.insert(id.clone());
        self.order.push_back(id);
    }

    /// Forget `id`, returning whether it was ours.
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        if !self.ids.remove(id) {
            return false;
        }
        self.order.retain(|known| known != id);
        true
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }
}

impl Default for SentIds {
    fn default() -> Self {
        Self::new(SENT_ID_CAPACITY)
    }
}
