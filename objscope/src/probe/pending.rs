//! Objects seen before the probe became active

use log::warn;

use crate::domain::ObjectId;

/// FIFO of objects awaiting replay into the models
///
/// Drained exactly once. After [`PendingObjects::drain`] the buffer refuses new
/// entries and further drains return `None`, so a second replay cannot happen.
#[derive(Debug, Default)]
pub struct PendingObjects {
    queue: Vec<ObjectId>,
    drained: bool,
}

impl PendingObjects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `object`. Returns `false` once the buffer has been drained.
    pub fn push(&mut self, object: ObjectId) -> bool {
        if self.drained {
            warn!("dropping {object}: pending buffer already replayed");
            return false;
        }
        self.queue.push(object);
        true
    }

    /// Remove every occurrence of `object` and return how many were removed
    pub fn excise(&mut self, object: ObjectId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|&pending| pending != object);
        before - self.queue.len()
    }

    /// Take the buffered objects in arrival order, closing the buffer for good
    pub fn drain(&mut self) -> Option<Vec<ObjectId>> {
        if self.drained {
            return None;
        }
        self.drained = true;
        Some(std::mem::take(&mut self.queue))
    }

    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.drained
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_is_fifo_and_once() {
        let mut pending = PendingObjects::new();
        for addr in [3, 1, 2] {
            pending.push(ObjectId(addr));
        }
        assert_eq!(pending.drain(), Some(vec![ObjectId(3), ObjectId(1), ObjectId(2)]));
        assert!(pending.is_drained());
        assert_eq!(pending.drain(), None);
        assert!(!pending.push(ObjectId(4)));
        assert!(pending.is_empty());
    }

    #[test]
    fn test_excise_removes_every_occurrence() {
        let mut pending = PendingObjects::new();
        for addr in [1, 2, 1, 3] {
            pending.push(ObjectId(addr));
        }
        assert_eq!(pending.excise(ObjectId(1)), 2);
        assert_eq!(pending.excise(ObjectId(9)), 0);
        assert_eq!(pending.drain(), Some(vec![ObjectId(2), ObjectId(3)]));
    }
}
