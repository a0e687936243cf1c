use crate::block::bio_request::{BioReq, RequestId};
use crate::block::block_core::BlockSector;
use crate::block::block_error::BlockError;
use alloc::collections::VecDeque;

/// Pending requests sorted by ascending end sector.
///
/// Requests with equal end sectors keep their arrival order. Taking the
/// front repeatedly walks the pending set in increasing address order, and
/// once the highest request is gone the next pop naturally starts again
/// from the lowest one, which is all C-LOOK needs.
///
/// Inserts compare against each queued request's current end sector, so a
/// request grown in place through [`PendingQueue::get_mut`] is ordered by
/// its new range from then on. Queued requests are never moved.
#[derive(Default)]
pub struct PendingQueue {
    entries: VecDeque<BioReq>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Create an empty queue with room for `capacity` requests.
    pub fn with_capacity(capacity: usize) -> Result<Self, BlockError> {
        let mut entries = VecDeque::new();
        entries
            .try_reserve(capacity)
            .map_err(|_| BlockError::OutOfMemory)?;

        Ok(Self { entries })
    }

    /// Insert `rq` before the first request that ends strictly after it.
    ///
    /// Returns the position the request landed at.
    pub fn insert(&mut self, rq: BioReq) -> usize {
        let key = rq.end_sector();
        let pos = self
            .entries
            .iter()
            .position(|queued| key < queued.end_sector())
            .unwrap_or(self.entries.len());

        self.entries.insert(pos, rq);
        pos
    }

    /// Remove the request with the smallest end sector.
    pub fn pop_smallest(&mut self) -> Option<BioReq> {
        self.entries.pop_front()
    }

    /// Remove the request `id` wherever it sits.
    pub fn remove(&mut self, id: RequestId) -> Option<BioReq> {
        let pos = self.position(id)?;
        self.entries.remove(pos)
    }

    /// The request sorted right before `id`.
    pub fn predecessor(&self, id: RequestId) -> Option<&BioReq> {
        let pos = self.position(id)?;
        let prev = pos.checked_sub(1)?;
        self.entries.get(prev)
    }

    /// The request sorted right after `id`.
    pub fn successor(&self, id: RequestId) -> Option<&BioReq> {
        let pos = self.position(id)?;
        self.entries.get(pos + 1)
    }

    pub fn get(&self, id: RequestId) -> Option<&BioReq> {
        let pos = self.position(id)?;
        self.entries.get(pos)
    }

    pub fn get_mut(&mut self, id: RequestId) -> Option<&mut BioReq> {
        let pos = self.position(id)?;
        self.entries.get_mut(pos)
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.position(id).is_some()
    }

    /// Pending requests, front to back.
    pub fn iter(&self) -> impl Iterator<Item = &BioReq> {
        self.entries.iter()
    }

    /// End sectors, front to back.
    pub fn keys(&self) -> impl Iterator<Item = BlockSector> + '_ {
        self.entries.iter().map(BioReq::end_sector)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Release the queue.
    ///
    /// Panics if requests are still pending: tearing down an elevator with
    /// outstanding I/O would lose it.
    pub fn destroy(self) {
        assert!(
            self.entries.is_empty(),
            "elevator torn down with {} requests pending",
            self.entries.len()
        );
    }

    fn position(&self, id: RequestId) -> Option<usize> {
        self.entries.iter().position(|rq| rq.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::bio_request::BioOp;
    use alloc::vec::Vec;

    /// A request whose end sector is `end`.
    fn ending_at(id: u64, end: BlockSector) -> BioReq {
        BioReq::new(RequestId(id), BioOp::BioRead, end, 1)
    }

    fn ids(queue: &PendingQueue) -> Vec<u64> {
        queue.iter().map(|rq| rq.id().0).collect()
    }

    fn assert_sorted(queue: &PendingQueue) {
        let keys: Vec<_> = queue.keys().collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]), "unsorted: {keys:?}");
    }

    #[test]
    fn test_sorted_after_every_insert() {
        let mut queue = PendingQueue::new();
        let ends = [500, 20, 20, 7, 999, 0, 300, 20, 501, 6];
        for (id, end) in ends.iter().enumerate() {
            queue.insert(ending_at(id as u64, *end));
            assert_sorted(&queue);
        }
        assert_eq!(queue.len(), ends.len());
    }

    #[test]
    fn test_sorted_by_end_not_start() {
        let mut queue = PendingQueue::new();
        // Starts at 10 but ends at 49.
        queue.insert(BioReq::new(RequestId(1), BioOp::BioWrite, 10, 40));
        queue.insert(BioReq::new(RequestId(2), BioOp::BioWrite, 30, 1));

        assert_eq!(ids(&queue), [2, 1]);
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let mut queue = PendingQueue::new();
        assert_eq!(queue.insert(ending_at(1, 20)), 0);
        assert_eq!(queue.insert(ending_at(2, 10)), 0);
        assert_eq!(queue.insert(ending_at(3, 20)), 2);
        assert_eq!(queue.insert(ending_at(4, 20)), 3);
        assert_eq!(queue.insert(ending_at(5, 15)), 1);

        assert_eq!(ids(&queue), [2, 5, 1, 3, 4]);
    }

    #[test]
    fn test_pop_smallest() {
        let mut queue = PendingQueue::new();
        for (id, end) in [(1, 50), (2, 10), (3, 30)] {
            queue.insert(ending_at(id, end));
        }

        let order: Vec<_> = core::iter::from_fn(|| queue.pop_smallest())
            .map(|rq| rq.end_sector())
            .collect();
        assert_eq!(order, [10, 30, 50]);
        assert!(queue.pop_smallest().is_none());

        // Wraps back to the lowest pending address without any state.
        queue.insert(ending_at(4, 5));
        assert_eq!(queue.pop_smallest().map(|rq| rq.end_sector()), Some(5));
    }

    #[test]
    fn test_remove_specific() {
        for victim in 1..=3 {
            let mut queue = PendingQueue::new();
            queue.insert(ending_at(1, 10));
            queue.insert(ending_at(2, 20));
            queue.insert(ending_at(3, 30));

            let removed = queue.remove(RequestId(victim));
            assert_eq!(removed.map(|rq| rq.id()), Some(RequestId(victim)));

            let expected: Vec<u64> = (1..=3).filter(|id| *id != victim).collect();
            assert_eq!(ids(&queue), expected);
            assert!(!queue.contains(RequestId(victim)));
        }
    }

    #[test]
    fn test_remove_missing() {
        let mut queue = PendingQueue::new();
        queue.insert(ending_at(1, 10));
        assert!(queue.remove(RequestId(9)).is_none());
        assert_eq!(ids(&queue), [1]);
    }

    #[test]
    fn test_neighbors() {
        let mut queue = PendingQueue::new();
        queue.insert(ending_at(30, 30));
        queue.insert(ending_at(10, 10));
        queue.insert(ending_at(20, 20));

        let id = |rq: Option<&BioReq>| rq.map(|rq| rq.id().0);
        assert_eq!(id(queue.predecessor(RequestId(30))), Some(20));
        assert_eq!(id(queue.successor(RequestId(10))), Some(20));
        assert_eq!(id(queue.predecessor(RequestId(20))), Some(10));
        assert_eq!(id(queue.successor(RequestId(20))), Some(30));
        assert_eq!(id(queue.predecessor(RequestId(10))), None);
        assert_eq!(id(queue.successor(RequestId(30))), None);
        assert_eq!(id(queue.successor(RequestId(99))), None);
    }

    #[test]
    fn test_get_mut_does_not_move() {
        let mut queue = PendingQueue::new();
        queue.insert(ending_at(1, 10));
        queue.insert(ending_at(2, 20));

        let first = queue.get_mut(RequestId(1)).unwrap();
        first.sectors = 100;
        assert_eq!(queue.get(RequestId(1)).unwrap().end_sector(), 109);

        assert_eq!(ids(&queue), [1, 2]);
        assert_eq!(queue.keys().collect::<Vec<_>>(), [109, 20]);
    }

    #[test]
    fn test_insert_after_back_merge() {
        let mut queue = PendingQueue::new();
        queue.insert(BioReq::new(RequestId(1), BioOp::BioRead, 10, 10));
        queue.insert(BioReq::new(RequestId(2), BioOp::BioRead, 20, 10));

        // 1 grows to 10..=29 and 2 goes away.
        let next = queue.successor(RequestId(1)).cloned().unwrap();
        queue.get_mut(RequestId(1)).unwrap().absorb(&next);
        queue.remove(RequestId(2));
        assert_eq!(queue.keys().collect::<Vec<_>>(), [29]);

        assert_eq!(queue.insert(ending_at(3, 22)), 0);
        assert_eq!(queue.insert(ending_at(4, 29)), 2);
        assert_eq!(queue.insert(ending_at(5, 40)), 3);
        assert_eq!(ids(&queue), [3, 1, 4, 5]);
        assert_sorted(&queue);
    }

    #[test]
    fn test_with_capacity() {
        let queue = PendingQueue::with_capacity(128).unwrap();
        assert!(queue.is_empty());
        queue.destroy();

        assert_eq!(
            PendingQueue::with_capacity(usize::MAX).err(),
            Some(BlockError::OutOfMemory)
        );
    }

    #[test]
    fn test_destroy_empty() {
        let mut queue = PendingQueue::new();
        queue.insert(ending_at(1, 10));
        queue.pop_smallest();
        queue.destroy();
    }

    #[test]
    #[should_panic(expected = "requests pending")]
    fn test_destroy_non_empty() {
        let mut queue = PendingQueue::new();
        queue.insert(ending_at(1, 10));
        queue.destroy();
    }
}
