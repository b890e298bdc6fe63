use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};

use crate::types::CollisionPair;

// One output slot; geometry indices packed as (a << 32 | b).
#[derive(Default)]
struct Slot {
    geoms: AtomicU64,
    world: AtomicU32,
}

/// Fixed-capacity pair output shared by all lanes of a pass.
///
/// Writers reserve a slot with one `fetch_add` on the write index. Once the
/// index passes capacity further pairs are dropped and `len` stays clamped.
/// Readers must only look at the buffer after every writer of the pass has
/// finished.
pub struct PairBuffer {
    slots: Vec<Slot>,
    next: AtomicUsize,
}

impl PairBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| Slot::default()).collect(),
            next: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Append a pair; returns `false` when it was dropped for lack of room.
    #[inline]
    pub fn push(&self, pair: CollisionPair) -> bool {
        let idx = self.next.fetch_add(1, Ordering::Relaxed);
        match self.slots.get(idx) {
            Some(slot) => {
                slot.geoms.store((u64::from(pair.a) << 32) | u64::from(pair.b), Ordering::Relaxed);
                slot.world.store(pair.world, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Number of valid pairs, clamped to capacity.
    pub fn len(&self) -> usize {
        self.next.load(Ordering::Acquire).min(self.slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn overflowed(&self) -> bool {
        self.next.load(Ordering::Acquire) > self.slots.len()
    }

    /// Start a new pass. Slot contents beyond the new count are undefined.
    pub fn reset(&mut self) {
        *self.next.get_mut() = 0;
    }

    pub fn get(&self, idx: usize) -> Option<CollisionPair> {
        if idx >= self.len() {
            return None;
        }
        let slot = &self.slots[idx];
        let geoms = slot.geoms.load(Ordering::Relaxed);
        Some(CollisionPair {
            a: (geoms >> 32) as u32,
            b: geoms as u32,
            world: slot.world.load(Ordering::Relaxed),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = CollisionPair> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    pub fn to_vec(&self) -> Vec<CollisionPair> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_push_and_read_back() {
        let buf = PairBuffer::with_capacity(4);
        assert!(buf.is_empty());
        assert!(buf.push(CollisionPair::new(3, 2, 1)));
        assert!(buf.push(CollisionPair::new(0, u32::MAX, 0)));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.to_vec(), vec![CollisionPair::new(3, 2, 1), CollisionPair::new(0, u32::MAX, 0)]);
        assert_eq!(buf.get(2), None);
    }

    #[test]
    fn test_overflow_clamps_and_drops() {
        let buf = PairBuffer::with_capacity(2);
        assert!(buf.push(CollisionPair::new(0, 1, 0)));
        assert!(buf.push(CollisionPair::new(0, 2, 0)));
        assert!(!buf.push(CollisionPair::new(1, 2, 0)));
        assert_eq!(buf.len(), 2);
        assert!(buf.overflowed());
        assert_eq!(buf.to_vec()[1], CollisionPair::new(0, 2, 0));
    }

    #[test]
    fn test_reset_starts_new_pass() {
        let mut buf = PairBuffer::with_capacity(1);
        buf.push(CollisionPair::new(0, 1, 0));
        buf.push(CollisionPair::new(0, 1, 0));
        buf.reset();
        assert!(buf.is_empty());
        assert!(!buf.overflowed());
        assert!(buf.push(CollisionPair::new(4, 5, 6)));
        assert_eq!(buf.get(0), Some(CollisionPair::new(4, 5, 6)));
    }

    #[test]
    fn test_parallel_writers_lose_nothing() {
        let buf = PairBuffer::with_capacity(10_000);
        (0..10_000u32).into_par_iter().for_each(|i| {
            buf.push(CollisionPair::new(i, i + 1, i % 7));
        });
        assert_eq!(buf.len(), 10_000);
        let mut seen: Vec<u32> = buf.iter().map(|p| p.a).collect();
        seen.sort_unstable();
        assert!(seen.iter().copied().eq(0..10_000));
        assert!(buf.iter().all(|p| p.b == p.a + 1 && p.world == p.a % 7));
    }

    #[test]
    fn test_parallel_overflow_keeps_capacity() {
        let buf = PairBuffer::with_capacity(100);
        let stored: usize = (0..1000u32)
            .into_par_iter()
            .map(|i| buf.push(CollisionPair::new(i, i, 0)) as usize)
            .sum();
        assert_eq!(stored, 100);
        assert_eq!(buf.len(), 100);
    }
}
