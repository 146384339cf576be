//! # Slot Pool
//!
//! Fixed-capacity, index-addressed storage with free-index recycling and lock-count
//! deferred release.
//!
//! ## Slot State Machine
//!
//! ```text
//!            claim                 release (unlocked or forced)
//!   FREE ───────────────▶ LIVE ─────────────────────────────────▶ FREE
//!                          │  ▲
//!        release (locked)  │  │ lock / unlock (count > 0)
//!                          ▼  │
//!                    PENDING RELEASE ──── last unlock ──────────▶ FREE
//! ```
//!
//! Index 0 is never handed out. Every claim bumps the slot generation so a
//! [`PoolHandle`] taken before a release never resolves against the next occupant.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};

/// Source of process-unique pool ids.
static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(1);

/// Index of a slot inside one pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    /// The "no slot" sentinel. Never claimed, never valid.
    pub const NONE: Self = Self(0);

    /// Returns true if this is the sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Raw index value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Generation-checked reference to a slot of a specific pool.
///
/// Obtained from [`SlotPool::handle`]; turned back into an index with
/// [`SlotPool::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    pool_id: u32,
    index: SlotIndex,
    generation: u32,
}

impl PoolHandle {
    /// Slot index this handle points at.
    #[inline]
    #[must_use]
    pub const fn index(self) -> SlotIndex {
        self.index
    }

    /// Id of the pool that issued this handle.
    #[inline]
    #[must_use]
    pub const fn pool_id(self) -> u32 {
        self.pool_id
    }

    /// Generation of the slot at issue time.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

/// One storage unit.
struct Slot<T> {
    lock_count: u32,
    pending_release: bool,
    generation: u32,
    payload: Option<T>,
}

impl<T> Slot<T> {
    const fn empty() -> Self {
        Self {
            lock_count: 0,
            pending_release: false,
            generation: 0,
            payload: None,
        }
    }
}

/// A fixed-capacity pool of `T` addressed by [`SlotIndex`].
///
/// Free indices are handed out lowest-first. Live indices are tracked separately so
/// enumeration costs O(live), not O(capacity).
///
/// # Thread Safety
///
/// This pool is NOT synchronized. One thread owns it; inbound work from other
/// threads is queued and applied by the owner.
///
/// # Example
///
/// ```rust
/// use warden_core::{SlotIndex, SlotPool};
///
/// let mut pool: SlotPool<String> = SlotPool::new(4);
/// let a = pool.insert("a".to_string()).unwrap();
/// assert_ne!(a, SlotIndex::NONE);
///
/// // A specific slot can be requested; the granted index is returned.
/// let b = pool.claim_hint(a).unwrap();
/// assert_ne!(a, b);
/// ```
pub struct SlotPool<T> {
    /// Process-unique pool id, embedded in handles.
    id: u32,
    /// `capacity + 1` slots; slot 0 is never used.
    slots: Box<[Slot<T>]>,
    /// Unclaimed indices.
    free: BTreeSet<u32>,
    /// Claimed indices, including those pending release.
    live: BTreeSet<u32>,
}

impl<T> SlotPool<T> {
    /// Creates a pool holding at most `capacity` entries.
    ///
    /// All slots are allocated upfront.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or does not fit the `u32` index space. Use
    /// [`SlotPool::from_config`] for sizes read from configuration.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        let last = u32::try_from(capacity)
            .ok()
            .filter(|&c| c < u32::MAX)
            .expect("Capacity must fit the u32 index space");

        let slots: Vec<Slot<T>> = (0..=capacity).map(|_| Slot::empty()).collect();

        Self {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            slots: slots.into_boxed_slice(),
            free: (1..=last).collect(),
            live: BTreeSet::new(),
        }
    }

    /// Creates a pool from a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the config does not validate.
    pub fn from_config(config: &PoolConfig) -> PoolResult<Self> {
        config.validate()?;
        Ok(Self::new(config.capacity))
    }

    /// Process-unique id of this pool.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Maximum number of live entries.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Number of claimed entries, including those pending release.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns true if nothing is claimed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of claimable slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    fn slot(&self, index: SlotIndex) -> Option<&Slot<T>> {
        if index.is_none() {
            return None;
        }
        self.slots
            .get(index.0 as usize)
            .filter(|slot| slot.payload.is_some())
    }

    fn slot_mut(&mut self, index: SlotIndex) -> Option<&mut Slot<T>> {
        if index.is_none() {
            return None;
        }
        self.slots
            .get_mut(index.0 as usize)
            .filter(|slot| slot.payload.is_some())
    }

    /// Returns true if `index` is currently claimed. Always false for the sentinel.
    #[inline]
    #[must_use]
    pub fn valid(&self, index: SlotIndex) -> bool {
        self.slot(index).is_some()
    }

    /// Lowest unclaimed index, without claiming it.
    #[inline]
    #[must_use]
    pub fn find_free_index(&self) -> Option<SlotIndex> {
        self.free.first().copied().map(SlotIndex)
    }

    /// Claims a slot and stores the value built by `make`.
    ///
    /// If `hint` is free it is claimed exactly, otherwise the lowest free index is used.
    /// The returned index is the one actually granted; `None` means the pool is full.
    pub fn claim_with(
        &mut self,
        hint: Option<SlotIndex>,
        make: impl FnOnce(SlotIndex) -> T,
    ) -> Option<SlotIndex> {
        let index = match hint {
            Some(hint) if self.free.remove(&hint.0) => hint.0,
            _ => self.free.pop_first()?,
        };

        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.lock_count = 0;
        slot.pending_release = false;
        slot.payload = Some(make(SlotIndex(index)));
        self.live.insert(index);

        tracing::debug!(pool = self.id, index, "slot claimed");
        Some(SlotIndex(index))
    }

    /// Claims the lowest free slot and stores `value` in it.
    pub fn insert(&mut self, value: T) -> Option<SlotIndex> {
        self.claim_with(None, |_| value)
    }

    /// Releases a claimed slot.
    ///
    /// With no outstanding locks, or with `force_immediate`, the payload is removed and
    /// returned and the index becomes claimable again. Otherwise the release is deferred
    /// to the last [`unlock`](Self::unlock) and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not claimed.
    pub fn release(&mut self, index: SlotIndex, force_immediate: bool) -> PoolResult<Option<T>> {
        let pool = self.id;
        let slot = self
            .slot_mut(index)
            .ok_or(PoolError::InvalidHandle { index: index.0 })?;

        if slot.lock_count > 0 && !force_immediate {
            slot.pending_release = true;
            tracing::debug!(pool, index = index.0, locks = slot.lock_count, "slot release deferred");
            return Ok(None);
        }

        Ok(self.free_slot(index.0))
    }

    fn free_slot(&mut self, index: u32) -> Option<T> {
        let slot = &mut self.slots[index as usize];
        let payload = slot.payload.take();
        slot.lock_count = 0;
        slot.pending_release = false;
        self.live.remove(&index);
        self.free.insert(index);

        tracing::debug!(pool = self.id, index, "slot released");
        payload
    }

    /// Raises the lock count of a claimed slot.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not claimed.
    pub fn lock(&mut self, index: SlotIndex) -> PoolResult<()> {
        let slot = self
            .slot_mut(index)
            .ok_or(PoolError::InvalidHandle { index: index.0 })?;
        slot.lock_count += 1;
        Ok(())
    }

    /// Lowers the lock count of a claimed slot.
    ///
    /// When the count reaches zero on a slot pending release, the release happens now
    /// and the payload is returned.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not claimed, and
    /// [`PoolError::NotLocked`] if it has no outstanding lock.
    pub fn unlock(&mut self, index: SlotIndex) -> PoolResult<Option<T>> {
        let slot = self
            .slot_mut(index)
            .ok_or(PoolError::InvalidHandle { index: index.0 })?;
        if slot.lock_count == 0 {
            return Err(PoolError::NotLocked { index: index.0 });
        }

        slot.lock_count -= 1;
        if slot.lock_count == 0 && slot.pending_release {
            return Ok(self.free_slot(index.0));
        }
        Ok(None)
    }

    /// Locks `index` for the lifetime of the returned guard.
    ///
    /// The guard derefs to the pool, so the holder can keep working with it (including
    /// releasing the locked slot). Dropping the guard unlocks, performing any deferred
    /// release.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not claimed.
    pub fn lock_scoped(&mut self, index: SlotIndex) -> PoolResult<SlotGuard<'_, T>> {
        self.lock(index)?;
        let handle = self
            .handle(index)
            .ok_or(PoolError::InvalidHandle { index: index.0 })?;
        Ok(SlotGuard {
            pool: self,
            handle,
            unlocked: false,
        })
    }

    /// Outstanding locks on `index`, or `None` if it is not claimed.
    #[must_use]
    pub fn lock_count(&self, index: SlotIndex) -> Option<u32> {
        self.slot(index).map(|slot| slot.lock_count)
    }

    /// Returns true if `index` was released while locked and awaits its last unlock.
    #[must_use]
    pub fn is_pending_release(&self, index: SlotIndex) -> bool {
        self.slot(index).is_some_and(|slot| slot.pending_release)
    }

    /// Borrows the payload at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not claimed.
    pub fn get(&self, index: SlotIndex) -> PoolResult<&T> {
        self.slot(index)
            .and_then(|slot| slot.payload.as_ref())
            .ok_or(PoolError::InvalidHandle { index: index.0 })
    }

    /// Mutably borrows the payload at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if `index` is not claimed.
    pub fn get_mut(&mut self, index: SlotIndex) -> PoolResult<&mut T> {
        self.slot_mut(index)
            .and_then(|slot| slot.payload.as_mut())
            .ok_or(PoolError::InvalidHandle { index: index.0 })
    }

    /// Generation-checked handle for a claimed slot.
    #[must_use]
    pub fn handle(&self, index: SlotIndex) -> Option<PoolHandle> {
        self.slot(index).map(|slot| PoolHandle {
            pool_id: self.id,
            index,
            generation: slot.generation,
        })
    }

    /// Maps a handle back to its index if it still refers to the same occupant.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if the handle belongs to another pool, or its
    /// slot was released (and possibly reclaimed) since it was issued.
    pub fn resolve(&self, handle: PoolHandle) -> PoolResult<SlotIndex> {
        let current = handle.pool_id == self.id
            && self
                .slot(handle.index)
                .is_some_and(|slot| slot.generation == handle.generation);
        if current {
            Ok(handle.index)
        } else {
            Err(PoolError::InvalidHandle {
                index: handle.index.0,
            })
        }
    }

    /// Iterates over claimed entries in index order.
    pub fn entries(&self) -> impl Iterator<Item = (SlotIndex, &T)> + '_ {
        self.live.iter().filter_map(move |&index| {
            self.slots[index as usize]
                .payload
                .as_ref()
                .map(|payload| (SlotIndex(index), payload))
        })
    }

    /// Snapshot of the claimed indices.
    ///
    /// Use this when entries are mutated (or released) while walking them.
    #[must_use]
    pub fn live_indices(&self) -> Vec<SlotIndex> {
        self.live.iter().copied().map(SlotIndex).collect()
    }

    /// Force-releases every claimed slot, returning the payloads in index order.
    pub fn release_all(&mut self) -> Vec<T> {
        let indices: Vec<u32> = self.live.iter().copied().collect();
        indices
            .into_iter()
            .filter_map(|index| self.free_slot(index))
            .collect()
    }
}

impl<T: Default> SlotPool<T> {
    /// Claims the lowest free slot with a default payload.
    pub fn claim(&mut self) -> Option<SlotIndex> {
        self.claim_with(None, |_| T::default())
    }

    /// Claims `hint` if free, otherwise the lowest free slot, with a default payload.
    ///
    /// Returns the index actually granted.
    pub fn claim_hint(&mut self, hint: SlotIndex) -> Option<SlotIndex> {
        self.claim_with(Some(hint), |_| T::default())
    }
}

impl<T> fmt::Debug for SlotPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotPool")
            .field("id", &self.id)
            .field("capacity", &self.capacity())
            .field("live", &self.live.len())
            .finish()
    }
}

impl<T> Drop for SlotPool<T> {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            tracing::debug!(pool = self.id, live = self.live.len(), "pool dropped with live slots");
            drop(self.release_all());
        }
    }
}

/// Scoped lock on one slot. Unlocks on drop.
///
/// Obtained from [`SlotPool::lock_scoped`]. If the slot was force-released (and maybe
/// reclaimed) while the guard was held, the drop leaves the new occupant alone.
pub struct SlotGuard<'a, T> {
    pool: &'a mut SlotPool<T>,
    handle: PoolHandle,
    unlocked: bool,
}

impl<T> SlotGuard<'_, T> {
    /// The locked index.
    #[inline]
    #[must_use]
    pub fn index(&self) -> SlotIndex {
        self.handle.index
    }

    /// Unlocks now, returning the payload if a deferred release happened.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidHandle`] if the slot was force-released meanwhile.
    pub fn unlock(mut self) -> PoolResult<Option<T>> {
        self.unlocked = true;
        let index = self.pool.resolve(self.handle)?;
        self.pool.unlock(index)
    }
}

impl<T> Deref for SlotGuard<'_, T> {
    type Target = SlotPool<T>;

    fn deref(&self) -> &Self::Target {
        self.pool
    }
}

impl<T> DerefMut for SlotGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.pool
    }
}

impl<T> Drop for SlotGuard<'_, T> {
    fn drop(&mut self) {
        if self.unlocked {
            return;
        }
        if let Ok(index) = self.pool.resolve(self.handle) {
            // Payload of a deferred release is dropped here.
            drop(self.pool.unlock(index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_never_returns_sentinel() {
        let mut pool: SlotPool<u32> = SlotPool::new(3);
        let claimed: Vec<_> = std::iter::from_fn(|| pool.claim()).collect();
        assert_eq!(claimed, vec![SlotIndex(1), SlotIndex(2), SlotIndex(3)]);
        assert!(!pool.valid(SlotIndex::NONE));
    }

    #[test]
    fn test_pool_full() {
        let mut pool: SlotPool<u8> = SlotPool::new(2);

        let _ = pool.insert(1).unwrap();
        let _ = pool.insert(2).unwrap();
        assert!(pool.find_free_index().is_none());
        assert!(pool.insert(3).is_none());
        assert!(pool.claim().is_none());
    }

    #[test]
    fn test_find_free_index_does_not_claim() {
        let mut pool: SlotPool<u8> = SlotPool::new(2);
        let free = pool.find_free_index().unwrap();
        assert_eq!(pool.find_free_index(), Some(free));
        assert!(!pool.valid(free));
        assert_eq!(pool.claim(), Some(free));
    }

    #[test]
    fn test_pool_reuse() {
        let mut pool: SlotPool<u32> = SlotPool::new(1);

        let h1 = pool.insert(1).unwrap();
        assert_eq!(pool.release(h1, false).unwrap(), Some(1));

        let h2 = pool.insert(2).unwrap();
        assert_eq!(h1, h2); // Same slot reused
        assert_eq!(*pool.get(h2).unwrap(), 2);
    }

    #[test]
    fn test_claim_hint_exact() {
        let mut pool: SlotPool<u8> = SlotPool::new(8);
        assert_eq!(pool.claim_hint(SlotIndex(5)), Some(SlotIndex(5)));
        assert_eq!(pool.claim(), Some(SlotIndex(1)));
    }

    #[test]
    fn test_claim_hint_fallback() {
        let mut pool: SlotPool<u8> = SlotPool::new(3);
        let taken = pool.claim_hint(SlotIndex(2)).unwrap();
        let other = pool.claim_hint(taken).unwrap();
        assert_ne!(other, taken);
        assert!(pool.valid(other));

        // Out-of-range and sentinel hints fall back too.
        assert_eq!(pool.claim_hint(SlotIndex(99)), Some(SlotIndex(3)));
        assert_eq!(pool.claim_hint(SlotIndex::NONE), None);
    }

    #[test]
    fn test_deferred_release() {
        let mut pool: SlotPool<u32> = SlotPool::new(4);
        let i = pool.insert(7).unwrap();

        pool.lock(i).unwrap();
        assert_eq!(pool.release(i, false).unwrap(), None);
        assert!(pool.valid(i));
        assert!(pool.is_pending_release(i));
        assert_eq!(pool.find_free_index(), Some(SlotIndex(2)));

        assert_eq!(pool.unlock(i).unwrap(), Some(7));
        assert!(!pool.valid(i));
        assert_eq!(pool.find_free_index(), Some(i));
    }

    #[test]
    fn test_nested_locks() {
        let mut pool: SlotPool<u32> = SlotPool::new(4);
        let i = pool.insert(1).unwrap();
        pool.lock(i).unwrap();
        pool.lock(i).unwrap();
        pool.release(i, false).unwrap();

        assert_eq!(pool.unlock(i).unwrap(), None);
        assert!(pool.valid(i));
        assert_eq!(pool.unlock(i).unwrap(), Some(1));
        assert!(!pool.valid(i));
    }

    #[test]
    fn test_unlock_without_release_keeps_slot() {
        let mut pool: SlotPool<u32> = SlotPool::new(4);
        let i = pool.insert(1).unwrap();
        pool.lock(i).unwrap();
        assert_eq!(pool.unlock(i).unwrap(), None);
        assert!(pool.valid(i));
        assert_eq!(pool.unlock(i), Err(PoolError::NotLocked { index: i.0 }));
    }

    #[test]
    fn test_forced_release_ignores_locks() {
        let mut pool: SlotPool<u32> = SlotPool::new(4);
        let i = pool.insert(9).unwrap();
        pool.lock(i).unwrap();
        assert_eq!(pool.release(i, true).unwrap(), Some(9));
        assert!(!pool.valid(i));
        assert_eq!(pool.unlock(i), Err(PoolError::InvalidHandle { index: i.0 }));
    }

    #[test]
    fn test_invalid_index_access() {
        let mut pool: SlotPool<u32> = SlotPool::new(4);
        assert_eq!(pool.get(SlotIndex::NONE), Err(PoolError::InvalidHandle { index: 0 }));
        assert!(pool.get(SlotIndex(3)).is_err());
        assert!(pool.get(SlotIndex(400)).is_err());
        assert!(pool.release(SlotIndex(2), true).is_err());
        assert!(pool.lock(SlotIndex(2)).is_err());
    }

    #[test]
    fn test_handle_generation() {
        let mut pool: SlotPool<u32> = SlotPool::new(1);
        let i = pool.insert(1).unwrap();
        let stale = pool.handle(i).unwrap();
        assert_eq!(pool.resolve(stale), Ok(i));

        pool.release(i, true).unwrap();
        let again = pool.insert(2).unwrap();
        assert_eq!(again, i);
        assert!(pool.resolve(stale).is_err());
        assert_ne!(pool.handle(again).unwrap(), stale);
    }

    #[test]
    fn test_handle_from_other_pool() {
        let mut a: SlotPool<u32> = SlotPool::new(2);
        let mut b: SlotPool<u32> = SlotPool::new(2);
        let ia = a.insert(1).unwrap();
        let _ = b.insert(1).unwrap();
        let handle = a.handle(ia).unwrap();
        assert!(b.resolve(handle).is_err());
    }

    #[test]
    fn test_entries_track_live_slots() {
        let mut pool: SlotPool<&str> = SlotPool::new(8);
        let a = pool.insert("a").unwrap();
        let b = pool.insert("b").unwrap();
        let c = pool.insert("c").unwrap();
        pool.release(b, false).unwrap();

        let seen: Vec<_> = pool.entries().collect();
        assert_eq!(seen, vec![(a, &"a"), (c, &"c")]);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_scoped_guard_defers_release() {
        let mut pool: SlotPool<u32> = SlotPool::new(4);
        let i = pool.insert(3).unwrap();
        {
            let mut guard = pool.lock_scoped(i).unwrap();
            assert_eq!(guard.release(i, false).unwrap(), None);
            assert!(guard.valid(i));
        }
        assert!(!pool.valid(i));
    }

    #[test]
    fn test_scoped_guard_explicit_unlock() {
        let mut pool: SlotPool<u32> = SlotPool::new(4);
        let i = pool.insert(3).unwrap();
        let mut guard = pool.lock_scoped(i).unwrap();
        guard.release(i, false).unwrap();
        assert_eq!(guard.unlock().unwrap(), Some(3));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_scoped_guard_survives_forced_reuse() {
        let mut pool: SlotPool<u32> = SlotPool::new(1);
        let i = pool.insert(1).unwrap();
        {
            let mut guard = pool.lock_scoped(i).unwrap();
            guard.release(i, true).unwrap();
            let reused = guard.insert(2).unwrap();
            assert_eq!(reused, i);
        }
        // The guard must not have unlocked (or released) the new occupant.
        assert_eq!(*pool.get(i).unwrap(), 2);
        assert_eq!(pool.lock_count(i), Some(0));
    }

    #[test]
    fn test_release_all() {
        let mut pool: SlotPool<u32> = SlotPool::new(4);
        pool.insert(1).unwrap();
        let locked = pool.insert(2).unwrap();
        pool.lock(locked).unwrap();

        assert_eq!(pool.release_all(), vec![1, 2]);
        assert!(pool.is_empty());
        assert_eq!(pool.free_count(), 4);
    }

    #[test]
    fn test_from_config() {
        let pool: SlotPool<u8> = SlotPool::from_config(&PoolConfig { capacity: 5 }).unwrap();
        assert_eq!(pool.capacity(), 5);
        assert!(SlotPool::<u8>::from_config(&PoolConfig { capacity: 0 }).is_err());
    }
}
