use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::foundation::core::Ref;

/// Fixed-capacity, append-only stack supporting concurrent `push` from many threads.
///
/// A push reserves its slot with a single compare-and-swap on the length and then publishes
/// the value. Pushes past capacity are dropped and counted, never blocking or overwriting.
/// Contents are meant to be read after the pushing phase has completed (worker threads
/// joined); `clear` takes `&mut self`, so a reset always happens-before the next round of
/// pushes.
pub struct LockFreeStack {
    slots: Box<[AtomicU32]>,
    len: AtomicUsize,
    dropped: AtomicUsize,
}

impl LockFreeStack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity)
                .map(|_| AtomicU32::new(Ref::INVALID.0))
                .collect(),
            len: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `false` if the stack was full and `value` was dropped.
    pub fn push(&self, value: Ref) -> bool {
        let mut len = self.len.load(Ordering::Relaxed);
        loop {
            if len >= self.slots.len() {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            match self.len.compare_exchange_weak(
                len,
                len + 1,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => len = actual,
            }
        }
        self.slots[len].store(value.0, Ordering::Release);
        true
    }

    /// Logical reset; slot contents are left in place and overwritten by later pushes.
    pub fn clear(&mut self) {
        *self.len.get_mut() = 0;
        *self.dropped.get_mut() = 0;
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire).min(self.slots.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.slots.len()
    }

    /// Number of pushes rejected since the last `clear`.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn iter(&self) -> impl Iterator<Item = Ref> + '_ {
        self.slots[..self.len()]
            .iter()
            .map(|slot| Ref(slot.load(Ordering::Acquire)))
    }

    pub fn to_vec(&self) -> Vec<Ref> {
        self.iter().collect()
    }
}

impl std::fmt::Debug for LockFreeStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockFreeStack")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("dropped", &self.dropped())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visibility/stack.rs"]
mod tests;
