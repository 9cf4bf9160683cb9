//! Fixed-capacity live pools
//!
//! Dense storage with O(1) append and O(1) swap-remove. Removal moves the last
//! live entry into the freed slot, so iteration order is not stable across
//! frames and nothing may rely on it.

use crate::error::{PoolError, PoolKind};

#[derive(Debug, Clone)]
pub struct FixedPool<T> {
    items: Vec<T>,
    capacity: usize,
    kind: PoolKind,
}

impl<T> FixedPool<T> {
    pub fn new(kind: PoolKind, capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            kind,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Append a live entry
    pub fn push(&mut self, item: T) -> Result<&mut T, PoolError> {
        if self.is_full() {
            return Err(PoolError::Exhausted {
                pool: self.kind,
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        let last = self.items.len() - 1;
        Ok(&mut self.items[last])
    }

    /// Remove by index; the last entry takes its place
    pub fn swap_remove(&mut self, index: usize) -> T {
        self.items.swap_remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Update every entry in place and swap-remove those for which `expired`
    /// returns true.
    ///
    /// The entry swapped into a freed slot is visited next, so each live entry
    /// is updated exactly once per sweep.
    pub fn sweep<F>(&mut self, mut expired: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        let mut i = 0;
        while i < self.items.len() {
            if expired(&mut self.items[i]) {
                self.items.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a FixedPool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
