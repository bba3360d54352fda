//! Generational slot arena.
//!
//! Handles carry the slot index and the generation the slot had when the
//! value was inserted. Removing a value bumps the slot generation, so every
//! handle issued before the removal stops resolving, even after the slot has
//! been reused.

use crate::profiling::profile_function;
use std::num::NonZeroU64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexSlot(NonZeroU64);

impl IndexSlot {
    pub fn new(generation: u32, idx: u32) -> Self {
        let raw = ((generation as u64) << 32) | (idx as u64 + 1);
        // The low half is `idx + 1` computed in 64 bits, so it is never zero.
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    pub fn generation(&self) -> u32 {
        (self.0.get() >> 32) as u32
    }

    pub fn index(&self) -> u32 {
        ((self.0.get() & u32::MAX as u64) - 1) as u32
    }
}

struct Entry<T> {
    generation: u32,
    data: Option<T>,
}

/// Returned by [`SparseSet::try_push`] when the set is at its limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityExceeded<T> {
    pub limit: usize,
    pub value: T,
}

pub struct SparseSet<T> {
    vec: Vec<Entry<T>>,
    free: Vec<u32>,
    len: usize,
    limit: Option<usize>,
}

impl<T> SparseSet<T> {
    pub const fn new() -> Self {
        Self {
            vec: Vec::new(),
            free: Vec::new(),
            len: 0,
            limit: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vec: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
            limit: None,
        }
    }

    /// Pre-sized set that refuses to hold more than `limit` live values.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            vec: Vec::with_capacity(limit),
            free: Vec::new(),
            len: 0,
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `data`, ignoring any limit.
    pub fn push(&mut self, data: T) -> IndexSlot {
        profile_function!();
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            let entry = &mut self.vec[idx as usize];
            entry.data = Some(data);
            IndexSlot::new(entry.generation, idx)
        } else {
            let idx = self.vec.len() as u32;
            self.vec.push(Entry {
                generation: 0,
                data: Some(data),
            });
            IndexSlot::new(0, idx)
        }
    }

    /// Inserts `data` unless the set is at its limit, in which case the
    /// value is handed back untouched.
    pub fn try_push(&mut self, data: T) -> Result<IndexSlot, CapacityExceeded<T>> {
        match self.limit {
            Some(limit) if self.len >= limit => Err(CapacityExceeded { limit, value: data }),
            _ => Ok(self.push(data)),
        }
    }

    fn entry(&self, idx: IndexSlot) -> Option<&Entry<T>> {
        self.vec
            .get(idx.index() as usize)
            .filter(|entry| entry.generation == idx.generation())
    }

    pub fn contains(&self, idx: IndexSlot) -> bool {
        self.entry(idx).is_some_and(|entry| entry.data.is_some())
    }

    pub fn try_get(&self, idx: IndexSlot) -> Option<&T> {
        self.entry(idx)?.data.as_ref()
    }

    pub fn try_get_mut(&mut self, idx: IndexSlot) -> Option<&mut T> {
        self.vec
            .get_mut(idx.index() as usize)
            .filter(|entry| entry.generation == idx.generation())?
            .data
            .as_mut()
    }

    /// Panics on a stale handle.
    pub fn get(&self, idx: IndexSlot) -> &T {
        self.try_get(idx)
            .unwrap_or_else(|| panic!("invalid generation, use after free! ({idx:?})"))
    }

    /// Panics on a stale handle.
    pub fn get_mut(&mut self, idx: IndexSlot) -> &mut T {
        self.try_get_mut(idx)
            .unwrap_or_else(|| panic!("invalid generation, use after free! ({idx:?})"))
    }

    pub fn try_remove(&mut self, idx: IndexSlot) -> Option<T> {
        profile_function!();
        let index = idx.index();
        let entry = self
            .vec
            .get_mut(index as usize)
            .filter(|entry| entry.generation == idx.generation())?;
        let data = entry.data.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
        Some(data)
    }

    /// Panics on a stale handle.
    pub fn remove(&mut self, idx: IndexSlot) -> T {
        self.try_remove(idx)
            .unwrap_or_else(|| panic!("invalid generation, use after free! ({idx:?})"))
    }

    pub fn clear(&mut self) {
        for (index, entry) in self.vec.iter_mut().enumerate() {
            if entry.data.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.vec.iter().filter_map(|entry| entry.data.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.vec.iter_mut().filter_map(|entry| entry.data.as_mut())
    }

    /// Iterates live values together with their current handles.
    pub fn iter_slots(&self) -> impl Iterator<Item = (IndexSlot, &T)> {
        self.vec.iter().enumerate().filter_map(|(index, entry)| {
            entry
                .data
                .as_ref()
                .map(|data| (IndexSlot::new(entry.generation, index as u32), data))
        })
    }
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_eq_size!(IndexSlot, Option<IndexSlot>);
