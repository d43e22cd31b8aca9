//! Provides an implementation of a SparseSet as an alternative to HashSets.
//!
//! Membership checks, inserts and clears are all constant time which makes
//! the set a good fit for tracking the instructions already visited during a
//! single step of the matcher.

extern crate alloc;
use alloc::{vec, vec::Vec};

pub struct SparseSet {
    dense: Vec<usize>,
    sparse: Vec<usize>,
}

impl SparseSet {
    /// Initializes a new set of taking a value representing the maximum size
    /// of the set.
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        Self {
            dense: Vec::with_capacity(max_len),
            sparse: vec![0; max_len],
        }
    }

    /// Inserts a value into the set, returning `false` if it was already
    /// present.
    pub fn insert(&mut self, val: usize) -> bool {
        if self.contains(&val) {
            return false;
        }

        if self.sparse.len() <= val {
            // double the size.
            self.sparse.resize((val + 1) * 2, 0);
        }

        self.sparse[val] = self.dense.len();
        self.dense.push(val);
        true
    }

    /// Returns `true` if the set contains a value.
    pub fn contains(&self, val: &usize) -> bool {
        self.sparse
            .get(*val)
            .and_then(|&dense_idx| self.dense.get(dense_idx))
            // if none, the bounds of the set are exceeded and thus doesn't
            // contain the value.
            .map_or(false, |member| member == val)
    }

    /// Clears the set, removing all values.
    pub fn clear(&mut self) {
        self.dense.clear();
    }
}

impl core::fmt::Debug for SparseSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SparseSet({:?})", &self.dense)
    }
}
