//! Sum tree for prioritized sampling.
//!
//! A complete binary tree stored in array form. Leaves hold per-slot priorities; every
//! internal node holds the sum of its children (for proportional sampling) and, in a
//! parallel array of the same shape, their minimum (for weight normalization).
//! Node `1` is the root, node `i` has children `2i` and `2i + 1`, and leaf `ix` lives at
//! node `n_leaves + ix`. The leaf count is padded to the next power of two.
use crate::error::ReplayBufferError;

/// Sum tree with a parallel min tree.
#[derive(Debug, Clone)]
pub struct SumTree {
    capacity: usize,
    n_leaves: usize,
    sums: Vec<f32>,
    mins: Vec<f32>,
}

impl SumTree {
    /// Creates a tree with `capacity` leaves, all of priority zero.
    pub fn new(capacity: usize) -> Result<Self, ReplayBufferError> {
        if capacity == 0 {
            return Err(ReplayBufferError::InvalidCapacity(capacity));
        }
        let n_leaves = capacity.next_power_of_two();

        Ok(Self {
            capacity,
            n_leaves,
            sums: vec![0f32; 2 * n_leaves],
            mins: vec![f32::INFINITY; 2 * n_leaves],
        })
    }

    /// Number of addressable leaves.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sum of all priorities.
    pub fn total(&self) -> f32 {
        self.sums[1]
    }

    /// Minimum priority among the leaves written so far.
    ///
    /// `f32::INFINITY` if no leaf has been written.
    pub fn minimum(&self) -> f32 {
        self.mins[1]
    }

    /// Priority stored at leaf `ix`.
    pub fn get(&self, ix: usize) -> f32 {
        debug_assert!(ix < self.capacity);
        self.sums[self.n_leaves + ix]
    }

    /// Sets the priority of leaf `ix` and refreshes its ancestors in O(log N).
    ///
    /// # Panics
    ///
    /// Panics if `ix >= capacity`.
    pub fn update(&mut self, ix: usize, p: f32) {
        assert!(
            ix < self.capacity,
            "leaf {} out of range for capacity {}",
            ix,
            self.capacity
        );

        let mut node = self.n_leaves + ix;
        self.sums[node] = p;
        self.mins[node] = p;

        node /= 2;
        while node >= 1 {
            let (left, right) = (2 * node, 2 * node + 1);
            self.sums[node] = self.sums[left] + self.sums[right];
            self.mins[node] = self.mins[left].min(self.mins[right]);
            node /= 2;
        }
    }

    /// Returns the leaf whose cumulative prefix sum first exceeds `mass`.
    ///
    /// For priorities `[1, 2, 3, 4]`, masses in `[0, 1)` map to leaf 0, `[1, 3)` to leaf 1,
    /// `[3, 6)` to leaf 2 and `[6, 10)` to leaf 3. The descent never enters a subtree of
    /// zero mass, so a mass at or beyond the total resolves to the last leaf with positive
    /// priority rather than to a zero-priority or padding leaf.
    pub fn find_prefix_sum_index(&self, mass: f32) -> usize {
        let mut mass = mass;
        let mut node = 1;

        while node < self.n_leaves {
            let left = 2 * node;
            if self.sums[left] > mass || self.sums[left + 1] <= 0.0 {
                node = left;
            } else {
                mass -= self.sums[left];
                node = left + 1;
            }
        }

        node - self.n_leaves
    }

    /// Sets every leaf back to the empty-tree state.
    pub fn reset(&mut self) {
        self.sums.iter_mut().for_each(|v| *v = 0.0);
        self.mins.iter_mut().for_each(|v| *v = f32::INFINITY);
    }
}
