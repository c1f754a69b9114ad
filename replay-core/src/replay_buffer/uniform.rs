//! Uniform sampling.
use crate::{
    base::{SampledIndices, SamplingPolicy},
    error::ReplayBufferError,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Uniform (vanilla) sampling policy; draws slots independently and returns no weights.
pub struct UniformSampling {
    capacity: usize,
    rng: StdRng,
}

impl UniformSampling {
    /// Creates a uniform policy for a buffer of the given capacity.
    pub fn new(capacity: usize, seed: u64) -> Result<Self, ReplayBufferError> {
        if capacity == 0 {
            return Err(ReplayBufferError::InvalidCapacity(capacity));
        }

        Ok(Self {
            capacity,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Capacity of the buffer this policy serves.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl SamplingPolicy for UniformSampling {
    fn on_add(&mut self, _index: usize, _priority: Option<f32>) {}

    fn reset(&mut self, capacity: usize) -> Result<(), ReplayBufferError> {
        if capacity == 0 {
            return Err(ReplayBufferError::InvalidCapacity(capacity));
        }
        self.capacity = capacity;
        Ok(())
    }

    fn sample(
        &mut self,
        valid_range: usize,
        batch_size: usize,
    ) -> Result<SampledIndices, ReplayBufferError> {
        if valid_range == 0 {
            return Err(ReplayBufferError::EmptyBuffer);
        }
        let ixs = (0..batch_size)
            .map(|_| self.rng.gen_range(0..valid_range))
            .collect::<Vec<_>>();

        Ok((ixs, None))
    }

    fn step(&mut self) {}

    fn update_priorities(
        &mut self,
        _indices: &[usize],
        _td_errors: &[f32],
    ) -> Result<(), ReplayBufferError> {
        Ok(())
    }
}
