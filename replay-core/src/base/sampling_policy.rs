//! Sampling policy interface.
use crate::error::ReplayBufferError;

/// Slot indices drawn by a [`SamplingPolicy`] together with optional importance weights.
pub type SampledIndices = (Vec<usize>, Option<Vec<f32>>);

/// Decides which buffer slots are returned by a sample call.
///
/// A replay buffer owns exactly one policy and notifies it of every write. Policies that
/// keep no per-slot metadata implement most of these methods as no-ops.
///
/// The `Send` bound allows a buffer to be moved into a dedicated owner thread; calls on
/// a policy are never concurrent.
pub trait SamplingPolicy: Send {
    /// Called once per buffer write at slot `index`.
    ///
    /// `priority` is an optional hint (e.g. an initial TD error). Without it the policy
    /// falls back to its own default.
    ///
    /// # Panics
    ///
    /// Policies that keep per-slot metadata panic if `index` is not below the capacity
    /// passed to the last [`reset`](SamplingPolicy::reset). The buffer only passes slots it
    /// has just written.
    fn on_add(&mut self, index: usize, priority: Option<f32>);

    /// (Re)allocates internal structures sized to `capacity`.
    ///
    /// Invoked at buffer construction and again whenever the buffer is cleared. Calling it
    /// twice in a row is equivalent to calling it once.
    fn reset(&mut self, capacity: usize) -> Result<(), ReplayBufferError>;

    /// Draws exactly `batch_size` slot indices from `[0, valid_range)`, with replacement.
    ///
    /// Fails with [`ReplayBufferError::EmptyBuffer`] if `valid_range == 0`.
    fn sample(
        &mut self,
        valid_range: usize,
        batch_size: usize,
    ) -> Result<SampledIndices, ReplayBufferError>;

    /// Advances internal schedules by one learner iteration.
    fn step(&mut self);

    /// Refreshes priority metadata from the TD errors of a learning step.
    ///
    /// `indices[i]` is the slot whose TD error is `td_errors[i]`.
    fn update_priorities(
        &mut self,
        indices: &[usize],
        td_errors: &[f32],
    ) -> Result<(), ReplayBufferError>;
}
