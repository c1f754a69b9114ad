//! Replay buffer interface for reinforcement learning.
//!
//! Learners are written against these traits instead of a concrete buffer, so that the
//! storage and the sampling discipline can be swapped without touching the update rule.
use anyhow::Result;

/// Interface for buffers that store experiences from environments.
///
/// # Examples
///
/// ```ignore
/// struct SimpleBuffer<T> {
///     items: Vec<T>,
/// }
///
/// impl<T> ExperienceBufferBase for SimpleBuffer<T> {
///     type Item = T;
///
///     fn push(&mut self, tr: T) -> Result<usize> {
///         self.items.push(tr);
///         Ok(self.items.len() - 1)
///     }
///
///     fn len(&self) -> usize {
///         self.items.len()
///     }
/// }
/// ```
pub trait ExperienceBufferBase {
    /// The type of items stored in the buffer.
    type Item;

    /// Pushes a new experience into the buffer.
    ///
    /// Returns the physical slot index written.
    fn push(&mut self, tr: Self::Item) -> Result<usize>;

    /// Returns the current number of experiences in the buffer.
    fn len(&self) -> usize;
}

/// Interface for replay buffers that generate batches for training.
pub trait ReplayBufferBase {
    /// Configuration parameters for the replay buffer.
    type Config: Clone;

    /// The type of batch generated for training.
    type Batch;

    /// Builds a new replay buffer from the given configuration.
    ///
    /// Fails if the configuration is invalid.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Samples a batch of `size` experiences.
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;

    /// Updates the priorities of sampled experiences from their TD errors.
    ///
    /// Buffers without prioritization ignore the call.
    fn update_priority(&mut self, ixs: &[usize], td_errs: &[f32]) -> Result<()>;

    /// Advances schedules kept by the buffer by one optimization step.
    fn step(&mut self);

    /// Returns `true` if the buffer holds enough experiences for a default-sized batch.
    fn is_ready(&self) -> bool;
}
