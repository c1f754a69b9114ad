//! Experience replay buffer.
use super::{PrioritizedSampling, ReplayBufferConfig, SamplingConfig, UniformSampling};
use crate::{
    base::{Batch, ExperienceBufferBase, ReplayBufferBase, SamplingPolicy, Transition},
    error::ReplayBufferError,
};
use log::{debug, info, trace};
use std::{fmt, slice::Iter};

/// Circular buffer of bounded size holding the transitions most recently observed by an
/// agent.
///
/// Slots are written in order; once the buffer is full, each push overwrites the oldest
/// slot. Which slots a sample call returns is decided by the owned [`SamplingPolicy`],
/// chosen from [`SamplingConfig`] when the buffer is built.
///
/// # Examples
///
/// ```rust
/// use replay_core::replay_buffer::{ExperienceReplayBuffer, ReplayBufferConfig};
///
/// let config = ReplayBufferConfig::default().capacity(100).batch_size(4);
/// let mut buffer = ExperienceReplayBuffer::<Vec<f32>, usize>::new(&config).unwrap();
///
/// for i in 0..8 {
///     buffer.push(vec![i as f32], i % 2, 1.0, vec![i as f32 + 1.0], false);
/// }
/// assert!(buffer.is_ready_for_sampling());
///
/// let batch = buffer.sample(None).unwrap();
/// assert_eq!(batch.len(), 4);
/// assert!(batch.importance().is_none());
/// ```
pub struct ExperienceReplayBuffer<S, A> {
    capacity: usize,
    batch_size: usize,
    slots: Vec<Option<Transition<S, A>>>,
    head: usize,
    size: usize,
    policy: Box<dyn SamplingPolicy>,
}

impl<S, A> ExperienceReplayBuffer<S, A>
where
    S: Clone,
    A: Clone,
{
    /// Builds a buffer from the given configuration.
    ///
    /// Fails if the configuration does not pass [`ReplayBufferConfig::validate`].
    pub fn new(config: &ReplayBufferConfig) -> Result<Self, ReplayBufferError> {
        config.validate()?;
        let capacity = config.capacity;
        let mut policy: Box<dyn SamplingPolicy> = match &config.policy {
            SamplingConfig::Uniform => Box::new(UniformSampling::new(capacity, config.seed)?),
            SamplingConfig::Prioritized(per_config) => Box::new(PrioritizedSampling::new(
                capacity,
                per_config,
                config.seed,
            )?),
        };
        policy.reset(capacity)?;

        info!(
            "Construct replay buffer with capacity = {}, batch_size = {}, policy = {}",
            capacity, config.batch_size, config.policy
        );

        Ok(Self {
            capacity,
            batch_size: config.batch_size,
            slots: vec![None; capacity],
            head: 0,
            size: 0,
            policy,
        })
    }

    /// Maximum number of transitions the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size of batches sampled when no size is given.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no transition has been pushed since the last clear.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if the buffer holds at least `batch_size` transitions.
    pub fn is_ready_for_sampling(&self) -> bool {
        self.size >= self.batch_size
    }

    /// Pushes a transition built from its fields; returns the slot index written.
    pub fn push(
        &mut self,
        state: S,
        action: A,
        reward: f32,
        next_state: S,
        done: bool,
    ) -> usize {
        self.push_transition(Transition::new(state, action, reward, next_state, done))
    }

    /// Pushes a transition; returns the slot index written.
    ///
    /// The policy assigns its default priority to the new slot.
    pub fn push_transition(&mut self, tr: Transition<S, A>) -> usize {
        self.write(tr, None)
    }

    /// Pushes a transition with a priority hint (e.g. an initial TD error); returns the
    /// slot index written.
    pub fn push_with_priority(&mut self, tr: Transition<S, A>, priority: f32) -> usize {
        self.write(tr, Some(priority))
    }

    fn write(&mut self, tr: Transition<S, A>, priority: Option<f32>) -> usize {
        let ix = self.head;
        trace!("ReplayBuffer::push() at slot {}", ix);

        self.slots[ix] = Some(tr);
        self.head = (self.head + 1) % self.capacity;
        self.size = (self.size + 1).min(self.capacity);
        self.policy.on_add(ix, priority);

        ix
    }

    /// Samples a batch of transitions, with replacement.
    ///
    /// `batch_size` defaults to the configured batch size. Fails on an empty buffer;
    /// callers are expected to gate on [`is_ready_for_sampling`](Self::is_ready_for_sampling).
    pub fn sample(
        &mut self,
        batch_size: Option<usize>,
    ) -> Result<Batch<S, A>, ReplayBufferError> {
        if self.size == 0 {
            return Err(ReplayBufferError::EmptyBuffer);
        }
        let batch_size = batch_size.unwrap_or(self.batch_size);
        if batch_size == 0 {
            return Err(ReplayBufferError::InvalidBatchSize(batch_size));
        }

        let (ixs, weight) = self.policy.sample(self.size, batch_size)?;
        let transitions = ixs
            .iter()
            .map(|&ix| {
                self.slots.get(ix).cloned().flatten().ok_or(
                    ReplayBufferError::IndexOutOfRange {
                        index: ix,
                        capacity: self.capacity,
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Batch::new(transitions, ixs, weight))
    }

    /// Forwards TD errors of a learning step to the policy.
    ///
    /// No-op for uniform sampling.
    pub fn update_priorities(
        &mut self,
        indices: &[usize],
        td_errors: &[f32],
    ) -> Result<(), ReplayBufferError> {
        self.policy.update_priorities(indices, td_errors)
    }

    /// Advances the schedules of the policy by one learner step.
    pub fn step(&mut self) {
        self.policy.step();
    }

    /// Removes every transition and resets the policy at the same capacity.
    pub fn clear(&mut self) -> Result<(), ReplayBufferError> {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.size = 0;
        self.policy.reset(self.capacity)?;
        debug!("Cleared replay buffer with capacity = {}", self.capacity);
        Ok(())
    }

    /// Removes every transition and reallocates slots and policy at a new capacity.
    pub fn resize(&mut self, capacity: usize) -> Result<(), ReplayBufferError> {
        if capacity == 0 {
            return Err(ReplayBufferError::InvalidCapacity(capacity));
        }
        self.policy.reset(capacity)?;
        self.slots = vec![None; capacity];
        self.capacity = capacity;
        self.head = 0;
        self.size = 0;
        debug!("Resized replay buffer to capacity = {}", capacity);
        Ok(())
    }

    /// Transition stored at slot `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Transition<S, A>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Up to `n` most recently pushed transitions, newest first.
    pub fn recent(&self, n: usize) -> Vec<&Transition<S, A>> {
        (1..=n.min(self.size))
            .filter_map(|k| self.get((self.head + self.capacity - k) % self.capacity))
            .collect()
    }

    /// Iterates over the raw slot array, empty slots included.
    pub fn iter(&self) -> Iter<'_, Option<Transition<S, A>>> {
        self.slots.iter()
    }
}

impl<'a, S, A> IntoIterator for &'a ExperienceReplayBuffer<S, A> {
    type Item = &'a Option<Transition<S, A>>;
    type IntoIter = Iter<'a, Option<Transition<S, A>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

impl<S, A> fmt::Display for ExperienceReplayBuffer<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExperienceReplayBuffer(size = {}, capacity = {})",
            self.size, self.capacity
        )
    }
}

impl<S, A> ExperienceBufferBase for ExperienceReplayBuffer<S, A>
where
    S: Clone,
    A: Clone,
{
    type Item = Transition<S, A>;

    fn push(&mut self, tr: Self::Item) -> anyhow::Result<usize> {
        Ok(self.push_transition(tr))
    }

    fn len(&self) -> usize {
        self.size
    }
}

impl<S, A> ReplayBufferBase for ExperienceReplayBuffer<S, A>
where
    S: Clone,
    A: Clone,
{
    type Config = ReplayBufferConfig;
    type Batch = Batch<S, A>;

    fn build(config: &Self::Config) -> anyhow::Result<Self> {
        Ok(Self::new(config)?)
    }

    fn batch(&mut self, size: usize) -> anyhow::Result<Self::Batch> {
        Ok(self.sample(Some(size))?)
    }

    fn update_priority(&mut self, ixs: &[usize], td_errs: &[f32]) -> anyhow::Result<()> {
        Ok(self.update_priorities(ixs, td_errs)?)
    }

    fn step(&mut self) {
        self.policy.step();
    }

    fn is_ready(&self) -> bool {
        self.is_ready_for_sampling()
    }
}
