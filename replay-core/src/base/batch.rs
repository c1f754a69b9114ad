//! Batch.
use super::Transition;

/// A batch of transitions sampled from a replay buffer.
///
/// `transitions`, `indices` and (if present) `importance` are parallel sequences.
/// The same slot may appear more than once, since sampling is done with replacement.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch<S, A> {
    transitions: Vec<Transition<S, A>>,
    indices: Vec<usize>,
    importance: Option<Vec<f32>>,
}

impl<S, A> Batch<S, A> {
    /// Creates a batch.
    ///
    /// `indices` and `importance` must have the same length as `transitions`.
    pub fn new(
        transitions: Vec<Transition<S, A>>,
        indices: Vec<usize>,
        importance: Option<Vec<f32>>,
    ) -> Self {
        debug_assert_eq!(transitions.len(), indices.len());
        debug_assert!(importance
            .as_ref()
            .map_or(true, |w| w.len() == transitions.len()));

        Self {
            transitions,
            indices,
            importance,
        }
    }

    /// Sampled transitions.
    pub fn transitions(&self) -> &[Transition<S, A>] {
        &self.transitions
    }

    /// Buffer slot indices of the sampled transitions.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Normalized importance-sampling weights in `[0, 1]`.
    ///
    /// `None` for policies that do not weight samples.
    pub fn importance(&self) -> Option<&[f32]> {
        self.importance.as_deref()
    }

    /// Returns the number of samples in the batch.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` if the batch holds no sample.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Unpacks the data `(transitions, indices, importance)`.
    pub fn unpack(self) -> (Vec<Transition<S, A>>, Vec<usize>, Option<Vec<f32>>) {
        (self.transitions, self.indices, self.importance)
    }
}
