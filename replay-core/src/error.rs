//! Errors in the library.
use thiserror::Error;

/// Errors raised by replay buffers, sampling policies and their configuration.
///
/// Configuration errors (`InvalidCapacity`, `InvalidBatchSize`, `UnknownPolicy`,
/// `InvalidHyperParameter`) are raised at construction. The remaining variants are
/// usage errors raised per call; the caller may recover from them.
#[derive(Error, Debug, PartialEq)]
pub enum ReplayBufferError {
    /// Capacity must be a positive integer.
    #[error("Capacity expected to be positive integer, got {0}")]
    InvalidCapacity(usize),

    /// Batch size must be a positive integer.
    #[error("Batch size expected to be positive integer, got {0}")]
    InvalidBatchSize(usize),

    /// The policy tag is neither `uniform` nor `prioritized`.
    #[error("Invalid sampling policy provided: {0}")]
    UnknownPolicy(String),

    /// A hyperparameter of the prioritized policy lies outside its documented range.
    #[error("Invalid value of {name}: {value} (expected {expected})")]
    InvalidHyperParameter {
        /// Name of the hyperparameter.
        name: &'static str,

        /// Supplied value.
        value: f32,

        /// Human readable description of the valid range.
        expected: &'static str,
    },

    /// Sampling was requested while the buffer holds no transition.
    #[error("Cannot sample from an empty buffer")]
    EmptyBuffer,

    /// A slot index beyond the buffer capacity.
    #[error("Index {index} is out of range for capacity {capacity}")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,

        /// Capacity of the buffer.
        capacity: usize,
    },

    /// Indices and TD errors given to a priority update differ in length.
    #[error("Got {indices} indices but {td_errors} TD errors")]
    LengthMismatch {
        /// Number of indices.
        indices: usize,

        /// Number of TD errors.
        td_errors: usize,
    },
}
