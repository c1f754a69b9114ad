#![warn(missing_docs)]
//! Experience replay for off-policy reinforcement learning.
//!
//! A bounded, circular store of agent/environment interaction records ([`Transition`]) with
//! interchangeable sampling disciplines behind one contract, [`SamplingPolicy`]:
//! uniform sampling and proportional prioritized experience replay (PER).
//!
//! Learners push transitions, sample [`Batch`]es, report TD errors back with
//! `update_priorities` and call `step` once per optimization step to anneal the
//! importance-sampling exponent. The buffer is meant to be owned by a single training
//! loop; concurrent producers have to serialize their calls externally.
pub mod error;
pub mod replay_buffer;

mod base;
pub use base::{
    Batch, ExperienceBufferBase, ReplayBufferBase, SampledIndices, SamplingPolicy, Transition,
};
pub use error::ReplayBufferError;
