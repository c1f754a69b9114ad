//! Core abstractions shared by replay buffers and the learners consuming them.
mod batch;
mod replay_buffer;
mod sampling_policy;
mod transition;
pub use batch::Batch;
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
pub use sampling_policy::{SampledIndices, SamplingPolicy};
pub use transition::Transition;
