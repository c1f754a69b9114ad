//! Experience replay buffer with pluggable sampling policies.
//!
//! # Key Components
//!
//! - [`ExperienceReplayBuffer`]: fixed-capacity circular store of transitions
//! - [`UniformSampling`]: uniform draw over the populated slots
//! - [`PrioritizedSampling`]: proportional PER backed by a [`SumTree`]
//! - [`ReplayBufferConfig`], [`SamplingConfig`], [`PerConfig`]: configuration
//!
//! # Examples
//!
//! ```rust
//! use replay_core::replay_buffer::{
//!     ExperienceReplayBuffer, PerConfig, ReplayBufferConfig, SamplingConfig,
//! };
//!
//! let config = ReplayBufferConfig::default()
//!     .capacity(1000)
//!     .batch_size(2)
//!     .policy(SamplingConfig::Prioritized(PerConfig::default()));
//! let mut buffer = ExperienceReplayBuffer::<[f32; 4], usize>::new(&config).unwrap();
//!
//! buffer.push([0.0; 4], 1, 1.0, [0.1; 4], false);
//! buffer.push([0.1; 4], 0, 0.0, [0.2; 4], true);
//!
//! let batch = buffer.sample(None).unwrap();
//! let td_errors = vec![0.5; batch.len()];
//! buffer.update_priorities(batch.indices(), &td_errors).unwrap();
//! buffer.step();
//! ```
mod base;
mod config;
mod prioritized;
mod uniform;
pub use base::ExperienceReplayBuffer;
pub use config::{PerConfig, ReplayBufferConfig, SamplingConfig};
pub use prioritized::{IwScheduler, PrioritizedSampling, SumTree};
pub use uniform::UniformSampling;
