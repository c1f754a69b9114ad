//! Configuration for [`ExperienceReplayBuffer`](super::ExperienceReplayBuffer).
//!
//! The sampling policy is selected by a closed, tagged enum, [`SamplingConfig`], so every
//! option a policy accepts is known and validated when the buffer is built.
use crate::error::ReplayBufferError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fmt,
    fs::File,
    io::{BufReader, Write},
    path::Path,
    str::FromStr,
};

/// Configuration for Prioritized Experience Replay (PER).
///
/// # Examples
///
/// ```rust
/// use replay_core::replay_buffer::PerConfig;
///
/// let config = PerConfig::default()
///     .alpha(0.7)
///     .beta_start(0.5)
///     .beta_anneal_steps(100_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct PerConfig {
    /// Exponent for prioritization. 0 gives uniform sampling, 1 fully proportional.
    pub alpha: f32,

    /// Initial value of the importance sampling exponent.
    pub beta_start: f32,

    /// Final value of the importance sampling exponent.
    pub beta_end: f32,

    /// Number of calls to `step()` after which `beta` reaches `beta_end`.
    pub beta_anneal_steps: usize,

    /// Priority floor added to every absolute TD error.
    pub epsilon: f32,

    /// Priority given to freshly pushed transitions without a priority hint.
    pub initial_priority: f32,
}

impl Default for PerConfig {
    /// - `alpha = 0.6`
    /// - `beta_start = 0.4`
    /// - `beta_end = 1.0`
    /// - `beta_anneal_steps = 200_000`
    /// - `epsilon = 1e-6`
    /// - `initial_priority = 1.0`
    fn default() -> Self {
        Self {
            alpha: 0.6,
            beta_start: 0.4,
            beta_end: 1.0,
            beta_anneal_steps: 200_000,
            epsilon: 1e-6,
            initial_priority: 1.0,
        }
    }
}

impl PerConfig {
    /// Sets the prioritization exponent `alpha`.
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the initial importance sampling exponent.
    pub fn beta_start(mut self, beta_start: f32) -> Self {
        self.beta_start = beta_start;
        self
    }

    /// Sets the final importance sampling exponent.
    pub fn beta_end(mut self, beta_end: f32) -> Self {
        self.beta_end = beta_end;
        self
    }

    /// Sets the number of steps to reach the final beta value.
    pub fn beta_anneal_steps(mut self, beta_anneal_steps: usize) -> Self {
        self.beta_anneal_steps = beta_anneal_steps;
        self
    }

    /// Sets the priority floor.
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the priority of freshly pushed transitions.
    pub fn initial_priority(mut self, initial_priority: f32) -> Self {
        self.initial_priority = initial_priority;
        self
    }

    /// Checks every hyperparameter against its documented range.
    pub fn validate(&self) -> Result<(), ReplayBufferError> {
        let invalid = |name, value, expected| {
            Err(ReplayBufferError::InvalidHyperParameter {
                name,
                value,
                expected,
            })
        };

        if !(self.alpha >= 0.0 && self.alpha.is_finite()) {
            return invalid("alpha", self.alpha, "a finite value >= 0");
        }
        if !(0.0..=1.0).contains(&self.beta_start) {
            return invalid("beta_start", self.beta_start, "a value in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.beta_end) {
            return invalid("beta_end", self.beta_end, "a value in [0, 1]");
        }
        if self.beta_start > self.beta_end {
            return invalid("beta_start", self.beta_start, "a value <= beta_end");
        }
        if !(self.epsilon >= 0.0 && self.epsilon.is_finite()) {
            return invalid("epsilon", self.epsilon, "a finite value >= 0");
        }
        if !self.initial_priority.is_finite() {
            return invalid("initial_priority", self.initial_priority, "a finite value");
        }

        Ok(())
    }
}

/// Sampling discipline of a replay buffer.
///
/// In YAML the variant is selected by the `kind` key:
///
/// ```yaml
/// kind: prioritized
/// alpha: 0.6
/// beta_start: 0.4
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SamplingConfig {
    /// Uniform draw over the populated slots.
    Uniform,

    /// Proportional prioritized experience replay.
    Prioritized(PerConfig),
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::Uniform
    }
}

impl SamplingConfig {
    /// Name of the policy, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Prioritized(_) => "prioritized",
        }
    }
}

impl FromStr for SamplingConfig {
    type Err = ReplayBufferError;

    /// Parses a policy name. `prioritized` uses the default [`PerConfig`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Self::Uniform),
            "prioritized" => Ok(Self::Prioritized(PerConfig::default())),
            _ => Err(ReplayBufferError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for SamplingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the replay buffer.
///
/// # Examples
///
/// ```rust
/// use replay_core::replay_buffer::{PerConfig, ReplayBufferConfig, SamplingConfig};
///
/// let config = ReplayBufferConfig::default()
///     .capacity(10_000)
///     .batch_size(32)
///     .seed(7)
///     .policy(SamplingConfig::Prioritized(PerConfig::default()));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct ReplayBufferConfig {
    /// Maximum number of transitions that can be stored in the buffer.
    /// When the buffer is full, new transitions replace the oldest ones.
    pub capacity: usize,

    /// Size of batches sampled when no size is given.
    pub batch_size: usize,

    /// Random seed used for sampling transitions.
    pub seed: u64,

    /// Sampling policy.
    pub policy: SamplingConfig,
}

impl Default for ReplayBufferConfig {
    /// - `capacity = 1_000_000`
    /// - `batch_size = 128`
    /// - `seed = 42`
    /// - `policy = Uniform`
    fn default() -> Self {
        Self {
            capacity: 1_000_000,
            batch_size: 128,
            seed: 42,
            policy: SamplingConfig::Uniform,
        }
    }
}

impl ReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the default batch size.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the sampling policy.
    pub fn policy(mut self, policy: SamplingConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Checks the configuration, including the hyperparameters of the policy.
    pub fn validate(&self) -> Result<(), ReplayBufferError> {
        if self.capacity == 0 {
            return Err(ReplayBufferError::InvalidCapacity(self.capacity));
        }
        if self.batch_size == 0 {
            return Err(ReplayBufferError::InvalidBatchSize(self.batch_size));
        }
        match &self.policy {
            SamplingConfig::Uniform => Ok(()),
            SamplingConfig::Prioritized(per_config) => per_config.validate(),
        }
    }

    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
