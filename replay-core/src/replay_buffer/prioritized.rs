//! Proportional Prioritized Experience Replay (Schaul et al., 2016).
//!
//! * The priority of slot `i` is $p_i = (|\delta_i| + \epsilon)^\alpha$, stored already
//!   exponentiated in a [`SumTree`].
//! * Sampling probability is $P(i) = p_i / \sum_k p_k$.
//! * Importance weight is $w_i = (N P(i))^{-\beta}$, normalized by the largest possible
//!   weight so that every weight lies in `[0, 1]`.
//! * $\beta$ is annealed from `beta_start` to `beta_end` by [`IwScheduler`].
mod iw_scheduler;
mod sum_tree;
use super::config::PerConfig;
use crate::{
    base::{SampledIndices, SamplingPolicy},
    error::ReplayBufferError,
};
pub use iw_scheduler::IwScheduler;
use log::{debug, trace, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
pub use sum_tree::SumTree;

/// Prioritized sampling policy.
pub struct PrioritizedSampling {
    config: PerConfig,
    sum_tree: SumTree,
    priorities: Vec<f32>,
    iw_scheduler: IwScheduler,
    rng: StdRng,
}

impl PrioritizedSampling {
    /// Creates a prioritized policy for a buffer of the given capacity.
    ///
    /// Fails on zero capacity or on hyperparameters out of range.
    pub fn new(
        capacity: usize,
        config: &PerConfig,
        seed: u64,
    ) -> Result<Self, ReplayBufferError> {
        config.validate()?;

        Ok(Self {
            config: config.clone(),
            sum_tree: SumTree::new(capacity)?,
            priorities: vec![0f32; capacity],
            iw_scheduler: IwScheduler::new(
                config.beta_start,
                config.beta_end,
                config.beta_anneal_steps,
            ),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Hyperparameters of the policy.
    pub fn config(&self) -> &PerConfig {
        &self.config
    }

    /// Priority exponent.
    pub fn alpha(&self) -> f32 {
        self.config.alpha
    }

    /// Current importance sampling exponent.
    pub fn beta(&self) -> f32 {
        self.iw_scheduler.beta()
    }

    /// Normalized priority of slot `ix`, or `None` beyond capacity.
    pub fn priority(&self, ix: usize) -> Option<f32> {
        self.priorities.get(ix).copied()
    }

    /// Total priority mass.
    pub fn total_priority(&self) -> f32 {
        self.sum_tree.total()
    }

    /// The underlying sum tree.
    pub fn sum_tree(&self) -> &SumTree {
        &self.sum_tree
    }

    fn normalize(&self, p: f32) -> f32 {
        (p.abs() + self.config.epsilon).powf(self.config.alpha)
    }

    fn set_priority(&mut self, ix: usize, p: f32) {
        self.priorities[ix] = p;
        self.sum_tree.update(ix, p);
    }

    /// Draws one index per equal-width segment of `[0, total)`.
    fn sample_stratified(
        &mut self,
        valid_range: usize,
        batch_size: usize,
        total: f32,
    ) -> Vec<usize> {
        let segment = total / batch_size as f32;

        (0..batch_size)
            .map(|i| {
                let mass = segment * (i as f32 + self.rng.gen::<f32>());
                let ix = self.sum_tree.find_prefix_sum_index(mass);
                if ix < valid_range {
                    ix
                } else {
                    // Warm-up: the tree spans the full capacity but only `valid_range`
                    // slots are populated.
                    let ix_ = self.rng.gen_range(0..valid_range);
                    trace!("Resolved leaf {} >= {}, redrawn as {}", ix, valid_range, ix_);
                    ix_
                }
            })
            .collect()
    }

    fn importance_weights(&self, ixs: &[usize], valid_range: usize, total: f32) -> Vec<f32> {
        let beta = self.iw_scheduler.beta();
        let n = valid_range as f32;
        let w = |p: f32| (n * (p / total)).powf(-beta);

        let min_p = self.sum_tree.minimum().max(f32::MIN_POSITIVE);
        let w_max = w(min_p);

        ixs.iter()
            .map(|&ix| (w(self.priorities[ix]) / w_max).min(1.0))
            .collect()
    }
}

impl SamplingPolicy for PrioritizedSampling {
    fn on_add(&mut self, index: usize, priority: Option<f32>) {
        let p = self.normalize(priority.unwrap_or(self.config.initial_priority));
        self.set_priority(index, p);
    }

    fn reset(&mut self, capacity: usize) -> Result<(), ReplayBufferError> {
        if capacity == self.sum_tree.capacity() {
            self.sum_tree.reset();
            self.priorities.iter_mut().for_each(|p| *p = 0.0);
        } else {
            self.sum_tree = SumTree::new(capacity)?;
            self.priorities = vec![0f32; capacity];
        }
        self.iw_scheduler.reset();
        debug!("Reset prioritized sampling with capacity = {}", capacity);
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
        let total = self.sum_tree.total();

        if total <= 0.0 || total.is_nan() {
            warn!(
                "Total priority is {}; falling back to uniform sampling",
                total
            );
            let ixs = (0..batch_size)
                .map(|_| self.rng.gen_range(0..valid_range))
                .collect();
            return Ok((ixs, Some(vec![1.0; batch_size])));
        }

        let ixs = self.sample_stratified(valid_range, batch_size, total);
        let ws = self.importance_weights(&ixs, valid_range, total);

        Ok((ixs, Some(ws)))
    }

    fn step(&mut self) {
        self.iw_scheduler.step();
    }

    fn update_priorities(
        &mut self,
        indices: &[usize],
        td_errors: &[f32],
    ) -> Result<(), ReplayBufferError> {
        if indices.len() != td_errors.len() {
            return Err(ReplayBufferError::LengthMismatch {
                indices: indices.len(),
                td_errors: td_errors.len(),
            });
        }
        let capacity = self.sum_tree.capacity();
        if let Some(&index) = indices.iter().find(|&&ix| ix >= capacity) {
            return Err(ReplayBufferError::IndexOutOfRange { index, capacity });
        }

        for (&ix, &td_err) in indices.iter().zip(td_errors.iter()) {
            let p = self.normalize(td_err);
            self.set_priority(ix, p);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PerConfig, PrioritizedSampling};
    use crate::{base::SamplingPolicy, error::ReplayBufferError};
    use test_log::test;

    fn policy(capacity: usize, config: PerConfig) -> PrioritizedSampling {
        PrioritizedSampling::new(capacity, &config, 42).unwrap()
    }

    #[test]
    fn test_on_add_uses_initial_priority() {
        let mut p = policy(4, PerConfig::default().alpha(1.0).epsilon(0.0));
        p.on_add(0, None);
        p.on_add(1, Some(-3.0));

        assert_eq!(p.priority(0), Some(1.0));
        assert_eq!(p.priority(1), Some(3.0));
        assert_eq!(p.total_priority(), 4.0);
        assert_eq!(p.sum_tree().minimum(), 1.0);
    }

    #[test]
    fn test_priority_exponent() {
        let mut p = policy(2, PerConfig::default().alpha(0.5).epsilon(0.0));
        p.on_add(0, Some(4.0));
        assert!((p.priority(0).unwrap() - 2.0).abs() < 1e-6);

        let mut p = policy(2, PerConfig::default().alpha(0.0));
        p.on_add(0, Some(123.0));
        assert_eq!(p.priority(0), Some(1.0));
    }

    #[test]
    fn test_sample_is_proportional() {
        let mut p = policy(4, PerConfig::default().alpha(1.0).epsilon(0.0));
        for (ix, &td) in [1f32, 2., 3., 4.].iter().enumerate() {
            p.on_add(ix, Some(td));
        }
        let n = 20_000;
        let (ixs, ws) = p.sample(4, n).unwrap();
        let ws = ws.unwrap();

        assert_eq!(ixs.len(), n);
        assert_eq!(ws.len(), n);
        for ix in 0..4 {
            let freq = ixs.iter().filter(|&&i| i == ix).count() as f32 / n as f32;
            let expected = (ix + 1) as f32 / 10.0;
            assert!((freq - expected).abs() < 0.02, "ix = {}, freq = {}", ix, freq);
        }
    }

    #[test]
    fn test_weights_are_normalized() {
        let mut p = policy(8, PerConfig::default().alpha(1.0).epsilon(0.0).beta_start(0.5));
        for (ix, &td) in [1f32, 5.0, 3.0, 2.0, 4.0].iter().enumerate() {
            p.on_add(ix, Some(td));
        }
        // total = 15, so the first of 15 segments covers exactly the mass of slot 0
        let (ixs, ws) = p.sample(5, 15).unwrap();
        let ws = ws.unwrap();

        assert!(ixs.iter().all(|&ix| ix < 5));
        assert!(ws.iter().all(|&w| (0.0..=1.0).contains(&w)));

        // the largest weight goes to the least likely slot
        assert_eq!(ixs[0], 0);
        assert_eq!(ws[0], 1.0);
        ixs.iter()
            .zip(ws.iter())
            .filter(|&(&ix, _)| ix != 0)
            .for_each(|(_, &w)| assert!(w < 1.0));
    }

    #[test]
    fn test_minimum_priority_sample_has_unit_weight() {
        let mut p = policy(2, PerConfig::default().beta_start(1.0));
        p.on_add(0, Some(1.0));
        p.on_add(1, Some(1.0));
        let (_, ws) = p.sample(2, 16).unwrap();
        assert!(ws.unwrap().iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_zero_priority_slot_is_never_sampled() {
        let mut p = policy(4, PerConfig::default().alpha(1.0).epsilon(0.0));
        for (ix, &td) in [1f32, 1., 1., 0.].iter().enumerate() {
            p.on_add(ix, Some(td));
        }

        for _ in 0..100 {
            let (ixs, _) = p.sample(4, 4096).unwrap();
            assert!(ixs.iter().all(|&ix| ix != 3));
        }
    }

    #[test]
    #[should_panic]
    fn test_on_add_beyond_capacity() {
        let mut p = policy(4, PerConfig::default());
        p.on_add(4, None);
    }

    #[test]
    fn test_warm_up_indices_stay_in_range() {
        // Every populated slot has tiny mass compared to the stale leaves beyond the
        // valid range, so most descents land outside and are redrawn uniformly.
        let mut p = policy(8, PerConfig::default());
        for ix in 0..8 {
            p.on_add(ix, Some(if ix < 2 { 1e-3 } else { 100.0 }));
        }
        let (ixs, ws) = p.sample(2, 64).unwrap();

        assert!(ixs.iter().all(|&ix| ix < 2));
        assert!(ws.unwrap().iter().all(|&w| (0.0..=1.0).contains(&w)));
    }

    #[test]
    fn test_degenerate_mass_falls_back_to_uniform() {
        let mut p = policy(4, PerConfig::default().epsilon(0.0));
        p.on_add(0, Some(0.0));
        p.on_add(1, Some(0.0));
        assert_eq!(p.total_priority(), 0.0);

        let (ixs, ws) = p.sample(2, 10).unwrap();
        assert_eq!(ixs.len(), 10);
        assert!(ixs.iter().all(|&ix| ix < 2));
        assert_eq!(ws, Some(vec![1.0; 10]));
    }

    #[test]
    fn test_extreme_priorities() {
        let mut p = policy(10, PerConfig::default().epsilon(1e-8));
        p.on_add(0, Some(1e6));
        p.on_add(1, Some(1e-6));
        let (ixs, ws) = p.sample(2, 10).unwrap();
        let ws = ws.unwrap();

        assert_eq!(ixs.len(), 10);
        assert_eq!(ws.len(), 10);
        assert!(ws.iter().all(|&w| (0.0..=1.0).contains(&w)));
    }

    #[test]
    fn test_update_priorities_increases_mass() {
        let mut p = policy(4, PerConfig::default());
        (0..4).for_each(|ix| p.on_add(ix, None));
        let before = p.total_priority();

        p.update_priorities(&[0, 2], &[3.0, -5.0]).unwrap();
        assert!(p.total_priority() > before);
        assert!(p.priority(2).unwrap() > p.priority(0).unwrap());
    }

    #[test]
    fn test_update_priorities_errors() {
        let mut p = policy(4, PerConfig::default());
        assert_eq!(
            p.update_priorities(&[0, 1], &[1.0]),
            Err(ReplayBufferError::LengthMismatch {
                indices: 2,
                td_errors: 1
            })
        );
        assert_eq!(
            p.update_priorities(&[4], &[1.0]),
            Err(ReplayBufferError::IndexOutOfRange {
                index: 4,
                capacity: 4
            })
        );
        assert_eq!(p.total_priority(), 0.0);
    }

    #[test]
    fn test_beta_annealing() {
        let mut p = policy(4, PerConfig::default().beta_anneal_steps(10));
        let mut prev = p.beta();
        assert_eq!(prev, 0.4);

        for _ in 0..10 {
            p.step();
            assert!(p.beta() >= prev);
            prev = p.beta();
        }
        assert_eq!(p.beta(), 1.0);

        (0..5).for_each(|_| p.step());
        assert_eq!(p.beta(), 1.0);
    }

    #[test]
    fn test_reset_keeps_hyperparameters() {
        let config = PerConfig::default().alpha(0.8).beta_anneal_steps(2);
        let mut p = policy(4, config.clone());
        (0..4).for_each(|ix| p.on_add(ix, Some(2.0)));
        p.step();

        p.reset(4).unwrap();
        assert_eq!(p.total_priority(), 0.0);
        assert_eq!(p.sum_tree().minimum(), f32::INFINITY);
        assert_eq!(p.beta(), 0.4);
        assert_eq!(p.config(), &config);

        p.reset(16).unwrap();
        assert_eq!(p.sum_tree().capacity(), 16);
        assert_eq!(p.priority(15), Some(0.0));
        assert_eq!(p.reset(0), Err(ReplayBufferError::InvalidCapacity(0)));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(PrioritizedSampling::new(0, &PerConfig::default(), 0).is_err());
        assert!(PrioritizedSampling::new(4, &PerConfig::default().beta_end(2.0), 0).is_err());
    }

    #[test]
    fn test_empty_range() {
        let mut p = policy(4, PerConfig::default());
        assert_eq!(p.sample(0, 4), Err(ReplayBufferError::EmptyBuffer));
    }
}
