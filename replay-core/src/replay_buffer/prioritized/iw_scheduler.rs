//! Scheduling the exponent of importance weight for PER.
use serde::{Deserialize, Serialize};

/// Scheduler of the exponent $\beta$ of importance weight for PER.
///
/// $\beta$ moves linearly from `beta_start` to `beta_end` over `anneal_steps` calls to
/// [`IwScheduler::step`] and stays at `beta_end` afterwards.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct IwScheduler {
    /// Initial value of $\beta$.
    pub beta_start: f32,

    /// Final value of $\beta$.
    pub beta_end: f32,

    /// Steps when beta reaches its final value.
    pub anneal_steps: usize,

    /// Current steps.
    pub n_steps: usize,
}

impl IwScheduler {
    /// Creates a scheduler.
    ///
    /// `anneal_steps` is raised to 1 if zero.
    pub fn new(beta_start: f32, beta_end: f32, anneal_steps: usize) -> Self {
        Self {
            beta_start,
            beta_end,
            anneal_steps: anneal_steps.max(1),
            n_steps: 0,
        }
    }

    /// Gets the exponent of importance sampling weight.
    pub fn beta(&self) -> f32 {
        if self.n_steps >= self.anneal_steps {
            self.beta_end
        } else {
            let t = self.n_steps as f32 / self.anneal_steps as f32;
            (1.0 - t) * self.beta_start + t * self.beta_end
        }
    }

    /// Advances the schedule by one step. No-op once fully annealed.
    pub fn step(&mut self) {
        if self.n_steps < self.anneal_steps {
            self.n_steps += 1;
        }
    }

    /// Returns `true` once `beta` has reached `beta_end`.
    pub fn is_annealed(&self) -> bool {
        self.n_steps >= self.anneal_steps
    }

    /// Rewinds the schedule to `beta_start`.
    pub fn reset(&mut self) {
        self.n_steps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::IwScheduler;

    #[test]
    fn test_linear_annealing() {
        let mut s = IwScheduler::new(0.4, 1.0, 4);
        assert_eq!(s.beta(), 0.4);

        let mut prev = s.beta();
        for _ in 0..4 {
            s.step();
            assert!(s.beta() >= prev);
            prev = s.beta();
        }
        assert_eq!(s.beta(), 1.0);
        assert!(s.is_annealed());

        s.step();
        assert_eq!(s.beta(), 1.0);
        assert_eq!(s.n_steps, 4);
    }

    #[test]
    fn test_zero_anneal_steps() {
        let mut s = IwScheduler::new(0.5, 0.9, 0);
        assert_eq!(s.anneal_steps, 1);
        s.step();
        assert_eq!(s.beta(), 0.9);
    }

    #[test]
    fn test_reset() {
        let mut s = IwScheduler::new(0.4, 1.0, 10);
        (0..5).for_each(|_| s.step());
        s.reset();
        assert_eq!(s.beta(), 0.4);
    }
}
