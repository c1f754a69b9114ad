//! Transition.

/// Data of a single agent/environment interaction step `(s_t, a_t, r_t, s_t+1, done_t)`.
///
/// A transition is immutable once constructed; it has no identity beyond the buffer slot
/// it is stored in, and equality is structural.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<S, A> {
    state: S,
    action: A,
    reward: f32,
    next_state: S,
    done: bool,
}

impl<S, A> Transition<S, A> {
    /// Creates a transition.
    pub fn new(state: S, action: A, reward: f32, next_state: S, done: bool) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }

    /// State prior to the agent's action.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Action submitted by the agent.
    pub fn action(&self) -> &A {
        &self.action
    }

    /// Reward yielded (or penalty incurred) by the action.
    pub fn reward(&self) -> f32 {
        self.reward
    }

    /// State after the action was submitted.
    pub fn next_state(&self) -> &S {
        &self.next_state
    }

    /// `true` if `next_state` is terminal.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Unpacks the data `(s_t, a_t, r_t, s_t+1, done_t)`.
    pub fn unpack(self) -> (S, A, f32, S, bool) {
        (
            self.state,
            self.action,
            self.reward,
            self.next_state,
            self.done,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Transition;

    #[test]
    fn test_structural_equality() {
        let a = Transition::new(vec![1.0f32, 2.0], 0usize, 1.0, vec![2.0, 3.0], false);
        let b = Transition::new(vec![1.0f32, 2.0], 0usize, 1.0, vec![2.0, 3.0], false);
        let c = Transition::new(vec![1.0f32, 2.0], 1usize, 1.0, vec![2.0, 3.0], false);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_accessors() {
        let tr = Transition::new([0i32; 2], 3u8, -0.5, [1i32; 2], true);

        assert_eq!(tr.state(), &[0, 0]);
        assert_eq!(*tr.action(), 3);
        assert_eq!(tr.reward(), -0.5);
        assert_eq!(tr.next_state(), &[1, 1]);
        assert!(tr.is_done());

        let (s, a, r, s_next, done) = tr.unpack();
        assert_eq!((s, a, r, s_next, done), ([0, 0], 3, -0.5, [1, 1], true));
    }
}
