// Vectorized environments: one independent instance per worker rank, stepped in the current thread.

use crate::core::{Env, Info, RenderFrame, Result, Step};

/// Runs N copies of an environment in the current thread.
///
/// - Construct with `SyncVectorEnv::new(n, |rank| WobEnv::new(name, rank, seed, sink))`
/// - Step with a batch of actions: `step_all(actions)`
/// - Reset all envs: `reset_all(None)`
///
/// Each copy owns its own diagnostics accumulator; nothing is shared between ranks.
pub struct SyncVectorEnv<E: Env> {
    envs: Vec<E>,
}

impl<E: Env> SyncVectorEnv<E> {
    /// Create N copies using the provided factory, called with ranks `0..n`.
    pub fn new<F>(n: usize, mut factory: F) -> Result<Self>
    where
        F: FnMut(u64) -> Result<E>,
    {
        let envs = (0..n as u64).map(|rank| factory(rank)).collect::<Result<Vec<_>>>()?;
        Ok(Self { envs })
    }

    /// Number of contained environments.
    pub fn len(&self) -> usize { self.envs.len() }
    /// Whether there are no environments.
    pub fn is_empty(&self) -> bool { self.envs.is_empty() }

    /// Reset all environments. If `base_seed` is provided, each env gets base_seed + i.
    pub fn reset_all(&mut self, base_seed: Option<u64>) -> Result<Vec<(E::Obs, Info)>> {
        self.envs
            .iter_mut()
            .enumerate()
            .map(|(i, e)| e.reset(base_seed.map(|s| s.wrapping_add(i as u64))))
            .collect()
    }

    /// Step all environments with a batch of actions.
    /// The length of `actions` must equal `self.len()`.
    pub fn step_all(&mut self, actions: Vec<E::Act>) -> Result<Vec<Step<E::Obs>>> {
        if actions.len() != self.envs.len() {
            return Err(crate::core::GymError::InvalidAction(format!(
                "got {} actions for {} environments",
                actions.len(),
                self.envs.len()
            )));
        }
        self.envs
            .iter_mut()
            .zip(actions)
            .map(|(e, a)| e.step(a))
            .collect()
    }

    /// Render all environments; returns a vector of optional frames (one per env).
    pub fn render_all(&self) -> Vec<Option<RenderFrame>> {
        self.envs.iter().map(|e| e.render()).collect()
    }

    /// Close all environments.
    pub fn close_all(&mut self) {
        for e in &mut self.envs { e.close(); }
    }

    /// Get immutable access to underlying envs (advanced usage).
    pub fn envs(&self) -> &[E] { &self.envs }
    /// Get mutable access to underlying envs (advanced usage).
    pub fn envs_mut(&mut self) -> &mut [E] { &mut self.envs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GymError;
    use crate::spaces::{ActionSpace, ArrayBoxSpace, Discrete};

    struct DummyEnv {
        rank: u64,
        s: i32,
        action_space: ActionSpace,
        observation_space: ArrayBoxSpace,
    }

    impl DummyEnv {
        fn new(rank: u64) -> Result<Self> {
            Ok(Self {
                rank,
                s: 0,
                action_space: Discrete::new(4).into(),
                observation_space: ArrayBoxSpace::uniform(&[1], 0.0, 10.0)?,
            })
        }
    }

    impl Env for DummyEnv {
        type Obs = i32;
        type Act = i32;
        fn reset(&mut self, _seed: Option<u64>) -> Result<(Self::Obs, Info)> { self.s = 0; Ok((self.s, Info::new())) }
        fn step(&mut self, a: Self::Act) -> Result<Step<Self::Obs>> {
            if a < 0 {
                return Err(GymError::InvalidAction(format!("{a}")));
            }
            self.s += a;
            Ok(Step::new(self.s, 1.0, self.s >= 5, false, Info::new()))
        }
        fn action_space(&self) -> &ActionSpace { &self.action_space }
        fn observation_space(&self) -> &ArrayBoxSpace { &self.observation_space }
        fn render(&self) -> Option<RenderFrame> { Some(RenderFrame::Text(format!("s={}", self.s))) }
    }

    #[test]
    fn vector_env_runs_batch() {
        let mut v = SyncVectorEnv::new(3, DummyEnv::new).unwrap();
        assert_eq!(v.envs().iter().map(|e| e.rank).collect::<Vec<_>>(), vec![0, 1, 2]);
        v.reset_all(Some(123)).unwrap();
        let steps = v.step_all(vec![1, 2, 3]).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].observation, 1);
        assert_eq!(steps[1].observation, 2);
        assert_eq!(steps[2].observation, 3);
        let frames = v.render_all();
        assert_eq!(frames.len(), 3);
        assert!(matches!(frames[0], Some(RenderFrame::Text(_))));
        v.close_all();
    }

    #[test]
    fn batch_errors_propagate() {
        let mut v = SyncVectorEnv::new(2, DummyEnv::new).unwrap();
        assert!(matches!(v.step_all(vec![1]), Err(GymError::InvalidAction(_))));
        assert!(matches!(v.step_all(vec![1, -1]), Err(GymError::InvalidAction(_))));
    }

    #[test]
    fn factory_failure_aborts_construction() {
        let built = SyncVectorEnv::<DummyEnv>::new(3, |rank| {
            if rank == 1 { Err(GymError::Configuration("boom".into())) } else { DummyEnv::new(rank) }
        });
        assert!(built.is_err());
    }
}
