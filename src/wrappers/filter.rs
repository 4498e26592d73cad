// Filters: hooks run after reset and after each step, and the wrapper that applies them.

use crate::core::{Cursor, CursorGrid, Env, Info, RenderFrame, Result, Step};
use crate::spaces::{ActionSpace, ArrayBoxSpace};

/// Hooks around an environment's calls. The post-processing ones default to
/// identity; `before_step` can veto a step before the inner env sees it.
pub trait Filter<O> {
    fn after_reset(&mut self, observation: O) -> Result<O> { Ok(observation) }

    fn before_step(&mut self) -> Result<()> { Ok(()) }

    fn after_step(&mut self, step: Step<O>) -> Result<Step<O>> { Ok(step) }
}

/// Threads reset/step through a [`Filter`]. Action and observation spaces are the inner ones.
pub struct ApplyFilter<E, F> {
    inner: E,
    filter: F,
}

impl<E: Env, F: Filter<E::Obs>> ApplyFilter<E, F> {
    pub fn new(inner: E, filter: F) -> Self { Self { inner, filter } }
}

impl<E, F> ApplyFilter<E, F> {
    pub fn filter(&self) -> &F { &self.filter }
    pub fn filter_mut(&mut self) -> &mut F { &mut self.filter }
    pub fn inner(&self) -> &E { &self.inner }
    pub fn inner_mut(&mut self) -> &mut E { &mut self.inner }
    pub fn into_inner(self) -> E { self.inner }
}

impl<E: Env, F: Filter<E::Obs>> Env for ApplyFilter<E, F> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> {
        let (obs, info) = self.inner.reset(seed)?;
        Ok((self.filter.after_reset(obs)?, info))
    }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        self.filter.before_step()?;
        let s = self.inner.step(action)?;
        self.filter.after_step(s)
    }

    fn action_space(&self) -> &ActionSpace { self.inner.action_space() }
    fn observation_space(&self) -> &ArrayBoxSpace { self.inner.observation_space() }
    fn render(&self) -> Option<RenderFrame> { self.inner.render() }
    fn close(&mut self) { self.inner.close() }
}

impl<E: CursorGrid, F> CursorGrid for ApplyFilter<E, F> {
    fn page_size(&self) -> (u32, u32) { self.inner.page_size() }
    fn cursor(&self) -> Cursor { self.inner.cursor() }
}
