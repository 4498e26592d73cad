// Observation wrapper turning 2D grayscale frames into single-channel images.

use ndarray::Axis;

use crate::core::{Cursor, CursorGrid, Env, Frame, GymError, Info, RenderFrame, Result, Step};
use crate::spaces::{ActionSpace, ArrayBoxSpace};

/// Append a trailing axis of length 1. Not idempotent: each call adds one more axis.
pub fn add_channel(frame: Frame) -> Frame {
    let axis = Axis(frame.ndim());
    frame.insert_axis(axis)
}

/// Appends a singleton channel axis to every observation. The declared
/// observation space is derived from the wrapped one when the wrapper is built.
pub struct GreyChannelWrapper<E> {
    inner: E,
    observation_space: ArrayBoxSpace,
}

impl<E: Env<Obs = Frame>> GreyChannelWrapper<E> {
    pub fn new(inner: E) -> Self {
        let observation_space = inner.observation_space().with_trailing_axis();
        Self { inner, observation_space }
    }

    /// Frame shape check against the wrapped space, then [`add_channel`].
    pub fn observation(&self, frame: Frame) -> Result<Frame> {
        let expected = self.inner.observation_space().shape();
        if frame.shape() != expected {
            return Err(GymError::InvalidObservation(format!(
                "frame shape {:?} does not match declared {:?}",
                frame.shape(),
                expected
            )));
        }
        Ok(add_channel(frame))
    }
}

impl<E> GreyChannelWrapper<E> {
    pub fn inner(&self) -> &E { &self.inner }
    pub fn inner_mut(&mut self) -> &mut E { &mut self.inner }
    pub fn into_inner(self) -> E { self.inner }
}

impl<E: Env<Obs = Frame>> Env for GreyChannelWrapper<E> {
    type Obs = Frame;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> {
        let (obs, info) = self.inner.reset(seed)?;
        Ok((self.observation(obs)?, info))
    }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let s = self.inner.step(action)?;
        let observation = self.observation(s.observation)?;
        Ok(Step::new(observation, s.reward, s.terminated, s.truncated, s.info))
    }

    fn action_space(&self) -> &ActionSpace { self.inner.action_space() }
    fn observation_space(&self) -> &ArrayBoxSpace { &self.observation_space }
    fn render(&self) -> Option<RenderFrame> { self.inner.render() }
    fn close(&mut self) { self.inner.close() }
}

impl<E: CursorGrid> CursorGrid for GreyChannelWrapper<E> {
    fn page_size(&self) -> (u32, u32) { self.inner.page_size() }
    fn cursor(&self) -> Cursor { self.inner.cursor() }
}
