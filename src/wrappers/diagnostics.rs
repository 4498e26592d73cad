//! Episode diagnostics: accumulates reward and length across steps and emits
//! an [`EpisodeMetrics`] record to a [`MetricsSink`] when an episode ends.
//!
//! On the terminal step the returned info is replaced by the derived metrics;
//! fields the inner environment put there are dropped.

use log::info;

use crate::core::{Env, GymError, Result, Step};
use crate::metrics::{EpisodeMetrics, MetricsSink};
use crate::utils::clock::{Clock, SystemClock};
use crate::wrappers::filter::{ApplyFilter, Filter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    AwaitingReset,
    Running,
    Finished,
}

/// Per-episode bookkeeping filter.
pub struct DiagnosticsInfo {
    rank: u64,
    sink: Box<dyn MetricsSink>,
    clock: Box<dyn Clock>,
    phase: Phase,
    episode_start: f64,
    episode_reward: f64,
    episode_length: u64,
    episode_count: u64,
}

impl DiagnosticsInfo {
    /// Filter for worker `rank`, timing episodes with the wall clock.
    pub fn new(rank: u64, sink: Box<dyn MetricsSink>) -> Self {
        Self {
            rank,
            sink,
            clock: Box::new(SystemClock::new()),
            phase: Phase::AwaitingReset,
            episode_start: 0.0,
            episode_reward: 0.0,
            episode_length: 0,
            episode_count: 0,
        }
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn rank(&self) -> u64 { self.rank }
    /// Finished episodes since construction.
    pub fn episode_count(&self) -> u64 { self.episode_count }
    pub fn episode_reward(&self) -> f64 { self.episode_reward }
    pub fn episode_length(&self) -> u64 { self.episode_length }

    fn finish_episode(&mut self) -> EpisodeMetrics {
        self.episode_count += 1;
        info!(
            "[rank {}] Episode terminating: episode_reward={} episode_length={}",
            self.rank, self.episode_reward, self.episode_length
        );
        let elapsed = self.clock.now() - self.episode_start;
        let metrics = EpisodeMetrics::compute(self.episode_reward, self.episode_length, elapsed);
        self.sink.write(self.episode_count, &metrics);
        self.sink.flush();
        metrics
    }
}

impl<O> Filter<O> for DiagnosticsInfo {
    fn after_reset(&mut self, observation: O) -> Result<O> {
        info!("[rank {}] Resetting environment", self.rank);
        self.sink.register();
        self.episode_reward = 0.0;
        self.episode_length = 0;
        self.phase = Phase::Running;
        Ok(observation)
    }

    fn before_step(&mut self) -> Result<()> {
        match self.phase {
            Phase::Running => Ok(()),
            Phase::AwaitingReset => Err(GymError::NotReady("step called before the first reset".into())),
            Phase::Finished => Err(GymError::NotReady("step called after episode end; reset first".into())),
        }
    }

    fn after_step(&mut self, mut step: Step<O>) -> Result<Step<O>> {
        if self.episode_length == 0 {
            self.episode_start = self.clock.now();
        }
        self.episode_length += 1;
        self.episode_reward += step.reward as f64;

        if step.done() {
            self.phase = Phase::Finished;
            step.info = self.finish_episode().to_info();
        }
        Ok(step)
    }
}

/// Diagnostics layer tagged with a worker rank; the innermost wrapper of the chain.
pub type Monitor<E> = ApplyFilter<E, DiagnosticsInfo>;

/// Wrap `env` in a [`Monitor`] reporting to `sink`.
pub fn diagnostics<E: Env>(env: E, rank: u64, sink: Box<dyn MetricsSink>) -> Monitor<E> {
    ApplyFilter::new(env, DiagnosticsInfo::new(rank, sink))
}
