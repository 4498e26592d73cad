//! The web-task environment as seen by an agent: four cursor moves in, one
//! single-channel frame out, with per-episode diagnostics on the side.

use log::{info, warn};

use crate::config::WobConfig;
use crate::core::{Env, Frame, Info, PointerEnv, RenderFrame, Result, Step};
use crate::metrics::MetricsSink;
use crate::registry::{self, EnvSpec};
use crate::spaces::{ActionSpace, ArrayBoxSpace};
use crate::utils::clock::Clock;
use crate::utils::rng::worker_seed;
use crate::wrappers::{ActionBox2Discrete, ApplyFilter, DiagnosticsInfo, GreyChannelWrapper, Monitor, MovingActionWrapper};

/// Full wrapper stack over a base environment `B`, outermost first.
pub type WobChain<B> = GreyChannelWrapper<MovingActionWrapper<ActionBox2Discrete<Monitor<B>>>>;

/// Orchestrates a configured, seeded base environment and its wrapper chain.
pub struct WobEnv<B: PointerEnv> {
    env_name: String,
    rank: u64,
    seed: u64,
    config: WobConfig,
    spec: Option<EnvSpec>,
    env: WobChain<B>,
}

impl WobEnv<Box<dyn PointerEnv>> {
    /// Build `env_name` from the registry with the default task configuration.
    pub fn new(env_name: &str, rank: u64, seed: u64, sink: Box<dyn MetricsSink>) -> Result<Self> {
        let base = registry::make(env_name)?;
        let config = WobConfig::default();
        let spec = registry::get_spec(env_name);
        if let Some(spec) = &spec {
            info!(
                "[rank {}] {}: max_episode_steps={:?} nondeterministic={}",
                rank, spec.id, spec.max_episode_steps, spec.nondeterministic
            );
            if spec.max_episode_steps.is_some_and(|n| n != config.max_steps) {
                warn!(
                    "{} registers a step budget of {:?} but the task is configured with max_steps={}",
                    spec.id, spec.max_episode_steps, config.max_steps
                );
            }
        }
        let mut env = Self::from_base(env_name, base, rank, seed, config, sink)?;
        env.spec = spec;
        Ok(env)
    }
}

impl<B: PointerEnv> WobEnv<B> {
    /// Configure and seed `base`, then wrap it.
    pub fn from_base(
        env_name: &str,
        base: B,
        rank: u64,
        seed: u64,
        config: WobConfig,
        sink: Box<dyn MetricsSink>,
    ) -> Result<Self> {
        Self::build(env_name, base, rank, seed, config, DiagnosticsInfo::new(rank, sink))
    }

    /// As [`from_base`](Self::from_base), timing episodes with `clock`.
    pub fn from_base_with_clock<C: Clock + 'static>(
        env_name: &str,
        base: B,
        rank: u64,
        seed: u64,
        config: WobConfig,
        sink: Box<dyn MetricsSink>,
        clock: C,
    ) -> Result<Self> {
        Self::build(env_name, base, rank, seed, config, DiagnosticsInfo::new(rank, sink).with_clock(clock))
    }

    fn build(
        env_name: &str,
        mut base: B,
        rank: u64,
        seed: u64,
        config: WobConfig,
        diagnostics: DiagnosticsInfo,
    ) -> Result<Self> {
        config.validate()?;
        // The wrappers capture their spaces at construction; configure first.
        base.configure(&config)?;
        base.seed(worker_seed(seed, rank));

        let env = ApplyFilter::new(base, diagnostics);
        let env = ActionBox2Discrete::new(env)?;
        let env = MovingActionWrapper::new(env)?;
        let env = GreyChannelWrapper::new(env);
        info!(
            "[rank {}] {} ready: action space {:?}, observation shape {:?}",
            rank,
            env_name,
            env.action_space().n(),
            env.observation_space().shape()
        );

        Ok(Self { env_name: env_name.to_string(), rank, seed, config, spec: None, env })
    }

    pub fn get_action_space(&self) -> &ActionSpace { self.env.action_space() }
    pub fn get_observation_space(&self) -> &ArrayBoxSpace { self.env.observation_space() }

    pub fn env_name(&self) -> &str { &self.env_name }
    pub fn rank(&self) -> u64 { self.rank }
    /// Base seed before the rank offset.
    pub fn seed(&self) -> u64 { self.seed }
    pub fn config(&self) -> &WobConfig { &self.config }
    /// Registry metadata, when built through [`WobEnv::new`].
    pub fn env_spec(&self) -> Option<&EnvSpec> { self.spec.as_ref() }

    /// The unwrapped base environment.
    pub fn base(&self) -> &B { self.monitor().inner() }

    /// The diagnostics layer.
    pub fn monitor(&self) -> &Monitor<B> { self.env.inner().inner().inner() }
}

impl<B: PointerEnv> Env for WobEnv<B> {
    type Obs = Frame;
    type Act = u32;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Frame, Info)> { self.env.reset(seed) }

    fn step(&mut self, action: u32) -> Result<Step<Frame>> { self.env.step(action) }

    fn action_space(&self) -> &ActionSpace { self.env.action_space() }
    fn observation_space(&self) -> &ArrayBoxSpace { self.env.observation_space() }

    /// Rendered by the base environment directly, bypassing every wrapper.
    fn render(&self) -> Option<RenderFrame> { self.base().render() }

    fn close(&mut self) { self.env.close() }
}
