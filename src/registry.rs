// Registration of base environments by id.
/// Minimal registry: `WobEnv::new` resolves its environment name here.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::core::{GymError, PointerEnv, Result};

/// Environment specification metadata.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvSpec {
    /// Unique identifier like "ClickButton-v0".
    pub id: String,
    /// Step budget the task enforces on its own, if any.
    pub max_episode_steps: Option<u32>,
    /// Whether environment has inherent nondeterminism beyond RNG seed.
    pub nondeterministic: bool,
}

impl EnvSpec {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into(), max_episode_steps: None, nondeterministic: false }
    }
}

/// Factory closure constructing a fresh, unconfigured base environment.
pub type FactoryFn = Box<dyn Fn() -> Box<dyn PointerEnv> + Send + Sync>;

#[derive(Default)]
struct RegistryInner {
    specs: HashMap<String, EnvSpec>,
    factories: HashMap<String, FactoryFn>,
}

struct Registry {
    inner: RwLock<RegistryInner>,
}

impl Registry {
    fn new() -> Self { Self { inner: RwLock::new(RegistryInner::default()) } }

    fn register(&self, spec: EnvSpec, factory: FactoryFn) -> Result<()> {
        let mut g = self.inner.write().map_err(|_| GymError::Configuration("registry poisoned".into()))?;
        if g.specs.contains_key(&spec.id) {
            return Err(GymError::Configuration(format!("Env id already registered: {}", spec.id)));
        }
        g.factories.insert(spec.id.clone(), factory);
        g.specs.insert(spec.id.clone(), spec);
        Ok(())
    }

    fn get_spec(&self, id: &str) -> Option<EnvSpec> {
        let g = self.inner.read().ok()?;
        g.specs.get(id).cloned()
    }

    fn make(&self, id: &str) -> Result<Box<dyn PointerEnv>> {
        let guard = self.inner.read().map_err(|_| GymError::Configuration("registry poisoned".into()))?;
        match guard.factories.get(id) {
            Some(f) => Ok((f)()),
            None => Err(GymError::Configuration(format!("Unknown environment id: {}", id))),
        }
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Register an environment spec and its factory globally.
pub fn register(spec: EnvSpec, factory: FactoryFn) -> Result<()> { registry().register(spec, factory) }

/// Fetch a registered EnvSpec by id.
pub fn get_spec(id: &str) -> Option<EnvSpec> { registry().get_spec(id) }

/// Construct a fresh base environment by id.
pub fn make<S: AsRef<str>>(id: S) -> Result<Box<dyn PointerEnv>> { registry().make(id.as_ref()) }

/// Adapt a concrete constructor into a factory.
pub fn factory_of<P, F>(ctor: F) -> FactoryFn
where
    P: PointerEnv + 'static,
    F: Fn() -> P + Send + Sync + 'static,
{
    Box::new(move || Box::new(ctor()) as Box<dyn PointerEnv>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WobConfig;
    use crate::core::{Cursor, CursorGrid, Env, Frame, Info, PointerAction, Step};
    use crate::spaces::{ActionSpace, ArrayBoxSpace, BoxSpace};

    struct Dummy {
        seeded: Option<u64>,
        action_space: ActionSpace,
        observation_space: ArrayBoxSpace,
    }

    impl Default for Dummy {
        fn default() -> Self {
            Self {
                seeded: None,
                action_space: BoxSpace::new([0.0, 0.0], [2.0, 2.0]).into(),
                observation_space: ArrayBoxSpace::uniform(&[2, 2], 0.0, 1.0).unwrap(),
            }
        }
    }

    impl Env for Dummy {
        type Obs = Frame;
        type Act = PointerAction;
        fn reset(&mut self, _seed: Option<u64>) -> Result<(Frame, Info)> {
            Ok((Frame::zeros(ndarray::IxDyn(&[2, 2])), Info::new()))
        }
        fn step(&mut self, _a: PointerAction) -> Result<Step<Frame>> {
            Ok(Step::new(Frame::zeros(ndarray::IxDyn(&[2, 2])), 0.0, true, false, Info::new()))
        }
        fn action_space(&self) -> &ActionSpace { &self.action_space }
        fn observation_space(&self) -> &ArrayBoxSpace { &self.observation_space }
    }

    impl CursorGrid for Dummy {
        fn page_size(&self) -> (u32, u32) { (2, 2) }
        fn cursor(&self) -> Cursor { Cursor::default() }
    }

    impl PointerEnv for Dummy {
        fn configure(&mut self, _config: &WobConfig) -> Result<()> { Ok(()) }
        fn seed(&mut self, seed: u64) { self.seeded = Some(seed) }
    }

    #[test]
    fn register_and_make_dummy() {
        let spec = EnvSpec { id: "RegistryDummy-v0".into(), max_episode_steps: Some(10), nondeterministic: false };
        register(spec.clone(), factory_of(Dummy::default)).expect("register ok");
        assert_eq!(get_spec("RegistryDummy-v0"), Some(spec.clone()));

        let mut env = make("RegistryDummy-v0").expect("make ok");
        assert_eq!(env.page_size(), (2, 2));
        let s = env.step([1.0, 1.0]).unwrap();
        assert!(s.done());

        let again = register(spec, factory_of(Dummy::default));
        assert!(matches!(again, Err(GymError::Configuration(_))));
    }

    #[test]
    fn unknown_id_is_a_configuration_error() {
        assert!(matches!(make("NoSuchEnv-v9"), Err(GymError::Configuration(_))));
        assert_eq!(get_spec("NoSuchEnv-v9"), None);
    }
}
