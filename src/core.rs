// Core traits and types: the environment contract every wrapper in the chain implements.

use crate::spaces::{ActionSpace, ArrayBoxSpace};

/// A small ordered info map. Stores a handful of key-value pairs per step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Info {
    entries: Vec<(String, InfoValue)>,
}

impl Info {
    /// Create an empty Info map.
    pub fn new() -> Self { Self { entries: Vec::new() } }

    /// Insert or replace a key with the given value.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: InfoValue) {
        let k = key.into();
        if let Some((_, v)) = self.entries.iter_mut().find(|(kk, _)| kk == &k) {
            *v = value;
        } else {
            self.entries.push((k, value));
        }
    }

    /// Get a reference to a value by key.
    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Numeric lookup; integers are widened to f64.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            InfoValue::F64(v) => Some(*v),
            InfoValue::I64(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InfoValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn contains_key(&self, key: &str) -> bool { self.get(key).is_some() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn len(&self) -> usize { self.entries.len() }
}

/// A small set of value types commonly used in info maps.
#[derive(Clone, Debug, PartialEq)]
pub enum InfoValue {
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
}

impl From<bool> for InfoValue { fn from(v: bool) -> Self { InfoValue::Bool(v) } }
impl From<i64> for InfoValue { fn from(v: i64) -> Self { InfoValue::I64(v) } }
impl From<u64> for InfoValue { fn from(v: u64) -> Self { InfoValue::I64(v as i64) } }
impl From<i32> for InfoValue { fn from(v: i32) -> Self { InfoValue::I64(v as i64) } }
impl From<f64> for InfoValue { fn from(v: f64) -> Self { InfoValue::F64(v) } }
impl From<f32> for InfoValue { fn from(v: f32) -> Self { InfoValue::F64(v as f64) } }
impl From<&str> for InfoValue { fn from(v: &str) -> Self { InfoValue::Str(v.to_string()) } }
impl From<String> for InfoValue { fn from(v: String) -> Self { InfoValue::Str(v) } }

/// A frame returned by `Env::render`.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderFrame {
    /// Textual representation of a frame (e.g., ASCII art or debug string).
    Text(String),
    /// Raw pixel buffer in row-major RGB or RGBA format.
    Pixels {
        width: u32,
        height: u32,
        /// Pixel data. Convention: RGB uses 3 bytes per pixel, RGBA uses 4.
        data: Vec<u8>,
    },
}

/// A step result from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<Obs> {
    pub observation: Obs,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Info,
}

impl<Obs> Step<Obs> {
    pub fn new(observation: Obs, reward: f32, terminated: bool, truncated: bool, info: Info) -> Self {
        Self { observation, reward, terminated, truncated, info }
    }

    /// End of episode, for either reason.
    pub fn done(&self) -> bool { self.terminated || self.truncated }
}

/// Errors across the environment pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GymError {
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Ratio metric over a zero (or non-finite) denominator.
    #[error("Degenerate metric {metric}: denominator {denominator}")]
    DegenerateMetric { metric: &'static str, denominator: f64 },
    #[error("Environment not ready: {0}")]
    NotReady(String),
}

/// Convenience alias for results using GymError.
pub type Result<T> = std::result::Result<T, GymError>;

/// Core environment trait. Every wrapper owns the next inner environment and
/// implements this same capability set.
pub trait Env {
    type Obs;
    type Act;

    /// Reset the environment to an initial state.
    /// Implementations should re-seed internal RNGs when `seed` is provided.
    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)>;

    /// Apply an action and advance the environment by one step.
    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>>;

    /// Descriptor of the actions `step` accepts.
    fn action_space(&self) -> &ActionSpace;

    /// Descriptor of the observations `reset` and `step` produce.
    fn observation_space(&self) -> &ArrayBoxSpace;

    /// Render a frame of the current state, if supported.
    fn render(&self) -> Option<RenderFrame> { None }

    /// Close and release any external resources.
    fn close(&mut self) {}
}

/// Cursor position on the page grid, in grid cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub row: i64,
    pub col: i64,
}

impl Cursor {
    pub fn new(row: i64, col: i64) -> Self { Self { row, col } }
}

/// Read-only pointer geometry of the innermost environment. Wrappers forward it
/// so that outer layers can see the base's page and cursor.
pub trait CursorGrid {
    /// Page size as `(width, height)`.
    fn page_size(&self) -> (u32, u32);

    /// Current cursor position.
    fn cursor(&self) -> Cursor;
}

/// Two-component pointer coordinate accepted by base environments.
pub type PointerAction = [f32; 2];

/// Grayscale frame produced by base environments.
pub type Frame = ndarray::ArrayD<f32>;

/// Contract of a base web-task environment: a coordinate-driven env with a
/// cursor, which is configured and seeded once before wrapping.
pub trait PointerEnv: Env<Obs = Frame, Act = PointerAction> + CursorGrid {
    /// Apply the task configuration record.
    fn configure(&mut self, config: &crate::config::WobConfig) -> Result<()>;

    /// Seed the environment's randomness.
    fn seed(&mut self, seed: u64);
}

impl<P: PointerEnv + ?Sized> Env for Box<P> {
    type Obs = Frame;
    type Act = PointerAction;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Frame, Info)> { (**self).reset(seed) }
    fn step(&mut self, action: PointerAction) -> Result<Step<Frame>> { (**self).step(action) }
    fn action_space(&self) -> &ActionSpace { (**self).action_space() }
    fn observation_space(&self) -> &ArrayBoxSpace { (**self).observation_space() }
    fn render(&self) -> Option<RenderFrame> { (**self).render() }
    fn close(&mut self) { (**self).close() }
}

impl<P: PointerEnv + ?Sized> CursorGrid for Box<P> {
    fn page_size(&self) -> (u32, u32) { (**self).page_size() }
    fn cursor(&self) -> Cursor { (**self).cursor() }
}

impl<P: PointerEnv + ?Sized> PointerEnv for Box<P> {
    fn configure(&mut self, config: &crate::config::WobConfig) -> Result<()> { (**self).configure(config) }
    fn seed(&mut self, seed: u64) { (**self).seed(seed) }
}
