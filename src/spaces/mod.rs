/// Space implementations: discrete choices, fixed-length boxes and n-dimensional array boxes.

pub mod array_box;
pub mod space;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::core::{GymError, Result};

pub use array_box::ArrayBoxSpace;
pub use space::Space;

/// A discrete space of integers in [0, n).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Discrete {
    n: u32,
}

impl Discrete {
    pub fn new(n: u32) -> Self {
        assert!(n > 0, "Discrete space requires n > 0");
        Self { n }
    }

    /// Fallible constructor for sizes computed at runtime.
    pub fn try_new(n: u32) -> Result<Self> {
        if n == 0 {
            return Err(GymError::Configuration("Discrete space requires n > 0".into()));
        }
        Ok(Self { n })
    }

    pub fn n(&self) -> u32 { self.n }

    /// Membership test for a signed candidate index, as produced by cursor arithmetic.
    pub fn contains_index(&self, index: i64) -> bool {
        index >= 0 && index < self.n as i64
    }
}

impl Space for Discrete {
    type Element = u32;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        if self.n == 1 { return 0; }
        let dist = Uniform::from(0..self.n);
        dist.sample(rng)
    }

    fn contains(&self, elem: &Self::Element) -> bool { *elem < self.n }
}

/// A simple Box-like space with element type `T` and fixed compile-time length `N`.
/// Uses per-dimension inclusive lower/upper bounds for validation and sampling.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace<T: Copy + PartialOrd, const N: usize> {
    low: [T; N],
    high: [T; N],
}

impl<T: Copy + PartialOrd, const N: usize> BoxSpace<T, N> {
    pub fn new(low: [T; N], high: [T; N]) -> Self {
        for i in 0..N {
            assert!(low[i] <= high[i], "low[{i}] > high[{i}]");
        }
        Self { low, high }
    }

    pub fn low(&self) -> &[T; N] { &self.low }
    pub fn high(&self) -> &[T; N] { &self.high }
}

impl<T, const N: usize> Space for BoxSpace<T, N>
where
    T: Copy + PartialOrd + rand::distributions::uniform::SampleUniform,
{
    type Element = [T; N];

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        let mut arr = self.low;
        for i in 0..N {
            let dist = Uniform::new_inclusive(self.low[i], self.high[i]);
            arr[i] = dist.sample(rng);
        }
        arr
    }

    fn contains(&self, elem: &Self::Element) -> bool {
        (0..N).all(|i| self.low[i] <= elem[i] && elem[i] <= self.high[i])
    }
}

/// Action space descriptor exposed by every layer of the wrapper chain:
/// either a 2D pointer box or a flat set of discrete choices.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionSpace {
    Box(BoxSpace<f32, 2>),
    Discrete(Discrete),
}

impl ActionSpace {
    pub fn as_box(&self) -> Option<&BoxSpace<f32, 2>> {
        match self {
            ActionSpace::Box(b) => Some(b),
            ActionSpace::Discrete(_) => None,
        }
    }

    pub fn as_discrete(&self) -> Option<&Discrete> {
        match self {
            ActionSpace::Discrete(d) => Some(d),
            ActionSpace::Box(_) => None,
        }
    }

    /// Number of discrete actions, if discrete.
    pub fn n(&self) -> Option<u32> { self.as_discrete().map(Discrete::n) }

    fn kind(&self) -> &'static str {
        match self {
            ActionSpace::Box(_) => "box",
            ActionSpace::Discrete(_) => "discrete",
        }
    }

    /// The box variant, or a configuration error naming `wrapper`.
    pub(crate) fn expect_box(&self, wrapper: &str) -> Result<&BoxSpace<f32, 2>> {
        self.as_box().ok_or_else(|| {
            GymError::Configuration(format!("{wrapper} requires a box action space, got {}", self.kind()))
        })
    }

    /// The discrete variant, or a configuration error naming `wrapper`.
    pub(crate) fn expect_discrete(&self, wrapper: &str) -> Result<&Discrete> {
        self.as_discrete().ok_or_else(|| {
            GymError::Configuration(format!("{wrapper} requires a discrete action space, got {}", self.kind()))
        })
    }
}

impl From<Discrete> for ActionSpace {
    fn from(d: Discrete) -> Self { ActionSpace::Discrete(d) }
}

impl From<BoxSpace<f32, 2>> for ActionSpace {
    fn from(b: BoxSpace<f32, 2>) -> Self { ActionSpace::Box(b) }
}
