//! Bounded n-dimensional array space used for frame observations.

use ndarray::{ArrayD, Axis, IxDyn, Zip};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::core::{GymError, Result};
use crate::spaces::Space;

/// Box space over `ArrayD<f32>` with per-element inclusive bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayBoxSpace {
    low: ArrayD<f32>,
    high: ArrayD<f32>,
}

impl ArrayBoxSpace {
    /// Build from explicit bound arrays. Shapes must agree and `low <= high` elementwise.
    pub fn new(low: ArrayD<f32>, high: ArrayD<f32>) -> Result<Self> {
        if low.shape() != high.shape() {
            return Err(GymError::Configuration(format!(
                "bound shapes differ: low {:?}, high {:?}",
                low.shape(),
                high.shape()
            )));
        }
        if Zip::from(&low).and(&high).fold(false, |bad, &l, &h| bad || !(l <= h)) {
            return Err(GymError::Configuration("low must not exceed high".into()));
        }
        Ok(Self { low, high })
    }

    /// Same scalar bounds for every element of `shape`.
    pub fn uniform(shape: &[usize], low: f32, high: f32) -> Result<Self> {
        Self::new(ArrayD::from_elem(IxDyn(shape), low), ArrayD::from_elem(IxDyn(shape), high))
    }

    pub fn low(&self) -> &ArrayD<f32> { &self.low }
    pub fn high(&self) -> &ArrayD<f32> { &self.high }
    pub fn shape(&self) -> &[usize] { self.low.shape() }
    pub fn ndim(&self) -> usize { self.low.ndim() }

    /// The same bounds with one extra trailing axis of length 1.
    pub fn with_trailing_axis(&self) -> Self {
        let axis = Axis(self.ndim());
        Self {
            low: self.low.clone().insert_axis(axis),
            high: self.high.clone().insert_axis(axis),
        }
    }
}

impl Space for ArrayBoxSpace {
    type Element = ArrayD<f32>;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        let mut out = self.low.clone();
        Zip::from(&mut out).and(&self.low).and(&self.high).for_each(|o, &l, &h| {
            *o = Uniform::new_inclusive(l, h).sample(rng);
        });
        out
    }

    fn contains(&self, elem: &Self::Element) -> bool {
        elem.shape() == self.shape()
            && Zip::from(elem)
                .and(&self.low)
                .and(&self.high)
                .fold(true, |ok, &v, &l, &h| ok && l <= v && v <= h)
    }
}
