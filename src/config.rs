//! Task configuration record forwarded to the base environment.

use std::fmt;
use std::str::FromStr;

use crate::core::{GymError, Result};

/// Axes along which an object's start position is randomized on reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axes {
    #[cfg_attr(feature = "serde", serde(rename = ""))]
    None,
    #[cfg_attr(feature = "serde", serde(rename = "x"))]
    X,
    #[cfg_attr(feature = "serde", serde(rename = "y"))]
    Y,
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "xy"))]
    XY,
}

impl Axes {
    pub fn x(self) -> bool { matches!(self, Axes::X | Axes::XY) }
    pub fn y(self) -> bool { matches!(self, Axes::Y | Axes::XY) }

    pub fn as_str(self) -> &'static str {
        match self {
            Axes::None => "",
            Axes::X => "x",
            Axes::Y => "y",
            Axes::XY => "xy",
        }
    }
}

impl FromStr for Axes {
    type Err = GymError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(Axes::None),
            "x" => Ok(Axes::X),
            "y" => Ok(Axes::Y),
            "xy" | "yx" => Ok(Axes::XY),
            other => Err(GymError::Configuration(format!("unknown randomization axes: {other:?}"))),
        }
    }
}

impl fmt::Display for Axes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Task geometry, randomization and reward-shaping options.
///
/// The wrapper chain never interprets these; they are validated once and then
/// handed to [`PointerEnv::configure`](crate::core::PointerEnv::configure) verbatim.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WobConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    pub button_width: u32,
    pub button_height: u32,
    pub mouse_width: u32,
    pub mouse_height: u32,
    /// Step budget per episode.
    pub max_steps: u32,
    pub randomize_mouse: Axes,
    pub randomize_button: Axes,
    pub decrease_reward_with_time: bool,
    pub penalty_if_unsolved: bool,
}

impl Default for WobConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 80,
            button_width: 20,
            button_height: 10,
            mouse_width: 10,
            mouse_height: 10,
            max_steps: 100,
            randomize_mouse: Axes::XY,
            randomize_button: Axes::XY,
            decrease_reward_with_time: true,
            penalty_if_unsolved: false,
        }
    }
}

impl WobConfig {
    /// Reject non-positive dimensions and hitboxes that do not fit the canvas.
    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("width", self.width),
            ("height", self.height),
            ("button_width", self.button_width),
            ("button_height", self.button_height),
            ("mouse_width", self.mouse_width),
            ("mouse_height", self.mouse_height),
            ("max_steps", self.max_steps),
        ];
        if let Some((name, _)) = dims.iter().find(|(_, v)| *v == 0) {
            return Err(GymError::Configuration(format!("{name} must be positive")));
        }
        if self.button_width > self.width || self.button_height > self.height {
            return Err(GymError::Configuration(format!(
                "button {}x{} does not fit canvas {}x{}",
                self.button_width, self.button_height, self.width, self.height
            )));
        }
        if self.mouse_width > self.width || self.mouse_height > self.height {
            return Err(GymError::Configuration(format!(
                "mouse {}x{} does not fit canvas {}x{}",
                self.mouse_width, self.mouse_height, self.width, self.height
            )));
        }
        Ok(())
    }
}
