// Shared test double: a click-the-button page on a coarse cursor grid.

#![allow(dead_code)]

use ndarray::IxDyn;
use rand::Rng;
use wob_gymnasium::utils::rng::{RngStream, rng_from_seed};
use wob_gymnasium::{
    ActionSpace, ArrayBoxSpace, BoxSpace, Cursor, CursorGrid, Env, Frame, Info, InfoValue, PointerAction,
    PointerEnv, RenderFrame, Result, Step, WobConfig,
};

/// Cursor and button live on a `cells x cells` grid (`width / mouse_width`).
/// Clicking means moving onto the button cell.
pub struct ClickPage {
    cells: u32,
    config: WobConfig,
    rng: RngStream,
    cursor: Cursor,
    button: Cursor,
    steps: u32,
    pub seeded_with: Option<u64>,
    action_space: ActionSpace,
    observation_space: ArrayBoxSpace,
}

impl ClickPage {
    pub fn new() -> Self {
        Self {
            cells: 1,
            config: WobConfig::default(),
            rng: rng_from_seed(0),
            cursor: Cursor::default(),
            button: Cursor::default(),
            steps: 0,
            seeded_with: None,
            action_space: BoxSpace::new([0.0, 0.0], [1.0, 1.0]).into(),
            observation_space: ArrayBoxSpace::uniform(&[1, 1], 0.0, 1.0).unwrap(),
        }
    }

    pub fn button(&self) -> Cursor { self.button }

    fn place(&mut self, randomize_x: bool, randomize_y: bool, fixed: Cursor) -> Cursor {
        let n = self.cells as i64;
        let row = if randomize_x { self.rng.gen_range(0..n) } else { fixed.row };
        let col = if randomize_y { self.rng.gen_range(0..n) } else { fixed.col };
        Cursor::new(row, col)
    }

    fn frame(&self) -> Frame {
        let n = self.cells as usize;
        let mut f = Frame::zeros(IxDyn(&[n, n]));
        f[[self.button.row as usize, self.button.col as usize]] = 0.5;
        f[[self.cursor.row as usize, self.cursor.col as usize]] = 1.0;
        f
    }
}

impl Env for ClickPage {
    type Obs = Frame;
    type Act = PointerAction;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Frame, Info)> {
        if let Some(s) = seed {
            self.rng = rng_from_seed(s);
        }
        let last = Cursor::new(self.cells as i64 - 1, self.cells as i64 - 1);
        let m = self.config.randomize_mouse;
        let b = self.config.randomize_button;
        self.cursor = self.place(m.x(), m.y(), Cursor::default());
        self.button = self.place(b.x(), b.y(), last);
        self.steps = 0;
        Ok((self.frame(), Info::new()))
    }

    fn step(&mut self, action: PointerAction) -> Result<Step<Frame>> {
        self.cursor = Cursor::new(action[0] as i64, action[1] as i64);
        self.steps += 1;
        let clicked = self.cursor == self.button;
        let out_of_time = !clicked && self.steps >= self.config.max_steps;
        let reward = if clicked {
            if self.config.decrease_reward_with_time {
                1.0 - self.steps as f32 / self.config.max_steps as f32
            } else {
                1.0
            }
        } else if out_of_time && self.config.penalty_if_unsolved {
            -1.0
        } else {
            0.0
        };
        let mut info = Info::new();
        info.insert("steps", InfoValue::from(self.steps as i64));
        Ok(Step::new(self.frame(), reward, clicked, out_of_time, info))
    }

    fn action_space(&self) -> &ActionSpace { &self.action_space }
    fn observation_space(&self) -> &ArrayBoxSpace { &self.observation_space }

    fn render(&self) -> Option<RenderFrame> {
        Some(RenderFrame::Text(format!(
            "cursor=({}, {}) button=({}, {})",
            self.cursor.row, self.cursor.col, self.button.row, self.button.col
        )))
    }
}

impl CursorGrid for ClickPage {
    fn page_size(&self) -> (u32, u32) { (self.cells, self.cells) }
    fn cursor(&self) -> Cursor { self.cursor }
}

impl PointerEnv for ClickPage {
    fn configure(&mut self, config: &WobConfig) -> Result<()> {
        self.cells = config.width / config.mouse_width;
        let n = self.cells as f32;
        self.action_space = BoxSpace::new([0.0, 0.0], [n, n]).into();
        self.observation_space = ArrayBoxSpace::uniform(&[self.cells as usize; 2], 0.0, 1.0)?;
        self.config = config.clone();
        Ok(())
    }

    fn seed(&mut self, seed: u64) {
        self.seeded_with = Some(seed);
        self.rng = rng_from_seed(seed);
    }
}

/// Greedy policy toward the button: direction index for the wrapped env.
pub fn toward(cursor: Cursor, button: Cursor) -> u32 {
    if cursor.col < button.col {
        0
    } else if cursor.col > button.col {
        1
    } else if cursor.row < button.row {
        2
    } else {
        3
    }
}
