// Action-space wrappers: box → flat discrete index, and flat index → 4-way cursor movement.

use log::{debug, warn};

use crate::core::{Cursor, CursorGrid, Env, GymError, Info, PointerAction, RenderFrame, Result, Step};
use crate::spaces::{ActionSpace, ArrayBoxSpace, Discrete, Space};

/// Flattens a 2D pointer box into `Discrete(high_x * high_y)` and decodes flat
/// indices back into box coordinates.
pub struct ActionBox2Discrete<E> {
    inner: E,
    high: [f32; 2],
    flat: Discrete,
    action_space: ActionSpace,
}

impl<E: Env<Act = PointerAction>> ActionBox2Discrete<E> {
    /// Fails if `inner` does not expose a box action space with positive upper bounds.
    pub fn new(inner: E) -> Result<Self> {
        let space = inner.action_space().expect_box("ActionBox2Discrete")?;
        let high = *space.high();
        if *space.low() != [0.0, 0.0] {
            warn!("ActionBox2Discrete assumes zero lower bounds, got {:?}", space.low());
        }
        if !(high[0] > 0.0 && high[1] > 0.0) {
            return Err(GymError::Configuration(format!("box upper bounds must be positive, got {high:?}")));
        }
        let product = (high[0] as f64 * high[1] as f64).round();
        if product > u32::MAX as f64 {
            return Err(GymError::Configuration(format!("flattened action space too large: {product}")));
        }
        let flat = Discrete::try_new(product as u32)?;
        Ok(Self { inner, high, flat, action_space: ActionSpace::Discrete(flat) })
    }
}

impl<E> ActionBox2Discrete<E> {
    /// Map a flat index to box coordinates: `x = floor(i / high_x)`, `y = i mod high_y`.
    pub fn decode(&self, flat_index: u32) -> Result<PointerAction> {
        if !self.flat.contains(&flat_index) {
            return Err(GymError::InvalidAction(format!(
                "flat index {flat_index} outside [0, {})",
                self.flat.n()
            )));
        }
        let i = flat_index as f64;
        let x = (i / self.high[0] as f64).floor();
        let y = i.rem_euclid(self.high[1] as f64);
        Ok([x as f32, y as f32])
    }

    pub fn inner(&self) -> &E { &self.inner }
    pub fn inner_mut(&mut self) -> &mut E { &mut self.inner }
    pub fn into_inner(self) -> E { self.inner }
}

impl<E: Env<Act = PointerAction>> Env for ActionBox2Discrete<E> {
    type Obs = E::Obs;
    type Act = u32;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> { self.inner.reset(seed) }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let coords = self.decode(action)?;
        self.inner.step(coords)
    }

    fn action_space(&self) -> &ActionSpace { &self.action_space }
    fn observation_space(&self) -> &ArrayBoxSpace { self.inner.observation_space() }
    fn render(&self) -> Option<RenderFrame> { self.inner.render() }
    fn close(&mut self) { self.inner.close() }
}

impl<E: CursorGrid> CursorGrid for ActionBox2Discrete<E> {
    fn page_size(&self) -> (u32, u32) { self.inner.page_size() }
    fn cursor(&self) -> Cursor { self.inner.cursor() }
}

/// One grid cell of cursor movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Right = 0,
    Left = 1,
    Down = 2,
    Up = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Right, Direction::Left, Direction::Down, Direction::Up];

    /// Flat-index offset on a grid `width` cells wide.
    pub fn offset(self, width: i64) -> i64 {
        match self {
            Direction::Right => 1,
            Direction::Left => -1,
            Direction::Down => width,
            Direction::Up => -width,
        }
    }
}

impl TryFrom<u32> for Direction {
    type Error = GymError;

    fn try_from(action: u32) -> Result<Self> {
        match action {
            0 => Ok(Direction::Right),
            1 => Ok(Direction::Left),
            2 => Ok(Direction::Down),
            3 => Ok(Direction::Up),
            other => Err(GymError::InvalidAction(format!("direction {other} outside [0, 4)"))),
        }
    }
}

/// Exposes `Discrete(4)` and turns a direction into the flat index of the
/// neighbouring cell. Moves that would leave the flat space keep the cursor where it is.
pub struct MovingActionWrapper<E> {
    inner: E,
    flat: Discrete,
    action_space: ActionSpace,
}

impl<E: Env<Act = u32> + CursorGrid> MovingActionWrapper<E> {
    /// Fails if `inner` does not expose a discrete action space.
    pub fn new(inner: E) -> Result<Self> {
        let flat = *inner.action_space().expect_discrete("MovingActionWrapper")?;
        Ok(Self { inner, flat, action_space: ActionSpace::Discrete(Discrete::new(4)) })
    }
}

impl<E: CursorGrid> MovingActionWrapper<E> {
    pub fn width(&self) -> u32 { self.inner.page_size().0 }
    pub fn height(&self) -> u32 { self.inner.page_size().1 }
    pub fn mouse_pos(&self) -> Cursor { self.inner.cursor() }

    /// `row * width + col` of the current cursor. Fails if that cell is not
    /// part of the flat space.
    pub fn current_index(&self) -> Result<i64> {
        let c = self.mouse_pos();
        c.row
            .checked_mul(self.width() as i64)
            .and_then(|i| i.checked_add(c.col))
            .filter(|&i| self.flat.contains_index(i))
            .ok_or_else(|| {
                GymError::InvalidAction(format!(
                    "cursor ({}, {}) lies outside the {}-cell grid",
                    c.row,
                    c.col,
                    self.flat.n()
                ))
            })
    }

    /// Flat index the inner environment should receive for `action`.
    pub fn target_index(&self, action: u32) -> Result<u32> {
        let direction = Direction::try_from(action)?;
        let current = self.current_index()?;
        let next = current + direction.offset(self.width() as i64);
        if self.flat.contains_index(next) {
            Ok(next as u32)
        } else {
            debug!("{direction:?} from {current} leaves the grid; staying");
            Ok(current as u32)
        }
    }

    pub fn inner(&self) -> &E { &self.inner }
    pub fn inner_mut(&mut self) -> &mut E { &mut self.inner }
    pub fn into_inner(self) -> E { self.inner }
}

impl<E: Env<Act = u32> + CursorGrid> Env for MovingActionWrapper<E> {
    type Obs = E::Obs;
    type Act = u32;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> { self.inner.reset(seed) }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let next = self.target_index(action)?;
        self.inner.step(next)
    }

    fn action_space(&self) -> &ActionSpace { &self.action_space }
    fn observation_space(&self) -> &ArrayBoxSpace { self.inner.observation_space() }
    fn render(&self) -> Option<RenderFrame> { self.inner.render() }
    fn close(&mut self) { self.inner.close() }
}

impl<E: CursorGrid> CursorGrid for MovingActionWrapper<E> {
    fn page_size(&self) -> (u32, u32) { self.inner.page_size() }
    fn cursor(&self) -> Cursor { self.inner.cursor() }
}
