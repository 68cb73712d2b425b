/// Entity data types and tuning constants.
///
/// Mostly plain data; the only behaviour here is what a single entity can do
/// on its own (an enemy re-arming its bullet, a patrol taking one step).

use std::ops::{BitOr, BitOrAssign};

use crate::sprite::{Image, Sprite};

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Velocity added per frame for each held direction.
pub const THRUST_IMPULSE: f32 = 5.1;
/// Player bullet climb per frame.
pub const BULLET_STEP: f32 = 3.0;
pub const CRATE_FALL_STEP: f32 = 2.5;
pub const PICKUP_FALL_STEP: f32 = 2.7;
pub const ENEMY_DESCENT_STEP: f32 = 1.5;
pub const ENEMY_BULLET_STEP: f32 = 2.5;
pub const PATROL_STEP: f32 = 1.2;
/// Enemies descend until they pass this row, then start firing and patrolling.
pub const ENEMY_FIRE_LINE: f32 = 200.0;

pub const CRATE_POINTS: u32 = 10;
pub const ENEMY_POINTS: u32 = 30;
pub const START_LIVES: i32 = 3;

pub const CRATE_PAIRS: usize = 4;
pub const PICKUP_COUNT: usize = 2;
pub const ENEMY_COUNT: usize = 2;
pub const EXPLOSION_FRAMES: usize = 15;

/// Respawn band above the top edge.
pub const RESPAWN_Y_MIN: i32 = -501;
pub const RESPAWN_Y_MAX: i32 = -1;
pub const CRATE_RESPAWN_X: (i32, i32) = (1, 1450);
pub const PICKUP_RESPAWN_X: (i32, i32) = (50, 1450);

pub const HEART_SLOTS: [(f32, f32); 3] = [(1450.0, 100.0), (1450.0, 175.0), (1450.0, 250.0)];

// ── Input ─────────────────────────────────────────────────────────────────────

/// Bitmask of held directions, combined with `|`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Direction(u8);

impl Direction {
    pub const NONE: Direction = Direction(0);
    pub const FORWARD: Direction = Direction(1);
    pub const BACKWARD: Direction = Direction(2);
    pub const LEFT: Direction = Direction(4);
    pub const RIGHT: Direction = Direction(8);

    pub fn from_bits(bits: u8) -> Self {
        Direction(bits & 0b1111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Direction) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Direction {
    type Output = Direction;

    fn bitor(self, rhs: Direction) -> Direction {
        Direction(self.0 | rhs.0)
    }
}

impl BitOrAssign for Direction {
    fn bitor_assign(&mut self, rhs: Direction) {
        self.0 |= rhs.0;
    }
}

/// Which way the player's ship art points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Facing {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Facing {
    /// 0 = up, 1 = right, 2 = down, 3 = left.
    pub fn index(self) -> u8 {
        match self {
            Facing::Up => 0,
            Facing::Right => 1,
            Facing::Down => 2,
            Facing::Left => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Facing::Up),
            1 => Some(Facing::Right),
            2 => Some(Facing::Down),
            3 => Some(Facing::Left),
            _ => None,
        }
    }

    pub fn image(self) -> Image {
        match self {
            Facing::Up => Image::ShipUp,
            Facing::Right => Image::ShipRight,
            Facing::Down => Image::ShipDown,
            Facing::Left => Image::ShipLeft,
        }
    }
}

/// Screen size in pixels, used for clamping and wrap-around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// The two horizontal patrol routes.  An enemy keeps the lane it was
/// spawned with for its whole life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatrolLane {
    /// Heads right to x = 700, then back to x = 100.
    Near,
    /// Heads left to x = 800, then back to x = 1400.
    Far,
}

impl PatrolLane {
    /// Even spawn slots take the near lane, odd ones the far lane.
    pub fn for_slot(slot: usize) -> Self {
        if slot % 2 == 0 {
            PatrolLane::Near
        } else {
            PatrolLane::Far
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Patrol {
    pub lane: PatrolLane,
    /// Set once the first turn point is reached, cleared at the second.
    pub reversed: bool,
}

impl Patrol {
    pub fn new(lane: PatrolLane) -> Self {
        Self { lane, reversed: false }
    }

    /// Move `x` one patrol step and flip direction at the lane's bounds.
    pub fn advance(&mut self, x: &mut f32) {
        match (self.lane, self.reversed) {
            (PatrolLane::Near, false) => {
                *x += PATROL_STEP;
                if *x >= 700.0 {
                    self.reversed = true;
                }
            }
            (PatrolLane::Near, true) => {
                *x -= PATROL_STEP;
                if *x <= 100.0 {
                    self.reversed = false;
                }
            }
            (PatrolLane::Far, false) => {
                *x -= PATROL_STEP;
                if *x <= 800.0 {
                    self.reversed = true;
                }
            }
            (PatrolLane::Far, true) => {
                *x += PATROL_STEP;
                if *x >= 1400.0 {
                    self.reversed = false;
                }
            }
        }
    }
}

/// An enemy ship and the one bullet it owns.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyCraft {
    pub ship: Sprite,
    pub bullet: Sprite,
    pub patrol: Patrol,
}

impl EnemyCraft {
    pub fn new(slot: usize) -> Self {
        Self {
            ship: Sprite::new(Image::EnemyShip),
            bullet: Sprite::new(Image::Bullet),
            patrol: Patrol::new(PatrolLane::for_slot(slot)),
        }
    }

    /// Put the bullet back under the ship's nose.
    pub fn rearm(&mut self) {
        self.bullet.position.x = self.ship.position.x;
        self.bullet.position.y = self.ship.position.y + self.ship.height() / 2.0;
    }

    pub fn has_passed_fire_line(&self) -> bool {
        self.ship.position.y > ENEMY_FIRE_LINE
    }
}
