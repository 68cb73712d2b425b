/// The player aggregate: the ship plus every object the ship interacts with.
///
/// `PlayerEntity` owns its ship, bullet, asteroids, pickups, enemy wave,
/// hearts and explosion overlay by value.  The game loop drives it once per
/// frame with `move_ship`, `update`, the collision checks in
/// `crate::collision`, `advance_explosion` and finally `draw`.
///
/// Randomness and sound are injected so every rule can be tested with a
/// seeded RNG and a recording sink.

use glam::Vec2;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::audio::{EngineHum, SoundCue, SoundSink};
use crate::entities::{
    Direction, EnemyCraft, Facing, GameStatus, ScreenSize, BULLET_STEP, CRATE_PAIRS,
    CRATE_FALL_STEP, CRATE_RESPAWN_X, ENEMY_BULLET_STEP, ENEMY_COUNT, ENEMY_DESCENT_STEP,
    EXPLOSION_FRAMES, HEART_SLOTS, PICKUP_COUNT, PICKUP_FALL_STEP, PICKUP_RESPAWN_X,
    RESPAWN_Y_MAX, RESPAWN_Y_MIN, START_LIVES, THRUST_IMPULSE,
};
use crate::sprite::{AnimatedSprite, Canvas, Image, Sprite};

#[derive(Clone, Debug)]
pub struct PlayerEntity {
    pub(crate) ship: Sprite,
    pub(crate) facing: Facing,

    pub(crate) explosion: AnimatedSprite,
    pub(crate) explosion_active: bool,
    pub(crate) explosion_frame: usize,

    pub(crate) hearts: [Sprite; 3],

    pub(crate) bullet: Sprite,
    pub(crate) bullet_active: bool,

    pub(crate) crates: Vec<Sprite>,
    pub(crate) pickups: Vec<Sprite>,
    pub(crate) enemies: Vec<EnemyCraft>,
    pub(crate) enemies_active: bool,
    pub(crate) enemy_bullets_active: bool,

    pub(crate) lives: i32,
    pub(crate) score: u32,
    pub(crate) engine: EngineHum,
    pub(crate) status: GameStatus,
    pub(crate) screen: ScreenSize,
}

// ── Construction & layout ─────────────────────────────────────────────────────

impl PlayerEntity {
    /// Allocate every pooled object.  The ship starts centred near the
    /// bottom edge; asteroids and pickups sit at the origin until
    /// `scatter_crates` / `scatter_pickups` place them.
    pub fn new(screen: ScreenSize) -> Self {
        let mut ship = Sprite::new(Facing::Up.image());
        ship.position = Vec2::new(screen.width / 2.0, screen.height - 2.0 * ship.height());

        let crates = (0..CRATE_PAIRS)
            .flat_map(|_| [Sprite::new(Image::BigAsteroid), Sprite::new(Image::MediumAsteroid)])
            .collect();
        let pickups = (0..PICKUP_COUNT).map(|_| Sprite::new(Image::LifePickup)).collect();
        let enemies = (0..ENEMY_COUNT).map(EnemyCraft::new).collect();

        let mut player = Self {
            ship,
            facing: Facing::Up,
            explosion: AnimatedSprite::new(Image::Explosion, EXPLOSION_FRAMES),
            explosion_active: false,
            explosion_frame: 0,
            hearts: [
                Sprite::new(Image::Heart),
                Sprite::new(Image::Heart),
                Sprite::new(Image::Heart),
            ],
            bullet: Sprite::new(Image::Bullet),
            bullet_active: false,
            crates,
            pickups,
            enemies,
            enemies_active: false,
            enemy_bullets_active: false,
            lives: START_LIVES,
            score: 0,
            engine: EngineHum::default(),
            status: GameStatus::Playing,
            screen,
        };
        player.place_hearts();
        player
    }

    pub fn place_hearts(&mut self) {
        for (heart, &(x, y)) in self.hearts.iter_mut().zip(HEART_SLOTS.iter()) {
            heart.position = Vec2::new(x, y);
        }
    }

    /// Drop every remaining asteroid somewhere above the top edge.
    pub fn scatter_crates(&mut self, rng: &mut impl Rng) {
        for crate_ in &mut self.crates {
            respawn_above(crate_, CRATE_RESPAWN_X, rng);
        }
    }

    /// Drop every remaining life pickup somewhere above the top edge.
    pub fn scatter_pickups(&mut self, rng: &mut impl Rng) {
        for pickup in &mut self.pickups {
            respawn_above(pickup, PICKUP_RESPAWN_X, rng);
        }
    }

    /// Bring in the enemy wave: slot `i` enters at x = 300 + 900·i, just
    /// above the screen.
    pub fn spawn_enemies(&mut self) {
        self.enemies_active = true;
        for (slot, enemy) in self.enemies.iter_mut().enumerate() {
            enemy.ship.position = Vec2::new(300.0 + 900.0 * slot as f32, -100.0);
            enemy.rearm();
        }
        info!(count = self.enemies.len(), "enemy wave spawned");
    }

    /// Point the ship art in `facing`.
    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
        self.ship.set_image(facing.image());
    }

    pub fn set_screen(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }
}

// ── Per-frame stepping ────────────────────────────────────────────────────────

impl PlayerEntity {
    /// Integrate the ship and run the engine-hum state machine.
    pub fn update<S: SoundSink>(&mut self, dt: f32, sink: &mut S) {
        self.ship.update(dt);
        let speed = self.ship.velocity.length();
        self.engine.step(speed, dt, sink);
    }

    /// Advance every scrolling object one frame and apply the held
    /// directions as velocity impulses.
    pub fn move_ship(&mut self, directions: Direction, rng: &mut impl Rng) {
        self.clamp_ship();
        self.advance_bullet();
        self.advance_crates(rng);
        self.advance_pickups(rng);
        if self.enemies_active {
            self.advance_enemies();
        }

        let velocity = &mut self.ship.velocity;
        if directions.contains(Direction::LEFT) {
            velocity.x -= THRUST_IMPULSE;
        }
        if directions.contains(Direction::RIGHT) {
            velocity.x += THRUST_IMPULSE;
        }
        if directions.contains(Direction::FORWARD) {
            velocity.y -= THRUST_IMPULSE;
        }
        if directions.contains(Direction::BACKWARD) {
            velocity.y += THRUST_IMPULSE;
        }
    }

    /// Stop the ship at the screen edges, nudging it one pixel back in.
    /// The bottom edge keeps a full ship height of margin.
    fn clamp_ship(&mut self) {
        let half_w = self.ship.width() / 2.0;
        let half_h = self.ship.height() / 2.0;
        let full_h = self.ship.height();
        let ship = &mut self.ship;

        if ship.position.x < half_w {
            ship.velocity.x = 0.0;
            ship.position.x += 1.0;
        }
        if ship.position.x > self.screen.width - half_w {
            ship.velocity.x = 0.0;
            ship.position.x -= 1.0;
        }
        if ship.position.y < half_h {
            ship.velocity.y = 0.0;
            ship.position.y += 1.0;
        }
        if ship.position.y > self.screen.height - full_h {
            ship.velocity.y = 0.0;
            ship.position.y -= 1.0;
        }
    }

    fn advance_bullet(&mut self) {
        if !self.bullet_active {
            return;
        }
        self.bullet.position.y -= BULLET_STEP;
    }

    fn advance_crates(&mut self, rng: &mut impl Rng) {
        let floor = self.screen.height;
        for crate_ in &mut self.crates {
            crate_.position.y += CRATE_FALL_STEP;
            if crate_.position.y > floor - crate_.height() {
                respawn_above(crate_, CRATE_RESPAWN_X, rng);
            }
        }
    }

    fn advance_pickups(&mut self, rng: &mut impl Rng) {
        let floor = self.screen.height;
        for pickup in &mut self.pickups {
            pickup.position.y += PICKUP_FALL_STEP;
            if pickup.position.y > floor - pickup.height() {
                respawn_above(pickup, PICKUP_RESPAWN_X, rng);
            }
        }
    }

    /// Enemies descend with their bullet held under the nose.  Past the
    /// fire line they patrol sideways and loop their bullet down the screen.
    fn advance_enemies(&mut self) {
        let floor = self.screen.height;
        for enemy in &mut self.enemies {
            if !enemy.has_passed_fire_line() {
                enemy.ship.position.y += ENEMY_DESCENT_STEP;
                enemy.rearm();
                continue;
            }

            self.enemy_bullets_active = true;
            enemy.bullet.position.y += ENEMY_BULLET_STEP;
            if enemy.bullet.position.y > floor - enemy.bullet.height() / 2.0 {
                enemy.rearm();
            }
            enemy.patrol.advance(&mut enemy.ship.position.x);
        }
    }
}

// ── Combat, lives & explosion ─────────────────────────────────────────────────

impl PlayerEntity {
    /// Fire from the top of the ship.  Re-firing recalls the bullet.
    pub fn shoot(&mut self) {
        self.bullet.position = Vec2::new(
            self.ship.position.x,
            self.ship.position.y - self.ship.height() / 2.0,
        );
        self.bullet_active = true;
    }

    /// The ship was hit: start the explosion, lose a life and update the
    /// hearts.  Returns `GameOver` once the last life is gone.
    pub fn explode<S: SoundSink>(&mut self, sink: &mut S) -> GameStatus {
        if self.status == GameStatus::GameOver {
            return self.status;
        }

        self.explosion.sprite.position = self.ship.position;
        self.explosion.set_frame(0);
        self.explosion_frame = 0;
        sink.play(SoundCue::Explosion);
        self.explosion_active = true;
        self.lives -= 1;
        debug!(lives = self.lives, "ship destroyed");

        self.set_empty_heart()
    }

    /// Blank the heart matching the current life count; at -1 lives the
    /// game is over.
    pub fn set_empty_heart(&mut self) -> GameStatus {
        match self.lives {
            2 => self.hearts[0].set_image(Image::HeartEmpty),
            1 => self.hearts[1].set_image(Image::HeartEmpty),
            0 => self.hearts[2].set_image(Image::HeartEmpty),
            lives if lives < 0 => {
                if self.status != GameStatus::GameOver {
                    warn!(score = self.score, "game over");
                }
                self.status = GameStatus::GameOver;
            }
            _ => {}
        }
        self.status
    }

    /// Show the next explosion frame.  Returns `false` on the frame that
    /// finishes the animation (the ship is then halted and the engine
    /// silenced), `true` otherwise.
    pub fn advance_explosion(&mut self) -> bool {
        if !self.explosion_active {
            return true;
        }

        self.explosion.set_frame(self.explosion_frame);
        self.explosion_frame += 1;
        if self.explosion_frame == self.explosion.frame_count() {
            self.explosion_active = false;
            self.explosion_frame = 0;
            self.ship.velocity = Vec2::ZERO;
            self.engine.stop();
            debug!("explosion finished");
            return false;
        }
        true
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        if self.explosion_active {
            self.explosion.draw(canvas);
        } else {
            self.ship.draw(canvas);
        }

        for crate_ in &self.crates {
            crate_.draw(canvas);
        }
        for pickup in &self.pickups {
            pickup.draw(canvas);
        }
        if self.bullet_active {
            self.bullet.draw(canvas);
        }
        if self.enemies_active {
            for enemy in &self.enemies {
                enemy.ship.draw(canvas);
            }
        }
        if self.enemy_bullets_active {
            for enemy in &self.enemies {
                enemy.bullet.draw(canvas);
            }
        }
        for heart in &self.hearts {
            heart.draw(canvas);
        }
    }
}

// ── Accessors ─────────────────────────────────────────────────────────────────

impl PlayerEntity {
    pub fn position(&self) -> Vec2 {
        self.ship.position
    }

    pub fn position_mut(&mut self) -> &mut Vec2 {
        &mut self.ship.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.ship.velocity
    }

    pub fn velocity_mut(&mut self) -> &mut Vec2 {
        &mut self.ship.velocity
    }

    pub fn width(&self) -> f32 {
        self.ship.width()
    }

    pub fn height(&self) -> f32 {
        self.ship.height()
    }

    pub fn ship(&self) -> &Sprite {
        &self.ship
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn bullet(&self) -> &Sprite {
        &self.bullet
    }

    pub fn bullet_mut(&mut self) -> &mut Sprite {
        &mut self.bullet
    }

    pub fn bullet_active(&self) -> bool {
        self.bullet_active
    }

    pub fn crates(&self) -> &[Sprite] {
        &self.crates
    }

    /// Mutable view; the pool can be rearranged but never grown.
    pub fn crates_mut(&mut self) -> &mut [Sprite] {
        &mut self.crates
    }

    pub fn pickups(&self) -> &[Sprite] {
        &self.pickups
    }

    pub fn pickups_mut(&mut self) -> &mut [Sprite] {
        &mut self.pickups
    }

    pub fn enemies(&self) -> &[EnemyCraft] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [EnemyCraft] {
        &mut self.enemies
    }

    pub fn enemies_active(&self) -> bool {
        self.enemies_active
    }

    pub fn enemy_bullets_active(&self) -> bool {
        self.enemy_bullets_active
    }

    pub fn hearts(&self) -> &[Sprite; 3] {
        &self.hearts
    }

    pub fn engine(&self) -> &EngineHum {
        &self.engine
    }

    pub fn is_exploding(&self) -> bool {
        self.explosion_active
    }

    pub fn explosion(&self) -> &AnimatedSprite {
        &self.explosion
    }
}

fn respawn_above(sprite: &mut Sprite, x_range: (i32, i32), rng: &mut impl Rng) {
    sprite.position.y = rng.gen_range(RESPAWN_Y_MIN..=RESPAWN_Y_MAX) as f32;
    sprite.position.x = rng.gen_range(x_range.0..=x_range.1) as f32;
}
