/// Axis-aligned bounding-box collisions and their consequences.
///
/// Boxes are centred on the sprite position and extend half the image size
/// in each direction.  Bounds are inclusive: touching edges collide.
///
/// Handlers that remove objects mark first and compact afterwards, so a
/// removal never shifts an unchecked object past the scan.

use tracing::debug;

use crate::entities::{CRATE_POINTS, ENEMY_POINTS};
use crate::player::PlayerEntity;
use crate::sprite::{Image, Sprite};

/// True when the boxes of `a` and `b` intersect on both axes.
pub fn overlaps(a: &Sprite, b: &Sprite) -> bool {
    let (a_half_w, a_half_h) = (a.width() / 2.0, a.height() / 2.0);
    let (b_half_w, b_half_h) = (b.width() / 2.0, b.height() / 2.0);

    a.position.x + a_half_w >= b.position.x - b_half_w
        && a.position.x - a_half_w <= b.position.x + b_half_w
        && a.position.y + a_half_h >= b.position.y - b_half_h
        && a.position.y - a_half_h <= b.position.y + b_half_h
}

impl PlayerEntity {
    /// Destroy every asteroid the bullet touches, 10 points each.
    /// Returns how many were destroyed.
    pub fn bullet_crate_collision(&mut self) -> usize {
        if !self.bullet_active {
            return 0;
        }

        let bullet = &self.bullet;
        let before = self.crates.len();
        self.crates.retain(|crate_| !overlaps(bullet, crate_));
        let destroyed = before - self.crates.len();

        if destroyed > 0 {
            self.score += CRATE_POINTS * destroyed as u32;
            debug!(destroyed, score = self.score, "bullet hit asteroid");
        }
        destroyed
    }

    /// Destroy every enemy ship the bullet touches, together with the
    /// bullet that ship owns, 30 points each.  Returns how many were
    /// destroyed.
    pub fn bullet_enemy_collision(&mut self) -> usize {
        if !self.bullet_active || !self.enemies_active {
            return 0;
        }

        let bullet = &self.bullet;
        let before = self.enemies.len();
        self.enemies.retain(|enemy| !overlaps(bullet, &enemy.ship));
        let destroyed = before - self.enemies.len();

        if destroyed > 0 {
            self.score += ENEMY_POINTS * destroyed as u32;
            debug!(destroyed, score = self.score, "bullet hit enemy");
        }
        destroyed
    }

    /// Collect every pickup touching the ship.  Each refills the highest
    /// empty heart; at full health the pickup is used up for nothing.
    pub fn lives_collision(&mut self) {
        let ship = &self.ship;
        let before = self.pickups.len();
        self.pickups.retain(|pickup| !overlaps(ship, pickup));
        let collected = before - self.pickups.len();

        for _ in 0..collected {
            let refilled = match self.lives {
                2 => Some(0),
                1 => Some(1),
                0 => Some(2),
                _ => None,
            };
            if let Some(slot) = refilled {
                self.hearts[slot].set_image(Image::Heart);
                self.lives += 1;
            }
            debug!(lives = self.lives, "life pickup collected");
        }
    }

    /// The ship ran into an asteroid.  The first one touched is destroyed.
    pub fn crate_collision(&mut self) -> bool {
        match self.crates.iter().position(|c| overlaps(&self.ship, c)) {
            Some(index) => {
                self.crates.remove(index);
                debug!(index, "ship hit asteroid");
                true
            }
            None => false,
        }
    }

    /// The ship was struck by an enemy bullet.  That bullet goes back to
    /// its owner.
    pub fn enemy_bullet_collision(&mut self) -> bool {
        if !self.enemy_bullets_active {
            return false;
        }
        let ship = &self.ship;
        match self.enemies.iter_mut().find(|e| overlaps(ship, &e.bullet)) {
            Some(enemy) => {
                enemy.rearm();
                debug!("ship hit by enemy bullet");
                true
            }
            None => false,
        }
    }

    /// The ship rammed an enemy.  The first enemy touched is destroyed
    /// along with its bullet.
    pub fn enemy_ship_collision(&mut self) -> bool {
        if !self.enemies_active {
            return false;
        }
        match self.enemies.iter().position(|e| overlaps(&self.ship, &e.ship)) {
            Some(index) => {
                self.enemies.remove(index);
                debug!(index, "ship rammed enemy");
                true
            }
            None => false,
        }
    }
}
