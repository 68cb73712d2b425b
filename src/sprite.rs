/// Renderable objects — position, velocity and a bound image.
///
/// Nothing here knows how pixels reach a screen.  Drawing goes through the
/// `Canvas` trait so the game rules can be exercised without a terminal.

use glam::Vec2;

// ── Images ────────────────────────────────────────────────────────────────────

/// Every bitmap a sprite can be bound to.  The size of a sprite is the size
/// of its image, so swapping the image can change the collision box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Image {
    ShipUp,
    ShipRight,
    ShipDown,
    ShipLeft,
    Bullet,
    BigAsteroid,
    MediumAsteroid,
    EnemyShip,
    LifePickup,
    Heart,
    HeartEmpty,
    /// One 128×128 cell of the explosion strip.
    Explosion,
}

impl Image {
    /// Pixel size `(width, height)` of one frame of this image.
    pub fn size(self) -> (f32, f32) {
        match self {
            Image::ShipUp | Image::ShipRight | Image::ShipDown | Image::ShipLeft => (64.0, 64.0),
            Image::Bullet => (8.0, 16.0),
            Image::BigAsteroid => (96.0, 96.0),
            Image::MediumAsteroid => (64.0, 64.0),
            Image::EnemyShip => (64.0, 64.0),
            Image::LifePickup => (32.0, 32.0),
            Image::Heart | Image::HeartEmpty => (48.0, 48.0),
            Image::Explosion => (128.0, 128.0),
        }
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

/// Drawing surface.  `centre` is the sprite position; `frame` is always 0
/// for still images.
pub trait Canvas {
    fn blit(&mut self, image: Image, centre: Vec2, frame: usize);
}

// ── Sprite ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    /// Centre of the sprite in screen pixels.
    pub position: Vec2,
    /// Pixels per second, integrated by `update`.
    pub velocity: Vec2,
    image: Image,
}

impl Sprite {
    pub fn new(image: Image) -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            image,
        }
    }

    pub fn at(image: Image, x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::new(image)
        }
    }

    pub fn image(&self) -> Image {
        self.image
    }

    pub fn set_image(&mut self, image: Image) {
        self.image = image;
    }

    pub fn width(&self) -> f32 {
        self.image.size().0
    }

    pub fn height(&self) -> f32 {
        self.image.size().1
    }

    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        canvas.blit(self.image, self.position, 0);
    }
}

// ── AnimatedSprite ────────────────────────────────────────────────────────────

/// A sprite whose image is a horizontal strip of equally sized frames.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedSprite {
    pub sprite: Sprite,
    frame: usize,
    frame_count: usize,
}

impl AnimatedSprite {
    pub fn new(image: Image, frame_count: usize) -> Self {
        Self {
            sprite: Sprite::new(image),
            frame: 0,
            frame_count: frame_count.max(1),
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Select the frame to show.  Out-of-range indices hold the last frame.
    pub fn set_frame(&mut self, frame: usize) {
        self.frame = frame.min(self.frame_count - 1);
    }

    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        canvas.blit(self.sprite.image(), self.sprite.position, self.frame);
    }
}
