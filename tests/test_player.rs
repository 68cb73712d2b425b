use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_shooter::audio::{CueLog, EngineState, SoundCue};
use space_shooter::entities::{Direction, Facing, GameStatus, PatrolLane, ScreenSize};
use space_shooter::sprite::{Canvas, Image};
use space_shooter::PlayerEntity;

fn make_player() -> PlayerEntity {
    let mut p = PlayerEntity::new(ScreenSize::default()); // 1600×900
    *p.position_mut() = Vec2::new(400.0, 300.0);
    p
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[derive(Default)]
struct RecordingCanvas {
    blits: Vec<(Image, Vec2, usize)>,
}

impl Canvas for RecordingCanvas {
    fn blit(&mut self, image: Image, centre: Vec2, frame: usize) {
        self.blits.push((image, centre, frame));
    }
}

// ── construction ──────────────────────────────────────────────────────────────

#[test]
fn new_player_pools() {
    let p = PlayerEntity::new(ScreenSize::default());
    assert_eq!(p.crates().len(), 8);
    assert_eq!(p.pickups().len(), 2);
    assert_eq!(p.enemies().len(), 2);
    assert_eq!(p.lives(), 3);
    assert_eq!(p.score(), 0);
    assert_eq!(p.status(), GameStatus::Playing);
    assert!(!p.bullet_active());
    assert!(!p.enemies_active());
    assert_eq!(p.engine().state(), EngineState::Stopped);
}

#[test]
fn crates_alternate_big_and_medium() {
    let p = PlayerEntity::new(ScreenSize::default());
    let images: Vec<Image> = p.crates().iter().map(|c| c.image()).collect();
    for pair in images.chunks(2) {
        assert_eq!(pair.to_vec(), vec![Image::BigAsteroid, Image::MediumAsteroid]);
    }
}

#[test]
fn hearts_are_placed_full() {
    let p = PlayerEntity::new(ScreenSize::default());
    let hearts = p.hearts();
    assert_eq!(hearts[0].position, Vec2::new(1450.0, 100.0));
    assert_eq!(hearts[1].position, Vec2::new(1450.0, 175.0));
    assert_eq!(hearts[2].position, Vec2::new(1450.0, 250.0));
    assert!(hearts.iter().all(|h| h.image() == Image::Heart));
}

#[test]
fn scatter_places_objects_above_the_screen() {
    let mut p = make_player();
    let mut rng = seeded_rng();
    p.scatter_crates(&mut rng);
    p.scatter_pickups(&mut rng);
    for c in p.crates() {
        assert!((-501.0..=-1.0).contains(&c.position.y));
        assert!((1.0..=1450.0).contains(&c.position.x));
    }
    for l in p.pickups() {
        assert!((-501.0..=-1.0).contains(&l.position.y));
        assert!((50.0..=1450.0).contains(&l.position.x));
    }
}

// ── facing ────────────────────────────────────────────────────────────────────

#[test]
fn set_facing_swaps_ship_image() {
    let mut p = make_player();
    assert_eq!(p.facing(), Facing::Up);
    p.set_facing(Facing::Right);
    assert_eq!(p.facing().index(), 1);
    assert_eq!(p.ship().image(), Image::ShipRight);
    p.set_facing(Facing::Left);
    assert_eq!(p.ship().image(), Image::ShipLeft);
}

// ── move_ship — thrust & clamping ─────────────────────────────────────────────

#[test]
fn thrust_accumulates_without_decay() {
    let mut p = make_player();
    let mut rng = seeded_rng();
    p.move_ship(Direction::LEFT | Direction::FORWARD, &mut rng);
    p.move_ship(Direction::LEFT | Direction::FORWARD, &mut rng);
    assert!(close(p.velocity().x, -10.2));
    assert!(close(p.velocity().y, -10.2));
    p.move_ship(Direction::NONE, &mut rng);
    assert!(close(p.velocity().x, -10.2));
}

#[test]
fn opposite_directions_cancel() {
    let mut p = make_player();
    p.move_ship(Direction::LEFT | Direction::RIGHT, &mut seeded_rng());
    assert!(close(p.velocity().x, 0.0));
}

#[test]
fn clamp_left_edge() {
    let mut p = make_player();
    *p.position_mut() = Vec2::new(10.0, 300.0);
    *p.velocity_mut() = Vec2::new(-50.0, 7.0);
    p.move_ship(Direction::NONE, &mut seeded_rng());
    assert_eq!(p.velocity(), Vec2::new(0.0, 7.0));
    assert_eq!(p.position().x, 11.0);
}

#[test]
fn clamp_right_edge() {
    let mut p = make_player();
    *p.position_mut() = Vec2::new(1590.0, 300.0); // > 1600 - 32
    *p.velocity_mut() = Vec2::new(50.0, 0.0);
    p.move_ship(Direction::NONE, &mut seeded_rng());
    assert_eq!(p.velocity().x, 0.0);
    assert_eq!(p.position().x, 1589.0);
}

#[test]
fn clamp_bottom_uses_full_height() {
    let mut p = make_player();
    // 900 - 64 = 836 is the limit; half height would allow 868
    *p.position_mut() = Vec2::new(400.0, 840.0);
    *p.velocity_mut() = Vec2::new(0.0, 20.0);
    p.move_ship(Direction::NONE, &mut seeded_rng());
    assert_eq!(p.velocity().y, 0.0);
    assert_eq!(p.position().y, 839.0);
}

#[test]
fn clamp_top_uses_half_height() {
    let mut p = make_player();
    *p.position_mut() = Vec2::new(400.0, 20.0);
    *p.velocity_mut() = Vec2::new(0.0, -20.0);
    p.move_ship(Direction::NONE, &mut seeded_rng());
    assert_eq!(p.velocity().y, 0.0);
    assert_eq!(p.position().y, 21.0);
}

#[test]
fn impulse_applies_after_clamp() {
    let mut p = make_player();
    *p.position_mut() = Vec2::new(10.0, 300.0);
    p.move_ship(Direction::LEFT, &mut seeded_rng());
    assert!(close(p.velocity().x, -5.1));
}

#[test]
fn screen_size_can_change() {
    let mut p = make_player();
    p.set_screen(ScreenSize { width: 500.0, height: 400.0 });
    *p.position_mut() = Vec2::new(480.0, 300.0); // > 500 - 32
    p.move_ship(Direction::NONE, &mut seeded_rng());
    assert_eq!(p.position().x, 479.0);
}

// ── shoot ─────────────────────────────────────────────────────────────────────

#[test]
fn shoot_from_top_of_ship_then_climb() {
    let mut p = make_player();
    p.shoot();
    assert!(p.bullet_active());
    assert_eq!(p.bullet().position, Vec2::new(400.0, 268.0));

    p.move_ship(Direction::NONE, &mut seeded_rng());
    assert_eq!(p.bullet().position, Vec2::new(400.0, 265.0));
}

#[test]
fn bullet_x_does_not_follow_the_ship() {
    let mut p = make_player();
    p.shoot();
    *p.position_mut() = Vec2::new(600.0, 300.0);
    p.move_ship(Direction::NONE, &mut seeded_rng());
    assert_eq!(p.bullet().position.x, 400.0);
}

#[test]
fn bullet_keeps_climbing_above_the_screen() {
    let mut p = make_player();
    *p.position_mut() = Vec2::new(400.0, 40.0);
    p.shoot(); // y = 8
    let mut rng = seeded_rng();
    for _ in 0..40 {
        p.move_ship(Direction::NONE, &mut rng);
    }
    // 8 - 120, well past the top edge
    assert!(p.bullet_active());
    assert!(close(p.bullet().position.y, -112.0));
}

#[test]
fn bullet_above_the_screen_still_hits_waiting_crates() {
    let mut p = make_player();
    *p.position_mut() = Vec2::new(400.0, 40.0);
    p.shoot();
    let mut rng = seeded_rng();
    for _ in 0..40 {
        p.move_ship(Direction::NONE, &mut rng);
    }
    p.crates_mut()[0].position = Vec2::new(400.0, -100.0);
    assert_eq!(p.bullet_crate_collision(), 1);
    assert_eq!(p.score(), 10);
    assert_eq!(p.crates().len(), 7);
}

#[test]
fn inactive_bullet_does_not_move() {
    let mut p = make_player();
    let before = p.bullet().position;
    p.move_ship(Direction::NONE, &mut seeded_rng());
    assert_eq!(p.bullet().position, before);
}

// ── move_ship — scrolling objects ─────────────────────────────────────────────

#[test]
fn crates_fall_two_and_a_half_per_frame() {
    let mut p = make_player();
    p.crates_mut()[0].position = Vec2::new(300.0, 100.0);
    p.move_ship(Direction::NONE, &mut seeded_rng());
    assert_eq!(p.crates()[0].position, Vec2::new(300.0, 102.5));
}

#[test]
fn pickups_fall_faster_than_crates() {
    let mut p = make_player();
    p.pickups_mut()[0].position = Vec2::new(300.0, 100.0);
    p.move_ship(Direction::NONE, &mut seeded_rng());
    assert!(close(p.pickups()[0].position.y, 102.7));
}

#[test]
fn crate_past_threshold_wraps_to_top() {
    let mut p = make_player();
    // big asteroid: threshold 900 - 96 = 804
    p.crates_mut()[0].position = Vec2::new(300.0, 803.0);
    p.move_ship(Direction::NONE, &mut seeded_rng());
    let c = &p.crates()[0];
    assert!((-501.0..=-1.0).contains(&c.position.y));
    assert!((1.0..=1450.0).contains(&c.position.x));
}

#[test]
fn crate_at_threshold_does_not_wrap_yet() {
    let mut p = make_player();
    p.crates_mut()[0].position = Vec2::new(300.0, 801.5);
    p.move_ship(Direction::NONE, &mut seeded_rng());
    assert_eq!(p.crates()[0].position.y, 804.0);
}

#[test]
fn scrolling_objects_never_pass_the_bottom() {
    let mut p = make_player();
    let mut rng = seeded_rng();
    p.scatter_crates(&mut rng);
    p.scatter_pickups(&mut rng);
    for _ in 0..2_000 {
        p.move_ship(Direction::NONE, &mut rng);
        for s in p.crates().iter().chain(p.pickups()) {
            assert!(s.position.y <= 900.0 - s.height());
        }
    }
}

#[test]
fn pickup_wrap_respects_its_x_band() {
    let mut p = make_player();
    let mut rng = seeded_rng();
    for _ in 0..50 {
        p.pickups_mut()[0].position = Vec2::new(300.0, 880.0);
        p.move_ship(Direction::NONE, &mut rng);
        let x = p.pickups()[0].position.x;
        assert!((50.0..=1450.0).contains(&x));
    }
}

// ── enemies ───────────────────────────────────────────────────────────────────

#[test]
fn enemies_idle_until_spawned() {
    let mut p = make_player();
    let before: Vec<Vec2> = p.enemies().iter().map(|e| e.ship.position).collect();
    p.move_ship(Direction::NONE, &mut seeded_rng());
    let after: Vec<Vec2> = p.enemies().iter().map(|e| e.ship.position).collect();
    assert_eq!(before, after);
}

#[test]
fn spawn_enemies_places_wave_above_screen() {
    let mut p = make_player();
    p.spawn_enemies();
    assert!(p.enemies_active());
    assert_eq!(p.enemies()[0].ship.position, Vec2::new(300.0, -100.0));
    assert_eq!(p.enemies()[1].ship.position, Vec2::new(1200.0, -100.0));
    assert_eq!(p.enemies()[0].patrol.lane, PatrolLane::Near);
    assert_eq!(p.enemies()[1].patrol.lane, PatrolLane::Far);
}

#[test]
fn descending_enemy_carries_its_bullet() {
    let mut p = make_player();
    p.spawn_enemies();
    p.move_ship(Direction::NONE, &mut seeded_rng());
    let e = &p.enemies()[0];
    assert_eq!(e.ship.position, Vec2::new(300.0, -98.5));
    assert_eq!(e.bullet.position, Vec2::new(300.0, -66.5));
    assert!(!p.enemy_bullets_active());
}

#[test]
fn enemies_open_fire_past_the_fire_line() {
    let mut p = make_player();
    p.spawn_enemies();
    let mut rng = seeded_rng();
    // -100 + 1.5·201 = 201.5
    for _ in 0..201 {
        p.move_ship(Direction::NONE, &mut rng);
    }
    assert_eq!(p.enemies()[0].ship.position.y, 201.5);
    assert!(!p.enemy_bullets_active());
    let bullet_y = p.enemies()[0].bullet.position.y;

    p.move_ship(Direction::NONE, &mut rng);
    assert!(p.enemy_bullets_active());
    let e0 = &p.enemies()[0];
    let e1 = &p.enemies()[1];
    assert_eq!(e0.ship.position.y, 201.5);
    assert_eq!(e0.bullet.position.y, bullet_y + 2.5);
    assert!(close(e0.ship.position.x, 301.2));
    assert!(close(e1.ship.position.x, 1198.8));
}

#[test]
fn enemy_bullet_loops_back_to_its_ship() {
    let mut p = make_player();
    p.spawn_enemies();
    p.enemies_mut()[0].ship.position = Vec2::new(400.0, 250.0);
    p.enemies_mut()[0].bullet.position = Vec2::new(400.0, 891.0); // limit 900 - 8
    p.move_ship(Direction::NONE, &mut seeded_rng());
    let e = &p.enemies()[0];
    assert_eq!(e.bullet.position.y, 250.0 + 32.0);
    assert_eq!(e.bullet.position.x, 400.0);
}

#[test]
fn each_enemy_turns_on_its_own() {
    let mut p = make_player();
    p.spawn_enemies();
    p.enemies_mut()[0].ship.position = Vec2::new(699.5, 250.0);
    p.enemies_mut()[1].ship.position = Vec2::new(1000.0, 250.0);
    let mut rng = seeded_rng();

    p.move_ship(Direction::NONE, &mut rng);
    assert!(p.enemies()[0].patrol.reversed);
    assert!(!p.enemies()[1].patrol.reversed);

    p.move_ship(Direction::NONE, &mut rng);
    assert!(close(p.enemies()[0].ship.position.x, 699.5));
    // the far-lane enemy keeps heading left
    assert!(close(p.enemies()[1].ship.position.x, 997.6));
}

// ── update & engine hum ───────────────────────────────────────────────────────

#[test]
fn update_integrates_velocity() {
    let mut p = make_player();
    let mut sink = CueLog::default();
    *p.velocity_mut() = Vec2::new(40.0, 0.0);
    p.update(0.5, &mut sink);
    assert_eq!(p.position(), Vec2::new(420.0, 300.0));
    assert_eq!(sink.cues, vec![SoundCue::JetStart]);
    assert_eq!(p.engine().state(), EngineState::Running);
}

#[test]
fn slow_ship_stays_quiet() {
    let mut p = make_player();
    let mut sink = CueLog::default();
    *p.velocity_mut() = Vec2::new(30.0, 0.0);
    for _ in 0..60 {
        p.update(0.1, &mut sink);
    }
    assert!(sink.cues.is_empty());
}

// ── explosion, lives & game over ──────────────────────────────────────────────

#[test]
fn explode_costs_a_life_and_empties_a_heart() {
    let mut p = make_player();
    let mut sink = CueLog::default();
    let status = p.explode(&mut sink);
    assert_eq!(status, GameStatus::Playing);
    assert_eq!(p.lives(), 2);
    assert!(p.is_exploding());
    assert_eq!(p.explosion().sprite.position, p.position());
    assert_eq!(p.explosion().frame(), 0);
    assert_eq!(p.hearts()[0].image(), Image::HeartEmpty);
    assert_eq!(p.hearts()[1].image(), Image::Heart);
    assert_eq!(sink.cues, vec![SoundCue::Explosion]);
}

#[test]
fn explode_at_two_lives_empties_first_heart_slot_one() {
    let mut p = make_player();
    let mut sink = CueLog::default();
    p.explode(&mut sink);
    assert_eq!(p.lives(), 2);
    p.explode(&mut sink);
    assert_eq!(p.lives(), 1);
    assert_eq!(p.hearts()[1].image(), Image::HeartEmpty);
    assert_eq!(p.hearts()[2].image(), Image::Heart);
}

#[test]
fn explosion_runs_its_frames_then_halts_ship() {
    let mut p = make_player();
    let mut sink = CueLog::default();
    *p.velocity_mut() = Vec2::new(60.0, 0.0);
    p.update(0.01, &mut sink);
    assert_eq!(p.engine().state(), EngineState::Running);

    p.explode(&mut sink);
    let frames = p.explosion().frame_count();
    assert_eq!(frames, 15);
    for i in 1..frames {
        assert!(p.advance_explosion(), "frame {i} should still be playing");
        assert_eq!(p.explosion().frame(), i - 1);
    }
    assert!(!p.advance_explosion());
    assert!(!p.is_exploding());
    assert_eq!(p.velocity(), Vec2::ZERO);
    assert_eq!(p.engine().state(), EngineState::Stopped);
}

#[test]
fn advance_without_explosion_is_a_no_op() {
    let mut p = make_player();
    *p.velocity_mut() = Vec2::new(5.0, 5.0);
    assert!(p.advance_explosion());
    assert_eq!(p.velocity(), Vec2::new(5.0, 5.0));
}

#[test]
fn fourth_hit_is_game_over() {
    let mut p = make_player();
    let mut sink = CueLog::default();
    assert_eq!(p.explode(&mut sink), GameStatus::Playing);
    assert_eq!(p.explode(&mut sink), GameStatus::Playing);
    assert_eq!(p.explode(&mut sink), GameStatus::Playing);
    assert_eq!(p.lives(), 0);
    assert!(p.hearts().iter().all(|h| h.image() == Image::HeartEmpty));
    assert!(!p.is_game_over());

    assert_eq!(p.explode(&mut sink), GameStatus::GameOver);
    assert_eq!(p.lives(), -1);
    assert!(p.is_game_over());
}

#[test]
fn hits_after_game_over_change_nothing() {
    let mut p = make_player();
    let mut sink = CueLog::default();
    for _ in 0..4 {
        p.explode(&mut sink);
    }
    let cues = sink.cues.len();
    assert_eq!(p.explode(&mut sink), GameStatus::GameOver);
    assert_eq!(p.lives(), -1);
    assert_eq!(sink.cues.len(), cues);
}

// ── draw ──────────────────────────────────────────────────────────────────────

#[test]
fn draw_skips_inactive_objects() {
    let p = make_player();
    let mut canvas = RecordingCanvas::default();
    p.draw(&mut canvas);
    // ship + 8 crates + 2 pickups + 3 hearts
    assert_eq!(canvas.blits.len(), 14);
    assert_eq!(canvas.blits[0].0, Image::ShipUp);
    assert!(!canvas.blits.iter().any(|b| b.0 == Image::Bullet));
    assert!(!canvas.blits.iter().any(|b| b.0 == Image::EnemyShip));
}

#[test]
fn draw_shows_bullet_enemies_and_explosion() {
    let mut p = make_player();
    p.shoot();
    p.spawn_enemies();
    p.explode(&mut CueLog::default());
    let mut canvas = RecordingCanvas::default();
    p.draw(&mut canvas);

    assert_eq!(canvas.blits[0].0, Image::Explosion);
    assert!(!canvas.blits.iter().any(|b| b.0 == Image::ShipUp));
    let bullets = canvas.blits.iter().filter(|b| b.0 == Image::Bullet).count();
    assert_eq!(bullets, 1); // enemy bullets are not live yet
    let enemies = canvas.blits.iter().filter(|b| b.0 == Image::EnemyShip).count();
    assert_eq!(enemies, 2);
    let hud: Vec<Image> = canvas.blits[canvas.blits.len() - 3..].iter().map(|b| b.0).collect();
    assert_eq!(hud, vec![Image::HeartEmpty, Image::Heart, Image::Heart]);
}
