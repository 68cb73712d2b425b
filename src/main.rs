mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use space_shooter::audio::{SoundCue, SoundSink};
use space_shooter::config::GameConfig;
use space_shooter::entities::{Direction, Facing};
use space_shooter::PlayerEntity;

#[derive(Parser)]
#[command(name = "space_shooter")]
#[command(about = "Arcade space shooter in the terminal")]
struct Args {
    /// JSON config file; missing fields fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixed RNG seed, overrides the config file
    #[arg(long)]
    seed: Option<u64>,
    /// Where log output goes (the terminal is busy drawing)
    #[arg(long, default_value = "space_shooter.log")]
    log_file: PathBuf,
}

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// Min frames between shots while Space is held.
const SHOOT_COOLDOWN: u32 = 8;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

/// Velocity kept per frame while no direction is held.
const DRIFT_DAMPING: f32 = 0.96;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

const UP_KEYS: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN_KEYS: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

fn facing_for(code: &KeyCode) -> Option<Facing> {
    if UP_KEYS.contains(code) {
        Some(Facing::Up)
    } else if RIGHT_KEYS.contains(code) {
        Some(Facing::Right)
    } else if DOWN_KEYS.contains(code) {
        Some(Facing::Down)
    } else if LEFT_KEYS.contains(code) {
        Some(Facing::Left)
    } else {
        None
    }
}

// ── Sound ─────────────────────────────────────────────────────────────────────

/// Terminals have no mixer; cues are logged, and explosions ring the bell.
struct TerminalSound;

impl SoundSink for TerminalSound {
    fn play(&mut self, cue: SoundCue) {
        debug!(cue = cue.name(), "sound cue");
        if cue == SoundCue::Explosion {
            let mut out = stdout();
            let _ = out.write_all(b"\x07");
        }
    }
}

// ── High-score persistence ────────────────────────────────────────────────────

fn load_high_score(path: &Path) -> u32 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(path: &Path, score: u32) {
    if let Err(err) = std::fs::write(path, score.to_string()) {
        warn!(path = %path.display(), "could not save high score: {err}");
    }
}

// ── Input channel ─────────────────────────────────────────────────────────────

enum Input {
    Key(KeyEvent),
    Idle,
    Closed,
}

/// Block until the next key event. `None` once the input thread is gone.
fn wait_key(rx: &mpsc::Receiver<Event>) -> Option<KeyEvent> {
    loop {
        match rx.recv() {
            Ok(Event::Key(key)) => return Some(key),
            Ok(_) => continue,
            Err(_) => return None,
        }
    }
}

/// Next queued key event without blocking; non-key events are skipped.
fn poll_input(rx: &mpsc::Receiver<Event>) -> Input {
    loop {
        match rx.try_recv() {
            Ok(Event::Key(key)) => return Input::Key(key),
            Ok(_) => continue,
            Err(mpsc::TryRecvError::Empty) => return Input::Idle,
            Err(mpsc::TryRecvError::Disconnected) => return Input::Closed,
        }
    }
}

// ── Title screen ──────────────────────────────────────────────────────────────

enum TitleResult {
    Start,
    Quit,
}

fn show_title<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    high_score: u32,
) -> std::io::Result<TitleResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  SPACE  SHOOTER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(4),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if high_score > 0 {
        let hs_str = format!("Best Score: {}", high_score);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hs_str.chars().count() as u16 / 2),
            cy.saturating_sub(3),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs_str))?;
    }

    let legend: &[(&str, Color, &str)] = &[
        ("(@)", Color::DarkYellow, " asteroid   +10"),
        ("«▼»", Color::Green, " enemy      +30"),
        ("♥", Color::Magenta, "   extra life"),
    ];
    for (i, (sym, color, desc)) in legend.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(1) + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*desc))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("SPACE : Start        Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        let Some(KeyEvent { code, kind, .. }) = wait_key(rx) else {
            warn!("input thread stopped on the title screen");
            return Ok(TitleResult::Quit);
        };
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Char(' ') | KeyCode::Enter => return Ok(TitleResult::Start),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(TitleResult::Quit);
            }
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn new_round(config: &GameConfig, rng: &mut StdRng) -> PlayerEntity {
    let mut player = PlayerEntity::new(config.screen());
    player.scatter_crates(rng);
    player.scatter_pickups(rng);
    player
}

/// One frame of game rules, in the order the playfield expects them.
fn step(player: &mut PlayerEntity, directions: Direction, dt: f32, rng: &mut StdRng) {
    let mut sound = TerminalSound;

    player.move_ship(directions, rng);
    if directions.is_empty() {
        *player.velocity_mut() *= DRIFT_DAMPING;
    }
    player.update(dt, &mut sound);

    player.bullet_crate_collision();
    player.bullet_enemy_collision();
    player.lives_collision();

    if !player.is_exploding() {
        let hit = player.crate_collision()
            || player.enemy_bullet_collision()
            || player.enemy_ship_collision();
        if hit {
            player.explode(&mut sound);
        }
    }
    player.advance_explosion();

    if !player.enemies_active() && player.crates().is_empty() {
        player.spawn_enemies();
    }
}

/// Returns `true` → quit program,  `false` → back to the title screen.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key, and all keys still inside
/// `HOLD_WINDOW` act together each frame, so thrust and fire combine.
fn game_loop<W: Write>(
    out: &mut W,
    player: &mut PlayerEntity,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    frame_budget: Duration,
    high_score: u32,
) -> std::io::Result<bool> {
    let dt = frame_budget.as_secs_f32();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut shoot_cooldown: u32 = 0;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        loop {
            let KeyEvent { code, kind, modifiers, .. } = match poll_input(rx) {
                Input::Key(key) => key,
                Input::Idle => break,
                Input::Closed => {
                    warn!("input thread stopped mid-round");
                    return Ok(true);
                }
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(true);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if player.is_game_over() => {
                            return Ok(false);
                        }
                        _ => {
                            if let Some(facing) = facing_for(&code) {
                                player.set_facing(facing);
                            }
                        }
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if !player.is_game_over() {
            let mut directions = Direction::NONE;
            if any_held(&key_frame, &UP_KEYS, frame) {
                directions |= Direction::FORWARD;
            }
            if any_held(&key_frame, &DOWN_KEYS, frame) {
                directions |= Direction::BACKWARD;
            }
            if any_held(&key_frame, &LEFT_KEYS, frame) {
                directions |= Direction::LEFT;
            }
            if any_held(&key_frame, &RIGHT_KEYS, frame) {
                directions |= Direction::RIGHT;
            }

            if shoot_cooldown == 0
                && !player.is_exploding()
                && is_held(&key_frame, &KeyCode::Char(' '), frame)
            {
                player.shoot();
                shoot_cooldown = SHOOT_COOLDOWN;
            }
            shoot_cooldown = shoot_cooldown.saturating_sub(1);

            step(player, directions, dt, rng);
        }

        display::render(out, player, high_score)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    info!(?config, "starting space shooter");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("cannot enter raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ghostty / kitty-protocol terminals report key releases; others fall
    // back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal session failed")
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let score_path = config.high_score_file();
    let mut high_score = load_high_score(&score_path);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame_budget = Duration::from_millis(config.frame_millis);

    loop {
        match show_title(out, rx, high_score)? {
            TitleResult::Quit => break,
            TitleResult::Start => {
                let mut player = new_round(config, &mut rng);
                let quit = game_loop(out, &mut player, rx, &mut rng, frame_budget, high_score)?;
                info!(score = player.score(), lives = player.lives(), "round ended");

                if player.score() > high_score {
                    high_score = player.score();
                    save_high_score(&score_path, high_score);
                }

                if quit {
                    break;
                }
            }
        }
    }
    Ok(())
}
