/// Rendering layer — all terminal I/O lives here.
///
/// The playfield is a scaled-down view of the logical screen: every sprite
/// centre is mapped to a terminal cell inside the border and drawn as a
/// short glyph.  No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;
use space_shooter::entities::ScreenSize;
use space_shooter::sprite::{Canvas, Image};
use space_shooter::PlayerEntity;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET: Color = Color::Cyan;
const C_BIG_ROCK: Color = Color::DarkYellow;
const C_MEDIUM_ROCK: Color = Color::Grey;
const C_PICKUP: Color = Color::Magenta;
const C_HEART_EMPTY: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

const EXPLOSION_GLYPHS: [&str; 5] = ["·", "*", "✶", "✷", "✹"];

fn glyph(image: Image, frame: usize) -> (&'static str, Color) {
    match image {
        Image::ShipUp => ("▲", C_PLAYER),
        Image::ShipRight => ("►", C_PLAYER),
        Image::ShipDown => ("▼", C_PLAYER),
        Image::ShipLeft => ("◄", C_PLAYER),
        Image::Bullet => ("║", C_BULLET),
        Image::BigAsteroid => ("(@)", C_BIG_ROCK),
        Image::MediumAsteroid => ("@", C_MEDIUM_ROCK),
        Image::EnemyShip => ("«▼»", C_ENEMY),
        Image::LifePickup => ("♥", C_PICKUP),
        Image::Heart => ("♥", C_HUD_LIVES),
        Image::HeartEmpty => ("♡", C_HEART_EMPTY),
        Image::Explosion => {
            let color = if frame % 2 == 0 { Color::Yellow } else { Color::Red };
            (EXPLOSION_GLYPHS[frame % EXPLOSION_GLYPHS.len()], color)
        }
    }
}

// ── Cell canvas ───────────────────────────────────────────────────────────────

/// Collects blits into a grid of terminal cells.  Rows 0–1 and the last two
/// rows are reserved for the HUD and border.
pub struct CellCanvas {
    cols: u16,
    rows: u16,
    screen: ScreenSize,
    cells: Vec<Option<(char, Color)>>,
}

impl CellCanvas {
    pub fn new(cols: u16, rows: u16, screen: ScreenSize) -> Self {
        Self {
            cols,
            rows,
            screen,
            cells: vec![None; cols as usize * rows as usize],
        }
    }

    /// Terminal cell for a logical screen position, if it lands inside the
    /// border.
    pub fn cell_for(&self, position: Vec2) -> Option<(u16, u16)> {
        let inner_w = self.cols.saturating_sub(2) as f32;
        let inner_h = self.rows.saturating_sub(4) as f32;
        if inner_w < 1.0 || inner_h < 1.0 || position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        let col = (position.x / self.screen.width * inner_w) as u16;
        let row = (position.y / self.screen.height * inner_h) as u16;
        if col as f32 >= inner_w || row as f32 >= inner_h {
            return None;
        }
        Some((col + 1, row + 2))
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<(char, Color)> {
        self.cells
            .get(row as usize * self.cols as usize + col as usize)
            .copied()
            .flatten()
    }

    fn put(&mut self, col: u16, row: u16, ch: char, color: Color) {
        if col == 0 || col + 1 >= self.cols {
            return;
        }
        let index = row as usize * self.cols as usize + col as usize;
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Some((ch, color));
        }
    }

    fn flush_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if let Some((ch, color)) = self.cell(col, row) {
                    out.queue(cursor::MoveTo(col, row))?;
                    out.queue(style::SetForegroundColor(color))?;
                    out.queue(Print(ch))?;
                }
            }
        }
        Ok(())
    }
}

impl Canvas for CellCanvas {
    fn blit(&mut self, image: Image, centre: Vec2, frame: usize) {
        let Some((col, row)) = self.cell_for(centre) else {
            return;
        };
        let (text, color) = glyph(image, frame);
        let half = text.chars().count() as u16 / 2;
        for (i, ch) in text.chars().enumerate() {
            self.put((col + i as u16).saturating_sub(half), row, ch, color);
        }
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    player: &PlayerEntity,
    high_score: u32,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, cols, rows)?;

    let mut canvas = CellCanvas::new(cols, rows, player.screen());
    player.draw(&mut canvas);
    canvas.flush_to(out)?;

    draw_hud(out, player, high_score)?;
    draw_controls_hint(out, rows)?;

    if player.is_game_over() {
        draw_game_over(out, player, high_score, cols, rows)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

/// Score line only; lives are shown by the heart sprites on the playfield.
fn draw_hud<W: Write>(out: &mut W, player: &PlayerEntity, high_score: u32) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if high_score > 0 {
        out.queue(Print(format!(
            "Score:{:>6}  Hi:{:>6}",
            player.score(),
            high_score.max(player.score())
        )))?;
    } else {
        out.queue(Print(format!("Score:{:>6}", player.score())))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Arrows / WASD : Thrust   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    player: &PlayerEntity,
    high_score: u32,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let score = player.score();
    let new_best = score > high_score;
    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", score)
    } else {
        format!("Best Score:  {:>6}", high_score)
    };

    let lines: [(String, Color); 6] = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Final Score: {:>6}", score), Color::Yellow),
        (best_line, if new_best { Color::Yellow } else { Color::DarkGrey }),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];

    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    Ok(())
}
