/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.  The 800×600 play surface is scaled onto
/// whatever grid the terminal currently offers.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_dodge::entities::{Entity, EntityKind, EntireGameStateInfo, GameStatus, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::Black;
const C_TEXT: Color = Color::White;
const C_PLAYER: Color = Color::Blue;
const C_ENEMY: Color = Color::Red;
const C_POWERUP: Color = Color::Green;

const BLOCK: &str = "█";

// ── Surface → terminal mapping ───────────────────────────────────────────────

/// Terminal grid the surface is drawn onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

/// Cell span covered by a rectangle, clipped to the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CellSpan {
    col: u16,
    row: u16,
    width: u16,
    height: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Viewport {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    fn col(&self, x: i32, surface_width: i32) -> i32 {
        (x as i64 * self.cols as i64).div_euclid(surface_width.max(1) as i64) as i32
    }

    fn row(&self, y: i32, surface_height: i32) -> i32 {
        (y as i64 * self.rows as i64).div_euclid(surface_height.max(1) as i64) as i32
    }

    /// Every sprite covers at least one cell so small ones never vanish.
    fn span(&self, rect: &Rect, surface_width: i32, surface_height: i32) -> Option<CellSpan> {
        let left = self.col(rect.left(), surface_width);
        let top = self.row(rect.top(), surface_height);
        let right = self.col(rect.right(), surface_width).max(left + 1);
        let bottom = self.row(rect.bottom(), surface_height).max(top + 1);

        let left = left.max(0);
        let top = top.max(0);
        let right = right.min(self.cols as i32);
        let bottom = bottom.min(self.rows as i32);
        if left >= right || top >= bottom {
            return None;
        }
        Some(CellSpan {
            col: left as u16,
            row: top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        })
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &EntireGameStateInfo,
    view: &Viewport,
) -> std::io::Result<()> {
    out.queue(style::SetBackgroundColor(C_BACKGROUND))?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for entity in &state.entities {
        draw_entity(out, entity, state, view)?;
    }

    draw_hud(out, state, view)?;
    if state.status == GameStatus::GameOver {
        draw_game_over(out, state, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_entity<W: Write>(
    out: &mut W,
    entity: &Entity,
    state: &EntireGameStateInfo,
    view: &Viewport,
) -> std::io::Result<()> {
    let Some(span) = view.span(&entity.rect, state.width, state.height) else {
        return Ok(());
    };
    let color = match entity.kind {
        EntityKind::Player => C_PLAYER,
        EntityKind::Enemy => C_ENEMY,
        EntityKind::Powerup => C_POWERUP,
    };
    out.queue(style::SetForegroundColor(color))?;
    let fill = BLOCK.repeat(span.width as usize);
    for row in span.row..span.row + span.height {
        out.queue(cursor::MoveTo(span.col, row))?;
        out.queue(Print(&fill))?;
    }
    Ok(())
}

// ── Text ──────────────────────────────────────────────────────────────────────

/// Draw `text` with its top-left corner at surface pixel (`x`, `y`).
fn draw_text_at<W: Write>(
    out: &mut W,
    text: &str,
    x: i32,
    y: i32,
    state: &EntireGameStateInfo,
    view: &Viewport,
) -> std::io::Result<()> {
    let col = view.col(x, state.width).clamp(0, view.cols as i32 - 1) as u16;
    let row = view.row(y, state.height).clamp(0, view.rows as i32 - 1) as u16;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_TEXT))?;
    out.queue(Print(text))?;
    Ok(())
}

/// Draw `text` horizontally centred on the grid at surface row `y`.
fn draw_centered<W: Write>(
    out: &mut W,
    text: &str,
    y: i32,
    state: &EntireGameStateInfo,
    view: &Viewport,
) -> std::io::Result<()> {
    let col = (view.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    let row = view.row(y, state.height).clamp(0, view.rows as i32 - 1) as u16;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_TEXT))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_hud<W: Write>(
    out: &mut W,
    state: &EntireGameStateInfo,
    view: &Viewport,
) -> std::io::Result<()> {
    draw_text_at(out, &format!("Score: {}", state.player.score), 10, 10, state, view)?;
    draw_text_at(out, &format!("Lives: {}", state.player.lives), 10, 50, state, view)?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &EntireGameStateInfo,
    view: &Viewport,
) -> std::io::Result<()> {
    let mid = state.height / 2;
    draw_centered(out, "GAME OVER!", mid - 60, state, view)?;
    draw_centered(
        out,
        &format!("Final Score: {}", state.player.score),
        mid,
        state,
        view,
    )?;
    draw_centered(out, "Press R to Restart or Q to Quit", mid + 60, state, view)?;
    Ok(())
}
