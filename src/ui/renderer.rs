/// Presentation layer: double-buffered, diff-based terminal renderer.
///
///   1. Compose the next frame into `front`
///   2. Compare every cell with `back` (the previous frame)
///   3. Queue terminal commands only for changed cells, flush once
///   4. Swap front/back
///
/// ## Level projection
///
/// The game screen is `W x H` pixels (the Parameter's display format).
/// One tile is drawn as two terminal columns by one row, so a terminal
/// column covers half a tile width and a row covers one tile height.
/// Whatever does not fit the terminal is clipped: columns on the right,
/// rows at the top (the level rests on the bottom edge).

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::character::Facing;
use crate::domain::tile::Tile;
use crate::sim::game::{Game, Menu};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every empty cell, so terminals never show
    /// their own default between rows.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 24, b: 38 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Differs from every real cell: forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            *self = FrameBuffer::new(w, h);
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    /// Signed variant for projected coordinates that may fall off-screen.
    fn set_i(&mut self, x: i32, y: i32, cell: Cell) {
        if x >= 0 && y >= 0 {
            self.set(x as usize, y as usize, cell);
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let x = self.width.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }

    fn fill_rect(&mut self, x0: usize, y0: usize, w: usize, h: usize, bg: Color) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                self.set(x, y, Cell::new(' ', Color::White, bg));
            }
        }
    }
}

// ── Layout ──

/// Terminal columns per tile.
const CELL_W: i32 = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
/// Rows below the map: gap, message, gap, help.
const FOOTER_ROWS: usize = 4;

const SKY: Color = Color::Rgb { r: 50, g: 110, b: 160 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 30, b: 70 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const HILITE: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const GOLD: Color = Color::Rgb { r: 255, g: 210, b: 60 };
const BERRY: Color = Color::Rgb { r: 230, g: 40, b: 60 };

/// Screen pixel → terminal cell, relative to the top-left of the map area.
fn pixel_to_cell(sx: i32, sy: i32, tile_w: i32, tile_h: i32) -> (i32, i32) {
    let col_px = (tile_w / CELL_W).max(1);
    (sx.div_euclid(col_px), sy.div_euclid(tile_h.max(1)))
}

/// The part of the game screen that fits in the terminal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Viewport {
    cols: usize,
    rows: usize,
    /// Game rows hidden above the top of the map area.
    skip_rows: usize,
}

fn viewport(game_w: i32, game_h: i32, tile_w: i32, tile_h: i32,
            term_w: usize, term_h: usize) -> Viewport {
    let (full_cols, full_rows) = pixel_to_cell(game_w, game_h, tile_w, tile_h);
    let (full_cols, full_rows) = (full_cols.max(0) as usize, full_rows.max(0) as usize);
    let avail_rows = term_h.saturating_sub(MAP_ROW + FOOTER_ROWS).max(1);
    let rows = full_rows.min(avail_rows);
    Viewport {
        cols: full_cols.min(term_w),
        rows,
        skip_rows: full_rows - rows,
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_menu: Option<Menu>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_menu: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.fit_terminal()?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Track the terminal size; on change, force a full repaint.
    fn fit_terminal(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if tw != self.term_w || th != self.term_h {
            self.term_w = tw;
            self.term_h = th;
            self.front.resize(tw, th);
            self.back.resize(tw, th);
            self.invalidate()?;
        }
        Ok(())
    }

    fn invalidate(&mut self) -> io::Result<()> {
        self.back.cells.fill(Cell::INVALID);
        queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))
    }

    pub fn render(&mut self, game: &Game) -> io::Result<()> {
        self.fit_terminal()?;

        if self.last_menu != Some(game.menu) {
            self.invalidate()?;
            self.last_menu = Some(game.menu);
        }

        self.front.clear();
        match game.menu {
            Menu::MainMenu => self.compose_main_menu(game),
            Menu::Parameters => self.compose_parameters(game),
            Menu::LevelSelection => self.compose_level_selection(game),
            Menu::Playing => self.compose_level(game),
            Menu::GameOver => self.compose_game_over(game),
            Menu::Victory => self.compose_victory(game),
        }
        if game.paused {
            self.compose_pause_overlay();
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        // Position right after the last printed cell, if known.
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Shared pieces ──

    fn compose_message(&mut self, game: &Game, row: usize) {
        if game.message.is_empty() || row >= self.front.height {
            return;
        }
        self.front.fill_row(row, MSG_BG);
        self.front.put_str(1, row, &format!(" {} ", game.message), Color::Black, MSG_BG);
    }

    /// Vertical option list; the selected entry is marked.
    fn compose_options(&mut self, game: &Game, top: usize, labels: &[String]) {
        for (i, label) in labels.iter().enumerate() {
            let selected = i == game.current_selection();
            let (mark, fg) = if selected { ("▸ ", HILITE) } else { ("  ", Color::White) };
            self.front.put_centered(top + i * 2, &format!("{}{:<14}", mark, label), fg, Color::Reset);
        }
    }

    fn compose_footer(&mut self, game: &Game, help: &str) {
        let h = self.front.height;
        if h >= 3 {
            self.compose_message(game, h - 3);
        }
        if h >= 1 {
            self.front.put_str(1, h - 1, help, Color::DarkGrey, Color::Reset);
        }
    }

    fn compose_banner(&mut self, top: usize, lines: &[&str], fg: Color) {
        for (i, line) in lines.iter().enumerate() {
            self.front.put_centered(top + i, line, fg, Color::Reset);
        }
    }

    // ── Menus ──

    fn compose_main_menu(&mut self, game: &Game) {
        self.compose_banner(1, &[
            r" ___ _        _        ___                 _   ",
            r"| _ (_)___ __( )___   / _ \ _  _ ___ ___ _| |_ ",
            r"|  _/ / -_|_-</(_-<  | (_) | || / -_|_-<|_   _|",
            r"|_| |_\___/__/ /__/   \__\_\\_,_\___/__/  |_|  ",
        ], GOLD);

        self.compose_options(game, 7, &game.options());

        let status = if game.has_save {
            format!("Saved game: level {}  ·  {} strawberries",
                    game.current_level() + 1, game.character.strawberries)
        } else {
            "New game".to_string()
        };
        self.front.put_centered(16, &status, Color::DarkGrey, Color::Reset);
        self.compose_footer(game, "↑↓ Select   Enter Confirm   Q Quit");
    }

    fn compose_parameters(&mut self, game: &Game) {
        self.compose_banner(1, &["── Parameters ──"], GOLD);

        let p = game.parameter();
        if !p.is_displayed() {
            return;
        }
        let filled = (p.volume() / 10) as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled));
        let values = [
            format!("Volume   ◂ {} {:>3}% ▸", bar, p.volume()),
            format!("Format   ◂ {:^11} ▸", p.display_format()),
            "Back".to_string(),
        ];
        self.compose_options(game, 4, &values);

        let note = format!("Screen {}×{} px  →  {}×{} cells",
            game.game_width(), game.game_height(),
            game.game_width() / (game.physics.tile_size / CELL_W).max(1),
            game.game_height() / game.physics.tile_size.max(1));
        self.front.put_centered(11, &note, Color::DarkGrey, Color::Reset);
        self.compose_footer(game, "↑↓ Select   ←→ Change   Esc Back");
    }

    fn compose_level_selection(&mut self, game: &Game) {
        self.compose_banner(1, &["── Choose a level ──"], GOLD);

        let visible = self.front.height.saturating_sub(8).max(1);
        let first = game.current_selection().saturating_sub(visible - 1);
        for (row, (i, level)) in game.levels.iter().enumerate().skip(first).take(visible).enumerate() {
            let selected = i == game.current_selection();
            let state = if !level.is_locked() {
                "✓"
            } else if game.is_playable(i) {
                " "
            } else {
                "✗"
            };
            let berries = if level.is_loaded() {
                format!("{}/{}", level.collected().len(), level.strawberry_count())
            } else {
                level.collected().len().to_string()
            };
            let line = format!("{} {:<2} {:<18} {:<28} ✿ {}",
                if selected { "▸" } else { " " },
                state, level.name(), level.description(), berries);
            let fg = match (selected, game.is_playable(i)) {
                (true, _) => HILITE,
                (false, true) => Color::White,
                (false, false) => Color::DarkGrey,
            };
            self.front.put_str(4, 4 + row, &line, fg, Color::Reset);
        }
        self.compose_footer(game, "↑↓ Select   Enter Play   Esc Back");
    }

    fn compose_game_over(&mut self, game: &Game) {
        self.compose_banner(2, &[
            "╔══════════════════════════╗",
            "║        GAME  OVER        ║",
            "╚══════════════════════════╝",
        ], BERRY);
        let level = format!("Fell for good in {}", game.level().name());
        self.front.put_centered(6, &level, Color::White, Color::Reset);
        self.compose_options(game, 9, &game.options());
        self.compose_footer(game, "↑↓ Select   Enter Confirm   Esc Main menu");
    }

    fn compose_victory(&mut self, game: &Game) {
        self.compose_banner(2, &[
            "╔══════════════════════════╗",
            "║     LEVEL  COMPLETE!     ║",
            "╚══════════════════════════╝",
        ], GOLD);
        let level = game.level();
        let stats = format!("{}  ·  {} strawberries here  ·  {} in total  ·  ♥ {}",
            level.name(), level.collected().len(),
            game.character.strawberries, game.character.health);
        self.front.put_centered(6, &stats, Color::White, Color::Reset);
        if !game.has_next_level() {
            self.front.put_centered(7, "Every level is done. Well played!", HILITE, Color::Reset);
        }
        self.compose_options(game, 9, &game.options());
        self.compose_footer(game, "↑↓ Select   Enter Confirm   Esc Main menu");
    }

    // ── Level ──

    fn compose_level(&mut self, game: &Game) {
        let level = game.level();
        let (tw, th) = (level.tile_width(), level.tile_height());
        let (gw, gh) = (game.game_width(), game.game_height());
        let vp = viewport(gw, gh, tw, th, self.term_w, self.term_h);

        // HUD
        let ch = &game.character;
        let hud = format!(" {}   ♥ {}   ✿ {} (+{})   {} · {} ",
            ch.name, ch.health, ch.strawberries, game.pending_strawberries.len(),
            level.name(), level.description());
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

        // Sky
        self.front.fill_rect(0, MAP_ROW, vp.cols, vp.rows, SKY);

        let origin_y = MAP_ROW as i32 - vp.skip_rows as i32;
        let project = |sx: i32, sy: i32| {
            let (c, r) = pixel_to_cell(sx, sy, tw, th);
            (c, r + origin_y)
        };
        let inside = |c: i32, r: i32| {
            c >= 0 && (c as usize) < vp.cols && r >= MAP_ROW as i32 && ((r as usize) < MAP_ROW + vp.rows)
        };

        for (tile, pos) in level.visible_tiles(gh) {
            let (c, r) = project(pos.x, pos.y);
            let glyph = match tile {
                Tile::Wall => [
                    Cell::new('▓', Color::Rgb { r: 120, g: 80, b: 40 }, Color::Rgb { r: 90, g: 60, b: 30 }),
                    Cell::new('▓', Color::Rgb { r: 120, g: 80, b: 40 }, Color::Rgb { r: 90, g: 60, b: 30 }),
                ],
                Tile::End => [Cell::new('[', GOLD, SKY), Cell::new(']', GOLD, SKY)],
                Tile::Strawberry => [
                    Cell::new('●', BERRY, SKY),
                    Cell::new('\'', Color::Green, SKY),
                ],
                Tile::Empty | Tile::Player => continue,
            };
            for (dx, cell) in glyph.into_iter().enumerate() {
                let c = c + dx as i32;
                if inside(c, r) {
                    self.front.set_i(c, r, cell);
                }
            }
        }

        // Player
        let screen = level.to_screen(ch.position, gh);
        let (c, r) = project(screen.x, screen.y);
        let body = match ch.facing {
            Facing::Right => ['@', '>'],
            Facing::Left => ['<', '@'],
        };
        for (dx, glyph) in body.into_iter().enumerate() {
            let c = c + dx as i32;
            if inside(c, r) {
                self.front.set_i(c, r, Cell::new(glyph, Color::White, SKY));
            }
        }

        // Message + help
        let msg_row = MAP_ROW + vp.rows + 1;
        self.compose_message(game, msg_row);
        let help_row = MAP_ROW + vp.rows + 3;
        if help_row < self.front.height {
            self.front.put_str(1, help_row,
                "←→/AD Move   Space/W/↑ Jump   R Restart   F1 Pause   Esc Save & menu",
                Color::DarkGrey, Color::Reset);
        }
    }

    fn compose_pause_overlay(&mut self) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let box_w = 30_usize.min(self.front.width);
        let box_h = 8_usize;
        let x0 = self.front.width.saturating_sub(box_w) / 2;
        let y0 = MAP_ROW + 2;

        self.front.fill_rect(x0, y0, box_w, box_h, dim);
        self.front.put_str(x0 + 2, y0 + 1, "══════  PAUSED  ══════", GOLD, dim);
        self.front.put_str(x0 + 2, y0 + 3, "F1   Resume", Color::White, dim);
        self.front.put_str(x0 + 2, y0 + 4, "R    Restart level", Color::White, dim);
        self.front.put_str(x0 + 2, y0 + 5, "Esc  Save & main menu", Color::White, dim);
    }
}
