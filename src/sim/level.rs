/// Level: a tile grid decoded from a text file, plus its scroll offsets.
///
/// ## Sources (priority order):
///   1. `Levels/` directory: `LevelNames.txt` index + one `.txt` per level
///   2. Built-in embedded levels
///
/// ## Index format (`LevelNames.txt`):
///   One level per line, `name,description`. Level *i* (0-based) is
///   named `{i+1}_{name}` and read from `{i+1}_{name}.txt`.
///
/// ## Level format (`.txt`):
///   One line per tile row, top row first. The last line of the file
///   rests on the bottom edge of the screen.
///
/// ## Tile legend:
///   'x' = Wall          'e' = End
///   's' = Strawberry    'p' = Player start
///   anything else = Empty

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::character::{Direction, Position};
use crate::domain::collision::MapView;
use crate::domain::tile::Tile;
use crate::error::LevelError;

pub const DEFAULT_TILE_SIZE: i32 = 40;
pub const INDEX_FILE: &str = "LevelNames.txt";

#[derive(Clone, Debug)]
pub struct Level {
    name: String,
    description: String,
    locked: bool,
    rows: Vec<String>,
    tiles: Vec<Vec<Tile>>,
    width: usize,
    tile_width: i32,
    tile_height: i32,
    offset_x: i32,
    offset_y: i32,
    collected: BTreeSet<usize>,
}

impl Level {
    pub fn new(name: &str, description: &str) -> Self {
        Level {
            name: name.to_string(),
            description: description.to_string(),
            locked: true,
            rows: vec![],
            tiles: vec![],
            width: 0,
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            offset_x: 0,
            offset_y: 0,
            collected: BTreeSet::new(),
        }
    }

    /// Build a level straight from its rows (embedded levels, tests).
    pub fn from_rows(name: &str, description: &str, rows: &[&str]) -> Self {
        let mut level = Level::new(name, description);
        level.set_rows(rows.iter().map(|r| r.to_string()).collect());
        level
    }

    pub fn with_tile_size(mut self, size: i32) -> Self {
        self.tile_width = size;
        self.tile_height = size;
        self
    }

    /// Reset the scroll offsets.
    pub fn init(&mut self) {
        self.offset_x = 0;
        self.offset_y = 0;
    }

    /// Replace the level content with every line of `reader`.
    /// Collected strawberries are kept.
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<(), LevelError> {
        let rows = reader.lines().collect::<Result<Vec<_>, _>>()?;
        self.set_rows(rows);
        debug!(level = %self.name, rows = self.rows.len(), width = self.width, "level loaded");
        Ok(())
    }

    /// Load this level's text file from `dir`.
    pub fn load_from_dir(&mut self, dir: &Path) -> Result<(), LevelError> {
        let file = File::open(self.file_path(dir))?;
        self.load(BufReader::new(file))
    }

    pub fn file_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.txt", self.name))
    }

    fn set_rows(&mut self, rows: Vec<String>) {
        self.tiles = rows.iter()
            .map(|r| r.chars().map(Tile::from_char).collect())
            .collect();
        self.width = self.tiles.iter().map(|r| r.len()).max().unwrap_or(0);
        self.rows = rows;
    }

    pub fn is_loaded(&self) -> bool {
        !self.rows.is_empty()
    }

    // ── Lock state ──

    /// A level stays locked until it has been finished once.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Forget that the level was ever finished or harvested.
    pub(crate) fn reset_progress(&mut self) {
        self.locked = true;
        self.collected.clear();
    }

    // ── Accessors ──

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tile_width(&self) -> i32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> i32 {
        self.tile_height
    }

    pub fn offset_x(&self) -> i32 {
        self.offset_x
    }

    pub fn offset_y(&self) -> i32 {
        self.offset_y
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.tiles.len()
    }

    /// Height of the whole level in pixels.
    pub fn pixel_height(&self) -> i32 {
        self.height() as i32 * self.tile_height
    }

    pub fn tiles(&self) -> &[Vec<Tile>] {
        &self.tiles
    }

    pub fn map_view(&self) -> MapView<'_> {
        MapView {
            tiles: &self.tiles,
            width: self.width,
            tile_w: self.tile_width,
            tile_h: self.tile_height,
        }
    }

    /// The rows as loaded from the file.
    pub fn map(&self) -> &[String] {
        &self.rows
    }

    // ── Strawberries ──

    /// Stable index of a tile: row-major over the widest row.
    pub fn tile_index(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    pub fn is_collected(&self, index: usize) -> bool {
        self.collected.contains(&index)
    }

    pub fn collected(&self) -> &BTreeSet<usize> {
        &self.collected
    }

    pub fn register_collected_strawberries(&mut self, set: &BTreeSet<usize>) {
        self.collected.extend(set.iter().copied());
    }

    pub fn strawberry_count(&self) -> usize {
        self.tiles.iter().flatten().filter(|t| **t == Tile::Strawberry).count()
    }

    // ── Screen mapping ──

    /// Screen y of world row 0 at zero offset: the level rests on the
    /// bottom edge of a `game_height` tall screen.
    pub fn base_y(&self, game_height: i32) -> i32 {
        game_height - self.pixel_height()
    }

    /// World pixel position → screen pixel position.
    pub fn to_screen(&self, pos: Position, game_height: i32) -> Position {
        Position::new(
            pos.x + self.offset_x,
            pos.y + self.base_y(game_height) + self.offset_y,
        )
    }

    /// Every drawable tile with its screen position (top-left corner).
    /// Collected strawberries are skipped.
    pub fn visible_tiles(&self, game_height: i32) -> Vec<(Tile, Position)> {
        let mut out = Vec::new();
        for (row, line) in self.tiles.iter().enumerate() {
            for (col, &tile) in line.iter().enumerate() {
                if !tile.is_visible() {
                    continue;
                }
                if tile == Tile::Strawberry && self.is_collected(self.tile_index(col, row)) {
                    continue;
                }
                let world = Position::new(col as i32 * self.tile_width, row as i32 * self.tile_height);
                out.push((tile, self.to_screen(world, game_height)));
            }
        }
        out
    }

    // ── Start position & scrolling ──

    /// World position of the player start: the first `p` scanning from the
    /// last line upward, left to right. The level is scrolled so the start
    /// is in the left half of the screen and not in its top third.
    pub fn initial_player_position(&mut self, game_height: i32, game_width: i32,
                                   step_x: i32, step_y: i32) -> Result<Position, LevelError> {
        let pos = self.tiles.iter().enumerate().rev()
            .find_map(|(row, line)| {
                line.iter().position(|t| *t == Tile::Player).map(|col| {
                    Position::new(col as i32 * self.tile_width, row as i32 * self.tile_height)
                })
            })
            .ok_or_else(|| LevelError::MissingPlayer(self.name.clone()))?;

        while self.to_screen(pos, game_height).x > game_width / 2
            && !self.maximum_scroll_reached(game_width)
        {
            self.scroll_x(Direction::Right, step_x);
        }

        while self.to_screen(pos, game_height).y < game_height / 3 {
            self.scroll_y(1, step_y);
        }

        info!(level = %self.name, x = pos.x, y = pos.y,
              offset_x = self.offset_x, offset_y = self.offset_y, "player placed");
        Ok(pos)
    }

    /// Scrolling right moves the tiles left.
    pub fn scroll_x(&mut self, direction: Direction, step: i32) {
        match direction {
            Direction::Right => self.offset_x -= step,
            Direction::Left => self.offset_x += step,
        }
    }

    /// Positive scrolls up (tiles move down), negative scrolls down.
    pub fn scroll_y(&mut self, direction: i32, step: i32) {
        if direction > 0 {
            self.offset_y += step;
        } else if direction < 0 {
            self.offset_y -= step;
        }
    }

    /// Keep the level's left edge and bottom edge from leaving the screen.
    pub(crate) fn clamp_offsets(&mut self) {
        self.offset_x = self.offset_x.min(0);
        self.offset_y = self.offset_y.max(0);
    }

    /// Has the left edge of the right-most wall column reached the screen?
    pub fn maximum_scroll_reached(&self, game_width: i32) -> bool {
        let x_max = self.tiles.iter()
            .flat_map(|line| {
                line.iter().enumerate()
                    .filter(|(_, t)| **t == Tile::Wall)
                    .map(|(col, _)| col as i32 * self.tile_width + self.offset_x)
            })
            .max();
        match x_max {
            Some(x) => x <= game_width,
            None => true,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.rows.join(", "))
    }
}

// ══════════════════════════════════════════════════════════════
// Level sets
// ══════════════════════════════════════════════════════════════

/// Read `LevelNames.txt` in `dir` and build one (unloaded) level per line.
pub fn load_all_levels(dir: &Path) -> Result<Vec<Level>, LevelError> {
    let file = File::open(dir.join(INDEX_FILE))?;
    parse_index(BufReader::new(file))
}

fn parse_index<R: BufRead>(reader: R) -> Result<Vec<Level>, LevelError> {
    let mut lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    while lines.last().map_or(false, |l| l.trim().is_empty()) {
        lines.pop();
    }

    let mut levels = vec![];
    for (i, line) in lines.iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 2 {
            return Err(LevelError::MalformedIndex { line: i + 1, content: line.clone() });
        }
        let name = format!("{}_{}", i + 1, fields[0].trim());
        levels.push(Level::new(&name, fields[1].trim()));
    }
    Ok(levels)
}

/// Levels shipped inside the binary, used when no level directory exists.
pub fn embedded_levels() -> Vec<Level> {
    vec![
        Level::from_rows("1_levelOne", "An amazing adventure", &[
            "                                   ",
            "                                   ",
            "                       s s s       ",
            "                      xxxxxxx      ",
            "            s s                   e",
            "           xxxxx          s    xxxx",
            "   s s                   xxx       ",
            "  xxxxx      s  s  s               ",
            " p          xxxxxxxxx       s s s  ",
            "xxxxxxxx  xxxxxxxxxxxxxx  xxxxxxxxx",
        ]),
        Level::from_rows("2_levelTwo", "Mind the gaps", &[
            "                                        e",
            "                                   s  xxx",
            "                          s s    xxxx    ",
            "                 s s     xxxxx           ",
            "        s  s    xxxxx                    ",
            "       xxxxxx                            ",
            " p  s                 s  s  s            ",
            "xxxxxx  xxx   xxx   xxxxxxxxxxx  xx  xx  ",
        ]),
        Level::from_rows("3_levelThree", "The strawberry tower", &[
            "          e         ",
            "        xxxxx       ",
            "  s s            s  ",
            " xxxxx        xxxxx ",
            "        s  s        ",
            "       xxxxxx       ",
            "  s s            s  ",
            " xxxxx        xxxxx ",
            "        s s s       ",
            "       xxxxxxx      ",
            "  s              s  ",
            " xxxx          xxxx ",
            "   p    s  s        ",
            "xxxxxxxxxxxxxxxxxxxx",
        ]),
    ]
}
