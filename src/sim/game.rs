/// Game: menus, level progression and everything a running session owns.
///
/// ## Menus
///
/// | Menu           | # | Options                              |
/// |----------------|---|--------------------------------------|
/// | MainMenu       | 0 | Start, Choose level, Parameters, Quit |
/// | Parameters     | 1 | Volume, Format, Back                 |
/// | LevelSelection | 2 | one per level                        |
/// | Playing        | 3 | (none)                               |
/// | GameOver       | 4 | Retry, Main menu                     |
/// | Victory        | 5 | Next level, Main menu                |
///
/// ## Progress
///
/// A level is playable when it is the first one or the previous one is
/// finished. Strawberries picked up during an attempt stay *pending* until
/// the End tile is reached; falling off forfeits them.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::config::{self, GameConfig, PhysicsConfig, PlayerConfig};
use crate::domain::character::{Character, Direction, Position};
use crate::domain::parameter::Parameter;
use crate::error::{LevelError, ParameterError, SaveError};
use super::level::{self, Level};
use super::save::{self, LevelProgress, SaveData};

/// How long a status message stays visible, in ticks.
pub const MESSAGE_TICKS: u32 = 50;

const VOLUME_STEP: i32 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Menu {
    MainMenu,
    Parameters,
    LevelSelection,
    Playing,
    GameOver,
    Victory,
}

impl Menu {
    pub fn number(self) -> u8 {
        match self {
            Menu::MainMenu => 0,
            Menu::Parameters => 1,
            Menu::LevelSelection => 2,
            Menu::Playing => 3,
            Menu::GameOver => 4,
            Menu::Victory => 5,
        }
    }
}

/// What the front end should do after a menu confirmation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuAction {
    Stay,
    Quit,
}

/// Where level files are read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelSource {
    Directory(PathBuf),
    Embedded,
}

pub struct Game {
    pub menu: Menu,
    pub(crate) current_selection: usize,

    // ── Levels ──
    pub levels: Vec<Level>,
    pub(crate) current_level: usize,
    source: LevelSource,

    // ── Player ──
    pub character: Character,
    pub spawn: Position,
    /// Strawberry tiles picked up during the current attempt.
    pub pending_strawberries: BTreeSet<usize>,
    strawberries_at_start: u32,

    // ── Settings ──
    parameter: Parameter,
    pub physics: PhysicsConfig,
    pub player_config: PlayerConfig,

    // ── Persistence ──
    save_path: PathBuf,
    settings_path: PathBuf,
    pub has_save: bool,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
    pub paused: bool,
    pub tick: u64,
}

// ── Construction ──

impl Game {
    /// Levels come from the configured directory, or the embedded set when
    /// the directory has no `LevelNames.txt`. A saved game is loaded.
    pub fn new(config: &GameConfig) -> Result<Self, LevelError> {
        let (levels, source) = match level::load_all_levels(&config.levels_dir) {
            Ok(levels) if !levels.is_empty() => {
                info!(dir = %config.levels_dir.display(), count = levels.len(), "levels indexed");
                (levels, LevelSource::Directory(config.levels_dir.clone()))
            }
            Ok(_) => {
                warn!(dir = %config.levels_dir.display(), "level index is empty, using built-in levels");
                (level::embedded_levels(), LevelSource::Embedded)
            }
            Err(LevelError::Io(e)) => {
                warn!(dir = %config.levels_dir.display(), error = %e, "no level index, using built-in levels");
                (level::embedded_levels(), LevelSource::Embedded)
            }
            Err(e) => return Err(e),
        };

        let mut game = Game::with_levels(config, levels, source);
        match game.load_elements() {
            Ok(true) => info!(level = game.current_level, "saved game restored"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "ignoring unreadable save file"),
        }
        Ok(game)
    }

    pub fn with_levels(config: &GameConfig, levels: Vec<Level>, source: LevelSource) -> Self {
        let tile = config.physics.tile_size;
        Game {
            menu: Menu::MainMenu,
            current_selection: 0,
            levels: levels.into_iter().map(|l| l.with_tile_size(tile)).collect(),
            current_level: 0,
            source,
            character: Character::new(&config.player.name, config.player.initial_health),
            spawn: Position::default(),
            pending_strawberries: BTreeSet::new(),
            strawberries_at_start: 0,
            parameter: config.parameter(),
            physics: config.physics.clone(),
            player_config: config.player.clone(),
            save_path: config.save_file.clone(),
            settings_path: config::settings_path(&config.save_file),
            has_save: save::has_save(&config.save_file),
            message: String::new(),
            message_timer: 0,
            paused: false,
            tick: 0,
        }
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Count the status message down by one tick.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }
}

// ── Queries ──

impl Game {
    pub fn current_selection(&self) -> usize {
        self.current_selection
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn level(&self) -> &Level {
        &self.levels[self.current_level]
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.levels[self.current_level]
    }

    pub fn parameter(&self) -> &Parameter {
        &self.parameter
    }

    pub fn game_width(&self) -> i32 {
        self.parameter.width()
    }

    pub fn game_height(&self) -> i32 {
        self.parameter.height()
    }

    pub fn has_next_level(&self) -> bool {
        self.current_level + 1 < self.levels.len()
    }

    /// First level or previous level finished.
    pub fn is_playable(&self, id: usize) -> bool {
        id < self.levels.len() && (id == 0 || !self.levels[id - 1].is_locked())
    }

    /// Labels of the current menu's options.
    pub fn options(&self) -> Vec<String> {
        let labels: &[&str] = match self.menu {
            Menu::MainMenu => &["Start", "Choose level", "Parameters", "Quit"],
            Menu::Parameters => &["Volume", "Format", "Back"],
            Menu::LevelSelection => {
                return self.levels.iter().map(|l| l.name().to_string()).collect();
            }
            Menu::Playing => &[],
            Menu::GameOver => &["Retry", "Main menu"],
            Menu::Victory if self.has_next_level() => &["Next level", "Main menu"],
            Menu::Victory => &["Main menu"],
        };
        labels.iter().map(|s| s.to_string()).collect()
    }

    pub fn number_of_options(&self) -> usize {
        match self.menu {
            Menu::LevelSelection => self.levels.len(),
            _ => self.options().len(),
        }
    }
}

// ── Menu navigation ──

impl Game {
    /// Move the selection by `go`, wrapping at both ends.
    pub fn goto_select(&mut self, go: i32) {
        let n = self.number_of_options() as i32;
        if n == 0 {
            self.current_selection = 0;
            return;
        }
        let mut sel = self.current_selection as i32 + go;
        if sel < 0 {
            sel = n - 1;
        }
        if sel >= n {
            sel = 0;
        }
        self.current_selection = sel as usize;
    }

    fn open(&mut self, menu: Menu) {
        self.menu = menu;
        self.current_selection = 0;
        self.paused = false;
        self.parameter.set_display(menu == Menu::Parameters);
        debug!(menu = menu.number(), "menu opened");
    }

    pub fn to_main_menu(&mut self) {
        self.open(Menu::MainMenu);
    }

    /// Run the selected option of the current menu.
    pub fn confirm(&mut self) -> MenuAction {
        let sel = self.current_selection;
        match self.menu {
            Menu::MainMenu => match sel {
                0 => {
                    let id = self.levels.iter()
                        .position(|l| l.is_locked())
                        .unwrap_or(self.levels.len().saturating_sub(1));
                    self.start_level(id);
                }
                1 => {
                    self.open(Menu::LevelSelection);
                    self.current_selection = self.current_level;
                }
                2 => self.open(Menu::Parameters),
                _ => return MenuAction::Quit,
            },
            Menu::Parameters => match sel {
                0 | 1 => self.adjust(1),
                _ => self.back(),
            },
            Menu::LevelSelection => {
                if self.choose_level(sel) {
                    self.start_level(sel);
                }
            }
            Menu::Playing => {}
            Menu::GameOver => match sel {
                0 => self.start_level(self.current_level),
                _ => self.to_main_menu(),
            },
            Menu::Victory => {
                if sel == 0 && self.has_next_level() {
                    self.start_level(self.current_level + 1);
                } else {
                    self.to_main_menu();
                }
            }
        }
        MenuAction::Stay
    }

    /// Esc: leave the current screen. Leaving a level saves the game.
    pub fn back(&mut self) {
        match self.menu {
            Menu::MainMenu => {}
            Menu::Playing => {
                self.forfeit_pending();
                self.save();
                self.to_main_menu();
            }
            _ => self.to_main_menu(),
        }
    }

    /// Left/right on the Parameters menu.
    pub fn adjust(&mut self, delta: i32) {
        if self.menu != Menu::Parameters {
            return;
        }
        let volume = self.parameter.volume() as i32;
        let format = self.parameter.display_format().to_string();
        let result = match self.current_selection {
            0 => self.apply_modification((volume + delta * VOLUME_STEP).clamp(0, 100), &format),
            1 => {
                let next = self.parameter.cycle_format(delta);
                self.apply_modification(volume, next)
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            self.set_message(&e.to_string(), MESSAGE_TICKS);
        }
    }

    /// Validate and apply new settings, then persist them.
    pub fn apply_modification(&mut self, volume: i32, format: &str) -> Result<(), ParameterError> {
        let mut next = self.parameter.clone();
        next.set_volume(volume)?;
        next.set_format(format)?;
        self.parameter = next;
        info!(volume, format, "parameters changed");

        if let Err(e) = config::store_settings(&self.settings_path, &self.parameter) {
            warn!(error = %e, path = %self.settings_path.display(), "could not store settings");
        }
        Ok(())
    }

    /// Select a level. Refused (with a message) while it is locked.
    pub fn choose_level(&mut self, id: usize) -> bool {
        if !self.is_playable(id) {
            self.set_message("This level is locked", MESSAGE_TICKS);
            return false;
        }
        self.current_level = id;
        true
    }
}

// ── Level flow ──

impl Game {
    /// Load level `id` from its source and place the player on it.
    pub fn play_level(&mut self, id: usize) -> Result<(), LevelError> {
        if id >= self.levels.len() {
            return Err(LevelError::NoSuchLevel(id));
        }
        let (w, h) = (self.game_width(), self.game_height());
        let (ms, js) = (self.physics.moving_speed, self.physics.jumping_speed);

        let level = &mut self.levels[id];
        if let LevelSource::Directory(dir) = &self.source {
            level.load_from_dir(dir)?;
        }
        level.init();
        let pos = level.initial_player_position(h, w, ms, js)?;

        self.current_level = id;
        self.character.reset_position(pos);
        self.spawn = pos;
        self.pending_strawberries.clear();
        self.strawberries_at_start = self.character.strawberries;
        self.open(Menu::Playing);
        let desc = self.levels[id].description().to_string();
        self.set_message(&desc, MESSAGE_TICKS);
        info!(level = id, name = %self.levels[id].name(), "level started");
        Ok(())
    }

    /// `play_level` for menu handlers: failures become a message.
    fn start_level(&mut self, id: usize) {
        if let Err(e) = self.play_level(id) {
            error!(level = id, error = %e, "could not start level");
            self.set_message(&e.to_string(), MESSAGE_TICKS * 2);
        }
    }

    /// Restart the current attempt, forfeiting its strawberries.
    pub fn restart_level(&mut self) {
        self.forfeit_pending();
        let id = self.current_level;
        self.start_level(id);
        if self.menu != Menu::Playing {
            self.to_main_menu();
        }
    }

    /// Undo the attempt's strawberries and the health points they granted.
    pub(crate) fn forfeit_pending(&mut self) {
        let per = self.player_config.strawberries_per_health;
        if per > 0 {
            let bonus = (self.character.strawberries / per)
                .saturating_sub(self.strawberries_at_start / per);
            self.character.health = self.character.health.saturating_sub(bonus);
        }
        self.character.strawberries = self.strawberries_at_start;
        self.pending_strawberries.clear();
    }

    /// The End tile was reached.
    pub(crate) fn complete_level(&mut self) {
        let pending = std::mem::take(&mut self.pending_strawberries);
        let level = self.level_mut();
        level.unlock();
        level.register_collected_strawberries(&pending);
        self.strawberries_at_start = self.character.strawberries;
        info!(level = self.current_level, strawberries = pending.len(), "level completed");
        self.save();
        self.open(Menu::Victory);
    }

    /// Health ran out: the run is over and its save goes away.
    pub(crate) fn game_over(&mut self) {
        info!(level = self.current_level, strawberries = self.character.strawberries, "game over");
        save::delete_save(&self.save_path);
        self.has_save = false;
        for level in &mut self.levels {
            level.reset_progress();
        }
        self.character = Character::new(&self.player_config.name, self.player_config.initial_health);
        self.pending_strawberries.clear();
        self.strawberries_at_start = 0;
        self.open(Menu::GameOver);
    }

    // ── Frame mutators ──

    /// Walk one step, stopping against walls.
    pub fn move_player(&mut self, direction: Direction) {
        let step = self.physics.moving_speed;
        let level = &self.levels[self.current_level];
        let rect = self.character.hitbox(level.tile_width(), level.tile_height());
        let dx = match direction {
            Direction::Left => -step,
            Direction::Right => step,
        };
        let sweep = level.map_view().sweep_x(&rect, dx);
        match direction {
            Direction::Left => self.character.move_left(rect.x - sweep.pos),
            Direction::Right => self.character.move_right(sweep.pos - rect.x),
        }
    }

    /// Start a jump. Only works while standing on something.
    pub fn jump_player(&mut self) -> bool {
        self.character.jump(self.physics.jump_height)
    }
}

// ── Persistence ──

impl Game {
    pub fn save(&mut self) {
        let data = SaveData {
            health: self.character.health,
            strawberries: self.character.strawberries,
            current_level: self.current_level,
            levels: self.levels.iter()
                .map(|l| LevelProgress {
                    finished: !l.is_locked(),
                    collected: l.collected().clone(),
                })
                .collect(),
        };
        match save::save_game(&self.save_path, &data) {
            Ok(()) => self.has_save = true,
            Err(e) => {
                error!(error = %e, path = %self.save_path.display(), "could not save game");
                self.set_message("Could not save the game", MESSAGE_TICKS);
            }
        }
    }

    /// Restore progress from the save file. `Ok(false)` when there is none.
    pub fn load_elements(&mut self) -> Result<bool, SaveError> {
        let data = match save::load_save(&self.save_path)? {
            Some(d) => d,
            None => return Ok(false),
        };

        self.character.health = data.health.max(1);
        self.character.strawberries = data.strawberries;
        self.strawberries_at_start = data.strawberries;
        self.current_level = data.current_level.min(self.levels.len().saturating_sub(1));
        for (level, progress) in self.levels.iter_mut().zip(&data.levels) {
            level.set_locked(!progress.finished);
            level.register_collected_strawberries(&progress.collected);
        }
        self.has_save = true;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        game: Game,
    }

    fn config_in(dir: &std::path::Path) -> GameConfig {
        let mut cfg = GameConfig::default();
        cfg.save_file = dir.join("save.dat");
        cfg.levels_dir = dir.join("Levels");
        cfg
    }

    fn levels() -> Vec<Level> {
        vec![
            Level::from_rows("1_a", "first", &["p s e", "xxxxx"]),
            Level::from_rows("2_b", "second", &["p   e", "xxxxx"]),
            Level::from_rows("3_c", "third", &["p   e", "xxxxx"]),
        ]
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let game = Game::with_levels(&config_in(dir.path()), levels(), LevelSource::Embedded);
        Fixture { _dir: dir, game }
    }

    // ── menus ──

    #[test]
    fn starts_on_main_menu() {
        let f = fixture();
        assert_eq!(f.game.menu, Menu::MainMenu);
        assert_eq!(f.game.menu.number(), 0);
        assert_eq!(f.game.number_of_options(), 4);
        assert_eq!(f.game.current_selection(), 0);
    }

    #[test]
    fn selection_wraps() {
        let mut f = fixture();
        f.game.goto_select(-1);
        assert_eq!(f.game.current_selection(), 3);
        f.game.goto_select(1);
        assert_eq!(f.game.current_selection(), 0);
    }

    #[test]
    fn quit_option_quits() {
        let mut f = fixture();
        f.game.goto_select(-1);
        assert_eq!(f.game.confirm(), MenuAction::Quit);
    }

    #[test]
    fn start_plays_first_unfinished_level() {
        let mut f = fixture();
        f.game.levels[0].unlock();
        assert_eq!(f.game.confirm(), MenuAction::Stay);
        assert_eq!(f.game.menu, Menu::Playing);
        assert_eq!(f.game.current_level(), 1);
        assert_eq!(f.game.number_of_options(), 0);
    }

    #[test]
    fn locked_level_cannot_be_chosen() {
        let mut f = fixture();
        assert!(!f.game.choose_level(2));
        assert_eq!(f.game.message, "This level is locked");
        f.game.levels[1].unlock();
        assert!(f.game.choose_level(2));
        assert_eq!(f.game.current_level(), 2);
    }

    #[test]
    fn level_selection_lists_every_level() {
        let mut f = fixture();
        f.game.goto_select(1);
        f.game.confirm();
        assert_eq!(f.game.menu, Menu::LevelSelection);
        assert_eq!(f.game.options(), vec!["1_a", "2_b", "3_c"]);
        f.game.goto_select(1);
        f.game.confirm();
        assert_eq!(f.game.menu, Menu::LevelSelection, "level 2 is locked");
        f.game.back();
        assert_eq!(f.game.menu, Menu::MainMenu);
    }

    #[test]
    fn victory_after_last_level_offers_only_main_menu() {
        let mut f = fixture();
        f.game.current_level = 2;
        f.game.menu = Menu::Victory;
        assert_eq!(f.game.options(), vec!["Main menu"]);
        f.game.current_level = 0;
        assert_eq!(f.game.number_of_options(), 2);
    }

    // ── parameters ──

    #[test]
    fn parameters_adjust_and_persist() {
        let mut f = fixture();
        f.game.goto_select(2);
        f.game.confirm();
        assert_eq!(f.game.menu, Menu::Parameters);
        assert!(f.game.parameter().is_displayed());

        f.game.adjust(1);
        assert_eq!(f.game.parameter().volume(), 60);
        f.game.goto_select(1);
        f.game.adjust(-1);
        assert_eq!(f.game.parameter().display_format(), "800x600");

        let stored = config::load_settings(&f.game.settings_path).unwrap();
        assert_eq!(stored.volume(), 60);
        assert_eq!(stored.display_format(), "800x600");

        f.game.back();
        assert!(!f.game.parameter().is_displayed());
    }

    #[test]
    fn volume_clamps_at_full() {
        let mut f = fixture();
        f.game.menu = Menu::Parameters;
        for _ in 0..10 {
            f.game.adjust(1);
        }
        assert_eq!(f.game.parameter().volume(), 100);
    }

    #[test]
    fn invalid_modification_changes_nothing() {
        let mut f = fixture();
        assert!(f.game.apply_modification(70, "bogus").is_err());
        assert_eq!(f.game.parameter().volume(), 50);
        assert!(f.game.apply_modification(170, "800x600").is_err());
        assert_eq!(f.game.parameter().display_format(), "1080x720");
    }

    // ── level flow ──

    #[test]
    fn play_level_places_player() {
        let mut f = fixture();
        f.game.play_level(0).unwrap();
        assert_eq!(f.game.character.position, Position::new(0, 0));
        assert_eq!(f.game.spawn, Position::new(0, 0));
        assert_eq!(f.game.message, "first");
    }

    #[test]
    fn play_unknown_level_fails() {
        let mut f = fixture();
        assert!(matches!(f.game.play_level(9), Err(LevelError::NoSuchLevel(9))));
    }

    #[test]
    fn leaving_a_level_saves() {
        let mut f = fixture();
        f.game.play_level(0).unwrap();
        f.game.back();
        assert_eq!(f.game.menu, Menu::MainMenu);
        assert!(f.game.has_save);
        assert!(save::has_save(&f.game.save_path));
    }

    #[test]
    fn completion_banks_pending_and_unlocks() {
        let mut f = fixture();
        f.game.play_level(0).unwrap();
        f.game.pending_strawberries.insert(2);
        f.game.character.strawberries = 1;
        f.game.complete_level();

        assert_eq!(f.game.menu, Menu::Victory);
        assert!(!f.game.levels[0].is_locked());
        assert!(f.game.levels[0].is_collected(2));
        assert!(f.game.pending_strawberries.is_empty());

        f.game.confirm();
        assert_eq!(f.game.current_level(), 1);
        assert_eq!(f.game.menu, Menu::Playing);
    }

    #[test]
    fn save_and_load_elements_restore_progress() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path());

        let mut first = Game::with_levels(&cfg, levels(), LevelSource::Embedded);
        first.play_level(0).unwrap();
        first.pending_strawberries.insert(2);
        first.character.strawberries = 1;
        first.character.health = 2;
        first.complete_level();

        let mut second = Game::with_levels(&cfg, levels(), LevelSource::Embedded);
        assert!(second.has_save);
        assert!(second.load_elements().unwrap());
        assert_eq!(second.character.health, 2);
        assert_eq!(second.character.strawberries, 1);
        assert!(!second.levels[0].is_locked());
        assert!(second.levels[0].is_collected(2));
        assert!(second.levels[1].is_locked());
        assert!(second.is_playable(1));
        assert!(!second.is_playable(2));
    }

    #[test]
    fn load_without_save_is_a_no_op() {
        let mut f = fixture();
        assert!(!f.game.load_elements().unwrap());
        assert_eq!(f.game.character.health, 3);
    }

    #[test]
    fn game_over_wipes_progress() {
        let mut f = fixture();
        f.game.play_level(0).unwrap();
        f.game.complete_level();
        assert!(f.game.has_save);

        f.game.game_over();
        assert_eq!(f.game.menu, Menu::GameOver);
        assert!(!f.game.has_save);
        assert!(!save::has_save(&f.game.save_path));
        assert!(f.game.levels.iter().all(|l| l.is_locked()));
        assert_eq!(f.game.character.health, 3);

        // Retry replays the same level
        f.game.confirm();
        assert_eq!(f.game.menu, Menu::Playing);
        assert_eq!(f.game.current_level(), 0);
    }

    #[test]
    fn missing_level_directory_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let game = Game::new(&config_in(dir.path())).unwrap();
        assert_eq!(game.source, LevelSource::Embedded);
        assert_eq!(game.levels.len(), level::embedded_levels().len());
    }

    #[test]
    fn level_directory_is_used_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path());
        std::fs::create_dir(&cfg.levels_dir).unwrap();
        std::fs::write(cfg.levels_dir.join("LevelNames.txt"), "solo,Just one\n").unwrap();
        std::fs::write(cfg.levels_dir.join("1_solo.txt"), "p e\nxxx\n").unwrap();

        let mut game = Game::new(&cfg).unwrap();
        assert_eq!(game.levels.len(), 1);
        game.play_level(0).unwrap();
        assert_eq!(game.level().map().len(), 2);
    }

    #[test]
    fn malformed_index_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path());
        std::fs::create_dir(&cfg.levels_dir).unwrap();
        std::fs::write(cfg.levels_dir.join("LevelNames.txt"), "no comma here\n").unwrap();
        assert!(matches!(Game::new(&cfg), Err(LevelError::MalformedIndex { .. })));
    }

    #[test]
    fn message_expires() {
        let mut f = fixture();
        f.game.set_message("hi", 2);
        f.game.tick_message();
        assert_eq!(f.game.message, "hi");
        f.game.tick_message();
        assert!(f.game.message.is_empty());
    }
}
