/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Parameter-menu changes live in `settings.toml` next to the save file
/// and override `[display]`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::character::{JUMPING_SPEED, JUMP_HEIGHT, MOVING_SPEED};
use crate::domain::parameter::{Parameter, DEFAULT_FORMAT, DEFAULT_VOLUME};

pub const SETTINGS_FILE: &str = "settings.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub gamepad: GamepadConfig,
    pub display_format: String,
    pub volume: u8,
    pub levels_dir: PathBuf,
    pub save_file: PathBuf,
    pub log_file: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhysicsConfig {
    pub tick_rate_ms: u64,
    pub tile_size: i32,
    pub moving_speed: i32,  // px per tick, horizontal move and scroll
    pub jumping_speed: i32, // px per tick, rise / fall and vertical scroll
    pub jump_height: i32,
}

#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub name: String,
    pub initial_health: u32,
    pub strawberries_per_health: u32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        TomlPhysics::default().into_config()
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let p = TomlPlayer::default();
        PlayerConfig {
            name: p.name,
            initial_health: p.initial_health,
            strawberries_per_health: p.strawberries_per_health,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[PathBuf::from(".")])
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default = "default_save_file")]
    save_file: String,
    #[serde(default = "default_log_file")]
    log_file: String,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_format")]
    format: String,
    #[serde(default = "default_volume")]
    volume: u8,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_tile_size")]
    tile_size: i32,
    #[serde(default = "default_moving_speed")]
    moving_speed: i32,
    #[serde(default = "default_jumping_speed")]
    jumping_speed: i32,
    #[serde(default = "default_jump_height")]
    jump_height: i32,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_player_name")]
    name: String,
    #[serde(default = "default_initial_health")]
    initial_health: u32,
    #[serde(default = "default_strawberries_per_health")]
    strawberries_per_health: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump_buttons")]
    jump: Vec<String>,
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

// ── Defaults ──

fn default_levels_dir() -> String { "Levels".into() }
fn default_save_file() -> String { "save.dat".into() }
fn default_log_file() -> String { "piesquest.log".into() }
fn default_format() -> String { DEFAULT_FORMAT.into() }
fn default_volume() -> u8 { DEFAULT_VOLUME }
fn default_tick_rate() -> u64 { 40 }
fn default_tile_size() -> i32 { 40 }
fn default_moving_speed() -> i32 { MOVING_SPEED }
fn default_jumping_speed() -> i32 { JUMPING_SPEED }
fn default_jump_height() -> i32 { JUMP_HEIGHT } // three tiles
fn default_player_name() -> String { "Pies".into() }
fn default_initial_health() -> u32 { 3 }
fn default_strawberries_per_health() -> u32 { 10 }
fn default_jump_buttons() -> Vec<String> { vec!["A".into(), "B".into()] }
fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
            save_file: default_save_file(),
            log_file: default_log_file(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { format: default_format(), volume: default_volume() }
    }
}

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            tick_rate_ms: default_tick_rate(),
            tile_size: default_tile_size(),
            moving_speed: default_moving_speed(),
            jumping_speed: default_jumping_speed(),
            jump_height: default_jump_height(),
        }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            name: default_player_name(),
            initial_health: default_initial_health(),
            strawberries_per_health: default_strawberries_per_health(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump_buttons(),
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl TomlPhysics {
    /// Speeds are kept strictly below one tile so a sweep cannot skip a wall.
    fn into_config(self) -> PhysicsConfig {
        let tile_size = self.tile_size.max(2);
        let max_step = tile_size - 1;
        PhysicsConfig {
            tick_rate_ms: self.tick_rate_ms.max(1),
            tile_size,
            moving_speed: self.moving_speed.clamp(1, max_step),
            jumping_speed: self.jumping_speed.clamp(1, max_step),
            jump_height: self.jump_height.max(0),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        let mut cfg = GameConfig::from_toml(toml_cfg, &search_dirs);

        if let Some(saved) = load_settings(&settings_path(&cfg.save_file)) {
            cfg.display_format = saved.display_format().to_string();
            cfg.volume = saved.volume();
        }
        cfg
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let levels_dir = resolve_dir(&toml_cfg.general.levels_dir, search_dirs);
        let mut display_format = toml_cfg.display.format;
        if Parameter::new().set_format(&display_format).is_err() {
            warn!(format = %display_format, "invalid display format, using default");
            display_format = default_format();
        }

        GameConfig {
            physics: toml_cfg.physics.into_config(),
            player: PlayerConfig {
                name: toml_cfg.player.name,
                initial_health: toml_cfg.player.initial_health.max(1),
                strawberries_per_health: toml_cfg.player.strawberries_per_health,
            },
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
            },
            display_format,
            volume: toml_cfg.display.volume.min(100),
            levels_dir,
            save_file: PathBuf::from(toml_cfg.general.save_file),
            log_file: PathBuf::from(toml_cfg.general.log_file),
        }
    }

    /// The Parameter described by `[display]` (and any saved settings).
    pub fn parameter(&self) -> Parameter {
        let mut p = Parameter::new();
        if let Err(e) = p.set_format(&self.display_format) {
            warn!(error = %e, "display format rejected, using default");
        }
        if let Err(e) = p.set_volume(self.volume as i32) {
            warn!(error = %e, "volume rejected, using default");
        }
        p
    }
}

/// Where Parameter changes are persisted: beside the save file.
pub fn settings_path(save_file: &Path) -> PathBuf {
    save_file
        .parent()
        .map(|d| d.join(SETTINGS_FILE))
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
}

/// Write the current Parameter so it survives a restart.
pub fn store_settings(path: &Path, parameter: &Parameter) -> std::io::Result<()> {
    let text = toml::to_string(parameter)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, text)?;
    info!(path = %path.display(), "settings saved");
    Ok(())
}

/// Read persisted Parameter settings. Invalid content is ignored.
pub fn load_settings(path: &Path) -> Option<Parameter> {
    let text = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<Parameter>(&text) {
        Ok(saved) => {
            let mut p = Parameter::new();
            if p.set_format(saved.display_format()).is_err()
                || p.set_volume(saved.volume() as i32).is_err()
            {
                warn!(path = %path.display(), "settings out of range, ignored");
                return None;
            }
            Some(p)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "settings parse error, ignored");
            None
        }
    }
}

fn resolve_dir(dir: &str, search_dirs: &[PathBuf]) -> PathBuf {
    if PathBuf::from(dir).is_absolute() {
        return PathBuf::from(dir);
    }
    search_dirs.iter()
        .map(|d| d.join(dir))
        .find(|p| p.is_dir())
        .unwrap_or_else(|| PathBuf::from(dir))
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return parse_toml(&text),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read config");
                }
            }
        }
    }
    TomlConfig::default()
}

fn parse_toml(text: &str) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "config.toml parse error, using default settings");
            TomlConfig::default()
        }
    }
}
