/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags};
use crossterm::{execute, terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::character::{Direction, FrameInput};
use sim::event::GameEvent;
use sim::game::{Game, Menu, MenuAction};
use sim::step;
use ui::gamepad::GamepadState;
use ui::input::{Action, InputState};
use ui::renderer::Renderer;
use ui::sound::{sfx_for, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() -> anyhow::Result<()> {
    let config = GameConfig::load();
    init_tracing(&config.log_file)?;
    info!(levels = %config.levels_dir.display(), format = %config.display_format, "starting");

    let mut game = Game::new(&config).context("could not load the levels")?;

    let mut renderer = Renderer::new();
    renderer.init().context("terminal init failed")?;
    let enhanced = enable_key_release();

    let mut sound = SoundEngine::new(game.parameter().volume());

    let result = game_loop(&mut game, &mut renderer, sound.as_mut(), &config, enhanced);

    if enhanced {
        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
    }
    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    result?;

    info!(strawberries = game.character.strawberries, "bye");
    println!();
    println!("Thanks for playing Pies's Quest!");
    println!("Strawberries: {}", game.character.strawberries);
    Ok(())
}

/// Log to a file: the terminal belongs to the renderer.
fn init_tracing(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Ask for key release events. Without them held keys time out instead.
fn enable_key_release() -> bool {
    if !terminal::supports_keyboard_enhancement().unwrap_or(false) {
        return false;
    }
    let flags = KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
    match execute!(std::io::stdout(), PushKeyboardEnhancementFlags(flags)) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "keyboard enhancement refused");
            false
        }
    }
}

fn game_loop(
    game: &mut Game,
    renderer: &mut Renderer,
    mut sound: Option<&mut SoundEngine>,
    config: &GameConfig,
    enhanced: bool,
) -> anyhow::Result<()> {
    let mut kb = InputState::new();
    kb.honor_release = enhanced;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.physics.tick_rate_ms);

    let mut pending_jump = false;
    let mut volume = game.parameter().volume();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            if game.menu == Menu::Playing {
                game.back();
            }
            break;
        }
        if handle_meta(game, &kb, &gp) == MenuAction::Quit {
            break;
        }

        // Jump presses land between ticks; keep them for the next one.
        if game.menu == Menu::Playing && !game.paused {
            pending_jump |= kb.pressed(Action::Jump) || gp.jump_pressed();
        }

        if last_tick.elapsed() >= tick_rate {
            if game.menu == Menu::Playing && !game.paused {
                let input = FrameInput {
                    movement: detect_movement(&kb, &gp),
                    jump: std::mem::take(&mut pending_jump),
                };
                let events = step::step(game, input);
                play_events(sound.as_deref(), &events);
            } else {
                pending_jump = false;
                game.tick_message();
            }
            last_tick = Instant::now();
        }

        if game.parameter().volume() != volume {
            volume = game.parameter().volume();
            if let Some(s) = sound.as_deref_mut() {
                s.set_volume(volume);
            }
        }

        renderer.render(game).context("drawing failed")?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn play_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        if let Some(effect) = sfx_for(event) {
            sfx.play(effect);
        }
    }
}

fn detect_movement(kb: &InputState, gp: &GamepadState) -> Option<Direction> {
    let left = kb.held(Action::Left) || kb.pressed(Action::Left) || gp.left_held();
    let right = kb.held(Action::Right) || kb.pressed(Action::Right) || gp.right_held();
    match (left, right) {
        (true, false) => Some(Direction::Left),
        (false, true) => Some(Direction::Right),
        _ => None,
    }
}

/// Keys that act outside the simulation. Returns `Quit` to leave the loop.
fn handle_meta(game: &mut Game, kb: &InputState, gp: &GamepadState) -> MenuAction {
    let confirm = kb.pressed(Action::Confirm) || gp.confirm_pressed();
    let back = kb.pressed(Action::Back) || gp.cancel_pressed();

    if game.menu == Menu::Playing {
        // F1: Pause / Resume
        if kb.pressed(Action::Pause) {
            game.paused = !game.paused;
            if game.paused {
                game.set_message("PAUSED  [F1] Resume", 0);
            } else {
                game.message.clear();
                game.message_timer = 0;
            }
        } else if back {
            game.back();
        } else if kb.pressed(Action::Restart) {
            game.restart_level();
            if game.menu == Menu::Playing {
                game.set_message("Level restarted", sim::game::MESSAGE_TICKS);
            }
        }
        return MenuAction::Stay;
    }

    if game.menu == Menu::MainMenu && kb.pressed(Action::Quit) {
        return MenuAction::Quit;
    }
    if kb.pressed(Action::Up) || gp.up_pressed() {
        game.goto_select(-1);
    } else if kb.pressed(Action::Down) || gp.down_pressed() {
        game.goto_select(1);
    } else if kb.pressed(Action::Left) || gp.left_pressed() {
        game.adjust(-1);
    } else if kb.pressed(Action::Right) || gp.right_pressed() {
        game.adjust(1);
    } else if confirm {
        return game.confirm();
    } else if back {
        game.back();
    }
    MenuAction::Stay
}
