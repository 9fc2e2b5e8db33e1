/// The step function: advances a level by one tick.
///
/// Processing order:
///   1. Horizontal movement
///   2. Jump start
///   3. Vertical movement (rise / fall / land)
///   4. Scrolling
///   5. Strawberry pickup
///   6. Fall off the bottom
///   7. End tile
///
/// Collision is tile-edge only (domain::collision). Screen positions are
/// derived from the level offsets (Level::to_screen).

use crate::domain::character::{Direction, FrameInput, MotionState};
use crate::domain::tile::Tile;
use super::event::GameEvent;
use super::game::{Game, Menu};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(game: &mut Game, input: FrameInput) -> Vec<GameEvent> {
    if game.menu != Menu::Playing || game.paused { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    game.tick += 1;
    game.tick_message();

    resolve_horizontal(game, input.movement);
    resolve_jump(game, input.jump, &mut events);
    resolve_vertical(game, &mut events);
    resolve_scroll(game);
    resolve_strawberries(game, &mut events);
    if resolve_fall_off(game, &mut events) { return events; }
    resolve_end(game, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_horizontal(game: &mut Game, movement: Option<Direction>) {
    if let Some(dir) = movement {
        game.move_player(dir);
    }
}

fn resolve_jump(game: &mut Game, jump: bool, events: &mut Vec<GameEvent>) {
    if jump && game.jump_player() {
        events.push(GameEvent::Jumped);
    }
}

fn resolve_vertical(game: &mut Game, events: &mut Vec<GameEvent>) {
    let speed = game.physics.jumping_speed;
    let level = &game.levels[game.current_level];
    let map = level.map_view();
    let ch = &mut game.character;
    let before = ch.hitbox(level.tile_width(), level.tile_height());

    match ch.motion {
        MotionState::Jumping { .. } => {
            let dy = ch.rise(speed);
            let sweep = map.sweep_y(&before, -dy);
            ch.position.y = sweep.pos;
            if sweep.hit {
                ch.bump_head();
            }
        }
        MotionState::Grounded if map.on_ground(&before) => {}
        MotionState::Grounded | MotionState::Falling => {
            let sweep = map.sweep_y(&before, speed);
            if sweep.hit {
                ch.position.y = sweep.pos;
                if !ch.is_grounded() {
                    ch.land();
                    events.push(GameEvent::Landed);
                }
            } else {
                ch.fall(speed);
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Scrolling
// ══════════════════════════════════════════════════════════════

/// Keep the player inside the middle band of the screen:
/// right of W/3 and left of W/2 horizontally, between H/3 and 2H/3
/// vertically, as far as the level edges allow.
fn resolve_scroll(game: &mut Game) {
    let (w, h) = (game.game_width(), game.game_height());
    let (ms, js) = (game.physics.moving_speed, game.physics.jumping_speed);
    let pos = game.character.position;
    let level = &mut game.levels[game.current_level];

    while level.to_screen(pos, h).x > w / 2 && !level.maximum_scroll_reached(w) {
        level.scroll_x(Direction::Right, ms);
    }
    while level.to_screen(pos, h).x < w / 3 && level.offset_x() < 0 {
        level.scroll_x(Direction::Left, ms);
    }
    while level.to_screen(pos, h).y < h / 3 {
        level.scroll_y(1, js);
    }
    while level.to_screen(pos, h).y > 2 * h / 3 && level.offset_y() > 0 {
        level.scroll_y(-1, js);
    }
    level.clamp_offsets();
}

// ══════════════════════════════════════════════════════════════
// Pickups / win / lose
// ══════════════════════════════════════════════════════════════

fn resolve_strawberries(game: &mut Game, events: &mut Vec<GameEvent>) {
    let per_health = game.player_config.strawberries_per_health;
    let level = &game.levels[game.current_level];
    let map = level.map_view();
    let rect = game.character.hitbox(level.tile_width(), level.tile_height());

    for (col, row) in map.cells_overlapping(&rect) {
        if map.tile_at(col, row) != Tile::Strawberry { continue; }
        let (col, row) = (col as usize, row as usize);
        let index = level.tile_index(col, row);
        if level.is_collected(index) || !game.pending_strawberries.insert(index) {
            continue;
        }
        events.push(GameEvent::StrawberryCollected { col, row });
        if game.character.collect_strawberry(per_health) {
            events.push(GameEvent::HealthGained);
        }
    }
}

/// Returns true when the attempt ended.
fn resolve_fall_off(game: &mut Game, events: &mut Vec<GameEvent>) -> bool {
    if game.character.position.y < game.level().pixel_height() {
        return false;
    }

    events.push(GameEvent::FellOffScreen);
    game.forfeit_pending();
    if game.character.lose_health() {
        game.restart_level();
    } else {
        events.push(GameEvent::GameOver);
        game.game_over();
    }
    true
}

fn resolve_end(game: &mut Game, events: &mut Vec<GameEvent>) {
    let level = game.level();
    let map = level.map_view();
    let rect = game.character.hitbox(level.tile_width(), level.tile_height());
    let reached = map.cells_overlapping(&rect)
        .into_iter()
        .any(|(c, r)| map.tile_at(c, r) == Tile::End);

    if reached {
        events.push(GameEvent::LevelCompleted);
        game.complete_level();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::character::{Position, JUMP_HEIGHT};
    use crate::sim::game::LevelSource;
    use crate::sim::level::Level;

    struct Fixture {
        _dir: tempfile::TempDir,
        game: Game,
    }

    fn fixture(rows: &[&str]) -> Fixture {
        fixture_levels(vec![Level::from_rows("1_t", "test", rows)])
    }

    fn fixture_levels(levels: Vec<Level>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = GameConfig::default();
        cfg.save_file = dir.path().join("save.dat");
        let mut game = Game::with_levels(&cfg, levels, LevelSource::Embedded);
        game.play_level(0).unwrap();
        Fixture { _dir: dir, game }
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn walk(dir: Direction) -> FrameInput {
        FrameInput { movement: Some(dir), jump: false }
    }

    fn jump() -> FrameInput {
        FrameInput { movement: None, jump: true }
    }

    fn run(game: &mut Game, input: FrameInput, ticks: usize) -> Vec<GameEvent> {
        let mut all = vec![];
        for _ in 0..ticks {
            all.extend(step(game, input));
        }
        all
    }

    // ── gating ──

    #[test]
    fn nothing_happens_outside_a_level() {
        let mut f = fixture(&["p  ", "xxx"]);
        f.game.to_main_menu();
        assert!(step(&mut f.game, walk(Direction::Right)).is_empty());
        assert_eq!(f.game.tick, 0);
    }

    #[test]
    fn pause_freezes_the_level() {
        let mut f = fixture(&["p  ", "xxx"]);
        f.game.paused = true;
        step(&mut f.game, walk(Direction::Right));
        assert_eq!(f.game.character.position, Position::new(0, 0));
    }

    // ── movement ──

    #[test]
    fn standing_start_lands_immediately() {
        let mut f = fixture(&["p  ", "xxx"]);
        let events = step(&mut f.game, idle());
        assert_eq!(events, vec![GameEvent::Landed]);
        assert!(f.game.character.is_grounded());
        assert_eq!(f.game.character.position.y, 0);
    }

    #[test]
    fn walking_right_moves_one_step_per_tick() {
        let mut f = fixture(&["p   ", "xxxx"]);
        run(&mut f.game, walk(Direction::Right), 3);
        assert_eq!(f.game.character.position.x, 24);
    }

    #[test]
    fn wall_stops_walking() {
        let mut f = fixture(&["p x", "xxx"]);
        run(&mut f.game, walk(Direction::Right), 10);
        assert_eq!(f.game.character.position.x, 40);
    }

    #[test]
    fn level_edge_stops_walking_left() {
        let mut f = fixture(&["p  ", "xxx"]);
        run(&mut f.game, walk(Direction::Left), 3);
        assert_eq!(f.game.character.position.x, 0);
    }

    #[test]
    fn jump_rises_then_falls_back() {
        let mut f = fixture(&["   ", "   ", "   ", "   ", "p  ", "xxx"]);
        step(&mut f.game, idle());
        let events = step(&mut f.game, jump());
        assert_eq!(events, vec![GameEvent::Jumped]);
        let ground = 160;
        assert_eq!(f.game.character.position.y, ground - 10);

        run(&mut f.game, idle(), (JUMP_HEIGHT / 10 - 1) as usize);
        assert_eq!(f.game.character.position.y, ground - JUMP_HEIGHT);
        assert_eq!(f.game.character.motion, MotionState::Falling);

        let events = run(&mut f.game, idle(), 20);
        assert!(events.contains(&GameEvent::Landed));
        assert_eq!(f.game.character.position.y, ground);
    }

    #[test]
    fn no_double_jump() {
        let mut f = fixture(&["   ", "   ", "   ", "p  ", "xxx"]);
        step(&mut f.game, idle());
        step(&mut f.game, jump());
        assert!(step(&mut f.game, jump()).is_empty());
    }

    #[test]
    fn ceiling_cuts_the_jump_short() {
        let mut f = fixture(&["xxx", "   ", "p  ", "xxx"]);
        step(&mut f.game, idle());
        run(&mut f.game, jump(), 1);
        run(&mut f.game, idle(), 5);
        // Head hit the ceiling at y = 40; now falling back down.
        assert!(f.game.character.position.y >= 40);
        assert_eq!(f.game.character.motion, MotionState::Falling);
        let events = run(&mut f.game, idle(), 10);
        assert!(events.contains(&GameEvent::Landed));
        assert_eq!(f.game.character.position.y, 80);
    }

    // ── scrolling ──

    #[test]
    fn walking_right_scrolls_wide_level() {
        let row_wall = "x".repeat(60);
        let row_start = format!("p{}", " ".repeat(59));
        let mut f = fixture(&[row_start.as_str(), row_wall.as_str()]);
        let w = f.game.game_width();
        run(&mut f.game, walk(Direction::Right), 100);

        let level = f.game.level();
        let screen = level.to_screen(f.game.character.position, f.game.game_height());
        assert!(level.offset_x() < 0);
        assert!(screen.x <= w / 2);

        run(&mut f.game, walk(Direction::Left), 100);
        assert_eq!(f.game.level().offset_x(), 0);
    }

    #[test]
    fn scroll_never_passes_right_edge() {
        let row_wall = "x".repeat(30);
        let row_start = format!("p{}", " ".repeat(29));
        let mut f = fixture(&[row_start.as_str(), row_wall.as_str()]);
        let w = f.game.game_width();
        run(&mut f.game, walk(Direction::Right), 300);
        let level = f.game.level();
        assert!(level.maximum_scroll_reached(w));
        // Last column starts at the right edge, within one scroll step.
        let left = 29 * 40 + level.offset_x();
        assert!(left <= w && left > w - 8);
    }

    // ── strawberries ──

    #[test]
    fn strawberries_are_pending_until_the_end() {
        let mut f = fixture(&["ps  ", "xxxx"]);
        let events = run(&mut f.game, walk(Direction::Right), 2);
        assert!(events.contains(&GameEvent::StrawberryCollected { col: 1, row: 0 }));
        assert_eq!(f.game.character.strawberries, 1);
        assert!(f.game.pending_strawberries.contains(&1));
        assert!(!f.game.level().is_collected(1));

        // Standing on it does not collect it again.
        run(&mut f.game, idle(), 3);
        assert_eq!(f.game.character.strawberries, 1);
    }

    #[test]
    fn tenth_strawberry_gives_health() {
        let mut f = fixture(&["ps  ", "xxxx"]);
        f.game.character.strawberries = 9;
        let events = run(&mut f.game, walk(Direction::Right), 2);
        assert!(events.contains(&GameEvent::HealthGained));
        assert_eq!(f.game.character.health, 4);
    }

    #[test]
    fn banked_strawberries_cannot_be_collected_again() {
        let mut f = fixture(&["ps  ", "xxxx"]);
        f.game.levels[0].register_collected_strawberries(&[1].into_iter().collect());
        run(&mut f.game, walk(Direction::Right), 10);
        assert_eq!(f.game.character.strawberries, 0);
    }

    // ── fall off ──

    #[test]
    fn falling_off_costs_health_and_restarts() {
        let mut f = fixture(&["ps   ", "xx   "]);
        let mut fell = false;
        for _ in 0..100 {
            if step(&mut f.game, walk(Direction::Right)).contains(&GameEvent::FellOffScreen) {
                fell = true;
                break;
            }
        }
        assert!(fell);
        assert_eq!(f.game.character.health, 2);
        assert_eq!(f.game.menu, Menu::Playing);
        // Pending strawberry forfeited; player back at the start.
        assert_eq!(f.game.character.strawberries, 0);
        assert!(f.game.pending_strawberries.is_empty());
        assert!(f.game.character.position.x < 80);
    }

    #[test]
    fn last_health_point_ends_the_game() {
        let mut f = fixture(&["p  ", "   "]);
        f.game.character.health = 1;
        let events = run(&mut f.game, idle(), 30);
        assert!(events.contains(&GameEvent::FellOffScreen));
        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(f.game.menu, Menu::GameOver);
        assert!(!f.game.has_save);
    }

    // ── end tile ──

    #[test]
    fn reaching_the_end_wins_and_saves() {
        let mut f = fixture_levels(vec![
            Level::from_rows("1_t", "test", &["pse", "xxx"]),
            Level::from_rows("2_t", "next", &["p e", "xxx"]),
        ]);
        let events = run(&mut f.game, walk(Direction::Right), 10);
        assert!(events.contains(&GameEvent::LevelCompleted));
        assert_eq!(f.game.menu, Menu::Victory);
        assert!(!f.game.levels[0].is_locked());
        assert!(f.game.levels[0].is_collected(1));
        assert!(f.game.has_save);
        assert!(f.game.is_playable(1));
    }

    #[test]
    fn restart_forfeits_pending() {
        let mut f = fixture(&["ps   e", "xxxxxx"]);
        run(&mut f.game, walk(Direction::Right), 6);
        assert_eq!(f.game.character.strawberries, 1);
        f.game.restart_level();
        assert_eq!(f.game.character.strawberries, 0);
        assert_eq!(f.game.character.position, Position::new(0, 0));
        assert_eq!(f.game.character.health, 3);
    }

    /// Ten strawberries in, Pies gains a health point; leaving takes it back.
    fn collect_tenth(f: &mut Fixture) {
        run(&mut f.game, walk(Direction::Right), 3);
        assert_eq!(f.game.character.strawberries, 10);
        assert_eq!(f.game.character.health, 4);
    }

    fn replay_with_nine(f: &mut Fixture) {
        f.game.character.strawberries = 9;
        f.game.play_level(0).unwrap();
    }

    #[test]
    fn restarting_takes_back_the_health_bonus() {
        let mut f = fixture(&["ps   e", "xxxxxx"]);
        replay_with_nine(&mut f);
        for _ in 0..5 {
            collect_tenth(&mut f);
            f.game.restart_level();
            assert_eq!(f.game.character.strawberries, 9);
            assert_eq!(f.game.character.health, 3);
        }
    }

    #[test]
    fn leaving_takes_back_the_health_bonus() {
        let mut f = fixture(&["ps   e", "xxxxxx"]);
        for _ in 0..5 {
            replay_with_nine(&mut f);
            collect_tenth(&mut f);
            f.game.back();
            assert_eq!(f.game.menu, Menu::MainMenu);
            assert_eq!(f.game.character.strawberries, 9);
            assert_eq!(f.game.character.health, 3);
        }
    }

    #[test]
    fn falling_after_a_bonus_still_costs_health() {
        let mut f = fixture(&["ps   ", "xx   "]);
        f.game.character.health = 1;
        replay_with_nine(&mut f);
        let events = run(&mut f.game, walk(Direction::Right), 100);
        assert!(events.contains(&GameEvent::HealthGained));
        assert!(events.contains(&GameEvent::GameOver));
        assert_eq!(f.game.menu, Menu::GameOver);
    }

    // ── vertical scrolling ──

    #[test]
    fn tall_level_scrolls_with_the_player() {
        // 30 rows on an 18-row screen: a ledge near the top, floor at the bottom.
        let mut rows = vec!["      "; 30];
        rows[4] = "p     ";
        rows[5] = "xx    ";
        rows[29] = "xxxxxx";
        let mut f = fixture(&rows);
        let h = f.game.game_height();
        let start = f.game.level().offset_y();
        assert_eq!(start, 560);

        step(&mut f.game, idle());
        step(&mut f.game, jump());
        run(&mut f.game, idle(), 11);
        let level = f.game.level();
        assert!(level.offset_y() > start);
        assert!(level.to_screen(f.game.character.position, h).y >= h / 3);

        // Walk off the ledge and drop to the floor: the view follows down.
        let mut landed_on_floor = false;
        for _ in 0..200 {
            step(&mut f.game, walk(Direction::Right));
            assert!(f.game.level().offset_y() >= 0);
            if f.game.character.position.y == 1120 && f.game.character.is_grounded() {
                landed_on_floor = true;
            }
        }
        assert!(landed_on_floor);
        assert_eq!(f.game.level().offset_y(), 0);
    }
}
