/// Keyboard tracker.
///
/// Keys are mapped to game actions; an action is
///   - *held* while any of its keys is down (walking),
///   - *pressed* on the frame one of its keys goes down (jump, menus).
///
/// Terminals without keyboard enhancement never report releases, so a key
/// counts as released after `HOLD_TIMEOUT` without a Press/Repeat event.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Confirm,
    Back,
    Pause,
    Restart,
    Quit,
}

/// Every action a key triggers. Up/W/Space jump in a level and move the
/// cursor in menus, so one key can carry several actions.
fn actions_for(code: KeyCode) -> &'static [Action] {
    use Action::*;
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => &[Left],
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => &[Right],
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => &[Up, Jump],
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => &[Down],
        KeyCode::Char(' ') => &[Jump],
        KeyCode::Enter => &[Confirm],
        KeyCode::Esc => &[Back],
        KeyCode::F(1) => &[Pause],
        KeyCode::Char('r') | KeyCode::Char('R') => &[Restart],
        KeyCode::Char('q') | KeyCode::Char('Q') => &[Quit],
        _ => &[],
    }
}

pub struct InputState {
    /// Last Press/Repeat per key.
    last_active: HashMap<KeyCode, Instant>,
    /// Keys that went down during the last drain.
    fresh_presses: Vec<KeyCode>,
    ctrl_c: bool,
    /// Release events are only trusted once keyboard enhancement is on.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Read every pending terminal event. Call once per frame.
    pub fn drain_events(&mut self) {
        self.begin_frame();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }
        self.expire(Instant::now());
    }

    fn begin_frame(&mut self) {
        self.fresh_presses.clear();
        self.ctrl_c = false;
    }

    fn record(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.ctrl_c = true;
            return;
        }

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.key_held(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn key_held(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active.get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    /// Is any key bound to `action` down right now?
    pub fn held(&self, action: Action) -> bool {
        let now = Instant::now();
        self.last_active.keys()
            .any(|&code| actions_for(code).contains(&action) && self.key_held(code, now))
    }

    /// Did a key bound to `action` go down this frame?
    pub fn pressed(&self, action: Action) -> bool {
        self.fresh_presses.iter().any(|&code| actions_for(code).contains(&action))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.ctrl_c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn first_press_is_fresh_repeat_is_not() {
        let mut input = InputState::new();
        let now = Instant::now();
        input.begin_frame();
        input.record(press(KeyCode::Char(' ')), now);
        assert!(input.pressed(Action::Jump));

        input.begin_frame();
        input.record(press(KeyCode::Char(' ')), now);
        assert!(!input.pressed(Action::Jump));
        assert!(input.held(Action::Jump));
    }

    #[test]
    fn up_key_carries_jump_and_menu_up() {
        let mut input = InputState::new();
        input.begin_frame();
        input.record(press(KeyCode::Up), Instant::now());
        assert!(input.pressed(Action::Up));
        assert!(input.pressed(Action::Jump));
        assert!(!input.pressed(Action::Down));
    }

    #[test]
    fn keys_expire_without_repeat() {
        let mut input = InputState::new();
        let then = Instant::now();
        input.begin_frame();
        input.record(press(KeyCode::Left), then);
        input.expire(then + HOLD_TIMEOUT);
        assert!(!input.held(Action::Left));
    }

    #[test]
    fn release_only_counts_when_honored() {
        let mut input = InputState::new();
        let now = Instant::now();
        input.record(press(KeyCode::Right), now);
        input.record(release(KeyCode::Right), now);
        assert!(input.held(Action::Right));

        input.honor_release = true;
        input.record(release(KeyCode::Right), now);
        assert!(!input.held(Action::Right));
    }

    #[test]
    fn ctrl_c_is_not_a_key_press() {
        let mut input = InputState::new();
        input.begin_frame();
        input.record(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(input.ctrl_c_pressed());
        assert!(input.fresh_presses.is_empty());
    }
}
