/// The player character and the small geometry types it moves with.
/// Positions are world pixels; the hit box is one tile.

pub const MOVING_SPEED: i32 = 8;
pub const JUMPING_SPEED: i32 = 10;
pub const JUMP_HEIGHT: i32 = 120;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn add_to_x(&mut self, dx: i32) {
        self.x += dx;
    }

    pub fn add_to_y(&mut self, dy: i32) {
        self.y += dy;
    }
}

/// Axis-aligned rectangle in pixels. Right and bottom edges are exclusive.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

/// Horizontal movement / scroll direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
}

/// Vertical motion state machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MotionState {
    Grounded,
    /// Rising; `remaining` pixels of the jump are left.
    Jumping { remaining: i32 },
    Falling,
}

/// Frame input: movement is continuous (held key), jump is edge-triggered.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub movement: Option<Direction>,
    pub jump: bool,
}

#[derive(Clone, Debug)]
pub struct Character {
    pub name: String,
    pub position: Position,
    pub health: u32,
    pub strawberries: u32,
    pub facing: Facing,
    pub motion: MotionState,
}

impl Character {
    pub fn new(name: &str, health: u32) -> Self {
        Character {
            name: name.to_string(),
            position: Position::default(),
            health,
            strawberries: 0,
            facing: Facing::Right,
            motion: MotionState::Falling,
        }
    }

    /// Hit box for the given tile size.
    pub fn hitbox(&self, tile_w: i32, tile_h: i32) -> Rect {
        Rect::new(self.position.x, self.position.y, tile_w, tile_h)
    }

    pub fn move_left(&mut self, step: i32) {
        self.position.add_to_x(-step);
        self.facing = Facing::Left;
    }

    pub fn move_right(&mut self, step: i32) {
        self.position.add_to_x(step);
        self.facing = Facing::Right;
    }

    /// Start a jump of `height` pixels. Only possible from the ground.
    pub fn jump(&mut self, height: i32) -> bool {
        if self.motion != MotionState::Grounded {
            return false;
        }
        self.motion = MotionState::Jumping { remaining: height };
        true
    }

    /// Rise by at most `step` pixels. Returns the distance actually planned.
    pub fn rise(&mut self, step: i32) -> i32 {
        match self.motion {
            MotionState::Jumping { remaining } => {
                let dy = step.min(remaining);
                let left = remaining - dy;
                self.position.add_to_y(-dy);
                self.motion = if left > 0 {
                    MotionState::Jumping { remaining: left }
                } else {
                    MotionState::Falling
                };
                dy
            }
            _ => 0,
        }
    }

    pub fn fall(&mut self, step: i32) {
        self.position.add_to_y(step);
        self.motion = MotionState::Falling;
    }

    pub fn land(&mut self) {
        self.motion = MotionState::Grounded;
    }

    /// Ceiling hit: the rest of the jump is cancelled.
    pub fn bump_head(&mut self) {
        self.motion = MotionState::Falling;
    }

    pub fn is_grounded(&self) -> bool {
        self.motion == MotionState::Grounded
    }

    /// Count a strawberry. Every `per_health`-th one grants a health point,
    /// in which case this returns true.
    pub fn collect_strawberry(&mut self, per_health: u32) -> bool {
        self.strawberries += 1;
        if per_health > 0 && self.strawberries % per_health == 0 {
            self.health += 1;
            true
        } else {
            false
        }
    }

    /// Lose one health point. Returns whether the character is still alive.
    pub fn lose_health(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn reset_position(&mut self, pos: Position) {
        self.position = pos;
        self.motion = MotionState::Falling;
        self.facing = Facing::Right;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_only_from_ground() {
        let mut c = Character::new("Pies", 3);
        assert!(!c.jump(JUMP_HEIGHT));
        c.land();
        assert!(c.jump(JUMP_HEIGHT));
        assert!(!c.jump(JUMP_HEIGHT));
    }

    #[test]
    fn rise_consumes_jump_then_falls() {
        let mut c = Character::new("Pies", 3);
        c.land();
        c.jump(25);
        assert_eq!(c.rise(10), 10);
        assert_eq!(c.rise(10), 10);
        assert_eq!(c.motion, MotionState::Jumping { remaining: 5 });
        assert_eq!(c.rise(10), 5);
        assert_eq!(c.motion, MotionState::Falling);
        assert_eq!(c.position.y, -25);
    }

    #[test]
    fn tenth_strawberry_grants_health() {
        let mut c = Character::new("Pies", 3);
        for _ in 0..9 {
            assert!(!c.collect_strawberry(10));
        }
        assert!(c.collect_strawberry(10));
        assert_eq!(c.health, 4);
        assert_eq!(c.strawberries, 10);
    }

    #[test]
    fn health_never_underflows() {
        let mut c = Character::new("Pies", 1);
        assert!(!c.lose_health());
        assert!(!c.lose_health());
        assert_eq!(c.health, 0);
    }

    #[test]
    fn moving_sets_facing() {
        let mut c = Character::new("Pies", 3);
        c.move_left(MOVING_SPEED);
        assert_eq!(c.facing, Facing::Left);
        assert_eq!(c.position.x, -MOVING_SPEED);
        c.move_right(MOVING_SPEED);
        assert_eq!(c.facing, Facing::Right);
        assert_eq!(c.position.x, 0);
    }

}
