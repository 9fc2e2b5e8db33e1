/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Wall,       // Solid
    End,        // Touching it finishes the level
    Strawberry, // Collectible
    Player,     // Start position, drawn as empty
}

impl Tile {
    /// Decode one character of a level file. Unknown characters are empty.
    pub fn from_char(c: char) -> Tile {
        match c.to_ascii_lowercase() {
            'x' => Tile::Wall,
            'e' => Tile::End,
            's' => Tile::Strawberry,
            'p' => Tile::Player,
            _ => Tile::Empty,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Wall => 'x',
            Tile::End => 'e',
            Tile::Strawberry => 's',
            Tile::Player => 'p',
        }
    }

    /// Does this tile block movement?
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Is this tile drawn on screen?
    pub fn is_visible(self) -> bool {
        matches!(self, Tile::Wall | Tile::End | Tile::Strawberry)
    }
}
