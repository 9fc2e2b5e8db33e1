/// Tile-edge collision: the one place that decides what blocks movement.
///
/// ## Map bounds
///
///   - Columns left of 0 or right of the widest row are WALL
///     (the level edges are closed).
///   - Rows above the top or below the bottom are EMPTY
///     (the player can jump out of the top and fall out of the bottom).
///   - Cells missing from a short row are EMPTY.
///
/// ## Sweeps
///
/// Movement is resolved one axis at a time. The rectangle is moved by the
/// full step; if it then overlaps a solid tile it is snapped back against the
/// edge of the nearest one. Steps must stay below one tile, otherwise a thin
/// wall could be skipped (the config layer clamps them).

use super::character::Rect;
use super::tile::Tile;

/// Immutable view of a level's tile grid for collision queries.
pub struct MapView<'a> {
    pub tiles: &'a [Vec<Tile>],
    pub width: usize,
    pub tile_w: i32,
    pub tile_h: i32,
}

/// Result of a single-axis sweep.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Sweep {
    /// New coordinate along the swept axis.
    pub pos: i32,
    /// Did the sweep stop against a solid tile?
    pub hit: bool,
}

impl<'a> MapView<'a> {
    pub fn height(&self) -> usize {
        self.tiles.len()
    }

    /// Tile at (col, row), applying the bound rules above.
    pub fn tile_at(&self, col: i32, row: i32) -> Tile {
        if col < 0 || col as usize >= self.width {
            return Tile::Wall;
        }
        if row < 0 || row as usize >= self.height() {
            return Tile::Empty;
        }
        self.tiles[row as usize]
            .get(col as usize)
            .copied()
            .unwrap_or(Tile::Empty)
    }

    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        self.tile_at(col, row).is_solid()
    }

    /// Every (col, row) the rectangle touches.
    pub fn cells_overlapping(&self, r: &Rect) -> Vec<(i32, i32)> {
        let c0 = r.x.div_euclid(self.tile_w);
        let c1 = (r.right() - 1).div_euclid(self.tile_w);
        let r0 = r.y.div_euclid(self.tile_h);
        let r1 = (r.bottom() - 1).div_euclid(self.tile_h);
        let mut cells = Vec::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                cells.push((col, row));
            }
        }
        cells
    }

    /// Does the rectangle overlap any solid tile?
    pub fn blocked(&self, r: &Rect) -> bool {
        self.cells_overlapping(r)
            .into_iter()
            .any(|(c, row)| self.is_solid(c, row))
    }

    /// Move horizontally by `dx`, stopping at the first wall.
    pub fn sweep_x(&self, r: &Rect, dx: i32) -> Sweep {
        let moved = Rect { x: r.x + dx, ..*r };
        let solid: Vec<i32> = self.cells_overlapping(&moved)
            .into_iter()
            .filter(|&(c, row)| self.is_solid(c, row))
            .map(|(c, _)| c)
            .collect();

        if solid.is_empty() || dx == 0 {
            return Sweep { pos: moved.x, hit: !solid.is_empty() };
        }

        let pos = if dx > 0 {
            let col = solid.iter().copied().min().unwrap_or(0);
            col * self.tile_w - r.w
        } else {
            let col = solid.iter().copied().max().unwrap_or(0);
            (col + 1) * self.tile_w
        };
        Sweep { pos, hit: true }
    }

    /// Move vertically by `dy` (positive = down), stopping at the first wall.
    pub fn sweep_y(&self, r: &Rect, dy: i32) -> Sweep {
        let moved = Rect { y: r.y + dy, ..*r };
        let solid: Vec<i32> = self.cells_overlapping(&moved)
            .into_iter()
            .filter(|&(c, row)| self.is_solid(c, row))
            .map(|(_, row)| row)
            .collect();

        if solid.is_empty() || dy == 0 {
            return Sweep { pos: moved.y, hit: !solid.is_empty() };
        }

        let pos = if dy > 0 {
            let row = solid.iter().copied().min().unwrap_or(0);
            row * self.tile_h - r.h
        } else {
            let row = solid.iter().copied().max().unwrap_or(0);
            (row + 1) * self.tile_h
        };
        Sweep { pos, hit: true }
    }

    /// Is there a solid tile directly under the rectangle's bottom edge?
    pub fn on_ground(&self, r: &Rect) -> bool {
        let probe = Rect { y: r.bottom(), h: 1, ..*r };
        self.blocked(&probe)
    }
}
