//! Grid data model: tile kinds, blend modes, symmetry, and the tile map arena.
use std::fmt;

pub mod tile;
pub mod tilemap;

pub use tile::Tile;
pub use tilemap::{TileChange, TileMap};

/// Property marking a tile whose kind can never change (the border ring).
pub const PROP_IMMUTABLE: &str = "immutable";
/// Property present on every tile until its first write.
pub const PROP_UNTOUCHED: &str = "untouched";

/// The kind of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    Empty,
    Wall,
    Fence,
}

impl TileKind {
    /// Stable string form, used by enumerated stage settings.
    pub const fn as_str(self) -> &'static str {
        match self {
            TileKind::Empty => "empty",
            TileKind::Wall => "wall",
            TileKind::Fence => "fence",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "empty" => Some(TileKind::Empty),
            "wall" => Some(TileKind::Wall),
            "fence" => Some(TileKind::Fence),
            _ => None,
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy governing how kind-writes are applied to tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// The tile becomes the written kind unconditionally.
    #[default]
    Overwrite,
    /// The tile becomes the written kind only if it is currently empty.
    Overlay,
    /// The tile becomes empty regardless of the written kind.
    Clear,
}

/// Mirror mode applied to symmetric writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Symmetry {
    #[default]
    None,
    /// Mirror across the vertical center line.
    X,
    /// Mirror across the horizontal center line.
    Y,
    /// All four combinations of the `X` and `Y` mirrors.
    Xy,
    /// Rotational symmetry around the grid center with `points` arms.
    Radial { points: u32 },
}

/// One of the eight neighbor directions. The grid does not wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Coordinate offset of this direction; `Up` decreases `y`.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (1, -1),
            Direction::DownLeft => (-1, 1),
            Direction::DownRight => (1, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in [TileKind::Empty, TileKind::Wall, TileKind::Fence] {
            assert_eq!(TileKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(TileKind::parse("none"), None);
    }

    #[test]
    fn direction_offsets_cover_all_neighbors() {
        let mut seen: Vec<(i32, i32)> = Direction::ALL.iter().map(|d| d.offset()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 8);
        assert!(!seen.contains(&(0, 0)));
    }
}
