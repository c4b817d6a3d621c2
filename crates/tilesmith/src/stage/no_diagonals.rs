//! Iterative removal of diagonal-only connections.
use rand::RngCore;

use crate::error::Result;
use crate::events::EventSink;
use crate::grid::{Direction, Tile, TileKind, TileMap};
use crate::stage::{util, ChoiceOption, Schema, SettingSpec, Settings, Stage};

const DIAGONAL_TILE_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption {
        label: "Wall",
        value: "wall",
    },
    ChoiceOption {
        label: "Fence",
        value: "fence",
    },
];

/// Each diagonal pair together with the two orthogonal neighbors between them.
const DIAGONAL_CHECKS: [(Direction, Direction, Direction); 4] = [
    (Direction::UpLeft, Direction::Left, Direction::Up),
    (Direction::UpRight, Direction::Right, Direction::Up),
    (Direction::DownLeft, Direction::Left, Direction::Down),
    (Direction::DownRight, Direction::Right, Direction::Down),
];

/// Converts tiles that touch a same-kind tile only diagonally to empty,
/// repeating full passes until a pass converts nothing.
///
/// Each pass visits the tiles in a freshly shuffled order, so which member of
/// a diagonal pair survives is seed-dependent. Convergence is guaranteed by
/// the monotone non-increasing count of the target kind.
pub struct NoDiagonals;

impl Stage for NoDiagonals {
    fn name(&self) -> &'static str {
        "nodiagonals"
    }

    fn label(&self) -> &'static str {
        "No Diagonals"
    }

    fn schema(&self) -> Schema {
        Schema::new().with(
            "tile",
            SettingSpec::Choice {
                label: "Tile",
                default: "wall",
                options: DIAGONAL_TILE_OPTIONS,
                random_subset: &[],
            },
        )
    }

    fn execute(
        &self,
        map: &mut TileMap,
        settings: &Settings,
        rng: &mut dyn RngCore,
        _sink: &mut dyn EventSink,
    ) -> Result<()> {
        let target = settings.tile_kind("tile")?;

        loop {
            let before = map.count_of_kind(target);
            let tiles = util::shuffle(rng, map.tiles_of_kind(target));
            for (x, y) in tiles {
                let mut diagonal = false;
                for (diag, ortho_a, ortho_b) in DIAGONAL_CHECKS {
                    let Some(corner) = map.adjacent(x, y, diag) else {
                        continue;
                    };
                    if corner.kind() != target {
                        continue;
                    }
                    let a = map.adjacent(x, y, ortho_a).map(Tile::kind);
                    let b = map.adjacent(x, y, ortho_b).map(Tile::kind);
                    if a == Some(TileKind::Empty) && b == Some(TileKind::Empty) {
                        diagonal = true;
                        break;
                    }
                }
                if diagonal {
                    map.symmetric_set_kind(x, y, TileKind::Empty)?;
                }
            }
            if map.count_of_kind(target) == before {
                return Ok(());
            }
        }
    }
}
