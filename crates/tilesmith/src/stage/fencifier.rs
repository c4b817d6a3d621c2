//! Converts qualifying walls to fences based on orthogonal neighborhood shape.
use rand::RngCore;

use crate::error::Result;
use crate::events::EventSink;
use crate::grid::{Direction, Tile, TileKind, TileMap};
use crate::rng::rand01;
use crate::stage::{Schema, SettingSpec, Settings, Stage};

/// Tests every wall tile against two independent placement conditions:
/// "lone wall" (all four orthogonal neighbors empty) and "through wall"
/// (one opposite pair empty, the other opposite pair wall). Matching walls
/// become fences with the configured probability.
pub struct Fencifier;

impl Stage for Fencifier {
    fn name(&self) -> &'static str {
        "fencifier"
    }

    fn label(&self) -> &'static str {
        "Fencifier"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with(
                "chance",
                SettingSpec::Number {
                    label: "Chance",
                    default: 0.1,
                    min: 0.0,
                    max: 1.0,
                    step: 0.01,
                    random_range: Some((0.0, 0.5)),
                },
            )
            .with(
                "lone_walls",
                SettingSpec::Toggle {
                    label: "Lone Walls",
                    default: true,
                    random_flip: true,
                },
            )
            .with(
                "through_walls",
                SettingSpec::Toggle {
                    label: "Through Walls",
                    default: true,
                    random_flip: true,
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
        let chance = settings.number("chance")?;
        let lone_walls = settings.toggle("lone_walls")?;
        let through_walls = settings.toggle("through_walls")?;

        let empty = Some(TileKind::Empty);
        let wall = Some(TileKind::Wall);

        for (x, y) in map.tiles_of_kind(TileKind::Wall) {
            let left = map.adjacent(x, y, Direction::Left).map(Tile::kind);
            let right = map.adjacent(x, y, Direction::Right).map(Tile::kind);
            let above = map.adjacent(x, y, Direction::Up).map(Tile::kind);
            let below = map.adjacent(x, y, Direction::Down).map(Tile::kind);

            let mut possible = false;
            if lone_walls && left == empty && right == empty && above == empty && below == empty {
                possible = true;
            }
            if through_walls {
                if left == empty && right == empty && above == wall && below == wall {
                    possible = true;
                }
                if left == wall && right == wall && above == empty && below == empty {
                    possible = true;
                }
            }

            if possible && rand01(rng) < chance {
                map.symmetric_set_kind(x, y, TileKind::Fence)?;
            }
        }
        Ok(())
    }
}
