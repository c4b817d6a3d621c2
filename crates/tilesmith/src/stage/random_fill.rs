//! Uniform random fill over the whole grid.
use rand::RngCore;

use crate::error::Result;
use crate::events::EventSink;
use crate::grid::TileMap;
use crate::rng::rand01;
use crate::stage::{Schema, SettingSpec, Settings, Stage, TILE_OPTIONS_WITH_NONE};

/// Draws one value per cell in row-major order and writes one of two
/// configured kinds; a `"none"` target skips the write for that branch.
pub struct RandomFill;

impl Stage for RandomFill {
    fn name(&self) -> &'static str {
        "random"
    }

    fn label(&self) -> &'static str {
        "Random"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with(
                "tile1",
                SettingSpec::Choice {
                    label: "Tile 1",
                    default: "wall",
                    options: TILE_OPTIONS_WITH_NONE,
                    random_subset: &[],
                },
            )
            .with(
                "tile2",
                SettingSpec::Choice {
                    label: "Tile 2",
                    default: "empty",
                    options: TILE_OPTIONS_WITH_NONE,
                    random_subset: &[],
                },
            )
            .with(
                "chance",
                SettingSpec::Number {
                    label: "Chance",
                    default: 0.5,
                    min: 0.0,
                    max: 1.0,
                    step: 0.01,
                    random_range: Some((0.0, 1.0)),
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
        let tile1 = settings.optional_tile_kind("tile1")?;
        let tile2 = settings.optional_tile_kind("tile2")?;
        let chance = settings.number("chance")?;

        for y in 0..map.height() {
            for x in 0..map.width() {
                let target = if rand01(rng) < chance { tile1 } else { tile2 };
                if let Some(kind) = target {
                    map.symmetric_set_kind(x, y, kind)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileKind;
    use crate::rng::{hash_seed, Mulberry32};

    fn run(map: &mut TileMap, settings: Settings, seed: &str) {
        let stage = RandomFill;
        let resolved = stage.schema().resolve(&settings);
        let mut rng = Mulberry32::new(hash_seed(seed));
        stage
            .execute(map, &resolved, &mut rng, &mut ())
            .expect("stage succeeds");
    }

    #[test]
    fn full_chance_fills_every_interior_tile() {
        let mut map = TileMap::new(5, 5).expect("valid dimensions");
        let settings = Settings::new()
            .with_choice("tile1", "wall")
            .with_choice("tile2", "empty")
            .with_number("chance", 1.0);
        run(&mut map, settings, "abc");

        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(
                    map.get_tile(x, y).expect("in range").kind(),
                    TileKind::Wall,
                    "at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn none_branch_leaves_tiles_alone() {
        let mut map = TileMap::new(6, 6).expect("valid dimensions");
        let settings = Settings::new()
            .with_choice("tile1", "none")
            .with_choice("tile2", "none")
            .with_number("chance", 0.5);
        run(&mut map, settings, "abc");
        assert_eq!(map.count_of_kind(TileKind::Empty), 16);
    }

    #[test]
    fn identical_seeds_reproduce_identical_grids() {
        let settings = Settings::new()
            .with_choice("tile1", "wall")
            .with_choice("tile2", "empty")
            .with_number("chance", 0.4);

        let mut first = TileMap::new(9, 7).expect("valid dimensions");
        let mut second = TileMap::new(9, 7).expect("valid dimensions");
        run(&mut first, settings.clone(), "seed");
        run(&mut second, settings, "seed");

        assert_eq!(
            first.tiles_of_kind(TileKind::Wall),
            second.tiles_of_kind(TileKind::Wall)
        );
    }
}
