//! Density-driven random conversion between two configurable kinds.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::grid::TileMap;
use crate::stage::{util, Schema, SettingSpec, Settings, Stage, TILE_OPTIONS};

/// Converts random tiles of the source kind to the target kind until the
/// target-to-source ratio reaches the configured density.
pub struct DensityRandom;

impl Stage for DensityRandom {
    fn name(&self) -> &'static str {
        "densityrandom"
    }

    fn label(&self) -> &'static str {
        "Density Random"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with(
                "tile1",
                SettingSpec::Choice {
                    label: "Tile 1",
                    default: "wall",
                    options: TILE_OPTIONS,
                    random_subset: &[],
                },
            )
            .with(
                "tile2",
                SettingSpec::Choice {
                    label: "Tile 2",
                    default: "empty",
                    options: TILE_OPTIONS,
                    random_subset: &[],
                },
            )
            .with(
                "target_density",
                SettingSpec::Number {
                    label: "Target Density",
                    default: 0.5,
                    min: 0.0,
                    max: 10.0,
                    step: 0.1,
                    random_range: Some((0.0, 10.0)),
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
        let target = settings.tile_kind("tile1")?;
        let source = settings.tile_kind("tile2")?;
        let target_density = settings.number("target_density")?;
        if target == source {
            return Err(Error::InvalidSettings(
                "tile1 and tile2 must be different kinds".to_owned(),
            ));
        }
        util::fill_to_density(map, source, target, target_density, rng)
    }
}
