//! Wall growth by random accretion, producing blob and corridor shapes.
use rand::RngCore;

use crate::error::Result;
use crate::events::EventSink;
use crate::grid::{TileKind, TileMap};
use crate::stage::{util, Schema, SettingSpec, Settings, Stage};

/// Converts random empty tiles to wall until the wall-to-empty ratio reaches
/// the configured density.
pub struct BlobsAndNoodles;

impl Stage for BlobsAndNoodles {
    fn name(&self) -> &'static str {
        "blobsandnoodles"
    }

    fn label(&self) -> &'static str {
        "Blobs and Noodles"
    }

    fn schema(&self) -> Schema {
        Schema::new().with(
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
        let target_density = settings.number("target_density")?;
        util::fill_to_density(map, TileKind::Empty, TileKind::Wall, target_density, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{hash_seed, Mulberry32};

    #[test]
    fn grows_walls_to_the_target_density() {
        let mut map = TileMap::new(16, 12).expect("valid dimensions");
        let stage = BlobsAndNoodles;
        let settings = stage
            .schema()
            .resolve(&Settings::new().with_number("target_density", 2.0));
        let mut rng = Mulberry32::new(hash_seed("blobs"));
        stage
            .execute(&mut map, &settings, &mut rng, &mut ())
            .expect("stage succeeds");

        let walls = map.count_of_kind(TileKind::Wall) as f64;
        let empties = map.count_of_kind(TileKind::Empty) as f64;
        assert!(empties > 0.0);
        assert!(walls / empties >= 2.0);
    }
}
