//! Property placement weighted by neighborhood coziness.
use rand::RngCore;

use crate::error::Result;
use crate::events::EventSink;
use crate::grid::{Direction, Tile, TileMap};
use crate::rng::rand01;
use crate::stage::{
    util, ChoiceOption, Schema, SettingSpec, Settings, Stage, TILE_OPTIONS, TILE_OPTIONS_WITH_NONE,
};

const PROPERTY_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption {
        label: "Roof",
        value: "roof",
    },
    ChoiceOption {
        label: "Weapon Spawn",
        value: "weapon_spawn",
    },
    ChoiceOption {
        label: "FFA Spawn",
        value: "ffa_spawn",
    },
];

/// Attaches a named property to tiles of one kind, preferring tiles whose
/// neighbors are "cozy": of the configured cozy kind, or already carrying the
/// property when self-cozy is enabled.
///
/// Candidates are scored by cozy neighbor count and sorted coziest-first; the
/// cozy bias narrows the draw window toward the top of that ranking. Out of
/// range neighbors never count as cozy.
pub struct Propertifier;

impl Stage for Propertifier {
    fn name(&self) -> &'static str {
        "propertifier"
    }

    fn label(&self) -> &'static str {
        "Propertifier"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with(
                "tile",
                SettingSpec::Choice {
                    label: "Tile",
                    default: "empty",
                    options: TILE_OPTIONS,
                    random_subset: &[],
                },
            )
            .with(
                "cozy_tile",
                SettingSpec::Choice {
                    label: "Cozy Tile",
                    default: "wall",
                    options: TILE_OPTIONS_WITH_NONE,
                    random_subset: &[],
                },
            )
            .with(
                "property",
                SettingSpec::Choice {
                    label: "Property",
                    default: "roof",
                    options: PROPERTY_OPTIONS,
                    random_subset: &[],
                },
            )
            .with(
                "cozy_bias",
                SettingSpec::Number {
                    label: "Cozy Bias",
                    default: 0.0,
                    min: 0.0,
                    max: 1.0,
                    step: 0.01,
                    random_range: Some((0.0, 1.0)),
                },
            )
            .with(
                "diagonal_cozy",
                SettingSpec::Toggle {
                    label: "Diagonal Cozy",
                    default: true,
                    random_flip: true,
                },
            )
            .with(
                "self_cozy",
                SettingSpec::Toggle {
                    label: "Self Cozy",
                    default: true,
                    random_flip: true,
                },
            )
            .with(
                "rate",
                SettingSpec::Number {
                    label: "Rate",
                    default: 5.0,
                    min: 1.0,
                    max: 1000.0,
                    step: 1.0,
                    random_range: Some((1.0, 15.0)),
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
        let tile = settings.tile_kind("tile")?;
        let cozy_tile = settings.optional_tile_kind("cozy_tile")?;
        let property = settings.choice("property")?.to_owned();
        let cozy_bias = settings.number("cozy_bias")?;
        let diagonal_cozy = settings.toggle("diagonal_cozy")?;
        let self_cozy = settings.toggle("self_cozy")?;
        let rate = settings.number("rate")?;

        let tiles = util::shuffle(rng, map.tiles_of_kind(tile));

        let is_cozy = |neighbor: Option<&Tile>| -> bool {
            let Some(neighbor) = neighbor else {
                return false;
            };
            if Some(neighbor.kind()) == cozy_tile {
                return true;
            }
            self_cozy && neighbor.has_property(&property)
        };

        let mut ranked: Vec<((i32, i32), u32)> = tiles
            .iter()
            .map(|&(x, y)| {
                let mut score = 0;
                for dir in Direction::ORTHOGONAL {
                    if is_cozy(map.adjacent(x, y, dir)) {
                        score += 1;
                    }
                }
                if diagonal_cozy {
                    for dir in Direction::DIAGONAL {
                        if is_cozy(map.adjacent(x, y, dir)) {
                            score += 1;
                        }
                    }
                }
                ((x, y), score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        if ranked.is_empty() {
            return Ok(());
        }

        // Full bias still leaves the single coziest tile drawable.
        let window = ((ranked.len() as f64 * (1.0 - cozy_bias)).ceil() as usize).max(1);
        let add_count = (tiles.len() as f64 / rate).ceil() as usize;
        for _ in 0..add_count {
            let index = (window as f64 * rand01(rng)) as usize;
            let (x, y) = ranked[index].0;
            map.symmetric_add_property(x, y, &property)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileKind;
    use crate::rng::{hash_seed, Mulberry32};

    fn count_with_property(map: &TileMap, property: &str) -> usize {
        map.tiles_of_kind(TileKind::Empty)
            .into_iter()
            .filter(|&(x, y)| {
                map.get_tile(x, y)
                    .expect("in range")
                    .has_property(property)
            })
            .count()
    }

    #[test]
    fn places_at_least_one_property_per_rate_window() {
        let mut map = TileMap::new(10, 10).expect("valid dimensions");
        let stage = Propertifier;
        let settings = stage.schema().resolve(
            &Settings::new()
                .with_choice("tile", "empty")
                .with_choice("cozy_tile", "wall")
                .with_choice("property", "weapon_spawn")
                .with_number("rate", 16.0),
        );
        let mut rng = Mulberry32::new(hash_seed("props"));
        stage
            .execute(&mut map, &settings, &mut rng, &mut ())
            .expect("stage succeeds");

        // 64 candidates at rate 16 yields four draws; duplicates collapse.
        let placed = count_with_property(&map, "weapon_spawn");
        assert!(placed >= 1 && placed <= 4);
    }

    #[test]
    fn full_bias_picks_the_coziest_tile() {
        let mut map = TileMap::new(9, 9).expect("valid dimensions");
        // Build a pocket so (4, 4) is the only tile with three wall neighbors.
        for (x, y) in [(3, 4), (5, 4), (4, 5)] {
            map.set_kind(x, y, TileKind::Wall).expect("in range");
        }
        let stage = Propertifier;
        let settings = stage.schema().resolve(
            &Settings::new()
                .with_choice("tile", "empty")
                .with_choice("cozy_tile", "wall")
                .with_choice("property", "roof")
                .with_number("cozy_bias", 1.0)
                .with_toggle("diagonal_cozy", false)
                .with_toggle("self_cozy", false)
                .with_number("rate", 1000.0),
        );
        let mut rng = Mulberry32::new(hash_seed("pocket"));
        stage
            .execute(&mut map, &settings, &mut rng, &mut ())
            .expect("stage succeeds");

        assert!(map.get_tile(4, 4).expect("in range").has_property("roof"));
        assert_eq!(count_with_property(&map, "roof"), 1);
    }

    #[test]
    fn cozy_tile_none_scores_by_self_cozy_only() {
        let mut map = TileMap::new(8, 8).expect("valid dimensions");
        let stage = Propertifier;
        let settings = stage.schema().resolve(
            &Settings::new()
                .with_choice("tile", "empty")
                .with_choice("cozy_tile", "none")
                .with_choice("property", "ffa_spawn")
                .with_number("rate", 36.0),
        );
        let mut rng = Mulberry32::new(hash_seed("none-cozy"));
        stage
            .execute(&mut map, &settings, &mut rng, &mut ())
            .expect("stage succeeds");
        assert_eq!(count_with_property(&map, "ffa_spawn"), 1);
    }

    #[test]
    fn no_candidates_is_a_no_op() {
        let mut map = TileMap::new(6, 6).expect("valid dimensions");
        let stage = Propertifier;
        let settings = stage
            .schema()
            .resolve(&Settings::new().with_choice("tile", "fence"));
        let mut rng = Mulberry32::new(0);
        stage
            .execute(&mut map, &settings, &mut rng, &mut ())
            .expect("stage succeeds");
    }
}
