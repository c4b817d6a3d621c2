//! Pure configuration stage: sets the grid's blend mode.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::grid::{BlendMode, TileMap};
use crate::stage::{ChoiceOption, Schema, SettingSpec, Settings, Stage};

const BLEND_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption {
        label: "Overwrite",
        value: "overwrite",
    },
    ChoiceOption {
        label: "Overlay",
        value: "overlay",
    },
    ChoiceOption {
        label: "Clear",
        value: "clear",
    },
];

/// Sets how subsequent kind-writes are applied; mutates no tiles.
pub struct SetBlend;

impl Stage for SetBlend {
    fn name(&self) -> &'static str {
        "setblend"
    }

    fn label(&self) -> &'static str {
        "Set Blend"
    }

    fn schema(&self) -> Schema {
        Schema::new().with(
            "blend",
            SettingSpec::Choice {
                label: "Blend Mode",
                default: "overwrite",
                options: BLEND_OPTIONS,
                random_subset: &["overwrite", "overlay", "clear"],
            },
        )
    }

    fn execute(
        &self,
        map: &mut TileMap,
        settings: &Settings,
        _rng: &mut dyn RngCore,
        _sink: &mut dyn EventSink,
    ) -> Result<()> {
        let blend = match settings.choice("blend")? {
            "overwrite" => BlendMode::Overwrite,
            "overlay" => BlendMode::Overlay,
            "clear" => BlendMode::Clear,
            other => {
                return Err(Error::InvalidSettings(format!(
                    "unknown blend mode '{other}'"
                )))
            }
        };
        map.set_blend_mode(blend);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Mulberry32;

    #[test]
    fn sets_the_blend_mode_without_touching_tiles() {
        let mut map = TileMap::new(6, 6).expect("valid dimensions");
        let stage = SetBlend;
        let settings = stage
            .schema()
            .resolve(&Settings::new().with_choice("blend", "overlay"));
        let mut rng = Mulberry32::new(0);
        stage
            .execute(&mut map, &settings, &mut rng, &mut ())
            .expect("stage succeeds");
        assert_eq!(map.blend_mode(), BlendMode::Overlay);
    }

    #[test]
    fn default_is_overwrite() {
        let stage = SetBlend;
        let defaults = stage.schema().default_values();
        assert_eq!(defaults.choice("blend").expect("present"), "overwrite");
    }
}
