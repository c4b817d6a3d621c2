//! Pure configuration stage: sets the grid's symmetry mode.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::grid::{Symmetry, TileMap};
use crate::stage::{ChoiceOption, Schema, SettingSpec, Settings, Stage};

const SYMMETRY_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption {
        label: "None",
        value: "none",
    },
    ChoiceOption {
        label: "X",
        value: "x",
    },
    ChoiceOption {
        label: "Y",
        value: "y",
    },
    ChoiceOption {
        label: "XY",
        value: "xy",
    },
    ChoiceOption {
        label: "Radial",
        value: "radial",
    },
];

/// Sets the symmetry applied by subsequent stages; mutates no tiles.
pub struct SetSymmetry;

impl Stage for SetSymmetry {
    fn name(&self) -> &'static str {
        "setsymmetry"
    }

    fn label(&self) -> &'static str {
        "Set Symmetry"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with(
                "symmetry",
                SettingSpec::Choice {
                    label: "Symmetry Type",
                    default: "none",
                    options: SYMMETRY_OPTIONS,
                    random_subset: &["none", "x", "y", "xy"],
                },
            )
            .with(
                "points",
                SettingSpec::Number {
                    label: "Radial Points",
                    default: 3.0,
                    min: 2.0,
                    max: 10.0,
                    step: 1.0,
                    random_range: None,
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
        let symmetry = match settings.choice("symmetry")? {
            "none" => Symmetry::None,
            "x" => Symmetry::X,
            "y" => Symmetry::Y,
            "xy" => Symmetry::Xy,
            "radial" => Symmetry::Radial {
                points: settings.number("points")?.floor() as u32,
            },
            other => {
                return Err(Error::InvalidSettings(format!(
                    "unknown symmetry mode '{other}'"
                )))
            }
        };
        map.set_symmetry(symmetry);
        Ok(())
    }
}
