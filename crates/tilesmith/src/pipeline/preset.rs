//! Serializable pipeline configurations.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::stage::Settings;

/// One configured stage of a preset.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PresetEntry {
    /// Registry name of the stage.
    pub stage: String,
    pub settings: Settings,
    pub enabled: bool,
}

impl PresetEntry {
    pub fn new(stage: impl Into<String>, settings: Settings) -> Self {
        Self {
            stage: stage.into(),
            settings,
            enabled: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// An ordered stage configuration that can be applied to a
/// [`crate::pipeline::Pipeline`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preset {
    pub entries: Vec<PresetEntry>,
}

impl Preset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, entry: PresetEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// The built-in general-purpose arena preset.
    ///
    /// Two-point radial symmetry, dense random walls, connectivity repair,
    /// diagonal cleanup, fence accents, then three property passes (roofs,
    /// weapon spawns, free-for-all spawns).
    pub fn generic() -> Self {
        Self::new()
            .with_entry(PresetEntry::new(
                "setsymmetry",
                Settings::new()
                    .with_choice("symmetry", "radial")
                    .with_number("points", 2.0),
            ))
            .with_entry(PresetEntry::new(
                "densityrandom",
                Settings::new()
                    .with_choice("tile1", "wall")
                    .with_choice("tile2", "empty")
                    .with_number("target_density", 2.0),
            ))
            .with_entry(PresetEntry::new(
                "holepuncher",
                Settings::new().with_number("punch_rate", 0.2),
            ))
            .with_entry(PresetEntry::new(
                "nodiagonals",
                Settings::new().with_choice("tile", "wall"),
            ))
            .with_entry(PresetEntry::new(
                "fencifier",
                Settings::new()
                    .with_number("chance", 0.2)
                    .with_toggle("lone_walls", true)
                    .with_toggle("through_walls", true),
            ))
            .with_entry(PresetEntry::new(
                "propertifier",
                Settings::new()
                    .with_choice("tile", "empty")
                    .with_choice("cozy_tile", "wall")
                    .with_choice("property", "roof")
                    .with_number("cozy_bias", 0.95)
                    .with_toggle("diagonal_cozy", true)
                    .with_toggle("self_cozy", true)
                    .with_number("rate", 60.0),
            ))
            .with_entry(PresetEntry::new(
                "propertifier",
                Settings::new()
                    .with_choice("tile", "empty")
                    .with_choice("cozy_tile", "wall")
                    .with_choice("property", "weapon_spawn")
                    .with_number("cozy_bias", 0.5)
                    .with_toggle("diagonal_cozy", false)
                    .with_toggle("self_cozy", false)
                    .with_number("rate", 40.0),
            ))
            .with_entry(PresetEntry::new(
                "propertifier",
                Settings::new()
                    .with_choice("tile", "empty")
                    .with_choice("cozy_tile", "none")
                    .with_choice("property", "ffa_spawn")
                    .with_number("cozy_bias", 0.0)
                    .with_toggle("diagonal_cozy", false)
                    .with_toggle("self_cozy", false)
                    .with_number("rate", 160.0),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::StageRegistry;

    #[test]
    fn generic_preset_is_fully_registered_and_enabled() {
        let registry = StageRegistry::with_builtins();
        let preset = Preset::generic();
        let names: Vec<&str> = preset.entries.iter().map(|e| e.stage.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "setsymmetry",
                "densityrandom",
                "holepuncher",
                "nodiagonals",
                "fencifier",
                "propertifier",
                "propertifier",
                "propertifier",
            ]
        );
        for entry in &preset.entries {
            assert!(registry.contains(&entry.stage));
            assert!(entry.enabled);
        }
    }

    #[test]
    fn generic_property_passes_cover_the_property_set() {
        let preset = Preset::generic();
        let properties: Vec<&str> = preset
            .entries
            .iter()
            .filter(|e| e.stage == "propertifier")
            .map(|e| e.settings.choice("property").expect("present"))
            .collect();
        assert_eq!(properties, vec!["roof", "weapon_spawn", "ffa_spawn"]);
    }
}
