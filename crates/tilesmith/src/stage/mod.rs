//! The stage contract, settings schemas, the registry, and the stage library.
use rand::RngCore;

use crate::error::Result;
use crate::events::EventSink;
use crate::grid::TileMap;

pub mod blobs_and_noodles;
pub mod density_random;
pub mod fencifier;
pub mod hole_puncher;
pub mod no_diagonals;
pub mod propertifier;
pub mod random_fill;
pub mod registry;
pub mod schema;
pub mod set_blend;
pub mod set_symmetry;
mod util;

pub use blobs_and_noodles::BlobsAndNoodles;
pub use density_random::DensityRandom;
pub use fencifier::Fencifier;
pub use hole_puncher::HolePuncher;
pub use no_diagonals::NoDiagonals;
pub use propertifier::Propertifier;
pub use random_fill::RandomFill;
pub use registry::StageRegistry;
pub use schema::{ChoiceOption, Schema, SettingSpec, SettingValue, Settings};
pub use set_blend::SetBlend;
pub use set_symmetry::SetSymmetry;

/// A configurable generation stage.
///
/// Stages are stateless across runs: everything they need arrives through the
/// grid, the resolved settings, and a private random stream forked from the
/// master seed. The sink is observational only.
pub trait Stage: Send + Sync {
    /// Registry name, also used in presets.
    fn name(&self) -> &'static str;

    /// Human-readable display name.
    fn label(&self) -> &'static str;

    /// The settings schema this stage declares.
    fn schema(&self) -> Schema;

    /// Runs the stage against the grid. Settings have been resolved against
    /// [`Stage::schema`] by the caller.
    fn execute(
        &self,
        map: &mut TileMap,
        settings: &Settings,
        rng: &mut dyn RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<()>;
}

/// Option table for settings selecting a concrete tile kind.
pub(crate) const TILE_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption {
        label: "Wall",
        value: "wall",
    },
    ChoiceOption {
        label: "Fence",
        value: "fence",
    },
    ChoiceOption {
        label: "Empty",
        value: "empty",
    },
];

/// Option table for settings where `"none"` skips the write entirely.
pub(crate) const TILE_OPTIONS_WITH_NONE: &[ChoiceOption] = &[
    ChoiceOption {
        label: "Wall",
        value: "wall",
    },
    ChoiceOption {
        label: "Fence",
        value: "fence",
    },
    ChoiceOption {
        label: "Empty",
        value: "empty",
    },
    ChoiceOption {
        label: "None",
        value: "none",
    },
];
