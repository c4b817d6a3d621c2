#![forbid(unsafe_code)]
//! tilesmith: deterministic, staged tile-map generation on bordered grids.
//!
//! Modules:
//! - rng: seed hashing and the mulberry32 random stream
//! - grid: tiles, the tile map, blend modes, symmetry
//! - stage: the stage contract, settings schemas, the registry, and the built-in stage library
//! - pipeline: ordered stage execution, sub-seed forking, presets, events
//!
//! For examples and docs, see README and docs.rs.
pub mod error;
pub mod events;
pub mod grid;
pub mod pipeline;
pub mod rng;
pub mod stage;

/// Convenient re-exports for common types. Import with `use tilesmith::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        Color, EventSink, FnSink, MultiSink, PipelineEvent, PipelineEventKind, VecSink,
    };
    pub use crate::grid::{
        BlendMode, Direction, Symmetry, Tile, TileKind, TileMap, PROP_IMMUTABLE, PROP_UNTOUCHED,
    };
    pub use crate::pipeline::{Pipeline, Preset, PresetEntry, RunReport, StageEntry, StageFailure};
    pub use crate::rng::{fork_seed, hash_seed, rand01, seed_token, Mulberry32, SEED_TOKEN_LEN};
    pub use crate::stage::{
        BlobsAndNoodles, ChoiceOption, DensityRandom, Fencifier, HolePuncher, NoDiagonals,
        Propertifier, RandomFill, Schema, SetBlend, SetSymmetry, SettingSpec, SettingValue,
        Settings, Stage, StageRegistry,
    };
}
