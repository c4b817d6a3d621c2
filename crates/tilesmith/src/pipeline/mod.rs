//! The staged generation pipeline: ordered stage entries, seeding, and events.
use tracing::{info, warn};

use crate::error::Result;
use crate::events::{EventSink, PipelineEvent, PipelineEventKind};
use crate::grid::TileMap;
use crate::rng::{fork_seed, hash_seed, Mulberry32};
use crate::stage::{Settings, StageRegistry};

pub mod preset;

pub use preset::{Preset, PresetEntry};

/// One configured slot in the pipeline's stage list.
#[derive(Debug, Clone)]
pub struct StageEntry {
    /// Registry name of the stage.
    pub name: String,
    /// Settings supplied by the caller, resolved against the stage schema at
    /// run time.
    pub settings: Settings,
    /// Disabled entries are skipped and consume no sub-seed.
    pub enabled: bool,
}

/// One stage failure surfaced by a run.
#[derive(Debug, Clone)]
pub struct StageFailure {
    /// Execution index among the enabled stages.
    pub index: usize,
    pub name: String,
    pub message: String,
}

/// Summary of a completed run.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Names of the stages that completed successfully, in execution order.
    pub stages_run: Vec<String>,
    /// Sub-seed forked for each enabled stage, in execution order.
    pub sub_seeds: Vec<u32>,
    /// Stages that returned an error. The run continues past them.
    pub failures: Vec<StageFailure>,
}

/// An ordered, seeded sequence of generation stages.
///
/// The pipeline owns a [`StageRegistry`] and an entry list. Running hashes the
/// seed text into a master random stream and forks one private sub-stream per
/// enabled entry, so reordering, disabling, or reconfiguring one stage never
/// perturbs the draws of the others beyond its own slot.
pub struct Pipeline {
    registry: StageRegistry,
    entries: Vec<StageEntry>,
}

impl Pipeline {
    /// A pipeline over the built-in stage library.
    pub fn new() -> Self {
        Self::with_registry(StageRegistry::with_builtins())
    }

    pub fn with_registry(registry: StageRegistry) -> Self {
        Self {
            registry,
            entries: Vec::new(),
        }
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StageRegistry {
        &mut self.registry
    }

    /// Appends an enabled stage entry. Fails when the name is not registered.
    pub fn add_stage(&mut self, name: impl Into<String>, settings: Settings) -> Result<()> {
        let name = name.into();
        self.registry.create(&name)?;
        self.entries.push(StageEntry {
            name,
            settings,
            enabled: true,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[StageEntry] {
        &self.entries
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut StageEntry> {
        self.entries.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Option<StageEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Swaps the entry at `index` with its predecessor.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.entries.len() {
            return false;
        }
        self.entries.swap(index - 1, index);
        true
    }

    /// Swaps the entry at `index` with its successor.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.entries.len() {
            return false;
        }
        self.entries.swap(index, index + 1);
        true
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Replaces the entry list with the preset's stages. Fails without
    /// modification when the preset names an unregistered stage.
    pub fn apply_preset(&mut self, preset: &Preset) -> Result<()> {
        for entry in &preset.entries {
            self.registry.create(&entry.stage)?;
        }
        self.entries = preset
            .entries
            .iter()
            .map(|entry| StageEntry {
                name: entry.stage.clone(),
                settings: entry.settings.clone(),
                enabled: entry.enabled,
            })
            .collect();
        Ok(())
    }

    /// Captures the current entry list as a preset.
    pub fn to_preset(&self) -> Preset {
        Preset {
            entries: self
                .entries
                .iter()
                .map(|entry| {
                    PresetEntry::new(entry.name.clone(), entry.settings.clone())
                        .with_enabled(entry.enabled)
                })
                .collect(),
        }
    }

    /// Runs every enabled stage against the map.
    pub fn run(&self, map: &mut TileMap, seed_text: &str) -> RunReport {
        self.run_with_events(map, seed_text, &mut ())
    }

    /// Runs every enabled stage against the map, emitting events to `sink`.
    ///
    /// Stage errors are caught at the stage boundary: the failure is logged,
    /// surfaced as [`PipelineEvent::StageFailed`], and the run continues with
    /// the next stage. Partial mutations of a failed stage stand.
    pub fn run_with_events(
        &self,
        map: &mut TileMap,
        seed_text: &str,
        sink: &mut dyn EventSink,
    ) -> RunReport {
        let mut master = Mulberry32::new(hash_seed(seed_text));
        let stage_count = self.entries.iter().filter(|e| e.enabled).count();
        info!(
            "Run '{}': {} enabled of {} stages.",
            seed_text,
            stage_count,
            self.entries.len()
        );
        if sink.wants(PipelineEventKind::RunStarted) {
            sink.send(PipelineEvent::RunStarted {
                seed: seed_text.to_owned(),
                stage_count,
            });
        }

        let recording = sink.wants(PipelineEventKind::TileUpdated);
        map.set_recording(recording);

        let mut report = RunReport::default();
        let mut index = 0;
        for entry in &self.entries {
            if !entry.enabled {
                continue;
            }
            let sub_seed = fork_seed(&mut master);
            report.sub_seeds.push(sub_seed);

            self.execute_entry(entry, index, sub_seed, map, sink, &mut report);

            if recording {
                for change in map.take_changes() {
                    sink.send(PipelineEvent::TileUpdated {
                        x: change.x,
                        y: change.y,
                        kind: change.kind,
                        properties: change.properties,
                    });
                }
            }
            if sink.wants(PipelineEventKind::ComputationCleared) {
                sink.send(PipelineEvent::ComputationCleared);
            }
            index += 1;
        }
        map.set_recording(false);

        info!(
            "Run finished: {} stages, {} failures.",
            report.stages_run.len(),
            report.failures.len()
        );
        if sink.wants(PipelineEventKind::RunFinished) {
            sink.send(PipelineEvent::RunFinished {
                stages_run: report.stages_run.len(),
                failures: report.failures.len(),
            });
        }
        report
    }

    fn execute_entry(
        &self,
        entry: &StageEntry,
        index: usize,
        sub_seed: u32,
        map: &mut TileMap,
        sink: &mut dyn EventSink,
        report: &mut RunReport,
    ) {
        let fail = |report: &mut RunReport, sink: &mut dyn EventSink, message: String| {
            warn!("Stage {index} '{}' failed: {message}", entry.name);
            report.failures.push(StageFailure {
                index,
                name: entry.name.clone(),
                message: message.clone(),
            });
            if sink.wants(PipelineEventKind::StageFailed) {
                sink.send(PipelineEvent::StageFailed {
                    index,
                    name: entry.name.clone(),
                    message,
                });
            }
        };

        let stage = match self.registry.create(&entry.name) {
            Ok(stage) => stage,
            Err(e) => {
                fail(report, sink, e.to_string());
                return;
            }
        };

        info!("Stage {index}: '{}' (sub-seed {sub_seed:#010x}).", entry.name);
        if sink.wants(PipelineEventKind::StageStarted) {
            sink.send(PipelineEvent::StageStarted {
                index,
                name: entry.name.clone(),
                sub_seed,
            });
        }

        let settings = stage.schema().resolve(&entry.settings);
        let mut rng = Mulberry32::new(sub_seed);
        match stage.execute(map, &settings, &mut rng, sink) {
            Ok(()) => {
                report.stages_run.push(entry.name.clone());
                if sink.wants(PipelineEventKind::StageFinished) {
                    sink.send(PipelineEvent::StageFinished {
                        index,
                        name: entry.name.clone(),
                    });
                }
            }
            Err(e) => fail(report, sink, e.to_string()),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
