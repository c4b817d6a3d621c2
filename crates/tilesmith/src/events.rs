//! Event types and sinks for observing generation runs.
//!
//! This module defines [`PipelineEvent`] and a set of sinks and adapters to
//! emit, collect, or forward events while executing a
//! [`crate::pipeline::Pipeline`]. Events are purely observational: running
//! without a listener (the `()` sink) never changes generation results.
use std::fmt;

use rand::RngCore;

use crate::grid::TileKind;
use crate::rng::rand01;

/// A display color for computation highlights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Draws a color from the stream, one draw per channel.
    pub fn random(rng: &mut dyn RngCore) -> Self {
        let channel = |rng: &mut dyn RngCore| (rand01(rng) * 256.0).floor() as u8;
        Self {
            r: channel(rng),
            g: channel(rng),
            b: channel(rng),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Describes events emitted while a pipeline runs.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Emitted when a run starts.
    RunStarted {
        /// The user-facing seed text for this run.
        seed: String,
        /// Number of enabled stages that will execute.
        stage_count: usize,
    },

    /// Emitted when the whole pipeline finishes.
    RunFinished {
        /// Number of stages that completed successfully.
        stages_run: usize,
        /// Number of stages that failed.
        failures: usize,
    },

    /// Emitted before a stage executes.
    StageStarted {
        /// Execution index among the enabled stages.
        index: usize,
        /// Registry name of the stage.
        name: String,
        /// The sub-seed forked for this stage.
        sub_seed: u32,
    },

    /// Emitted after a stage completes successfully. Doubles as the
    /// between-stage yield point for rendering collaborators.
    StageFinished { index: usize, name: String },

    /// Emitted when a stage fails. The run continues with the next stage.
    StageFailed {
        index: usize,
        name: String,
        /// Human-readable failure detail.
        message: String,
    },

    /// A tile's new state after a recorded mutation.
    TileUpdated {
        x: i32,
        y: i32,
        kind: TileKind,
        properties: Vec<String>,
    },

    /// A computation highlight at the given coordinates.
    Computation { x: i32, y: i32, color: Color },

    /// Clears all computation highlights.
    ComputationCleared,
}

impl PipelineEvent {
    pub fn kind(&self) -> PipelineEventKind {
        match self {
            PipelineEvent::RunStarted { .. } => PipelineEventKind::RunStarted,
            PipelineEvent::RunFinished { .. } => PipelineEventKind::RunFinished,
            PipelineEvent::StageStarted { .. } => PipelineEventKind::StageStarted,
            PipelineEvent::StageFinished { .. } => PipelineEventKind::StageFinished,
            PipelineEvent::StageFailed { .. } => PipelineEventKind::StageFailed,
            PipelineEvent::TileUpdated { .. } => PipelineEventKind::TileUpdated,
            PipelineEvent::Computation { .. } => PipelineEventKind::Computation,
            PipelineEvent::ComputationCleared => PipelineEventKind::ComputationCleared,
        }
    }
}

/// Discriminant of [`PipelineEvent`], used by sinks to filter cheaply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineEventKind {
    RunStarted,
    RunFinished,
    StageStarted,
    StageFinished,
    StageFailed,
    TileUpdated,
    Computation,
    ComputationCleared,
}

/// A generic event sink that accepts [`PipelineEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PipelineEvent);

    /// Whether the sink is interested in events of `kind`. Emitters may skip
    /// constructing events a sink does not want.
    fn wants(&self, _kind: PipelineEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PipelineEvent) {}

    #[inline]
    fn wants(&self, _kind: PipelineEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PipelineEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PipelineEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PipelineEvent),
{
    #[inline]
    fn send(&mut self, event: PipelineEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PipelineEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<PipelineEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PipelineEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PipelineEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[S] {
        &self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: PipelineEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: PipelineEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Mulberry32;

    #[test]
    fn color_displays_as_padded_hex() {
        let color = Color::new(0, 10, 255);
        assert_eq!(color.to_string(), "#000aff");
    }

    #[test]
    fn random_color_is_deterministic_per_seed() {
        let mut a = Mulberry32::new(9);
        let mut b = Mulberry32::new(9);
        assert_eq!(Color::random(&mut a), Color::random(&mut b));
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::with_capacity(2);
        assert!(sink.is_empty());
        sink.send(PipelineEvent::ComputationCleared);
        sink.send(PipelineEvent::Computation {
            x: 1,
            y: 2,
            color: Color::new(1, 2, 3),
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(
            sink.as_slice()[1].kind(),
            PipelineEventKind::Computation
        );
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn unit_sink_wants_nothing() {
        let sink = ();
        assert!(!sink.wants(PipelineEventKind::TileUpdated));
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(PipelineEvent::ComputationCleared);
        assert_eq!(multi.len(), 2);
        assert_eq!(multi.sinks()[0].len(), 1);
        assert_eq!(multi.sinks()[1].len(), 1);
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(PipelineEvent::ComputationCleared);
        assert_eq!(count, 1);
    }
}
